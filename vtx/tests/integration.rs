//! Cross-crate scenarios from the core's testable-properties list: each one
//! exercises at least two of `vtx_vte`/`vtx_input`/`vtx_term` together,
//! which is why these live here rather than as a unit test in any one of
//! them.

use std::time::Duration;

use vtx::vtx_vte::escapes::osc52::{Osc52, SelectionType};
use vtx::vtx_vte::escapes::osc7::Osc7;
use vtx::vtx_vte::parser::{EscapeSequenceParser, OscTerminator, ParserEvent};
use vtx::{AbsolutePosition, Clipboard, ClipboardMode, Feature, Identifier, ReflowMap};

#[test]
fn nvim_startup_stream_round_trips_through_parser_and_codecs() {
    let mut parser = EscapeSequenceParser::new();
    let input = "\x1b[?1049h\x1b[22;0;0t\x1b[?1h\x1b=\x1b[H\x1b[2J\x1b[?2004h\x1b[?2026$p\x1b[0m\x1b[4:3m\x1bP$qm\x1b\\\x1b[?u\x1b[c\x1b[?25h";
    let events = parser.parse_application(input);
    assert_eq!(events.len(), 14);

    // The `CSI 22;0;0 t` in this stream isn't one of the four size reports
    // this core understands (it's a window-title-stack push, not a size
    // query/report), so the codec correctly declines it.
    let window_title_push = events
        .iter()
        .find_map(|e| match e {
            ParserEvent::Csi(_, params, b't') => Some(params),
            _ => None,
        })
        .expect("expected the window-manipulation CSI");
    assert!(vtx::vtx_vte::escapes::size_report::SizeReport::from_params(&[], b't', window_title_push).is_none());
}

#[test]
fn osc52_query_through_the_escape_parser() {
    let mut parser = EscapeSequenceParser::new();
    let events = parser.parse_application("\x1b]52;c;?\x07");
    let ParserEvent::Osc(data, terminator) = &events[0] else {
        panic!("expected an OSC event");
    };
    assert_eq!(*terminator, OscTerminator::Bel);

    let text = std::str::from_utf8(data).unwrap();
    let payload = text.strip_prefix("52;").unwrap();
    let parsed = Osc52::parse(payload.as_bytes()).unwrap();
    assert!(parsed.query);
    assert_eq!(parsed.selections, vec![SelectionType::Clipboard]);
}

#[test]
fn osc7_cwd_report_through_the_escape_parser() {
    let mut parser = EscapeSequenceParser::new();
    let events = parser.parse_application("\x1b]7;file://host/dev/null%20test\x1b\\");
    let ParserEvent::Osc(data, terminator) = &events[0] else {
        panic!("expected an OSC event");
    };
    assert_eq!(*terminator, OscTerminator::EscBackslash);

    let text = std::str::from_utf8(data).unwrap();
    let payload = text.strip_prefix("7;").unwrap();
    let parsed = Osc7::parse(payload.as_bytes()).unwrap();
    assert_eq!(parsed.hostname, "host");
    assert_eq!(parsed.path, "/dev/null test");
}

#[test]
fn clipboard_timeout_then_fallback_scenario() {
    let mut clipboard = Clipboard::new(ClipboardMode::System, Feature::CLIPBOARD);
    let id = Identifier::new(1, 2, 3);
    let t0 = Duration::from_secs(1000);

    clipboard.got_response(SelectionType::Clipboard, b"1".to_vec(), t0);
    assert!(clipboard.request(SelectionType::Clipboard, id, t0));
    assert!(clipboard.take_replies(t0).is_empty());

    let t1 = Duration::from_secs(1001);
    let replies = clipboard.take_replies(t1);
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].data, b"1");
    assert_eq!(replies[0].selection_type, SelectionType::Clipboard);

    // The system clipboard is now considered broken: the very next request
    // at the same timestamp is answered immediately from the local cache.
    assert!(clipboard.request(SelectionType::Clipboard, id, t1));
    let replies = clipboard.take_replies(t1);
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].data, b"1");
}

#[test]
fn reflow_map_three_way_merge_scenario() {
    let mut a = ReflowMap::new();
    a.add_offset(AbsolutePosition::new(5, 0), 1, 0);

    let mut b = ReflowMap::new();
    b.add_offset(AbsolutePosition::new(10, 0), 1, 0);
    a.merge(b);

    let mut c = ReflowMap::new();
    c.add_offset(AbsolutePosition::new(0, 0), 1, 0);
    a.merge(c);

    assert_eq!(a.map_position(AbsolutePosition::new(0, 0)), AbsolutePosition::new(1, 0));
    assert_eq!(a.map_position(AbsolutePosition::new(5, 0)), AbsolutePosition::new(7, 0));
    assert_eq!(a.map_position(AbsolutePosition::new(10, 0)), AbsolutePosition::new(13, 0));
}
