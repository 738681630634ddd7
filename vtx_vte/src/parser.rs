//! Escape-sequence parser: converts a stream of Unicode code points into a
//! typed stream of [`ParserEvent`]s.
//!
//! Implements the canonical Williams/xterm VT state diagram
//! (<https://vt100.net/emu/dec_ansi_parser>) with two documented
//! deviations: `:` is accepted as a sub-parameter separator alongside `;`,
//! and an extra `Ss3` state folds `ESC O <byte>` into a `CSI` event when
//! parsing terminal input rather than application output.

use log::trace;

use crate::param::Params;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Escape,
    EscapeIntermediate,
    CsiEntry,
    CsiParam,
    CsiIntermediate,
    CsiIgnore,
    DcsEntry,
    DcsParam,
    DcsIntermediate,
    DcsPassthrough,
    DcsIgnore,
    OscString,
    SosPmApcString,
    Ss3,
}

impl Default for State {
    fn default() -> Self {
        State::Ground
    }
}

/// Which public entry point drove the current call. Controls the
/// input-mode-only quirks documented on [`EscapeSequenceParser::parse_input`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Application,
    Input,
}

/// The literal bytes that terminated an `OSC` string, preserved for
/// round-tripping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscTerminator {
    Bel,
    EscBackslash,
}

/// A single parsed event. See `vtx_vte::parser` module docs for the state
/// machine that produces these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserEvent {
    Print(char),
    /// A C0/C1 control character. `from_escape` is set when this control
    /// character was executed while the machine sat in the `Escape` state
    /// (relevant only to input-mode Alt+key handling upstream).
    Execute(u32, bool),
    Escape(Vec<u8>, u8),
    Csi(Vec<u8>, Params, u8),
    Dcs(Vec<u8>, Params, Vec<u8>),
    Osc(Vec<u8>, OscTerminator),
}

const MAX_INTERMEDIATES: usize = 4;

fn is_printable(c: u32) -> bool {
    (0x20..=0x7F).contains(&c) || c >= 0xA0
}

fn is_executable(c: u32) -> bool {
    c <= 0x17 || c == 0x19 || (0x1C..=0x1F).contains(&c)
}

fn is_csi_terminator(c: u32) -> bool {
    (0x40..=0x7E).contains(&c)
}

fn is_param_byte(c: u32) -> bool {
    (0x30..=0x39).contains(&c) || c == 0x3B || c == 0x3A
}

fn is_digit(c: u32) -> bool {
    (0x30..=0x39).contains(&c)
}

fn is_private_marker(c: u32) -> bool {
    (0x3C..=0x3F).contains(&c)
}

fn is_intermediate(c: u32) -> bool {
    (0x20..=0x2F).contains(&c)
}

fn is_escape_terminator(c: u32) -> bool {
    (0x30..=0x4F).contains(&c)
        || (0x51..=0x57).contains(&c)
        || c == 0x59
        || c == 0x5A
        || c == 0x5C
        || (0x60..=0x7E).contains(&c)
}

/// Byte-stream parser for an application's output (or the user's keyboard,
/// when fed through [`EscapeSequenceParser::parse_input`]).
#[derive(Default)]
pub struct EscapeSequenceParser {
    state: State,
    intermediates: Vec<u8>,
    params: Params,
    current_subparam: Option<u32>,
    last_separator_was_colon: bool,
    entered_param_state: bool,
    osc_data: Vec<u8>,
    saw_legacy_osc_terminator: bool,
    dcs_data: Vec<u8>,
    events: Vec<ParserEvent>,
}

impl EscapeSequenceParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drives the machine in *application mode*: no SS3 folding, no
    /// Alt+key synthesis, and C0/C1 execution does not reset the state
    /// back to `Ground`. Returns all events accumulated by this call.
    pub fn parse_application(&mut self, input: &str) -> Vec<ParserEvent> {
        for c in input.chars() {
            self.input(Mode::Application, c as u32);
        }
        std::mem::take(&mut self.events)
    }

    /// Drives the machine in *input mode*. SS3 sequences fold into `CSI`
    /// events, unclassified bytes in the `Escape` state execute as
    /// Alt+key, `ESC ESC` is reported as an `Execute(0x1B, _)` key press,
    /// and every `Execute` returns the machine to `Ground`.
    ///
    /// `flush` substitutes for a timeout-based disambiguation: when set
    /// and the machine is left sitting in `Escape` with no follow-up byte,
    /// a synthetic `Execute(0x1B, false)` is emitted and the machine
    /// resets to `Ground`.
    pub fn parse_input(&mut self, input: &str, flush: bool) -> Vec<ParserEvent> {
        for c in input.chars() {
            self.input(Mode::Input, c as u32);
        }
        if flush && self.state == State::Escape {
            self.events.push(ParserEvent::Execute(0x1B, false));
            self.state = State::Ground;
        }
        std::mem::take(&mut self.events)
    }

    fn input(&mut self, mode: Mode, c: u32) {
        // Global transitions, from any state.
        if c == 0x18 || c == 0x1A {
            let from_escape = self.state == State::Escape;
            self.transition_to(State::Ground);
            self.events.push(ParserEvent::Execute(c, from_escape));
            return;
        }
        if c == 0x1B {
            if mode == Mode::Input && self.state == State::Escape {
                // A second ESC while already sitting in Escape: the user
                // pressed the Escape key twice, not a long escape sequence.
                self.transition_to(State::Ground);
                self.events.push(ParserEvent::Execute(0x1B, false));
                return;
            }
            self.transition_to(State::Escape);
            return;
        }

        match self.state {
            State::Ground => self.in_ground(mode, c),
            State::Escape => self.in_escape(mode, c),
            State::EscapeIntermediate => self.in_escape_intermediate(mode, c),
            State::CsiEntry => self.in_csi_entry(mode, c),
            State::CsiParam => self.in_csi_param(mode, c),
            State::CsiIntermediate => self.in_csi_intermediate(mode, c),
            State::CsiIgnore => self.in_csi_ignore(mode, c),
            State::DcsEntry => self.in_dcs_entry(c),
            State::DcsParam => self.in_dcs_param(c),
            State::DcsIntermediate => self.in_dcs_intermediate(c),
            State::DcsPassthrough => self.in_dcs_passthrough(c),
            State::DcsIgnore => self.in_dcs_ignore(c),
            State::OscString => self.in_osc_string(c),
            State::SosPmApcString => self.in_sos_pm_apc_string(c),
            State::Ss3 => self.in_ss3(mode, c),
        }
    }

    /// Emits an `Execute` event and, in input mode, immediately returns the
    /// machine to `Ground` (mirroring the original's `execute()`, which
    /// performs this reset as part of emission rather than as a separate
    /// post-dispatch check keyed on whatever event happened to be last).
    fn emit_execute(&mut self, mode: Mode, c: u32, from_escape: bool) {
        self.events.push(ParserEvent::Execute(c, from_escape));
        if mode == Mode::Input {
            self.transition_to(State::Ground);
        }
    }

    /// Performs the state-exit action for the state being left (if any),
    /// any state-entry clearing, and updates `self.state`. Centralizes the
    /// "state-exit action" concept the parser relies on for DCS hook/unhook
    /// and OSC start/end.
    fn transition_to(&mut self, next: State) {
        if self.state == next {
            return;
        }

        match self.state {
            State::DcsPassthrough => {
                let data = std::mem::take(&mut self.dcs_data);
                let intermediates = std::mem::take(&mut self.intermediates);
                let params = self.finalize_params();
                self.events.push(ParserEvent::Dcs(intermediates, params, data));
            }
            State::OscString => {
                let data = std::mem::take(&mut self.osc_data);
                let terminator = if self.saw_legacy_osc_terminator {
                    OscTerminator::Bel
                } else {
                    OscTerminator::EscBackslash
                };
                self.events.push(ParserEvent::Osc(data, terminator));
            }
            _ => {}
        }

        match next {
            State::CsiEntry | State::DcsEntry | State::Escape => {
                self.intermediates.clear();
                self.params.clear();
                self.current_subparam = None;
                self.last_separator_was_colon = false;
                self.entered_param_state = false;
            }
            State::OscString => {
                self.osc_data.clear();
                self.saw_legacy_osc_terminator = false;
            }
            State::DcsPassthrough => {
                self.dcs_data.clear();
            }
            _ => {}
        }

        self.state = next;
    }

    /// Flushes any pending parameter accumulator, per the
    /// "flush-on-exit-from-a-param-collecting-state" rule, and returns the
    /// finished parameter list.
    fn finalize_params(&mut self) -> Params {
        if self.entered_param_state {
            self.route_pending_value();
        }
        self.entered_param_state = false;
        std::mem::take(&mut self.params)
    }

    fn route_pending_value(&mut self) {
        let value = self.current_subparam.take();
        if self.last_separator_was_colon {
            self.params.append_subparameter(value);
        } else {
            self.params.append_parameter(value);
        }
    }

    fn accept_param_byte(&mut self, c: u32) {
        self.entered_param_state = true;
        if is_digit(c) {
            let digit = c - 0x30;
            self.current_subparam = Some(self.current_subparam.unwrap_or(0).saturating_mul(10) + digit);
            return;
        }
        // c is ';' or ':'
        self.route_pending_value();
        self.last_separator_was_colon = c == 0x3A;
    }

    fn collect_intermediate(&mut self, c: u8) {
        if self.intermediates.len() < MAX_INTERMEDIATES {
            self.intermediates.push(c);
        } else {
            trace!("dropping intermediate byte={c:02x}, already at the {MAX_INTERMEDIATES}-byte cap");
        }
    }

    fn in_ground(&mut self, mode: Mode, c: u32) {
        if is_executable(c) {
            self.emit_execute(mode, c, false);
        } else if is_printable(c) {
            if let Some(ch) = char::from_u32(c) {
                self.events.push(ParserEvent::Print(ch));
            }
        }
    }

    fn in_escape(&mut self, mode: Mode, c: u32) {
        if is_executable(c) {
            self.emit_execute(mode, c, true);
            return;
        }
        match c {
            0x5B => self.transition_to(State::CsiEntry),
            0x50 => self.transition_to(State::DcsEntry),
            0x5D => self.transition_to(State::OscString),
            0x58 | 0x5E | 0x5F => self.transition_to(State::SosPmApcString),
            0x4F if mode == Mode::Input => self.transition_to(State::Ss3),
            _ if is_intermediate(c) => {
                self.collect_intermediate(c as u8);
                self.transition_to(State::EscapeIntermediate);
            }
            _ if is_escape_terminator(c) => {
                let intermediates = std::mem::take(&mut self.intermediates);
                self.transition_to(State::Ground);
                self.events.push(ParserEvent::Escape(intermediates, c as u8));
            }
            _ if mode == Mode::Input => {
                // Alt+key: an unclassified byte right after ESC.
                self.emit_execute(mode, c, true);
            }
            _ => {}
        }
    }

    fn in_escape_intermediate(&mut self, mode: Mode, c: u32) {
        if is_executable(c) {
            self.emit_execute(mode, c, false);
        } else if is_intermediate(c) {
            self.collect_intermediate(c as u8);
        } else if (0x30..=0x7E).contains(&c) {
            let intermediates = std::mem::take(&mut self.intermediates);
            self.transition_to(State::Ground);
            self.events.push(ParserEvent::Escape(intermediates, c as u8));
        }
    }

    fn in_csi_entry(&mut self, mode: Mode, c: u32) {
        if is_executable(c) {
            self.emit_execute(mode, c, false);
        } else if is_csi_terminator(c) {
            self.dispatch_csi(c);
        } else if is_param_byte(c) {
            self.accept_param_byte(c);
            self.transition_to(State::CsiParam);
        } else if is_private_marker(c) {
            self.collect_intermediate(c as u8);
            self.transition_to(State::CsiParam);
        } else if is_intermediate(c) {
            self.collect_intermediate(c as u8);
            self.transition_to(State::CsiIntermediate);
        }
    }

    fn in_csi_param(&mut self, mode: Mode, c: u32) {
        if is_executable(c) {
            self.emit_execute(mode, c, false);
        } else if is_csi_terminator(c) {
            self.dispatch_csi(c);
        } else if is_param_byte(c) {
            self.accept_param_byte(c);
        } else if is_private_marker(c) {
            self.transition_to(State::CsiIgnore);
        } else if is_intermediate(c) {
            self.collect_intermediate(c as u8);
            self.transition_to(State::CsiIntermediate);
        }
    }

    fn in_csi_intermediate(&mut self, mode: Mode, c: u32) {
        if is_executable(c) {
            self.emit_execute(mode, c, false);
        } else if is_csi_terminator(c) {
            self.dispatch_csi(c);
        } else if is_intermediate(c) {
            self.collect_intermediate(c as u8);
        } else if (0x30..=0x3F).contains(&c) {
            self.transition_to(State::CsiIgnore);
        }
    }

    fn in_csi_ignore(&mut self, mode: Mode, c: u32) {
        if is_executable(c) {
            self.emit_execute(mode, c, false);
        } else if is_csi_terminator(c) {
            self.transition_to(State::Ground);
        }
    }

    fn dispatch_csi(&mut self, terminator: u32) {
        let intermediates = std::mem::take(&mut self.intermediates);
        let params = self.finalize_params();
        self.transition_to(State::Ground);
        self.events.push(ParserEvent::Csi(intermediates, params, terminator as u8));
    }

    fn in_dcs_entry(&mut self, c: u32) {
        if is_executable(c) {
            // Ignored per the VT diagram; DCS entry control bytes carry no
            // useful information and are dropped.
        } else if is_param_byte(c) {
            self.accept_param_byte(c);
            self.transition_to(State::DcsParam);
        } else if is_private_marker(c) {
            self.collect_intermediate(c as u8);
            self.transition_to(State::DcsParam);
        } else if is_intermediate(c) {
            self.collect_intermediate(c as u8);
            self.transition_to(State::DcsIntermediate);
        } else if is_csi_terminator(c) {
            self.transition_to(State::DcsPassthrough);
        }
    }

    fn in_dcs_param(&mut self, c: u32) {
        if is_param_byte(c) {
            self.accept_param_byte(c);
        } else if is_private_marker(c) {
            self.transition_to(State::DcsIgnore);
        } else if is_intermediate(c) {
            self.collect_intermediate(c as u8);
            self.transition_to(State::DcsIntermediate);
        } else if is_csi_terminator(c) {
            self.transition_to(State::DcsPassthrough);
        }
    }

    fn in_dcs_intermediate(&mut self, c: u32) {
        if is_intermediate(c) {
            self.collect_intermediate(c as u8);
        } else if (0x30..=0x3F).contains(&c) {
            self.transition_to(State::DcsIgnore);
        } else if is_csi_terminator(c) {
            self.transition_to(State::DcsPassthrough);
        }
    }

    fn in_dcs_passthrough(&mut self, c: u32) {
        if c == 0x07 {
            self.transition_to(State::Ground);
            return;
        }
        if c == 0x7F {
            return;
        }
        if let Some(ch) = char::from_u32(c) {
            let mut buf = [0u8; 4];
            self.dcs_data.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
        }
    }

    fn in_dcs_ignore(&mut self, c: u32) {
        if c == 0x07 {
            self.transition_to(State::Ground);
        }
    }

    fn in_osc_string(&mut self, c: u32) {
        if c == 0x07 {
            self.saw_legacy_osc_terminator = true;
            self.transition_to(State::Ground);
        } else if c >= 0x20 {
            if let Some(ch) = char::from_u32(c) {
                let mut buf = [0u8; 4];
                self.osc_data.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
        }
    }

    fn in_sos_pm_apc_string(&mut self, c: u32) {
        if c == 0x07 {
            self.transition_to(State::Ground);
        }
    }

    fn in_ss3(&mut self, _mode: Mode, c: u32) {
        self.transition_to(State::Ground);
        self.events
            .push(ParserEvent::Csi(Vec::new(), Params::default(), c as u8));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csi(p: &mut EscapeSequenceParser, s: &str) -> Vec<ParserEvent> {
        p.parse_application(s)
    }

    #[test]
    fn prints_plain_text() {
        let mut p = EscapeSequenceParser::new();
        let events = csi(&mut p, "hi");
        assert_eq!(events, vec![ParserEvent::Print('h'), ParserEvent::Print('i')]);
    }

    #[test]
    fn empty_params_distinguish_from_omitted() {
        let mut p = EscapeSequenceParser::new();
        let events = p.parse_application("\x1b[;;5m");
        let Some(ParserEvent::Csi(_, params, term)) = events.into_iter().next() else {
            panic!("expected csi");
        };
        assert_eq!(term, b'm');
        assert_eq!(params.size(), 3);
        assert_eq!(params.get(0, 99), 99);
        assert_eq!(params.get(1, 99), 99);
        assert_eq!(params.get(2, 99), 5);
    }

    #[test]
    fn csi_with_no_params_is_empty() {
        let mut p = EscapeSequenceParser::new();
        let events = p.parse_application("\x1b[m");
        let Some(ParserEvent::Csi(_, params, term)) = events.into_iter().next() else {
            panic!("expected csi");
        };
        assert_eq!(term, b'm');
        assert!(params.is_empty());
    }

    #[test]
    fn csi_subparameters_colon() {
        let mut p = EscapeSequenceParser::new();
        let events = p.parse_application("\x1b[4:3m");
        let Some(ParserEvent::Csi(_, params, term)) = events.into_iter().next() else {
            panic!("expected csi");
        };
        assert_eq!(term, b'm');
        assert_eq!(params.size(), 1);
        assert_eq!(params.get(0, 0), 4);
        assert_eq!(params.get_subparam(0, 1, 0), 3);
    }

    #[test]
    fn dcs_hook_put_unhook_round_trip() {
        let mut p = EscapeSequenceParser::new();
        let events = p.parse_application("\x1bP$qm\x1b\\");
        assert_eq!(events.len(), 1);
        let ParserEvent::Dcs(intermediates, params, data) = &events[0] else {
            panic!("expected dcs");
        };
        assert_eq!(intermediates, b"$");
        assert!(params.is_empty());
        assert_eq!(data, b"m");
    }

    #[test]
    fn osc_bel_terminated() {
        let mut p = EscapeSequenceParser::new();
        let events = p.parse_application("\x1b]0;title\x07");
        assert_eq!(
            events,
            vec![ParserEvent::Osc(b"0;title".to_vec(), OscTerminator::Bel)]
        );
    }

    #[test]
    fn ss3_folds_into_csi_in_input_mode() {
        let mut p = EscapeSequenceParser::new();
        let events = p.parse_input("\x1bOA", false);
        assert_eq!(events, vec![ParserEvent::Csi(Vec::new(), Params::default(), b'A')]);
    }

    #[test]
    fn lone_escape_flushes_as_key_press() {
        let mut p = EscapeSequenceParser::new();
        let events = p.parse_input("\x1b", true);
        assert_eq!(events, vec![ParserEvent::Execute(0x1B, false)]);
    }

    #[test]
    fn escape_escape_is_two_key_presses() {
        let mut p = EscapeSequenceParser::new();
        let events = p.parse_input("\x1b\x1ba", false);
        assert_eq!(
            events,
            vec![
                ParserEvent::Execute(0x1B, false),
                ParserEvent::Execute('a' as u32, true),
            ]
        );
    }

    #[test]
    fn input_mode_control_char_then_escape_sequence_keeps_parsing_the_csi() {
        // Regression: a stale "last event was an Execute" check used to reset
        // the machine to Ground after the ESC and `[` had already advanced it
        // into CsiEntry, so the final byte printed instead of completing the
        // CSI. The reset must apply only to the code point that produced the
        // Execute, not linger into the following bytes.
        let mut p = EscapeSequenceParser::new();
        let events = p.parse_input("\x03\x1b[A", false);
        assert_eq!(
            events,
            vec![
                ParserEvent::Execute(0x03, false),
                ParserEvent::Csi(Vec::new(), Params::default(), b'A'),
            ]
        );
    }

    #[test]
    fn dcs_passthrough_terminates_on_bel() {
        let mut p = EscapeSequenceParser::new();
        let events = p.parse_application("\x1bP$qm\x07");
        assert_eq!(events.len(), 1);
        let ParserEvent::Dcs(intermediates, params, data) = &events[0] else {
            panic!("expected dcs");
        };
        assert_eq!(intermediates, b"$");
        assert!(params.is_empty());
        assert_eq!(data, b"m");
    }

    #[test]
    fn sos_pm_apc_string_terminates_on_bel() {
        // Nothing is emitted for this state's content, but the machine must
        // still leave it on the string terminator so a following sequence
        // parses rather than being swallowed as more APC data.
        let mut p = EscapeSequenceParser::new();
        let events = p.parse_application("\x1b_ignored\x07A");
        assert_eq!(events, vec![ParserEvent::Print('A')]);
    }

    #[test]
    fn nvim_startup_stream_yields_expected_event_count() {
        let mut p = EscapeSequenceParser::new();
        let input = "\x1b[?1049h\x1b[22;0;0t\x1b[?1h\x1b=\x1b[H\x1b[2J\x1b[?2004h\x1b[?2026$p\x1b[0m\x1b[4:3m\x1bP$qm\x1b\\\x1b[?u\x1b[c\x1b[?25h";
        let events = p.parse_application(input);
        assert_eq!(events.len(), 14);
        let ParserEvent::Csi(intermediates, params, term) = &events[0] else {
            panic!("expected csi");
        };
        assert_eq!(intermediates, b"?");
        assert_eq!(params.get(0, 0), 1049);
        assert_eq!(*term, b'h');

        let sub_param_csi = events
            .iter()
            .find(|e| matches!(e, ParserEvent::Csi(i, _, b'm') if i.is_empty()))
            .expect("expected the sub-parameter SGR event");
        if let ParserEvent::Csi(_, params, _) = sub_param_csi {
            assert_eq!(params.get(0, 0), 4);
            assert_eq!(params.get_subparam(0, 1, 0), 3);
        }

        assert!(events
            .iter()
            .any(|e| matches!(e, ParserEvent::Dcs(i, _, d) if i == b"$" && d == b"m")));
    }
}
