//! Decodes a stream of terminal input bytes (what a shell would receive on
//! stdin) into [`KeyEvent`]s: legacy single-byte sequences, `ESC`-prefixed
//! Alt combinations, SS3 application-cursor-key sequences, legacy `CSI ~`
//! functional keys, and the Kitty keyboard protocol's `CSI u` form.

use vtx_vte::param::Params;

use crate::key::{Action, Key, KeyEvent, Mods};

struct CodePointMapping {
    code_point: u32,
    key: Key,
    mods: Mods,
}

const fn m(code_point: u32, key: Key, mods: Mods) -> CodePointMapping {
    CodePointMapping { code_point, key, mods }
}

const LEGACY_CODE_POINT_MAPPINGS: &[CodePointMapping] = &[
    m(0x00, Key::Space, Mods::CONTROL),
    m(0x01, Key::A, Mods::CONTROL),
    m(0x02, Key::B, Mods::CONTROL),
    m(0x03, Key::C, Mods::CONTROL),
    m(0x04, Key::D, Mods::CONTROL),
    m(0x05, Key::E, Mods::CONTROL),
    m(0x06, Key::F, Mods::CONTROL),
    m(0x07, Key::G, Mods::CONTROL),
    m(0x08, Key::Backspace, Mods::CONTROL),
    m(0x09, Key::Tab, Mods::empty()),
    m(0x0a, Key::J, Mods::CONTROL),
    m(0x0b, Key::K, Mods::CONTROL),
    m(0x0c, Key::L, Mods::CONTROL),
    m(0x0d, Key::Enter, Mods::CONTROL),
    m(0x0e, Key::N, Mods::CONTROL),
    m(0x0f, Key::O, Mods::CONTROL),
    m(0x10, Key::P, Mods::CONTROL),
    m(0x11, Key::Q, Mods::CONTROL),
    m(0x12, Key::R, Mods::CONTROL),
    m(0x13, Key::S, Mods::CONTROL),
    m(0x14, Key::T, Mods::CONTROL),
    m(0x15, Key::U, Mods::CONTROL),
    m(0x16, Key::V, Mods::CONTROL),
    m(0x17, Key::W, Mods::CONTROL),
    m(0x18, Key::X, Mods::CONTROL),
    m(0x19, Key::Y, Mods::CONTROL),
    m(0x1a, Key::Z, Mods::CONTROL),
    m(0x1b, Key::Escape, Mods::empty()),
    m(0x1c, Key::Backslash, Mods::CONTROL),
    m(0x1d, Key::RightBracket, Mods::CONTROL),
    m(0x1e, Key::Six, Mods::CONTROL),
    m(0x1f, Key::Seven, Mods::CONTROL),
    m(b' ' as u32, Key::Space, Mods::empty()),
    m(b'!' as u32, Key::One, Mods::SHIFT),
    m(b'"' as u32, Key::Apostrophe, Mods::SHIFT),
    m(b'#' as u32, Key::Three, Mods::SHIFT),
    m(b'$' as u32, Key::Four, Mods::SHIFT),
    m(b'%' as u32, Key::Five, Mods::SHIFT),
    m(b'&' as u32, Key::Seven, Mods::SHIFT),
    m(b'\'' as u32, Key::Apostrophe, Mods::empty()),
    m(b'(' as u32, Key::Nine, Mods::SHIFT),
    m(b')' as u32, Key::Zero, Mods::SHIFT),
    m(b'*' as u32, Key::Eight, Mods::SHIFT),
    m(b'+' as u32, Key::Equal, Mods::SHIFT),
    m(b',' as u32, Key::Comma, Mods::empty()),
    m(b'-' as u32, Key::Minus, Mods::empty()),
    m(b'.' as u32, Key::Period, Mods::empty()),
    m(b'/' as u32, Key::Slash, Mods::empty()),
    m(b'0' as u32, Key::Zero, Mods::empty()),
    m(b'1' as u32, Key::One, Mods::empty()),
    m(b'2' as u32, Key::Two, Mods::empty()),
    m(b'3' as u32, Key::Three, Mods::empty()),
    m(b'4' as u32, Key::Four, Mods::empty()),
    m(b'5' as u32, Key::Five, Mods::empty()),
    m(b'6' as u32, Key::Six, Mods::empty()),
    m(b'7' as u32, Key::Seven, Mods::empty()),
    m(b'8' as u32, Key::Eight, Mods::empty()),
    m(b'9' as u32, Key::Nine, Mods::empty()),
    m(b':' as u32, Key::Semicolon, Mods::SHIFT),
    m(b';' as u32, Key::Semicolon, Mods::empty()),
    m(b'<' as u32, Key::Comma, Mods::SHIFT),
    m(b'=' as u32, Key::Equal, Mods::empty()),
    m(b'>' as u32, Key::Period, Mods::SHIFT),
    m(b'?' as u32, Key::Slash, Mods::SHIFT),
    m(b'@' as u32, Key::Two, Mods::SHIFT),
    m(b'A' as u32, Key::A, Mods::SHIFT),
    m(b'B' as u32, Key::B, Mods::SHIFT),
    m(b'C' as u32, Key::C, Mods::SHIFT),
    m(b'D' as u32, Key::D, Mods::SHIFT),
    m(b'E' as u32, Key::E, Mods::SHIFT),
    m(b'F' as u32, Key::F, Mods::SHIFT),
    m(b'G' as u32, Key::G, Mods::SHIFT),
    m(b'H' as u32, Key::H, Mods::SHIFT),
    m(b'I' as u32, Key::I, Mods::SHIFT),
    m(b'J' as u32, Key::J, Mods::SHIFT),
    m(b'K' as u32, Key::K, Mods::SHIFT),
    m(b'L' as u32, Key::L, Mods::SHIFT),
    m(b'M' as u32, Key::M, Mods::SHIFT),
    m(b'N' as u32, Key::N, Mods::SHIFT),
    m(b'O' as u32, Key::O, Mods::SHIFT),
    m(b'P' as u32, Key::P, Mods::SHIFT),
    m(b'Q' as u32, Key::Q, Mods::SHIFT),
    m(b'R' as u32, Key::R, Mods::SHIFT),
    m(b'S' as u32, Key::S, Mods::SHIFT),
    m(b'T' as u32, Key::T, Mods::SHIFT),
    m(b'U' as u32, Key::U, Mods::SHIFT),
    m(b'V' as u32, Key::V, Mods::SHIFT),
    m(b'W' as u32, Key::W, Mods::SHIFT),
    m(b'X' as u32, Key::X, Mods::SHIFT),
    m(b'Y' as u32, Key::Y, Mods::SHIFT),
    m(b'Z' as u32, Key::Z, Mods::SHIFT),
    m(b'[' as u32, Key::LeftBracket, Mods::empty()),
    m(b'\\' as u32, Key::Backslash, Mods::empty()),
    m(b']' as u32, Key::RightBracket, Mods::empty()),
    m(b'^' as u32, Key::Six, Mods::SHIFT),
    m(b'_' as u32, Key::Minus, Mods::SHIFT),
    m(b'`' as u32, Key::GraveAccent, Mods::empty()),
    m(b'a' as u32, Key::A, Mods::empty()),
    m(b'b' as u32, Key::B, Mods::empty()),
    m(b'c' as u32, Key::C, Mods::empty()),
    m(b'd' as u32, Key::D, Mods::empty()),
    m(b'e' as u32, Key::E, Mods::empty()),
    m(b'f' as u32, Key::F, Mods::empty()),
    m(b'g' as u32, Key::G, Mods::empty()),
    m(b'h' as u32, Key::H, Mods::empty()),
    m(b'i' as u32, Key::I, Mods::empty()),
    m(b'j' as u32, Key::J, Mods::empty()),
    m(b'k' as u32, Key::K, Mods::empty()),
    m(b'l' as u32, Key::L, Mods::empty()),
    m(b'm' as u32, Key::M, Mods::empty()),
    m(b'n' as u32, Key::N, Mods::empty()),
    m(b'o' as u32, Key::O, Mods::empty()),
    m(b'p' as u32, Key::P, Mods::empty()),
    m(b'q' as u32, Key::Q, Mods::empty()),
    m(b'r' as u32, Key::R, Mods::empty()),
    m(b's' as u32, Key::S, Mods::empty()),
    m(b't' as u32, Key::T, Mods::empty()),
    m(b'u' as u32, Key::U, Mods::empty()),
    m(b'v' as u32, Key::V, Mods::empty()),
    m(b'w' as u32, Key::W, Mods::empty()),
    m(b'x' as u32, Key::X, Mods::empty()),
    m(b'y' as u32, Key::Y, Mods::empty()),
    m(b'z' as u32, Key::Z, Mods::empty()),
    m(b'{' as u32, Key::LeftBracket, Mods::SHIFT),
    m(b'|' as u32, Key::Backslash, Mods::SHIFT),
    m(b'}' as u32, Key::RightBracket, Mods::SHIFT),
    m(b'~' as u32, Key::GraveAccent, Mods::SHIFT),
    m(0x7f, Key::Backspace, Mods::empty()),
];

const SS3_MAPPINGS: &[CodePointMapping] = &[
    m(b'A' as u32, Key::Up, Mods::empty()),
    m(b'B' as u32, Key::Down, Mods::empty()),
    m(b'C' as u32, Key::Right, Mods::empty()),
    m(b'D' as u32, Key::Left, Mods::empty()),
    m(b'E' as u32, Key::KPBegin, Mods::empty()),
    m(b'H' as u32, Key::Home, Mods::empty()),
    m(b'F' as u32, Key::End, Mods::empty()),
    m(b'P' as u32, Key::F1, Mods::empty()),
    m(b'Q' as u32, Key::F2, Mods::empty()),
    m(b'R' as u32, Key::F3, Mods::empty()),
    m(b'S' as u32, Key::F4, Mods::empty()),
];

const LEGACY_FUNCTIONAL_KEY_MAPPINGS: &[CodePointMapping] = &[
    m(2, Key::Insert, Mods::empty()),
    m(3, Key::Delete, Mods::empty()),
    m(5, Key::PageUp, Mods::empty()),
    m(6, Key::PageDown, Mods::empty()),
    m(7, Key::Home, Mods::empty()),
    m(8, Key::End, Mods::empty()),
    m(11, Key::F1, Mods::empty()),
    m(12, Key::F2, Mods::empty()),
    m(13, Key::F3, Mods::empty()),
    m(14, Key::F4, Mods::empty()),
    m(15, Key::F5, Mods::empty()),
    m(17, Key::F6, Mods::empty()),
    m(18, Key::F7, Mods::empty()),
    m(19, Key::F8, Mods::empty()),
    m(20, Key::F9, Mods::empty()),
    m(21, Key::F10, Mods::empty()),
    m(23, Key::F11, Mods::empty()),
    m(24, Key::F12, Mods::empty()),
    m(29, Key::Menu, Mods::empty()),
];

const CODE_POINT_KEY_MAPPINGS: &[CodePointMapping] = &[
    m(9, Key::Tab, Mods::empty()),
    m(13, Key::Enter, Mods::empty()),
    m(27, Key::Escape, Mods::empty()),
    m(b' ' as u32, Key::Space, Mods::empty()),
    m(b'\'' as u32, Key::Apostrophe, Mods::empty()),
    m(b',' as u32, Key::Comma, Mods::empty()),
    m(b'-' as u32, Key::Minus, Mods::empty()),
    m(b'.' as u32, Key::Period, Mods::empty()),
    m(b'/' as u32, Key::Slash, Mods::empty()),
    m(b'0' as u32, Key::Zero, Mods::empty()),
    m(b'1' as u32, Key::One, Mods::empty()),
    m(b'2' as u32, Key::Two, Mods::empty()),
    m(b'3' as u32, Key::Three, Mods::empty()),
    m(b'4' as u32, Key::Four, Mods::empty()),
    m(b'5' as u32, Key::Five, Mods::empty()),
    m(b'6' as u32, Key::Six, Mods::empty()),
    m(b'7' as u32, Key::Seven, Mods::empty()),
    m(b'8' as u32, Key::Eight, Mods::empty()),
    m(b'9' as u32, Key::Nine, Mods::empty()),
    m(b';' as u32, Key::Semicolon, Mods::empty()),
    m(b'=' as u32, Key::Equal, Mods::empty()),
    m(b'[' as u32, Key::LeftBracket, Mods::empty()),
    m(b'\\' as u32, Key::Backslash, Mods::empty()),
    m(b']' as u32, Key::RightBracket, Mods::empty()),
    m(b'`' as u32, Key::GraveAccent, Mods::empty()),
    m(b'a' as u32, Key::A, Mods::empty()),
    m(b'b' as u32, Key::B, Mods::empty()),
    m(b'c' as u32, Key::C, Mods::empty()),
    m(b'd' as u32, Key::D, Mods::empty()),
    m(b'e' as u32, Key::E, Mods::empty()),
    m(b'f' as u32, Key::F, Mods::empty()),
    m(b'g' as u32, Key::G, Mods::empty()),
    m(b'h' as u32, Key::H, Mods::empty()),
    m(b'i' as u32, Key::I, Mods::empty()),
    m(b'j' as u32, Key::J, Mods::empty()),
    m(b'k' as u32, Key::K, Mods::empty()),
    m(b'l' as u32, Key::L, Mods::empty()),
    m(b'm' as u32, Key::M, Mods::empty()),
    m(b'n' as u32, Key::N, Mods::empty()),
    m(b'o' as u32, Key::O, Mods::empty()),
    m(b'p' as u32, Key::P, Mods::empty()),
    m(b'q' as u32, Key::Q, Mods::empty()),
    m(b'r' as u32, Key::R, Mods::empty()),
    m(b's' as u32, Key::S, Mods::empty()),
    m(b't' as u32, Key::T, Mods::empty()),
    m(b'u' as u32, Key::U, Mods::empty()),
    m(b'v' as u32, Key::V, Mods::empty()),
    m(b'w' as u32, Key::W, Mods::empty()),
    m(b'x' as u32, Key::X, Mods::empty()),
    m(b'y' as u32, Key::Y, Mods::empty()),
    m(b'z' as u32, Key::Z, Mods::empty()),
    m(127, Key::Backspace, Mods::empty()),
    m(57358, Key::CapsLock, Mods::empty()),
    m(57359, Key::ScrollLock, Mods::empty()),
    m(57360, Key::NumLock, Mods::empty()),
    m(57361, Key::PrintScreen, Mods::empty()),
    m(57362, Key::Pause, Mods::empty()),
    m(57363, Key::Menu, Mods::empty()),
    m(57376, Key::F13, Mods::empty()),
    m(57377, Key::F14, Mods::empty()),
    m(57378, Key::F15, Mods::empty()),
    m(57379, Key::F16, Mods::empty()),
    m(57380, Key::F17, Mods::empty()),
    m(57381, Key::F18, Mods::empty()),
    m(57382, Key::F19, Mods::empty()),
    m(57383, Key::F20, Mods::empty()),
    m(57384, Key::F21, Mods::empty()),
    m(57385, Key::F22, Mods::empty()),
    m(57386, Key::F23, Mods::empty()),
    m(57387, Key::F24, Mods::empty()),
    m(57388, Key::F25, Mods::empty()),
    m(57389, Key::F26, Mods::empty()),
    m(57390, Key::F27, Mods::empty()),
    m(57391, Key::F28, Mods::empty()),
    m(57392, Key::F29, Mods::empty()),
    m(57393, Key::F30, Mods::empty()),
    m(57394, Key::F31, Mods::empty()),
    m(57395, Key::F32, Mods::empty()),
    m(57396, Key::F33, Mods::empty()),
    m(57397, Key::F34, Mods::empty()),
    m(57399, Key::KP0, Mods::empty()),
    m(57400, Key::KP1, Mods::empty()),
    m(57401, Key::KP2, Mods::empty()),
    m(57402, Key::KP3, Mods::empty()),
    m(57403, Key::KP4, Mods::empty()),
    m(57404, Key::KP5, Mods::empty()),
    m(57405, Key::KP6, Mods::empty()),
    m(57406, Key::KP7, Mods::empty()),
    m(57407, Key::KP8, Mods::empty()),
    m(57408, Key::KP9, Mods::empty()),
    m(57409, Key::KPDecimal, Mods::empty()),
    m(57410, Key::KPDivide, Mods::empty()),
    m(57411, Key::KPMultiply, Mods::empty()),
    m(57412, Key::KPSubtract, Mods::empty()),
    m(57413, Key::KPAdd, Mods::empty()),
    m(57414, Key::KPEnter, Mods::empty()),
    m(57415, Key::KPEqual, Mods::empty()),
    m(57416, Key::KPSeparator, Mods::empty()),
    m(57417, Key::KPLeft, Mods::empty()),
    m(57418, Key::KPRight, Mods::empty()),
    m(57419, Key::KPUp, Mods::empty()),
    m(57420, Key::KPDown, Mods::empty()),
    m(57421, Key::KPPageUp, Mods::empty()),
    m(57422, Key::KPPageDown, Mods::empty()),
    m(57423, Key::KPHome, Mods::empty()),
    m(57424, Key::KPEnd, Mods::empty()),
    m(57425, Key::KPInsert, Mods::empty()),
    m(57426, Key::KPDelete, Mods::empty()),
    m(57427, Key::KPBegin, Mods::empty()),
    m(57428, Key::MediaPlay, Mods::empty()),
    m(57429, Key::MediaPause, Mods::empty()),
    m(57430, Key::MediaPlayPause, Mods::empty()),
    m(57431, Key::MediaReverse, Mods::empty()),
    m(57432, Key::MediaStop, Mods::empty()),
    m(57433, Key::MediaFastForward, Mods::empty()),
    m(57434, Key::MediaRewind, Mods::empty()),
    m(57435, Key::MediaTrackNext, Mods::empty()),
    m(57436, Key::MediaTrackPrevious, Mods::empty()),
    m(57437, Key::MediaRecord, Mods::empty()),
    m(57438, Key::LowerVolume, Mods::empty()),
    m(57439, Key::RaiseVolume, Mods::empty()),
    m(57440, Key::MuteVolume, Mods::empty()),
    m(57441, Key::LeftShift, Mods::empty()),
    m(57442, Key::LeftControl, Mods::empty()),
    m(57443, Key::LeftAlt, Mods::empty()),
    m(57444, Key::LeftSuper, Mods::empty()),
    m(57445, Key::LeftHyper, Mods::empty()),
    m(57446, Key::LeftMeta, Mods::empty()),
    m(57447, Key::RightShift, Mods::empty()),
    m(57448, Key::RightControl, Mods::empty()),
    m(57449, Key::RightAlt, Mods::empty()),
    m(57450, Key::RightSuper, Mods::empty()),
    m(57451, Key::RightHyper, Mods::empty()),
    m(57452, Key::RightMeta, Mods::empty()),
    m(57453, Key::IsoLevel3Shift, Mods::empty()),
    m(57454, Key::IsoLevel5Shift, Mods::empty()),
];

fn key_event_from_legacy_code_point(code_point: u32, base_mods: Mods) -> KeyEvent {
    if let Some(mapping) = LEGACY_CODE_POINT_MAPPINGS.iter().find(|m| m.code_point == code_point) {
        let text = if (32..127).contains(&code_point) {
            char::from_u32(code_point).map(String::from).unwrap_or_default()
        } else {
            String::new()
        };
        return KeyEvent::key_down(mapping.key, text, mapping.mods | base_mods);
    }

    let text = char::from_u32(code_point).map(String::from).unwrap_or_default();
    KeyEvent::key_down(Key::Invalid, text, base_mods)
}

fn key_event_from_ss3_code_point(code_point: u32, base_mods: Mods) -> Option<KeyEvent> {
    SS3_MAPPINGS
        .iter()
        .find(|m| m.code_point == code_point)
        .map(|mapping| KeyEvent::key_down(mapping.key, "", base_mods | mapping.mods))
}

fn key_event_from_legacy_functional_key(number: u32, base_mods: Mods) -> Option<KeyEvent> {
    LEGACY_FUNCTIONAL_KEY_MAPPINGS
        .iter()
        .find(|m| m.code_point == number)
        .map(|mapping| KeyEvent::key_down(mapping.key, "", base_mods | mapping.mods))
}

fn key_event_from_code_point(number: u32, base_mods: Mods, text: String, action: Action) -> Option<KeyEvent> {
    CODE_POINT_KEY_MAPPINGS.iter().find(|m| m.code_point == number).map(|mapping| KeyEvent {
        action,
        key: mapping.key,
        mods: base_mods | mapping.mods,
        text,
    })
}

fn decode_action(value: u32) -> Action {
    match value {
        2 => Action::Repeat,
        3 => Action::Release,
        _ => Action::Press,
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum State {
    #[default]
    Base,
    Escape,
    Csi,
    Ss3,
}

/// Stream decoder turning raw terminal input bytes into [`KeyEvent`]s.
///
/// Feed it one `parse` call per chunk of input received from the PTY; it
/// accumulates events internally and hands back everything decoded so far.
#[derive(Debug, Default)]
pub struct TerminalInputParser {
    state: State,
    accumulator: String,
    pending_events: Vec<KeyEvent>,
}

impl TerminalInputParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `input` and returns every [`KeyEvent`] produced, including
    /// any left over from a previous call that only completed once this
    /// call's bytes arrived.
    pub fn parse(&mut self, input: &str) -> Vec<KeyEvent> {
        for code_point in input.chars() {
            self.handle_code_point(code_point);
        }

        // A lone trailing Escape with nothing after it is assumed to be the
        // Escape key itself, not a partially-transmitted sequence.
        if self.state == State::Escape {
            self.emit(KeyEvent::key_down(Key::Escape, "", Mods::empty()));
            self.state = State::Base;
        }

        std::mem::take(&mut self.pending_events)
    }

    fn emit(&mut self, event: KeyEvent) {
        self.pending_events.push(event);
    }

    fn handle_code_point(&mut self, input: char) {
        match self.state {
            State::Base => self.handle_base(input),
            State::Escape => self.handle_escape(input),
            State::Csi => self.handle_csi(input),
            State::Ss3 => self.handle_ss3(input),
        }
    }

    fn handle_base(&mut self, input: char) {
        self.accumulator.clear();

        if input == '\u{1b}' {
            self.state = State::Escape;
            return;
        }

        let event = key_event_from_legacy_code_point(input as u32, Mods::empty());
        self.emit(event);
    }

    fn handle_escape(&mut self, input: char) {
        match input {
            '[' => self.state = State::Csi,
            'O' => self.state = State::Ss3,
            _ => {
                let event = key_event_from_legacy_code_point(input as u32, Mods::ALT);
                self.emit(event);
                self.state = State::Base;
            }
        }
    }

    fn handle_csi(&mut self, input: char) {
        if input == ';' || input == ':' || input.is_ascii_digit() {
            self.accumulator.push(input);
            return;
        }

        let params = Params::from_str(&self.accumulator);

        let code_point = params.get(0, 1);
        let mods = if params.size() >= 2 {
            Mods::from_bits_truncate(params.get(1, 1).saturating_sub(1) as u8)
        } else {
            Mods::empty()
        };

        match input {
            'u' => {
                let action = if params.size() >= 2 {
                    decode_action(params.get_subparam(1, 1, Action::Press as u32))
                } else {
                    Action::Press
                };

                let mut text = String::new();
                if params.size() >= 3 && params.get_subparam(2, 0, 0) != 0 {
                    for sub in params.subparams(2) {
                        if let Some(code) = sub {
                            if let Some(ch) = char::from_u32(*code) {
                                text.push(ch);
                            }
                        }
                    }
                }

                if let Some(event) = key_event_from_code_point(code_point, mods, text, action) {
                    self.emit(event);
                }
            }
            '~' => {
                if let Some(event) = key_event_from_legacy_functional_key(code_point, mods) {
                    self.emit(event);
                }
            }
            other => {
                if let Some(event) = key_event_from_ss3_code_point(other as u32, mods) {
                    self.emit(event);
                }
            }
        }

        self.state = State::Base;
    }

    fn handle_ss3(&mut self, input: char) {
        if let Some(event) = key_event_from_ss3_code_point(input as u32, Mods::empty()) {
            self.emit(event);
        }
        self.state = State::Base;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_letter_produces_text_event() {
        let mut parser = TerminalInputParser::new();
        let events = parser.parse("a");
        assert_eq!(events, vec![KeyEvent::key_down(Key::A, "a", Mods::empty())]);
    }

    #[test]
    fn control_c_decodes_as_ctrl_c() {
        let mut parser = TerminalInputParser::new();
        let events = parser.parse("\u{3}");
        assert_eq!(events, vec![KeyEvent::key_down(Key::C, "", Mods::CONTROL)]);
    }

    #[test]
    fn alt_plus_letter_via_escape() {
        let mut parser = TerminalInputParser::new();
        let events = parser.parse("\u{1b}a");
        assert_eq!(events, vec![KeyEvent::key_down(Key::A, "a", Mods::ALT)]);
    }

    #[test]
    fn trailing_lone_escape_is_escape_key() {
        let mut parser = TerminalInputParser::new();
        let events = parser.parse("\u{1b}");
        assert_eq!(events, vec![KeyEvent::key_down(Key::Escape, "", Mods::empty())]);
    }

    #[test]
    fn ss3_up_arrow() {
        let mut parser = TerminalInputParser::new();
        let events = parser.parse("\u{1b}OA");
        assert_eq!(events, vec![KeyEvent::key_down(Key::Up, "", Mods::empty())]);
    }

    #[test]
    fn csi_legacy_functional_delete_with_shift() {
        let mut parser = TerminalInputParser::new();
        // CSI 3;2~ = Delete with Shift (modifiers encoded as value+1).
        let events = parser.parse("\u{1b}[3;2~");
        assert_eq!(events, vec![KeyEvent::key_down(Key::Delete, "", Mods::SHIFT)]);
    }

    #[test]
    fn csi_kitty_u_with_text_and_repeat() {
        let mut parser = TerminalInputParser::new();
        // CSI 97;1:2;97u = 'a', no modifiers, Repeat, text "a".
        let events = parser.parse("\u{1b}[97;1:2;97u");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].key, Key::A);
        assert_eq!(events[0].action, Action::Repeat);
        assert_eq!(events[0].text, "a");
    }

    #[test]
    fn csi_unterminated_falls_back_to_ss3_table_on_terminator() {
        let mut parser = TerminalInputParser::new();
        // CSI P with no params is the SS3-style F1 on some terminals'
        // cursor-key-mode CSI encodings.
        let events = parser.parse("\u{1b}[P");
        assert_eq!(events, vec![KeyEvent::key_down(Key::F1, "", Mods::empty())]);
    }
}
