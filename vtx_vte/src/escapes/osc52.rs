//! OSC 52 clipboard get/set payloads.
//!
//! xterm's original spec names ten selection letters (`c p q s 0-7`); in
//! practice terminals only distinguish the system clipboard (`c`) from the
//! primary selection (`p`, with `s` an alias for it). The numbered buffers
//! are kept as purely local selections that are never forwarded to an outer
//! terminal.

use base64::Engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionType {
    Clipboard,
    Selection,
    Buffer0,
    Buffer1,
    Buffer2,
    Buffer3,
    Buffer4,
    Buffer5,
    Buffer6,
    Buffer7,
}

const SELECTION_MAPPING: [(SelectionType, char); 11] = [
    (SelectionType::Clipboard, 'c'),
    (SelectionType::Selection, 'p'),
    (SelectionType::Selection, 's'),
    (SelectionType::Buffer0, '0'),
    (SelectionType::Buffer1, '1'),
    (SelectionType::Buffer2, '2'),
    (SelectionType::Buffer3, '3'),
    (SelectionType::Buffer4, '4'),
    (SelectionType::Buffer5, '5'),
    (SelectionType::Buffer6, '6'),
    (SelectionType::Buffer7, '7'),
];

fn bit(t: SelectionType) -> u16 {
    1 << (t as u16)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Osc52 {
    pub selections: Vec<SelectionType>,
    pub data: Vec<u8>,
    pub query: bool,
}

impl Osc52 {
    /// Parses the payload that follows `OSC 52 ;` (i.e. the data bytes of
    /// the already-extracted `Osc` parser event, without the `52;` prefix).
    ///
    /// Returns `None` if the selection-letter field contains a character
    /// not in the known set. A malformed base64 payload is not a parse
    /// failure: xterm specifies that it clears the selection instead.
    pub fn parse(data: &[u8]) -> Option<Osc52> {
        let text = std::str::from_utf8(data).ok()?;
        let semicolon = text.find(';')?;
        let (selection_field, rest) = (&text[..semicolon], &text[semicolon + 1..]);

        let mut result = Osc52::default();
        let mut added: u16 = 0;
        for ch in selection_field.chars() {
            if let Some((t, _)) = SELECTION_MAPPING.iter().find(|(_, c)| *c == ch) {
                if added & bit(*t) == 0 {
                    result.selections.push(*t);
                    added |= bit(*t);
                }
            }
        }
        if result.selections.is_empty() {
            if !selection_field.is_empty() {
                return None;
            }
            result.selections.push(SelectionType::Clipboard);
        }

        if rest == "?" {
            result.query = true;
            return Some(result);
        }

        result.data = base64::engine::general_purpose::STANDARD
            .decode(rest)
            .unwrap_or_default();
        Some(result)
    }

    /// Serializes to the full `ESC ] 52 ; ... ESC \` sequence.
    pub fn serialize(&self) -> String {
        let selection: String = if self.selections.is_empty() {
            "c".to_string()
        } else {
            self.selections
                .iter()
                .map(|t| {
                    SELECTION_MAPPING
                        .iter()
                        .find(|(ty, _)| ty == t)
                        .map(|(_, c)| *c)
                        .unwrap_or('c')
                })
                .collect()
        };

        if self.query {
            return format!("\x1b]52;{selection};?\x1b\\");
        }
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.data);
        format!("\x1b]52;{selection};{encoded}\x1b\\")
    }
}
