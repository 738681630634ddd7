//! Terminal input decoding: keyboard state (`Key`, `Mods`, `Action`,
//! `KeyEvent`) and the byte-stream parser that turns PTY input into
//! `KeyEvent`s, covering legacy, SS3, and Kitty-protocol encodings.

pub mod key;
pub mod parser;

pub use key::{Action, Key, KeyEvent, Mods};
pub use parser::TerminalInputParser;
