//! Core library for a terminal multiplexer: escape-sequence parsing,
//! terminal input decoding, clipboard coordination, and reflow mapping.
//!
//! This crate is a thin facade over three focused crates:
//!
//! - [`vtx_vte`] — the escape-sequence state machine, parameter lists, the
//!   `Feature` bitmask, and the OSC 52 / OSC 7 / size-report / SGR codecs.
//! - [`vtx_input`] — keyboard state (`Key`, `Mods`, `Action`, `KeyEvent`)
//!   and the terminal input byte-stream parser.
//! - [`vtx_term`] — the clipboard coordinator and reflow map, built on top
//!   of the other two.
//!
//! Pick whichever crate matches the layer you're working at, or depend on
//! `vtx` for all three re-exported from one place.
//!
//! # Examples
//!
//! The core logs malformed-input drops at `trace`/`debug` rather than
//! surfacing them to the caller (see each crate's error-handling notes);
//! wiring up `env_logger` in a host application makes those visible:
//!
//! ```no_run
//! env_logger::init();
//!
//! let mut parser = vtx::EscapeSequenceParser::new();
//! for event in parser.parse_application("\x1b[1mbold\x1b[0m") {
//!     println!("{event:?}");
//! }
//! ```

pub use vtx_input;
pub use vtx_term;
pub use vtx_vte;

pub use vtx_input::{Action, Key, KeyEvent, Mods, TerminalInputParser};
pub use vtx_term::{AbsolutePosition, Clipboard, ClipboardMode, Identifier, Reply, ReflowMap};
pub use vtx_vte::{EscapeSequenceParser, Feature, Param, Params, ParserEvent};
