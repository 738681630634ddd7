//! Escape-sequence parsing core: the byte/code-point level state machines
//! and payload codecs shared by a terminal multiplexer's input and output
//! paths.
//!
//! [`parser::EscapeSequenceParser`] turns a stream of Unicode code points
//! into [`parser::ParserEvent`]s (print, control, CSI, DCS, OSC, escape).
//! [`param::Params`] is the parameter-list type those CSI/DCS events carry.
//! The [`escapes`] module holds parse/serialize codecs for the specific
//! payloads a terminal needs to understand: OSC 52 clipboard, OSC 7 cwd
//! reporting, CSI window-size reports, and SGR graphics rendition.

pub mod escapes;
pub mod feature;
pub mod param;
pub mod parser;

pub use feature::Feature;
pub use param::{Param, Params};
pub use parser::{EscapeSequenceParser, OscTerminator, ParserEvent};
