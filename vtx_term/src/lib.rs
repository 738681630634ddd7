//! Terminal-facing coordination logic built on top of the escape-sequence
//! core: clipboard policy across local cache and OSC 52 pass-through, and
//! the piecewise coordinate remapping produced by screen reflows.

pub mod clipboard;
pub mod reflow;

pub use clipboard::{Clipboard, ClipboardMode, Identifier, Reply};
pub use reflow::{AbsolutePosition, ReflowMap};
