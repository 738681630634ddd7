//! Parse/serialize codecs for the fixed set of escape payloads the core
//! understands: OSC 52 (clipboard), OSC 7 (current working directory),
//! CSI window-size reports, and SGR (graphics rendition).
//!
//! Every codec in this module implements the same shape: a `parse` that
//! returns `Option<Self>` from already-extracted payload bytes (the `Osc`
//! or `Csi` event's data, without the escape envelope) and a `serialize`
//! that produces the full wire bytes, envelope included.

pub mod osc52;
pub mod osc7;
pub mod sgr;
pub mod size_report;
