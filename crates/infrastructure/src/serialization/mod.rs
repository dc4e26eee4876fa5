//! JSON encoding for the files kept in the data directory.
//!
//! Output is pretty-printed with 2-space indentation and a trailing newline,
//! so the files stay readable when inspected by hand.

mod json;

pub use json::*;
