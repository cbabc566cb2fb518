//! XML serialization.
//!
//! Turns a [`Document`](crate::Document) back into markup: one header line,
//! then every root branch with one indentation unit per nesting level.

pub mod xml;

pub use xml::{dump, dump_branch, dump_with_options, render_header, DumpOptions, DumpOutput};
