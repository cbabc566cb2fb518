//! # txml
//!
//! A small XML document engine for configuration-style files. It parses a
//! buffer into an in-memory tree, lets callers query and edit the tree
//! through slash-separated paths, and writes it back out, optionally
//! re-encoded into another charset.
//!
//! It deliberately covers only a subset of XML: no namespaces, no DTD or
//! schema validation, and no external entities. Each element carries one
//! text value next to its attributes and children.
//!
//! ## Quick Start
//!
//! ```
//! use txml::Document;
//!
//! let mut doc = Document::parse_str(
//!     r#"<config><server name="primary"><port>8080</port></server></config>"#,
//! )
//! .unwrap();
//!
//! let port = doc.get_node("/config/server[@name='primary']/port").unwrap();
//! assert_eq!(doc.value(port), "8080");
//!
//! doc.set_value(port, "9090");
//! let out = doc.dump().unwrap();
//! assert!(out.as_str().unwrap().contains("<port>9090</port>"));
//! ```
//!
//! ## Modules
//!
//! - [`tree`]: the arena-backed [`Document`] and its node operations
//! - [`parser`]: the tokenizer that builds a document from text
//! - [`serial`]: the serializer that turns a document back into markup
//! - [`path`]: path resolution (`/root/child[2]`, `/root/child[@id='x']`)
//! - [`escape`]: entity escaping and unescaping
//! - [`encoding`]: charset detection and transcoding
//! - [`persist`]: locked file reads and backup-then-write saves
//! - [`error`]: error and diagnostic types

pub mod encoding;
pub mod error;
pub mod escape;
pub mod parser;
pub mod path;
pub mod persist;
pub mod serial;
pub mod tree;

// Re-export primary types at the crate root for convenience.
pub use error::{ErrorSeverity, ParseDiagnostic, Result, SourceLocation, XmlError};
pub use parser::ParseOptions;
pub use serial::{DumpOptions, DumpOutput};
pub use tree::{Attribute, Document, NodeId, NodeKind};
