//! XML parser.
//!
//! A hand-rolled, single-pass tokenizer that builds a [`Document`] tree.
//! It accepts the configuration-file subset of XML: elements, attributes,
//! comments, CDATA sections and one processing-instruction header.
//! `<!DOCTYPE>`, `<!ENTITY>`, `<!NOTATION>` and `<!ATTLIST>` declarations
//! are skipped.
//!
//! Each element holds at most one text value: the text between its start
//! tag and the first child or end tag, with surrounding blanks trimmed.
//! Text that follows a child element is dropped.
//!
//! Conditions the parser can step over are recorded as diagnostics on the
//! document and logged through the `log` facade. Unterminated markup is a
//! hard error unless [`ParseOptions::recover`] is set.

pub(crate) mod input;
mod xml;

use crate::error::Result;
use crate::tree::Document;

/// Longest `encoding` name accepted from the document header, in bytes.
pub const MAX_ENCODING_NAME_LEN: usize = 64;

/// Parse options controlling parser behavior.
///
/// Use the builder pattern to configure options:
///
/// ```
/// use txml::parser::ParseOptions;
///
/// let opts = ParseOptions::default().recover(true);
/// assert!(opts.recover);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// If true, unterminated or unsupported markup ends the parse
    /// successfully with an error diagnostic instead of failing it. The
    /// tree built up to that point is kept.
    pub recover: bool,
}

impl ParseOptions {
    /// Enables or disables error recovery mode.
    #[must_use]
    pub fn recover(mut self, yes: bool) -> Self {
        self.recover = yes;
        self
    }
}

/// Parses an XML string with default options.
///
/// # Errors
///
/// Returns the first fatal [`XmlError`](crate::XmlError) hit while parsing.
pub fn parse_str(input: &str) -> Result<Document> {
    Document::parse_str(input)
}

/// Parses an XML string with the given options.
///
/// # Errors
///
/// Returns the first fatal [`XmlError`](crate::XmlError) hit while parsing.
pub fn parse_str_with_options(input: &str, options: &ParseOptions) -> Result<Document> {
    Document::parse_str_with_options(input, options)
}

/// Parses `input` into an existing document.
pub(crate) fn parse_into(doc: &mut Document, input: &str, options: &ParseOptions) -> Result<()> {
    xml::XmlParser::new(doc, input, options).parse()
}
