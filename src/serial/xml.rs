//! XML serializer.
//!
//! Renders a [`Document`] back to markup. Output is built as UTF-8 and
//! transcoded to the document's output encoding at the end, so a failed
//! conversion never yields a partial buffer.

use crate::encoding::{
    bom, header_encoding_span, is_utf8, same_encoding, transcode, DEFAULT_ENCODING,
};
use crate::error::Result;
use crate::escape::{write_escaped, write_escaped_name, write_escaped_text};
use crate::tree::{Document, NodeId, NodeKind};

/// Options controlling serialization output.
///
/// # Examples
///
/// ```
/// use txml::Document;
/// use txml::serial::DumpOptions;
///
/// let doc = Document::parse_str("<root><child>Hello</child></root>").unwrap();
/// let out = doc.dump_with_options(&DumpOptions::default().indent("  ")).unwrap();
/// assert!(out.as_str().unwrap().contains("\n  <child>Hello</child>\n"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpOptions {
    /// The string written once per nesting level. Defaults to a tab.
    pub indent: String,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
        }
    }
}

impl DumpOptions {
    /// Sets the indentation string used for each nesting level.
    #[must_use]
    pub fn indent(mut self, s: &str) -> Self {
        self.indent = s.to_string();
        self
    }
}

/// A rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpOutput {
    /// The markup, in `encoding`.
    pub data: Vec<u8>,
    /// The charset of `data`.
    pub encoding: String,
}

impl DumpOutput {
    /// Returns the data as a string slice when it is UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        if is_utf8(&self.encoding) {
            std::str::from_utf8(&self.data).ok()
        } else {
            None
        }
    }

    /// Returns the length of the data in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the data is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Serializes a document in its output encoding.
///
/// # Errors
///
/// Returns [`XmlError::Encoding`](crate::XmlError::Encoding) if the output
/// charset is unknown or cannot represent the document text.
///
/// # Examples
///
/// ```
/// use txml::Document;
/// use txml::serial::dump;
///
/// let doc = Document::parse_str("<root><child>Hello</child></root>").unwrap();
/// let out = dump(&doc).unwrap();
/// assert_eq!(
///     out.as_str().unwrap(),
///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root>\n\t<child>Hello</child>\n</root>\n"
/// );
/// ```
pub fn dump(doc: &Document) -> Result<DumpOutput> {
    dump_with_options(doc, &DumpOptions::default())
}

/// Serializes a document with the given options.
///
/// UTF-16 output starts with a Byte Order Mark.
///
/// # Errors
///
/// Returns [`XmlError::Encoding`](crate::XmlError::Encoding) if transcoding
/// fails.
pub fn dump_with_options(doc: &Document, options: &DumpOptions) -> Result<DumpOutput> {
    let mut text = String::new();
    text.push_str("<?");
    text.push_str(&render_header(doc));
    text.push_str("?>\n");
    for &root in doc.roots() {
        write_branch(&mut text, doc, root, 0, &options.indent);
    }

    let data = if is_utf8(&doc.output_encoding) {
        text.into_bytes()
    } else {
        let body = transcode(text.as_bytes(), DEFAULT_ENCODING, &doc.output_encoding)?;
        let mark = bom(&doc.output_encoding);
        let mut data = Vec::with_capacity(mark.len() + body.len());
        data.extend_from_slice(mark);
        data.extend_from_slice(&body);
        data
    };
    Ok(DumpOutput {
        data,
        encoding: doc.output_encoding.clone(),
    })
}

/// Returns the header text (without `<?` and `?>`) the serializer emits.
///
/// A missing header is synthesized. When the output encoding differs from
/// the source encoding, the header's `encoding` attribute is rewritten, or
/// appended if it has none.
#[must_use]
pub fn render_header(doc: &Document) -> String {
    let output = &doc.output_encoding;
    let Some(header) = doc.header.as_deref() else {
        return format!("xml version=\"1.0\" encoding=\"{output}\"");
    };
    if same_encoding(&doc.source_encoding, output) {
        return header.to_string();
    }
    match header_encoding_span(header) {
        Some(span) => format!("{}{output}{}", &header[..span.start], &header[span.end..]),
        None => format!("{} encoding=\"{output}\"", header.trim_end()),
    }
}

/// Renders one node and its subtree, indented with tabs at `depth`.
///
/// # Examples
///
/// ```
/// use txml::Document;
///
/// let doc = Document::parse_str(r#"<a x="1"><b>v</b></a>"#).unwrap();
/// let b = doc.get_node("/a/b").unwrap();
/// assert_eq!(doc.dump_branch(b, 2), "\t\t<b>v</b>\n");
/// ```
#[must_use]
pub fn dump_branch(doc: &Document, id: NodeId, depth: usize) -> String {
    let mut out = String::new();
    write_branch(&mut out, doc, id, depth, "\t");
    out
}

fn write_indent(out: &mut String, indent: &str, depth: usize) {
    for _ in 0..depth {
        out.push_str(indent);
    }
}

fn write_branch(out: &mut String, doc: &Document, id: NodeId, depth: usize, indent: &str) {
    let node = doc.node(id);
    write_indent(out, indent, depth);

    match node.kind {
        NodeKind::Comment => {
            out.push_str("<!--");
            out.push_str(&node.value);
            out.push_str("-->\n");
        }
        NodeKind::CData => {
            out.push_str("<![CDATA[");
            out.push_str(&node.value);
            out.push_str("]]>\n");
        }
        NodeKind::Element => {
            out.push('<');
            write_escaped_name(out, &node.name);
            for attr in &node.attributes {
                out.push(' ');
                write_escaped_name(out, &attr.name);
                out.push_str("=\"");
                write_escaped(out, &attr.value);
                out.push('"');
            }

            if !node.children.is_empty() {
                out.push_str(">\n");
                if !node.value.is_empty() {
                    write_indent(out, indent, depth);
                    write_escaped_text(out, &node.value);
                    out.push('\n');
                }
                for &child in &node.children {
                    write_branch(out, doc, child, depth + 1, indent);
                }
                write_indent(out, indent, depth);
                out.push_str("</");
                write_escaped_name(out, &node.name);
                out.push_str(">\n");
            } else if !node.value.is_empty() {
                out.push('>');
                write_escaped_text(out, &node.value);
                out.push_str("</");
                write_escaped_name(out, &node.name);
                out.push_str(">\n");
            } else {
                out.push_str("/>\n");
            }
        }
    }
}
