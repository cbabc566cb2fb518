//! Core XML parser state machine.
//!
//! A single forward pass over the input. Blanks are skipped before every
//! token; each `<` dispatches on the construct that follows it, and any
//! other text is either taken as the open element's value or dropped,
//! depending on the current [`State`].

use crate::error::{ErrorSeverity, Result, SourceLocation, XmlError};
use crate::encoding::header_encoding;
use crate::escape::{unescape, InvalidEscape};
use crate::tree::{Attribute, Document, NodeId, NodeKind};

use super::input::{is_blank, ParserInput};
use super::{ParseOptions, MAX_ENCODING_NAME_LEN};

/// What the parser saw last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing yet.
    None,
    /// A start tag; text that follows becomes the element's value.
    TagOpen,
    /// The open element already received its value.
    TagValue,
    /// An end tag.
    TagClose,
    /// A self-closing tag.
    SelfClosing,
}

/// The tree-building parser. Appends to an existing [`Document`].
pub(crate) struct XmlParser<'a, 'd> {
    /// Cursor over the input text.
    input: ParserInput<'a>,
    /// The document being built.
    doc: &'d mut Document,
    /// Parser options.
    options: ParseOptions,
    state: State,
    /// The element that text and new nodes attach to.
    open: Option<NodeId>,
}

impl<'a, 'd> XmlParser<'a, 'd> {
    pub fn new(doc: &'d mut Document, input: &'a str, options: &ParseOptions) -> Self {
        Self {
            input: ParserInput::new(input),
            doc,
            options: *options,
            state: State::None,
            open: None,
        }
    }

    /// Parses the whole input. Diagnostics are moved to the document on
    /// success and on failure alike.
    pub fn parse(mut self) -> Result<()> {
        let result = self.run();
        self.doc.diagnostics.append(&mut self.input.diagnostics);
        if let (Ok(()), Some(open)) = (&result, self.open) {
            log::debug!("input ended with element '{}' still open", self.doc.name(open));
        }
        result
    }

    fn run(&mut self) -> Result<()> {
        loop {
            self.input.skip_whitespace();
            if self.input.at_end() {
                return Ok(());
            }
            let step = if self.input.peek() == Some(b'<') {
                self.parse_markup()
            } else {
                self.parse_text()
            };
            match step {
                Err(XmlError::MalformedMarkup { message, location }) if self.options.recover => {
                    self.input
                        .push_diagnostic(ErrorSeverity::Error, message, location);
                    self.input.skip_to_end();
                    return Ok(());
                }
                other => other?,
            }
        }
    }

    fn parse_markup(&mut self) -> Result<()> {
        let start = self.input.location();
        if self.input.eat(b"</") {
            self.parse_end_tag(start)
        } else if self.input.eat(b"<!--") {
            self.parse_comment(start)
        } else if self.input.eat(b"<![") {
            self.parse_cdata(start)
        } else if self.input.eat(b"<!") {
            self.skip_declaration(start)
        } else if self.input.eat(b"<?") {
            self.parse_processing_instruction(start)
        } else {
            self.input.advance(1);
            self.parse_start_tag(start)
        }
    }

    // --- Tags ---

    fn parse_start_tag(&mut self, start: SourceLocation) -> Result<()> {
        let name_location = self.input.location();
        let raw_name = self
            .input
            .take_while(|b| !is_blank(b) && b != b'>' && b != b'/');
        if self.input.at_end() {
            return Err(ParserInput::malformed("unterminated start tag", start));
        }
        if raw_name.is_empty() {
            return Err(XmlError::BadArguments(format!(
                "empty element name at {start}"
            )));
        }
        let name = unescape(raw_name).map_err(|e| invalid_characters(name_location, e))?;

        let mut attributes = Vec::new();
        let self_closing = loop {
            self.input.skip_whitespace();
            match self.input.peek() {
                None => return Err(ParserInput::malformed("unterminated start tag", start)),
                Some(b'>') => {
                    self.input.advance(1);
                    break false;
                }
                Some(b'/') => {
                    if self.input.eat(b"/>") {
                        break true;
                    }
                    self.input.warn("stray '/' in start tag");
                    self.input.advance(1);
                }
                Some(_) => {
                    if let Some(attribute) = self.parse_attribute(start)? {
                        attributes.push(attribute);
                    }
                }
            }
        };

        let id = self.doc.create_node(&name, None, self.open)?;
        if self.open.is_none() {
            if let Err(e) = self.doc.add_root(id) {
                self.doc.destroy_node(id);
                return Err(e);
            }
        }
        for attribute in &attributes {
            self.doc
                .add_attribute(id, &attribute.name, Some(&attribute.value))?;
        }

        if self_closing {
            self.state = State::SelfClosing;
        } else {
            self.open = Some(id);
            self.state = State::TagOpen;
        }
        Ok(())
    }

    /// Parses one `name="value"` pair. Returns `None` when the attribute is
    /// malformed and was skipped.
    fn parse_attribute(&mut self, tag_start: SourceLocation) -> Result<Option<Attribute>> {
        let location = self.input.location();
        let raw_name = self
            .input
            .take_while(|b| !is_blank(b) && !matches!(b, b'=' | b'>' | b'/'));
        if raw_name.is_empty() {
            self.input.warn("attribute without a name; skipped");
            self.input.advance(1);
            return Ok(None);
        }

        self.input.skip_whitespace();
        if !self.input.eat(b"=") {
            self.input.push_diagnostic(
                ErrorSeverity::Warning,
                format!("attribute '{raw_name}' has no value; skipped"),
                location,
            );
            return Ok(None);
        }

        self.input.skip_whitespace();
        let quote = match self.input.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            None => return Err(ParserInput::malformed("unterminated start tag", tag_start)),
            Some(_) => {
                self.input
                    .take_while(|b| !is_blank(b) && b != b'>' && b != b'/');
                self.input.push_diagnostic(
                    ErrorSeverity::Warning,
                    format!("value of attribute '{raw_name}' is not quoted; skipped"),
                    location,
                );
                return Ok(None);
            }
        };

        let value_location = self.input.location();
        self.input.advance(1);
        let raw_value = self.input.take_quoted(quote).ok_or_else(|| {
            ParserInput::malformed("unterminated attribute value", value_location)
        })?;

        let name = unescape(raw_name).map_err(|e| invalid_characters(location, e))?;
        let value = unescape(&raw_value).map_err(|e| invalid_characters(value_location, e))?;
        Ok(Some(Attribute::new(name, value)))
    }

    fn parse_end_tag(&mut self, start: SourceLocation) -> Result<()> {
        let Some(raw) = self.input.take_until(">") else {
            return Err(ParserInput::malformed("unterminated end tag", start));
        };
        let Some(open) = self.open else {
            return Err(XmlError::UnbalancedTag { location: start });
        };

        let name = raw.trim_matches(|c: char| c.is_ascii() && is_blank(c as u8));
        let matches = unescape(name).is_ok_and(|n| n == self.doc.name(open));
        if !matches {
            let message = format!(
                "end tag '{name}' does not match open element '{}'",
                self.doc.name(open)
            );
            self.input
                .push_diagnostic(ErrorSeverity::Warning, message, start);
        }

        self.open = self.doc.parent(open);
        self.state = State::TagClose;
        Ok(())
    }

    // --- Text ---

    fn parse_text(&mut self) -> Result<()> {
        let location = self.input.location();
        let Some(raw) = self.input.take_text() else {
            log::debug!("{location}: dropping trailing text");
            self.input.skip_to_end();
            return Ok(());
        };
        let text = raw.trim_end_matches(|c: char| c.is_ascii() && is_blank(c as u8));

        match (self.state, self.open) {
            (State::TagOpen, Some(open)) => {
                let value = unescape(text).map_err(|e| invalid_characters(location, e))?;
                self.doc.set_value(open, &value);
                self.state = State::TagValue;
            }
            (_, None) => {
                self.input.push_diagnostic(
                    ErrorSeverity::Warning,
                    "text outside of any element; dropped".to_string(),
                    location,
                );
            }
            (state, Some(_)) => {
                log::debug!("{location}: dropping text in state {state:?}");
            }
        }
        Ok(())
    }

    // --- Comments, CDATA, declarations ---

    fn parse_comment(&mut self, start: SourceLocation) -> Result<()> {
        let text = self
            .input
            .take_until("-->")
            .ok_or_else(|| ParserInput::malformed("unterminated comment", start))?;
        self.add_special(NodeKind::Comment, text)
    }

    fn parse_cdata(&mut self, start: SourceLocation) -> Result<()> {
        self.input.skip_whitespace();
        let is_cdata = self.input.eat(b"CDATA") && {
            self.input.skip_whitespace();
            self.input.eat(b"[")
        };
        if !is_cdata {
            return Err(ParserInput::malformed("unsupported '<![' markup", start));
        }
        let text = self
            .input
            .take_until("]]>")
            .ok_or_else(|| ParserInput::malformed("unterminated CDATA section", start))?;
        self.add_special(NodeKind::CData, text)
    }

    fn add_special(&mut self, kind: NodeKind, text: &str) -> Result<()> {
        let id = match kind {
            NodeKind::CData => self.doc.create_cdata(text, self.open)?,
            _ => self.doc.create_comment(text, self.open)?,
        };
        if self.open.is_none() {
            if let Err(e) = self.doc.add_root(id) {
                self.doc.destroy_node(id);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Skips `<!ENTITY>`, `<!NOTATION>`, `<!ATTLIST>` and `<!DOCTYPE>`.
    fn skip_declaration(&mut self, start: SourceLocation) -> Result<()> {
        let keyword = self.input.take_while(|b| b.is_ascii_alphabetic());
        if keyword.eq_ignore_ascii_case("DOCTYPE") {
            return self.skip_doctype(start);
        }
        if !matches!(keyword, "ENTITY" | "NOTATION" | "ATTLIST") {
            self.input.push_diagnostic(
                ErrorSeverity::Warning,
                format!("unknown declaration '<!{keyword}' skipped"),
                start,
            );
        }
        self.input
            .take_until(">")
            .map(|_| ())
            .ok_or_else(|| ParserInput::malformed("unterminated declaration", start))
    }

    /// Skips a DOCTYPE, including a bracketed internal subset with quoted
    /// literals and comments inside it.
    fn skip_doctype(&mut self, start: SourceLocation) -> Result<()> {
        let bytes = self.input.rest().as_bytes();
        let mut subset_depth = 0u32;
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'"' | b'\'' => {
                    let quote = bytes[i];
                    match bytes[i + 1..].iter().position(|&b| b == quote) {
                        Some(len) => i += len + 1,
                        None => break,
                    }
                }
                b'<' if bytes[i..].starts_with(b"<!--") => {
                    match find(&bytes[i + 4..], b"-->") {
                        Some(len) => i += len + 4 + 2,
                        None => break,
                    }
                }
                b'[' => subset_depth += 1,
                b']' => subset_depth = subset_depth.saturating_sub(1),
                b'>' if subset_depth == 0 => {
                    self.input.advance(i + 1);
                    return Ok(());
                }
                _ => {}
            }
            i += 1;
        }
        Err(ParserInput::malformed("unterminated DOCTYPE declaration", start))
    }

    // --- Processing instructions ---

    fn parse_processing_instruction(&mut self, start: SourceLocation) -> Result<()> {
        let content = self.input.take_until("?>").ok_or_else(|| {
            ParserInput::malformed("unterminated processing instruction", start)
        })?;

        if self.doc.header.is_some() {
            self.input.push_diagnostic(
                ErrorSeverity::Warning,
                "document header already set; processing instruction ignored".to_string(),
                start,
            );
            return Ok(());
        }

        self.doc.header = Some(content.to_string());
        log::debug!("document header: <?{content}?>");
        if let Some(encoding) = header_encoding(content) {
            if encoding.len() > MAX_ENCODING_NAME_LEN {
                self.input.push_diagnostic(
                    ErrorSeverity::Warning,
                    format!(
                        "encoding name longer than {MAX_ENCODING_NAME_LEN} bytes; ignored"
                    ),
                    start,
                );
            } else {
                log::debug!("source encoding: {encoding}");
                self.doc.source_encoding = encoding.to_string();
            }
        }
        Ok(())
    }
}

fn invalid_characters(location: SourceLocation, source: InvalidEscape) -> XmlError {
    XmlError::InvalidCharacters { location, source }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
