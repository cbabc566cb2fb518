//! Low-level input cursor for the XML parser.
//!
//! [`ParserInput`] wraps the UTF-8 input and tracks the position (line,
//! column, byte offset) along with the diagnostics accumulated so far. It
//! offers byte-level peeking and advancing plus a few token scanners. All
//! delimiters the parser scans for are ASCII, so every slice it hands out
//! starts and ends on a character boundary.

use crate::error::{ErrorSeverity, ParseDiagnostic, SourceLocation, XmlError};

/// Returns `true` for the blanks the parser skips between tokens.
pub(crate) fn is_blank(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

/// Cursor over the parser input.
pub(crate) struct ParserInput<'a> {
    /// The input text.
    input: &'a str,

    /// Current byte offset in `input`.
    pos: usize,

    /// Current line number (1-based).
    line: u32,

    /// Current column number (1-based, in characters).
    column: u32,

    /// Accumulated diagnostics (warnings and recovered errors).
    pub(crate) diagnostics: Vec<ParseDiagnostic>,
}

impl<'a> ParserInput<'a> {
    /// Creates a cursor positioned at the start of `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
            diagnostics: Vec::new(),
        }
    }

    // -- Position queries --

    /// Returns the current source location.
    pub fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.line,
            column: self.column,
            byte_offset: self.pos,
        }
    }

    /// Returns `true` if all input has been consumed.
    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Returns the unconsumed input.
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    // -- Peek and advance --

    /// Returns the byte at the current position without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    /// Returns the byte at `current_position + offset` without consuming.
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + offset).copied()
    }

    /// Advances the position by `count` bytes, updating line/column.
    ///
    /// UTF-8 continuation bytes do not count as columns.
    pub fn advance(&mut self, count: usize) {
        let end = (self.pos + count).min(self.input.len());
        for &b in &self.input.as_bytes()[self.pos..end] {
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else if b & 0xC0 != 0x80 {
                self.column += 1;
            }
        }
        self.pos = end;
    }

    /// Returns `true` if the remaining input starts with `s`.
    pub fn looking_at(&self, s: &[u8]) -> bool {
        self.input.as_bytes()[self.pos..].starts_with(s)
    }

    /// Consumes `s` if the remaining input starts with it.
    pub fn eat(&mut self, s: &[u8]) -> bool {
        if self.looking_at(s) {
            self.advance(s.len());
            true
        } else {
            false
        }
    }

    /// Skips blanks. Returns `true` if any were consumed.
    pub fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(is_blank) {
            self.advance(1);
        }
        self.pos > start
    }

    // -- Scanners --

    /// Consumes bytes while `pred` returns `true` and returns them.
    pub fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        let len = self.input.as_bytes()[start..]
            .iter()
            .take_while(|&&b| pred(b))
            .count();
        self.advance(len);
        &self.input[start..start + len]
    }

    /// Returns the text up to the next occurrence of `delim` and consumes it
    /// together with the delimiter.
    ///
    /// Returns `None` and consumes nothing if `delim` does not occur.
    pub fn take_until(&mut self, delim: &str) -> Option<&'a str> {
        let rest = self.rest();
        let found = rest.find(delim)?;
        self.advance(found + delim.len());
        Some(&rest[..found])
    }

    /// Returns the text up to the next `<` without consuming the `<`.
    ///
    /// Returns `None` and consumes nothing if no `<` follows.
    pub fn take_text(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let found = rest.find('<')?;
        self.advance(found);
        Some(&rest[..found])
    }

    /// Reads a quoted value whose opening `quote` has already been consumed.
    ///
    /// A doubled quote stands for one literal quote. Consumes through the
    /// closing quote. Returns `None` and consumes nothing if the value is
    /// unterminated.
    pub fn take_quoted(&mut self, quote: u8) -> Option<String> {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let mut value = String::new();
        let mut segment = 0;
        let mut i = 0;
        while let Some(found) = bytes[i..].iter().position(|&b| b == quote) {
            let q = i + found;
            if bytes.get(q + 1) == Some(&quote) {
                value.push_str(&rest[segment..=q]);
                i = q + 2;
                segment = i;
            } else {
                value.push_str(&rest[segment..q]);
                self.advance(q + 1);
                return Some(value);
            }
        }
        None
    }

    /// Consumes the rest of the input.
    pub fn skip_to_end(&mut self) {
        self.advance(self.input.len() - self.pos);
    }

    // -- Errors --

    /// Creates a [`XmlError::MalformedMarkup`] at `location`.
    pub fn malformed(message: impl Into<String>, location: SourceLocation) -> XmlError {
        XmlError::MalformedMarkup {
            message: message.into(),
            location,
        }
    }

    /// Records a diagnostic at `location` and mirrors it to the log.
    pub fn push_diagnostic(
        &mut self,
        severity: ErrorSeverity,
        message: String,
        location: SourceLocation,
    ) {
        match severity {
            ErrorSeverity::Warning => log::warn!("{location}: {message}"),
            ErrorSeverity::Error => log::error!("{location}: {message}"),
        }
        self.diagnostics.push(ParseDiagnostic {
            severity,
            message,
            location,
        });
    }

    /// Records a warning at the current position.
    pub fn warn(&mut self, message: impl Into<String>) {
        let location = self.location();
        self.push_diagnostic(ErrorSeverity::Warning, message.into(), location);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_and_advance() {
        let mut input = ParserInput::new("abc");
        assert_eq!(input.peek(), Some(b'a'));
        assert_eq!(input.peek_at(1), Some(b'b'));
        input.advance(1);
        assert_eq!(input.peek(), Some(b'b'));
        input.advance(10);
        assert!(input.at_end());
        assert_eq!(input.peek(), None);
    }

    #[test]
    fn test_line_column_tracking() {
        let mut input = ParserInput::new("ab\ncd");
        assert_eq!(input.location().line, 1);
        assert_eq!(input.location().column, 1);
        input.advance(2); // past "ab"
        assert_eq!(input.location().column, 3);
        input.advance(1); // past "\n"
        assert_eq!(input.location().line, 2);
        assert_eq!(input.location().column, 1);
        assert_eq!(input.location().byte_offset, 3);
    }

    #[test]
    fn test_column_counts_characters() {
        let mut input = ParserInput::new("\u{e9}\u{e9}x");
        input.advance(4);
        assert_eq!(input.location().column, 3);
        assert_eq!(input.location().byte_offset, 4);
        assert_eq!(input.peek(), Some(b'x'));
    }

    #[test]
    fn test_skip_whitespace() {
        let mut input = ParserInput::new("  \t\r\nabc");
        assert!(input.skip_whitespace());
        assert_eq!(input.peek(), Some(b'a'));
        assert!(!input.skip_whitespace());
    }

    #[test]
    fn test_looking_at_and_eat() {
        let mut input = ParserInput::new("<!--x");
        assert!(input.looking_at(b"<!--"));
        assert!(!input.looking_at(b"<?"));
        assert!(!input.eat(b"<?"));
        assert!(input.eat(b"<!--"));
        assert_eq!(input.rest(), "x");
    }

    #[test]
    fn test_take_while() {
        let mut input = ParserInput::new("name>rest");
        assert_eq!(input.take_while(|b| b != b'>'), "name");
        assert_eq!(input.peek(), Some(b'>'));
    }

    #[test]
    fn test_take_until_consumes_delimiter() {
        let mut input = ParserInput::new(" a -- b -->tail");
        assert_eq!(input.take_until("-->"), Some(" a -- b "));
        assert_eq!(input.rest(), "tail");
    }

    #[test]
    fn test_take_until_missing_consumes_nothing() {
        let mut input = ParserInput::new("no end");
        assert_eq!(input.take_until("-->"), None);
        assert_eq!(input.rest(), "no end");
    }

    #[test]
    fn test_take_text_stops_before_lt() {
        let mut input = ParserInput::new("hello<b>");
        assert_eq!(input.take_text(), Some("hello"));
        assert_eq!(input.peek(), Some(b'<'));

        let mut input = ParserInput::new("trailing");
        assert_eq!(input.take_text(), None);
    }

    #[test]
    fn test_take_quoted() {
        let mut input = ParserInput::new("plain\" rest");
        assert_eq!(input.take_quoted(b'"').unwrap(), "plain");
        assert_eq!(input.rest(), " rest");

        let mut input = ParserInput::new("he said \"\"hi\"\"\"/>");
        assert_eq!(input.take_quoted(b'"').unwrap(), "he said \"hi\"");
        assert_eq!(input.rest(), "/>");

        let mut input = ParserInput::new("it''s'>");
        assert_eq!(input.take_quoted(b'\'').unwrap(), "it's");

        let mut input = ParserInput::new("'>");
        assert_eq!(input.take_quoted(b'\'').unwrap(), "");
    }

    #[test]
    fn test_take_quoted_unterminated() {
        let mut input = ParserInput::new("never closed>");
        assert_eq!(input.take_quoted(b'"'), None);
        assert_eq!(input.rest(), "never closed>");
    }

    #[test]
    fn test_warn_records_location() {
        let mut input = ParserInput::new("ab\ncd");
        input.advance(4);
        input.warn("something odd");
        let diag = &input.diagnostics[0];
        assert_eq!(diag.severity, ErrorSeverity::Warning);
        assert_eq!(diag.message, "something odd");
        assert_eq!(diag.location.line, 2);
        assert_eq!(diag.location.column, 2);
    }
}
