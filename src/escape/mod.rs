//! Conversion between raw text and XML-escaped text.
//!
//! [`escape`] replaces the five markup-significant characters with their
//! named entities. [`unescape`] reverses that and also resolves numeric
//! character references (`&#65;`, `&#x41;`).

use std::borrow::Cow;

/// An `&` that does not start a recognized entity or character reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid escape sequence '{reference}' at offset {offset}")]
pub struct InvalidEscape {
    /// Byte offset of the `&` within the unescaped input.
    pub offset: usize,
    /// The offending reference text, up to and including `;` when present.
    pub reference: String,
}

/// Escapes `&`, `<`, `>`, `"`, and `'` as named entities.
///
/// Borrows the input when nothing needs escaping.
///
/// # Examples
///
/// ```
/// use txml::escape::escape;
///
/// assert_eq!(escape("a < b && c"), "a &lt; b &amp;&amp; c");
/// assert_eq!(escape("plain"), "plain");
/// ```
#[must_use]
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    write_escaped(&mut out, text);
    Cow::Owned(out)
}

/// Appends `text` to `out`, escaping markup-significant characters.
pub fn write_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        write_escaped_char(out, ch);
    }
}

/// Appends an element or attribute name so that it reads back unchanged.
///
/// On top of the five markup characters, whitespace, `/` and `=` end a name
/// and are written as numeric references. So is a leading `!` or `?`, which
/// would otherwise turn a start tag into a declaration.
///
/// # Examples
///
/// ```
/// use txml::escape::{unescape, write_escaped_name};
///
/// let mut out = String::new();
/// write_escaped_name(&mut out, "!a b/c");
/// assert_eq!(out, "&#33;a&#32;b&#47;c");
/// assert_eq!(unescape(&out).unwrap(), "!a b/c");
/// ```
pub fn write_escaped_name(out: &mut String, name: &str) {
    for (i, ch) in name.char_indices() {
        match ch {
            ' ' | '\t' | '\r' | '\n' | '/' | '=' => write_char_ref(out, ch),
            '!' | '?' if i == 0 => write_char_ref(out, ch),
            _ => write_escaped_char(out, ch),
        }
    }
}

/// Appends element text, writing leading and trailing whitespace as numeric
/// references so that a reader which trims text keeps it.
///
/// # Examples
///
/// ```
/// use txml::escape::write_escaped_text;
///
/// let mut out = String::new();
/// write_escaped_text(&mut out, " a < b\n");
/// assert_eq!(out, "&#32;a &lt; b&#10;");
/// ```
pub fn write_escaped_text(out: &mut String, text: &str) {
    let start = text.len() - text.trim_start_matches(is_blank).len();
    let end = text.trim_end_matches(is_blank).len();
    for (i, ch) in text.char_indices() {
        if i < start || i >= end {
            write_char_ref(out, ch);
        } else {
            write_escaped_char(out, ch);
        }
    }
}

fn write_escaped_char(out: &mut String, ch: char) {
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&apos;"),
        _ => out.push(ch),
    }
}

fn write_char_ref(out: &mut String, ch: char) {
    out.push_str("&#");
    out.push_str(&u32::from(ch).to_string());
    out.push(';');
}

fn is_blank(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

/// Resolves named entities and numeric character references.
///
/// # Errors
///
/// Returns [`InvalidEscape`] when an `&` is not followed by one of the five
/// predefined entity names or a decimal/hexadecimal code point terminated
/// by `;`, or when the code point is not a valid character.
///
/// # Examples
///
/// ```
/// use txml::escape::unescape;
///
/// assert_eq!(unescape("&lt;tag&gt; &#65;&#x42;").unwrap(), "<tag> AB");
/// assert!(unescape("fish & chips").is_err());
/// ```
pub fn unescape(text: &str) -> Result<Cow<'_, str>, InvalidEscape> {
    if !text.contains('&') {
        return Ok(Cow::Borrowed(text));
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut offset = 0;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        offset += amp;
        let tail = &rest[amp..];

        let Some(semi) = tail.find(';') else {
            return Err(invalid(offset, tail));
        };
        let reference = &tail[..=semi];
        out.push(resolve_reference(&reference[1..semi]).ok_or_else(|| invalid(offset, reference))?);

        rest = &tail[semi + 1..];
        offset += semi + 1;
    }
    out.push_str(rest);

    Ok(Cow::Owned(out))
}

/// Resolves the body of a reference (the text between `&` and `;`).
fn resolve_reference(body: &str) -> Option<char> {
    match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let digits = body.strip_prefix('#')?;
            let code = if let Some(hex) = digits.strip_prefix(['x', 'X']) {
                if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return None;
                }
                u32::from_str_radix(hex, 16).ok()?
            } else {
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                digits.parse::<u32>().ok()?
            };
            char::from_u32(code).filter(|&c| c != '\0')
        }
    }
}

fn invalid(offset: usize, reference: &str) -> InvalidEscape {
    // Cap the reported text so a stray '&' in a large buffer stays readable.
    let reference: String = reference.chars().take(16).collect();
    InvalidEscape { offset, reference }
}
