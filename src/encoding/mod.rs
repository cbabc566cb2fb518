//! Encoding detection and transcoding.
//!
//! Documents are held in memory as UTF-8. On the way in, [`decode_to_utf8`]
//! sniffs a Byte Order Mark and the header's `encoding=` attribute and
//! decodes accordingly. On the way out, [`transcode`] converts the rendered
//! buffer into the document's output charset. Both are backed by
//! `encoding_rs`.
//!
//! # Encoding Detection Strategy
//!
//! 1. Check for a Byte Order Mark (BOM) at the start of the input.
//! 2. If a BOM is found, use the indicated encoding and skip the BOM bytes.
//! 3. If no BOM is found, default to UTF-8.
//! 4. After the initial decode, inspect the header's `encoding=` attribute
//!    and re-decode from the raw bytes if it names a different charset.

use std::ops::Range;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// The charset a [`Document`](crate::Document) assumes when none is declared.
pub const DEFAULT_ENCODING: &str = "UTF-8";

/// An error that occurs during encoding detection or transcoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("encoding error: {message}")]
pub struct EncodingError {
    /// A human-readable description of the encoding error.
    pub message: String,
}

impl EncodingError {
    /// Creates a new `EncodingError` with the given message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Detects the encoding of a byte stream by inspecting the Byte Order Mark.
///
/// Returns a tuple of (encoding name, number of BOM bytes to skip). Without
/// a BOM, a UTF-16 `<?` opening is still recognized by its zero bytes.
///
/// # Examples
///
/// ```
/// use txml::encoding::detect_encoding;
///
/// let (enc, skip) = detect_encoding(b"\xEF\xBB\xBFhello");
/// assert_eq!(enc, "UTF-8");
/// assert_eq!(skip, 3);
///
/// let (enc, skip) = detect_encoding(b"<root/>");
/// assert_eq!(enc, "UTF-8");
/// assert_eq!(skip, 0);
/// ```
#[must_use]
pub fn detect_encoding(bytes: &[u8]) -> (&'static str, usize) {
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        ("UTF-8", 3)
    } else if bytes.starts_with(&[0xFE, 0xFF]) {
        ("UTF-16BE", 2)
    } else if bytes.starts_with(&[0xFF, 0xFE]) {
        ("UTF-16LE", 2)
    } else if bytes.starts_with(&[0x00, 0x3C, 0x00, 0x3F]) {
        ("UTF-16BE", 0)
    } else if bytes.starts_with(&[0x3C, 0x00, 0x3F, 0x00]) {
        ("UTF-16LE", 0)
    } else {
        ("UTF-8", 0)
    }
}

fn lookup(name: &str) -> Result<&'static Encoding, EncodingError> {
    Encoding::for_label(name.trim().as_bytes())
        .ok_or_else(|| EncodingError::new(format!("unsupported encoding: {name}")))
}

/// Returns the Byte Order Mark written ahead of output in `name`.
///
/// Only UTF-16 output carries one; a reader cannot otherwise tell the byte
/// order before it has decoded the header.
///
/// # Examples
///
/// ```
/// use txml::encoding::bom;
///
/// assert_eq!(bom("UTF-16LE"), b"\xFF\xFE");
/// assert_eq!(bom("utf-16be"), b"\xFE\xFF");
/// assert!(bom("UTF-8").is_empty());
/// ```
#[must_use]
pub fn bom(name: &str) -> &'static [u8] {
    match Encoding::for_label(name.trim().as_bytes()) {
        Some(e) if e == UTF_16LE => &[0xFF, 0xFE],
        Some(e) if e == UTF_16BE => &[0xFE, 0xFF],
        _ => &[],
    }
}

/// Returns `true` if `name` is a label for UTF-8.
#[must_use]
pub fn is_utf8(name: &str) -> bool {
    Encoding::for_label(name.trim().as_bytes()) == Some(UTF_8)
}

/// Returns `true` if two charset labels name the same encoding.
///
/// Labels known to `encoding_rs` are compared by the encoding they resolve
/// to, so `utf8` and `UTF-8` match. Unknown labels fall back to a
/// case-insensitive comparison.
#[must_use]
pub fn same_encoding(a: &str, b: &str) -> bool {
    match (
        Encoding::for_label(a.trim().as_bytes()),
        Encoding::for_label(b.trim().as_bytes()),
    ) {
        (Some(x), Some(y)) => x == y,
        _ => a.trim().eq_ignore_ascii_case(b.trim()),
    }
}

/// Decodes a byte slice in the named encoding into a UTF-8 `String`.
///
/// # Errors
///
/// Returns `EncodingError` if the encoding name is not recognized or if the
/// input contains malformed byte sequences.
///
/// # Examples
///
/// ```
/// use txml::encoding::decode;
///
/// assert_eq!(decode(b"caf\xE9", "ISO-8859-1").unwrap(), "caf\u{e9}");
/// ```
pub fn decode(bytes: &[u8], encoding_name: &str) -> Result<String, EncodingError> {
    let encoding = lookup(encoding_name)?;
    let (result, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(EncodingError::new(format!(
            "malformed byte sequence for encoding {encoding_name}"
        )));
    }
    Ok(result.into_owned())
}

/// Encodes UTF-8 text into the named encoding.
///
/// UTF-16 targets are written in the byte order the label names. No BOM is
/// added here; see [`bom`].
///
/// # Errors
///
/// Returns `EncodingError` if the encoding name is not recognized or if the
/// text contains a character the target charset cannot represent.
pub fn encode(text: &str, encoding_name: &str) -> Result<Vec<u8>, EncodingError> {
    let encoding = lookup(encoding_name)?;
    if encoding == UTF_8 {
        return Ok(text.as_bytes().to_vec());
    }
    if encoding == UTF_16LE {
        return Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect());
    }
    if encoding == UTF_16BE {
        return Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect());
    }

    let (bytes, _used, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(EncodingError::new(format!(
            "text contains characters not representable in {encoding_name}"
        )));
    }
    Ok(bytes.into_owned())
}

/// Converts a buffer from one charset to another.
///
/// # Errors
///
/// Returns `EncodingError` if either charset is unsupported, the input is not
/// valid in `from`, or the text cannot be represented in `to`.
///
/// # Examples
///
/// ```
/// use txml::encoding::transcode;
///
/// let latin1 = transcode("caf\u{e9}".as_bytes(), "UTF-8", "ISO-8859-1").unwrap();
/// assert_eq!(latin1, b"caf\xE9");
/// ```
pub fn transcode(bytes: &[u8], from: &str, to: &str) -> Result<Vec<u8>, EncodingError> {
    if same_encoding(from, to) {
        // Still validate the charset name so callers get a uniform error.
        lookup(to)?;
        return Ok(bytes.to_vec());
    }
    let text = decode(bytes, from)?;
    encode(&text, to)
}

/// Locates the value of `encoding="..."` (or `'...'`) in header text, i.e.
/// the part of a `<?...?>` instruction between the delimiters.
///
/// Returns the byte range of the value, excluding the quotes.
pub(crate) fn header_encoding_span(header: &str) -> Option<Range<usize>> {
    for (pos, keyword) in header.match_indices("encoding") {
        let after = pos + keyword.len();
        let rest = header[after..].trim_start();
        let Some(rest) = rest.strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start();
        let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            continue;
        };
        if let Some(len) = rest[1..].find(quote) {
            let start = header.len() - rest.len() + 1;
            return Some(start..start + len);
        }
    }
    None
}

/// Returns the value of the `encoding` attribute in header text.
pub(crate) fn header_encoding(header: &str) -> Option<&str> {
    header_encoding_span(header).map(|span| &header[span])
}

/// Extracts the `encoding` attribute value from a header declaration.
///
/// Returns `None` if the text does not begin with `<?xml` or declares no
/// encoding.
fn extract_xml_decl_encoding(text: &str) -> Option<String> {
    let decl_end = text.find("?>")?;
    let decl = &text[..decl_end];
    if !decl.starts_with("<?xml") {
        return None;
    }
    extract_encoding_from_ascii_bytes(decl.as_bytes())
}

/// Scans raw bytes as ASCII for `encoding = "..."` inside the leading
/// `<?xml ... ?>` declaration.
///
/// Used when the bytes are not valid UTF-8: the declaration itself must be
/// ASCII-compatible, so it can be read before the charset is known.
fn extract_encoding_from_ascii_bytes(bytes: &[u8]) -> Option<String> {
    let limit = bytes.len().min(200);
    let scan = &bytes[..limit];
    if !scan.starts_with(b"<?xml") {
        return None;
    }
    let decl_end = scan
        .windows(2)
        .position(|w| w == b"?>")
        .unwrap_or(scan.len());
    let decl = &scan[..decl_end];

    let enc_needle = b"encoding";
    let enc_pos = decl
        .windows(enc_needle.len())
        .position(|w| w == enc_needle)?;
    let after_enc = skip_ascii_whitespace(&decl[enc_pos + enc_needle.len()..]);
    if after_enc.first() != Some(&b'=') {
        return None;
    }
    let after_eq = skip_ascii_whitespace(&after_enc[1..]);

    let quote = *after_eq.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let after_quote = &after_eq[1..];
    let end = after_quote.iter().position(|&b| b == quote)?;
    let encoding_bytes = &after_quote[..end];

    if encoding_bytes.is_ascii() {
        Some(String::from_utf8_lossy(encoding_bytes).into_owned())
    } else {
        None
    }
}

/// Skips leading ASCII whitespace bytes (space, tab, CR, LF).
fn skip_ascii_whitespace(bytes: &[u8]) -> &[u8] {
    let skip = bytes
        .iter()
        .take_while(|&&b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
        .count();
    &bytes[skip..]
}

/// Decodes raw XML bytes into a UTF-8 string, detecting the encoding.
///
/// 1. Detect the BOM and determine the initial encoding.
/// 2. If the encoding is UTF-8, validate and return the bytes as a string,
///    unless the header declares another charset.
/// 3. Otherwise decode with the BOM encoding, then honor a conflicting
///    header declaration by re-decoding the original bytes.
///
/// # Errors
///
/// Returns `EncodingError` if the bytes contain invalid sequences for the
/// detected encoding or if the declared encoding is unsupported.
///
/// # Examples
///
/// ```
/// use txml::encoding::decode_to_utf8;
///
/// let xml = b"<?xml version=\"1.0\"?><root/>";
/// let result = decode_to_utf8(xml).unwrap();
/// assert!(result.contains("<root/>"));
/// ```
pub fn decode_to_utf8(bytes: &[u8]) -> Result<String, EncodingError> {
    let (bom_encoding, bom_skip) = detect_encoding(bytes);
    let content_bytes = &bytes[bom_skip..];

    if bom_encoding == "UTF-8" {
        if let Ok(s) = std::str::from_utf8(content_bytes) {
            if let Some(declared) = extract_xml_decl_encoding(s) {
                // A BOM overrides the declaration; without one the declaration wins.
                if bom_skip == 0 && !is_utf8(&declared) && !is_utf16_label(&declared) {
                    return decode(content_bytes, &declared);
                }
            }
            return Ok(s.to_string());
        }
        if let Some(declared) = extract_encoding_from_ascii_bytes(content_bytes) {
            return decode(content_bytes, &declared);
        }
        return Err(EncodingError::new("input is not valid UTF-8"));
    }

    let initial_text = decode(content_bytes, bom_encoding)?;
    if let Some(declared) = extract_xml_decl_encoding(&initial_text) {
        let compatible = same_encoding(&declared, bom_encoding) || is_utf16_label(&declared);
        if !compatible {
            return decode(content_bytes, &declared);
        }
    }
    Ok(initial_text)
}

fn is_utf16_label(label: &str) -> bool {
    label.trim().eq_ignore_ascii_case("UTF-16")
}
