//! Child selectors: `tag`, `tag[N]`, and `tag[@attr='value']`.

use crate::escape::unescape;

/// A parsed child selector.
///
/// Indices are 1-based. Attribute literals may use either quote character;
/// a doubled quote inside the literal stands for one literal quote, and
/// entity references in the literal are resolved before comparison.
///
/// # Examples
///
/// ```
/// use txml::tree::Selector;
///
/// assert_eq!(Selector::parse("item"), Some(Selector::Name("item")));
/// assert_eq!(Selector::parse("item[2]"), Some(Selector::Index("item", 2)));
/// assert_eq!(
///     Selector::parse("item[@id='it''s']"),
///     Some(Selector::Attribute {
///         name: "item",
///         attr: "id",
///         value: "it's".to_string(),
///     })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector<'a> {
    /// First child with this name.
    Name(&'a str),
    /// The Nth (1-based) child with this name.
    Index(&'a str, usize),
    /// First child with this name whose attribute `attr` equals `value`.
    Attribute {
        /// Element name.
        name: &'a str,
        /// Attribute name.
        attr: &'a str,
        /// Expected attribute value, already unquoted and unescaped.
        value: String,
    },
}

impl<'a> Selector<'a> {
    /// Parses a single selector. Returns `None` for empty or malformed input,
    /// including an attribute literal with an unresolvable entity reference.
    #[must_use]
    pub fn parse(segment: &'a str) -> Option<Self> {
        let segment = segment.trim();
        let Some(open) = segment.find('[') else {
            return (!segment.is_empty()).then_some(Self::Name(segment));
        };

        let name = segment[..open].trim_end();
        let inner = segment[open + 1..].strip_suffix(']')?.trim();
        if name.is_empty() {
            return None;
        }

        if let Some(predicate) = inner.strip_prefix('@') {
            let (attr, literal) = predicate.split_once('=')?;
            let attr = attr.trim();
            if attr.is_empty() {
                return None;
            }
            let value = unquote(literal.trim())?;
            let value = unescape(&value).ok()?.into_owned();
            Some(Self::Attribute { name, attr, value })
        } else {
            inner.parse::<usize>().ok().map(|n| Self::Index(name, n))
        }
    }

    /// The element name this selector matches against.
    #[must_use]
    pub fn name(&self) -> &'a str {
        match self {
            Self::Name(name) | Self::Index(name, _) | Self::Attribute { name, .. } => name,
        }
    }
}

/// Strips matching quotes and collapses doubled quotes.
///
/// An unquoted literal is returned as-is.
fn unquote(literal: &str) -> Option<String> {
    let Some(quote) = literal.chars().next().filter(|c| *c == '\'' || *c == '"') else {
        return Some(literal.to_string());
    };
    if literal.len() < 2 || !literal.ends_with(quote) {
        return None;
    }
    let body = &literal[1..literal.len() - 1];
    let mut doubled = String::with_capacity(2);
    doubled.push(quote);
    doubled.push(quote);
    Some(body.replace(&doubled, &quote.to_string()))
}
