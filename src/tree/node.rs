//! Node type definitions.
//!
//! Every node carries a name and a value, so `NodeKind` is a plain tag
//! rather than a payload enum. Comment and CDATA nodes get a synthetic name
//! (see [`NodeKind::synthetic_name`]) so that paths through them stay
//! printable.

use std::fmt;

/// The kind of a node in the document tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeKind {
    /// An element, e.g. `<item id="1">text</item>`. Its value is the text
    /// content; attributes and children are allowed.
    #[default]
    Element,

    /// A comment, e.g. `<!-- ... -->`. The value is the raw text between the
    /// delimiters and is never escaped.
    Comment,

    /// A CDATA section, e.g. `<![CDATA[...]]>`. The value is the raw payload.
    CData,
}

impl NodeKind {
    /// The name given to nodes of this kind that have no tag name.
    #[must_use]
    pub fn synthetic_name(self) -> Option<&'static str> {
        match self {
            Self::Element => None,
            Self::Comment => Some("#comment"),
            Self::CData => Some("#cdata"),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element => write!(f, "element"),
            Self::Comment => write!(f, "comment"),
            Self::CData => write!(f, "cdata"),
        }
    }
}
