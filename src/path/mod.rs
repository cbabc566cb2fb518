//! Slash-separated node paths.
//!
//! A path names a root element followed by one selector per level:
//!
//! ```text
//! /config/servers/server[2]/host
//! /config/servers/server[@name='primary']
//! ```
//!
//! The leading slash is optional and empty segments are ignored. Slashes
//! inside `[...]` belong to the predicate, so `item[@url='a/b']` is one
//! segment. The walk does not backtrack: when a segment matches, later
//! segments are only tried below that one child.

use crate::tree::{Document, NodeId, NodeKind};

/// Resolves `path` to a node.
///
/// The first segment is compared with the names of the root elements
/// exactly; predicates are not applied to it. Every later segment is a
/// [`Selector`](crate::tree::Selector) evaluated against the children of
/// the node matched so far.
///
/// # Examples
///
/// ```
/// use txml::Document;
/// use txml::path::resolve;
///
/// let doc = Document::parse_str(r#"<r><c/><c id="x"><d>deep</d></c></r>"#).unwrap();
/// let d = resolve(&doc, "/r/c[@id='x']/d").unwrap();
/// assert_eq!(doc.value(d), "deep");
/// assert_eq!(resolve(&doc, "/r/c[3]"), None);
/// ```
#[must_use]
pub fn resolve(doc: &Document, path: &str) -> Option<NodeId> {
    let mut segments = split(path).into_iter();
    let first = segments.next()?;
    let mut current = doc
        .roots()
        .iter()
        .copied()
        .find(|&r| doc.kind(r) == NodeKind::Element && doc.name(r) == first)?;
    for segment in segments {
        current = doc.child_by_name(current, segment)?;
    }
    Some(current)
}

/// Splits a path on `/` outside of brackets, dropping empty segments.
///
/// Quoted literals inside brackets may contain `]` and `/`.
#[must_use]
pub fn split(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in path.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') if depth > 0 => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, '/') if depth == 0 => {
                push_segment(&mut segments, &path[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    push_segment(&mut segments, &path[start..]);
    segments
}

fn push_segment<'a>(segments: &mut Vec<&'a str>, segment: &'a str) {
    let segment = segment.trim();
    if !segment.is_empty() {
        segments.push(segment);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain() {
        assert_eq!(split("/a/b/c"), vec!["a", "b", "c"]);
        assert_eq!(split("a//b/"), vec!["a", "b"]);
        assert!(split("/").is_empty());
        assert!(split("").is_empty());
    }

    #[test]
    fn test_split_keeps_predicates_whole() {
        assert_eq!(
            split("/r/item[@url='http://x/y']/name"),
            vec!["r", "item[@url='http://x/y']", "name"]
        );
        assert_eq!(split("/r/c[@v='a]/b']"), vec!["r", "c[@v='a]/b']"]);
        assert_eq!(split("/r/c[2]/d"), vec!["r", "c[2]", "d"]);
    }

    #[test]
    fn test_resolve_index_and_attribute() {
        let doc = Document::parse_str(r#"<r><c id="a"/><c id="b"/></r>"#).unwrap();
        let r = doc.root().unwrap();
        let second = doc.child_at(r, 2).unwrap();
        assert_eq!(resolve(&doc, "/r/c[2]"), Some(second));
        assert_eq!(resolve(&doc, "/r/c[3]"), None);
        assert_eq!(resolve(&doc, "/r/c[@id='b']"), Some(second));
        assert_eq!(resolve(&doc, "/r/c[@id=\"b\"]"), Some(second));
        assert_eq!(resolve(&doc, "/r/c"), doc.child_at(r, 1));
    }

    #[test]
    fn test_resolve_root_only() {
        let doc = Document::parse_str("<r/>").unwrap();
        assert_eq!(resolve(&doc, "/r"), doc.root());
        assert_eq!(resolve(&doc, "r"), doc.root());
        assert_eq!(resolve(&doc, "/x"), None);
        assert_eq!(resolve(&doc, "/"), None);
    }

    #[test]
    fn test_resolve_root_ignores_predicates() {
        let doc = Document::parse_str("<r/>").unwrap();
        assert_eq!(resolve(&doc, "/r[1]"), None);
    }

    #[test]
    fn test_resolve_second_root() {
        let mut doc = Document::new();
        doc.allow_multiple_roots = true;
        doc.parse_buffer("<a><x>1</x></a><b><x>2</x></b>").unwrap();
        let x = resolve(&doc, "/b/x").unwrap();
        assert_eq!(doc.value(x), "2");
    }

    #[test]
    fn test_no_backtracking() {
        // The first <c> has no <d>; the second does, but is never tried.
        let doc = Document::parse_str("<r><c/><c><d/></c></r>").unwrap();
        assert_eq!(resolve(&doc, "/r/c/d"), None);
        assert!(resolve(&doc, "/r/c[2]/d").is_some());
    }
}
