//! Dump and re-parse behavior across the public API: idempotent output,
//! edits surviving a round trip, charset conversion and error reporting.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use txml::{Document, ErrorSeverity, NodeId, NodeKind, ParseOptions, XmlError};

fn dump_string(doc: &Document) -> String {
    doc.dump().unwrap().as_str().unwrap().to_string()
}

fn assert_same_tree(left: &Document, right: &Document) {
    assert_eq!(left.count_branches(), right.count_branches());
    for (&l, &r) in left.roots().iter().zip(right.roots()) {
        assert_same_node(left, l, right, r);
    }
}

fn assert_same_node(left: &Document, l: NodeId, right: &Document, r: NodeId) {
    assert_eq!(left.kind(l), right.kind(r));
    assert_eq!(left.name(l), right.name(r));
    assert_eq!(left.value(l), right.value(r), "value of {}", left.path(l));
    let attrs = |doc: &Document, id| {
        doc.attributes(id)
            .iter()
            .map(|a| (a.name.clone(), a.value.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(attrs(left, l), attrs(right, r));
    assert_eq!(left.count_children(l), right.count_children(r));
    for (&lc, &rc) in left.children(l).iter().zip(right.children(r)) {
        assert_same_node(left, lc, right, rc);
    }
}

// --- Idempotence ---

#[test]
fn test_dump_is_a_fixed_point() {
    let inputs = [
        "<a/>",
        "<a x=\"1\" y=\"two words\"><b>v</b><c/></a>",
        "<?xml version=\"1.0\" standalone=\"yes\"?><r>top<c>1</c><!-- x --></r>",
        "<r><![CDATA[ <not> & parsed ]]></r>",
        "<r q='it''s'>&lt;&amp;&gt;&quot;&apos;</r>",
    ];
    for input in inputs {
        let first = dump_string(&Document::parse_str(input).unwrap());
        let second = dump_string(&Document::parse_str(&first).unwrap());
        assert_eq!(first, second, "dump not stable for {input}");
    }
}

#[test]
fn test_whitespace_is_normalized() {
    let loose = "<r>\n   <a>1</a>\n\n\t<b   k = \"v\" />\n</r>\n\n";
    let tight = "<r><a>1</a><b k=\"v\"/></r>";
    assert_eq!(
        dump_string(&Document::parse_str(loose).unwrap()),
        dump_string(&Document::parse_str(tight).unwrap())
    );
}

#[test]
fn test_built_tree_survives_dump_and_parse() {
    let mut doc = Document::new();
    let root = doc.create_node("root node", None, None).unwrap();
    doc.add_root(root).unwrap();
    doc.add_attribute(root, "k=v", Some(" padded ")).unwrap();
    doc.add_attribute(root, "q'uote", Some("say \"hi\" & 'bye'")).unwrap();

    let names = ["a&b", "x<y", "g>t", "sp ace", "a/b", "!bang", "?q", "caf\u{e9}"];
    let mut parent = root;
    for (depth, name) in names.iter().enumerate() {
        let value = match depth % 3 {
            0 => format!("  lead {name}"),
            1 => format!("trail <{depth}>\t\n"),
            _ => String::new(),
        };
        let node = doc.create_node(name, Some(&value), Some(parent)).unwrap();
        doc.add_attribute(node, name, Some(name)).unwrap();
        doc.create_node("leaf", Some(" "), Some(node)).unwrap();
        if depth % 2 == 0 {
            doc.create_comment(&format!(" at {depth} "), Some(node)).unwrap();
        } else {
            doc.create_cdata(&format!("<raw {depth}> & ]] >"), Some(node)).unwrap();
        }
        parent = node;
    }
    doc.create_node("last", Some("\u{1F600} end"), Some(parent)).unwrap();

    let first = dump_string(&doc);
    let reparsed = Document::parse_str(&first).unwrap();
    assert_same_tree(&doc, &reparsed);
    assert_eq!(reparsed.node_count(), doc.node_count());
    assert_eq!(dump_string(&reparsed), first);

    let leaf = reparsed.get_node("/root node/a&b/leaf").unwrap();
    assert_eq!(reparsed.value(leaf), " ");
    assert_eq!(
        reparsed.attribute(reparsed.root().unwrap(), "k=v"),
        Some(" padded ")
    );
}

// --- Editing ---

#[test]
fn test_edits_survive_roundtrip() {
    let mut doc = Document::parse_str(
        "<config><db><host>localhost</host><port>5432</port></db></config>",
    )
    .unwrap();

    let port = doc.get_node("/config/db/port").unwrap();
    doc.set_value(port, "6543");
    let db = doc.get_node("/config/db").unwrap();
    doc.add_attribute(db, "engine", Some("postgres")).unwrap();
    let user = doc.create_node("user", Some("admin & co"), Some(db)).unwrap();
    doc.create_comment(" added by tool ", Some(user)).unwrap();
    let host = doc.get_node("/config/db/host").unwrap();
    doc.destroy_node(host);

    let text = dump_string(&doc);
    assert_eq!(
        text,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <config>\n\
         \t<db engine=\"postgres\">\n\
         \t\t<port>6543</port>\n\
         \t\t<user>\n\
         \t\tadmin &amp; co\n\
         \t\t\t<!-- added by tool -->\n\
         \t\t</user>\n\
         \t</db>\n\
         </config>\n"
    );

    let reparsed = Document::parse_str(&text).unwrap();
    let user = reparsed.get_node("/config/db/user").unwrap();
    assert_eq!(reparsed.value(user), "admin & co");
    assert_eq!(reparsed.get_node("/config/db/host"), None);
    assert_eq!(
        reparsed.attribute(reparsed.get_node("/config/db").unwrap(), "engine"),
        Some("postgres")
    );
}

#[test]
fn test_moving_a_branch_between_parents() {
    let mut doc = Document::parse_str("<r><from><item>x</item></from><to/></r>").unwrap();
    let item = doc.get_node("/r/from/item").unwrap();
    let to = doc.get_node("/r/to").unwrap();
    doc.add_child(to, item).unwrap();

    assert_eq!(doc.path(item), "r/to/item");
    assert_eq!(doc.count_children(doc.get_node("/r/from").unwrap()), 0);
    assert_eq!(
        dump_string(&doc),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <r>\n\t<from/>\n\t<to>\n\t\t<item>x</item>\n\t</to>\n</r>\n"
    );
}

#[test]
fn test_remove_node_at_path() {
    let mut doc = Document::parse_str("<r><a/><b><c/></b></r>").unwrap();
    doc.remove_node_at("/r/b").unwrap();
    assert_eq!(doc.get_node("/r/b"), None);
    assert!(matches!(
        doc.remove_node_at("/r/b"),
        Err(XmlError::NotFound)
    ));
    assert_eq!(doc.node_count(), 2);
}

// --- Roots ---

#[test]
fn test_second_root_rejected_by_default() {
    let err = Document::parse_str("<a/><b/>").unwrap_err();
    assert!(matches!(err, XmlError::TooManyRoots));
}

#[test]
fn test_multiple_roots_roundtrip() {
    let mut doc = Document::new();
    doc.allow_multiple_roots = true;
    doc.parse_buffer("<a>1</a><b>2</b>").unwrap();
    let text = dump_string(&doc);

    let mut again = Document::new();
    again.allow_multiple_roots = true;
    again.parse_buffer(&text).unwrap();
    assert_eq!(again.count_branches(), 2);
    assert_eq!(again.value(again.get_node("/b").unwrap()), "2");
}

#[test]
fn test_top_level_comment_is_a_branch() {
    let doc = Document::parse_str("<!-- header --><r/>").unwrap();
    assert_eq!(doc.count_branches(), 2);
    assert_eq!(doc.kind(doc.branch_at(1).unwrap()), NodeKind::Comment);
    assert_eq!(doc.root(), doc.branch_at(2));
}

// --- Encodings ---

#[test]
fn test_latin1_input_and_output() {
    let bytes = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><r>caf\xE9</r>";
    let mut doc = Document::parse_bytes(bytes).unwrap();
    assert_eq!(doc.source_encoding, "ISO-8859-1");
    let r = doc.root().unwrap();
    assert_eq!(doc.value(r), "caf\u{e9}");

    // Same charset in and out keeps the header as written.
    doc.output_encoding = "ISO-8859-1".to_string();
    let out = doc.dump().unwrap();
    assert_eq!(
        out.data,
        b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<r>caf\xE9</r>\n".to_vec()
    );

    // Back to UTF-8 rewrites the declaration.
    doc.output_encoding = "UTF-8".to_string();
    assert_eq!(
        dump_string(&doc),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<r>caf\u{e9}</r>\n"
    );
}

#[test]
fn test_reencoded_output_parses_back() {
    let mut doc = Document::parse_str("<r a=\"\u{fc}ber\">gr\u{fc}n</r>").unwrap();
    doc.output_encoding = "ISO-8859-1".to_string();
    let out = doc.dump().unwrap();

    let back = Document::parse_bytes(&out.data).unwrap();
    let r = back.root().unwrap();
    assert_eq!(back.value(r), "gr\u{fc}n");
    assert_eq!(back.attribute(r, "a"), Some("\u{fc}ber"));
    assert_eq!(back.source_encoding, "ISO-8859-1");
}

// --- Errors and diagnostics ---

#[test]
fn test_unbalanced_end_tag_reports_location() {
    let err = Document::parse_str("<a/>\n</a>").unwrap_err();
    match err {
        XmlError::UnbalancedTag { location } => {
            assert_eq!(location.line, 2);
            assert_eq!(location.column, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_bad_entity_is_invalid_characters() {
    let err = Document::parse_str("<a>&bogus;</a>").unwrap_err();
    assert!(matches!(err, XmlError::InvalidCharacters { .. }));
}

#[test]
fn test_recover_keeps_partial_tree() {
    let options = ParseOptions::default().recover(true);
    let doc = Document::parse_str_with_options("<a><b>1</b><!-- never closed", &options).unwrap();
    assert_eq!(doc.value(doc.get_node("/a/b").unwrap()), "1");
    assert!(doc
        .diagnostics
        .iter()
        .any(|d| d.severity == ErrorSeverity::Error));
}

#[test]
fn test_without_recover_unterminated_markup_fails() {
    let err = Document::parse_str("<a><b>1</b><!-- never closed").unwrap_err();
    assert!(matches!(err, XmlError::MalformedMarkup { .. }));
}
