//! Basic XML parsing and tree navigation.
//!
//! Run with: `cargo run --example basic_parse`
#![allow(clippy::expect_used)]

use txml::{Document, NodeKind};

fn main() {
    let xml = r#"<?xml version="1.0"?>
<bookstore>
  <!-- stock as of Monday -->
  <book category="fiction">
    <title lang="en">The Great Gatsby</title>
    <author>F. Scott Fitzgerald</author>
    <year>1925</year>
    <price>10.99</price>
  </book>
  <book category="science">
    <title lang="en">A Brief History of Time</title>
    <author>Stephen Hawking</author>
    <year>1988</year>
    <price>14.99</price>
  </book>
</bookstore>"#;

    let doc = Document::parse_str(xml).expect("failed to parse XML");
    let root = doc.root().expect("no root element");

    println!("Root element: {}", doc.name(root));
    println!("Header: <?{}?>", doc.header.as_deref().unwrap_or(""));

    // Iterate over the children of the root
    for &child in doc.children(root) {
        match doc.kind(child) {
            NodeKind::Comment => println!("  (comment:{})", doc.value(child)),
            NodeKind::CData => println!("  (cdata)"),
            NodeKind::Element => {
                let category = doc.attribute(child, "category").unwrap_or("none");
                println!("  <{}> category={category}", doc.name(child));
                for &field in doc.children(child) {
                    println!("    {} = {}", doc.path(field), doc.value(field));
                }
            }
        }
    }

    println!(
        "{} branches, {} nodes",
        doc.count_branches(),
        doc.node_count()
    );
}
