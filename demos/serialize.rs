//! Serialization, re-encoding and roundtrip example.
//!
//! Run with: `cargo run --example serialize`
#![allow(clippy::expect_used)]

use txml::{Document, DumpOptions};

fn main() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<root>
  <config version="2.0">
    <setting name="debug">true</setting>
    <setting name="city">Z&#xFC;rich</setting>
  </config>
  <data>
    <item id="1">First &amp; foremost</item>
    <item id="2">Less &lt;than&gt; more</item>
    <![CDATA[Some <raw> content & stuff]]>
  </data>
</root>"#;

    println!("=== Original XML ===");
    println!("{xml}");

    let mut doc = Document::parse_str(xml).expect("failed to parse");

    // Serialize with the default tab indentation
    let output = doc.dump().expect("dump failed");
    let text = output.as_str().expect("UTF-8 output").to_string();
    println!("\n=== Serialized ===");
    print!("{text}");

    // Two-space indentation
    let spaced = doc
        .dump_with_options(&DumpOptions::default().indent("  "))
        .expect("dump failed");
    println!("\n=== Two-space indent ===");
    print!("{}", spaced.as_str().expect("UTF-8 output"));

    // Roundtrip: parse the serialized output again
    let doc2 = Document::parse_str(&text).expect("roundtrip parse failed");
    let text2 = doc2.dump().expect("dump failed");
    println!("\n=== Roundtrip stable: {} ===", text2.as_str() == Some(text.as_str()));

    // Re-encode for a Latin-1 consumer
    doc.output_encoding = "ISO-8859-1".to_string();
    let latin1 = doc.dump().expect("dump failed");
    println!(
        "\n=== {} output: {} bytes (UTF-8 was {}) ===",
        latin1.encoding,
        latin1.len(),
        output.len()
    );
}
