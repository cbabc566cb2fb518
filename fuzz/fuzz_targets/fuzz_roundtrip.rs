#![no_main]
use libfuzzer_sys::fuzz_target;
use txml::{Document, ParseOptions};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let opts = ParseOptions::default().recover(true);
        // Parse -> dump -> parse should never panic, and a clean re-parse
        // must rebuild the same number of nodes.
        if let Ok(doc) = Document::parse_str_with_options(s, &opts) {
            let Ok(first) = doc.dump() else { return };
            let Some(text) = first.as_str() else { return };
            if let Ok(again) = Document::parse_str_with_options(text, &opts) {
                if again.diagnostics.is_empty() {
                    assert_eq!(doc.node_count(), again.node_count());
                }
            }
        }
    }
});
