#![no_main]
use libfuzzer_sys::fuzz_target;
use txml::{Document, ParseOptions};

fuzz_target!(|data: &[u8]| {
    // Byte input exercises charset detection as well as the tokenizer.
    let _ = Document::parse_bytes(data);

    if let Ok(s) = std::str::from_utf8(data) {
        let mut doc = Document::new();
        doc.allow_multiple_roots = true;
        let _ = doc.parse_buffer_with_options(s, &ParseOptions::default().recover(true));
        for segment in s.split('\n').take(4) {
            let _ = doc.get_node(segment);
        }
    }
});
