//! Loading and saving documents on disk.

#![allow(clippy::unwrap_used)]

use std::fs;

use pretty_assertions::assert_eq;
use txml::persist::backup_path;
use txml::{Document, XmlError};

#[test]
fn test_load_edit_save_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.xml");
    let original = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<app><timeout>30</timeout></app>\n";
    fs::write(&path, original).unwrap();

    let mut doc = Document::new();
    doc.parse_file(&path).unwrap();
    let timeout = doc.get_node("/app/timeout").unwrap();
    doc.set_value(timeout, "60");
    doc.save(&path).unwrap();

    assert_eq!(fs::read_to_string(backup_path(&path)).unwrap(), original);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<app>\n\t<timeout>60</timeout>\n</app>\n"
    );

    let mut reloaded = Document::new();
    reloaded.parse_file(&path).unwrap();
    let timeout = reloaded.get_node("/app/timeout").unwrap();
    assert_eq!(reloaded.value(timeout), "60");
}

#[test]
fn test_second_save_replaces_backup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.xml");

    Document::parse_str("<v>1</v>").unwrap().save(&path).unwrap();
    assert!(!backup_path(&path).exists());

    Document::parse_str("<v>2</v>").unwrap().save(&path).unwrap();
    Document::parse_str("<v>3</v>").unwrap().save(&path).unwrap();

    let backup = Document::parse_bytes(&fs::read(backup_path(&path)).unwrap()).unwrap();
    assert_eq!(backup.value(backup.root().unwrap()), "2");
    let current = Document::parse_bytes(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(current.value(current.root().unwrap()), "3");
}

#[test]
fn test_shorter_content_truncates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shrink.xml");
    let mut doc = Document::parse_str("<r><a>long value here</a><b>more</b></r>").unwrap();
    doc.save(&path).unwrap();

    doc.remove_node_at("/r/a").unwrap();
    doc.remove_node_at("/r/b").unwrap();
    doc.save(&path).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<r/>\n"
    );
}

#[test]
fn test_latin1_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latin1.xml");
    fs::write(
        &path,
        b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<r>\xC0 bient\xF4t</r>\n",
    )
    .unwrap();

    let mut doc = Document::new();
    doc.parse_file(&path).unwrap();
    assert_eq!(doc.value(doc.root().unwrap()), "\u{c0} bient\u{f4}t");

    doc.output_encoding.clone_from(&doc.source_encoding);
    doc.save(&path).unwrap();
    assert_eq!(
        fs::read(&path).unwrap(),
        b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<r>\xC0 bient\xF4t</r>\n".to_vec()
    );
}

#[test]
fn test_utf16_file_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wide.xml");
    let mut doc = Document::parse_str("<r note=\"\u{263a}\"><v>\u{4e2d}\u{6587}</v></r>").unwrap();
    doc.output_encoding = "UTF-16".to_string();
    doc.save(&path).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], b"\xFF\xFE<\0");

    let mut reloaded = Document::new();
    reloaded.parse_file(&path).unwrap();
    assert_eq!(reloaded.source_encoding, "UTF-16");
    assert_eq!(reloaded.value(reloaded.get_node("/r/v").unwrap()), "\u{4e2d}\u{6587}");
    assert_eq!(reloaded.attribute(reloaded.root().unwrap(), "note"), Some("\u{263a}"));
}

#[test]
fn test_parse_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = Document::new();
    let err = doc.parse_file(dir.path().join("nope.xml")).unwrap_err();
    assert!(matches!(err, XmlError::Io { .. }));
    assert_eq!(doc.node_count(), 0);
}

#[test]
fn test_save_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no/such/dir/out.xml");
    let err = Document::parse_str("<a/>").unwrap().save(&path).unwrap_err();
    assert!(matches!(err, XmlError::Io { .. }));
}
