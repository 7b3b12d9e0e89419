//! Tests for output module

use super::*;
use serde_json::{json, Value};
use tempfile::tempdir;
use test_case::test_case;

#[test_case("604538018670785766", "604538018670785766" ; "numeric id")]
#[test_case("someone/paintings", "someone_paintings" ; "path separators")]
#[test_case("a<b>c?d*e", "abcde" ; "dropped characters")]
#[test_case("say \"hi\"", "say 'hi'" ; "double quotes")]
#[test_case("c:\\dir|x.json", "c__dir_x_json" ; "windows separators")]
#[test_case("  red   cat\tart ", "red cat art" ; "whitespace collapsed")]
#[test_case("<?>", "_" ; "nothing left")]
fn test_sanitize(input: &str, expected: &str) {
    assert_eq!(sanitize(input), expected);
}

#[test]
fn test_write_collection_creates_dir() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("nested").join("out");
    let items = vec![json!({"id": "1"}), json!({"id": "2"})];

    let path = write_collection(&target, "board/1", &items).unwrap();

    assert_eq!(path, target.join("board_1.json"));
    let written: Vec<Value> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(written, items);
    assert!(!target.join("board_1.json.tmp").exists());
}

#[test]
fn test_write_empty_collection() {
    let dir = tempdir().unwrap();
    let path = JsonWriter::new(dir.path())
        .write::<Value>("empty", &[])
        .unwrap();
    assert_eq!(std::fs::read_to_string(path).unwrap(), "[]");
}

#[test]
fn test_pretty_output() {
    let dir = tempdir().unwrap();
    let writer = JsonWriter::new(dir.path()).pretty(true);
    let path = writer.write("p", &[json!({"a": 1})]).unwrap();
    assert!(std::fs::read_to_string(path).unwrap().contains('\n'));
    assert_eq!(writer.path_for("x.y"), dir.path().join("x_y.json"));
}

#[test]
fn test_overwrites_existing_file() {
    let dir = tempdir().unwrap();
    let writer = JsonWriter::new(dir.path());
    writer.write("same", &[1, 2, 3]).unwrap();
    let path = writer.write("same", &[4]).unwrap();
    assert_eq!(std::fs::read_to_string(path).unwrap(), "[4]");
}

#[test]
fn test_write_single_object() {
    let dir = tempdir().unwrap();
    let path = JsonWriter::new(dir.path())
        .write_value("4503", &json!({"id": "4503", "title": "Fern"}))
        .unwrap();

    assert_eq!(path, dir.path().join("4503.json"));
    let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["title"], "Fern");
}
