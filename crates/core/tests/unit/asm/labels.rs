//! # Label Table Tests

use mipsim_core::asm::LabelTable;
use mipsim_core::common::error::ParseError;
use pretty_assertions::assert_eq;

#[test]
fn test_label_table_starts_empty() {
    let table = LabelTable::new();
    assert!(table.is_empty());
    assert_eq!(table.len(), 0);
    assert_eq!(table.resolve("main"), None);
    assert_eq!(table.name_at(0), None);
}

#[test]
fn test_label_declare_and_resolve() {
    let mut table = LabelTable::new();
    table.declare("main", 0, 1).unwrap();
    table.declare("loop", 3, 5).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.resolve("main"), Some(0));
    assert_eq!(table.resolve("loop"), Some(3));
    assert_eq!(table.resolve("Loop"), None);
}

#[test]
fn test_label_duplicate_reports_both_lines() {
    let mut table = LabelTable::new();
    table.declare("x", 0, 2).unwrap();
    assert_eq!(
        table.declare("x", 4, 9),
        Err(ParseError::DuplicateLabel {
            line: 9,
            label: "x".into(),
            first: 2
        })
    );
    assert_eq!(table.resolve("x"), Some(0));
    assert_eq!(table.len(), 1);
}

#[test]
fn test_label_name_at_prefers_first_declared() {
    let mut table = LabelTable::new();
    table.declare("a", 1, 1).unwrap();
    table.declare("b", 1, 2).unwrap();
    assert_eq!(table.name_at(1), Some("a"));
}

#[test]
fn test_label_iter_is_declaration_order() {
    let mut table = LabelTable::new();
    for (i, name) in ["z", "m", "a"].into_iter().enumerate() {
        table.declare(name, i, i + 1).unwrap();
    }
    let names: Vec<&str> = table.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["z", "m", "a"]);
}
