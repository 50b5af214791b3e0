//! # Source Loading Tests
//!
//! Reading source files from disk through `loader::load_source` and
//! `Simulator::load_file`, including failures that must leave the simulator
//! untouched.

use std::io::Write;

use mipsim_core::common::error::SimError;
use mipsim_core::sim::{loader, ExecState};
use mipsim_core::Simulator;
use tempfile::NamedTempFile;

/// Creates a temporary source file with `text`.
fn create_temp_source(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_source_success() {
    let file = create_temp_source("li $t0, 1\nprint $t0\n");
    assert_eq!(loader::load_source(file.path()).unwrap(), "li $t0, 1\nprint $t0\n");
}

#[test]
fn test_load_source_empty_file() {
    let file = create_temp_source("");
    assert!(loader::load_source(file.path()).unwrap().is_empty());
}

#[test]
fn test_load_source_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.s");
    match loader::load_source(&path) {
        Err(SimError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn test_load_source_rejects_invalid_utf8() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[0xff, 0xfe, 0x00]).unwrap();
    file.flush().unwrap();
    assert!(matches!(
        loader::load_source(file.path()),
        Err(SimError::Io { .. })
    ));
}

#[test]
fn test_simulator_load_file_and_run() {
    let file = create_temp_source("li $t0, 21\nadd $t0, $t0, $t0\nprint $t0\n");
    let mut sim = Simulator::empty();
    sim.load_file(file.path()).unwrap();

    assert_eq!(sim.filename(), Some(file.path()));
    assert_eq!(sim.state(), ExecState::Idle);
    sim.run().unwrap();
    assert_eq!(sim.outputs(), ["42"]);
}

#[test]
fn test_simulator_load_file_failure_leaves_state() {
    let mut sim = Simulator::new("break\nprint $zero");
    sim.run().unwrap();
    assert!(sim.is_paused());

    let dir = tempfile::tempdir().unwrap();
    let err = sim.load_file(dir.path().join("nope.s")).unwrap_err();
    assert!(err.to_string().contains("nope.s"), "{err}");

    assert_eq!(sim.source(), "break\nprint $zero");
    assert!(sim.is_paused());
    assert_eq!(sim.vm().pc(), 1);
    assert_eq!(sim.filename(), None);
}
