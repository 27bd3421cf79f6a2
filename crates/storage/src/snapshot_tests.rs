// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fd_core::test_support::record;
use tempfile::tempdir;

#[test]
fn missing_file_loads_as_none() {
    let dir = tempdir().unwrap();
    assert!(Snapshot::load(&dir.path().join("queue.snapshot")).unwrap().is_none());
}

#[test]
fn save_then_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state").join("queue.snapshot");

    let snapshot = Snapshot::new(3, vec![record(1, "Amina", 1), record(2, "Hodan", 2)]);
    snapshot.save(&path).unwrap();

    let loaded = Snapshot::load(&path).unwrap().unwrap();
    assert_eq!(loaded.next_id, 3);
    assert_eq!(loaded.records, snapshot.records);
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn file_is_compressed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.snapshot");
    Snapshot::new(1, vec![]).save(&path).unwrap();

    let raw = std::fs::read(&path).unwrap();
    // zstd frame magic
    assert_eq!(&raw[..4], &[0x28, 0xb5, 0x2f, 0xfd]);
}

#[test]
fn newer_version_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.snapshot");
    let mut snapshot = Snapshot::new(1, vec![]);
    snapshot.version = CURRENT_SNAPSHOT_VERSION + 1;
    snapshot.save(&path).unwrap();

    assert!(matches!(
        Snapshot::load(&path),
        Err(SnapshotError::UnsupportedVersion(v)) if v == CURRENT_SNAPSHOT_VERSION + 1
    ));
}

#[test]
fn garbage_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.snapshot");
    std::fs::write(&path, b"not a snapshot").unwrap();
    assert!(matches!(Snapshot::load(&path), Err(SnapshotError::Decode(_))));
}

#[test]
fn bak_rotation_keeps_three() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.snapshot");

    for i in 0..4 {
        let bak = rotate_bak_path(&path);
        std::fs::write(&bak, format!("{i}")).unwrap();
    }

    assert_eq!(std::fs::read_to_string(path.with_extension("bak")).unwrap(), "3");
    assert_eq!(std::fs::read_to_string(path.with_extension("bak.2")).unwrap(), "2");
    assert_eq!(std::fs::read_to_string(path.with_extension("bak.3")).unwrap(), "1");
    assert!(!path.with_extension("bak.4").exists());
}
