// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Integration tests exercising real backend cycles end to end.
//!
//! These verify the cleanup contract every variant must honor: after a
//! cycle returns, the backing identifier is gone, and the next cycle
//! against the same identifier starts fresh.

use ipcmeter_core::backend::{Backend, FileBackend, MmapBackend, SharedMemoryBackend};
use tempfile::TempDir;

fn payload(n: usize) -> Vec<u8> {
    (0..n).map(|i| (i % 251) as u8).collect()
}

#[test]
fn file_cycle_leaves_no_backing_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("cycle.dat");
    let backend = FileBackend::new(&path);

    backend.run_cycle(&payload(4096), false).expect("cycle failed");
    assert!(!path.exists(), "backing file must be unlinked after the cycle");
}

#[test]
fn file_cycle_twice_against_same_identifier() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("cycle.dat");
    let backend = FileBackend::new(&path);

    backend.run_cycle(&payload(4096), false).expect("first cycle failed");
    backend.run_cycle(&payload(8192), false).expect("second cycle failed");
    assert!(!path.exists());
}

#[test]
fn file_cycle_reopens_stale_identifier() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("stale.dat");
    std::fs::write(&path, b"left behind by a crashed run").expect("failed to seed stale file");

    let backend = FileBackend::new(&path);
    backend.run_cycle(&payload(1024), false).expect("cycle must self-heal");
    assert!(!path.exists());
}

#[test]
fn file_cycle_against_directory_is_a_resource_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let backend = FileBackend::new(temp_dir.path());

    let err = backend.run_cycle(&payload(64), false).unwrap_err();
    assert!(matches!(
        err,
        ipcmeter_core::BackendError::Resource { .. }
    ));
}

#[test]
fn mmap_cycle_leaves_no_backing_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("mapped.dat");
    let backend = MmapBackend::new(&path);

    backend.run_cycle(&payload(4096), false).expect("cycle failed");
    assert!(!path.exists(), "backing file must be unlinked after the cycle");
}

#[test]
fn mmap_cycle_twice_against_same_identifier() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("mapped.dat");
    let backend = MmapBackend::new(&path);

    backend.run_cycle(&payload(4096), false).expect("first cycle failed");
    backend.run_cycle(&payload(4096), false).expect("second cycle failed");
}

#[test]
fn mmap_cycle_handles_one_byte_payload() {
    // The latency protocol drives backends with a single probe byte.
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let backend = MmapBackend::new(temp_dir.path().join("probe.dat"));

    backend.run_cycle(&[b'A'], false).expect("cycle failed");
}

#[test]
fn shm_cycle_twice_against_same_identifier() {
    let name = format!("ipcmeter_test_{}", std::process::id());
    let backend = SharedMemoryBackend::new(&name);

    backend.run_cycle(&payload(4096), false).expect("first cycle failed");
    backend.run_cycle(&payload(8192), false).expect("second cycle failed");
}

#[cfg(target_os = "linux")]
#[test]
fn shm_cycle_unlinks_object() {
    let name = format!("ipcmeter_unlink_{}", std::process::id());
    let backend = SharedMemoryBackend::new(&name);

    backend.run_cycle(&payload(1024), false).expect("cycle failed");

    // POSIX shm objects surface under /dev/shm on Linux
    let dev_shm = std::path::Path::new("/dev/shm").join(&name);
    assert!(!dev_shm.exists(), "shm object must be unlinked after the cycle");
}

#[test]
fn durable_cycles_complete_for_all_variants() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let data = payload(65_536);

    let file = FileBackend::new(temp_dir.path().join("durable_file.dat"));
    file.run_cycle(&data, true).expect("durable file cycle failed");

    let mmap = MmapBackend::new(temp_dir.path().join("durable_mmap.dat"));
    mmap.run_cycle(&data, true).expect("durable mmap cycle failed");

    let shm = SharedMemoryBackend::new(&format!("ipcmeter_durable_{}", std::process::id()));
    shm.run_cycle(&data, true).expect("durable shm cycle failed");
}
