// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Backend capability for the benchmark harness.
//!
//! A backend is one mechanism for moving data through the OS I/O path.
//! The harness depends only on this trait, never on a concrete variant,
//! so backends are substitutable and test doubles can be injected.

mod file;
mod mmap;
mod region;
mod shm;

pub use file::FileBackend;
pub use mmap::MmapBackend;
pub use region::MappedRegion;
pub use shm::SharedMemoryBackend;

use crate::error::BackendError;

/// Byte used to fill benchmark payloads.
pub const PROBE_BYTE: u8 = b'A';

/// A data-transfer mechanism under measurement.
pub trait Backend {
    /// Label attached to benchmark results for this backend.
    fn label(&self) -> &str;

    /// Run one complete cycle: create the backing resource at the
    /// backend's fixed identifier, size it to `payload.len()`, write
    /// the payload, force durability if `durable` is set, read the
    /// bytes back into a fresh buffer, then release and unlink the
    /// resource.
    ///
    /// Cleanup runs on every exit path. Sync and teardown failures are
    /// logged warnings; everything else aborts the cycle with a
    /// [`BackendError`].
    fn run_cycle(&self, payload: &[u8], durable: bool) -> Result<(), BackendError>;
}
