// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Buffered file read/write backend.
//!
//! Descriptor-based I/O: write, fsync, seek back, read. One descriptor
//! is reused across the write and the read-back; no mapping involved.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use crate::backend::Backend;
use crate::error::BackendError;

/// Backend driving a regular file through open/write/read cycles.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn id(&self) -> String {
        self.path.display().to_string()
    }

    fn cycle_body(&self, mut file: &File, payload: &[u8], durable: bool) -> Result<(), BackendError> {
        file.set_len(payload.len() as u64)
            .map_err(|e| BackendError::Sizing {
                id: self.id(),
                size: payload.len(),
                source: e,
            })?;

        file.write_all(payload).map_err(|e| BackendError::Transfer {
            id: self.id(),
            op: "write",
            source: e,
        })?;

        if durable {
            if let Err(e) = file.sync_all() {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "fsync failed; continuing without durability"
                );
            }
        }

        file.seek(SeekFrom::Start(0))
            .map_err(|e| BackendError::Transfer {
                id: self.id(),
                op: "seek",
                source: e,
            })?;

        // Symmetry with the mapped variants: every cycle pays a write
        // and a read-back into a fresh buffer, then discards it.
        let mut readback = vec![0u8; payload.len()];
        file.read_exact(&mut readback)
            .map_err(|e| BackendError::Transfer {
                id: self.id(),
                op: "read",
                source: e,
            })?;

        Ok(())
    }
}

impl Backend for FileBackend {
    fn label(&self) -> &str {
        "file open/read/write"
    }

    fn run_cycle(&self, payload: &[u8], durable: bool) -> Result<(), BackendError> {
        // Stale files from a crashed run are reopened, not rejected.
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| BackendError::Resource {
                id: self.id(),
                source: e,
            })?;

        let result = self.cycle_body(&file, payload, durable);

        drop(file);
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to unlink backing file"
            );
        }

        result
    }
}
