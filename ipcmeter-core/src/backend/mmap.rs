//! Memory-mapped file backend.
//!
//! Resizes the backing file, maps it shared read-write, writes via
//! memcpy into the mapping, optionally msyncs, and reads back out of
//! the same mapping. The read-back deliberately reuses the view that
//! was just written; a fresh destination buffer keeps the read cost
//! comparable with the descriptor-based variant.

use std::fs::{self, File, OpenOptions};
use std::os::unix::io::AsRawFd;
use std::path::PathBuf;

use crate::backend::region::MappedRegion;
use crate::backend::Backend;
use crate::error::BackendError;

/// Backend driving a file through mmap write/read cycles.
pub struct MmapBackend {
    path: PathBuf,
}

impl MmapBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn id(&self) -> String {
        self.path.display().to_string()
    }

    fn cycle_body(&self, file: &File, payload: &[u8], durable: bool) -> Result<(), BackendError> {
        file.set_len(payload.len() as u64)
            .map_err(|e| BackendError::Sizing {
                id: self.id(),
                size: payload.len(),
                source: e,
            })?;

        let mut region = MappedRegion::map(file.as_raw_fd(), payload.len(), &self.id())?;
        region.copy_from_slice(payload);

        if durable {
            if let Err(e) = region.sync() {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "msync failed; continuing without durability"
                );
            }
        }

        let mut readback = vec![0u8; payload.len()];
        region.copy_to_slice(&mut readback);

        Ok(())
    }
}

impl Backend for MmapBackend {
    fn label(&self) -> &str {
        "mmap"
    }

    fn run_cycle(&self, payload: &[u8], durable: bool) -> Result<(), BackendError> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| BackendError::Resource {
                id: self.id(),
                source: e,
            })?;

        // The mapping (if established) is torn down inside cycle_body
        // before the descriptor closes here.
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
