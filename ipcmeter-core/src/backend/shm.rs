// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! POSIX shared memory backend.
//!
//! Same mapped protocol as the mmap variant, but the backing resource
//! is a named, kernel-persistent shared memory object. Its identifier
//! lives in the shm namespace and is unlinked independently of any
//! filesystem path.

use std::ffi::CString;
use std::io;
use std::os::unix::io::RawFd;

use crate::backend::region::MappedRegion;
use crate::backend::Backend;
use crate::error::BackendError;

/// Backend driving a named shared memory object through write/read cycles.
pub struct SharedMemoryBackend {
    /// Object name, normalized to a leading `/`.
    name: String,
}

impl SharedMemoryBackend {
    pub fn new(name: &str) -> Self {
        let name = if name.starts_with('/') {
            name.to_string()
        } else {
            format!("/{}", name)
        };
        Self { name }
    }

    fn cycle_body(&self, fd: RawFd, payload: &[u8], durable: bool) -> Result<(), BackendError> {
        // SAFETY: fd is a valid descriptor opened in run_cycle
        let result = unsafe { libc::ftruncate(fd, payload.len() as libc::off_t) };
        if result < 0 {
            return Err(BackendError::Sizing {
                id: self.name.clone(),
                size: payload.len(),
                source: io::Error::last_os_error(),
            });
        }

        let mut region = MappedRegion::map(fd, payload.len(), &self.name)?;
        region.copy_from_slice(payload);

        if durable {
            if let Err(e) = region.sync() {
                tracing::warn!(
                    name = %self.name,
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

impl Backend for SharedMemoryBackend {
    fn label(&self) -> &str {
        "shared memory"
    }

    fn run_cycle(&self, payload: &[u8], durable: bool) -> Result<(), BackendError> {
        let c_name = CString::new(self.name.as_str()).map_err(|e| BackendError::Resource {
            id: self.name.clone(),
            source: io::Error::new(io::ErrorKind::InvalidInput, e),
        })?;

        // O_CREAT without O_EXCL: a stale object left by a crashed run
        // is reopened so retried runs are self-healing.
        // SAFETY: c_name is a valid CString, flags are valid POSIX flags
        let fd = unsafe { libc::shm_open(c_name.as_ptr(), libc::O_CREAT | libc::O_RDWR, 0o600) };
        if fd < 0 {
            return Err(BackendError::Resource {
                id: self.name.clone(),
                source: io::Error::last_os_error(),
            });
        }

        let result = self.cycle_body(fd, payload, durable);

        // Teardown runs on every exit path; failures are reported but
        // never abort the cycle, whose measured work is already done.
        // SAFETY: fd was opened above and is not used past this point
        if unsafe { libc::close(fd) } < 0 {
            tracing::warn!(
                name = %self.name,
                error = %io::Error::last_os_error(),
                "failed to close shared memory descriptor"
            );
        }
        // SAFETY: c_name is a valid CString
        if unsafe { libc::shm_unlink(c_name.as_ptr()) } < 0 {
            tracing::warn!(
                name = %self.name,
                error = %io::Error::last_os_error(),
                "failed to unlink shared memory object"
            );
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_normalized() {
        let backend = SharedMemoryBackend::new("bench_shm");
        assert_eq!(backend.name, "/bench_shm");

        let backend = SharedMemoryBackend::new("/bench_shm");
        assert_eq!(backend.name, "/bench_shm");
    }

    #[test]
    fn test_interior_nul_is_a_resource_error() {
        let backend = SharedMemoryBackend::new("bad\0name");
        let err = backend.run_cycle(&[0xAB], false).unwrap_err();
        assert!(matches!(err, BackendError::Resource { .. }));
    }
}
