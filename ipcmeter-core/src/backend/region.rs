//! MappedRegion - shared read-write memory mapping over a descriptor.
//!
//! Safe abstraction over mmap/msync/munmap used by the mapped backends.
//! All unsafe operations are encapsulated with bounds checking.

use std::io;
use std::os::unix::io::RawFd;
use std::ptr::NonNull;

use crate::error::BackendError;

/// A MAP_SHARED, PROT_READ|PROT_WRITE mapping over an open descriptor.
///
/// The region owns the mapping and unmaps it on drop. The descriptor
/// itself stays owned by the caller.
#[derive(Debug)]
pub struct MappedRegion {
    /// Pointer to the mapped memory.
    ptr: NonNull<u8>,
    /// Size of the mapped region in bytes.
    len: usize,
}

impl MappedRegion {
    /// Map `len` bytes of `fd` starting at offset 0.
    ///
    /// `id` is the backend identifier, used only for error context.
    pub fn map(fd: RawFd, len: usize, id: &str) -> Result<Self, BackendError> {
        // SAFETY: fd is a descriptor supplied by the caller, len comes
        // from a validated payload, offset 0 is valid
        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                fd,
                0,
            )
        };

        if ptr == libc::MAP_FAILED {
            return Err(BackendError::Mapping {
                id: id.to_string(),
                source: io::Error::last_os_error(),
            });
        }

        let ptr = NonNull::new(ptr as *mut u8).expect("mmap returned null but not MAP_FAILED");

        Ok(Self { ptr, len })
    }

    /// Size of the mapping in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copy `src` into the start of the mapping.
    ///
    /// Panics if `src` is longer than the mapping.
    pub fn copy_from_slice(&mut self, src: &[u8]) {
        assert!(src.len() <= self.len, "source exceeds mapped region");
        // SAFETY: ptr is valid for len bytes, src.len() is bounds-checked,
        // and the two regions cannot overlap
        unsafe {
            std::ptr::copy_nonoverlapping(src.as_ptr(), self.ptr.as_ptr(), src.len());
        }
    }

    /// Copy the start of the mapping into `dst`.
    ///
    /// Panics if `dst` is longer than the mapping.
    pub fn copy_to_slice(&self, dst: &mut [u8]) {
        assert!(dst.len() <= self.len, "destination exceeds mapped region");
        // SAFETY: ptr is valid for len bytes, dst.len() is bounds-checked,
        // and the two regions cannot overlap
        unsafe {
            std::ptr::copy_nonoverlapping(self.ptr.as_ptr(), dst.as_mut_ptr(), dst.len());
        }
    }

    /// Flush the mapped range to the backing object (msync MS_SYNC).
    pub fn sync(&self) -> io::Result<()> {
        // SAFETY: ptr and len were set during mapping
        let result = unsafe {
            libc::msync(self.ptr.as_ptr() as *mut libc::c_void, self.len, libc::MS_SYNC)
        };
        if result < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl Drop for MappedRegion {
    fn drop(&mut self) {
        // SAFETY: ptr and len were set during mapping
        let result = unsafe { libc::munmap(self.ptr.as_ptr() as *mut libc::c_void, self.len) };
        if result < 0 {
            tracing::warn!(
                error = %io::Error::last_os_error(),
                "failed to unmap region"
            );
        }
    }
}
