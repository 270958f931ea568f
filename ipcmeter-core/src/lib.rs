//! ipcmeter Core Library
//!
//! Backend lifecycles and timing primitives for the ipcmeter benchmark
//! suite. Provides the backend capability trait with its three variants
//! (buffered file I/O, mmap, POSIX shared memory), the monotonic clock,
//! and configuration parsing.

pub mod backend;
pub mod clock;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use backend::{Backend, FileBackend, MmapBackend, SharedMemoryBackend, PROBE_BYTE};
pub use clock::{elapsed_nanos, Clock, MonotonicClock, Timestamp};
pub use config::{BenchConfig, ConfigLoader};
pub use error::{BackendError, BackendResult, ConfigError};
