// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Benchmark harness driving backends through timed cycles.
//!
//! One runner serves all backends. Latency is many 1-byte non-durable
//! cycles timed individually to isolate per-call fixed overhead;
//! throughput is a few full-size durable cycles under a single outer
//! timing window so clock calls stay out of the measurement.

use ipcmeter_core::backend::{Backend, PROBE_BYTE};
use ipcmeter_core::clock::{elapsed_nanos, Clock, MonotonicClock};
use ipcmeter_core::error::BackendError;
use thiserror::Error;

use crate::metrics::BenchmarkResult;

/// Errors produced by the benchmark runners.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Iteration count must be greater than zero")]
    InvalidIterations,

    #[error("Throughput payload must not be empty")]
    EmptyPayload,

    #[error("Backend cycle failed: {0}")]
    Backend(#[from] BackendError),
}

/// Drives a backend through the two measurement protocols.
///
/// The clock is injectable so tests can script timestamps; production
/// code uses the monotonic default.
pub struct BenchmarkHarness<C = MonotonicClock> {
    clock: C,
}

impl BenchmarkHarness<MonotonicClock> {
    /// Create a harness backed by the monotonic system clock.
    pub fn new() -> Self {
        Self {
            clock: MonotonicClock::new(),
        }
    }
}

impl Default for BenchmarkHarness<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> BenchmarkHarness<C> {
    /// Create a harness with an injected clock.
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Measure per-cycle latency: `iterations` 1-byte non-durable
    /// cycles, each timed individually; reports the arithmetic mean in
    /// nanoseconds.
    ///
    /// The 1-byte payload with durability off isolates per-call fixed
    /// overhead from data-volume cost and from the highly variable cost
    /// of a sync. Any cycle failure aborts the run: a mean over fewer
    /// than the configured iterations is never produced.
    pub fn measure_latency(
        &self,
        backend: &dyn Backend,
        iterations: u64,
    ) -> Result<BenchmarkResult, HarnessError> {
        if iterations == 0 {
            return Err(HarnessError::InvalidIterations);
        }

        let payload = [PROBE_BYTE];
        let mut total_ns: u64 = 0;

        for _ in 0..iterations {
            let start = self.clock.now();
            backend.run_cycle(&payload, false)?;
            let end = self.clock.now();
            total_ns += elapsed_nanos(start, end);
        }

        let mean_ns = total_ns as f64 / iterations as f64;
        Ok(BenchmarkResult::latency(backend.label(), mean_ns))
    }

    /// Measure sustained throughput: `iterations` durable cycles with
    /// the full payload under a single timing window; reports bytes per
    /// second as `payload.len() * iterations / elapsed_seconds`.
    ///
    /// Durability is forced so the figure reflects the cost of actually
    /// committing data, not just buffering it. Any cycle failure aborts
    /// the run.
    pub fn measure_throughput(
        &self,
        backend: &dyn Backend,
        iterations: u64,
        payload: &[u8],
    ) -> Result<BenchmarkResult, HarnessError> {
        if iterations == 0 {
            return Err(HarnessError::InvalidIterations);
        }
        if payload.is_empty() {
            return Err(HarnessError::EmptyPayload);
        }

        let start = self.clock.now();
        for _ in 0..iterations {
            backend.run_cycle(payload, true)?;
        }
        let end = self.clock.now();

        let elapsed_secs = elapsed_nanos(start, end) as f64 / 1_000_000_000.0;
        let total_bytes = payload.len() as u64 * iterations;
        let bytes_per_sec = total_bytes as f64 / elapsed_secs;

        Ok(BenchmarkResult::throughput(backend.label(), bytes_per_sec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricKind;
    use ipcmeter_core::clock::Timestamp;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::io;

    /// Clock returning pre-scripted timestamps.
    struct ScriptedClock {
        times: RefCell<VecDeque<u64>>,
    }

    impl ScriptedClock {
        fn new(times: &[u64]) -> Self {
            Self {
                times: RefCell::new(times.iter().copied().collect()),
            }
        }
    }

    impl Clock for ScriptedClock {
        fn now(&self) -> Timestamp {
            Timestamp::from_nanos(
                self.times
                    .borrow_mut()
                    .pop_front()
                    .expect("scripted clock exhausted"),
            )
        }
    }

    /// Instrumented in-memory stand-in for a backend. Mirrors a real
    /// cycle: stores the payload, optionally "fails" its sync step the
    /// way real backends treat a sync failure (warn and continue), and
    /// verifies the read-back against the written bytes.
    struct MemoryBackend {
        cycles: Cell<u64>,
        sync_fails: bool,
        sync_failures: Cell<u64>,
    }

    impl MemoryBackend {
        fn new() -> Self {
            Self {
                cycles: Cell::new(0),
                sync_fails: false,
                sync_failures: Cell::new(0),
            }
        }

        fn with_failing_sync() -> Self {
            Self {
                cycles: Cell::new(0),
                sync_fails: true,
                sync_failures: Cell::new(0),
            }
        }
    }

    impl Backend for MemoryBackend {
        fn label(&self) -> &str {
            "memory"
        }

        fn run_cycle(&self, payload: &[u8], durable: bool) -> Result<(), BackendError> {
            self.cycles.set(self.cycles.get() + 1);

            let stored = payload.to_vec();
            if durable && self.sync_fails {
                // the write is considered complete regardless
                self.sync_failures.set(self.sync_failures.get() + 1);
            }
            let readback = stored.clone();
            assert_eq!(crc32fast::hash(payload), crc32fast::hash(&readback));
            assert_eq!(payload, readback.as_slice());

            Ok(())
        }
    }

    /// Backend whose first cycle fails with a resource error.
    struct FailingBackend {
        attempts: Cell<u64>,
    }

    impl FailingBackend {
        fn new() -> Self {
            Self {
                attempts: Cell::new(0),
            }
        }
    }

    impl Backend for FailingBackend {
        fn label(&self) -> &str {
            "failing"
        }

        fn run_cycle(&self, _payload: &[u8], _durable: bool) -> Result<(), BackendError> {
            self.attempts.set(self.attempts.get() + 1);
            Err(BackendError::Resource {
                id: "failing".to_string(),
                source: io::Error::new(io::ErrorKind::Other, "injected failure"),
            })
        }
    }

    #[test]
    fn test_latency_reports_mean_of_samples() {
        // two iterations: samples of 10ns and 30ns
        let clock = ScriptedClock::new(&[0, 10, 20, 50]);
        let harness = BenchmarkHarness::with_clock(clock);
        let backend = MemoryBackend::new();

        let result = harness.measure_latency(&backend, 2).expect("run failed");
        assert_eq!(result.kind, MetricKind::LatencyNs);
        assert_eq!(result.label, "memory");
        assert!((result.value - 20.0).abs() < f64::EPSILON);
        assert_eq!(backend.cycles.get(), 2);
    }

    #[test]
    fn test_throughput_formula_is_exact() {
        // 10 cycles of 1024 bytes over exactly one second
        let clock = ScriptedClock::new(&[0, 1_000_000_000]);
        let harness = BenchmarkHarness::with_clock(clock);
        let backend = MemoryBackend::new();
        let payload = vec![0xAB; 1024];

        let result = harness
            .measure_throughput(&backend, 10, &payload)
            .expect("run failed");
        assert_eq!(result.kind, MetricKind::ThroughputBytesPerSec);
        assert!((result.value - 10_240.0).abs() < f64::EPSILON);
        assert_eq!(backend.cycles.get(), 10);
    }

    #[test]
    fn test_zero_iterations_rejected_before_any_cycle() {
        let harness = BenchmarkHarness::new();
        let backend = MemoryBackend::new();

        let err = harness.measure_latency(&backend, 0).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidIterations));

        let err = harness.measure_throughput(&backend, 0, &[1, 2, 3]).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidIterations));

        assert_eq!(backend.cycles.get(), 0);
    }

    #[test]
    fn test_empty_payload_rejected() {
        let harness = BenchmarkHarness::new();
        let backend = MemoryBackend::new();

        let err = harness.measure_throughput(&backend, 10, &[]).unwrap_err();
        assert!(matches!(err, HarnessError::EmptyPayload));
        assert_eq!(backend.cycles.get(), 0);
    }

    #[test]
    fn test_first_cycle_failure_aborts_latency_run() {
        let harness = BenchmarkHarness::new();
        let backend = FailingBackend::new();

        let err = harness.measure_latency(&backend, 100_000).unwrap_err();
        assert!(matches!(err, HarnessError::Backend(_)));
        // exactly one attempt, no partial accumulation reported
        assert_eq!(backend.attempts.get(), 1);
    }

    #[test]
    fn test_first_cycle_failure_aborts_throughput_run() {
        let harness = BenchmarkHarness::new();
        let backend = FailingBackend::new();

        let err = harness.measure_throughput(&backend, 10, &[0xAB; 64]).unwrap_err();
        assert!(matches!(err, HarnessError::Backend(_)));
        assert_eq!(backend.attempts.get(), 1);
    }

    #[test]
    fn test_sync_failure_does_not_abort_the_benchmark() {
        let clock = ScriptedClock::new(&[0, 500_000_000]);
        let harness = BenchmarkHarness::with_clock(clock);
        let backend = MemoryBackend::with_failing_sync();

        let result = harness
            .measure_throughput(&backend, 2, &[0xAB; 512])
            .expect("sync failure must not abort the run");
        assert_eq!(backend.cycles.get(), 2);
        assert_eq!(backend.sync_failures.get(), 2);
        assert!(result.value > 0.0);
    }

    #[test]
    fn test_latency_run_completes_all_iterations() {
        let harness = BenchmarkHarness::new();
        let backend = MemoryBackend::new();

        let result = harness.measure_latency(&backend, 50).expect("run failed");
        assert_eq!(backend.cycles.get(), 50);
        assert!(result.value >= 0.0);
    }
}
