// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! ipcmeter Benchmarking Framework
//!
//! Measures and compares the three OS data-path backends - buffered
//! file I/O, memory-mapped files, and POSIX shared memory - under one
//! measurement protocol.
//!
//! # Benchmark Kinds
//!
//! - **Latency**: many 1-byte non-durable cycles, each timed
//!   individually; reports the mean in nanoseconds.
//! - **Throughput**: few full-size durable cycles under a single
//!   timing window; reports bytes per second.
//!
//! # Data Output
//!
//! Results go to report sinks: a console sink with human units and a
//! JSON reporter with raw values for later visualization.

pub mod harness;
pub mod metrics;
pub mod reporter;

pub use harness::{BenchmarkHarness, HarnessError};
pub use metrics::{BenchmarkReport, BenchmarkResult, MetricKind, ReportSink, SystemInfo};
pub use reporter::{ConsoleReporter, JsonReporter};
