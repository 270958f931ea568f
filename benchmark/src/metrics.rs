// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Standardized metrics types for benchmark results.
//!
//! The harness hands every measurement to a report sink as a raw value
//! in a single documented unit: nanoseconds for latency, bytes per
//! second for throughput. Unit conversion for display is a sink concern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sysinfo::System;

/// The two metrics the harness produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    /// Mean per-cycle latency, nanoseconds.
    #[serde(rename = "latency-ns")]
    LatencyNs,
    /// Sustained data rate, bytes per second.
    #[serde(rename = "throughput-bytes-per-sec")]
    ThroughputBytesPerSec,
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricKind::LatencyNs => write!(f, "latency-ns"),
            MetricKind::ThroughputBytesPerSec => write!(f, "throughput-bytes-per-sec"),
        }
    }
}

/// A single benchmark measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Backend label the measurement belongs to.
    pub label: String,
    /// Which metric `value` carries.
    pub kind: MetricKind,
    /// Nanoseconds or bytes per second, depending on `kind`.
    pub value: f64,
}

impl BenchmarkResult {
    /// Create a latency result (mean nanoseconds per cycle).
    pub fn latency(label: impl Into<String>, mean_ns: f64) -> Self {
        Self {
            label: label.into(),
            kind: MetricKind::LatencyNs,
            value: mean_ns,
        }
    }

    /// Create a throughput result (bytes per second).
    pub fn throughput(label: impl Into<String>, bytes_per_sec: f64) -> Self {
        Self {
            label: label.into(),
            kind: MetricKind::ThroughputBytesPerSec,
            value: bytes_per_sec,
        }
    }
}

/// Destination for benchmark results.
///
/// The harness produces each result once, hands it to the sinks, and
/// keeps no store of its own.
pub trait ReportSink {
    fn record(&mut self, result: &BenchmarkResult);
}

/// System information captured at benchmark time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system name
    pub os: String,
    /// OS version
    pub os_version: String,
    /// Kernel version (Linux)
    pub kernel_version: Option<String>,
    /// CPU model name
    pub cpu_model: String,
    /// Number of CPU cores
    pub cpu_cores: usize,
    /// Total system memory in bytes
    pub memory_bytes: u64,
    /// Hostname
    pub hostname: String,
}

impl SystemInfo {
    /// Collect current system information.
    pub fn collect() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();

        Self {
            os: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            kernel_version: System::kernel_version(),
            cpu_model: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            cpu_cores: sys.cpus().len(),
            memory_bytes: sys.total_memory(),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// Complete benchmark suite report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Suite identifier
    pub benchmark_suite: String,
    /// Framework version
    pub version: String,
    /// Timestamp when benchmarks were run
    pub timestamp: DateTime<Utc>,
    /// System information
    pub system_info: SystemInfo,
    /// Individual benchmark results
    pub results: Vec<BenchmarkResult>,
}

impl BenchmarkReport {
    /// Create a new benchmark report.
    pub fn new() -> Self {
        Self {
            benchmark_suite: "ipcmeter-benchmarks".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            system_info: SystemInfo::collect(),
            results: Vec::new(),
        }
    }

    /// Add a result to the report.
    pub fn add_result(&mut self, result: BenchmarkResult) {
        self.results.push(result);
    }
}

impl Default for BenchmarkReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSink for BenchmarkReport {
    fn record(&mut self, result: &BenchmarkResult) {
        self.results.push(result.clone());
    }
}

/// Format latency in human-readable form (auto-selects ns/μs/ms).
pub fn format_latency(ns: f64) -> String {
    if ns < 1_000.0 {
        format!("{:.2}ns", ns)
    } else if ns < 1_000_000.0 {
        format!("{:.2}μs", ns / 1_000.0)
    } else if ns < 1_000_000_000.0 {
        format!("{:.2}ms", ns / 1_000_000.0)
    } else {
        format!("{:.2}s", ns / 1_000_000_000.0)
    }
}

/// Format throughput in human-readable form.
pub fn format_bytes_per_sec(bps: f64) -> String {
    if bps < 1_000.0 {
        format!("{:.2} B/s", bps)
    } else if bps < 1_000_000.0 {
        format!("{:.2} KB/s", bps / 1_000.0)
    } else if bps < 1_000_000_000.0 {
        format!("{:.2} MB/s", bps / 1_000_000.0)
    } else {
        format!("{:.2} GB/s", bps / 1_000_000_000.0)
    }
}
