// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Report sinks: timestamped JSON files and console output.
//!
//! The JSON reporter persists raw values for later visualization; the
//! console sink converts to human units as results arrive.

use crate::metrics::{
    format_bytes_per_sec, format_latency, BenchmarkReport, BenchmarkResult, MetricKind, ReportSink,
};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("Failed to create output directory: {0}")]
    DirectoryCreation(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// JSON reporter for benchmark results.
pub struct JsonReporter {
    /// Output directory for benchmark data
    output_dir: PathBuf,
}

impl JsonReporter {
    /// Create a new JSON reporter with the specified output directory.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, ReporterError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Create a reporter using the default data directory.
    pub fn default_location() -> Result<Self, ReporterError> {
        let manifest_dir = env!("CARGO_MANIFEST_DIR");
        let data_dir = Path::new(manifest_dir).join("data");
        Self::new(data_dir)
    }

    /// Save a benchmark report to a JSON file.
    ///
    /// Returns the path to the created file.
    pub fn save(&self, report: &BenchmarkReport) -> Result<PathBuf, ReporterError> {
        let timestamp = report.timestamp.format("%Y-%m-%dT%H-%M-%SZ");
        let filename = format!("ipcmeter_{}.json", timestamp);
        let filepath = self.output_dir.join(&filename);

        let file = File::create(&filepath)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, report)?;

        Ok(filepath)
    }

    /// Load an existing benchmark report from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<BenchmarkReport, ReporterError> {
        let file = File::open(path)?;
        let report = serde_json::from_reader(file)?;
        Ok(report)
    }
}

/// Console sink printing results in human units as they arrive.
///
/// Raw values stay nanoseconds and bytes/sec in the persisted report;
/// only the presentation here converts.
pub struct ConsoleReporter;

impl ReportSink for ConsoleReporter {
    fn record(&mut self, result: &BenchmarkResult) {
        match result.kind {
            MetricKind::LatencyNs => {
                println!(
                    "{}: average latency: {}",
                    result.label,
                    format_latency(result.value)
                );
            }
            MetricKind::ThroughputBytesPerSec => {
                println!(
                    "{}: throughput: {}",
                    result.label,
                    format_bytes_per_sec(result.value)
                );
            }
        }
    }
}
