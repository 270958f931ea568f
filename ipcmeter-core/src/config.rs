// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML configuration parser with strict schema validation.
//!
//! Sizes, iteration counts, and backend identifiers are validated at
//! load time. Any invalid field results in a ConfigError before a
//! benchmark run can start; the config is immutable afterwards.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Raw configuration as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
struct RawBenchConfig {
    #[serde(default = "default_payload_size")]
    payload_size_bytes: usize,
    #[serde(default = "default_latency_iterations")]
    latency_iterations: u64,
    #[serde(default = "default_throughput_iterations")]
    throughput_iterations: u64,
    #[serde(default = "default_file_path")]
    file_path: String,
    #[serde(default = "default_mmap_path")]
    mmap_path: String,
    #[serde(default = "default_shm_name")]
    shm_name: String,
}

fn default_payload_size() -> usize {
    10_485_760 // 10MB
}

fn default_latency_iterations() -> u64 {
    100_000
}

fn default_throughput_iterations() -> u64 {
    10
}

fn default_file_path() -> String {
    "ipc_bench_file.dat".to_string()
}

fn default_mmap_path() -> String {
    "ipc_bench_mmap.dat".to_string()
}

fn default_shm_name() -> String {
    "ipc_bench_shm".to_string()
}

impl Default for RawBenchConfig {
    fn default() -> Self {
        Self {
            payload_size_bytes: default_payload_size(),
            latency_iterations: default_latency_iterations(),
            throughput_iterations: default_throughput_iterations(),
            file_path: default_file_path(),
            mmap_path: default_mmap_path(),
            shm_name: default_shm_name(),
        }
    }
}

/// Validated benchmark configuration.
///
/// The three backend identifiers are distinct on purpose: every cycle
/// unlinks its identifier on cleanup, so two backends sharing one would
/// race re-creation if runs ever overlapped.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub payload_size_bytes: usize,
    pub latency_iterations: u64,
    pub throughput_iterations: u64,
    pub file_path: PathBuf,
    pub mmap_path: PathBuf,
    pub shm_name: String,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            payload_size_bytes: default_payload_size(),
            latency_iterations: default_latency_iterations(),
            throughput_iterations: default_throughput_iterations(),
            file_path: PathBuf::from(default_file_path()),
            mmap_path: PathBuf::from(default_mmap_path()),
            shm_name: default_shm_name(),
        }
    }
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> Result<BenchConfig, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;

        Self::from_yaml_str(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    /// An empty document yields the defaults.
    pub fn from_yaml_str(contents: &str) -> Result<BenchConfig, ConfigError> {
        if contents.trim().is_empty() {
            return Self::validate(RawBenchConfig::default());
        }

        let raw: RawBenchConfig =
            serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
                message: e.to_string(),
            })?;

        Self::validate(raw)
    }

    fn validate(raw: RawBenchConfig) -> Result<BenchConfig, ConfigError> {
        if raw.payload_size_bytes == 0 {
            return Err(ConfigError::InvalidFieldValue {
                field: "payload_size_bytes",
                value: raw.payload_size_bytes.to_string(),
                reason: "payload size must be greater than zero".to_string(),
            });
        }

        if raw.latency_iterations == 0 {
            return Err(ConfigError::InvalidFieldValue {
                field: "latency_iterations",
                value: raw.latency_iterations.to_string(),
                reason: "iteration count must be greater than zero".to_string(),
            });
        }

        if raw.throughput_iterations == 0 {
            return Err(ConfigError::InvalidFieldValue {
                field: "throughput_iterations",
                value: raw.throughput_iterations.to_string(),
                reason: "iteration count must be greater than zero".to_string(),
            });
        }

        if raw.file_path.is_empty() {
            return Err(ConfigError::InvalidFieldValue {
                field: "file_path",
                value: raw.file_path,
                reason: "backing path must not be empty".to_string(),
            });
        }

        if raw.mmap_path.is_empty() {
            return Err(ConfigError::InvalidFieldValue {
                field: "mmap_path",
                value: raw.mmap_path,
                reason: "backing path must not be empty".to_string(),
            });
        }

        if raw.file_path == raw.mmap_path {
            return Err(ConfigError::InvalidFieldValue {
                field: "mmap_path",
                value: raw.mmap_path,
                reason: "file and mmap backends must not share a backing path".to_string(),
            });
        }

        if raw.shm_name.is_empty() {
            return Err(ConfigError::InvalidFieldValue {
                field: "shm_name",
                value: raw.shm_name,
                reason: "shared memory name must not be empty".to_string(),
            });
        }

        // POSIX shm names are a single path component in their own namespace
        if raw.shm_name.contains('/') || raw.shm_name.contains('\0') {
            return Err(ConfigError::InvalidFieldValue {
                field: "shm_name",
                value: raw.shm_name,
                reason: "shared memory name must not contain '/' or NUL".to_string(),
            });
        }

        Ok(BenchConfig {
            payload_size_bytes: raw.payload_size_bytes,
            latency_iterations: raw.latency_iterations,
            throughput_iterations: raw.throughput_iterations,
            file_path: PathBuf::from(raw.file_path),
            mmap_path: PathBuf::from(raw.mmap_path),
            shm_name: raw.shm_name,
        })
    }
}
