// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! CLI tool to run the ipcmeter benchmark suite and generate reports.

use anyhow::Context;
use clap::Parser;
use ipcmeter_benchmark::{
    BenchmarkHarness, BenchmarkReport, ConsoleReporter, JsonReporter, ReportSink,
};
use ipcmeter_core::backend::{Backend, FileBackend, MmapBackend, SharedMemoryBackend, PROBE_BYTE};
use ipcmeter_core::config::{BenchConfig, ConfigLoader};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "run_benchmarks")]
#[command(about = "Run ipcmeter benchmarks and generate JSON reports")]
struct Args {
    /// Benchmark configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for benchmark data
    #[arg(short, long, default_value = "data")]
    output: PathBuf,

    /// Run in quick mode (smaller payload, fewer iterations)
    #[arg(long)]
    quick: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_file(path).context("loading benchmark configuration")?,
        None => BenchConfig::default(),
    };
    if args.quick {
        config.payload_size_bytes = 1_048_576;
        config.latency_iterations = 1_000;
        config.throughput_iterations = 5;
    }

    println!("ipcmeter Benchmark Suite");
    println!("========================");
    println!("Payload size: {} bytes", config.payload_size_bytes);
    println!("Latency iterations: {}", config.latency_iterations);
    println!("Throughput iterations: {}", config.throughput_iterations);
    println!();

    let reporter = JsonReporter::new(&args.output)?;
    let mut report = BenchmarkReport::new();
    let mut console = ConsoleReporter;

    let backends: Vec<Box<dyn Backend>> = vec![
        Box::new(FileBackend::new(&config.file_path)),
        Box::new(MmapBackend::new(&config.mmap_path)),
        Box::new(SharedMemoryBackend::new(&config.shm_name)),
    ];

    let harness = BenchmarkHarness::new();
    let payload = vec![PROBE_BYTE; config.payload_size_bytes];

    // Backends run strictly one after another: every cycle unlinks its
    // backing identifier on cleanup, so overlapping runs against one
    // identifier would race re-creation.
    for backend in &backends {
        println!("Benchmarking {}...", backend.label());

        let latency = harness
            .measure_latency(backend.as_ref(), config.latency_iterations)
            .with_context(|| format!("latency run failed for {}", backend.label()))?;
        console.record(&latency);
        report.record(&latency);

        let throughput = harness
            .measure_throughput(backend.as_ref(), config.throughput_iterations, &payload)
            .with_context(|| format!("throughput run failed for {}", backend.label()))?;
        console.record(&throughput);
        report.record(&throughput);

        println!();
    }

    let path = reporter.save(&report)?;
    println!("Benchmark report saved to: {:?}", path);

    Ok(())
}
