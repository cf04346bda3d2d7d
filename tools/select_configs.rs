//! Configuration Selection Tool
//!
//! Reads a parallel result file (or folder) and writes, for every matrix, the
//! best, worst and median configuration according to one metric. The output
//! drives the `perf` profiling runs:
//!
//! ```text
//! bcsstk14.mtx best 16 dynamic 64
//! bcsstk14.mtx worst 2 static 1
//! bcsstk14.mtx median 8 guided 8
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin select_configs -- results/par.json selected.txt --metric gflops
//! ```

use spmv_analysis::cli::{init_logging, CliArgs};
use spmv_analysis::{Analysis, MetricKind, Result};

const FLAGS: &[&str] = &["metric"];

fn main() {
    init_logging();
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "select_configs".to_string());

    let result = CliArgs::from_env(FLAGS).and_then(|args| {
        if args.wants_help() {
            print_usage(&program);
            return Ok(());
        }
        run(&args)
    });

    if let Err(e) = result {
        eprintln!("❌ Error: {e}");
        if e.is_usage() {
            print_usage(&program);
        }
        std::process::exit(1);
    }
}

fn print_usage(program: &str) {
    eprintln!(
        r#"
SpMV Configuration Selection

Usage:
    {program} <input.json> <output_file> [--metric <name>] [--config <file>]

Arguments:
    input.json     Parallel result file or folder of result files
    output_file    Summary to write (one `matrix kind threads scheduling chunk` line each)

Options:
    --metric       gflops | bandwidth | intensity | duration (default: gflops)
    --config       Analysis configuration (TOML or JSON)
"#
    );
}

fn run(args: &CliArgs) -> Result<()> {
    let positionals = args.expect_positionals(2)?;
    let mut config = args.load_config()?;
    if let Some(metric) = args.flag::<MetricKind>("metric")? {
        config = config.with_metric(metric);
    }

    let metric = config.selection.metric;
    let analysis = Analysis::from_config(config)?;
    let output = analysis.run_select(&positionals[0], &positionals[1])?;

    if output.configs.is_empty() {
        eprintln!("⚠️  No parallel runs found in {}", positionals[0]);
    }

    println!(
        "✅ Selected {} configuration(s) by {metric} ({}) -> {}",
        output.configs.len(),
        metric.unit(),
        output.output.display()
    );
    if output.skipped > 0 {
        println!("   {} record(s) skipped as unreadable", output.skipped);
    }
    if output.written < output.configs.len() {
        eprintln!(
            "⚠️  {} configuration(s) not written: names contain whitespace",
            output.configs.len() - output.written
        );
    }
    Ok(())
}
