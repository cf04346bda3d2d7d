//! Scheduling / Chunk Speedup Plot
//!
//! Speedup against thread count for one matrix, one curve per
//! (scheduling, chunk size) variant.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin plot_sched_chunk -- bcsstk14.mtx seq.json par.json plots/
//! ```

use spmv_analysis::cli::{init_logging, CliArgs};
use spmv_analysis::{Analysis, Result};

fn main() {
    init_logging();
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "plot_sched_chunk".to_string());

    let result = CliArgs::from_env(&[]).and_then(|args| {
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
SpMV Speedup by Scheduling and Chunk Size

Usage:
    {program} <matrix_name> <sequential.json> <parallel.json> <output_folder> [--config <file>]

Writes speedup_sched_chunk_<matrix>.png into the output folder. Fails when
the matrix has no sequential run or no parallel runs.
"#
    );
}

fn run(args: &CliArgs) -> Result<()> {
    let positionals = args.expect_positionals(4)?;
    let analysis = Analysis::from_config(args.load_config()?)?;

    let matrix = positionals[0].as_str();
    let report = analysis.run_sched_chunk(matrix, &positionals[1], &positionals[2], &positionals[3])?;

    println!("✅ {matrix} -> {}", report.output.display());
    Ok(())
}
