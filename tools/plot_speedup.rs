//! Speedup Plot
//!
//! Best speedup per thread count for every matrix that has a sequential
//! baseline. The peak of each curve is marked and annotated with its
//! scheduling and chunk size.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin plot_speedup -- seq.json par.json plots/
//! ```

use spmv_analysis::cli::{init_logging, CliArgs};
use spmv_analysis::{Analysis, Result};

fn main() {
    init_logging();
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "plot_speedup".to_string());

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
SpMV Speedup

Usage:
    {program} <sequential.json> <parallel.json> <output_folder> [--config <file>]

Writes spmv_speedup.png into the output folder. Matrices without a
sequential run are left out.
"#
    );
}

fn run(args: &CliArgs) -> Result<()> {
    let positionals = args.expect_positionals(3)?;
    let analysis = Analysis::from_config(args.load_config()?)?;

    let report = analysis.run_speedup(&positionals[0], &positionals[1], &positionals[2])?;

    if report.matrices == 0 {
        eprintln!("⚠️  No matrix has both a sequential and a parallel run");
    }
    println!(
        "✅ Speedup for {} matrix(es) -> {}",
        report.matrices,
        report.output.display()
    );
    Ok(())
}
