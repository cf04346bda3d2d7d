//! Strong Scalability Plot
//!
//! Best parallel duration per thread count for every matrix, against the
//! ideal `T_seq / threads` line, on log-log axes.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin plot_strong_scalability -- seq.json par.json plots/
//! ```

use spmv_analysis::cli::{init_logging, CliArgs};
use spmv_analysis::{Analysis, Result};

fn main() {
    init_logging();
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "plot_strong_scalability".to_string());

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
SpMV Strong Scalability

Usage:
    {program} <sequential.json> <parallel.json> <output_folder> [--config <file>]

Writes spmv_strong_scalability.png into the output folder.
"#
    );
}

fn run(args: &CliArgs) -> Result<()> {
    let positionals = args.expect_positionals(3)?;
    let analysis = Analysis::from_config(args.load_config()?)?;

    let report = analysis.run_strong_scalability(&positionals[0], &positionals[1], &positionals[2])?;

    println!(
        "✅ Strong scalability for {} matrix(es) -> {}",
        report.matrices,
        report.output.display()
    );
    Ok(())
}
