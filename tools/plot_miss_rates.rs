//! Cache Miss Rate Plot
//!
//! Compares L1, LLC and overall cache miss rates of the sequential run and
//! the best parallel configuration of every matrix, from `perf stat` output
//! stored as:
//!
//! ```text
//! <perf_folder>/sequential/seq_perf_<matrix>.mtx.txt
//! <perf_folder>/parallel/perf_<matrix>.mtx_best_T<t>_S<sched>_C<chunk>.txt
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin plot_miss_rates -- perf/ plots/
//! ```

use spmv_analysis::cli::{init_logging, CliArgs};
use spmv_analysis::{Analysis, Result};

fn main() {
    init_logging();
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "plot_miss_rates".to_string());

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
SpMV Cache Miss Rates

Usage:
    {program} <perf_folder> <output_folder> [--config <file>]

The perf folder must contain `sequential/` and `parallel/` subfolders.
Writes seq_best_percentmiss_scatter.png into the output folder.
"#
    );
}

fn run(args: &CliArgs) -> Result<()> {
    let positionals = args.expect_positionals(2)?;
    let analysis = Analysis::from_config(args.load_config()?)?;

    let report = analysis.run_miss_rates(&positionals[0], &positionals[1])?;

    println!(
        "✅ Miss rates for {} matrix(es) -> {}",
        report.matrices,
        report.output.display()
    );
    Ok(())
}
