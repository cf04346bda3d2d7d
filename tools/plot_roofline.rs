//! Roofline Plot
//!
//! Places the best run of every matrix under the roofline
//! `min(intensity × bandwidth, peak)`.
//!
//! The roofs come from the configuration. Without an explicit peak the
//! theoretical peak of the machine recorded in the results is used
//! (`cores × GHz × flops_per_cycle`).
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin plot_roofline -- par.json plots/ --bandwidth 204.8 --peak 1536
//! ```

use spmv_analysis::cli::{init_logging, CliArgs};
use spmv_analysis::{Analysis, Result};

const FLAGS: &[&str] = &["bandwidth", "peak"];

fn main() {
    init_logging();
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "plot_roofline".to_string());

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
SpMV Roofline

Usage:
    {program} <parallel.json> <output_folder> [--bandwidth <GB/s>] [--peak <GFLOP/s>] [--config <file>]

Options:
    --bandwidth    Peak memory bandwidth (default: 400)
    --peak         Peak compute (default: derived from the recorded hardware)

Writes roofline_spmv_bestpoints_config.png into the output folder.
"#
    );
}

fn run(args: &CliArgs) -> Result<()> {
    let positionals = args.expect_positionals(2)?;
    let mut config = args.load_config()?;
    if let Some(bandwidth) = args.flag_f64("bandwidth")? {
        config = config.with_peak_bandwidth(bandwidth);
    }
    if let Some(peak) = args.flag_f64("peak")? {
        config = config.with_peak_gflops(peak);
    }

    let analysis = Analysis::from_config(config)?;
    let report = analysis.run_roofline(&positionals[0], &positionals[1])?;

    println!(
        "✅ Roofline with {} matrix(es) -> {}",
        report.matrices,
        report.output.display()
    );
    Ok(())
}
