use std::path::Path;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use windsite::cli::cli::Args;
use windsite::config::site_config::SiteConfig;
use windsite::core::pipeline;
use windsite::utils::csv_export::CsvExporter;
use windsite::utils::logging;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logging::init_logging(args.enable_timing());

    println!("Wind Site Ranking Pipeline");
    println!(
        "Years: {:?}, top-K: {}, parallel: {}",
        args.years(),
        args.top_k(),
        !args.sequential()
    );

    let config = SiteConfig::default().with_top_k(args.top_k());
    let data_dir = Path::new(args.data_dir());

    let bar = ProgressBar::new(args.years().len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("static progress template parses")
            .progress_chars("#>-"),
    );

    let mut outcomes = Vec::with_capacity(args.years().len());
    for &year in args.years() {
        bar.set_message(format!("analyzing {year}"));
        match pipeline::run_year(year, data_dir, &config, !args.sequential()) {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => warn!(year, error = %e, "skipping year"),
        }
        bar.inc(1);
    }
    bar.finish_with_message("analysis complete");

    if outcomes.is_empty() {
        anyhow::bail!("no year produced any output; check the data directory");
    }

    let exporter = CsvExporter::new(args.output_dir(), args.verbose_logging())
        .context("failed to create output directory")?;
    exporter
        .export_analysis_results(&outcomes)
        .context("failed to export ranking results")?;

    let ranked_rows: usize = outcomes
        .iter()
        .map(|o| o.city_rankings.iter().map(|c| c.sites.len()).sum::<usize>())
        .sum();
    println!(
        "Processed {} year(s), {} ranked rows. Results saved to: {}",
        outcomes.len(),
        ranked_rows,
        exporter.output_dir().display()
    );

    logging::print_timing_report();

    Ok(())
}
