use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use engine_logging::{engine_info, engine_warn};
use ifra_core::{HarvestOutcome, HarvestSummary};
use ifra_engine::{
    ensure_output_dir, CsvExporter, ExportSummary, Harvester, IngredientSink, LogSink,
    ReqwestFetcher,
};
use ifra_harvester::cli::Args;
use ifra_harvester::config::FileConfig;
use ifra_harvester::logging;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::initialize(args.log.into(), args.verbose);

    let mut config = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    args.apply(&mut config);
    config.validate()?;
    let table = config.strategy_table()?;

    ensure_output_dir(&config.output_dir)
        .with_context(|| format!("output directory {:?}", config.output_dir))?;

    let fetcher = Arc::new(ReqwestFetcher::new(config.fetch.settings()));
    let harvester = Harvester::new(fetcher, config.harvest.clone(), table);
    let report = harvester.run_blocking(&LogSink)?;

    if report.outcome() == HarvestOutcome::AllStrategiesExhausted {
        engine_warn!(
            "No strategy produced records from {}; writing an empty dataset",
            config.harvest.base_url
        );
    }

    let exporter = CsvExporter::new(&config.output_dir, config.export.clone())
        .with_generated_utc(chrono::Utc::now().to_rfc3339());
    let written = exporter
        .persist(&report.ingredients, &report.summary)
        .context("writing harvest output")?;
    engine_info!("Export complete: {} rows", written.rows_written);

    print_summary(&report.summary, &written);
    Ok(())
}

fn print_summary(summary: &HarvestSummary, written: &ExportSummary) {
    println!("{}", "=".repeat(70));
    println!("Unique ingredients: {}", summary.total);
    println!("  with natural key:    {}", summary.with_key);
    println!("  without natural key: {}", summary.without_key);
    println!("  with NCS category:   {}", summary.with_category_code);
    println!(
        "Rows seen: {} ({} malformed, {} duplicates dropped)",
        summary.raw_rows, summary.malformed_dropped, summary.duplicates_dropped
    );
    println!(
        "Pages fetched: {} ({} transport failures)",
        summary.pages_fetched, summary.transport_failures
    );
    println!("\nBy category:");
    for (category, count) in summary.category_breakdown() {
        println!("  {category:<18} {count:>6}");
    }
    println!("\nStrategies:");
    for outcome in &summary.strategies {
        let stop = outcome
            .stop
            .map(|reason| reason.to_string())
            .unwrap_or_else(|| "unusable".to_string());
        println!(
            "  {:<16} {:<8} {:>4} pages {:>6} rows  {}",
            outcome.strategy,
            if outcome.viable { "viable" } else { "skipped" },
            outcome.pages_fetched,
            outcome.records,
            stop
        );
    }
    println!("\nSaved to: {}", written.output_path.display());
    if let Some(path) = &written.summary_path {
        println!("Summary:  {}", path.display());
    }
}
