use crate::cli::AnalyzeArgs;
use crate::config::build_analyze_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use nuvalid::{
    core::io::{flat_tree::FlatTreeReader, histogram_csv},
    engine::progress::ProgressReporter,
    workflows,
};
use tracing::{info, warn};

pub fn run(args: AnalyzeArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config = build_analyze_config(&args)?;

    info!("Opening event table {:?}", &config.input_path);
    let reader =
        FlatTreeReader::from_path(&config.input_path).map_err(|e| CliError::FileParsing {
            path: config.input_path.clone(),
            source: e.into(),
        })?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Filling {} distribution(s)...",
        config.plan.distributions.len()
    );
    let result = workflows::analyze::run(reader, &config.plan, &reporter)?;

    if result.events_selected == 0 {
        warn!("No event passed any selection; histograms are empty.");
        println!("Warning: no event passed any selection.");
    }

    histogram_csv::write_histograms(&config.output_dir, &result.histograms).map_err(|e| {
        CliError::FileWriting {
            path: config.output_dir.clone(),
            source: e.into(),
        }
    })?;

    println!(
        "✓ {} event(s) read, {} selected. {} histogram(s) written to: {}",
        result.events_processed,
        result.events_selected,
        result.histograms.len(),
        config.output_dir.display()
    );
    if result.skipped.no_nucleon > 0 {
        println!(
            "  {} nucleon-dependent fill(s) skipped for events without a struck nucleon.",
            result.skipped.no_nucleon
        );
    }
    Ok(())
}
