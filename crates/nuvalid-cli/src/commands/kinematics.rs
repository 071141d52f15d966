use crate::cli::KinematicsArgs;
use crate::config::build_kinematics_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use nuvalid::{
    core::io::{flat_tree::FlatTreeReader, kinematics_table::KinematicsTableWriter},
    engine::progress::ProgressReporter,
    workflows,
};
use tracing::info;

pub fn run(args: KinematicsArgs) -> Result<()> {
    let config = build_kinematics_config(&args)?;

    info!("Opening event table {:?}", &config.input_path);
    let reader =
        FlatTreeReader::from_path(&config.input_path).map_err(|e| CliError::FileParsing {
            path: config.input_path.clone(),
            source: e.into(),
        })?;
    let mut writer =
        KinematicsTableWriter::create(&config.output_path).map_err(|e| CliError::FileWriting {
            path: config.output_path.clone(),
            source: e.into(),
        })?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let summary = workflows::tabulate::run(
        reader,
        &config.settings,
        config.limit,
        &reporter,
        &mut writer,
    )?;
    writer.finish().map_err(|e| CliError::FileWriting {
        path: config.output_path.clone(),
        source: e.into(),
    })?;

    println!(
        "✓ {} row(s) written to: {} ({} complete, {} without nucleon, {} inconsistent)",
        summary.rows,
        config.output_path.display(),
        summary.complete,
        summary.no_nucleon,
        summary.inconsistent
    );
    Ok(())
}
