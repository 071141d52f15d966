use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "nuvalid - kinematic reconstruction and histogramming of neutrino-interaction event records for generator validation.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fill and normalise the distributions of an analysis plan from an event table.
    Analyze(AnalyzeArgs),
    /// Write the per-event kinematics (Q², W, x, y, ν, binding energy) as a CSV table.
    Kinematics(KinematicsArgs),
    /// List the quantity names accepted in analysis plans.
    Catalog,
}

/// Kinematics constants shared by the commands that reconstruct events.
#[derive(Args, Debug, Clone, Default)]
pub struct KinematicsOverrides {
    /// Override the nucleon mass of the experimentalist conventions, in GeV.
    #[arg(long, value_name = "GEV")]
    pub nucleon_mass: Option<f64>,

    /// Override the target-nucleus mass used for the binding energy, in GeV.
    #[arg(long, value_name = "GEV")]
    pub target_mass: Option<f64>,

    /// Override the allowed difference between recomputed and stored Q², in GeV².
    #[arg(long, value_name = "GEV2")]
    pub q2_tolerance: Option<f64>,
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    // --- Core Arguments ---
    /// Path to the input event table (flat-tree CSV).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Directory that receives one CSV per histogram and a manifest.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    /// Path to an analysis plan in TOML format. Without it the default ν_μ CCQE plan is used.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Normalisation Overrides ---
    /// Leave histograms as weighted event counts instead of event rates.
    #[arg(long)]
    pub no_normalization: bool,

    /// Multiply each event weight by the record's cross-section scale factor.
    #[arg(long)]
    pub use_scale_factor: bool,

    #[command(flatten)]
    pub kinematics: KinematicsOverrides,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S kinematics.target-mass=37.2
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `kinematics` subcommand.
#[derive(Args, Debug)]
pub struct KinematicsArgs {
    /// Path to the input event table (flat-tree CSV).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path of the CSV table to write.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to a TOML file; only its `[kinematics]` table is used.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Stop after this many events.
    #[arg(short = 'n', long, value_name = "INT")]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub kinematics: KinematicsOverrides,

    /// Set a specific configuration value, overriding the config file.
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
