use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileKinematicsConfig, FileNormalizationConfig, FileSelection};
use super::models::{AnalyzeConfig, KinematicsConfig};
use crate::cli::{AnalyzeArgs, KinematicsArgs, KinematicsOverrides};
use crate::error::{CliError, Result};
use crate::utils::parser::{self, ParseError};
use nuvalid::core::physics::classifier::{Current, InteractionClass};
use nuvalid::core::physics::kinematics::KinematicsSettings;
use nuvalid::engine::config::AnalysisPlanBuilder;
use nuvalid::engine::distribution;
use nuvalid::engine::normalization::Normalization;
use nuvalid::engine::selection::Selection;
use std::path::Path;
use tracing::{debug, info};

pub fn build_analyze_config(args: &AnalyzeArgs) -> Result<AnalyzeConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = load_file_config(args.config.as_deref())?;
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let kinematics = merge_kinematics(
        &args.kinematics,
        file_config.kinematics.take().unwrap_or_default(),
        &defaults,
    );
    let normalization = merge_normalization(
        args.no_normalization,
        file_config.normalization.take().unwrap_or_default(),
        &defaults,
    );
    let use_scale_factor = args.use_scale_factor
        || file_config
            .use_scale_factor
            .unwrap_or(defaults.use_scale_factor);

    let builder = if file_config.selections.is_empty() && file_config.distributions.is_empty() {
        info!("No selections configured; using the default ν_μ CCQE plan.");
        distribution::default_plan()
    } else {
        plan_from_file(&file_config)?
    };

    let plan = builder
        .kinematics(kinematics)
        .normalization(normalization)
        .use_scale_factor(use_scale_factor)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;
    debug!(
        normalization = ?plan.normalization,
        kinematics = ?plan.kinematics,
        "Analysis plan assembled."
    );

    Ok(AnalyzeConfig {
        input_path: args.input.clone(),
        output_dir: args.output.clone(),
        plan,
    })
}

pub fn build_kinematics_config(args: &KinematicsArgs) -> Result<KinematicsConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = load_file_config(args.config.as_deref())?;
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let settings = merge_kinematics(
        &args.kinematics,
        file_config.kinematics.take().unwrap_or_default(),
        &defaults,
    );
    if !(settings.q2_tolerance >= 0.0) {
        return Err(CliError::Config(
            "`kinematics.q2-tolerance` must be non-negative.".to_string(),
        ));
    }

    Ok(KinematicsConfig {
        input_path: args.input.clone(),
        output_path: args.output.clone(),
        limit: args.limit,
        settings,
    })
}

fn load_file_config(path: Option<&Path>) -> Result<FileConfig> {
    match path {
        Some(path) => FileConfig::from_file(path),
        None => Ok(FileConfig::default()),
    }
}

fn merge_kinematics(
    cli: &KinematicsOverrides,
    file_val: FileKinematicsConfig,
    defaults: &DefaultsConfig,
) -> KinematicsSettings {
    KinematicsSettings {
        nucleon_mass: cli
            .nucleon_mass
            .or(file_val.nucleon_mass)
            .unwrap_or(defaults.nucleon_mass),
        target_mass: cli
            .target_mass
            .or(file_val.target_mass)
            .unwrap_or(defaults.target_mass),
        q2_tolerance: cli
            .q2_tolerance
            .or(file_val.q2_tolerance)
            .unwrap_or(defaults.q2_tolerance),
    }
}

fn merge_normalization(
    cli_disabled: bool,
    file_val: FileNormalizationConfig,
    defaults: &DefaultsConfig,
) -> Normalization {
    if cli_disabled || !file_val.enabled.unwrap_or(defaults.normalize) {
        return Normalization::None;
    }
    Normalization::FluxExposure {
        fhc_integrated_flux: file_val
            .fhc_integrated_flux
            .unwrap_or(defaults.fhc_integrated_flux),
        rhc_integrated_flux: file_val
            .rhc_integrated_flux
            .unwrap_or(defaults.rhc_integrated_flux),
        nucleon_tonne_scale: file_val
            .nucleon_tonne_scale
            .unwrap_or(defaults.nucleon_tonne_scale),
        pot_per_year: file_val.pot_per_year.unwrap_or(defaults.pot_per_year),
    }
}

fn plan_from_file(file_config: &FileConfig) -> Result<AnalysisPlanBuilder> {
    let mut builder = AnalysisPlanBuilder::new();
    for selection in &file_config.selections {
        builder = builder.selection(selection.name(), convert_selection(selection)?);
    }
    for dist in &file_config.distributions {
        let quantities = parser::parse_quantities(dist.quantities.as_slice())
            .map_err(|e| CliError::Config(format!("selection '{}': {}", dist.selection, e)))?;
        builder = builder.distributions(quantities, &dist.selection);
    }
    Ok(builder)
}

fn convert_selection(selection: &FileSelection) -> Result<Selection> {
    match selection {
        FileSelection::NuMode {
            name,
            pdg,
            current,
            class,
        } => {
            let current: Current = current
                .parse()
                .map_err(|e| CliError::Config(format!("Selection '{name}': {e}.")))?;
            let class = match class {
                Some(c) => c
                    .parse()
                    .map_err(|e| CliError::Config(format!("Selection '{name}': {e}.")))?,
                None => InteractionClass::Undefined,
            };
            Ok(Selection::NuMode {
                pdg: *pdg,
                current,
                class,
            })
        }
        FileSelection::Cc1pi {
            pdg, charged_only, ..
        } => Ok(Selection::Cc1Pi {
            pdg: *pdg,
            charged_only: *charged_only,
        }),
    }
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    let to_config = |e: ParseError| CliError::Config(e.to_string());

    for kv_pair in set_values {
        let (key, value) = parser::parse_set_value(kv_pair).map_err(to_config)?;
        match key {
            "use-scale-factor" => {
                config.use_scale_factor = Some(parser::parse_bool(key, value).map_err(to_config)?);
            }
            "kinematics.nucleon-mass" => {
                config
                    .kinematics
                    .get_or_insert_with(Default::default)
                    .nucleon_mass = Some(parser::parse_f64(key, value).map_err(to_config)?);
            }
            "kinematics.target-mass" => {
                config
                    .kinematics
                    .get_or_insert_with(Default::default)
                    .target_mass = Some(parser::parse_f64(key, value).map_err(to_config)?);
            }
            "kinematics.q2-tolerance" => {
                config
                    .kinematics
                    .get_or_insert_with(Default::default)
                    .q2_tolerance = Some(parser::parse_f64(key, value).map_err(to_config)?);
            }
            "normalization.enabled" => {
                config
                    .normalization
                    .get_or_insert_with(Default::default)
                    .enabled = Some(parser::parse_bool(key, value).map_err(to_config)?);
            }
            "normalization.fhc-integrated-flux" => {
                config
                    .normalization
                    .get_or_insert_with(Default::default)
                    .fhc_integrated_flux = Some(parser::parse_f64(key, value).map_err(to_config)?);
            }
            "normalization.rhc-integrated-flux" => {
                config
                    .normalization
                    .get_or_insert_with(Default::default)
                    .rhc_integrated_flux = Some(parser::parse_f64(key, value).map_err(to_config)?);
            }
            "normalization.nucleon-tonne-scale" => {
                config
                    .normalization
                    .get_or_insert_with(Default::default)
                    .nucleon_tonne_scale = Some(parser::parse_f64(key, value).map_err(to_config)?);
            }
            "normalization.pot-per-year" => {
                config
                    .normalization
                    .get_or_insert_with(Default::default)
                    .pot_per_year = Some(parser::parse_f64(key, value).map_err(to_config)?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{key}'"
                )));
            }
        }
    }
    Ok(config)
}
