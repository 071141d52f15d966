use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileKinematicsConfig {
    pub nucleon_mass: Option<f64>,
    pub target_mass: Option<f64>,
    pub q2_tolerance: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileNormalizationConfig {
    pub enabled: Option<bool>,
    pub fhc_integrated_flux: Option<f64>,
    pub rhc_integrated_flux: Option<f64>,
    pub nucleon_tonne_scale: Option<f64>,
    pub pot_per_year: Option<f64>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum FileSelection {
    NuMode {
        name: String,
        pdg: i32,
        current: String,
        /// Any class when omitted.
        class: Option<String>,
    },
    #[serde(rename_all = "kebab-case")]
    Cc1pi {
        name: String,
        pdg: i32,
        #[serde(default)]
        charged_only: bool,
    },
}

impl FileSelection {
    pub fn name(&self) -> &str {
        match self {
            FileSelection::NuMode { name, .. } | FileSelection::Cc1pi { name, .. } => name,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileDistribution {
    pub selection: String,
    /// Quantity shorthands; `catalog` expands to the full reference catalog.
    pub quantities: Vec<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub use_scale_factor: Option<bool>,
    pub kinematics: Option<FileKinematicsConfig>,
    pub normalization: Option<FileNormalizationConfig>,
    #[serde(default, rename = "selection")]
    pub selections: Vec<FileSelection>,
    #[serde(default, rename = "distribution")]
    pub distributions: Vec<FileDistribution>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
