use super::normalization::Normalization;
use super::quantity::Quantity;
use super::selection::{NamedSelection, Selection};
use crate::core::physics::kinematics::KinematicsSettings;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Distribution '{quantity}' refers to unknown selection '{selection}'")]
    UnknownSelection { quantity: String, selection: String },

    #[error("Selection '{0}' is defined more than once")]
    DuplicateSelection(String),

    #[error("Histogram '{0}' would be produced more than once")]
    DuplicateHistogram(String),

    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// A quantity filled for every event that passes the named selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionSpec {
    pub quantity: Quantity,
    pub selection: String,
}

/// Everything the analysis workflow needs to fill and normalise a set of histograms.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPlan {
    pub selections: Vec<NamedSelection>,
    pub distributions: Vec<DistributionSpec>,
    pub normalization: Normalization,
    pub kinematics: KinematicsSettings,
    /// Multiply the per-event weight by the record's cross-section scale factor.
    pub use_scale_factor: bool,
}

impl AnalysisPlan {
    pub fn selection(&self, name: &str) -> Option<&NamedSelection> {
        self.selections.iter().find(|s| s.name == name)
    }
}

#[derive(Default)]
pub struct AnalysisPlanBuilder {
    selections: Vec<NamedSelection>,
    distributions: Vec<DistributionSpec>,
    normalization: Option<Normalization>,
    kinematics: Option<KinematicsSettings>,
    use_scale_factor: bool,
}

impl AnalysisPlanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(mut self, name: impl Into<String>, selection: Selection) -> Self {
        self.selections.push(NamedSelection::new(name, selection));
        self
    }
    pub fn distribution(mut self, quantity: Quantity, selection: impl Into<String>) -> Self {
        self.distributions.push(DistributionSpec {
            quantity,
            selection: selection.into(),
        });
        self
    }
    pub fn distributions(
        mut self,
        quantities: impl IntoIterator<Item = Quantity>,
        selection: &str,
    ) -> Self {
        for quantity in quantities {
            self = self.distribution(quantity, selection);
        }
        self
    }
    pub fn normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = Some(normalization);
        self
    }
    pub fn kinematics(mut self, settings: KinematicsSettings) -> Self {
        self.kinematics = Some(settings);
        self
    }
    pub fn use_scale_factor(mut self, enabled: bool) -> Self {
        self.use_scale_factor = enabled;
        self
    }

    pub fn build(self) -> Result<AnalysisPlan, ConfigError> {
        if self.selections.is_empty() {
            return Err(ConfigError::MissingParameter("selections"));
        }
        if self.distributions.is_empty() {
            return Err(ConfigError::MissingParameter("distributions"));
        }

        let mut names = HashSet::new();
        for selection in &self.selections {
            if !names.insert(selection.name.as_str()) {
                return Err(ConfigError::DuplicateSelection(selection.name.clone()));
            }
        }

        let mut histograms = HashSet::new();
        for spec in &self.distributions {
            if !names.contains(spec.selection.as_str()) {
                return Err(ConfigError::UnknownSelection {
                    quantity: spec.quantity.to_string(),
                    selection: spec.selection.clone(),
                });
            }
            let name = format!("{}_{}", spec.quantity.key(), spec.selection);
            if !histograms.insert(name.clone()) {
                return Err(ConfigError::DuplicateHistogram(name));
            }
        }

        let kinematics = self.kinematics.unwrap_or_default();
        if !(kinematics.nucleon_mass > 0.0) || !(kinematics.target_mass > 0.0) {
            return Err(ConfigError::InvalidValue {
                parameter: "kinematics",
                reason: "masses must be positive".to_string(),
            });
        }
        if !(kinematics.q2_tolerance >= 0.0) {
            return Err(ConfigError::InvalidValue {
                parameter: "q2_tolerance",
                reason: "must be non-negative".to_string(),
            });
        }

        Ok(AnalysisPlan {
            selections: self.selections,
            distributions: self.distributions,
            normalization: self.normalization.unwrap_or_default(),
            kinematics,
            use_scale_factor: self.use_scale_factor,
        })
    }
}
