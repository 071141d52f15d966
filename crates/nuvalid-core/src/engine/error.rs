use thiserror::Error;

use super::config::ConfigError;
use crate::core::histogram::hist::HistogramError;
use crate::core::io::flat_tree::FlatTreeError;
use crate::core::io::kinematics_table::KinematicsTableError;
use crate::core::physics::kinematics::KinematicsError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid analysis configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read event input: {0}")]
    Input(#[from] FlatTreeError),

    #[error("Kinematics failed for event {event}: {source}")]
    Kinematics {
        event: usize,
        source: KinematicsError,
    },

    #[error("Histogram '{name}' could not be filled: {source}")]
    Histogram {
        name: String,
        source: HistogramError,
    },

    #[error("Failed to write kinematics table: {0}")]
    Table(#[from] KinematicsTableError),
}
