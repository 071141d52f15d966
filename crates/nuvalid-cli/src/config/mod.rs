mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{build_analyze_config, build_kinematics_config};
pub use models::{AnalyzeConfig, KinematicsConfig};
