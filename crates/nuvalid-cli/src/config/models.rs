use nuvalid::core::physics::kinematics::KinematicsSettings;
use nuvalid::engine::config::AnalysisPlan;
use std::path::PathBuf;

pub struct AnalyzeConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub plan: AnalysisPlan,
}

pub struct KinematicsConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub limit: Option<usize>,
    pub settings: KinematicsSettings,
}
