pub mod analyze;
pub mod catalog;
pub mod kinematics;
