//! Input and output for event tables and analysis results.
//!
//! Events come in as CSV exports of NUISANCE flat trees. Results go out as plain CSV bin
//! tables with a TOML manifest, and as a per-event kinematics table, so they can be
//! compared and plotted without a ROOT installation.

pub mod flat_tree;
pub mod histogram_csv;
pub mod kinematics_table;
pub mod traits;
