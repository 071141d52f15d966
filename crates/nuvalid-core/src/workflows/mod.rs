//! # Workflows Module
//!
//! Complete passes over an event stream. These are the entry points used by the CLI.
//!
//! ## Overview
//!
//! Each workflow consumes an iterator of event records (usually a
//! [`FlatTreeReader`](crate::core::io::flat_tree::FlatTreeReader)), reports progress
//! through a [`ProgressReporter`](crate::engine::progress::ProgressReporter) and returns
//! a summary of what it did.
//!
//! - **Analysis** ([`analyze`]) - Fills the distributions of an analysis plan and
//!   normalises them to event rates.
//! - **Tabulation** ([`tabulate`]) - Writes the per-event kinematics bundle, or the reason
//!   it could not be computed, as a table.

pub mod analyze;
pub mod tabulate;
