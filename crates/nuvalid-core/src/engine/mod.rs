//! # Engine Module
//!
//! Configuration and per-event machinery behind the analysis workflows.
//!
//! ## Overview
//!
//! An [`AnalysisPlan`](config::AnalysisPlan) names a set of selections and the quantities to
//! histogram for each of them. The engine turns the plan into concrete histograms, evaluates
//! each quantity against a lazily computed [`EventContext`](context::EventContext), and
//! converts the filled histograms into event rates.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Analysis plan, builder and validation
//! - **Selections** ([`selection`]) - Neutrino flavour / current / class and CC1π filters
//! - **Quantity Catalog** ([`quantity`]) - Every histogrammable variable, its binning,
//!   titles and shorthand name
//! - **Distributions** ([`distribution`]) - Quantity × selection histograms and the
//!   default plan
//! - **Normalisation** ([`normalization`]) - Flux × exposure scaling
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Engine-level error aggregation

pub mod config;
pub mod context;
pub mod distribution;
pub mod error;
pub mod normalization;
pub mod progress;
pub mod quantity;
pub mod selection;
