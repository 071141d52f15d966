//! # Core Module
//!
//! Fundamental building blocks for neutrino-event kinematics in nuvalid.
//!
//! ## Architecture
//!
//! - **Event Representation** ([`models`]) - Four-vectors, particles and flat event records
//! - **Physics** ([`physics`]) - Interaction classification, particle location,
//!   kinematic invariants and per-event observables
//! - **Histograms** ([`histogram`]) - Weighted 1D/2D histograms with uniform binning
//! - **File I/O** ([`io`]) - Flat event tables in, histogram and kinematics tables out
//!
//! ## Conventions
//!
//! All energies and momenta are in GeV, Q² in GeV², and four-vectors use the
//! (+,−,−,−) metric so that m² = E² − |p|².

pub mod histogram;
pub mod io;
pub mod models;
pub mod physics;
