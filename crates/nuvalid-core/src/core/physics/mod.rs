//! # Physics Module
//!
//! The particle-identification and four-vector kinematics layer.
//!
//! ## Overview
//!
//! Given the flat particle lists of an [`EventRecord`](crate::core::models::event::EventRecord),
//! this module identifies the incoming neutrino, the struck nucleon and the outgoing lepton,
//! then evaluates the invariants used in generator validation (Q², W, x, y, ν and a
//! reconstructed binding energy) under both the "theorist" and the "experimentalist"
//! conventions.
//!
//! - [`classifier`] - Generator mode code to interaction class and current
//! - [`constants`] - Static particle masses and target constants
//! - [`pdg`] - PDG code helpers (nucleons, ions, neutrino labels)
//! - [`locator`] - Unique neutrino / nucleon / lepton selection with ambiguity checks
//! - [`kinematics`] - The derived scalar bundle
//! - [`observables`] - Lepton and hadron observables that need no struck nucleon

pub mod classifier;
pub mod constants;
pub mod kinematics;
pub mod locator;
pub mod observables;
pub mod pdg;
