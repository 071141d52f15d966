//! # nuvalid Core Library
//!
//! Kinematic reconstruction and histogramming of neutrino-interaction event records,
//! used to validate and compare neutrino event generators.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout so that the physics stays separate from the
//! bookkeeping around it.
//!
//! - **[`core`]: The Foundation.** Stateless event models (`EventRecord`, `FourMomentum`),
//!   the particle-identification and four-vector kinematics layer, histograms, and I/O.
//!
//! - **[`engine`]: The Logic Core.** Analysis configuration, event selections, the
//!   quantity catalog that turns an event into histogram samples, and normalisation.
//!
//! - **[`workflows`]: The Public API.** Complete passes over an event stream: filling a
//!   set of distributions, or tabulating per-event kinematics.

pub mod core;
pub mod engine;
pub mod workflows;
