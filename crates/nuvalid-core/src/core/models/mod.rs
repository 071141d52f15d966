//! # Core Models Module
//!
//! Data structures describing a single neutrino interaction as written by the upstream
//! flat-tree producer.
//!
//! ## Key Components
//!
//! - [`four_vector`] - Minkowski four-momentum with the usual invariants and angles
//! - [`particle`] - A particle entry (PDG code, four-momentum, optional rank)
//! - [`event`] - The read-only per-event record with particle lists and scalar branches
//!
//! ```ignore
//! use nuvalid::core::models::{event::EventRecord, particle::Particle};
//! use nuvalid::core::models::four_vector::FourMomentum;
//!
//! let mut event = EventRecord::default();
//! event.initial_state.push(Particle::new(14, FourMomentum::new(0.0, 0.0, 1.0, 1.0)));
//! ```

pub mod event;
pub mod four_vector;
pub mod particle;
