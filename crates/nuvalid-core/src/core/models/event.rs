use super::particle::Particle;
use crate::core::physics::classifier::{self, Current, Interaction};
use nalgebra::Vector3;

/// Generator-level kinematics stored alongside the particle lists.
///
/// These values are written by the upstream producer and serve as cross-checks for the
/// quantities recomputed from four-vectors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReferenceKinematics {
    /// Negative four-momentum transfer squared, GeV².
    pub q2: f64,
    /// Energy transfer, GeV.
    pub q0: f64,
    /// Three-momentum transfer magnitude, GeV.
    pub q3: f64,
    pub x: f64,
    pub y: f64,
}

/// Single-transverse kinematic imbalance variables.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransverseImbalance {
    /// Transverse momentum imbalance δp_T, GeV.
    pub dpt: f64,
    /// Boosting angle δα_T.
    pub dalphat: f64,
    /// Transverse opening angle δφ_T.
    pub dphit: f64,
}

/// Missing energy and momentum attributed to the unobserved nuclear remnant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissingMomentum {
    pub energy: f64,
    pub momentum: Vector3<f64>,
}

/// Exclusive-topology flags precomputed by the producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TopologyFlags {
    pub cc1pip: bool,
    pub cc1pim: bool,
    pub cc1pi0: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Target {
    pub pdg: i32,
    pub a: i32,
    pub z: i32,
}

/// One neutrino interaction, read-only once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Generator interaction mode code (NEUT/NUISANCE numbering, sign flips for antineutrinos).
    pub mode: i32,
    pub neutrino_pdg: i32,
    pub is_cc: bool,
    pub target: Target,
    /// True incoming neutrino energy, GeV.
    pub neutrino_energy: f64,
    pub lepton_pdg: i32,
    /// Outgoing lepton energy, GeV. Used to tell the primary lepton apart from secondaries.
    pub lepton_energy: f64,
    pub cos_lepton: f64,
    pub reference: ReferenceKinematics,
    /// Neutrino energy reconstructed under the quasi-elastic hypothesis, GeV.
    pub qe_neutrino_energy: f64,
    pub tki: TransverseImbalance,
    pub missing: Option<MissingMomentum>,
    pub weight: f64,
    /// Cross-section normalisation factor.
    pub scale_factor: f64,
    pub topology: TopologyFlags,
    pub initial_state: Vec<Particle>,
    pub final_state: Vec<Particle>,
}

impl Default for EventRecord {
    fn default() -> Self {
        Self {
            mode: 0,
            neutrino_pdg: 0,
            is_cc: false,
            target: Target::default(),
            neutrino_energy: 0.0,
            lepton_pdg: 0,
            lepton_energy: 0.0,
            cos_lepton: 0.0,
            reference: ReferenceKinematics::default(),
            qe_neutrino_energy: 0.0,
            tki: TransverseImbalance::default(),
            missing: None,
            weight: 1.0,
            scale_factor: 1.0,
            topology: TopologyFlags::default(),
            initial_state: Vec::new(),
            final_state: Vec::new(),
        }
    }
}

impl EventRecord {
    pub fn current(&self) -> Current {
        if self.is_cc {
            Current::Charged
        } else {
            Current::Neutral
        }
    }

    pub fn interaction(&self) -> Interaction {
        classifier::classify(self.mode, self.current())
    }

    /// Final-state particles with the given PDG code.
    pub fn final_particles(&self, pdg: i32) -> impl Iterator<Item = &Particle> {
        self.final_state.iter().filter(move |p| p.pdg == pdg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::physics::classifier::InteractionClass;

    #[test]
    fn default_record_has_unit_weights() {
        let event = EventRecord::default();
        assert_eq!(event.weight, 1.0);
        assert_eq!(event.scale_factor, 1.0);
        assert!(event.initial_state.is_empty());
    }

    #[test]
    fn interaction_combines_mode_table_and_cc_flag() {
        let event = EventRecord {
            mode: -1,
            is_cc: true,
            ..Default::default()
        };
        let interaction = event.interaction();
        assert_eq!(interaction.class, InteractionClass::QuasiElastic);
        assert_eq!(interaction.current, Current::Charged);

        let nc = EventRecord {
            mode: 36,
            is_cc: false,
            ..Default::default()
        };
        assert_eq!(nc.interaction().class, InteractionClass::Coherent);
        assert_eq!(nc.current(), Current::Neutral);
    }
}
