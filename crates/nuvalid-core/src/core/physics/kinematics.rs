use super::classifier::Interaction;
use super::constants::{ARGON40_MASS, NEUTRON_MASS, Q2_TOLERANCE};
use super::locator::{self, LocatedParticles, NucleonSource, ParticleRole};
use crate::core::models::event::EventRecord;
use crate::core::models::four_vector::FourMomentum;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum KinematicsError {
    #[error("Found {count} candidates for the {role}; the record is inconsistent")]
    AmbiguousParticle { role: ParticleRole, count: usize },

    #[error("No {role} found in the event record")]
    MissingParticle { role: ParticleRole },

    #[error("No struck nucleon in the initial state")]
    NoNucleonFound,

    #[error(
        "Recomputed Q² = {computed:.6} GeV² disagrees with the stored Q² = {reference:.6} GeV² (tolerance {tolerance:e})"
    )]
    ReferenceMismatch {
        computed: f64,
        reference: f64,
        tolerance: f64,
    },
}

impl KinematicsError {
    /// Whether the error only means "skip nucleon-dependent quantities for this event".
    pub fn is_skippable(&self) -> bool {
        matches!(self, KinematicsError::NoNucleonFound)
    }
}

/// Constants entering the kinematic reconstruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicsSettings {
    /// Fixed on-shell nucleon mass M of the experimentalist conventions, GeV.
    pub nucleon_mass: f64,
    /// Rest mass of the target nucleus used for the binding-energy balance, GeV.
    pub target_mass: f64,
    /// Allowed |Q²_recomputed − Q²_reference|, GeV².
    pub q2_tolerance: f64,
}

impl Default for KinematicsSettings {
    fn default() -> Self {
        Self {
            nucleon_mass: NEUTRON_MASS,
            target_mass: ARGON40_MASS,
            q2_tolerance: Q2_TOLERANCE,
        }
    }
}

/// Derived scalars of one event. Built once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicsBundle {
    /// Four-momentum transfer `q = k − k′`.
    pub q: FourMomentum,
    /// `Q² = −q·q`, GeV².
    pub q2: f64,
    /// `√(p² + 2p·q − Q²)` with the full initial-nucleon four-momentum.
    pub w_theorist: f64,
    /// `√(M² + 2M·q0 − Q²)` for a nucleon at rest.
    pub w_experimentalist: f64,
    /// `Q² / (2p·q)`.
    pub x_theorist: f64,
    /// `Q² / (2M·q0)`.
    pub x_experimentalist: f64,
    /// `(p·q) / (p·k)`.
    pub y_theorist: f64,
    /// `1 − E_lep / E_ν`.
    pub y_experimentalist: f64,
    /// `(p·q) / √(p²)`, the energy transfer in the nucleon rest frame.
    pub nu_theorist: f64,
    /// `q0 = E_ν − E_lep`.
    pub nu_experimentalist: f64,
    /// Binding energy from full four-momentum balance against a target at rest.
    ///
    /// Only defined when the struck particle is a proton or neutron. The value is an
    /// approximation that can differ from the nuclear model's own binding energy by an amount
    /// of the order of the binding energy itself.
    pub binding_energy: Option<f64>,
    pub nucleon_source: NucleonSource,
}

/// Locates the interaction particles and computes the kinematics bundle with default settings.
///
/// # Errors
///
/// Returns [`KinematicsError::NoNucleonFound`] when the event has no struck nucleon (the
/// caller should skip nucleon-dependent quantities) and the other variants for inconsistent
/// records.
pub fn compute_kinematics(
    event: &EventRecord,
    interaction: Interaction,
) -> Result<KinematicsBundle, KinematicsError> {
    compute_kinematics_with(event, interaction, &KinematicsSettings::default())
}

pub fn compute_kinematics_with(
    event: &EventRecord,
    interaction: Interaction,
    settings: &KinematicsSettings,
) -> Result<KinematicsBundle, KinematicsError> {
    let located = locator::locate(event, interaction)?;
    from_located(&located, event.reference.q2, settings)
}

/// Four-momentum transfer and Q² from the neutrino and lepton alone.
pub fn momentum_transfer(neutrino: &FourMomentum, lepton: &FourMomentum) -> (FourMomentum, f64) {
    let q = *neutrino - *lepton;
    (q, -q.mag2())
}

/// Computes the bundle from already located particles.
///
/// The recomputed Q² is checked against `reference_q2`; a disagreement beyond the configured
/// tolerance points at a unit or convention problem and is returned as an error.
pub fn from_located(
    located: &LocatedParticles<'_>,
    reference_q2: f64,
    settings: &KinematicsSettings,
) -> Result<KinematicsBundle, KinematicsError> {
    let nucleon = located.nucleon.ok_or(KinematicsError::NoNucleonFound)?;

    let k = located.neutrino.p4;
    let k_prime = located.lepton.p4;
    let (q, q2) = momentum_transfer(&k, &k_prime);

    if (q2 - reference_q2).abs() > settings.q2_tolerance {
        return Err(KinematicsError::ReferenceMismatch {
            computed: q2,
            reference: reference_q2,
            tolerance: settings.q2_tolerance,
        });
    }

    let p = nucleon.particle.p4;
    let p_dot_q = p.dot(&q);
    let p_dot_k = p.dot(&k);

    let m = settings.nucleon_mass;
    let q0 = k.energy - k_prime.energy;

    let binding_energy = match nucleon.source {
        NucleonSource::FreeNucleon => Some(binding_energy(&k, &p, &k_prime, settings.target_mass)),
        NucleonSource::Nucleus | NucleonSource::MecCluster => None,
    };

    Ok(KinematicsBundle {
        q,
        q2,
        w_theorist: (p.mag2() + 2.0 * p_dot_q - q2).sqrt(),
        w_experimentalist: (m * m + 2.0 * m * q0 - q2).sqrt(),
        x_theorist: q2 / (2.0 * p_dot_q),
        x_experimentalist: q2 / (2.0 * m * q0),
        y_theorist: p_dot_q / p_dot_k,
        y_experimentalist: 1.0 - k_prime.energy / k.energy,
        nu_theorist: p_dot_q / p.mag(),
        nu_experimentalist: q0,
        binding_energy,
        nucleon_source: nucleon.source,
    })
}

/// Reconstructed binding energy from energy conservation across the whole event.
///
/// The outgoing nucleon is `p′ = p + k − k′`, the recoiling remnant is
/// `p_f = k + p_T − k′ − p′` for a target of mass `target_mass` at rest, and
/// `E_b = E_ν + m_n − E_{p′} − E_lep − T_f` where `T_f` is the remnant's kinetic energy.
pub fn binding_energy(
    neutrino: &FourMomentum,
    nucleon: &FourMomentum,
    lepton: &FourMomentum,
    target_mass: f64,
) -> f64 {
    let target = FourMomentum::at_rest(target_mass);
    let outgoing_nucleon = *nucleon + *neutrino - *lepton;
    let remnant = *neutrino + target - *lepton - outgoing_nucleon;
    let remnant_kinetic = remnant.energy - remnant.mag();

    neutrino.energy + NEUTRON_MASS - outgoing_nucleon.energy - lepton.energy - remnant_kinetic
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::particle::Particle;
    use crate::core::physics::classifier::{Current, InteractionClass, classify};

    const MUON_MASS: f64 = 0.105658;
    const EPS: f64 = 1e-9;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() < tol, "{a} != {b}");
    }

    fn muon(px: f64, pz: f64) -> FourMomentum {
        let energy = (px * px + pz * pz + MUON_MASS * MUON_MASS).sqrt();
        FourMomentum::new(px, 0.0, pz, energy)
    }

    fn event_with(nucleon: FourMomentum, lepton: FourMomentum) -> EventRecord {
        let neutrino = FourMomentum::new(0.0, 0.0, 2.0, 2.0);
        let (_, q2) = momentum_transfer(&neutrino, &lepton);
        let mut event = EventRecord {
            mode: 1,
            is_cc: true,
            neutrino_pdg: 14,
            lepton_pdg: 13,
            lepton_energy: lepton.energy,
            neutrino_energy: neutrino.energy,
            initial_state: vec![Particle::new(14, neutrino), Particle::new(2112, nucleon)],
            final_state: vec![Particle::new(13, lepton).with_rank(1)],
            ..Default::default()
        };
        event.reference.q2 = q2;
        event
    }

    #[test]
    fn recomputed_q2_matches_reference() {
        let event = event_with(FourMomentum::new(0.1, 0.05, -0.1, 0.93), muon(0.3, 1.2));
        let bundle = compute_kinematics(&event, event.interaction()).unwrap();
        assert_close(bundle.q2, event.reference.q2, 1e-4);
        assert!(bundle.q2 > 0.0);
    }

    #[test]
    fn conventions_coincide_for_nucleon_at_rest() {
        let nucleon = FourMomentum::at_rest(NEUTRON_MASS);
        let event = event_with(nucleon, muon(0.4, 1.1));
        let b = compute_kinematics(&event, event.interaction()).unwrap();

        assert_close(b.w_theorist, b.w_experimentalist, EPS);
        assert_close(b.x_theorist, b.x_experimentalist, EPS);
        assert_close(b.y_theorist, b.y_experimentalist, EPS);
        assert_close(b.nu_theorist, b.nu_experimentalist, EPS);
        assert!(b.w_theorist.is_finite());
    }

    #[test]
    fn fermi_motion_separates_the_conventions() {
        let p = FourMomentum::new(0.0, 0.0, -0.2, (NEUTRON_MASS.powi(2) + 0.04).sqrt());
        let event = event_with(p, muon(0.4, 1.1));
        let b = compute_kinematics(&event, event.interaction()).unwrap();
        assert!((b.w_theorist - b.w_experimentalist).abs() > 1e-3);
        assert_close(b.nu_experimentalist, 2.0 - event.lepton_energy, EPS);
    }

    #[test]
    fn missing_nucleon_yields_no_nucleon_found() {
        let mut event = event_with(FourMomentum::at_rest(NEUTRON_MASS), muon(0.3, 1.2));
        event.initial_state.retain(|p| p.pdg == 14);
        let err = compute_kinematics(&event, event.interaction()).unwrap_err();
        assert_eq!(err, KinematicsError::NoNucleonFound);
        assert!(err.is_skippable());
    }

    #[test]
    fn duplicated_lepton_is_ambiguous() {
        let mut event = event_with(FourMomentum::at_rest(NEUTRON_MASS), muon(0.3, 1.2));
        let lepton = event.final_state[0];
        event.final_state.push(lepton);
        let err = compute_kinematics(&event, event.interaction()).unwrap_err();
        assert!(matches!(err, KinematicsError::AmbiguousParticle { .. }));
        assert!(!err.is_skippable());
    }

    #[test]
    fn q2_mismatch_is_reported() {
        let mut event = event_with(FourMomentum::at_rest(NEUTRON_MASS), muon(0.3, 1.2));
        event.reference.q2 += 0.01;
        let err = compute_kinematics(&event, event.interaction()).unwrap_err();
        assert!(matches!(err, KinematicsError::ReferenceMismatch { .. }));
    }

    #[test]
    fn binding_energy_of_bound_nucleon_at_rest_is_its_mass_deficit() {
        // With p⃗ = 0 the remnant is at rest, so E_b reduces to m_n − E_N.
        let epsilon = 0.03;
        let nucleon = FourMomentum::at_rest(NEUTRON_MASS - epsilon);
        let event = event_with(nucleon, muon(0.3, 1.2));
        let b = compute_kinematics(&event, event.interaction()).unwrap();
        assert_close(b.binding_energy.unwrap(), epsilon, 1e-9);
    }

    #[test]
    fn binding_energy_subtracts_remnant_recoil() {
        let nucleon = FourMomentum::new(0.2, 0.0, 0.0, 0.9);
        let k = FourMomentum::new(0.0, 0.0, 2.0, 2.0);
        let lepton = muon(0.3, 1.2);
        let eb = binding_energy(&k, &nucleon, &lepton, ARGON40_MASS);

        let remnant_energy = ARGON40_MASS - 0.9;
        let remnant_mass = (remnant_energy.powi(2) - 0.04).sqrt();
        let expected = NEUTRON_MASS - 0.9 - (remnant_energy - remnant_mass);
        assert_close(eb, expected, 1e-9);
    }

    #[test]
    fn binding_energy_is_undefined_for_coherent_target() {
        let mut event = event_with(FourMomentum::at_rest(NEUTRON_MASS), muon(0.3, 1.2));
        event.mode = 16;
        event.initial_state[1] = Particle::new(1000180400, FourMomentum::at_rest(ARGON40_MASS));
        let interaction = classify(event.mode, Current::Charged);
        assert_eq!(interaction.class, InteractionClass::Coherent);
        let b = compute_kinematics(&event, interaction).unwrap();
        assert_eq!(b.nucleon_source, NucleonSource::Nucleus);
        assert!(b.binding_energy.is_none());
    }

    #[test]
    fn custom_settings_change_experimentalist_mass() {
        let event = event_with(FourMomentum::at_rest(NEUTRON_MASS), muon(0.3, 1.2));
        let settings = KinematicsSettings {
            nucleon_mass: 0.938272,
            ..Default::default()
        };
        let default = compute_kinematics(&event, event.interaction()).unwrap();
        let custom = compute_kinematics_with(&event, event.interaction(), &settings).unwrap();
        assert!(custom.w_experimentalist < default.w_experimentalist);
        assert_close(custom.w_theorist, default.w_theorist, EPS);
    }
}
