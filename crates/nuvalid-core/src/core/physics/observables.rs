//! Per-event observables built from the final-state particle list and the record's
//! generator-level scalars.
//!
//! None of these need the struck nucleon. Lepton observables can still fail when the record
//! lists no (or more than one) matching lepton, so they return `Result`.

use super::constants::particle_mass;
use super::kinematics::KinematicsError;
use super::locator;
use super::pdg;
use crate::core::models::event::EventRecord;
use crate::core::models::particle::Particle;

/// Hadron species for which a "leading" (highest |p|) particle is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HadronSpecies {
    Proton,
    Neutron,
    Pion { charged_only: bool },
}

impl HadronSpecies {
    pub fn matches(&self, pdg_code: i32) -> bool {
        match self {
            HadronSpecies::Proton => pdg_code == pdg::PROTON,
            HadronSpecies::Neutron => pdg_code == pdg::NEUTRON,
            HadronSpecies::Pion { charged_only } => pdg::is_pion(pdg_code, *charged_only),
        }
    }

    /// Symbol used in axis titles.
    pub fn symbol(&self) -> &'static str {
        match self {
            HadronSpecies::Proton => "p",
            HadronSpecies::Neutron => "n",
            HadronSpecies::Pion { .. } => "#pi",
        }
    }
}

/// Kinetic energy of a final-state particle, using the static mass table.
///
/// Species without a tabulated mass are treated as massless.
pub fn kinetic_energy(particle: &Particle) -> f64 {
    particle
        .p4
        .kinetic_energy(particle_mass(particle.pdg).unwrap_or(0.0))
}

/// The highest-|p| final-state particle of a species whose kinetic energy exceeds
/// `ke_threshold` (strictly).
pub fn leading(
    event: &EventRecord,
    species: HadronSpecies,
    ke_threshold: f64,
) -> Option<&Particle> {
    event
        .final_state
        .iter()
        .filter(|p| species.matches(p.pdg) && kinetic_energy(p) > ke_threshold)
        .max_by(|a, b| a.p4.p().total_cmp(&b.p4.p()))
}

pub fn leading_momentum(
    event: &EventRecord,
    species: HadronSpecies,
    ke_threshold: f64,
) -> Option<f64> {
    leading(event, species, ke_threshold).map(|p| p.p4.p())
}

pub fn leading_kinetic_energy(
    event: &EventRecord,
    species: HadronSpecies,
    ke_threshold: f64,
) -> Option<f64> {
    leading(event, species, ke_threshold).map(kinetic_energy)
}

pub fn leading_cos_theta(
    event: &EventRecord,
    species: HadronSpecies,
    ke_threshold: f64,
) -> Option<f64> {
    leading(event, species, ke_threshold).map(|p| p.p4.cos_theta())
}

/// Cosine of the opening angle between the outgoing lepton and the leading hadron.
pub fn leading_lepton_cos_opening(
    event: &EventRecord,
    species: HadronSpecies,
    ke_threshold: f64,
) -> Result<Option<f64>, KinematicsError> {
    let Some(hadron) = leading(event, species, ke_threshold) else {
        return Ok(None);
    };
    let lepton = locator::locate_lepton(event)?;
    Ok(Some(lepton.p4.angle(&hadron.p4).cos()))
}

/// Azimuthal separation `φ_lep − φ_hadron` in [−π, π).
pub fn leading_lepton_delta_phi(
    event: &EventRecord,
    species: HadronSpecies,
    ke_threshold: f64,
) -> Result<Option<f64>, KinematicsError> {
    let Some(hadron) = leading(event, species, ke_threshold) else {
        return Ok(None);
    };
    let lepton = locator::locate_lepton(event)?;
    Ok(Some(lepton.p4.delta_phi(&hadron.p4)))
}

/// Kinetic energies of the two most energetic final-state protons, ordered by KE.
///
/// Missing protons contribute 0, so every event yields a point (events without protons sit
/// at the origin).
pub fn proton_kinetic_energies(event: &EventRecord) -> (f64, f64) {
    let mut lead = 0.0_f64;
    let mut sub = 0.0_f64;
    for ke in event.final_particles(pdg::PROTON).map(kinetic_energy) {
        if ke > lead {
            sub = lead;
            lead = ke;
        } else if ke > sub {
            sub = ke;
        }
    }
    (lead, sub)
}

/// Number of final-state particles with exactly this PDG code and kinetic energy above
/// `ke_threshold`, computed with the supplied rest mass.
pub fn multiplicity(event: &EventRecord, pdg_code: i32, mass: f64, ke_threshold: f64) -> usize {
    event
        .final_particles(pdg_code)
        .filter(|p| p.p4.kinetic_energy(mass) > ke_threshold)
        .count()
}

pub fn lepton_momentum(event: &EventRecord) -> Result<f64, KinematicsError> {
    Ok(locator::locate_lepton(event)?.p4.p())
}

pub fn lepton_cos_theta(event: &EventRecord) -> Result<f64, KinematicsError> {
    Ok(locator::locate_lepton(event)?.p4.cos_theta())
}

/// Lepton momentum transverse to the beam.
pub fn lepton_transverse_momentum(event: &EventRecord) -> Result<f64, KinematicsError> {
    Ok(locator::locate_lepton(event)?.p4.perp())
}

/// Lepton momentum along the beam.
pub fn lepton_longitudinal_momentum(event: &EventRecord) -> Result<f64, KinematicsError> {
    Ok(locator::locate_lepton(event)?.p4.momentum.z)
}

pub fn missing_energy(event: &EventRecord) -> Option<f64> {
    event.missing.map(|m| m.energy)
}

pub fn missing_momentum(event: &EventRecord) -> Option<f64> {
    event.missing.map(|m| m.momentum.norm())
}

/// `E_rec − E_ν`.
pub fn reconstruction_bias(event: &EventRecord) -> f64 {
    event.qe_neutrino_energy - event.neutrino_energy
}

/// `(E_rec − E_ν) / E_ν`; undefined for a zero true energy.
pub fn relative_reconstruction_bias(event: &EventRecord) -> Option<f64> {
    (event.neutrino_energy != 0.0).then(|| reconstruction_bias(event) / event.neutrino_energy)
}

/// Inelasticity with the reconstructed neutrino energy, `1 − E_lep / E_rec`.
pub fn reconstructed_inelasticity(event: &EventRecord) -> Option<f64> {
    (event.qe_neutrino_energy != 0.0).then(|| 1.0 - event.lepton_energy / event.qe_neutrino_energy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::event::MissingMomentum;
    use crate::core::models::four_vector::FourMomentum;
    use crate::core::physics::constants::PROTON_MASS;
    use crate::core::physics::locator::ParticleRole;
    use nalgebra::Vector3;
    use std::f64::consts::FRAC_PI_2;

    fn proton(px: f64, py: f64, pz: f64) -> Particle {
        let e = (px * px + py * py + pz * pz + PROTON_MASS * PROTON_MASS).sqrt();
        Particle::new(2212, FourMomentum::new(px, py, pz, e))
    }

    fn event() -> EventRecord {
        let lepton = FourMomentum::new(0.3, 0.0, 0.4, 0.5108);
        EventRecord {
            neutrino_pdg: 14,
            lepton_pdg: 13,
            lepton_energy: lepton.energy,
            neutrino_energy: 1.0,
            qe_neutrino_energy: 0.9,
            final_state: vec![
                Particle::new(13, lepton),
                proton(0.0, 0.5, 0.0),
                proton(0.0, 0.0, 0.2),
                Particle::new(211, FourMomentum::new(0.0, 0.0, 0.3, 0.331)),
                Particle::new(111, FourMomentum::new(0.0, 0.0, -0.6, 0.615)),
            ],
            ..Default::default()
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn lepton_observables() {
        let e = event();
        assert!(close(lepton_momentum(&e).unwrap(), 0.5));
        assert!(close(lepton_cos_theta(&e).unwrap(), 0.8));
        assert!(close(lepton_transverse_momentum(&e).unwrap(), 0.3));
        assert!(close(lepton_longitudinal_momentum(&e).unwrap(), 0.4));
    }

    #[test]
    fn lepton_observables_fail_without_lepton() {
        let mut e = event();
        e.final_state.remove(0);
        assert_eq!(
            lepton_momentum(&e).unwrap_err(),
            KinematicsError::MissingParticle {
                role: ParticleRole::Lepton
            }
        );
    }

    #[test]
    fn leading_proton_is_highest_momentum() {
        let e = event();
        let p = leading_momentum(&e, HadronSpecies::Proton, 0.0).unwrap();
        let cos = leading_cos_theta(&e, HadronSpecies::Proton, 0.0).unwrap();
        assert!(close(p, 0.5));
        assert!(close(cos, 0.0));
        let ke = leading_kinetic_energy(&e, HadronSpecies::Proton, 0.0).unwrap();
        assert!(close(ke, (0.25 + PROTON_MASS * PROTON_MASS).sqrt() - PROTON_MASS));
    }

    #[test]
    fn threshold_removes_soft_protons() {
        let e = event();
        assert!(leading(&e, HadronSpecies::Proton, 0.5).is_none());
        assert_eq!(leading_momentum(&e, HadronSpecies::Neutron, 0.0), None);
    }

    #[test]
    fn charged_pion_restriction() {
        let e = event();
        let any = HadronSpecies::Pion {
            charged_only: false,
        };
        let charged = HadronSpecies::Pion { charged_only: true };
        assert!(close(leading_momentum(&e, any, 0.0).unwrap(), 0.6));
        assert!(close(leading_momentum(&e, charged, 0.0).unwrap(), 0.3));
    }

    #[test]
    fn lepton_hadron_angles() {
        let e = event();
        let cos = leading_lepton_cos_opening(&e, HadronSpecies::Proton, 0.0)
            .unwrap()
            .unwrap();
        assert!(close(cos, 0.0));
        let dphi = leading_lepton_delta_phi(&e, HadronSpecies::Proton, 0.0)
            .unwrap()
            .unwrap();
        assert!(close(dphi, -FRAC_PI_2));
        assert_eq!(
            leading_lepton_delta_phi(&e, HadronSpecies::Neutron, 0.0),
            Ok(None)
        );
    }

    #[test]
    fn proton_pair_kinetic_energies() {
        let e = event();
        let (lead, sub) = proton_kinetic_energies(&e);
        assert!(lead > sub && sub > 0.0);

        let mut none = event();
        none.final_state.retain(|p| p.pdg != 2212);
        assert_eq!(proton_kinetic_energies(&none), (0.0, 0.0));
    }

    #[test]
    fn multiplicity_counts_exact_pdg_above_threshold() {
        let e = event();
        assert_eq!(multiplicity(&e, 2212, PROTON_MASS, 0.0), 2);
        assert_eq!(multiplicity(&e, 2212, PROTON_MASS, 0.03), 1);
        assert_eq!(multiplicity(&e, -211, 0.13957, 0.0), 0);
        assert_eq!(multiplicity(&e, 111, 0.134977, 0.0), 1);
    }

    #[test]
    fn energy_reconstruction_bias() {
        let e = event();
        assert!(close(reconstruction_bias(&e), -0.1));
        assert!(close(relative_reconstruction_bias(&e).unwrap(), -0.1));
        assert!(close(reconstructed_inelasticity(&e).unwrap(), 1.0 - 0.5108 / 0.9));

        let zero = EventRecord::default();
        assert_eq!(relative_reconstruction_bias(&zero), None);
        assert_eq!(reconstructed_inelasticity(&zero), None);
    }

    #[test]
    fn missing_momentum_is_optional() {
        let mut e = event();
        assert_eq!(missing_energy(&e), None);
        e.missing = Some(MissingMomentum {
            energy: 0.03,
            momentum: Vector3::new(0.0, 0.12, 0.16),
        });
        assert_eq!(missing_energy(&e), Some(0.03));
        assert!(close(missing_momentum(&e).unwrap(), 0.2));
    }
}
