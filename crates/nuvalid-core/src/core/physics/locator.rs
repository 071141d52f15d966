use super::classifier::{Current, Interaction, InteractionClass};
use super::kinematics::KinematicsError;
use super::pdg;
use crate::core::models::event::EventRecord;
use crate::core::models::particle::Particle;
use std::fmt;

/// The three roles the locator has to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleRole {
    Neutrino,
    Nucleon,
    Lepton,
}

impl fmt::Display for ParticleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParticleRole::Neutrino => "incoming neutrino",
            ParticleRole::Nucleon => "struck nucleon",
            ParticleRole::Lepton => "outgoing lepton",
        };
        f.write_str(name)
    }
}

/// What kind of initial-state particle stands in for the struck nucleon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NucleonSource {
    /// A proton or neutron.
    FreeNucleon,
    /// A whole nucleus, accepted for coherent scattering.
    Nucleus,
    /// The single non-neutrino initial particle of an NC meson-exchange-current event
    /// without a listed nucleon (typically a nucleon-pair cluster code). This is an
    /// approximation and carries no guarantee that W, x or y are physical.
    MecCluster,
}

impl NucleonSource {
    pub fn label(&self) -> &'static str {
        match self {
            NucleonSource::FreeNucleon => "free-nucleon",
            NucleonSource::Nucleus => "nucleus",
            NucleonSource::MecCluster => "mec-cluster",
        }
    }
}

impl ParticleRole {
    /// Single-word tag for tables and logs.
    pub fn slug(&self) -> &'static str {
        match self {
            ParticleRole::Neutrino => "neutrino",
            ParticleRole::Nucleon => "nucleon",
            ParticleRole::Lepton => "lepton",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StruckNucleon<'a> {
    pub particle: &'a Particle,
    pub source: NucleonSource,
}

/// The particles that define the hard-scattering kinematics of one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocatedParticles<'a> {
    pub neutrino: &'a Particle,
    /// Absent for the rare topologies with no hadronic target (inverse muon decay,
    /// neutrino–electron elastic scattering).
    pub nucleon: Option<StruckNucleon<'a>>,
    pub lepton: &'a Particle,
}

/// Identifies the incoming neutrino, struck nucleon and outgoing lepton of an event.
///
/// Every role must be filled by at most one candidate. Multiple matches indicate an
/// inconsistent record and are reported as [`KinematicsError::AmbiguousParticle`]; they are
/// never resolved by picking the first or the last match. A missing neutrino or lepton is a
/// [`KinematicsError::MissingParticle`]. A missing nucleon is a normal outcome and is
/// signalled by `nucleon: None`.
///
/// # Arguments
///
/// * `event` - The event record to search.
/// * `interaction` - The classified interaction, which relaxes the nucleon rule for
///   coherent and NC meson-exchange-current events.
pub fn locate<'a>(
    event: &'a EventRecord,
    interaction: Interaction,
) -> Result<LocatedParticles<'a>, KinematicsError> {
    let neutrino = unique(
        event
            .initial_state
            .iter()
            .filter(|p| p.pdg == event.neutrino_pdg),
        ParticleRole::Neutrino,
    )?;
    let nucleon = locate_nucleon(event, interaction)?;
    let lepton = unique(
        event
            .final_state
            .iter()
            .filter(|p| p.pdg == event.lepton_pdg && p.energy() == event.lepton_energy),
        ParticleRole::Lepton,
    )?;

    let neutrino = neutrino.ok_or(KinematicsError::MissingParticle {
        role: ParticleRole::Neutrino,
    })?;
    let lepton = lepton.ok_or(KinematicsError::MissingParticle {
        role: ParticleRole::Lepton,
    })?;

    Ok(LocatedParticles {
        neutrino,
        nucleon,
        lepton,
    })
}

/// Finds only the outgoing lepton; needed by observables that do not involve the target.
pub fn locate_lepton(event: &EventRecord) -> Result<&Particle, KinematicsError> {
    unique(
        event
            .final_state
            .iter()
            .filter(|p| p.pdg == event.lepton_pdg && p.energy() == event.lepton_energy),
        ParticleRole::Lepton,
    )?
    .ok_or(KinematicsError::MissingParticle {
        role: ParticleRole::Lepton,
    })
}

fn locate_nucleon(
    event: &EventRecord,
    interaction: Interaction,
) -> Result<Option<StruckNucleon<'_>>, KinematicsError> {
    if interaction.class == InteractionClass::Coherent {
        let candidate = unique(
            event
                .initial_state
                .iter()
                .filter(|p| pdg::is_nucleon(p.pdg) || pdg::is_ion(p.pdg)),
            ParticleRole::Nucleon,
        )?;
        return Ok(candidate.map(|particle| StruckNucleon {
            particle,
            source: if pdg::is_ion(particle.pdg) {
                NucleonSource::Nucleus
            } else {
                NucleonSource::FreeNucleon
            },
        }));
    }

    let free = unique(
        event
            .initial_state
            .iter()
            .filter(|p| pdg::is_nucleon(p.pdg)),
        ParticleRole::Nucleon,
    )?;
    if let Some(particle) = free {
        return Ok(Some(StruckNucleon {
            particle,
            source: NucleonSource::FreeNucleon,
        }));
    }

    if interaction.class == InteractionClass::MesonExchangeCurrent
        && interaction.current == Current::Neutral
    {
        let cluster = unique(
            event
                .initial_state
                .iter()
                .filter(|p| p.pdg != event.neutrino_pdg),
            ParticleRole::Nucleon,
        )?;
        return Ok(cluster.map(|particle| StruckNucleon {
            particle,
            source: NucleonSource::MecCluster,
        }));
    }

    Ok(None)
}

fn unique<'a>(
    mut candidates: impl Iterator<Item = &'a Particle>,
    role: ParticleRole,
) -> Result<Option<&'a Particle>, KinematicsError> {
    let Some(first) = candidates.next() else {
        return Ok(None);
    };
    let extra = candidates.count();
    if extra > 0 {
        return Err(KinematicsError::AmbiguousParticle {
            role,
            count: extra + 1,
        });
    }
    Ok(Some(first))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::four_vector::FourMomentum;
    use crate::core::physics::classifier::classify;

    fn base_event() -> EventRecord {
        EventRecord {
            mode: 1,
            is_cc: true,
            neutrino_pdg: 14,
            lepton_pdg: 13,
            lepton_energy: 0.8,
            initial_state: vec![
                Particle::new(14, FourMomentum::new(0.0, 0.0, 1.0, 1.0)),
                Particle::new(2112, FourMomentum::new(0.1, 0.0, 0.0, 0.92)),
            ],
            final_state: vec![
                Particle::new(13, FourMomentum::new(0.2, 0.0, 0.75, 0.8)).with_rank(1),
                Particle::new(2212, FourMomentum::new(-0.1, 0.0, 0.25, 1.1)).with_rank(1),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn locates_each_role_in_a_ccqe_event() {
        let event = base_event();
        let located = locate(&event, event.interaction()).unwrap();
        assert_eq!(located.neutrino.pdg, 14);
        assert_eq!(located.lepton.pdg, 13);
        let nucleon = located.nucleon.unwrap();
        assert_eq!(nucleon.particle.pdg, 2112);
        assert_eq!(nucleon.source, NucleonSource::FreeNucleon);
    }

    #[test]
    fn missing_nucleon_is_not_an_error() {
        let mut event = base_event();
        event.initial_state.retain(|p| p.pdg != 2112);
        let located = locate(&event, event.interaction()).unwrap();
        assert!(located.nucleon.is_none());
    }

    #[test]
    fn duplicate_lepton_with_same_energy_is_ambiguous() {
        let mut event = base_event();
        let copy = event.final_state[0];
        event.final_state.push(copy);
        let err = locate(&event, event.interaction()).unwrap_err();
        assert_eq!(
            err,
            KinematicsError::AmbiguousParticle {
                role: ParticleRole::Lepton,
                count: 2
            }
        );
    }

    #[test]
    fn same_flavour_secondary_lepton_is_ignored() {
        let mut event = base_event();
        event
            .final_state
            .push(Particle::new(13, FourMomentum::new(0.0, 0.01, 0.05, 0.12)).with_rank(2));
        let located = locate(&event, event.interaction()).unwrap();
        assert_eq!(located.lepton.energy(), 0.8);
    }

    #[test]
    fn two_initial_nucleons_are_ambiguous() {
        let mut event = base_event();
        event
            .initial_state
            .push(Particle::new(2212, FourMomentum::new(0.0, 0.1, 0.0, 0.93)));
        let err = locate(&event, event.interaction()).unwrap_err();
        assert!(matches!(
            err,
            KinematicsError::AmbiguousParticle {
                role: ParticleRole::Nucleon,
                ..
            }
        ));
    }

    #[test]
    fn missing_lepton_is_reported() {
        let mut event = base_event();
        event.lepton_energy = 0.81;
        let err = locate(&event, event.interaction()).unwrap_err();
        assert_eq!(
            err,
            KinematicsError::MissingParticle {
                role: ParticleRole::Lepton
            }
        );
    }

    #[test]
    fn coherent_events_accept_the_nucleus() {
        let mut event = base_event();
        event.mode = 36;
        event.is_cc = false;
        event.initial_state[1] = Particle::new(1000180400, FourMomentum::at_rest(37.2));
        let located = locate(&event, event.interaction()).unwrap();
        let nucleon = located.nucleon.unwrap();
        assert_eq!(nucleon.source, NucleonSource::Nucleus);
        assert_eq!(nucleon.particle.pdg, 1000180400);
    }

    #[test]
    fn nucleus_is_not_a_nucleon_outside_coherent_scattering() {
        let mut event = base_event();
        event.initial_state[1] = Particle::new(1000180400, FourMomentum::at_rest(37.2));
        let located = locate(&event, event.interaction()).unwrap();
        assert!(located.nucleon.is_none());
    }

    #[test]
    fn nc_mec_uses_a_single_cluster_when_no_nucleon_is_listed() {
        let mut event = base_event();
        event.mode = 53;
        event.is_cc = false;
        event.lepton_pdg = 14;
        event.final_state[0].pdg = 14;
        event.initial_state[1] = Particle::new(2000000200, FourMomentum::at_rest(1.87));
        let located = locate(&event, classify(53, Current::Neutral)).unwrap();
        let nucleon = located.nucleon.unwrap();
        assert_eq!(nucleon.source, NucleonSource::MecCluster);
        assert_eq!(nucleon.particle.pdg, 2000000200);
    }

    #[test]
    fn nc_mec_with_several_clusters_is_ambiguous() {
        let mut event = base_event();
        event.is_cc = false;
        event.mode = 53;
        event.initial_state[1] = Particle::new(2000000200, FourMomentum::at_rest(1.87));
        event
            .initial_state
            .push(Particle::new(2000000201, FourMomentum::at_rest(1.87)));
        let err = locate(&event, event.interaction()).unwrap_err();
        assert!(matches!(
            err,
            KinematicsError::AmbiguousParticle {
                role: ParticleRole::Nucleon,
                count: 2
            }
        ));
    }

    #[test]
    fn locate_lepton_works_without_initial_state() {
        let mut event = base_event();
        event.initial_state.clear();
        assert_eq!(locate_lepton(&event).unwrap().pdg, 13);
    }
}
