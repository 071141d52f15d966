use crate::core::models::event::EventRecord;
use crate::core::physics::classifier::Interaction;
use crate::core::physics::kinematics::{
    self, KinematicsBundle, KinematicsError, KinematicsSettings,
};
use std::cell::OnceCell;

/// Per-event evaluation state shared by every distribution.
///
/// The kinematics bundle is computed on first use and reused afterwards, so events that
/// only feed record passthrough quantities never touch the particle locator.
pub struct EventContext<'a> {
    pub event: &'a EventRecord,
    pub interaction: Interaction,
    settings: &'a KinematicsSettings,
    kinematics: OnceCell<Result<KinematicsBundle, KinematicsError>>,
}

impl<'a> EventContext<'a> {
    pub fn new(event: &'a EventRecord, settings: &'a KinematicsSettings) -> Self {
        Self {
            event,
            interaction: event.interaction(),
            settings,
            kinematics: OnceCell::new(),
        }
    }

    pub fn kinematics(&self) -> Result<&KinematicsBundle, KinematicsError> {
        self.kinematics
            .get_or_init(|| {
                kinematics::compute_kinematics_with(self.event, self.interaction, self.settings)
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn settings(&self) -> &KinematicsSettings {
        self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::four_vector::FourMomentum;
    use crate::core::models::particle::Particle;

    #[test]
    fn caches_the_outcome_including_errors() {
        let event = EventRecord {
            mode: 1,
            is_cc: true,
            neutrino_pdg: 14,
            lepton_pdg: 13,
            lepton_energy: 0.8,
            initial_state: vec![Particle::new(14, FourMomentum::new(0.0, 0.0, 1.0, 1.0))],
            final_state: vec![Particle::new(13, FourMomentum::new(0.0, 0.3, 0.7, 0.8))],
            ..Default::default()
        };
        let settings = KinematicsSettings::default();
        let ctx = EventContext::new(&event, &settings);
        assert_eq!(
            ctx.kinematics().unwrap_err(),
            KinematicsError::NoNucleonFound
        );
        assert_eq!(
            ctx.kinematics().unwrap_err(),
            KinematicsError::NoNucleonFound
        );
        assert!(ctx.kinematics.get().is_some());
    }
}
