use crate::core::models::event::EventRecord;
use crate::core::physics::classifier::{Current, InteractionClass};
use crate::core::physics::pdg;

/// An event filter applied before a distribution is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Neutrino flavour, current and interaction class. [`InteractionClass::Undefined`]
    /// accepts every class.
    NuMode {
        pdg: i32,
        current: Current,
        class: InteractionClass,
    },
    /// Exactly one pion in the final state, from the record's topology flags. With
    /// `charged_only`, the π⁰ topology is rejected.
    Cc1Pi { pdg: i32, charged_only: bool },
}

impl Selection {
    pub fn passes(&self, event: &EventRecord) -> bool {
        match *self {
            Selection::NuMode {
                pdg,
                current,
                class,
            } => {
                let interaction = event.interaction();
                event.neutrino_pdg == pdg
                    && interaction.current == current
                    && (class == InteractionClass::Undefined || interaction.class == class)
            }
            Selection::Cc1Pi { pdg, charged_only } => {
                let flags = event.topology;
                event.neutrino_pdg == pdg
                    && (flags.cc1pip || flags.cc1pim || (!charged_only && flags.cc1pi0))
            }
        }
    }

    pub fn neutrino_pdg(&self) -> i32 {
        match *self {
            Selection::NuMode { pdg, .. } | Selection::Cc1Pi { pdg, .. } => pdg,
        }
    }

    /// ROOT-LaTeX title, e.g. `#nu_{#mu}CCQE`.
    pub fn title(&self) -> String {
        match *self {
            Selection::NuMode {
                pdg,
                current,
                class,
            } => format!(
                "{}{}{}",
                pdg::neutrino_label(pdg),
                current.label(),
                class.label()
            ),
            Selection::Cc1Pi { pdg, charged_only } => format!(
                "{}CC1#pi{}",
                pdg::neutrino_label(pdg),
                if charged_only { "^{#pm}" } else { "" }
            ),
        }
    }
}

/// A selection with the name used as histogram-name suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSelection {
    pub name: String,
    pub selection: Selection,
}

impl NamedSelection {
    pub fn new(name: impl Into<String>, selection: Selection) -> Self {
        Self {
            name: name.into(),
            selection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::event::TopologyFlags;

    fn numu_ccqe() -> Selection {
        Selection::NuMode {
            pdg: 14,
            current: Current::Charged,
            class: InteractionClass::QuasiElastic,
        }
    }

    fn event(pdg: i32, mode: i32, is_cc: bool) -> EventRecord {
        EventRecord {
            neutrino_pdg: pdg,
            mode,
            is_cc,
            ..Default::default()
        }
    }

    #[test]
    fn nu_mode_requires_all_three() {
        let sel = numu_ccqe();
        assert!(sel.passes(&event(14, 1, true)));
        assert!(!sel.passes(&event(-14, -1, true)));
        assert!(!sel.passes(&event(14, 1, false)));
        assert!(!sel.passes(&event(14, 11, true)));
    }

    #[test]
    fn undefined_class_accepts_any_mode() {
        let sel = Selection::NuMode {
            pdg: 14,
            current: Current::Neutral,
            class: InteractionClass::Undefined,
        };
        assert!(sel.passes(&event(14, 31, false)));
        assert!(sel.passes(&event(14, 51, false)));
        assert!(!sel.passes(&event(14, 31, true)));
    }

    #[test]
    fn cc1pi_uses_topology_flags() {
        let charged = Selection::Cc1Pi {
            pdg: 14,
            charged_only: true,
        };
        let any = Selection::Cc1Pi {
            pdg: 14,
            charged_only: false,
        };
        let mut e = event(14, 11, true);
        e.topology = TopologyFlags {
            cc1pi0: true,
            ..Default::default()
        };
        assert!(!charged.passes(&e));
        assert!(any.passes(&e));
        e.topology.cc1pim = true;
        assert!(charged.passes(&e));
    }

    #[test]
    fn titles() {
        assert_eq!(numu_ccqe().title(), "#nu_{#mu}CCQE");
        let nc = Selection::NuMode {
            pdg: -12,
            current: Current::Neutral,
            class: InteractionClass::Undefined,
        };
        assert_eq!(nc.title(), "#bar#nu_{e}NC");
        let cc1pi = Selection::Cc1Pi {
            pdg: 14,
            charged_only: true,
        };
        assert_eq!(cc1pi.title(), "#nu_{#mu}CC1#pi^{#pm}");
        assert_eq!(cc1pi.neutrino_pdg(), 14);
    }
}
