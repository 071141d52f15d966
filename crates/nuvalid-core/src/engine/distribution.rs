use super::config::{AnalysisPlan, AnalysisPlanBuilder, ConfigError};
use super::quantity::{Binning, Quantity};
use super::selection::{NamedSelection, Selection};
use crate::core::histogram::hist::{Hist1D, Hist2D, Histogram, HistogramInfo};
use crate::core::physics::classifier::{Current, InteractionClass};
use tracing::warn;

/// Name of the selection used by [`default_plan`].
pub const DEFAULT_SELECTION: &str = "num_ccqe";

/// A quantity bound to a selection and the histogram it fills.
#[derive(Debug, Clone)]
pub struct Distribution {
    pub quantity: Quantity,
    pub selection: NamedSelection,
    pub histogram: Histogram,
}

impl Distribution {
    /// Creates the empty histogram, named `{key}_{selection}` and titled
    /// `{quantity title}, {selection title}`.
    pub fn new(quantity: Quantity, selection: NamedSelection) -> Self {
        let info = quantity.info();
        let meta = HistogramInfo {
            name: format!("{}_{}", info.key, selection.name),
            title: format!("{}, {}", info.title, selection.selection.title()),
            x_title: info.x_title,
            y_title: info.y_title,
        };
        let histogram = match info.binning {
            Binning::One(axis) => Histogram::OneD(Hist1D::new(meta, axis)),
            Binning::Two(x, y) => Histogram::TwoD(Hist2D::new(meta, x, y)),
        };
        Self {
            quantity,
            selection,
            histogram,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.histogram.name()
    }
}

/// Instantiates the histograms of a validated plan.
///
/// Multiplicities of species without a tabulated mass are kept (their kinetic energy is
/// taken as the total energy) but logged once here.
pub fn instantiate(plan: &AnalysisPlan) -> Result<Vec<Distribution>, ConfigError> {
    plan.distributions
        .iter()
        .map(|spec| {
            let selection = plan.selection(&spec.selection).cloned().ok_or_else(|| {
                ConfigError::UnknownSelection {
                    quantity: spec.quantity.to_string(),
                    selection: spec.selection.clone(),
                }
            })?;
            if let Quantity::Multiplicity { pdg, .. } = spec.quantity {
                if spec.quantity.multiplicity_mass().is_none() {
                    warn!(
                        pdg,
                        "No mass tabulated for multiplicity species; assuming massless."
                    );
                }
            }
            Ok(Distribution::new(spec.quantity, selection))
        })
        .collect()
}

/// The reference validation set: ν_μ CC quasi-elastic events with the full catalog.
pub fn default_plan() -> AnalysisPlanBuilder {
    AnalysisPlanBuilder::new()
        .selection(
            DEFAULT_SELECTION,
            Selection::NuMode {
                pdg: 14,
                current: Current::Charged,
                class: InteractionClass::QuasiElastic,
            },
        )
        .distributions(Quantity::reference_catalog(), DEFAULT_SELECTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_naming() {
        let plan = default_plan().build().unwrap();
        let dists = instantiate(&plan).unwrap();
        assert_eq!(dists.len(), Quantity::reference_catalog().len());

        let q2 = dists.iter().find(|d| d.quantity == Quantity::Q2).unwrap();
        assert_eq!(q2.name(), "hq2_num_ccqe");
        assert_eq!(q2.histogram.info().title, "Q^{2}, #nu_{#mu}CCQE");
        assert_eq!(q2.histogram.info().x_title, "Q^{2} (GeV^{2})");
        assert_eq!(q2.histogram.arity(), 1);

        let q0q3 = dists
            .iter()
            .find(|d| d.quantity == Quantity::EnergyMomentumTransfer)
            .unwrap();
        assert_eq!(q0q3.histogram.arity(), 2);
    }

    #[test]
    fn default_plan_includes_multiplicities() {
        let plan = default_plan().build().unwrap();
        let names: Vec<String> = instantiate(&plan)
            .unwrap()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        for expected in [
            "hmult_2212_num_ccqe",
            "hmult_2212_30MeV_num_ccqe",
            "hmult_2112_num_ccqe",
            "hmult_-211_num_ccqe",
            "hmult_311_num_ccqe",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
    }
}
