use crate::core::histogram::hist::Histogram;

/// Integrated DUNE near-detector ν_μ flux in FHC mode, per cm² per POT.
pub const ND_FHC_INTEGRATED_FLUX: f64 = 0.0010489263;
/// Integrated DUNE near-detector ν̄_μ flux in RHC mode, per cm² per POT.
pub const ND_RHC_INTEGRATED_FLUX: f64 = 0.00094423594;
/// Argon nucleons per tonne in units of 10³⁸ (cross sections are in 10⁻³⁸ cm²).
pub const NUCLEON_TONNE_SCALE: f64 = 5.98;
/// Protons on target per year, in units of 10⁹.
pub const POT_PER_YEAR: f64 = 1.1e12;

/// How filled histograms are converted to event rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalization {
    None,
    /// Scale by `flux × 10⁻⁴ × nucleon_tonne_scale × pot_per_year`, with the flux chosen by
    /// the sign of the selection's neutrino PDG. Only ν_e and ν_μ (and their antiparticles)
    /// are covered by the tabulated fluxes.
    FluxExposure {
        fhc_integrated_flux: f64,
        rhc_integrated_flux: f64,
        nucleon_tonne_scale: f64,
        pot_per_year: f64,
    },
}

impl Default for Normalization {
    fn default() -> Self {
        Normalization::FluxExposure {
            fhc_integrated_flux: ND_FHC_INTEGRATED_FLUX,
            rhc_integrated_flux: ND_RHC_INTEGRATED_FLUX,
            nucleon_tonne_scale: NUCLEON_TONNE_SCALE,
            pot_per_year: POT_PER_YEAR,
        }
    }
}

impl Normalization {
    /// The scale factor for histograms of the given neutrino species, if any applies.
    pub fn factor(&self, neutrino_pdg: i32) -> Option<f64> {
        match *self {
            Normalization::None => None,
            Normalization::FluxExposure {
                fhc_integrated_flux,
                rhc_integrated_flux,
                nucleon_tonne_scale,
                pot_per_year,
            } => {
                let flux = match neutrino_pdg {
                    12 | 14 => fhc_integrated_flux,
                    -12 | -14 => rhc_integrated_flux,
                    _ => return None,
                };
                Some(flux * 1e-4 * nucleon_tonne_scale * pot_per_year)
            }
        }
    }

    /// Scales a non-empty histogram in place. Returns the factor that was applied.
    pub fn apply(&self, hist: &mut Histogram, neutrino_pdg: i32) -> Option<f64> {
        if hist.entries() == 0 {
            return None;
        }
        let factor = self.factor(neutrino_pdg)?;
        hist.scale(factor);
        Some(factor)
    }
}
