use nuvalid::core::physics::constants::{ARGON40_MASS, NEUTRON_MASS, Q2_TOLERANCE};
use nuvalid::engine::normalization::{
    ND_FHC_INTEGRATED_FLUX, ND_RHC_INTEGRATED_FLUX, NUCLEON_TONNE_SCALE, POT_PER_YEAR,
};

pub struct DefaultsConfig {
    pub nucleon_mass: f64,
    pub target_mass: f64,
    pub q2_tolerance: f64,
    pub normalize: bool,
    pub fhc_integrated_flux: f64,
    pub rhc_integrated_flux: f64,
    pub nucleon_tonne_scale: f64,
    pub pot_per_year: f64,
    pub use_scale_factor: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            nucleon_mass: NEUTRON_MASS,
            target_mass: ARGON40_MASS,
            q2_tolerance: Q2_TOLERANCE,
            normalize: true,
            fhc_integrated_flux: ND_FHC_INTEGRATED_FLUX,
            rhc_integrated_flux: ND_RHC_INTEGRATED_FLUX,
            nucleon_tonne_scale: NUCLEON_TONNE_SCALE,
            pot_per_year: POT_PER_YEAR,
            use_scale_factor: false,
        }
    }
}
