use phf::{Map, phf_map};

/// On-shell neutron mass, used as the fixed nucleon mass of the experimentalist conventions.
pub const NEUTRON_MASS: f64 = 0.93956541;
pub const PROTON_MASS: f64 = 0.938272;
/// Ground-state mass of an argon-40 nucleus, GeV.
pub const ARGON40_MASS: f64 = 37.215526;
/// Maximum |Q²_recomputed − Q²_reference| tolerated, GeV².
pub const Q2_TOLERANCE: f64 = 1e-4;

/// Rest masses in GeV, keyed by |PDG|. Particle and antiparticle share an entry.
static PARTICLE_MASSES: Map<u32, f64> = phf_map! {
    11u32 => 0.000510,
    13u32 => 0.105658,
    15u32 => 1.77686,
    111u32 => 0.134977,
    211u32 => 0.139570,
    311u32 => 0.497648,
    321u32 => 0.493677,
    2112u32 => 0.939565,
    2212u32 => 0.938272,
};

/// Looks up the rest mass of a particle species.
///
/// Returns `None` for species outside the table (nuclei, resonances, photons are massless
/// and handled by the caller).
pub fn particle_mass(pdg: i32) -> Option<f64> {
    if pdg == 22 || matches!(pdg.unsigned_abs(), 12 | 14 | 16) {
        return Some(0.0);
    }
    PARTICLE_MASSES.get(&pdg.unsigned_abs()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masses_are_charge_conjugation_symmetric() {
        assert_eq!(particle_mass(13), particle_mass(-13));
        assert_eq!(particle_mass(211), particle_mass(-211));
        assert_eq!(particle_mass(-321), Some(0.493677));
    }

    #[test]
    fn nucleon_masses_match_table() {
        assert_eq!(particle_mass(2212), Some(PROTON_MASS));
        assert_eq!(particle_mass(2112), Some(0.939565));
    }

    #[test]
    fn neutrinos_and_photons_are_massless() {
        assert_eq!(particle_mass(14), Some(0.0));
        assert_eq!(particle_mass(-12), Some(0.0));
        assert_eq!(particle_mass(22), Some(0.0));
    }

    #[test]
    fn unknown_species_have_no_mass() {
        assert_eq!(particle_mass(1000180400), None);
        assert_eq!(particle_mass(3122), None);
    }
}
