pub const PROTON: i32 = 2212;
pub const NEUTRON: i32 = 2112;
pub const PI_PLUS: i32 = 211;
pub const PI_ZERO: i32 = 111;

/// Codes above this value are nuclei in the `10LZZZAAAI` convention.
pub const ION_THRESHOLD: i32 = 999_999_999;

#[inline]
pub fn is_nucleon(pdg: i32) -> bool {
    pdg == PROTON || pdg == NEUTRON
}

#[inline]
pub fn is_ion(pdg: i32) -> bool {
    pdg > ION_THRESHOLD
}

pub fn is_neutrino(pdg: i32) -> bool {
    matches!(pdg.unsigned_abs(), 12 | 14 | 16)
}

/// Pions, optionally restricted to the charged states.
pub fn is_pion(pdg: i32, charged_only: bool) -> bool {
    pdg.abs() == PI_PLUS || (!charged_only && pdg == PI_ZERO)
}

/// Atomic number Z of an ion code.
pub fn ion_z(ion_pdg: i32) -> i32 {
    (ion_pdg / 10_000) - 1000 * (ion_pdg / 10_000_000)
}

/// Mass number A of an ion code.
pub fn ion_a(ion_pdg: i32) -> i32 {
    (ion_pdg / 10) - 1000 * (ion_pdg / 10_000)
}

/// ROOT-LaTeX label for a neutrino flavour, or an empty string for anything else.
pub fn neutrino_label(pdg: i32) -> &'static str {
    match pdg {
        -12 => "#bar#nu_{e}",
        12 => "#nu_{e}",
        -14 => "#bar#nu_{#mu}",
        14 => "#nu_{#mu}",
        -16 => "#bar#nu_{#tau}",
        16 => "#nu_{#tau}",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_argon_40() {
        let ar40 = 1000180400;
        assert!(is_ion(ar40));
        assert_eq!(ion_z(ar40), 18);
        assert_eq!(ion_a(ar40), 40);
    }

    #[test]
    fn decodes_carbon_12() {
        assert_eq!(ion_z(1000060120), 6);
        assert_eq!(ion_a(1000060120), 12);
    }

    #[test]
    fn classifies_common_species() {
        assert!(is_nucleon(2212) && is_nucleon(2112));
        assert!(!is_nucleon(-2212));
        assert!(is_neutrino(-14) && !is_neutrino(13));
        assert!(is_pion(-211, true));
        assert!(!is_pion(111, true));
        assert!(is_pion(111, false));
        assert!(!is_ion(2212));
    }

    #[test]
    fn neutrino_labels() {
        assert_eq!(neutrino_label(14), "#nu_{#mu}");
        assert_eq!(neutrino_label(-12), "#bar#nu_{e}");
        assert_eq!(neutrino_label(2212), "");
    }
}
