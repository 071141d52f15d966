use phf::{Map, phf_map};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Closed taxonomy of neutrino interaction channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionClass {
    QuasiElastic,
    Resonance,
    DeepInelastic,
    Coherent,
    /// Meson-exchange current (2p2h).
    MesonExchangeCurrent,
    /// Mode codes the table does not know about.
    #[default]
    Undefined,
}

/// Charged-current (W exchange) or neutral-current (Z exchange).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Current {
    #[serde(alias = "cc")]
    Charged,
    #[serde(alias = "nc")]
    Neutral,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ClassifierParseError {
    #[error("Unknown interaction class '{0}'")]
    UnknownClass(String),
    #[error("Unknown current '{0}', expected 'cc' or 'nc'")]
    UnknownCurrent(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interaction {
    pub class: InteractionClass,
    pub current: Current,
}

// NEUT mode numbering as used by NUISANCE flat trees. Antineutrino modes carry a minus sign
// and share the entry of their absolute value.
static MODE_TABLE: Map<u32, InteractionClass> = phf_map! {
    // CCQE, NC elastic on p / n
    1u32 => InteractionClass::QuasiElastic,
    51u32 => InteractionClass::QuasiElastic,
    52u32 => InteractionClass::QuasiElastic,
    // CC single pion / gamma / eta / kaon
    11u32 => InteractionClass::Resonance,
    12u32 => InteractionClass::Resonance,
    13u32 => InteractionClass::Resonance,
    17u32 => InteractionClass::Resonance,
    22u32 => InteractionClass::Resonance,
    23u32 => InteractionClass::Resonance,
    // NC single pion / gamma / eta / kaon
    31u32 => InteractionClass::Resonance,
    32u32 => InteractionClass::Resonance,
    33u32 => InteractionClass::Resonance,
    34u32 => InteractionClass::Resonance,
    38u32 => InteractionClass::Resonance,
    39u32 => InteractionClass::Resonance,
    42u32 => InteractionClass::Resonance,
    43u32 => InteractionClass::Resonance,
    44u32 => InteractionClass::Resonance,
    45u32 => InteractionClass::Resonance,
    // Multi-pion with W < 2 GeV is grouped with DIS.
    21u32 => InteractionClass::DeepInelastic,
    26u32 => InteractionClass::DeepInelastic,
    41u32 => InteractionClass::DeepInelastic,
    46u32 => InteractionClass::DeepInelastic,
    16u32 => InteractionClass::Coherent,
    36u32 => InteractionClass::Coherent,
    2u32 => InteractionClass::MesonExchangeCurrent,
    53u32 => InteractionClass::MesonExchangeCurrent,
};

/// Maps a generator mode code to its interaction class.
///
/// The sign of `mode` is ignored. Unknown codes degrade to [`InteractionClass::Undefined`]
/// since generators introduce new modes over time.
pub fn interaction_class(mode: i32) -> InteractionClass {
    MODE_TABLE
        .get(&mode.unsigned_abs())
        .copied()
        .unwrap_or(InteractionClass::Undefined)
}

/// Combines the mode lookup with the record's CC/NC flag.
pub fn classify(mode: i32, current: Current) -> Interaction {
    Interaction {
        class: interaction_class(mode),
        current,
    }
}

impl InteractionClass {
    /// Short label used in histogram titles.
    pub fn label(&self) -> &'static str {
        match self {
            InteractionClass::QuasiElastic => "QE",
            InteractionClass::Resonance => "Res",
            InteractionClass::DeepInelastic => "DIS",
            InteractionClass::Coherent => "Coh",
            InteractionClass::MesonExchangeCurrent => "MEC",
            InteractionClass::Undefined => "",
        }
    }
}

impl Current {
    /// Interprets the flat-tree `cc` branch, which is stored as a char-sized integer.
    pub fn from_flag(flag: i32) -> Self {
        if flag != 0 {
            Current::Charged
        } else {
            Current::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Current::Charged => "CC",
            Current::Neutral => "NC",
        }
    }
}

impl fmt::Display for InteractionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InteractionClass::QuasiElastic => "quasi-elastic",
            InteractionClass::Resonance => "resonance",
            InteractionClass::DeepInelastic => "deep-inelastic",
            InteractionClass::Coherent => "coherent",
            InteractionClass::MesonExchangeCurrent => "meson-exchange-current",
            InteractionClass::Undefined => "undefined",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Current {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InteractionClass {
    type Err = ClassifierParseError;

    /// Accepts the kebab-case names as well as the short labels, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quasi-elastic" | "qe" => Ok(InteractionClass::QuasiElastic),
            "resonance" | "res" => Ok(InteractionClass::Resonance),
            "deep-inelastic" | "dis" => Ok(InteractionClass::DeepInelastic),
            "coherent" | "coh" => Ok(InteractionClass::Coherent),
            "meson-exchange-current" | "mec" | "2p2h" => Ok(InteractionClass::MesonExchangeCurrent),
            "undefined" | "any" => Ok(InteractionClass::Undefined),
            _ => Err(ClassifierParseError::UnknownClass(s.to_string())),
        }
    }
}

impl FromStr for Current {
    type Err = ClassifierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cc" | "charged" => Ok(Current::Charged),
            "nc" | "neutral" => Ok(Current::Neutral),
            _ => Err(ClassifierParseError::UnknownCurrent(s.to_string())),
        }
    }
}
