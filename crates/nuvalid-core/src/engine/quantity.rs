use super::context::EventContext;
use crate::core::histogram::axis::Axis;
use crate::core::histogram::hist::Sample;
use crate::core::physics::constants::particle_mass;
use crate::core::physics::kinematics::KinematicsError;
use crate::core::physics::observables::{self as obs, HadronSpecies};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Axis layout of a quantity's histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Binning {
    One(Axis),
    Two(Axis, Axis),
}

impl Binning {
    pub fn arity(&self) -> usize {
        match self {
            Binning::One(_) => 1,
            Binning::Two(..) => 2,
        }
    }
}

/// Per-hadron observables of the leading (highest |p|) particle of a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadingObservable {
    Momentum,
    KineticEnergy,
    CosTheta,
    LeptonCosOpening,
    LeptonDeltaPhi,
}

/// Every variable that can be histogrammed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quantity {
    NeutrinoEnergy,
    EnergyTransfer,
    MomentumTransfer,
    Q2,
    TheoristsW,
    ExperimentalistsW,
    TheoristsX,
    ExperimentalistsX,
    TheoristsY,
    ExperimentalistsY,
    TheoristsNu,
    ExperimentalistsNu,
    BindingEnergy,
    LeptonMomentum,
    LeptonCosTheta,
    LeptonTransverseMomentum,
    LeptonLongitudinalMomentum,
    ReconstructedEnergy,
    ReconstructionBias,
    RelativeReconstructionBias,
    ReconstructedY,
    MissingEnergy,
    MissingMomentum,
    TransverseMomentumImbalance,
    BoostingAngle,
    TransverseOpeningAngle,
    Leading {
        species: HadronSpecies,
        observable: LeadingObservable,
        ke_threshold: f64,
    },
    Multiplicity {
        pdg: i32,
        ke_threshold: f64,
    },
    // Two-dimensional.
    EnergyMomentumTransfer,
    LeptonMomentumCosTheta,
    LeadingProtonKeEnergyTransfer,
    ProtonKineticEnergyPair,
    MissingEnergyMomentum,
    Q2W,
    BjorkenXInelasticity,
    NeutrinoEnergyReconstructed,
}

/// Display metadata of a quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantityInfo {
    /// Histogram-name prefix.
    pub key: String,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub binning: Binning,
}

const fn axis(bins: usize, low: f64, high: f64) -> Axis {
    Axis::uniform(bins, low, high)
}

const COS: Axis = axis(50, -1.0, 1.0);
const MOMENTUM: Axis = axis(20, 0.0, 2.0);
const UNIT: Axis = axis(20, 0.0, 1.0);
const ENERGY: Axis = axis(50, 0.0, 10.0);
const AZIMUTH: Axis = axis(40, -PI, PI);
const EMISS: Axis = axis(40, 25.0, 70.0);
const PMISS: Axis = axis(25, 0.0, 300.0);

fn one(key: &str, title: &str, x_title: &str, binning: Axis) -> QuantityInfo {
    QuantityInfo {
        key: key.to_string(),
        title: title.to_string(),
        x_title: x_title.to_string(),
        y_title: "Events".to_string(),
        binning: Binning::One(binning),
    }
}

fn two(key: &str, title: &str, x_title: &str, y_title: &str, x: Axis, y: Axis) -> QuantityInfo {
    QuantityInfo {
        key: key.to_string(),
        title: title.to_string(),
        x_title: x_title.to_string(),
        y_title: y_title.to_string(),
        binning: Binning::Two(x, y),
    }
}

fn threshold_suffix(ke_threshold: f64) -> String {
    if ke_threshold > 0.0 {
        format!("_{}MeV", (ke_threshold * 1000.0).round() as i64)
    } else {
        String::new()
    }
}

fn threshold_title(symbol: &str, ke_threshold: f64) -> String {
    if ke_threshold > 0.0 {
        let mev = (ke_threshold * 1000.0).round() as i64;
        format!(", KE_{{{symbol}}} > {mev} MeV")
    } else {
        String::new()
    }
}

fn species_slug(species: HadronSpecies) -> &'static str {
    match species {
        HadronSpecies::Proton => "proton",
        HadronSpecies::Neutron => "neutron",
        HadronSpecies::Pion { .. } => "pion",
    }
}

fn leading_info(
    species: HadronSpecies,
    observable: LeadingObservable,
    ke_threshold: f64,
) -> QuantityInfo {
    let s = species.symbol();
    let tag = match species {
        HadronSpecies::Proton => "p",
        HadronSpecies::Neutron => "n",
        HadronSpecies::Pion { .. } => "pi",
    };
    let charged = if matches!(species, HadronSpecies::Pion { charged_only: true }) {
        "_chg"
    } else {
        ""
    };
    let (prefix, label, x_title, binning) = match observable {
        LeadingObservable::Momentum => (
            "hp",
            format!("p_{{{s}}}"),
            format!("p_{{{s}}} (GeV)"),
            MOMENTUM,
        ),
        LeadingObservable::KineticEnergy => (
            "hke",
            format!("KE_{{{s}}}"),
            format!("KE_{{{s}}} (GeV)"),
            UNIT,
        ),
        LeadingObservable::CosTheta => (
            "ht",
            format!("cos#theta_{{{s}}}"),
            format!("cos#theta_{{{s}}}"),
            COS,
        ),
        LeadingObservable::LeptonCosOpening => (
            "htlep",
            format!("cos#theta_{{lep,{s}}}"),
            format!("cos#theta_{{lep,{s}}}"),
            COS,
        ),
        LeadingObservable::LeptonDeltaPhi => (
            "hdphil",
            format!("#Delta#phi_{{lep,{s}}}"),
            format!("#Delta#phi_{{lep,{s}}}"),
            AZIMUTH,
        ),
    };
    QuantityInfo {
        key: format!("{prefix}{tag}{charged}{}", threshold_suffix(ke_threshold)),
        title: format!("Leading {s}, {label}{}", threshold_title(s, ke_threshold)),
        x_title,
        y_title: "Events".to_string(),
        binning: Binning::One(binning),
    }
}

impl Quantity {
    pub fn info(&self) -> QuantityInfo {
        use Quantity::*;
        match *self {
            NeutrinoEnergy => one("henu", "E_{#nu}", "E_{#nu} (GeV)", ENERGY),
            EnergyTransfer => one("hq0", "q^{0}", "q^{0} (GeV)", MOMENTUM),
            MomentumTransfer => one("hq3", "q^{3}", "q^{3} (GeV)", MOMENTUM),
            Q2 => one("hq2", "Q^{2}", "Q^{2} (GeV^{2})", MOMENTUM),
            TheoristsW => one(
                "hthw",
                "Theorists W = sqrt(p.p + 2p.q - Q^2)",
                "Theorists W = sqrt(p.p + 2p.q - Q^2) (GeV)",
                MOMENTUM,
            ),
            ExperimentalistsW => one(
                "hexpw",
                "Experimentalists W = sqrt(M^2 + 2Mq0 - Q^2)",
                "Experimentalists W = sqrt(M^2 + 2Mq0 - Q^2) (GeV)",
                axis(20, 0.5, 1.5),
            ),
            TheoristsX => one(
                "hthbx",
                "Theorists Bjorken x = Q^2/(2p.q)",
                "Theorists Bjorken x = Q^2/(2p.q)",
                axis(10, 0.0, 1.0),
            ),
            ExperimentalistsX => one(
                "hexpbx",
                "Experimentalists Bjorken x = Q^2/(2Mq0)",
                "Experimentalists Bjorken x = Q^2/(2Mq0)",
                axis(15, 0.0, 1.5),
            ),
            TheoristsY => one(
                "hthinely",
                "Theorists Inelasticity y = (p.q)/(p.k)",
                "Theorists Inelasticity y = (p.q)/(p.k)",
                UNIT,
            ),
            ExperimentalistsY => one(
                "hexpinely",
                "Experimentalists Inelasticity y = 1-(Elep/Enu)",
                "Experimentalists Inelasticity y = 1-(Elep/Enu)",
                UNIT,
            ),
            TheoristsNu => one(
                "hthnu",
                "Theorists nu = p.q/sqrt(p^2)",
                "Theorists nu = p.q/sqrt(p^2)",
                UNIT,
            ),
            ExperimentalistsNu => one(
                "hexpnu",
                "Experimentalists nu = Enu-Elep = q0",
                "Experimentalists nu = Enu-Elep = q0",
                UNIT,
            ),
            BindingEnergy => one(
                "hbe",
                "Binding Energy",
                "Binding Energy from energy balance (GeV)",
                axis(50, 0.0, 0.1),
            ),
            LeptonMomentum => one("hpl", "p_{lep}", "p_{lep} (GeV)", MOMENTUM),
            LeptonCosTheta => one("htl", "cos#theta_{lep}", "cos#theta_{lep}", COS),
            LeptonTransverseMomentum => one("hpmuT", "p_{T,lep}", "p_{T,lep} (GeV)", MOMENTUM),
            LeptonLongitudinalMomentum => one("hpmuL", "p_{L,lep}", "p_{L,lep} (GeV)", MOMENTUM),
            ReconstructedEnergy => one("herec", "E_{rec}", "E_{rec} (GeV)", ENERGY),
            ReconstructionBias => one(
                "herecabsbias",
                "E_{rec} - E_{#nu}",
                "E_{rec} - E_{#nu} (GeV)",
                axis(40, -1.0, 1.0),
            ),
            RelativeReconstructionBias => one(
                "herecrelbias",
                "(E_{rec} - E_{#nu})/E_{#nu}",
                "(E_{rec} - E_{#nu})/E_{#nu}",
                axis(40, -1.0, 1.0),
            ),
            ReconstructedY => one("hrecoy", "y_{rec} = 1-(Elep/Erec)", "y_{rec}", UNIT),
            MissingEnergy => one("hEmiss", "E_{miss}", "E_{miss}", EMISS),
            MissingMomentum => one("hPmiss", "p_{miss}", "p_{miss}", PMISS),
            TransverseMomentumImbalance => one("hdpt", "#deltap_{T}", "#deltap_{T} (GeV)", UNIT),
            BoostingAngle => one(
                "hdat",
                "#delta#alpha_{T}",
                "#delta#alpha_{T}",
                axis(18, 0.0, PI),
            ),
            TransverseOpeningAngle => one(
                "hdphit",
                "#delta#phi_{T}",
                "#delta#phi_{T}",
                axis(18, 0.0, PI),
            ),
            Leading {
                species,
                observable,
                ke_threshold,
            } => leading_info(species, observable, ke_threshold),
            Multiplicity { pdg, ke_threshold } => QuantityInfo {
                key: format!("hmult_{pdg}{}", threshold_suffix(ke_threshold)),
                title: format!(
                    "Multiplicity, PDG {pdg}{}",
                    threshold_title(&pdg.to_string(), ke_threshold)
                ),
                x_title: format!("N_{{{pdg}}}"),
                y_title: "Events".to_string(),
                binning: Binning::One(axis(20, 0.0, 20.0)),
            },
            EnergyMomentumTransfer => two(
                "hq0q3",
                "q^{0}/q^{3}",
                "q^{3} (GeV)",
                "q^{0} (GeV)",
                axis(48, 0.0, 1.2),
                axis(48, 0.0, 1.2),
            ),
            LeptonMomentumCosTheta => two(
                "hptl",
                "Lepton p/#theta",
                "p_{lep} (GeV)",
                "cos#theta_{lep}",
                MOMENTUM,
                COS,
            ),
            LeadingProtonKeEnergyTransfer => two(
                "hpkeq0",
                "Leading p KE vs. q^{0}",
                "Leading proton KE (GeV)",
                "q^{0} (GeV)",
                axis(50, 0.0, 0.5),
                axis(50, 0.0, 0.5),
            ),
            ProtonKineticEnergyPair => two(
                "hpke",
                "Proton KE",
                "Leading proton KE T_{p1} (GeV)",
                "Subleading proton KE T_{p2} (GeV)",
                UNIT,
                UNIT,
            ),
            MissingEnergyMomentum => two(
                "hEmissPmiss",
                "E_{miss} - p_{miss}",
                "p_{miss}",
                "E_{miss}",
                PMISS,
                EMISS,
            ),
            Q2W => two(
                "hq2w",
                "Q^{2} vs. W",
                "Q^{2} (GeV^{2})",
                "Theorists W (GeV)",
                MOMENTUM,
                MOMENTUM,
            ),
            BjorkenXInelasticity => two(
                "hxy",
                "Bjorken x vs. inelasticity y",
                "Theorists Bjorken x",
                "Theorists Inelasticity y",
                axis(10, 0.0, 1.0),
                UNIT,
            ),
            NeutrinoEnergyReconstructed => two(
                "henuerec",
                "E_{#nu} vs. E_{rec}",
                "E_{#nu} (GeV)",
                "E_{rec} (GeV)",
                ENERGY,
                ENERGY,
            ),
        }
    }

    pub fn key(&self) -> String {
        self.info().key
    }

    pub fn binning(&self) -> Binning {
        self.info().binning
    }

    pub fn arity(&self) -> usize {
        self.binning().arity()
    }

    pub fn axis_titles(&self) -> (String, String) {
        let info = self.info();
        (info.x_title, info.y_title)
    }

    /// Whether evaluation needs the struck nucleon (and hence the kinematics bundle).
    pub fn requires_kinematics(&self) -> bool {
        use Quantity::*;
        matches!(
            self,
            TheoristsW
                | ExperimentalistsW
                | TheoristsX
                | ExperimentalistsX
                | TheoristsY
                | ExperimentalistsY
                | TheoristsNu
                | ExperimentalistsNu
                | BindingEnergy
                | Q2W
                | BjorkenXInelasticity
        )
    }

    /// Rest mass used for the multiplicity threshold, or `None` if the species is not in the
    /// mass table (then treated as massless).
    pub fn multiplicity_mass(&self) -> Option<f64> {
        match *self {
            Quantity::Multiplicity { pdg, .. } => particle_mass(pdg),
            _ => None,
        }
    }

    /// Evaluates the quantity for one event.
    ///
    /// `Ok(None)` means the event has nothing to contribute (for example no leading proton).
    ///
    /// # Errors
    ///
    /// Propagates [`KinematicsError`]s from locating the lepton or computing the bundle.
    /// [`KinematicsError::NoNucleonFound`] is among them and should be treated as a skip.
    pub fn evaluate(&self, ctx: &EventContext<'_>) -> Result<Option<Sample>, KinematicsError> {
        use Quantity::*;
        let event = ctx.event;
        let value = |x: f64| Ok(Some(Sample::One(x)));

        match *self {
            NeutrinoEnergy => value(event.neutrino_energy),
            EnergyTransfer => value(event.reference.q0),
            MomentumTransfer => value(event.reference.q3),
            Q2 => value(event.reference.q2),
            TheoristsW => value(ctx.kinematics()?.w_theorist),
            ExperimentalistsW => value(ctx.kinematics()?.w_experimentalist),
            TheoristsX => value(ctx.kinematics()?.x_theorist),
            ExperimentalistsX => value(ctx.kinematics()?.x_experimentalist),
            TheoristsY => value(ctx.kinematics()?.y_theorist),
            ExperimentalistsY => value(ctx.kinematics()?.y_experimentalist),
            TheoristsNu => value(ctx.kinematics()?.nu_theorist),
            ExperimentalistsNu => value(ctx.kinematics()?.nu_experimentalist),
            BindingEnergy => Ok(ctx.kinematics()?.binding_energy.map(Sample::One)),
            LeptonMomentum => value(obs::lepton_momentum(event)?),
            LeptonCosTheta => value(obs::lepton_cos_theta(event)?),
            LeptonTransverseMomentum => value(obs::lepton_transverse_momentum(event)?),
            LeptonLongitudinalMomentum => value(obs::lepton_longitudinal_momentum(event)?),
            ReconstructedEnergy => value(event.qe_neutrino_energy),
            ReconstructionBias => value(obs::reconstruction_bias(event)),
            RelativeReconstructionBias => {
                Ok(obs::relative_reconstruction_bias(event).map(Sample::One))
            }
            ReconstructedY => Ok(obs::reconstructed_inelasticity(event).map(Sample::One)),
            MissingEnergy => Ok(obs::missing_energy(event).map(Sample::One)),
            MissingMomentum => Ok(obs::missing_momentum(event).map(Sample::One)),
            TransverseMomentumImbalance => value(event.tki.dpt),
            BoostingAngle => value(event.tki.dalphat),
            TransverseOpeningAngle => value(event.tki.dphit),
            Leading {
                species,
                observable,
                ke_threshold,
            } => {
                let x = match observable {
                    LeadingObservable::Momentum => {
                        obs::leading_momentum(event, species, ke_threshold)
                    }
                    LeadingObservable::KineticEnergy => {
                        obs::leading_kinetic_energy(event, species, ke_threshold)
                    }
                    LeadingObservable::CosTheta => {
                        obs::leading_cos_theta(event, species, ke_threshold)
                    }
                    LeadingObservable::LeptonCosOpening => {
                        obs::leading_lepton_cos_opening(event, species, ke_threshold)?
                    }
                    LeadingObservable::LeptonDeltaPhi => {
                        obs::leading_lepton_delta_phi(event, species, ke_threshold)?
                    }
                };
                Ok(x.map(Sample::One))
            }
            Multiplicity { pdg, ke_threshold } => {
                let mass = particle_mass(pdg).unwrap_or(0.0);
                value(obs::multiplicity(event, pdg, mass, ke_threshold) as f64)
            }
            EnergyMomentumTransfer => Ok(Some(Sample::Two(event.reference.q3, event.reference.q0))),
            LeptonMomentumCosTheta => Ok(Some(Sample::Two(
                obs::lepton_momentum(event)?,
                obs::lepton_cos_theta(event)?,
            ))),
            LeadingProtonKeEnergyTransfer => {
                let (lead, _) = obs::proton_kinetic_energies(event);
                Ok(Some(Sample::Two(lead, event.reference.q0)))
            }
            ProtonKineticEnergyPair => {
                let (lead, sub) = obs::proton_kinetic_energies(event);
                Ok(Some(Sample::Two(lead, sub)))
            }
            MissingEnergyMomentum => Ok(obs::missing_momentum(event)
                .zip(obs::missing_energy(event))
                .map(|(p, e)| Sample::Two(p, e))),
            Q2W => {
                let b = ctx.kinematics()?;
                Ok(Some(Sample::Two(b.q2, b.w_theorist)))
            }
            BjorkenXInelasticity => {
                let b = ctx.kinematics()?;
                Ok(Some(Sample::Two(b.x_theorist, b.y_theorist)))
            }
            NeutrinoEnergyReconstructed => Ok(Some(Sample::Two(
                event.neutrino_energy,
                event.qe_neutrino_energy,
            ))),
        }
    }

    /// The full reference catalog used when no plan is configured.
    pub fn reference_catalog() -> Vec<Quantity> {
        use Quantity::*;
        let leading = |species, observable| Leading {
            species,
            observable,
            ke_threshold: 0.0,
        };
        let mult = |pdg| Multiplicity {
            pdg,
            ke_threshold: 0.0,
        };
        let pion = HadronSpecies::Pion {
            charged_only: false,
        };
        vec![
            NeutrinoEnergy,
            EnergyTransfer,
            MomentumTransfer,
            Q2,
            TheoristsW,
            ExperimentalistsW,
            TheoristsX,
            ExperimentalistsX,
            TheoristsY,
            ExperimentalistsY,
            ReconstructedY,
            TheoristsNu,
            ExperimentalistsNu,
            BindingEnergy,
            LeptonMomentum,
            LeptonCosTheta,
            RelativeReconstructionBias,
            ReconstructionBias,
            ReconstructedEnergy,
            MissingEnergy,
            MissingMomentum,
            leading(HadronSpecies::Proton, LeadingObservable::Momentum),
            leading(HadronSpecies::Proton, LeadingObservable::KineticEnergy),
            leading(HadronSpecies::Proton, LeadingObservable::CosTheta),
            leading(HadronSpecies::Proton, LeadingObservable::LeptonCosOpening),
            leading(HadronSpecies::Proton, LeadingObservable::LeptonDeltaPhi),
            leading(HadronSpecies::Neutron, LeadingObservable::Momentum),
            leading(HadronSpecies::Neutron, LeadingObservable::KineticEnergy),
            leading(HadronSpecies::Neutron, LeadingObservable::CosTheta),
            leading(pion, LeadingObservable::Momentum),
            leading(pion, LeadingObservable::CosTheta),
            leading(pion, LeadingObservable::LeptonCosOpening),
            mult(2212),
            Multiplicity {
                pdg: 2212,
                ke_threshold: 0.03,
            },
            mult(2112),
            mult(211),
            mult(-211),
            mult(111),
            mult(321),
            mult(-321),
            mult(311),
            TransverseMomentumImbalance,
            BoostingAngle,
            TransverseOpeningAngle,
            LeptonTransverseMomentum,
            LeptonLongitudinalMomentum,
            MissingEnergyMomentum,
            EnergyMomentumTransfer,
            LeptonMomentumCosTheta,
            LeadingProtonKeEnergyTransfer,
            ProtonKineticEnergyPair,
            Q2W,
            BjorkenXInelasticity,
            NeutrinoEnergyReconstructed,
        ]
    }

    /// Shorthand names of the unparameterised quantities, in catalog order.
    pub fn simple_names() -> &'static [&'static str] {
        &SIMPLE_NAMES
    }
}

const SIMPLE_NAMES: [&str; 34] = [
    "enu",
    "q0",
    "q3",
    "q2",
    "theorists-w",
    "experimentalists-w",
    "theorists-x",
    "experimentalists-x",
    "theorists-y",
    "experimentalists-y",
    "theorists-nu",
    "experimentalists-nu",
    "binding-energy",
    "lepton-momentum",
    "lepton-cos-theta",
    "lepton-pt",
    "lepton-pl",
    "erec",
    "erec-abs-bias",
    "erec-rel-bias",
    "reconstructed-y",
    "emiss",
    "pmiss",
    "dpt",
    "dalphat",
    "dphit",
    "q0-q3",
    "lepton-momentum-cos-theta",
    "leading-proton-ke-q0",
    "proton-ke-pair",
    "emiss-pmiss",
    "q2-w",
    "x-y",
    "enu-erec",
];

fn simple_quantity(name: &str) -> Option<Quantity> {
    use Quantity::*;
    Some(match name {
        "enu" => NeutrinoEnergy,
        "q0" => EnergyTransfer,
        "q3" => MomentumTransfer,
        "q2" => Q2,
        "theorists-w" => TheoristsW,
        "experimentalists-w" => ExperimentalistsW,
        "theorists-x" => TheoristsX,
        "experimentalists-x" => ExperimentalistsX,
        "theorists-y" => TheoristsY,
        "experimentalists-y" => ExperimentalistsY,
        "theorists-nu" => TheoristsNu,
        "experimentalists-nu" => ExperimentalistsNu,
        "binding-energy" => BindingEnergy,
        "lepton-momentum" => LeptonMomentum,
        "lepton-cos-theta" => LeptonCosTheta,
        "lepton-pt" => LeptonTransverseMomentum,
        "lepton-pl" => LeptonLongitudinalMomentum,
        "erec" => ReconstructedEnergy,
        "erec-abs-bias" => ReconstructionBias,
        "erec-rel-bias" => RelativeReconstructionBias,
        "reconstructed-y" => ReconstructedY,
        "emiss" => MissingEnergy,
        "pmiss" => MissingMomentum,
        "dpt" => TransverseMomentumImbalance,
        "dalphat" => BoostingAngle,
        "dphit" => TransverseOpeningAngle,
        "q0-q3" => EnergyMomentumTransfer,
        "lepton-momentum-cos-theta" => LeptonMomentumCosTheta,
        "leading-proton-ke-q0" => LeadingProtonKeEnergyTransfer,
        "proton-ke-pair" => ProtonKineticEnergyPair,
        "emiss-pmiss" => MissingEnergyMomentum,
        "q2-w" => Q2W,
        "x-y" => BjorkenXInelasticity,
        "enu-erec" => NeutrinoEnergyReconstructed,
        _ => return None,
    })
}

const LEADING_SUFFIXES: [(&str, LeadingObservable); 5] = [
    ("momentum", LeadingObservable::Momentum),
    ("ke", LeadingObservable::KineticEnergy),
    ("cos-theta", LeadingObservable::CosTheta),
    ("lepton-cos", LeadingObservable::LeptonCosOpening),
    ("lepton-dphi", LeadingObservable::LeptonDeltaPhi),
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuantityParseError {
    #[error("Unknown quantity '{0}'")]
    Unknown(String),
    #[error("Invalid parameter '{value}' for quantity '{name}'")]
    InvalidParameter { name: String, value: String },
}

impl FromStr for Quantity {
    type Err = QuantityParseError;

    /// Parses `name[:parameter][@threshold]`, e.g. `q2`, `multiplicity:2212@0.03` or
    /// `leading-pion-momentum:charged`. Thresholds are kinetic energies in GeV.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (head, threshold) = match s.split_once('@') {
            Some((head, t)) => {
                let value: f64 = t.trim().parse().map_err(|_| QuantityParseError::InvalidParameter {
                    name: head.to_string(),
                    value: t.to_string(),
                })?;
                (head.trim(), Some(value))
            }
            None => (s, None),
        };
        let (name, parameter) = match head.split_once(':') {
            Some((name, p)) => (name.trim(), Some(p.trim())),
            None => (head, None),
        };
        let name = name.to_ascii_lowercase();
        let invalid = |value: &str| QuantityParseError::InvalidParameter {
            name: name.clone(),
            value: value.to_string(),
        };

        if name == "multiplicity" {
            let pdg_text = parameter.ok_or_else(|| invalid(""))?;
            let pdg = pdg_text.parse().map_err(|_| invalid(pdg_text))?;
            return Ok(Quantity::Multiplicity {
                pdg,
                ke_threshold: threshold.unwrap_or(0.0),
            });
        }

        if let Some(rest) = name.strip_prefix("leading-") {
            for (suffix, observable) in LEADING_SUFFIXES {
                let Some(species) = rest.strip_suffix(suffix).and_then(|s| s.strip_suffix('-'))
                else {
                    continue;
                };
                let species = match (species, parameter) {
                    ("proton", None) => HadronSpecies::Proton,
                    ("neutron", None) => HadronSpecies::Neutron,
                    ("pion", None) => HadronSpecies::Pion {
                        charged_only: false,
                    },
                    ("pion", Some("charged")) => HadronSpecies::Pion { charged_only: true },
                    (_, Some(p)) => return Err(invalid(p)),
                    _ => continue,
                };
                return Ok(Quantity::Leading {
                    species,
                    observable,
                    ke_threshold: threshold.unwrap_or(0.0),
                });
            }
        }

        if let Some(p) = parameter {
            return Err(invalid(p));
        }
        if let Some(t) = threshold {
            return Err(invalid(&t.to_string()));
        }
        simple_quantity(&name).ok_or_else(|| QuantityParseError::Unknown(s.to_string()))
    }
}

impl fmt::Display for Quantity {
    /// Writes the shorthand accepted by [`Quantity::from_str`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let threshold = |f: &mut fmt::Formatter<'_>, t: f64| {
            if t > 0.0 { write!(f, "@{t}") } else { Ok(()) }
        };
        match *self {
            Quantity::Multiplicity { pdg, ke_threshold } => {
                write!(f, "multiplicity:{pdg}")?;
                threshold(f, ke_threshold)
            }
            Quantity::Leading {
                species,
                observable,
                ke_threshold,
            } => {
                let suffix = LEADING_SUFFIXES
                    .iter()
                    .find(|(_, o)| *o == observable)
                    .map_or("", |(s, _)| *s);
                write!(f, "leading-{}-{suffix}", species_slug(species))?;
                if matches!(species, HadronSpecies::Pion { charged_only: true }) {
                    f.write_str(":charged")?;
                }
                threshold(f, ke_threshold)
            }
            simple => {
                let name = SIMPLE_NAMES
                    .iter()
                    .find(|n| simple_quantity(n) == Some(simple))
                    .copied()
                    .unwrap_or("unknown");
                f.write_str(name)
            }
        }
    }
}
