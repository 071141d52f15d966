use crate::core::models::event::{
    EventRecord, MissingMomentum, ReferenceKinematics, Target, TopologyFlags,
    TransverseImbalance,
};
use crate::core::models::four_vector::FourMomentum;
use crate::core::models::particle::Particle;
use nalgebra::Vector3;
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlatTreeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Parse error in event record {record}: {kind}")]
    Parse {
        record: usize,
        kind: FlatTreeParseErrorKind,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum FlatTreeParseErrorKind {
    #[error("Invalid number '{value}' in array column '{column}'")]
    InvalidNumber { column: &'static str, value: String },
    #[error("Array column '{column}' has {found} entries, expected {expected}")]
    LengthMismatch {
        column: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Column '{column}' has {found} entries but 'pdg_rank' has {ranks}")]
    RankMismatch {
        column: &'static str,
        found: usize,
        ranks: usize,
    },
}

/// One CSV row, keyed by the NUISANCE flat-tree branch names.
///
/// Optional scalars are `Option` so that a missing column and an empty cell both read as
/// absent.
#[derive(Debug, Deserialize)]
struct FlatTreeRow {
    #[serde(rename = "Mode")]
    mode: i32,
    #[serde(rename = "PDGnu")]
    neutrino_pdg: i32,
    cc: i32,
    #[serde(rename = "tgt", default)]
    target_pdg: Option<i32>,
    #[serde(rename = "tgta", default)]
    target_a: Option<i32>,
    #[serde(rename = "tgtz", default)]
    target_z: Option<i32>,
    #[serde(rename = "Enu_true")]
    neutrino_energy: f64,
    #[serde(rename = "PDGLep")]
    lepton_pdg: i32,
    #[serde(rename = "ELep")]
    lepton_energy: f64,
    #[serde(rename = "CosLep", default)]
    cos_lepton: Option<f64>,
    #[serde(rename = "Q2", default)]
    q2: Option<f64>,
    #[serde(default)]
    q0: Option<f64>,
    #[serde(default)]
    q3: Option<f64>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(rename = "Enu_QE", default)]
    qe_neutrino_energy: Option<f64>,
    #[serde(default)]
    dalphat: Option<f64>,
    #[serde(default)]
    dpt: Option<f64>,
    #[serde(default)]
    dphit: Option<f64>,
    #[serde(rename = "Emiss", default)]
    missing_energy: Option<f64>,
    #[serde(default)]
    pmiss_x: Option<f64>,
    #[serde(default)]
    pmiss_y: Option<f64>,
    #[serde(default)]
    pmiss_z: Option<f64>,
    #[serde(rename = "Weight", default)]
    weight: Option<f64>,
    #[serde(rename = "fScaleFactor", default)]
    scale_factor: Option<f64>,
    #[serde(rename = "flagCC1pip", default)]
    cc1pip: Option<i32>,
    #[serde(rename = "flagCC1pim", default)]
    cc1pim: Option<i32>,
    #[serde(rename = "flagCC1pi0", default)]
    cc1pi0: Option<i32>,
    #[serde(default)]
    px: String,
    #[serde(default)]
    py: String,
    #[serde(default)]
    pz: String,
    #[serde(rename = "E", default)]
    energy: String,
    #[serde(default)]
    pdg: String,
    #[serde(default)]
    pdg_rank: String,
    #[serde(default)]
    px_init: String,
    #[serde(default)]
    py_init: String,
    #[serde(default)]
    pz_init: String,
    #[serde(rename = "E_init", default)]
    energy_init: String,
    #[serde(default)]
    pdg_init: String,
}

fn parse_array<T: std::str::FromStr>(
    column: &'static str,
    field: &str,
) -> Result<Vec<T>, FlatTreeParseErrorKind> {
    field
        .split_whitespace()
        .map(|token| {
            token
                .parse()
                .map_err(|_| FlatTreeParseErrorKind::InvalidNumber {
                    column,
                    value: token.to_string(),
                })
        })
        .collect()
}

fn check_length(
    column: &'static str,
    values: &[f64],
    expected: usize,
) -> Result<(), FlatTreeParseErrorKind> {
    if values.len() != expected {
        return Err(FlatTreeParseErrorKind::LengthMismatch {
            column,
            expected,
            found: values.len(),
        });
    }
    Ok(())
}

fn particles(
    columns: [(&'static str, &str); 4],
    pdg_column: (&'static str, &str),
) -> Result<Vec<Particle>, FlatTreeParseErrorKind> {
    let codes: Vec<i32> = parse_array(pdg_column.0, pdg_column.1)?;
    let [px, py, pz, e] = columns;
    let px: Vec<f64> = parse_array(px.0, px.1)?;
    let py: Vec<f64> = parse_array(py.0, py.1)?;
    let pz: Vec<f64> = parse_array(pz.0, pz.1)?;
    let e: Vec<f64> = parse_array(e.0, e.1)?;

    let n = codes.len();
    check_length(columns[0].0, &px, n)?;
    check_length(columns[1].0, &py, n)?;
    check_length(columns[2].0, &pz, n)?;
    check_length(columns[3].0, &e, n)?;

    Ok((0..n)
        .map(|i| Particle::new(codes[i], FourMomentum::new(px[i], py[i], pz[i], e[i])))
        .collect())
}

impl FlatTreeRow {
    fn into_event(self) -> Result<EventRecord, FlatTreeParseErrorKind> {
        let initial_state = particles(
            [
                ("px_init", self.px_init.as_str()),
                ("py_init", self.py_init.as_str()),
                ("pz_init", self.pz_init.as_str()),
                ("E_init", self.energy_init.as_str()),
            ],
            ("pdg_init", self.pdg_init.as_str()),
        )?;
        let mut final_state = particles(
            [
                ("px", self.px.as_str()),
                ("py", self.py.as_str()),
                ("pz", self.pz.as_str()),
                ("E", self.energy.as_str()),
            ],
            ("pdg", self.pdg.as_str()),
        )?;

        let ranks: Vec<i32> = parse_array("pdg_rank", &self.pdg_rank)?;
        if !ranks.is_empty() {
            if ranks.len() != final_state.len() {
                return Err(FlatTreeParseErrorKind::RankMismatch {
                    column: "pdg",
                    found: final_state.len(),
                    ranks: ranks.len(),
                });
            }
            for (particle, rank) in final_state.iter_mut().zip(ranks) {
                particle.rank = Some(rank);
            }
        }

        let missing = match (self.missing_energy, self.pmiss_x, self.pmiss_y, self.pmiss_z) {
            (Some(energy), Some(x), Some(y), Some(z)) => Some(MissingMomentum {
                energy,
                momentum: Vector3::new(x, y, z),
            }),
            _ => None,
        };

        Ok(EventRecord {
            mode: self.mode,
            neutrino_pdg: self.neutrino_pdg,
            is_cc: self.cc != 0,
            target: Target {
                pdg: self.target_pdg.unwrap_or_default(),
                a: self.target_a.unwrap_or_default(),
                z: self.target_z.unwrap_or_default(),
            },
            neutrino_energy: self.neutrino_energy,
            lepton_pdg: self.lepton_pdg,
            lepton_energy: self.lepton_energy,
            cos_lepton: self.cos_lepton.unwrap_or_default(),
            reference: ReferenceKinematics {
                q2: self.q2.unwrap_or_default(),
                q0: self.q0.unwrap_or_default(),
                q3: self.q3.unwrap_or_default(),
                x: self.x.unwrap_or_default(),
                y: self.y.unwrap_or_default(),
            },
            qe_neutrino_energy: self.qe_neutrino_energy.unwrap_or_default(),
            tki: TransverseImbalance {
                dpt: self.dpt.unwrap_or_default(),
                dalphat: self.dalphat.unwrap_or_default(),
                dphit: self.dphit.unwrap_or_default(),
            },
            missing,
            weight: self.weight.unwrap_or(1.0),
            scale_factor: self.scale_factor.unwrap_or(1.0),
            topology: TopologyFlags {
                cc1pip: self.cc1pip.is_some_and(|flag| flag != 0),
                cc1pim: self.cc1pim.is_some_and(|flag| flag != 0),
                cc1pi0: self.cc1pi0.is_some_and(|flag| flag != 0),
            },
            initial_state,
            final_state,
        })
    }
}

/// Streams [`EventRecord`]s out of a flat-tree CSV export.
///
/// Each row is one event. Scalar columns use the NUISANCE branch names; particle arrays are
/// whitespace-separated lists within a single cell. Records are numbered from 0 in error
/// messages.
pub struct FlatTreeReader<R: Read> {
    reader: csv::Reader<R>,
    record: usize,
}

impl FlatTreeReader<BufReader<File>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FlatTreeError> {
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: Read> FlatTreeReader<R> {
    pub fn from_reader(reader: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);
        Self { reader, record: 0 }
    }

    /// Reads the next event, or `None` at end of input.
    pub fn read_event(&mut self) -> Option<Result<EventRecord, FlatTreeError>> {
        let mut rows = self.reader.deserialize::<FlatTreeRow>();
        let row = rows.next()?;
        let record = self.record;
        self.record += 1;
        Some(row.map_err(FlatTreeError::from).and_then(|row| {
            row.into_event()
                .map_err(|kind| FlatTreeError::Parse { record, kind })
        }))
    }
}

impl<R: Read> Iterator for FlatTreeReader<R> {
    type Item = Result<EventRecord, FlatTreeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_event()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Mode,PDGnu,cc,tgt,tgta,tgtz,Enu_true,PDGLep,ELep,CosLep,Q2,q0,q3,x,y,Enu_QE,Emiss,pmiss_x,pmiss_y,pmiss_z,Weight,flagCC1pip,px,py,pz,E,pdg,pdg_rank,px_init,py_init,pz_init,E_init,pdg_init";

    fn row(final_px: &str) -> String {
        format!(
            "1,14,1,1000180400,40,18,1.0,13,0.6,0.9,0.3,0.4,0.7,0.4,0.4,0.95,0.03,0.1,0.0,0.2,1.5,0,{final_px},0 0,0.5 0.2,0.6 1.1,13 2212,1 1,0 0.1,0 0,1.0 0.0,1.0 0.93,14 2112"
        )
    }

    fn read_all(contents: &str) -> Vec<Result<EventRecord, FlatTreeError>> {
        FlatTreeReader::from_reader(contents.as_bytes()).collect()
    }

    #[test]
    fn parses_a_ccqe_row() {
        let contents = format!("{HEADER}\n{}\n", row("0.1 -0.1"));
        let events = read_all(&contents);
        assert_eq!(events.len(), 1);
        let event = events.into_iter().next().unwrap().unwrap();

        assert_eq!(event.mode, 1);
        assert!(event.is_cc);
        assert_eq!(event.target.z, 18);
        assert_eq!(event.reference.q2, 0.3);
        assert_eq!(event.weight, 1.5);
        assert_eq!(event.scale_factor, 1.0);
        assert!(!event.topology.cc1pip);
        assert_eq!(event.final_state.len(), 2);
        assert_eq!(event.final_state[1].pdg, 2212);
        assert_eq!(event.final_state[1].rank, Some(1));
        assert_eq!(event.final_state[1].p4.momentum.x, -0.1);
        assert_eq!(event.initial_state[1].pdg, 2112);
        assert_eq!(event.initial_state[1].energy(), 0.93);
        let missing = event.missing.unwrap();
        assert_eq!(missing.energy, 0.03);
        assert_eq!(missing.momentum.z, 0.2);
    }

    #[test]
    fn length_mismatch_is_a_parse_error() {
        let contents = format!("{HEADER}\n{}\n{}\n", row("0.1 -0.1"), row("0.1"));
        let events = read_all(&contents);
        assert!(events[0].is_ok());
        match &events[1] {
            Err(FlatTreeError::Parse { record, kind }) => {
                assert_eq!(*record, 1);
                assert_eq!(
                    *kind,
                    FlatTreeParseErrorKind::LengthMismatch {
                        column: "px",
                        expected: 2,
                        found: 1
                    }
                );
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn malformed_number_is_reported() {
        let contents = format!("{HEADER}\n{}\n", row("0.1 abc"));
        let err = read_all(&contents).remove(0).unwrap_err();
        assert!(matches!(
            err,
            FlatTreeError::Parse {
                kind: FlatTreeParseErrorKind::InvalidNumber { column: "px", .. },
                ..
            }
        ));
    }

    #[test]
    fn missing_scalar_column_is_a_csv_error() {
        let contents = "Mode,PDGnu\n1,14\n";
        let err = read_all(contents).remove(0).unwrap_err();
        assert!(matches!(err, FlatTreeError::Csv(_)));
    }

    #[test]
    fn optional_columns_default() {
        let contents = "Mode,PDGnu,cc,Enu_true,PDGLep,ELep\n-1,-14,1,2.0,-13,1.5\n";
        let event = read_all(contents).remove(0).unwrap();
        assert_eq!(event.mode, -1);
        assert_eq!(event.weight, 1.0);
        assert!(event.missing.is_none());
        assert!(event.final_state.is_empty());
        assert!(event.initial_state.is_empty());
    }

    #[test]
    fn empty_optional_cells_read_as_defaults() {
        let contents = "Mode,PDGnu,cc,Enu_true,PDGLep,ELep,Q2,q0,q3,dalphat,Weight,fScaleFactor,flagCC1pip\n\
                        1,14,1,1.0,13,0.5,0.0,,,,,,\n";
        let event = read_all(contents).remove(0).unwrap();
        assert_eq!(event.reference.q0, 0.0);
        assert_eq!(event.reference.q3, 0.0);
        assert_eq!(event.tki.dalphat, 0.0);
        assert_eq!(event.weight, 1.0);
        assert_eq!(event.scale_factor, 1.0);
        assert!(!event.topology.cc1pip);
    }

    #[test]
    fn reads_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "{}", row("0.1 -0.1")).unwrap();
        writeln!(file, "{}", row("0.2 -0.2")).unwrap();
        file.flush().unwrap();

        let reader = FlatTreeReader::from_path(file.path()).unwrap();
        let events: Result<Vec<_>, _> = reader.collect();
        assert_eq!(events.unwrap().len(), 2);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = FlatTreeReader::from_path("/nonexistent/events.csv");
        assert!(matches!(result, Err(FlatTreeError::Io(_))));
    }
}
