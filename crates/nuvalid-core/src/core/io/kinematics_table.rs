use super::traits::TableFile;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KinematicsTableError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One line of the per-event kinematics table.
///
/// Quantities that could not be computed are left empty; `status` says why.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct KinematicsRow {
    pub event: usize,
    pub mode: i32,
    pub class: String,
    pub current: String,
    pub status: String,
    pub nucleon_source: Option<String>,
    pub q2_reference: f64,
    pub q2: Option<f64>,
    pub q0: Option<f64>,
    pub q3: Option<f64>,
    pub w_theorist: Option<f64>,
    pub w_experimentalist: Option<f64>,
    pub x_theorist: Option<f64>,
    pub x_experimentalist: Option<f64>,
    pub y_theorist: Option<f64>,
    pub y_experimentalist: Option<f64>,
    pub nu_theorist: Option<f64>,
    pub nu_experimentalist: Option<f64>,
    pub binding_energy: Option<f64>,
}

/// Streams rows into a CSV file with a header line.
pub struct KinematicsTableWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl KinematicsTableWriter<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, KinematicsTableError> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> KinematicsTableWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }

    pub fn write_row(&mut self, row: &KinematicsRow) -> Result<(), KinematicsTableError> {
        self.writer.serialize(row)?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<W, KinematicsTableError> {
        self.writer.flush()?;
        self.writer
            .into_inner()
            .map_err(|e| KinematicsTableError::Io(e.into_error()))
    }
}

/// Writes a whole table at once.
pub struct KinematicsTable;

impl TableFile for KinematicsTable {
    type Data = [KinematicsRow];
    type Error = KinematicsTableError;

    fn write_to(data: &[KinematicsRow], writer: &mut impl Write) -> Result<(), Self::Error> {
        let mut table = KinematicsTableWriter::new(writer);
        for row in data {
            table.write_row(row)?;
        }
        table.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn rows() -> Vec<KinematicsRow> {
        vec![
            KinematicsRow {
                event: 0,
                mode: 1,
                class: "quasi-elastic".into(),
                current: "CC".into(),
                status: "ok".into(),
                nucleon_source: Some("free-nucleon".into()),
                q2_reference: 0.25,
                q2: Some(0.25),
                binding_energy: Some(0.03),
                ..Default::default()
            },
            KinematicsRow {
                event: 1,
                mode: 98,
                class: "undefined".into(),
                current: "CC".into(),
                status: "no-nucleon".into(),
                q2_reference: 0.5,
                q2: Some(0.5),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn missing_values_are_empty_cells() {
        let mut out = Vec::new();
        KinematicsTable::write_to(&rows(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(
            lines[0].starts_with("event,mode,class,current,status,nucleon_source,q2_reference,q2,")
        );
        assert!(lines[2].starts_with("1,98,undefined,CC,no-nucleon,,0.5,0.5,"));
        assert!(lines[2].ends_with(",,,"));
    }

    #[test]
    fn streams_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kinematics.csv");
        let mut writer = KinematicsTableWriter::create(&path).unwrap();
        for row in rows() {
            writer.write_row(&row).unwrap();
        }
        writer.finish().unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.records().count(), 2);
    }
}
