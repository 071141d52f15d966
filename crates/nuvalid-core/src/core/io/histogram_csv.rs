use super::traits::TableFile;
use crate::core::histogram::axis::BinIndex;
use crate::core::histogram::hist::{Hist1D, Hist2D, Histogram};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub const MANIFEST_FILE_NAME: &str = "manifest.toml";

#[derive(Debug, Error)]
pub enum HistogramIoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Manifest serialization error: {0}")]
    Toml(#[from] toml::ser::Error),
}

#[derive(Serialize)]
struct Bin1DRow {
    bin: i64,
    low: f64,
    high: f64,
    content: f64,
    error: f64,
}

#[derive(Serialize)]
struct Bin2DRow {
    xbin: usize,
    ybin: usize,
    xlow: f64,
    xhigh: f64,
    ylow: f64,
    yhigh: f64,
    content: f64,
    error: f64,
}

/// One histogram as a bin table.
///
/// 1D tables include the underflow (bin −1) and overflow (bin n) rows with infinite outer
/// edges. 2D tables list in-range bins only, x fastest.
pub struct HistogramCsv;

impl HistogramCsv {
    fn write_1d<W: Write>(hist: &Hist1D, writer: &mut csv::Writer<W>) -> Result<(), csv::Error> {
        let axis = hist.axis();
        let row = |bin: i64, low: f64, high: f64, index: BinIndex| Bin1DRow {
            bin,
            low,
            high,
            content: hist.content(index),
            error: hist.error(index),
        };

        writer.serialize(row(-1, f64::NEG_INFINITY, axis.low, BinIndex::Underflow))?;
        for i in 0..axis.bins {
            writer.serialize(row(
                i as i64,
                axis.bin_low(i),
                axis.bin_high(i),
                BinIndex::Bin(i),
            ))?;
        }
        writer.serialize(row(
            axis.bins as i64,
            axis.high,
            f64::INFINITY,
            BinIndex::Overflow,
        ))
    }

    fn write_2d<W: Write>(hist: &Hist2D, writer: &mut csv::Writer<W>) -> Result<(), csv::Error> {
        let (x_axis, y_axis) = (hist.x_axis(), hist.y_axis());
        for ybin in 0..y_axis.bins {
            for xbin in 0..x_axis.bins {
                writer.serialize(Bin2DRow {
                    xbin,
                    ybin,
                    xlow: x_axis.bin_low(xbin),
                    xhigh: x_axis.bin_high(xbin),
                    ylow: y_axis.bin_low(ybin),
                    yhigh: y_axis.bin_high(ybin),
                    content: hist.content(xbin, ybin),
                    error: hist.error(xbin, ybin),
                })?;
            }
        }
        Ok(())
    }
}

impl TableFile for HistogramCsv {
    type Data = Histogram;
    type Error = HistogramIoError;

    fn write_to(data: &Histogram, writer: &mut impl Write) -> Result<(), Self::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        match data {
            Histogram::OneD(h) => Self::write_1d(h, &mut csv_writer)?,
            Histogram::TwoD(h) => Self::write_2d(h, &mut csv_writer)?,
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct ManifestEntry<'a> {
    name: &'a str,
    file: String,
    title: &'a str,
    x_title: &'a str,
    y_title: &'a str,
    dimensions: usize,
    entries: u64,
    rejected: u64,
    integral: f64,
}

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    histogram: Vec<ManifestEntry<'a>>,
}

/// A TOML index of the histograms written to one directory.
pub struct HistogramManifest;

impl TableFile for HistogramManifest {
    type Data = [Histogram];
    type Error = HistogramIoError;

    fn write_to(data: &[Histogram], writer: &mut impl Write) -> Result<(), Self::Error> {
        let manifest = Manifest {
            histogram: data
                .iter()
                .map(|h| {
                    let info = h.info();
                    ManifestEntry {
                        name: &info.name,
                        file: format!("{}.csv", info.name),
                        title: &info.title,
                        x_title: &info.x_title,
                        y_title: &info.y_title,
                        dimensions: h.arity(),
                        entries: h.entries(),
                        rejected: h.rejected(),
                        integral: h.integral(),
                    }
                })
                .collect(),
        };
        writer.write_all(toml::to_string(&manifest)?.as_bytes())?;
        Ok(())
    }
}

/// Writes every histogram as `{name}.csv` plus a `manifest.toml` into `dir`, creating the
/// directory if needed.
pub fn write_histograms<P: AsRef<Path>>(
    dir: P,
    histograms: &[Histogram],
) -> Result<(), HistogramIoError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    for hist in histograms {
        let path = dir.join(format!("{}.csv", hist.name()));
        debug!(path = %path.display(), "Writing histogram");
        HistogramCsv::write_to_path(hist, &path)?;
    }
    HistogramManifest::write_to_path(histograms, dir.join(MANIFEST_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::histogram::axis::Axis;
    use crate::core::histogram::hist::HistogramInfo;
    use tempfile::tempdir;

    fn info(name: &str) -> HistogramInfo {
        HistogramInfo {
            name: name.to_string(),
            title: "Q^{2}, #nu_{#mu}CCQE".to_string(),
            x_title: "Q^{2} (GeV^{2})".to_string(),
            y_title: "Events".to_string(),
        }
    }

    fn one_d() -> Histogram {
        let mut h = Hist1D::new(info("hq2_num_ccqe"), Axis::new(2, 0.0, 2.0).unwrap());
        h.fill(0.5, 2.0);
        h.fill(3.0, 1.0);
        Histogram::OneD(h)
    }

    #[test]
    fn one_d_table_has_flow_rows() {
        let mut out = Vec::new();
        HistogramCsv::write_to(&one_d(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "bin,low,high,content,error");
        assert_eq!(lines.len(), 1 + 4);
        assert!(lines[1].starts_with("-1,"));
        assert_eq!(lines[2], "0,0.0,1.0,2.0,2.0");
        assert!(lines[4].starts_with("2,2.0,inf,1.0,"));
    }

    #[test]
    fn two_d_table_lists_in_range_bins() {
        let axis = Axis::new(2, 0.0, 1.0).unwrap();
        let mut h = Hist2D::new(info("hq0q3_num_ccqe"), axis, axis);
        h.fill(0.75, 0.25, 1.0);
        let mut out = Vec::new();
        HistogramCsv::write_to(&Histogram::TwoD(h), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "xbin,ybin,xlow,xhigh,ylow,yhigh,content,error");
        assert_eq!(lines.len(), 1 + 4);
        assert_eq!(lines[2], "1,0,0.5,1.0,0.0,0.5,1.0,1.0");
    }

    #[test]
    fn writes_directory_with_manifest() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("hists");
        write_histograms(&out, &[one_d()]).unwrap();

        assert!(out.join("hq2_num_ccqe.csv").exists());
        let manifest = std::fs::read_to_string(out.join(MANIFEST_FILE_NAME)).unwrap();
        let parsed: toml::Table = toml::from_str(&manifest).unwrap();
        let entry = &parsed["histogram"].as_array().unwrap()[0];
        assert_eq!(entry["name"].as_str(), Some("hq2_num_ccqe"));
        assert_eq!(entry["entries"].as_integer(), Some(2));
        assert_eq!(entry["integral"].as_float(), Some(2.0));
        assert_eq!(entry["x-title"].as_str(), Some("Q^{2} (GeV^{2})"));
    }
}
