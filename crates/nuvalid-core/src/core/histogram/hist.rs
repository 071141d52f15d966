use super::axis::{Axis, BinIndex};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum HistogramError {
    #[error("Invalid binning: {bins} bins over [{low}, {high})")]
    InvalidBinning { bins: usize, low: f64, high: f64 },

    #[error("Cannot fill a {expected}D histogram with a {found}D sample")]
    ArityMismatch { expected: usize, found: usize },
}

/// One value (or value pair) produced by a quantity for a single event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    One(f64),
    Two(f64, f64),
}

impl Sample {
    pub fn arity(&self) -> usize {
        match self {
            Sample::One(_) => 1,
            Sample::Two(..) => 2,
        }
    }

    pub fn is_finite(&self) -> bool {
        match *self {
            Sample::One(x) => x.is_finite(),
            Sample::Two(x, y) => x.is_finite() && y.is_finite(),
        }
    }
}

/// Descriptive metadata shared by both histogram shapes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistogramInfo {
    pub name: String,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
}

/// Weighted 1D histogram with under- and overflow bins.
#[derive(Debug, Clone, PartialEq)]
pub struct Hist1D {
    pub info: HistogramInfo,
    axis: Axis,
    sum_w: Vec<f64>,
    sum_w2: Vec<f64>,
    entries: u64,
    rejected: u64,
}

impl Hist1D {
    pub fn new(info: HistogramInfo, axis: Axis) -> Self {
        let slots = axis.bins + 2;
        Self {
            info,
            axis,
            sum_w: vec![0.0; slots],
            sum_w2: vec![0.0; slots],
            entries: 0,
            rejected: 0,
        }
    }

    pub fn axis(&self) -> &Axis {
        &self.axis
    }

    /// Adds a weighted value. Non-finite values are counted as rejected and not stored.
    pub fn fill(&mut self, x: f64, weight: f64) {
        if !x.is_finite() {
            self.rejected += 1;
            return;
        }
        let slot = self.axis.slot(self.axis.find_bin(x));
        self.sum_w[slot] += weight;
        self.sum_w2[slot] += weight * weight;
        self.entries += 1;
    }

    pub fn content(&self, index: BinIndex) -> f64 {
        self.sum_w[self.axis.slot(index)]
    }

    /// Statistical error `√Σw²`.
    pub fn error(&self, index: BinIndex) -> f64 {
        self.sum_w2[self.axis.slot(index)].sqrt()
    }

    pub fn underflow(&self) -> f64 {
        self.content(BinIndex::Underflow)
    }

    pub fn overflow(&self) -> f64 {
        self.content(BinIndex::Overflow)
    }

    /// Sum of in-range bin contents.
    pub fn integral(&self) -> f64 {
        self.sum_w[1..=self.axis.bins].iter().sum()
    }

    pub fn entries(&self) -> u64 {
        self.entries
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Multiplies contents by `factor` and errors by `|factor|`.
    pub fn scale(&mut self, factor: f64) {
        let factor2 = factor * factor;
        self.sum_w.iter_mut().for_each(|w| *w *= factor);
        self.sum_w2.iter_mut().for_each(|w2| *w2 *= factor2);
    }
}

/// Weighted 2D histogram. Out-of-range values go to the border slots.
#[derive(Debug, Clone, PartialEq)]
pub struct Hist2D {
    pub info: HistogramInfo,
    x_axis: Axis,
    y_axis: Axis,
    sum_w: Vec<f64>,
    sum_w2: Vec<f64>,
    entries: u64,
    rejected: u64,
}

impl Hist2D {
    pub fn new(info: HistogramInfo, x_axis: Axis, y_axis: Axis) -> Self {
        let slots = (x_axis.bins + 2) * (y_axis.bins + 2);
        Self {
            info,
            x_axis,
            y_axis,
            sum_w: vec![0.0; slots],
            sum_w2: vec![0.0; slots],
            entries: 0,
            rejected: 0,
        }
    }

    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    #[inline]
    fn slot(&self, x: BinIndex, y: BinIndex) -> usize {
        self.y_axis.slot(y) * (self.x_axis.bins + 2) + self.x_axis.slot(x)
    }

    pub fn fill(&mut self, x: f64, y: f64, weight: f64) {
        if !x.is_finite() || !y.is_finite() {
            self.rejected += 1;
            return;
        }
        let slot = self.slot(self.x_axis.find_bin(x), self.y_axis.find_bin(y));
        self.sum_w[slot] += weight;
        self.sum_w2[slot] += weight * weight;
        self.entries += 1;
    }

    /// Content of an in-range bin.
    pub fn content(&self, x_bin: usize, y_bin: usize) -> f64 {
        self.sum_w[self.slot(BinIndex::Bin(x_bin), BinIndex::Bin(y_bin))]
    }

    pub fn error(&self, x_bin: usize, y_bin: usize) -> f64 {
        self.sum_w2[self.slot(BinIndex::Bin(x_bin), BinIndex::Bin(y_bin))].sqrt()
    }

    pub fn integral(&self) -> f64 {
        (0..self.y_axis.bins)
            .flat_map(|j| (0..self.x_axis.bins).map(move |i| (i, j)))
            .map(|(i, j)| self.content(i, j))
            .sum()
    }

    pub fn entries(&self) -> u64 {
        self.entries
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    pub fn scale(&mut self, factor: f64) {
        let factor2 = factor * factor;
        self.sum_w.iter_mut().for_each(|w| *w *= factor);
        self.sum_w2.iter_mut().for_each(|w2| *w2 *= factor2);
    }
}

/// A histogram of either dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum Histogram {
    OneD(Hist1D),
    TwoD(Hist2D),
}

impl Histogram {
    pub fn info(&self) -> &HistogramInfo {
        match self {
            Histogram::OneD(h) => &h.info,
            Histogram::TwoD(h) => &h.info,
        }
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }

    pub fn arity(&self) -> usize {
        match self {
            Histogram::OneD(_) => 1,
            Histogram::TwoD(_) => 2,
        }
    }

    /// Fills with a sample of matching dimension.
    pub fn fill(&mut self, sample: Sample, weight: f64) -> Result<(), HistogramError> {
        match (self, sample) {
            (Histogram::OneD(h), Sample::One(x)) => h.fill(x, weight),
            (Histogram::TwoD(h), Sample::Two(x, y)) => h.fill(x, y, weight),
            (hist, sample) => {
                return Err(HistogramError::ArityMismatch {
                    expected: hist.arity(),
                    found: sample.arity(),
                });
            }
        }
        Ok(())
    }

    pub fn entries(&self) -> u64 {
        match self {
            Histogram::OneD(h) => h.entries(),
            Histogram::TwoD(h) => h.entries(),
        }
    }

    pub fn rejected(&self) -> u64 {
        match self {
            Histogram::OneD(h) => h.rejected(),
            Histogram::TwoD(h) => h.rejected(),
        }
    }

    pub fn integral(&self) -> f64 {
        match self {
            Histogram::OneD(h) => h.integral(),
            Histogram::TwoD(h) => h.integral(),
        }
    }

    pub fn scale(&mut self, factor: f64) {
        match self {
            Histogram::OneD(h) => h.scale(factor),
            Histogram::TwoD(h) => h.scale(factor),
        }
    }
}
