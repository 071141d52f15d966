use super::hist::HistogramError;
use serde::Serialize;

/// A uniformly binned axis over `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Axis {
    pub bins: usize,
    pub low: f64,
    pub high: f64,
}

/// Where a value lands on an [`Axis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinIndex {
    Underflow,
    Bin(usize),
    Overflow,
}

impl Axis {
    /// Creates an axis, rejecting empty or inverted ranges.
    pub fn new(bins: usize, low: f64, high: f64) -> Result<Self, HistogramError> {
        if bins == 0 || !low.is_finite() || !high.is_finite() || high <= low {
            return Err(HistogramError::InvalidBinning { bins, low, high });
        }
        Ok(Self { bins, low, high })
    }

    /// Unchecked constructor for compile-time catalog constants.
    pub(crate) const fn uniform(bins: usize, low: f64, high: f64) -> Self {
        Self { bins, low, high }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        (self.high - self.low) / self.bins as f64
    }

    /// Locates a finite value. The upper edge belongs to the overflow.
    pub fn find_bin(&self, x: f64) -> BinIndex {
        if x < self.low {
            BinIndex::Underflow
        } else if x >= self.high {
            BinIndex::Overflow
        } else {
            let index = ((x - self.low) / self.width()) as usize;
            // Rounding can push values just below `high` into a non-existent bin.
            BinIndex::Bin(index.min(self.bins - 1))
        }
    }

    pub fn bin_low(&self, bin: usize) -> f64 {
        self.low + bin as f64 * self.width()
    }

    pub fn bin_high(&self, bin: usize) -> f64 {
        self.low + (bin + 1) as f64 * self.width()
    }

    /// Storage slot with underflow at 0 and overflow at `bins + 1`.
    #[inline]
    pub(crate) fn slot(&self, index: BinIndex) -> usize {
        match index {
            BinIndex::Underflow => 0,
            BinIndex::Bin(i) => i + 1,
            BinIndex::Overflow => self.bins + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_axes() {
        assert!(Axis::new(0, 0.0, 1.0).is_err());
        assert!(Axis::new(10, 1.0, 1.0).is_err());
        assert!(Axis::new(10, 2.0, 1.0).is_err());
        assert!(Axis::new(10, f64::NEG_INFINITY, 1.0).is_err());
    }

    #[test]
    fn finds_bins_with_half_open_edges() {
        let axis = Axis::new(20, 0.0, 2.0).unwrap();
        assert_eq!(axis.find_bin(-0.01), BinIndex::Underflow);
        assert_eq!(axis.find_bin(0.0), BinIndex::Bin(0));
        assert_eq!(axis.find_bin(0.1), BinIndex::Bin(1));
        assert_eq!(axis.find_bin(1.999), BinIndex::Bin(19));
        assert_eq!(axis.find_bin(2.0), BinIndex::Overflow);
    }

    #[test]
    fn bin_edges() {
        let axis = Axis::new(50, -1.0, 1.0).unwrap();
        assert!((axis.width() - 0.04).abs() < 1e-12);
        assert!((axis.bin_low(25) - 0.0).abs() < 1e-12);
        assert!((axis.bin_high(49) - 1.0).abs() < 1e-12);
    }
}
