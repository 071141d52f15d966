//! Weighted histograms with uniform binning.
//!
//! The two shapes share one tagged [`Histogram`](hist::Histogram) enum, so callers fill with
//! a [`Sample`](hist::Sample) and never downcast.

pub mod axis;
pub mod hist;
