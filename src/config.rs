//! Experiment configuration.
//!
//! The UI-facing ranges are enforced by [`AlgoConfig::clamped`] and
//! [`Speed::new`]; [`AlgoConfig::validate`] only rejects values the
//! engines cannot run with at all.

use crate::dataset::DatasetKind;
use crate::error::{Error, Result};
use std::ops::RangeInclusive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Slider range for `eps`.
pub const EPS_RANGE: RangeInclusive<f64> = 10.0..=80.0;
/// Slider range for `min_pts`.
pub const MIN_PTS_RANGE: RangeInclusive<usize> = 2..=15;
/// Slider range for `k`.
pub const K_RANGE: RangeInclusive<usize> = 2..=8;
/// Slider range for the speed factor.
pub const SPEED_RANGE: RangeInclusive<u32> = 1..=100;

/// Clustering parameters shared by both engines.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct AlgoConfig {
    /// DBSCAN neighbourhood radius.
    pub eps: f64,
    /// DBSCAN minimum neighbourhood size (self included).
    pub min_pts: usize,
    /// K-means cluster count.
    pub k: usize,
}

impl Default for AlgoConfig {
    fn default() -> Self {
        Self {
            eps: 32.0,
            min_pts: 4,
            k: 3,
        }
    }
}

impl AlgoConfig {
    /// Set eps.
    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    /// Set min_pts.
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    /// Set k.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Clamp every field into its slider range. A NaN eps becomes the default.
    pub fn clamped(self) -> Self {
        let eps = if self.eps.is_nan() {
            Self::default().eps
        } else {
            self.eps.clamp(*EPS_RANGE.start(), *EPS_RANGE.end())
        };
        Self {
            eps,
            min_pts: self.min_pts.clamp(*MIN_PTS_RANGE.start(), *MIN_PTS_RANGE.end()),
            k: self.k.clamp(*K_RANGE.start(), *K_RANGE.end()),
        }
    }

    /// Reject parameters the engines are not defined for.
    pub fn validate(&self) -> Result<()> {
        if !(self.eps.is_finite() && self.eps > 0.0) {
            return Err(Error::InvalidParameter {
                name: "eps",
                message: "must be positive and finite",
            });
        }
        if self.min_pts == 0 {
            return Err(Error::InvalidParameter {
                name: "min_pts",
                message: "must be at least 1",
            });
        }
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be at least 1",
            });
        }
        Ok(())
    }
}

/// Per-tick speed factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Speed(u32);

impl Speed {
    /// Speed factor clamped into [`SPEED_RANGE`].
    pub fn new(factor: u32) -> Self {
        Self(factor.clamp(*SPEED_RANGE.start(), *SPEED_RANGE.end()))
    }

    /// Raw factor.
    pub fn factor(self) -> u32 {
        self.0
    }

    /// DBSCAN steps per tick: `max(1, speed / 3)`.
    pub fn dbscan_steps(self) -> usize {
        (self.0 / 3).max(1) as usize
    }

    /// K-means steps per tick: `max(1, speed / 15)`.
    pub fn kmeans_steps(self) -> usize {
        (self.0 / 15).max(1) as usize
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(30)
    }
}

/// Coordinate bounds of the experiment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Canvas {
    /// Width in display units.
    pub width: f64,
    /// Height in display units.
    pub height: f64,
}

impl Canvas {
    /// Create a canvas.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both sides must be positive and finite.
    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(Error::InvalidParameter {
                name: "width",
                message: "must be positive and finite",
            });
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(Error::InvalidParameter {
                name: "height",
                message: "must be positive and finite",
            });
        }
        Ok(())
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(600.0, 600.0)
    }
}

/// Everything needed to set up a [`crate::Driver`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ExperimentConfig {
    /// Clustering parameters.
    pub algo: AlgoConfig,
    /// Per-tick cadence.
    pub speed: Speed,
    /// Coordinate bounds.
    pub canvas: Canvas,
    /// Dataset shape.
    pub dataset: DatasetKind,
    /// Requested number of points.
    pub point_count: usize,
    /// Seed for dataset sampling and K-means initialization.
    pub seed: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            algo: AlgoConfig::default(),
            speed: Speed::default(),
            canvas: Canvas::default(),
            dataset: DatasetKind::default(),
            point_count: 500,
            seed: None,
        }
    }
}

impl ExperimentConfig {
    /// Validate algorithm parameters and canvas.
    pub fn validate(&self) -> Result<()> {
        self.algo.validate()?;
        self.canvas.validate()
    }
}
