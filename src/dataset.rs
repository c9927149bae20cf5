//! Procedural 2-D datasets.
//!
//! Shapes chosen to show where density clustering and centroid clustering
//! disagree: rings and arcs that K-means cuts through, blobs it handles well.
//!
//! Ids are assigned `0..` in emission order, and that order is the order
//! the density engine scans.

use crate::config::Canvas;
use crate::error::{Error, Result};
use crate::point::Sample;
use rand::prelude::*;
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Margin kept free on every side of the canvas.
pub const PADDING: f64 = 50.0;

/// Dataset shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum DatasetKind {
    /// Ring face, two eyes and an arc mouth.
    #[default]
    Smiley,
    /// Two interleaved half circles.
    Moons,
    /// Three Gaussian blobs at random centres.
    Blobs,
    /// Two concentric rings.
    Circles,
    /// Uniform noise.
    Random,
}

impl DatasetKind {
    /// Every kind, in menu order.
    pub const ALL: [DatasetKind; 5] = [
        DatasetKind::Smiley,
        DatasetKind::Moons,
        DatasetKind::Blobs,
        DatasetKind::Circles,
        DatasetKind::Random,
    ];

    /// Lower-case name.
    pub fn name(self) -> &'static str {
        match self {
            DatasetKind::Smiley => "smiley",
            DatasetKind::Moons => "moons",
            DatasetKind::Blobs => "blobs",
            DatasetKind::Circles => "circles",
            DatasetKind::Random => "random",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DatasetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| Error::UnknownDataset(s.to_string()))
    }
}

/// Number of loop iterations for `i < count * fraction`.
fn portion(count: usize, fraction: f64) -> usize {
    (count as f64 * fraction).ceil() as usize
}

fn normal(mean: f64, sd: f64) -> Result<Normal<f64>> {
    Normal::new(mean, sd).map_err(|_| Error::InvalidParameter {
        name: "canvas",
        message: "too small for the requested shape",
    })
}

/// Generate a dataset of roughly `count` points inside `canvas`.
///
/// Shape fractions are rounded up per part, so the result may hold a few
/// more points than requested.
pub fn generate<R: Rng>(
    kind: DatasetKind,
    canvas: Canvas,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Sample>> {
    if count == 0 {
        return Err(Error::EmptyInput);
    }
    canvas.validate()?;
    if canvas.width <= 2.0 * PADDING || canvas.height <= 2.0 * PADDING {
        return Err(Error::InvalidParameter {
            name: "canvas",
            message: "must be larger than twice the padding",
        });
    }

    let w = canvas.width - PADDING * 2.0;
    let h = canvas.height - PADDING * 2.0;
    let cx = canvas.width / 2.0;
    let cy = canvas.height / 2.0;
    let side = w.min(h);

    let mut points: Vec<Sample> = Vec::with_capacity(count + 4);
    let mut push = |x: f64, y: f64| {
        let id = points.len();
        points.push(Sample::new(id, x, y));
    };

    match kind {
        DatasetKind::Smiley => {
            let r = side / 2.2;
            let ring = normal(0.0, 15.0)?;
            for _ in 0..portion(count, 0.6) {
                let angle = rng.random::<f64>() * PI * 2.0;
                let dist = r + ring.sample(rng);
                push(cx + angle.cos() * dist, cy + angle.sin() * dist);
            }

            let eye_offset = r * 0.4;
            let eye = normal(0.0, r * 0.15 * 0.6)?;
            for side_sign in [-1.0, 1.0] {
                for _ in 0..portion(count, 0.1) {
                    push(
                        cx + side_sign * eye_offset + eye.sample(rng),
                        cy - eye_offset * 0.5 + eye.sample(rng),
                    );
                }
            }

            let mouth_r = r * 0.6;
            let lip = normal(0.0, 5.0)?;
            for _ in 0..portion(count, 0.2) {
                let angle = PI * 0.2 + rng.random::<f64>() * PI * 0.6;
                let thickness = lip.sample(rng);
                push(
                    cx + angle.cos() * (mouth_r + thickness),
                    cy + angle.sin() * (mouth_r + thickness),
                );
            }
        }
        DatasetKind::Moons => {
            let radius = side / 4.0;
            let jitter = normal(0.0, 10.0)?;
            for _ in 0..portion(count, 0.5) {
                let angle = PI * rng.random::<f64>();
                push(
                    cx - radius / 2.0 + angle.cos() * radius + jitter.sample(rng),
                    cy - radius / 2.0 - angle.sin() * radius + jitter.sample(rng),
                );
            }
            for _ in 0..portion(count, 0.5) {
                let angle = PI + PI * rng.random::<f64>();
                push(
                    cx + radius / 2.0 + angle.cos() * radius + jitter.sample(rng),
                    cy + radius / 2.0 - angle.sin() * radius + jitter.sample(rng),
                );
            }
        }
        DatasetKind::Circles => {
            let inner = normal(side / 6.0, 8.0)?;
            for _ in 0..portion(count, 0.3) {
                let angle = rng.random::<f64>() * PI * 2.0;
                let dist = inner.sample(rng);
                push(cx + angle.cos() * dist, cy + angle.sin() * dist);
            }
            let outer = normal(side / 2.5, 10.0)?;
            for _ in 0..portion(count, 0.7) {
                let angle = rng.random::<f64>() * PI * 2.0;
                let dist = outer.sample(rng);
                push(cx + angle.cos() * dist, cy + angle.sin() * dist);
            }
        }
        DatasetKind::Blobs => {
            const BLOBS: usize = 3;
            let jitter = normal(0.0, 30.0)?;
            for _ in 0..BLOBS {
                let bx = PADDING + rng.random::<f64>() * w;
                let by = PADDING + rng.random::<f64>() * h;
                for _ in 0..portion(count, 1.0 / BLOBS as f64) {
                    push(bx + jitter.sample(rng), by + jitter.sample(rng));
                }
            }
        }
        DatasetKind::Random => {
            for _ in 0..count {
                push(
                    PADDING + rng.random::<f64>() * w,
                    PADDING + rng.random::<f64>() * h,
                );
            }
        }
    }

    Ok(points)
}
