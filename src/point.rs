//! Dataset points and their folded display state.

use crate::geometry::Position;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable point identity.
pub type PointId = usize;

/// Cluster identity assigned by an engine.
pub type ClusterId = usize;

/// A dataset entry as produced by a generator: identity plus immutable coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    /// Unique, stable id.
    pub id: PointId,
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Sample {
    /// Create a sample.
    pub fn new(id: PointId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }
}

impl Position for Sample {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

/// Membership label of a point.
///
/// `Option<Label>::None` is "unassigned".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Label {
    /// Outlier.
    Noise,
    /// Member of the cluster with this id.
    Cluster(ClusterId),
}

impl Label {
    /// Integer encoding: `-1` for noise, the cluster id otherwise.
    pub fn as_i64(self) -> i64 {
        match self {
            Label::Noise => -1,
            Label::Cluster(id) => id as i64,
        }
    }

    /// The cluster id, if this is not noise.
    pub fn cluster(self) -> Option<ClusterId> {
        match self {
            Label::Noise => None,
            Label::Cluster(id) => Some(id),
        }
    }
}

/// A point as seen by a renderer.
///
/// `label`, `visited` and `is_core` only change through
/// [`crate::fold`]; engines never touch them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// Unique, stable id.
    pub id: PointId,
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Current membership, `None` until an event assigns one.
    pub label: Option<Label>,
    /// Whether an engine has examined this point.
    pub visited: bool,
    /// Core-point flag from the latest cluster event.
    pub is_core: Option<bool>,
}

impl Point {
    /// Clear all folded state, keeping identity and coordinates.
    pub fn reset(&mut self) {
        self.label = None;
        self.visited = false;
        self.is_core = None;
    }

    /// Identity and coordinates only.
    pub fn sample(&self) -> Sample {
        Sample::new(self.id, self.x, self.y)
    }
}

impl From<Sample> for Point {
    fn from(s: Sample) -> Self {
        Self {
            id: s.id,
            x: s.x,
            y: s.y,
            label: None,
            visited: false,
            is_core: None,
        }
    }
}

impl Position for Point {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}
