//! Step events: the only channel from an engine to its driver.

use crate::geometry::Position;
use crate::palette::Color;
use crate::point::{ClusterId, PointId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A K-means centroid. `id` is stable across iterations.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Centroid {
    /// Index in `[0, k)`.
    pub id: ClusterId,
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Display colour.
    pub color: Color,
}

impl Position for Centroid {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

/// One point's nearest-centroid assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assignment {
    /// Point id.
    pub id: PointId,
    /// Centroid index.
    pub cluster_id: ClusterId,
}

/// One unit of algorithmic progress.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum Step {
    /// The engine started examining a point.
    Visiting {
        /// Point under examination.
        point_id: PointId,
    },
    /// The eps-neighbourhood of a point (self included).
    Neighbors {
        /// Centre of the query.
        point_id: PointId,
        /// Ids within eps, in dataset order.
        neighbor_ids: Vec<PointId>,
    },
    /// Too few neighbours; provisionally an outlier.
    Noise {
        /// Point labelled noise.
        point_id: PointId,
    },
    /// A new cluster seeded by a core point.
    ClusterStart {
        /// Freshly opened cluster.
        cluster_id: ClusterId,
        /// Seeding core point.
        point_id: PointId,
    },
    /// A point attached to the open cluster.
    ClusterAdd {
        /// Open cluster.
        cluster_id: ClusterId,
        /// Attached point.
        point_id: PointId,
        /// Core (true) or border (false).
        is_core: bool,
    },
    /// Full assignment snapshot for one iteration.
    KmeansAssign {
        /// One entry per point, in dataset order.
        points: Vec<Assignment>,
    },
    /// Full centroid snapshot.
    KmeansMove {
        /// All `k` centroids, by index.
        centroids: Vec<Centroid>,
    },
    /// Terminal event.
    Finished,
}

impl Step {
    /// Whether this is the terminal event.
    pub fn is_finished(&self) -> bool {
        matches!(self, Step::Finished)
    }
}
