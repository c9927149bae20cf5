//! DBSCAN as a resumable, step-emitting engine.
//!
//! # The Algorithm (Ester et al., 1996)
//!
//! DBSCAN groups points by neighbourhood density:
//!
//! - **Epsilon (ε)**: maximum distance between two points to be neighbours.
//! - **MinPts**: minimum neighbourhood size (the point itself included) for
//!   a point to be "core".
//! - **Core point**: has at least MinPts neighbours within ε.
//! - **Border point**: within ε of a core point but not core itself.
//! - **Noise point**: neither core nor border.
//!
//! # Stepwise Execution
//!
//! [`Dbscan`] is an [`Iterator`] over [`Step`] events. Every call to `next`
//! does exactly the work for one event and then suspends, keeping its loop
//! state (outer cursor, seed queue, seed cursor, visited and clustered sets)
//! in an explicit phase machine:
//!
//! ```text
//! Scan ──visiting──▶ Query ──neighbors──▶ Classify ──noise──────────────▶ Scan
//!                                            │
//!                                            └──cluster_start──▶ Expand
//! Expand ──visiting──▶ SeedQuery ──neighbors──▶ SeedAttach ──cluster_add──▶ SeedMembership
//! SeedMembership ──cluster_add (first membership only)──▶ Expand
//! ```
//!
//! The seed queue is a vector scanned by index. Core seeds append their
//! unqueued neighbours to the tail, and the cursor reaches them later in
//! the same expansion.
//!
//! # Labels Live Outside the Engine
//!
//! The engine keeps only *shadow* bookkeeping (visited and clustered id
//! sets). It never labels anything itself: a point reported as noise may
//! later receive a `cluster_add` as a border point, and only the fold in
//! [`crate::fold`] turns events into labels.
//!
//! ## Complexity
//!
//! - **Time**: O(n²) overall, one linear region query per visited point.
//! - **Space**: O(n) for the id sets and the seed queue.

use super::traits::StepEngine;
use crate::geometry::distance;
use crate::point::{ClusterId, PointId, Sample};
use crate::step::Step;
use std::collections::{HashMap, HashSet};
use std::iter::FusedIterator;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Scan,
    Query {
        point_id: PointId,
    },
    Classify {
        point_id: PointId,
    },
    Expand {
        cluster_id: ClusterId,
    },
    SeedQuery {
        cluster_id: ClusterId,
        seed: PointId,
    },
    SeedAttach {
        cluster_id: ClusterId,
        seed: PointId,
    },
    SeedMembership {
        cluster_id: ClusterId,
        seed: PointId,
    },
    Finish,
    Exhausted,
}

/// Resumable DBSCAN over a fixed point set.
#[derive(Debug, Clone)]
pub struct Dbscan {
    /// Epsilon: maximum distance for neighbourhood (inclusive).
    epsilon: f64,
    /// Minimum neighbourhood size for core classification.
    min_pts: usize,
    points: Vec<Sample>,
    index: HashMap<PointId, usize>,
    phase: Phase,
    /// Outer loop position in `points`.
    cursor: usize,
    next_cluster: ClusterId,
    visited: HashSet<PointId>,
    clustered: HashSet<PointId>,
    seeds: Vec<PointId>,
    queued: HashSet<PointId>,
    seed_cursor: usize,
    /// Result of the latest region query.
    neighbors: Vec<PointId>,
}

impl Dbscan {
    /// Create an engine over a private copy of `points`.
    ///
    /// # Arguments
    ///
    /// * `points` - Dataset in its significant order.
    /// * `epsilon` - Neighbourhood radius, expected `> 0`.
    /// * `min_pts` - Minimum neighbourhood size, expected `>= 1`.
    ///
    /// Parameters are not checked here; see [`crate::AlgoConfig::validate`].
    pub fn new(points: &[Sample], epsilon: f64, min_pts: usize) -> Self {
        let points = points.to_vec();
        let index = points
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id, i))
            .collect();
        let n = points.len();
        Self {
            epsilon,
            min_pts,
            points,
            index,
            phase: Phase::Scan,
            cursor: 0,
            next_cluster: 0,
            visited: HashSet::with_capacity(n),
            clustered: HashSet::with_capacity(n),
            seeds: Vec::new(),
            queued: HashSet::new(),
            seed_cursor: 0,
            neighbors: Vec::new(),
        }
    }

    /// Neighbourhood radius.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Minimum neighbourhood size.
    pub fn min_pts(&self) -> usize {
        self.min_pts
    }

    /// Number of clusters opened so far.
    pub fn clusters_opened(&self) -> usize {
        self.next_cluster
    }

    /// Ids within epsilon of `point_id`, itself included, in dataset order.
    fn region_query(&self, point_id: PointId) -> Vec<PointId> {
        let Some(center) = self.index.get(&point_id).map(|&i| &self.points[i]) else {
            return Vec::new();
        };
        self.points
            .iter()
            .filter(|other| distance(center, *other) <= self.epsilon)
            .map(|other| other.id)
            .collect()
    }
}

impl Iterator for Dbscan {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        loop {
            match self.phase {
                Phase::Scan => {
                    let Some(point) = self.points.get(self.cursor) else {
                        self.phase = Phase::Finish;
                        continue;
                    };
                    let point_id = point.id;
                    if !self.visited.insert(point_id) {
                        self.cursor += 1;
                        continue;
                    }
                    self.phase = Phase::Query { point_id };
                    return Some(Step::Visiting { point_id });
                }
                Phase::Query { point_id } => {
                    self.neighbors = self.region_query(point_id);
                    self.phase = Phase::Classify { point_id };
                    return Some(Step::Neighbors {
                        point_id,
                        neighbor_ids: self.neighbors.clone(),
                    });
                }
                Phase::Classify { point_id } => {
                    if self.neighbors.len() < self.min_pts {
                        self.cursor += 1;
                        self.phase = Phase::Scan;
                        return Some(Step::Noise { point_id });
                    }

                    let cluster_id = self.next_cluster;
                    self.next_cluster += 1;
                    let _ = self.clustered.insert(point_id);

                    self.seeds = std::mem::take(&mut self.neighbors);
                    self.queued = self.seeds.iter().copied().collect();
                    self.seed_cursor = 0;
                    self.phase = Phase::Expand { cluster_id };
                    trace!(cluster_id, point_id, seeds = self.seeds.len(), "cluster opened");
                    return Some(Step::ClusterStart {
                        cluster_id,
                        point_id,
                    });
                }
                Phase::Expand { cluster_id } => {
                    let Some(&seed) = self.seeds.get(self.seed_cursor) else {
                        trace!(cluster_id, size = self.seeds.len(), "cluster closed");
                        self.cursor += 1;
                        self.phase = Phase::Scan;
                        continue;
                    };
                    if self.visited.insert(seed) {
                        self.phase = Phase::SeedQuery { cluster_id, seed };
                        return Some(Step::Visiting { point_id: seed });
                    }
                    self.phase = Phase::SeedMembership { cluster_id, seed };
                }
                Phase::SeedQuery { cluster_id, seed } => {
                    self.neighbors = self.region_query(seed);
                    self.phase = Phase::SeedAttach { cluster_id, seed };
                    return Some(Step::Neighbors {
                        point_id: seed,
                        neighbor_ids: self.neighbors.clone(),
                    });
                }
                Phase::SeedAttach { cluster_id, seed } => {
                    let is_core = self.neighbors.len() >= self.min_pts;
                    if is_core {
                        // Grow the queue while it is being scanned.
                        for &id in &self.neighbors {
                            if self.queued.insert(id) {
                                self.seeds.push(id);
                            }
                        }
                    }
                    self.phase = Phase::SeedMembership { cluster_id, seed };
                    return Some(Step::ClusterAdd {
                        cluster_id,
                        point_id: seed,
                        is_core,
                    });
                }
                Phase::SeedMembership { cluster_id, seed } => {
                    self.seed_cursor += 1;
                    self.phase = Phase::Expand { cluster_id };
                    if self.clustered.insert(seed) {
                        return Some(Step::ClusterAdd {
                            cluster_id,
                            point_id: seed,
                            is_core: false,
                        });
                    }
                }
                Phase::Finish => {
                    self.phase = Phase::Exhausted;
                    debug!(
                        points = self.points.len(),
                        clusters = self.next_cluster,
                        "dbscan finished"
                    );
                    return Some(Step::Finished);
                }
                Phase::Exhausted => return None,
            }
        }
    }
}

impl FusedIterator for Dbscan {}

impl StepEngine for Dbscan {
    fn is_finished(&self) -> bool {
        self.phase == Phase::Exhausted
    }
}
