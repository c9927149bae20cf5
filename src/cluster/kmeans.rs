//! K-means (Lloyd's algorithm) as a resumable, step-emitting engine.
//!
//! # Lloyd's Algorithm
//!
//! 1. Initialize k centroids uniformly at random inside the canvas
//! 2. **Assign**: each point → nearest centroid
//! 3. **Update**: each centroid → mean of assigned points
//! 4. Repeat until no centroid moves by [`CONVERGENCE_SHIFT`] or more, or
//!    [`MAX_ITERATIONS`] is reached
//!
//! # Emitted Steps
//!
//! ```text
//! kmeans_move (initial)
//! ( kmeans_assign  kmeans_move ) × iterations
//! finished
//! ```
//!
//! Ties in the assignment go to the lowest centroid index. A centroid with
//! no assigned points keeps its position; it is never reinitialized, so
//! when `k` exceeds the number of points the surplus centroids stay where
//! they started.
//!
//! Hitting the iteration cap ends the run the same way convergence does.
//! The engine does not report which of the two happened; use
//! [`Kmeans::iterations`] if the distinction matters.

use super::traits::StepEngine;
use crate::geometry::distance;
use crate::palette::Color;
use crate::point::{ClusterId, Sample};
use crate::step::{Assignment, Centroid, Step};
use rand::prelude::*;
use std::iter::FusedIterator;
use tracing::{debug, trace};

/// Hard cap on assign/update iterations.
pub const MAX_ITERATIONS: usize = 50;

/// Converged once every centroid moves strictly less than this.
pub const CONVERGENCE_SHIFT: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Init,
    Assign,
    Update,
    Exhausted,
}

/// Resumable K-means over a fixed point set.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Canvas width for random initialization.
    width: f64,
    /// Canvas height for random initialization.
    height: f64,
    /// Random seed.
    seed: Option<u64>,
    /// Explicit starting positions, overriding random initialization.
    initial: Option<Vec<(f64, f64)>>,
    points: Vec<Sample>,
    centroids: Vec<Centroid>,
    labels: Vec<ClusterId>,
    iterations: usize,
    converged: bool,
    phase: Phase,
}

impl Kmeans {
    /// Create an engine over a private copy of `points`.
    ///
    /// Initial centroids are drawn inside `[0, width) × [0, height)` on the
    /// first pull. `k` is expected to be `>= 1`.
    pub fn new(points: &[Sample], k: usize, width: f64, height: f64) -> Self {
        Self {
            k,
            width,
            height,
            seed: None,
            initial: None,
            points: points.to_vec(),
            centroids: Vec::with_capacity(k),
            labels: vec![0; points.len()],
            iterations: 0,
            converged: false,
            phase: Phase::Init,
        }
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Start from fixed centroid positions instead of random ones.
    ///
    /// `k` becomes `positions.len()`.
    pub fn with_initial_positions(mut self, positions: Vec<(f64, f64)>) -> Self {
        self.k = positions.len();
        self.initial = Some(positions);
        self
    }

    /// Number of clusters.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Assign/update iterations completed or in progress.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Current working centroids.
    pub fn centroids(&self) -> &[Centroid] {
        &self.centroids
    }

    fn init_centroids(&self) -> Vec<Centroid> {
        let positions = match &self.initial {
            Some(positions) => positions.clone(),
            None => {
                let mut rng: Box<dyn RngCore> = match self.seed {
                    Some(s) => Box::new(StdRng::seed_from_u64(s)),
                    None => Box::new(rand::rng()),
                };
                (0..self.k)
                    .map(|_| {
                        (
                            rng.random::<f64>() * self.width,
                            rng.random::<f64>() * self.height,
                        )
                    })
                    .collect()
            }
        };
        positions
            .into_iter()
            .enumerate()
            .map(|(id, (x, y))| Centroid {
                id,
                x,
                y,
                color: Color::for_cluster(id),
            })
            .collect()
    }

    /// Nearest centroid per point; the first minimum wins.
    fn assign(&mut self) -> Vec<Assignment> {
        let centroids = &self.centroids;
        self.points
            .iter()
            .zip(self.labels.iter_mut())
            .map(|(point, label)| {
                let mut best_cluster = 0;
                let mut best_dist = f64::INFINITY;
                for (k, centroid) in centroids.iter().enumerate() {
                    let dist = distance(point, centroid);
                    if dist < best_dist {
                        best_dist = dist;
                        best_cluster = k;
                    }
                }
                *label = best_cluster;
                Assignment {
                    id: point.id,
                    cluster_id: best_cluster,
                }
            })
            .collect()
    }

    /// Move each centroid to the mean of its points and report convergence.
    fn update(&mut self) -> bool {
        let mut sums = vec![(0.0f64, 0.0f64, 0usize); self.centroids.len()];
        for (point, &label) in self.points.iter().zip(&self.labels) {
            if let Some((sx, sy, count)) = sums.get_mut(label) {
                *sx += point.x;
                *sy += point.y;
                *count += 1;
            }
        }

        let mut converged = true;
        for (centroid, &(sx, sy, count)) in self.centroids.iter_mut().zip(&sums) {
            if count == 0 {
                continue;
            }
            let next = (sx / count as f64, sy / count as f64);
            if distance(&next, &*centroid) >= CONVERGENCE_SHIFT {
                converged = false;
            }
            centroid.x = next.0;
            centroid.y = next.1;
        }
        converged
    }
}

impl Iterator for Kmeans {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        match self.phase {
            Phase::Init => {
                self.centroids = self.init_centroids();
                self.phase = Phase::Assign;
                Some(Step::KmeansMove {
                    centroids: self.centroids.clone(),
                })
            }
            Phase::Assign => {
                if self.converged || self.iterations >= MAX_ITERATIONS {
                    self.phase = Phase::Exhausted;
                    debug!(
                        iterations = self.iterations,
                        converged = self.converged,
                        "kmeans finished"
                    );
                    return Some(Step::Finished);
                }
                self.iterations += 1;
                let points = self.assign();
                self.phase = Phase::Update;
                Some(Step::KmeansAssign { points })
            }
            Phase::Update => {
                self.converged = self.update();
                trace!(
                    iteration = self.iterations,
                    converged = self.converged,
                    "centroids updated"
                );
                self.phase = Phase::Assign;
                Some(Step::KmeansMove {
                    centroids: self.centroids.clone(),
                })
            }
            Phase::Exhausted => None,
        }
    }
}

impl FusedIterator for Kmeans {}

impl StepEngine for Kmeans {
    fn is_finished(&self) -> bool {
        self.phase == Phase::Exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand_distr::{Distribution, Normal};
    use std::collections::HashSet;

    fn moves(steps: &[Step]) -> Vec<&Vec<Centroid>> {
        steps
            .iter()
            .filter_map(|s| match s {
                Step::KmeansMove { centroids } => Some(centroids),
                _ => None,
            })
            .collect()
    }

    fn last_assignment(steps: &[Step]) -> &Vec<Assignment> {
        steps
            .iter()
            .rev()
            .find_map(|s| match s {
                Step::KmeansAssign { points } => Some(points),
                _ => None,
            })
            .unwrap()
    }

    /// Three tight blobs of 20 points each, ids in blob order.
    fn three_blobs(seed: u64) -> (Vec<Sample>, [(f64, f64); 3]) {
        let centers = [(100.0, 100.0), (500.0, 120.0), (300.0, 480.0)];
        let mut rng = StdRng::seed_from_u64(seed);
        let jitter = Normal::new(0.0, 4.0).unwrap();
        let mut data = Vec::new();
        for &(cx, cy) in &centers {
            for _ in 0..20 {
                let id = data.len();
                data.push(Sample::new(
                    id,
                    cx + jitter.sample(&mut rng),
                    cy + jitter.sample(&mut rng),
                ));
            }
        }
        (data, centers)
    }

    #[test]
    fn test_kmeans_step_shape() {
        let data = vec![Sample::new(0, 1.0, 1.0), Sample::new(1, 2.0, 2.0)];
        let steps: Vec<Step> = Kmeans::new(&data, 2, 600.0, 600.0).with_seed(7).collect();

        assert!(matches!(steps[0], Step::KmeansMove { .. }));
        assert_eq!(steps.last(), Some(&Step::Finished));
        for pair in steps[1..steps.len() - 1].chunks(2) {
            assert!(matches!(pair[0], Step::KmeansAssign { .. }));
            assert!(matches!(pair[1], Step::KmeansMove { .. }));
        }
        for snapshot in moves(&steps) {
            assert_eq!(snapshot.len(), 2);
            assert_eq!(snapshot[0].id, 0);
            assert_eq!(snapshot[1].id, 1);
        }
    }

    #[test]
    fn test_kmeans_initial_centroids_inside_canvas() {
        let data = vec![Sample::new(0, 1.0, 1.0)];
        let mut engine = Kmeans::new(&data, 8, 300.0, 200.0).with_seed(3);
        let Some(Step::KmeansMove { centroids }) = engine.next() else {
            panic!("first step must be a centroid snapshot");
        };
        assert_eq!(centroids.len(), 8);
        for c in &centroids {
            assert!((0.0..300.0).contains(&c.x));
            assert!((0.0..200.0).contains(&c.y));
            assert_eq!(c.color, Color::for_cluster(c.id));
        }
    }

    #[test]
    fn test_kmeans_three_blobs_converge_to_means() {
        let (data, centers) = three_blobs(11);
        let start = vec![(150.0, 150.0), (450.0, 150.0), (300.0, 400.0)];
        let mut engine = Kmeans::new(&data, 3, 600.0, 600.0).with_initial_positions(start);
        let steps: Vec<Step> = engine.by_ref().collect();

        assert!(engine.iterations() < MAX_ITERATIONS);
        let labels = last_assignment(&steps);
        for blob in 0..3 {
            let members: HashSet<ClusterId> = labels[blob * 20..(blob + 1) * 20]
                .iter()
                .map(|a| a.cluster_id)
                .collect();
            assert_eq!(members.len(), 1, "blob {blob} split");
        }

        let final_centroids = moves(&steps).last().copied().unwrap().clone();
        for (blob, &(cx, cy)) in centers.iter().enumerate() {
            let members = &data[blob * 20..(blob + 1) * 20];
            let mean_x = members.iter().map(|p| p.x).sum::<f64>() / 20.0;
            let mean_y = members.iter().map(|p| p.y).sum::<f64>() / 20.0;
            let c = &final_centroids[labels[blob * 20].cluster_id];
            assert!((c.x - mean_x).abs() < 1e-9);
            assert!((c.y - mean_y).abs() < 1e-9);
            assert!(distance(&(cx, cy), c) < 10.0);
        }
    }

    #[test]
    fn test_kmeans_ties_go_to_lowest_index() {
        let data = vec![Sample::new(0, 5.0, 0.0)];
        let steps: Vec<Step> = Kmeans::new(&data, 2, 10.0, 10.0)
            .with_initial_positions(vec![(0.0, 0.0), (10.0, 0.0)])
            .collect();
        assert_eq!(last_assignment(&steps)[0].cluster_id, 0);
    }

    #[test]
    fn test_kmeans_surplus_centroids_stay_put() {
        let data = vec![
            Sample::new(0, 10.0, 10.0),
            Sample::new(1, 12.0, 10.0),
            Sample::new(2, 400.0, 400.0),
        ];
        let steps: Vec<Step> = Kmeans::new(&data, 8, 600.0, 600.0).with_seed(99).collect();

        let used: HashSet<ClusterId> = steps
            .iter()
            .filter_map(|s| match s {
                Step::KmeansAssign { points } => Some(points),
                _ => None,
            })
            .flatten()
            .map(|a| a.cluster_id)
            .collect();
        assert!(used.len() <= 3);

        let snapshots = moves(&steps);
        let initial = snapshots[0];
        let last = snapshots.last().unwrap();
        for id in (0..8).filter(|id| !used.contains(id)) {
            assert_eq!(initial[id], last[id]);
        }
    }

    #[test]
    fn test_kmeans_empty_points() {
        let steps: Vec<Step> = Kmeans::new(&[], 3, 100.0, 100.0).with_seed(1).collect();
        // Nothing moves, so the first update converges.
        assert_eq!(steps.len(), 4);
        assert_eq!(
            steps[1],
            Step::KmeansAssign { points: Vec::new() }
        );
        assert_eq!(steps[0], steps[2]);
        assert_eq!(steps[3], Step::Finished);
    }

    #[test]
    fn test_kmeans_fused_after_finished() {
        let data = vec![Sample::new(0, 1.0, 1.0)];
        let mut engine = Kmeans::new(&data, 1, 10.0, 10.0).with_seed(5);
        while engine.next().is_some() {}
        assert!(engine.is_finished());
        assert_eq!(engine.next(), None);
    }

    #[test]
    fn test_kmeans_deterministic_with_seed() {
        let (data, _) = three_blobs(2);
        let a: Vec<Step> = Kmeans::new(&data, 4, 600.0, 600.0).with_seed(42).collect();
        let b: Vec<Step> = Kmeans::new(&data, 4, 600.0, 600.0).with_seed(42).collect();
        assert_eq!(a, b, "same seed should give same result");
    }

    proptest! {
        #[test]
        fn kmeans_respects_iteration_cap_and_convergence(
            coords in proptest::collection::vec((0.0f64..600.0, 0.0f64..600.0), 1..80),
            k in 1usize..9,
            seed in any::<u64>(),
        ) {
            let data: Vec<Sample> = coords
                .into_iter()
                .enumerate()
                .map(|(id, (x, y))| Sample::new(id, x, y))
                .collect();
            let mut engine = Kmeans::new(&data, k, 600.0, 600.0).with_seed(seed);
            let steps: Vec<Step> = engine.by_ref().collect();

            prop_assert!(engine.iterations() <= MAX_ITERATIONS);
            let assigns = steps.iter().filter(|s| matches!(s, Step::KmeansAssign { .. })).count();
            prop_assert_eq!(assigns, engine.iterations());
            prop_assert_eq!(steps.iter().filter(|s| s.is_finished()).count(), 1);

            if engine.iterations() < MAX_ITERATIONS {
                let snapshots = moves(&steps);
                let before = snapshots[snapshots.len() - 2];
                let after = snapshots[snapshots.len() - 1];
                for (a, b) in before.iter().zip(after.iter()) {
                    prop_assert!(distance(a, b) < CONVERGENCE_SHIFT);
                }
            }
        }
    }
}
