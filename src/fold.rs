//! Event folding: turning a step stream into display state.
//!
//! A [`View`] owns one independent copy of the points plus an
//! [`AnimationState`] summary. Everything a renderer sees is derived by
//! [`View::apply`]; replaying a captured log into a fresh view with
//! [`replay`] reproduces the live state exactly.
//!
//! Folding rules:
//!
//! | Step | Point collection | Summary |
//! |------|------------------|---------|
//! | `visiting` | `visited = true` | active point |
//! | `neighbors` | – | active point, neighbour ids |
//! | `noise` | label = noise | – |
//! | `cluster_start` | label, `is_core = true` | `CLUSTERING: #n` |
//! | `cluster_add` | label, `is_core` (last write wins) | – |
//! | `kmeans_assign` | labels of named points | `ASSIGNING POINTS` |
//! | `kmeans_move` | – | centroids replaced, `UPDATING CENTROIDS` |
//! | `finished` | – | cleared, terminal message |
//!
//! Events naming an id absent from the collection are ignored.

use crate::point::{ClusterId, Label, Point, PointId, Sample};
use crate::step::{Centroid, Step};
use std::collections::{BTreeSet, HashMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which engine a view folds, deciding its terminal message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Role {
    /// DBSCAN: finishes with the number of clusters found.
    Density,
    /// K-means: finishes with `CONVERGED`.
    Centroid,
}

/// Per-engine summary for a renderer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnimationState {
    /// Point currently under examination.
    pub current_point: Option<PointId>,
    /// Neighbourhood of the current point.
    pub neighbor_ids: Vec<PointId>,
    /// Human-readable status.
    pub message: String,
    /// Latest centroid snapshot (K-means only).
    pub centroids: Vec<Centroid>,
}

impl AnimationState {
    fn with_message(message: &str) -> Self {
        Self {
            current_point: None,
            neighbor_ids: Vec::new(),
            message: message.to_string(),
            centroids: Vec::new(),
        }
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::with_message("Ready")
    }
}

/// Display state folded from one engine's steps.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    role: Role,
    points: Vec<Point>,
    index: HashMap<PointId, usize>,
    state: AnimationState,
    finished: bool,
}

impl View {
    /// Fresh, unassigned view over `samples`.
    pub fn new(role: Role, samples: &[Sample]) -> Self {
        let points: Vec<Point> = samples.iter().copied().map(Point::from).collect();
        let index = points.iter().enumerate().map(|(i, p)| (p.id, i)).collect();
        Self {
            role,
            points,
            index,
            state: AnimationState::default(),
            finished: false,
        }
    }

    /// Engine this view folds.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Points in dataset order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Look up a point by id.
    pub fn point(&self, id: PointId) -> Option<&Point> {
        self.index.get(&id).map(|&i| &self.points[i])
    }

    /// Summary for the renderer.
    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    /// Centroid snapshot (empty for density views).
    pub fn centroids(&self) -> &[Centroid] {
        &self.state.centroids
    }

    /// Whether `finished` has been folded.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Distinct non-negative cluster ids currently displayed.
    pub fn cluster_count(&self) -> usize {
        self.points
            .iter()
            .filter_map(|p| p.label.and_then(Label::cluster))
            .collect::<BTreeSet<ClusterId>>()
            .len()
    }

    /// Points currently labelled noise.
    pub fn noise_count(&self) -> usize {
        self.points
            .iter()
            .filter(|p| p.label == Some(Label::Noise))
            .count()
    }

    /// Percentage of points visited, `0.0` for an empty view.
    pub fn progress(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        let visited = self.points.iter().filter(|p| p.visited).count();
        visited as f64 / self.points.len() as f64 * 100.0
    }

    /// Back to unassigned points and an `IDLE` summary.
    pub fn reset(&mut self) {
        self.points.iter_mut().for_each(Point::reset);
        self.state = AnimationState::with_message("IDLE");
        self.finished = false;
    }

    fn point_mut(&mut self, id: PointId) -> Option<&mut Point> {
        self.index.get(&id).map(|&i| &mut self.points[i])
    }

    /// Fold one step.
    pub fn apply(&mut self, step: &Step) {
        match step {
            Step::Visiting { point_id } => {
                if let Some(p) = self.point_mut(*point_id) {
                    p.visited = true;
                    self.state.current_point = Some(*point_id);
                }
            }
            Step::Neighbors {
                point_id,
                neighbor_ids,
            } => {
                if self.index.contains_key(point_id) {
                    self.state.current_point = Some(*point_id);
                    self.state.neighbor_ids.clone_from(neighbor_ids);
                }
            }
            Step::Noise { point_id } => {
                if let Some(p) = self.point_mut(*point_id) {
                    p.label = Some(Label::Noise);
                }
            }
            Step::ClusterStart {
                cluster_id,
                point_id,
            } => {
                if let Some(p) = self.point_mut(*point_id) {
                    p.label = Some(Label::Cluster(*cluster_id));
                    p.is_core = Some(true);
                    self.state.message = format!("CLUSTERING: #{}", cluster_id + 1);
                }
            }
            Step::ClusterAdd {
                cluster_id,
                point_id,
                is_core,
            } => {
                if let Some(p) = self.point_mut(*point_id) {
                    p.label = Some(Label::Cluster(*cluster_id));
                    p.is_core = Some(*is_core);
                }
            }
            Step::KmeansAssign { points } => {
                for a in points {
                    if let Some(p) = self.point_mut(a.id) {
                        p.label = Some(Label::Cluster(a.cluster_id));
                    }
                }
                self.state.message = "ASSIGNING POINTS".to_string();
            }
            Step::KmeansMove { centroids } => {
                self.state.centroids.clone_from(centroids);
                self.state.message = "UPDATING CENTROIDS".to_string();
            }
            Step::Finished => {
                self.finished = true;
                self.state.current_point = None;
                self.state.neighbor_ids.clear();
                self.state.message = match self.role {
                    Role::Density => format!("FINISHED: {} CLUSTERS", self.cluster_count()),
                    Role::Centroid => "CONVERGED".to_string(),
                };
            }
        }
    }

    /// Fold every step in order.
    pub fn apply_all<'a, I>(&mut self, steps: I)
    where
        I: IntoIterator<Item = &'a Step>,
    {
        for step in steps {
            self.apply(step);
        }
    }
}

/// Fold a captured log into a fresh view over `samples`.
pub fn replay(role: Role, samples: &[Sample], steps: &[Step]) -> View {
    let mut view = View::new(role, samples);
    view.apply_all(steps);
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Color;
    use crate::step::Assignment;

    fn samples() -> Vec<Sample> {
        vec![
            Sample::new(0, 0.0, 0.0),
            Sample::new(1, 1.0, 0.0),
            Sample::new(2, 50.0, 50.0),
        ]
    }

    #[test]
    fn test_visiting_marks_point_and_summary() {
        let mut view = View::new(Role::Density, &samples());
        view.apply(&Step::Visiting { point_id: 1 });
        assert!(view.point(1).unwrap().visited);
        assert!(!view.point(0).unwrap().visited);
        assert_eq!(view.state().current_point, Some(1));
        assert_eq!(view.point(1).unwrap().label, None);
    }

    #[test]
    fn test_neighbors_touch_only_summary() {
        let mut view = View::new(Role::Density, &samples());
        let before = view.points().to_vec();
        view.apply(&Step::Neighbors {
            point_id: 0,
            neighbor_ids: vec![0, 1],
        });
        assert_eq!(view.points(), &before[..]);
        assert_eq!(view.state().current_point, Some(0));
        assert_eq!(view.state().neighbor_ids, vec![0, 1]);
    }

    #[test]
    fn test_noise_then_cluster_add_overwrites() {
        let mut view = View::new(Role::Density, &samples());
        view.apply(&Step::Noise { point_id: 0 });
        assert_eq!(view.point(0).unwrap().label, Some(Label::Noise));
        assert_eq!(view.noise_count(), 1);

        view.apply(&Step::ClusterAdd {
            cluster_id: 3,
            point_id: 0,
            is_core: false,
        });
        let p = view.point(0).unwrap();
        assert_eq!(p.label, Some(Label::Cluster(3)));
        assert_eq!(p.is_core, Some(false));
        assert_eq!(view.noise_count(), 0);
    }

    #[test]
    fn test_cluster_start_implies_core_and_message() {
        let mut view = View::new(Role::Density, &samples());
        view.apply(&Step::ClusterStart {
            cluster_id: 0,
            point_id: 2,
        });
        assert_eq!(view.point(2).unwrap().is_core, Some(true));
        assert_eq!(view.state().message, "CLUSTERING: #1");
    }

    #[test]
    fn test_cluster_add_is_last_write_wins() {
        let mut view = View::new(Role::Density, &samples());
        let add = Step::ClusterAdd {
            cluster_id: 1,
            point_id: 1,
            is_core: true,
        };
        view.apply(&add);
        let once = view.clone();
        view.apply(&add);
        assert_eq!(view, once);

        view.apply(&Step::ClusterAdd {
            cluster_id: 1,
            point_id: 1,
            is_core: false,
        });
        assert_eq!(view.point(1).unwrap().is_core, Some(false));
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let mut view = View::new(Role::Density, &samples());
        let before = view.clone();
        view.apply(&Step::Visiting { point_id: 99 });
        view.apply(&Step::Neighbors {
            point_id: 99,
            neighbor_ids: vec![99],
        });
        view.apply(&Step::Noise { point_id: 99 });
        view.apply(&Step::ClusterStart {
            cluster_id: 0,
            point_id: 99,
        });
        view.apply(&Step::ClusterAdd {
            cluster_id: 0,
            point_id: 99,
            is_core: true,
        });
        assert_eq!(view, before);
    }

    #[test]
    fn test_kmeans_assign_and_move() {
        let mut view = View::new(Role::Centroid, &samples());
        view.apply(&Step::KmeansAssign {
            points: vec![
                Assignment { id: 0, cluster_id: 1 },
                Assignment { id: 99, cluster_id: 0 },
            ],
        });
        assert_eq!(view.point(0).unwrap().label, Some(Label::Cluster(1)));
        assert_eq!(view.point(1).unwrap().label, None);
        assert!(!view.point(0).unwrap().visited);
        assert_eq!(view.state().message, "ASSIGNING POINTS");

        let snapshot = vec![Centroid {
            id: 0,
            x: 3.0,
            y: 4.0,
            color: Color::for_cluster(0),
        }];
        view.apply(&Step::KmeansMove {
            centroids: snapshot.clone(),
        });
        assert_eq!(view.centroids(), &snapshot[..]);
        assert_eq!(view.state().message, "UPDATING CENTROIDS");
    }

    #[test]
    fn test_finished_messages() {
        let mut density = View::new(Role::Density, &samples());
        density.apply_all(&[
            Step::Visiting { point_id: 0 },
            Step::ClusterStart {
                cluster_id: 0,
                point_id: 0,
            },
            Step::ClusterStart {
                cluster_id: 1,
                point_id: 2,
            },
            Step::Noise { point_id: 1 },
            Step::Finished,
        ]);
        assert!(density.is_finished());
        assert_eq!(density.state().current_point, None);
        assert!(density.state().neighbor_ids.is_empty());
        assert_eq!(density.state().message, "FINISHED: 2 CLUSTERS");

        let mut centroid = View::new(Role::Centroid, &samples());
        centroid.apply(&Step::Finished);
        assert_eq!(centroid.state().message, "CONVERGED");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut view = View::new(Role::Density, &samples());
        view.apply_all(&[
            Step::Visiting { point_id: 0 },
            Step::Noise { point_id: 0 },
            Step::Finished,
        ]);
        view.reset();
        assert!(!view.is_finished());
        assert_eq!(view.state().message, "IDLE");
        assert!(view.points().iter().all(|p| p.label.is_none() && !p.visited));
        assert_eq!(view.progress(), 0.0);
    }

    #[test]
    fn test_progress() {
        let mut view = View::new(Role::Density, &samples());
        view.apply(&Step::Visiting { point_id: 0 });
        assert!((view.progress() - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(View::new(Role::Density, &[]).progress(), 0.0);
    }
}
