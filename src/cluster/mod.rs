//! Resumable clustering engines.
//!
//! Both engines are iterators over [`crate::Step`] events and implement
//! [`StepEngine`]. Pulling one event runs the algorithm just far enough to
//! produce it; dropping the engine cancels the run.
//!
//! ## Algorithms
//!
//! ### DBSCAN
//!
//! Density-based: grows clusters outward from core points (at least
//! `min_pts` points within `eps`, self included) and labels the rest noise.
//! Deterministic: the event stream depends only on the points, their order,
//! `eps` and `min_pts`.
//!
//! ### K-means
//!
//! Lloyd's algorithm from random centroids inside the canvas, capped at
//! [`MAX_ITERATIONS`]. Seed it with [`Kmeans::with_seed`] for reproducible
//! runs.
//!
//! ## Usage
//!
//! ```rust
//! use tickcluster::cluster::{Dbscan, Kmeans};
//! use tickcluster::{Sample, Step};
//!
//! let data = vec![
//!     Sample::new(0, 0.0, 0.0),
//!     Sample::new(1, 1.0, 0.0),
//!     Sample::new(2, 50.0, 50.0),
//! ];
//!
//! let mut dbscan = Dbscan::new(&data, 2.0, 2);
//! assert_eq!(dbscan.next(), Some(Step::Visiting { point_id: 0 }));
//! assert!(dbscan.any(|s| s == Step::Noise { point_id: 2 }));
//!
//! let steps: Vec<Step> = Kmeans::new(&data, 2, 100.0, 100.0).with_seed(1).collect();
//! assert_eq!(steps.last(), Some(&Step::Finished));
//! ```

mod dbscan;
mod kmeans;
mod traits;

pub use dbscan::Dbscan;
pub use kmeans::{Kmeans, CONVERGENCE_SHIFT, MAX_ITERATIONS};
pub use traits::StepEngine;
