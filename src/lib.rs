//! # tickcluster
//!
//! DBSCAN and K-means as interruptible computations: each engine emits one
//! [`Step`] per unit of progress and can be paused, resumed or dropped
//! between any two steps. A [`Driver`] pulls a bounded number of steps per
//! tick from each engine and folds them into independent display views.
//!
//! Display state is event-sourced: a [`View`] is only ever changed by
//! folding steps, so replaying a captured log with [`fold::replay`]
//! reproduces it exactly.
//!
//! ```rust
//! use tickcluster::{AlgoConfig, Driver, ExperimentConfig, Sample};
//!
//! let data = vec![
//!     Sample::new(0, 100.0, 100.0),
//!     Sample::new(1, 104.0, 100.0),
//!     Sample::new(2, 400.0, 400.0),
//!     Sample::new(3, 404.0, 400.0),
//! ];
//! let config = ExperimentConfig {
//!     algo: AlgoConfig { eps: 10.0, min_pts: 2, k: 2 },
//!     seed: Some(3),
//!     ..ExperimentConfig::default()
//! };
//!
//! let mut driver = Driver::with_dataset(config, data).unwrap();
//! driver.run_to_completion(1_000);
//! assert!(driver.is_finished());
//! assert_eq!(driver.dbscan_view().cluster_count(), 2);
//! ```

pub mod cluster;
pub mod config;
pub mod dataset;
pub mod driver;
/// Error types used across `tickcluster`.
pub mod error;
pub mod fold;
pub mod geometry;
pub mod palette;
pub mod point;
pub mod step;


pub use cluster::{Dbscan, Kmeans, StepEngine};
pub use config::{AlgoConfig, Canvas, ExperimentConfig, Speed};
pub use dataset::{generate, DatasetKind};
pub use driver::{Driver, TickReport};
pub use error::{Error, Result};
pub use fold::{AnimationState, Role, View};
pub use geometry::{distance, Position};
pub use palette::Color;
pub use point::{ClusterId, Label, Point, PointId, Sample};
pub use step::{Assignment, Centroid, Step};
