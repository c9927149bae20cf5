//! Tick-based scheduler for the two engines.
//!
//! A host loop (an animation frame callback, a terminal loop, a test)
//! calls [`Driver::tick`] repeatedly. Each tick pulls a bounded number of
//! steps from each engine and folds them into that engine's [`View`]. The
//! engines are advanced independently; the run is finished once both have
//! emitted `finished`.
//!
//! Engines are created lazily on the first tick after construction or a
//! reset, and dropped on reset. No engine state survives a reset.

use crate::cluster::{Dbscan, Kmeans, StepEngine};
use crate::config::{AlgoConfig, ExperimentConfig, Speed};
use crate::dataset::{generate, DatasetKind};
use crate::error::Result;
use crate::fold::{Role, View};
use crate::point::Sample;
use crate::step::Step;
use rand::prelude::*;
use tracing::{debug, info};

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Steps pulled from the DBSCAN engine.
    pub dbscan_steps: usize,
    /// Steps pulled from the K-means engine.
    pub kmeans_steps: usize,
    /// Both engines have finished.
    pub finished: bool,
}

/// Owns the dataset, both views and the lazily created engines.
#[derive(Debug)]
pub struct Driver {
    config: ExperimentConfig,
    dataset: Vec<Sample>,
    dbscan_view: View,
    kmeans_view: View,
    dbscan: Option<Dbscan>,
    kmeans: Option<Kmeans>,
    recording: bool,
    dbscan_log: Vec<Step>,
    kmeans_log: Vec<Step>,
    /// Number of datasets drawn so far; varies the seed on regenerate.
    generation: u64,
}

impl Driver {
    /// Validate `config` and draw its dataset.
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        config.validate()?;
        let dataset = draw(&config, 0)?;
        Ok(Self::assemble(config, dataset))
    }

    /// Validate `config` and use an externally produced dataset.
    ///
    /// `config.dataset` and `config.point_count` only matter for a later
    /// [`Driver::regenerate`].
    pub fn with_dataset(config: ExperimentConfig, dataset: Vec<Sample>) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(config, dataset))
    }

    fn assemble(config: ExperimentConfig, dataset: Vec<Sample>) -> Self {
        Self {
            dbscan_view: View::new(Role::Density, &dataset),
            kmeans_view: View::new(Role::Centroid, &dataset),
            config,
            dataset,
            dbscan: None,
            kmeans: None,
            recording: false,
            dbscan_log: Vec::new(),
            kmeans_log: Vec::new(),
            generation: 0,
        }
    }

    /// Keep every folded step in per-engine logs.
    pub fn with_recording(mut self, recording: bool) -> Self {
        self.recording = recording;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// The dataset both views were built from.
    pub fn dataset(&self) -> &[Sample] {
        &self.dataset
    }

    /// DBSCAN display state.
    pub fn dbscan_view(&self) -> &View {
        &self.dbscan_view
    }

    /// K-means display state.
    pub fn kmeans_view(&self) -> &View {
        &self.kmeans_view
    }

    /// Steps folded into the DBSCAN view since the last reset (when recording).
    pub fn dbscan_log(&self) -> &[Step] {
        &self.dbscan_log
    }

    /// Steps folded into the K-means view since the last reset (when recording).
    pub fn kmeans_log(&self) -> &[Step] {
        &self.kmeans_log
    }

    /// Both engines have emitted `finished`.
    pub fn is_finished(&self) -> bool {
        self.dbscan_view.is_finished() && self.kmeans_view.is_finished()
    }

    /// Percentage of DBSCAN points visited.
    pub fn progress(&self) -> f64 {
        self.dbscan_view.progress()
    }

    /// Advance both engines by their per-tick budgets.
    pub fn tick(&mut self) -> TickReport {
        let AlgoConfig { eps, min_pts, k } = self.config.algo;
        let canvas = self.config.canvas;
        let seed = self.config.seed;

        let dataset = &self.dataset;
        let dbscan = self
            .dbscan
            .get_or_insert_with(|| Dbscan::new(dataset, eps, min_pts));
        let kmeans = self.kmeans.get_or_insert_with(|| {
            let engine = Kmeans::new(dataset, k, canvas.width, canvas.height);
            match seed {
                Some(s) => engine.with_seed(s),
                None => engine,
            }
        });

        let recording = self.recording;
        let dbscan_view = &mut self.dbscan_view;
        let dbscan_log = &mut self.dbscan_log;
        let dbscan_steps = dbscan.pull(self.config.speed.dbscan_steps(), |step| {
            dbscan_view.apply(&step);
            if recording {
                dbscan_log.push(step);
            }
        });

        let kmeans_view = &mut self.kmeans_view;
        let kmeans_log = &mut self.kmeans_log;
        let kmeans_steps = kmeans.pull(self.config.speed.kmeans_steps(), |step| {
            kmeans_view.apply(&step);
            if recording {
                kmeans_log.push(step);
            }
        });

        let finished = dbscan.is_finished() && kmeans.is_finished();
        debug!(dbscan_steps, kmeans_steps, finished, "tick");
        if finished && (dbscan_steps > 0 || kmeans_steps > 0) {
            info!(
                dbscan = %self.dbscan_view.state().message,
                kmeans = %self.kmeans_view.state().message,
                kmeans_iterations = kmeans.iterations(),
                "run finished"
            );
        }

        TickReport {
            dbscan_steps,
            kmeans_steps,
            finished,
        }
    }

    /// Tick until finished or `max_ticks` ticks have run. Returns the ticks used.
    pub fn run_to_completion(&mut self, max_ticks: usize) -> usize {
        for ticks in 1..=max_ticks {
            if self.tick().finished {
                return ticks;
            }
        }
        max_ticks
    }

    /// Drop both engines and clear both views.
    pub fn reset(&mut self) {
        self.dbscan = None;
        self.kmeans = None;
        self.dbscan_view.reset();
        self.kmeans_view.reset();
        self.dbscan_log.clear();
        self.kmeans_log.clear();
        info!(points = self.dataset.len(), "reset");
    }

    /// Replace the clustering parameters and reset.
    pub fn set_config(&mut self, algo: AlgoConfig) -> Result<()> {
        algo.validate()?;
        self.config.algo = algo;
        self.reset();
        Ok(())
    }

    /// Change the per-tick cadence without resetting.
    pub fn set_speed(&mut self, speed: Speed) {
        self.config.speed = speed;
    }

    /// Draw a fresh dataset of the configured kind and reset.
    pub fn regenerate(&mut self) -> Result<()> {
        self.generation += 1;
        self.dataset = draw(&self.config, self.generation)?;
        self.dbscan_view = View::new(Role::Density, &self.dataset);
        self.kmeans_view = View::new(Role::Centroid, &self.dataset);
        debug!(
            kind = %self.config.dataset,
            points = self.dataset.len(),
            "dataset regenerated"
        );
        self.reset();
        Ok(())
    }

    /// Switch dataset kind and regenerate.
    pub fn set_dataset(&mut self, kind: DatasetKind) -> Result<()> {
        self.config.dataset = kind;
        self.regenerate()
    }
}

fn draw(config: &ExperimentConfig, generation: u64) -> Result<Vec<Sample>> {
    let mut rng: Box<dyn RngCore> = match config.seed {
        Some(s) => Box::new(StdRng::seed_from_u64(s.wrapping_add(generation))),
        None => Box::new(rand::rng()),
    };
    generate(config.dataset, config.canvas, config.point_count, &mut rng)
}
