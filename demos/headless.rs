//! Run both engines side by side without a UI, printing status per tick.
//!
//! ```text
//! cargo run --example headless -- --dataset moons --eps 25 --speed 60
//! RUST_LOG=tickcluster=debug cargo run --example headless
//! ```

use clap::Parser;
use tickcluster::{AlgoConfig, DatasetKind, Driver, ExperimentConfig, Speed};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "headless")]
#[command(about = "Step DBSCAN and K-means side by side")]
struct Args {
    /// Dataset shape (smiley, moons, blobs, circles, random)
    #[arg(long, default_value = "smiley")]
    dataset: DatasetKind,

    /// Number of points to generate
    #[arg(long, default_value_t = 500)]
    points: usize,

    /// DBSCAN neighbourhood radius
    #[arg(long, default_value_t = 32.0)]
    eps: f64,

    /// DBSCAN minimum neighbourhood size
    #[arg(long, default_value_t = 4)]
    min_pts: usize,

    /// K-means cluster count
    #[arg(short, long, default_value_t = 3)]
    k: usize,

    /// Speed factor (1-100)
    #[arg(long, default_value_t = 30)]
    speed: u32,

    /// Seed for dataset and centroid initialization
    #[arg(long)]
    seed: Option<u64>,

    /// Print a status line every N ticks
    #[arg(long, default_value_t = 10)]
    every: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = ExperimentConfig {
        algo: AlgoConfig {
            eps: args.eps,
            min_pts: args.min_pts,
            k: args.k,
        }
        .clamped(),
        speed: Speed::new(args.speed),
        dataset: args.dataset,
        point_count: args.points,
        seed: args.seed,
        ..ExperimentConfig::default()
    };

    let mut driver = Driver::new(config)?;
    println!(
        "{} points ({}), eps={} min_pts={} k={}",
        driver.dataset().len(),
        driver.config().dataset,
        driver.config().algo.eps,
        driver.config().algo.min_pts,
        driver.config().algo.k,
    );

    let mut ticks = 0usize;
    loop {
        let report = driver.tick();
        ticks += 1;
        if report.finished || ticks % args.every.max(1) == 0 {
            println!(
                "tick {:>5}  {:>5.1}%  dbscan: {:<24} kmeans: {}",
                ticks,
                driver.progress(),
                driver.dbscan_view().state().message,
                driver.kmeans_view().state().message,
            );
        }
        if report.finished {
            break;
        }
    }

    let dbscan = driver.dbscan_view();
    println!(
        "dbscan: {} clusters, {} noise points",
        dbscan.cluster_count(),
        dbscan.noise_count()
    );
    for c in driver.kmeans_view().centroids() {
        println!("centroid {} {} at ({:.1}, {:.1})", c.id, c.color.hex(), c.x, c.y);
    }
    Ok(())
}
