//! Link statistics command line front-end
//!
//! Aggregates per-iteration observation files over a fixed network and
//! exports the averages table, or generates a reproducible synthetic
//! scenario to feed the aggregation.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use link_stats::{IterationObservations, LinkSeries, LinkStats, LinkStatsConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use services_common::constants::DEFAULT_MAX_TIME_SECS;
use services_common::{Link, LinkId, Network, NodeId, WeightedCoin};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "link-stats",
    about = "Per-link hourly traffic statistics across simulation iterations",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Aggregate observation files and export the averages table
    Analyze {
        /// Network description (JSON)
        #[arg(long)]
        network: PathBuf,
        /// One observations file per iteration, aggregated in order
        #[arg(long, required = true, num_args = 1..)]
        observations: Vec<PathBuf>,
        /// Destination CSV file
        #[arg(long, default_value = "linkstats.csv")]
        output: PathBuf,
        /// Maximum simulated time in seconds, defines the hourly buckets
        #[arg(long, default_value_t = DEFAULT_MAX_TIME_SECS)]
        max_time_secs: u64,
    },
    /// Generate a demo network and synthetic observation files
    Generate {
        /// Directory to write the generated files into
        #[arg(long, default_value = "demo")]
        out_dir: PathBuf,
        /// Number of links in the generated corridor network
        #[arg(long, default_value_t = 8)]
        links: u64,
        /// Number of iterations to generate
        #[arg(long, default_value_t = 5)]
        iterations: u32,
        /// Probability that a link-hour is congested
        #[arg(long, default_value_t = 0.3)]
        congestion: f64,
        /// Hourly buckets to generate
        #[arg(long, default_value_t = 24)]
        hours: usize,
        /// RNG seed for reproducible output
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Analyze {
            network,
            observations,
            output,
            max_time_secs,
        } => analyze(&network, &observations, &output, max_time_secs),
        Command::Generate {
            out_dir,
            links,
            iterations,
            congestion,
            hours,
            seed,
        } => generate(&out_dir, links, iterations, congestion, hours, seed),
    }
}

fn analyze(
    network_path: &Path,
    observation_paths: &[PathBuf],
    output: &Path,
    max_time_secs: u64,
) -> Result<()> {
    let network = Arc::new(Network::from_json(network_path)?);
    info!(links = network.len(), "loaded network");

    let config = LinkStatsConfig { max_time_secs };
    let stats = LinkStats::new(network, &config)?;
    stats.reset();

    for path in observation_paths {
        let observations = IterationObservations::from_json(path)?;
        let indexed = observations.indexed();
        stats
            .add_data(&indexed, &indexed)
            .with_context(|| format!("aggregating {}", path.display()))?;
    }

    stats.write_csv(output)?;
    info!(
        iterations = observation_paths.len(),
        output = %output.display(),
        "analysis complete"
    );
    Ok(())
}

fn generate(
    out_dir: &Path,
    links: u64,
    iterations: u32,
    congestion: f64,
    hours: usize,
    seed: u64,
) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let coin = WeightedCoin::new(congestion)?;
    let mut rng = StdRng::seed_from_u64(seed);

    let network = corridor_network(links);
    let network_path = out_dir.join("network.json");
    network.to_json(&network_path)?;
    info!(links = network.len(), path = %network_path.display(), "wrote demo network");

    for iteration in 0..iterations {
        let observations = synthesize_iteration(&network, hours, coin, &mut rng);
        let path = out_dir.join(format!("iteration_{iteration:03}.json"));
        observations.to_json(&path)?;
    }
    info!(iterations, hours, "wrote synthetic observations");
    Ok(())
}

/// A one-way corridor: link i runs from node i to node i + 1.
fn corridor_network(links: u64) -> Network {
    let mut network = Network::new();
    for i in 0..links {
        network.insert_link(Link {
            id: LinkId::new(i + 1),
            from: NodeId::new(i + 1),
            to: NodeId::new(i + 2),
            length: 500.0 + 250.0 * i as f64,
            freespeed: 13.9,
            capacity: 1000.0,
        });
    }
    network
}

/// Draw one iteration of volumes and travel times. Congested link-hours get
/// elevated volumes and travel times above free-flow; the rest stay near
/// free-flow with light traffic.
fn synthesize_iteration(
    network: &Network,
    hours: usize,
    coin: WeightedCoin,
    rng: &mut StdRng,
) -> IterationObservations {
    let mut observations = IterationObservations::default();
    for link_id in network.link_ids_sorted() {
        let Some(link) = network.link(link_id) else {
            continue;
        };
        let baseline = link.free_flow_time();
        let mut volumes = Vec::with_capacity(hours);
        let mut times = Vec::with_capacity(hours);
        for _ in 0..hours {
            if coin.flip(rng) {
                volumes.push(rng.gen_range(40.0_f64..90.0).round());
                times.push(baseline * rng.gen_range(1.5..3.0));
            } else {
                volumes.push(rng.gen_range(0.0_f64..15.0).round());
                times.push(baseline);
            }
        }
        observations.volumes.push(LinkSeries {
            link: link_id,
            hourly: volumes,
        });
        observations.travel_times.push(LinkSeries {
            link: link_id,
            hourly: times,
        });
    }
    observations
}
