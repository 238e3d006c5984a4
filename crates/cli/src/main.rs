//! wikigraph command-line front end.
//!
//! ```text
//! wikigraph build [--config FILE] [--seed TITLE]... [--limit N] [--out FILE]
//! wikigraph links TITLE [--limit N]
//! wikigraph stats FILE [--top N]
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wikigraph_core::{BuildConfig, EndpointPolicy, GraphPayload};
use wikigraph_engine::{AdjacencyIndex, BuildSession};
use wikigraph_fetch::HttpLinkApi;

const DEFAULT_OUTPUT: &str = "graph-data.json";

#[derive(Parser)]
#[command(name = "wikigraph", version, about = "Build link graphs from wiki topic pages")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// TOML config file
    #[arg(long, short, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch seed pages, assemble the graph and write it as JSON
    Build {
        /// Seed title; repeat to override the configured seeds
        #[arg(long = "seed", value_name = "TITLE")]
        seeds: Vec<String>,
        /// Maximum links kept per seed
        #[arg(long)]
        limit: Option<usize>,
        /// Number of seeds fetched in parallel
        #[arg(long)]
        concurrency: Option<usize>,
        /// Discard edges whose source is not already a node
        #[arg(long)]
        drop_unknown: bool,
        /// Output path
        #[arg(long, short, default_value = DEFAULT_OUTPUT)]
        out: PathBuf,
    },
    /// Print the outbound links of one page
    Links {
        title: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Summarize a previously written graph file
    Stats {
        #[arg(default_value = DEFAULT_OUTPUT)]
        file: PathBuf,
        /// How many of the most linked nodes to list
        #[arg(long, default_value = "10")]
        top: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Build {
            seeds,
            limit,
            concurrency,
            drop_unknown,
            out,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if !seeds.is_empty() {
                config = config.seeds(seeds);
            }
            if let Some(limit) = limit {
                config = config.links_per_seed(limit);
            }
            if let Some(workers) = concurrency {
                config = config.concurrency(workers);
            }
            if drop_unknown {
                config = config.endpoint_policy(EndpointPolicy::DropUnknown);
            }
            run_build(config, &out)
        }
        Commands::Links { title, limit } => {
            let config = load_config(cli.config.as_deref())?;
            let limit = limit.unwrap_or(config.links_per_seed);
            let api = HttpLinkApi::from_config(&config);
            let session = BuildSession::new(config, api)?;
            let links = session
                .links_for(&title, limit)
                .with_context(|| format!("fetching links of '{}'", title))?;
            for link in &links {
                println!("{}", link);
            }
            Ok(())
        }
        Commands::Stats { file, top } => print_stats(&file, top),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "wikigraph=debug" } else { "wikigraph=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<BuildConfig> {
    match path {
        Some(path) => BuildConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(BuildConfig::default()),
    }
}

fn run_build(config: BuildConfig, out: &Path) -> Result<()> {
    let api = HttpLinkApi::from_config(&config);
    info!(target: "wikigraph::build", endpoint = %api.endpoint(), "Using endpoint");
    let report = BuildSession::new(config, api)?.run()?;

    report.payload.write_json(out)?;
    println!(
        "Wrote {} ({} nodes, {} edges, {} primary) in {:.1}s",
        out.display(),
        report.stats.node_count,
        report.stats.link_count,
        report.stats.primary_nodes,
        report.elapsed.as_secs_f64()
    );
    if !report.failures.is_empty() {
        println!("{} seed(s) degraded to no links:", report.failures.len());
        for failure in &report.failures {
            println!("  {}", failure);
        }
    }
    Ok(())
}

fn print_stats(file: &Path, top: usize) -> Result<()> {
    let payload = GraphPayload::read_json(file)?;
    let stats = payload.stats();
    println!("{}", serde_json::to_string_pretty(&stats)?);

    let index = AdjacencyIndex::from_payload(&payload);
    println!("Most linked:");
    for (id, in_degree) in index.most_linked(top) {
        println!("  {:>5}  {}", in_degree, id);
    }
    let isolated = index.isolated();
    if !isolated.is_empty() {
        println!("Isolated: {}", isolated.len());
        for id in isolated {
            println!("  {}", id);
        }
    }
    Ok(())
}
