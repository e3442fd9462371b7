mod graph_parse;
mod sim;

use std::fs;
use std::path::PathBuf;
use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use simplelog::*;
use dvroute::util::format_metric;
use crate::graph_parse::LinkChange;
use crate::sim::{Outcome, Simulation};

/// Simulates distance-vector routing over a weighted graph, with random delivery delays
#[derive(Parser)]
#[command(version)]
struct Args {
    /// graph file, one `a b cost` link per line
    graph: PathBuf,
    /// seed for the delivery delays
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// each advertisement takes between 1 and this many time units to arrive
    #[arg(long, default_value_t = 5)]
    max_delay: u64,
    /// change a link at a given time, `time:a:b:cost`, cost may be `inf`
    #[arg(long = "change")]
    changes: Vec<LinkChange>,
    /// give up after this many events
    #[arg(long, default_value_t = 1_000_000)]
    max_events: usize,
    /// print the final state as JSON instead of table dumps
    #[arg(long)]
    json: bool,
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    TermLogger::init(args.log_level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?;

    let input = fs::read_to_string(&args.graph)
        .with_context(|| format!("Failed to read graph {}", args.graph.display()))?;
    let graph = graph_parse::parse(&input)
        .with_context(|| format!("Failed to parse graph {}", args.graph.display()))?;
    info!("Loaded {} nodes and {} links", graph.node_count, graph.links.len());

    let mut sim = Simulation::new(&graph, args.seed, args.max_delay)?;
    for change in args.changes {
        sim.schedule_change(change)?;
    }

    match sim.run(args.max_events)? {
        Outcome::Quiescent { events, time } => {
            info!("Converged after {events} events at time {time}, {} advertisements delivered", sim.delivered);
        }
        Outcome::Truncated { events, time } => {
            warn!("Stopped after {events} events at time {time}, the network may be counting to infinity");
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&sim.report())?);
        return Ok(());
    }
    for router in &sim.routers {
        println!("{}", router.dump_table());
        let hops: Vec<String> = router
            .table
            .predecessors
            .iter()
            .enumerate()
            .filter(|(dest, _)| *dest != router.address)
            .map(|(dest, hop)| match hop {
                Some(hop) => format!("{dest} via {hop} ({})", format_metric(router.distance_vector()[dest])),
                None => format!("{dest} unreachable"),
            })
            .collect();
        println!("next hops: {}\n", hops.join(", "));
    }
    Ok(())
}
