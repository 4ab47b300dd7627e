// Demonstration: train a handful of agents on a small grid and print ASCII
// frames of every n-th episode.
//
// Run from the repo root:
//   cargo run --example ascii_run -- --episodes 40 --every 20 --seed 7

use std::env;
use std::io;

use marlgrid::render::AsciiRenderer;
use marlgrid::report::{TrainingReport, DEFAULT_WINDOW};
use marlgrid::training::MemorySink;
use marlgrid::{SimConfig, Trainer};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let episodes: usize = arg_value(&args, "--episodes")
        .and_then(|s| s.parse().ok())
        .unwrap_or(40);
    let every: usize = arg_value(&args, "--every")
        .and_then(|s| s.parse().ok())
        .unwrap_or(20);
    let seed: u64 = arg_value(&args, "--seed")
        .and_then(|s| s.parse().ok())
        .unwrap_or(7);

    let mut config = SimConfig::default();
    config.grid.size = 8;
    config.grid.agents = 3;
    config.grid.obstacles = 6;
    config.exploration.decay = 0.95;
    config.episodes = episodes;
    config.seed = seed;

    let mut trainer = Trainer::new(config)?;
    trainer.add_observer(Box::new(AsciiRenderer::new(io::stdout(), every)));

    let mut sink = MemorySink::new();
    let summary = trainer.run(&mut sink)?;
    println!("{summary}");
    println!("{}", TrainingReport::from_records(&sink.records, DEFAULT_WINDOW));
    Ok(())
}

fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
