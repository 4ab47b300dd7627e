use anyhow::{Context, Result};
use marlgrid::report::{self, TrainingReport, DEFAULT_WINDOW};
use marlgrid::training::{CsvLogSink, MemorySink};
use marlgrid::{SimConfig, Trainer};

const LOG_FILE: &str = "logs/training_log_multi.txt";

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = SimConfig::default();
    let mut trainer = Trainer::new(config).context("failed to set up training")?;

    let records = match CsvLogSink::create(LOG_FILE) {
        Ok(mut sink) => {
            let summary = trainer.run(&mut sink)?;
            println!("{summary}");
            drop(sink);
            report::read_log_file(LOG_FILE)
                .with_context(|| format!("failed to read back {LOG_FILE}"))?
        }
        Err(e) => {
            tracing::warn!("Cannot open {LOG_FILE} ({e}); keeping metrics in memory");
            let mut sink = MemorySink::new();
            let summary = trainer.run(&mut sink)?;
            println!("{summary}");
            sink.records
        }
    };

    tracing::info!("Learning completed, building report from {} records", records.len());
    println!("{}", TrainingReport::from_records(&records, DEFAULT_WINDOW));
    Ok(())
}
