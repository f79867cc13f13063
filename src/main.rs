//! gesture-replay: drive the gesture engine from a scripted scenario

use std::io::Write;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use gesture_zoom::cli::{CliArgs, OutputFormat};
use gesture_zoom::config::EngineConfig;
use gesture_zoom::scenario::Scenario;

fn main() -> Result<()> {
    gesture_zoom::tracing::init();

    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load_from(path).map_err(|e| anyhow!(e))?,
        None => EngineConfig::load(),
    };
    let scenario = Scenario::load(&args.scenario).map_err(|e| anyhow!(e))?;
    let lines = scenario
        .replay(config, args.frame_ms)
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("Failed to replay {}", args.scenario.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.output_format() {
        OutputFormat::Text => {
            if !scenario.name.is_empty() {
                writeln!(out, "# {}", scenario.name)?;
            }
            for line in &lines {
                writeln!(out, "{}", line)?;
            }
        }
        OutputFormat::JsonLines => {
            for line in &lines {
                serde_json::to_writer(&mut out, line)?;
                writeln!(out)?;
            }
        }
    }

    Ok(())
}
