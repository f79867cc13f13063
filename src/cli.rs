//! Command-line argument parsing for the replay tool

use clap::Parser;
use std::path::PathBuf;

/// Replay a scripted touch scenario through the gesture engine
#[derive(Parser, Debug)]
#[command(
    name = "gesture-replay",
    version,
    about = "Replay a touch scenario through the zoom/pan gesture engine"
)]
pub struct CliArgs {
    /// Scenario file (YAML, or JSON with a .json extension)
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,

    /// Engine config file (defaults to the user config)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Sampling interval in milliseconds
    #[arg(long, value_name = "N", default_value_t = 16.0)]
    pub frame_ms: f64,

    /// Print JSON lines instead of text
    #[arg(long)]
    pub json: bool,
}

/// Output format for replay lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    JsonLines,
}

impl CliArgs {
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::JsonLines
        } else {
            OutputFormat::Text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["gesture-replay", "pinch.yaml"]).unwrap();
        assert_eq!(args.scenario, PathBuf::from("pinch.yaml"));
        assert_eq!(args.config, None);
        assert_eq!(args.frame_ms, 16.0);
        assert_eq!(args.output_format(), OutputFormat::Text);
    }

    #[test]
    fn test_all_flags() {
        let args = CliArgs::try_parse_from([
            "gesture-replay",
            "tap.json",
            "--config",
            "engine.yaml",
            "--frame-ms",
            "8",
            "--json",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("engine.yaml")));
        assert_eq!(args.frame_ms, 8.0);
        assert_eq!(args.output_format(), OutputFormat::JsonLines);
    }

    #[test]
    fn test_scenario_is_required() {
        assert!(CliArgs::try_parse_from(["gesture-replay"]).is_err());
    }
}
