use clap::{ArgGroup, Parser, ValueEnum};
use std::path::PathBuf;

/// Drive the pointer from hand landmarks
#[derive(Parser, Debug)]
#[command(name = "hand_pointer")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["replay", "simulate"])))]
pub struct Args {
    /// Config file path (defaults to the per-user config location)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Replay landmark observations from a JSON-lines file
    #[arg(short, long, conflicts_with_all = ["simulate", "camera"])]
    pub replay: Option<PathBuf>,

    /// Generate landmarks from the built-in scripted hand
    #[arg(long)]
    pub simulate: bool,

    /// Capture from this camera, with landmarks still coming from the scripted hand
    /// (needs the `camera` feature)
    #[arg(long, requires = "simulate")]
    pub camera: Option<u32>,

    /// Stop after this many frames
    #[arg(long)]
    pub max_frames: Option<u64>,

    /// Where pointer actions go
    #[arg(short, long, value_enum, default_value_t = OutputMode::Log)]
    pub output: OutputMode,

    /// Write the default config to the config path and exit
    #[arg(long)]
    pub write_default_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Report clicks and scrolls through the log
    Log,
    /// One JSON action per line on stdout
    Json,
}
