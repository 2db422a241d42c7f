// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::core::clock::TimeMode;
use crate::core::driver::Route;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "ripple-brush")]
#[command(about = "Pointer-driven ripple brush sketch", long_about = None)]
pub struct Cli {
    /// JSON config file; command-line flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Brush sprite image (generated when omitted)
    #[arg(long, value_name = "FILE")]
    pub brush: Option<PathBuf>,

    /// Base texture distorted by the brushes (generated when omitted)
    #[arg(long, value_name = "FILE")]
    pub texture: Option<PathBuf>,

    /// Number of pre-allocated brush slots
    #[arg(long)]
    pub pool_size: Option<usize>,

    /// How the animation time uniform advances
    #[arg(long, value_enum)]
    pub time_mode: Option<TimeMode>,

    /// Seed for the initial brush rotations
    #[arg(long)]
    pub seed: Option<u64>,

    /// View to open on startup
    #[arg(long, value_enum, default_value_t = Route::Home)]
    pub route: Route,

    /// Log filter, e.g. "debug" or "ripple_brush=trace" (overrides RUST_LOG)
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,
}
