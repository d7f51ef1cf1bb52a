//! CLI module for riskmatrix
//!
//! - Argument parsing (`args`)
//! - Command handlers (`commands`)
//! - Runtime setup (`setup`)

pub mod args;
pub mod commands;
pub mod setup;

pub use args::{Cli, Commands, ExportFormat, ScoreFormat, ScoringArgs, ShowFormat};
pub use commands::run;
pub use setup::{init_logging, AppContext};

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    args::parse_args()
}
