//! Setup and initialization functions for the CLI
//!
//! Logging, configuration discovery and the store are prepared here so that
//! command handlers receive a ready [`AppContext`].

use super::args::{Cli, ScoringArgs};
use crate::config::{self, RiskMatrixConfig};
use crate::error::Result;
use crate::formatting::FormattingConfig;
use crate::scoring::ScoringPolicy;
use crate::storage::{AssessmentRepository, FileStore, StorageLayout};
use std::path::PathBuf;

/// Filter used when `RUST_LOG` is unset.
pub fn log_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialise `env_logger`. `RUST_LOG` takes precedence over `-v`.
pub fn init_logging(verbosity: u8) {
    let env = env_logger::Env::default().default_filter_or(log_level(verbosity));
    if let Err(e) = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init()
    {
        eprintln!("Note: logger already initialised: {}", e);
    }
}

/// Everything a command needs, resolved once from flags and config.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: RiskMatrixConfig,
    pub formatting: FormattingConfig,
    pub store_dir: PathBuf,
    pub layout: StorageLayout,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => config::load_config_from_path(path)?,
            None => config::load_config(),
        };
        let formatting = FormattingConfig::resolve(cli.plain, config.color());
        formatting.apply();

        let store_dir = config::resolve_store_dir(cli.store.clone(), &config);
        let layout = cli.layout.map(Into::into).unwrap_or_else(|| config.layout());
        log::debug!(
            "store directory {} ({:?} layout)",
            store_dir.display(),
            layout
        );

        Ok(Self {
            config,
            formatting,
            store_dir,
            layout,
        })
    }

    /// The configured policy with any per-command overrides applied.
    pub fn policy(&self, overrides: ScoringArgs) -> ScoringPolicy {
        let mut policy = self.config.scoring_policy();
        if let Some(aggregation) = overrides.aggregation {
            policy.aggregation = aggregation.into();
        }
        if let Some(rule) = overrides.rule {
            policy.classification = rule.into();
        }
        if let Some(spectrum) = overrides.spectrum {
            policy.spectrum = spectrum.into();
        }
        policy
    }

    pub fn repository(&self) -> Result<AssessmentRepository<FileStore>> {
        Ok(AssessmentRepository::new(
            FileStore::open(&self.store_dir)?,
            self.layout,
        ))
    }
}
