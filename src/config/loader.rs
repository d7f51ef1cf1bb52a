use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::{RiskMatrixConfig, CONFIG_FILE_NAME};
use crate::error::{ErrorCode, Result, RiskMatrixError};

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Environment variable naming the store directory.
pub const STORE_DIR_ENV: &str = "RISKMATRIX_STORE_DIR";

/// Fallback store directory when no data directory is known.
const LOCAL_STORE_DIR: &str = ".riskmatrix";

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> std::result::Result<RiskMatrixConfig, String> {
    let config = toml::from_str::<RiskMatrixConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;

    if let Some(categories) = &config.categories {
        categories.validate()?;
    }

    Ok(config)
}

/// Try loading config from a discovered path. Problems are logged, never fatal.
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<RiskMatrixConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{} ({}). Using defaults.", e, config_path.display());
            Some(RiskMatrixConfig::default())
        }
    }
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for the config file; first hit wins.
pub fn load_config_from(start: PathBuf) -> RiskMatrixConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH + 1)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH + 1
            );
            RiskMatrixConfig::default()
        })
}

pub fn load_config() -> RiskMatrixConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            RiskMatrixConfig::default()
        }
    }
}

/// Load an explicitly named config file. Unlike discovery, failure is an error.
pub fn load_config_from_path(path: &Path) -> Result<RiskMatrixConfig> {
    let contents = read_config_file(path).map_err(|e| {
        let code = if e.kind() == std::io::ErrorKind::NotFound {
            ErrorCode::CONFIG_FILE_NOT_FOUND
        } else {
            ErrorCode::CONFIG_GENERIC
        };
        RiskMatrixError::config_with_path(code, e.to_string(), path)
    })?;
    let config = parse_and_validate_config(&contents)
        .map_err(|e| RiskMatrixError::config_with_path(ErrorCode::CONFIG_INVALID, e, path))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Store directory by precedence: flag, environment, config file, the
/// platform data directory, then `./.riskmatrix`.
pub fn resolve_store_dir(cli: Option<PathBuf>, config: &RiskMatrixConfig) -> PathBuf {
    store_dir_from(
        cli,
        std::env::var_os(STORE_DIR_ENV).map(PathBuf::from),
        config,
        dirs::data_dir(),
    )
}

pub(crate) fn store_dir_from(
    cli: Option<PathBuf>,
    env: Option<PathBuf>,
    config: &RiskMatrixConfig,
    data_dir: Option<PathBuf>,
) -> PathBuf {
    cli.or(env.filter(|p| !p.as_os_str().is_empty()))
        .or_else(|| config.storage_directory())
        .or_else(|| data_dir.map(|d| d.join("riskmatrix")))
        .unwrap_or_else(|| PathBuf::from(LOCAL_STORE_DIR))
}

/// Contents written by `riskmatrix init`.
pub fn default_config_toml() -> &'static str {
    r#"# riskmatrix configuration

[scoring]
# "mean-biased-toward-max" or "range-sensitive-blend"
aggregation = "mean-biased-toward-max"
# "inclusive" or "half-open"
classification = "inclusive"
# "linear" or "calibrated"
spectrum = "linear"

[storage]
# directory = "~/.local/share/riskmatrix"
# "per-matter" or "shared-list"
layout = "per-matter"

[categories]
likelihood = [
    "Legal Requirements",
    "Prior Commitment",
    "3rd Party Rights",
    "Defensibility",
    "Regulatory Interest",
    "Regulatory Engagement",
    "Enforcement History",
    "Discoverability",
    "Market Practices",
]
severity = [
    "Financial",
    "Consumer Protection",
    "Reputational",
    "Operational",
    "Compliance",
    "Legal Exposure",
]
strict = false

[display]
color = true
"#
}
