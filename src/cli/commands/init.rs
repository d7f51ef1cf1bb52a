use crate::config::{default_config_toml, CONFIG_FILE_NAME};
use crate::error::RiskMatrixError;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    write_default_config(&config_path, force)?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);
    Ok(())
}

pub(crate) fn write_default_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    std::fs::write(config_path, default_config_toml())
        .map_err(|e| RiskMatrixError::from_io_error(e, Some(config_path.to_path_buf())))?;
    log::info!("wrote default configuration to {}", config_path.display());
    Ok(())
}
