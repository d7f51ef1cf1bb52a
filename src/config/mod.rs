//! `.riskmatrix.toml` configuration.
//!
//! Discovery searches the working directory and its ancestors; a broken
//! discovered file is reported and replaced by defaults. A file named with
//! `--config` must load.

mod core;
mod loader;

pub use self::core::{
    CategoriesConfig, DisplayConfig, RiskMatrixConfig, StorageConfig, CONFIG_FILE_NAME,
};
pub use loader::{
    default_config_toml, directory_ancestors, load_config, load_config_from,
    load_config_from_path, parse_and_validate_config, resolve_store_dir, STORE_DIR_ENV,
};
