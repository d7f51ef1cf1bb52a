use crate::rating::{Axis, CategoryCatalog};
use crate::scoring::ScoringPolicy;
use crate::storage::StorageLayout;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = ".riskmatrix.toml";

/// Root configuration structure, read from `.riskmatrix.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RiskMatrixConfig {
    /// Aggregation, classification and spectrum choices
    #[serde(default)]
    pub scoring: Option<ScoringPolicy>,

    /// Where and how assessments are stored
    #[serde(default)]
    pub storage: Option<StorageConfig>,

    /// Category catalogs
    #[serde(default)]
    pub categories: Option<CategoriesConfig>,

    /// Terminal output
    #[serde(default)]
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Store directory. A leading `~/` expands to the home directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    #[serde(default)]
    pub layout: StorageLayout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoriesConfig {
    #[serde(default = "default_likelihood_categories")]
    pub likelihood: Vec<String>,

    #[serde(default = "default_severity_categories")]
    pub severity: Vec<String>,

    /// Reject categories missing from the catalog instead of warning.
    #[serde(default)]
    pub strict: bool,
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            likelihood: default_likelihood_categories(),
            severity: default_severity_categories(),
            strict: false,
        }
    }
}

fn default_likelihood_categories() -> Vec<String> {
    CategoryCatalog::default().likelihood
}

fn default_severity_categories() -> Vec<String> {
    CategoryCatalog::default().severity
}

impl CategoriesConfig {
    pub fn validate(&self) -> Result<(), String> {
        for axis in Axis::ALL {
            let list = match axis {
                Axis::Likelihood => &self.likelihood,
                Axis::Severity => &self.severity,
            };
            if list.is_empty() {
                return Err(format!("[categories] {} list is empty", axis.label().to_lowercase()));
            }
            if list.iter().any(|c| c.trim().is_empty()) {
                return Err(format!(
                    "[categories] {} list contains a blank entry",
                    axis.label().to_lowercase()
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
        }
    }
}

fn default_color() -> bool {
    true
}

impl RiskMatrixConfig {
    pub fn scoring_policy(&self) -> ScoringPolicy {
        self.scoring.unwrap_or_default()
    }

    pub fn layout(&self) -> StorageLayout {
        self.storage.as_ref().map(|s| s.layout).unwrap_or_default()
    }

    pub fn storage_directory(&self) -> Option<PathBuf> {
        self.storage
            .as_ref()
            .and_then(|s| s.directory.as_deref())
            .map(expand_home)
    }

    pub fn catalog(&self) -> CategoryCatalog {
        match &self.categories {
            Some(categories) => CategoryCatalog {
                likelihood: categories.likelihood.clone(),
                severity: categories.severity.clone(),
            },
            None => CategoryCatalog::default(),
        }
    }

    pub fn strict_categories(&self) -> bool {
        self.categories.as_ref().is_some_and(|c| c.strict)
    }

    /// `Some(false)` when the config turns colour off.
    pub fn color(&self) -> Option<bool> {
        self.display.map(|d| d.color)
    }
}

fn expand_home(path: &std::path::Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
