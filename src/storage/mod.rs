//! Persistence of assessments behind an injected key/value port.
//!
//! The scoring core never touches storage. Front ends choose a
//! [`StoragePort`] implementation (in memory or a directory of JSON files) and
//! hand it to an [`AssessmentRepository`], which owns key naming, layout and
//! the error taxonomy for lookups.

pub mod codec;
mod file;
mod memory;
mod repository;

pub use codec::{deserialize, serialize, serialize_list, serialize_pretty, CURRENT_VERSION};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use repository::AssessmentRepository;

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Prefix of per-matter keys.
pub const MATTER_KEY_PREFIX: &str = "assessment_";

/// Key holding every assessment in the shared-list layout.
pub const SHARED_LIST_KEY: &str = "savedAssessments";

/// String key/value storage, modelled on browser local storage.
///
/// Implementations must be safe to share between threads, though the
/// repository itself never does so.
pub trait StoragePort: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Returns whether a value was present.
    fn remove(&self, key: &str) -> Result<bool>;

    /// All keys currently stored, in ascending order.
    fn keys(&self) -> Result<Vec<String>>;
}

/// How assessments are laid out over keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageLayout {
    /// One key per matter: `assessment_<matterName>`.
    #[default]
    PerMatter,
    /// A single JSON array under `savedAssessments`.
    SharedList,
}

/// Key under which a matter is stored in the per-matter layout.
pub fn matter_key(matter_name: &str) -> String {
    format!("{}{}", MATTER_KEY_PREFIX, matter_name)
}
