// Export modules for library usage
pub mod assessment;
pub mod cli;
pub mod config;
pub mod error;
pub mod formatting;
pub mod output;
pub mod rating;
pub mod scoring;
pub mod storage;

// Re-export commonly used types
pub use crate::assessment::{Assessment, ExportRow, RiskFactor};
pub use crate::error::{ErrorCode, Result, RiskMatrixError, ValidationError};
pub use crate::output::{create_writer, markdown_table, AssessmentReport, OutputFormat, OutputWriter};
pub use crate::rating::{Axis, CategoryCatalog, Rating, RatingOption, RatingScale};
pub use crate::scoring::{
    AggregationStrategy, AssessmentScore, ClassificationRule, RiskBand, RiskMatrix, ScoringPolicy,
    SpectrumScale,
};
pub use crate::storage::{
    deserialize, serialize, AssessmentRepository, FileStore, MemoryStore, StorageLayout,
    StoragePort,
};
