use crate::output::OutputFormat;
use crate::rating::Axis;
use crate::scoring::{AggregationStrategy, ClassificationRule, SpectrumScale};
use crate::storage::StorageLayout;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "riskmatrix")]
#[command(about = "Likelihood/severity risk assessment calculator", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding saved assessments
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Configuration file (defaults to the nearest .riskmatrix.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// How assessments are laid out in the store
    #[arg(long, global = true, value_enum)]
    pub layout: Option<LayoutArg>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Disable colours and table styling
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default .riskmatrix.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Add a rated factor to a matter, creating the matter if needed
    Add {
        /// Matter name
        matter: String,

        /// Axis the factor belongs to (impact is accepted for severity)
        #[arg(long, value_parser = parse_axis)]
        axis: Axis,

        /// Categories, comma separated
        #[arg(long = "category", value_delimiter = ',', required = true)]
        categories: Vec<String>,

        /// Rating as a number 1-5 or a label such as "Likely"
        #[arg(long)]
        rating: String,

        /// Why the rating was chosen
        #[arg(long)]
        explanation: String,
    },

    /// Show a saved assessment with its score and matrix
    Show {
        matter: String,

        #[arg(short, long, value_enum, default_value = "terminal")]
        format: ShowFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        scoring: ScoringArgs,
    },

    /// Export a saved assessment
    Export {
        matter: String,

        #[arg(short, long, value_enum, default_value = "markdown")]
        format: ExportFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also copy the export to the clipboard
        #[arg(long)]
        copy: bool,

        #[command(flatten)]
        scoring: ScoringArgs,
    },

    /// Score ad-hoc ratings without saving anything
    Score {
        /// Likelihood ratings, comma separated
        #[arg(long, value_delimiter = ',')]
        likelihood: Vec<i64>,

        /// Severity ratings, comma separated
        #[arg(long, visible_alias = "impact", value_delimiter = ',')]
        severity: Vec<i64>,

        #[arg(short, long, value_enum, default_value = "terminal")]
        format: ScoreFormat,

        #[command(flatten)]
        scoring: ScoringArgs,
    },

    /// Print the 5x5 reference matrix
    Matrix {
        #[arg(long, value_enum)]
        rule: Option<RuleArg>,
    },

    /// List saved matters
    List,

    /// Delete a saved matter
    Delete { matter: String },

    /// Import an assessment from a JSON file (current or legacy format)
    Import {
        file: PathBuf,

        /// Replace an existing matter with the same name
        #[arg(long)]
        force: bool,
    },

    /// Print rating labels and category catalogs
    Ratings,
}

/// Per-invocation overrides of the configured scoring policy.
#[derive(clap::Args, Debug, Clone, Copy, Default)]
pub struct ScoringArgs {
    #[arg(long, value_enum)]
    pub aggregation: Option<AggregationArg>,

    #[arg(long, value_enum)]
    pub rule: Option<RuleArg>,

    #[arg(long, value_enum)]
    pub spectrum: Option<SpectrumArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AggregationArg {
    /// Mean pulled a quarter of the way toward the worst rating
    MeanBiasedTowardMax,
    /// Weighted toward the low end when ratings are widely spread
    RangeSensitiveBlend,
}

impl From<AggregationArg> for AggregationStrategy {
    fn from(arg: AggregationArg) -> Self {
        match arg {
            AggregationArg::MeanBiasedTowardMax => AggregationStrategy::MeanBiasedTowardMax,
            AggregationArg::RangeSensitiveBlend => AggregationStrategy::RangeSensitiveBlend,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RuleArg {
    /// Upper bounds 4, 8, 12, 16, 20 inclusive
    Inclusive,
    /// Half-open intervals starting at 1, 3, 5, 10, 15, 20
    HalfOpen,
}

impl From<RuleArg> for ClassificationRule {
    fn from(arg: RuleArg) -> Self {
        match arg {
            RuleArg::Inclusive => ClassificationRule::Inclusive,
            RuleArg::HalfOpen => ClassificationRule::HalfOpen,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SpectrumArg {
    Linear,
    Calibrated,
}

impl From<SpectrumArg> for SpectrumScale {
    fn from(arg: SpectrumArg) -> Self {
        match arg {
            SpectrumArg::Linear => SpectrumScale::Linear,
            SpectrumArg::Calibrated => SpectrumScale::Calibrated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    PerMatter,
    SharedList,
}

impl From<LayoutArg> for StorageLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::PerMatter => StorageLayout::PerMatter,
            LayoutArg::SharedList => StorageLayout::SharedList,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShowFormat {
    Terminal,
    Markdown,
    Json,
    Text,
}

impl From<ShowFormat> for OutputFormat {
    fn from(format: ShowFormat) -> Self {
        match format {
            ShowFormat::Terminal => OutputFormat::Terminal,
            ShowFormat::Markdown => OutputFormat::Markdown,
            ShowFormat::Json => OutputFormat::Json,
            ShowFormat::Text => OutputFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// The factor table only
    Markdown,
    /// Full markdown report with summary and matrix
    Report,
    Json,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScoreFormat {
    Terminal,
    Json,
}

fn parse_axis(s: &str) -> Result<Axis, String> {
    s.parse()
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
