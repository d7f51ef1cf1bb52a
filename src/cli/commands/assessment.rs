use super::super::args::{ExportFormat, ScoringArgs, ShowFormat};
use super::super::setup::AppContext;
use crate::assessment::{check_categories, Assessment, RiskFactor};
use crate::error::{RiskMatrixError, ValidationError};
use crate::formatting::FormattingConfig;
use crate::output::{self, AssessmentReport, OutputFormat};
use crate::rating::{Axis, RatingScale};
use crate::storage::{codec, AssessmentRepository, StoragePort};
use anyhow::Result;
use std::path::{Path, PathBuf};

pub struct AddFactor {
    pub matter: String,
    pub axis: Axis,
    pub categories: Vec<String>,
    pub rating: String,
    pub explanation: String,
}

pub fn handle_add(ctx: &AppContext, request: AddFactor) -> Result<()> {
    let repository = ctx.repository()?;
    let assessment = add_factor(ctx, &repository, request)?;
    println!(
        "Saved '{}' ({} likelihood, {} severity factors)",
        assessment.matter_name(),
        assessment.factors(Axis::Likelihood).len(),
        assessment.factors(Axis::Severity).len()
    );
    Ok(())
}

/// Load or create the matter, append one validated factor and save.
pub(crate) fn add_factor<S: StoragePort>(
    ctx: &AppContext,
    repository: &AssessmentRepository<S>,
    request: AddFactor,
) -> Result<Assessment> {
    let fresh = Assessment::new(&request.matter)?;
    let mut assessment = match repository.load(fresh.matter_name()) {
        Ok(existing) => existing,
        Err(RiskMatrixError::NotFound { .. }) => fresh,
        Err(e) => return Err(e.into()),
    };

    let rating = RatingScale::for_factor(request.axis, &request.categories)
        .parse(&request.rating)
        .map_err(RiskMatrixError::from)?;
    let factor = RiskFactor::new(&request.categories, request.explanation, rating)?;
    check_categories(
        &ctx.config.catalog(),
        request.axis,
        &factor,
        ctx.config.strict_categories(),
    )?;

    assessment.add_factor(request.axis, factor);
    repository.save(&assessment)?;
    Ok(assessment)
}

pub fn handle_show(
    ctx: &AppContext,
    matter: &str,
    format: ShowFormat,
    output_file: Option<PathBuf>,
    scoring: ScoringArgs,
) -> Result<()> {
    let assessment = ctx.repository()?.load(matter)?;
    let report = AssessmentReport::new(&assessment, ctx.policy(scoring));
    let formatting = if output_file.is_some() {
        FormattingConfig::plain()
    } else {
        ctx.formatting
    };
    let content = output::render(format.into(), &report, formatting)?;
    output::write_output(&content, output_file.as_deref())?;
    Ok(())
}

pub fn handle_export(
    ctx: &AppContext,
    matter: &str,
    format: ExportFormat,
    output_file: Option<PathBuf>,
    copy: bool,
    scoring: ScoringArgs,
) -> Result<()> {
    let assessment = ctx.repository()?.load(matter)?;
    let report = AssessmentReport::new(&assessment, ctx.policy(scoring));
    let content = export_content(&report, format)?;
    output::write_output(&content, output_file.as_deref())?;

    if copy {
        match output::copy_to_clipboard(&content) {
            Ok(()) => eprintln!("Copied to clipboard"),
            Err(e) => log::warn!("{}", e),
        }
    }
    Ok(())
}

pub(crate) fn export_content(report: &AssessmentReport<'_>, format: ExportFormat) -> Result<String> {
    Ok(match format {
        ExportFormat::Markdown => output::markdown_table(report.assessment),
        ExportFormat::Report => output::render(
            OutputFormat::Markdown,
            report,
            FormattingConfig::plain(),
        )?,
        ExportFormat::Json => codec::serialize_pretty(report.assessment)?,
        ExportFormat::Text => output::plain_text_summary(report),
    })
}

pub fn handle_list(ctx: &AppContext) -> Result<()> {
    let names = ctx.repository()?.list()?;
    if names.is_empty() {
        println!("No saved assessments in {}", ctx.store_dir.display());
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

pub fn handle_delete(ctx: &AppContext, matter: &str) -> Result<()> {
    ctx.repository()?.delete(matter)?;
    println!("Deleted '{}'", matter.trim());
    Ok(())
}

pub fn handle_import(ctx: &AppContext, file: &Path, force: bool) -> Result<()> {
    let repository = ctx.repository()?;
    for name in import_file(ctx, &repository, file, force)? {
        println!("Imported '{}'", name);
    }
    Ok(())
}

/// Import one record, or a saved-assessments array, from `file`.
pub(crate) fn import_file<S: StoragePort>(
    ctx: &AppContext,
    repository: &AssessmentRepository<S>,
    file: &Path,
    force: bool,
) -> Result<Vec<String>> {
    let json = std::fs::read_to_string(file)
        .map_err(|e| RiskMatrixError::from_io_error(e, Some(file.to_path_buf())))?;
    let key = file.display().to_string();
    let assessments = if json.trim_start().starts_with('[') {
        codec::decode_list(&key, &json)?
    } else {
        vec![codec::decode(&key, &json)?]
    };

    let catalog = ctx.config.catalog();
    for assessment in &assessments {
        if !force && repository.exists(assessment.matter_name())? {
            return Err(RiskMatrixError::validation(ValidationError::MatterExists(
                assessment.matter_name().to_string(),
            ))
            .into());
        }
        for axis in Axis::ALL {
            for factor in assessment.factors(axis) {
                check_categories(&catalog, axis, factor, ctx.config.strict_categories())?;
            }
        }
    }

    let mut imported = Vec::with_capacity(assessments.len());
    for assessment in assessments {
        repository.save(&assessment)?;
        imported.push(assessment.matter_name().to_string());
    }
    Ok(imported)
}
