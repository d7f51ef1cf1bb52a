use super::{AssessmentReport, OutputWriter};
use crate::error::{Result, RiskMatrixError};
use crate::storage::codec;
use std::io::Write;

/// Writes the persistence record, pretty-printed, with the derived score
/// added under `"score"`. The result can be fed back through `import`.
pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &AssessmentReport<'_>) -> Result<()> {
        let mut value = codec::to_value(report.assessment)?;
        if let Some(object) = value.as_object_mut() {
            object.insert("score".to_string(), to_json_value(&report.score)?);
        }
        let json = serde_json::to_string_pretty(&value).map_err(encoding_error)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

fn to_json_value<T: serde::Serialize>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(encoding_error)
}

fn encoding_error(e: serde_json::Error) -> RiskMatrixError {
    RiskMatrixError::from_io_error(std::io::Error::other(e), None)
}

/// Pretty JSON for any serialisable value, newline terminated.
pub fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value).map_err(encoding_error)?;
    json.push('\n');
    Ok(json)
}
