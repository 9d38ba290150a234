// YearScope - core/export.rs
//
// CSV and JSON export of filtered evaluation records, and the download
// descriptor handed to the host.
// Core layer: writes to any Write trait object.

use crate::core::model::EvaluationRecord;
use crate::util::constants;
use crate::util::error::ExportError;
use serde::Serialize;
use std::borrow::Borrow;
use std::io::Write;

/// Column headers of the CSV export, in order.
pub const CSV_HEADERS: [&str; 8] = [
    "Model",
    "Event Text",
    "Ground Truth Year",
    "Model Response",
    "Is Correct",
    "Confidence",
    "Category",
    "Region",
];

/// Export encoding chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => constants::CSV_MIME_TYPE,
            Self::Json => constants::JSON_MIME_TYPE,
        }
    }

    /// `<stem>.<extension>`.
    pub fn file_name(&self, stem: &str) -> String {
        format!("{stem}.{}", self.extension())
    }
}

/// What the download collaborator needs to save an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub file_name: String,
    pub mime_type: &'static str,
    pub content: String,
}

fn check_size(count: usize) -> Result<(), ExportError> {
    if count > constants::MAX_EXPORT_RECORDS {
        return Err(ExportError::TooManyRecords {
            count,
            max: constants::MAX_EXPORT_RECORDS,
        });
    }
    Ok(())
}

/// Export records to CSV.
///
/// Every field is quoted. Embedded double quotes are doubled, so the output
/// parses back into the same fields.
pub fn export_csv<R, W>(records: &[R], writer: W) -> Result<usize, ExportError>
where
    R: Borrow<EvaluationRecord>,
    W: Write,
{
    check_size(records.len())?;

    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .double_quote(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer
        .write_record(CSV_HEADERS)
        .map_err(|e| ExportError::Csv { source: e })?;

    let mut count = 0;
    for record in records {
        let record = record.borrow();
        let year = record.event.year.to_string();
        let confidence = record.confidence_score.to_string();
        csv_writer
            .write_record([
                record.model_name.as_str(),
                record.event.text.as_str(),
                year.as_str(),
                record.model_response.as_str(),
                if record.is_correct { "true" } else { "false" },
                confidence.as_str(),
                record.event.primary_category.label(),
                record.event.continental.label(),
            ])
            .map_err(|e| ExportError::Csv { source: e })?;
        count += 1;
    }

    csv_writer
        .flush()
        .map_err(|e| ExportError::Io { source: e })?;

    tracing::debug!(records = count, "CSV export written");
    Ok(count)
}

/// Export records as a pretty-printed JSON array of the original records.
pub fn export_json<R, W>(records: &[R], writer: W) -> Result<usize, ExportError>
where
    R: Borrow<EvaluationRecord> + Serialize,
    W: Write,
{
    check_size(records.len())?;
    serde_json::to_writer_pretty(writer, records).map_err(|e| ExportError::Json { source: e })?;
    tracing::debug!(records = records.len(), "JSON export written");
    Ok(records.len())
}

pub fn to_csv<R: Borrow<EvaluationRecord>>(records: &[R]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    export_csv(records, &mut buf)?;
    String::from_utf8(buf).map_err(|e| ExportError::Encoding { source: e })
}

pub fn to_json<R>(records: &[R]) -> Result<String, ExportError>
where
    R: Borrow<EvaluationRecord> + Serialize,
{
    let mut buf = Vec::new();
    export_json(records, &mut buf)?;
    String::from_utf8(buf).map_err(|e| ExportError::Encoding { source: e })
}

/// Encode records in `format` and wrap them in a download descriptor.
pub fn encode<R>(records: &[R], format: ExportFormat, stem: &str) -> Result<ExportPayload, ExportError>
where
    R: Borrow<EvaluationRecord> + Serialize,
{
    let content = match format {
        ExportFormat::Csv => to_csv(records)?,
        ExportFormat::Json => to_json(records)?,
    };
    let file_name = format.file_name(stem);
    tracing::info!(file = %file_name, records = records.len(), "Export prepared");
    Ok(ExportPayload {
        file_name,
        mime_type: format.mime_type(),
        content,
    })
}
