// YearScope - core/dataset.rs
//
// Decoding of one model's result document into validated records.
// Core layer: accepts the JSON text, never touches the network or disk.
//
// Policy for malformed records: a record that is missing an attribute, has
// a value outside its enumeration, or carries a confidence outside [0, 1]
// is skipped and reported. The rest of the document still loads. A
// document that is not a JSON array at all is a load failure.

use crate::core::model::EvaluationRecord;
use crate::util::constants;
use crate::util::error::DatasetError;

/// Result of decoding one dataset document.
#[derive(Debug, Clone, Default)]
pub struct DecodedDataset {
    /// Records that passed validation, in document order.
    pub records: Vec<EvaluationRecord>,

    /// Number of array elements that were skipped.
    pub skipped: usize,

    /// Human-readable reasons for the first `MAX_LOAD_WARNINGS` skips.
    pub warnings: Vec<String>,
}

/// Decode a JSON array of evaluation records for `model_id`.
pub fn decode_dataset(model_id: &str, json: &str) -> Result<DecodedDataset, DatasetError> {
    let raw: Vec<serde_json::Value> =
        serde_json::from_str(json).map_err(|e| DatasetError::Json {
            model_id: model_id.to_string(),
            source: e,
        })?;

    if raw.len() > constants::MAX_RECORDS_PER_DATASET {
        return Err(DatasetError::TooManyRecords {
            model_id: model_id.to_string(),
            count: raw.len(),
            max: constants::MAX_RECORDS_PER_DATASET,
        });
    }

    let mut decoded = DecodedDataset {
        records: Vec::with_capacity(raw.len()),
        ..Default::default()
    };

    for (index, value) in raw.into_iter().enumerate() {
        match serde_json::from_value::<EvaluationRecord>(value) {
            Ok(record) => match validate_record(&record) {
                Ok(()) => decoded.records.push(record),
                Err(reason) => skip(&mut decoded, index, &reason),
            },
            Err(e) => skip(&mut decoded, index, &e.to_string()),
        }
    }

    if decoded.skipped > 0 {
        tracing::warn!(
            model = model_id,
            skipped = decoded.skipped,
            kept = decoded.records.len(),
            "Skipped malformed records"
        );
    }
    tracing::info!(
        model = model_id,
        records = decoded.records.len(),
        "Dataset decoded"
    );

    Ok(decoded)
}

/// Checks serde cannot express.
fn validate_record(record: &EvaluationRecord) -> Result<(), String> {
    let c = record.confidence_score;
    if !c.is_finite() || !(0.0..=1.0).contains(&c) {
        return Err(format!("confidence_score {c} is outside [0, 1]"));
    }
    Ok(())
}

fn skip(decoded: &mut DecodedDataset, index: usize, reason: &str) {
    decoded.skipped += 1;
    if decoded.warnings.len() < constants::MAX_LOAD_WARNINGS {
        decoded.warnings.push(format!("record {index}: {reason}"));
    }
    tracing::debug!(index, reason, "Skipping malformed record");
}
