use jsonschema::{Draft, Validator};
use serde_json::Value;

use crate::modules::error::SubmitError;

// Subset of the KCIDB I/O schema covering what this crate submits
const KCIDB_SCHEMA: &str = include_str!("../../schema/kcidb.v4.json");

// Compiled KCIDB schema, built once and shared by every submission
pub struct KcidbSchema {
    validator: Validator,
}

impl KcidbSchema {
    pub fn new() -> Result<Self, SubmitError> {
        let schema: Value = serde_json::from_str(KCIDB_SCHEMA)?;
        Self::from_value(&schema)
    }

    pub fn from_value(schema: &Value) -> Result<Self, SubmitError> {
        let validator = jsonschema::options()
            .with_draft(Draft::Draft7)
            .should_validate_formats(true)
            .build(schema)
            .map_err(|e| SubmitError::Schema(e.to_string()))?;
        Ok(Self { validator })
    }

    // Check a report against the schema, reporting every violation at once
    pub fn validate(&self, report: &Value) -> Result<(), SubmitError> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(report)
            .map(|e| format!("{} at {}", e, e.instance_path))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SubmitError::Validation(errors.join("; ")))
        }
    }
}

impl std::fmt::Debug for KcidbSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KcidbSchema").finish_non_exhaustive()
    }
}
