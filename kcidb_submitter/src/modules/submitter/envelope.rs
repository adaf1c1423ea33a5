use serde::Serialize;
use serde_json::Value;

use crate::config::SchemaVersion;
use crate::modules::error::SubmitError;

// Versioned report wrapping the records of one submit call.
// Only lives for the duration of that call.
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    // Record JSON objects, in the order they were given
    pub tests: &'a [Value],
    // Schema version the report claims to follow
    pub version: SchemaVersion,
}

impl<'a> Envelope<'a> {
    pub fn new(tests: &'a [Value], version: SchemaVersion) -> Self {
        Self { tests, version }
    }

    pub fn to_value(&self) -> Result<Value, SubmitError> {
        Ok(serde_json::to_value(self)?)
    }
}
