use async_trait::async_trait;
use log::{error, info};
use serde_json::Value;

use crate::modules::error::{SubmissionFailed, SubmitError};

// Anything able to deliver a batch of record JSON objects
#[async_trait]
pub trait Submit: Send + Sync {
    async fn submit(&self, tests: &[Value]) -> Result<(), SubmitError>;
}

// Submit records to KCIDB through the given submitter.
//
// An empty batch is not an error and never reaches the submitter. Every
// other failure is logged and surfaced as SubmissionFailed, with the
// original error kept as its source.
pub async fn submit_kcidb<S>(submitter: &S, tests: &[Value]) -> Result<(), SubmissionFailed>
where
    S: Submit + ?Sized,
{
    if tests.is_empty() {
        info!("Got an empty list of tests, skipping submission");
        return Ok(());
    }

    submitter.submit(tests).await.map_err(|e| {
        error!("Could not submit to KCIDB: {}", e);
        SubmissionFailed::new(e)
    })
}
