use async_trait::async_trait;
use log::{info, warn};
use serde_json::Value;
use std::{path::Path, sync::Arc};

use crate::{
    config::{self, SchemaVersion, Settings},
    modules::{
        error::{ConfigError, SubmitError},
        schema::KcidbSchema,
        submission::Submit,
        transport::{HttpTransport, Transport},
    },
};

pub mod envelope;
pub mod record;

use envelope::Envelope;

// How reports leave the process, fixed at construction
#[derive(Debug, Clone)]
enum Delivery {
    // Reports are only logged
    DryRun,
    // Reports are validated and POSTed
    Live {
        url: String,
        token: String,
        strict_status: bool,
    },
}

// Handles
// - Wrapping records into a versioned report
// - Validating the report against the KCIDB schema
// - Sending it to KCIDB, or only logging it in debug mode
//
// Every field is frozen after construction, so one instance can be shared
// between concurrent submissions.
pub struct Submitter {
    // Schema version stamped on every report
    version: SchemaVersion,

    // Dry run or live delivery
    delivery: Delivery,

    // Compiled schema for client-side validation
    schema: KcidbSchema,

    // Sends the report over the network
    transport: Arc<dyn Transport>,
}

impl Submitter {
    pub fn new(
        version: SchemaVersion,
        settings: Settings,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        let delivery = match settings.endpoint()? {
            None => Delivery::DryRun,
            Some((url, token)) => Delivery::Live {
                url: url.to_string(),
                token: token.to_string(),
                strict_status: settings.strict_status,
            },
        };

        Ok(Self {
            version,
            delivery,
            schema: KcidbSchema::new()?,
            transport,
        })
    }

    // Load the version file and environment settings, and deliver over HTTP.
    // Any failure here is fatal for the caller: a submitter without its
    // version can't produce a valid report.
    pub fn from_config(version_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::with_settings(version_path, Settings::from_env()?)
    }

    // Same as from_config, with settings supplied by the caller
    pub fn with_settings(
        version_path: impl AsRef<Path>,
        settings: Settings,
    ) -> Result<Self, ConfigError> {
        let version = config::load_version(version_path)?;
        Self::new(version, settings, Arc::new(HttpTransport::new()))
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    pub fn is_debug(&self) -> bool {
        matches!(self.delivery, Delivery::DryRun)
    }

    pub async fn submit(&self, tests: &[Value]) -> Result<(), SubmitError> {
        let report = Envelope::new(tests, self.version).to_value()?;
        info!("Submitting report: {}", report);

        let (url, token, strict_status) = match &self.delivery {
            Delivery::DryRun => {
                info!("Debug mode, report not sent: {}", report);
                return Ok(());
            }
            Delivery::Live {
                url,
                token,
                strict_status,
            } => (url, token, *strict_status),
        };

        self.schema.validate(&report)?;

        let status = self.transport.post_json(url, token, &report).await?;
        if !(200..300).contains(&status) {
            if strict_status {
                return Err(SubmitError::Status(status));
            }
            warn!("KCIDB responded with status {}, ignoring", status);
        } else {
            info!("Report with {} record(s) sent", tests.len());
        }
        Ok(())
    }
}

#[async_trait]
impl Submit for Submitter {
    async fn submit(&self, tests: &[Value]) -> Result<(), SubmitError> {
        Submitter::submit(self, tests).await
    }
}

impl std::fmt::Debug for Submitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keep the token out of logs
        f.debug_struct("Submitter")
            .field("version", &self.version)
            .field("debug", &self.is_debug())
            .finish_non_exhaustive()
    }
}
