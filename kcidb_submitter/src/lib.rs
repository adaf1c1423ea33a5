//! Formats CI test and build results as KCIDB reports and submits them.
//!
//! Records are mapped to KCIDB JSON, wrapped in a versioned report, checked
//! against the KCIDB schema and POSTed with a bearer token. In debug mode the
//! report is only logged.
//!
//! ```no_run
//! use chrono::Utc;
//! use kcidb_submitter::{submit_kcidb, BuildRecord, SubmissionRecord, Submitter};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let submitter = Submitter::from_config("kcidb.toml")?;
//! let records = vec![SubmissionRecord::from(BuildRecord::new(
//!     "b1", true, "riscv64", "gcc-13", Utc::now(),
//! ))];
//! submit_kcidb(&submitter, &SubmissionRecord::to_json_all(&records)).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod modules;

pub use config::{SchemaVersion, Settings};
pub use modules::error::{ConfigError, RecordError, SubmissionFailed, SubmitError};
pub use modules::schema::KcidbSchema;
pub use modules::submission::{submit_kcidb, Submit};
pub use modules::submitter::envelope::Envelope;
pub use modules::submitter::record::{
    parse_start_time, BuildRecord, SubmissionRecord, TestRecord, ORIGIN,
};
pub use modules::submitter::Submitter;
pub use modules::transport::{HttpTransport, Transport};
