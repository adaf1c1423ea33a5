use thiserror::Error;

// Errors raised while loading the version file or the settings.
// These are fatal at construction time and are never turned into
// SubmissionFailed.
#[derive(Debug, Error)]
pub enum ConfigError {
    // Version file could not be read
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    // Version file is not valid TOML or misses the [kcidb] table
    #[error("malformed version file: {0}")]
    Deserialization(#[from] toml::de::Error),
    // A setting required in live mode is absent
    #[error("missing setting {0}")]
    MissingSetting(&'static str),
    // A setting is present but can't be parsed
    #[error("invalid value {value:?} for setting {name}")]
    InvalidSetting { name: &'static str, value: String },
    // The bundled schema does not compile
    #[error(transparent)]
    Schema(#[from] SubmitError),
}

// Errors produced while turning caller input into records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    // Timestamp text without a UTC offset
    #[error("timestamp {0:?} has no UTC offset")]
    NaiveTimestamp(String),
    // Text that is not a timestamp at all
    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),
}

// Everything that can go wrong inside a single submit call.
// Validation messages are kept as strings so the error does not carry
// the lifetime of the validated instance.
#[derive(Debug, Error)]
pub enum SubmitError {
    // Schema itself failed to compile
    #[error("schema error: {0}")]
    Schema(String),
    // Envelope does not conform to the schema
    #[error("validation error: {0}")]
    Validation(String),
    // Envelope could not be serialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    // Request could not be sent or the connection failed
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    // Non-2xx response while strict status checking is enabled
    #[error("KCIDB responded with status {0}")]
    Status(u16),
}

// The single error kind surfaced by submit_kcidb. The underlying
// SubmitError stays reachable through Error::source().
#[derive(Debug, Error)]
#[error("could not submit results to KCIDB")]
pub struct SubmissionFailed {
    #[source]
    source: SubmitError,
}

impl SubmissionFailed {
    pub fn new(source: SubmitError) -> Self {
        Self { source }
    }

    // Borrow the wrapped cause
    pub fn cause(&self) -> &SubmitError {
        &self.source
    }
}
