pub mod error;
pub mod schema;
pub mod submission;
pub mod submitter;
pub mod transport;
