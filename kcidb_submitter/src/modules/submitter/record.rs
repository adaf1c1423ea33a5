use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::{json, Value};

use crate::modules::error::RecordError;

// Namespace of every identifier this system submits
pub const ORIGIN: &str = "riscv";

// A single unit of data sent to KCIDB
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionRecord {
    Test(TestRecord),
    Build(BuildRecord),
}

impl SubmissionRecord {
    pub fn to_json(&self) -> Value {
        match self {
            SubmissionRecord::Test(test) => test.to_json(),
            SubmissionRecord::Build(build) => build.to_json(),
        }
    }

    // Map a batch of records to the form submit_kcidb expects
    pub fn to_json_all(records: &[SubmissionRecord]) -> Vec<Value> {
        records.iter().map(SubmissionRecord::to_json).collect()
    }
}

impl From<TestRecord> for SubmissionRecord {
    fn from(test: TestRecord) -> Self {
        SubmissionRecord::Test(test)
    }
}

impl From<BuildRecord> for SubmissionRecord {
    fn from(build: BuildRecord) -> Self {
        SubmissionRecord::Build(build)
    }
}

// Result of one test run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRecord {
    // Human readable test name
    test: String,
    // Dotted path of the test inside its suite
    path: String,
    // KCIDB status, e.g. PASS or FAIL
    result: String,
    // Where the run log lives; not part of the KCIDB mapping
    log: String,
    // Identifier unique within this origin
    test_id: String,
    // Build the test ran against, emitted verbatim
    build_id: String,
    // Start of the run, already converted to UTC
    started_at: DateTime<Utc>,
    // Runner that executed the test
    runner: String,
    // Board or machine the test ran on
    platform: String,
}

impl TestRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new<Tz: TimeZone>(
        test: impl Into<String>,
        path: impl Into<String>,
        result: impl Into<String>,
        log: impl Into<String>,
        test_id: impl Into<String>,
        build_id: impl Into<String>,
        started_at: DateTime<Tz>,
        runner: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            test: test.into(),
            path: path.into(),
            result: result.into(),
            log: log.into(),
            test_id: test_id.into(),
            build_id: build_id.into(),
            started_at: started_at.with_timezone(&Utc),
            runner: runner.into(),
            platform: platform.into(),
        }
    }

    pub fn test(&self) -> &str {
        &self.test
    }

    pub fn log(&self) -> &str {
        &self.log
    }

    pub fn to_json(&self) -> Value {
        json!({
            "id": prefixed_id(&self.test_id),
            "build_id": self.build_id,
            "origin": ORIGIN,
            "status": self.result,
            "path": self.path,
            "start_time": format_start_time(&self.started_at),
            "environment": {
                "misc": {
                    "platform": self.platform,
                }
            },
            "misc": {
                "runtime": self.runner,
            }
        })
    }
}

// Result of one kernel build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRecord {
    build_id: String,
    valid: bool,
    arch: String,
    compiler: String,
    start_time: DateTime<Utc>,
}

impl BuildRecord {
    pub fn new<Tz: TimeZone>(
        build_id: impl Into<String>,
        valid: bool,
        arch: impl Into<String>,
        compiler: impl Into<String>,
        start_time: DateTime<Tz>,
    ) -> Self {
        Self {
            build_id: build_id.into(),
            valid,
            arch: arch.into(),
            compiler: compiler.into(),
            start_time: start_time.with_timezone(&Utc),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "id": prefixed_id(&self.build_id),
            "valid": self.valid,
            "origin": ORIGIN,
            "architecture": self.arch,
            "compiler": self.compiler,
            "start_time": format_start_time(&self.start_time),
        })
    }
}

fn prefixed_id(id: &str) -> String {
    format!("{ORIGIN}:{id}")
}

// UTC, whole seconds, explicit +00:00 offset
fn format_start_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, false)
}

// Parse an RFC 3339 start time. Text without an offset is refused instead
// of guessing which zone it was recorded in.
pub fn parse_start_time(text: &str) -> Result<DateTime<Utc>, RecordError> {
    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Ok(time.with_timezone(&Utc));
    }

    let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .any(|format| NaiveDateTime::parse_from_str(text, format).is_ok());
    if naive {
        Err(RecordError::NaiveTimestamp(text.to_string()))
    } else {
        Err(RecordError::InvalidTimestamp(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};

    fn at(offset_hours: i32, h: u32, m: u32, s: u32, micro: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(offset_hours * 3600)
            .unwrap()
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .and_hms_micro_opt(h, m, s, micro)
                    .unwrap(),
            )
            .single()
            .unwrap()
    }

    fn sample_test() -> TestRecord {
        TestRecord::new(
            "ltp-syscalls",
            "ltp.syscalls",
            "PASS",
            "https://logs.example.org/t1.log",
            "t1",
            "b1",
            at(0, 12, 30, 0, 0),
            "lava",
            "visionfive2",
        )
    }

    #[test]
    fn test_record_ids() {
        let json = sample_test().to_json();
        assert_eq!(json["id"], "riscv:t1");
        assert_eq!(json["build_id"], "b1");
        assert_eq!(json["origin"], ORIGIN);
    }

    #[test]
    fn test_record_shape() {
        let json = sample_test().to_json();
        assert_eq!(
            json,
            json!({
                "id": "riscv:t1",
                "build_id": "b1",
                "origin": "riscv",
                "status": "PASS",
                "path": "ltp.syscalls",
                "start_time": "2024-01-01T12:30:00+00:00",
                "environment": { "misc": { "platform": "visionfive2" } },
                "misc": { "runtime": "lava" }
            })
        );
    }

    #[test]
    fn test_record_accessors() {
        let record = sample_test();
        assert_eq!(record.test(), "ltp-syscalls");
        assert_eq!(record.log(), "https://logs.example.org/t1.log");
    }

    #[test]
    fn build_start_time_is_converted_to_utc() {
        let build = BuildRecord::new("b1", true, "riscv64", "gcc-13", at(5, 10, 0, 0, 0));
        let json = build.to_json();

        assert_eq!(json["start_time"], "2024-01-01T05:00:00+00:00");
        assert_eq!(json["id"], "riscv:b1");
        assert_eq!(json["valid"], true);
        assert_eq!(json["architecture"], "riscv64");
        assert_eq!(json["compiler"], "gcc-13");
    }

    #[test]
    fn fractional_seconds_are_truncated() {
        let build = BuildRecord::new("b2", false, "riscv64", "clang-17", at(0, 8, 15, 59, 999_999));
        assert_eq!(build.to_json()["start_time"], "2024-01-01T08:15:59+00:00");
    }

    #[test]
    fn negative_offset_can_cross_a_day() {
        let build = BuildRecord::new("b3", true, "riscv64", "gcc-13", at(-3, 22, 0, 0, 0));
        assert_eq!(build.to_json()["start_time"], "2024-01-02T01:00:00+00:00");
    }

    #[test]
    fn enum_dispatches_to_variant() {
        let build = BuildRecord::new("b1", true, "riscv64", "gcc-13", Utc::now());
        let records = vec![
            SubmissionRecord::from(sample_test()),
            SubmissionRecord::from(build.clone()),
        ];

        let json = SubmissionRecord::to_json_all(&records);
        assert_eq!(json.len(), 2);
        assert_eq!(json[0], sample_test().to_json());
        assert_eq!(json[1], build.to_json());
    }

    #[test]
    fn parses_aware_timestamps() {
        let time = parse_start_time("2024-01-01T10:00:00+05:00").unwrap();
        assert_eq!(time, at(0, 5, 0, 0, 0));
    }

    #[test]
    fn rejects_naive_timestamps() {
        assert_eq!(
            parse_start_time("2024-01-01T10:00:00"),
            Err(RecordError::NaiveTimestamp("2024-01-01T10:00:00".to_string()))
        );
        assert!(matches!(
            parse_start_time("2024-01-01 10:00:00.25"),
            Err(RecordError::NaiveTimestamp(_))
        ));
    }

    #[test]
    fn rejects_garbage_timestamps() {
        assert!(matches!(
            parse_start_time("yesterday"),
            Err(RecordError::InvalidTimestamp(_))
        ));
    }
}
