//! Status types for runs and steps.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Execution status reported by the orchestration service.
///
/// Values are the service's lowercase wire form. `Skipped` is only ever
/// reported for steps; runs never enter it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Waiting to be scheduled.
    Pending,
    /// Actively executing.
    Running,
    /// Completed successfully.
    Succeeded,
    /// Completed with a failure.
    Failed,
    /// Stopped on request.
    Aborted,
    /// Stopped by an internal error.
    Exception,
    /// Step was never executed (steps only).
    Skipped,
}

impl Status {
    /// The lowercase wire form of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Running => "running",
            Status::Succeeded => "succeeded",
            Status::Failed => "failed",
            Status::Aborted => "aborted",
            Status::Exception => "exception",
            Status::Skipped => "skipped",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status record for a run or step, fetched whole on every poll.
///
/// The service returns more fields than this; everything beyond the status
/// is ignored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Current status of the entity.
    pub status: Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_form() {
        let json = serde_json::to_string(&Status::Succeeded).unwrap();
        assert_eq!(json, "\"succeeded\"");

        let parsed: Status = serde_json::from_str("\"running\"").unwrap();
        assert_eq!(parsed, Status::Running);
    }

    #[test]
    fn test_status_record_ignores_extra_fields() {
        let body = r#"{"status": "failed", "project": "website", "update_date": "2020-03-01T10:00:00Z"}"#;
        let record: StatusRecord = serde_json::from_str(body).unwrap();
        assert_eq!(record.status, Status::Failed);
    }

    #[test]
    fn test_status_display_matches_wire_form() {
        assert_eq!(Status::Exception.to_string(), "exception");
        assert_eq!(Status::Skipped.to_string(), "skipped");
    }
}
