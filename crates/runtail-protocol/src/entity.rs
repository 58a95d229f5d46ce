//! Entity references: a run, or one step of a run.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::status::Status;

/// Identifies the run or run step being observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    /// Run identifier.
    pub run_id: String,

    /// Step index within the run (None for the run itself).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_index: Option<usize>,
}

impl EntityRef {
    /// Reference a run.
    pub fn run(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            step_index: None,
        }
    }

    /// Reference one step of a run.
    pub fn step(run_id: impl Into<String>, step_index: usize) -> Self {
        Self {
            run_id: run_id.into(),
            step_index: Some(step_index),
        }
    }

    /// Whether this references a step rather than a whole run.
    pub fn is_step(&self) -> bool {
        self.step_index.is_some()
    }

    /// URL path of the status resource, relative to the service base.
    pub fn status_path(&self) -> String {
        match self.step_index {
            Some(index) => format!("run/{}/step/{}", self.run_id, index),
            None => format!("run/{}", self.run_id),
        }
    }

    /// URL path of the log chunk resource, relative to the service base.
    pub fn log_chunk_path(&self) -> String {
        format!("{}/log_chunk", self.status_path())
    }

    /// Whether `status` is terminal for this entity kind.
    ///
    /// Terminal statuses never change again. Steps additionally treat
    /// `skipped` as terminal; a run reporting `skipped` is off-contract and
    /// treated as still live.
    pub fn is_terminal(&self, status: Status) -> bool {
        match status {
            Status::Succeeded | Status::Failed | Status::Aborted | Status::Exception => true,
            Status::Skipped => self.is_step(),
            Status::Pending | Status::Running => false,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.step_index {
            Some(index) => write!(f, "run {} step {}", self.run_id, index),
            None => write!(f, "run {}", self.run_id),
        }
    }
}
