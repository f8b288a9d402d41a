//! Sample record types.

use serde::{Deserialize, Serialize};

use crate::domain::entity::{EntityDescriptor, Record};

/// A unit of work with a lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub business_id: String,
    pub start_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    pub status: String,
}

impl Task {
    #[must_use]
    pub fn new(business_id: &str, start_time: i64, status: &str) -> Self {
        Self {
            business_id: business_id.to_string(),
            start_time,
            end_time: None,
            status: status.to_string(),
        }
    }

    #[must_use]
    pub fn ended(mut self, end_time: i64) -> Self {
        self.end_time = Some(end_time);
        self
    }
}

impl Record for Task {
    fn business_id(&self) -> &str {
        &self.business_id
    }
}

/// A step recorded against a [`Task`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskProgress {
    #[serde(default)]
    pub business_id: String,
    pub task_id: String,
    pub action: String,
    pub timestamp: i64,
}

impl TaskProgress {
    #[must_use]
    pub fn new(business_id: &str, task_id: &str, action: &str, timestamp: i64) -> Self {
        Self {
            business_id: business_id.to_string(),
            task_id: task_id.to_string(),
            action: action.to_string(),
            timestamp,
        }
    }
}

impl Record for TaskProgress {
    fn business_id(&self) -> &str {
        &self.business_id
    }
}

pub const TASKS: EntityDescriptor<Task> = EntityDescriptor::new("task");
pub const TASK_PROGRESS: EntityDescriptor<TaskProgress> = EntityDescriptor::new("task_progress");

/// JSON payload for a record, as a caller would send it.
///
/// # Panics
/// Panics if the record does not serialize, which the fixtures always do.
#[must_use]
pub fn payload<T: Serialize>(record: &T) -> Vec<u8> {
    serde_json::to_vec(record).expect("fixture serializes")
}
