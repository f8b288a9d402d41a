//! Change log entries.
//!
//! One [`ChangeRecord`] is appended for every accepted mutation. Records are
//! never updated or removed here; consumers downstream read them in `id`
//! order, which is the order mutations were accepted.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::context::MutationContext;

/// Kind of mutation recorded in the change log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(Operation::Create),
            "UPDATE" => Ok(Operation::Update),
            "DELETE" => Ok(Operation::Delete),
            other => Err(format!("unknown change operation '{other}'")),
        }
    }
}

/// A change about to be appended. The id and timestamp are assigned by the
/// recorder at append time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChange<'a> {
    pub entity_type: &'a str,
    pub business_id: &'a str,
    pub operation: Operation,
    pub context: &'a MutationContext,
}

/// An appended change log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    pub id: i64,
    pub entity_type: String,
    pub business_id: String,
    pub operation: Operation,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl ChangeRecord {
    /// Append time as a UTC datetime, if the stored millis are in range.
    #[must_use]
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {}/{} source={}",
            self.id, self.operation, self.entity_type, self.business_id, self.source
        )
    }
}
