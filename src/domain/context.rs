//! Mutation provenance.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Source recorded when a caller does not name one.
pub const DEFAULT_SOURCE: &str = "ui";

/// Who or what caused a mutation, and why.
///
/// `source` is an open vocabulary ("ui", "sync", "p2p", ...). The context is
/// copied into the change record and not retained anywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationContext {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl MutationContext {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            actor: None,
            reason: None,
        }
    }

    #[must_use]
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

impl Default for MutationContext {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE)
    }
}

impl fmt::Display for MutationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source={}", self.source)?;
        if let Some(actor) = &self.actor {
            write!(f, " actor={actor}")?;
        }
        if let Some(reason) = &self.reason {
            write!(f, " reason={reason}")?;
        }
        Ok(())
    }
}
