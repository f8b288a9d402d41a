//! Schemaless records.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::entity::Record;

/// A record of arbitrary shape: a business identifier plus any other fields.
///
/// Useful for tools that handle collections whose record type is not known at
/// compile time. A `businessId` that is missing, null or not a string
/// deserializes as an empty string so that identity validation, not
/// decoding, reports it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "businessId", default, deserialize_with = "identifier_text")]
    pub business_id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    #[must_use]
    pub fn new(business_id: impl Into<String>) -> Self {
        Self {
            business_id: business_id.into(),
            fields: Map::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

fn identifier_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(id) => id,
        _ => String::new(),
    })
}

impl Record for Document {
    fn business_id(&self) -> &str {
        &self.business_id
    }
}
