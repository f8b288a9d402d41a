//! JSON payload serializer.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::port::serializer::Serializer;

/// Default serializer: UTF-8 JSON.
///
/// Unknown fields are ignored when the target type does not deny them, which
/// is serde's default behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl JsonSerializer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Serializer for JsonSerializer {
    fn format(&self) -> &'static str {
        "json"
    }

    fn serialize<T: Serialize>(&self, record: &T) -> Result<Vec<u8>, String> {
        serde_json::to_vec(record).map_err(|e| e.to_string())
    }

    fn deserialize<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T, String> {
        serde_json::from_slice(payload).map_err(|e| e.to_string())
    }
}
