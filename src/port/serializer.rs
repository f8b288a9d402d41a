//! Payload encoding port.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Converts records to and from the byte payloads callers hand to a store.
///
/// Implementations must round-trip every field of a record, including its
/// business identifier and optional fields. The error string is reported to
/// callers as the reason of a payload error.
pub trait Serializer: Send + Sync + 'static {
    /// Short format name used in logs, e.g. `"json"`.
    fn format(&self) -> &'static str;

    /// Encode a record.
    ///
    /// # Errors
    /// Returns a description of why the record cannot be encoded.
    fn serialize<T: Serialize>(&self, record: &T) -> Result<Vec<u8>, String>;

    /// Decode a payload into a record of type `T`.
    ///
    /// # Errors
    /// Returns a description of why the payload is malformed or does not
    /// match `T`.
    fn deserialize<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T, String>;
}
