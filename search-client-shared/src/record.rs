//! Records submitted to an index.

use serde_json::{Map, Value};
use uuid::Uuid;

/// Field holding the identifier of a record within an index.
pub const OBJECT_ID_FIELD: &str = "objectID";

/// A record exactly as the caller submitted it: an arbitrary JSON object.
pub type Record = Map<String, Value>;

/// Get the identifier of a record.
///
/// Numeric identifiers are not considered; the service only assigns strings.
pub fn object_id(record: &Record) -> Option<&str> {
    record.get(OBJECT_ID_FIELD).and_then(Value::as_str)
}

/// Ensure the record carries an identifier, generating a random one if needed.
///
/// Returns the identifier the record ends up with.
pub fn ensure_object_id(record: &mut Record) -> String {
    if let Some(existing) = object_id(record) {
        return existing.to_string();
    }

    let generated = Uuid::new_v4().to_string();
    record.insert(OBJECT_ID_FIELD.to_string(), Value::String(generated.clone()));
    generated
}
