use bson::{Bson, Document};
use serde_json::{Map, Value};

/// Convert a stored document into its external JSON representation:
/// the store's `_id` key becomes `id`, ObjectId values become hex strings,
/// datetimes become RFC 3339 strings. Everything else passes through.
pub fn document_to_json(doc: Document) -> Value {
    let mut out = Map::new();
    for (key, value) in doc {
        let key = if key == "_id" { "id".to_string() } else { key };
        out.insert(key, bson_to_json(value));
    }
    Value::Object(out)
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => Value::String(
            dt.try_to_rfc3339_string()
                .unwrap_or_else(|_| dt.timestamp_millis().to_string()),
        ),
        other => other.into_relaxed_extjson(),
    }
}
