use serde_json::Value;

use crate::parse::schema::Schema;

/// Content hash of a generated model, used as the deduplication key.
///
/// Two models that differ only in property order, object-key order or the
/// order of their `required` list produce the same signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelSignature(blake3::Hash);

impl ModelSignature {
    pub fn of(model: &Schema) -> Result<Self, serde_json::Error> {
        let mut value = serde_json::to_value(model)?;
        sort_required_lists(&mut value);

        let mut canonical = String::new();
        write_canonical(&value, &mut canonical);

        Ok(Self(blake3::hash(canonical.as_bytes())))
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }
}

/// `required` lists are sets; sort the all-string ones so order never
/// reaches the hash.
fn sort_required_lists(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Array(names)) = map.get_mut("required") {
                if names.iter().all(Value::is_string) {
                    names.sort_by(|a, b| a.as_str().cmp(&b.as_str()));
                }
            }
            for child in map.values_mut() {
                sort_required_lists(child);
            }
        }
        Value::Array(items) => {
            for item in items {
                sort_required_lists(item);
            }
        }
        _ => {}
    }
}

/// Compact JSON with object keys in lexicographic order at every level.
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, child)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(child, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
