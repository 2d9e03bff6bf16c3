//! Overlaying persisted JSON on top of defaults.

use serde_json::{Map, Value};

/// Merge `persisted` over `defaults`: shallow at the top level, then one
/// level deep inside sections that are objects on both sides.
///
/// Keys only present in `persisted` are kept, so data written by a newer
/// build survives a round trip through an older one.
pub fn overlay_sections(defaults: &mut Map<String, Value>, persisted: Map<String, Value>) {
    for (key, value) in persisted {
        let value = match (defaults.get_mut(&key), value) {
            (Some(Value::Object(section)), Value::Object(fields)) => {
                overlay_fields(section, fields);
                continue;
            }
            (_, value) => value,
        };
        defaults.insert(key, value);
    }
}

/// One-level shallow merge of `fields` into `target`.
pub fn overlay_fields(target: &mut Map<String, Value>, fields: Map<String, Value>) {
    for (key, value) in fields {
        target.insert(key, value);
    }
}
