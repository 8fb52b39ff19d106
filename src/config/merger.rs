//! Deep merge for layered YAML configuration.
//!
//! The embedded catalog, the user config and an explicit `--config` file
//! are merged as raw YAML before deserialization:
//!
//! - Mappings merge recursively
//! - Sequences are replaced wholesale (a category's tool list is never
//!   concatenated with the built-in one)
//! - `null` in an overlay deletes the key (drop a built-in tool)
//! - Scalars in the overlay win

use serde_yaml::{Mapping, Value};

/// Merge `overlay` on top of `base`.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in overlay_map {
                if value.is_null() {
                    merged.remove(key);
                    continue;
                }
                let next = match base_map.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Mapping(merged)
        }
        // An empty file parses to null; treat it as "no changes".
        (base, Value::Null) => base.clone(),
        (_, overlay) => overlay.clone(),
    }
}

/// Merge layers in order; later layers take precedence.
pub fn merge_configs(layers: &[Value]) -> Value {
    layers
        .iter()
        .fold(Value::Mapping(Mapping::new()), |acc, layer| {
            deep_merge(&acc, layer)
        })
}
