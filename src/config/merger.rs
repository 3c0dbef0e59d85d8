//! Recursive merge for configuration and settings trees.
//!
//! The same primitive combines config locations and aggregates the grouped
//! settings of a report, so both behave identically.
//!
//! # Merge Rules
//!
//! - Objects are merged key by key, recursively
//! - Arrays are concatenated (base first, then overlay)
//! - Anything else: the overlay replaces the base

use serde_json::Value;

/// Deep merge two values.
///
/// # Arguments
///
/// * `base` - The base value
/// * `overlay` - The overlay value (takes precedence for scalars)
///
/// # Returns
///
/// A new Value with merged contents
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    let mut result = base.clone();
    merge_into(&mut result, overlay);
    result
}

/// Merge `overlay` into `base` in place.
pub fn merge_into(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(base_value) => merge_into(base_value, overlay_value),
                    None => {
                        base_map.insert(key.clone(), overlay_value.clone());
                    }
                }
            }
        }
        (Value::Array(base_items), Value::Array(overlay_items)) => {
            base_items.extend(overlay_items.iter().cloned());
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

/// Merge multiple values in order (later overrides earlier).
pub fn merge_all<'a>(values: impl IntoIterator<Item = &'a Value>) -> Value {
    values
        .into_iter()
        .fold(Value::Object(Default::default()), |mut acc, value| {
            merge_into(&mut acc, value);
            acc
        })
}
