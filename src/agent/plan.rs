//! Layout plan inspection.
//!
//! Plans are whatever JSON the model returned. Nothing here assumes a schema:
//! missing or renamed fields are skipped, never treated as errors.

use serde_json::Value;

/// Fallback used in the explanation prompt when a plan names no components.
pub const UNKNOWN_COMPONENTS: &str = "various components";

/// Component `type` names in a plan, de-duplicated, in first-seen order.
///
/// Walks `type`, then `children`, then `components`, then `layout` of every
/// object reached.
pub fn component_names(plan: &Value) -> Vec<String> {
    let mut names = Vec::new();
    collect(plan, &mut names);
    names
}

/// Comma-separated component names, or [`UNKNOWN_COMPONENTS`].
pub fn component_summary(plan: &Value) -> String {
    let names = component_names(plan);
    if names.is_empty() {
        UNKNOWN_COMPONENTS.to_string()
    } else {
        names.join(", ")
    }
}

fn collect(node: &Value, names: &mut Vec<String>) {
    let Some(obj) = node.as_object() else {
        return;
    };

    if let Some(kind) = obj.get("type").and_then(Value::as_str) {
        if !names.iter().any(|n| n == kind) {
            names.push(kind.to_string());
        }
    }
    for key in ["children", "components"] {
        if let Some(items) = obj.get(key).and_then(Value::as_array) {
            for item in items {
                collect(item, names);
            }
        }
    }
    if let Some(layout) = obj.get("layout") {
        collect(layout, names);
    }
}
