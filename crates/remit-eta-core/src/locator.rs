//! Keyword search over arbitrary JSON.
//!
//! Quote responses have no fixed schema, so diagnostics and the last-resort
//! delivery strategy both need to find "anything that looks like a time
//! field" wherever it lives. [`walk`] is the generic pre-order visitor;
//! [`locate_fields`] is the keyword search built on it.

use serde_json::Value;

use crate::domain::ExtractedField;

/// Maximum nesting depth visited.
pub const MAX_DEPTH: usize = 64;

/// Maximum elements visited per array.
pub const MAX_ARRAY_ITEMS: usize = 1_000;

/// Bounds applied while walking a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatorLimits {
    pub max_depth: usize,
    pub max_array_items: usize,
}

impl Default for LocatorLimits {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            max_array_items: MAX_ARRAY_ITEMS,
        }
    }
}

// ---------------------------------------------------------------------------
// Visitor
// ---------------------------------------------------------------------------

/// Visit every `(path, key, value)` triple below `root`, pre-order, in key
/// insertion order.
///
/// `key` is the object key that holds `value`; array elements are visited for
/// descent only and are never reported on their own.
pub fn walk<F>(root: &Value, limits: LocatorLimits, visit: &mut F)
where
    F: FnMut(&str, &str, &Value),
{
    walk_inner(root, "", 0, limits, visit);
}

fn walk_inner<F>(value: &Value, path: &str, depth: usize, limits: LocatorLimits, visit: &mut F)
where
    F: FnMut(&str, &str, &Value),
{
    if depth >= limits.max_depth {
        return;
    }

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                visit(&child_path, key, child);
                walk_inner(child, &child_path, depth + 1, limits, visit);
            }
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().take(limits.max_array_items).enumerate() {
                let item_path = format!("{}[{}]", path, idx);
                walk_inner(item, &item_path, depth + 1, limits, visit);
            }
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Return every non-null field whose key contains one of `keywords`
/// (case-insensitive), at any depth.
pub fn locate_fields(root: &Value, keywords: &[&str]) -> Vec<ExtractedField> {
    locate_fields_with(root, keywords, LocatorLimits::default())
}

/// [`locate_fields`] with explicit bounds.
pub fn locate_fields_with(
    root: &Value,
    keywords: &[&str],
    limits: LocatorLimits,
) -> Vec<ExtractedField> {
    let needles: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    let mut found = Vec::new();

    walk(root, limits, &mut |path, key, value| {
        if value.is_null() {
            return;
        }
        let key = key.to_lowercase();
        if needles.iter().any(|n| key.contains(n.as_str())) {
            found.push(ExtractedField {
                path: path.to_string(),
                value: value.clone(),
            });
        }
    });

    found
}
