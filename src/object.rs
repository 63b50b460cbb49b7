//! Generic typed record with named string fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single model object: a type, a name, and a mapping of named fields.
///
/// This is the narrow surface the schedule engine consumes — it never
/// inspects anything beyond [`IdfObject::get`] and the type/name pair.
/// Field values are kept as raw strings; the evaluators parse them on
/// demand, so a partially filled or hand-edited object stays loadable.
///
/// # Examples
///
/// ```
/// use epsched::object::IdfObject;
///
/// let mut obj = IdfObject::new("Schedule:Constant", "AlwaysOn");
/// obj.set("Hourly Value", "1.0");
/// assert_eq!(obj.get("hourly value"), Some("1.0"));
/// assert_eq!(obj.get("Missing Field"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdfObject {
    /// Object type, e.g. `"Schedule:Compact"`.
    pub obj_type: String,
    /// Object name, unique within its type in a well-formed document.
    pub name: String,
    /// Named field values, stored verbatim.
    #[serde(default)]
    fields: BTreeMap<String, String>,
}

impl IdfObject {
    /// Creates an empty object of the given type and name.
    pub fn new(obj_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            obj_type: obj_type.into(),
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Sets a field value, replacing any previous value stored under a
    /// name that normalizes to the same key.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let normalized = normalize_field_name(&field);
        self.fields.retain(|k, _| normalize_field_name(k) != normalized);
        self.fields.insert(field, value.into());
    }

    /// Looks up a field value by name.
    ///
    /// Matching is case-insensitive and collapses internal whitespace, so
    /// `"Field 12"`, `"field 12"`, and `"FIELD  12"` all resolve to the
    /// same field. Returns `None` for absent fields — the evaluators treat
    /// absence as benign.
    pub fn get(&self, field: &str) -> Option<&str> {
        if let Some(value) = self.fields.get(field) {
            return Some(value.as_str());
        }
        let wanted = normalize_field_name(field);
        self.fields
            .iter()
            .find(|(k, _)| normalize_field_name(k) == wanted)
            .map(|(_, v)| v.as_str())
    }

    /// True when this object's type matches `obj_type`, ignoring case.
    pub fn is_type(&self, obj_type: &str) -> bool {
        self.obj_type.eq_ignore_ascii_case(obj_type)
    }

    /// True when this object's name matches `name`, ignoring case.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Iterates over all `(field, value)` pairs.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of stored fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// Lowercases and collapses whitespace so field-name lookup tolerates the
/// spacing and casing variations found in hand-edited models.
fn normalize_field_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}
