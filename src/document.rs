//! Owning collection of model objects with by-name lookup.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::object::IdfObject;

/// An in-memory model document: a flat, ordered collection of objects.
///
/// Lookups are case-insensitive on both type and name, matching how
/// EnergyPlus resolves cross-references. The collection is append-only
/// from the schedule engine's point of view; evaluation only ever reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// All objects, in insertion order.
    objects: Vec<IdfObject>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an object and returns a reference to the stored copy.
    pub fn add(&mut self, object: IdfObject) -> &IdfObject {
        self.objects.push(object);
        self.objects.last().expect("push leaves a last element")
    }

    /// Finds the first object of `obj_type` named `name`, ignoring case.
    pub fn find(&self, obj_type: &str, name: &str) -> Option<&IdfObject> {
        self.objects
            .iter()
            .find(|o| o.is_type(obj_type) && o.is_named(name))
    }

    /// Finds the first object named `name` among any of the given types.
    ///
    /// Types are tried in the order given, mirroring how week and day
    /// schedule references resolve against several candidate object types.
    pub fn find_any(&self, obj_types: &[&str], name: &str) -> Option<&IdfObject> {
        obj_types.iter().find_map(|t| self.find(t, name))
    }

    /// Iterates over all objects of the given type.
    pub fn objects_of_type<'a>(
        &'a self,
        obj_type: &'a str,
    ) -> impl Iterator<Item = &'a IdfObject> {
        self.objects.iter().filter(move |o| o.is_type(obj_type))
    }

    /// Iterates over every object in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &IdfObject> {
        self.objects.iter()
    }

    /// Number of objects in the document.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True when the document holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Parses a document from its JSON representation.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Reads and parses a JSON document file.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the file cannot be read or contains
    /// invalid JSON.
    pub fn from_json_file(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content).map_err(io::Error::from)
    }

    /// Serializes the document as pretty-printed JSON.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let mut doc = Document::new();
        let mut c = IdfObject::new("Schedule:Constant", "AlwaysOn");
        c.set("Hourly Value", "1");
        doc.add(c);
        doc.add(IdfObject::new("Schedule:Week:Daily", "Office Week"));
        doc
    }

    #[test]
    fn find_ignores_case() {
        let doc = sample();
        assert!(doc.find("schedule:constant", "ALWAYSON").is_some());
        assert!(doc.find("Schedule:Constant", "missing").is_none());
    }

    #[test]
    fn find_any_tries_types_in_order() {
        let doc = sample();
        let hit = doc.find_any(
            &["Schedule:Week:Daily", "Schedule:Week:Compact"],
            "office week",
        );
        assert_eq!(hit.map(|o| o.obj_type.as_str()), Some("Schedule:Week:Daily"));
    }

    #[test]
    fn objects_of_type_filters() {
        let doc = sample();
        assert_eq!(doc.objects_of_type("Schedule:Constant").count(), 1);
        assert_eq!(doc.objects_of_type("Schedule:Year").count(), 0);
    }

    #[test]
    fn json_round_trip() {
        let doc = sample();
        let json = doc.to_json_string().ok();
        let back = json.as_deref().and_then(|j| Document::from_json_str(j).ok());
        assert_eq!(back.as_ref(), Some(&doc));
    }

    #[test]
    fn add_returns_stored_object() {
        let mut doc = Document::new();
        let stored = doc.add(IdfObject::new("Schedule:Compact", "S"));
        assert_eq!(stored.name, "S");
        assert_eq!(doc.len(), 1);
    }
}
