//! # Custom Attributes
//!
//! Operator-defined key/value annotations on hosts and datastores. A missing
//! attribute is reported as `None`, which is a different state from an
//! attribute set to the empty string.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One attribute value as delivered in the inventory snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAttributeEntry {
    /// Identifier of the annotated object
    pub object_id: String,
    /// Attribute name as defined on the management server
    pub name: String,
    pub value: String,
}

impl CustomAttributeEntry {
    pub fn new(
        object_id: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            object_id: object_id.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Lookup index: object identifier -> attribute name -> value
#[derive(Debug, Default, Clone)]
pub struct CustomAttributeIndex<'a> {
    values: HashMap<&'a str, HashMap<&'a str, &'a str>>,
}

impl<'a> CustomAttributeIndex<'a> {
    /// Build the index; a later entry for the same (object, name) wins
    pub fn build(entries: &'a [CustomAttributeEntry]) -> Self {
        let mut values: HashMap<&'a str, HashMap<&'a str, &'a str>> = HashMap::new();
        for entry in entries {
            values
                .entry(entry.object_id.as_str())
                .or_default()
                .insert(entry.name.as_str(), entry.value.as_str());
        }
        Self { values }
    }

    /// Value of `name` on `object_id`, or `None` when the attribute is absent
    pub fn get(&self, object_id: &str, name: &str) -> Option<&'a str> {
        self.values
            .get(object_id)
            .and_then(|attributes| attributes.get(name))
            .copied()
    }
}
