//! Field-name mapping between internal and external documents.
//!
//! The external system's field names map 1:1 to internal record attributes;
//! the rules below translate record keys in both directions. Unmapped names
//! pass through unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One field-name translation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRule {
    /// Field name in the external system's documents.
    pub external: String,
    /// Field name in internal records.
    pub internal: String,
}

/// A set of field-name translation rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// The rules.
    #[serde(default)]
    pub rules: Vec<MappingRule>,
}

impl FieldMapping {
    /// Translates an external field name to its internal name.
    #[must_use]
    pub fn to_internal<'a>(&'a self, field: &'a str) -> &'a str {
        self.rules
            .iter()
            .find(|rule| rule.external == field)
            .map_or(field, |rule| rule.internal.as_str())
    }

    /// Translates an internal field name to its external name.
    #[must_use]
    pub fn to_external<'a>(&'a self, field: &'a str) -> &'a str {
        self.rules
            .iter()
            .find(|rule| rule.internal == field)
            .map_or(field, |rule| rule.external.as_str())
    }

    /// Renames every object key in a JSON tree, external -> internal.
    pub fn apply_inbound(&self, value: &mut Value) {
        self.apply(value, Direction::Inbound);
    }

    /// Renames every object key in a JSON tree, internal -> external.
    pub fn apply_outbound(&self, value: &mut Value) {
        self.apply(value, Direction::Outbound);
    }

    fn apply(&self, value: &mut Value, direction: Direction) {
        match value {
            Value::Object(map) => {
                let mut renamed = Map::with_capacity(map.len());
                for (key, mut inner) in std::mem::take(map) {
                    self.apply(&mut inner, direction);
                    let new_key = match direction {
                        Direction::Inbound => self.to_internal(&key).to_string(),
                        Direction::Outbound => self.to_external(&key).to_string(),
                    };
                    renamed.insert(new_key, inner);
                }
                *map = renamed;
            }
            Value::Array(items) => {
                for item in items {
                    self.apply(item, direction);
                }
            }
            _ => {}
        }
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Inbound,
    Outbound,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping() -> FieldMapping {
        FieldMapping {
            rules: vec![
                MappingRule {
                    external: "LEDGERNAME".to_string(),
                    internal: "name".to_string(),
                },
                MappingRule {
                    external: "GUID".to_string(),
                    internal: "key".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_name_translation() {
        let mapping = mapping();
        assert_eq!(mapping.to_internal("LEDGERNAME"), "name");
        assert_eq!(mapping.to_external("name"), "LEDGERNAME");
        assert_eq!(mapping.to_internal("unmapped"), "unmapped");
    }

    #[test]
    fn test_apply_inbound_renames_nested_keys() {
        let mapping = mapping();
        let mut doc = json!({
            "kind": "ledgers",
            "records": [{"LEDGERNAME": "Cash", "GUID": "L-1"}]
        });
        mapping.apply_inbound(&mut doc);
        assert_eq!(doc["records"][0]["name"], "Cash");
        assert_eq!(doc["records"][0]["key"], "L-1");
        assert!(doc["records"][0].get("LEDGERNAME").is_none());
    }

    #[test]
    fn test_outbound_is_inverse_of_inbound() {
        let mapping = mapping();
        let original = json!({"records": [{"LEDGERNAME": "Cash", "GUID": "L-1"}]});
        let mut translated = original.clone();
        mapping.apply_inbound(&mut translated);
        mapping.apply_outbound(&mut translated);
        assert_eq!(translated, original);
    }

    #[test]
    fn test_empty_mapping_is_identity() {
        let mapping = FieldMapping::default();
        let original = json!({"records": [{"name": "Cash"}]});
        let mut value = original.clone();
        mapping.apply_inbound(&mut value);
        assert_eq!(value, original);
    }
}
