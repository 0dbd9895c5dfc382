//! Payload validation against static per-entity schemas.
//!
//! A payload arrives wrapped in its entity name (`{"campground": {...}}`),
//! the way form bodies are nested. [`validate`] checks every field and reports
//! every violation at once; numeric strings are coerced the way form input is.

mod schema;

pub use schema::{FieldKind, FieldRule, Schema, CAMPGROUND, LOGIN, REGISTRATION, REVIEW};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// One violated constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Error)]
#[error("{}", self.joined_message())]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violations: vec![Violation {
                field: field.into(),
                message: message.into(),
            }],
        }
    }

    /// All messages joined with `,`
    pub fn joined_message(&self) -> String {
        self.violations
            .iter()
            .map(|v| v.message.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn field_errors(&self) -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();
        for v in &self.violations {
            fields.entry(v.field.clone()).or_insert_with(|| v.message.clone());
        }
        fields
    }

    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

/// Normalized fields that passed a schema
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPayload {
    pub schema: &'static str,
    pub fields: Map<String, Value>,
}

impl ValidatedPayload {
    /// Deserialize the normalized fields into a typed input struct
    pub fn into_fields<T: DeserializeOwned>(self) -> Result<T, ValidationError> {
        serde_json::from_value(Value::Object(self.fields))
            .map_err(|e| ValidationError::single(self.schema, format!("\"{}\" {}", self.schema, e)))
    }
}

pub fn validate(schema: &Schema, payload: &Value) -> Result<ValidatedPayload, ValidationError> {
    let name = schema.name();
    let body = match schema.root {
        Some(root) => payload.get(root),
        None => Some(payload).filter(|p| !p.is_null()),
    };
    let root = match body {
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(ValidationError::single(
                name,
                format!("\"{}\" must be of type object", name),
            ))
        }
        None => {
            return Err(ValidationError::single(
                name,
                format!("\"{}\" is required", name),
            ))
        }
    };

    let mut violations = Vec::new();
    let mut fields = Map::new();

    for rule in schema.fields {
        let label = schema.label(rule.name);
        match root.get(rule.name) {
            None | Some(Value::Null) => {
                if rule.required {
                    violations.push(Violation {
                        field: rule.name.to_string(),
                        message: format!("\"{}\" is required", label),
                    });
                }
            }
            Some(value) => match rule.kind.check(value, rule.required) {
                Ok(Some(normalized)) => {
                    fields.insert(rule.name.to_string(), normalized);
                }
                Ok(None) => {}
                Err(reason) => violations.push(Violation {
                    field: rule.name.to_string(),
                    message: format!("\"{}\" {}", label, reason),
                }),
            },
        }
    }

    // Unknown keys are rejected so nothing like `author` can ride along
    let mut unknown: Vec<&String> = root
        .keys()
        .filter(|key| !schema.fields.iter().any(|rule| rule.name == key.as_str()))
        .collect();
    unknown.sort();
    for key in unknown {
        violations.push(Violation {
            field: key.clone(),
            message: format!("\"{}\" is not allowed", schema.label(key)),
        });
    }

    if violations.is_empty() {
        Ok(ValidatedPayload {
            schema: name,
            fields,
        })
    } else {
        Err(ValidationError { violations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{CampgroundFields, ReviewFields};
    use serde_json::json;

    #[test]
    fn accepts_valid_campground() {
        let payload = json!({
            "campground": {
                "title": "Lakeview",
                "price": 1500,
                "location": "Nagano",
                "description": "quiet"
            }
        });
        let fields: CampgroundFields = validate(&CAMPGROUND, &payload).unwrap().into_fields().unwrap();
        assert_eq!(fields.title, "Lakeview");
        assert_eq!(fields.price, 1500.0);
        assert_eq!(fields.description.as_deref(), Some("quiet"));
    }

    #[test]
    fn coerces_numeric_strings() {
        let payload = json!({
            "campground": { "title": "Lakeview", "price": " 1500 ", "location": "Nagano" }
        });
        let fields: CampgroundFields = validate(&CAMPGROUND, &payload).unwrap().into_fields().unwrap();
        assert_eq!(fields.price, 1500.0);

        let payload = json!({ "review": { "body": "ok", "rating": "4" } });
        let fields: ReviewFields = validate(&REVIEW, &payload).unwrap().into_fields().unwrap();
        assert_eq!(fields.rating, 4);
    }

    #[test]
    fn reports_every_violation() {
        let payload = json!({ "campground": { "price": -1 } });
        let err = validate(&CAMPGROUND, &payload).unwrap_err();
        assert_eq!(err.fields(), vec!["title", "price", "location"]);
        assert!(err.joined_message().contains("\"campground.price\" must be greater than or equal to 0"));
        assert_eq!(err.joined_message().split(',').count(), 3);
    }

    #[test]
    fn missing_root_is_required() {
        let err = validate(&REVIEW, &json!({ "body": "x" })).unwrap_err();
        assert_eq!(err.joined_message(), "\"review\" is required");
    }

    #[test]
    fn rating_bounds() {
        for bad in [0, 6] {
            let payload = json!({ "review": { "body": "meh", "rating": bad } });
            let err = validate(&REVIEW, &payload).unwrap_err();
            assert_eq!(err.fields(), vec!["rating"]);
        }
        for good in 1..=5 {
            let payload = json!({ "review": { "body": "ok", "rating": good } });
            assert!(validate(&REVIEW, &payload).is_ok());
        }
    }

    #[test]
    fn rating_must_be_integer() {
        let payload = json!({ "review": { "body": "ok", "rating": 3.5 } });
        let err = validate(&REVIEW, &payload).unwrap_err();
        assert!(err.joined_message().contains("must be an integer"));
    }

    #[test]
    fn blank_required_text_rejected() {
        let payload = json!({ "review": { "body": "   ", "rating": 3 } });
        let err = validate(&REVIEW, &payload).unwrap_err();
        assert!(err.joined_message().contains("is not allowed to be empty"));
    }

    #[test]
    fn unknown_fields_rejected() {
        let payload = json!({
            "campground": { "title": "A", "price": 1, "location": "B", "author": "someone-else" }
        });
        let err = validate(&CAMPGROUND, &payload).unwrap_err();
        assert_eq!(err.fields(), vec!["author"]);
    }

    #[test]
    fn flat_schema_labels_without_root() {
        let err = validate(&LOGIN, &json!({ "username": "alice" })).unwrap_err();
        assert_eq!(err.joined_message(), "\"password\" is required");

        let err = validate(&LOGIN, &Value::Null).unwrap_err();
        assert_eq!(err.joined_message(), "\"value\" is required");
    }

    #[test]
    fn geometry_and_images_validated() {
        let payload = json!({
            "campground": {
                "title": "A", "price": 1, "location": "B",
                "geometry": { "type": "Point", "coordinates": [200.0, 35.0] },
                "images": [{ "url": "https://img/1.png" }]
            }
        });
        let err = validate(&CAMPGROUND, &payload).unwrap_err();
        assert_eq!(err.fields(), vec!["geometry", "images"]);
    }

    #[test]
    fn geometry_accepted_in_range() {
        let payload = json!({
            "campground": {
                "title": "A", "price": 1, "location": "B",
                "geometry": { "type": "Point", "coordinates": [138.19, 36.65] },
                "images": [{ "url": "https://img/1.png", "filename": "camp/1" }]
            }
        });
        let fields: CampgroundFields = validate(&CAMPGROUND, &payload).unwrap().into_fields().unwrap();
        assert_eq!(fields.geometry.unwrap().coordinates, [138.19, 36.65]);
        assert_eq!(fields.images.unwrap().len(), 1);
    }
}
