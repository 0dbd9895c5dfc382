use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    /// Credential text, taken verbatim
    Secret,
    Number { min: f64 },
    Integer { min: i64, max: i64 },
    /// GeoJSON point with `[longitude, latitude]`
    Geometry,
    /// List of `{url, filename}` objects
    Images,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    /// Key the entity's fields are nested under; `None` for flat bodies
    pub root: Option<&'static str>,
    pub fields: &'static [FieldRule],
}

pub const CAMPGROUND: Schema = Schema {
    root: Some("campground"),
    fields: &[
        FieldRule { name: "title", kind: FieldKind::Text, required: true },
        FieldRule { name: "price", kind: FieldKind::Number { min: 0.0 }, required: true },
        FieldRule { name: "location", kind: FieldKind::Text, required: true },
        FieldRule { name: "description", kind: FieldKind::Text, required: false },
        FieldRule { name: "geometry", kind: FieldKind::Geometry, required: false },
        FieldRule { name: "images", kind: FieldKind::Images, required: false },
    ],
};

pub const REVIEW: Schema = Schema {
    root: Some("review"),
    fields: &[
        FieldRule { name: "body", kind: FieldKind::Text, required: true },
        FieldRule { name: "rating", kind: FieldKind::Integer { min: 1, max: 5 }, required: true },
    ],
};

pub const LOGIN: Schema = Schema {
    root: None,
    fields: &[
        FieldRule { name: "username", kind: FieldKind::Text, required: true },
        FieldRule { name: "password", kind: FieldKind::Secret, required: true },
    ],
};

pub const REGISTRATION: Schema = Schema {
    root: None,
    fields: &[
        FieldRule { name: "username", kind: FieldKind::Text, required: true },
        FieldRule { name: "email", kind: FieldKind::Text, required: false },
        FieldRule { name: "password", kind: FieldKind::Secret, required: true },
    ],
};

impl Schema {
    pub fn name(&self) -> &'static str {
        self.root.unwrap_or("value")
    }

    pub(super) fn label(&self, field: &str) -> String {
        match self.root {
            Some(root) => format!("{}.{}", root, field),
            None => field.to_string(),
        }
    }
}

impl FieldKind {
    /// Check one present value. `Ok(None)` means "treat as absent".
    pub(super) fn check(&self, value: &Value, required: bool) -> Result<Option<Value>, String> {
        match *self {
            FieldKind::Text => check_text(value, required),
            FieldKind::Secret => check_secret(value, required),
            FieldKind::Number { min } => {
                let n = as_number(value).ok_or_else(|| "must be a number".to_string())?;
                if n < min {
                    return Err(format!("must be greater than or equal to {}", min));
                }
                Ok(Some(Value::from(n)))
            }
            FieldKind::Integer { min, max } => {
                let n = as_number(value).ok_or_else(|| "must be a number".to_string())?;
                if n.fract() != 0.0 {
                    return Err("must be an integer".to_string());
                }
                if n < min as f64 {
                    return Err(format!("must be greater than or equal to {}", min));
                }
                if n > max as f64 {
                    return Err(format!("must be less than or equal to {}", max));
                }
                Ok(Some(Value::from(n as i64)))
            }
            FieldKind::Geometry => check_geometry(value).map(Some),
            FieldKind::Images => check_images(value).map(Some),
        }
    }
}

fn check_text(value: &Value, required: bool) -> Result<Option<Value>, String> {
    let text = value.as_str().ok_or_else(|| "must be a string".to_string())?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return if required {
            Err("is not allowed to be empty".to_string())
        } else {
            Ok(None)
        };
    }
    Ok(Some(Value::String(trimmed.to_string())))
}

fn check_secret(value: &Value, required: bool) -> Result<Option<Value>, String> {
    let text = value.as_str().ok_or_else(|| "must be a string".to_string())?;
    if text.is_empty() {
        return if required {
            Err("is not allowed to be empty".to_string())
        } else {
            Ok(None)
        };
    }
    Ok(Some(Value::String(text.to_string())))
}

fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn check_geometry(value: &Value) -> Result<Value, String> {
    const REASON: &str = "must be a GeoJSON Point with [longitude, latitude] coordinates";

    if value.get("type").and_then(Value::as_str) != Some("Point") {
        return Err(REASON.to_string());
    }
    let coords = value
        .get("coordinates")
        .and_then(Value::as_array)
        .filter(|c| c.len() == 2)
        .ok_or_else(|| REASON.to_string())?;
    let lng = coords[0].as_f64().filter(|n| (-180.0..=180.0).contains(n));
    let lat = coords[1].as_f64().filter(|n| (-90.0..=90.0).contains(n));
    match (lng, lat) {
        (Some(lng), Some(lat)) => Ok(json!({ "type": "Point", "coordinates": [lng, lat] })),
        _ => Err(REASON.to_string()),
    }
}

fn check_images(value: &Value) -> Result<Value, String> {
    const REASON: &str = "must be a list of {url, filename} objects";

    let items = value.as_array().ok_or_else(|| REASON.to_string())?;
    let mut images = Vec::with_capacity(items.len());
    for item in items {
        let url = item.get("url").and_then(Value::as_str).map(str::trim);
        let filename = item.get("filename").and_then(Value::as_str).map(str::trim);
        match (url, filename) {
            (Some(url), Some(filename)) if !url.is_empty() && !filename.is_empty() => {
                images.push(json!({ "url": url, "filename": filename }));
            }
            _ => return Err(REASON.to_string()),
        }
    }
    Ok(Value::Array(images))
}
