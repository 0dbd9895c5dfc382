use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::AuthorRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub filename: String,
}

/// GeoJSON point, coordinates in `[longitude, latitude]` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

impl Geometry {
    pub fn point(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: [longitude, latitude],
        }
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::point(0.0, 0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campground {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    pub geometry: Geometry,
    pub images: Vec<Image>,
    pub author: AuthorRef,
    /// Owned review ids, oldest first.
    pub reviews: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Campground {
    pub fn new(fields: CampgroundFields, author_id: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: fields.title,
            description: fields.description.unwrap_or_default(),
            price: fields.price,
            location: fields.location,
            geometry: fields.geometry.unwrap_or_default(),
            images: fields.images.unwrap_or_default(),
            author: AuthorRef::Id(author_id.to_string()),
            reviews: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Apply an edit. `author` is never touched. A blank or absent description
    /// clears it; absent geometry and images keep their value.
    pub fn apply(&mut self, fields: CampgroundFields) {
        self.title = fields.title;
        self.price = fields.price;
        self.location = fields.location;
        self.description = fields.description.unwrap_or_default();
        if let Some(geometry) = fields.geometry {
            self.geometry = geometry;
        }
        if let Some(images) = fields.images {
            self.images = images;
        }
    }
}

/// Validated, author-free input for creating or editing a campground.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampgroundFields {
    pub title: String,
    pub price: f64,
    pub location: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub images: Option<Vec<Image>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: &str) -> CampgroundFields {
        CampgroundFields {
            title: title.to_string(),
            price: 1500.0,
            location: "Nagano".to_string(),
            description: Some("quiet".to_string()),
            geometry: None,
            images: None,
        }
    }

    #[test]
    fn new_campground_defaults() {
        let camp = Campground::new(fields("Lakeview"), "u-1");
        assert_eq!(camp.author.id(), "u-1");
        assert!(camp.reviews.is_empty());
        assert_eq!(camp.geometry, Geometry::point(0.0, 0.0));
        assert!(!camp.id.is_empty());
    }

    #[test]
    fn apply_keeps_author_and_clears_description() {
        let mut camp = Campground::new(fields("Lakeview"), "u-1");
        camp.geometry = Geometry::point(137.86, 36.69);
        let mut edit = fields("Hillside");
        edit.description = None;
        camp.apply(edit);

        assert_eq!(camp.title, "Hillside");
        assert_eq!(camp.description, "");
        assert_eq!(camp.geometry, Geometry::point(137.86, 36.69));
        assert_eq!(camp.author.id(), "u-1");
    }
}
