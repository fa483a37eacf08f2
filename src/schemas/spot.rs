use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::database::models::{Spot, SpotCategory};
use crate::error::ApiError;

use super::{finish_validation, require};

const RATING_RANGE: std::ops::RangeInclusive<f64> = 0.0..=5.0;

#[derive(Debug, Clone, Deserialize)]
pub struct SpotCreate {
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: Option<SpotCategory>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub rating: f64,
    pub tags: Option<String>,
    pub best_time: Option<String>,
    pub equipment_needed: Option<String>,
}

impl SpotCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = HashMap::new();
        require("name", &self.name, &mut errors);
        require("location", &self.location, &mut errors);
        check_rating(self.rating, &mut errors);
        finish_validation("Invalid spot payload", errors)
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub category: Option<SpotCategory>,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub tags: Option<String>,
    pub best_time: Option<String>,
    pub equipment_needed: Option<String>,
}

impl SpotUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = HashMap::new();
        if let Some(name) = &self.name {
            require("name", name, &mut errors);
        }
        if let Some(location) = &self.location {
            require("location", location, &mut errors);
        }
        if let Some(rating) = self.rating {
            check_rating(rating, &mut errors);
        }
        finish_validation("Invalid spot payload", errors)
    }

    pub fn has_changes(&self) -> bool {
        self.name.is_some()
            || self.description.is_some()
            || self.location.is_some()
            || self.latitude.is_some()
            || self.longitude.is_some()
            || self.category.is_some()
            || self.image_url.is_some()
            || self.rating.is_some()
            || self.tags.is_some()
            || self.best_time.is_some()
            || self.equipment_needed.is_some()
    }
}

fn check_rating(rating: f64, errors: &mut HashMap<String, String>) {
    if !RATING_RANGE.contains(&rating) {
        errors.insert("rating".to_string(), "must be between 0.0 and 5.0".to_string());
    }
}

#[derive(Debug, Serialize)]
pub struct SpotResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: Option<SpotCategory>,
    pub image_url: Option<String>,
    pub rating: f64,
    pub tags: Option<String>,
    pub best_time: Option<String>,
    pub equipment_needed: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Spot> for SpotResponse {
    fn from(spot: Spot) -> Self {
        Self {
            id: spot.id,
            name: spot.name,
            description: spot.description,
            location: spot.location,
            latitude: spot.latitude,
            longitude: spot.longitude,
            category: spot.category,
            image_url: spot.image_url,
            rating: spot.rating,
            tags: spot.tags,
            best_time: spot.best_time,
            equipment_needed: spot.equipment_needed,
            created_at: spot.created_at,
            updated_at: spot.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListSpotsQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<SpotCategory>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_create() -> SpotCreate {
        SpotCreate {
            name: "Lac de Braies".into(),
            description: None,
            location: "Dolomites, Italie".into(),
            latitude: 46.6944,
            longitude: 12.0847,
            category: Some(SpotCategory::Nature),
            image_url: None,
            rating: 4.9,
            tags: None,
            best_time: None,
            equipment_needed: None,
        }
    }

    #[test]
    fn rating_is_bounded() {
        let mut input = base_create();
        assert!(input.validate().is_ok());

        input.rating = 5.5;
        assert_eq!(input.validate().unwrap_err().status_code(), 422);

        input.rating = -0.1;
        assert!(input.validate().is_err());
    }

    #[test]
    fn update_rating_is_bounded_too() {
        let update = SpotUpdate { rating: Some(7.0), ..Default::default() };
        assert!(update.validate().is_err());
        let update = SpotUpdate { rating: Some(3.5), ..Default::default() };
        assert!(update.validate().is_ok());
    }
}
