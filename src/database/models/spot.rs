use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Photography spot category. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SpotCategory {
    Nature,
    Urban,
    Portrait,
    Landscape,
    Street,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Spot {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: Option<SpotCategory>,
    pub image_url: Option<String>,
    pub rating: f64,
    /// Comma-separated labels, e.g. "Lever de soleil,Trépied"
    pub tags: Option<String>,
    pub best_time: Option<String>,
    pub equipment_needed: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
