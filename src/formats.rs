use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Column order of the emitted dataset. Matches the field order of [`CatalogItem`].
pub const DATASET_COLUMNS: [&str; 8] = [
    "id",
    "title",
    "price",
    "rating",
    "availability",
    "category",
    "image_url",
    "book_url",
];

/// One finished product record, as written to the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: u32,
    pub title: String,
    pub price: f64,
    pub rating: u8,
    pub availability: String,
    pub category: String,
    pub image_url: String,
    pub book_url: String,
}

/// Fields pulled out of a single product node, before a page category and id are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct RawItem {
    pub title: String,
    pub detail_url: String,
    pub price: f64,
    pub rating: u8,
    pub image_url: String,
    pub availability: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub total_books: usize,
    pub data_file_exists: bool,
    pub timestamp: DateTime<Utc>,
}
