use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ImageSet {
    pub id: i64,
    pub source_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSetWithImages {
    pub id: i64,
    pub source_name: String,
    pub created_at: DateTime<Utc>,
    pub images: Vec<String>,
}
