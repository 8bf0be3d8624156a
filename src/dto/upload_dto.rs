use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::image_set::ImageSetWithImages;

#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub set_id: i64,
    pub images: Vec<String>,
}

impl From<ImageSetWithImages> for UploadResponse {
    fn from(set: ImageSetWithImages) -> Self {
        Self {
            success: true,
            message: format!("Successfully extracted {} images from PPT", set.images.len()),
            set_id: set.id,
            images: set.images,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RandomSetResponse {
    pub success: bool,
    pub set_id: i64,
    pub images: Vec<String>,
}

impl From<ImageSetWithImages> for RandomSetResponse {
    fn from(set: ImageSetWithImages) -> Self {
        Self {
            success: true,
            set_id: set.id,
            images: set.images,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageSetResponse {
    pub id: i64,
    pub source_name: String,
    pub created_at: DateTime<Utc>,
    pub images: Vec<String>,
}

impl From<ImageSetWithImages> for ImageSetResponse {
    fn from(set: ImageSetWithImages) -> Self {
        Self {
            id: set.id,
            source_name: set.source_name,
            created_at: set.created_at,
            images: set.images,
        }
    }
}
