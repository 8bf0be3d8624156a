use bytes::Bytes;
use rand::seq::SliceRandom;
use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::models::image_set::{ImageSet, ImageSetWithImages};
use crate::models::prompt::PromptKind;
use crate::services::extraction_service::ExtractionService;
use crate::utils::time::now;

#[derive(Clone)]
pub struct ImageSetService {
    pool: SqlitePool,
    extraction: ExtractionService,
}

impl ImageSetService {
    pub fn new(pool: SqlitePool, extraction: ExtractionService) -> Self {
        Self { pool, extraction }
    }

    /// Extracts the images of one presentation and stores them as a new set of active
    /// TAT prompts. Nothing is kept when any step fails.
    pub async fn ingest_presentation(&self, source_name: &str, archive: Bytes) -> Result<ImageSetWithImages> {
        let written = self.extraction.extract(archive).await?;

        let mut tx = self.pool.begin().await?;
        let created_at = now();

        let set = sqlx::query_as::<_, ImageSet>(
            r#"
            INSERT INTO image_sets (source_name, created_at)
            VALUES (?, ?)
            RETURNING id, source_name, created_at
            "#,
        )
        .bind(source_name)
        .bind(created_at)
        .fetch_one(&mut *tx)
        .await?;

        for image in written.images() {
            sqlx::query(
                r#"
                INSERT INTO prompts (kind, payload, active, image_set_id, created_at)
                VALUES (?, ?, TRUE, ?, ?)
                "#,
            )
            .bind(PromptKind::Tat)
            .bind(&image.url)
            .bind(set.id)
            .bind(created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        let images: Vec<String> = written.keep().into_iter().map(|img| img.url).collect();

        tracing::info!(set_id = set.id, source = %source_name, images = images.len(), "image set stored");
        Ok(ImageSetWithImages {
            id: set.id,
            source_name: set.source_name,
            created_at: set.created_at,
            images,
        })
    }

    /// One set chosen uniformly among the sets that still have an active image.
    pub async fn random_set(&self) -> Result<ImageSetWithImages> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT image_set_id
            FROM prompts
            WHERE kind = ? AND active = TRUE AND image_set_id IS NOT NULL
            "#,
        )
        .bind(PromptKind::Tat)
        .fetch_all(&self.pool)
        .await?;

        let picked = {
            let mut rng = rand::thread_rng();
            ids.choose(&mut rng).copied()
        };
        let Some(id) = picked else {
            return Err(Error::NotFound("No TAT images available".to_string()));
        };
        self.get(id).await
    }

    pub async fn get(&self, id: i64) -> Result<ImageSetWithImages> {
        let set = sqlx::query_as::<_, ImageSet>(
            "SELECT id, source_name, created_at FROM image_sets WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Image set not found".to_string()))?;

        let images = self.active_images(set.id).await?;
        Ok(ImageSetWithImages {
            id: set.id,
            source_name: set.source_name,
            created_at: set.created_at,
            images,
        })
    }

    pub async fn list_sets(&self) -> Result<Vec<ImageSetWithImages>> {
        let sets = sqlx::query_as::<_, ImageSet>(
            "SELECT id, source_name, created_at FROM image_sets ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(sets.len());
        for set in sets {
            let images = self.active_images(set.id).await?;
            out.push(ImageSetWithImages {
                id: set.id,
                source_name: set.source_name,
                created_at: set.created_at,
                images,
            });
        }
        Ok(out)
    }

    async fn active_images(&self, set_id: i64) -> Result<Vec<String>> {
        let images: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT payload
            FROM prompts
            WHERE kind = ? AND image_set_id = ? AND active = TRUE
            ORDER BY id ASC
            "#,
        )
        .bind(PromptKind::Tat)
        .bind(set_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(images)
    }
}
