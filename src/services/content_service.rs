use crate::error::{Error, Result};
use crate::models::prompt::{PromptKind, PromptRecord};
use crate::utils::time::now;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct ContentService {
    pool: SqlitePool,
}

/// One text of a bulk submission with the active flag it should be stored with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeEntry {
    pub text: String,
    pub active: bool,
}

impl MergeEntry {
    pub fn active(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            active: true,
        }
    }
}

/// Result of merging a batch of texts into a de-duplicated collection.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub added: Vec<PromptRecord>,
    pub skipped: usize,
}

impl ContentService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self, kind: PromptKind) -> Result<Vec<PromptRecord>> {
        let records = sqlx::query_as::<_, PromptRecord>(
            r#"
            SELECT id, kind, payload, active, image_set_id, created_at
            FROM prompts
            WHERE kind = ?
            ORDER BY id ASC
            "#,
        )
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn list_active(&self, kind: PromptKind) -> Result<Vec<PromptRecord>> {
        let records = sqlx::query_as::<_, PromptRecord>(
            r#"
            SELECT id, kind, payload, active, image_set_id, created_at
            FROM prompts
            WHERE kind = ? AND active = TRUE
            ORDER BY id ASC
            "#,
        )
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn count(&self, kind: PromptKind) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM prompts WHERE kind = ?")
            .bind(kind)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn get(&self, kind: PromptKind, id: i64) -> Result<PromptRecord> {
        sqlx::query_as::<_, PromptRecord>(
            r#"
            SELECT id, kind, payload, active, image_set_id, created_at
            FROM prompts
            WHERE id = ? AND kind = ?
            "#,
        )
        .bind(id)
        .bind(kind)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Content not found".to_string()))
    }

    /// Inserts one record. A repeated word or scenario is rejected as a duplicate.
    pub async fn create(&self, kind: PromptKind, payload: &str, active: bool) -> Result<PromptRecord> {
        let payload = normalize(payload)
            .ok_or_else(|| Error::BadRequest("Content must not be empty".to_string()))?;

        let record = sqlx::query_as::<_, PromptRecord>(
            r#"
            INSERT INTO prompts (kind, payload, active, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, kind, payload, active, image_set_id, created_at
            "#,
        )
        .bind(kind)
        .bind(payload)
        .bind(active)
        .bind(now())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(kind = %kind, id = record.id, "content created");
        Ok(record)
    }

    /// Adds every new text as active; see [`ContentService::merge_entries`].
    pub async fn merge_texts<I, S>(&self, kind: PromptKind, texts: I) -> Result<MergeOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.merge_entries(
            kind,
            texts.into_iter().map(|text| MergeEntry::active(text.as_ref())),
        )
        .await
    }

    /// Adds every new entry in one transaction; texts already stored (exact, case-sensitive
    /// match) and repeats within the batch are skipped.
    pub async fn merge_entries<I>(&self, kind: PromptKind, entries: I) -> Result<MergeOutcome>
    where
        I: IntoIterator<Item = MergeEntry>,
    {
        let mut tx = self.pool.begin().await?;
        let mut added = Vec::new();
        let mut skipped = 0usize;
        let created_at = now();

        for entry in entries {
            let Some(payload) = normalize(&entry.text) else {
                skipped += 1;
                continue;
            };

            let inserted = sqlx::query_as::<_, PromptRecord>(
                r#"
                INSERT OR IGNORE INTO prompts (kind, payload, active, created_at)
                VALUES (?, ?, ?, ?)
                RETURNING id, kind, payload, active, image_set_id, created_at
                "#,
            )
            .bind(kind)
            .bind(payload)
            .bind(entry.active)
            .bind(created_at)
            .fetch_optional(&mut *tx)
            .await?;

            match inserted {
                Some(record) => added.push(record),
                None => skipped += 1,
            }
        }

        tx.commit().await?;

        tracing::info!(kind = %kind, added = added.len(), skipped, "merged content batch");
        Ok(MergeOutcome { added, skipped })
    }

    pub async fn set_active(&self, kind: PromptKind, id: i64, active: bool) -> Result<PromptRecord> {
        sqlx::query_as::<_, PromptRecord>(
            r#"
            UPDATE prompts
            SET active = ?
            WHERE id = ? AND kind = ?
            RETURNING id, kind, payload, active, image_set_id, created_at
            "#,
        )
        .bind(active)
        .bind(id)
        .bind(kind)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Content not found".to_string()))
    }

    pub async fn delete(&self, kind: PromptKind, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM prompts WHERE id = ? AND kind = ?")
            .bind(id)
            .bind(kind)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Content not found".to_string()));
        }

        tracing::info!(kind = %kind, id, "content deleted");
        Ok(())
    }
}

fn normalize(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
