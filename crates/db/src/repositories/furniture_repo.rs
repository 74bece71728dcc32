//! Repository for the `furnitures` table.

use houme_core::types::DbId;
use sqlx::PgPool;

/// Read access to furniture fragments.
pub struct FurnitureRepo;

impl FurnitureRepo {
    /// Prompt texts for `ids`, ascending by id. Missing rows and NULL
    /// prompts are skipped.
    pub async fn list_prompts(pool: &PgPool, ids: &[DbId]) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT furniture_prompt FROM furnitures
             WHERE id = ANY($1) AND furniture_prompt IS NOT NULL
             ORDER BY id ASC",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }
}
