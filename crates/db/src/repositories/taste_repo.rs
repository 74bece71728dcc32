//! Repository for the `tastes` table.

use houme_core::types::DbId;
use sqlx::PgPool;

/// Read access to taste (tag) fragments.
pub struct TasteRepo;

impl TasteRepo {
    pub async fn find_prompt(pool: &PgPool, id: DbId) -> Result<Option<String>, sqlx::Error> {
        let prompt: Option<Option<String>> =
            sqlx::query_scalar("SELECT taste_prompt FROM tastes WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(prompt.flatten())
    }
}
