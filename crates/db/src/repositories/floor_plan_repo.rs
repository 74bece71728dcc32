//! Repository for the `floor_plans` table.

use houme_core::types::DbId;
use sqlx::PgPool;

/// Read access to floor plan fragments.
pub struct FloorPlanRepo;

impl FloorPlanRepo {
    /// Fetch only the prompt text. `None` when the row is missing or the
    /// column is NULL.
    pub async fn find_prompt(pool: &PgPool, id: DbId) -> Result<Option<String>, sqlx::Error> {
        let prompt: Option<Option<String>> =
            sqlx::query_scalar("SELECT floor_plan_prompt FROM floor_plans WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(prompt.flatten())
    }
}
