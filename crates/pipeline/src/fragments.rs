//! Fragment lookups feeding the prompt composer.

use async_trait::async_trait;
use houme_core::prompt::{
    join_furniture, resolve_fragment, PromptFragments, PromptSelection, FLOOR_PLAN_PLACEHOLDER,
    TAG_PLACEHOLDER,
};
use houme_core::types::DbId;
use houme_db::repositories::{FloorPlanRepo, FurnitureRepo, TasteRepo};
use houme_db::DbPool;

/// Read access to the three fragment tables.
#[async_trait]
pub trait FragmentSource: Send + Sync {
    /// Floor-plan text, `None` when the row or its text is absent.
    async fn floor_plan_prompt(&self, id: DbId) -> Result<Option<String>, sqlx::Error>;

    /// Tag (mood board) text, `None` when the row or its text is absent.
    async fn tag_prompt(&self, id: DbId) -> Result<Option<String>, sqlx::Error>;

    /// Furniture texts of the matching rows in ascending id order. Unknown
    /// ids are skipped.
    async fn furniture_prompts(&self, ids: &[DbId]) -> Result<Vec<String>, sqlx::Error>;
}

/// [`FragmentSource`] backed by the Postgres repositories.
#[derive(Clone)]
pub struct PgFragmentSource {
    pool: DbPool,
}

impl PgFragmentSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FragmentSource for PgFragmentSource {
    async fn floor_plan_prompt(&self, id: DbId) -> Result<Option<String>, sqlx::Error> {
        FloorPlanRepo::find_prompt(&self.pool, id).await
    }

    async fn tag_prompt(&self, id: DbId) -> Result<Option<String>, sqlx::Error> {
        TasteRepo::find_prompt(&self.pool, id).await
    }

    async fn furniture_prompts(&self, ids: &[DbId]) -> Result<Vec<String>, sqlx::Error> {
        FurnitureRepo::list_prompts(&self.pool, ids).await
    }
}

/// Read all fragments for `selection` concurrently and resolve missing
/// single rows to their placeholders.
pub async fn fetch_fragments(
    source: &dyn FragmentSource,
    selection: &PromptSelection,
) -> Result<PromptFragments, sqlx::Error> {
    let (floor_plan, tag, furniture) = tokio::try_join!(
        source.floor_plan_prompt(selection.floor_plan_id),
        source.tag_prompt(selection.category_tag_id),
        source.furniture_prompts(selection.item_tag_ids()),
    )?;

    if floor_plan.as_deref().map_or(true, str::is_empty) {
        tracing::debug!(
            floor_plan_id = selection.floor_plan_id,
            "Floor plan prompt missing, using placeholder"
        );
    }
    if tag.as_deref().map_or(true, str::is_empty) {
        tracing::debug!(
            tag_id = selection.category_tag_id,
            "Tag prompt missing, using placeholder"
        );
    }
    if furniture.len() < selection.item_tag_ids().len() {
        tracing::debug!(
            requested = selection.item_tag_ids().len(),
            found = furniture.len(),
            "Some furniture prompts missing"
        );
    }

    Ok(PromptFragments {
        floor_plan: resolve_fragment(floor_plan, FLOOR_PLAN_PLACEHOLDER),
        tag: resolve_fragment(tag, TAG_PLACEHOLDER),
        furniture: join_furniture(&furniture),
    })
}
