//! Prompt composition.
//!
//! A composed prompt is four newline-separated segments in a fixed order:
//! floor plan, area category, tag (mood board), furniture. The image
//! generator receives exactly this string, so the order is a wire contract.

use crate::area::{AreaCategory, AreaLabelMode};
use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Placeholders
// ---------------------------------------------------------------------------

/// Substituted when the floor-plan row is missing or empty.
pub const FLOOR_PLAN_PLACEHOLDER: &str = "도면 프롬프트가 존재하지 않습니다";

/// Substituted when the tag (taste) row is missing or empty.
pub const TAG_PLACEHOLDER: &str = "무드보드 프롬프트가 존재하지 않습니다";

/// Separator between prompt segments and between furniture fragments.
pub const SEGMENT_SEPARATOR: &str = "\n";

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// The identifiers one composition request is built from.
///
/// Constructed through [`PromptSelection::new`], which guarantees that
/// `item_tag_ids` is non-empty, ascending and free of duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSelection {
    pub floor_plan_id: DbId,
    pub area: AreaCategory,
    pub category_tag_id: DbId,
    item_tag_ids: Vec<DbId>,
}

impl PromptSelection {
    pub fn new(
        floor_plan_id: DbId,
        area: AreaCategory,
        category_tag_id: DbId,
        mut item_tag_ids: Vec<DbId>,
    ) -> Result<Self, CoreError> {
        if item_tag_ids.is_empty() {
            return Err(CoreError::Validation(
                "At least one furniture id is required".into(),
            ));
        }
        item_tag_ids.sort_unstable();
        item_tag_ids.dedup();

        Ok(Self {
            floor_plan_id,
            area,
            category_tag_id,
            item_tag_ids,
        })
    }

    /// Furniture ids in ascending order.
    pub fn item_tag_ids(&self) -> &[DbId] {
        &self.item_tag_ids
    }
}

// ---------------------------------------------------------------------------
// Fragments
// ---------------------------------------------------------------------------

/// The three resolved text fragments for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptFragments {
    pub floor_plan: String,
    pub tag: String,
    /// Furniture texts already joined in ascending id order.
    pub furniture: String,
}

/// Resolve a single-row lookup, falling back to `placeholder` when the row
/// is absent or its text is empty.
pub fn resolve_fragment(text: Option<String>, placeholder: &str) -> String {
    match text {
        Some(t) if !t.is_empty() => t,
        _ => placeholder.to_string(),
    }
}

/// Join furniture texts, already ordered by ascending id. No rows yields an
/// empty string.
pub fn join_furniture<S: AsRef<str>>(texts: &[S]) -> String {
    texts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(SEGMENT_SEPARATOR)
}

// ---------------------------------------------------------------------------
// Composer
// ---------------------------------------------------------------------------

/// Join the four segments in their fixed order.
pub fn compose_prompt(floor_plan: &str, area_label: &str, tag: &str, furniture: &str) -> String {
    [floor_plan, area_label, tag, furniture].join(SEGMENT_SEPARATOR)
}

/// Compose from resolved fragments and the caller's area category.
pub fn compose_from_fragments(
    fragments: &PromptFragments,
    area: AreaCategory,
    mode: AreaLabelMode,
) -> String {
    compose_prompt(
        &fragments.floor_plan,
        area.label(mode),
        &fragments.tag,
        &fragments.furniture,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
