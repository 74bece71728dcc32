//! Request vocabulary at the HTTP boundary.
//!
//! Field names have drifted across client versions (`tasteId` → `tagId`,
//! `furnitureIds` → `furnitureTagIds`, a nested `promptFurnitureListDTO`
//! wrapper). Every historical spelling is accepted here and mapped onto
//! [`PromptSelection`], so nothing past this module sees the wire names.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::area::AreaCategory;
use crate::error::CoreError;
use crate::prompt::PromptSelection;
use crate::types::DbId;

/// Longest raw prompt accepted by `POST /images/generate`.
pub const MAX_RAW_PROMPT_CHARS: usize = 32_000;

/// Body of `POST /images` and `POST /prompts/compose`.
///
/// Floor-plan and tag ids are taken as given; an id with no row composes
/// to the matching placeholder rather than failing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    #[serde(alias = "floor_plan_id")]
    pub floor_plan_id: DbId,

    #[serde(alias = "areaCategory")]
    pub equilibrium: AreaCategory,

    #[serde(alias = "tasteId", alias = "taste_id")]
    pub tag_id: DbId,

    #[serde(default, alias = "furnitureIds", alias = "furniture_ids")]
    pub furniture_tag_ids: Vec<DbId>,

    /// Legacy wrapper: `{"promptFurnitureListDTO": {"furnitureIds": [...]}}`.
    #[serde(default, rename = "promptFurnitureListDTO")]
    pub prompt_furniture_list: Option<FurnitureList>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FurnitureList {
    #[serde(rename = "furnitureIds", alias = "furnitureTagIds")]
    pub furniture_ids: Vec<DbId>,
}

impl ImageRequest {
    /// Map onto the internal vocabulary. Furniture ids from the flat field
    /// and the legacy wrapper are merged; an empty result is rejected.
    pub fn into_selection(self) -> Result<PromptSelection, CoreError> {
        let mut item_tag_ids = self.furniture_tag_ids;
        if let Some(list) = self.prompt_furniture_list {
            item_tag_ids.extend(list.furniture_ids);
        }

        PromptSelection::new(self.floor_plan_id, self.equilibrium, self.tag_id, item_tag_ids)
    }
}

/// Body of `POST /images/generate`: generate straight from caller text.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RawPromptRequest {
    #[validate(length(min = 1))]
    pub prompt: String,
}

impl RawPromptRequest {
    pub fn into_prompt(self) -> Result<String, CoreError> {
        self.validate()?;
        if self.prompt.trim().is_empty() {
            return Err(CoreError::Validation("Prompt must not be blank".into()));
        }
        if self.prompt.chars().count() > MAX_RAW_PROMPT_CHARS {
            return Err(CoreError::Validation(format!(
                "Prompt must be at most {MAX_RAW_PROMPT_CHARS} characters"
            )));
        }
        Ok(self.prompt)
    }
}

/// Response of `POST /prompts/compose`.
#[derive(Debug, Clone, Serialize)]
pub struct ComposedPrompt {
    pub prompt: String,
}
