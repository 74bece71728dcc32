//! Area categories (floor-plan size buckets) and how they are rendered
//! into a composed prompt.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Area category
// ---------------------------------------------------------------------------

/// Floor-plan size bucket supplied by the caller on every request.
///
/// Serialized on the wire by its canonical code (e.g. `"UNDER_5"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AreaCategory {
    #[serde(rename = "UNDER_5")]
    Under5,
    #[serde(rename = "BETWEEN_6_10")]
    Between6To10,
    #[serde(rename = "BETWEEN_11_15")]
    Between11To15,
    #[serde(rename = "OVER_16")]
    Over16,
}

impl AreaCategory {
    /// Every category, smallest bucket first.
    pub const ALL: [AreaCategory; 4] = [
        Self::Under5,
        Self::Between6To10,
        Self::Between11To15,
        Self::Over16,
    ];

    /// Canonical machine value.
    pub fn code(self) -> &'static str {
        match self {
            Self::Under5 => "UNDER_5",
            Self::Between6To10 => "BETWEEN_6_10",
            Self::Between11To15 => "BETWEEN_11_15",
            Self::Over16 => "OVER_16",
        }
    }

    /// Human-readable size range.
    pub fn description(self) -> &'static str {
        match self {
            Self::Under5 => "5-pyeong (≈ 16.53 m²)",
            Self::Between6To10 => "10-pyeong (≈ 33.06 m²)",
            Self::Between11To15 => "15-pyeong (≈ 49.59 m²)",
            Self::Over16 => "20-pyeong (≈ 66.12 m²)",
        }
    }

    /// The text injected into a composed prompt for the given mode.
    pub fn label(self, mode: AreaLabelMode) -> &'static str {
        match mode {
            AreaLabelMode::Code => self.code(),
            AreaLabelMode::Description => self.description(),
        }
    }
}

impl fmt::Display for AreaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AreaCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.code() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown area category '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Label mode
// ---------------------------------------------------------------------------

/// Which rendering of [`AreaCategory`] goes into the prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AreaLabelMode {
    /// Canonical code, e.g. `UNDER_5`.
    #[default]
    Code,
    /// Human description, e.g. `5-pyeong (≈ 16.53 m²)`.
    Description,
}

impl AreaLabelMode {
    /// Parse from the `PROMPT_AREA_LABEL` setting (`code` or `description`).
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "code" => Ok(Self::Code),
            "description" => Ok(Self::Description),
            other => Err(CoreError::Validation(format!(
                "Unknown area label mode '{other}'. Must be one of: code, description"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
