//! Image generation settings.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use houme_core::error::CoreError;
use serde::Serialize;

/// Default API host; the generation path is appended to it.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default client timeout. Generation routinely takes over a minute.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

// ---------------------------------------------------------------------------
// Enumerated parameters
// ---------------------------------------------------------------------------

/// Which response field carries the image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Inline base64 in `data[0].b64_json`.
    #[default]
    B64Json,
    /// A link in `data[0].url`, fetched with one extra GET.
    Url,
}

impl FromStr for OutputFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "b64_json" => Ok(Self::B64Json),
            "url" => Ok(Self::Url),
            other => Err(CoreError::Validation(format!(
                "Unknown output format '{other}'. Must be one of: b64_json, url"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    Low,
    #[default]
    Medium,
    High,
    Auto,
    Standard,
    Hd,
}

impl FromStr for ImageQuality {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "auto" => Ok(Self::Auto),
            "standard" => Ok(Self::Standard),
            "hd" => Ok(Self::Hd),
            other => Err(CoreError::Validation(format!(
                "Unknown image quality '{other}'. Must be one of: low, medium, high, auto, standard, hd"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageBackground {
    #[default]
    Auto,
    Transparent,
    Opaque,
}

impl FromStr for ImageBackground {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "transparent" => Ok(Self::Transparent),
            "opaque" => Ok(Self::Opaque),
            other => Err(CoreError::Validation(format!(
                "Unknown image background '{other}'. Must be one of: auto, transparent, opaque"
            ))),
        }
    }
}

/// Requested output size, sent as `"WxH"` or `"auto"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Auto,
    Fixed { width: u32, height: u32 },
}

impl Default for ImageSize {
    fn default() -> Self {
        // 3:2 landscape suits floor-plan renders.
        Self::Fixed {
            width: 1536,
            height: 1024,
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Fixed { width, height } => write!(f, "{width}x{height}"),
        }
    }
}

impl FromStr for ImageSize {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "auto" {
            return Ok(Self::Auto);
        }
        let invalid = || CoreError::Validation(format!("Invalid image size '{s}'. Expected WxH"));
        let (w, h) = s.split_once('x').ok_or_else(invalid)?;
        let width: u32 = w.parse().map_err(|_| invalid())?;
        let height: u32 = h.parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self::Fixed { width, height })
    }
}

impl Serialize for ImageSize {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Parameters for every generation call. Fixed for the process lifetime.
#[derive(Clone)]
pub struct ImageGenConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub n: u32,
    pub size: ImageSize,
    pub quality: ImageQuality,
    pub background: ImageBackground,
    pub output_format: OutputFormat,
    pub timeout: Duration,
}

impl fmt::Debug for ImageGenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageGenConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("n", &self.n)
            .field("size", &self.size)
            .field("quality", &self.quality)
            .field("background", &self.background)
            .field("output_format", &self.output_format)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ImageGenConfig {
    /// Config with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: "gpt-image-1".to_string(),
            n: 1,
            size: ImageSize::default(),
            quality: ImageQuality::default(),
            background: ImageBackground::default(),
            output_format: OutputFormat::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var                      | Default                  |
    /// |------------------------------|--------------------------|
    /// | `OPENAI_API_KEY`             | required                 |
    /// | `OPENAI_BASE_URL`            | `https://api.openai.com` |
    /// | `OPENAI_IMAGE_MODEL`         | `gpt-image-1`            |
    /// | `OPENAI_IMAGE_N`             | `1`                      |
    /// | `OPENAI_IMAGE_SIZE`          | `1536x1024`              |
    /// | `OPENAI_IMAGE_QUALITY`       | `medium`                 |
    /// | `OPENAI_IMAGE_BACKGROUND`    | `auto`                   |
    /// | `OPENAI_IMAGE_OUTPUT_FORMAT` | `b64_json`               |
    /// | `OPENAI_IMAGE_TIMEOUT_SECS`  | `120`                    |
    pub fn from_env() -> Result<Self, CoreError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| CoreError::Validation("OPENAI_API_KEY must be set".into()))?;

        let mut config = Self::new(api_key);

        if let Some(base_url) = env_opt("OPENAI_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(model) = env_opt("OPENAI_IMAGE_MODEL") {
            config.model = model;
        }
        if let Some(n) = env_opt("OPENAI_IMAGE_N") {
            config.n = n
                .parse()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(|| CoreError::Validation("OPENAI_IMAGE_N must be >= 1".into()))?;
        }
        if let Some(size) = env_opt("OPENAI_IMAGE_SIZE") {
            config.size = size.parse()?;
        }
        if let Some(quality) = env_opt("OPENAI_IMAGE_QUALITY") {
            config.quality = quality.parse()?;
        }
        if let Some(background) = env_opt("OPENAI_IMAGE_BACKGROUND") {
            config.background = background.parse()?;
        }
        if let Some(format) = env_opt("OPENAI_IMAGE_OUTPUT_FORMAT") {
            config.output_format = format.parse()?;
        }
        if let Some(secs) = env_opt("OPENAI_IMAGE_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                CoreError::Validation("OPENAI_IMAGE_TIMEOUT_SECS must be a valid u64".into())
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Full URL of the generation endpoint.
    pub fn generations_url(&self) -> String {
        format!("{}/v1/images/generations", self.base_url)
    }
}

/// Read an env var, treating unset and blank the same.
fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
