//! Generation options and display preferences.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Art Style
// ============================================================================

/// Visual style requested for ASCII art.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtStyle {
    /// Balanced line art.
    #[default]
    Classic,
    /// Few characters, lots of whitespace.
    Minimal,
    /// Heavy shading with dense characters.
    Dense,
}

impl ArtStyle {
    /// Returns the stable token used in settings and cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Minimal => "minimal",
            Self::Dense => "dense",
        }
    }

    /// Phrase appended to the art prompt.
    pub fn prompt_hint(&self) -> &'static str {
        match self {
            Self::Classic => "Use clean line art with a balanced mix of characters.",
            Self::Minimal => "Keep it minimal: very few characters and plenty of whitespace.",
            Self::Dense => "Use dense shading characters such as #, @, % and = for texture.",
        }
    }

    /// Returns all styles.
    pub fn all() -> &'static [ArtStyle] {
        &[Self::Classic, Self::Minimal, Self::Dense]
    }
}

impl fmt::Display for ArtStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtStyle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|style| style.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::InvalidOption(format!("unknown art style: {s}")))
    }
}

// ============================================================================
// Image Style
// ============================================================================

/// Visual style requested for the illustrative image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStyle {
    /// Encyclopedia-style illustration.
    #[default]
    Illustration,
    /// Photorealistic.
    Photo,
    /// Labelled technical diagram.
    Diagram,
    /// Soft watercolor painting.
    Watercolor,
}

impl ImageStyle {
    /// Returns the stable token used in settings and cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Illustration => "illustration",
            Self::Photo => "photo",
            Self::Diagram => "diagram",
            Self::Watercolor => "watercolor",
        }
    }

    /// Phrase used in the image prompt.
    pub fn prompt_hint(&self) -> &'static str {
        match self {
            Self::Illustration => "a clean, detailed encyclopedia illustration",
            Self::Photo => "a photorealistic, well-lit photograph",
            Self::Diagram => "a clear explanatory diagram on a plain background",
            Self::Watercolor => "a soft watercolor painting",
        }
    }

    /// Returns all styles.
    pub fn all() -> &'static [ImageStyle] {
        &[Self::Illustration, Self::Photo, Self::Diagram, Self::Watercolor]
    }
}

impl fmt::Display for ImageStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageStyle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|style| style.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::InvalidOption(format!("unknown image style: {s}")))
    }
}

// ============================================================================
// Aspect Ratio
// ============================================================================

/// Image aspect ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 1:1
    #[default]
    #[serde(rename = "1:1")]
    Square,
    /// 4:3
    #[serde(rename = "4:3")]
    Landscape,
    /// 3:4
    #[serde(rename = "3:4")]
    Portrait,
    /// 16:9
    #[serde(rename = "16:9")]
    Wide,
    /// 9:16
    #[serde(rename = "9:16")]
    Tall,
}

impl AspectRatio {
    /// Returns the ratio as `W:H`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape => "4:3",
            Self::Portrait => "3:4",
            Self::Wide => "16:9",
            Self::Tall => "9:16",
        }
    }

    /// Returns all ratios.
    pub fn all() -> &'static [AspectRatio] {
        &[Self::Square, Self::Landscape, Self::Portrait, Self::Wide, Self::Tall]
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|ratio| ratio.as_str() == s.trim())
            .ok_or_else(|| CoreError::InvalidOption(format!("unknown aspect ratio: {s}")))
    }
}

// ============================================================================
// Image Options
// ============================================================================

/// Parameters for image generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageOptions {
    /// Visual style.
    pub style: ImageStyle,
    /// Aspect ratio.
    pub aspect_ratio: AspectRatio,
}

// ============================================================================
// Theme
// ============================================================================

/// Display theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background.
    Light,
    /// Dark background.
    #[default]
    Dark,
}

impl Theme {
    /// Returns the stored token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Returns the other theme.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(CoreError::InvalidOption(format!("unknown theme: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_styles() {
        assert_eq!("Minimal".parse::<ArtStyle>().unwrap(), ArtStyle::Minimal);
        assert_eq!("diagram".parse::<ImageStyle>().unwrap(), ImageStyle::Diagram);
        assert!("sketchy".parse::<ArtStyle>().is_err());
    }

    #[test]
    fn test_aspect_ratio_serde() {
        let json = serde_json::to_string(&AspectRatio::Wide).unwrap();
        assert_eq!(json, "\"16:9\"");
        assert_eq!("9:16".parse::<AspectRatio>().unwrap(), AspectRatio::Tall);
    }

    #[test]
    fn test_image_options_default_fields() {
        let options: ImageOptions = serde_json::from_str(r#"{"style":"photo"}"#).unwrap();
        assert_eq!(options.style, ImageStyle::Photo);
        assert_eq!(options.aspect_ratio, AspectRatio::Square);
    }

    #[test]
    fn test_theme_tokens() {
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert!("Light ".parse::<Theme>().is_err());
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
