//! Processor configuration entity
//!
//! Describes how product images are normalised: target canvas, encoder
//! settings, which pipeline stages run, and canvas fill colours.

use serde::{Deserialize, Serialize};

use super::color::HexColor;

/// Target canvas size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 1200,
        }
    }
}

/// Encoded output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    Webp,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Jpeg => write!(f, "JPEG"),
            OutputFormat::Png => write!(f, "PNG"),
            OutputFormat::Webp => write!(f, "WEBP"),
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OutputFormat> for String {
    fn from(format: OutputFormat) -> Self {
        format.to_string()
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "JPEG" | "JPG" => Ok(OutputFormat::Jpeg),
            "PNG" => Ok(OutputFormat::Png),
            "WEBP" => Ok(OutputFormat::Webp),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Pipeline stage switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Operations {
    pub resize: bool,
    pub remove_background: bool,
    pub enhance: bool,
    /// Carried through configuration; no watermark stage is drawn.
    pub watermark: bool,
}

impl Default for Operations {
    fn default() -> Self {
        Self {
            resize: true,
            remove_background: false,
            enhance: true,
            watermark: false,
        }
    }
}

impl Operations {
    /// Apply the stage toggles submitted with an upload form.
    ///
    /// Form checkboxes only exist for resize, background removal and
    /// enhancement; watermark keeps its configured value.
    pub fn with_toggles(self, toggles: StageToggles) -> Self {
        Self {
            resize: toggles.resize,
            remove_background: toggles.remove_background,
            enhance: toggles.enhance,
            watermark: self.watermark,
        }
    }
}

/// Stage toggles as submitted by the upload form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageToggles {
    pub resize: bool,
    pub remove_background: bool,
    pub enhance: bool,
}

/// Canvas fill settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Backgrounds {
    /// Fill for resize padding and removed backdrops
    pub default_color: HexColor,
    /// Carried through configuration; fills are always solid.
    pub gradient: bool,
    /// Max per-channel distance from the backdrop colour that still counts as backdrop
    pub key_tolerance: u8,
}

impl Default for Backgrounds {
    fn default() -> Self {
        Self {
            default_color: HexColor::WHITE,
            gradient: false,
            key_tolerance: 32,
        }
    }
}

/// Full processor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub dimensions: Dimensions,
    pub output_format: OutputFormat,
    pub quality: u8,
    pub operations: Operations,
    pub backgrounds: Backgrounds,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            dimensions: Dimensions::default(),
            output_format: OutputFormat::Jpeg,
            quality: 95,
            operations: Operations::default(),
            backgrounds: Backgrounds::default(),
        }
    }
}

impl ProcessorConfig {
    /// Check value ranges serde cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.dimensions.width == 0 || self.dimensions.height == 0 {
            return Err(format!(
                "dimensions must be non-zero, got {}x{}",
                self.dimensions.width, self.dimensions.height
            ));
        }
        if !(1..=100).contains(&self.quality) {
            return Err(format!("quality must be in 1..=100, got {}", self.quality));
        }
        Ok(())
    }
}
