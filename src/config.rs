//! Options for an annotation surface.
//!
//! The options object is small and JSON-friendly so a host can pass it
//! straight through from its own settings; every field has a default.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DISPLAY_WIDTH, hull::DEFAULT_CONCAVITY};
use crate::error::{AnnotatorError, Result};
use crate::hull::HullAlgorithm;

/// Log level setting for the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current options format version.
/// Increment this when making breaking changes to the options format.
pub const CONFIG_VERSION: u32 = 1;

/// Options accepted by [`crate::AnnotationSurface`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceOptions {
    /// Version of the options format
    #[serde(default = "default_version")]
    pub version: u32,

    /// Hull used to turn a free-hand stroke into a polygon outline
    #[serde(default, alias = "hullAlgorithm")]
    pub hull_algorithm: HullAlgorithm,

    /// On-screen width of the image in pixels; height follows the aspect ratio
    #[serde(default = "default_display_width", alias = "displayWidth")]
    pub display_width: f64,

    /// Simplification tolerance for new outlines, in drawing units (0 = off)
    #[serde(default, alias = "smoothFactor")]
    pub smooth_factor: f64,

    /// Edge length threshold of the concave hull, relative to the stroke size
    #[serde(default = "default_concavity")]
    pub concavity: f64,

    /// Assign a categorical color to every seed polygon when the seed data has none
    #[serde(default, alias = "generateMissingColors")]
    pub generate_missing_colors: bool,

    /// Log verbosity level
    #[serde(default, alias = "logLevel")]
    pub log_level: LogLevel,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_display_width() -> f64 {
    DEFAULT_DISPLAY_WIDTH
}

fn default_concavity() -> f64 {
    DEFAULT_CONCAVITY
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            hull_algorithm: HullAlgorithm::default(),
            display_width: default_display_width(),
            smooth_factor: 0.0,
            concavity: default_concavity(),
            generate_missing_colors: false,
            log_level: LogLevel::default(),
        }
    }
}

impl SurfaceOptions {
    /// Set the hull algorithm.
    pub fn with_hull_algorithm(mut self, algorithm: HullAlgorithm) -> Self {
        self.hull_algorithm = algorithm;
        self
    }

    /// Set the display width.
    pub fn with_display_width(mut self, width: f64) -> Self {
        self.display_width = width;
        self
    }

    /// Enable or disable color generation for untagged seed data.
    pub fn with_generated_colors(mut self, generate: bool) -> Self {
        self.generate_missing_colors = generate;
        self
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.version > CONFIG_VERSION {
            return Err(AnnotatorError::configuration(format!(
                "options version {} is newer than supported version {}",
                self.version, CONFIG_VERSION
            )));
        }
        if !self.display_width.is_finite() || self.display_width <= 0.0 {
            return Err(AnnotatorError::configuration(format!(
                "display_width must be positive, got {}",
                self.display_width
            )));
        }
        if !self.smooth_factor.is_finite() || self.smooth_factor < 0.0 {
            return Err(AnnotatorError::configuration(format!(
                "smooth_factor must be non-negative, got {}",
                self.smooth_factor
            )));
        }
        if !self.concavity.is_finite() || self.concavity < 0.0 {
            return Err(AnnotatorError::configuration(format!(
                "concavity must be non-negative, got {}",
                self.concavity
            )));
        }
        Ok(())
    }

    /// Serialize the options to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize and validate options from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }
}
