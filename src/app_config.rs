use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::emitters::color::Color;
use crate::errors::AppError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Emitter settings shared by every output format
    #[serde(default)]
    pub render: RenderConfig,

    /// Batch processing settings
    #[serde(default)]
    pub batch: BatchConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Resolved presentation settings handed to every emitter
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    // @field: Font name or path to a TrueType/OpenType file
    #[serde(default = "default_font")]
    pub font: String,

    // @field: Base text size in px
    #[serde(default = "default_base_font_size")]
    pub base_font_size: u32,

    // @field: Reading (furigana) size in px
    #[serde(default = "default_reading_font_size")]
    pub reading_font_size: u32,

    // @field: Distance between the bottom of the canvas and the base text row
    #[serde(default = "default_vertical_margin")]
    pub vertical_margin: u32,

    // @field: Fill colour, a name or #RRGGBB[AA]
    #[serde(default = "default_text_color")]
    pub text_color: String,

    // @field: Outline colour
    #[serde(default = "default_stroke_color")]
    pub stroke_color: String,

    // @field: Outline width in px
    #[serde(default = "default_stroke_width")]
    pub stroke_width: u32,

    // @field: Timeline frames per second
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,

    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font: default_font(),
            base_font_size: default_base_font_size(),
            reading_font_size: default_reading_font_size(),
            vertical_margin: default_vertical_margin(),
            text_color: default_text_color(),
            stroke_color: default_stroke_color(),
            stroke_width: default_stroke_width(),
            frame_rate: default_frame_rate(),
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
        }
    }
}

impl RenderConfig {
    /// Parsed fill colour
    pub fn text_rgba(&self) -> Result<Color> {
        Color::parse(&self.text_color)
    }

    /// Parsed outline colour
    pub fn stroke_rgba(&self) -> Result<Color> {
        Color::parse(&self.stroke_color)
    }

    /// Font family name as written into style headers
    ///
    /// A path such as `fonts/NotoSansJP.ttf` yields `NotoSansJP`.
    pub fn font_family(&self) -> String {
        Path::new(&self.font)
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| self.font.clone())
    }
}

/// Configuration for batch runs
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BatchConfig {
    /// Maximum number of conversions running at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_font() -> String {
    "Arial".to_string()
}

fn default_base_font_size() -> u32 {
    48
}

fn default_reading_font_size() -> u32 {
    24
}

fn default_vertical_margin() -> u32 {
    100
}

fn default_text_color() -> String {
    "black".to_string()
}

fn default_stroke_color() -> String {
    "white".to_string()
}

fn default_stroke_width() -> u32 {
    2
}

fn default_frame_rate() -> u32 {
    24
}

fn default_canvas_width() -> u32 {
    1920
}

fn default_canvas_height() -> u32 {
    1080
}

fn default_concurrency() -> usize {
    4
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        let render = &self.render;

        if render.font.trim().is_empty() {
            return Err(AppError::Config("A font name or path is required".to_string()));
        }

        if render.base_font_size == 0 || render.reading_font_size == 0 {
            return Err(AppError::Config(format!(
                "Font sizes must be positive (base: {}, reading: {})",
                render.base_font_size, render.reading_font_size
            )));
        }

        if render.frame_rate == 0 {
            return Err(AppError::Config("Frame rate must be positive".to_string()));
        }

        if render.canvas_width == 0 || render.canvas_height == 0 {
            return Err(AppError::Config(format!(
                "Canvas dimensions must be positive ({}x{})",
                render.canvas_width, render.canvas_height
            )));
        }

        if render.vertical_margin > render.canvas_height {
            return Err(AppError::Config(format!(
                "Vertical margin {} exceeds canvas height {}",
                render.vertical_margin, render.canvas_height
            )));
        }

        render.text_rgba().map_err(|e| AppError::Config(e.to_string()))?;
        render.stroke_rgba().map_err(|e| AppError::Config(e.to_string()))?;

        if self.batch.concurrency == 0 {
            return Err(AppError::Config("Batch concurrency must be at least 1".to_string()));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            render: RenderConfig::default(),
            batch: BatchConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
