//! Host supplied configuration

use crate::error::{AssemblerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Content the host renders in fixed places of the widget
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSlots {
    /// Shown in the drop zone while previews load
    pub loading: Option<String>,
    /// Shown in the drop zone when idle
    pub dropzone_placeholder: Option<String>,
    /// Shown above the page strip
    pub uploaded_pages_heading: Option<String>,
}

/// Options for the assembler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    /// Resolution hint passed to the preview service
    pub preview_resolution: u32,
    /// Total height of the page strip
    pub preview_area_height: f64,
    /// Padding around the page strip
    pub preview_area_padding: f64,
    /// Horizontal gap between thumbnails
    pub preview_spacing: f64,
    /// Height reserved for the horizontal scrollbar
    pub scrollbar_height: f64,
    /// Height reserved for per-page controls below the thumbnails
    pub preview_controls_height: f64,
    /// Delay between mounting new pages hidden and revealing them
    pub reveal_delay_ms: u64,
    /// Exit animation length before a removed page is purged
    pub removal_delay_ms: u64,
    pub slots: ContentSlots,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            preview_resolution: 100,
            preview_area_height: 240.0,
            preview_area_padding: 16.0,
            preview_spacing: 24.0,
            scrollbar_height: 12.0,
            preview_controls_height: 0.0,
            reveal_delay_ms: 10,
            removal_delay_ms: 300,
            slots: ContentSlots::default(),
        }
    }
}

impl AssemblerConfig {
    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Set the preview resolution hint
    pub fn with_preview_resolution(mut self, resolution: u32) -> Self {
        self.preview_resolution = resolution;
        self
    }

    /// Set the page strip height
    pub fn with_preview_area_height(mut self, height: f64) -> Self {
        self.preview_area_height = height;
        self
    }

    /// Set the page strip padding
    pub fn with_preview_area_padding(mut self, padding: f64) -> Self {
        self.preview_area_padding = padding;
        self
    }

    /// Set the gap between thumbnails
    pub fn with_preview_spacing(mut self, spacing: f64) -> Self {
        self.preview_spacing = spacing;
        self
    }

    pub fn with_scrollbar_height(mut self, height: f64) -> Self {
        self.scrollbar_height = height;
        self
    }

    pub fn with_preview_controls_height(mut self, height: f64) -> Self {
        self.preview_controls_height = height;
        self
    }

    /// Set both animation delays
    pub fn with_delays(mut self, reveal: Duration, removal: Duration) -> Self {
        self.reveal_delay_ms = reveal.as_millis() as u64;
        self.removal_delay_ms = removal.as_millis() as u64;
        self
    }

    pub fn with_slots(mut self, slots: ContentSlots) -> Self {
        self.slots = slots;
        self
    }

    /// Height thumbnails are scaled to: the strip minus padding, scrollbar and controls
    pub fn inner_area_height(&self) -> f64 {
        (self.preview_area_height
            - self.preview_area_padding * 2.0
            - self.scrollbar_height
            - self.preview_controls_height)
            .max(0.0)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn removal_delay(&self) -> Duration {
        Duration::from_millis(self.removal_delay_ms)
    }

    /// Reject negative or non-finite measurements
    pub fn validate(&self) -> Result<()> {
        let measurements = [
            ("preview_area_height", self.preview_area_height),
            ("preview_area_padding", self.preview_area_padding),
            ("preview_spacing", self.preview_spacing),
            ("scrollbar_height", self.scrollbar_height),
            ("preview_controls_height", self.preview_controls_height),
        ];

        for (name, value) in measurements {
            if !value.is_finite() || value < 0.0 {
                return Err(AssemblerError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if self.preview_resolution == 0 {
            return Err(AssemblerError::Config(
                "preview_resolution must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
