//! Viewer configuration: TOML file plus command-line overrides.

use std::path::Path;

use anyhow::{Context, Result};
use bevy::prelude::Resource;
use lunar_grid::{NavigationConfig, RenderMode, RenderStyle};
use serde::{Deserialize, Serialize};

/// Root configuration of the viewer. Every section is optional.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
  pub window: WindowConfig,
  pub home: HomeConfig,
  pub navigation: NavigationConfig,
  pub style: RenderStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
  pub title: String,
  pub width: u32,
  pub height: u32,
  /// Vertical field of view in degrees.
  pub fov_degrees: f32,
}

impl Default for WindowConfig {
  fn default() -> Self {
    Self {
      title: "Lunar Grid Navigator".into(),
      width: 1600,
      height: 900,
      fov_degrees: 45.0,
    }
  }
}

/// Coordinate of the "home" action, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeConfig {
  pub lat: f64,
  pub lng: f64,
}

impl ViewerConfig {
  /// Load configuration from a TOML file.
  pub fn load(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path)
      .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    Self::from_toml(&content)
      .with_context(|| format!("Invalid config file: {}", path.display()))
  }

  pub fn from_toml(content: &str) -> Result<Self> {
    let config: ViewerConfig =
      toml::from_str(content).with_context(|| "Failed to parse config TOML")?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<()> {
    self
      .navigation
      .validate()
      .with_context(|| "Invalid [navigation] section")?;
    if self.window.width == 0 || self.window.height == 0 {
      anyhow::bail!(
        "window size must be non-zero, got {}x{}",
        self.window.width,
        self.window.height
      );
    }
    if !(self.window.fov_degrees > 1.0 && self.window.fov_degrees < 170.0) {
      anyhow::bail!("fov_degrees must lie in (1, 170), got {}", self.window.fov_degrees);
    }
    if !(self.home.lat.abs() <= 90.0 && self.home.lng.abs() <= 180.0) {
      anyhow::bail!("home must be a valid coordinate, got ({}, {})", self.home.lat, self.home.lng);
    }
    Ok(())
  }

  /// Apply command-line overrides, then re-validate.
  pub fn with_overrides(mut self, line_mode: bool, terminal_level: Option<u8>) -> Result<Self> {
    if line_mode {
      self.navigation = self.navigation.with_render_mode(RenderMode::Line);
    }
    if let Some(level) = terminal_level {
      self.navigation = self.navigation.with_terminal_level(level);
    }
    self.validate()?;
    Ok(self)
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
