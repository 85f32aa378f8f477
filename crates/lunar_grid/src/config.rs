//! NavigationConfig - sphere dimensions, level ladder, flight timing and
//! camera heights.

use std::time::Duration;

use thiserror::Error;

use crate::constants::*;
use crate::render::RenderMode;

/// Errors reported by [`NavigationConfig::validate`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
  #[error("sphere radius must be positive and finite, got {0}")]
  InvalidRadius(f64),
  #[error("grid altitude must be non-negative and finite, got {0}")]
  InvalidAltitude(f64),
  #[error("level step must be at least 1")]
  ZeroLevelStep,
  #[error("terminal level {terminal} must lie in {min}..={max}")]
  TerminalLevelOutOfRange { terminal: u8, min: u8, max: u8 },
  #[error("flight duration must be positive, got {0}s")]
  InvalidFlightDuration(f64),
  #[error("mid-flight fraction must lie in (0, 1], got {0}")]
  InvalidMidFlightFraction(f64),
  #[error("fill inset ratio must lie in (0, 1), got {0}")]
  InvalidInsetRatio(f64),
  #[error("line width must be positive, got {0}")]
  InvalidLineWidth(f64),
  #[error("grid polylines need at least one segment per edge")]
  ZeroArcSegments,
  #[error("{name} camera height must be positive, got {value}")]
  InvalidHeight { name: &'static str, value: f64 },
  #[error("zoom table must contain at least one height")]
  EmptyZoomTable,
}

/// Camera heights above the mean surface, picked by the level of the flight
/// target.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HeightBuckets {
  /// Whole-globe framing (level 0).
  pub global: f64,
  /// Levels up to one step.
  pub regional: f64,
  /// Levels up to two steps.
  pub local: f64,
  /// Levels up to three steps and anything short of terminal.
  pub close: f64,
  /// Terminal margin above sampled terrain.
  pub terminal: f64,
}

impl Default for HeightBuckets {
  fn default() -> Self {
    Self {
      global: GLOBAL_HEIGHT_M,
      regional: REGIONAL_HEIGHT_M,
      local: LOCAL_HEIGHT_M,
      close: CLOSE_HEIGHT_M,
      terminal: TERMINAL_HEIGHT_M,
    }
  }
}

impl HeightBuckets {
  fn as_array(&self) -> [(&'static str, f64); 5] {
    [
      ("global", self.global),
      ("regional", self.regional),
      ("local", self.local),
      ("close", self.close),
      ("terminal", self.terminal),
    ]
  }
}

/// Configuration for one navigation session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavigationConfig {
  /// Sphere radius in meters.
  pub sphere_radius: f64,
  /// Grid/picking shell height above the sphere, in meters.
  pub grid_altitude: f64,
  /// Levels advanced by one drill.
  pub level_step: u8,
  /// Deepest selectable level.
  pub terminal_level: u8,
  /// Wall-clock flight duration in seconds.
  pub flight_duration_secs: f64,
  /// Progress at which the mid-flight hook fires.
  pub mid_flight_fraction: f64,
  /// Defer the active-layer redraw of a drill to mid-flight.
  pub stagger_active_layer: bool,
  /// Level-bucketed flight heights.
  pub heights: HeightBuckets,
  /// Heights selectable with zoom commands, outermost first.
  pub zoom_heights: Vec<f64>,
  /// Fill-mode shrink toward the cell center.
  pub fill_inset_ratio: f64,
  /// Line-mode ring width in meters.
  pub line_width_m: f64,
  /// Screen width of the base-grid polylines.
  pub grid_line_width: f32,
  /// Segments per edge for grid polylines.
  pub arc_segments: usize,
  /// Render mode at session start.
  pub render_mode: RenderMode,
}

impl Default for NavigationConfig {
  fn default() -> Self {
    let heights = HeightBuckets::default();
    Self {
      sphere_radius: MOON_RADIUS_M,
      grid_altitude: DEFAULT_GRID_ALTITUDE_M,
      level_step: LEVEL_STEP,
      terminal_level: DEFAULT_TERMINAL_LEVEL,
      flight_duration_secs: DEFAULT_FLIGHT_SECS,
      mid_flight_fraction: DEFAULT_MID_FLIGHT_FRACTION,
      stagger_active_layer: true,
      zoom_heights: vec![
        heights.global,
        heights.regional,
        heights.local,
        heights.close,
        heights.terminal,
      ],
      heights,
      fill_inset_ratio: FILL_INSET_RATIO,
      line_width_m: DEFAULT_LINE_WIDTH_M,
      grid_line_width: DEFAULT_GRID_LINE_WIDTH,
      arc_segments: DEFAULT_ARC_SEGMENTS,
      render_mode: RenderMode::default(),
    }
  }
}

impl NavigationConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_sphere_radius(mut self, radius: f64) -> Self {
    self.sphere_radius = radius;
    self
  }

  pub fn with_grid_altitude(mut self, altitude: f64) -> Self {
    self.grid_altitude = altitude;
    self
  }

  pub fn with_terminal_level(mut self, level: u8) -> Self {
    self.terminal_level = level;
    self
  }

  pub fn with_flight_duration(mut self, secs: f64) -> Self {
    self.flight_duration_secs = secs;
    self
  }

  pub fn with_stagger_active_layer(mut self, stagger: bool) -> Self {
    self.stagger_active_layer = stagger;
    self
  }

  pub fn with_render_mode(mut self, mode: RenderMode) -> Self {
    self.render_mode = mode;
    self
  }

  pub fn with_line_width(mut self, meters: f64) -> Self {
    self.line_width_m = meters;
    self
  }

  /// Check every value; the navigator refuses to start on an invalid config.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if !(self.sphere_radius.is_finite() && self.sphere_radius > 0.0) {
      return Err(ConfigError::InvalidRadius(self.sphere_radius));
    }
    if !(self.grid_altitude.is_finite() && self.grid_altitude >= 0.0) {
      return Err(ConfigError::InvalidAltitude(self.grid_altitude));
    }
    if self.level_step == 0 {
      return Err(ConfigError::ZeroLevelStep);
    }
    if self.terminal_level < self.level_step || self.terminal_level > MAX_CELL_LEVEL {
      return Err(ConfigError::TerminalLevelOutOfRange {
        terminal: self.terminal_level,
        min: self.level_step,
        max: MAX_CELL_LEVEL,
      });
    }
    if !(self.flight_duration_secs.is_finite() && self.flight_duration_secs > 0.0) {
      return Err(ConfigError::InvalidFlightDuration(self.flight_duration_secs));
    }
    if !(self.mid_flight_fraction > 0.0 && self.mid_flight_fraction <= 1.0) {
      return Err(ConfigError::InvalidMidFlightFraction(self.mid_flight_fraction));
    }
    if !(self.fill_inset_ratio > 0.0 && self.fill_inset_ratio < 1.0) {
      return Err(ConfigError::InvalidInsetRatio(self.fill_inset_ratio));
    }
    if !(self.line_width_m.is_finite() && self.line_width_m > 0.0) {
      return Err(ConfigError::InvalidLineWidth(self.line_width_m));
    }
    if self.arc_segments == 0 {
      return Err(ConfigError::ZeroArcSegments);
    }
    for (name, value) in self.heights.as_array() {
      if !(value.is_finite() && value > 0.0) {
        return Err(ConfigError::InvalidHeight { name, value });
      }
    }
    if self.zoom_heights.is_empty() {
      return Err(ConfigError::EmptyZoomTable);
    }
    if let Some(&value) = self.zoom_heights.iter().find(|h| !(h.is_finite() && **h > 0.0)) {
      return Err(ConfigError::InvalidHeight { name: "zoom", value });
    }
    Ok(())
  }

  // ===========================================================================
  // Level ladder
  // ===========================================================================

  /// Level of the global grid (first selectable stop).
  #[inline]
  pub fn first_stop(&self) -> u8 {
    self.next_stop(0)
  }

  /// Next selectable level below `level`, clamped to the terminal level.
  #[inline]
  pub fn next_stop(&self, level: u8) -> u8 {
    level.saturating_add(self.level_step).min(self.terminal_level)
  }

  #[inline]
  pub fn is_terminal(&self, level: u8) -> bool {
    level >= self.terminal_level
  }

  /// All selectable levels, shallowest first.
  pub fn stops(&self) -> Vec<u8> {
    let mut stops = Vec::new();
    let mut level = 0;
    while !self.is_terminal(level) {
      level = self.next_stop(level);
      stops.push(level);
    }
    stops
  }

  // ===========================================================================
  // Derived values
  // ===========================================================================

  /// Radius of the grid/picking shell.
  #[inline]
  pub fn shell_radius(&self) -> f64 {
    self.sphere_radius + self.grid_altitude
  }

  #[inline]
  pub fn flight_duration(&self) -> Duration {
    Duration::from_secs_f64(self.flight_duration_secs)
  }

  /// Camera height above the mean surface for a flight to a cell of `level`.
  ///
  /// Terminal targets never end below sampled terrain plus the terminal
  /// margin.
  pub fn target_height(&self, level: u8, terrain_height: Option<f64>) -> f64 {
    let step = self.level_step;
    if level == 0 {
      self.heights.global
    } else if self.is_terminal(level) {
      let margin = self.heights.terminal;
      let ground = terrain_height.filter(|h| h.is_finite()).unwrap_or(0.0);
      margin.max(ground + margin)
    } else if level <= step {
      self.heights.regional
    } else if level <= step.saturating_mul(2) {
      self.heights.local
    } else {
      self.heights.close
    }
  }

  /// Height of a zoom table entry, clamped to the table.
  pub fn zoom_height(&self, index: usize) -> f64 {
    let last = self.zoom_heights.len().saturating_sub(1);
    self
      .zoom_heights
      .get(index.min(last))
      .copied()
      .unwrap_or(self.heights.global)
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
