//! Declarative drawing: collections of primitives submitted to a
//! [`SceneBackend`], and the [`RenderDepthCache`] deciding what to redraw.
//!
//! # Collections
//!
//! ```text
//!  Persistent(0)   base grid (level 4, whole sphere)      drawn once
//!  Persistent(k)   siblings of stack[k-1]                 drawn once per key
//!  Active          next generation / terminal highlight   rebuilt every pass
//!  Hover           single highlighted cell                replaced on hover
//! ```

pub mod backend;
pub mod cache;
pub mod headless;
pub mod stats;

pub use backend::SceneBackend;
pub use cache::{ActiveLayer, LayerKey, RenderDepthCache, RenderInputs};
pub use headless::HeadlessScene;
pub use stats::{PassRecord, RenderStats, RollingWindow};

use glam::DVec3;
use thiserror::Error;

use crate::cell::HierarchyError;
use crate::constants::SIBLING_COLOR_COUNT;

/// Linear RGBA color with straight alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
  pub r: f32,
  pub g: f32,
  pub b: f32,
  pub a: f32,
}

impl Rgba {
  pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
    Self { r, g, b, a }
  }

  pub const fn with_alpha(self, a: f32) -> Self {
    Self { a, ..self }
  }

  pub const fn to_array(self) -> [f32; 4] {
    [self.r, self.g, self.b, self.a]
  }
}

/// Backend-side handle of one draw collection.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CollectionId {
  /// Persistent generation slot; 0 is the base grid.
  Persistent(usize),
  Active,
  Hover,
}

/// One drawable shape in world space (meters).
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
  /// Filled quad.
  Polygon { vertices: [DVec3; 4], color: Rgba },
  /// Quad outline band: `outer` minus `inner`, corners in matching order.
  Ring {
    outer: [DVec3; 4],
    inner: [DVec3; 4],
    color: Rgba,
  },
  /// Screen-width line strip.
  Polyline {
    vertices: Vec<DVec3>,
    width: f32,
    color: Rgba,
  },
}

/// Fill shows inset translucent quads, Line shows grid lines and rings.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RenderMode {
  #[default]
  Fill,
  Line,
}

impl RenderMode {
  pub fn toggled(self) -> Self {
    match self {
      RenderMode::Fill => RenderMode::Line,
      RenderMode::Line => RenderMode::Fill,
    }
  }
}

/// Colors of every layer kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderStyle {
  /// Base grid (lightest).
  pub base: Rgba,
  /// Sibling generations, outermost first; deeper layers reuse the last.
  pub siblings: [Rgba; SIBLING_COLOR_COUNT],
  /// Next selectable generation.
  pub active: Rgba,
  /// Selected cell (line ring / terminal block).
  pub highlight: Rgba,
  pub hover: Rgba,
  /// Cell tapped inside the terminal block.
  pub focus: Rgba,
}

impl Default for RenderStyle {
  fn default() -> Self {
    Self {
      base: Rgba::new(0.85, 0.88, 0.95, 0.18),
      siblings: [
        Rgba::new(0.35, 0.65, 1.0, 0.40),
        Rgba::new(0.35, 0.85, 0.75, 0.32),
        Rgba::new(0.95, 0.80, 0.35, 0.26),
        Rgba::new(0.95, 0.55, 0.30, 0.20),
      ],
      active: Rgba::new(1.0, 1.0, 1.0, 0.45),
      highlight: Rgba::new(1.0, 0.85, 0.2, 0.85),
      hover: Rgba::new(1.0, 1.0, 1.0, 0.6),
      focus: Rgba::new(1.0, 0.3, 0.3, 0.8),
    }
  }
}

impl RenderStyle {
  /// Color of persistent sibling slot `slot` (1-based).
  pub fn sibling_color(&self, slot: usize) -> Rgba {
    let index = slot.saturating_sub(1).min(SIBLING_COLOR_COUNT - 1);
    self.siblings[index]
  }
}

/// Reasons a render pass did not complete.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
  #[error("scene backend is not ready")]
  BackendNotReady,
  #[error(transparent)]
  Hierarchy(#[from] HierarchyError),
}
