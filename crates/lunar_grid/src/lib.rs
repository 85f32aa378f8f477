//! lunar_grid - Framework/engine independent drill-down navigation over a
//! quad-subdivided sphere.
//!
//! The user selects ever-smaller cells of a cube-face quadtree (levels 0, 4, 8,
//! 12 and the terminal level 16 by default) while the camera flies between
//! levels and every ancestor generation stays on screen as a cached,
//! color-coded grid.
//!
//! # Features
//!
//! - **Cell hierarchy adapter**: [`cell::CellHierarchy`] trait plus the
//!   [`cell::QuadSphere`] cube-face quadtree with 64-bit ids and hex tokens
//! - **Render depth cache**: persistent draw collections per ancestor
//!   generation, a volatile active generation and a hover highlight
//! - **Picking**: screen ray → inflated sphere → cell at a requested level
//! - **Camera flights**: ease-out cubic interpolation with a mid-flight hook
//! - **Block telemetry**: deterministic synthetic attributes for terminal cells
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use lunar_grid::{HeadlessScene, NavCommand, NavigationConfig, Navigator, QuadSphere};
//!
//! let config = NavigationConfig::default();
//! let mut scene = HeadlessScene::new(config.sphere_radius);
//! let mut events = Vec::new();
//! let mut nav = Navigator::new(QuadSphere::new(), config)?;
//!
//! nav.initialize(&mut scene, &mut events);
//! nav.handle(
//!     NavCommand::Drill(HeadlessScene::screen_point(10.0, 20.0)),
//!     Duration::ZERO,
//!     &mut scene,
//!     &mut events,
//! );
//! while nav.tick(Duration::from_millis(16), &mut scene, &mut events) {}
//! ```

pub mod constants;
pub mod geo;
pub mod config;

// Cell hierarchy adapter (interface + default cube-face quadtree)
pub mod cell;
pub use cell::{CellHierarchy, CellId, HierarchyError, QuadSphere};

// Cell → rendering-space geometry
pub mod geometry;
pub use geometry::GeometryBuilder;

// Draw collections, backend interface and the depth cache
pub mod render;
pub use render::{
  ActiveLayer, CollectionId, HeadlessScene, LayerKey, Primitive, RenderDepthCache, RenderError,
  RenderInputs, RenderMode, RenderStats, RenderStyle, Rgba, SceneBackend,
};

pub mod picking;
pub use picking::{PickHit, Picker};

pub mod flight;
pub use flight::{ease_out_cubic, CameraPose, FlightController, FlightFrame, MidFlightHook};

pub mod telemetry;
pub use telemetry::{BlockAttributes, BlockEmitter, EventSink, NavEvent, NullSink};

// Selection stack and command routing
pub mod navigation;
pub use navigation::{
  CommandOutcome, IgnoreReason, NavCommand, NavState, Navigator, SelectionStack, ZoomDirection,
};

pub use config::{ConfigError, HeightBuckets, NavigationConfig};
pub use geo::{LatLng, Ray};
