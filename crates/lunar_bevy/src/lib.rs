//! Bevy presentation layer for lunar_grid.
//!
//! This crate bridges the engine-independent navigator with Bevy: the
//! [`SceneMirror`] resource is the navigator's scene backend, systems turn its
//! draw collections into meshes and gizmo strips, tick flights once per frame
//! and map window input to navigation commands.

pub mod components;
pub mod convert;
pub mod input;
pub mod resources;
pub mod scene;
pub mod systems;

use std::sync::Arc;

use bevy::prelude::*;
pub use components::*;
pub use input::{navigation_input_bundle, NavigationContext, NavigationInputPlugin};
pub use resources::*;
pub use scene::{SceneMirror, TerrainSampler};

use lunar_grid::{CellHierarchy, LatLng, NavigationConfig, Navigator, QuadSphere, RenderStyle};

use crate::convert::DEFAULT_SCENE_SCALE;
use crate::systems::{camera, collections, navigation};

/// Bevy plugin for quad-sphere grid navigation.
///
/// The app spawns the globe and a camera carrying [`GridCamera`] and
/// [`navigation_input_bundle`]; the plugin does the rest.
pub struct LunarGridPlugin {
  pub config: NavigationConfig,
  pub style: RenderStyle,
  pub home: LatLng,
  /// Scene units per meter.
  pub scene_scale: f64,
  /// Elevation source for the terminal-level camera floor.
  pub terrain: Option<TerrainSampler>,
}

impl Default for LunarGridPlugin {
  fn default() -> Self {
    Self {
      config: NavigationConfig::default(),
      style: RenderStyle::default(),
      home: LatLng::new(0.0, 0.0),
      scene_scale: DEFAULT_SCENE_SCALE,
      terrain: None,
    }
  }
}

impl LunarGridPlugin {
  pub fn new(config: NavigationConfig) -> Self {
    Self {
      config,
      ..Default::default()
    }
  }

  pub fn with_style(mut self, style: RenderStyle) -> Self {
    self.style = style;
    self
  }

  pub fn with_home(mut self, home: LatLng) -> Self {
    self.home = home;
    self
  }

  pub fn with_terrain(
    mut self,
    sampler: impl Fn(LatLng) -> Option<f64> + Send + Sync + 'static,
  ) -> Self {
    self.terrain = Some(Arc::new(sampler));
    self
  }

  fn scene_mirror(&self) -> SceneMirror {
    match &self.terrain {
      Some(sampler) => SceneMirror::new().with_terrain(Arc::clone(sampler)),
      None => SceneMirror::new(),
    }
  }

  fn navigator(&self) -> Option<Navigator<Box<dyn CellHierarchy>>> {
    let hierarchy = || Box::new(QuadSphere::new()) as Box<dyn CellHierarchy>;
    match Navigator::with_style(hierarchy(), self.config.clone(), self.style.clone()) {
      Ok(navigator) => Some(navigator),
      Err(err) => {
        error!("Invalid navigation config ({err}), falling back to defaults");
        Navigator::with_style(hierarchy(), NavigationConfig::default(), self.style.clone()).ok()
      }
    }
  }
}

impl Plugin for LunarGridPlugin {
  fn build(&self, app: &mut App) {
    let Some(navigator) = self.navigator() else {
      error!("Grid navigator could not be created, plugin disabled");
      return;
    };

    app
      .add_plugins(NavigationInputPlugin)
      .insert_resource(GridNavigator(navigator))
      .insert_resource(GridSettings {
        scene_scale: self.scene_scale,
        home: self.home,
      })
      .insert_resource(self.scene_mirror())
      .init_resource::<NavEventChannel>()
      .init_resource::<NavStatus>()
      .init_resource::<CollectionEntities>()
      .init_resource::<GridLines>()
      .init_resource::<GridMaterials>()
      .add_systems(Startup, collections::configure_grid_gizmos)
      .add_systems(PostStartup, navigation::initialize_navigator)
      .add_systems(
        Update,
        (
          camera::update_grid_lens,
          input::queue_hover,
          navigation::apply_nav_commands,
          navigation::tick_flight,
          camera::apply_camera_pose,
          collections::sync_collections,
          navigation::drain_nav_events,
        )
          .chain(),
      )
      .add_systems(
        Update,
        collections::draw_grid_lines.after(collections::sync_collections),
      );
  }
}
