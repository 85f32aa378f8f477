//! lunar_viewer - interactive drill-down navigation over a lunar quad-sphere
//! grid.
//!
//! Controls:
//! - Left click: select the cell under the cursor (drill / switch / focus)
//! - Backspace or Esc: back one level
//! - R: reset to the global view
//! - `=` / `-`: zoom in / out
//! - M: toggle fill / line rendering
//! - Home: fly to the configured home coordinate

mod config;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use clap::Parser;
use lunar_bevy::{navigation_input_bundle, GridCamera, GridSettings, LunarGridPlugin};
use lunar_grid::LatLng;

use config::ViewerConfig;
use ui::NavigationPanelPlugin;

/// Interactive lunar grid navigator.
#[derive(Parser, Debug)]
#[command(name = "lunar_viewer")]
#[command(about = "Drill down through a quad-sphere grid on the Moon")]
struct Args {
  /// Path to configuration TOML file.
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Start in line rendering mode.
  #[arg(long)]
  line_mode: bool,

  /// Deepest selectable level (overrides the config file).
  #[arg(long)]
  terminal_level: Option<u8>,
}

fn main() -> Result<()> {
  let args = Args::parse();

  let config = match &args.config {
    Some(path) => ViewerConfig::load(path)?,
    None => ViewerConfig::default(),
  };
  let config = config.with_overrides(args.line_mode, args.terminal_level)?;

  let grid = LunarGridPlugin::new(config.navigation.clone())
    .with_style(config.style.clone())
    .with_home(LatLng::new(config.home.lat, config.home.lng));

  App::new()
    .add_plugins(DefaultPlugins.set(WindowPlugin {
      primary_window: Some(Window {
        title: config.window.title.clone(),
        resolution: (config.window.width, config.window.height).into(),
        ..default()
      }),
      ..default()
    }))
    .add_plugins(EguiPlugin::default())
    .add_plugins(grid)
    .add_plugins(NavigationPanelPlugin)
    .insert_resource(ClearColor(Color::srgb(0.01, 0.01, 0.02)))
    .insert_resource(config)
    .add_systems(Startup, spawn_scene)
    .run();

  Ok(())
}

/// Globe, sun and the grid camera.
fn spawn_scene(
  mut commands: Commands,
  config: Res<ViewerConfig>,
  settings: Res<GridSettings>,
  mut meshes: ResMut<Assets<Mesh>>,
  mut materials: ResMut<Assets<StandardMaterial>>,
) {
  let radius = (config.navigation.sphere_radius * settings.scene_scale) as f32;
  commands.spawn((
    Mesh3d(meshes.add(Sphere::new(radius).mesh().uv(256, 128))),
    MeshMaterial3d(materials.add(StandardMaterial {
      base_color: Color::srgb(0.55, 0.55, 0.53),
      perceptual_roughness: 0.95,
      ..default()
    })),
    Transform::default(),
  ));

  commands.spawn((
    DirectionalLight {
      illuminance: 12_000.0,
      ..default()
    },
    Transform::from_xyz(1.0, 0.4, 0.6).looking_at(Vec3::ZERO, Vec3::Y),
  ));

  commands.spawn((
    Camera3d::default(),
    Projection::Perspective(PerspectiveProjection {
      fov: config.window.fov_degrees.to_radians(),
      near: 0.01,
      far: 100_000.0,
      ..default()
    }),
    Transform::default(),
    GridCamera,
    navigation_input_bundle(),
  ));

  info!(
    "Scene ready: globe radius {:.1} units, terminal level {}",
    radius, config.navigation.terminal_level
  );
}
