//! Grid camera: lens snapshot for picking and pose → transform.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use glam::DVec2;

use crate::components::GridCamera;
use crate::convert::{pose_to_transform, Lens};
use crate::resources::GridSettings;
use crate::scene::SceneMirror;

/// Copy the camera lens and window size into the mirror. The scene counts as
/// ready once a grid camera exists.
pub fn update_grid_lens(
  cameras: Query<&Projection, With<GridCamera>>,
  windows: Query<&Window, With<PrimaryWindow>>,
  mut mirror: ResMut<SceneMirror>,
) {
  refresh_lens(&cameras, &windows, &mut mirror);
}

pub(crate) fn refresh_lens(
  cameras: &Query<&Projection, With<GridCamera>>,
  windows: &Query<&Window, With<PrimaryWindow>>,
  mirror: &mut SceneMirror,
) {
  let Ok(projection) = cameras.single() else {
    mirror.set_ready(false);
    return;
  };
  mirror.set_ready(true);

  let Projection::Perspective(perspective) = projection else {
    return;
  };
  let Ok(window) = windows.single() else {
    return;
  };
  let lens = Lens {
    fov_y: perspective.fov as f64,
    viewport: DVec2::new(window.width() as f64, window.height() as f64),
  };
  if mirror.lens() != Some(lens) {
    mirror.set_lens(lens);
  }
}

/// Move the camera to the pose last set by the navigator.
pub fn apply_camera_pose(
  settings: Res<GridSettings>,
  mut mirror: ResMut<SceneMirror>,
  mut cameras: Query<&mut Transform, With<GridCamera>>,
) {
  let Some(pose) = mirror.take_pose_change() else {
    return;
  };
  for mut transform in &mut cameras {
    *transform = pose_to_transform(&pose, settings.scene_scale);
  }
}
