//! Draw collections → mesh entities and gizmo line strips.

use bevy::prelude::*;

use crate::components::GridCollection;
use crate::convert::{polylines, triangulate};
use crate::resources::{CollectionEntities, GridLines, GridMaterials, GridNavigator, GridSettings};
use crate::scene::SceneMirror;

/// Rebuild the entities of every collection the navigator touched this frame.
pub fn sync_collections(
  mut commands: Commands,
  settings: Res<GridSettings>,
  mut mirror: ResMut<SceneMirror>,
  mut meshes: ResMut<Assets<Mesh>>,
  mut materials: ResMut<Assets<StandardMaterial>>,
  mut grid_materials: ResMut<GridMaterials>,
  mut entities: ResMut<CollectionEntities>,
  mut lines: ResMut<GridLines>,
) {
  let changes = mirror.take_changes();
  if changes.is_empty() {
    return;
  }
  let scale = settings.scene_scale;

  for id in changes {
    if let Some(entity) = entities.remove(id) {
      commands.entity(entity).despawn();
    }
    let Some(primitives) = mirror.collection(id) else {
      lines.remove(id);
      continue;
    };

    lines.set(id, polylines(primitives, scale));
    let Some(buffers) = triangulate(primitives, scale) else {
      continue;
    };
    let translation = buffers.translation(scale);
    let material = grid_materials.get_or_create(id, &mut materials);
    let entity = commands
      .spawn((
        Mesh3d(meshes.add(buffers.into_mesh())),
        MeshMaterial3d(material),
        Transform::from_translation(translation),
        GridCollection(id),
      ))
      .id();
    entities.insert(id, entity);
  }

  debug!(
    collections = mirror.collection_count(),
    entities = entities.len(),
    "grid collections synced"
  );
}

/// Redraw the grid polylines (gizmos are immediate mode).
pub fn draw_grid_lines(lines: Res<GridLines>, mut gizmos: Gizmos) {
  for strip in lines.iter() {
    gizmos.linestrip(strip.points.iter().copied(), strip.color);
  }
}

/// Match the gizmo line width to the configured grid polyline width.
pub fn configure_grid_gizmos(navigator: Res<GridNavigator>, mut store: ResMut<GizmoConfigStore>) {
  let (config, _) = store.config_mut::<DefaultGizmoConfigGroup>();
  config.line.width = navigator.0.config().grid_line_width;
}
