//! Pure conversions between lunar_grid values (f64 meters) and Bevy scene
//! space (f32, scaled).
//!
//! Nothing here touches the ECS, so it is tested without an app.

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;
use glam::{DVec2, DVec3};
use lunar_grid::{CameraPose, Primitive, Ray, Rgba};

/// Scene units per meter (1 unit = 1 km).
pub const DEFAULT_SCENE_SCALE: f64 = 1e-3;

#[inline]
pub fn to_scene(point: DVec3, scale: f64) -> Vec3 {
  Vec3::new(
    (point.x * scale) as f32,
    (point.y * scale) as f32,
    (point.z * scale) as f32,
  )
}

#[inline]
pub fn to_color(color: Rgba) -> Color {
  Color::LinearRgba(LinearRgba::new(color.r, color.g, color.b, color.a))
}

/// Camera transform for a pose.
pub fn pose_to_transform(pose: &CameraPose, scale: f64) -> Transform {
  let (forward, up) = pose.orientation();
  Transform::from_translation(to_scene(pose.position, scale))
    .looking_to(to_scene(forward, 1.0), to_scene(up, 1.0))
}

// =============================================================================
// Picking
// =============================================================================

/// Perspective lens of the grid camera, in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lens {
  /// Vertical field of view in radians.
  pub fov_y: f64,
  pub viewport: DVec2,
}

/// Pinhole camera in world meters, used to unproject cursor positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinholeView {
  pub position: DVec3,
  pub forward: DVec3,
  pub up: DVec3,
  pub lens: Lens,
}

impl PinholeView {
  pub fn from_pose(pose: &CameraPose, lens: Lens) -> Self {
    let (forward, up) = pose.orientation();
    Self {
      position: pose.position,
      forward,
      up,
      lens,
    }
  }

  /// Ray through a window position (origin top-left, y down).
  pub fn ray_through(&self, screen: DVec2) -> Option<Ray> {
    let viewport = self.lens.viewport;
    if viewport.x <= 0.0 || viewport.y <= 0.0 || !screen.is_finite() {
      return None;
    }
    let ndc_x = 2.0 * screen.x / viewport.x - 1.0;
    let ndc_y = 1.0 - 2.0 * screen.y / viewport.y;
    let half_height = (self.lens.fov_y * 0.5).tan();
    let half_width = half_height * viewport.x / viewport.y;

    let right = self.forward.cross(self.up).normalize_or_zero();
    let direction = self.forward + right * (ndc_x * half_width) + self.up * (ndc_y * half_height);
    Some(Ray::new(self.position, direction))
  }
}

// =============================================================================
// Meshes
// =============================================================================

/// Triangle buffers for the filled primitives of one collection.
///
/// Positions are relative to `origin` so f32 keeps centimeter precision at
/// planetary distances.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
  /// Mesh origin in world meters.
  pub origin: DVec3,
  pub positions: Vec<[f32; 3]>,
  pub normals: Vec<[f32; 3]>,
  pub colors: Vec<[f32; 4]>,
  pub indices: Vec<u32>,
}

impl MeshBuffers {
  pub fn is_empty(&self) -> bool {
    self.indices.is_empty()
  }

  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  fn push_vertex(&mut self, point: DVec3, scale: f64, color: Rgba) -> u32 {
    let index = self.positions.len() as u32;
    self.positions.push(to_scene(point - self.origin, scale).to_array());
    self.normals.push(to_scene(point.normalize_or_zero(), 1.0).to_array());
    self.colors.push(color.to_array());
    index
  }

  /// Translation of the mesh entity.
  pub fn translation(&self, scale: f64) -> Vec3 {
    to_scene(self.origin, scale)
  }

  pub fn into_mesh(self) -> Mesh {
    let mut mesh = Mesh::new(
      PrimitiveTopology::TriangleList,
      RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, self.colors);
    mesh.insert_indices(Indices::U32(self.indices));
    mesh
  }
}

/// Triangulate polygons and rings. Polylines are skipped (drawn as gizmos).
pub fn triangulate(primitives: &[Primitive], scale: f64) -> Option<MeshBuffers> {
  let origin = primitives.iter().find_map(|primitive| match primitive {
    Primitive::Polygon { vertices, .. } => Some(vertices[0]),
    Primitive::Ring { outer, .. } => Some(outer[0]),
    Primitive::Polyline { .. } => None,
  })?;

  let mut buffers = MeshBuffers {
    origin,
    ..Default::default()
  };
  for primitive in primitives {
    match primitive {
      Primitive::Polygon { vertices, color } => {
        let base = buffers.positions.len() as u32;
        for vertex in vertices {
          buffers.push_vertex(*vertex, scale, *color);
        }
        buffers
          .indices
          .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
      }
      Primitive::Ring {
        outer,
        inner,
        color,
      } => {
        let base = buffers.positions.len() as u32;
        for vertex in outer.iter().chain(inner) {
          buffers.push_vertex(*vertex, scale, *color);
        }
        for corner in 0..4u32 {
          let next = (corner + 1) % 4;
          let (o0, o1) = (base + corner, base + next);
          let (i0, i1) = (base + 4 + corner, base + 4 + next);
          buffers.indices.extend_from_slice(&[o0, o1, i1, o0, i1, i0]);
        }
      }
      Primitive::Polyline { .. } => {}
    }
  }
  Some(buffers)
}

/// Line strip in scene space.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneStrip {
  pub points: Vec<Vec3>,
  pub color: Color,
}

pub fn polylines(primitives: &[Primitive], scale: f64) -> Vec<SceneStrip> {
  primitives
    .iter()
    .filter_map(|primitive| match primitive {
      Primitive::Polyline {
        vertices, color, ..
      } if vertices.len() >= 2 => Some(SceneStrip {
        points: vertices.iter().map(|v| to_scene(*v, scale)).collect(),
        color: to_color(*color),
      }),
      _ => None,
    })
    .collect()
}

#[cfg(test)]
#[path = "convert_test.rs"]
mod convert_test;
