//! GeometryBuilder - cell ids to world-space shapes on the grid shell.

use std::f64::consts::PI;

use glam::DVec3;

use crate::cell::{CellHierarchy, CellId, HierarchyError};
use crate::config::NavigationConfig;
use crate::constants::{MAX_LINE_INSET, MIN_LINE_INSET};

/// Approximate edge length of a cell at `level` on a sphere of `radius`.
///
/// Treats the `6 * 4^level` cells as equal-area squares.
#[inline]
pub fn estimated_edge_length(radius: f64, level: u8) -> f64 {
  radius * (PI / (6.0 * 4f64.powi(level as i32))).sqrt()
}

/// Inner ring scale for a border of `line_width` on cells of `edge_length`.
#[inline]
pub fn line_inset(line_width: f64, edge_length: f64) -> f64 {
  if edge_length <= 0.0 {
    return MIN_LINE_INSET;
  }
  (1.0 - line_width / edge_length).clamp(MIN_LINE_INSET, MAX_LINE_INSET)
}

/// Builds cell shapes on the shell of radius `sphere + grid altitude`.
#[derive(Clone, Debug)]
pub struct GeometryBuilder {
  shell_radius: f64,
  fill_inset_ratio: f64,
  line_width: f64,
  arc_segments: usize,
}

impl GeometryBuilder {
  pub fn new(config: &NavigationConfig) -> Self {
    Self {
      shell_radius: config.shell_radius(),
      fill_inset_ratio: config.fill_inset_ratio,
      line_width: config.line_width_m,
      arc_segments: config.arc_segments.max(1),
    }
  }

  #[inline]
  pub fn shell_radius(&self) -> f64 {
    self.shell_radius
  }

  /// Lift a unit direction onto the shell.
  #[inline]
  pub fn on_shell(&self, direction: DVec3) -> DVec3 {
    direction.normalize_or_zero() * self.shell_radius
  }

  /// Cell corners on the shell.
  pub fn boundary<H: CellHierarchy + ?Sized>(
    &self,
    hierarchy: &H,
    cell: CellId,
  ) -> Result<[DVec3; 4], HierarchyError> {
    Ok(hierarchy.vertices_of(cell)?.map(|v| self.on_shell(v)))
  }

  /// Corners pulled toward the cell center by the fill inset ratio.
  pub fn inset_polygon<H: CellHierarchy + ?Sized>(
    &self,
    hierarchy: &H,
    cell: CellId,
  ) -> Result<[DVec3; 4], HierarchyError> {
    self.scaled_boundary(hierarchy, cell, self.fill_inset_ratio)
  }

  /// Outer boundary and inner boundary of the cell's border ring.
  pub fn border_ring<H: CellHierarchy + ?Sized>(
    &self,
    hierarchy: &H,
    cell: CellId,
  ) -> Result<([DVec3; 4], [DVec3; 4]), HierarchyError> {
    let level = hierarchy.level_of(cell)?;
    let inset = line_inset(self.line_width, estimated_edge_length(self.shell_radius, level));
    let outer = self.boundary(hierarchy, cell)?;
    let inner = self.scaled_boundary(hierarchy, cell, inset)?;
    Ok((outer, inner))
  }

  /// Closed outline following the sphere, `arc_segments` per edge.
  ///
  /// The first corner is repeated at the end.
  pub fn outline<H: CellHierarchy + ?Sized>(
    &self,
    hierarchy: &H,
    cell: CellId,
  ) -> Result<Vec<DVec3>, HierarchyError> {
    let corners = hierarchy.vertices_of(cell)?;
    let mut points = Vec::with_capacity(4 * self.arc_segments + 1);
    for edge in 0..4 {
      let (a, b) = (corners[edge], corners[(edge + 1) % 4]);
      for step in 0..self.arc_segments {
        let t = step as f64 / self.arc_segments as f64;
        points.push(self.on_shell(a.lerp(b, t)));
      }
    }
    points.push(self.on_shell(corners[0]));
    Ok(points)
  }

  fn scaled_boundary<H: CellHierarchy + ?Sized>(
    &self,
    hierarchy: &H,
    cell: CellId,
    ratio: f64,
  ) -> Result<[DVec3; 4], HierarchyError> {
    let center = hierarchy.center_of(cell)?;
    let corners = hierarchy.vertices_of(cell)?;
    Ok(corners.map(|v| self.on_shell(center.lerp(v, ratio))))
  }
}

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;
