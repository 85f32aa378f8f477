//! Screen position → cell at a requested level.
//!
//! Rays are intersected with the grid shell (sphere + grid altitude), the
//! same surface the grid is drawn on, so what the user sees under the
//! cursor is what gets picked.

use glam::{DVec2, DVec3};

use crate::cell::{CellHierarchy, CellId, HierarchyError};
use crate::config::NavigationConfig;
use crate::geo::LatLng;
use crate::render::SceneBackend;

/// Result of a successful pick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickHit {
  pub cell: CellId,
  /// Intersection on the grid shell, world meters.
  pub point: DVec3,
}

impl PickHit {
  pub fn direction(&self) -> DVec3 {
    self.point.normalize_or_zero()
  }

  pub fn lat_lng(&self) -> LatLng {
    LatLng::from_direction(self.point)
  }
}

#[derive(Clone, Copy, Debug)]
pub struct Picker {
  shell_radius: f64,
}

impl Picker {
  pub fn new(config: &NavigationConfig) -> Self {
    Self {
      shell_radius: config.shell_radius(),
    }
  }

  /// Intersection of the camera ray through `screen` with the grid shell.
  pub fn pick_point<S: SceneBackend + ?Sized>(&self, scene: &S, screen: DVec2) -> Option<DVec3> {
    scene.screen_ray(screen)?.intersect_sphere(self.shell_radius)
  }

  /// Cell at `level` under `screen`. `Ok(None)` on a miss.
  pub fn pick_cell<H, S>(
    &self,
    hierarchy: &H,
    scene: &S,
    screen: DVec2,
    level: u8,
  ) -> Result<Option<PickHit>, HierarchyError>
  where
    H: CellHierarchy + ?Sized,
    S: SceneBackend + ?Sized,
  {
    let Some(point) = self.pick_point(scene, screen) else {
      return Ok(None);
    };
    let cell = hierarchy.cell_at_level(point.normalize_or_zero(), level)?;
    Ok(Some(PickHit { cell, point }))
  }
}

#[cfg(test)]
#[path = "picking_test.rs"]
mod picking_test;
