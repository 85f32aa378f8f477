//! Hierarchical cell indexing over the sphere.
//!
//! The navigator never looks inside a [`CellId`]; every structural question
//! goes through [`CellHierarchy`]. [`QuadSphere`] is the built-in cube-face
//! quadtree adapter.
//!
//! # Level convention
//!
//! Level 0 = the six cube faces, each level below splits a cell into four
//! quadrants. Level L therefore has `6 * 4^L` cells.

pub mod quad_sphere;

pub use quad_sphere::QuadSphere;

use glam::DVec3;
use smallvec::SmallVec;
use thiserror::Error;

/// Opaque handle of one node of the quad-subdivision hierarchy.
///
/// Equality is by id; the adapter guarantees ids and tokens are in bijection.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct CellId(u64);

impl CellId {
  #[inline]
  pub const fn from_raw(raw: u64) -> Self {
    Self(raw)
  }

  #[inline]
  pub const fn raw(self) -> u64 {
    self.0
  }
}

/// Failures reported by a [`CellHierarchy`] adapter.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HierarchyError {
  #[error("invalid cell id {0:?}")]
  InvalidCell(CellId),
  #[error("level {level} is out of range for cell {cell:?}")]
  LevelOutOfRange { cell: CellId, level: u8 },
  #[error("point has no direction on the sphere")]
  DegeneratePoint,
}

/// Children of one cell, in quadrant order.
pub type CellChildren = [CellId; 4];

/// Pure queries over an opaque cell-id space.
///
/// Directions are unit vectors from the sphere center.
pub trait CellHierarchy: Send + Sync {
  /// Level-0 cells covering the sphere.
  fn roots(&self) -> SmallVec<[CellId; 6]>;

  /// Deepest cell containing `direction`.
  fn cell_from_point(&self, direction: DVec3) -> Result<CellId, HierarchyError>;

  /// Ancestor of `cell` at `level` (the cell itself at its own level).
  fn ancestor_at_level(&self, cell: CellId, level: u8) -> Result<CellId, HierarchyError>;

  fn children_of(&self, cell: CellId) -> Result<CellChildren, HierarchyError>;

  fn level_of(&self, cell: CellId) -> Result<u8, HierarchyError>;

  /// Four boundary corners, counter-clockwise seen from outside.
  fn vertices_of(&self, cell: CellId) -> Result<[DVec3; 4], HierarchyError>;

  /// Stable string form of the id.
  fn token_of(&self, cell: CellId) -> Result<String, HierarchyError>;

  // ---------------------------------------------------------------------------
  // Provided
  // ---------------------------------------------------------------------------

  /// Unit direction through the middle of the cell.
  fn center_of(&self, cell: CellId) -> Result<DVec3, HierarchyError> {
    let vertices = self.vertices_of(cell)?;
    let sum = vertices.iter().copied().sum::<DVec3>();
    Ok(sum.normalize_or_zero())
  }

  /// Cell at `level` containing `direction`.
  fn cell_at_level(&self, direction: DVec3, level: u8) -> Result<CellId, HierarchyError> {
    let leaf = self.cell_from_point(direction)?;
    self.ancestor_at_level(leaf, level)
  }

  /// All descendants of `cell` at `level`, in quadrant order.
  fn descendants_at_level(&self, cell: CellId, level: u8) -> Result<Vec<CellId>, HierarchyError> {
    let start = self.level_of(cell)?;
    if level < start {
      return Err(HierarchyError::LevelOutOfRange { cell, level });
    }
    let mut generation = vec![cell];
    for _ in start..level {
      let mut next = Vec::with_capacity(generation.len() * 4);
      for parent in generation {
        next.extend_from_slice(&self.children_of(parent)?);
      }
      generation = next;
    }
    Ok(generation)
  }

  /// Every cell of the sphere at `level`.
  fn cells_at_level(&self, level: u8) -> Result<Vec<CellId>, HierarchyError> {
    let mut cells = Vec::new();
    for root in self.roots() {
      cells.extend(self.descendants_at_level(root, level)?);
    }
    Ok(cells)
  }

  /// Whether `cell` equals or descends from `ancestor`.
  fn contains(&self, ancestor: CellId, cell: CellId) -> Result<bool, HierarchyError> {
    let ancestor_level = self.level_of(ancestor)?;
    if self.level_of(cell)? < ancestor_level {
      return Ok(false);
    }
    Ok(self.ancestor_at_level(cell, ancestor_level)? == ancestor)
  }
}

/// Blanket impl for boxed trait objects.
impl CellHierarchy for Box<dyn CellHierarchy> {
  fn roots(&self) -> SmallVec<[CellId; 6]> {
    (**self).roots()
  }

  fn cell_from_point(&self, direction: DVec3) -> Result<CellId, HierarchyError> {
    (**self).cell_from_point(direction)
  }

  fn ancestor_at_level(&self, cell: CellId, level: u8) -> Result<CellId, HierarchyError> {
    (**self).ancestor_at_level(cell, level)
  }

  fn children_of(&self, cell: CellId) -> Result<CellChildren, HierarchyError> {
    (**self).children_of(cell)
  }

  fn level_of(&self, cell: CellId) -> Result<u8, HierarchyError> {
    (**self).level_of(cell)
  }

  fn vertices_of(&self, cell: CellId) -> Result<[DVec3; 4], HierarchyError> {
    (**self).vertices_of(cell)
  }

  fn token_of(&self, cell: CellId) -> Result<String, HierarchyError> {
    (**self).token_of(cell)
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
