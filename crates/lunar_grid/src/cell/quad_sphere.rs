//! QuadSphere - cube-face quadtree with 64-bit cell ids.
//!
//! # Id layout
//!
//! ```text
//!  63  61 60                                              1   0
//! ┌──────┬─────────────────────────────────────────────────┬───┐
//! │ face │ 2 bits per level, most significant = level 1    │ 1 │
//! └──────┴─────────────────────────────────────────────────┴───┘
//! ```
//!
//! A cell at level L keeps its 2L path bits followed by a single set
//! sentinel bit (`lsb = 1 << 2(30-L)`); everything below is zero. Each path
//! digit is `i_bit | j_bit << 1` where i/j are the face coordinates along
//! u/v, so parent and child ids are pure bit arithmetic.
//!
//! Tokens are the hex id with trailing zero digits dropped.

use glam::DVec3;
use smallvec::SmallVec;

use super::{CellChildren, CellHierarchy, CellId, HierarchyError};
use crate::constants::{FACE_COUNT, MAX_CELL_LEVEL};

const FACE_SHIFT: u32 = 2 * MAX_CELL_LEVEL as u32 + 1;
const POS_MASK: u64 = (1 << FACE_SHIFT) - 1;
const MAX_SIZE: u64 = 1 << MAX_CELL_LEVEL;

/// Sentinel bit of a cell at `level`.
#[inline]
fn lsb_for_level(level: u8) -> u64 {
  1u64 << (2 * (MAX_CELL_LEVEL - level) as u32)
}

#[inline]
fn face_of(raw: u64) -> u8 {
  (raw >> FACE_SHIFT) as u8
}

/// Map a unit direction to (face, u, v) with u, v in [-1, 1].
fn direction_to_face_uv(p: DVec3) -> (u8, f64, f64) {
  let (ax, ay, az) = (p.x.abs(), p.y.abs(), p.z.abs());
  if ax >= ay && ax >= az {
    if p.x >= 0.0 {
      (0, -p.z / ax, p.y / ax)
    } else {
      (1, p.z / ax, p.y / ax)
    }
  } else if ay >= az {
    if p.y >= 0.0 {
      (2, p.x / ay, -p.z / ay)
    } else {
      (3, p.x / ay, p.z / ay)
    }
  } else if p.z >= 0.0 {
    (4, p.x / az, p.y / az)
  } else {
    (5, -p.x / az, p.y / az)
  }
}

/// Inverse of [`direction_to_face_uv`], normalized onto the unit sphere.
fn face_uv_to_direction(face: u8, u: f64, v: f64) -> DVec3 {
  let p = match face {
    0 => DVec3::new(1.0, v, -u),
    1 => DVec3::new(-1.0, v, u),
    2 => DVec3::new(u, 1.0, -v),
    3 => DVec3::new(u, -1.0, v),
    4 => DVec3::new(u, v, 1.0),
    _ => DVec3::new(-u, v, -1.0),
  };
  p.normalize()
}

/// Face coordinate in [-1, 1] to a leaf index in [0, 2^30).
#[inline]
fn uv_to_leaf_index(u: f64) -> u64 {
  let s = ((u + 1.0) * 0.5).clamp(0.0, 1.0);
  ((s * MAX_SIZE as f64) as u64).min(MAX_SIZE - 1)
}

/// Default cube-face quadtree adapter.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuadSphere;

impl QuadSphere {
  pub fn new() -> Self {
    Self
  }

  fn validate(&self, cell: CellId) -> Result<u8, HierarchyError> {
    let raw = cell.raw();
    let zeros = raw.trailing_zeros();
    if raw == 0 || face_of(raw) >= FACE_COUNT || zeros % 2 != 0 || zeros > 2 * MAX_CELL_LEVEL as u32 {
      return Err(HierarchyError::InvalidCell(cell));
    }
    Ok(MAX_CELL_LEVEL - (zeros / 2) as u8)
  }

  /// Face index and (i, j) position of a cell within its face, at its own
  /// level.
  fn face_ij(&self, cell: CellId) -> Result<(u8, u8, u64, u64), HierarchyError> {
    let level = self.validate(cell)?;
    let raw = cell.raw();
    let pos = (raw & POS_MASK) >> 1;
    let (mut i, mut j) = (0u64, 0u64);
    for l in 0..level as u32 {
      let digit = (pos >> (2 * MAX_CELL_LEVEL as u32 - 2 - 2 * l)) & 3;
      i = (i << 1) | (digit & 1);
      j = (j << 1) | (digit >> 1);
    }
    Ok((face_of(raw), level, i, j))
  }
}

impl CellHierarchy for QuadSphere {
  fn roots(&self) -> SmallVec<[CellId; 6]> {
    (0..FACE_COUNT as u64)
      .map(|face| CellId::from_raw((face << FACE_SHIFT) | lsb_for_level(0)))
      .collect()
  }

  fn cell_from_point(&self, direction: DVec3) -> Result<CellId, HierarchyError> {
    if !direction.is_finite() || direction.length_squared() == 0.0 {
      return Err(HierarchyError::DegeneratePoint);
    }
    let (face, u, v) = direction_to_face_uv(direction);
    let (i, j) = (uv_to_leaf_index(u), uv_to_leaf_index(v));

    let mut pos = 0u64;
    for bit in (0..MAX_CELL_LEVEL as u32).rev() {
      let digit = ((i >> bit) & 1) | (((j >> bit) & 1) << 1);
      pos = (pos << 2) | digit;
    }
    Ok(CellId::from_raw(((face as u64) << FACE_SHIFT) | (pos << 1) | 1))
  }

  fn ancestor_at_level(&self, cell: CellId, level: u8) -> Result<CellId, HierarchyError> {
    let own = self.validate(cell)?;
    if level > own {
      return Err(HierarchyError::LevelOutOfRange { cell, level });
    }
    let lsb = lsb_for_level(level);
    Ok(CellId::from_raw((cell.raw() & lsb.wrapping_neg()) | lsb))
  }

  fn children_of(&self, cell: CellId) -> Result<CellChildren, HierarchyError> {
    let level = self.validate(cell)?;
    if level >= MAX_CELL_LEVEL {
      return Err(HierarchyError::LevelOutOfRange { cell, level: level + 1 });
    }
    let lsb = lsb_for_level(level);
    let first = cell.raw() - lsb + (lsb >> 2);
    let step = lsb >> 1;
    Ok([0u64, 1, 2, 3].map(|k| CellId::from_raw(first + k * step)))
  }

  fn level_of(&self, cell: CellId) -> Result<u8, HierarchyError> {
    self.validate(cell)
  }

  fn vertices_of(&self, cell: CellId) -> Result<[DVec3; 4], HierarchyError> {
    let (face, level, i, j) = self.face_ij(cell)?;
    let size = (1u64 << level) as f64;
    let to_uv = |index: u64| 2.0 * index as f64 / size - 1.0;
    let (u0, u1) = (to_uv(i), to_uv(i + 1));
    let (v0, v1) = (to_uv(j), to_uv(j + 1));
    Ok([
      face_uv_to_direction(face, u0, v0),
      face_uv_to_direction(face, u1, v0),
      face_uv_to_direction(face, u1, v1),
      face_uv_to_direction(face, u0, v1),
    ])
  }

  fn token_of(&self, cell: CellId) -> Result<String, HierarchyError> {
    self.validate(cell)?;
    let hex = format!("{:016x}", cell.raw());
    let trimmed = hex.trim_end_matches('0');
    Ok(if trimmed.is_empty() {
      "X".to_owned()
    } else {
      trimmed.to_owned()
    })
  }
}

#[cfg(test)]
#[path = "quad_sphere_test.rs"]
mod quad_sphere_test;
