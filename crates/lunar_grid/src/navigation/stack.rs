//! SelectionStack - the drill path from the global view to the current cell.

use std::ops::Index;

use smallvec::SmallVec;

use crate::cell::{CellHierarchy, CellId, HierarchyError};
use crate::config::NavigationConfig;

/// Ordered selections, shallowest first. Empty = global view.
///
/// Each entry lies strictly inside the previous one; levels follow the
/// ladder of [`NavigationConfig::next_stop`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionStack {
  cells: SmallVec<[CellId; 8]>,
}

impl SelectionStack {
  pub fn new() -> Self {
    Self::default()
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.cells.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }

  #[inline]
  pub fn top(&self) -> Option<CellId> {
    self.cells.last().copied()
  }

  pub fn get(&self, index: usize) -> Option<CellId> {
    self.cells.get(index).copied()
  }

  pub fn as_slice(&self) -> &[CellId] {
    &self.cells
  }

  pub fn iter(&self) -> impl Iterator<Item = CellId> + '_ {
    self.cells.iter().copied()
  }

  pub(crate) fn push(&mut self, cell: CellId) {
    self.cells.push(cell);
  }

  pub(crate) fn pop(&mut self) -> Option<CellId> {
    self.cells.pop()
  }

  pub(crate) fn truncate(&mut self, len: usize) {
    self.cells.truncate(len);
  }

  pub(crate) fn clear(&mut self) {
    self.cells.clear();
  }

  /// Check the drill-path invariants: every entry descends from the previous
  /// one and sits exactly one ladder stop below it.
  pub fn is_consistent<H: CellHierarchy + ?Sized>(
    &self,
    hierarchy: &H,
    config: &NavigationConfig,
  ) -> Result<bool, HierarchyError> {
    let mut expected = config.first_stop();
    let mut parent: Option<CellId> = None;
    for cell in self.iter() {
      if hierarchy.level_of(cell)? != expected {
        return Ok(false);
      }
      if let Some(parent) = parent {
        if !hierarchy.contains(parent, cell)? || parent == cell {
          return Ok(false);
        }
      }
      parent = Some(cell);
      expected = config.next_stop(expected);
    }
    Ok(true)
  }
}

impl Index<usize> for SelectionStack {
  type Output = CellId;

  fn index(&self, index: usize) -> &CellId {
    &self.cells[index]
  }
}

#[cfg(test)]
#[path = "stack_test.rs"]
mod stack_test;
