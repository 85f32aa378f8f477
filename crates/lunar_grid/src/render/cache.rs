//! RenderDepthCache - persistent per-generation layers plus volatile active
//! and hover collections.
//!
//! Each persistent slot remembers the [`LayerKey`] it was drawn for. A pass
//! computes the keys the current stack needs, keeps the longest matching
//! prefix and redraws from the first mismatch:
//!
//! ```text
//!  drawn    [Base, S(face→C4), S(C4→C8)]
//!  wanted   [Base, S(face→C4), S(C4→C8'), S(C8'→C12)]   lateral + drill
//!  kept      ^^^^  ^^^^^^^^^^
//!  redrawn                     ^^^^^^^^^^  ^^^^^^^^^^^
//! ```
//!
//! Drill-down, back navigation and lateral switches all reduce to this one
//! rule; a mode toggle invalidates everything.

use rayon::prelude::*;

use super::stats::{PassRecord, PassTimer};
use super::{
  CollectionId, Primitive, RenderError, RenderMode, RenderStats, RenderStyle, Rgba, SceneBackend,
};
use crate::cell::{CellHierarchy, CellId, HierarchyError};
use crate::config::NavigationConfig;
use crate::geometry::GeometryBuilder;

/// Identity of one persistent layer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum LayerKey {
  /// Every cell of the first stop over the whole sphere.
  BaseGrid,
  /// Cells at `level` under `parent`, minus `excluded`.
  Siblings {
    parent: CellId,
    level: u8,
    excluded: Option<CellId>,
  },
}

/// What the volatile active collection shows after a pass.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ActiveLayer {
  /// Nothing selected; the base grid is the next generation.
  Empty,
  /// Next selectable generation under the top of the stack.
  Children { parent: CellId, level: u8, count: usize },
  /// The selected terminal block.
  Terminal(CellId),
}

/// Navigation state a pass renders.
#[derive(Clone, Copy, Debug)]
pub struct RenderInputs<'a> {
  pub stack: &'a [CellId],
  pub focused: Option<CellId>,
}

impl<'a> RenderInputs<'a> {
  pub fn new(stack: &'a [CellId]) -> Self {
    Self {
      stack,
      focused: None,
    }
  }

  pub fn with_focus(mut self, focused: Option<CellId>) -> Self {
    self.focused = focused;
    self
  }
}

#[derive(Clone, Copy, Debug)]
enum Shape {
  Inset,
  Ring,
  Outline,
}

/// Owns every draw collection the navigator submits.
pub struct RenderDepthCache {
  geometry: GeometryBuilder,
  style: RenderStyle,
  mode: RenderMode,
  config: NavigationConfig,
  keys: Vec<LayerKey>,
  active_drawn: bool,
  hovered: Option<CellId>,
  invalidations: u64,
  stats: RenderStats,
}

impl RenderDepthCache {
  pub fn new(config: &NavigationConfig, style: RenderStyle) -> Self {
    Self {
      geometry: GeometryBuilder::new(config),
      style,
      mode: config.render_mode,
      config: config.clone(),
      keys: Vec::new(),
      active_drawn: false,
      hovered: None,
      invalidations: 0,
      stats: RenderStats::default(),
    }
  }

  // ===========================================================================
  // State
  // ===========================================================================

  /// Number of persistent layers currently drawn.
  #[inline]
  pub fn depth(&self) -> usize {
    self.keys.len()
  }

  pub fn keys(&self) -> &[LayerKey] {
    &self.keys
  }

  pub fn mode(&self) -> RenderMode {
    self.mode
  }

  pub fn style(&self) -> &RenderStyle {
    &self.style
  }

  pub fn stats(&self) -> &RenderStats {
    &self.stats
  }

  pub fn hovered(&self) -> Option<CellId> {
    self.hovered
  }

  /// Full invalidations since creation.
  pub fn invalidations(&self) -> u64 {
    self.invalidations
  }

  /// Switch render mode. Any change invalidates every collection.
  pub fn set_mode<S: SceneBackend + ?Sized>(&mut self, mode: RenderMode, scene: &mut S) -> bool {
    if mode == self.mode {
      return false;
    }
    self.mode = mode;
    self.invalidate(scene);
    true
  }

  /// Drop every collection; the next pass redraws from the base grid.
  pub fn invalidate<S: SceneBackend + ?Sized>(&mut self, scene: &mut S) {
    for slot in (0..self.keys.len()).rev() {
      scene.remove_collection(CollectionId::Persistent(slot));
    }
    self.keys.clear();
    if self.active_drawn {
      scene.remove_collection(CollectionId::Active);
      self.active_drawn = false;
    }
    if self.hovered.take().is_some() {
      scene.remove_collection(CollectionId::Hover);
    }
    self.invalidations += 1;
    tracing::debug!(mode = ?self.mode, "render cache invalidated");
  }

  // ===========================================================================
  // Passes
  // ===========================================================================

  /// Persistent and active layers in one pass.
  #[cfg_attr(
    feature = "profiling",
    tracing::instrument(skip_all, name = "render_cache::render")
  )]
  pub fn render<H, S>(
    &mut self,
    hierarchy: &H,
    scene: &mut S,
    inputs: RenderInputs<'_>,
  ) -> Result<ActiveLayer, RenderError>
  where
    H: CellHierarchy + ?Sized,
    S: SceneBackend + ?Sized,
  {
    self.ensure_ready(scene)?;
    let timer = PassTimer::start();
    let mut record = PassRecord::default();
    self.sync_persistent(hierarchy, scene, inputs.stack, &mut record)?;
    let active = self.draw_active(hierarchy, scene, inputs, &mut record)?;
    record.duration_us = timer.elapsed_us();
    self.stats.record(record);
    Ok(active)
  }

  /// Persistent layers only; the active collection is left as it is.
  #[cfg_attr(
    feature = "profiling",
    tracing::instrument(skip_all, name = "render_cache::render_persistent")
  )]
  pub fn render_persistent<H, S>(
    &mut self,
    hierarchy: &H,
    scene: &mut S,
    inputs: RenderInputs<'_>,
  ) -> Result<(), RenderError>
  where
    H: CellHierarchy + ?Sized,
    S: SceneBackend + ?Sized,
  {
    self.ensure_ready(scene)?;
    let timer = PassTimer::start();
    let mut record = PassRecord::default();
    self.sync_persistent(hierarchy, scene, inputs.stack, &mut record)?;
    record.duration_us = timer.elapsed_us();
    self.stats.record(record);
    Ok(())
  }

  /// Active layer only.
  #[cfg_attr(
    feature = "profiling",
    tracing::instrument(skip_all, name = "render_cache::render_active")
  )]
  pub fn render_active<H, S>(
    &mut self,
    hierarchy: &H,
    scene: &mut S,
    inputs: RenderInputs<'_>,
  ) -> Result<ActiveLayer, RenderError>
  where
    H: CellHierarchy + ?Sized,
    S: SceneBackend + ?Sized,
  {
    self.ensure_ready(scene)?;
    let timer = PassTimer::start();
    let mut record = PassRecord::default();
    let active = self.draw_active(hierarchy, scene, inputs, &mut record)?;
    record.duration_us = timer.elapsed_us();
    self.stats.record(record);
    Ok(active)
  }

  /// Replace the single-entry hover highlight. Returns whether it changed.
  pub fn set_hover<H, S>(
    &mut self,
    hierarchy: &H,
    scene: &mut S,
    cell: Option<CellId>,
  ) -> Result<bool, RenderError>
  where
    H: CellHierarchy + ?Sized,
    S: SceneBackend + ?Sized,
  {
    if cell == self.hovered {
      return Ok(false);
    }
    self.ensure_ready(scene)?;
    match cell {
      Some(cell) => {
        let shape = self.highlight_shape();
        let primitive = self.primitive(hierarchy, cell, shape, self.style.hover)?;
        scene.submit(CollectionId::Hover, vec![primitive]);
      }
      None => scene.remove_collection(CollectionId::Hover),
    }
    self.hovered = cell;
    Ok(true)
  }

  // ===========================================================================
  // Internals
  // ===========================================================================

  fn ensure_ready<S: SceneBackend + ?Sized>(&mut self, scene: &S) -> Result<(), RenderError> {
    if scene.is_ready() {
      Ok(())
    } else {
      self.stats.record_skipped();
      tracing::debug!("render pass skipped, backend not ready");
      Err(RenderError::BackendNotReady)
    }
  }

  /// Keys the persistent slots must hold for `stack`.
  pub fn wanted_keys<H: CellHierarchy + ?Sized>(
    &self,
    hierarchy: &H,
    stack: &[CellId],
  ) -> Result<Vec<LayerKey>, HierarchyError> {
    let mut keys = Vec::with_capacity(stack.len() + 1);
    keys.push(LayerKey::BaseGrid);
    let mut parent_level = 0;
    for (index, &cell) in stack.iter().enumerate() {
      let level = hierarchy.level_of(cell)?;
      // Only the innermost selection gets its own ring in the active layer
      let innermost = index + 1 == stack.len();
      keys.push(LayerKey::Siblings {
        parent: hierarchy.ancestor_at_level(cell, parent_level)?,
        level,
        excluded: (self.mode == RenderMode::Line && innermost).then_some(cell),
      });
      parent_level = level;
    }
    Ok(keys)
  }

  fn sync_persistent<H, S>(
    &mut self,
    hierarchy: &H,
    scene: &mut S,
    stack: &[CellId],
    record: &mut PassRecord,
  ) -> Result<(), RenderError>
  where
    H: CellHierarchy + ?Sized,
    S: SceneBackend + ?Sized,
  {
    let wanted = self.wanted_keys(hierarchy, stack)?;
    let keep = self
      .keys
      .iter()
      .zip(wanted.iter())
      .take_while(|(drawn, want)| drawn == want)
      .count();

    let drawn = self.keys.len();
    for slot in (wanted.len()..drawn).rev() {
      scene.remove_collection(CollectionId::Persistent(slot));
      record.collections_removed += 1;
    }
    self.keys.truncate(keep);

    for (slot, key) in wanted.iter().enumerate().skip(keep) {
      let primitives = match self.layer_primitives(hierarchy, slot, *key) {
        Ok(primitives) => primitives,
        Err(err) => {
          // Old layers past the last redrawn slot are no longer tracked
          for stale in (slot..drawn.min(wanted.len())).rev() {
            scene.remove_collection(CollectionId::Persistent(stale));
            record.collections_removed += 1;
          }
          return Err(err.into());
        }
      };
      record.cells_drawn += primitives.len();
      record.collections_submitted += 1;
      scene.submit(CollectionId::Persistent(slot), primitives);
      self.keys.push(*key);
    }

    if keep < wanted.len() {
      tracing::trace!(kept = keep, depth = self.keys.len(), "persistent layers synced");
    }
    Ok(())
  }

  fn layer_primitives<H: CellHierarchy + ?Sized>(
    &self,
    hierarchy: &H,
    slot: usize,
    key: LayerKey,
  ) -> Result<Vec<Primitive>, HierarchyError> {
    let (cells, color, shape) = match key {
      LayerKey::BaseGrid => {
        let shape = match self.mode {
          RenderMode::Fill => Shape::Inset,
          RenderMode::Line => Shape::Outline,
        };
        (hierarchy.cells_at_level(self.config.first_stop())?, self.style.base, shape)
      }
      LayerKey::Siblings {
        parent,
        level,
        excluded,
      } => {
        let mut cells = hierarchy.descendants_at_level(parent, level)?;
        if let Some(excluded) = excluded {
          cells.retain(|cell| *cell != excluded);
        }
        (cells, self.style.sibling_color(slot), self.highlight_shape())
      }
    };
    self.build_batch(hierarchy, &cells, shape, color)
  }

  fn draw_active<H, S>(
    &mut self,
    hierarchy: &H,
    scene: &mut S,
    inputs: RenderInputs<'_>,
    record: &mut PassRecord,
  ) -> Result<ActiveLayer, RenderError>
  where
    H: CellHierarchy + ?Sized,
    S: SceneBackend + ?Sized,
  {
    let Some(&top) = inputs.stack.last() else {
      if self.active_drawn {
        scene.remove_collection(CollectionId::Active);
        record.collections_removed += 1;
        self.active_drawn = false;
      }
      return Ok(ActiveLayer::Empty);
    };

    let level = hierarchy.level_of(top)?;
    let shape = self.highlight_shape();
    let (mut primitives, active) = if self.config.is_terminal(level) {
      let highlight = self.primitive(hierarchy, top, shape, self.style.highlight)?;
      (vec![highlight], ActiveLayer::Terminal(top))
    } else {
      let next = self.config.next_stop(level);
      let children = hierarchy.descendants_at_level(top, next)?;
      let mut primitives = self.build_batch(hierarchy, &children, shape, self.style.active)?;
      if self.mode == RenderMode::Line {
        primitives.push(self.primitive(hierarchy, top, Shape::Ring, self.style.highlight)?);
      }
      let active = ActiveLayer::Children {
        parent: top,
        level: next,
        count: children.len(),
      };
      (primitives, active)
    };

    if let Some(focused) = inputs.focused {
      primitives.push(self.primitive(hierarchy, focused, shape, self.style.focus)?);
    }

    record.cells_drawn += primitives.len();
    record.collections_submitted += 1;
    scene.submit(CollectionId::Active, primitives);
    self.active_drawn = true;
    Ok(active)
  }

  fn highlight_shape(&self) -> Shape {
    match self.mode {
      RenderMode::Fill => Shape::Inset,
      RenderMode::Line => Shape::Ring,
    }
  }

  /// Geometry for a whole layer, built on the rayon pool.
  fn build_batch<H: CellHierarchy + ?Sized>(
    &self,
    hierarchy: &H,
    cells: &[CellId],
    shape: Shape,
    color: Rgba,
  ) -> Result<Vec<Primitive>, HierarchyError> {
    cells
      .par_iter()
      .map(|&cell| self.primitive(hierarchy, cell, shape, color))
      .collect()
  }

  fn primitive<H: CellHierarchy + ?Sized>(
    &self,
    hierarchy: &H,
    cell: CellId,
    shape: Shape,
    color: Rgba,
  ) -> Result<Primitive, HierarchyError> {
    Ok(match shape {
      Shape::Inset => Primitive::Polygon {
        vertices: self.geometry.inset_polygon(hierarchy, cell)?,
        color,
      },
      Shape::Ring => {
        let (outer, inner) = self.geometry.border_ring(hierarchy, cell)?;
        Primitive::Ring { outer, inner, color }
      }
      Shape::Outline => Primitive::Polyline {
        vertices: self.geometry.outline(hierarchy, cell)?,
        width: self.config.grid_line_width,
        color,
      },
    })
  }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;
