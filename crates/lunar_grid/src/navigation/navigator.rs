//! Navigator - owns the selection stack and drives rendering, picking,
//! flights and events for one interactive session.
//!
//! Every fallible query is resolved before any state changes, so a pick miss
//! or adapter failure leaves the session exactly as it was.

use std::time::Duration;

use glam::{DVec2, DVec3};

use super::command::{CommandOutcome, IgnoreReason, NavCommand, NavState, ZoomDirection};
use super::stack::SelectionStack;
use crate::cell::{CellHierarchy, CellId, HierarchyError};
use crate::config::{ConfigError, NavigationConfig};
use crate::flight::{CameraPose, FlightController, MidFlightHook};
use crate::geo::LatLng;
use crate::picking::Picker;
use crate::render::{
  ActiveLayer, RenderDepthCache, RenderError, RenderInputs, RenderMode, RenderStyle, SceneBackend,
};
use crate::telemetry::{BlockEmitter, EventSink, NavEvent};

/// Resolved effect of a drill, computed before anything mutates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DrillPlan {
  /// Keep `keep` entries and push `cell` at the level of the first dropped one.
  Lateral { keep: usize, cell: CellId },
  /// Push the next ladder stop.
  Descend(CellId),
  /// Tap inside the terminal block.
  Focus(CellId),
}

/// One navigation session over a cell hierarchy.
pub struct Navigator<H: CellHierarchy> {
  hierarchy: H,
  config: NavigationConfig,
  stack: SelectionStack,
  focused: Option<CellId>,
  zoom_level: usize,
  cache: RenderDepthCache,
  picker: Picker,
  flight: FlightController,
  emitter: BlockEmitter,
}

impl<H: CellHierarchy> Navigator<H> {
  pub fn new(hierarchy: H, config: NavigationConfig) -> Result<Self, ConfigError> {
    Self::with_style(hierarchy, config, RenderStyle::default())
  }

  pub fn with_style(
    hierarchy: H,
    config: NavigationConfig,
    style: RenderStyle,
  ) -> Result<Self, ConfigError> {
    config.validate()?;
    Ok(Self {
      cache: RenderDepthCache::new(&config, style),
      picker: Picker::new(&config),
      flight: FlightController::from_config(&config),
      hierarchy,
      config,
      stack: SelectionStack::new(),
      focused: None,
      zoom_level: 0,
      emitter: BlockEmitter::new(),
    })
  }

  // ===========================================================================
  // Accessors
  // ===========================================================================

  pub fn hierarchy(&self) -> &H {
    &self.hierarchy
  }

  pub fn config(&self) -> &NavigationConfig {
    &self.config
  }

  pub fn stack(&self) -> &SelectionStack {
    &self.stack
  }

  pub fn focused(&self) -> Option<CellId> {
    self.focused
  }

  pub fn zoom_level(&self) -> usize {
    self.zoom_level
  }

  pub fn cache(&self) -> &RenderDepthCache {
    &self.cache
  }

  pub fn render_mode(&self) -> RenderMode {
    self.cache.mode()
  }

  pub fn is_flying(&self) -> bool {
    self.flight.is_active()
  }

  /// Block currently reported as selected.
  pub fn selected_block(&self) -> Option<CellId> {
    self.emitter.selected()
  }

  /// Level of the top of the stack, 0 for the global view.
  pub fn current_level(&self) -> Result<u8, HierarchyError> {
    match self.stack.top() {
      Some(top) => self.hierarchy.level_of(top),
      None => Ok(0),
    }
  }

  pub fn state(&self) -> NavState {
    match self.current_level() {
      Ok(0) => NavState::Global,
      Ok(level) if self.config.is_terminal(level) => NavState::Terminal {
        focused: self.focused,
      },
      Ok(level) => NavState::Drilling(level),
      Err(_) => NavState::Global,
    }
  }

  // ===========================================================================
  // Host entry points
  // ===========================================================================

  /// First render and global framing, once the scene is up.
  pub fn initialize<S, E>(&mut self, scene: &mut S, events: &mut E)
  where
    S: SceneBackend + ?Sized,
    E: EventSink + ?Sized,
  {
    self.render_all(scene, events);
    let pose = self.global_pose(scene.camera_pose());
    scene.set_camera_pose(pose);
    self.report_state(events);
  }

  /// Dispatch one command. `now` is the host clock used for flights.
  pub fn handle<S, E>(
    &mut self,
    command: NavCommand,
    now: Duration,
    scene: &mut S,
    events: &mut E,
  ) -> CommandOutcome
  where
    S: SceneBackend + ?Sized,
    E: EventSink + ?Sized,
  {
    tracing::trace!(?command, "navigation command");
    match command {
      NavCommand::Drill(screen) => self.drill_into(screen, now, scene, events),
      NavCommand::Hover(screen) => self.check_hover(screen, scene),
      NavCommand::GoBack => self.go_back(now, scene, events),
      NavCommand::Reset => self.reset(now, scene, events),
      NavCommand::Zoom(direction) => self.zoom(direction, now, scene, events),
      NavCommand::ToggleRenderMode => self.toggle_render_mode(scene, events),
      NavCommand::GoTo { lat, lng } => self.go_to(LatLng::new(lat, lng), now, scene, events),
    }
  }

  /// Advance the active flight. Returns whether the camera moved.
  pub fn tick<S, E>(&mut self, now: Duration, scene: &mut S, events: &mut E) -> bool
  where
    S: SceneBackend + ?Sized,
    E: EventSink + ?Sized,
  {
    let Some(frame) = self.flight.tick(now) else {
      return false;
    };
    scene.set_camera_pose(frame.pose);
    if let Some(hook) = frame.mid_flight {
      self.run_hook(hook, scene, events);
    }
    if frame.finished {
      tracing::trace!("flight finished");
    }
    true
  }

  // ===========================================================================
  // Operations
  // ===========================================================================

  /// Select the cell under `screen`: drill one stop deeper, switch laterally
  /// at the same depth, or focus inside the terminal block.
  pub fn drill_into<S, E>(
    &mut self,
    screen: DVec2,
    now: Duration,
    scene: &mut S,
    events: &mut E,
  ) -> CommandOutcome
  where
    S: SceneBackend + ?Sized,
    E: EventSink + ?Sized,
  {
    let plan = match self.plan_drill(screen, scene) {
      Ok(Some(plan)) => plan,
      Ok(None) => {
        tracing::debug!(?screen, "drill ignored, pick missed the globe");
        return CommandOutcome::Ignored(IgnoreReason::PickMiss);
      }
      Err(err) => {
        tracing::warn!(%err, "drill ignored, cell lookup failed");
        return CommandOutcome::Ignored(IgnoreReason::AdapterFailure);
      }
    };

    match plan {
      DrillPlan::Focus(cell) => {
        tracing::debug!(?cell, "focus inside terminal block");
        // The redraw below covers a drill's still-pending active layer
        let _ = self.flight.take_pending_hook();
        self.focused = Some(cell);
        self.render_active(scene, events);
        self.report_state(events);
        return CommandOutcome::Applied;
      }
      DrillPlan::Lateral { keep, cell } => {
        tracing::debug!(keep, ?cell, "lateral switch");
        self.flight.cancel();
        self.stack.truncate(keep);
        self.stack.push(cell);
      }
      DrillPlan::Descend(cell) => {
        tracing::debug!(?cell, depth = self.stack.len() + 1, "drill down");
        self.flight.cancel();
        self.stack.push(cell);
      }
    }
    self.focused = None;
    debug_assert!(self
      .stack
      .is_consistent(&self.hierarchy, &self.config)
      .unwrap_or(false));

    self.clear_hover(scene);
    let hook = if self.config.stagger_active_layer {
      self.render_persistent(scene);
      Some(MidFlightHook::RenderActiveLayer)
    } else {
      self.render_all(scene, events);
      None
    };
    if let Some(top) = self.stack.top() {
      self.fly_to_cell(top, hook, now, scene, events);
    }
    self.report_state(events);
    CommandOutcome::Applied
  }

  /// Pop one selection and fly back to the new top (or the globe).
  pub fn go_back<S, E>(&mut self, now: Duration, scene: &mut S, events: &mut E) -> CommandOutcome
  where
    S: SceneBackend + ?Sized,
    E: EventSink + ?Sized,
  {
    if self.stack.is_empty() {
      return CommandOutcome::Ignored(IgnoreReason::EmptyStack);
    }
    self.flight.cancel();
    let popped = self.stack.pop();
    self.focused = None;
    tracing::debug!(?popped, depth = self.stack.len(), "go back");

    self.emitter.deselect(events);
    self.clear_hover(scene);
    self.render_all(scene, events);
    match self.stack.top() {
      Some(top) => self.fly_to_cell(top, None, now, scene, events),
      None => self.fly_global(now, scene),
    }
    self.report_state(events);
    CommandOutcome::Applied
  }

  /// Back to the global view with every cache rebuilt.
  pub fn reset<S, E>(&mut self, now: Duration, scene: &mut S, events: &mut E) -> CommandOutcome
  where
    S: SceneBackend + ?Sized,
    E: EventSink + ?Sized,
  {
    tracing::debug!(depth = self.stack.len(), "reset");
    self.flight.cancel();
    self.stack.clear();
    self.focused = None;
    self.zoom_level = 0;
    self.emitter.deselect(events);
    self.cache.invalidate(scene);
    self.render_all(scene, events);
    self.fly_global(now, scene);
    self.report_state(events);
    CommandOutcome::Applied
  }

  /// Highlight the cell under `screen` at the current level.
  pub fn check_hover<S: SceneBackend + ?Sized>(
    &mut self,
    screen: DVec2,
    scene: &mut S,
  ) -> CommandOutcome {
    let target = match self.pick_at_current_level(screen, scene) {
      Ok(Some(cell)) if Some(cell) != self.focused => Some(cell),
      Ok(_) => None,
      Err(err) => {
        tracing::warn!(%err, "hover lookup failed");
        None
      }
    };
    match self.cache.set_hover(&self.hierarchy, scene, target) {
      Ok(true) => CommandOutcome::Applied,
      Ok(false) => CommandOutcome::Ignored(IgnoreReason::Unchanged),
      Err(RenderError::BackendNotReady) => CommandOutcome::Ignored(IgnoreReason::BackendNotReady),
      Err(err) => {
        tracing::warn!(%err, "hover highlight failed");
        CommandOutcome::Ignored(IgnoreReason::AdapterFailure)
      }
    }
  }

  /// Step through the zoom table and fly vertically above the current
  /// ground point.
  pub fn zoom<S, E>(
    &mut self,
    direction: ZoomDirection,
    now: Duration,
    scene: &mut S,
    events: &mut E,
  ) -> CommandOutcome
  where
    S: SceneBackend + ?Sized,
    E: EventSink + ?Sized,
  {
    let last = self.config.zoom_heights.len().saturating_sub(1);
    let next = match direction {
      ZoomDirection::In if self.zoom_level < last => self.zoom_level + 1,
      ZoomDirection::Out if self.zoom_level > 0 => self.zoom_level - 1,
      _ => return CommandOutcome::Ignored(IgnoreReason::ZoomLimit),
    };
    self.zoom_level = next;
    let height = self.config.zoom_height(next);
    tracing::debug!(zoom = next, height, "zoom");

    let start = scene.camera_pose();
    self.start_flight_over(start.ground_direction(), height, now, scene, events);
    CommandOutcome::Applied
  }

  /// Fly above a coordinate at the current zoom height.
  pub fn go_to<S, E>(
    &mut self,
    at: LatLng,
    now: Duration,
    scene: &mut S,
    events: &mut E,
  ) -> CommandOutcome
  where
    S: SceneBackend + ?Sized,
    E: EventSink + ?Sized,
  {
    if !(at.lat.is_finite() && at.lng.is_finite()) {
      return CommandOutcome::Ignored(IgnoreReason::Unchanged);
    }
    let height = self.config.zoom_height(self.zoom_level);
    tracing::debug!(lat = at.lat, lng = at.lng, height, "go to");
    self.start_flight_over(at.to_direction(), height, now, scene, events);
    CommandOutcome::Applied
  }

  /// Switch between fill and line rendering with a full rebuild.
  pub fn toggle_render_mode<S, E>(&mut self, scene: &mut S, events: &mut E) -> CommandOutcome
  where
    S: SceneBackend + ?Sized,
    E: EventSink + ?Sized,
  {
    let mode = self.cache.mode().toggled();
    self.cache.set_mode(mode, scene);
    tracing::debug!(?mode, "render mode");
    self.render_all(scene, events);
    CommandOutcome::Applied
  }

  // ===========================================================================
  // Planning
  // ===========================================================================

  fn pick_at_current_level<S: SceneBackend + ?Sized>(
    &self,
    screen: DVec2,
    scene: &S,
  ) -> Result<Option<CellId>, HierarchyError> {
    let level = self.current_level()?;
    let hit = self.picker.pick_cell(&self.hierarchy, scene, screen, level)?;
    Ok(hit.map(|hit| hit.cell))
  }

  fn plan_drill<S: SceneBackend + ?Sized>(
    &self,
    screen: DVec2,
    scene: &S,
  ) -> Result<Option<DrillPlan>, HierarchyError> {
    let current = self.current_level()?;
    let Some(hit) = self.picker.pick_cell(&self.hierarchy, scene, screen, current)? else {
      return Ok(None);
    };
    let direction = hit.direction();

    if let Some(top) = self.stack.top() {
      if hit.cell != top {
        // Deepest entry whose parent still contains the point
        let leaf = self.hierarchy.cell_from_point(direction)?;
        let mut keep = self.stack.len() - 1;
        while keep > 0 && !self.hierarchy.contains(self.stack[keep - 1], leaf)? {
          keep -= 1;
        }
        let level = self.hierarchy.level_of(self.stack[keep])?;
        let cell = self.hierarchy.ancestor_at_level(leaf, level)?;
        return Ok(Some(DrillPlan::Lateral { keep, cell }));
      }
    }

    if self.config.is_terminal(current) {
      return Ok(Some(DrillPlan::Focus(hit.cell)));
    }
    let next = self.config.next_stop(current);
    let cell = self.hierarchy.cell_at_level(direction, next)?;
    Ok(Some(DrillPlan::Descend(cell)))
  }

  // ===========================================================================
  // Rendering
  // ===========================================================================

  fn render_all<S, E>(&mut self, scene: &mut S, events: &mut E)
  where
    S: SceneBackend + ?Sized,
    E: EventSink + ?Sized,
  {
    let inputs = RenderInputs::new(self.stack.as_slice()).with_focus(self.focused);
    match self.cache.render(&self.hierarchy, scene, inputs) {
      Ok(active) => self.on_active_layer(active, events),
      Err(err) => log_render_error(&err),
    }
  }

  fn render_persistent<S: SceneBackend + ?Sized>(&mut self, scene: &mut S) {
    let inputs = RenderInputs::new(self.stack.as_slice());
    if let Err(err) = self.cache.render_persistent(&self.hierarchy, scene, inputs) {
      log_render_error(&err);
    }
  }

  fn render_active<S, E>(&mut self, scene: &mut S, events: &mut E)
  where
    S: SceneBackend + ?Sized,
    E: EventSink + ?Sized,
  {
    let inputs = RenderInputs::new(self.stack.as_slice()).with_focus(self.focused);
    match self.cache.render_active(&self.hierarchy, scene, inputs) {
      Ok(active) => self.on_active_layer(active, events),
      Err(err) => log_render_error(&err),
    }
  }

  fn on_active_layer<E: EventSink + ?Sized>(&mut self, active: ActiveLayer, events: &mut E) {
    match active {
      ActiveLayer::Terminal(cell) => {
        if let Err(err) = self.emitter.select(&self.hierarchy, cell, events) {
          tracing::warn!(%err, "terminal block not reported");
        }
      }
      ActiveLayer::Empty | ActiveLayer::Children { .. } => self.emitter.deselect(events),
    }
  }

  fn clear_hover<S: SceneBackend + ?Sized>(&mut self, scene: &mut S) {
    if let Err(err) = self.cache.set_hover(&self.hierarchy, scene, None) {
      log_render_error(&err);
    }
  }

  fn run_hook<S, E>(&mut self, hook: MidFlightHook, scene: &mut S, events: &mut E)
  where
    S: SceneBackend + ?Sized,
    E: EventSink + ?Sized,
  {
    match hook {
      MidFlightHook::RenderActiveLayer => self.render_active(scene, events),
    }
  }

  // ===========================================================================
  // Flights
  // ===========================================================================

  fn global_pose(&self, from: CameraPose) -> CameraPose {
    CameraPose::above(
      from.ground_direction(),
      self.config.sphere_radius,
      self.config.heights.global,
      from.heading,
    )
  }

  fn fly_global<S: SceneBackend + ?Sized>(&mut self, now: Duration, scene: &mut S) {
    let start = scene.camera_pose();
    let target = self.global_pose(start);
    self.flight.start(start, target, now, None);
  }

  /// Fly above `cell` at its level's height. The hook runs immediately if no
  /// flight can be planned.
  fn fly_to_cell<S, E>(
    &mut self,
    cell: CellId,
    hook: Option<MidFlightHook>,
    now: Duration,
    scene: &mut S,
    events: &mut E,
  ) where
    S: SceneBackend + ?Sized,
    E: EventSink + ?Sized,
  {
    match self.cell_pose(cell, scene) {
      Ok(target) => {
        let start = scene.camera_pose();
        self.flight.start(start, target, now, hook);
      }
      Err(err) => {
        tracing::warn!(%err, ?cell, "flight target unavailable");
        if let Some(hook) = hook {
          self.run_hook(hook, scene, events);
        }
      }
    }
  }

  fn cell_pose<S: SceneBackend + ?Sized>(
    &self,
    cell: CellId,
    scene: &S,
  ) -> Result<CameraPose, HierarchyError> {
    let level = self.hierarchy.level_of(cell)?;
    let center = self.hierarchy.center_of(cell)?;
    let terrain = if self.config.is_terminal(level) {
      scene.terrain_height(LatLng::from_direction(center))
    } else {
      None
    };
    let height = self.config.target_height(level, terrain);
    let heading = scene.camera_pose().heading;
    Ok(CameraPose::above(center, self.config.sphere_radius, height, heading))
  }

  /// Camera-only flight; an interrupted drill still gets its active layer.
  fn start_flight_over<S, E>(
    &mut self,
    direction: DVec3,
    height: f64,
    now: Duration,
    scene: &mut S,
    events: &mut E,
  ) where
    S: SceneBackend + ?Sized,
    E: EventSink + ?Sized,
  {
    if let Some(hook) = self.flight.take_pending_hook() {
      self.run_hook(hook, scene, events);
    }
    let start = scene.camera_pose();
    let target = CameraPose::above(direction, self.config.sphere_radius, height, start.heading);
    self.flight.start(start, target, now, None);
  }

  // ===========================================================================
  // Events
  // ===========================================================================

  fn report_state<E: EventSink + ?Sized>(&self, events: &mut E) {
    let level = self.current_level().unwrap_or(0);
    let selected_token = self
      .stack
      .top()
      .and_then(|top| self.hierarchy.token_of(top).ok());
    events.emit(NavEvent::StateChanged {
      level,
      stack_depth: self.stack.len(),
      selected_token,
    });
    events.emit(NavEvent::DepthChanged {
      can_go_back: !self.stack.is_empty(),
    });
  }
}

fn log_render_error(err: &RenderError) {
  match err {
    RenderError::BackendNotReady => tracing::debug!("render skipped until the scene is ready"),
    RenderError::Hierarchy(err) => tracing::warn!(%err, "render pass failed"),
  }
}

#[cfg(test)]
#[path = "navigator_test.rs"]
mod navigator_test;
