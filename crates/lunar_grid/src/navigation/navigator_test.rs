use smallvec::SmallVec;

use super::*;
use crate::cell::{CellChildren, QuadSphere};
use crate::constants::MOON_RADIUS_M;
use crate::render::{CollectionId, HeadlessScene};

const LAT: f64 = 10.0;
const LNG: f64 = 20.0;

/// Long enough to finish any flight started at zero.
const LATER: Duration = Duration::from_secs(60);

type Session = (Navigator<QuadSphere>, HeadlessScene, Vec<NavEvent>);

fn session_with(config: NavigationConfig, scene: HeadlessScene) -> Session {
  let mut nav = Navigator::new(QuadSphere::new(), config).unwrap();
  let mut scene = scene;
  let mut events = Vec::new();
  nav.initialize(&mut scene, &mut events);
  (nav, scene, events)
}

fn session() -> Session {
  session_with(NavigationConfig::default(), HeadlessScene::default())
}

fn drill(session: &mut Session, screen: DVec2) -> CommandOutcome {
  let (nav, scene, events) = session;
  nav.handle(NavCommand::Drill(screen), Duration::ZERO, scene, events)
}

fn command(session: &mut Session, command: NavCommand) -> CommandOutcome {
  let (nav, scene, events) = session;
  nav.handle(command, Duration::ZERO, scene, events)
}

fn finish_flight(session: &mut Session) {
  let (nav, scene, events) = session;
  nav.tick(LATER, scene, events);
}

/// Screen position over the center of `cell`.
fn screen_of(nav: &Navigator<QuadSphere>, cell: CellId) -> DVec2 {
  let at = LatLng::from_direction(nav.hierarchy().center_of(cell).unwrap());
  HeadlessScene::screen_point(at.lat, at.lng)
}

fn levels(nav: &Navigator<QuadSphere>) -> Vec<u8> {
  nav
    .stack()
    .iter()
    .map(|cell| nav.hierarchy().level_of(cell).unwrap())
    .collect()
}

fn a() -> DVec2 {
  HeadlessScene::screen_point(LAT, LNG)
}

// =========================================================================
// Startup
// =========================================================================

#[test]
fn test_initialize_draws_base_grid_and_frames_globe() {
  let (nav, scene, events) = session();
  assert_eq!(nav.state(), NavState::Global);
  assert_eq!(nav.cache().depth(), 1);
  let height = scene.camera_pose().height_above(MOON_RADIUS_M);
  assert!((height - nav.config().heights.global).abs() < 1e-3);
  assert_eq!(
    events,
    vec![
      NavEvent::StateChanged {
        level: 0,
        stack_depth: 0,
        selected_token: None
      },
      NavEvent::DepthChanged { can_go_back: false },
    ]
  );
}

#[test]
fn test_invalid_config_is_rejected() {
  let config = NavigationConfig::default().with_terminal_level(40);
  assert!(Navigator::new(QuadSphere::new(), config).is_err());
}

// =========================================================================
// Drill-down
// =========================================================================

/// Global → drill A (C4) → drill B (C8 in C4) → back.
#[test]
fn test_drill_twice_then_back_scenario() {
  let mut s = session();
  assert_eq!(drill(&mut s, a()), CommandOutcome::Applied);
  let c4 = s.0.stack().top().unwrap();
  assert_eq!(s.0.hierarchy().level_of(c4).unwrap(), 4);

  let c8 = s.0.hierarchy().descendants_at_level(c4, 8).unwrap()[37];
  let b = screen_of(&s.0, c8);
  assert_eq!(drill(&mut s, b), CommandOutcome::Applied);
  assert_eq!(s.0.stack().as_slice(), &[c4, c8]);
  assert_eq!(s.0.cache().depth(), 3);
  assert_eq!(s.0.state(), NavState::Drilling(8));

  assert_eq!(command(&mut s, NavCommand::GoBack), CommandOutcome::Applied);
  assert_eq!(s.0.stack().as_slice(), &[c4]);
  assert_eq!(s.0.cache().depth(), 2);

  finish_flight(&mut s);
  let pose = s.1.camera_pose();
  let center = s.0.hierarchy().center_of(c4).unwrap();
  assert!((pose.ground_direction() - center).length() < 1e-9);
  assert!((pose.height_above(MOON_RADIUS_M) - s.0.config().heights.regional).abs() < 1e-3);
}

#[test]
fn test_successive_levels_follow_ladder() {
  let mut s = session();
  for _ in 0..4 {
    assert_eq!(drill(&mut s, a()), CommandOutcome::Applied);
  }
  assert_eq!(levels(&s.0), vec![4, 8, 12, 16]);
  assert!(s
    .0
    .stack()
    .is_consistent(s.0.hierarchy(), s.0.config())
    .unwrap());
}

#[test]
fn test_last_step_jumps_to_terminal_level() {
  let config = NavigationConfig::default().with_terminal_level(14);
  let mut s = session_with(config, HeadlessScene::default());
  for _ in 0..5 {
    drill(&mut s, a());
  }
  assert_eq!(levels(&s.0), vec![4, 8, 12, 14]);
  assert!(matches!(s.0.state(), NavState::Terminal { .. }));
}

#[test]
fn test_drill_reports_state() {
  let mut s = session();
  s.2.clear();
  drill(&mut s, a());
  let token = s.0.hierarchy().token_of(s.0.stack()[0]).unwrap();
  assert_eq!(
    s.2,
    vec![
      NavEvent::StateChanged {
        level: 4,
        stack_depth: 1,
        selected_token: Some(token)
      },
      NavEvent::DepthChanged { can_go_back: true },
    ]
  );
}

#[test]
fn test_active_layer_waits_for_mid_flight() {
  let mut s = session();
  drill(&mut s, a());
  assert!(s.1.collection(CollectionId::Active).is_none());
  assert_eq!(s.1.persistent_count(), 2);

  let (nav, scene, events) = &mut s;
  assert!(nav.tick(Duration::from_millis(100), scene, events));
  assert!(scene.collection(CollectionId::Active).is_none());
  nav.tick(Duration::from_millis(600), scene, events);
  assert_eq!(scene.collection(CollectionId::Active).unwrap().len(), 256);
}

#[test]
fn test_unstaggered_drill_draws_active_layer_immediately() {
  let config = NavigationConfig::default().with_stagger_active_layer(false);
  let mut s = session_with(config, HeadlessScene::default());
  drill(&mut s, a());
  assert_eq!(s.1.collection(CollectionId::Active).unwrap().len(), 256);
}

#[test]
fn test_new_drill_replaces_running_flight() {
  let mut s = session();
  drill(&mut s, a());
  let first = s.0.stack().top().unwrap();
  drill(&mut s, a());
  finish_flight(&mut s);

  let top = s.0.stack().top().unwrap();
  assert_ne!(first, top);
  let center = s.0.hierarchy().center_of(top).unwrap();
  assert!((s.1.camera_pose().ground_direction() - center).length() < 1e-9);
  assert!(!s.0.is_flying());
}

// =========================================================================
// Lateral switch
// =========================================================================

#[test]
fn test_lateral_switch_replaces_last_entry() {
  let mut s = session();
  drill(&mut s, a());
  drill(&mut s, a());
  let before = s.0.stack().clone();

  let sibling = s
    .0
    .hierarchy()
    .descendants_at_level(before[0], 8)
    .unwrap()
    .into_iter()
    .find(|cell| *cell != before[1])
    .unwrap();
  let screen = screen_of(&s.0, sibling);
  assert_eq!(drill(&mut s, screen), CommandOutcome::Applied);

  assert_eq!(s.0.stack().len(), 2);
  assert_eq!(s.0.stack()[0], before[0]);
  assert_eq!(s.0.stack()[1], sibling);
  assert_eq!(s.0.cache().depth(), 3);
}

#[test]
fn test_lateral_switch_outside_parent_truncates() {
  let mut s = session();
  drill(&mut s, a());
  drill(&mut s, a());
  let c4 = s.0.stack()[0];

  let face = s.0.hierarchy().ancestor_at_level(c4, 0).unwrap();
  let other_c4 = s
    .0
    .hierarchy()
    .descendants_at_level(face, 4)
    .unwrap()
    .into_iter()
    .find(|cell| *cell != c4)
    .unwrap();
  let screen = screen_of(&s.0, other_c4);
  drill(&mut s, screen);

  assert_eq!(s.0.stack().as_slice(), &[other_c4]);
  assert!(s
    .0
    .stack()
    .is_consistent(s.0.hierarchy(), s.0.config())
    .unwrap());
}

#[test]
fn test_lateral_switch_never_grows_stack() {
  let mut s = session();
  for _ in 0..3 {
    drill(&mut s, a());
  }
  let len = s.0.stack().len();
  for (lat, lng) in [(10.3, 20.4), (-35.0, 140.0), (60.0, -80.0), (10.6, 19.5)] {
    drill(&mut s, HeadlessScene::screen_point(lat, lng));
    assert!(s.0.stack().len() <= len);
  }
}

// =========================================================================
// Terminal
// =========================================================================

#[test]
fn test_tap_inside_terminal_block_focuses_without_flight() {
  let mut s = session();
  for _ in 0..4 {
    drill(&mut s, a());
  }
  finish_flight(&mut s);
  let top = s.0.stack().top().unwrap();

  assert_eq!(drill(&mut s, a()), CommandOutcome::Applied);
  assert_eq!(s.0.stack().len(), 4);
  assert_eq!(s.0.focused(), Some(top));
  assert_eq!(s.0.state(), NavState::Terminal { focused: Some(top) });
  assert!(!s.0.is_flying());
  // Highlight and focus
  assert_eq!(s.1.collection(CollectionId::Active).unwrap().len(), 2);
}

#[test]
fn test_focus_during_terminal_flight_reports_block_once() {
  let mut s = session();
  for _ in 0..3 {
    drill(&mut s, a());
  }
  finish_flight(&mut s);
  drill(&mut s, a());
  assert!(s.0.is_flying());
  s.2.clear();

  // Tap the block before the flight reaches its mid point
  assert_eq!(drill(&mut s, a()), CommandOutcome::Applied);
  finish_flight(&mut s);

  let selected = s
    .2
    .iter()
    .filter(|event| matches!(event, NavEvent::CellSelected { .. }))
    .count();
  assert_eq!(selected, 1);
  assert!(s.0.focused().is_some());
  assert_eq!(s.1.collection(CollectionId::Active).unwrap().len(), 2);
}

#[test]
fn test_terminal_block_is_reported_and_deselected_on_back() {
  let mut s = session();
  for _ in 0..4 {
    drill(&mut s, a());
  }
  s.2.clear();
  finish_flight(&mut s);

  let top = s.0.stack().top().unwrap();
  let token = s.0.hierarchy().token_of(top).unwrap();
  assert!(s.2.iter().any(|event| matches!(
    event,
    NavEvent::CellSelected { token: t, level: 16, .. } if *t == token
  )));
  assert_eq!(s.0.selected_block(), Some(top));

  s.2.clear();
  command(&mut s, NavCommand::GoBack);
  assert_eq!(s.2.first(), Some(&NavEvent::CellDeselected));
  assert_eq!(s.0.selected_block(), None);
}

#[test]
fn test_terminal_flight_clears_terrain() {
  let scene = HeadlessScene::default().with_terrain_height(5_000.0);
  let mut s = session_with(NavigationConfig::default(), scene);
  for _ in 0..4 {
    drill(&mut s, a());
  }
  finish_flight(&mut s);
  let expected = 5_000.0 + s.0.config().heights.terminal;
  assert!((s.1.camera_pose().height_above(MOON_RADIUS_M) - expected).abs() < 1e-3);
}

// =========================================================================
// Back and reset
// =========================================================================

#[test]
fn test_back_n_times_reaches_global() {
  let mut s = session();
  for _ in 0..3 {
    drill(&mut s, a());
  }
  for _ in 0..3 {
    assert_eq!(command(&mut s, NavCommand::GoBack), CommandOutcome::Applied);
  }
  assert!(s.0.stack().is_empty());
  assert_eq!(s.0.state(), NavState::Global);
  assert_eq!(s.0.cache().depth(), 1);
  assert!(s.0.is_flying());
  assert_eq!(
    command(&mut s, NavCommand::GoBack),
    CommandOutcome::Ignored(IgnoreReason::EmptyStack)
  );

  finish_flight(&mut s);
  let height = s.1.camera_pose().height_above(MOON_RADIUS_M);
  assert!((height - s.0.config().heights.global).abs() < 1e-3);
}

#[test]
fn test_reset_clears_everything() {
  let mut s = session();
  for _ in 0..5 {
    drill(&mut s, a());
  }
  command(&mut s, NavCommand::Zoom(ZoomDirection::In));
  assert!(s.0.focused().is_some());

  assert_eq!(command(&mut s, NavCommand::Reset), CommandOutcome::Applied);
  assert!(s.0.stack().is_empty());
  assert_eq!(s.0.focused(), None);
  assert_eq!(s.0.zoom_level(), 0);
  assert_eq!(s.0.cache().invalidations(), 1);
  // Rebuilt with the base grid only
  assert_eq!(s.0.cache().depth(), 1);
  assert_eq!(
    s.1.collection_ids(),
    vec![CollectionId::Persistent(0)]
  );
}

#[test]
fn test_reset_on_unready_scene_leaves_cache_empty() {
  let mut s = session();
  drill(&mut s, a());
  s.1.set_ready(false);
  command(&mut s, NavCommand::Reset);
  assert_eq!(s.0.cache().depth(), 0);
  assert!(s.0.stack().is_empty());
}

// =========================================================================
// Failures
// =========================================================================

#[test]
fn test_pick_miss_is_noop() {
  let mut s = session();
  drill(&mut s, a());
  finish_flight(&mut s);
  let stack = s.0.stack().clone();
  s.2.clear();
  s.1.clear_log();

  assert_eq!(
    drill(&mut s, HeadlessScene::off_globe()),
    CommandOutcome::Ignored(IgnoreReason::PickMiss)
  );
  assert_eq!(s.0.stack(), &stack);
  assert!(s.2.is_empty());
  assert!(s.1.submissions().is_empty());
  assert!(!s.0.is_flying());
}

#[test]
fn test_unready_scene_defers_rendering_to_next_action() {
  let scene = HeadlessScene::default().with_ready(false);
  let mut s = session_with(NavigationConfig::default(), scene);
  assert_eq!(s.0.cache().depth(), 0);

  drill(&mut s, a());
  assert_eq!(s.0.stack().len(), 1);
  assert_eq!(s.0.cache().depth(), 0);
  assert!(s.0.cache().stats().skipped_passes > 0);

  s.1.set_ready(true);
  drill(&mut s, a());
  assert_eq!(s.0.cache().depth(), 3);
}

/// Delegates to QuadSphere but cannot locate points.
struct Blind(QuadSphere);

impl CellHierarchy for Blind {
  fn roots(&self) -> SmallVec<[CellId; 6]> {
    self.0.roots()
  }
  fn cell_from_point(&self, _direction: DVec3) -> Result<CellId, HierarchyError> {
    Err(HierarchyError::DegeneratePoint)
  }
  fn ancestor_at_level(&self, cell: CellId, level: u8) -> Result<CellId, HierarchyError> {
    self.0.ancestor_at_level(cell, level)
  }
  fn children_of(&self, cell: CellId) -> Result<CellChildren, HierarchyError> {
    self.0.children_of(cell)
  }
  fn level_of(&self, cell: CellId) -> Result<u8, HierarchyError> {
    self.0.level_of(cell)
  }
  fn vertices_of(&self, cell: CellId) -> Result<[DVec3; 4], HierarchyError> {
    self.0.vertices_of(cell)
  }
  fn token_of(&self, cell: CellId) -> Result<String, HierarchyError> {
    self.0.token_of(cell)
  }
}

#[test]
fn test_adapter_failure_is_ignored() {
  let mut nav = Navigator::new(Blind(QuadSphere::new()), NavigationConfig::default()).unwrap();
  let mut scene = HeadlessScene::default();
  let mut events = Vec::new();
  nav.initialize(&mut scene, &mut events);

  let outcome = nav.handle(NavCommand::Drill(a()), Duration::ZERO, &mut scene, &mut events);
  assert_eq!(outcome, CommandOutcome::Ignored(IgnoreReason::AdapterFailure));
  assert!(nav.stack().is_empty());

  let hover = nav.handle(NavCommand::Hover(a()), Duration::ZERO, &mut scene, &mut events);
  assert_eq!(hover, CommandOutcome::Ignored(IgnoreReason::Unchanged));
}

// =========================================================================
// Hover, zoom, go-to, render mode
// =========================================================================

#[test]
fn test_hover_replaces_and_clears_highlight() {
  let mut s = session();
  drill(&mut s, a());
  let c4 = s.0.stack()[0];
  let sibling = s
    .0
    .hierarchy()
    .descendants_at_level(s.0.hierarchy().ancestor_at_level(c4, 0).unwrap(), 4)
    .unwrap()[5];
  let over_sibling = screen_of(&s.0, sibling);

  assert_eq!(command(&mut s, NavCommand::Hover(over_sibling)), CommandOutcome::Applied);
  assert_eq!(s.0.cache().hovered(), Some(sibling));
  assert_eq!(
    command(&mut s, NavCommand::Hover(over_sibling)),
    CommandOutcome::Ignored(IgnoreReason::Unchanged)
  );
  assert_eq!(
    command(&mut s, NavCommand::Hover(HeadlessScene::off_globe())),
    CommandOutcome::Applied
  );
  assert_eq!(s.0.cache().hovered(), None);
}

#[test]
fn test_hover_over_focused_cell_clears_highlight() {
  let mut s = session();
  for _ in 0..5 {
    drill(&mut s, a());
  }
  assert!(s.0.focused().is_some());
  assert_eq!(
    command(&mut s, NavCommand::Hover(a())),
    CommandOutcome::Ignored(IgnoreReason::Unchanged)
  );
  assert!(s.1.collection(CollectionId::Hover).is_none());
}

#[test]
fn test_zoom_steps_through_table_and_stops_at_ends() {
  let mut s = session();
  assert_eq!(
    command(&mut s, NavCommand::Zoom(ZoomDirection::Out)),
    CommandOutcome::Ignored(IgnoreReason::ZoomLimit)
  );
  assert_eq!(
    command(&mut s, NavCommand::Zoom(ZoomDirection::In)),
    CommandOutcome::Applied
  );
  assert_eq!(s.0.zoom_level(), 1);
  finish_flight(&mut s);
  let height = s.1.camera_pose().height_above(MOON_RADIUS_M);
  assert!((height - s.0.config().zoom_heights[1]).abs() < 1e-3);

  let last = s.0.config().zoom_heights.len() - 1;
  for _ in 0..10 {
    command(&mut s, NavCommand::Zoom(ZoomDirection::In));
  }
  assert_eq!(s.0.zoom_level(), last);
  // Zoom never touches the stack
  assert!(s.0.stack().is_empty());
}

#[test]
fn test_zoom_during_drill_still_draws_active_layer() {
  let mut s = session();
  drill(&mut s, a());
  assert!(s.1.collection(CollectionId::Active).is_none());
  command(&mut s, NavCommand::Zoom(ZoomDirection::In));
  assert_eq!(s.1.collection(CollectionId::Active).unwrap().len(), 256);
}

#[test]
fn test_go_to_flies_without_touching_stack() {
  let mut s = session();
  drill(&mut s, a());
  let stack = s.0.stack().clone();

  assert_eq!(
    command(&mut s, NavCommand::GoTo { lat: -45.0, lng: 120.0 }),
    CommandOutcome::Applied
  );
  finish_flight(&mut s);
  assert_eq!(s.0.stack(), &stack);
  let at = LatLng::from_direction(s.1.camera_pose().position);
  assert!((at.lat + 45.0).abs() < 1e-6);
  assert!((at.lng - 120.0).abs() < 1e-6);
}

#[test]
fn test_toggle_render_mode_rebuilds_layers() {
  let mut s = session();
  drill(&mut s, a());
  drill(&mut s, a());
  assert_eq!(
    command(&mut s, NavCommand::ToggleRenderMode),
    CommandOutcome::Applied
  );
  assert_eq!(s.0.render_mode(), RenderMode::Line);
  assert_eq!(s.0.cache().invalidations(), 1);
  assert_eq!(s.0.cache().depth(), 3);
  assert!(matches!(
    s.1.collection(CollectionId::Persistent(0)).unwrap()[0],
    crate::render::Primitive::Polyline { .. }
  ));
}
