//! Navigation input: keyboard, mouse and gamepad bindings mapped to
//! navigator commands.
//!
//! Uses bevy_enhanced_input. Observers only queue commands; they are applied
//! in order by `apply_nav_commands`.
//!
//! | Action        | Bindings                         |
//! |---------------|----------------------------------|
//! | Drill         | left mouse button                |
//! | GoBack        | Backspace, Escape, gamepad East  |
//! | Reset         | R, gamepad Select                |
//! | ZoomIn        | `=`, numpad `+`, right trigger   |
//! | ZoomOut       | `-`, numpad `-`, left trigger    |
//! | ToggleMode    | M                                |
//! | GoHome        | Home                             |

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_enhanced_input::prelude::*;
use glam::DVec2;
use lunar_grid::{NavCommand, ZoomDirection};

use crate::resources::{GridSettings, PendingCommands};

// =============================================================================
// Actions
// =============================================================================

/// Select the cell under the cursor.
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct Drill;

#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct GoBack;

#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct Reset;

#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct ZoomIn;

#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct ZoomOut;

/// Switch between fill and line rendering.
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct ToggleMode;

/// Fly to the configured home coordinate.
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct GoHome;

// =============================================================================
// Input Context
// =============================================================================

/// Input context marker for grid navigation.
#[derive(Component)]
pub struct NavigationContext;

/// Returns a bundle with the navigation context and all action bindings.
/// Insert it on the grid camera.
pub fn navigation_input_bundle() -> impl Bundle {
  (
    NavigationContext,
    actions!(NavigationContext[
      (Action::<Drill>::default(), bindings![MouseButton::Left]),
      (
        Action::<GoBack>::default(),
        bindings![KeyCode::Backspace, KeyCode::Escape, GamepadButton::East],
      ),
      (
        Action::<Reset>::default(),
        bindings![KeyCode::KeyR, GamepadButton::Select],
      ),
      (
        Action::<ZoomIn>::default(),
        bindings![KeyCode::Equal, KeyCode::NumpadAdd, GamepadButton::RightTrigger2],
      ),
      (
        Action::<ZoomOut>::default(),
        bindings![KeyCode::Minus, KeyCode::NumpadSubtract, GamepadButton::LeftTrigger2],
      ),
      (Action::<ToggleMode>::default(), bindings![KeyCode::KeyM]),
      (Action::<GoHome>::default(), bindings![KeyCode::Home]),
    ]),
  )
}

// =============================================================================
// Observers
// =============================================================================

fn cursor_position(windows: &Query<&Window, With<PrimaryWindow>>) -> Option<DVec2> {
  let window = windows.single().ok()?;
  let cursor = window.cursor_position()?;
  Some(DVec2::new(cursor.x as f64, cursor.y as f64))
}

fn on_drill(
  _trigger: On<Start<Drill>>,
  windows: Query<&Window, With<PrimaryWindow>>,
  mut pending: ResMut<PendingCommands>,
) {
  if let Some(screen) = cursor_position(&windows) {
    pending.push(NavCommand::Drill(screen));
  }
}

fn on_go_back(_trigger: On<Start<GoBack>>, mut pending: ResMut<PendingCommands>) {
  pending.push(NavCommand::GoBack);
}

fn on_reset(_trigger: On<Start<Reset>>, mut pending: ResMut<PendingCommands>) {
  pending.push(NavCommand::Reset);
}

fn on_zoom_in(_trigger: On<Start<ZoomIn>>, mut pending: ResMut<PendingCommands>) {
  pending.push(NavCommand::Zoom(ZoomDirection::In));
}

fn on_zoom_out(_trigger: On<Start<ZoomOut>>, mut pending: ResMut<PendingCommands>) {
  pending.push(NavCommand::Zoom(ZoomDirection::Out));
}

fn on_toggle_mode(_trigger: On<Start<ToggleMode>>, mut pending: ResMut<PendingCommands>) {
  pending.push(NavCommand::ToggleRenderMode);
}

fn on_go_home(
  _trigger: On<Start<GoHome>>,
  settings: Res<GridSettings>,
  mut pending: ResMut<PendingCommands>,
) {
  pending.push(NavCommand::GoTo {
    lat: settings.home.lat,
    lng: settings.home.lng,
  });
}

/// Hover follows the cursor; only moves are forwarded.
pub fn queue_hover(
  windows: Query<&Window, With<PrimaryWindow>>,
  mut last: Local<Option<DVec2>>,
  mut pending: ResMut<PendingCommands>,
) {
  let cursor = cursor_position(&windows);
  if cursor == *last {
    return;
  }
  *last = cursor;
  if let Some(screen) = cursor {
    pending.push(NavCommand::Hover(screen));
  }
}

// =============================================================================
// Plugin
// =============================================================================

/// Plugin that registers the navigation input context and observers.
pub struct NavigationInputPlugin;

impl Plugin for NavigationInputPlugin {
  fn build(&self, app: &mut App) {
    if !app.is_plugin_added::<EnhancedInputPlugin>() {
      app.add_plugins(EnhancedInputPlugin);
    }
    app
      .init_resource::<PendingCommands>()
      .add_input_context::<NavigationContext>()
      .add_observer(on_drill)
      .add_observer(on_go_back)
      .add_observer(on_reset)
      .add_observer(on_zoom_in)
      .add_observer(on_zoom_out)
      .add_observer(on_toggle_mode)
      .add_observer(on_go_home);
  }
}
