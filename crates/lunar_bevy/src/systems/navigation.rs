//! Navigator driving: startup, queued commands, flights and events.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use lunar_grid::{CommandOutcome, NavEvent, SceneBackend};

use crate::components::GridCamera;
use crate::resources::{GridNavigator, NavEventChannel, NavStatus, PendingCommands};
use crate::scene::SceneMirror;
use crate::systems::camera::refresh_lens;

/// First render and global framing.
pub fn initialize_navigator(
  cameras: Query<&Projection, With<GridCamera>>,
  windows: Query<&Window, With<PrimaryWindow>>,
  mut navigator: ResMut<GridNavigator>,
  mut mirror: ResMut<SceneMirror>,
  channel: Res<NavEventChannel>,
) {
  refresh_lens(&cameras, &windows, &mut mirror);
  if !mirror.is_ready() {
    warn!("No GridCamera at startup, grid rendering waits for the first command");
  }
  let mut sink = channel.sender.clone();
  navigator.0.initialize(&mut *mirror, &mut sink);
  info!(
    "Grid navigator ready (terminal level {}, {} layers drawn)",
    navigator.0.config().terminal_level,
    navigator.0.cache().depth()
  );
}

/// Apply every queued command in arrival order.
pub fn apply_nav_commands(
  time: Res<Time>,
  mut pending: ResMut<PendingCommands>,
  mut navigator: ResMut<GridNavigator>,
  mut mirror: ResMut<SceneMirror>,
  channel: Res<NavEventChannel>,
) {
  if pending.is_empty() {
    return;
  }
  let now = time.elapsed();
  let mut sink = channel.sender.clone();
  for command in pending.drain() {
    match navigator.0.handle(command, now, &mut *mirror, &mut sink) {
      CommandOutcome::Applied => debug!(?command, "navigation command applied"),
      CommandOutcome::Ignored(reason) => trace!(?command, ?reason, "navigation command ignored"),
    }
  }
}

/// Advance the active flight by one frame.
pub fn tick_flight(
  time: Res<Time>,
  mut navigator: ResMut<GridNavigator>,
  mut mirror: ResMut<SceneMirror>,
  channel: Res<NavEventChannel>,
) {
  if !navigator.0.is_flying() {
    return;
  }
  let mut sink = channel.sender.clone();
  navigator.0.tick(time.elapsed(), &mut *mirror, &mut sink);
}

/// Fold navigator events into [`NavStatus`] and log them.
pub fn drain_nav_events(channel: Res<NavEventChannel>, mut status: ResMut<NavStatus>) {
  for event in channel.receiver.try_iter() {
    match &event {
      NavEvent::CellSelected {
        token,
        lat,
        lng,
        attributes,
        ..
      } => info!(
        "Block {} selected at ({:.4}, {:.4}): FeO {:.1}%, TiO2 {:.1}%, ice {:.1}%, {:.0} K, ${:.2}",
        token,
        lat,
        lng,
        attributes.feo,
        attributes.tio2,
        attributes.water_ice,
        attributes.surface_temp_k,
        attributes.price
      ),
      NavEvent::CellDeselected => info!("Block deselected"),
      NavEvent::StateChanged {
        level,
        stack_depth,
        selected_token,
      } => debug!(level, stack_depth, ?selected_token, "navigation state"),
      NavEvent::DepthChanged { .. } => {}
    }
    status.apply(&event);
  }
}
