//! Navigation commands and their outcomes.

use glam::DVec2;

use crate::cell::CellId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
  In,
  Out,
}

/// Input reaching the navigator. Screen positions are in backend pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NavCommand {
  /// Select the cell under the pointer (drill, lateral switch or focus).
  Drill(DVec2),
  /// Highlight the cell under the pointer at the current level.
  Hover(DVec2),
  GoBack,
  Reset,
  Zoom(ZoomDirection),
  ToggleRenderMode,
  /// Fly above a coordinate (degrees) at the current zoom height.
  GoTo { lat: f64, lng: f64 },
}

/// Why a command left the navigation state untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
  /// The pointer ray missed the globe.
  PickMiss,
  /// The cell hierarchy rejected a query.
  AdapterFailure,
  /// Nothing to go back to.
  EmptyStack,
  /// Already at the end of the zoom table.
  ZoomLimit,
  /// The scene cannot draw yet.
  BackendNotReady,
  /// The command would not change anything.
  Unchanged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
  Applied,
  Ignored(IgnoreReason),
}

impl CommandOutcome {
  pub fn is_applied(self) -> bool {
    matches!(self, CommandOutcome::Applied)
  }
}

/// Where the navigator is in the drill ladder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavState {
  /// Empty stack.
  Global,
  /// Top of the stack at a non-terminal level.
  Drilling(u8),
  /// Top of the stack at the terminal level.
  Terminal { focused: Option<CellId> },
}
