use super::*;

#[test]
fn test_terminal_level_is_reachable_by_steps() {
  assert!(DEFAULT_TERMINAL_LEVEL <= MAX_CELL_LEVEL);
  assert_eq!(DEFAULT_TERMINAL_LEVEL % LEVEL_STEP, 0);
}

#[test]
fn test_line_inset_bounds_are_ordered() {
  assert!(MIN_LINE_INSET > 0.0);
  assert!(MIN_LINE_INSET < MAX_LINE_INSET);
  assert!(MAX_LINE_INSET < 1.0);
}

/// The terminal camera must sit above the grid shell, otherwise the block
/// outline would be behind the camera.
#[test]
fn test_terminal_height_clears_grid_shell() {
  assert!(TERMINAL_HEIGHT_M > DEFAULT_GRID_ALTITUDE_M);
}

#[test]
fn test_camera_heights_decrease_with_depth() {
  let heights = [
    GLOBAL_HEIGHT_M,
    REGIONAL_HEIGHT_M,
    LOCAL_HEIGHT_M,
    CLOSE_HEIGHT_M,
    TERMINAL_HEIGHT_M,
  ];
  for pair in heights.windows(2) {
    assert!(pair[0] > pair[1], "{} should exceed {}", pair[0], pair[1]);
  }
}
