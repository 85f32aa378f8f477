use super::*;

use lunar_grid::SceneBackend;

#[test]
fn test_plugin_terrain_reaches_scene_mirror() {
  let plugin = LunarGridPlugin::default().with_terrain(|at: LatLng| Some(at.lat * 100.0));
  let mirror = plugin.scene_mirror();
  assert_eq!(mirror.terrain_height(LatLng::new(12.0, 0.0)), Some(1_200.0));
}

#[test]
fn test_plugin_without_terrain_samples_nothing() {
  let mirror = LunarGridPlugin::default().scene_mirror();
  assert_eq!(mirror.terrain_height(LatLng::new(12.0, 0.0)), None);
}
