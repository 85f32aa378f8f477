use super::*;

#[test]
fn test_empty_file_is_all_defaults() {
  let config = ViewerConfig::from_toml("").unwrap();
  assert_eq!(config, ViewerConfig::default());
}

#[test]
fn test_partial_sections_keep_other_defaults() {
  let config = ViewerConfig::from_toml(
    r#"
      [window]
      title = "Moon"

      [home]
      lat = 26.13
      lng = 3.63

      [navigation]
      terminal_level = 14
      render_mode = "line"

      [navigation.heights]
      regional = 800000.0
    "#,
  )
  .unwrap();

  assert_eq!(config.window.title, "Moon");
  assert_eq!(config.window.width, 1600);
  assert_eq!(config.home.lat, 26.13);
  assert_eq!(config.navigation.terminal_level, 14);
  assert_eq!(config.navigation.render_mode, RenderMode::Line);
  assert_eq!(config.navigation.heights.regional, 800_000.0);
  assert_eq!(
    config.navigation.heights.global,
    NavigationConfig::default().heights.global
  );
}

#[test]
fn test_invalid_navigation_is_rejected() {
  let err = ViewerConfig::from_toml("[navigation]\nsphere_radius = -1.0\n").unwrap_err();
  assert!(format!("{err:#}").contains("navigation"));
}

#[test]
fn test_malformed_toml_is_rejected() {
  assert!(ViewerConfig::from_toml("[window\nwidth = 3").is_err());
}

#[test]
fn test_bad_home_is_rejected() {
  assert!(ViewerConfig::from_toml("[home]\nlat = 120.0\n").is_err());
}

#[test]
fn test_overrides_apply_and_validate() {
  let config = ViewerConfig::default()
    .with_overrides(true, Some(12))
    .unwrap();
  assert_eq!(config.navigation.render_mode, RenderMode::Line);
  assert_eq!(config.navigation.terminal_level, 12);

  assert!(ViewerConfig::default().with_overrides(false, Some(99)).is_err());
}

#[test]
fn test_missing_file_reports_path() {
  let err = ViewerConfig::load(Path::new("/nonexistent/navigator.toml")).unwrap_err();
  assert!(format!("{err:#}").contains("/nonexistent/navigator.toml"));
}

#[test]
fn test_bundled_example_config_parses() {
  let config = ViewerConfig::from_toml(include_str!("../assets/navigator.toml")).unwrap();
  assert_eq!(config.navigation, NavigationConfig::default());
  assert_eq!(config.home.lat, 26.13);
}
