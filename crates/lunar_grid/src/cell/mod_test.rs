use super::*;

fn boxed() -> Box<dyn CellHierarchy> {
  Box::new(QuadSphere::new())
}

#[test]
fn test_descendants_count_grows_by_four_per_level() {
  let sphere = QuadSphere::new();
  let root = sphere.roots()[0];
  assert_eq!(sphere.descendants_at_level(root, 0).unwrap(), vec![root]);
  assert_eq!(sphere.descendants_at_level(root, 1).unwrap().len(), 4);
  assert_eq!(sphere.descendants_at_level(root, 4).unwrap().len(), 256);
}

#[test]
fn test_descendants_above_own_level_is_error() {
  let sphere = QuadSphere::new();
  let cell = sphere.cell_at_level(DVec3::Z, 8).unwrap();
  assert!(matches!(
    sphere.descendants_at_level(cell, 4),
    Err(HierarchyError::LevelOutOfRange { level: 4, .. })
  ));
}

#[test]
fn test_descendants_all_lie_within_ancestor() {
  let sphere = QuadSphere::new();
  let parent = sphere.cell_at_level(DVec3::new(1.0, 1.0, 0.5), 4).unwrap();
  for cell in sphere.descendants_at_level(parent, 8).unwrap() {
    assert!(sphere.contains(parent, cell).unwrap());
    assert_eq!(sphere.level_of(cell).unwrap(), 8);
  }
}

#[test]
fn test_contains_is_false_for_other_branches_and_shallower_cells() {
  let sphere = QuadSphere::new();
  let a = sphere.cell_at_level(DVec3::X, 4).unwrap();
  let b = sphere.cell_at_level(DVec3::NEG_X, 8).unwrap();
  assert!(!sphere.contains(a, b).unwrap());

  let root = sphere.roots()[0];
  assert!(sphere.contains(root, a).unwrap());
  assert!(!sphere.contains(a, root).unwrap());
  assert!(sphere.contains(a, a).unwrap());
}

#[test]
fn test_cells_at_level_covers_every_face() {
  let sphere = QuadSphere::new();
  assert_eq!(sphere.cells_at_level(0).unwrap().len(), 6);
  assert_eq!(sphere.cells_at_level(1).unwrap().len(), 24);
}

#[test]
fn test_center_is_unit_length() {
  let sphere = QuadSphere::new();
  let cell = sphere.cell_at_level(DVec3::new(-0.4, 0.2, 0.9), 12).unwrap();
  let center = sphere.center_of(cell).unwrap();
  assert!((center.length() - 1.0).abs() < 1e-12);
}

#[test]
fn test_boxed_hierarchy_dispatches() {
  let hierarchy = boxed();
  let direct = QuadSphere::new();
  let point = DVec3::new(0.2, -0.7, 0.3);
  assert_eq!(
    hierarchy.cell_at_level(point, 8).unwrap(),
    direct.cell_at_level(point, 8).unwrap()
  );
  assert_eq!(hierarchy.roots(), direct.roots());
}
