//! HeadlessScene - recording backend for tests, benches and tools.
//!
//! Screen coordinates are mapped deterministically: `x` = longitude and
//! `y` = latitude, both in degrees. A point inside that domain yields a ray
//! straight down onto that coordinate; anything outside yields a ray that
//! misses the sphere.

use std::collections::HashMap;

use glam::{DVec2, DVec3};

use super::{CollectionId, Primitive, SceneBackend};
use crate::constants::MOON_RADIUS_M;
use crate::flight::CameraPose;
use crate::geo::{LatLng, Ray};

/// In-memory scene that records every call.
#[derive(Debug)]
pub struct HeadlessScene {
  ready: bool,
  radius: f64,
  terrain_height: Option<f64>,
  pose: CameraPose,
  collections: HashMap<CollectionId, Vec<Primitive>>,
  submissions: Vec<CollectionId>,
  removals: Vec<CollectionId>,
  pose_history: Vec<CameraPose>,
}

impl Default for HeadlessScene {
  fn default() -> Self {
    Self::new(MOON_RADIUS_M)
  }
}

impl HeadlessScene {
  pub fn new(radius: f64) -> Self {
    Self {
      ready: true,
      radius,
      terrain_height: None,
      pose: CameraPose::default(),
      collections: HashMap::new(),
      submissions: Vec::new(),
      removals: Vec::new(),
      pose_history: Vec::new(),
    }
  }

  pub fn with_ready(mut self, ready: bool) -> Self {
    self.ready = ready;
    self
  }

  pub fn with_terrain_height(mut self, meters: f64) -> Self {
    self.terrain_height = Some(meters);
    self
  }

  pub fn set_ready(&mut self, ready: bool) {
    self.ready = ready;
  }

  /// Screen position that resolves to `lat`/`lng`.
  pub fn screen_point(lat: f64, lng: f64) -> DVec2 {
    DVec2::new(lng, lat)
  }

  /// Screen position whose ray misses the globe.
  pub fn off_globe() -> DVec2 {
    DVec2::new(1_000.0, 1_000.0)
  }

  // ===========================================================================
  // Inspection
  // ===========================================================================

  pub fn collection(&self, id: CollectionId) -> Option<&[Primitive]> {
    self.collections.get(&id).map(Vec::as_slice)
  }

  /// Ids of every live collection, persistent slots first.
  pub fn collection_ids(&self) -> Vec<CollectionId> {
    let mut ids: Vec<_> = self.collections.keys().copied().collect();
    ids.sort_by_key(|id| match id {
      CollectionId::Persistent(slot) => (0, *slot),
      CollectionId::Active => (1, 0),
      CollectionId::Hover => (2, 0),
    });
    ids
  }

  /// Number of live persistent slots.
  pub fn persistent_count(&self) -> usize {
    self
      .collections
      .keys()
      .filter(|id| matches!(id, CollectionId::Persistent(_)))
      .count()
  }

  /// Every submission since the last [`clear_log`](Self::clear_log), in order.
  pub fn submissions(&self) -> &[CollectionId] {
    &self.submissions
  }

  pub fn removals(&self) -> &[CollectionId] {
    &self.removals
  }

  /// Every pose set since the last [`clear_log`](Self::clear_log).
  pub fn pose_history(&self) -> &[CameraPose] {
    &self.pose_history
  }

  pub fn clear_log(&mut self) {
    self.submissions.clear();
    self.removals.clear();
    self.pose_history.clear();
  }
}

impl SceneBackend for HeadlessScene {
  fn is_ready(&self) -> bool {
    self.ready
  }

  fn submit(&mut self, collection: CollectionId, primitives: Vec<Primitive>) {
    self.submissions.push(collection);
    self.collections.insert(collection, primitives);
  }

  fn remove_collection(&mut self, collection: CollectionId) {
    if self.collections.remove(&collection).is_some() {
      self.removals.push(collection);
    }
  }

  fn camera_pose(&self) -> CameraPose {
    self.pose
  }

  fn set_camera_pose(&mut self, pose: CameraPose) {
    self.pose = pose;
    self.pose_history.push(pose);
  }

  fn terrain_height(&self, _at: LatLng) -> Option<f64> {
    self.terrain_height
  }

  fn screen_ray(&self, screen: DVec2) -> Option<Ray> {
    let (lng, lat) = (screen.x, screen.y);
    if lat.abs() <= 90.0 && lng.abs() <= 180.0 {
      let direction = LatLng::new(lat, lng).to_direction();
      return Some(Ray::new(direction * self.radius * 4.0, -direction));
    }
    let origin = DVec3::new(0.0, 4.0 * self.radius, 4.0 * self.radius);
    Some(Ray::new(origin, DVec3::NEG_X))
  }
}

#[cfg(test)]
#[path = "headless_test.rs"]
mod headless_test;
