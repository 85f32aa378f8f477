//! SceneMirror - the navigator's scene backend inside the ECS.
//!
//! The navigator submits collections and camera poses synchronously; the
//! mirror keeps them and records what changed. Systems later turn the
//! changes into entities, gizmo strips and the camera transform.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use bevy::prelude::*;
use glam::DVec2;
use lunar_grid::{CameraPose, CollectionId, LatLng, Primitive, Ray, SceneBackend};

use crate::convert::{Lens, PinholeView};

/// Terrain elevation lookup in meters above the mean radius.
pub type TerrainSampler = Arc<dyn Fn(LatLng) -> Option<f64> + Send + Sync>;

#[derive(Resource, Default)]
pub struct SceneMirror {
  ready: bool,
  pose: CameraPose,
  pose_changed: bool,
  lens: Option<Lens>,
  collections: HashMap<CollectionId, Vec<Primitive>>,
  changed: HashSet<CollectionId>,
  terrain: Option<TerrainSampler>,
}

impl SceneMirror {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_terrain(mut self, sampler: TerrainSampler) -> Self {
    self.terrain = Some(sampler);
    self
  }

  pub fn set_ready(&mut self, ready: bool) {
    if ready != self.ready {
      debug!(ready, "grid scene readiness changed");
    }
    self.ready = ready;
  }

  pub fn set_lens(&mut self, lens: Lens) {
    self.lens = Some(lens);
  }

  pub fn lens(&self) -> Option<Lens> {
    self.lens
  }

  pub fn collection(&self, id: CollectionId) -> Option<&[Primitive]> {
    self.collections.get(&id).map(Vec::as_slice)
  }

  pub fn collection_count(&self) -> usize {
    self.collections.len()
  }

  /// Collections submitted or removed since the last call.
  pub fn take_changes(&mut self) -> Vec<CollectionId> {
    self.changed.drain().collect()
  }

  /// Pose set since the last call.
  pub fn take_pose_change(&mut self) -> Option<CameraPose> {
    std::mem::take(&mut self.pose_changed).then_some(self.pose)
  }
}

impl SceneBackend for SceneMirror {
  fn is_ready(&self) -> bool {
    self.ready
  }

  fn submit(&mut self, collection: CollectionId, primitives: Vec<Primitive>) {
    self.collections.insert(collection, primitives);
    self.changed.insert(collection);
  }

  fn remove_collection(&mut self, collection: CollectionId) {
    if self.collections.remove(&collection).is_some() {
      self.changed.insert(collection);
    }
  }

  fn camera_pose(&self) -> CameraPose {
    self.pose
  }

  fn set_camera_pose(&mut self, pose: CameraPose) {
    self.pose = pose;
    self.pose_changed = true;
  }

  fn terrain_height(&self, at: LatLng) -> Option<f64> {
    self.terrain.as_ref().and_then(|sample| sample(at))
  }

  fn screen_ray(&self, screen: DVec2) -> Option<Ray> {
    let lens = self.lens?;
    PinholeView::from_pose(&self.pose, lens).ray_through(screen)
  }
}

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;
