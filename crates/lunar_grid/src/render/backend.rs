//! SceneBackend - the drawing/camera surface an engine bridge provides.

use glam::DVec2;

use super::{CollectionId, Primitive};
use crate::flight::CameraPose;
use crate::geo::{LatLng, Ray};

/// Interface to the 3D scene.
///
/// Calls are fire-and-forget: submission replaces the whole content of a
/// collection, removal of an unknown collection is a no-op.
///
/// # Example (Bevy)
///
/// ```ignore
/// impl SceneBackend for SceneMirror {
///     fn submit(&mut self, collection: CollectionId, primitives: Vec<Primitive>) {
///         self.collections.insert(collection, primitives);
///         self.dirty.insert(collection);
///     }
///     // ...
/// }
/// ```
pub trait SceneBackend {
  /// False until the scene can accept draw calls and answer camera queries.
  fn is_ready(&self) -> bool;

  fn submit(&mut self, collection: CollectionId, primitives: Vec<Primitive>);

  fn remove_collection(&mut self, collection: CollectionId);

  fn camera_pose(&self) -> CameraPose;

  fn set_camera_pose(&mut self, pose: CameraPose);

  /// Terrain height above the mean radius at a coordinate, when known.
  fn terrain_height(&self, at: LatLng) -> Option<f64>;

  /// Camera ray through a screen position (pixels).
  fn screen_ray(&self, screen: DVec2) -> Option<Ray>;
}
