//! Bridge systems, in frame order: camera lens, commands, flight, camera
//! transform, collections, events.

pub mod camera;
pub mod collections;
pub mod navigation;
