//! Bevy components for grid rendering.

use bevy::prelude::*;
use lunar_grid::CollectionId;

/// Marker for the camera driven by navigator flights.
///
/// # Example
/// ```ignore
/// commands.spawn((
///     Camera3d::default(),
///     GridCamera,
///     navigation_input_bundle(),
/// ));
/// ```
#[derive(Component, Default)]
pub struct GridCamera;

/// Mesh entity holding the filled primitives of one draw collection.
#[derive(Component, Debug)]
pub struct GridCollection(pub CollectionId);
