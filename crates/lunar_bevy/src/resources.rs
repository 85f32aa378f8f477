//! Bevy resources for grid navigation.

use std::collections::HashMap;

use bevy::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use lunar_grid::{
  BlockAttributes, CellHierarchy, CollectionId, LatLng, NavCommand, NavEvent, Navigator,
};

use crate::convert::SceneStrip;

/// The navigation session. The hierarchy is boxed so apps can plug in their
/// own adapter.
#[derive(Resource)]
pub struct GridNavigator(pub Navigator<Box<dyn CellHierarchy>>);

/// Presentation settings shared by the bridge systems.
#[derive(Resource, Clone, Copy, Debug)]
pub struct GridSettings {
  /// Scene units per meter.
  pub scene_scale: f64,
  /// Target of the "home" action.
  pub home: LatLng,
}

/// Commands queued by input observers, applied once per frame in order.
#[derive(Resource, Default, Debug)]
pub struct PendingCommands {
  commands: Vec<NavCommand>,
}

impl PendingCommands {
  pub fn push(&mut self, command: NavCommand) {
    self.commands.push(command);
  }

  pub fn drain(&mut self) -> std::vec::Drain<'_, NavCommand> {
    self.commands.drain(..)
  }

  /// Drop queued commands that fail `keep`.
  pub fn retain(&mut self, keep: impl FnMut(&NavCommand) -> bool) {
    self.commands.retain(keep);
  }

  pub fn is_empty(&self) -> bool {
    self.commands.is_empty()
  }
}

/// Transport for navigator events.
#[derive(Resource, Clone)]
pub struct NavEventChannel {
  pub sender: Sender<NavEvent>,
  pub receiver: Receiver<NavEvent>,
}

impl Default for NavEventChannel {
  fn default() -> Self {
    let (sender, receiver) = crossbeam_channel::unbounded();
    Self { sender, receiver }
  }
}

/// Terminal block reported by the navigator.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedBlock {
  pub token: String,
  pub at: LatLng,
  pub level: u8,
  pub attributes: BlockAttributes,
}

/// Latest navigation state, folded from the event stream for UIs.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct NavStatus {
  pub level: u8,
  pub stack_depth: usize,
  pub selected_token: Option<String>,
  pub can_go_back: bool,
  pub block: Option<SelectedBlock>,
}

impl NavStatus {
  pub fn apply(&mut self, event: &NavEvent) {
    match event {
      NavEvent::StateChanged {
        level,
        stack_depth,
        selected_token,
      } => {
        self.level = *level;
        self.stack_depth = *stack_depth;
        self.selected_token = selected_token.clone();
      }
      NavEvent::CellSelected {
        token,
        lat,
        lng,
        level,
        attributes,
      } => {
        self.block = Some(SelectedBlock {
          token: token.clone(),
          at: LatLng::new(*lat, *lng),
          level: *level,
          attributes: *attributes,
        });
      }
      NavEvent::CellDeselected => self.block = None,
      NavEvent::DepthChanged { can_go_back } => self.can_go_back = *can_go_back,
    }
  }
}

/// Mesh entity of each live collection.
#[derive(Resource, Default, Debug)]
pub struct CollectionEntities {
  map: HashMap<CollectionId, Entity>,
}

impl CollectionEntities {
  pub fn insert(&mut self, id: CollectionId, entity: Entity) {
    self.map.insert(id, entity);
  }

  pub fn remove(&mut self, id: CollectionId) -> Option<Entity> {
    self.map.remove(&id)
  }

  pub fn get(&self, id: CollectionId) -> Option<Entity> {
    self.map.get(&id).copied()
  }

  pub fn len(&self) -> usize {
    self.map.len()
  }

  pub fn is_empty(&self) -> bool {
    self.map.is_empty()
  }
}

/// Gizmo line strips of each live collection, redrawn every frame.
#[derive(Resource, Default, Debug)]
pub struct GridLines {
  strips: HashMap<CollectionId, Vec<SceneStrip>>,
}

impl GridLines {
  pub fn set(&mut self, id: CollectionId, strips: Vec<SceneStrip>) {
    if strips.is_empty() {
      self.strips.remove(&id);
    } else {
      self.strips.insert(id, strips);
    }
  }

  pub fn remove(&mut self, id: CollectionId) {
    self.strips.remove(&id);
  }

  pub fn iter(&self) -> impl Iterator<Item = &SceneStrip> {
    self.strips.values().flatten()
  }
}

/// One unlit, alpha-blended material per collection. Deeper layers get a
/// larger depth bias so they draw over their ancestors on the shell.
#[derive(Resource, Default)]
pub struct GridMaterials {
  materials: HashMap<CollectionId, Handle<StandardMaterial>>,
}

impl GridMaterials {
  pub fn get_or_create(
    &mut self,
    id: CollectionId,
    assets: &mut Assets<StandardMaterial>,
  ) -> Handle<StandardMaterial> {
    self
      .materials
      .entry(id)
      .or_insert_with(|| {
        assets.add(StandardMaterial {
          base_color: Color::WHITE,
          unlit: true,
          alpha_mode: AlphaMode::Blend,
          cull_mode: None,
          double_sided: true,
          depth_bias: depth_bias(id),
          ..default()
        })
      })
      .clone()
  }
}

/// Draw order of a collection on the shared shell.
pub fn depth_bias(id: CollectionId) -> f32 {
  match id {
    CollectionId::Persistent(slot) => slot as f32 * 10.0,
    CollectionId::Active => 500.0,
    CollectionId::Hover => 600.0,
  }
}

#[cfg(test)]
#[path = "resources_test.rs"]
mod resources_test;
