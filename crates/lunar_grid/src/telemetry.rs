//! Outward event stream and synthetic terminal-block attributes.

use crossbeam_channel::Sender;

use crate::cell::{CellHierarchy, CellId, HierarchyError};
use crate::geo::LatLng;

/// Number of leading token characters hashed into the attribute seed.
const SEED_CHARS: usize = 6;

/// Deterministic placeholder attributes of a terminal block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockAttributes {
  /// Iron oxide, weight percent.
  pub feo: f64,
  /// Titanium dioxide, weight percent.
  pub tio2: f64,
  /// Water ice, weight percent.
  pub water_ice: f64,
  pub surface_temp_k: f64,
  pub price: f64,
}

impl BlockAttributes {
  /// Seed from the first six hex characters of a token (fewer if the token
  /// is shorter). `None` if they are not hex.
  pub fn seed_of(token: &str) -> Option<u64> {
    let head = token.get(..SEED_CHARS).unwrap_or(token);
    if head.is_empty() {
      return None;
    }
    u64::from_str_radix(head, 16).ok()
  }

  pub fn from_seed(seed: u64) -> Self {
    Self {
      feo: ((seed * 7 + 13) % 100) as f64 / 10.0,
      tio2: ((seed * 3 + 7) % 50) as f64 / 10.0,
      water_ice: ((seed * 11 + 3) % 30) as f64 / 10.0,
      surface_temp_k: (40 + (seed * 17) % 260) as f64,
      price: 0.5 + ((seed * 13) % 100) as f64 / 20.0,
    }
  }

  pub fn from_token(token: &str) -> Option<Self> {
    Self::seed_of(token).map(Self::from_seed)
  }
}

/// Events reported to the host.
#[derive(Clone, Debug, PartialEq)]
pub enum NavEvent {
  StateChanged {
    level: u8,
    stack_depth: usize,
    selected_token: Option<String>,
  },
  CellSelected {
    token: String,
    lat: f64,
    lng: f64,
    level: u8,
    attributes: BlockAttributes,
  },
  CellDeselected,
  DepthChanged {
    can_go_back: bool,
  },
}

/// Fire-and-forget event consumer.
pub trait EventSink {
  fn emit(&mut self, event: NavEvent);
}

impl EventSink for Vec<NavEvent> {
  fn emit(&mut self, event: NavEvent) {
    self.push(event);
  }
}

/// Disconnected receivers are ignored.
impl EventSink for Sender<NavEvent> {
  fn emit(&mut self, event: NavEvent) {
    let _ = self.send(event);
  }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
  fn emit(&mut self, _event: NavEvent) {
    // No-op
  }
}

/// Emits block selection events and remembers the selected block so that
/// deselection is reported once.
#[derive(Clone, Debug, Default)]
pub struct BlockEmitter {
  selected: Option<CellId>,
}

impl BlockEmitter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn selected(&self) -> Option<CellId> {
    self.selected
  }

  /// Report `cell` as the selected block. Emits on every call.
  pub fn select<H, E>(
    &mut self,
    hierarchy: &H,
    cell: CellId,
    sink: &mut E,
  ) -> Result<(), HierarchyError>
  where
    H: CellHierarchy + ?Sized,
    E: EventSink + ?Sized,
  {
    let token = hierarchy.token_of(cell)?;
    let level = hierarchy.level_of(cell)?;
    let at = LatLng::from_direction(hierarchy.center_of(cell)?);
    let Some(attributes) = BlockAttributes::from_token(&token) else {
      tracing::warn!(%token, "token has no hex seed, block not reported");
      return Ok(());
    };

    self.selected = Some(cell);
    sink.emit(NavEvent::CellSelected {
      token,
      lat: at.lat,
      lng: at.lng,
      level,
      attributes,
    });
    Ok(())
  }

  /// Report the end of a selection; no-op when nothing is selected.
  pub fn deselect<E: EventSink + ?Sized>(&mut self, sink: &mut E) {
    if self.selected.take().is_some() {
      sink.emit(NavEvent::CellDeselected);
    }
  }
}

#[cfg(test)]
#[path = "telemetry_test.rs"]
mod telemetry_test;
