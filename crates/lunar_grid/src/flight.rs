//! Camera flights - eased interpolation between poses, advanced by the host
//! once per frame.
//!
//! A flight is plain state: starting a new one replaces the current one,
//! cancelling drops it. Nothing fires after cancellation.
//!
//! ```text
//!  progress 0 ──────────── 0.3 ─────────────────────── 1
//!           │               │                          │
//!         start       mid-flight hook              snap to target
//!                     (once; at finish if a frame skipped past it)
//! ```

use std::f64::consts::FRAC_PI_2;
use std::time::Duration;

use glam::DVec3;

use crate::config::NavigationConfig;
use crate::constants::{GLOBAL_HEIGHT_M, MOON_RADIUS_M};
use crate::geo::local_frame;

/// Pitch looking straight down.
pub const NADIR_PITCH: f64 = -FRAC_PI_2;

/// Ease-out cubic: fast start, soft landing. Input is clamped to [0, 1].
#[inline]
pub fn ease_out_cubic(progress: f64) -> f64 {
  let p = progress.clamp(0.0, 1.0);
  1.0 - (1.0 - p).powi(3)
}

/// Camera position (world meters) with heading and pitch in radians.
///
/// Heading 0 faces north, growing toward east. Pitch 0 is level with the
/// local horizon, negative looks down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
  pub position: DVec3,
  pub heading: f64,
  pub pitch: f64,
}

impl Default for CameraPose {
  fn default() -> Self {
    Self::above(DVec3::X, MOON_RADIUS_M, GLOBAL_HEIGHT_M, 0.0)
  }
}

impl CameraPose {
  pub fn new(position: DVec3, heading: f64, pitch: f64) -> Self {
    Self {
      position,
      heading,
      pitch,
    }
  }

  /// Nadir-looking pose `height` above the surface point along `direction`.
  pub fn above(direction: DVec3, radius: f64, height: f64, heading: f64) -> Self {
    let up = direction.normalize_or_zero();
    let up = if up == DVec3::ZERO { DVec3::X } else { up };
    Self::new(up * (radius + height), heading, NADIR_PITCH)
  }

  /// Unit direction of the point below the camera.
  pub fn ground_direction(&self) -> DVec3 {
    self.position.normalize_or_zero()
  }

  /// Height above a sphere of `radius`.
  pub fn height_above(&self, radius: f64) -> f64 {
    self.position.length() - radius
  }

  /// View direction and camera up vector in world space.
  pub fn orientation(&self) -> (DVec3, DVec3) {
    let (east, north, up) = local_frame(self.position);
    let (sin_h, cos_h) = self.heading.sin_cos();
    let (sin_p, cos_p) = self.pitch.sin_cos();
    let forward_h = north * cos_h + east * sin_h;
    let forward = forward_h * cos_p + up * sin_p;
    let camera_up = -forward_h * sin_p + up * cos_p;
    (forward, camera_up)
  }

  /// Interpolate around the sphere: direction along the great arc, distance
  /// from the center and pitch linearly. Heading is held from `self`.
  pub fn interpolate(&self, target: &CameraPose, t: f64) -> CameraPose {
    let (r0, r1) = (self.position.length(), target.position.length());
    let direction = slerp(self.ground_direction(), target.ground_direction(), t);
    CameraPose {
      position: direction * (r0 + (r1 - r0) * t),
      heading: self.heading,
      pitch: self.pitch + (target.pitch - self.pitch) * t,
    }
  }
}

/// Spherical interpolation between unit vectors.
fn slerp(a: DVec3, b: DVec3, t: f64) -> DVec3 {
  if a == DVec3::ZERO || b == DVec3::ZERO {
    return a.lerp(b, t);
  }
  let angle = a.dot(b).clamp(-1.0, 1.0).acos();
  let sin_angle = angle.sin();
  if angle < 1e-9 {
    return a.lerp(b, t).normalize_or_zero();
  }
  if sin_angle < 1e-9 {
    // Antipodal: any great circle works
    let axis = a.any_orthonormal_vector();
    let theta = angle * t;
    return a * theta.cos() + axis * theta.sin();
  }
  let wa = ((1.0 - t) * angle).sin() / sin_angle;
  let wb = (t * angle).sin() / sin_angle;
  a * wa + b * wb
}

/// Deferred work the navigator runs part-way through a flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MidFlightHook {
  /// Draw the volatile active layer.
  RenderActiveLayer,
}

/// One in-flight transition.
#[derive(Clone, Debug)]
struct FlightAnimation {
  start: CameraPose,
  target: CameraPose,
  started_at: Duration,
  hook: Option<MidFlightHook>,
  hook_fired: bool,
}

/// Result of advancing the active flight by one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlightFrame {
  pub pose: CameraPose,
  /// Linear progress in [0, 1].
  pub progress: f64,
  /// Hook due this frame (returned exactly once per flight).
  pub mid_flight: Option<MidFlightHook>,
  pub finished: bool,
}

/// Owns at most one active flight.
///
/// Eased positions follow the great arc between start and target (see
/// [`CameraPose::interpolate`]), never the chord through the globe.
#[derive(Clone, Debug)]
pub struct FlightController {
  active: Option<FlightAnimation>,
  duration: Duration,
  mid_flight_fraction: f64,
}

impl FlightController {
  pub fn new(duration: Duration, mid_flight_fraction: f64) -> Self {
    Self {
      active: None,
      duration,
      mid_flight_fraction,
    }
  }

  pub fn from_config(config: &NavigationConfig) -> Self {
    Self::new(config.flight_duration(), config.mid_flight_fraction)
  }

  #[inline]
  pub fn is_active(&self) -> bool {
    self.active.is_some()
  }

  pub fn duration(&self) -> Duration {
    self.duration
  }

  /// Target of the active flight.
  pub fn target(&self) -> Option<CameraPose> {
    self.active.as_ref().map(|flight| flight.target)
  }

  /// Hook of the active flight that has not fired yet.
  pub fn pending_hook(&self) -> Option<MidFlightHook> {
    self
      .active
      .as_ref()
      .filter(|flight| !flight.hook_fired)
      .and_then(|flight| flight.hook)
  }

  /// Claim the hook that has not fired yet; the flight continues without it.
  pub fn take_pending_hook(&mut self) -> Option<MidFlightHook> {
    let flight = self.active.as_mut().filter(|flight| !flight.hook_fired)?;
    let hook = flight.hook?;
    flight.hook_fired = true;
    Some(hook)
  }

  /// Start a flight, replacing any active one.
  pub fn start(
    &mut self,
    from: CameraPose,
    to: CameraPose,
    now: Duration,
    hook: Option<MidFlightHook>,
  ) {
    if self.cancel() {
      tracing::trace!("flight replaced");
    }
    self.active = Some(FlightAnimation {
      start: from,
      target: to,
      started_at: now,
      hook,
      hook_fired: false,
    });
  }

  /// Drop the active flight. Returns whether one was interrupted.
  pub fn cancel(&mut self) -> bool {
    self.active.take().is_some()
  }

  /// Advance to `now`. Returns `None` when no flight is active.
  pub fn tick(&mut self, now: Duration) -> Option<FlightFrame> {
    let flight = self.active.as_mut()?;

    let progress = if self.duration.is_zero() {
      1.0
    } else {
      let elapsed = now.saturating_sub(flight.started_at);
      (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    };
    let finished = progress >= 1.0;

    let mut mid_flight = None;
    if !flight.hook_fired && (progress >= self.mid_flight_fraction || finished) {
      flight.hook_fired = true;
      mid_flight = flight.hook;
    }

    let pose = if finished {
      flight.target
    } else {
      flight
        .start
        .interpolate(&flight.target, ease_out_cubic(progress))
    };

    if finished {
      self.active = None;
    }

    Some(FlightFrame {
      pose,
      progress,
      mid_flight,
      finished,
    })
  }
}

#[cfg(test)]
#[path = "flight_test.rs"]
mod flight_test;
