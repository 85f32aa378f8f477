//! Sphere-frame helpers: latitude/longitude, rays, local tangent frames.
//!
//! World frame is right-handed with +Y through the north pole. Longitude 0 lies
//! on +X and grows toward -Z (eastward when viewed from above the pole).

use glam::DVec3;

/// Geographic coordinate in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLng {
  pub lat: f64,
  pub lng: f64,
}

impl LatLng {
  pub fn new(lat: f64, lng: f64) -> Self {
    Self { lat, lng }
  }

  /// Unit direction from the sphere center.
  pub fn to_direction(self) -> DVec3 {
    let (lat, lng) = (self.lat.to_radians(), self.lng.to_radians());
    DVec3::new(lat.cos() * lng.cos(), lat.sin(), -lat.cos() * lng.sin())
  }

  /// Coordinate of a direction. Zero vectors map to (0, 0).
  pub fn from_direction(direction: DVec3) -> Self {
    let d = direction.normalize_or_zero();
    if d == DVec3::ZERO {
      return Self::new(0.0, 0.0);
    }
    Self {
      lat: d.y.clamp(-1.0, 1.0).asin().to_degrees(),
      lng: (-d.z).atan2(d.x).to_degrees(),
    }
  }
}

/// Half-line used for picking. `direction` is always unit length (or zero
/// for a degenerate ray, which never hits anything).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
  pub origin: DVec3,
  pub direction: DVec3,
}

impl Ray {
  pub fn new(origin: DVec3, direction: DVec3) -> Self {
    Self {
      origin,
      direction: direction.normalize_or_zero(),
    }
  }

  #[inline]
  pub fn at(&self, t: f64) -> DVec3 {
    self.origin + self.direction * t
  }

  /// Nearest non-negative intersection with a sphere centered at the origin.
  ///
  /// A ray starting inside the sphere returns its exit point.
  pub fn intersect_sphere(&self, radius: f64) -> Option<DVec3> {
    if self.direction == DVec3::ZERO || !self.origin.is_finite() {
      return None;
    }
    // |o + t·d|² = r², |d| = 1  →  t² + 2bt + c = 0
    let b = self.origin.dot(self.direction);
    let c = self.origin.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
      return None;
    }
    let root = discriminant.sqrt();
    let near = -b - root;
    let far = -b + root;
    let t = if near >= 0.0 {
      near
    } else if far >= 0.0 {
      far
    } else {
      return None;
    };
    Some(self.at(t))
  }
}

/// East/north/up basis at a point above the sphere.
///
/// Falls back to +X as north reference at the poles.
pub fn local_frame(position: DVec3) -> (DVec3, DVec3, DVec3) {
  let up = position.normalize_or_zero();
  let up = if up == DVec3::ZERO { DVec3::Y } else { up };
  let reference = if up.y.abs() > 0.999_999 { DVec3::X } else { DVec3::Y };
  let north = (reference - up * reference.dot(up)).normalize();
  let east = north.cross(up);
  (east, north, up)
}

#[cfg(test)]
#[path = "geo_test.rs"]
mod geo_test;
