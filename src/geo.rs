//! Great-circle math used for proximity searches and distance labels.

use std::fmt;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points, in km.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
  let d_lat = (lat2 - lat1).to_radians();
  let d_lon = (lon2 - lon1).to_radians();

  let a = (d_lat / 2.0).sin().powi(2)
    + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
  let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

  EARTH_RADIUS_KM * c
}

/// Initial bearing from the first point to the second, in degrees [0, 360).
pub fn bearing_degrees(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
  let d_lon = (lon2 - lon1).to_radians();
  let (lat1, lat2) = (lat1.to_radians(), lat2.to_radians());

  let y = d_lon.sin() * lat2.cos();
  let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

  (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Eight-way compass direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinal {
  N,
  NE,
  E,
  SE,
  S,
  SW,
  W,
  NW,
}

impl Cardinal {
  const ALL: [Cardinal; 8] = [
    Cardinal::N,
    Cardinal::NE,
    Cardinal::E,
    Cardinal::SE,
    Cardinal::S,
    Cardinal::SW,
    Cardinal::W,
    Cardinal::NW,
  ];

  /// Spanish name, as used in location labels
  pub fn name(&self) -> &'static str {
    match self {
      Cardinal::N => "norte",
      Cardinal::NE => "noreste",
      Cardinal::E => "este",
      Cardinal::SE => "sureste",
      Cardinal::S => "sur",
      Cardinal::SW => "suroeste",
      Cardinal::W => "oeste",
      Cardinal::NW => "noroeste",
    }
  }
}

impl fmt::Display for Cardinal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Debug::fmt(self, f)
  }
}

pub fn cardinal(bearing: f64) -> Cardinal {
  let normalized = bearing.rem_euclid(360.0);
  let index = ((normalized + 22.5) / 45.0) as usize % 8;
  Cardinal::ALL[index]
}

pub fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
  (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
}

pub fn is_within_radius(
  center_lat: f64,
  center_lon: f64,
  lat: f64,
  lon: f64,
  radius_km: f64,
) -> bool {
  distance_km(center_lat, center_lon, lat, lon) <= radius_km
}

/// Human label: metres below 1 km, one decimal below 10 km, whole km above.
pub fn format_distance(km: f64) -> String {
  if km < 1.0 {
    format!("{} m", (km * 1000.0).round() as i64)
  } else if km < 10.0 {
    format!("{:.1} km", km)
  } else {
    format!("{} km", km.round() as i64)
  }
}

/// e.g. "2.5 km al norte"
pub fn relative_location(from_lat: f64, from_lon: f64, to_lat: f64, to_lon: f64) -> String {
  let distance = distance_km(from_lat, from_lon, to_lat, to_lon);
  let direction = cardinal(bearing_degrees(from_lat, from_lon, to_lat, to_lon));
  format!("{} al {}", format_distance(distance), direction.name())
}

#[cfg(test)]
mod tests {
  use super::*;

  // Plaza de Armas, Puno and Plaza de Armas, Cusco
  const PUNO: (f64, f64) = (-15.8402, -70.0219);
  const CUSCO: (f64, f64) = (-13.5170, -71.9785);

  #[test]
  fn distance_between_known_cities() {
    let d = distance_km(PUNO.0, PUNO.1, CUSCO.0, CUSCO.1);
    assert!((d - 330.0).abs() < 10.0, "got {}", d);
    assert_eq!(distance_km(PUNO.0, PUNO.1, PUNO.0, PUNO.1), 0.0);
  }

  #[test]
  fn bearing_and_cardinal() {
    let north = bearing_degrees(0.0, 0.0, 1.0, 0.0);
    assert!(north.abs() < 1e-9);
    assert_eq!(cardinal(north), Cardinal::N);

    let east = bearing_degrees(0.0, 0.0, 0.0, 1.0);
    assert!((east - 90.0).abs() < 1e-9);
    assert_eq!(cardinal(east), Cardinal::E);

    assert_eq!(cardinal(350.0), Cardinal::N);
    assert_eq!(cardinal(225.0), Cardinal::SW);
    assert_eq!(Cardinal::NW.to_string(), "NW");
  }

  #[test]
  fn coordinate_validation() {
    assert!(is_valid_coordinate(-90.0, 180.0));
    assert!(!is_valid_coordinate(90.5, 0.0));
    assert!(!is_valid_coordinate(0.0, -181.0));
    assert!(!is_valid_coordinate(f64::NAN, 0.0));
  }

  #[test]
  fn radius_check() {
    assert!(is_within_radius(0.0, 0.0, 0.05, 0.0, 10.0));
    assert!(!is_within_radius(PUNO.0, PUNO.1, CUSCO.0, CUSCO.1, 100.0));
  }

  #[test]
  fn distance_labels() {
    assert_eq!(format_distance(0.4567), "457 m");
    assert_eq!(format_distance(2.54), "2.5 km");
    assert_eq!(format_distance(12.6), "13 km");
  }

  #[test]
  fn relative_location_label() {
    // One degree of latitude is ~111 km
    assert_eq!(relative_location(0.0, 0.0, 1.0, 0.0), "111 km al norte");
  }
}
