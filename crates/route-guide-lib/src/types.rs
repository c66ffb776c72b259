//! Message types exchanged by the route guide calls
//!
//! Coordinates use the E7 representation: degrees multiplied by 10^7 and
//! rounded to the nearest integer, so they travel as exact integers.

use geo::{Coord, Rect};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scale between degrees and E7 fixed-point units
pub const COORD_FACTOR: f64 = 1e7;

/// Largest valid latitude in E7 units (90 degrees)
pub const MAX_LATITUDE_E7: i32 = 900_000_000;

/// Largest valid longitude in E7 units (180 degrees)
pub const MAX_LONGITUDE_E7: i32 = 1_800_000_000;

/// A latitude/longitude pair in E7 fixed-point units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub latitude: i32,
    pub longitude: i32,
}

impl Point {
    pub const fn new(latitude: i32, longitude: i32) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build a point from degrees, rounding to the nearest E7 unit
    pub fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: (latitude * COORD_FACTOR).round() as i32,
            longitude: (longitude * COORD_FACTOR).round() as i32,
        }
    }

    #[inline]
    pub fn latitude_degrees(&self) -> f64 {
        self.latitude as f64 / COORD_FACTOR
    }

    #[inline]
    pub fn longitude_degrees(&self) -> f64 {
        self.longitude as f64 / COORD_FACTOR
    }

    /// Check that the point lies within +/- 90 latitude and +/- 180 longitude (inclusive)
    #[inline]
    pub fn is_valid(&self) -> bool {
        (-MAX_LATITUDE_E7..=MAX_LATITUDE_E7).contains(&self.latitude)
            && (-MAX_LONGITUDE_E7..=MAX_LONGITUDE_E7).contains(&self.longitude)
    }

    /// Longitude as x, latitude as y
    #[inline]
    pub fn to_coord(self) -> Coord<i32> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// A latitude/longitude rectangle given by two diagonally opposite corners
///
/// The corners are not ordered: `lo` is not necessarily the south-west corner.
/// Use [`Rectangle::normalized`] before testing containment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rectangle {
    pub lo: Point,
    pub hi: Point,
}

impl Rectangle {
    pub const fn new(lo: Point, hi: Point) -> Self {
        Self { lo, hi }
    }

    /// Normalized bounds with x = longitude and y = latitude.
    ///
    /// `min().x` is the left edge, `max().x` the right edge, `min().y` the
    /// bottom and `max().y` the top.
    #[inline]
    pub fn normalized(&self) -> Rect<i32> {
        Rect::new(self.lo.to_coord(), self.hi.to_coord())
    }

    /// Inclusive containment test against the normalized bounds
    #[inline]
    pub fn contains(&self, point: &Point) -> bool {
        contains_inclusive(&self.normalized(), point)
    }
}

/// Inclusive containment: points on an edge are inside
#[inline]
pub(crate) fn contains_inclusive(bounds: &Rect<i32>, point: &Point) -> bool {
    let (min, max) = (bounds.min(), bounds.max());
    point.longitude >= min.x
        && point.longitude <= max.x
        && point.latitude >= min.y
        && point.latitude <= max.y
}

/// A named thing at a given point.
///
/// If a feature could not be named, the name is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Feature {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub location: Point,
}

impl Feature {
    pub fn new(name: impl Into<String>, location: Point) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }

    #[inline]
    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Result of a RecordRoute call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteSummary {
    /// Number of points received
    pub point_count: i32,
    /// Number of known features passed while traversing the route
    pub feature_count: i32,
    /// Distance covered in meters
    pub distance: i32,
    /// Duration of the traversal in seconds
    pub elapsed_time: i32,
}

/// A message sent while at a given point
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteNote {
    pub location: Point,
    pub message: String,
}

impl RouteNote {
    pub fn new(location: Point, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}
