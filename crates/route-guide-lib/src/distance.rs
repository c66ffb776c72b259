//! Great-circle distance between E7 points

use crate::types::{COORD_FACTOR, Point};

/// Earth's radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Convert an E7 coordinate to radians
#[inline(always)]
pub fn e7_to_radians(value: i32) -> f64 {
    (value as f64 / COORD_FACTOR) * std::f64::consts::PI / 180.0
}

/// Calculate the Haversine distance between two points in whole meters
///
/// The result is truncated toward zero. The formula is symmetric, and the
/// distance from a point to itself is exactly zero.
#[inline]
pub fn distance(p1: &Point, p2: &Point) -> i32 {
    let lat1 = e7_to_radians(p1.latitude);
    let lat2 = e7_to_radians(p2.latitude);
    let lng1 = e7_to_radians(p1.longitude);
    let lng2 = e7_to_radians(p2.longitude);
    let delta_lat = lat2 - lat1;
    let delta_lng = lng2 - lng1;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    (EARTH_RADIUS_M * c) as i32
}
