//! Coordinate value types

use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while validating geographic input
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    #[error("Invalid coordinate: lat={lat}, lng={lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },
}

/// Geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build a position, rejecting NaN and infinite components
    pub fn try_new(lat: f64, lng: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(GeoError::InvalidCoordinate { lat, lng });
        }
        Ok(Self { lat, lng })
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

/// Geographic rectangle given by its south-west and north-east corners.
///
/// Corners are stored exactly as supplied. A rectangle whose south-west
/// corner lies north of its north-east corner is kept as-is; the mapper
/// decides what it looks like on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    south_west: LatLng,
    north_east: LatLng,
}

impl GeoBounds {
    pub const fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Build bounds from `[[lat, lng], [lat, lng]]` pairs (south-west first)
    pub fn from_pairs(pairs: [[f64; 2]; 2]) -> Self {
        Self::new(pairs[0].into(), pairs[1].into())
    }

    /// Like `from_pairs`, but rejects non-finite coordinates
    pub fn try_from_pairs(pairs: [[f64; 2]; 2]) -> Result<Self, GeoError> {
        Ok(Self::new(
            LatLng::try_new(pairs[0][0], pairs[0][1])?,
            LatLng::try_new(pairs[1][0], pairs[1][1])?,
        ))
    }

    pub fn south_west(&self) -> LatLng {
        self.south_west
    }

    pub fn north_east(&self) -> LatLng {
        self.north_east
    }

    pub fn north_west(&self) -> LatLng {
        LatLng::new(self.north_east.lat, self.south_west.lng)
    }

    pub fn south_east(&self) -> LatLng {
        LatLng::new(self.south_west.lat, self.north_east.lng)
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// Whether the south-west corner really is south of the north-east one
    pub fn is_well_formed(&self) -> bool {
        self.south_west.lat <= self.north_east.lat
    }
}

/// Point in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;

    fn div(self, rhs: f64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

/// Axis-aligned pixel rectangle, always normalized so `min <= max`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelBounds {
    pub min: Point,
    pub max: Point,
}

impl PixelBounds {
    /// Build the rectangle spanned by two arbitrary corners
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Build from a top-left corner and a size
    pub fn from_origin_size(origin: Point, width: f64, height: f64) -> Self {
        Self::from_corners(origin, Point::new(origin.x + width, origin.y + height))
    }

    pub fn size(&self) -> Point {
        self.max - self.min
    }
}

/// Current view of the hosting map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Geographic position at the middle of the viewport
    pub center: LatLng,
    /// Zoom level (fractional zoom allowed)
    pub zoom: f64,
    /// Viewport size in pixels
    pub size: Point,
}

impl ViewState {
    pub const fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self { center, zoom, size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_keep_corners_verbatim() {
        let bounds = GeoBounds::from_pairs([[10.0, 20.0], [-5.0, 30.0]]);
        assert_eq!(bounds.south_west(), LatLng::new(10.0, 20.0));
        assert_eq!(bounds.north_east(), LatLng::new(-5.0, 30.0));
        assert!(!bounds.is_well_formed());
    }

    #[test]
    fn test_bounds_derived_corners_and_center() {
        let bounds = GeoBounds::from_pairs([[0.0, 0.0], [1000.0, 1000.0]]);
        assert_eq!(bounds.north_west(), LatLng::new(1000.0, 0.0));
        assert_eq!(bounds.south_east(), LatLng::new(0.0, 1000.0));
        assert_eq!(bounds.center(), LatLng::new(500.0, 500.0));
        assert!(bounds.is_well_formed());
    }

    #[test]
    fn test_try_from_pairs_rejects_nan() {
        let result = GeoBounds::try_from_pairs([[f64::NAN, 0.0], [1.0, 1.0]]);
        assert!(matches!(result, Err(GeoError::InvalidCoordinate { .. })));
    }

    #[test]
    fn test_pixel_bounds_normalize_corners() {
        let bounds = PixelBounds::from_corners(Point::new(50.0, 5.0), Point::new(10.0, 25.0));
        assert_eq!(bounds.min, Point::new(10.0, 5.0));
        assert_eq!(bounds.max, Point::new(50.0, 25.0));
        assert_eq!(bounds.size(), Point::new(40.0, 20.0));
    }
}
