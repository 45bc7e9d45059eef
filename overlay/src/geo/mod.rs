//! Geographic and pixel-space geometry
//!
//! Value types shared by the overlay and its hosting map, plus the
//! `GeoMapper` seam through which geographic bounds become screen pixels.

mod mapper;
mod types;

pub use mapper::GeoMapper;
pub use types::{GeoBounds, GeoError, LatLng, PixelBounds, Point, ViewState};
