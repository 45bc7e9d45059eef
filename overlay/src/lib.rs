//! Georeferenced overlay library
//!
//! Positions an embedded resource (an `<object>` or `<img>` style element)
//! over a geographic rectangle and keeps it aligned with the hosting map's
//! pan/zoom transform.

pub mod config;
pub mod dom;
pub mod geo;
pub mod map;
pub mod overlay;

// Re-export commonly used types
pub use geo::{GeoBounds, GeoError, GeoMapper, LatLng, PixelBounds, Point, ViewState};
pub use map::{HeadlessMap, MapHost, ViewEvent};
pub use overlay::{
    ImageOverlay, LoadFailure, ObjectOverlay, Overlay, OverlayError, OverlayEvent,
    OverlayOptions, ResourceLocator, image_overlay, object_overlay,
};
