//! GeoMapper trait definition

use super::types::{GeoBounds, LatLng, PixelBounds, Point, ViewState};

/// Converts geographic positions into layer pixels for a given view.
///
/// Implemented by the hosting map. The overlay only borrows it.
pub trait GeoMapper {
    /// Project a geographic position to a layer pixel under `view`
    fn lat_lng_to_layer_point(&self, position: LatLng, view: &ViewState) -> Point;

    /// Scale factor applied to content when moving from `from_zoom` to `to_zoom`
    fn zoom_scale(&self, to_zoom: f64, from_zoom: f64) -> f64 {
        2f64.powf(to_zoom - from_zoom)
    }

    /// Pixel rectangle covered by `bounds` under `view`
    fn bounds_to_layer_bounds(&self, bounds: &GeoBounds, view: &ViewState) -> PixelBounds {
        PixelBounds::from_corners(
            self.lat_lng_to_layer_point(bounds.north_west(), view),
            self.lat_lng_to_layer_point(bounds.south_east(), view),
        )
    }
}
