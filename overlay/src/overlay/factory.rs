//! Overlay constructors

use super::layer::{ImageOverlay, ObjectOverlay, Overlay};
use super::policy::{ImageElement, ObjectElement, ResourceLocator};
use super::types::OverlayOptions;
use crate::geo::GeoBounds;

/// Create an overlay that embeds `locator` in an `<object>` element.
///
/// `locator` is either the resource address or an `<object>` element the
/// caller already configured.
pub fn object_overlay(
    locator: impl Into<ResourceLocator>,
    bounds: GeoBounds,
    options: OverlayOptions,
) -> ObjectOverlay {
    Overlay::new(ObjectElement, locator, bounds, options)
}

/// Create an overlay that embeds `locator` in an `<img>` element
pub fn image_overlay(
    locator: impl Into<ResourceLocator>,
    bounds: GeoBounds,
    options: OverlayOptions,
) -> ImageOverlay {
    Overlay::new(ImageElement, locator, bounds, options)
}
