//! Georeferenced overlay
//!
//! `Overlay<P>` owns the bounds, options and attach/detach lifecycle, and
//! keeps its element aligned with the map view. The `ElementPolicy` `P`
//! decides which element is built and how its native signals are wired.

mod events;
mod factory;
mod layer;
mod policy;
mod types;

pub use events::{EventListenerId, LoadFailure, OverlayEvent, OverlayEventKind, OverlayEvents};
pub use factory::{image_overlay, object_overlay};
pub use layer::{ImageOverlay, ObjectOverlay, Overlay, ZoomPhase};
pub use policy::{
    ElementPolicy, IMAGE_LAYER_CLASS, INTERACTIVE_CLASS, ImageElement, Materialized,
    ObjectElement, ResourceLocator, ZOOM_ANIMATED_CLASS,
};
pub use types::{CrossOrigin, DEFAULT_PANE, OverlayError, OverlayOptions};
