//! Element construction policies
//!
//! An `ElementPolicy` decides which element an overlay embeds and how the
//! element's native signals are wired. `ObjectElement` embeds an `<object>`
//! (SVG documents and other typed resources); `ImageElement` embeds an `<img>`.

use tracing::{debug, warn};

use super::types::OverlayOptions;
use crate::dom::{Element, ElementKind, ListenerAction, ListenerId, NativeEventKind};

/// Presentation class applied to every created overlay element
pub const IMAGE_LAYER_CLASS: &str = "georef-image-layer";
/// Added when the overlay follows animated zoom transitions
pub const ZOOM_ANIMATED_CLASS: &str = "georef-zoom-animated";
/// Added when the overlay takes part in pointer interaction
pub const INTERACTIVE_CLASS: &str = "georef-interactive";

/// Where an overlay's resource comes from
#[derive(Debug, Clone)]
pub enum ResourceLocator {
    /// Address of the resource; a new element is built for it
    Address(String),
    /// Element configured by the caller; adopted without attribute writes
    Element(Element),
}

impl ResourceLocator {
    /// Address this locator currently points at
    pub fn address(&self) -> String {
        match self {
            ResourceLocator::Address(address) => address.clone(),
            ResourceLocator::Element(element) => {
                element.resource_address().unwrap_or_default().to_string()
            }
        }
    }
}

impl From<&str> for ResourceLocator {
    fn from(address: &str) -> Self {
        ResourceLocator::Address(address.to_string())
    }
}

impl From<String> for ResourceLocator {
    fn from(address: String) -> Self {
        ResourceLocator::Address(address)
    }
}

impl From<Element> for ResourceLocator {
    fn from(element: Element) -> Self {
        ResourceLocator::Element(element)
    }
}

/// Element produced by `ElementPolicy::init_element`
#[derive(Debug)]
pub struct Materialized {
    pub element: Element,
    /// Canonical resource address read back after construction
    pub address: String,
    /// True if the caller's element was adopted rather than created
    pub adopted: bool,
}

/// Construction policy for one kind of embeddable element
pub trait ElementPolicy {
    /// Element kind this policy builds and adopts
    fn kind(&self) -> ElementKind;

    /// Write the resource address and kind-specific option attributes
    fn write_attributes(&self, element: &mut Element, address: &str, options: &OverlayOptions);

    /// Point an existing element at a new address
    fn set_address(&self, element: &mut Element, address: &str) {
        element.set_attribute(self.kind().address_attribute(), address);
    }

    /// Build the element for `locator`, or adopt it if the caller supplied one
    fn init_element(
        &self,
        locator: ResourceLocator,
        options: &OverlayOptions,
        zoom_animated: bool,
    ) -> Materialized {
        let address = match locator {
            ResourceLocator::Element(element) if element.kind() == self.kind() => {
                let address = element.resource_address().unwrap_or_default().to_string();
                debug!("Adopting supplied {} element for '{}'", self.kind(), address);
                return Materialized {
                    element,
                    address,
                    adopted: true,
                };
            }
            ResourceLocator::Element(element) => {
                let address = element.resource_address().unwrap_or_default().to_string();
                warn!(
                    "Supplied {} element cannot back a {} overlay; building a new one for '{}'",
                    element.kind(),
                    self.kind(),
                    address
                );
                address
            }
            ResourceLocator::Address(address) => address,
        };

        let mut element = Element::create(self.kind());
        element.add_class(IMAGE_LAYER_CLASS);
        if zoom_animated {
            element.add_class(ZOOM_ANIMATED_CLASS);
        }
        if options.interactive {
            element.add_class(INTERACTIVE_CLASS);
        }
        for class in options.class_name.split_whitespace() {
            element.add_class(class);
        }
        self.write_attributes(&mut element, &address, options);
        debug!("Created {} element for '{}'", self.kind(), address);

        Materialized {
            element,
            address,
            adopted: false,
        }
    }

    /// Suppress gesture starts so the embedded content does not steal map
    /// drags. Wired while attached.
    fn wire_gesture_guards(&self, element: &mut Element) -> Vec<ListenerId> {
        vec![
            element.add_listener(NativeEventKind::SelectStart, ListenerAction::Suppress),
            element.add_listener(NativeEventKind::MouseMove, ListenerAction::Suppress),
        ]
    }

    /// Forward load/error to the owner. Wired once per element; an in-flight
    /// load may complete after detach.
    fn wire_outcome_listeners(&self, element: &mut Element) -> Vec<ListenerId> {
        vec![
            element.add_listener(NativeEventKind::Load, ListenerAction::Notify),
            element.add_listener(NativeEventKind::Error, ListenerAction::Notify),
        ]
    }
}

/// `<object>` element policy
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectElement;

impl ElementPolicy for ObjectElement {
    fn kind(&self) -> ElementKind {
        ElementKind::Object
    }

    fn write_attributes(&self, element: &mut Element, address: &str, options: &OverlayOptions) {
        element.set_attribute("data", address);
        element.set_attribute("type", options.resource_type.as_str());
        element.set_attribute("name", options.browsing_context_name.as_str());
        element.set_attribute("usemap", options.map_reference.as_str());
        element.set_attribute("height", options.display_height.as_str());
        element.set_attribute("width", options.display_width.as_str());
    }
}

/// `<img>` element policy
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageElement;

impl ElementPolicy for ImageElement {
    fn kind(&self) -> ElementKind {
        ElementKind::Image
    }

    fn write_attributes(&self, element: &mut Element, address: &str, options: &OverlayOptions) {
        // crossorigin must be set before src so the fetch uses the right mode
        if let Some(mode) = options.cross_origin {
            element.set_attribute("crossorigin", mode.as_attribute());
        }
        element.set_attribute("alt", options.alt.as_str());
        element.set_attribute("src", address);
    }
}
