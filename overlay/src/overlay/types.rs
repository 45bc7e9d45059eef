//! Overlay options and error definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::OverlayDefaults;
use crate::geo::GeoError;

/// Pane overlays are placed in unless configured otherwise
pub const DEFAULT_PANE: &str = "overlayPane";

/// Errors raised while parsing overlay inputs.
///
/// Lifecycle operations never fail; load failures are reported through the
/// overlay's `error` event instead.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("Invalid overlay options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    #[error(transparent)]
    Geo(#[from] GeoError),
}

/// CORS mode written to the element's `crossorigin` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrossOrigin {
    Anonymous,
    UseCredentials,
}

impl CrossOrigin {
    pub fn as_attribute(&self) -> &'static str {
        match self {
            CrossOrigin::Anonymous => "anonymous",
            CrossOrigin::UseCredentials => "use-credentials",
        }
    }
}

/// Overlay configuration. Every field is optional when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayOptions {
    /// Element opacity (0.0-1.0)
    pub opacity: f64,
    /// Whether the element takes part in pointer interaction
    pub interactive: bool,
    /// Pane the element is placed in
    pub pane: String,
    /// Stacking order inside the pane
    pub z_index: i32,
    /// CORS mode for image elements
    pub cross_origin: Option<CrossOrigin>,
    /// Alternative text for image elements
    pub alt: String,
    /// Extra classes added to created elements (space separated)
    pub class_name: String,
    /// Address switched to once after a load failure (empty = none)
    pub error_overlay_url: String,
    /// `Some(false)` disables animated zoom even if the map animates
    pub zoom_animation: Option<bool>,

    /// MIME type hint for the embedded resource
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Name of the embedded browsing context
    #[serde(rename = "name")]
    pub browsing_context_name: String,
    /// Hash reference to a client-side image map, e.g. `#regions`
    #[serde(rename = "usemap")]
    pub map_reference: String,
    /// Display height in CSS pixels
    #[serde(rename = "height")]
    pub display_height: String,
    /// Display width in CSS pixels
    #[serde(rename = "width")]
    pub display_width: String,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            interactive: false,
            pane: DEFAULT_PANE.to_string(),
            z_index: 1,
            cross_origin: None,
            alt: String::new(),
            class_name: String::new(),
            error_overlay_url: String::new(),
            zoom_animation: None,
            resource_type: String::new(),
            browsing_context_name: String::new(),
            map_reference: String::new(),
            display_height: String::new(),
            display_width: String::new(),
        }
    }
}

impl OverlayOptions {
    /// Parse options from a JSON object; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, OverlayError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Defaults seeded from process configuration
    pub fn with_defaults(defaults: &OverlayDefaults) -> Self {
        Self {
            pane: defaults.pane.clone(),
            zoom_animation: Some(defaults.zoom_animation),
            ..Self::default()
        }
    }
}
