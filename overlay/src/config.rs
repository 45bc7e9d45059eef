//! Runtime configuration
//!
//! Configuration is loaded from environment variables. Unset or unparsable
//! variables keep their defaults.

use std::env;
use std::time::Duration;

use crate::geo::{GeoBounds, Point};
use crate::overlay::DEFAULT_PANE;

/// Main configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Defaults applied to new overlays
    pub overlay: OverlayDefaults,

    /// Demo binary configuration
    pub demo: DemoConfig,
}

/// Overlay defaults
#[derive(Debug, Clone)]
pub struct OverlayDefaults {
    /// Pane new overlays are placed in
    pub pane: String,
    /// Whether overlays follow animated zoom transitions
    pub zoom_animation: bool,
}

/// Demo configuration
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Address of the embedded resource
    pub url: String,
    /// Geographic bounds of the overlay
    pub bounds: GeoBounds,
    /// Initial zoom level
    pub zoom: f64,
    /// Viewport size in pixels
    pub viewport: Point,
    /// Simulated delay before the resource reports a load outcome
    pub load_delay: Duration,
    /// Whether the simulated load fails
    pub fail_load: bool,
}

impl Default for OverlayDefaults {
    fn default() -> Self {
        Self {
            pane: DEFAULT_PANE.to_string(),
            zoom_animation: true,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            url: "map.svg".to_string(),
            bounds: GeoBounds::from_pairs([[0.0, 0.0], [1000.0, 1000.0]]),
            zoom: -2.0,
            viewport: Point::new(1024.0, 768.0),
            load_delay: Duration::from_millis(250),
            fail_load: false,
        }
    }
}

fn parse_flag(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}

/// Parse `south,west,north,east`
fn parse_bounds(val: &str) -> Option<GeoBounds> {
    let parts: Vec<f64> = val
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [south, west, north, east] => {
            GeoBounds::try_from_pairs([[*south, *west], [*north, *east]]).ok()
        }
        _ => None,
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Overlay defaults
        if let Ok(pane) = env::var("OVERLAY_DEFAULT_PANE")
            && !pane.is_empty()
        {
            config.overlay.pane = pane;
        }
        if let Ok(val) = env::var("OVERLAY_ZOOM_ANIMATION") {
            config.overlay.zoom_animation = parse_flag(&val);
        }

        // Demo config
        if let Ok(url) = env::var("OVERLAY_DEMO_URL")
            && !url.is_empty()
        {
            config.demo.url = url;
        }
        if let Ok(val) = env::var("OVERLAY_DEMO_BOUNDS")
            && let Some(bounds) = parse_bounds(&val)
        {
            config.demo.bounds = bounds;
        }
        if let Ok(val) = env::var("OVERLAY_DEMO_ZOOM")
            && let Ok(zoom) = val.parse()
        {
            config.demo.zoom = zoom;
        }
        if let Ok(val) = env::var("OVERLAY_DEMO_LOAD_DELAY_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            config.demo.load_delay = Duration::from_millis(ms);
        }
        if let Ok(val) = env::var("OVERLAY_DEMO_FAIL_LOAD") {
            config.demo.fail_load = parse_flag(&val);
        }

        config
    }
}
