use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use georef_overlay::config::Config;
use georef_overlay::dom::NativeEvent;
use georef_overlay::overlay::OverlayEventKind;
use georef_overlay::{
    GeoMapper, HeadlessMap, LatLng, MapHost, OverlayOptions, ViewState, object_overlay,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Upper bound on demo frames in case the load outcome never arrives
const MAX_FRAMES: u32 = 200;

/// Stand-in for the embedding runtime: reports a load outcome after a delay
async fn simulate_load(delay: Duration, fail: bool, tx: mpsc::Sender<NativeEvent>) {
    tokio::time::sleep(delay).await;
    let event = if fail {
        NativeEvent::Error {
            detail: Some("HTTP 404".to_string()),
        }
    } else {
        NativeEvent::Load
    };
    if tx.send(event).await.is_err() {
        warn!("Overlay went away before its resource settled");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Metrics recorder must be installed before any metrics are recorded
    let prometheus = PrometheusBuilder::new().install_recorder()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "georef_overlay=debug,overlay_demo=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Loaded configuration: pane={}, zoom_animation={}, url={}",
        config.overlay.pane, config.overlay.zoom_animation, config.demo.url
    );

    let demo = &config.demo;
    let map = Rc::new(RefCell::new(
        HeadlessMap::new(ViewState::new(demo.bounds.center(), demo.zoom, demo.viewport))
            .with_zoom_animation(config.overlay.zoom_animation),
    ));

    let options = OverlayOptions {
        resource_type: "image/svg+xml".to_string(),
        ..OverlayOptions::with_defaults(&config.overlay)
    };
    let mut overlay = object_overlay(demo.url.as_str(), demo.bounds, options);
    overlay.on(OverlayEventKind::Load, |event| info!("Overlay event: {:?}", event));
    overlay.on(OverlayEventKind::Error, |event| warn!("Overlay event: {:?}", event));
    overlay.add_to(&map);

    let (tx, mut rx) = mpsc::channel(4);
    tokio::spawn(simulate_load(demo.load_delay, demo.fail_load, tx));

    // Pan a few frames while the resource loads, then run an animated zoom
    let mut frames = tokio::time::interval(Duration::from_millis(50));
    let mut step = 0u32;
    let mut settled = false;
    while (!settled || step < 8) && step < MAX_FRAMES {
        tokio::select! {
            Some(event) = rx.recv(), if !settled => {
                overlay.dispatch_native(event);
                settled = true;
            }
            _ = frames.tick() => {
                step += 1;
                let center = map.borrow().view().center;
                map.borrow_mut()
                    .pan_to(LatLng::new(center.lat + 5.0, center.lng + 5.0));
                overlay.process_view_events();
            }
        }
    }

    let zoom = map.borrow().view().zoom + 1.0;
    let center = demo.bounds.center();
    let animating = map.borrow_mut().start_zoom_animation(center, zoom);
    overlay.process_view_events();
    if animating {
        info!("Mid-animation phase: {:?}", overlay.zoom_phase());
        map.borrow_mut().finish_zoom_animation();
        overlay.process_view_events();
    }

    if let Some(element) = overlay.element() {
        let view = map.borrow().view();
        let expected = map
            .borrow()
            .mapper()
            .bounds_to_layer_bounds(&overlay.bounds(), &view);
        let report = json!({
            "url": overlay.url(),
            "attributes": element.attributes().collect::<Vec<_>>(),
            "classes": element.classes().collect::<Vec<_>>(),
            "style": element.style(),
            "expected": expected,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    overlay.remove();
    println!("{}", prometheus.render());
    Ok(())
}
