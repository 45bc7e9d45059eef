//! Overlay base: lifecycle, bounds and repositioning

use std::cell::RefCell;
use std::rc::Rc;

use metrics::counter;
use tracing::{debug, info, warn};

use super::events::{EventListenerId, LoadFailure, OverlayEvent, OverlayEventKind, OverlayEvents};
use super::policy::{ElementPolicy, ImageElement, ObjectElement, ResourceLocator};
use super::types::OverlayOptions;
use crate::dom::{Element, ListenerId, NativeEvent, Transform};
use crate::geo::{GeoBounds, LatLng, PixelBounds, ViewState};
use crate::map::{MapHandle, MapHost, SubscriptionId, ViewEvent, ViewEventKind};

/// Overlay embedding an `<object>` element
pub type ObjectOverlay = Overlay<ObjectElement>;
/// Overlay embedding an `<img>` element
pub type ImageOverlay = Overlay<ImageElement>;

/// Zoom transition state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ZoomPhase {
    /// Element geometry was computed from the current view
    #[default]
    Settled,
    /// A scale + translate transform approximates the view at `target`
    Interpolating { target: ViewState },
}

/// Live link between an overlay and the map it is attached to
struct Attachment {
    map: MapHandle,
    pane: String,
    subscription: SubscriptionId,
    zoom_animated: bool,
}

/// Events an attached overlay listens for
fn subscribed_kinds(zoom_animated: bool) -> Vec<ViewEventKind> {
    let mut kinds = vec![
        ViewEventKind::ViewReset,
        ViewEventKind::Zoom,
        ViewEventKind::Move,
    ];
    if zoom_animated {
        kinds.push(ViewEventKind::ZoomAnim);
        kinds.push(ViewEventKind::ZoomEnd);
    }
    kinds
}

/// Georeferenced overlay.
///
/// The element is built on first attach and cached for the overlay's
/// lifetime, so detaching and re-attaching reuses it. Gesture guards and
/// the view subscription only live while attached; load/error listeners live
/// as long as the element.
pub struct Overlay<P: ElementPolicy> {
    policy: P,
    /// Consumed when the element is first built
    locator: Option<ResourceLocator>,
    url: String,
    bounds: GeoBounds,
    options: OverlayOptions,
    element: Option<Element>,
    gesture_guards: Vec<ListenerId>,
    outcome_listeners: Vec<ListenerId>,
    attachment: Option<Attachment>,
    phase: ZoomPhase,
    events: OverlayEvents,
}

impl<P: ElementPolicy> Overlay<P> {
    pub fn new(
        policy: P,
        locator: impl Into<ResourceLocator>,
        bounds: GeoBounds,
        options: OverlayOptions,
    ) -> Self {
        let locator = locator.into();
        Self {
            policy,
            url: locator.address(),
            locator: Some(locator),
            bounds,
            options,
            element: None,
            gesture_guards: Vec::new(),
            outcome_listeners: Vec::new(),
            attachment: None,
            phase: ZoomPhase::Settled,
            events: OverlayEvents::new(),
        }
    }

    pub fn bounds(&self) -> GeoBounds {
        self.bounds
    }

    pub fn center(&self) -> LatLng {
        self.bounds.center()
    }

    /// Canonical resource address
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn options(&self) -> &OverlayOptions {
        &self.options
    }

    /// The embedded element, once built
    pub fn element(&self) -> Option<&Element> {
        self.element.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }

    pub fn is_zoom_animated(&self) -> bool {
        self.attachment.as_ref().is_some_and(|a| a.zoom_animated)
    }

    pub fn zoom_phase(&self) -> ZoomPhase {
        self.phase
    }

    /// Listen for `load` or `error`
    pub fn on(
        &mut self,
        kind: OverlayEventKind,
        callback: impl FnMut(&OverlayEvent) + 'static,
    ) -> EventListenerId {
        self.events.on(kind, callback)
    }

    pub fn off(&mut self, id: EventListenerId) -> bool {
        self.events.off(id)
    }

    /// Attach to `map`
    pub fn add_to<M: MapHost + 'static>(&mut self, map: &Rc<RefCell<M>>) -> &mut Self {
        let handle: MapHandle = map.clone();
        self.attach(handle)
    }

    /// Attach to a type-erased map handle.
    ///
    /// Builds the element if needed, wires its native listeners, appends it
    /// to the configured pane, subscribes to view events and positions it.
    pub fn attach(&mut self, map: MapHandle) -> &mut Self {
        if self.attachment.is_some() {
            warn!("Overlay for '{}' is already attached", self.url);
            return self;
        }

        let mut host = match map.try_borrow_mut() {
            Ok(host) => host,
            Err(_) => {
                warn!("Map is busy; overlay for '{}' not attached", self.url);
                return self;
            }
        };

        let zoom_animated = host.zoom_animated() && self.options.zoom_animation.unwrap_or(true);

        // Construction completes before the element enters the pane
        if self.element.is_none() {
            let locator = self
                .locator
                .take()
                .unwrap_or_else(|| ResourceLocator::Address(self.url.clone()));
            let built = self.policy.init_element(locator, &self.options, zoom_animated);
            self.url = built.address;
            self.element = Some(built.element);
        }
        let Some(element) = self.element.as_mut() else {
            return self;
        };

        if self.outcome_listeners.is_empty() {
            self.outcome_listeners = self.policy.wire_outcome_listeners(element);
        }
        self.gesture_guards = self.policy.wire_gesture_guards(element);
        let style = element.style_mut();
        style.opacity = Some(self.options.opacity);
        style.z_index = Some(self.options.z_index);

        let pane = self.options.pane.clone();
        host.pane_mut(&pane).append(element.id());
        let subscription = host.subscribe(&subscribed_kinds(zoom_animated));
        let geometry = host.mapper().bounds_to_layer_bounds(&self.bounds, &host.view());
        drop(host);

        self.attachment = Some(Attachment {
            map,
            pane,
            subscription,
            zoom_animated,
        });
        self.apply_geometry(geometry);

        counter!("georef_overlay_attach_total").increment(1);
        info!(
            "Attached {} overlay '{}' to pane '{}'",
            self.policy.kind(),
            self.url,
            self.options.pane
        );
        self
    }

    /// Detach from the map. The element is kept for a later re-attach.
    ///
    /// If the map is borrowed elsewhere the overlay stays attached; call
    /// again once the borrow is released.
    pub fn remove(&mut self) -> &mut Self {
        let Some(attachment) = &self.attachment else {
            return self;
        };

        let released = match attachment.map.try_borrow_mut() {
            Ok(mut host) => {
                host.unsubscribe(attachment.subscription);
                if let Some(element) = &self.element {
                    host.pane_mut(&attachment.pane).remove(element.id());
                }
                true
            }
            Err(_) => false,
        };
        if !released {
            warn!("Map is busy; overlay '{}' stays attached", self.url);
            return self;
        }
        self.attachment = None;

        if let Some(element) = self.element.as_mut() {
            for id in self.gesture_guards.drain(..) {
                element.remove_listener(id);
            }
            element.style_mut().transform = None;
        }

        self.phase = ZoomPhase::Settled;
        counter!("georef_overlay_detach_total").increment(1);
        info!("Detached overlay '{}'", self.url);
        self
    }

    /// Replace the geographic bounds and reposition if attached
    pub fn set_bounds(&mut self, bounds: GeoBounds) -> &mut Self {
        if !bounds.is_well_formed() {
            debug!("Accepting inverted bounds {:?}", bounds);
        }
        self.bounds = bounds;
        if self.attachment.is_some() {
            self.reset();
        }
        self
    }

    /// Point the overlay at a new resource address
    pub fn set_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.url = url.into();
        match self.element.as_mut() {
            Some(element) => self.policy.set_address(element, &self.url),
            None => self.locator = Some(ResourceLocator::Address(self.url.clone())),
        }
        debug!("Overlay address set to '{}'", self.url);
        self
    }

    pub fn set_opacity(&mut self, opacity: f64) -> &mut Self {
        self.options.opacity = opacity;
        if self.attachment.is_some()
            && let Some(element) = self.element.as_mut()
        {
            element.style_mut().opacity = Some(opacity);
        }
        self
    }

    pub fn set_z_index(&mut self, z_index: i32) -> &mut Self {
        self.options.z_index = z_index;
        if self.attachment.is_some()
            && let Some(element) = self.element.as_mut()
        {
            element.style_mut().z_index = Some(z_index);
        }
        self
    }

    /// Move the element to the top of its pane
    pub fn bring_to_front(&mut self) -> &mut Self {
        self.restack(true)
    }

    /// Move the element to the bottom of its pane
    pub fn bring_to_back(&mut self) -> &mut Self {
        self.restack(false)
    }

    fn restack(&mut self, to_front: bool) -> &mut Self {
        if let (Some(attachment), Some(element)) = (&self.attachment, &self.element)
            && let Ok(mut host) = attachment.map.try_borrow_mut()
        {
            let pane = host.pane_mut(&attachment.pane);
            if to_front {
                pane.bring_to_front(element.id());
            } else {
                pane.bring_to_back(element.id());
            }
        }
        self
    }

    /// Handle every view event queued for this overlay. Returns how many were handled.
    pub fn process_view_events(&mut self) -> usize {
        let Some(attachment) = &self.attachment else {
            return 0;
        };
        let events = match attachment.map.try_borrow_mut() {
            Ok(mut host) => host.drain_events(attachment.subscription),
            Err(_) => {
                warn!("Map is busy; deferring view events for '{}'", self.url);
                return 0;
            }
        };

        for event in &events {
            self.on_view_event(event);
        }
        events.len()
    }

    /// Apply a single view event. Ignored while detached.
    pub fn on_view_event(&mut self, event: &ViewEvent) {
        if self.attachment.is_none() {
            return;
        }
        match (event, self.phase) {
            (ViewEvent::ZoomAnim { target }, _) => self.animate_zoom(*target),
            // Pans during an animation are folded into the settling pass
            (ViewEvent::Move, ZoomPhase::Interpolating { .. }) => {}
            (ViewEvent::ViewReset | ViewEvent::Zoom | ViewEvent::Move | ViewEvent::ZoomEnd, _) => {
                self.reset()
            }
        }
    }

    /// Deliver a native signal from the embedding runtime to the element.
    /// Returns true if a listener cancelled the signal's default behavior.
    pub fn dispatch_native(&mut self, event: NativeEvent) -> bool {
        let Some(element) = self.element.as_ref() else {
            debug!("Dropping {:?}: overlay '{}' has no element", event, self.url);
            return false;
        };
        let outcome = element.dispatch(&event);

        if outcome.notify {
            match event {
                NativeEvent::Load => self.on_load(),
                NativeEvent::Error { detail } => self.on_load_error(detail),
                NativeEvent::SelectStart | NativeEvent::MouseMove => {}
            }
        } else if matches!(event, NativeEvent::Load | NativeEvent::Error { .. }) {
            debug!("No outcome listener for {:?} on '{}'", event, self.url);
        }

        outcome.suppressed
    }

    fn on_load(&mut self) {
        counter!("georef_overlay_load_total").increment(1);
        debug!("Overlay resource '{}' loaded", self.url);
        self.events.fire(&OverlayEvent::Load {
            address: self.url.clone(),
        });
    }

    fn on_load_error(&mut self, detail: Option<String>) {
        counter!("georef_overlay_error_total").increment(1);
        let failure = LoadFailure {
            kind: self.policy.kind(),
            address: self.url.clone(),
            detail,
        };
        warn!("{}", failure);
        self.events.fire(&OverlayEvent::Error(failure));

        let fallback = &self.options.error_overlay_url;
        if !fallback.is_empty() && *fallback != self.url {
            let fallback = fallback.clone();
            info!("Switching overlay '{}' to error overlay '{}'", self.url, fallback);
            self.set_url(fallback);
        }
    }

    /// Absolute positioning pass from the current view
    fn reset(&mut self) {
        let Some(attachment) = &self.attachment else {
            return;
        };
        let geometry = match attachment.map.try_borrow() {
            Ok(host) => host.mapper().bounds_to_layer_bounds(&self.bounds, &host.view()),
            Err(_) => {
                warn!("Map is busy; skipping reposition of '{}'", self.url);
                return;
            }
        };
        self.apply_geometry(geometry);
    }

    fn apply_geometry(&mut self, geometry: PixelBounds) {
        self.phase = ZoomPhase::Settled;
        let Some(element) = self.element.as_mut() else {
            return;
        };
        let size = geometry.size();
        let style = element.style_mut();
        style.transform = None;
        style.position = geometry.min;
        style.width = Some(size.x);
        style.height = Some(size.y);
        counter!("georef_overlay_reposition_total").increment(1);
    }

    /// Interpolating pass: keep the pixel size, scale and translate towards `target`
    fn animate_zoom(&mut self, target: ViewState) {
        let Some(attachment) = &self.attachment else {
            return;
        };
        if !attachment.zoom_animated {
            return;
        }
        let transform = match attachment.map.try_borrow() {
            Ok(host) => {
                let mapper = host.mapper();
                Transform {
                    translate: mapper.bounds_to_layer_bounds(&self.bounds, &target).min,
                    scale: mapper.zoom_scale(target.zoom, host.view().zoom),
                }
            }
            Err(_) => return,
        };
        if let Some(element) = self.element.as_mut() {
            element.style_mut().transform = Some(transform);
        }
        self.phase = ZoomPhase::Interpolating { target };
    }
}

impl<P: ElementPolicy> Drop for Overlay<P> {
    fn drop(&mut self) {
        if self.attachment.is_some() {
            self.remove();
        }
        if let Some(element) = self.element.as_mut() {
            for id in self.outcome_listeners.drain(..) {
                element.remove_listener(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementKind;
    use crate::geo::Point;
    use crate::map::HeadlessMap;

    fn test_map() -> Rc<RefCell<HeadlessMap>> {
        Rc::new(RefCell::new(HeadlessMap::new(ViewState::new(
            LatLng::new(0.0, 0.0),
            0.0,
            Point::new(800.0, 600.0),
        ))))
    }

    fn test_overlay() -> ObjectOverlay {
        Overlay::new(
            ObjectElement,
            "plan.svg",
            GeoBounds::from_pairs([[0.0, 0.0], [100.0, 200.0]]),
            OverlayOptions::default(),
        )
    }

    #[test]
    fn test_no_element_before_attach() {
        let overlay = test_overlay();
        assert!(overlay.element().is_none());
        assert!(!overlay.is_attached());
        assert_eq!(overlay.url(), "plan.svg");
    }

    #[test]
    fn test_attach_positions_and_styles_element() {
        let map = test_map();
        let mut overlay = test_overlay();
        overlay.add_to(&map);

        let element = overlay.element().unwrap();
        assert_eq!(element.kind(), ElementKind::Object);
        // nw corner (100, 0) -> (400, 200); se corner (0, 200) -> (600, 300)
        assert_eq!(element.style().position, Point::new(400.0, 200.0));
        assert_eq!(element.style().width, Some(200.0));
        assert_eq!(element.style().height, Some(100.0));
        assert_eq!(element.style().opacity, Some(1.0));
        assert_eq!(element.style().z_index, Some(1));
        assert_eq!(element.listener_count(), 4);
        assert!(overlay.is_zoom_animated());
    }

    #[test]
    fn test_second_attach_is_ignored() {
        let map = test_map();
        let mut overlay = test_overlay();
        overlay.add_to(&map);
        overlay.add_to(&map);

        assert_eq!(map.borrow().subscriber_count(), 1);
        assert_eq!(overlay.element().unwrap().listener_count(), 4);
    }

    #[test]
    fn test_detach_releases_gesture_guards_and_subscription() {
        let map = test_map();
        let mut overlay = test_overlay();
        overlay.add_to(&map);
        overlay.remove();

        assert!(!overlay.is_attached());
        // load/error stay wired for the element's lifetime
        assert_eq!(overlay.element().unwrap().listener_count(), 2);
        assert!(!overlay.dispatch_native(NativeEvent::SelectStart));
        assert_eq!(map.borrow().subscriber_count(), 0);

        overlay.add_to(&map);
        assert_eq!(overlay.element().unwrap().listener_count(), 4);
        overlay.remove();
        overlay.add_to(&map);
        assert_eq!(overlay.element().unwrap().listener_count(), 4);
    }

    #[test]
    fn test_remove_while_map_borrowed_stays_attached() {
        let map = test_map();
        let mut overlay = test_overlay();
        overlay.add_to(&map);
        let id = overlay.element().unwrap().id();

        {
            let _busy = map.borrow();
            overlay.remove();
        }
        assert!(overlay.is_attached());
        assert_eq!(map.borrow().subscriber_count(), 1);
        assert!(map.borrow().pane("overlayPane").unwrap().contains(id));
        assert_eq!(overlay.element().unwrap().listener_count(), 4);

        overlay.remove();
        assert!(!overlay.is_attached());
        assert_eq!(map.borrow().subscriber_count(), 0);
        assert!(!map.borrow().pane("overlayPane").unwrap().contains(id));
    }

    #[test]
    fn test_remove_mid_animation_clears_transform() {
        let map = test_map();
        let mut overlay = test_overlay();
        overlay.add_to(&map);
        overlay.on_view_event(&ViewEvent::ZoomAnim {
            target: ViewState::new(LatLng::new(0.0, 0.0), 2.0, Point::new(800.0, 600.0)),
        });
        assert!(overlay.element().unwrap().style().transform.is_some());

        overlay.remove();
        assert_eq!(overlay.zoom_phase(), ZoomPhase::Settled);
        assert!(overlay.element().unwrap().style().transform.is_none());
    }

    #[test]
    fn test_drop_detaches() {
        let map = test_map();
        {
            let mut overlay = test_overlay();
            overlay.add_to(&map);
            assert_eq!(map.borrow().subscriber_count(), 1);
        }
        assert_eq!(map.borrow().subscriber_count(), 0);
        assert!(map.borrow().pane("overlayPane").unwrap().children().is_empty());
    }

    #[test]
    fn test_presentation_cached_until_attach() {
        let map = test_map();
        let mut overlay = test_overlay();
        overlay.set_opacity(0.4).set_z_index(7);
        assert!(overlay.element().is_none());

        overlay.add_to(&map);
        let style = overlay.element().unwrap().style();
        assert_eq!(style.opacity, Some(0.4));
        assert_eq!(style.z_index, Some(7));
    }

    #[test]
    fn test_zoom_animation_option_overrides_map() {
        let map = test_map();
        let options = OverlayOptions {
            zoom_animation: Some(false),
            ..OverlayOptions::default()
        };
        let mut overlay = Overlay::new(
            ObjectElement,
            "plan.svg",
            GeoBounds::from_pairs([[0.0, 0.0], [1.0, 1.0]]),
            options,
        );
        overlay.add_to(&map);

        assert!(!overlay.is_zoom_animated());
        overlay.on_view_event(&ViewEvent::ZoomAnim {
            target: ViewState::new(LatLng::new(0.0, 0.0), 2.0, Point::new(800.0, 600.0)),
        });
        assert_eq!(overlay.zoom_phase(), ZoomPhase::Settled);
        assert!(overlay.element().unwrap().style().transform.is_none());
    }

    #[test]
    fn test_native_signal_without_element_is_dropped() {
        let mut overlay = test_overlay();
        assert!(!overlay.dispatch_native(NativeEvent::MouseMove));
        assert!(!overlay.dispatch_native(NativeEvent::Load));
    }
}
