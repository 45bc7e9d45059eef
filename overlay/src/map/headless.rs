//! In-memory map host

use std::collections::{HashMap, VecDeque};

use indexmap::IndexMap;
use tracing::debug;

use super::host::{MapHost, SubscriptionId, ViewEvent, ViewEventKind};
use crate::dom::Pane;
use crate::geo::{GeoMapper, LatLng, Point, ViewState};

/// Flat mapper: longitude runs along x, latitude along -y, and one unit is
/// `scale * 2^zoom` pixels. Layer points are measured from the viewport's
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarMapper {
    pub scale: f64,
}

impl Default for PlanarMapper {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl PlanarMapper {
    fn project(&self, position: LatLng, zoom: f64) -> Point {
        Point::new(position.lng, -position.lat) * (self.scale * 2f64.powf(zoom))
    }

    fn pixel_origin(&self, view: &ViewState) -> Point {
        self.project(view.center, view.zoom) - view.size / 2.0
    }

    /// Inverse of `lat_lng_to_layer_point`
    pub fn layer_point_to_lat_lng(&self, point: Point, view: &ViewState) -> LatLng {
        let projected = (point + self.pixel_origin(view)) / (self.scale * 2f64.powf(view.zoom));
        LatLng::new(-projected.y, projected.x)
    }
}

impl GeoMapper for PlanarMapper {
    fn lat_lng_to_layer_point(&self, position: LatLng, view: &ViewState) -> Point {
        self.project(position, view.zoom) - self.pixel_origin(view)
    }
}

struct Mailbox {
    kinds: Vec<ViewEventKind>,
    queue: VecDeque<ViewEvent>,
}

/// Map host that keeps view state, panes and subscriber mailboxes in memory.
///
/// View changes queue `ViewEvent`s for each matching subscriber; overlays
/// drain their mailbox when the host loop gives them a turn.
pub struct HeadlessMap<G: GeoMapper = PlanarMapper> {
    view: ViewState,
    mapper: G,
    zoom_animated: bool,
    panes: IndexMap<String, Pane>,
    subscriptions: HashMap<SubscriptionId, Mailbox>,
    pending_zoom: Option<ViewState>,
}

impl HeadlessMap<PlanarMapper> {
    pub fn new(view: ViewState) -> Self {
        Self::with_mapper(view, PlanarMapper::default())
    }
}

impl<G: GeoMapper> HeadlessMap<G> {
    pub fn with_mapper(view: ViewState, mapper: G) -> Self {
        Self {
            view,
            mapper,
            zoom_animated: true,
            panes: IndexMap::new(),
            subscriptions: HashMap::new(),
            pending_zoom: None,
        }
    }

    pub fn with_zoom_animation(mut self, enabled: bool) -> Self {
        self.zoom_animated = enabled;
        self
    }

    pub fn pane(&self, name: &str) -> Option<&Pane> {
        self.panes.get(name)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Queue `event` for every subscriber that asked for its kind
    pub fn fire(&mut self, event: ViewEvent) -> usize {
        let kind = event.kind();
        let mut delivered = 0;
        for mailbox in self.subscriptions.values_mut() {
            if mailbox.kinds.contains(&kind) {
                mailbox.queue.push_back(event.clone());
                delivered += 1;
            }
        }
        delivered
    }

    /// Jump to a new view without animation
    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        let zoom_changed = zoom != self.view.zoom;
        self.view.center = center;
        self.view.zoom = zoom;
        self.pending_zoom = None;
        debug!("View reset to {:?} at zoom {}", center, zoom);

        self.fire(ViewEvent::ViewReset);
        if zoom_changed {
            self.fire(ViewEvent::Zoom);
        }
        self.fire(ViewEvent::Move);
    }

    /// Move the center, keeping the zoom
    pub fn pan_to(&mut self, center: LatLng) {
        self.view.center = center;
        self.fire(ViewEvent::Move);
    }

    pub fn resize(&mut self, size: Point) {
        self.view.size = size;
        self.fire(ViewEvent::ViewReset);
    }

    /// Start an animated zoom. Falls back to `set_view` when animation is off.
    /// Returns true if an animation is now in flight.
    pub fn start_zoom_animation(&mut self, center: LatLng, zoom: f64) -> bool {
        if !self.zoom_animated {
            self.set_view(center, zoom);
            return false;
        }
        let target = ViewState::new(center, zoom, self.view.size);
        self.pending_zoom = Some(target);
        self.fire(ViewEvent::ZoomAnim { target });
        true
    }

    /// Land an in-flight animated zoom on its target view
    pub fn finish_zoom_animation(&mut self) -> bool {
        let Some(target) = self.pending_zoom.take() else {
            return false;
        };
        self.view = target;
        self.fire(ViewEvent::Zoom);
        self.fire(ViewEvent::Move);
        self.fire(ViewEvent::ZoomEnd);
        true
    }
}

impl<G: GeoMapper> MapHost for HeadlessMap<G> {
    fn view(&self) -> ViewState {
        self.view
    }

    fn mapper(&self) -> &dyn GeoMapper {
        &self.mapper
    }

    fn zoom_animated(&self) -> bool {
        self.zoom_animated
    }

    fn pane_mut(&mut self, name: &str) -> &mut Pane {
        self.panes
            .entry(name.to_string())
            .or_insert_with(|| Pane::new(name))
    }

    fn subscribe(&mut self, kinds: &[ViewEventKind]) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.subscriptions.insert(
            id,
            Mailbox {
                kinds: kinds.to_vec(),
                queue: VecDeque::new(),
            },
        );
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(&id).is_some()
    }

    fn drain_events(&mut self, id: SubscriptionId) -> Vec<ViewEvent> {
        self.subscriptions
            .get_mut(&id)
            .map(|mailbox| mailbox.queue.drain(..).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoBounds;

    fn test_view() -> ViewState {
        ViewState::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }

    #[test]
    fn test_planar_mapper_centers_view() {
        let mapper = PlanarMapper::default();
        let view = test_view();
        let point = mapper.lat_lng_to_layer_point(view.center, &view);
        assert_eq!(point, Point::new(400.0, 300.0));
    }

    #[test]
    fn test_planar_mapper_round_trips_a_position() {
        let mapper = PlanarMapper { scale: 2.0 };
        let view = ViewState::new(LatLng::new(12.0, -7.0), 3.0, Point::new(640.0, 480.0));
        let position = LatLng::new(15.5, -2.25);
        let point = mapper.lat_lng_to_layer_point(position, &view);
        let back = mapper.layer_point_to_lat_lng(point, &view);
        assert!((back.lat - position.lat).abs() < 1e-9);
        assert!((back.lng - position.lng).abs() < 1e-9);
    }

    #[test]
    fn test_planar_bounds_double_with_each_zoom_level() {
        let mapper = PlanarMapper::default();
        let bounds = GeoBounds::from_pairs([[0.0, 0.0], [10.0, 20.0]]);
        let mut view = test_view();
        let at_zero = mapper.bounds_to_layer_bounds(&bounds, &view);
        view.zoom = 1.0;
        let at_one = mapper.bounds_to_layer_bounds(&bounds, &view);
        assert_eq!(at_zero.size(), Point::new(20.0, 10.0));
        assert_eq!(at_one.size(), Point::new(40.0, 20.0));
    }

    #[test]
    fn test_events_reach_matching_subscribers_only() {
        let mut map = HeadlessMap::new(test_view());
        let resets = map.subscribe(&[ViewEventKind::ViewReset]);
        let moves = map.subscribe(&[ViewEventKind::Move]);

        map.pan_to(LatLng::new(1.0, 1.0));

        assert!(map.drain_events(resets).is_empty());
        assert_eq!(map.drain_events(moves), vec![ViewEvent::Move]);
        assert!(map.drain_events(moves).is_empty());
    }

    #[test]
    fn test_unsubscribe_drops_mailbox() {
        let mut map = HeadlessMap::new(test_view());
        let id = map.subscribe(&[ViewEventKind::Move]);
        map.pan_to(LatLng::new(1.0, 1.0));

        assert!(map.unsubscribe(id));
        assert!(!map.unsubscribe(id));
        assert_eq!(map.subscriber_count(), 0);
        assert_eq!(map.fire(ViewEvent::Move), 0);
        assert!(map.drain_events(id).is_empty());
    }

    #[test]
    fn test_zoom_animation_lifecycle() {
        let mut map = HeadlessMap::new(test_view());
        let id = map.subscribe(&[
            ViewEventKind::ZoomAnim,
            ViewEventKind::Zoom,
            ViewEventKind::ZoomEnd,
        ]);

        assert!(map.start_zoom_animation(LatLng::new(0.0, 0.0), 2.0));
        assert_eq!(map.view().zoom, 0.0);
        assert!(matches!(
            map.drain_events(id).as_slice(),
            [ViewEvent::ZoomAnim { target }] if target.zoom == 2.0
        ));

        assert!(map.finish_zoom_animation());
        assert_eq!(map.view().zoom, 2.0);
        assert_eq!(
            map.drain_events(id),
            vec![ViewEvent::Zoom, ViewEvent::ZoomEnd]
        );
        assert!(!map.finish_zoom_animation());
    }

    #[test]
    fn test_zoom_animation_disabled_falls_back_to_set_view() {
        let mut map = HeadlessMap::new(test_view()).with_zoom_animation(false);
        let id = map.subscribe(&[ViewEventKind::ZoomAnim, ViewEventKind::ViewReset]);

        assert!(!map.start_zoom_animation(LatLng::new(0.0, 0.0), 3.0));
        assert_eq!(map.view().zoom, 3.0);
        assert_eq!(map.drain_events(id), vec![ViewEvent::ViewReset]);
    }
}
