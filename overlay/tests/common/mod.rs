//! Common Test Utilities for Integration Tests
//!
//! Shared fixtures: maps, mappers and event recorders.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use georef_overlay::overlay::{ElementPolicy, OverlayEvent, OverlayEventKind};
use georef_overlay::{
    GeoBounds, GeoMapper, HeadlessMap, LatLng, Overlay, PixelBounds, Point, ViewState,
};

/// Mapper that places any bounds at one fixed pixel rectangle
#[derive(Debug, Clone, Copy)]
pub struct FixedRectMapper {
    pub rect: PixelBounds,
}

impl FixedRectMapper {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            rect: PixelBounds::from_origin_size(Point::new(x, y), width, height),
        }
    }
}

impl GeoMapper for FixedRectMapper {
    fn lat_lng_to_layer_point(&self, _position: LatLng, _view: &ViewState) -> Point {
        self.rect.min
    }

    fn bounds_to_layer_bounds(&self, _bounds: &GeoBounds, _view: &ViewState) -> PixelBounds {
        self.rect
    }
}

pub fn default_view() -> ViewState {
    ViewState::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
}

/// Headless map with the planar mapper
pub fn planar_map() -> Rc<RefCell<HeadlessMap>> {
    Rc::new(RefCell::new(HeadlessMap::new(default_view())))
}

/// Headless map whose mapper always answers with the given rectangle
pub fn fixed_rect_map(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Rc<RefCell<HeadlessMap<FixedRectMapper>>> {
    Rc::new(RefCell::new(HeadlessMap::with_mapper(
        default_view(),
        FixedRectMapper::new(x, y, width, height),
    )))
}

/// Records every `load` and `error` event an overlay emits
#[derive(Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<OverlayEvent>>>,
}

impl EventLog {
    pub fn attach_to<P: ElementPolicy>(overlay: &mut Overlay<P>) -> Self {
        let log = Self::default();
        for kind in [OverlayEventKind::Load, OverlayEventKind::Error] {
            let sink = log.events.clone();
            overlay.on(kind, move |event| sink.borrow_mut().push(event.clone()));
        }
        log
    }

    pub fn events(&self) -> Vec<OverlayEvent> {
        self.events.borrow().clone()
    }

    pub fn count(&self, kind: OverlayEventKind) -> usize {
        self.events.borrow().iter().filter(|e| e.kind() == kind).count()
    }
}
