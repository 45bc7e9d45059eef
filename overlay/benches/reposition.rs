//! Micro-benchmarks for overlay repositioning
//!
//! - Absolute reset passes triggered by view resets
//! - Animated zoom interpolation passes
//!
//! Run with: cargo bench --bench reposition

use std::cell::RefCell;
use std::hint::black_box;
use std::rc::Rc;

use criterion::{Criterion, criterion_group, criterion_main};
use georef_overlay::{
    GeoBounds, HeadlessMap, LatLng, OverlayOptions, Point, ViewEvent, ViewState, object_overlay,
};

fn test_map() -> Rc<RefCell<HeadlessMap>> {
    Rc::new(RefCell::new(HeadlessMap::new(ViewState::new(
        LatLng::new(0.0, 0.0),
        3.0,
        Point::new(1920.0, 1080.0),
    ))))
}

fn bench_view_reset(c: &mut Criterion) {
    let map = test_map();
    let mut overlay = object_overlay(
        "plan.svg",
        GeoBounds::from_pairs([[-10.0, -10.0], [10.0, 10.0]]),
        OverlayOptions::default(),
    );
    overlay.add_to(&map);

    c.bench_function("view_reset", |b| {
        b.iter(|| {
            map.borrow_mut().fire(ViewEvent::ViewReset);
            black_box(overlay.process_view_events())
        })
    });
}

fn bench_zoom_animation(c: &mut Criterion) {
    let map = test_map();
    let mut overlay = object_overlay(
        "plan.svg",
        GeoBounds::from_pairs([[-10.0, -10.0], [10.0, 10.0]]),
        OverlayOptions::default(),
    );
    overlay.add_to(&map);
    let target = ViewState::new(LatLng::new(1.0, 1.0), 4.0, Point::new(1920.0, 1080.0));

    c.bench_function("zoom_animation_frame", |b| {
        b.iter(|| {
            overlay.on_view_event(black_box(&ViewEvent::ZoomAnim { target }));
            overlay.on_view_event(&ViewEvent::ZoomEnd);
        })
    });
}

criterion_group!(benches, bench_view_reset, bench_zoom_animation);
criterion_main!(benches);
