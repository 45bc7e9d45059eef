//! MapHost trait definition

use std::cell::RefCell;
use std::rc::Rc;

use uuid::Uuid;

use crate::dom::Pane;
use crate::geo::{GeoMapper, ViewState};

/// Shared handle to the map an overlay is attached to
pub type MapHandle = Rc<RefCell<dyn MapHost>>;

/// Identity of a view-event subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

/// View-transform event kinds a subscriber can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewEventKind {
    ViewReset,
    Zoom,
    Move,
    ZoomAnim,
    ZoomEnd,
}

/// View-transform notification
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// The view jumped; every dependent layer must reposition
    ViewReset,
    /// Zoom level changed
    Zoom,
    /// Center moved
    Move,
    /// An animated zoom towards `target` started
    ZoomAnim { target: ViewState },
    /// An animated zoom finished
    ZoomEnd,
}

impl ViewEvent {
    pub fn kind(&self) -> ViewEventKind {
        match self {
            ViewEvent::ViewReset => ViewEventKind::ViewReset,
            ViewEvent::Zoom => ViewEventKind::Zoom,
            ViewEvent::Move => ViewEventKind::Move,
            ViewEvent::ZoomAnim { .. } => ViewEventKind::ZoomAnim,
            ViewEvent::ZoomEnd => ViewEventKind::ZoomEnd,
        }
    }
}

/// Trait for maps that can host overlays
pub trait MapHost {
    /// Current view state
    fn view(&self) -> ViewState;

    /// Geo-to-screen mapper for this map
    fn mapper(&self) -> &dyn GeoMapper;

    /// Whether this map animates zoom transitions
    fn zoom_animated(&self) -> bool;

    /// Pane with the given name, created on first use
    fn pane_mut(&mut self, name: &str) -> &mut Pane;

    /// Start queueing events of the given kinds for a new subscriber
    fn subscribe(&mut self, kinds: &[ViewEventKind]) -> SubscriptionId;

    /// Drop a subscription and any events still queued for it.
    /// Returns false if the subscription was unknown.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;

    /// Take every event queued for `id`, oldest first
    fn drain_events(&mut self, id: SubscriptionId) -> Vec<ViewEvent>;
}
