//! Public overlay events

use std::fmt;

use thiserror::Error;

use crate::dom::ElementKind;

/// Failure payload carried by the `error` event, shared by every element kind
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Failed to load {kind} resource '{address}'{}", DetailSuffix(.detail))]
pub struct LoadFailure {
    pub kind: ElementKind,
    pub address: String,
    /// Reason reported by the embedding runtime, if any
    pub detail: Option<String>,
}

struct DetailSuffix<'a>(&'a Option<String>);

impl fmt::Display for DetailSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(detail) => write!(f, ": {}", detail),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayEventKind {
    Load,
    Error,
}

/// Event emitted to the hosting application
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEvent {
    /// The embedded resource finished loading
    Load { address: String },
    /// The embedded resource failed to load
    Error(LoadFailure),
}

impl OverlayEvent {
    pub fn kind(&self) -> OverlayEventKind {
        match self {
            OverlayEvent::Load { .. } => OverlayEventKind::Load,
            OverlayEvent::Error(_) => OverlayEventKind::Error,
        }
    }
}

/// Handle returned by `OverlayEvents::on`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventListenerId(u64);

type Callback = Box<dyn FnMut(&OverlayEvent)>;

/// Listener registry for overlay events
#[derive(Default)]
pub struct OverlayEvents {
    listeners: Vec<(EventListenerId, OverlayEventKind, Callback)>,
    next_id: u64,
}

impl OverlayEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(
        &mut self,
        kind: OverlayEventKind,
        callback: impl FnMut(&OverlayEvent) + 'static,
    ) -> EventListenerId {
        let id = EventListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, kind, Box::new(callback)));
        id
    }

    pub fn off(&mut self, id: EventListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _, _)| *listener != id);
        self.listeners.len() != before
    }

    /// Call every listener registered for the event's kind.
    /// Returns how many were called.
    pub fn fire(&mut self, event: &OverlayEvent) -> usize {
        let kind = event.kind();
        let mut called = 0;
        for (_, listener_kind, callback) in self.listeners.iter_mut() {
            if *listener_kind == kind {
                callback(event);
                called += 1;
            }
        }
        called
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for OverlayEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayEvents")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
