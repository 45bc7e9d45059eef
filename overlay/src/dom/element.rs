//! Embeddable element and its native listener registry

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::Point;

/// Stable identity of an element inside a pane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of embeddable element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// `<object>`: generic embedded resource (SVG documents, etc.)
    Object,
    /// `<img>`: raster or vector image
    Image,
}

impl ElementKind {
    pub fn tag_name(&self) -> &'static str {
        match self {
            ElementKind::Object => "object",
            ElementKind::Image => "img",
        }
    }

    /// Native attribute holding the resource address
    pub fn address_attribute(&self) -> &'static str {
        match self {
            ElementKind::Object => "data",
            ElementKind::Image => "src",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

/// Native signal kinds an element can deliver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeEventKind {
    Load,
    Error,
    SelectStart,
    MouseMove,
}

/// Native signal as delivered by the embedding runtime
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    /// The embedded resource finished loading
    Load,
    /// The embedded resource failed; `detail` is whatever the runtime reports
    Error { detail: Option<String> },
    SelectStart,
    MouseMove,
}

impl NativeEvent {
    pub fn kind(&self) -> NativeEventKind {
        match self {
            NativeEvent::Load => NativeEventKind::Load,
            NativeEvent::Error { .. } => NativeEventKind::Error,
            NativeEvent::SelectStart => NativeEventKind::SelectStart,
            NativeEvent::MouseMove => NativeEventKind::MouseMove,
        }
    }
}

/// What a native listener does when its signal arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerAction {
    /// Swallow the signal and cancel its default behavior
    Suppress,
    /// Hand the signal to the element's owner
    Notify,
}

/// Handle returned by `Element::add_listener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone)]
struct Listener {
    id: ListenerId,
    kind: NativeEventKind,
    action: ListenerAction,
}

/// Outcome of dispatching a native signal to an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dispatch {
    /// At least one listener cancelled the default behavior
    pub suppressed: bool,
    /// At least one listener asked for the owner to be notified
    pub notify: bool,
}

/// Scale + translate applied on top of the element's position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translate: Point,
    pub scale: f64,
}

/// Inline presentation state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Style {
    /// Top-left corner in layer pixels
    pub position: Point,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub opacity: Option<f64>,
    pub z_index: Option<i32>,
    /// Present only while a zoom animation is interpolating
    pub transform: Option<Transform>,
}

/// DOM-like node for an embedded resource
#[derive(Debug, Clone)]
pub struct Element {
    id: ElementId,
    kind: ElementKind,
    attributes: IndexMap<String, String>,
    classes: IndexSet<String>,
    style: Style,
    listeners: Vec<Listener>,
    next_listener: u64,
}

impl Element {
    /// Create an empty element of the given kind
    pub fn create(kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(),
            kind,
            attributes: IndexMap::new(),
            classes: IndexSet::new(),
            style: Style::default(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Set a native attribute; an empty value is stored, not omitted
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    /// Attributes in the order they were first written
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Current resource address, read from the kind's address attribute
    pub fn resource_address(&self) -> Option<&str> {
        self.attribute(self.kind.address_attribute())
    }

    pub fn add_class(&mut self, class: &str) {
        if !class.is_empty() {
            self.classes.insert(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) -> bool {
        self.classes.shift_remove(class)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    /// Register a native listener; keep the id to remove it later
    pub fn add_listener(&mut self, kind: NativeEventKind, action: ListenerAction) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(Listener { id, kind, action });
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Run the listeners registered for `event` and report what they asked for
    pub fn dispatch(&self, event: &NativeEvent) -> Dispatch {
        let kind = event.kind();
        self.listeners
            .iter()
            .filter(|l| l.kind == kind)
            .fold(Dispatch::default(), |mut outcome, l| {
                match l.action {
                    ListenerAction::Suppress => outcome.suppressed = true,
                    ListenerAction::Notify => outcome.notify = true,
                }
                outcome
            })
    }
}
