//! DOM-like node model
//!
//! A minimal stand-in for the document the overlay lives in:
//! - `Element` carries a tag kind, native attributes, classes, inline style
//!   and scoped native-event listeners
//! - `Pane` is an ordered container of element ids owned by the map

mod element;
mod pane;

pub use element::{
    Dispatch, Element, ElementId, ElementKind, ListenerAction, ListenerId, NativeEvent,
    NativeEventKind, Style, Transform,
};
pub use pane::Pane;
