//! Hosting-map seam
//!
//! This module provides:
//! - `MapHost` trait for the map an overlay attaches to
//! - `ViewEvent` notifications delivered through per-subscriber mailboxes
//! - `HeadlessMap`, an in-memory host with a planar mapper

mod headless;
mod host;

pub use headless::{HeadlessMap, PlanarMapper};
pub use host::{MapHandle, MapHost, SubscriptionId, ViewEvent, ViewEventKind};
