// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Scene: a Kurbo-native retained scene graph for patching-style UIs.
//!
//! A [`Scene`] is a generational arena of nodes. Each node has a box in its parent's
//! space, a visibility flag, an ordered list of children, and a boxed [`Widget`] that
//! supplies its behavior.
//!
//! - Children are ordered bottom to top: the last child added is the topmost.
//! - Positional events ([`Propagation::Positional`]) reach the topmost visible child
//!   containing the point, in that child's local coordinates, and stop at the first claim.
//! - Broadcast events visit every child; direct events reach only the addressed node.
//! - Drawing visits visible children bottom first, culled against the clip box, in any
//!   number of layers.
//! - Deletion is deferred: handlers tombstone a node with [`Scene::request_delete`] and its
//!   parent destroys it during the next [`Scene::step`].
//!
//! ## Where this fits
//!
//! - Scene: structure, geometry, dispatch and drawing (this crate).
//! - Router: turns raw window input into scene events and tracks hover, drag and
//!   selection (`trellis_router`).
//! - Cache: a widget that renders its subtree to an offscreen image (`trellis_cache`).
//!
//! Graphics go through the [`Canvas`] trait; [`RecordingCanvas`] is a headless backend
//! used by tests.
//!
//! ## Minimal usage
//!
//! ```
//! use trellis_scene::{Container, Event, EventKind, Scene};
//! use kurbo::{Point, Rect, Vec2};
//!
//! let mut scene = Scene::new();
//! let root = scene.insert(Container, Rect::new(0.0, 0.0, 200.0, 200.0));
//! let a = scene.insert(Container, Rect::new(10.0, 10.0, 60.0, 60.0));
//! let b = scene.insert(Container, Rect::new(40.0, 40.0, 120.0, 120.0));
//! scene.add_child(root, a).unwrap();
//! scene.add_child(root, b).unwrap();
//!
//! // `b` was added last, so it is on top.
//! assert_eq!(scene.children_of(root), &[a, b]);
//!
//! let mut hover = Event::new(EventKind::Hover {
//!     pos: Point::new(50.0, 50.0),
//!     mouse_delta: Vec2::ZERO,
//! });
//! scene.dispatch(root, &mut hover);
//! // Plain containers never claim.
//! assert_eq!(hover.target(), None);
//!
//! assert_eq!(
//!     scene.absolute_offset(b, Point::new(1.0, 1.0), None),
//!     Some(Point::new(41.0, 41.0))
//! );
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod canvas;
mod error;
mod event;
mod scene;
mod types;
mod widget;

pub use canvas::{Canvas, CanvasError, CanvasOp, ImageId, RecordingCanvas, Rgba};
pub use error::{RejectedState, SceneError};
pub use event::{Event, EventKind, InputAction, KeyInput, Modifiers, MouseButton, Propagation};
pub use scene::{EMPTY_BOUNDS, Scene};
pub use types::{NodeFlags, NodeId};
pub use widget::{Container, DrawCx, EventCx, StepCx, Widget};
