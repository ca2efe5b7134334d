// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Router: a deterministic, `no_std` input router for Trellis scenes.
//!
//! ## Overview
//!
//! [`EventRouter`] is an explicit context object owned by the embedding application. It
//! turns raw window input (pointer moves, button and key edges, text, scroll, dropped
//! paths) into [`trellis_scene::Event`]s dispatched from a root node, and keeps exactly one
//! occupant per interaction role: hovered, dragged, drag-hovered, selected, and the last
//! click remembered for double-click detection.
//!
//! ## Transitions
//!
//! Role changes are computed by [`roles::RoleSlot`] and delivered as direct notifications:
//! the old occupant is told first (`Leave`, `DragEnd`, `DragLeave`, `Deselect`), then the new
//! one (`Enter`, `DragStart`, `DragEnter`, `Select`). Updating a role with its current
//! occupant fires nothing.
//!
//! ## Policies
//!
//! - Only the primary button drags and selects.
//! - A release of the drag button always tears the drag down, claimed or not.
//! - Two primary presses on the same node within [`RouterConfig::double_click_window`]
//!   (0.3 s by default) fire `DoubleClick`, after which the detector is reset.
//! - Keys and text go to the selected node first, then to whatever is under the pointer.
//!
//! ## Minimal example
//!
//! ```
//! use core::time::Duration;
//! use kurbo::{Point, Rect, Vec2};
//! use trellis_router::EventRouter;
//! use trellis_scene::{Container, InputAction, Modifiers, MouseButton, Scene};
//!
//! let mut scene = Scene::new();
//! let root = scene.insert(Container, Rect::new(0.0, 0.0, 100.0, 100.0));
//! let mut router = EventRouter::new(root);
//!
//! router.handle_hover(&mut scene, Point::new(10.0, 10.0), Vec2::ZERO);
//! let claimed = router.handle_button(
//!     &mut scene,
//!     MouseButton::Primary,
//!     InputAction::Press,
//!     Modifiers::empty(),
//!     Duration::ZERO,
//! );
//! // Nothing in this scene claims input.
//! assert!(!claimed);
//! assert_eq!(router.selected(), None);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod router;
pub mod roles;

pub use config::{DEFAULT_DOUBLE_CLICK_WINDOW, RouterConfig};
pub use router::EventRouter;
