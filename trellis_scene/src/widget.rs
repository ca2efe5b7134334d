// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node behavior and the contexts handed to it.
//!
//! A node's behavior is a boxed [`Widget`]. Every hook has a default that recurses into
//! the children, so a plain container is just `impl Widget for Container {}`.
//!
//! While a hook runs, the widget is taken out of the arena, so the context can hand out
//! `&mut Scene` and the handler may restructure the tree freely. Destruction is still
//! deferred: use [`EventCx::request_delete`] (or [`Scene::request_delete`]) from inside
//! a handler rather than destroying nodes mid-traversal.

use alloc::vec::Vec;
use core::any::Any;

use kurbo::Rect;

use crate::canvas::Canvas;
use crate::error::RejectedState;
use crate::event::Event;
use crate::scene::Scene;
use crate::types::NodeId;

/// Behavior attached to a scene node.
pub trait Widget: Any {
    /// Handle an event addressed to this node.
    ///
    /// The default forwards positional and broadcast kinds to the children
    /// (see [`EventCx::recurse`]). Claim an event with [`Event::consume`].
    fn on_event(&mut self, cx: &mut EventCx<'_>, event: &mut Event) {
        cx.recurse(event);
    }

    /// Per-frame update. The default steps the children.
    fn step(&mut self, cx: &mut StepCx<'_>) {
        cx.step_children();
    }

    /// Draw the node at layer 0. The default draws the visible children.
    fn draw(&mut self, cx: &mut DrawCx<'_>) {
        cx.draw_children();
    }

    /// Draw an extra pass over the node. Overrides must filter by `layer` themselves.
    fn draw_layer(&mut self, cx: &mut DrawCx<'_>, layer: i32) {
        cx.draw_children_layer(layer);
    }

    /// Zoom factor this node applies to its descendants.
    fn zoom(&self) -> f64 {
        1.0
    }

    /// Serialize an opaque state blob, if the widget persists anything.
    fn save_state(&self) -> Option<Vec<u8>> {
        None
    }

    /// Restore a blob produced by [`Widget::save_state`].
    fn load_state(&mut self, _state: &[u8]) -> Result<(), RejectedState> {
        Ok(())
    }

    /// Free backend resources. Called once, after the node has been destroyed.
    fn release(&mut self, _canvas: &mut dyn Canvas) {}
}

/// A node with no behavior of its own.
#[derive(Clone, Copy, Debug, Default)]
pub struct Container;

impl Widget for Container {}

/// Context for [`Widget::on_event`].
pub struct EventCx<'a> {
    pub(crate) scene: &'a mut Scene,
    pub(crate) id: NodeId,
    pub(crate) zoom: f64,
}

impl core::fmt::Debug for EventCx<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventCx")
            .field("id", &self.id)
            .field("zoom", &self.zoom)
            .finish_non_exhaustive()
    }
}

impl EventCx<'_> {
    /// The node receiving the event.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The node's box in its parent's space.
    pub fn rect(&self) -> Rect {
        self.scene.rect(self.id).unwrap_or(Rect::ZERO)
    }

    /// The scene.
    pub fn scene(&mut self) -> &mut Scene {
        self.scene
    }

    /// Forward the event to the children according to its propagation class.
    pub fn recurse(&mut self, event: &mut Event) {
        self.scene.recurse_event(self.id, self.zoom, event);
    }

    /// Ask the parent to destroy this node on its next step.
    pub fn request_delete(&mut self) {
        self.scene.request_delete(self.id);
    }
}

/// Context for [`Widget::step`].
pub struct StepCx<'a> {
    pub(crate) scene: &'a mut Scene,
    pub(crate) canvas: &'a mut dyn Canvas,
    pub(crate) id: NodeId,
}

impl core::fmt::Debug for StepCx<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StepCx")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl StepCx<'_> {
    /// The node being stepped.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The node's box in its parent's space.
    pub fn rect(&self) -> Rect {
        self.scene.rect(self.id).unwrap_or(Rect::ZERO)
    }

    /// The scene.
    pub fn scene(&mut self) -> &mut Scene {
        self.scene
    }

    /// The graphics backend.
    pub fn canvas(&mut self) -> &mut dyn Canvas {
        self.canvas
    }

    /// Delete tombstoned children, then step the rest.
    pub fn step_children(&mut self) {
        self.scene.step_children(self.id, self.canvas);
    }

    /// Draw the children (layer 0) into whatever target the canvas has bound.
    ///
    /// `clip` is in this node's local space. Nested caches draw directly while this runs.
    pub fn draw_children_offscreen(&mut self, clip: Rect) {
        self.scene
            .draw_children(self.id, self.canvas, clip, 0, true, 1.0);
    }

    /// Offscreen renders performed so far in the current step.
    pub fn offscreen_renders(&self) -> u32 {
        self.scene.frame_renders
    }

    /// Record one offscreen render against the current step.
    pub fn note_offscreen_render(&mut self) {
        self.scene.frame_renders += 1;
    }
}

/// Context for [`Widget::draw`] and [`Widget::draw_layer`].
pub struct DrawCx<'a> {
    pub(crate) scene: &'a mut Scene,
    pub(crate) canvas: &'a mut dyn Canvas,
    pub(crate) id: NodeId,
    pub(crate) clip: Rect,
    pub(crate) offscreen: bool,
    pub(crate) zoom: f64,
}

impl core::fmt::Debug for DrawCx<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DrawCx")
            .field("id", &self.id)
            .field("clip", &self.clip)
            .field("offscreen", &self.offscreen)
            .finish_non_exhaustive()
    }
}

impl DrawCx<'_> {
    /// The node being drawn.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The node's box in its parent's space.
    pub fn rect(&self) -> Rect {
        self.scene.rect(self.id).unwrap_or(Rect::ZERO)
    }

    /// Visible region in this node's local space.
    pub fn clip_box(&self) -> Rect {
        self.clip
    }

    /// True while drawing into an offscreen image.
    pub fn in_offscreen(&self) -> bool {
        self.offscreen
    }

    /// The graphics backend.
    pub fn canvas(&mut self) -> &mut dyn Canvas {
        self.canvas
    }

    /// The scene.
    pub fn scene(&mut self) -> &mut Scene {
        self.scene
    }

    /// Draw the visible children at layer 0, bottom first.
    pub fn draw_children(&mut self) {
        self.draw_children_layer(0);
    }

    /// Draw the visible children at `layer`, bottom first.
    pub fn draw_children_layer(&mut self, layer: i32) {
        self.scene.draw_children(
            self.id,
            self.canvas,
            self.clip,
            layer,
            self.offscreen,
            self.zoom,
        );
    }
}
