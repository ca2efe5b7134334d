// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router implementation.
//!
//! ## Overview
//!
//! Turns raw window input into scene events and keeps one occupant per interaction role.
//! Every entry point dispatches from the root node; the claimant of the dispatched event
//! drives the role transitions.
//!
//! ## Roles
//!
//! - Hovered: claimant of the latest `Hover`. Transitions fire `Leave` then `Enter`.
//! - Dragged: claimant of a primary press. Transitions fire `DragEnd` then `DragStart`.
//! - Drag-hovered: claimant of the latest `DragHover` while dragging. Transitions fire
//!   `DragLeave` then `DragEnter`, carrying the dragged node as origin.
//! - Selected: claimant of a primary press. Transitions fire `Deselect` then `Select`.
//! - Last clicked: the press remembered by the double-click detector.
//!
//! All transition notifications are direct: they reach one node and are not re-dispatched
//! through the tree.
//!
//! ## Finalization
//!
//! Nodes leaving the scene are queued by the scene itself. Each entry point drains that
//! queue first ([`EventRouter::sync`]), clearing every slot that refers to a departed node
//! without notifying it. Because ids are generational, a slot that has not been synced yet
//! still never reaches an unrelated node.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use kurbo::{Point, Vec2};
use tracing::{debug, trace};
use trellis_scene::{
    Canvas, Event, EventKind, InputAction, KeyInput, Modifiers, MouseButton, NodeId, Scene,
};

use crate::config::RouterConfig;
use crate::roles::{RoleEvent, RoleSlot};

/// Input router for one scene root.
///
/// ## Usage
///
/// - Construct with [`EventRouter::new`] or [`EventRouter::with_config`].
/// - Forward window input to the `handle_*` entry points. Each returns true if some node
///   claimed the dispatched event.
/// - Once per frame call [`EventRouter::poll_held_keys`] for key repeat and
///   [`EventRouter::step`] (or [`Scene::step`] followed by [`EventRouter::sync`]).
#[derive(Clone, Debug)]
pub struct EventRouter {
    root: NodeId,
    config: RouterConfig,
    pointer: Point,
    hovered: RoleSlot<NodeId>,
    dragged: RoleSlot<NodeId>,
    drag_button: MouseButton,
    drag_hovered: RoleSlot<NodeId>,
    selected: RoleSlot<NodeId>,
    last_clicked: Option<NodeId>,
    last_click_time: Option<Duration>,
    held_keys: BTreeMap<i32, KeyInput>,
}

impl EventRouter {
    /// Create a router dispatching from `root` with default policies.
    pub fn new(root: NodeId) -> Self {
        Self::with_config(root, RouterConfig::default())
    }

    /// Create a router dispatching from `root` with explicit policies.
    pub fn with_config(root: NodeId, config: RouterConfig) -> Self {
        Self {
            root,
            config,
            pointer: Point::ZERO,
            hovered: RoleSlot::new(),
            dragged: RoleSlot::new(),
            drag_button: MouseButton::Primary,
            drag_hovered: RoleSlot::new(),
            selected: RoleSlot::new(),
            last_clicked: None,
            last_click_time: None,
            held_keys: BTreeMap::new(),
        }
    }

    /// Node every dispatch starts from.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Current policies.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Set the maximum time between presses for a double click.
    pub fn set_double_click_window(&mut self, window: Duration) {
        self.config.double_click_window = window;
    }

    /// Enable or disable synthesized key repeat in [`EventRouter::poll_held_keys`].
    pub fn set_synthesize_key_repeat(&mut self, enabled: bool) {
        self.config.synthesize_key_repeat = enabled;
    }

    /// Last pointer position, in root space.
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Hovered node.
    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered.get()
    }

    /// Dragged node.
    pub fn dragged(&self) -> Option<NodeId> {
        self.dragged.get()
    }

    /// Button that started the current drag.
    pub fn drag_button(&self) -> Option<MouseButton> {
        self.dragged.get().map(|_| self.drag_button)
    }

    /// Node the current drag is over.
    pub fn drag_hovered(&self) -> Option<NodeId> {
        self.drag_hovered.get()
    }

    /// Selected node.
    pub fn selected(&self) -> Option<NodeId> {
        self.selected.get()
    }

    /// Node of the press remembered by the double-click detector.
    pub fn last_clicked(&self) -> Option<NodeId> {
        self.last_clicked
    }

    /// Keys currently held, ordered by key code.
    pub fn held_keys(&self) -> impl Iterator<Item = &KeyInput> + '_ {
        self.held_keys.values()
    }

    // --- role setters ---

    /// Make `node` the hovered node, firing `Leave` on the old occupant and `Enter` on the new.
    pub fn set_hovered(&mut self, scene: &mut Scene, node: Option<NodeId>) {
        let transitions = self.hovered.update(node);
        if !transitions.is_empty() {
            debug!(?node, "hovered changed");
        }
        for t in transitions {
            match t {
                RoleEvent::Leave(n) => scene.notify(n, EventKind::Leave),
                RoleEvent::Enter(n) => scene.notify(n, EventKind::Enter),
            };
        }
    }

    /// Make `node` the dragged node, firing `DragEnd` on the old occupant and `DragStart`
    /// on the new.
    pub fn set_dragged(&mut self, scene: &mut Scene, node: Option<NodeId>, button: MouseButton) {
        let old_button = self.drag_button;
        let transitions = self.dragged.update(node);
        if transitions.is_empty() {
            return;
        }
        self.drag_button = button;
        debug!(?node, ?button, "dragged changed");
        for t in transitions {
            match t {
                RoleEvent::Leave(n) => scene.notify(n, EventKind::DragEnd { button: old_button }),
                RoleEvent::Enter(n) => scene.notify(n, EventKind::DragStart { button }),
            };
        }
    }

    /// Make `node` the drag-hovered node, firing `DragLeave` / `DragEnter` with the dragged
    /// node as origin.
    ///
    /// Without a dragged node the slot changes silently, since there is no origin to report.
    pub fn set_drag_hovered(&mut self, scene: &mut Scene, node: Option<NodeId>) {
        let transitions = self.drag_hovered.update(node);
        let Some(origin) = self.dragged.get() else {
            return;
        };
        if !transitions.is_empty() {
            debug!(?node, ?origin, "drag hovered changed");
        }
        let button = self.drag_button;
        for t in transitions {
            match t {
                RoleEvent::Leave(n) => scene.notify(n, EventKind::DragLeave { button, origin }),
                RoleEvent::Enter(n) => scene.notify(n, EventKind::DragEnter { button, origin }),
            };
        }
    }

    /// Make `node` the selected node, firing `Deselect` on the old occupant and `Select` on
    /// the new.
    pub fn set_selected(&mut self, scene: &mut Scene, node: Option<NodeId>) {
        let transitions = self.selected.update(node);
        if !transitions.is_empty() {
            debug!(?node, "selected changed");
        }
        for t in transitions {
            match t {
                RoleEvent::Leave(n) => scene.notify(n, EventKind::Deselect),
                RoleEvent::Enter(n) => scene.notify(n, EventKind::Select),
            };
        }
    }

    // --- input entry points ---

    /// Pointer moved to `pos` (root space) by `delta` since the previous move.
    pub fn handle_hover(&mut self, scene: &mut Scene, pos: Point, delta: Vec2) -> bool {
        self.sync(scene);
        trace!(?pos, "hover");
        self.pointer = pos;

        if let Some(origin) = self.dragged.get() {
            let button = self.drag_button;
            scene.notify(
                origin,
                EventKind::DragMove {
                    button,
                    mouse_delta: delta,
                },
            );
            let e = self.dispatch_root(
                scene,
                EventKind::DragHover {
                    pos,
                    mouse_delta: delta,
                    button,
                    origin,
                },
            );
            self.set_drag_hovered(scene, e.target());
        }

        let e = self.dispatch_root(
            scene,
            EventKind::Hover {
                pos,
                mouse_delta: delta,
            },
        );
        self.set_hovered(scene, e.target());
        e.target().is_some()
    }

    /// Pointer button edge at the last pointer position.
    ///
    /// `time` is a monotonic timestamp supplied by the caller, used for double clicks.
    pub fn handle_button(
        &mut self,
        scene: &mut Scene,
        button: MouseButton,
        action: InputAction,
        mods: Modifiers,
        time: Duration,
    ) -> bool {
        self.sync(scene);
        trace!(?button, ?action, "button");
        let e = self.dispatch_root(
            scene,
            EventKind::Button {
                pos: self.pointer,
                button,
                action,
                mods,
            },
        );
        let claimant = e.target();

        match action {
            InputAction::Press if button == MouseButton::Primary => {
                self.set_dragged(scene, claimant, button);
                self.set_selected(scene, claimant);
                self.detect_double_click(scene, claimant, time);
            }
            InputAction::Release if button == self.drag_button => {
                self.set_drag_hovered(scene, None);
                if let (Some(target), Some(origin)) = (claimant, self.dragged.get()) {
                    scene.notify(target, EventKind::DragDrop { button, origin });
                }
                // The drop handler may already have ended the drag.
                self.set_dragged(scene, None, button);
            }
            _ => {}
        }
        claimant.is_some()
    }

    /// Scroll at the last pointer position.
    pub fn handle_scroll(&mut self, scene: &mut Scene, delta: Vec2) -> bool {
        self.sync(scene);
        let e = self.dispatch_root(
            scene,
            EventKind::HoverScroll {
                pos: self.pointer,
                scroll_delta: delta,
            },
        );
        e.target().is_some()
    }

    /// Key edge. Delivered to the selected node first, then positionally under the pointer.
    pub fn handle_key(
        &mut self,
        scene: &mut Scene,
        key: i32,
        scancode: i32,
        name: Option<String>,
        action: InputAction,
        mods: Modifiers,
    ) -> bool {
        self.sync(scene);
        let input = KeyInput {
            key,
            scancode,
            name,
            action,
            mods,
        };
        match action {
            InputAction::Press => {
                self.held_keys.insert(key, input.clone());
            }
            InputAction::Release => {
                self.held_keys.remove(&key);
            }
            InputAction::Repeat => {}
        }
        self.route_key(scene, input)
    }

    /// Text input. Delivered to the selected node first, then positionally under the pointer.
    pub fn handle_text(&mut self, scene: &mut Scene, codepoint: char) -> bool {
        self.sync(scene);
        if let Some(selected) = self.selected.get() {
            let e = scene.notify(selected, EventKind::SelectText { codepoint });
            if e.target().is_some() {
                return true;
            }
        }
        let e = self.dispatch_root(
            scene,
            EventKind::HoverText {
                pos: self.pointer,
                codepoint,
            },
        );
        e.target().is_some()
    }

    /// Paths dropped onto the window at the last pointer position.
    pub fn handle_drop(&mut self, scene: &mut Scene, paths: Vec<String>) -> bool {
        self.sync(scene);
        let e = self.dispatch_root(
            scene,
            EventKind::PathDrop {
                pos: self.pointer,
                paths,
            },
        );
        e.target().is_some()
    }

    /// The pointer left the window.
    ///
    /// Held keys are forgotten. Hover and drag are kept, since the pointer may come back
    /// mid-drag.
    pub fn handle_leave(&mut self, scene: &mut Scene) {
        self.sync(scene);
        debug!(held = self.held_keys.len(), "pointer left window");
        self.held_keys.clear();
    }

    /// Broadcast `Dirty` from the root, e.g. after a pixel ratio change.
    pub fn handle_dirty(&mut self, scene: &mut Scene) {
        self.sync(scene);
        scene.notify(self.root, EventKind::Dirty);
    }

    /// Broadcast `ContextCreate` from the root.
    pub fn handle_context_create(&mut self, scene: &mut Scene) {
        self.sync(scene);
        scene.notify(self.root, EventKind::ContextCreate);
    }

    /// Broadcast `ContextDestroy` from the root.
    pub fn handle_context_destroy(&mut self, scene: &mut Scene) {
        self.sync(scene);
        scene.notify(self.root, EventKind::ContextDestroy);
    }

    /// Synthesize one repeat key event per held key. Call once per frame.
    pub fn poll_held_keys(&mut self, scene: &mut Scene) {
        self.sync(scene);
        if !self.config.synthesize_key_repeat {
            return;
        }
        let repeats: Vec<KeyInput> = self
            .held_keys
            .values()
            .map(|k| KeyInput {
                action: InputAction::Repeat,
                ..k.clone()
            })
            .collect();
        for input in repeats {
            self.route_key(scene, input);
        }
    }

    // --- lifecycle ---

    /// Clear every slot that refers to `id`, without notifying it.
    pub fn finalize(&mut self, id: NodeId) {
        let mut cleared = self.hovered.forget(id);
        cleared |= self.dragged.forget(id);
        cleared |= self.drag_hovered.forget(id);
        cleared |= self.selected.forget(id);
        if self.last_clicked == Some(id) {
            self.last_clicked = None;
            cleared = true;
        }
        if cleared {
            debug!(?id, "finalized role references");
        }
    }

    /// Finalize every node the scene has queued since the last sync.
    pub fn sync(&mut self, scene: &mut Scene) {
        for id in scene.take_finalized() {
            self.finalize(id);
        }
    }

    /// Run the scene's update pass, then sync.
    pub fn step(&mut self, scene: &mut Scene, canvas: &mut dyn Canvas) {
        scene.step(self.root, canvas);
        self.sync(scene);
    }

    // --- internals ---

    fn dispatch_root(&self, scene: &mut Scene, kind: EventKind) -> Event {
        scene.notify(self.root, kind)
    }

    fn route_key(&mut self, scene: &mut Scene, key: KeyInput) -> bool {
        if let Some(selected) = self.selected.get() {
            let e = scene.notify(selected, EventKind::SelectKey { key: key.clone() });
            if e.target().is_some() {
                return true;
            }
        }
        let e = self.dispatch_root(
            scene,
            EventKind::HoverKey {
                pos: self.pointer,
                key,
            },
        );
        e.target().is_some()
    }

    fn detect_double_click(&mut self, scene: &mut Scene, claimant: Option<NodeId>, time: Duration) {
        let window = self.config.double_click_window;
        let within = self
            .last_click_time
            .and_then(|last| time.checked_sub(last))
            .is_some_and(|dt| dt <= window);
        if let Some(target) = claimant
            && within
            && self.last_clicked == claimant
        {
            // Reset so a third press starts a fresh window.
            self.last_clicked = None;
            self.last_click_time = None;
            debug!(?target, "double click");
            scene.notify(target, EventKind::DoubleClick);
        } else {
            self.last_clicked = claimant;
            self.last_click_time = Some(time);
        }
    }
}
