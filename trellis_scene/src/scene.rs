// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene implementation: structure, geometry, dispatch, drawing, and the update pass.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use kurbo::{Point, Rect, Size};
use tracing::{debug, trace};

use crate::canvas::Canvas;
use crate::error::SceneError;
use crate::event::{Event, EventKind, Propagation};
use crate::types::{NodeFlags, NodeId};
use crate::widget::{DrawCx, EventCx, StepCx, Widget};

/// Bounding box of an empty set of children.
///
/// It has negative-infinite size, so it is distinguishable from the box of a single
/// zero-sized child, and it is the identity for [`Rect::union`].
pub const EMPTY_BOUNDS: Rect = Rect::new(
    f64::INFINITY,
    f64::INFINITY,
    f64::NEG_INFINITY,
    f64::NEG_INFINITY,
);

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Retained tree of widget nodes.
///
/// Parents exclusively own their children; children keep a non-owning back-reference
/// that is only used for upward queries.
pub struct Scene {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    // Nodes that left the tree and must be dropped from router role slots. Grows until
    // drained by `take_finalized`.
    finalized: Vec<NodeId>,
    // Behaviors of destroyed nodes, waiting for a canvas to release resources.
    released: Vec<Box<dyn Widget>>,
    pub(crate) frame_renders: u32,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Scene")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .field("pending_finalize", &self.finalized.len())
            .field("pending_release", &self.released.len())
            .finish_non_exhaustive()
    }
}

struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    rect: Rect,
    flags: NodeFlags,
    // Last zoom reported by the widget; read while the widget is checked out.
    zoom: f64,
    widget: Option<Box<dyn Widget>>,
}

impl Node {
    fn new(generation: u32, rect: Rect, widget: Box<dyn Widget>) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            rect,
            flags: NodeFlags::default(),
            zoom: widget.zoom(),
            widget: Some(widget),
        }
    }

    fn zoom(&self) -> f64 {
        self.widget.as_ref().map_or(self.zoom, |w| w.zoom())
    }

    fn is_visible(&self) -> bool {
        self.flags.contains(NodeFlags::VISIBLE)
    }
}

#[derive(Copy, Clone, Debug)]
enum Placement {
    Top,
    Bottom,
    Below(NodeId),
    After(NodeId),
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            finalized: Vec::new(),
            released: Vec::new(),
            frame_renders: 0,
        }
    }

    /// Insert a detached node. Attach it with one of the `add_child` variants.
    pub fn insert(&mut self, widget: impl Widget, rect: Rect) -> NodeId {
        self.insert_boxed(Box::new(widget), rect)
    }

    /// Insert a detached node with an already boxed behavior.
    pub fn insert_boxed(&mut self, widget: Box<dyn Widget>, rect: Rect) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx] + 1;
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, rect, widget));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, rect, widget)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// True if the scene has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// See [`NodeId`] docs for the generational semantics.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Parent of `id`, or `None` for a root, a detached node, or a stale id.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.parent
    }

    /// Children of `id`, bottom first. Empty for a stale id.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Box of `id` in its parent's space.
    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        Some(self.node_opt(id)?.rect)
    }

    /// Position of `id` in its parent's space.
    pub fn position(&self, id: NodeId) -> Option<Point> {
        Some(self.node_opt(id)?.rect.origin())
    }

    /// Size of `id`.
    pub fn size(&self, id: NodeId) -> Option<Size> {
        Some(self.node_opt(id)?.rect.size())
    }

    /// Flags of `id`.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        Some(self.node_opt(id)?.flags)
    }

    /// True if `id` is live and visible.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some_and(Node::is_visible)
    }

    /// True if `id` is waiting to be destroyed by its parent.
    pub fn is_delete_requested(&self, id: NodeId) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.flags.contains(NodeFlags::DELETE_REQUESTED))
    }

    /// Borrow the behavior of `id` as a concrete widget type.
    ///
    /// Returns `None` for a stale id, a type mismatch, or while the widget's own hook is running.
    pub fn widget<W: Widget>(&self, id: NodeId) -> Option<&W> {
        let widget: &dyn Widget = self.node_opt(id)?.widget.as_deref()?;
        (widget as &dyn Any).downcast_ref::<W>()
    }

    /// Mutably borrow the behavior of `id` as a concrete widget type.
    pub fn widget_mut<W: Widget>(&mut self, id: NodeId) -> Option<&mut W> {
        let widget: &mut dyn Widget = self.node_opt_mut(id)?.widget.as_deref_mut()?;
        (widget as &mut dyn Any).downcast_mut::<W>()
    }

    // --- structure ---

    /// Attach a detached node as the topmost child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.attach(parent, child, Placement::Top)
    }

    /// Attach a detached node as the bottommost child of `parent`.
    pub fn add_child_bottom(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.attach(parent, child, Placement::Bottom)
    }

    /// Attach a detached node directly below `sibling`.
    pub fn add_child_below(
        &mut self,
        parent: NodeId,
        child: NodeId,
        sibling: NodeId,
    ) -> Result<(), SceneError> {
        self.attach(parent, child, Placement::Below(sibling))
    }

    /// Attach a detached node directly above `sibling`.
    pub fn add_child_after(
        &mut self,
        parent: NodeId,
        child: NodeId,
        sibling: NodeId,
    ) -> Result<(), SceneError> {
        self.attach(parent, child, Placement::After(sibling))
    }

    /// Detach `child` from `parent` and hand it back, still alive, to the caller.
    ///
    /// Fires [`EventKind::Remove`] on the child and queues the subtree for finalization.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, SceneError> {
        self.check_child(parent, child)?;
        self.notify(child, EventKind::Remove);
        self.queue_finalize_subtree(child);
        self.unlink(parent, child);
        debug!(?parent, ?child, "removed child");
        Ok(child)
    }

    /// Destroy every child of `parent`, firing [`EventKind::Remove`] on each first.
    pub fn clear_children(&mut self, parent: NodeId) -> Result<(), SceneError> {
        if !self.is_alive(parent) {
            return Err(SceneError::Stale(parent));
        }
        let children = self.children_of(parent).to_vec();
        for child in children {
            if !self.is_alive(child) {
                continue;
            }
            self.notify(child, EventKind::Remove);
            self.queue_finalize_subtree(child);
            self.unlink(parent, child);
            self.destroy_subtree(child);
        }
        debug!(?parent, "cleared children");
        Ok(())
    }

    /// Destroy a node and its subtree immediately.
    ///
    /// Meant for tearing down roots and detached nodes outside any traversal. Inside
    /// handlers use [`Scene::request_delete`].
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.parent_of(id) {
            self.notify(id, EventKind::Remove);
            self.unlink(parent, id);
        }
        self.queue_finalize_subtree(id);
        self.destroy_subtree(id);
    }

    /// Mark `id` for destruction by its parent on the next [`Scene::step`].
    pub fn request_delete(&mut self, id: NodeId) {
        if let Some(node) = self.node_opt_mut(id) {
            node.flags.insert(NodeFlags::DELETE_REQUESTED);
            trace!(?id, "delete requested");
        }
    }

    /// Drain the nodes that left the tree since the last call.
    ///
    /// The router consumes this to clear role slots that refer to them. The queue grows
    /// with every removal until drained, so a scene driven without a router must call
    /// this (and may discard the result) once per frame.
    pub fn take_finalized(&mut self) -> Vec<NodeId> {
        core::mem::take(&mut self.finalized)
    }

    /// Hand the behaviors of destroyed nodes their [`Widget::release`] hook.
    pub fn release_pending(&mut self, canvas: &mut dyn Canvas) {
        for mut widget in core::mem::take(&mut self.released) {
            widget.release(canvas);
        }
    }

    // --- geometry ---

    /// Move `id`. Fires [`EventKind::Reposition`] only if the position changed.
    pub fn set_position(&mut self, id: NodeId, pos: Point) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if node.rect.origin() == pos {
            return;
        }
        node.rect = rect_at(pos, node.rect.size());
        self.notify(id, EventKind::Reposition);
    }

    /// Resize `id`. Fires [`EventKind::Resize`] only if the size changed.
    pub fn set_size(&mut self, id: NodeId, size: Size) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if node.rect.size() == size {
            return;
        }
        node.rect = rect_at(node.rect.origin(), size);
        self.notify(id, EventKind::Resize);
    }

    /// Set position then size, each notifying only on change.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        self.set_position(id, rect.origin());
        self.set_size(id, rect.size());
    }

    /// Show or hide `id`, broadcasting [`EventKind::Show`] / [`EventKind::Hide`] on change.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if node.is_visible() == visible {
            return;
        }
        node.flags.set(NodeFlags::VISIBLE, visible);
        let kind = if visible {
            EventKind::Show
        } else {
            EventKind::Hide
        };
        self.notify(id, kind);
    }

    /// Shorthand for `set_visible(id, true)`.
    pub fn show(&mut self, id: NodeId) {
        self.set_visible(id, true);
    }

    /// Shorthand for `set_visible(id, false)`.
    pub fn hide(&mut self, id: NodeId) {
        self.set_visible(id, false);
    }

    // --- queries ---

    /// Map `point` from the local space of `id` into the space of `ancestor`.
    ///
    /// `None` maps all the way out of the root. Each node on the way applies its own
    /// zoom before its offset.
    pub fn absolute_offset(
        &self,
        id: NodeId,
        point: Point,
        ancestor: Option<NodeId>,
    ) -> Option<Point> {
        let mut v = point.to_vec2();
        let mut cur = id;
        loop {
            if Some(cur) == ancestor {
                break;
            }
            let node = self.node_opt(cur)?;
            v = v * node.zoom() + node.rect.origin().to_vec2();
            match node.parent {
                Some(p) => cur = p,
                None => break,
            }
        }
        Some(v.to_point())
    }

    /// Product of the zooms between `id` (inclusive) and `ancestor` (exclusive).
    pub fn relative_zoom(&self, id: NodeId, ancestor: Option<NodeId>) -> f64 {
        let mut zoom = 1.0;
        let mut cur = Some(id);
        while let Some(c) = cur {
            if Some(c) == ancestor {
                break;
            }
            let Some(node) = self.node_opt(c) else {
                break;
            };
            zoom *= node.zoom();
            cur = node.parent;
        }
        zoom
    }

    /// Clamp `rect`, in the local space of `id`, to the region visible through every ancestor.
    pub fn viewport(&self, id: NodeId, rect: Rect) -> Option<Rect> {
        let mut chain = Vec::new();
        let mut cur = Some(id);
        while let Some(c) = cur {
            let node = self.node_opt(c)?;
            chain.push(node);
            cur = node.parent;
        }
        let mut bound: Option<Rect> = None;
        for node in chain.iter().rev() {
            let outer = match bound {
                Some(b) => clamp_rect(node.rect, b),
                None => node.rect,
            };
            let local = outer - node.rect.origin().to_vec2();
            bound = Some(local.scale_from_origin(1.0 / node.zoom()));
        }
        bound.map(|b| clamp_rect(rect, b))
    }

    /// True if `ancestor` is a strict ancestor of `id`.
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut cur = self.parent_of(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.parent_of(c);
        }
        false
    }

    /// Nearest strict ancestor of `id` whose behavior is a `W`.
    pub fn ancestor_of<W: Widget>(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.parent_of(id);
        while let Some(c) = cur {
            if self.widget::<W>(c).is_some() {
                return Some(c);
            }
            cur = self.parent_of(c);
        }
        None
    }

    /// Union of the children's boxes, or [`EMPTY_BOUNDS`] when there are none.
    pub fn children_bounding_box(&self, id: NodeId) -> Rect {
        self.bounding_box(id, false)
    }

    /// Union of the visible children's boxes, or [`EMPTY_BOUNDS`] when there are none.
    pub fn visible_children_bounding_box(&self, id: NodeId) -> Rect {
        self.bounding_box(id, true)
    }

    // --- persistence ---

    /// Ask the behavior of `id` for its opaque state blob.
    pub fn save_state(&self, id: NodeId) -> Option<Vec<u8>> {
        self.node_opt(id)?.widget.as_ref()?.save_state()
    }

    /// Hand a blob produced by [`Scene::save_state`] back to the behavior of `id`.
    pub fn load_state(&mut self, id: NodeId, state: &[u8]) -> Result<(), SceneError> {
        let widget = self
            .node_opt_mut(id)
            .and_then(|n| n.widget.as_mut())
            .ok_or(SceneError::Stale(id))?;
        widget
            .load_state(state)
            .map_err(|_| SceneError::StateRejected(id))
    }

    // --- dispatch ---

    /// Deliver `event` to `id`'s behavior.
    ///
    /// Skipped for stale ids and for a node whose own hook is already running.
    pub fn dispatch(&mut self, id: NodeId, event: &mut Event) {
        let Some(mut widget) = self.take_widget(id) else {
            trace!(?id, "dispatch skipped, widget unavailable");
            return;
        };
        let zoom = widget.zoom();
        {
            let mut cx = EventCx {
                scene: self,
                id,
                zoom,
            };
            widget.on_event(&mut cx, event);
        }
        self.put_widget(id, widget);
    }

    /// Deliver a fresh event of `kind` to `id` and return it.
    pub fn notify(&mut self, id: NodeId, kind: EventKind) -> Event {
        let mut event = Event::new(kind);
        self.dispatch(id, &mut event);
        event
    }

    pub(crate) fn recurse_event(&mut self, id: NodeId, zoom: f64, event: &mut Event) {
        match event.kind().propagation() {
            Propagation::Positional => self.recurse_positional(id, zoom, event),
            Propagation::Broadcast => self.recurse_broadcast(id, event),
            Propagation::Direct => {}
        }
    }

    fn recurse_positional(&mut self, id: NodeId, zoom: f64, event: &mut Event) {
        let Some(pos) = event.pos() else {
            return;
        };
        let local = Point::new(pos.x / zoom, pos.y / zoom);
        let children = self.children_of(id).to_vec();
        // Topmost (most recently added) first.
        for &child in children.iter().rev() {
            if !event.is_propagating() {
                break;
            }
            let Some(node) = self.attached_child(id, child) else {
                continue;
            };
            if !node.is_visible() || !node.rect.contains(local) {
                continue;
            }
            let origin = node.rect.origin().to_vec2();
            event.set_pos(local - origin);
            self.dispatch(child, event);
        }
        event.set_pos(pos);
    }

    fn recurse_broadcast(&mut self, id: NodeId, event: &mut Event) {
        let children = self.children_of(id).to_vec();
        for &child in children.iter().rev() {
            if !event.is_propagating() {
                break;
            }
            if self.attached_child(id, child).is_none() {
                continue;
            }
            self.dispatch(child, event);
        }
    }

    // --- drawing ---

    /// Draw the tree under `root` at layer 0, in `root`'s local space.
    pub fn draw(&mut self, root: NodeId, canvas: &mut dyn Canvas) {
        let Some(rect) = self.rect(root) else {
            return;
        };
        let clip = rect_at(Point::ZERO, rect.size());
        self.draw_node(root, canvas, clip, 0, false);
    }

    fn draw_node(
        &mut self,
        id: NodeId,
        canvas: &mut dyn Canvas,
        clip: Rect,
        layer: i32,
        offscreen: bool,
    ) {
        let Some(mut widget) = self.take_widget(id) else {
            return;
        };
        let zoom = widget.zoom();
        {
            let mut cx = DrawCx {
                scene: self,
                canvas,
                id,
                clip,
                offscreen,
                zoom,
            };
            if layer == 0 {
                widget.draw(&mut cx);
            } else {
                widget.draw_layer(&mut cx, layer);
            }
        }
        self.put_widget(id, widget);
    }

    pub(crate) fn draw_children(
        &mut self,
        id: NodeId,
        canvas: &mut dyn Canvas,
        clip: Rect,
        layer: i32,
        offscreen: bool,
        zoom: f64,
    ) {
        let children = self.children_of(id).to_vec();
        let zoomed = zoom != 1.0;
        let clip = if zoomed {
            canvas.save();
            canvas.scale(zoom, zoom);
            clip.scale_from_origin(1.0 / zoom)
        } else {
            clip
        };
        for child in children {
            let Some(node) = self.attached_child(id, child) else {
                continue;
            };
            if !node.is_visible() || !intersects(clip, node.rect) {
                continue;
            }
            let rect = node.rect;
            let offset = rect.origin().to_vec2();
            let child_clip = clip.intersect(rect) - offset;
            canvas.save();
            canvas.translate(offset);
            self.draw_node(child, canvas, child_clip, layer, offscreen);
            canvas.restore();
        }
        if zoomed {
            canvas.restore();
        }
    }

    // --- update pass ---

    /// Run the per-frame update pass under `root`.
    ///
    /// Tombstoned children are destroyed here, by their parent, and nowhere else. Once
    /// the pass is done, destroyed behaviors get their [`Widget::release`] hook.
    pub fn step(&mut self, root: NodeId, canvas: &mut dyn Canvas) {
        self.frame_renders = 0;
        self.step_node(root, canvas);
        self.release_pending(canvas);
    }

    fn step_node(&mut self, id: NodeId, canvas: &mut dyn Canvas) {
        let Some(mut widget) = self.take_widget(id) else {
            return;
        };
        {
            let mut cx = StepCx {
                scene: self,
                canvas,
                id,
            };
            widget.step(&mut cx);
        }
        self.put_widget(id, widget);
    }

    pub(crate) fn step_children(&mut self, id: NodeId, canvas: &mut dyn Canvas) {
        let children = self.children_of(id).to_vec();
        for child in children {
            if self.attached_child(id, child).is_none() {
                continue;
            }
            if self.is_delete_requested(child) {
                debug!(parent = ?id, ?child, "deleting child on request");
                self.notify(child, EventKind::Remove);
                self.unlink(id, child);
                self.queue_finalize_subtree(child);
                self.destroy_subtree(child);
                continue;
            }
            self.step_node(child, canvas);
        }
    }

    // --- internals ---

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    // `child` if it is alive and still attached under `parent`. Traversals iterate a
    // snapshot of the children, which handlers may have rearranged meanwhile.
    fn attached_child(&self, parent: NodeId, child: NodeId) -> Option<&Node> {
        self.node_opt(child).filter(|n| n.parent == Some(parent))
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn take_widget(&mut self, id: NodeId) -> Option<Box<dyn Widget>> {
        self.node_opt_mut(id)?.widget.take()
    }

    fn put_widget(&mut self, id: NodeId, widget: Box<dyn Widget>) {
        match self.node_opt_mut(id) {
            Some(node) => {
                node.zoom = widget.zoom();
                node.widget = Some(widget);
            }
            // The node was destroyed while its own hook ran.
            None => self.released.push(widget),
        }
    }

    fn attach(
        &mut self,
        parent: NodeId,
        child: NodeId,
        placement: Placement,
    ) -> Result<(), SceneError> {
        if !self.is_alive(parent) {
            return Err(SceneError::Stale(parent));
        }
        if !self.is_alive(child) {
            return Err(SceneError::Stale(child));
        }
        if let Some(current) = self.parent_of(child) {
            return Err(SceneError::AlreadyParented {
                child,
                parent: current,
            });
        }
        if child == parent || self.is_descendant_of(parent, child) {
            return Err(SceneError::Cycle { child, parent });
        }
        let index = match placement {
            Placement::Top => self.children_of(parent).len(),
            Placement::Bottom => 0,
            Placement::Below(sibling) => self.child_index(parent, sibling)?,
            Placement::After(sibling) => self.child_index(parent, sibling)? + 1,
        };
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.insert(index, child);
        }
        if let Some(c) = self.node_opt_mut(child) {
            c.parent = Some(parent);
        }
        debug!(?parent, ?child, index, "attached child");
        self.notify(child, EventKind::Add);
        Ok(())
    }

    fn child_index(&self, parent: NodeId, child: NodeId) -> Result<usize, SceneError> {
        self.children_of(parent)
            .iter()
            .position(|c| *c == child)
            .ok_or(SceneError::NotAChild { child, parent })
    }

    fn check_child(&self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if !self.is_alive(parent) {
            return Err(SceneError::Stale(parent));
        }
        if !self.is_alive(child) {
            return Err(SceneError::Stale(child));
        }
        if self.parent_of(child) != Some(parent) {
            return Err(SceneError::NotAChild { child, parent });
        }
        Ok(())
    }

    fn unlink(&mut self, parent: NodeId, child: NodeId) {
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.retain(|c| *c != child);
        }
        if let Some(c) = self.node_opt_mut(child)
            && c.parent == Some(parent)
        {
            c.parent = None;
        }
    }

    fn queue_finalize_subtree(&mut self, id: NodeId) {
        let mut stack = alloc::vec![id];
        while let Some(n) = stack.pop() {
            if !self.is_alive(n) {
                continue;
            }
            self.finalized.push(n);
            stack.extend_from_slice(self.children_of(n));
        }
    }

    fn destroy_subtree(&mut self, id: NodeId) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        let children = core::mem::take(&mut node.children);
        for child in children {
            self.destroy_subtree(child);
        }
        if let Some(node) = self.nodes[id.idx()].take()
            && let Some(widget) = node.widget
        {
            self.released.push(widget);
        }
        // A slot whose generation is exhausted is retired so its ids never repeat.
        if self.generations[id.idx()] < u32::MAX {
            self.free_list.push(id.idx());
        }
        trace!(?id, "destroyed node");
    }

    fn bounding_box(&self, id: NodeId, visible_only: bool) -> Rect {
        self.children_of(id)
            .iter()
            .filter_map(|&c| self.node_opt(c))
            .filter(|n| !visible_only || n.is_visible())
            .fold(EMPTY_BOUNDS, |acc, n| acc.union(n.rect))
    }
}

/// Build a rect from origin and size without normalizing negative sizes.
fn rect_at(origin: Point, size: Size) -> Rect {
    Rect::new(
        origin.x,
        origin.y,
        origin.x + size.width,
        origin.y + size.height,
    )
}

/// Clamp both corners of `r` into `bound`.
fn clamp_rect(r: Rect, bound: Rect) -> Rect {
    Rect::new(
        r.x0.max(bound.x0).min(bound.x1),
        r.y0.max(bound.y0).min(bound.y1),
        r.x1.max(bound.x0).min(bound.x1),
        r.y1.max(bound.y0).min(bound.y1),
    )
}

/// Strict overlap test; zero-area boxes never intersect.
fn intersects(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}
