// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event records delivered through the scene.
//!
//! ## Overview
//!
//! Every event is an [`Event`]: an [`EventKind`] payload plus a propagating flag and an
//! optional claimant. Handlers claim an event with [`Event::consume`], which records the
//! claimant and stops propagation in one step.
//!
//! Each kind has a fixed [`Propagation`]:
//!
//! - [`Propagation::Positional`] kinds carry a position and are routed to the topmost
//!   visible child containing it, translated into that child's local space.
//! - [`Propagation::Broadcast`] kinds visit every child regardless of visibility.
//! - [`Propagation::Direct`] kinds are delivered to one addressed node only.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Vec2};

use crate::types::NodeId;

/// Pointer button identifiers.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MouseButton {
    /// Primary button (usually left). Drives drag, select and double click.
    Primary,
    /// Secondary button (usually right).
    Secondary,
    /// Middle button.
    Middle,
    /// Any other button, by backend index.
    Other(u8),
}

/// Edge reported for a button or key.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum InputAction {
    /// The button or key went down.
    Press,
    /// The button or key went up.
    Release,
    /// The key is held and repeating.
    Repeat,
}

bitflags::bitflags! {
    /// Keyboard modifier bitmask.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT     = 0b0000_0001;
        /// Control.
        const CONTROL   = 0b0000_0010;
        /// Alt / Option.
        const ALT       = 0b0000_0100;
        /// Super / Command / Windows.
        const SUPER     = 0b0000_1000;
        /// Caps lock is active.
        const CAPS_LOCK = 0b0001_0000;
        /// Num lock is active.
        const NUM_LOCK  = 0b0010_0000;
    }
}

/// Keyboard input payload shared by key events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyInput {
    /// Layout-dependent key code.
    pub key: i32,
    /// Platform scancode.
    pub scancode: i32,
    /// Physical key name, if the platform reports one.
    pub name: Option<String>,
    /// Press, release, or repeat.
    pub action: InputAction,
    /// Modifiers held at the time of the edge.
    pub mods: Modifiers,
}

/// How an event kind travels through the tree.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Propagation {
    /// Routed by position to the topmost containing visible child.
    Positional,
    /// Delivered to every child, topmost first.
    Broadcast,
    /// Delivered only to the addressed node.
    Direct,
}

/// Payload of an [`Event`].
#[derive(Clone, Debug, PartialEq)]
pub enum EventKind {
    /// Pointer moved over the node.
    Hover {
        /// Pointer position in the receiving node's local space.
        pos: Point,
        /// Pointer movement since the previous frame.
        mouse_delta: Vec2,
    },
    /// Pointer button edge over the node.
    Button {
        /// Pointer position in the receiving node's local space.
        pos: Point,
        /// Button that changed.
        button: MouseButton,
        /// Press or release.
        action: InputAction,
        /// Modifiers held.
        mods: Modifiers,
    },
    /// Key edge while the pointer is over the node.
    HoverKey {
        /// Pointer position in the receiving node's local space.
        pos: Point,
        /// Key payload.
        key: KeyInput,
    },
    /// Text input while the pointer is over the node.
    HoverText {
        /// Pointer position in the receiving node's local space.
        pos: Point,
        /// Unicode codepoint.
        codepoint: char,
    },
    /// Scroll wheel or trackpad scroll over the node.
    HoverScroll {
        /// Pointer position in the receiving node's local space.
        pos: Point,
        /// Scroll amount.
        scroll_delta: Vec2,
    },
    /// Pointer moved over the node while another node is dragged.
    DragHover {
        /// Pointer position in the receiving node's local space.
        pos: Point,
        /// Pointer movement since the previous frame.
        mouse_delta: Vec2,
        /// Button that started the drag.
        button: MouseButton,
        /// Node being dragged.
        origin: NodeId,
    },
    /// Paths dropped onto the node from outside the application.
    PathDrop {
        /// Pointer position in the receiving node's local space.
        pos: Point,
        /// Dropped paths.
        paths: Vec<String>,
    },
    /// The node became the hovered node.
    Enter,
    /// The node stopped being the hovered node.
    Leave,
    /// The node became the selected node.
    Select,
    /// The node stopped being the selected node.
    Deselect,
    /// Key edge delivered to the selected node.
    SelectKey {
        /// Key payload.
        key: KeyInput,
    },
    /// Text input delivered to the selected node.
    SelectText {
        /// Unicode codepoint.
        codepoint: char,
    },
    /// Two primary presses on the node within the double-click window.
    DoubleClick,
    /// The node became the dragged node.
    DragStart {
        /// Button that started the drag.
        button: MouseButton,
    },
    /// The node stopped being the dragged node.
    DragEnd {
        /// Button that started the drag.
        button: MouseButton,
    },
    /// The pointer moved while the node is dragged.
    DragMove {
        /// Button that started the drag.
        button: MouseButton,
        /// Pointer movement since the previous frame.
        mouse_delta: Vec2,
    },
    /// A drag entered the node.
    DragEnter {
        /// Button that started the drag.
        button: MouseButton,
        /// Node being dragged.
        origin: NodeId,
    },
    /// A drag left the node.
    DragLeave {
        /// Button that started the drag.
        button: MouseButton,
        /// Node being dragged.
        origin: NodeId,
    },
    /// A drag was released over the node.
    DragDrop {
        /// Button that started the drag.
        button: MouseButton,
        /// Node being dragged.
        origin: NodeId,
    },
    /// The node's primary action was triggered.
    Action,
    /// The node's value changed.
    Change,
    /// The node's position changed.
    Reposition,
    /// The node's size changed.
    Resize,
    /// The node was added to a parent.
    Add,
    /// The node is about to be removed from its parent.
    Remove,
    /// Cached renderings in the subtree are stale.
    Dirty,
    /// The node became visible.
    Show,
    /// The node became hidden.
    Hide,
    /// The graphics context was (re)created.
    ContextCreate,
    /// The graphics context is about to be destroyed.
    ContextDestroy,
}

impl EventKind {
    /// How this kind travels through the tree.
    pub fn propagation(&self) -> Propagation {
        match self {
            Self::Hover { .. }
            | Self::Button { .. }
            | Self::HoverKey { .. }
            | Self::HoverText { .. }
            | Self::HoverScroll { .. }
            | Self::DragHover { .. }
            | Self::PathDrop { .. } => Propagation::Positional,
            Self::Dirty | Self::Show | Self::Hide | Self::ContextCreate | Self::ContextDestroy => {
                Propagation::Broadcast
            }
            _ => Propagation::Direct,
        }
    }

    /// Position carried by positional kinds.
    pub fn pos(&self) -> Option<Point> {
        match self {
            Self::Hover { pos, .. }
            | Self::Button { pos, .. }
            | Self::HoverKey { pos, .. }
            | Self::HoverText { pos, .. }
            | Self::HoverScroll { pos, .. }
            | Self::DragHover { pos, .. }
            | Self::PathDrop { pos, .. } => Some(*pos),
            _ => None,
        }
    }

    fn pos_mut(&mut self) -> Option<&mut Point> {
        match self {
            Self::Hover { pos, .. }
            | Self::Button { pos, .. }
            | Self::HoverKey { pos, .. }
            | Self::HoverText { pos, .. }
            | Self::HoverScroll { pos, .. }
            | Self::DragHover { pos, .. }
            | Self::PathDrop { pos, .. } => Some(pos),
            _ => None,
        }
    }
}

/// An event in flight through the scene.
///
/// At most one event is in flight at a time. Once a claimant is recorded the event stops
/// propagating and no further sibling receives it.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    kind: EventKind,
    propagating: bool,
    target: Option<NodeId>,
}

impl Event {
    /// Create a fresh, propagating, unclaimed event.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            propagating: true,
            target: None,
        }
    }

    /// The event payload.
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// Position in the receiving node's local space, for positional kinds.
    pub fn pos(&self) -> Option<Point> {
        self.kind.pos()
    }

    /// True while nobody has claimed or stopped the event.
    pub fn is_propagating(&self) -> bool {
        self.propagating
    }

    /// The claimant, if any.
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// Claim the event for `node` and stop propagation.
    pub fn consume(&mut self, node: NodeId) {
        self.target = Some(node);
        self.propagating = false;
    }

    /// Stop propagation without recording a claimant.
    pub fn stop_propagating(&mut self) {
        self.propagating = false;
    }

    pub(crate) fn set_pos(&mut self, to: Point) {
        if let Some(pos) = self.kind.pos_mut() {
            *pos = to;
        }
    }
}
