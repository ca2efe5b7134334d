// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors for structural scene operations.

use crate::types::NodeId;

/// Errors returned by structural [`Scene`](crate::Scene) operations.
///
/// These report misuse by the embedding application. The scene is left unchanged when
/// one is returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// The id does not refer to a live node.
    #[error("node {0:?} is not alive")]
    Stale(NodeId),
    /// The child is already owned by a parent.
    #[error("node {child:?} is already a child of {parent:?}")]
    AlreadyParented {
        /// Node being added.
        child: NodeId,
        /// Its current parent.
        parent: NodeId,
    },
    /// The node is not a child of the given parent.
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Node expected to be a child.
        child: NodeId,
        /// Expected parent.
        parent: NodeId,
    },
    /// The parent is the child itself or one of its descendants.
    #[error("adding {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// Node being added.
        child: NodeId,
        /// Requested parent.
        parent: NodeId,
    },
    /// The widget rejected a persisted state blob.
    #[error("node {0:?} rejected its saved state")]
    StateRejected(NodeId),
}

/// Returned by [`Widget::load_state`](crate::Widget::load_state) when a blob cannot be applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, thiserror::Error)]
#[error("saved state could not be applied")]
pub struct RejectedState;
