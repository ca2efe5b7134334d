// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Role slot helper: compute leave/enter transitions when an occupant changes.
//!
//! ## Usage
//!
//! 1) Dispatch an input event through the scene and read its claimant.
//! 2) Call [`RoleSlot::update`] with the claimant to get `Leave(..)` / `Enter(..)` transitions.
//! 3) Deliver each transition as the role's direct notification
//!    (for hover, `Leave`/`Enter`; for drag, `DragEnd`/`DragStart`; and so on).
//!
//! ## Minimal example
//!
//! ```
//! use trellis_router::roles::{RoleEvent, RoleSlot};
//! let mut s: RoleSlot<u32> = RoleSlot::new();
//! assert_eq!(s.update(Some(1)), [RoleEvent::Enter(1)]);
//! assert_eq!(s.update(Some(2)), [RoleEvent::Leave(1), RoleEvent::Enter(2)]);
//! assert!(s.update(Some(2)).is_empty());
//! ```

use alloc::vec::Vec;

/// A single-occupant role (hovered, dragged, drag-hovered, selected).
///
/// Updating the occupant yields the minimal transition: nothing when unchanged,
/// otherwise a leave for the old occupant followed by an enter for the new one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoleSlot<K: Copy + Eq> {
    current: Option<K>,
}

/// A role transition.
///
/// Returned by [`RoleSlot::update`] and [`RoleSlot::clear`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoleEvent<K> {
    /// The node takes the role.
    Enter(K),
    /// The node gives up the role.
    Leave(K),
}

impl<K: Copy + Eq> RoleSlot<K> {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Current occupant.
    pub fn get(&self) -> Option<K> {
        self.current
    }

    /// Vacate the slot, returning the leave event for the old occupant (if any).
    pub fn clear(&mut self) -> Vec<RoleEvent<K>> {
        self.update(None)
    }

    /// Replace the occupant and return the transitions, leave first.
    pub fn update(&mut self, next: Option<K>) -> Vec<RoleEvent<K>> {
        let mut out = Vec::new();
        if self.current == next {
            return out;
        }
        if let Some(old) = self.current {
            out.push(RoleEvent::Leave(old));
        }
        if let Some(new) = next {
            out.push(RoleEvent::Enter(new));
        }
        self.current = next;
        out
    }

    /// Vacate the slot without transitions if `k` occupies it. Returns true if it did.
    ///
    /// Used when the occupant is being destroyed and must not be notified.
    pub fn forget(&mut self, k: K) -> bool {
        if self.current == Some(k) {
            self.current = None;
            true
        } else {
            false
        }
    }
}
