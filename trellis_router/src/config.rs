// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router policies.

use core::time::Duration;

/// Default window for two primary presses on the same node to count as a double click.
pub const DEFAULT_DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(300);

/// Tunable router policies.
///
/// Construct with [`RouterConfig::default`] and adjust fields, or change them later with
/// the setters on [`EventRouter`](crate::EventRouter).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RouterConfig {
    /// Maximum time between two presses for a double click (inclusive).
    pub double_click_window: Duration,
    /// Synthesize one repeat key event per held key on every
    /// [`poll_held_keys`](crate::EventRouter::poll_held_keys).
    pub synthesize_key_repeat: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            double_click_window: DEFAULT_DOUBLE_CLICK_WINDOW,
            synthesize_key_repeat: true,
        }
    }
}
