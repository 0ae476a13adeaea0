// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Interaction state and ability bitsets.
//!
//! A *state* describes a widget's current interaction condition (hovered,
//! active, focused, …). An *ability* gates whether the widget may enter the
//! corresponding state at all: the event manager refuses to set a gated state
//! whose ability is missing.

use bitflags::bitflags;

bitflags! {
    /// Transient and semi-persistent interaction states.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StateFlags: u32 {
        /// The primary button is held down on the widget.
        const ACTIVE = 1 << 0;
        /// The pointer is inside the widget's outer box.
        const HOVERED = 1 << 1;
        /// The pointer has rested inside the widget without motion.
        const LONG_HOVERED = 1 << 2;
        /// The widget has key focus.
        const FOCUSED = 1 << 3;
        /// The widget or a descendant has key focus.
        const FOCUSED_WITHIN = 1 << 4;
        /// A two- or three-state control is on.
        const CHECKED = 1 << 5;
        /// A three-state control is in its mixed state.
        const INDETERMINATE = 1 << 6;
        /// The widget is part of the current selection.
        const SELECTED = 1 << 7;
        /// The widget is being dragged.
        const DRAGGING = 1 << 8;
        /// The widget is receiving relative slide motion.
        const SLIDING = 1 << 9;
        /// The widget ignores input and styles itself muted.
        const DISABLED = 1 << 10;
        /// The widget shows its value but refuses edits.
        const READ_ONLY = 1 << 11;
        /// The widget is skipped by layout, render, and hit testing.
        const INVISIBLE = 1 << 12;
        /// A validator rejected the widget's current value.
        const ERROR = 1 << 13;
    }
}

bitflags! {
    /// Abilities permitting a widget to enter particular states.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Abilities: u32 {
        const ACTIVATABLE = 1 << 0;
        const FOCUSABLE = 1 << 1;
        const HOVERABLE = 1 << 2;
        const LONG_HOVERABLE = 1 << 3;
        const SLIDEABLE = 1 << 4;
        const DRAGGABLE = 1 << 5;
        const CHECKABLE = 1 << 6;
        const SELECTABLE = 1 << 7;
        const DOUBLE_CLICKABLE = 1 << 8;
        const SCROLLABLE = 1 << 9;
        const LONG_PRESSABLE = 1 << 10;
        const CONTEXT_MENUABLE = 1 << 11;
    }
}

impl StateFlags {
    /// The ability gating a single state bit, or `None` for ungated states
    /// (disabled, read-only, invisible, error are set by the app, not by input).
    pub fn gating_ability(self) -> Option<Abilities> {
        match self {
            Self::ACTIVE => Some(Abilities::ACTIVATABLE),
            Self::HOVERED => Some(Abilities::HOVERABLE),
            Self::LONG_HOVERED => Some(Abilities::LONG_HOVERABLE),
            Self::FOCUSED => Some(Abilities::FOCUSABLE),
            // FocusedWithin marks the ancestors of the focus widget, which
            // are usually not focusable themselves.
            Self::CHECKED | Self::INDETERMINATE => Some(Abilities::CHECKABLE),
            Self::SELECTED => Some(Abilities::SELECTABLE),
            Self::DRAGGING => Some(Abilities::DRAGGABLE),
            Self::SLIDING => Some(Abilities::SLIDEABLE),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gating() {
        assert_eq!(
            StateFlags::HOVERED.gating_ability(),
            Some(Abilities::HOVERABLE)
        );
        assert_eq!(StateFlags::DISABLED.gating_ability(), None);
        assert_eq!(
            StateFlags::SLIDING.gating_ability(),
            Some(Abilities::SLIDEABLE)
        );
    }
}
