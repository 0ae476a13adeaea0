// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Event records and lifecycle notifications.

use std::cell::Cell;
use std::time::Instant;

use keyboard_types::{Key, Modifiers};
use kurbo::{Point, Vec2};

/// A pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Button {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// The kind of an [`Event`].
///
/// Raw kinds arrive from the input source; derived kinds (enter/leave, click,
/// drag/slide, long gestures) are synthesized by the event manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    MouseDown,
    MouseUp,
    MouseMove,
    MouseEnter,
    MouseLeave,
    Click,
    DoubleClick,
    ContextMenu,
    Scroll,
    DragStart,
    DragMove,
    Drop,
    SlideStart,
    SlideMove,
    SlideStop,
    LongHoverStart,
    LongHoverEnd,
    LongPressStart,
    LongPressEnd,
    KeyDown,
    KeyUp,
    KeyChord,
    Focus,
    FocusLost,
    /// A widget's visible value changed; drives widget→value binding sync.
    Change,
    /// Stage shown (popup opened).
    Show,
    /// Stage closing.
    Close,
}

impl EventType {
    /// Whether the event carries a pointer position and is routed by hit
    /// testing (as opposed to focus).
    pub fn is_pointer(self) -> bool {
        !matches!(
            self,
            Self::KeyDown
                | Self::KeyUp
                | Self::KeyChord
                | Self::Focus
                | Self::FocusLost
                | Self::Change
                | Self::Show
                | Self::Close
        )
    }
}

/// An immutable per-event record.
///
/// The `handled` flag is monotonic: once set it stays set for this record.
/// Cloning produces a fresh, unhandled copy, which is how the manager derives
/// synthetic events from raw ones.
#[derive(Debug)]
pub struct Event {
    pub kind: EventType,
    pub time: Instant,
    pub modifiers: Modifiers,
    pub button: Option<Button>,
    /// Pointer position in scene coordinates.
    pub pos: Point,
    /// Relative motion since the previous drag/slide event.
    pub prev_delta: Vec2,
    pub scroll_delta: Vec2,
    pub key: Option<Key>,
    /// Typed text for chord/character events.
    pub text: Option<String>,
    handled: Cell<bool>,
}

impl Clone for Event {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            time: self.time,
            modifiers: self.modifiers,
            button: self.button,
            pos: self.pos,
            prev_delta: self.prev_delta,
            scroll_delta: self.scroll_delta,
            key: self.key.clone(),
            text: self.text.clone(),
            // Handled does not survive cloning.
            handled: Cell::new(false),
        }
    }
}

impl Event {
    pub fn new(kind: EventType, time: Instant) -> Self {
        Self {
            kind,
            time,
            modifiers: Modifiers::empty(),
            button: None,
            pos: Point::ZERO,
            prev_delta: Vec2::ZERO,
            scroll_delta: Vec2::ZERO,
            key: None,
            text: None,
            handled: Cell::new(false),
        }
    }

    pub fn with_pos(mut self, pos: Point) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_button(mut self, button: Button) -> Self {
        self.button = Some(button);
        self
    }

    pub fn with_scroll_delta(mut self, delta: Vec2) -> Self {
        self.scroll_delta = delta;
        self
    }

    pub fn with_key(mut self, key: Key) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// A copy of this event reinterpreted as `kind`, with the handled flag
    /// cleared.
    pub fn derive(&self, kind: EventType) -> Self {
        let mut out = self.clone();
        out.kind = kind;
        out
    }

    /// Marks the event handled, stopping normal-phase propagation. Set-only.
    pub fn set_handled(&self) {
        self.handled.set(true);
    }

    pub fn is_handled(&self) -> bool {
        self.handled.get()
    }
}

/// Lifecycle and status notifications delivered through [`Widget::update`].
///
/// [`Widget::update`]: crate::core::Widget::update
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// The widget was just inserted into a tree.
    Added,
    /// First frame visit after insertion; sizes are about to become real.
    Shown,
    /// The widget is about to be released. Delivered bottom-up.
    Destroyed,
    FocusChanged(bool),
    HoverChanged(bool),
    ActiveChanged(bool),
    DisabledChanged(bool),
    /// A bound value or visible state changed outside of user input.
    ValueChanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handled_is_monotonic_and_cleared_by_clone() {
        let event = Event::new(EventType::Click, Instant::now());
        assert!(!event.is_handled());
        event.set_handled();
        assert!(event.is_handled());
        let copy = event.clone();
        assert!(!copy.is_handled());
        assert!(event.is_handled());
    }
}
