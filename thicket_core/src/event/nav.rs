// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Keyboard focus navigation.
//!
//! Key events that the focused widget (and its ancestors) left unhandled
//! fall through to here: Tab/Shift-Tab move focus in depth-first order,
//! arrow keys move along the focused widget's container direction (grids add
//! the orthogonal axis), and printable characters feed the focus-name
//! typeahead buffer, which selects the first focusable descendant whose
//! display label matches the typed prefix.

use keyboard_types::Key;

use crate::app::Scene;
use crate::core::{Event, EventType, WidgetId};
use crate::event::apply_pending_focus;
use crate::style::{Abilities, Display};

fn is_focusable(scene: &Scene, id: WidgetId) -> bool {
    scene.arena.get_state(id).is_some_and(|s| {
        s.style.can(Abilities::FOCUSABLE) && s.style.is_visible() && !s.style.is_disabled()
    })
}

fn descendants(scene: &Scene, root: WidgetId) -> Vec<WidgetId> {
    scene
        .arena
        .find(root)
        .map(crate::tree::walk::pre_order_ids)
        .unwrap_or_default()
}

/// All focusable widgets under `root`, in depth-first order.
fn focusable_under(scene: &Scene, root: WidgetId) -> Vec<WidgetId> {
    descendants(scene, root)
        .into_iter()
        .filter(|id| is_focusable(scene, *id))
        .collect()
}

/// Moves focus to the first focusable descendant of `root` (used by popup
/// and dialog stages to nominate their start focus).
pub(crate) fn focus_first_descendant(scene: &mut Scene, root: WidgetId) {
    if let Some(first) = focusable_under(scene, root).first().copied() {
        scene.state.pending_focus = Some(Some(first));
        apply_pending_focus(scene);
    }
}

/// The nearest ancestor with a flex or grid display, the context for arrow
/// and typeahead navigation.
fn nav_container(scene: &Scene, id: WidgetId) -> Option<WidgetId> {
    let path = scene.arena.id_path(id);
    path.into_iter().skip(1).find(|candidate| {
        scene
            .arena
            .get_state(*candidate)
            .is_some_and(|s| matches!(s.style.display, Display::Flex | Display::Grid))
    })
}

fn focus_to(scene: &mut Scene, id: WidgetId) {
    scene.state.pending_focus = Some(Some(id));
    apply_pending_focus(scene);
}

/// Handles navigation semantics for an unhandled key-down. `origin` is the
/// widget the key event targeted (the focus widget, or the base layer).
pub(crate) fn handle_nav_key(scene: &mut Scene, origin: WidgetId, event: &Event) {
    debug_assert_eq!(event.kind, EventType::KeyDown);
    let Some(key) = event.key.clone() else {
        return;
    };

    match key {
        Key::Tab => {
            let forward = !event.modifiers.contains(keyboard_types::Modifiers::SHIFT);
            let order = focusable_under(scene, scene.root_id());
            if order.is_empty() {
                return;
            }
            let next = match scene.state.focus.and_then(|f| order.iter().position(|id| *id == f)) {
                Some(index) if forward => order[(index + 1) % order.len()],
                Some(index) => order[(index + order.len() - 1) % order.len()],
                None if forward => order[0],
                None => *order.last().unwrap(),
            };
            focus_to(scene, next);
            event.set_handled();
        }
        named @ (Key::ArrowLeft | Key::ArrowRight | Key::ArrowUp | Key::ArrowDown) => {
            arrow_nav(scene, named, event);
        }
        Key::Character(text) => {
            let ch = text.as_str();
            if ch.chars().all(|c| c.is_alphanumeric() || c == ' ') && !ch.is_empty() {
                typeahead(scene, origin, ch, event);
            }
        }
        _ => {}
    }
}

fn arrow_nav(scene: &mut Scene, key: Key, event: &Event) {
    let Some(focus) = scene.state.focus else {
        return;
    };
    let Some(container) = nav_container(scene, focus) else {
        return;
    };
    let (style_display, direction, columns) = {
        let Some(state) = scene.arena.get_state(container) else {
            return;
        };
        (
            state.style.display,
            state.style.direction,
            state.style.columns,
        )
    };

    let items = focusable_under(scene, container);
    let Some(index) = items.iter().position(|id| *id == focus) else {
        return;
    };

    let horizontal = matches!(key, Key::ArrowLeft | Key::ArrowRight);
    let backward = matches!(key, Key::ArrowLeft | Key::ArrowUp);

    let step: isize = match style_display {
        Display::Grid => {
            let cols = if columns > 0 {
                columns
            } else {
                (items.len() as f64).sqrt().ceil() as usize
            }
            .max(1);
            if horizontal { 1 } else { cols as isize }
        }
        _ => {
            // Flex: only the arrows matching the direction navigate.
            let along = match direction {
                crate::style::Direction::Row => horizontal,
                crate::style::Direction::Column => !horizontal,
            };
            if !along {
                return;
            }
            1
        }
    };

    let delta = if backward { -step } else { step };
    let next = index as isize + delta;
    if next < 0 || next as usize >= items.len() {
        return;
    }
    focus_to(scene, items[next as usize]);
    event.set_handled();
}

/// The label a typeahead prefix is matched against: the widget's own, or the
/// first one in its subtree (a button's text lives on its label part).
fn candidate_label(scene: &Scene, id: WidgetId) -> Option<String> {
    let ids = descendants(scene, id);
    for candidate in ids {
        let label = scene
            .arena
            .find(candidate)
            .and_then(|node| node.item.widget.focus_label());
        if label.is_some() {
            return label;
        }
    }
    None
}

fn typeahead(scene: &mut Scene, origin: WidgetId, ch: &str, event: &Event) {
    let now = event.time;
    let timeout = scene.state.settings.focus_name_timeout;
    let expired = scene
        .state
        .typeahead
        .last
        .is_none_or(|last| now.duration_since(last) > timeout);
    if expired {
        scene.state.typeahead.buffer.clear();
    }
    scene.state.typeahead.buffer.push_str(&ch.to_lowercase());
    scene.state.typeahead.last = Some(now);
    let buffer = scene.state.typeahead.buffer.clone();

    let container = scene
        .state
        .focus
        .and_then(|f| nav_container(scene, f))
        .unwrap_or(origin);
    let candidates = focusable_under(scene, container);

    let matches: Vec<WidgetId> = candidates
        .into_iter()
        .filter(|id| {
            candidate_label(scene, *id)
                .is_some_and(|label| label.to_lowercase().starts_with(&buffer))
        })
        .collect();
    if matches.is_empty() {
        return;
    }

    // If the current focus already matches, advance to the next match so
    // repeated prefixes cycle; otherwise take the first in tree order.
    let next = match scene.state.focus.and_then(|f| matches.iter().position(|id| *id == f)) {
        Some(index) => matches[(index + 1) % matches.len()],
        None => matches[0],
    };
    focus_to(scene, next);
    event.set_handled();
}
