// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! The event manager.
//!
//! Input events arrive from a single source and are dispatched synchronously.
//! Raw pointer and key events are routed by hit testing and focus; the
//! manager synthesizes the derived events (enter/leave from hover-path diffs,
//! click/double-click, drag and slide, long gestures) and drives the generic
//! ability-gated state transitions.
//!
//! Within one event, a widget's listeners fire in registration order and stop
//! once the event is handled; late-phase ("final") listeners on ancestors
//! fire regardless, which is how behaviors like "click anywhere outside a
//! popup" are built. Between events, dispatch is strictly FIFO.

mod nav;

pub(crate) use nav::{focus_first_descendant, handle_nav_key};

use std::time::Instant;

use kurbo::Point;
use tracing::{info_span, trace};

use crate::app::Scene;
use crate::core::{Button, Event, EventCtx, EventType, Listener, Update, UpdateCtx, WidgetId};
use crate::style::{Abilities, StateFlags};
use crate::tree::arena::ArenaNode;

// --- MARK: STATE

/// A primary-button press that has not resolved into a gesture yet.
#[derive(Debug, Clone)]
pub(crate) struct PressState {
    pub(crate) target: WidgetId,
    pub(crate) pos: Point,
    pub(crate) button: Button,
    /// The widget holding the Active state for this press.
    pub(crate) active: Option<WidgetId>,
}

#[derive(Debug, Clone)]
pub(crate) struct DragState {
    pub(crate) target: WidgetId,
    pub(crate) start: Point,
    pub(crate) last: Point,
}

#[derive(Debug, Clone)]
pub(crate) struct SlideState {
    pub(crate) target: WidgetId,
    pub(crate) start: Point,
    pub(crate) last: Point,
}

/// A pending long-hover or long-press deadline.
#[derive(Debug, Clone)]
pub(crate) struct TimerState {
    pub(crate) target: WidgetId,
    pub(crate) deadline: Instant,
    pub(crate) pos: Point,
    pub(crate) fired: bool,
}

/// The focus-name typeahead buffer.
#[derive(Debug, Clone, Default)]
pub(crate) struct TypeAhead {
    pub(crate) buffer: String,
    pub(crate) last: Option<Instant>,
}

// --- MARK: DISPATCH CORE

/// Runs one widget's own handler plus its normal-phase listeners.
fn deliver_normal(scene: &mut Scene, id: WidgetId, event: &Event, target: WidgetId) {
    let Scene { arena, state, .. } = scene;
    let Some(node) = arena.find_mut(id) else {
        return;
    };
    if node.item.state.style.is_disabled()
        && !matches!(event.kind, EventType::MouseLeave | EventType::FocusLost)
    {
        return;
    }
    let listeners: Vec<Listener> = node
        .item
        .state
        .listeners
        .get(&event.kind)
        .cloned()
        .unwrap_or_default();

    let mut ctx = EventCtx {
        scene: state,
        widget_state: &mut node.item.state,
        target,
    };
    run_caught(|| node.item.widget.on_event(&mut ctx, event), event);
    for listener in listeners {
        if event.is_handled() {
            break;
        }
        run_caught(|| (listener.borrow_mut())(&mut ctx, event), event);
    }
}

/// Runs one widget's late-phase listeners; these see handled events too.
fn deliver_final(scene: &mut Scene, id: WidgetId, event: &Event, target: WidgetId) {
    let Scene { arena, state, .. } = scene;
    let Some(node) = arena.find_mut(id) else {
        return;
    };
    let listeners: Vec<Listener> = node
        .item
        .state
        .final_listeners
        .get(&event.kind)
        .cloned()
        .unwrap_or_default();
    if listeners.is_empty() {
        return;
    }
    let mut ctx = EventCtx {
        scene: state,
        widget_state: &mut node.item.state,
        target,
    };
    for listener in listeners {
        run_caught(|| (listener.borrow_mut())(&mut ctx, event), event);
    }
}

/// A panicking handler is caught and logged; the event is marked handled to
/// prevent storm loops, and the scene continues.
fn run_caught(f: impl FnOnce(), event: &Event) {
    let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));
    if let Err(panic) = caught {
        let msg = panic
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic".into());
        tracing::error!(kind = ?event.kind, "event handler panicked: {msg}");
        event.set_handled();
    }
}

/// Bubbles a widget's dirty flags up the parent chain so the scene and the
/// render walk observe them at the root.
pub(crate) fn bubble_up(scene: &mut Scene, id: WidgetId) {
    let Some(state) = scene.arena.get_state(id) else {
        return;
    };
    let (render, style, layout) = (state.needs_render, state.needs_style, state.needs_layout);
    if !(render || style || layout) {
        return;
    }
    for ancestor in scene.arena.id_path(id).into_iter().skip(1) {
        if let Some(state) = scene.arena.get_state_mut(ancestor) {
            state.needs_render |= render;
            state.needs_style |= style;
            state.needs_layout |= layout;
        }
    }
}

/// Dispatches an event to a widget with bubbling: normal phase from the
/// target up until handled, then the final phase over the whole chain.
pub(crate) fn dispatch_to_widget(scene: &mut Scene, target: WidgetId, event: &Event) {
    let path = scene.arena.id_path(target);
    if path.is_empty() {
        return;
    }
    for id in &path {
        if event.is_handled() {
            break;
        }
        deliver_normal(scene, *id, event, target);
        bubble_up(scene, *id);
    }
    for id in &path {
        deliver_final(scene, *id, event, target);
        bubble_up(scene, *id);
    }
}

/// Dispatches to one widget only, without bubbling (enter/leave, focus).
pub(crate) fn dispatch_single(scene: &mut Scene, target: WidgetId, event: &Event) {
    deliver_normal(scene, target, event, target);
    deliver_final(scene, target, event, target);
    bubble_up(scene, target);
}

/// Sets or clears a state bit on a widget through the gated transition
/// machinery, restyling on change.
pub(crate) fn set_flag(scene: &mut Scene, id: WidgetId, flag: StateFlags, on: bool) -> bool {
    let changed = {
        let Scene { arena, state, .. } = scene;
        let Some(node) = arena.find_mut(id) else {
            return false;
        };
        let mut ctx = EventCtx {
            scene: state,
            widget_state: &mut node.item.state,
            target: id,
        };
        ctx.set_state(flag, on)
    };
    if changed {
        bubble_up(scene, id);
    }
    changed
}

fn has_ability(scene: &Scene, id: WidgetId, ability: Abilities) -> bool {
    scene
        .arena
        .get_state(id)
        .is_some_and(|s| s.style.can(ability))
}

/// Nearest widget in the path (target-first) with the given ability.
fn find_in_path(scene: &Scene, path: &[WidgetId], ability: Abilities) -> Option<WidgetId> {
    path.iter()
        .copied()
        .find(|id| has_ability(scene, *id, ability))
}

// --- MARK: HIT TESTING

/// The hover path for a point: the deepest, latest-sibling widget whose
/// outer bounding box contains it, followed by its ancestors (root last).
/// Invisible widgets (and non-top children of top-only stacks) have empty
/// bounding boxes and are transparent to hit testing.
pub(crate) fn hit_test(scene: &Scene, pos: Point) -> Vec<WidgetId> {
    fn hit(node: &ArenaNode, pos: Point, out: &mut Vec<WidgetId>) -> bool {
        if !node.item.state.geom.contains(pos) {
            return false;
        }
        out.push(node.id());
        // Later siblings draw on top, so they hit first.
        for child in node.children.iter().rev() {
            if hit(child, pos, out) {
                return true;
            }
        }
        true
    }
    let mut path = Vec::new();
    hit(scene.arena.root(), pos, &mut path);
    path.reverse();
    path
}

// --- MARK: INPUT ENTRY

/// Dispatches one raw input event.
pub(crate) fn handle_input(scene: &mut Scene, event: &Event) {
    let _span = info_span!("event").entered();
    match event.kind {
        EventType::MouseMove => pointer_move(scene, event),
        EventType::MouseDown => pointer_down(scene, event),
        EventType::MouseUp => pointer_up(scene, event),
        EventType::Scroll => {
            let path = hit_test(scene, event.pos);
            if let Some(target) = path.first().copied() {
                dispatch_to_widget(scene, target, event);
            }
        }
        EventType::KeyDown | EventType::KeyUp | EventType::KeyChord => key_event(scene, event),
        _ => {
            // Synthetic kinds injected by tests or tools route by position.
            let path = hit_test(scene, event.pos);
            if let Some(target) = path.first().copied() {
                dispatch_to_widget(scene, target, event);
            }
        }
    }
}

// --- MARK: POINTER

fn pointer_move(scene: &mut Scene, event: &Event) {
    let pos = event.pos;
    scene.state.last_pos = Some(pos);

    // Any motion cancels a pending long press and resets the long hover.
    if let Some(lp) = &scene.state.long_press
        && !lp.fired
        && (pos - lp.pos).hypot() > scene.state.settings.slide_start_distance
    {
        scene.state.long_press = None;
    }

    // Gesture promotion: a pressed pointer that travels far enough becomes a
    // slide (preferred) or a drag.
    if scene.state.drag.is_none()
        && scene.state.slide.is_none()
        && let Some(press) = scene.state.press.clone()
        && (pos - press.pos).hypot() >= scene.state.settings.slide_start_distance
    {
        let path = scene.arena.id_path(press.target);
        if let Some(target) = find_in_path(scene, &path, Abilities::SLIDEABLE) {
            scene.state.slide = Some(SlideState {
                target,
                start: press.pos,
                last: press.pos,
            });
            set_flag(scene, target, StateFlags::SLIDING, true);
            dispatch_single(scene, target, &event.derive(EventType::SlideStart));
        } else if let Some(target) = find_in_path(scene, &path, Abilities::DRAGGABLE) {
            scene.state.drag = Some(DragState {
                target,
                start: press.pos,
                last: press.pos,
            });
            set_flag(scene, target, StateFlags::DRAGGING, true);
            dispatch_single(scene, target, &event.derive(EventType::DragStart));
        }
    }

    if let Some(mut slide) = scene.state.slide.clone() {
        let mut move_event = event.derive(EventType::SlideMove);
        move_event.prev_delta = pos - slide.last;
        slide.last = pos;
        scene.state.slide = Some(slide.clone());
        dispatch_to_widget(scene, slide.target, &move_event);
        return;
    }
    if let Some(mut drag) = scene.state.drag.clone() {
        let mut move_event = event.derive(EventType::DragMove);
        move_event.prev_delta = pos - drag.last;
        drag.last = pos;
        scene.state.drag = Some(drag.clone());
        dispatch_to_widget(scene, drag.target, &move_event);
        crate::scroll::auto_scroll(scene, pos, event.time);
        return;
    }

    // Hover path diffing synthesizes enter/leave.
    let new_path = hit_test(scene, pos);
    let old_path = std::mem::take(&mut scene.state.hovered_path);
    for id in old_path.iter().filter(|id| !new_path.contains(id)) {
        set_flag(scene, *id, StateFlags::HOVERED, false);
        dispatch_single(scene, *id, &event.derive(EventType::MouseLeave));
    }
    for id in new_path.iter().rev().filter(|id| !old_path.contains(id)) {
        set_flag(scene, *id, StateFlags::HOVERED, true);
        dispatch_single(scene, *id, &event.derive(EventType::MouseEnter));
    }
    scene.state.hovered_path = new_path.clone();

    // Long-hover bookkeeping: motion ends a fired hover, restarts a pending
    // one.
    if let Some(timer) = scene.state.long_hover.clone() {
        if timer.fired {
            end_long_hover(scene, event);
        } else {
            scene.state.long_hover = None;
        }
    }
    if let Some(target) = find_in_path(scene, &new_path, Abilities::LONG_HOVERABLE) {
        scene.state.long_hover = Some(TimerState {
            target,
            deadline: event.time + scene.state.settings.long_hover_delay,
            pos,
            fired: false,
        });
    }

    // Cursor follows the deepest hovered widget.
    scene.state.cursor = new_path
        .first()
        .and_then(|id| scene.arena.get_state(*id))
        .map(|s| s.style.cursor)
        .unwrap_or_default();

    if let Some(target) = new_path.first().copied() {
        dispatch_to_widget(scene, target, event);
    }
}

fn pointer_down(scene: &mut Scene, event: &Event) {
    let pos = event.pos;
    scene.state.last_pos = Some(pos);
    let path = hit_test(scene, pos);

    // A click outside the top dismissable stage closes it and is consumed.
    let top = scene
        .top_stage()
        .filter(|s| s.kind.dismissable())
        .map(|s| s.root);
    if let Some(root) = top
        && !path.contains(&root)
    {
        scene.close_stage(root);
        event.set_handled();
        return;
    }

    let Some(target) = path.first().copied() else {
        return;
    };
    trace!("pointer down on {target}");

    // Click-to-focus: the nearest focusable under the pointer takes focus;
    // clicking empty space clears it.
    let focus_target = find_in_path(scene, &path, Abilities::FOCUSABLE);
    scene.state.pending_focus = Some(focus_target);
    apply_pending_focus(scene);

    let active = find_in_path(scene, &path, Abilities::ACTIVATABLE);
    if let Some(active) = active {
        set_flag(scene, active, StateFlags::ACTIVE, true);
    }
    scene.state.press = Some(PressState {
        target,
        pos,
        button: event.button.unwrap_or_default(),
        active,
    });

    if event.button == Some(Button::Primary)
        && let Some(lp_target) = find_in_path(scene, &path, Abilities::LONG_PRESSABLE)
    {
        scene.state.long_press = Some(TimerState {
            target: lp_target,
            deadline: event.time + scene.state.settings.long_press_delay,
            pos,
            fired: false,
        });
    }

    dispatch_to_widget(scene, target, event);

    if event.button == Some(Button::Secondary) {
        context_menu(scene, target, event);
    }
}

fn pointer_up(scene: &mut Scene, event: &Event) {
    let pos = event.pos;
    let press = scene.state.press.take();
    let path = hit_test(scene, pos);
    let target = press
        .as_ref()
        .map(|p| p.target)
        .or_else(|| path.first().copied());

    if let Some(target) = target {
        dispatch_to_widget(scene, target, event);
    }

    if let Some(active) = press.as_ref().and_then(|p| p.active) {
        set_flag(scene, active, StateFlags::ACTIVE, false);
    }

    if let Some(slide) = scene.state.slide.take() {
        set_flag(scene, slide.target, StateFlags::SLIDING, false);
        dispatch_single(scene, slide.target, &event.derive(EventType::SlideStop));
        scene.state.long_press = None;
        return;
    }
    if let Some(drag) = scene.state.drag.take() {
        set_flag(scene, drag.target, StateFlags::DRAGGING, false);
        dispatch_to_widget(scene, drag.target, &event.derive(EventType::Drop));
        scene.state.long_press = None;
        return;
    }

    let long_press = scene.state.long_press.take();
    let Some(press) = press else {
        return;
    };
    if !path.contains(&press.target) {
        return;
    }

    if long_press.as_ref().is_some_and(|t| t.fired) {
        dispatch_single(scene, press.target, &event.derive(EventType::LongPressEnd));
        return;
    }

    // Release before the long-press deadline is a click.
    if press.button == Button::Primary {
        let click_target = path
            .iter()
            .copied()
            .find(|id| has_ability(scene, *id, Abilities::ACTIVATABLE))
            .unwrap_or(press.target);
        let is_double = scene
            .state
            .last_click
            .is_some_and(|(last_id, last_time)| {
                last_id == click_target
                    && event.time.duration_since(last_time)
                        <= scene.state.settings.double_click_delay
            })
            && has_ability(scene, click_target, Abilities::DOUBLE_CLICKABLE);
        dispatch_to_widget(scene, click_target, &event.derive(EventType::Click));
        if is_double {
            dispatch_to_widget(scene, click_target, &event.derive(EventType::DoubleClick));
            scene.state.last_click = None;
        } else {
            scene.state.last_click = Some((click_target, event.time));
        }
    }
}

fn context_menu(scene: &mut Scene, target: WidgetId, event: &Event) {
    let menu_event = event.derive(EventType::ContextMenu);
    let path = scene.arena.id_path(target);
    for id in path {
        if menu_event.is_handled() {
            break;
        }
        let menus = scene
            .arena
            .get_state(id)
            .map(|s| s.context_menus.clone())
            .unwrap_or_default();
        if menus.is_empty() {
            continue;
        }
        deliver_normal(scene, id, &menu_event, target);
        let Scene { arena, state, .. } = scene;
        if let Some(node) = arena.find_mut(id) {
            let mut ctx = EventCtx {
                scene: state,
                widget_state: &mut node.item.state,
                target,
            };
            for menu in menus {
                menu(&mut ctx);
            }
        }
        menu_event.set_handled();
    }
}

// --- MARK: KEYS

fn key_event(scene: &mut Scene, event: &Event) {
    use keyboard_types::Key;

    // The top stage consumes the abort key and closes itself.
    if event.kind == EventType::KeyDown && event.key == Some(Key::Escape) {
        let top = scene
            .top_stage()
            .filter(|s| s.kind.dismissable())
            .map(|s| s.root);
        if let Some(root) = top {
            scene.close_stage(root);
            event.set_handled();
            return;
        }
    }

    let target = scene.state.focus.unwrap_or_else(|| scene.main_id());
    dispatch_to_widget(scene, target, event);

    if !event.is_handled() && event.kind == EventType::KeyDown {
        handle_nav_key(scene, target, event);
    }
}

// --- MARK: FOCUS

/// Applies a pending focus change: `FocusLost`/`Focus` events, Focused and
/// FocusedWithin state maintenance along the old and new focus paths.
pub(crate) fn apply_pending_focus(scene: &mut Scene) {
    let Some(next) = scene.state.pending_focus.take() else {
        return;
    };
    let next = next.filter(|id| {
        scene.arena.has(*id)
            && has_ability(scene, *id, Abilities::FOCUSABLE)
            && !scene
                .arena
                .get_state(*id)
                .is_some_and(|s| s.style.is_disabled())
    });
    let prev = scene.state.focus;
    if prev == next {
        return;
    }

    let prev_path = std::mem::take(&mut scene.state.focused_path);
    let next_path = next.map(|id| scene.arena.id_path(id)).unwrap_or_default();

    if let Some(prev) = prev {
        set_flag(scene, prev, StateFlags::FOCUSED, false);
        let now = scene.state.now;
        dispatch_single(scene, prev, &Event::new(EventType::FocusLost, now));
        deliver_update(scene, prev, &Update::FocusChanged(false));
    }
    for id in prev_path.iter().filter(|id| !next_path.contains(id)) {
        set_flag(scene, *id, StateFlags::FOCUSED_WITHIN, false);
    }

    if let Some(next_id) = next {
        set_flag(scene, next_id, StateFlags::FOCUSED, true);
        for id in next_path.iter().filter(|id| !prev_path.contains(id)) {
            set_flag(scene, *id, StateFlags::FOCUSED_WITHIN, true);
        }
        let now = scene.state.now;
        dispatch_single(scene, next_id, &Event::new(EventType::Focus, now));
        deliver_update(scene, next_id, &Update::FocusChanged(true));
    }

    scene.state.focus = next;
    scene.state.focused_path = next_path;
}

fn deliver_update(scene: &mut Scene, id: WidgetId, update: &Update) {
    let Scene { arena, state, .. } = scene;
    if let Some(node) = arena.find_mut(id) {
        let mut ctx = UpdateCtx {
            scene: state,
            widget_state: &mut node.item.state,
        };
        node.item.widget.update(&mut ctx, update);
    }
}

// --- MARK: TIMERS

/// Fires long-hover and long-press deadlines. Timers live outside the frame:
/// the driver calls this from the update tick with the current time.
pub(crate) fn tick_timers(scene: &mut Scene, now: Instant) {
    if let Some(timer) = scene.state.long_hover.clone()
        && !timer.fired
        && now >= timer.deadline
        && scene.arena.has(timer.target)
    {
        scene.state.long_hover = Some(TimerState {
            fired: true,
            ..timer.clone()
        });
        set_flag(scene, timer.target, StateFlags::LONG_HOVERED, true);
        let event = Event::new(EventType::LongHoverStart, now).with_pos(timer.pos);
        dispatch_single(scene, timer.target, &event);
        open_tooltip(scene, timer.target, timer.pos);
    }

    if let Some(timer) = scene.state.long_press.clone()
        && !timer.fired
        && now >= timer.deadline
        && scene.arena.has(timer.target)
    {
        scene.state.long_press = Some(TimerState {
            fired: true,
            ..timer.clone()
        });
        let event = Event::new(EventType::LongPressStart, now).with_pos(timer.pos);
        dispatch_single(scene, timer.target, &event);
    }
}

fn end_long_hover(scene: &mut Scene, event: &Event) {
    let Some(timer) = scene.state.long_hover.take() else {
        return;
    };
    if !timer.fired {
        return;
    }
    set_flag(scene, timer.target, StateFlags::LONG_HOVERED, false);
    dispatch_single(scene, timer.target, &event.derive(EventType::LongHoverEnd));
    // Close the tooltip this hover opened.
    let tooltip_root = scene
        .state
        .stages
        .iter()
        .find(|s| s.kind == crate::app::StageKind::Tooltip && s.owner == Some(timer.target))
        .map(|s| s.root);
    if let Some(root) = tooltip_root {
        scene.close_stage(root);
    }
}

fn open_tooltip(scene: &mut Scene, target: WidgetId, pos: Point) {
    let text = {
        let Some(node) = scene.arena.find(target) else {
            return;
        };
        node.item.widget.tooltip_text()
    };
    let Some(text) = text else {
        return;
    };
    let tooltip = crate::widgets::Tooltip::new(text);
    let below = Point::new(pos.x, pos.y + 16.0);
    let _ = scene.open_stage(crate::app::StageKind::Tooltip, tooltip, below, Some(target));
}
