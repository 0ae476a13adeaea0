// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! The show and restyle passes.
//!
//! The show pass delivers the one-time `Shown` notification on a widget's
//! first frame visit. The restyle pass runs the style cascade: seed from the
//! parent's computed style, widget base styler, the ordered styler list,
//! final stylers, then the effective-background resolution. A restyle without
//! structural changes only schedules a render, not a layout, unless a
//! layout-relevant property changed.

use tracing::info_span;

use crate::app::SceneState;
use crate::core::{Update, UpdateCtx};
use crate::passes::enter_span_if;
use crate::style::Style;
use crate::tree::arena::{ArenaNode, WidgetArena};

// --- MARK: SHOW

pub(crate) fn run_show_pass(arena: &mut WidgetArena, scene: &mut SceneState) {
    let _span = info_span!("show").entered();
    show_widget(arena.root_mut(), scene);
}

fn show_widget(node: &mut ArenaNode, scene: &mut SceneState) {
    let ArenaNode { item, children } = node;
    if !item.state.shown {
        item.state.shown = true;
        let mut ctx = UpdateCtx {
            scene,
            widget_state: &mut item.state,
        };
        item.widget.update(&mut ctx, &Update::Shown);
    }
    for child in children.iter_mut() {
        show_widget(child, scene);
        item.state.merge_up(&mut child.item.state);
    }
}

// --- MARK: RESTYLE

pub(crate) fn run_style_pass(arena: &mut WidgetArena, scene: &mut SceneState, force: bool) {
    // No root-flag early exit: per-widget `request_style` flags are set
    // without bubbling, so the pass visits everything and no-ops per node.
    let _span = info_span!("style").entered();
    let root_seed = Style::default();
    style_widget(arena.root_mut(), scene, &root_seed, force);
}

fn style_widget(node: &mut ArenaNode, scene: &mut SceneState, parent_style: &Style, force: bool) {
    let ArenaNode { item, children } = node;
    let state = &mut item.state;
    let _span = enter_span_if(scene.trace.style, state);

    let did_restyle = force || state.request_style;
    if did_restyle {
        let mut style = Style::inherit(parent_style);
        let widget = &*item.widget;
        style.apply_stylers(|s| widget.base_style(s), &state.stylers);
        // Event- and app-managed state bits survive the rebuild.
        style.states |= state.forced_states;
        style.resolve_actual_background(parent_style.actual_background);

        if style != state.style {
            state.request_render = true;
            state.needs_render = true;
            scene.scene_needs_render = true;
            if layout_relevant_changed(&state.style, &style) {
                state.needs_layout = true;
                scene.needs_layout = true;
            }
        }
        state.style = style;
        state.request_style = false;
    }
    state.needs_style = false;

    let parent_style = item.state.style.clone();
    for child in children.iter_mut() {
        // A restyled parent reseeds every child: inherited font metrics and
        // the effective background may have changed.
        let child_force = did_restyle || child.item.state.needs_style;
        style_widget(child, scene, &parent_style, child_force);
        item.state.merge_up(&mut child.item.state);
    }
}

/// Whether a style change invalidates geometry, not just pixels.
fn layout_relevant_changed(old: &Style, new: &Style) -> bool {
    old.display != new.display
        || old.direction != new.direction
        || old.wrap != new.wrap
        || old.columns != new.columns
        || old.min != new.min
        || old.max != new.max
        || old.grow != new.grow
        || old.gap != new.gap
        || old.padding != new.padding
        || old.margin != new.margin
        || old.overflow != new.overflow
        || old.font != new.font
        || old.text_wrap != new.text_wrap
        || old.is_visible() != new.is_visible()
}
