// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! The render pass.
//!
//! Pre-order over the tree. Each visited widget pushes its clip, paints its
//! standard box, runs its render hook, recurses, and pops the clip — the pop
//! is unconditional, so the clip stack stays balanced on every path. A widget
//! subtree is only repainted when it carries `needs_render` (or an ancestor
//! repainted); an empty outer bounding box or the invisible state
//! short-circuits the subtree.

use kurbo::{RoundedRectRadii, Size};
use peniko::Color;
use tracing::info_span;

use crate::app::SceneState;
use crate::core::RenderCtx;
use crate::paint::{BoxStyle, PaintSurface};
use crate::passes::enter_span_if;
use crate::style::{Display, UnitContext};
use crate::tree::arena::{ArenaNode, WidgetArena};

pub(crate) fn run_render_pass(
    arena: &mut WidgetArena,
    scene: &mut SceneState,
    surface: &mut dyn PaintSurface,
    scene_size: Size,
    force: bool,
) {
    let _span = info_span!("render").entered();
    let base_uc = UnitContext::new(scene.dpi, scene_size);
    render_widget(arena.root_mut(), scene, surface, &base_uc, Color::WHITE, force);
}

fn render_widget(
    node: &mut ArenaNode,
    scene: &mut SceneState,
    surface: &mut dyn PaintSurface,
    parent_uc: &UnitContext,
    parent_bg: Color,
    force: bool,
) {
    if !force && !node.item.state.needs_render {
        return;
    }
    if !node.item.state.style.is_visible() || node.item.state.geom.is_clipped_out() {
        clear_render_flags(node);
        return;
    }

    let ArenaNode { item, children } = node;
    let state = &mut item.state;
    let _span = enter_span_if(scene.trace.render, state);

    let style = state.style.clone();
    let uc = uc_for_render(parent_uc, &style, state.geom.alloc);
    let do_paint = force || state.request_render;

    let radius = style.border.radius;
    let radii = RoundedRectRadii::new(
        radius[0].to_dots(&uc),
        radius[1].to_dots(&uc),
        radius[2].to_dots(&uc),
        radius[3].to_dots(&uc),
    );
    surface.push_clip(state.geom.total_bbox, state.geom.content_bbox, radii);

    if do_paint {
        let box_style = BoxStyle::from_style(&style, &uc);
        if box_style.has_visible_box() {
            let rect = state.geom.box_rect();
            surface.draw_standard_box(&box_style, rect.origin(), rect.size(), parent_bg);
        }
        let mut ctx = RenderCtx {
            uc: uc.clone(),
            widget_state: state,
        };
        item.widget.render(&mut ctx, surface);
    }

    state.request_render = false;
    state.needs_render = false;

    let own_bg = style.actual_background;
    let stack_top_only = style.display == Display::Stacked && style.stack_top_only;
    let stack_top = state.stack_top;
    let child_uc = uc.for_widget(uc.font_size, state.geom.alloc);

    // Regular children first; parts (scrollbars) draw over them.
    let mut layout_index = 0usize;
    for child in children.iter_mut() {
        if child.item.state.is_part {
            continue;
        }
        let skipped_by_stack = stack_top_only && layout_index != stack_top;
        layout_index += 1;
        if skipped_by_stack {
            clear_render_flags(child);
            continue;
        }
        render_widget(child, scene, surface, &child_uc, own_bg, do_paint);
    }
    for child in children.iter_mut() {
        if child.item.state.is_part {
            render_widget(child, scene, surface, &child_uc, own_bg, do_paint);
        }
    }

    surface.pop_clip();
}

fn uc_for_render(parent_uc: &UnitContext, style: &crate::style::Style, alloc: Size) -> UnitContext {
    let font_size = style.font.size.to_dots(parent_uc);
    parent_uc.for_widget(font_size, alloc)
}

fn clear_render_flags(node: &mut ArenaNode) {
    node.item.state.request_render = false;
    node.item.state.needs_render = false;
    for child in &mut node.children {
        clear_render_flags(child);
    }
}
