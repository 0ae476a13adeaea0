// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! The scroll substrate shared by frames and scrollbars.
//!
//! A frame whose overflow is auto (or scroll) on an axis observes
//! `internal > alloc` during the size-final pass and sets `has_scroll` for
//! that axis. After layout, [`config_scrolls`] materializes one scrollbar
//! part per active axis and [`position_scrolls`] anchors them over the outer
//! edge of the frame's content area (scrollbars are parts: they are not
//! clipped away by the frame's own content clip and draw over the content).

use std::time::Instant;

use kurbo::{Point, Rect, Vec2};
use tracing::trace;

use crate::app::Scene;
use crate::core::WidgetId;
use crate::layout::Dim;
use crate::widgets::ScrollBar;

const BAR_NAMES: [&str; 2] = ["scrollbar-x", "scrollbar-y"];

/// Adds and removes scrollbar parts to match each frame's `has_scroll`.
pub(crate) fn config_scrolls(scene: &mut Scene) {
    let ids = scene
        .arena
        .find(scene.root_id())
        .map(crate::tree::walk::pre_order_ids)
        .unwrap_or_default();

    for id in ids {
        let Some(state) = scene.arena.get_state(id) else {
            continue;
        };
        if state.is_part {
            continue;
        }
        let wanted = state.has_scroll;

        for dim in Dim::ALL {
            let name = BAR_NAMES[dim.index()];
            let mut ctx = scene.tree();
            let existing = ctx.sibling_named(id, name);
            match (wanted.dim(dim), existing) {
                (true, None) => {
                    let bar = ScrollBar::new(dim);
                    match ctx.add_part(id, bar, name) {
                        Ok(bar_id) => {
                            if let Some(state) = ctx.state_mut(bar_id) {
                                state.skip_layout = true;
                            }
                            trace!("added {name} to {id}");
                        }
                        Err(err) => {
                            crate::debug_panic!("failed to add scrollbar: {err}");
                        }
                    }
                }
                (false, Some(bar)) => {
                    let _ = ctx.delete(bar);
                }
                _ => {}
            }
        }
    }
}

/// Sizes and anchors scrollbar parts, and syncs their slider state from the
/// frame's scroll offset.
pub(crate) fn position_scrolls(scene: &mut Scene) {
    let ids = scene
        .arena
        .find(scene.root_id())
        .map(crate::tree::walk::pre_order_ids)
        .unwrap_or_default();
    let bar_width = scene.settings().scrollbar_width;
    let min_thumb = scene.settings().scrollbar_min_thumb;
    let line_step = scene.settings().scroll_line_step;
    let page_lines = scene.settings().scroll_page_lines;

    for id in ids {
        let Some(node) = scene.arena.find(id) else {
            continue;
        };
        let state = &node.item.state;
        if !state.has_scroll.x && !state.has_scroll.y {
            continue;
        }
        let frame_geom = state.geometry().clone();
        let bar_ids: [Option<WidgetId>; 2] = [
            node.child_by_name(BAR_NAMES[0]).map(|c| c.id()),
            node.child_by_name(BAR_NAMES[1]).map(|c| c.id()),
        ];

        for dim in Dim::ALL {
            let Some(bar_id) = bar_ids[dim.index()] else {
                continue;
            };

            let content = frame_geom.content_rect();
            let rect = match dim {
                Dim::Y => Rect::new(
                    content.x1 - bar_width,
                    content.y0,
                    content.x1,
                    content.y1,
                ),
                Dim::X => Rect::new(
                    content.x0,
                    content.y1 - bar_width,
                    content.x1,
                    content.y1,
                ),
            };
            let visible = dim.of_size(frame_geom.alloc);
            let internal = dim.of_size(frame_geom.internal).max(1.0);
            let value = -dim.of_vec2(frame_geom.scroll) / internal;

            scene.with_widget::<ScrollBar, _>(bar_id, |bar, state| {
                bar.sync(visible, internal, value, min_thumb, line_step, page_lines);
                let geom = &mut state.geom;
                geom.scene_pos = rect.origin();
                geom.rel_pos = Point::ZERO;
                geom.alloc = rect.size();
                geom.actual = rect.size();
                geom.internal = rect.size();
                geom.total = rect.size();
                geom.inset = crate::style::Sides::all(0.0);
                geom.margin = crate::style::Sides::all(0.0);
                // Anchored inside the frame's outer box, over the content
                // edge; only ancestors above the frame clip it.
                geom.total_bbox = intersect(rect, frame_geom.total_bbox);
                geom.content_bbox = geom.total_bbox;
            });
        }
    }
}

fn intersect(a: Rect, b: Rect) -> Rect {
    let r = a.intersect(b);
    if r.width() <= 0.0 || r.height() <= 0.0 {
        Rect::ZERO
    } else {
        r
    }
}

/// Scrolls a frame to a new offset along one axis, in scroll coordinates
/// (≤ 0), and schedules the scene-position rerun.
pub(crate) fn set_scroll(scene: &mut Scene, frame: WidgetId, dim: Dim, offset: f64) {
    let Some(state) = scene.arena.get_state_mut(frame) else {
        return;
    };
    let geom = &mut state.geom;
    dim.set_vec2(&mut geom.scroll, offset);
    geom.clamp_scroll();
    state.request_render = true;
    state.needs_render = true;
    scene.state.scene_needs_render = true;
    scene.state.scene_pos_dirty = true;
}

/// Scrolls ancestors so that `target`'s outer box lies inside the nearest
/// scrollable frame's content box, biasing toward the start edge when the
/// widget is larger than the visible region.
pub fn scroll_to_widget(scene: &mut Scene, target: WidgetId) {
    let Some(target_box) = scene
        .arena
        .get_state(target)
        .map(|s| s.geometry().outer_rect())
    else {
        return;
    };

    let path = scene.arena.id_path(target);
    let frame = path.iter().skip(1).copied().find(|id| {
        scene
            .arena
            .get_state(*id)
            .is_some_and(|s| s.has_scroll.x || s.has_scroll.y)
    });
    let Some(frame) = frame else {
        return;
    };
    let Some(frame_state) = scene.arena.get_state(frame) else {
        return;
    };
    let content = frame_state.geometry().content_rect();
    let scroll = frame_state.geometry().scroll;
    let has = frame_state.has_scroll;

    for dim in Dim::ALL {
        if !has.dim(dim) {
            continue;
        }
        let (start, end, view_start, view_end) = match dim {
            Dim::X => (target_box.x0, target_box.x1, content.x0, content.x1),
            Dim::Y => (target_box.y0, target_box.y1, content.y0, content.y1),
        };
        let mut offset = dim.of_vec2(scroll);
        if end - start > view_end - view_start || start < view_start {
            // Oversized or above the viewport: align start edges.
            offset += view_start - start;
        } else if end > view_end {
            offset += view_end - end;
        } else {
            continue;
        }
        set_scroll(scene, frame, dim, offset);
    }
}

/// During a drag, the pointer resting near a scrollable frame's edge scrolls
/// it, rate-limited by the settings' minimum inter-scroll delay.
pub(crate) fn auto_scroll(scene: &mut Scene, pos: Point, now: Instant) {
    let delay = scene.settings().auto_scroll_delay;
    if scene
        .state
        .auto_scroll_last
        .is_some_and(|last| now.duration_since(last) < delay)
    {
        return;
    }

    let path = crate::event::hit_test(scene, pos);
    let frame = path.iter().copied().find(|id| {
        scene
            .arena
            .get_state(*id)
            .is_some_and(|s| s.has_scroll.x || s.has_scroll.y)
    });
    let Some(frame) = frame else {
        return;
    };
    let Some(state) = scene.arena.get_state(frame) else {
        return;
    };
    let content = state.geometry().content_rect();
    let scroll = state.geometry().scroll;
    let has = state.has_scroll;
    let margin_frac = scene.settings().auto_scroll_margin;
    let step = scene.settings().scroll_line_step;

    let mut scrolled = false;
    for dim in Dim::ALL {
        if !has.dim(dim) {
            continue;
        }
        let (p, lo, hi) = match dim {
            Dim::X => (pos.x, content.x0, content.x1),
            Dim::Y => (pos.y, content.y0, content.y1),
        };
        let margin = (hi - lo) * margin_frac;
        let offset = dim.of_vec2(scroll);
        if p < lo + margin {
            set_scroll(scene, frame, dim, offset + step);
            scrolled = true;
        } else if p > hi - margin {
            set_scroll(scene, frame, dim, offset - step);
            scrolled = true;
        }
    }
    if scrolled {
        scene.state.auto_scroll_last = Some(now);
    }
}

/// Applies a wheel/gesture scroll delta to a frame.
pub(crate) fn scroll_frame_by(scene: &mut Scene, frame: WidgetId, delta: Vec2) {
    let Some(state) = scene.arena.get_state(frame) else {
        return;
    };
    let has = state.has_scroll;
    let scroll = state.geometry().scroll;
    let mut any = false;
    for dim in Dim::ALL {
        if !has.dim(dim) {
            continue;
        }
        let d = dim.of_vec2(delta);
        if d != 0.0 {
            set_scroll(scene, frame, dim, dim.of_vec2(scroll) + d);
            any = true;
        }
    }
    if any {
        scene.state.scene_pos_dirty = true;
    }
}
