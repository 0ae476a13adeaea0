// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! The five layout passes.
//!
//! - size-up (post-order): every widget reports its desired size from
//!   intrinsic content and children, per its display mode.
//! - size-down (pre-order): parents distribute their allocation among
//!   children by grow weight. May request a redo when a widget's final size
//!   depends on the enclosing allocation (wrapped text); the driver iterates
//!   up to [`SceneSettings::layout_max_iters`] times, then accepts the last
//!   result and logs the divergence.
//! - size-final (post-order): freeze sizes, compute scroll content extents.
//! - position (pre-order): place children inside the parent content box.
//! - scene-pos (pre-order): resolve scene coordinates and clip bounding
//!   boxes against ancestors.
//!
//! [`SceneSettings::layout_max_iters`]: crate::app::SceneSettings::layout_max_iters

use kurbo::{Point, Rect, Size, Vec2};
use tracing::{info_span, warn};

use crate::app::SceneState;
use crate::core::MeasureCtx;
use crate::layout::Dim;
use crate::paint::TextShaper;
use crate::passes::enter_span_if;
use crate::style::{Display, Style, UnitContext};
use crate::tree::arena::{ArenaNode, WidgetArena};

pub(crate) struct LayoutDriver<'a> {
    pub(crate) scene: &'a mut SceneState,
    pub(crate) shaper: &'a mut dyn TextShaper,
}

/// Unit context for a widget, derived from its parent's.
fn uc_for(style: &Style, parent_uc: &UnitContext, parent_alloc: Size) -> UnitContext {
    let font_size = style.font.size.to_dots(parent_uc);
    parent_uc.for_widget(font_size, parent_alloc)
}

fn intersect(a: Rect, b: Rect) -> Rect {
    let r = a.intersect(b);
    if r.width() <= 0.0 || r.height() <= 0.0 {
        Rect::ZERO
    } else {
        r
    }
}

/// Visible children participate in generic layout unless their geometry is
/// owned elsewhere (scrollbars, placed by the scroll substrate). Invisible
/// children contribute nothing.
fn in_layout(child: &ArenaNode) -> bool {
    !child.item.state.skip_layout && child.item.state.style.is_visible()
}

// --- MARK: DRIVER

impl LayoutDriver<'_> {
    /// Runs all five passes over the tree for the given scene size.
    pub(crate) fn run(&mut self, arena: &mut WidgetArena, scene_size: Size) {
        let _span = info_span!("layout").entered();
        let base_uc = UnitContext::new(self.scene.dpi, scene_size);

        let max_iters = self.scene.settings.layout_max_iters;
        for iter in 0..max_iters {
            let root = arena.root_mut();
            self.size_up(root, &base_uc);
            grant_root(root, scene_size);
            self.size_down(root, &base_uc);

            let redo = root.item.state.size_redo;
            clear_redo(arena.root_mut());
            if !redo {
                break;
            }
            if iter + 1 == max_iters {
                // Not fatal: accept whatever stands.
                warn!("layout failed to converge after {max_iters} iterations");
            }
        }

        let root = arena.root_mut();
        self.size_final(root, &base_uc);
        position(root, &base_uc);
        let scene_rect = Rect::from_origin_size(Point::ZERO, scene_size);
        scene_pos(root, Point::ZERO, Vec2::ZERO, scene_rect);
    }

    // --- MARK: SIZE UP

    fn size_up(&mut self, node: &mut ArenaNode, parent_uc: &UnitContext) {
        if !node.item.state.style.is_visible() {
            zero_geometry(node);
            return;
        }
        let ArenaNode { item, children } = node;
        let state = &mut item.state;
        let _span = enter_span_if(self.scene.trace.layout, state);

        let style = state.style.clone();
        let uc = uc_for(&style, parent_uc, state.geom.alloc);

        // Children report first.
        let child_uc = uc.for_widget(uc.font_size, state.geom.alloc);
        for child in children.iter_mut() {
            self.size_up(child, &child_uc);
            item.state.merge_up(&mut child.item.state);
        }

        let state = &mut item.state;
        let mut content = combine_children(children, &style, &uc);

        let mut measure = MeasureCtx {
            shaper: &mut *self.shaper,
            uc: uc.clone(),
            widget_state: state,
        };
        let intrinsic = item.widget.intrinsic_size(&mut measure, None);
        content.width = content.width.max(intrinsic.width);
        content.height = content.height.max(intrinsic.height);

        let state = &mut item.state;
        state.geom.actual = style.clamp_size(content, &uc);
        let inset_widths = style.border.widths.to_dots(&uc);
        let padding = style.padding.to_dots(&uc);
        state.geom.inset = crate::style::Sides {
            top: padding.top + inset_widths.top,
            right: padding.right + inset_widths.right,
            bottom: padding.bottom + inset_widths.bottom,
            left: padding.left + inset_widths.left,
        };
        state.geom.margin = style.margin.to_dots(&uc);
        state.geom.total = state.geom.actual
            + state.geom.inset.size()
            + state.geom.margin.size();
        if state.geom.alloc == Size::ZERO {
            state.geom.alloc = state.geom.actual;
        }
    }

    // --- MARK: SIZE DOWN

    fn size_down(&mut self, node: &mut ArenaNode, parent_uc: &UnitContext) {
        let ArenaNode { item, children } = node;
        let state = &mut item.state;
        if !state.style.is_visible() {
            return;
        }
        let style = state.style.clone();
        let uc = uc_for(&style, parent_uc, state.geom.alloc);
        let avail = state.geom.alloc;

        distribute(children, &style, &uc, avail);

        // Redo hook: content whose size depends on the allocated width
        // re-measures against it.
        if item.widget.wants_size_redo(&style) {
            let mut measure = MeasureCtx {
                shaper: &mut *self.shaper,
                uc: uc.clone(),
                widget_state: &mut item.state,
            };
            let remeasured = item
                .widget
                .intrinsic_size(&mut measure, Some(avail.width.max(0.0)));
            let state = &mut item.state;
            let clamped = style.clamp_size(remeasured, &uc);
            if (clamped.height - state.geom.actual.height).abs() > 0.5
                || (clamped.width - state.geom.actual.width).abs() > 0.5
            {
                state.geom.actual = clamped;
                state.size_redo = true;
            }
        }

        let child_uc = uc.for_widget(uc.font_size, avail);
        for child in children.iter_mut() {
            if child.item.state.skip_layout {
                continue;
            }
            self.size_down(child, &child_uc);
            item.state.merge_up(&mut child.item.state);
        }
    }

    // --- MARK: SIZE FINAL

    fn size_final(&mut self, node: &mut ArenaNode, parent_uc: &UnitContext) {
        let ArenaNode { item, children } = node;
        if !item.state.style.is_visible() {
            return;
        }
        let style = item.state.style.clone();
        let uc = uc_for(&style, parent_uc, item.state.geom.alloc);

        let child_uc = uc.for_widget(uc.font_size, item.state.geom.alloc);
        for child in children.iter_mut() {
            self.size_final(child, &child_uc);
            item.state.merge_up(&mut child.item.state);
        }

        let state = &mut item.state;
        let content = combine_children(children, &style, &uc);
        state.geom.internal = Size::new(
            content.width.max(state.geom.actual.width),
            content.height.max(state.geom.actual.height),
        );

        for d in Dim::ALL {
            let has = style.overflow.dim(d).scrolls()
                && d.of_size(state.geom.internal) > d.of_size(state.geom.alloc) + 0.5;
            state.has_scroll.set_dim(d, has);
        }

        state.geom.total =
            state.geom.alloc + state.geom.inset.size() + state.geom.margin.size();
        state.geom.clamp_scroll();
        state.needs_layout = false;
    }
}

// --- MARK: COMBINE

/// Desired content extent of the visible children under a display mode.
fn combine_children(children: &[ArenaNode], style: &Style, uc: &UnitContext) -> Size {
    let kids: Vec<&ArenaNode> = children.iter().filter(|c| in_layout(c)).collect();
    if kids.is_empty() {
        return Size::ZERO;
    }
    let d = Dim::from(style.direction);
    let o = d.other();
    let gap_d = style.gap.dim(d).to_dots(uc);
    let gap_o = style.gap.dim(o).to_dots(uc);

    match style.display {
        Display::None => Size::ZERO,
        Display::Flex => {
            let mut main = 0.0_f64;
            let mut cross = 0.0_f64;
            for kid in &kids {
                let t = kid.item.state.geom.total;
                main += d.of_size(t);
                cross = cross.max(o.of_size(t));
            }
            main += gap_d * (kids.len() - 1) as f64;
            d.pack_size(main, cross)
        }
        Display::Stacked => {
            let mut size = Size::ZERO;
            for kid in &kids {
                let t = kid.item.state.geom.total;
                size.width = size.width.max(t.width);
                size.height = size.height.max(t.height);
            }
            size
        }
        Display::Grid => {
            let (widths, heights) = grid_tracks(&kids, style);
            let w: f64 = widths.iter().sum::<f64>() + gap_d * (widths.len().max(1) - 1) as f64;
            let h: f64 = heights.iter().sum::<f64>() + gap_o * (heights.len().max(1) - 1) as f64;
            Size::new(w, h)
        }
    }
}

/// Grid column widths and row heights from the children's desired sizes.
/// Columns come from the style, or `ceil(sqrt(n))`; rows follow.
fn grid_tracks(kids: &[&ArenaNode], style: &Style) -> (Vec<f64>, Vec<f64>) {
    let n = kids.len();
    let cols = if style.columns > 0 {
        style.columns
    } else {
        (n as f64).sqrt().ceil() as usize
    }
    .max(1);
    let rows = n.div_ceil(cols);
    let mut widths: Vec<f64> = vec![0.0; cols];
    let mut heights: Vec<f64> = vec![0.0; rows];
    for (i, kid) in kids.iter().enumerate() {
        let t = kid.item.state.geom.total;
        let (col, row) = (i % cols, i / cols);
        widths[col] = widths[col].max(t.width);
        heights[row] = heights[row].max(t.height);
    }
    (widths, heights)
}

// --- MARK: DISTRIBUTE

/// Grants children their allocations from `avail`, per the display mode.
fn distribute(children: &mut [ArenaNode], style: &Style, uc: &UnitContext, avail: Size) {
    let d = Dim::from(style.direction);
    let o = d.other();
    let gap_d = style.gap.dim(d).to_dots(uc);

    match style.display {
        Display::None => {}
        Display::Flex if !style.wrap => {
            let mut desired_main = 0.0_f64;
            let mut total_grow = 0.0_f64;
            let mut count = 0usize;
            for child in children.iter().filter(|c| in_layout(c)) {
                desired_main += d.of_size(child.item.state.geom.total);
                total_grow += child.item.state.style.grow.dim(d).max(0.0);
                count += 1;
            }
            if count == 0 {
                return;
            }
            let gaps = gap_d * (count - 1) as f64;
            // Positive leftover is distributed by grow weight; negative
            // leftover squeezes growable children (non-growable ones always
            // keep their size-up result).
            let leftover = d.of_size(avail) - desired_main - gaps;

            // Integer rounding: every granted main size is rounded, and the
            // last growable child absorbs the cumulative pixel residual so
            // the row still sums to the available extent.
            let last_growable = children
                .iter()
                .enumerate()
                .filter(|(_, c)| in_layout(c) && c.item.state.style.grow.dim(d) > 0.0)
                .map(|(i, _)| i)
                .next_back();
            let total_fixed: f64 = children
                .iter()
                .filter(|c| in_layout(c) && c.item.state.style.grow.dim(d) <= 0.0)
                .map(|c| d.of_size(c.item.state.geom.total))
                .sum();

            let distributing = total_grow > 0.0 && leftover != 0.0;
            let mut granted_sum = 0.0_f64;
            let mut fixed_seen = 0.0_f64;
            let n = children.len();
            for i in 0..n {
                if !in_layout(&children[i]) {
                    continue;
                }
                let child = &mut children[i];
                let desired = child.item.state.geom.total;
                let grow = child.item.state.style.grow.dim(d).max(0.0);
                let mut main = d.of_size(desired);
                if distributing && grow > 0.0 {
                    if Some(i) == last_growable {
                        // The last growable cell absorbs the cumulative
                        // pixel residual.
                        let trailing_fixed = total_fixed - fixed_seen;
                        main = d.of_size(avail) - gaps - granted_sum - trailing_fixed;
                    } else {
                        main = (main + leftover * grow / total_grow).round();
                    }
                } else if grow <= 0.0 {
                    fixed_seen += main;
                }
                let main = main.max(0.0);
                granted_sum += main;

                let cross = if child.item.state.style.grow.dim(o) > 0.0 {
                    o.of_size(avail).max(o.of_size(desired))
                } else {
                    o.of_size(desired)
                };
                grant(child, d.pack_size(main, cross));
            }
        }
        Display::Flex => {
            // Wrapped flex: no grow; children keep their desired sizes and
            // the position pass breaks them into lines.
            for child in children.iter_mut().filter(|c| in_layout(c)) {
                let desired = child.item.state.geom.total;
                grant(child, desired);
            }
        }
        Display::Stacked => {
            for child in children.iter_mut().filter(|c| in_layout(c)) {
                let desired = child.item.state.geom.total;
                let w = if child.item.state.style.grow.x > 0.0 {
                    avail.width.max(desired.width)
                } else {
                    desired.width
                };
                let h = if child.item.state.style.grow.y > 0.0 {
                    avail.height.max(desired.height)
                } else {
                    desired.height
                };
                grant(child, Size::new(w, h));
            }
        }
        Display::Grid => {
            let kids: Vec<&ArenaNode> = children.iter().filter(|c| in_layout(c)).collect();
            if kids.is_empty() {
                return;
            }
            let (mut widths, heights) = grid_tracks(&kids, style);
            let cols = widths.len();
            drop(kids);

            // Leftover width is split among columns containing a growable
            // cell.
            let used: f64 = widths.iter().sum::<f64>() + gap_d * (cols - 1) as f64;
            let leftover = avail.width - used;
            if leftover > 0.0 {
                let mut growable = vec![false; cols];
                let mut layout_index = 0usize;
                for child in children.iter().filter(|c| in_layout(c)) {
                    if child.item.state.style.grow.x > 0.0 {
                        growable[layout_index % cols] = true;
                    }
                    layout_index += 1;
                }
                let grow_count = growable.iter().filter(|g| **g).count();
                if grow_count > 0 {
                    let share = leftover / grow_count as f64;
                    for (col, is_growable) in growable.iter().enumerate() {
                        if *is_growable {
                            widths[col] += share;
                        }
                    }
                }
            }

            let mut layout_index = 0usize;
            for child in children.iter_mut().filter(|c| in_layout(c)) {
                let (col, row) = (layout_index % cols, layout_index / cols);
                layout_index += 1;
                grant(child, Size::new(widths[col], heights[row]));
            }
        }
    }
}

/// Sets a child's granted outer size, deriving its content allocation.
fn grant(child: &mut ArenaNode, total: Size) {
    let geom = &mut child.item.state.geom;
    geom.total = total;
    let non_content = geom.inset.size() + geom.margin.size();
    geom.alloc = Size::new(
        (total.width - non_content.width).max(0.0),
        (total.height - non_content.height).max(0.0),
    );
}

fn grant_root(root: &mut ArenaNode, scene_size: Size) {
    grant(root, scene_size);
}

// --- MARK: POSITION

fn position(node: &mut ArenaNode, parent_uc: &UnitContext) {
    let ArenaNode { item, children } = node;
    if !item.state.style.is_visible() {
        return;
    }
    let style = item.state.style.clone();
    let uc = uc_for(&style, parent_uc, item.state.geom.alloc);
    let avail = item.state.geom.alloc;
    let d = Dim::from(style.direction);
    let o = d.other();
    let gap_d = style.gap.dim(d).to_dots(&uc);
    let gap_o = style.gap.dim(o).to_dots(&uc);

    match style.display {
        Display::None => {}
        Display::Flex if !style.wrap => {
            let mut cursor = 0.0_f64;
            for child in children.iter_mut().filter(|c| in_layout(c)) {
                child.item.state.geom.rel_pos = d.pack_point(cursor, 0.0);
                cursor += d.of_size(child.item.state.geom.total) + gap_d;
            }
        }
        Display::Flex => {
            // Greedy line packing along the primary dimension.
            let mut main = 0.0_f64;
            let mut cross = 0.0_f64;
            let mut line_cross = 0.0_f64;
            let mut started = false;
            for child in children.iter_mut().filter(|c| in_layout(c)) {
                let t = child.item.state.geom.total;
                let extent = d.of_size(t);
                if started && main + gap_d + extent > d.of_size(avail) {
                    cross += line_cross + gap_o;
                    main = 0.0;
                    line_cross = 0.0;
                    started = false;
                }
                if started {
                    main += gap_d;
                }
                child.item.state.geom.rel_pos = d.pack_point(main, cross);
                main += extent;
                line_cross = line_cross.max(o.of_size(t));
                started = true;
            }
        }
        Display::Stacked => {
            for child in children.iter_mut().filter(|c| in_layout(c)) {
                child.item.state.geom.rel_pos = Point::ZERO;
            }
        }
        Display::Grid => {
            let kids: Vec<&ArenaNode> = children.iter().filter(|c| in_layout(c)).collect();
            if kids.is_empty() {
                return;
            }
            let (widths, heights) = grid_tracks(&kids, &style);
            let cols = widths.len();
            drop(kids);
            let mut layout_index = 0usize;
            for child in children.iter_mut().filter(|c| in_layout(c)) {
                let (col, row) = (layout_index % cols, layout_index / cols);
                layout_index += 1;
                let x: f64 = widths[..col].iter().sum::<f64>() + gap_d * col as f64;
                let y: f64 = heights[..row].iter().sum::<f64>() + gap_o * row as f64;
                child.item.state.geom.rel_pos = Point::new(x, y);
            }
        }
    }

    let child_uc = uc.for_widget(uc.font_size, avail);
    for child in children.iter_mut() {
        position(child, &child_uc);
    }
}

// --- MARK: SCENE POS

fn scene_pos(node: &mut ArenaNode, parent_origin: Point, parent_scroll: Vec2, parent_clip: Rect) {
    let ArenaNode { item, children } = node;
    let geom = &mut item.state.geom;

    if !item.state.style.is_visible() {
        geom.total_bbox = Rect::ZERO;
        geom.content_bbox = Rect::ZERO;
        for child in children.iter_mut() {
            scene_pos(child, parent_origin, parent_scroll, Rect::ZERO);
        }
        return;
    }

    geom.scene_pos = parent_origin + parent_scroll + geom.rel_pos.to_vec2();
    geom.total_bbox = intersect(geom.outer_rect(), parent_clip);
    geom.content_bbox = intersect(geom.content_rect(), geom.total_bbox);

    let origin = geom.content_origin();
    let scroll = geom.scroll;
    let clip = geom.content_bbox;

    // In a top-only stack, the covered children get empty bounding boxes:
    // they are neither painted nor hit.
    let style = &item.state.style;
    let stack_top_only = style.display == Display::Stacked && style.stack_top_only;
    let stack_top = item.state.stack_top;
    let mut layout_index = 0usize;
    for child in children.iter_mut() {
        let counted = !child.item.state.is_part;
        let suppressed = counted && stack_top_only && layout_index != stack_top;
        if counted {
            layout_index += 1;
        }
        let child_clip = if suppressed { Rect::ZERO } else { clip };
        scene_pos(child, origin, scroll, child_clip);
    }
}

/// Reruns scene positions only, after a scroll offset change.
pub(crate) fn run_scene_pos_pass(arena: &mut WidgetArena, scene_size: Size) {
    let scene_rect = Rect::from_origin_size(Point::ZERO, scene_size);
    scene_pos(arena.root_mut(), Point::ZERO, Vec2::ZERO, scene_rect);
}

// --- MARK: HELPERS

fn zero_geometry(node: &mut ArenaNode) {
    let state = &mut node.item.state;
    state.geom.actual = Size::ZERO;
    state.geom.alloc = Size::ZERO;
    state.geom.internal = Size::ZERO;
    state.geom.total = Size::ZERO;
    state.needs_layout = false;
    for child in &mut node.children {
        zero_geometry(child);
    }
}

fn clear_redo(node: &mut ArenaNode) {
    node.item.state.size_redo = false;
    for child in &mut node.children {
        clear_redo(child);
    }
}
