// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Layout engine behavior: growth, rounding, splits, grids, wrapping, and
//! the bounding-box containment invariant.

use kurbo::{Rect, Size};
use thicket_core::core::WidgetId;
use thicket_core::style::Length;
use thicket_core::testing::TestHarness;
use thicket_core::widgets::{Frame, Label, Splits};

fn widths(harness: &TestHarness, ids: &[WidgetId]) -> Vec<f64> {
    ids.iter()
        .map(|id| {
            harness
                .scene_ref()
                .widget_state(*id)
                .unwrap()
                .geometry()
                .alloc
                .width
        })
        .collect()
}

/// A fixed-size horizontal box to lay children out in.
fn fixed_box(width: f64, height: f64) -> impl Fn(&mut thicket_core::style::Style) {
    move |s| {
        s.min.x = Length::Px(width);
        s.max.x = Length::Px(width);
        s.min.y = Length::Px(height);
        s.max.y = Length::Px(height);
    }
}

#[test]
fn splits_round_with_last_cell_absorbing_residual() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();

    let (splits_id, cells) = harness.scene().edit(|tree| {
        let splits_id = tree.add_child(main, Splits::new()).unwrap();
        tree.state_mut(splits_id)
            .unwrap()
            .styler(fixed_box(100.0, 40.0));
        let mut cells = Vec::new();
        for _ in 0..3 {
            let cell = Splits::add_item(tree, splits_id, Frame::new()).unwrap();
            tree.state_mut(cell)
                .unwrap()
                .styler(|s| s.min.x = Length::Px(20.0));
            cells.push(cell);
        }
        (splits_id, cells)
    });
    harness.run_frame();

    assert_eq!(
        harness.geometry(splits_id).alloc,
        Size::new(100.0, 40.0)
    );
    assert_eq!(widths(&harness, &cells), [33.0, 33.0, 34.0]);

    // Collapsing the middle split makes it invisible and renormalizes.
    harness.scene().edit(|tree| {
        Splits::set_splits(tree, splits_id, vec![1.0, 0.0, 1.0]);
    });
    harness.run_frame();

    assert_eq!(widths(&harness, &cells), [50.0, 0.0, 50.0]);
}

#[test]
fn non_growable_children_keep_their_size_up_result() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();

    let (fixed, greedy) = harness.scene().edit(|tree| {
        let row = tree.add_child(main, Frame::new()).unwrap();
        tree.state_mut(row).unwrap().styler(fixed_box(200.0, 40.0));
        let fixed = tree.add_child(row, Frame::new()).unwrap();
        tree.state_mut(fixed)
            .unwrap()
            .styler(|s| s.min.x = Length::Px(30.0));
        let greedy = tree.add_child(row, Frame::new()).unwrap();
        tree.state_mut(greedy).unwrap().styler(|s| s.grow.x = 1.0);
        (fixed, greedy)
    });
    harness.run_frame();

    assert_eq!(widths(&harness, &[fixed, greedy]), [30.0, 170.0]);
}

#[test]
fn negative_grow_is_treated_as_zero() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();

    let (a, b) = harness.scene().edit(|tree| {
        let row = tree.add_child(main, Frame::new()).unwrap();
        tree.state_mut(row).unwrap().styler(fixed_box(100.0, 20.0));
        let a = tree.add_child(row, Frame::new()).unwrap();
        tree.state_mut(a).unwrap().styler(|s| {
            s.min.x = Length::Px(10.0);
            s.grow.x = -5.0;
        });
        let b = tree.add_child(row, Frame::new()).unwrap();
        tree.state_mut(b).unwrap().styler(|s| {
            s.min.x = Length::Px(10.0);
            s.grow.x = 1.0;
        });
        (a, b)
    });
    harness.run_frame();

    assert_eq!(widths(&harness, &[a, b]), [10.0, 90.0]);
}

#[test]
fn grid_defaults_to_square_and_sizes_tracks_by_max() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();

    // Five children: ceil(sqrt(5)) == 3 columns, 2 rows.
    let cells = harness.scene().edit(|tree| {
        let grid = tree.add_child(main, Frame::new()).unwrap();
        tree.state_mut(grid)
            .unwrap()
            .styler(|s| s.display = thicket_core::style::Display::Grid);
        let mut cells = Vec::new();
        for i in 0..5 {
            let cell = tree.add_child(grid, Frame::new()).unwrap();
            let w = 10.0 + i as f64 * 5.0;
            tree.state_mut(cell).unwrap().styler(move |s| {
                s.min.x = Length::Px(w);
                s.min.y = Length::Px(10.0);
            });
            cells.push(cell);
        }
        cells
    });
    harness.run_frame();

    // Column widths are the max of their members: col0 = max(10, 25) = 25,
    // col1 = max(15, 30) = 30, col2 = 20.
    let x: Vec<f64> = cells
        .iter()
        .map(|id| harness.geometry(*id).rel_pos.x)
        .collect();
    assert_eq!(x[0], 0.0);
    assert_eq!(x[1], 25.0);
    assert_eq!(x[2], 55.0);
    assert_eq!(x[3], 0.0);
    assert_eq!(x[4], 25.0);
    // Second row starts below the first row's tallest cell.
    assert_eq!(harness.geometry(cells[3]).rel_pos.y, 10.0);
}

#[test]
fn wrapped_flex_breaks_lines_greedily() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();

    let cells = harness.scene().edit(|tree| {
        let row = tree.add_child(main, Frame::new()).unwrap();
        tree.state_mut(row).unwrap().styler(|s| {
            s.wrap = true;
            s.max.x = Length::Px(70.0);
            s.min.x = Length::Px(70.0);
        });
        let mut cells = Vec::new();
        for _ in 0..3 {
            let cell = tree.add_child(row, Frame::new()).unwrap();
            tree.state_mut(cell).unwrap().styler(|s| {
                s.min.x = Length::Px(30.0);
                s.min.y = Length::Px(10.0);
            });
            cells.push(cell);
        }
        cells
    });
    harness.run_frame();

    // Two fit per 70px line; the third wraps.
    assert_eq!(harness.geometry(cells[0]).rel_pos.y, 0.0);
    assert_eq!(harness.geometry(cells[1]).rel_pos.y, 0.0);
    assert_eq!(harness.geometry(cells[2]).rel_pos.y, 10.0);
    assert_eq!(harness.geometry(cells[2]).rel_pos.x, 0.0);
}

#[test]
fn text_wrap_converges_through_size_down_redo() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();

    let label = harness.scene().edit(|tree| {
        let column = tree.add_child(main, Frame::new()).unwrap();
        tree.state_mut(column).unwrap().styler(fixed_box(60.0, 200.0));
        let label = tree
            .add_child(column, Label::new("aaaaaaaaaaaaaaaaaaaa"))
            .unwrap();
        tree.state_mut(label).unwrap().styler(|s| {
            s.text_wrap = true;
            s.grow.x = 1.0;
        });
        label
    });
    harness.run_frame();
    harness.run_frame();

    let geom = harness.geometry(label);
    // 20 glyphs at 8 dots each do not fit one 60-dot line.
    assert!(geom.actual.height > 20.0, "wrapped text must be multi-line");
    assert!(geom.actual.width <= 60.0 + 1.0);
}

#[test]
fn bounding_boxes_nest_within_ancestors() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();

    let ids = harness.scene().edit(|tree| {
        let outer = tree.add_child(main, Frame::new()).unwrap();
        tree.state_mut(outer).unwrap().styler(fixed_box(100.0, 100.0));
        let inner = tree.add_child(outer, Frame::new()).unwrap();
        tree.state_mut(inner).unwrap().styler(fixed_box(300.0, 300.0));
        let leaf = tree.add_child(inner, Frame::new()).unwrap();
        tree.state_mut(leaf).unwrap().styler(fixed_box(20.0, 20.0));
        vec![outer, inner, leaf]
    });
    harness.run_frame();

    let contains = |outer: Rect, inner: Rect| {
        inner.width() == 0.0
            || (inner.x0 >= outer.x0
                && inner.y0 >= outer.y0
                && inner.x1 <= outer.x1
                && inner.y1 <= outer.y1)
    };
    for pair in ids.windows(2) {
        let parent = harness.geometry(pair[0]);
        let child = harness.geometry(pair[1]);
        assert!(contains(parent.content_bbox, child.total_bbox));
        assert!(contains(child.total_bbox, child.content_bbox));
    }
}

#[test]
fn invisible_children_take_no_space() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();

    let (row, hidden, shown) = harness.scene().edit(|tree| {
        let row = tree.add_child(main, Frame::new()).unwrap();
        let hidden = tree.add_child(row, Frame::new()).unwrap();
        tree.state_mut(hidden).unwrap().styler(|s| {
            s.min.x = Length::Px(50.0);
            s.states |= thicket_core::style::StateFlags::INVISIBLE;
        });
        let shown = tree.add_child(row, Frame::new()).unwrap();
        tree.state_mut(shown)
            .unwrap()
            .styler(|s| s.min.x = Length::Px(50.0));
        (row, hidden, shown)
    });
    harness.run_frame();

    assert_eq!(harness.geometry(hidden).alloc, Size::ZERO);
    assert!(harness.geometry(hidden).is_clipped_out());
    // The visible sibling starts at the row origin.
    assert_eq!(harness.geometry(shown).rel_pos.x, 0.0);
    let _ = row;
}
