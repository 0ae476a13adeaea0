// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Scroll frames, scrollbars, and scroll-into-view.

use float_cmp::assert_approx_eq;
use kurbo::{Point, Size, Vec2};
use thicket_core::core::WidgetId;
use thicket_core::style::Length;
use thicket_core::testing::TestHarness;
use thicket_core::widgets::{Frame, ScrollBar};

/// A 100×200 scrollable frame holding 1000 dots of content.
fn scroll_fixture() -> (TestHarness, WidgetId, WidgetId) {
    let mut harness = TestHarness::create_with_size(Frame::new(), Size::new(300.0, 300.0));
    let main = harness.scene_ref().main_id();

    let (frame, content) = harness.scene().edit(|tree| {
        let frame = tree.add_child(main, Frame::scrollable()).unwrap();
        tree.state_mut(frame).unwrap().styler(|s| {
            s.min.x = Length::Px(100.0);
            s.max.x = Length::Px(100.0);
            s.min.y = Length::Px(200.0);
            s.max.y = Length::Px(200.0);
        });
        let content = tree.add_child(frame, Frame::new()).unwrap();
        tree.state_mut(content).unwrap().styler(|s| {
            s.min.x = Length::Px(80.0);
            s.min.y = Length::Px(1000.0);
        });
        (frame, content)
    });
    harness.run_frame();
    harness.run_frame();
    (harness, frame, content)
}

#[test]
fn overflow_auto_materializes_a_scrollbar() {
    let (mut harness, frame, _) = scroll_fixture();

    let bar = harness
        .scene()
        .edit(|tree| tree.find_path(frame, "scrollbar-y"))
        .expect("vertical scrollbar part exists");
    let (visible_pct, effective_max) = harness
        .scene()
        .with_widget::<ScrollBar, _>(bar, |bar, _| {
            (bar.core().visible_pct, bar.core().effective_max())
        })
        .unwrap();

    assert_approx_eq!(f64, visible_pct, 0.2);
    assert_approx_eq!(f64, effective_max, 0.8);

    // No horizontal overflow, no horizontal bar.
    assert!(
        harness
            .scene()
            .edit(|tree| tree.find_path(frame, "scrollbar-x"))
            .is_err()
    );
}

#[test]
fn thumb_length_is_proportional_but_clamped() {
    let (mut harness, frame, _) = scroll_fixture();
    let bar = harness
        .scene()
        .edit(|tree| tree.find_path(frame, "scrollbar-y"))
        .unwrap();

    let min_thumb = harness.scene_ref().settings().scrollbar_min_thumb;
    let thumb = harness
        .scene()
        .with_widget::<ScrollBar, _>(bar, |bar, _| bar.thumb_length(200.0))
        .unwrap();
    assert_approx_eq!(f64, thumb, 40.0);
    assert!(thumb >= min_thumb);

    // A tiny visible fraction clamps to the configured minimum.
    let clamped = harness
        .scene()
        .with_widget::<ScrollBar, _>(bar, |bar, _| {
            bar.core_mut().visible_pct = 0.01;
            bar.thumb_length(200.0)
        })
        .unwrap();
    assert_approx_eq!(f64, clamped, min_thumb);
}

#[test]
fn wheel_scroll_moves_content_and_syncs_the_thumb() {
    let (mut harness, frame, _) = scroll_fixture();

    let center = harness.geometry(frame).total_bbox.center();
    harness.scroll_at(center, Vec2::new(0.0, 400.0));

    assert_approx_eq!(f64, harness.geometry(frame).scroll.y, -400.0);

    let bar = harness
        .scene()
        .edit(|tree| tree.find_path(frame, "scrollbar-y"))
        .unwrap();
    let value = harness
        .scene()
        .with_widget::<ScrollBar, _>(bar, |bar, _| bar.core().value)
        .unwrap();
    assert_approx_eq!(f64, value, 0.4);
}

#[test]
fn scroll_is_clamped_to_the_content_end() {
    let (mut harness, frame, _) = scroll_fixture();

    let center = harness.geometry(frame).total_bbox.center();
    harness.scroll_at(center, Vec2::new(0.0, 10_000.0));
    assert_approx_eq!(f64, harness.geometry(frame).scroll.y, -800.0);

    harness.scroll_at(center, Vec2::new(0.0, -20_000.0));
    assert_approx_eq!(f64, harness.geometry(frame).scroll.y, 0.0);
}

#[test]
fn sliding_the_frame_scrolls_inverted_and_scaled() {
    let (mut harness, frame, _) = scroll_fixture();

    let center = harness.geometry(frame).total_bbox.center();
    harness.mouse_move(center);
    harness.mouse_drag_by(Vec2::new(0.0, -100.0));

    let factor = harness.scene_ref().settings().slide_scroll_factor;
    assert_approx_eq!(f64, harness.geometry(frame).scroll.y, -100.0 * factor);
}

#[test]
fn scroll_to_widget_brings_the_target_into_view() {
    let (mut harness, frame, content) = scroll_fixture();

    // A marker far down the content.
    let marker = harness.scene().edit(|tree| {
        // The content column stacks children top to bottom.
        tree.state_mut(content)
            .unwrap()
            .styler(|s| s.direction = thicket_core::style::Direction::Column);
        let spacer = tree.add_child(content, Frame::new()).unwrap();
        tree.state_mut(spacer)
            .unwrap()
            .styler(|s| s.min.y = Length::Px(900.0));
        let marker = tree.add_child(content, Frame::new()).unwrap();
        tree.state_mut(marker).unwrap().styler(|s| {
            s.min.y = Length::Px(20.0);
            s.min.x = Length::Px(20.0);
        });
        marker
    });
    harness.run_frame();
    harness.run_frame();

    assert!(!harness
        .geometry(frame)
        .content_bbox
        .contains(Point::new(
            harness.geometry(marker).outer_rect().center().x,
            harness.geometry(marker).outer_rect().center().y,
        )));

    thicket_core::scroll::scroll_to_widget(harness.scene(), marker);
    harness.run_frame();

    let frame_box = harness.geometry(frame).content_bbox;
    let marker_box = harness.geometry(marker).total_bbox;
    assert!(marker_box.y0 >= frame_box.y0 - 0.5);
    assert!(marker_box.y1 <= frame_box.y1 + 0.5);
    assert!(harness.geometry(frame).scroll.y < 0.0);
}
