// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Style cascade behavior observed through the scene: inheritance, styler
//! order, effective backgrounds, and state-driven restyling.

use peniko::Color;
use thicket_core::style::{Background, Length, StateFlags};
use thicket_core::testing::TestHarness;
use thicket_core::widgets::{Frame, Label};

#[test]
fn font_metrics_inherit_and_em_resolves_against_them() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();

    let label = harness.scene().edit(|tree| {
        let outer = tree.add_child(main, Frame::new()).unwrap();
        tree.state_mut(outer)
            .unwrap()
            .styler(|s| s.font.size = Length::Px(20.0));
        let label = tree.add_child(outer, Label::new("hi")).unwrap();
        label
    });
    harness.run_frame();

    // The label inherits the 20-dot font; the fixed test shaper advances
    // half the font size per glyph.
    let geom = harness.geometry(label);
    assert_eq!(geom.actual.width, 2.0 * 10.0);
}

#[test]
fn stylers_apply_in_order_and_final_stylers_last() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();

    let frame = harness.scene().edit(|tree| {
        let frame = tree.add_child(main, Frame::new()).unwrap();
        let state = tree.state_mut(frame).unwrap();
        state.styler(|s| s.opacity = 0.2);
        state.styler(|s| s.opacity = 0.6);
        state.final_styler(|s| s.opacity = s.opacity / 2.0);
        frame
    });
    harness.run_frame();

    let style = harness.scene_ref().widget_state(frame).unwrap().style().clone();
    assert_eq!(style.opacity, 0.3);
}

#[test]
fn translucent_backgrounds_composite_against_nearest_opaque_ancestor() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();

    let (middle, inner) = harness.scene().edit(|tree| {
        let outer = tree.add_child(main, Frame::new()).unwrap();
        tree.state_mut(outer).unwrap().styler(|s| {
            s.background = Some(Background::Color(Color::rgb8(0, 0, 255)));
        });
        // The middle layer is translucent, so the inner layer must composite
        // against the outer opaque blue, not against the middle itself.
        let middle = tree.add_child(outer, Frame::new()).unwrap();
        tree.state_mut(middle).unwrap().styler(|s| {
            s.background = Some(Background::Color(Color::rgba8(255, 255, 255, 128)));
        });
        let inner = tree.add_child(middle, Frame::new()).unwrap();
        (middle, inner)
    });
    harness.run_frame();

    let middle_actual = harness
        .scene_ref()
        .widget_state(middle)
        .unwrap()
        .style()
        .actual_background;
    assert_eq!(middle_actual.a, 255);
    assert!(middle_actual.b > 100 && middle_actual.b < 155);
    assert!(middle_actual.r > 100 && middle_actual.r < 155);

    // A child with no background of its own sees the composite.
    let inner_actual = harness
        .scene_ref()
        .widget_state(inner)
        .unwrap()
        .style()
        .actual_background;
    assert_eq!(inner_actual, middle_actual);
}

#[test]
fn hover_restyles_without_moving_geometry() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();

    let button = harness.scene().edit(|tree| {
        tree.add_child(main, thicket_core::widgets::Button::new("hover me"))
            .unwrap()
    });
    harness.run_frame();

    let before = harness.geometry(button);
    harness.mouse_move(before.total_bbox.center());
    assert!(
        harness
            .scene_ref()
            .widget_state(button)
            .unwrap()
            .style()
            .state(StateFlags::HOVERED)
    );
    let after = harness.geometry(button);
    assert_eq!(before.total_bbox, after.total_bbox);
    assert_eq!(before.alloc, after.alloc);
}

#[test]
fn layout_relevant_style_changes_relayout() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();

    let frame = harness.scene().edit(|tree| {
        let frame = tree.add_child(main, Frame::new()).unwrap();
        tree.state_mut(frame)
            .unwrap()
            .styler(|s| s.min.x = Length::Px(10.0));
        frame
    });
    harness.run_frame();
    assert_eq!(harness.geometry(frame).alloc.width, 10.0);

    harness.scene().edit(|tree| {
        tree.state_mut(frame)
            .unwrap()
            .styler(|s| s.min.x = Length::Px(42.0));
    });
    harness.run_frame();
    assert_eq!(harness.geometry(frame).alloc.width, 42.0);
}

#[test]
fn restyle_epoch_recomputes_everything() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();
    let label = harness
        .scene()
        .edit(|tree| tree.add_child(main, Label::new("dpi")).unwrap());
    harness.run_frame();
    let before = harness.geometry(label).actual;

    // Doubling the DPI rescales every resolved length on the rebuild path.
    harness.scene().set_dpi(192.0);
    harness.run_frame();
    let after = harness.geometry(label).actual;
    assert!(after.width > before.width * 1.5);
}
