// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Scene-level behavior: the update loop, async mutation, actions, stages,
//! and validation surfacing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use kurbo::Size;
use thicket_core::app::StageKind;
use thicket_core::style::StateFlags;
use thicket_core::testing::TestHarness;
use thicket_core::widgets::{Button, ButtonPressed, Frame, NodeBase, TextField};

#[test]
fn proxy_mutations_apply_on_the_next_frame() {
    let mut harness = TestHarness::create(Frame::new());
    let proxy = harness.scene_ref().proxy();
    let main = harness.scene_ref().main_id();

    proxy
        .update(move |scene| {
            scene.edit(|tree| tree.add_child(main, NodeBase).unwrap());
        })
        .unwrap();

    // Not yet visible: the queue drains at the top of the next tick.
    assert!(harness.scene().edit(|tree| tree.children(main)).is_empty());
    harness.run_frame();
    assert_eq!(harness.scene().edit(|tree| tree.children(main)).len(), 1);
}

#[test]
fn dropped_scene_reports_scene_gone() {
    let harness = TestHarness::create(Frame::new());
    let proxy = harness.scene_ref().proxy();
    assert!(proxy.is_alive());

    let ran = Arc::new(AtomicBool::new(false));
    drop(harness);

    assert!(!proxy.is_alive());
    let ran_in_closure = ran.clone();
    let result = proxy.update(move |_| {
        ran_in_closure.store(true, Ordering::SeqCst);
    });
    assert!(result.is_err());
    assert!(!ran.load(Ordering::SeqCst));
}

#[test]
fn actions_are_observed_in_submission_order() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();
    let (first, second) = harness.scene().edit(|tree| {
        let first = tree.add_child(main, Button::new("first")).unwrap();
        let second = tree.add_child(main, Button::new("second")).unwrap();
        (first, second)
    });
    harness.run_frame();

    harness.mouse_click_on(second);
    harness.mouse_click_on(first);

    assert_eq!(harness.pop_action_as::<ButtonPressed>().unwrap().0, second);
    assert_eq!(harness.pop_action_as::<ButtonPressed>().unwrap().0, first);
    assert!(harness.pop_action().is_none());
}

#[test]
fn resize_regrants_the_root() {
    let mut harness = TestHarness::create_with_size(Frame::new(), Size::new(200.0, 200.0));
    let main = harness.scene_ref().main_id();
    assert_eq!(harness.geometry(main).alloc, Size::new(200.0, 200.0));

    harness.scene().set_size(Size::new(321.0, 123.0));
    harness.run_frame();
    assert_eq!(harness.geometry(main).alloc, Size::new(321.0, 123.0));
}

#[test]
fn validation_failure_shows_a_snackbar_and_error_state() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();
    let field = harness.scene().edit(|tree| {
        let field = TextField::new("ok").with_validator(|text| {
            if text.contains('!') {
                Err("no exclamation marks".into())
            } else {
                Ok(())
            }
        });
        tree.add_child(main, field).unwrap()
    });
    harness.run_frame();

    harness.mouse_click_on(field);
    harness.type_char("!");

    assert!(
        harness
            .scene_ref()
            .widget_state(field)
            .unwrap()
            .style()
            .state(StateFlags::ERROR)
    );
    assert!(
        harness
            .scene_ref()
            .stages()
            .iter()
            .any(|s| s.kind == StageKind::Snackbar)
    );

    // Fixing the value clears the error; the snackbar times out on its own.
    harness.key_down(keyboard_types::Key::Backspace);
    assert!(
        !harness
            .scene_ref()
            .widget_state(field)
            .unwrap()
            .style()
            .state(StateFlags::ERROR)
    );
    harness.advance(Duration::from_secs(4));
    assert!(harness.scene_ref().stages().is_empty());
}

#[test]
fn snackbars_replace_each_other() {
    let mut harness = TestHarness::create(Frame::new());

    harness.scene().show_snackbar("one");
    harness.run_frame();
    harness.scene().show_snackbar("two");
    harness.run_frame();

    let snackbars: Vec<_> = harness
        .scene_ref()
        .stages()
        .iter()
        .filter(|s| s.kind == StageKind::Snackbar)
        .collect();
    assert_eq!(snackbars.len(), 1);
}

#[test]
fn stages_stack_and_close_from_the_top() {
    let mut harness = TestHarness::create(Frame::new());

    let first = harness
        .scene()
        .open_stage(
            StageKind::Popup,
            Button::new("a"),
            kurbo::Point::new(50.0, 50.0),
            None,
        )
        .unwrap();
    let second = harness
        .scene()
        .open_stage(
            StageKind::Popup,
            Button::new("b"),
            kurbo::Point::new(90.0, 90.0),
            None,
        )
        .unwrap();
    harness.run_frame();
    assert_eq!(harness.scene_ref().stages().len(), 2);

    harness.key_down(keyboard_types::Key::Escape);
    let remaining: Vec<_> = harness.scene_ref().stages().iter().map(|s| s.root).collect();
    assert_eq!(remaining, vec![first]);
    assert!(harness.scene_ref().widget_state(second).is_none());
}
