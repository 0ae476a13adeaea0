// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Event dispatch: clicks and actions, hover synthesis, handled-flag
//! semantics, long gestures, stages, and handler panics.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use kurbo::Point;
use thicket_core::app::StageKind;
use thicket_core::core::EventType;
use thicket_core::style::{Length, StateFlags};
use thicket_core::testing::TestHarness;
use thicket_core::widgets::{Button, ButtonPressed, Frame, Slider};

#[test]
fn click_emits_the_button_action() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();
    let button = harness
        .scene()
        .edit(|tree| tree.add_child(main, Button::new("go")).unwrap());
    harness.run_frame();

    assert!(harness.pop_action().is_none());
    harness.mouse_click_on(button);
    let (id, _) = harness.pop_action_as::<ButtonPressed>().unwrap();
    assert_eq!(id, button);
}

#[test]
fn hover_path_diff_synthesizes_enter_and_leave() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();
    let (left, right) = harness.scene().edit(|tree| {
        let left = tree.add_child(main, Button::new("left")).unwrap();
        let right = tree.add_child(main, Button::new("right")).unwrap();
        (left, right)
    });
    harness.run_frame();

    let log = Rc::new(RefCell::new(Vec::new()));
    for (id, name) in [(left, "left"), (right, "right")] {
        let enters = log.clone();
        let leaves = log.clone();
        harness.scene().edit(|tree| {
            let state = tree.state_mut(id).unwrap();
            state.on(EventType::MouseEnter, move |_, _| {
                enters.borrow_mut().push(format!("enter {name}"));
            });
            state.on(EventType::MouseLeave, move |_, _| {
                leaves.borrow_mut().push(format!("leave {name}"));
            });
        });
    }

    let left_center = harness.geometry(left).total_bbox.center();
    let right_center = harness.geometry(right).total_bbox.center();

    harness.mouse_move(left_center);
    assert!(
        harness
            .scene_ref()
            .widget_state(left)
            .unwrap()
            .style()
            .state(StateFlags::HOVERED)
    );

    harness.mouse_move(right_center);
    assert!(
        !harness
            .scene_ref()
            .widget_state(left)
            .unwrap()
            .style()
            .state(StateFlags::HOVERED)
    );
    assert_eq!(
        *log.borrow(),
        ["enter left", "leave left", "enter right"].map(String::from)
    );
}

#[test]
fn active_state_follows_the_press() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();
    let button = harness
        .scene()
        .edit(|tree| tree.add_child(main, Button::new("press")).unwrap());
    harness.run_frame();

    harness.mouse_move(harness.geometry(button).total_bbox.center());
    harness.mouse_down();
    assert!(
        harness
            .scene_ref()
            .widget_state(button)
            .unwrap()
            .style()
            .state(StateFlags::ACTIVE)
    );
    harness.mouse_up();
    assert!(
        !harness
            .scene_ref()
            .widget_state(button)
            .unwrap()
            .style()
            .state(StateFlags::ACTIVE)
    );
}

#[test]
fn listeners_fire_in_order_and_handled_stops_later_ones() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();
    let button = harness
        .scene()
        .edit(|tree| tree.add_child(main, Button::new("x")).unwrap());
    harness.run_frame();

    let log = Rc::new(RefCell::new(Vec::new()));
    harness.scene().edit(|tree| {
        let state = tree.state_mut(button).unwrap();
        let first = log.clone();
        state.on(EventType::Click, move |_, event| {
            first.borrow_mut().push("first");
            event.set_handled();
        });
        let second = log.clone();
        state.on(EventType::Click, move |_, _| {
            second.borrow_mut().push("second");
        });
    });
    // An ancestor's normal listener is skipped for handled events, its
    // final-phase listener is not.
    harness.scene().edit(|tree| {
        let state = tree.state_mut(main).unwrap();
        let normal = log.clone();
        state.on(EventType::Click, move |_, _| {
            normal.borrow_mut().push("ancestor normal");
        });
        let late = log.clone();
        state.on_final(EventType::Click, move |_, _| {
            late.borrow_mut().push("ancestor final");
        });
    });

    harness.mouse_click_on(button);
    assert_eq!(*log.borrow(), ["first", "ancestor final"].map(String::from));
}

#[test]
fn long_press_fires_instead_of_click() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();
    let target = harness.scene().edit(|tree| {
        let target = tree.add_child(main, Frame::new()).unwrap();
        tree.state_mut(target).unwrap().styler(|s| {
            s.min.x = Length::Px(60.0);
            s.min.y = Length::Px(60.0);
            s.abilities |= thicket_core::style::Abilities::ACTIVATABLE
                | thicket_core::style::Abilities::LONG_PRESSABLE;
        });
        target
    });
    harness.run_frame();

    let log = Rc::new(RefCell::new(Vec::new()));
    harness.scene().edit(|tree| {
        let state = tree.state_mut(target).unwrap();
        for kind in [
            EventType::Click,
            EventType::LongPressStart,
            EventType::LongPressEnd,
        ] {
            let log = log.clone();
            state.on(kind, move |_, event| {
                log.borrow_mut().push(event.kind);
            });
        }
    });

    // Held past the deadline: a long press, no click.
    harness.mouse_move(harness.geometry(target).total_bbox.center());
    harness.mouse_down();
    harness.advance(Duration::from_millis(600));
    harness.mouse_up();
    assert_eq!(
        *log.borrow(),
        [EventType::LongPressStart, EventType::LongPressEnd]
    );

    // Released before the deadline: a click.
    log.borrow_mut().clear();
    harness.mouse_down();
    harness.advance(Duration::from_millis(100));
    harness.mouse_up();
    assert_eq!(*log.borrow(), [EventType::Click]);
}

#[test]
fn long_hover_opens_a_tooltip_and_motion_closes_it() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();
    let button = harness.scene().edit(|tree| {
        tree.add_child(main, Button::new("save").with_tooltip("Saves the file"))
            .unwrap()
    });
    harness.run_frame();

    harness.mouse_move(harness.geometry(button).total_bbox.center());
    assert!(harness.scene_ref().stages().is_empty());

    harness.advance(Duration::from_millis(600));
    let stages = harness.scene_ref().stages();
    assert_eq!(stages.len(), 1);
    assert_eq!(stages[0].kind, StageKind::Tooltip);
    assert!(
        harness
            .scene_ref()
            .widget_state(button)
            .unwrap()
            .style()
            .state(StateFlags::LONG_HOVERED)
    );

    // Motion ends the long hover and closes the tooltip.
    harness.mouse_move(Point::new(5.0, 5.0));
    assert!(harness.scene_ref().stages().is_empty());
}

#[test]
fn escape_and_outside_clicks_dismiss_the_top_stage() {
    let mut harness = TestHarness::create(Frame::new());

    let popup = harness
        .scene()
        .open_stage(
            StageKind::Popup,
            Button::new("inside"),
            Point::new(100.0, 100.0),
            None,
        )
        .unwrap();
    harness.run_frame();
    assert_eq!(harness.scene_ref().stages().len(), 1);

    // Escape closes.
    harness.key_down(keyboard_types::Key::Escape);
    assert!(harness.scene_ref().stages().is_empty());
    assert!(harness.scene_ref().widget_state(popup).is_none());

    // An outside click closes too, and is consumed.
    harness
        .scene()
        .open_stage(
            StageKind::Popup,
            Button::new("inside"),
            Point::new(100.0, 100.0),
            None,
        )
        .unwrap();
    harness.run_frame();
    harness.mouse_click(Point::new(390.0, 390.0));
    assert!(harness.scene_ref().stages().is_empty());
}

#[test]
fn slider_slide_and_keys_change_the_value() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();
    let slider = harness.scene().edit(|tree| {
        tree.add_child(main, Slider::new(0.0, 10.0, 5.0)).unwrap()
    });
    harness.run_frame();

    let value = |harness: &mut TestHarness| {
        harness
            .scene()
            .with_widget::<Slider, _>(slider, |s, _| s.value())
            .unwrap()
    };
    assert_eq!(value(&mut harness), 5.0);

    // Slide right across half the track.
    let geom = harness.geometry(slider);
    harness.mouse_move(geom.total_bbox.center());
    harness.mouse_drag_by(kurbo::Vec2::new(geom.alloc.width / 2.0, 0.0));
    assert!(value(&mut harness) > 5.0);

    harness.mouse_click_on(slider);
    harness.key_down(keyboard_types::Key::ArrowLeft);
    let before = value(&mut harness);
    harness.key_down(keyboard_types::Key::ArrowRight);
    assert!(value(&mut harness) > before);
}

#[test]
fn panicking_handlers_are_caught_and_mark_the_event_handled() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();
    let button = harness
        .scene()
        .edit(|tree| tree.add_child(main, Button::new("boom")).unwrap());
    harness.run_frame();

    let reached = Rc::new(RefCell::new(false));
    harness.scene().edit(|tree| {
        let state = tree.state_mut(button).unwrap();
        state.on(EventType::Click, |_, _| panic!("handler exploded"));
        let reached = reached.clone();
        state.on(EventType::Click, move |_, _| {
            *reached.borrow_mut() = true;
        });
    });

    harness.mouse_click_on(button);
    // The scene survived and the storm stopped at the panicking listener.
    assert!(!*reached.borrow());
    harness.mouse_move(Point::new(1.0, 1.0));
}
