// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Value binding: both sync directions, the factory registry, the choice
//! mapping, and ability/state gating through bound switches.

use std::cell::RefCell;
use std::rc::Rc;

use assert_matches::assert_matches;
use thicket_core::bind::{
    BindRegistry, BindingError, Choice, Form, bind_bool, bind_choice, bind_string,
};
use thicket_core::style::StateFlags;
use thicket_core::testing::TestHarness;
use thicket_core::widgets::{Chooser, Frame, Label, Spinner, Switch, TextField};

#[test]
fn bound_switch_syncs_both_ways() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();
    let switch = harness
        .scene()
        .edit(|tree| tree.add_child(main, Switch::new()).unwrap());
    harness.run_frame();

    let value = Rc::new(RefCell::new(false));
    bind_bool(harness.scene(), switch, value.clone()).unwrap();

    // widget → value on change.
    harness.mouse_click_on(switch);
    assert!(*value.borrow());
    assert!(Switch::is_checked(harness.scene_ref(), switch));

    // value → widget on the next frame.
    *value.borrow_mut() = false;
    harness.run_frame();
    assert!(!Switch::is_checked(harness.scene_ref(), switch));
}

#[test]
fn bound_text_field_writes_back_on_change() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();
    let field = harness
        .scene()
        .edit(|tree| tree.add_child(main, TextField::new("start")).unwrap());
    harness.run_frame();

    let value = Rc::new(RefCell::new(String::from("start")));
    bind_string(harness.scene(), field, value.clone()).unwrap();

    harness.mouse_click_on(field);
    harness.type_char("!");
    assert_eq!(*value.borrow(), "start!");

    // External updates land while the field is unfocused.
    harness.mouse_click(kurbo::Point::new(390.0, 390.0));
    *value.borrow_mut() = String::from("reset");
    harness.run_frame();
    harness.run_frame();
    let text = harness
        .scene()
        .with_widget::<TextField, _>(field, |f, _| f.text().to_string())
        .unwrap();
    assert_eq!(text, "reset");
}

#[test]
fn binding_rejects_the_wrong_widget_type() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();
    let label = harness
        .scene()
        .edit(|tree| tree.add_child(main, Label::new("nope")).unwrap());

    let err = bind_bool(harness.scene(), label, Rc::new(RefCell::new(false))).unwrap_err();
    assert_matches!(err, BindingError::WidgetMismatch { .. });
}

#[test]
fn registry_builds_widgets_from_value_types() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();
    let registry = BindRegistry::with_defaults();

    let flag = Rc::new(RefCell::new(true));
    let number = Rc::new(RefCell::new(3.0_f64));
    let text = Rc::new(RefCell::new(String::from("hi")));

    let switch = registry.build(harness.scene(), main, flag).unwrap();
    let spinner = registry.build(harness.scene(), main, number).unwrap();
    let field = registry.build(harness.scene(), main, text).unwrap();
    harness.run_frame();

    assert!(
        harness
            .scene()
            .with_widget::<Switch, _>(switch, |_, _| ())
            .is_some()
    );
    assert!(
        harness
            .scene()
            .with_widget::<Spinner, _>(spinner, |_, _| ())
            .is_some()
    );
    assert!(
        harness
            .scene()
            .with_widget::<TextField, _>(field, |_, _| ())
            .is_some()
    );
    // The bound initial values arrived.
    assert!(Switch::is_checked(harness.scene_ref(), switch));

    // Unregistered value types are reported, not guessed.
    #[derive(Clone)]
    struct Mystery;
    let err = registry
        .build(harness.scene(), main, Rc::new(RefCell::new(Mystery)))
        .unwrap_err();
    assert_matches!(err, BindingError::Unregistered(_));
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Fruit {
    Apple,
    Apricot,
    Banana,
}

impl Choice for Fruit {
    fn variants() -> &'static [Self] {
        &[Self::Apple, Self::Apricot, Self::Banana]
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Apple => "apple",
            Self::Apricot => "apricot",
            Self::Banana => "banana",
        }
    }
}

#[test]
fn bound_chooser_tracks_the_selected_variant() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();
    let chooser = harness.scene().edit(|tree| {
        let labels: Vec<_> = Fruit::variants().iter().map(Choice::label).collect();
        tree.add_child(main, Chooser::new(labels)).unwrap()
    });
    harness.run_frame();

    let value = Rc::new(RefCell::new(Fruit::Apple));
    bind_choice(harness.scene(), chooser, value.clone()).unwrap();

    *value.borrow_mut() = Fruit::Banana;
    harness.run_frame();
    harness.run_frame();
    let selected = harness
        .scene()
        .with_widget::<Chooser, _>(chooser, |c, _| c.selected())
        .unwrap();
    assert_eq!(selected, 2);

    Chooser::select(harness.scene(), chooser, 1);
    harness.run_frame();
    assert_eq!(*value.borrow(), Fruit::Apricot);
}

#[test]
fn form_builds_labeled_rows_in_a_grid() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();
    let registry = Rc::new(BindRegistry::with_defaults());

    let name = Rc::new(RefCell::new(String::from("ada")));
    let admin = Rc::new(RefCell::new(false));

    let grid = Form::new()
        .field("name", registry.clone(), name)
        .field("admin", registry.clone(), admin)
        .build(harness.scene(), main)
        .unwrap();
    harness.run_frame();

    let children = harness.scene().edit(|tree| tree.children(grid));
    // Two rows of label + editor.
    assert_eq!(children.len(), 4);
    assert_eq!(
        harness
            .scene_ref()
            .widget_state(grid)
            .unwrap()
            .style()
            .columns,
        2
    );
    let _ = harness
        .scene()
        .with_widget::<Label, _>(children[0], |l, _| assert_eq!(l.text(), "name"))
        .unwrap();
}

#[test]
fn bound_switch_state_still_respects_gating() {
    // A bound value cannot force a state the ability set forbids: the
    // Checked bit is gated by Checkable, and a switch stripped of that
    // ability refuses the sync.
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();
    let switch = harness.scene().edit(|tree| {
        let switch = tree.add_child(main, Switch::new()).unwrap();
        tree.state_mut(switch).unwrap().final_styler(|s| {
            s.abilities.remove(thicket_core::style::Abilities::CHECKABLE);
        });
        switch
    });
    harness.run_frame();

    let value = Rc::new(RefCell::new(true));
    bind_bool(harness.scene(), switch, value).unwrap();
    harness.run_frame();
    harness.run_frame();

    assert!(
        !harness
            .scene_ref()
            .widget_state(switch)
            .unwrap()
            .style()
            .state(StateFlags::CHECKED)
    );
}
