// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Key focus: click-to-focus, Tab order, arrow navigation, and focus-name
//! typeahead.

use std::time::Duration;

use keyboard_types::{Key, Modifiers};
use thicket_core::core::WidgetId;
use thicket_core::style::StateFlags;
use thicket_core::testing::TestHarness;
use thicket_core::widgets::{Button, Frame};

fn fruit_fixture() -> (TestHarness, Vec<WidgetId>) {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();
    let buttons = harness.scene().edit(|tree| {
        ["apple", "apricot", "banana"]
            .into_iter()
            .map(|label| tree.add_child(main, Button::new(label)).unwrap())
            .collect::<Vec<_>>()
    });
    harness.run_frame();
    harness.run_frame();
    (harness, buttons)
}

#[test]
fn click_focuses_and_click_away_clears() {
    let (mut harness, buttons) = fruit_fixture();

    harness.mouse_click_on(buttons[0]);
    assert_eq!(harness.scene_ref().focused_widget(), Some(buttons[0]));
    assert!(
        harness
            .scene_ref()
            .widget_state(buttons[0])
            .unwrap()
            .style()
            .state(StateFlags::FOCUSED)
    );

    // Clicking empty space clears focus.
    harness.mouse_click(kurbo::Point::new(380.0, 380.0));
    assert_eq!(harness.scene_ref().focused_widget(), None);
    assert!(
        !harness
            .scene_ref()
            .widget_state(buttons[0])
            .unwrap()
            .style()
            .state(StateFlags::FOCUSED)
    );
}

#[test]
fn focused_within_marks_the_ancestor_chain() {
    let (mut harness, buttons) = fruit_fixture();
    let main = harness.scene_ref().main_id();

    harness.mouse_click_on(buttons[1]);
    let main_style = harness.scene_ref().widget_state(main).unwrap().style().clone();
    assert!(main_style.state(StateFlags::FOCUSED_WITHIN));
    assert!(!main_style.state(StateFlags::FOCUSED));
}

#[test]
fn tab_moves_in_dfs_order_and_wraps() {
    let (mut harness, buttons) = fruit_fixture();

    harness.key_down(Key::Tab);
    assert_eq!(harness.scene_ref().focused_widget(), Some(buttons[0]));
    harness.key_down(Key::Tab);
    assert_eq!(harness.scene_ref().focused_widget(), Some(buttons[1]));
    harness.key_down(Key::Tab);
    assert_eq!(harness.scene_ref().focused_widget(), Some(buttons[2]));
    harness.key_down(Key::Tab);
    assert_eq!(harness.scene_ref().focused_widget(), Some(buttons[0]));

    harness.key_down_with(Key::Tab, Modifiers::SHIFT);
    assert_eq!(harness.scene_ref().focused_widget(), Some(buttons[2]));
}

#[test]
fn arrows_follow_the_flex_direction() {
    let (mut harness, buttons) = fruit_fixture();

    harness.mouse_click_on(buttons[0]);
    harness.key_down(Key::ArrowRight);
    assert_eq!(harness.scene_ref().focused_widget(), Some(buttons[1]));
    harness.key_down(Key::ArrowLeft);
    assert_eq!(harness.scene_ref().focused_widget(), Some(buttons[0]));

    // The cross-direction arrows do not navigate a row.
    harness.key_down(Key::ArrowDown);
    assert_eq!(harness.scene_ref().focused_widget(), Some(buttons[0]));
    // Nor does navigation run off the ends.
    harness.key_down(Key::ArrowLeft);
    assert_eq!(harness.scene_ref().focused_widget(), Some(buttons[0]));
}

#[test]
fn typeahead_matches_prefixes_with_first_match_tiebreak() {
    let (mut harness, buttons) = fruit_fixture();

    // "a" matches apple first.
    harness.type_char("a");
    assert_eq!(harness.scene_ref().focused_widget(), Some(buttons[0]));

    // "ap" still matches apple, which is focused, so the next match wins.
    harness.type_char("p");
    assert_eq!(harness.scene_ref().focused_widget(), Some(buttons[1]));

    // Past the timeout the buffer resets; "b" selects banana.
    harness.advance(Duration::from_millis(600));
    harness.type_char("b");
    assert_eq!(harness.scene_ref().focused_widget(), Some(buttons[2]));
}

#[test]
fn destroying_the_focused_widget_clears_focus() {
    let (mut harness, buttons) = fruit_fixture();

    harness.mouse_click_on(buttons[1]);
    assert_eq!(harness.scene_ref().focused_widget(), Some(buttons[1]));

    harness.scene().edit(|tree| tree.delete(buttons[1]).unwrap());
    harness.run_frame();
    assert_eq!(harness.scene_ref().focused_widget(), None);
}

#[test]
fn disabled_widgets_are_skipped() {
    let (mut harness, buttons) = fruit_fixture();

    let middle = buttons[1];
    harness.scene().edit(|tree| {
        let state = tree.state_mut(middle).unwrap();
        state.styler(|s| {
            s.states |= StateFlags::DISABLED;
        });
    });
    harness.run_frame();

    harness.key_down(Key::Tab);
    assert_eq!(harness.scene_ref().focused_widget(), Some(buttons[0]));
    harness.key_down(Key::Tab);
    assert_eq!(harness.scene_ref().focused_widget(), Some(buttons[2]));
}
