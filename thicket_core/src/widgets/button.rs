// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

use keyboard_types::Key;
use peniko::Color;

use crate::app::Scene;
use crate::core::{Event, EventCtx, EventType, Update, UpdateCtx, Widget, WidgetId};
use crate::style::{Abilities, Background, Length, Sides, StateFlags, Style};
use crate::widgets::{Icon, Label};

/// Submitted when a button is clicked (or activated by keyboard).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonPressed;

/// A clickable button composed of an optional icon and a label, both held in
/// its private parts sub-tree.
#[derive(Debug)]
pub struct Button {
    text: String,
    icon: Option<String>,
    tooltip: Option<String>,
}

impl Default for Button {
    fn default() -> Self {
        Self::new("")
    }
}

impl Button {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon: None,
            tooltip: None,
        }
    }

    pub fn with_icon(mut self, key: impl Into<String>) -> Self {
        self.icon = Some(key.into());
        self
    }

    pub fn with_tooltip(mut self, text: impl Into<String>) -> Self {
        self.tooltip = Some(text.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the button text, updating the label part.
    pub fn set_text(scene: &mut Scene, id: WidgetId, text: impl Into<String>) {
        let text = text.into();
        scene.with_widget::<Self, _>(id, |button, _| {
            button.text = text.clone();
        });
        let label = scene.tree().sibling_named(id, "label");
        if let Some(label) = label {
            Label::set_text(scene, label, text);
        }
    }
}

impl Widget for Button {
    fn type_ident(&self) -> &'static str {
        "button"
    }

    fn base_style(&self, style: &mut Style) {
        style.abilities = Abilities::ACTIVATABLE
            | Abilities::FOCUSABLE
            | Abilities::HOVERABLE
            | Abilities::LONG_HOVERABLE;
        style.padding = Sides {
            top: Length::Px(4.0),
            right: Length::Px(12.0),
            bottom: Length::Px(4.0),
            left: Length::Px(12.0),
        };
        style.gap.x = Length::Px(6.0);
        style.border.widths = Sides::all(Length::Px(1.0));
        style.border.colors = Sides::all(Color::rgb8(110, 110, 110));
        style.border.radius = [Length::Px(4.0); 4];
        style.background = Some(Background::Color(Color::rgb8(240, 240, 240)));
        style.cursor = cursor_icon::CursorIcon::Pointer;

        // State layers are translucent on purpose: they composite against
        // the effective background of the nearest opaque ancestor.
        if style.states.contains(StateFlags::ACTIVE) {
            style.background = Some(Background::Color(Color::rgba8(0, 0, 0, 46)));
        } else if style.states.contains(StateFlags::HOVERED) {
            style.background = Some(Background::Color(Color::rgba8(0, 0, 0, 20)));
        }
        if style.states.contains(StateFlags::FOCUSED) {
            style.border.colors = Sides::all(Color::rgb8(30, 90, 200));
        }
    }

    fn update(&mut self, ctx: &mut UpdateCtx<'_>, update: &Update) {
        if matches!(update, Update::Added) {
            let id = ctx.widget_id();
            let icon = self.icon.clone();
            let text = self.text.clone();
            ctx.defer(move |scene| {
                let mut tree = scene.tree();
                if let Some(icon) = icon {
                    let _ = tree.add_part(id, Icon::new(icon), "icon");
                }
                let _ = tree.add_part(id, Label::new(text), "label");
            });
        }
    }

    fn on_event(&mut self, ctx: &mut EventCtx<'_>, event: &Event) {
        match event.kind {
            EventType::Click => {
                ctx.emit_action(ButtonPressed);
            }
            EventType::KeyDown => {
                let activate = matches!(event.key, Some(Key::Enter))
                    || matches!(&event.key, Some(Key::Character(c)) if c.as_str() == " ");
                if activate {
                    ctx.queue_event(EventType::Click);
                    event.set_handled();
                }
            }
            _ => {}
        }
    }

    fn tooltip_text(&self) -> Option<String> {
        self.tooltip.clone()
    }

    fn focus_label(&self) -> Option<String> {
        (!self.text.is_empty()).then(|| self.text.clone())
    }
}

// --- MARK: TESTS ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHarness;
    use crate::widgets::Frame;

    #[test]
    fn simple_button() {
        let mut harness = TestHarness::create(Frame::new());
        let main = harness.scene_ref().main_id();
        let button = harness
            .scene()
            .edit(|tree| tree.add_child(main, Button::new("Hello")).unwrap());
        harness.run_frame();

        assert!(harness.pop_action().is_none());
        harness.mouse_click_on(button);
        let (id, _) = harness.pop_action_as::<ButtonPressed>().unwrap();
        assert_eq!(id, button);
    }

    #[test]
    fn keyboard_activation() {
        let mut harness = TestHarness::create(Frame::new());
        let main = harness.scene_ref().main_id();
        let button = harness
            .scene()
            .edit(|tree| tree.add_child(main, Button::new("Go")).unwrap());
        harness.run_frame();

        harness.scene().focus_on(Some(button));
        harness.key_down(Key::Enter);
        assert!(harness.pop_action_as::<ButtonPressed>().is_some());
    }

    #[test]
    fn set_text_updates_the_label_part() {
        let mut harness = TestHarness::create(Frame::new());
        let main = harness.scene_ref().main_id();
        let button = harness
            .scene()
            .edit(|tree| tree.add_child(main, Button::new("before")).unwrap());
        harness.run_frame();

        Button::set_text(harness.scene(), button, "after");
        let label = harness
            .scene()
            .edit(|tree| tree.find_path(button, "label"))
            .unwrap();
        let text = harness
            .scene()
            .with_widget::<crate::widgets::Label, _>(label, |l, _| l.text().to_string())
            .unwrap();
        assert_eq!(text, "after");
    }
}
