// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

use keyboard_types::Key;
use kurbo::{Point, Size};
use peniko::Color;

use crate::app::Scene;
use crate::core::{Event, EventCtx, EventType, MeasureCtx, RenderCtx, Widget, WidgetId};
use crate::paint::PaintSurface;
use crate::style::{Abilities, Background, Length, Sides, StateFlags, Style};

/// A two-state (optionally three-state) toggle. The Checked and
/// Indeterminate state bits are the value; there is no shadow field.
#[derive(Debug, Default)]
pub struct Switch {
    /// Clicking an indeterminate switch resolves to checked; checking an
    /// unchecked one may pass through indeterminate when three-state.
    three_state: bool,
}

impl Switch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn three_state() -> Self {
        Self { three_state: true }
    }

    pub fn is_checked(scene: &Scene, id: WidgetId) -> bool {
        scene
            .widget_state(id)
            .is_some_and(|s| s.style().state(StateFlags::CHECKED))
    }

    pub fn set_checked(scene: &mut Scene, id: WidgetId, on: bool) {
        crate::event::set_flag(scene, id, StateFlags::CHECKED, on);
        crate::event::set_flag(scene, id, StateFlags::INDETERMINATE, false);
    }

    fn toggle(&self, ctx: &mut EventCtx<'_>) {
        let checked = ctx.has_state(StateFlags::CHECKED);
        let mixed = ctx.has_state(StateFlags::INDETERMINATE);
        if mixed {
            ctx.set_state(StateFlags::INDETERMINATE, false);
            ctx.set_state(StateFlags::CHECKED, true);
        } else if !checked && self.three_state {
            ctx.set_state(StateFlags::INDETERMINATE, true);
        } else {
            ctx.set_state(StateFlags::CHECKED, !checked);
        }
        ctx.notify_change();
    }
}

impl Widget for Switch {
    fn type_ident(&self) -> &'static str {
        "switch"
    }

    fn base_style(&self, style: &mut Style) {
        style.abilities = Abilities::CHECKABLE
            | Abilities::ACTIVATABLE
            | Abilities::FOCUSABLE
            | Abilities::HOVERABLE;
        style.border.widths = Sides::all(Length::Px(1.0));
        style.border.colors = Sides::all(Color::rgb8(110, 110, 110));
        style.border.radius = [Length::Px(3.0); 4];
        style.cursor = cursor_icon::CursorIcon::Pointer;
        if style.states.contains(StateFlags::HOVERED) {
            style.background = Some(Background::Color(Color::rgba8(0, 0, 0, 20)));
        }
        if style.states.contains(StateFlags::FOCUSED) {
            style.border.colors = Sides::all(Color::rgb8(30, 90, 200));
        }
    }

    fn intrinsic_size(&mut self, ctx: &mut MeasureCtx<'_>, _max_width: Option<f64>) -> Size {
        let em = ctx.unit_context().font_size;
        Size::new(em, em)
    }

    fn on_event(&mut self, ctx: &mut EventCtx<'_>, event: &Event) {
        match event.kind {
            EventType::Click => {
                self.toggle(ctx);
                event.set_handled();
            }
            EventType::KeyDown => {
                let activate = matches!(event.key, Some(Key::Enter))
                    || matches!(&event.key, Some(Key::Character(c)) if c.as_str() == " ");
                if activate {
                    self.toggle(ctx);
                    event.set_handled();
                }
            }
            _ => {}
        }
    }

    fn render(&mut self, ctx: &mut RenderCtx<'_>, surface: &mut dyn PaintSurface) {
        let geom = ctx.geometry();
        let origin = geom.content_origin();
        let size = geom.alloc;
        let color = ctx.style().color;

        if ctx.has_state(StateFlags::INDETERMINATE) {
            let mid = origin.y + size.height / 2.0;
            surface.stroke_line(
                Point::new(origin.x + size.width * 0.2, mid),
                Point::new(origin.x + size.width * 0.8, mid),
                color,
                2.0,
            );
        } else if ctx.has_state(StateFlags::CHECKED) {
            let p0 = Point::new(origin.x + size.width * 0.2, origin.y + size.height * 0.55);
            let p1 = Point::new(origin.x + size.width * 0.45, origin.y + size.height * 0.8);
            let p2 = Point::new(origin.x + size.width * 0.8, origin.y + size.height * 0.25);
            surface.stroke_line(p0, p1, color, 2.0);
            surface.stroke_line(p1, p2, color, 2.0);
        }
    }
}

// --- MARK: TESTS ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHarness;
    use crate::widgets::Frame;

    #[test]
    fn click_toggles() {
        let mut harness = TestHarness::create(Frame::new());
        let main = harness.scene_ref().main_id();
        let switch = harness
            .scene()
            .edit(|tree| tree.add_child(main, Switch::new()).unwrap());
        harness.run_frame();

        assert!(!Switch::is_checked(harness.scene_ref(), switch));
        harness.mouse_click_on(switch);
        assert!(Switch::is_checked(harness.scene_ref(), switch));
        harness.mouse_click_on(switch);
        assert!(!Switch::is_checked(harness.scene_ref(), switch));
    }

    #[test]
    fn three_state_cycles_through_indeterminate() {
        let mut harness = TestHarness::create(Frame::new());
        let main = harness.scene_ref().main_id();
        let switch = harness
            .scene()
            .edit(|tree| tree.add_child(main, Switch::three_state()).unwrap());
        harness.run_frame();

        let has = |harness: &TestHarness, flag| {
            harness
                .scene_ref()
                .widget_state(switch)
                .unwrap()
                .style()
                .state(flag)
        };

        harness.mouse_click_on(switch);
        assert!(has(&harness, StateFlags::INDETERMINATE));
        harness.mouse_click_on(switch);
        assert!(has(&harness, StateFlags::CHECKED));
        assert!(!has(&harness, StateFlags::INDETERMINATE));
        harness.mouse_click_on(switch);
        assert!(!has(&harness, StateFlags::CHECKED));
    }
}
