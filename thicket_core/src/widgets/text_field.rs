// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

use std::rc::Rc;

use keyboard_types::Key;
use kurbo::{Point, Size};
use peniko::Color;

use crate::app::Scene;
use crate::core::{Event, EventCtx, EventType, MeasureCtx, RenderCtx, Widget, WidgetId};
use crate::paint::{PaintSurface, TextRun};
use crate::style::{Abilities, Background, Length, Sides, StateFlags, Style};

type Validator = Rc<dyn Fn(&str) -> Result<(), String>>;

/// A single-line text editor.
///
/// Editing is deliberately minimal (append, backspace, clear); the point of
/// this widget in the core is exercising key focus, the change pipeline, and
/// validation surfacing.
pub struct TextField {
    text: String,
    validator: Option<Validator>,
    run: Option<TextRun>,
}

impl std::fmt::Debug for TextField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextField")
            .field("text", &self.text)
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}

impl Default for TextField {
    fn default() -> Self {
        Self::new("")
    }
}

impl TextField {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            validator: None,
            run: None,
        }
    }

    /// Installs a validator: run on every change; a rejection puts the field
    /// in the Error state and surfaces the message in a snackbar.
    pub fn with_validator(mut self, f: impl Fn(&str) -> Result<(), String> + 'static) -> Self {
        self.validator = Some(Rc::new(f));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(scene: &mut Scene, id: WidgetId, text: impl Into<String>) {
        scene.with_widget::<Self, _>(id, |field, _| {
            field.text = text.into();
            field.run = None;
        });
        scene.mark_needs_layout(id);
    }

    fn edited(&mut self, ctx: &mut EventCtx<'_>) {
        self.run = None;
        ctx.request_layout();
        ctx.notify_change();
    }

    fn validate(&self, ctx: &mut EventCtx<'_>) {
        let Some(validator) = &self.validator else {
            return;
        };
        match validator(&self.text) {
            Ok(()) => {
                ctx.set_state(StateFlags::ERROR, false);
            }
            Err(message) => {
                ctx.set_state(StateFlags::ERROR, true);
                ctx.defer(move |scene| scene.show_snackbar(message));
            }
        }
    }
}

impl Widget for TextField {
    fn type_ident(&self) -> &'static str {
        "text-field"
    }

    fn base_style(&self, style: &mut Style) {
        style.abilities = Abilities::FOCUSABLE | Abilities::HOVERABLE | Abilities::ACTIVATABLE;
        style.padding = Sides {
            top: Length::Px(3.0),
            right: Length::Px(6.0),
            bottom: Length::Px(3.0),
            left: Length::Px(6.0),
        };
        style.min.x = Length::Em(8.0);
        style.border.widths = Sides::all(Length::Px(1.0));
        style.border.colors = Sides::all(Color::rgb8(110, 110, 110));
        style.background = Some(Background::Color(Color::WHITE));
        style.cursor = cursor_icon::CursorIcon::Text;
        if style.states.contains(StateFlags::FOCUSED) {
            style.border.colors = Sides::all(Color::rgb8(30, 90, 200));
        }
        if style.states.contains(StateFlags::ERROR) {
            style.border.colors = Sides::all(Color::rgb8(200, 40, 40));
        }
    }

    fn intrinsic_size(&mut self, ctx: &mut MeasureCtx<'_>, _max_width: Option<f64>) -> Size {
        let run = ctx.shape_text(&self.text, None);
        let em = ctx.unit_context().font_size;
        let size = Size::new(run.size.width, run.size.height.max(em));
        self.run = Some(run);
        size
    }

    fn on_event(&mut self, ctx: &mut EventCtx<'_>, event: &Event) {
        if event.kind != EventType::KeyDown || ctx.has_state(StateFlags::READ_ONLY) {
            if event.kind == EventType::Change {
                self.validate(ctx);
            }
            return;
        }
        match &event.key {
            Some(Key::Character(c)) => {
                self.text.push_str(c.as_str());
                self.edited(ctx);
                event.set_handled();
            }
            Some(Key::Backspace) => {
                if self.text.pop().is_some() {
                    self.edited(ctx);
                }
                event.set_handled();
            }
            Some(Key::Delete) if event.modifiers.is_empty() => {
                if !self.text.is_empty() {
                    self.text.clear();
                    self.edited(ctx);
                }
                event.set_handled();
            }
            Some(Key::Enter) => {
                ctx.notify_change();
                event.set_handled();
            }
            _ => {}
        }
    }

    fn render(&mut self, ctx: &mut RenderCtx<'_>, surface: &mut dyn PaintSurface) {
        let origin = ctx.geometry().content_origin();
        if let Some(run) = &self.run {
            surface.draw_text(run, origin, ctx.style().color);
        }
        if ctx.has_state(StateFlags::FOCUSED) {
            let caret_x = origin.x + self.run.as_ref().map(|r| r.size.width).unwrap_or(0.0);
            let height = ctx.geometry().alloc.height;
            surface.stroke_line(
                Point::new(caret_x + 1.0, origin.y),
                Point::new(caret_x + 1.0, origin.y + height),
                ctx.style().color,
                1.0,
            );
        }
    }

    fn focus_label(&self) -> Option<String> {
        (!self.text.is_empty()).then(|| self.text.clone())
    }
}
