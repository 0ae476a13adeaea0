// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

use keyboard_types::Key;
use kurbo::Size;
use peniko::Color;

use crate::app::Scene;
use crate::core::{Event, EventCtx, EventType, MeasureCtx, RenderCtx, Widget, WidgetId};
use crate::paint::{PaintSurface, TextRun};
use crate::style::{Abilities, Length, Sides, StateFlags, Style};

/// A bounded numeric editor: arrows and the scroll wheel step the value,
/// sliding scrubs it.
#[derive(Debug)]
pub struct Spinner {
    value: f64,
    min: f64,
    max: f64,
    step: f64,
    /// Decimal digits shown and kept.
    prec: usize,
    run: Option<TextRun>,
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new(0.0, 0.0, 100.0, 1.0)
    }
}

impl Spinner {
    pub fn new(value: f64, min: f64, max: f64, step: f64) -> Self {
        let mut spinner = Self {
            value: 0.0,
            min,
            max,
            step,
            prec: if step.fract() == 0.0 { 0 } else { 2 },
            run: None,
        };
        spinner.value = spinner.quantize(value);
        spinner
    }

    pub fn with_prec(mut self, prec: usize) -> Self {
        self.prec = prec;
        self
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(scene: &mut Scene, id: WidgetId, value: f64) {
        scene.with_widget::<Self, _>(id, |spinner, _| {
            spinner.value = spinner.quantize(value);
            spinner.run = None;
        });
        scene.mark_needs_layout(id);
    }

    fn quantize(&self, v: f64) -> f64 {
        let v = if self.step > 0.0 {
            ((v - self.min) / self.step).round() * self.step + self.min
        } else {
            v
        };
        let factor = 10f64.powi(self.prec as i32);
        ((v * factor).round() / factor).clamp(self.min, self.max)
    }

    fn formatted(&self) -> String {
        format!("{:.*}", self.prec, self.value)
    }

    fn nudge(&mut self, ctx: &mut EventCtx<'_>, steps: f64) {
        let next = self.quantize(self.value + steps * self.step);
        if (next - self.value).abs() > f64::EPSILON {
            self.value = next;
            self.run = None;
            ctx.notify_change();
            ctx.request_layout();
        }
    }
}

impl Widget for Spinner {
    fn type_ident(&self) -> &'static str {
        "spinner"
    }

    fn base_style(&self, style: &mut Style) {
        style.abilities = Abilities::FOCUSABLE
            | Abilities::HOVERABLE
            | Abilities::ACTIVATABLE
            | Abilities::SLIDEABLE
            | Abilities::SCROLLABLE;
        style.padding = Sides {
            top: Length::Px(2.0),
            right: Length::Px(6.0),
            bottom: Length::Px(2.0),
            left: Length::Px(6.0),
        };
        style.border.widths = Sides::all(Length::Px(1.0));
        style.border.colors = Sides::all(Color::rgb8(110, 110, 110));
        if style.states.contains(StateFlags::FOCUSED) {
            style.border.colors = Sides::all(Color::rgb8(30, 90, 200));
        }
    }

    fn intrinsic_size(&mut self, ctx: &mut MeasureCtx<'_>, _max_width: Option<f64>) -> Size {
        let text = self.formatted();
        let run = ctx.shape_text(&text, None);
        let em = ctx.unit_context().font_size;
        let size = Size::new(run.size.width.max(3.0 * em), run.size.height);
        self.run = Some(run);
        size
    }

    fn on_event(&mut self, ctx: &mut EventCtx<'_>, event: &Event) {
        match event.kind {
            EventType::KeyDown => match event.key {
                Some(Key::ArrowUp) => {
                    self.nudge(ctx, 1.0);
                    event.set_handled();
                }
                Some(Key::ArrowDown) => {
                    self.nudge(ctx, -1.0);
                    event.set_handled();
                }
                _ => {}
            },
            EventType::Scroll => {
                let steps = if event.scroll_delta.y < 0.0 { 1.0 } else { -1.0 };
                self.nudge(ctx, steps);
                event.set_handled();
            }
            EventType::SlideMove => {
                self.nudge(ctx, event.prev_delta.x.signum());
                event.set_handled();
            }
            _ => {}
        }
    }

    fn render(&mut self, ctx: &mut RenderCtx<'_>, surface: &mut dyn PaintSurface) {
        if let Some(run) = &self.run {
            surface.draw_text(run, ctx.geometry().content_origin(), ctx.style().color);
        }
    }

    fn focus_label(&self) -> Option<String> {
        Some(self.formatted())
    }
}
