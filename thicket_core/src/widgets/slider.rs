// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

use keyboard_types::Key;
use kurbo::{Point, Rect, RoundedRectRadii, Size};
use peniko::Color;

use crate::core::{Event, EventCtx, EventType, MeasureCtx, RenderCtx, Widget};
use crate::layout::Dim;
use crate::paint::PaintSurface;
use crate::style::{Abilities, Style};

/// The value model shared by sliders and scrollbars.
///
/// `visible_pct` is zero for plain sliders; scrollbars set it to the visible
/// fraction of their content, which shortens the usable range so the thumb's
/// far edge stops exactly at the content end:
/// `effective_max = max − clamp(visible_pct, 0, 1) · (max − min)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderCore {
    pub min: f64,
    pub max: f64,
    pub value: f64,
    pub step: f64,
    pub page_step: f64,
    pub visible_pct: f64,
    /// Decimal digits kept after quantization.
    pub prec: i32,
}

impl Default for SliderCore {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            value: 0.0,
            step: 0.1,
            page_step: 0.2,
            visible_pct: 0.0,
            prec: 9,
        }
    }
}

impl SliderCore {
    pub fn effective_max(&self) -> f64 {
        self.max - self.visible_pct.clamp(0.0, 1.0) * (self.max - self.min)
    }

    /// Sets the value: quantized to the nearest step multiple, truncated to
    /// `prec` decimal digits, clamped to `[min, effective_max]`. Returns
    /// whether it changed.
    pub fn set_value(&mut self, v: f64) -> bool {
        let mut v = v;
        if self.step > 0.0 {
            v = ((v - self.min) / self.step).round() * self.step + self.min;
        }
        let factor = 10f64.powi(self.prec);
        v = (v * factor).round() / factor;
        v = v.clamp(self.min, self.effective_max().max(self.min));
        if (v - self.value).abs() > f64::EPSILON {
            self.value = v;
            true
        } else {
            false
        }
    }

    /// The fraction of the travel range the current value sits at.
    pub fn fraction(&self) -> f64 {
        let span = self.effective_max() - self.min;
        if span <= 0.0 {
            0.0
        } else {
            (self.value - self.min) / span
        }
    }
}

/// A draggable value control.
#[derive(Debug, Default)]
pub struct Slider {
    pub core: SliderCore,
}

impl Slider {
    pub fn new(min: f64, max: f64, value: f64) -> Self {
        let mut core = SliderCore {
            min,
            max,
            step: (max - min) / 100.0,
            page_step: (max - min) / 10.0,
            ..SliderCore::default()
        };
        core.set_value(value);
        Self { core }
    }

    pub fn value(&self) -> f64 {
        self.core.value
    }

    fn apply(&mut self, ctx: &mut EventCtx<'_>, v: f64) {
        if self.core.set_value(v) {
            ctx.notify_change();
            ctx.request_render();
        }
    }
}

impl Widget for Slider {
    fn type_ident(&self) -> &'static str {
        "slider"
    }

    fn base_style(&self, style: &mut Style) {
        style.abilities = Abilities::SLIDEABLE
            | Abilities::FOCUSABLE
            | Abilities::HOVERABLE
            | Abilities::ACTIVATABLE;
        style.cursor = cursor_icon::CursorIcon::Grab;
    }

    fn intrinsic_size(&mut self, ctx: &mut MeasureCtx<'_>, _max_width: Option<f64>) -> Size {
        let em = ctx.unit_context().font_size;
        Size::new(8.0 * em, em)
    }

    fn on_event(&mut self, ctx: &mut EventCtx<'_>, event: &Event) {
        let track = ctx.geometry().alloc.width.max(1.0);
        let span = self.core.effective_max() - self.core.min;
        match event.kind {
            EventType::SlideMove => {
                let v = self.core.value + event.prev_delta.x / track * span;
                self.apply(ctx, v);
                event.set_handled();
            }
            EventType::Click => {
                let local = ctx.geometry().to_local(event.pos);
                let v = self.core.min + local.x / track * span;
                self.apply(ctx, v);
                event.set_handled();
            }
            EventType::KeyDown => match event.key {
                Some(Key::ArrowLeft | Key::ArrowDown) => {
                    let v = self.core.value - self.core.step;
                    self.apply(ctx, v);
                    event.set_handled();
                }
                Some(Key::ArrowRight | Key::ArrowUp) => {
                    let v = self.core.value + self.core.step;
                    self.apply(ctx, v);
                    event.set_handled();
                }
                Some(Key::PageDown) => {
                    let v = self.core.value - self.core.page_step;
                    self.apply(ctx, v);
                    event.set_handled();
                }
                Some(Key::PageUp) => {
                    let v = self.core.value + self.core.page_step;
                    self.apply(ctx, v);
                    event.set_handled();
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn render(&mut self, ctx: &mut RenderCtx<'_>, surface: &mut dyn PaintSurface) {
        let geom = ctx.geometry();
        let origin = geom.content_origin();
        let size = geom.alloc;
        let mid_y = origin.y + size.height / 2.0;

        surface.stroke_line(
            Point::new(origin.x, mid_y),
            Point::new(origin.x + size.width, mid_y),
            ctx.style().color,
            2.0,
        );

        let thumb_w = size.height;
        let travel = (size.width - thumb_w).max(0.0);
        let x = origin.x + self.core.fraction() * travel;
        let thumb = Rect::new(x, origin.y, x + thumb_w, origin.y + size.height);
        let accent = ctx.style().color;
        surface.draw_rounded_rect(
            thumb,
            RoundedRectRadii::from_single_radius(thumb_w / 2.0),
            accent,
        );
    }
}

/// One scrollbar of a scroll frame, along `dim`.
///
/// A specialization of the slider: min 0, max 1, thumb length proportional
/// to the visible fraction (clamped to a minimum), step one line, page step
/// ten lines. Its value maps to the frame's scroll offset as
/// `scroll = -value · internal`.
#[derive(Debug)]
pub struct ScrollBar {
    pub(crate) dim: Dim,
    pub(crate) core: SliderCore,
    pub(crate) internal: f64,
    pub(crate) min_thumb: f64,
}

impl ScrollBar {
    pub fn new(dim: Dim) -> Self {
        Self {
            dim,
            core: SliderCore {
                min: 0.0,
                max: 1.0,
                value: 0.0,
                step: 0.05,
                page_step: 0.5,
                visible_pct: 0.0,
                prec: 9,
            },
            internal: 1.0,
            min_thumb: 24.0,
        }
    }

    pub fn dim(&self) -> Dim {
        self.dim
    }

    pub fn core(&self) -> &SliderCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut SliderCore {
        &mut self.core
    }

    /// Thumb extent for a given track length: proportional to the visible
    /// fraction, clamped to the configured minimum.
    pub fn thumb_length(&self, track: f64) -> f64 {
        (self.core.visible_pct * track).max(self.min_thumb).min(track)
    }

    /// Refreshes the slider state from the owning frame's geometry.
    pub(crate) fn sync(
        &mut self,
        visible: f64,
        internal: f64,
        value: f64,
        min_thumb: f64,
        line_step: f64,
        page_lines: f64,
    ) {
        self.internal = internal.max(1.0);
        self.min_thumb = min_thumb;
        self.core.visible_pct = (visible / self.internal).clamp(0.0, 1.0);
        self.core.step = line_step / self.internal;
        self.core.page_step = self.core.step * page_lines;
        self.core.value = value.clamp(0.0, self.core.effective_max());
    }

    fn track_len(&self, ctx: &EventCtx<'_>) -> f64 {
        self.dim.of_size(ctx.geometry().alloc).max(1.0)
    }

    /// Pushes the new value into the owning frame's scroll offset.
    fn apply(&mut self, ctx: &mut EventCtx<'_>, v: f64) {
        if !self.core.set_value(v) {
            return;
        }
        let dim = self.dim;
        let offset = -self.core.value * self.internal;
        let bar = ctx.widget_id();
        ctx.request_render();
        ctx.defer(move |scene| {
            if let Some(frame) = scene.tree().parent_of(bar) {
                crate::scroll::set_scroll(scene, frame, dim, offset);
            }
        });
    }
}

impl Widget for ScrollBar {
    fn type_ident(&self) -> &'static str {
        "scrollbar"
    }

    fn base_style(&self, style: &mut Style) {
        style.abilities = Abilities::SLIDEABLE | Abilities::HOVERABLE | Abilities::ACTIVATABLE;
    }

    fn on_event(&mut self, ctx: &mut EventCtx<'_>, event: &Event) {
        let track = self.track_len(ctx);
        let thumb = self.thumb_length(track);
        let travel = (track - thumb).max(1.0);
        match event.kind {
            EventType::SlideMove => {
                let delta = self.dim.of_vec2(event.prev_delta);
                let v = self.core.value + delta / travel * self.core.effective_max();
                self.apply(ctx, v);
                event.set_handled();
            }
            EventType::Click => {
                // Clicking the track pages toward the click.
                let local = self.dim.of_point(ctx.geometry().to_local(event.pos));
                let thumb_start = self.core.fraction() * travel;
                let v = if local < thumb_start {
                    self.core.value - self.core.page_step
                } else if local > thumb_start + thumb {
                    self.core.value + self.core.page_step
                } else {
                    return;
                };
                self.apply(ctx, v);
                event.set_handled();
            }
            _ => {}
        }
    }

    fn render(&mut self, ctx: &mut RenderCtx<'_>, surface: &mut dyn PaintSurface) {
        let geom = ctx.geometry();
        let rect = Rect::from_origin_size(geom.scene_pos, geom.alloc);
        surface.draw_rect(rect, Color::rgba8(0, 0, 0, 24));

        let track = self.dim.of_size(geom.alloc).max(1.0);
        let thumb_len = self.thumb_length(track);
        let travel = (track - thumb_len).max(0.0);
        let start = self.core.fraction() * travel;
        let thumb = match self.dim {
            Dim::Y => Rect::new(
                rect.x0 + 2.0,
                rect.y0 + start,
                rect.x1 - 2.0,
                rect.y0 + start + thumb_len,
            ),
            Dim::X => Rect::new(
                rect.x0 + start,
                rect.y0 + 2.0,
                rect.x0 + start + thumb_len,
                rect.y1 - 2.0,
            ),
        };
        surface.draw_rounded_rect(
            thumb,
            RoundedRectRadii::from_single_radius(3.0),
            Color::rgba8(0, 0, 0, 96),
        );
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn effective_max_shrinks_with_visible_fraction() {
        let core = SliderCore {
            min: 0.0,
            max: 1.0,
            visible_pct: 0.2,
            ..SliderCore::default()
        };
        assert_approx_eq!(f64, core.effective_max(), 0.8);
    }

    #[test]
    fn set_value_quantizes_to_nearest_step() {
        let mut core = SliderCore {
            min: 0.0,
            max: 10.0,
            step: 0.5,
            prec: 3,
            ..SliderCore::default()
        };
        core.set_value(3.26);
        assert_approx_eq!(f64, core.value, 3.5);
        core.set_value(3.24);
        assert_approx_eq!(f64, core.value, 3.0);
        // Clamped to the effective max.
        core.set_value(99.0);
        assert_approx_eq!(f64, core.value, 10.0);
    }
}
