// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::Size;
use peniko::Color;

use crate::core::{MeasureCtx, RenderCtx, Widget};
use crate::paint::{PaintSurface, TextRun};
use crate::style::{Background, Length, Sides, Style};

/// The transient text bubble a long hover opens.
#[derive(Debug, Default)]
pub struct Tooltip {
    text: String,
    run: Option<TextRun>,
}

impl Tooltip {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            run: None,
        }
    }
}

impl Widget for Tooltip {
    fn type_ident(&self) -> &'static str {
        "tooltip"
    }

    fn base_style(&self, style: &mut Style) {
        style.padding = Sides::all(Length::Px(6.0));
        style.background = Some(Background::Color(Color::rgb8(50, 50, 50)));
        style.color = Color::WHITE;
        style.border.radius = [Length::Px(4.0); 4];
    }

    fn intrinsic_size(&mut self, ctx: &mut MeasureCtx<'_>, _max_width: Option<f64>) -> Size {
        let run = ctx.shape_text(&self.text, None);
        let size = run.size;
        self.run = Some(run);
        size
    }

    fn render(&mut self, ctx: &mut RenderCtx<'_>, surface: &mut dyn PaintSurface) {
        if let Some(run) = &self.run {
            surface.draw_text(run, ctx.geometry().content_origin(), ctx.style().color);
        }
    }
}
