// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::Size;

use crate::app::Scene;
use crate::core::{MeasureCtx, RenderCtx, Widget, WidgetId};
use crate::paint::{PaintSurface, TextRun};
use crate::style::Style;

/// A run of styled text.
pub struct Label {
    text: String,
    run: Option<TextRun>,
    /// Last wrap width granted by layout; reused by the next unconstrained
    /// measure so the size negotiation converges instead of oscillating.
    wrap_width: Option<f64>,
}

impl std::fmt::Debug for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Label").field("text", &self.text).finish()
    }
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            run: None,
            wrap_width: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text and invalidates layout.
    pub fn set_text(scene: &mut Scene, id: WidgetId, text: impl Into<String>) {
        scene.with_widget::<Self, _>(id, |label, _| {
            label.text = text.into();
            label.run = None;
        });
        scene.mark_needs_layout(id);
    }
}

impl Default for Label {
    fn default() -> Self {
        Self::new("")
    }
}

impl Widget for Label {
    fn type_ident(&self) -> &'static str {
        "label"
    }

    fn intrinsic_size(&mut self, ctx: &mut MeasureCtx<'_>, max_width: Option<f64>) -> Size {
        let wrap = ctx.style().text_wrap;
        let constraint = if wrap {
            if max_width.is_some() {
                self.wrap_width = max_width;
            }
            max_width.or(self.wrap_width)
        } else {
            None
        };
        let run = ctx.shape_text(&self.text, constraint);
        let size = run.size;
        self.run = Some(run);
        size
    }

    fn wants_size_redo(&self, style: &Style) -> bool {
        style.text_wrap
    }

    fn render(&mut self, ctx: &mut RenderCtx<'_>, surface: &mut dyn PaintSurface) {
        if let Some(run) = &self.run {
            let origin = ctx.geometry().content_origin();
            surface.draw_text(run, origin, ctx.style().color);
        }
    }

    fn focus_label(&self) -> Option<String> {
        (!self.text.is_empty()).then(|| self.text.clone())
    }
}
