// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::{Rect, Size};

use crate::core::{MeasureCtx, RenderCtx, Widget};
use crate::paint::{ImageRef, PaintSurface};

/// A square icon resolved by the backend's icon registry through its key.
#[derive(Debug, Default)]
pub struct Icon {
    key: String,
}

impl Icon {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Widget for Icon {
    fn type_ident(&self) -> &'static str {
        "icon"
    }

    fn intrinsic_size(&mut self, ctx: &mut MeasureCtx<'_>, _max_width: Option<f64>) -> Size {
        let em = ctx.unit_context().font_size;
        Size::new(em, em)
    }

    fn render(&mut self, ctx: &mut RenderCtx<'_>, surface: &mut dyn PaintSurface) {
        if self.key.is_empty() {
            return;
        }
        let geom = ctx.geometry();
        let dst = Rect::from_origin_size(geom.content_origin(), geom.alloc);
        let image = ImageRef {
            key: self.key.clone(),
            size: geom.alloc,
        };
        surface.draw_image(&image, dst, None);
    }
}
