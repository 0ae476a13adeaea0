// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::{Affine, Point, Rect, RoundedRectRadii, Size};
use peniko::Color;

use crate::paint::{BoxStyle, ImageRef, PaintSurface, TextRun};
use crate::style::Sides;

/// One recorded paint command.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    PushClip {
        total_bbox: Rect,
        content_bbox: Rect,
    },
    PopClip,
    PushTransform(Affine),
    PopTransform,
    StandardBox {
        pos: Point,
        size: Size,
        background: Option<Color>,
        parent_bg: Color,
    },
    Text {
        text: String,
        pos: Point,
        color: Color,
    },
    Image {
        key: String,
        dst: Rect,
    },
    Rect(Rect, Color),
    RoundedRect(Rect, Color),
    Border(Rect, Color),
    Line(Point, Point, Color),
}

/// A paint surface that records commands instead of rasterizing; the test
/// harness asserts against the recording.
///
/// Panics on unbalanced clip or transform stacks, which is exactly the
/// invariant the render pass must uphold.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<PaintOp>,
    clip_depth: usize,
    transform_depth: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    pub fn clear(&mut self) {
        assert_eq!(self.clip_depth, 0, "unbalanced clip stack");
        assert_eq!(self.transform_depth, 0, "unbalanced transform stack");
        self.ops.clear();
    }

    /// Texts painted, in paint order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether some op painted inside `rect`.
    pub fn painted_in(&self, rect: Rect) -> bool {
        let overlaps = |r: Rect| {
            let i = rect.intersect(r);
            i.width() > 0.0 && i.height() > 0.0
        };
        self.ops.iter().any(|op| match op {
            PaintOp::StandardBox { pos, size, .. } => {
                overlaps(Rect::from_origin_size(*pos, *size))
            }
            PaintOp::Rect(r, _) | PaintOp::RoundedRect(r, _) => overlaps(*r),
            PaintOp::Text { pos, .. } => rect.contains(*pos),
            _ => false,
        })
    }
}

impl PaintSurface for RecordingSurface {
    fn push_clip(&mut self, total_bbox: Rect, content_bbox: Rect, _radii: RoundedRectRadii) {
        self.clip_depth += 1;
        self.ops.push(PaintOp::PushClip {
            total_bbox,
            content_bbox,
        });
    }

    fn pop_clip(&mut self) {
        assert!(self.clip_depth > 0, "pop_clip without matching push");
        self.clip_depth -= 1;
        self.ops.push(PaintOp::PopClip);
    }

    fn push_transform(&mut self, transform: Affine) {
        self.transform_depth += 1;
        self.ops.push(PaintOp::PushTransform(transform));
    }

    fn pop_transform(&mut self) {
        assert!(self.transform_depth > 0, "pop_transform without matching push");
        self.transform_depth -= 1;
        self.ops.push(PaintOp::PopTransform);
    }

    fn draw_standard_box(&mut self, style: &BoxStyle, pos: Point, size: Size, parent_bg: Color) {
        self.ops.push(PaintOp::StandardBox {
            pos,
            size,
            background: style
                .background
                .as_ref()
                .map(|bg| bg.representative_color()),
            parent_bg,
        });
    }

    fn draw_text(&mut self, run: &TextRun, pos: Point, color: Color) {
        let text = run
            .lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.ops.push(PaintOp::Text { text, pos, color });
    }

    fn draw_image(&mut self, image: &ImageRef, dst: Rect, _src: Option<Rect>) {
        self.ops.push(PaintOp::Image {
            key: image.key.clone(),
            dst,
        });
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(PaintOp::Rect(rect, color));
    }

    fn draw_rounded_rect(&mut self, rect: Rect, _radii: RoundedRectRadii, color: Color) {
        self.ops.push(PaintOp::RoundedRect(rect, color));
    }

    fn draw_border(&mut self, rect: Rect, _widths: Sides<f64>, color: Color) {
        self.ops.push(PaintOp::Border(rect, color));
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, _width: f64) {
        self.ops.push(PaintOp::Line(from, to, color));
    }
}
