// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! The paint surface contract.
//!
//! The core never assumes a particular rendering backend: everything it emits
//! goes through [`PaintSurface`]. Backends adapt this trait to their scene
//! graph; the in-crate [`testing`](crate::testing) module records the calls
//! for assertions instead of rasterizing.

mod text;

pub use text::{TextLine, TextRun, TextShaper};

use kurbo::{Affine, Point, Rect, RoundedRectRadii, Size};
use peniko::Color;

use crate::style::{Background, Sides, Style, UnitContext};

/// An abstract image handle. Decoding and upload belong to the backend; the
/// core only needs the pixel dimensions for layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    /// Backend-side identity (icon name, atlas key, …).
    pub key: String,
    pub size: Size,
}

/// The resolved box paint of one widget: everything `draw_standard_box`
/// needs, with all lengths already in dots.
#[derive(Debug, Clone)]
pub struct BoxStyle {
    pub background: Option<Background>,
    pub border_widths: Sides<f64>,
    pub border_colors: Sides<Color>,
    pub radii: RoundedRectRadii,
    pub shadows: Vec<ResolvedShadow>,
    pub opacity: f64,
}

/// A box shadow with resolved dot values.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedShadow {
    pub offset: kurbo::Vec2,
    pub blur: f64,
    pub spread: f64,
    pub color: Color,
}

impl BoxStyle {
    /// Resolves the box-relevant subset of a computed style.
    pub fn from_style(style: &Style, uc: &UnitContext) -> Self {
        let r = style.border.radius;
        Self {
            background: style.background.clone(),
            border_widths: style.border.widths.to_dots(uc),
            border_colors: style.border.colors,
            radii: RoundedRectRadii::new(
                r[0].to_dots(uc),
                r[1].to_dots(uc),
                r[2].to_dots(uc),
                r[3].to_dots(uc),
            ),
            shadows: style
                .shadows
                .iter()
                .map(|s| ResolvedShadow {
                    offset: kurbo::Vec2::new(s.offset.x.to_dots(uc), s.offset.y.to_dots(uc)),
                    blur: s.blur.to_dots(uc),
                    spread: s.spread.to_dots(uc),
                    color: s.color,
                })
                .collect(),
            opacity: style.opacity,
        }
    }

    pub fn has_visible_box(&self) -> bool {
        self.background.is_some()
            || !self.shadows.is_empty()
            || self.border_widths.top > 0.0
            || self.border_widths.right > 0.0
            || self.border_widths.bottom > 0.0
            || self.border_widths.left > 0.0
    }
}

/// The surface the render pass paints into.
///
/// Clip pushes are strictly nested; the render pass guarantees a matching
/// [`pop_clip`](Self::pop_clip) for every push on all exit paths. The same
/// holds for the transform stack.
pub trait PaintSurface {
    /// Pushes a clip: painting is restricted to `total_bbox`, children to
    /// `content_bbox`, with rounded corners per `radii`.
    fn push_clip(&mut self, total_bbox: Rect, content_bbox: Rect, radii: RoundedRectRadii);
    fn pop_clip(&mut self);

    fn push_transform(&mut self, transform: Affine);
    fn pop_transform(&mut self);

    /// Paints a widget's standard box: shadow, background, border, in that
    /// order. `parent_bg` is the effective fill behind the box, for
    /// translucent compositing.
    fn draw_standard_box(&mut self, style: &BoxStyle, pos: Point, size: Size, parent_bg: Color);

    /// Paints a shaped text run with its origin at `pos`.
    fn draw_text(&mut self, run: &TextRun, pos: Point, color: Color);

    /// Paints an image into `dst`, optionally from a sub-rectangle of the
    /// source.
    fn draw_image(&mut self, image: &ImageRef, dst: Rect, src: Option<Rect>);

    fn draw_rect(&mut self, rect: Rect, color: Color);
    fn draw_rounded_rect(&mut self, rect: Rect, radii: RoundedRectRadii, color: Color);
    fn draw_border(&mut self, rect: Rect, widths: Sides<f64>, color: Color);
    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f64);
}

/// Runs `f` under a pushed clip, popping on every exit path.
pub fn with_clip<R>(
    surface: &mut dyn PaintSurface,
    total_bbox: Rect,
    content_bbox: Rect,
    radii: RoundedRectRadii,
    f: impl FnOnce(&mut dyn PaintSurface) -> R,
) -> R {
    surface.push_clip(total_bbox, content_bbox, radii);
    let out = f(surface);
    surface.pop_clip();
    out
}
