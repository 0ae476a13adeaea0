// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Length units and their resolution to device dots.
//!
//! Every conversion goes through a [`UnitContext`], which carries the DPI
//! scale, the computed font metrics, and the container/scene reference sizes.
//! Nothing in the crate converts a length without one.

use kurbo::Size;

use crate::layout::Dim;

/// Points per inch of paper; used for the `Pt` unit.
const PT_PER_INCH: f64 = 72.0;
/// Device-independent pixels per inch, the `Dp` reference density.
const DP_PER_INCH: f64 = 160.0;
/// Raw pixels per inch at a scale factor of 1.
const PX_PER_INCH: f64 = 96.0;

/// A length in one of the supported units.
///
/// Absolute units (`Px`, `Dp`, `Pt`) scale with DPI only. Font-relative units
/// (`Em`, `Ex`, `Ch`) resolve against the computed font of the styled widget.
/// Container-relative units (`Pw`, `Ph`) resolve against the parent's
/// allocated size, viewport units (`Vw`, `Vh`) against the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    /// Logical pixels, scaled by the DPI scale factor.
    Px(f64),
    /// Density-independent pixels (160 per inch).
    Dp(f64),
    /// Typographic points (72 per inch).
    Pt(f64),
    /// Multiples of the computed font size.
    Em(f64),
    /// Multiples of the font x-height.
    Ex(f64),
    /// Multiples of the advance of `0` in the computed font.
    Ch(f64),
    /// Percent of the parent's allocated width.
    Pw(f64),
    /// Percent of the parent's allocated height.
    Ph(f64),
    /// Percent of the scene width.
    Vw(f64),
    /// Percent of the scene height.
    Vh(f64),
}

impl Length {
    pub const ZERO: Self = Self::Px(0.0);

    /// Resolves to device dots.
    pub fn to_dots(self, uc: &UnitContext) -> f64 {
        match self {
            Self::Px(v) => v * uc.dots_per_px(),
            Self::Dp(v) => v * uc.dpi / DP_PER_INCH,
            Self::Pt(v) => v * uc.dpi / PT_PER_INCH,
            Self::Em(v) => v * uc.font_size,
            Self::Ex(v) => v * uc.ex_height(),
            Self::Ch(v) => v * uc.ch_advance(),
            Self::Pw(v) => v / 100.0 * uc.parent_alloc.width,
            Self::Ph(v) => v / 100.0 * uc.parent_alloc.height,
            Self::Vw(v) => v / 100.0 * uc.scene_size.width,
            Self::Vh(v) => v / 100.0 * uc.scene_size.height,
        }
    }

    /// The raw numeric value, without unit interpretation.
    pub fn value(self) -> f64 {
        match self {
            Self::Px(v)
            | Self::Dp(v)
            | Self::Pt(v)
            | Self::Em(v)
            | Self::Ex(v)
            | Self::Ch(v)
            | Self::Pw(v)
            | Self::Ph(v)
            | Self::Vw(v)
            | Self::Vh(v) => v,
        }
    }

    pub fn is_zero(self) -> bool {
        self.value() == 0.0
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f64> for Length {
    fn from(v: f64) -> Self {
        Self::Px(v)
    }
}

impl From<i32> for Length {
    fn from(v: i32) -> Self {
        Self::Px(v as f64)
    }
}

/// The resolution context consulted by every length-to-dots conversion.
#[derive(Debug, Clone)]
pub struct UnitContext {
    /// Dots per inch of the target surface.
    pub dpi: f64,
    /// Computed font size of the styled widget, in dots.
    pub font_size: f64,
    /// Root (scene default) font size, in dots.
    pub root_font_size: f64,
    /// The parent's allocated size, for `Pw`/`Ph`.
    pub parent_alloc: Size,
    /// The scene size, for `Vw`/`Vh`.
    pub scene_size: Size,
}

impl UnitContext {
    pub fn new(dpi: f64, scene_size: Size) -> Self {
        let font_size = Length::Pt(12.0).value() * dpi / PT_PER_INCH;
        Self {
            dpi,
            font_size,
            root_font_size: font_size,
            parent_alloc: scene_size,
            scene_size,
        }
    }

    pub fn dots_per_px(&self) -> f64 {
        self.dpi / PX_PER_INCH
    }

    /// Approximate x-height; half an em is the conventional fallback when the
    /// shaper has not reported real metrics.
    pub fn ex_height(&self) -> f64 {
        self.font_size * 0.5
    }

    /// Approximate advance of `0`.
    pub fn ch_advance(&self) -> f64 {
        self.font_size * 0.5
    }

    /// A copy of this context with the per-widget references swapped in.
    pub fn for_widget(&self, font_size: f64, parent_alloc: Size) -> Self {
        Self {
            font_size,
            parent_alloc,
            ..self.clone()
        }
    }
}

impl Default for UnitContext {
    fn default() -> Self {
        Self::new(PX_PER_INCH, Size::new(800.0, 600.0))
    }
}

/// Four side lengths, in top/right/bottom/left order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sides<T> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

impl<T: Copy> Sides<T> {
    pub fn all(v: T) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }
}

impl Sides<Length> {
    pub fn to_dots(self, uc: &UnitContext) -> Sides<f64> {
        Sides {
            top: self.top.to_dots(uc),
            right: self.right.to_dots(uc),
            bottom: self.bottom.to_dots(uc),
            left: self.left.to_dots(uc),
        }
    }
}

impl Sides<f64> {
    /// Combined extent along one dimension (left+right or top+bottom).
    pub fn extent(self, dim: Dim) -> f64 {
        match dim {
            Dim::X => self.left + self.right,
            Dim::Y => self.top + self.bottom,
        }
    }

    /// The leading inset along one dimension (left or top).
    pub fn start(self, dim: Dim) -> f64 {
        match dim {
            Dim::X => self.left,
            Dim::Y => self.top,
        }
    }

    pub fn size(self) -> Size {
        Size::new(self.left + self.right, self.top + self.bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_units_scale_with_dpi() {
        let uc = UnitContext::new(192.0, Size::new(100.0, 100.0));
        assert_eq!(Length::Px(10.0).to_dots(&uc), 20.0);
        assert_eq!(Length::Pt(72.0).to_dots(&uc), 192.0);
        assert_eq!(Length::Dp(160.0).to_dots(&uc), 192.0);
    }

    #[test]
    fn relative_units() {
        let mut uc = UnitContext::new(96.0, Size::new(200.0, 100.0));
        uc.font_size = 16.0;
        uc.parent_alloc = Size::new(50.0, 80.0);
        assert_eq!(Length::Em(2.0).to_dots(&uc), 32.0);
        assert_eq!(Length::Ex(2.0).to_dots(&uc), 16.0);
        assert_eq!(Length::Pw(50.0).to_dots(&uc), 25.0);
        assert_eq!(Length::Ph(25.0).to_dots(&uc), 20.0);
        assert_eq!(Length::Vw(10.0).to_dots(&uc), 20.0);
        assert_eq!(Length::Vh(10.0).to_dots(&uc), 10.0);
    }
}
