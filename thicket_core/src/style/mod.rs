// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Computed style: the typed properties driving layout and the standard box,
//! plus the interaction state/ability bitsets.
//!
//! Styling a widget is a pure fold: a fresh [`Style`] is seeded from the
//! parent's computed style ([`Style::inherit`]), the widget's base styler and
//! its ordered styler list are applied in declaration order, and the
//! final-styler list runs last (reserved for overrides that must see every
//! other contribution). The fold is re-run whenever the scene's style epoch
//! advances or a state bit changes.

mod cascade;
mod flags;
mod load;
mod units;

pub use cascade::{Styler, StylerList};
pub use flags::{Abilities, StateFlags};
pub use load::StyleError;
pub use units::{Length, Sides, UnitContext};

use peniko::Color;

use crate::layout::XY;

/// How a widget lays out its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    /// Children in a row or column, grown and optionally wrapped.
    #[default]
    Flex,
    /// Children stacked on top of each other at the content origin.
    Stacked,
    /// Children in a fixed number of columns.
    Grid,
    /// The widget and its subtree are laid out to zero size.
    None,
}

/// Primary flex dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Row,
    Column,
}

/// Per-axis overflow behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    /// Content may paint outside the box.
    #[default]
    Visible,
    /// Content is clipped; no scrolling.
    Hidden,
    /// Clipped, with scrollbars materialized when content exceeds the box.
    Auto,
    /// Clipped, scrollbars always present.
    Scroll,
}

impl Overflow {
    pub fn scrolls(self) -> bool {
        matches!(self, Self::Auto | Self::Scroll)
    }

    pub fn clips(self) -> bool {
        !matches!(self, Self::Visible)
    }
}

/// Horizontal text alignment within the content box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Start,
    Center,
    End,
}

/// A background fill: either a flat color or a simple two-stop vertical
/// gradient. The paint surface interprets gradients; the cascade only needs
/// the representative color for state-layer compositing.
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Color(Color),
    LinearGradient {
        /// Angle in radians, 0 pointing up.
        angle: f64,
        stops: Vec<(f32, Color)>,
    },
}

impl Background {
    /// The color used when compositing translucent layers above this fill.
    pub fn representative_color(&self) -> Color {
        match self {
            Self::Color(c) => *c,
            Self::LinearGradient { stops, .. } => {
                stops.first().map(|(_, c)| *c).unwrap_or(Color::TRANSPARENT)
            }
        }
    }
}

/// Border widths, colors, and corner radii. One color per side; radii in
/// top-left, top-right, bottom-right, bottom-left order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Border {
    pub widths: Sides<Length>,
    pub colors: Sides<Color>,
    pub radius: [Length; 4],
}

/// A single box shadow.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxShadow {
    pub offset: XY<Length>,
    pub blur: Length,
    pub spread: Length,
    pub color: Color,
}

/// Font selection for text measurement and painting.
#[derive(Debug, Clone, PartialEq)]
pub struct FontStyle {
    pub size: Length,
    pub family: String,
    /// CSS-style weight; 400 regular, 700 bold.
    pub weight: u16,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            size: Length::Pt(12.0),
            family: "default".into(),
            weight: 400,
            line_height: 1.3,
        }
    }
}

/// The computed style of a widget.
///
/// Field groups mirror the passes that consume them: layout reads display,
/// direction, sizes, gaps, and overflow; the render pass reads the box fields;
/// the event manager reads states and abilities.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub display: Display,
    pub direction: Direction,
    /// Flex line wrapping along the primary dimension.
    pub wrap: bool,
    /// Grid column count; 0 means `ceil(sqrt(n))`.
    pub columns: usize,

    pub min: XY<Length>,
    pub max: XY<Length>,
    /// Share of leftover parent space claimed per axis; negative is treated
    /// as zero.
    pub grow: XY<f64>,
    pub gap: XY<Length>,
    pub padding: Sides<Length>,
    pub margin: Sides<Length>,
    pub overflow: XY<Overflow>,

    pub background: Option<Background>,
    /// Effective background: this widget's fill composited over the nearest
    /// opaque ancestor fill. Maintained by the cascade, not set directly.
    pub actual_background: Color,
    pub opacity: f64,
    pub border: Border,
    pub shadows: Vec<BoxShadow>,

    pub font: FontStyle,
    pub text_align: TextAlign,
    /// Wrap shaped text to the allocated width.
    pub text_wrap: bool,
    pub color: Color,

    pub cursor: cursor_icon::CursorIcon,

    /// In a stacked display, render only the top child.
    pub stack_top_only: bool,

    pub states: StateFlags,
    pub abilities: Abilities,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            display: Display::Flex,
            direction: Direction::Row,
            wrap: false,
            columns: 0,
            min: XY::default(),
            max: XY::default(),
            grow: XY::default(),
            gap: XY::default(),
            padding: Sides::default(),
            margin: Sides::default(),
            overflow: XY {
                x: Overflow::Visible,
                y: Overflow::Visible,
            },
            background: None,
            actual_background: Color::WHITE,
            opacity: 1.0,
            border: Border::default(),
            shadows: Vec::new(),
            font: FontStyle::default(),
            text_align: TextAlign::Start,
            text_wrap: false,
            color: Color::BLACK,
            cursor: cursor_icon::CursorIcon::Default,
            stack_top_only: true,
            states: StateFlags::empty(),
            abilities: Abilities::empty(),
        }
    }
}

impl Style {
    /// Whether the widget currently participates in layout and render.
    pub fn is_visible(&self) -> bool {
        !self.states.contains(StateFlags::INVISIBLE) && self.display != Display::None
    }

    /// Sets or clears a state bit, refusing gated states whose ability is
    /// absent. Returns whether the bit changed.
    pub fn set_state(&mut self, state: StateFlags, on: bool) -> bool {
        if on
            && let Some(ability) = state.gating_ability()
            && !self.abilities.contains(ability)
        {
            return false;
        }
        let before = self.states;
        self.states.set(state, on);
        self.states != before
    }

    pub fn state(&self, state: StateFlags) -> bool {
        self.states.contains(state)
    }

    pub fn can(&self, ability: Abilities) -> bool {
        self.abilities.contains(ability)
    }

    pub fn is_disabled(&self) -> bool {
        self.states.contains(StateFlags::DISABLED)
    }

    /// Resolved minimum size in dots.
    pub fn min_dots(&self, uc: &UnitContext) -> kurbo::Size {
        kurbo::Size::new(self.min.x.to_dots(uc), self.min.y.to_dots(uc))
    }

    /// Resolved maximum size in dots; zero means unconstrained.
    pub fn max_dots(&self, uc: &UnitContext) -> XY<Option<f64>> {
        let m = |l: Length| {
            let v = l.to_dots(uc);
            (v > 0.0).then_some(v)
        };
        XY {
            x: m(self.max.x),
            y: m(self.max.y),
        }
    }

    /// Clamps a desired size to the style's min/max box.
    pub fn clamp_size(&self, size: kurbo::Size, uc: &UnitContext) -> kurbo::Size {
        let min = self.min_dots(uc);
        let max = self.max_dots(uc);
        let clamp1 = |v: f64, lo: f64, hi: Option<f64>| {
            let v = v.max(lo);
            match hi {
                Some(hi) => v.min(hi.max(lo)),
                None => v,
            }
        };
        kurbo::Size::new(
            clamp1(size.width, min.width, max.x),
            clamp1(size.height, min.height, max.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_requires_ability() {
        let mut s = Style::default();
        assert!(!s.set_state(StateFlags::HOVERED, true));
        s.abilities |= Abilities::HOVERABLE;
        assert!(s.set_state(StateFlags::HOVERED, true));
        assert!(s.state(StateFlags::HOVERED));
        // Clearing never needs the ability.
        s.abilities = Abilities::empty();
        assert!(s.set_state(StateFlags::HOVERED, false));
    }

    #[test]
    fn clamp_respects_min_max() {
        let mut s = Style::default();
        s.min = XY {
            x: Length::Px(20.0),
            y: Length::ZERO,
        };
        s.max = XY {
            x: Length::Px(50.0),
            y: Length::ZERO,
        };
        let uc = UnitContext::default();
        let out = s.clamp_size(kurbo::Size::new(10.0, 10.0), &uc);
        assert_eq!(out.width, 20.0);
        let out = s.clamp_size(kurbo::Size::new(100.0, 10.0), &uc);
        assert_eq!(out.width, 50.0);
    }
}
