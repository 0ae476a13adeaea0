// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! The text shaping contract.

use kurbo::{Point, Size};

use crate::style::{FontStyle, UnitContext};

/// A single shaped line.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    /// Line origin (top-left) relative to the run origin.
    pub origin: Point,
    pub width: f64,
}

/// A shaped, line-broken run of text, ready to paint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextRun {
    /// Bounding size of all lines.
    pub size: Size,
    pub lines: Vec<TextLine>,
    /// Height of one line, the scroll step unit.
    pub line_height: f64,
}

/// The shaper consumed by the layout size-up pass and the label widgets.
///
/// Implementations are free to cache; the core calls this once per text
/// measurement and once more when a wrap width arrives in the size-down redo.
pub trait TextShaper {
    /// Shapes `text` with the given font, wrapping greedily to `max_width`
    /// when present.
    fn shape(
        &mut self,
        text: &str,
        font: &FontStyle,
        uc: &UnitContext,
        max_width: Option<f64>,
    ) -> TextRun;
}
