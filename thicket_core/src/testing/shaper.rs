// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::{Point, Size};

use crate::paint::{TextLine, TextRun, TextShaper};
use crate::style::{FontStyle, UnitContext};

/// A deterministic monospace shaper for tests: every glyph advances half the
/// font size, lines are `line_height` times the font size, wrapping is
/// greedy at glyph boundaries.
#[derive(Debug, Default)]
pub struct FixedShaper;

impl TextShaper for FixedShaper {
    fn shape(
        &mut self,
        text: &str,
        font: &FontStyle,
        uc: &UnitContext,
        max_width: Option<f64>,
    ) -> TextRun {
        let font_size = font.size.to_dots(uc);
        let advance = font_size * 0.5;
        let line_height = font_size * font.line_height;

        let max_glyphs = max_width
            .map(|w| ((w / advance).floor() as usize).max(1))
            .unwrap_or(usize::MAX);

        let mut lines = Vec::new();
        let mut width = 0.0_f64;
        for raw in text.split('\n') {
            let glyphs: Vec<char> = raw.chars().collect();
            let mut start = 0;
            loop {
                let end = (start + max_glyphs).min(glyphs.len());
                let slice: String = glyphs[start..end].iter().collect();
                let line_width = slice.chars().count() as f64 * advance;
                width = width.max(line_width);
                lines.push(TextLine {
                    text: slice,
                    origin: Point::new(0.0, lines.len() as f64 * line_height),
                    width: line_width,
                });
                start = end;
                if start >= glyphs.len() {
                    break;
                }
            }
        }
        if lines.is_empty() {
            lines.push(TextLine {
                text: String::new(),
                origin: Point::ZERO,
                width: 0.0,
            });
        }

        TextRun {
            size: Size::new(width, lines.len() as f64 * line_height),
            lines,
            line_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Length;

    #[test]
    fn wraps_greedily() {
        let mut shaper = FixedShaper;
        let mut font = FontStyle::default();
        font.size = Length::Px(10.0);
        font.line_height = 1.0;
        let uc = UnitContext::new(96.0, Size::new(100.0, 100.0));
        // Glyph advance is 5 dots at 96 dpi... the unit context scales px.
        let run = shaper.shape("abcdefgh", &font, &uc, None);
        assert_eq!(run.lines.len(), 1);
        let wrapped = shaper.shape("abcdefgh", &font, &uc, Some(run.size.width / 2.0));
        assert_eq!(wrapped.lines.len(), 2);
    }
}
