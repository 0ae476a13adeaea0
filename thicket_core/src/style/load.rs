// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Loading style properties from tagged sources (JSON maps).
//!
//! Themes and test fixtures describe styles as `{"property": value}` maps.
//! Unknown names and uncoercible values surface as [`StyleError`]; the
//! affected property keeps its default.

use serde_json::Value;
use thiserror::Error;

use crate::style::{Background, Direction, Display, Length, Overflow, Sides, Style, TextAlign};

/// Errors from applying tagged style sources.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StyleError {
    #[error("unknown style property `{0}`")]
    UnknownProperty(String),
    #[error("property `{name}` cannot be set from {value}")]
    BadValue { name: String, value: String },
}

fn bad(name: &str, value: &Value) -> StyleError {
    StyleError::BadValue {
        name: name.into(),
        value: value.to_string(),
    }
}

fn parse_length(name: &str, value: &Value) -> Result<Length, StyleError> {
    if let Some(n) = value.as_f64() {
        return Ok(Length::Px(n));
    }
    let s = value.as_str().ok_or_else(|| bad(name, value))?.trim();
    let split = s
        .find(|c: char| c.is_ascii_alphabetic() || c == '%')
        .unwrap_or(s.len());
    let (num, unit) = s.split_at(split);
    let n: f64 = num.trim().parse().map_err(|_| bad(name, value))?;
    match unit {
        "" | "px" => Ok(Length::Px(n)),
        "dp" => Ok(Length::Dp(n)),
        "pt" => Ok(Length::Pt(n)),
        "em" => Ok(Length::Em(n)),
        "ex" => Ok(Length::Ex(n)),
        "ch" => Ok(Length::Ch(n)),
        "pw" | "%" => Ok(Length::Pw(n)),
        "ph" => Ok(Length::Ph(n)),
        "vw" => Ok(Length::Vw(n)),
        "vh" => Ok(Length::Vh(n)),
        _ => Err(bad(name, value)),
    }
}

fn parse_color(name: &str, value: &Value) -> Result<peniko::Color, StyleError> {
    let s = value.as_str().ok_or_else(|| bad(name, value))?;
    let hex = s.strip_prefix('#').ok_or_else(|| bad(name, value))?;
    let parse2 = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad(name, value));
    match hex.len() {
        6 => Ok(peniko::Color::rgb8(parse2(0)?, parse2(2)?, parse2(4)?)),
        8 => Ok(peniko::Color::rgba8(
            parse2(0)?,
            parse2(2)?,
            parse2(4)?,
            parse2(6)?,
        )),
        _ => Err(bad(name, value)),
    }
}

fn parse_overflow(name: &str, value: &Value) -> Result<Overflow, StyleError> {
    match value.as_str() {
        Some("visible") => Ok(Overflow::Visible),
        Some("hidden") => Ok(Overflow::Hidden),
        Some("auto") => Ok(Overflow::Auto),
        Some("scroll") => Ok(Overflow::Scroll),
        _ => Err(bad(name, value)),
    }
}

impl Style {
    /// Applies a single named property from a tagged source.
    pub fn apply_property(&mut self, name: &str, value: &Value) -> Result<(), StyleError> {
        match name {
            "display" => {
                self.display = match value.as_str() {
                    Some("flex") => Display::Flex,
                    Some("stacked") => Display::Stacked,
                    Some("grid") => Display::Grid,
                    Some("none") => Display::None,
                    _ => return Err(bad(name, value)),
                };
            }
            "direction" => {
                self.direction = match value.as_str() {
                    Some("row") => Direction::Row,
                    Some("column") => Direction::Column,
                    _ => return Err(bad(name, value)),
                };
            }
            "wrap" => self.wrap = value.as_bool().ok_or_else(|| bad(name, value))?,
            "columns" => {
                self.columns = value.as_u64().ok_or_else(|| bad(name, value))? as usize;
            }
            "opacity" => self.opacity = value.as_f64().ok_or_else(|| bad(name, value))?,
            "grow-x" => self.grow.x = value.as_f64().ok_or_else(|| bad(name, value))?,
            "grow-y" => self.grow.y = value.as_f64().ok_or_else(|| bad(name, value))?,
            "gap-x" => self.gap.x = parse_length(name, value)?,
            "gap-y" => self.gap.y = parse_length(name, value)?,
            "min-width" => self.min.x = parse_length(name, value)?,
            "min-height" => self.min.y = parse_length(name, value)?,
            "max-width" => self.max.x = parse_length(name, value)?,
            "max-height" => self.max.y = parse_length(name, value)?,
            "padding" => self.padding = Sides::all(parse_length(name, value)?),
            "margin" => self.margin = Sides::all(parse_length(name, value)?),
            "overflow-x" => self.overflow.x = parse_overflow(name, value)?,
            "overflow-y" => self.overflow.y = parse_overflow(name, value)?,
            "background" => self.background = Some(Background::Color(parse_color(name, value)?)),
            "color" => self.color = parse_color(name, value)?,
            "border-width" => self.border.widths = Sides::all(parse_length(name, value)?),
            "border-color" => self.border.colors = Sides::all(parse_color(name, value)?),
            "border-radius" => self.border.radius = [parse_length(name, value)?; 4],
            "font-size" => self.font.size = parse_length(name, value)?,
            "font-family" => {
                self.font.family = value.as_str().ok_or_else(|| bad(name, value))?.into();
            }
            "font-weight" => {
                self.font.weight = value.as_u64().ok_or_else(|| bad(name, value))? as u16;
            }
            "text-align" => {
                self.text_align = match value.as_str() {
                    Some("start") => TextAlign::Start,
                    Some("center") => TextAlign::Center,
                    Some("end") => TextAlign::End,
                    _ => return Err(bad(name, value)),
                };
            }
            "text-wrap" => self.text_wrap = value.as_bool().ok_or_else(|| bad(name, value))?,
            _ => return Err(StyleError::UnknownProperty(name.into())),
        }
        Ok(())
    }

    /// Applies every property of a tagged map. Known properties are applied
    /// even when a later one errors; the first error is reported.
    pub fn apply_map(&mut self, map: &serde_json::Map<String, Value>) -> Result<(), StyleError> {
        let mut first_err = None;
        for (name, value) in map {
            if let Err(err) = self.apply_property(name, value) {
                tracing::warn!("style source: {err}");
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn map(value: serde_json::Value) -> serde_json::Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn applies_known_properties() {
        let mut style = Style::default();
        style
            .apply_map(&map(json!({
                "display": "grid",
                "columns": 3,
                "padding": "2em",
                "background": "#102030",
                "min-width": "50%",
            })))
            .unwrap();
        assert_eq!(style.display, Display::Grid);
        assert_eq!(style.columns, 3);
        assert_eq!(style.padding.left, Length::Em(2.0));
        assert_eq!(style.min.x, Length::Pw(50.0));
    }

    #[test]
    fn unknown_property_keeps_default() {
        let mut style = Style::default();
        let err = style.apply_map(&map(json!({"blorp": 3, "opacity": 0.5})));
        assert_matches!(err, Err(StyleError::UnknownProperty(_)));
        // The known property still applied.
        assert_eq!(style.opacity, 0.5);
    }

    #[test]
    fn bad_value_reports_property() {
        let mut style = Style::default();
        let err = style.apply_property("display", &json!(42));
        assert_matches!(err, Err(StyleError::BadValue { .. }));
        assert_eq!(style.display, Display::Flex);
    }
}
