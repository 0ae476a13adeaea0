// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::Vec2;

use crate::core::{Event, EventCtx, EventType, Widget};
use crate::style::{Abilities, Style};

/// The universal container: lays its children out per its computed display
/// mode and, when constructed with [`Frame::scrollable`], owns scrolling for
/// its overflow axes.
#[derive(Debug, Default)]
pub struct Frame {
    scrollable: bool,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// A frame with overflow-auto on both axes: scrollbars appear whenever
    /// content exceeds the box.
    pub fn scrollable() -> Self {
        Self { scrollable: true }
    }
}

impl Widget for Frame {
    fn type_ident(&self) -> &'static str {
        "frame"
    }

    fn base_style(&self, style: &mut Style) {
        style.abilities = Abilities::HOVERABLE;
        if self.scrollable {
            style.overflow = crate::layout::XY::splat(crate::style::Overflow::Auto);
            style.abilities |= Abilities::SCROLLABLE | Abilities::SLIDEABLE;
        }
    }

    fn on_event(&mut self, ctx: &mut EventCtx<'_>, event: &Event) {
        match event.kind {
            EventType::Scroll => {
                let has = ctx.state_mut().has_scroll;
                if has.x || has.y {
                    let delta = event.scroll_delta;
                    ctx.scroll_by(Vec2::new(-delta.x, -delta.y));
                    event.set_handled();
                }
            }
            EventType::SlideMove => {
                // A slide on the layout itself is an inverted scroll, scaled
                // down for a natural feel.
                let has = ctx.state_mut().has_scroll;
                if has.x || has.y {
                    let factor = ctx.settings().slide_scroll_factor;
                    ctx.scroll_by(event.prev_delta * factor);
                    event.set_handled();
                }
            }
            _ => {}
        }
    }
}
