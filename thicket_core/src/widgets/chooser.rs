// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::{Point, Size};
use peniko::Color;

use crate::app::{Scene, StageKind};
use crate::core::{Event, EventCtx, EventType, MeasureCtx, RenderCtx, Widget, WidgetId};
use crate::paint::{PaintSurface, TextRun};
use crate::style::{Abilities, Background, Length, Sides, StateFlags, Style};
use crate::widgets::{Button, Frame};

/// Selection from a list of options, presented in a popup menu.
#[derive(Debug, Default)]
pub struct Chooser {
    options: Vec<String>,
    selected: usize,
    run: Option<TextRun>,
}

impl Chooser {
    pub fn new(options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            selected: 0,
            run: None,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.options.get(self.selected).map(String::as_str)
    }

    pub fn select(scene: &mut Scene, id: WidgetId, index: usize) {
        let changed = scene
            .with_widget::<Self, _>(id, |chooser, _| {
                if index < chooser.options.len() && index != chooser.selected {
                    chooser.selected = index;
                    chooser.run = None;
                    true
                } else {
                    false
                }
            })
            .unwrap_or(false);
        if changed {
            scene.mark_needs_layout(id);
            scene.state.queued_events.push_back((id, EventType::Change));
        }
    }

    /// Opens the option menu as a popup stage below the chooser.
    fn open_menu(&self, ctx: &mut EventCtx<'_>) {
        let chooser = ctx.widget_id();
        let options = self.options.clone();
        let below = {
            let rect = ctx.geometry().outer_rect();
            Point::new(rect.x0, rect.y1 + 2.0)
        };
        ctx.defer(move |scene| {
            let menu = Frame::new();
            let Ok(menu_id) = scene.open_stage(StageKind::Menu, menu, below, Some(chooser)) else {
                return;
            };
            {
                let mut tree = scene.tree();
                if let Some(state) = tree.state_mut(menu_id) {
                    state.styler(|s| {
                        s.direction = crate::style::Direction::Column;
                        s.background = Some(Background::Color(Color::WHITE));
                        s.border.widths = Sides::all(Length::Px(1.0));
                        s.border.colors = Sides::all(Color::rgb8(160, 160, 160));
                    });
                }
                for (index, option) in options.iter().enumerate() {
                    let Ok(item) = tree.add_child(menu_id, Button::new(option.clone())) else {
                        continue;
                    };
                    if let Some(state) = tree.state_mut(item) {
                        state.on(EventType::Click, move |item_ctx, _| {
                            item_ctx.defer(move |scene| {
                                Chooser::select(scene, chooser, index);
                                scene.close_stage(menu_id);
                            });
                        });
                    }
                }
            }
            scene.run_deferred();
        });
    }
}

impl Widget for Chooser {
    fn type_ident(&self) -> &'static str {
        "chooser"
    }

    fn base_style(&self, style: &mut Style) {
        style.abilities = Abilities::ACTIVATABLE | Abilities::FOCUSABLE | Abilities::HOVERABLE;
        style.padding = Sides {
            top: Length::Px(4.0),
            right: Length::Px(20.0),
            bottom: Length::Px(4.0),
            left: Length::Px(8.0),
        };
        style.border.widths = Sides::all(Length::Px(1.0));
        style.border.colors = Sides::all(Color::rgb8(110, 110, 110));
        style.border.radius = [Length::Px(4.0); 4];
        style.cursor = cursor_icon::CursorIcon::Pointer;
        if style.states.contains(StateFlags::FOCUSED) {
            style.border.colors = Sides::all(Color::rgb8(30, 90, 200));
        }
    }

    fn intrinsic_size(&mut self, ctx: &mut MeasureCtx<'_>, _max_width: Option<f64>) -> Size {
        // Wide enough for the widest option, so selection changes don't
        // shift layout.
        let mut widest = Size::ZERO;
        for option in &self.options {
            let run = ctx.shape_text(option, None);
            widest.width = widest.width.max(run.size.width);
            widest.height = widest.height.max(run.size.height);
        }
        let text = self.selected_label().unwrap_or("").to_string();
        self.run = Some(ctx.shape_text(&text, None));
        widest
    }

    fn on_event(&mut self, ctx: &mut EventCtx<'_>, event: &Event) {
        if event.kind == EventType::Click {
            self.open_menu(ctx);
            event.set_handled();
        }
    }

    fn render(&mut self, ctx: &mut RenderCtx<'_>, surface: &mut dyn PaintSurface) {
        let geom = ctx.geometry();
        let origin = geom.content_origin();
        if let Some(run) = &self.run {
            surface.draw_text(run, origin, ctx.style().color);
        }
        // Disclosure arrow in the right padding.
        let rect = geom.box_rect();
        let cx = rect.x1 - 12.0;
        let cy = rect.center().y;
        let color = ctx.style().color;
        surface.stroke_line(Point::new(cx - 4.0, cy - 2.0), Point::new(cx, cy + 3.0), color, 1.5);
        surface.stroke_line(Point::new(cx, cy + 3.0), Point::new(cx + 4.0, cy - 2.0), color, 1.5);
    }

    fn focus_label(&self) -> Option<String> {
        self.selected_label().map(str::to_string)
    }
}
