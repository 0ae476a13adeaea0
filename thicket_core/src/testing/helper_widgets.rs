// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::Size;

use crate::core::{Event, EventCtx, MeasureCtx, RenderCtx, Update, UpdateCtx, Widget};
use crate::paint::PaintSurface;
use crate::style::Style;

type EventFn<S> = Box<dyn FnMut(&mut S, &mut EventCtx<'_>, &Event)>;
type UpdateFn<S> = Box<dyn FnMut(&mut S, &mut UpdateCtx<'_>, &Update)>;
type MeasureFn<S> = Box<dyn FnMut(&mut S, &mut MeasureCtx<'_>, Option<f64>) -> Size>;
type RenderFn<S> = Box<dyn FnMut(&mut S, &mut RenderCtx<'_>, &mut dyn PaintSurface)>;
type StyleFn<S> = Box<dyn Fn(&S, &mut Style)>;

/// A widget assembled from closures, for testing pass behavior without
/// writing a bespoke widget type per test.
pub struct ModularWidget<S = ()> {
    state: S,
    base_style: Option<StyleFn<S>>,
    on_event: Option<EventFn<S>>,
    on_update: Option<UpdateFn<S>>,
    measure: Option<MeasureFn<S>>,
    render: Option<RenderFn<S>>,
    label: Option<String>,
}

impl<S> ModularWidget<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            base_style: None,
            on_event: None,
            on_update: None,
            measure: None,
            render: None,
            label: None,
        }
    }

    pub fn base_style_fn(mut self, f: impl Fn(&S, &mut Style) + 'static) -> Self {
        self.base_style = Some(Box::new(f));
        self
    }

    pub fn event_fn(mut self, f: impl FnMut(&mut S, &mut EventCtx<'_>, &Event) + 'static) -> Self {
        self.on_event = Some(Box::new(f));
        self
    }

    pub fn update_fn(
        mut self,
        f: impl FnMut(&mut S, &mut UpdateCtx<'_>, &Update) + 'static,
    ) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }

    pub fn measure_fn(
        mut self,
        f: impl FnMut(&mut S, &mut MeasureCtx<'_>, Option<f64>) -> Size + 'static,
    ) -> Self {
        self.measure = Some(Box::new(f));
        self
    }

    pub fn render_fn(
        mut self,
        f: impl FnMut(&mut S, &mut RenderCtx<'_>, &mut dyn PaintSurface) + 'static,
    ) -> Self {
        self.render = Some(Box::new(f));
        self
    }

    /// Sets the label seen by focus-name typeahead.
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn state(&self) -> &S {
        &self.state
    }
}

impl<S: 'static> Widget for ModularWidget<S> {
    fn type_ident(&self) -> &'static str {
        "modular"
    }

    fn base_style(&self, style: &mut Style) {
        if let Some(f) = &self.base_style {
            f(&self.state, style);
        }
    }

    fn update(&mut self, ctx: &mut UpdateCtx<'_>, update: &Update) {
        if let Some(f) = &mut self.on_update {
            f(&mut self.state, ctx, update);
        }
    }

    fn intrinsic_size(&mut self, ctx: &mut MeasureCtx<'_>, max_width: Option<f64>) -> Size {
        match &mut self.measure {
            Some(f) => f(&mut self.state, ctx, max_width),
            None => Size::ZERO,
        }
    }

    fn on_event(&mut self, ctx: &mut EventCtx<'_>, event: &Event) {
        if let Some(f) = &mut self.on_event {
            f(&mut self.state, ctx, event);
        }
    }

    fn render(&mut self, ctx: &mut RenderCtx<'_>, surface: &mut dyn PaintSurface) {
        if let Some(f) = &mut self.render {
            f(&mut self.state, ctx, surface);
        }
    }

    fn focus_label(&self) -> Option<String> {
        self.label.clone()
    }
}
