// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

use std::any::Any;

use kurbo::Size;
use tracing::{Span, trace_span};

use crate::core::{Event, EventCtx, MeasureCtx, RenderCtx, Update, UpdateCtx, WidgetId};
use crate::paint::PaintSurface;
use crate::style::Style;

#[doc(hidden)]
/// A trait to access a [`Widget`] value as a trait object. It is implemented
/// for all types that implement `Widget`.
pub trait AsDynWidget {
    fn as_box_dyn(self: Box<Self>) -> Box<dyn Widget>;
    fn as_dyn(&self) -> &dyn Widget;
    fn as_mut_dyn(&mut self) -> &mut dyn Widget;
}

impl<T: Widget> AsDynWidget for T {
    fn as_box_dyn(self: Box<Self>) -> Box<dyn Widget> {
        self
    }

    fn as_dyn(&self) -> &dyn Widget {
        self as &dyn Widget
    }

    fn as_mut_dyn(&mut self) -> &mut dyn Widget {
        self as &mut dyn Widget
    }
}

/// A trait that lets functions either downcast to a `Sized` widget or keep a
/// `dyn Widget`.
pub trait FromDynWidget {
    /// Downcasts `widget` if `Self: Sized`, else returns it as-is.
    fn from_dyn(widget: &dyn Widget) -> Option<&Self>;
    /// Downcasts `widget` if `Self: Sized`, else returns it as-is.
    fn from_dyn_mut(widget: &mut dyn Widget) -> Option<&mut Self>;
}

impl<T: Widget> FromDynWidget for T {
    fn from_dyn(widget: &dyn Widget) -> Option<&Self> {
        (widget as &dyn Any).downcast_ref()
    }

    fn from_dyn_mut(widget: &mut dyn Widget) -> Option<&mut Self> {
        (widget as &mut dyn Any).downcast_mut()
    }
}

impl FromDynWidget for dyn Widget {
    fn from_dyn(widget: &dyn Widget) -> Option<&Self> {
        Some(widget)
    }

    fn from_dyn_mut(widget: &mut dyn Widget) -> Option<&mut Self> {
        Some(widget)
    }
}

/// The trait implemented by all widgets.
///
/// A widget holds only its own behavior and visible value; identity, style,
/// geometry, listeners, and dirty flags live in the framework-owned base
/// record ([`WidgetState`](crate::core::WidgetState)) stored next to it in
/// the tree. Trait methods are invoked by the passes with a matching context;
/// widgets request work (renders, layouts, focus) through that context rather
/// than mutating anything directly.
///
/// Layout participation is mostly automatic: the layout passes combine
/// children per the widget's computed display mode. A widget only implements
/// [`intrinsic_size`](Self::intrinsic_size) when it has content of its own to
/// measure (text, images), and [`render`](Self::render) when it paints beyond
/// the standard box. `render` is the only place paint commands may be
/// emitted, and it must not mutate geometry.
#[allow(unused_variables, reason = "Default impls don't use method arguments")]
pub trait Widget: AsDynWidget + Any {
    /// The stable type identifier used for auto-generated child names and
    /// plan reconciliation, e.g. `"frame"`.
    fn type_ident(&self) -> &'static str;

    /// Seeds the widget's style before the styler list runs: abilities,
    /// display mode, default paddings.
    fn base_style(&self, style: &mut Style) {}

    /// Handles lifecycle and status notifications.
    fn update(&mut self, ctx: &mut UpdateCtx<'_>, update: &Update) {}

    /// Reports intrinsic content size (text measurement, image dimensions).
    ///
    /// Called in the size-up pass with no width constraint, and again under
    /// the size-down redo with the allocated width when the widget reported
    /// that its size depends on it.
    fn intrinsic_size(&mut self, ctx: &mut MeasureCtx<'_>, max_width: Option<f64>) -> Size {
        Size::ZERO
    }

    /// Whether the final size depends on the enclosing allocation (wrapped
    /// text). Triggers the size-down redo.
    fn wants_size_redo(&self, style: &Style) -> bool {
        false
    }

    /// Handles an event delivered to this widget. Runs before user listeners.
    fn on_event(&mut self, ctx: &mut EventCtx<'_>, event: &Event) {}

    /// Paints widget-specific content, after the standard box and before
    /// children.
    fn render(&mut self, ctx: &mut RenderCtx<'_>, surface: &mut dyn PaintSurface) {}

    /// Text for the tooltip opened by a long hover.
    fn tooltip_text(&self) -> Option<String> {
        None
    }

    /// The display label matched by focus-name typeahead.
    fn focus_label(&self) -> Option<String> {
        None
    }

    /// The tracing span all passes enter for this widget.
    fn make_trace_span(&self, id: WidgetId) -> Span {
        trace_span!("Widget", ident = self.type_ident(), id = id.to_raw())
    }

    /// Short name for diagnostics.
    fn short_type_name(&self) -> &'static str {
        let name = std::any::type_name::<Self>();
        name.split('<')
            .next()
            .unwrap_or(name)
            .split("::")
            .last()
            .unwrap_or(name)
    }
}

impl dyn Widget {
    /// Downcasts to a concrete widget type.
    pub fn downcast_ref<T: Widget>(&self) -> Option<&T> {
        (self.as_dyn() as &dyn Any).downcast_ref()
    }

    /// Downcasts to a concrete widget type, mutably.
    pub fn downcast_mut<T: Widget>(&mut self) -> Option<&mut T> {
        (self.as_mut_dyn() as &mut dyn Any).downcast_mut()
    }

    /// The `TypeId` of the concrete widget type.
    pub fn concrete_type_id(&self) -> std::any::TypeId {
        Any::type_id(self.as_dyn())
    }
}
