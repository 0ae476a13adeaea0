// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Context types handed to widget trait methods.
//!
//! A context couples the widget's own base record with the slice of
//! scene-global state the current pass is allowed to touch. Widgets request
//! work through contexts; they never reach into the tree directly.

use kurbo::{Size, Vec2};

use crate::app::{SceneSettings, SceneState};
use crate::core::{WidgetId, WidgetState};
use crate::layout::Geometry;
use crate::paint::{BoxStyle, TextRun, TextShaper};
use crate::style::{StateFlags, Style, UnitContext};

/// Context for lifecycle notifications and mutations outside of events.
pub struct UpdateCtx<'a> {
    pub(crate) scene: &'a mut SceneState,
    pub(crate) widget_state: &'a mut WidgetState,
}

/// Context for event delivery.
pub struct EventCtx<'a> {
    pub(crate) scene: &'a mut SceneState,
    pub(crate) widget_state: &'a mut WidgetState,
    /// The widget the event was originally targeted at (events bubble).
    pub(crate) target: WidgetId,
}

/// Context for intrinsic size measurement.
pub struct MeasureCtx<'a> {
    pub(crate) shaper: &'a mut dyn TextShaper,
    pub(crate) uc: UnitContext,
    pub(crate) widget_state: &'a mut WidgetState,
}

/// Context for the render hook. Read-only: rendering must not mutate
/// geometry.
pub struct RenderCtx<'a> {
    pub(crate) uc: UnitContext,
    pub(crate) widget_state: &'a WidgetState,
}

macro_rules! impl_context_shared {
    ($ctx:ident) => {
        impl $ctx<'_> {
            pub fn widget_id(&self) -> WidgetId {
                self.widget_state.id
            }

            pub fn style(&self) -> &Style {
                &self.widget_state.style
            }

            pub fn geometry(&self) -> &Geometry {
                &self.widget_state.geom
            }

            pub fn has_state(&self, state: StateFlags) -> bool {
                self.widget_state.style.state(state)
            }

            pub fn is_disabled(&self) -> bool {
                self.widget_state.style.is_disabled()
            }
        }
    };
}

impl_context_shared!(UpdateCtx);
impl_context_shared!(EventCtx);
impl_context_shared!(MeasureCtx);
impl_context_shared!(RenderCtx);

macro_rules! impl_context_mutations {
    ($ctx:ident) => {
        impl $ctx<'_> {
            /// The widget's base record, for listener/styler registration and
            /// loose properties.
            pub fn state_mut(&mut self) -> &mut WidgetState {
                &mut *self.widget_state
            }

            /// Requests a repaint of this widget's subtree next frame.
            pub fn request_render(&mut self) {
                self.widget_state.request_render = true;
                self.widget_state.needs_render = true;
                self.scene.scene_needs_render = true;
            }

            /// Requests a full layout (and therefore a full render) next frame.
            pub fn request_layout(&mut self) {
                self.widget_state.needs_layout = true;
                self.scene.needs_layout = true;
            }

            /// Requests a restyle of this widget next frame; visual-only
            /// changes skip layout.
            pub fn request_restyle(&mut self) {
                self.widget_state.request_style = true;
                self.widget_state.needs_style = true;
                self.scene.scene_needs_render = true;
            }

            /// Sets or clears an interaction state bit, honoring ability
            /// gating. On change, reruns styling and schedules a render (the
            /// `apply_style_update` fast path). Returns whether the bit
            /// changed.
            pub fn set_state(&mut self, state: StateFlags, on: bool) -> bool {
                let changed = self.widget_state.style.set_state(state, on);
                if changed {
                    self.widget_state.forced_states.set(state, on);
                    self.request_restyle();
                    self.request_render();
                }
                changed
            }

            pub fn settings(&self) -> &SceneSettings {
                &self.scene.settings
            }

            /// Defers a structural mutation until the current pass or
            /// dispatch completes.
            ///
            /// Tree mutation inside a handler would invalidate the very
            /// borrows being walked; deferred closures run right after,
            /// before the next update tick consumes dirty flags.
            pub fn defer(&mut self, f: impl FnOnce(&mut crate::app::Scene) + 'static) {
                self.scene.deferred.push(Box::new(f));
            }

            /// Queues an event for this widget, dispatched after the current
            /// one finishes (strict FIFO).
            pub fn queue_event(&mut self, kind: crate::core::EventType) {
                let id = self.widget_state.id;
                self.scene.queued_events.push_back((id, kind));
            }
        }
    };
}

impl_context_mutations!(UpdateCtx);
impl_context_mutations!(EventCtx);

impl EventCtx<'_> {
    /// The widget the event was originally targeted at.
    pub fn target(&self) -> WidgetId {
        self.target
    }

    /// Submits an action for the scene driver to collect.
    pub fn emit_action<A: std::any::Any>(&mut self, action: A) {
        let id = self.widget_state.id;
        self.scene.actions.push_back((id, Box::new(action)));
    }

    /// Asks the scene to move key focus to this widget.
    pub fn request_focus(&mut self) {
        self.scene.pending_focus = Some(Some(self.widget_state.id));
    }

    /// Asks the scene to clear key focus.
    pub fn release_focus(&mut self) {
        if self.scene.pending_focus == Some(Some(self.widget_state.id))
            || self.scene.focus == Some(self.widget_state.id)
        {
            self.scene.pending_focus = Some(None);
        }
    }

    /// Announces that this widget's visible value changed. A `Change` event
    /// is dispatched to it after the current event finishes (strict FIFO).
    pub fn notify_change(&mut self) {
        self.queue_event(crate::core::EventType::Change);
    }

    /// Scrolls this widget's content by a delta, clamped to the content
    /// overhang. Schedules the scene-position rerun.
    pub fn scroll_by(&mut self, delta: Vec2) {
        let geom = &mut self.widget_state.geom;
        geom.scroll += delta;
        geom.clamp_scroll();
        self.widget_state.request_render = true;
        self.widget_state.needs_render = true;
        self.scene.scene_needs_render = true;
        self.scene.scene_pos_dirty = true;
    }
}

impl MeasureCtx<'_> {
    pub fn unit_context(&self) -> &UnitContext {
        &self.uc
    }

    /// Shapes text with the widget's computed font.
    pub fn shape_text(&mut self, text: &str, max_width: Option<f64>) -> TextRun {
        let font = self.widget_state.style.font.clone();
        self.shaper.shape(text, &font, &self.uc, max_width)
    }
}

impl RenderCtx<'_> {
    pub fn unit_context(&self) -> &UnitContext {
        &self.uc
    }

    /// The resolved standard-box paint for this widget.
    pub fn box_style(&self) -> BoxStyle {
        BoxStyle::from_style(&self.widget_state.style, &self.uc)
    }

    /// Content size granted by layout.
    pub fn content_size(&self) -> Size {
        self.widget_state.geom.alloc
    }
}
