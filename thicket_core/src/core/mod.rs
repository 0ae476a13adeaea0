// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Widget trait, base record, events, and pass contexts.

mod contexts;
mod events;
mod widget;
mod widget_state;

pub use contexts::{EventCtx, MeasureCtx, RenderCtx, UpdateCtx};
pub use events::{Button, Event, EventType, Update};
pub use widget::{AsDynWidget, FromDynWidget, Widget};
pub use widget_state::{Listener, WidgetId, WidgetState};

/// A widget-submitted action, observed by the scene driver.
pub type ErasedAction = Box<dyn std::any::Any>;
