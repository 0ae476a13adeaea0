// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! The built-in widget set.
//!
//! Every widget here is ordinary user-level code: it implements
//! [`Widget`](crate::core::Widget), seeds its abilities and box style in
//! `base_style`, and reacts to events through its contexts. Nothing in this
//! module reaches into the passes.

mod button;
mod chooser;
mod frame;
mod icon;
mod label;
mod node_base;
mod slider;
mod spinner;
mod splits;
mod switch;
mod text_field;
mod tooltip;

pub use button::{Button, ButtonPressed};
pub use chooser::Chooser;
pub use frame::Frame;
pub use icon::Icon;
pub use label::Label;
pub use node_base::NodeBase;
pub use slider::{ScrollBar, Slider, SliderCore};
pub use spinner::Spinner;
pub use splits::Splits;
pub use switch::Switch;
pub use text_field::TextField;
pub use tooltip::Tooltip;

use crate::layout::Dim;
use crate::tree::WidgetRegistry;

/// Registers every built-in widget type.
pub fn register_builtins(registry: &mut WidgetRegistry) {
    registry.register::<NodeBase>("node-base");
    registry.register::<Frame>("frame");
    registry.register::<Splits>("splits");
    registry.register::<Label>("label");
    registry.register::<Icon>("icon");
    registry.register::<Button>("button");
    registry.register::<Switch>("switch");
    registry.register::<Slider>("slider");
    registry.register::<Spinner>("spinner");
    registry.register::<TextField>("text-field");
    registry.register::<Chooser>("chooser");
    registry.register::<Tooltip>("tooltip");
    registry.register_with("scrollbar", || Box::new(ScrollBar::new(Dim::Y)));
}
