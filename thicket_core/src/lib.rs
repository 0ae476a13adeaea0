// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Thicket is a retained-mode widget/scene runtime.
//!
//! The crate owns the widget tree, the style cascade, the two-axis layout
//! engine, the render scheduler, the event manager, and the scroll/clip
//! substrate. Everything a platform must supply — a paint surface, an input
//! stream, a text shaper, a display timer — is consumed through the narrow
//! traits in [`paint`].
//!
//! The composition root is [`app::Scene`]. A scene owns a single widget tree
//! and is driven from the outside: feed it input with
//! [`Scene::handle_event`](app::Scene::handle_event), advance it once per
//! display frame with [`Scene::update`](app::Scene::update), and paint it with
//! [`Scene::render`](app::Scene::render).
//!
//! Widgets implement the [`core::Widget`] trait and are stored alongside their
//! framework-owned base record ([`core::WidgetState`]) in the tree. All
//! structural mutation goes through [`tree::TreeCtx`]; declarative rebuilds go
//! through [`tree::Plan`] reconciliation, which reuses children by
//! `(type, name)` instead of tearing the tree down.

#![deny(unsafe_code)]

pub mod util;

pub mod app;
pub mod bind;
pub mod core;
pub(crate) mod event;
pub mod layout;
pub mod paint;
pub(crate) mod passes;
pub mod scroll;
pub mod style;
pub mod testing;
pub mod tree;
pub mod widgets;

pub use cursor_icon;
pub use dpi;
pub use keyboard_types;
pub use kurbo;
pub use peniko;
