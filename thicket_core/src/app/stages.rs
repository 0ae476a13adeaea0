// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Stages: layered presentation contexts above the base layer.
//!
//! The scene root is a stacked container; the base layer (the app's widget
//! tree) is its first child and every open stage adds another. Stages affect
//! input routing: the top stage consumes `Escape`, and a click outside it
//! closes it.

use crate::core::{Widget, WidgetId};
use crate::style::{Abilities, Display, Style};

/// What kind of layer a stage is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Popup,
    Menu,
    Dialog,
    Tooltip,
    Snackbar,
}

impl StageKind {
    /// Whether `Escape` and outside clicks dismiss this stage.
    pub fn dismissable(self) -> bool {
        !matches!(self, Self::Snackbar)
    }
}

/// One open stage.
#[derive(Debug, Clone)]
pub struct Stage {
    pub kind: StageKind,
    /// The stage's root widget, a child of the scene root.
    pub root: WidgetId,
    /// The widget that opened the stage (tooltip anchor, menu button).
    pub owner: Option<WidgetId>,
}

/// The scene's root widget: a stacked container holding the base layer and
/// the open stages. All layers render (top-only stacking is off).
#[derive(Debug, Default)]
pub struct SceneRoot;

impl Widget for SceneRoot {
    fn type_ident(&self) -> &'static str {
        "scene-root"
    }

    fn base_style(&self, style: &mut Style) {
        style.display = Display::Stacked;
        style.stack_top_only = false;
        style.abilities = Abilities::empty();
    }
}
