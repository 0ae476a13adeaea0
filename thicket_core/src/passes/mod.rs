// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Internal passes run by the scene every frame.
//!
//! Passes traverse the widget tree in a fixed order; each consumes the dirty
//! flags it is responsible for and always recurses over all children, so no
//! flag can survive a pass and re-trigger it forever. This file holds the
//! pass-shared utilities.

pub(crate) mod layout;
pub(crate) mod render;
pub(crate) mod update;

use tracing::span::EnteredSpan;

use crate::core::WidgetState;

#[must_use = "Span will be immediately closed if dropped"]
pub(crate) fn enter_span_if(enabled: bool, state: &WidgetState) -> Option<EnteredSpan> {
    enabled.then(|| state.trace_span.clone().entered())
}

/// Per-pass detailed tracing toggles.
///
/// Most passes may visit a large number of widgets every frame; per-widget
/// spans for those default to off and can be enabled with the
/// `THICKET_TRACE_PASSES` environment variable (`all` or a comma-separated
/// subset of `update`, `style`, `layout`, `render`, `event`).
#[derive(Debug, Clone, Copy)]
pub(crate) struct PassTracing {
    pub(crate) update: bool,
    pub(crate) style: bool,
    pub(crate) layout: bool,
    pub(crate) render: bool,
    pub(crate) event: bool,
}

impl PassTracing {
    pub(crate) fn from_env() -> Self {
        let env_var = match std::env::var("THICKET_TRACE_PASSES") {
            Ok(env_var) => env_var,
            Err(std::env::VarError::NotPresent) => return Self::unit(false),
            Err(std::env::VarError::NotUnicode(value)) => {
                tracing::error!(
                    ?value,
                    "Couldn't parse `THICKET_TRACE_PASSES` environment variable: Not valid UTF-8",
                );
                return Self::unit(false);
            }
        };
        let env_var = env_var.trim();

        if env_var.eq_ignore_ascii_case("all") {
            return Self::unit(true);
        }
        let mut result = Self::unit(false);
        let mut supported_passes = [
            ("update", &mut result.update),
            ("style", &mut result.style),
            ("layout", &mut result.layout),
            ("render", &mut result.render),
            ("event", &mut result.event),
        ];
        for input_name in env_var.split(',').map(str::trim) {
            if let Some((_, value)) = supported_passes
                .iter_mut()
                .find(|(pass_name, _)| pass_name.eq_ignore_ascii_case(input_name))
            {
                **value = true;
            } else {
                tracing::warn!(pass = input_name, "THICKET_TRACE_PASSES: Unknown pass");
            }
        }
        result
    }

    const fn unit(value: bool) -> Self {
        Self {
            update: value,
            style: value,
            layout: value,
            render: value,
            event: value,
        }
    }
}
