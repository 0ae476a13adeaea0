// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Interaction tuning, passed at scene construction.

use std::time::Duration;

use kurbo::Size;

/// Timings and distances for gestures, scrolling, and the frame loop.
///
/// Tests substitute their own values; nothing reads these from global state.
#[derive(Debug, Clone)]
pub struct SceneSettings {
    /// Maximum delay between clicks counted as a double click.
    pub double_click_delay: Duration,
    /// Rest time before a long hover fires.
    pub long_hover_delay: Duration,
    /// Hold time before a long press fires.
    pub long_press_delay: Duration,
    /// Idle time after which the focus-name typeahead buffer resets.
    pub focus_name_timeout: Duration,
    /// Pointer travel before a press becomes a drag.
    pub drag_start_distance: f64,
    /// Pointer travel before a press becomes a slide.
    pub slide_start_distance: f64,
    /// Fallback scroll step when a frame has no line metric, in dots.
    pub scroll_line_step: f64,
    /// Page step, in line steps.
    pub scroll_page_lines: f64,
    /// Multiplier for slide-as-scroll on layouts (inverted, "natural" feel).
    pub slide_scroll_factor: f64,
    /// Edge proximity that triggers auto-scroll during drag, as a fraction
    /// of the viewport.
    pub auto_scroll_margin: f64,
    /// Minimum delay between auto-scroll steps.
    pub auto_scroll_delay: Duration,
    /// Minimum scrollbar thumb length, in dots.
    pub scrollbar_min_thumb: f64,
    /// Scrollbar track thickness, in dots.
    pub scrollbar_width: f64,
    /// Number of initial frames that force layout while real sizes settle.
    pub show_iters: u32,
    /// Size-negotiation iterations before accepting divergence.
    pub layout_max_iters: u32,
    /// How long a snackbar stays up.
    pub snackbar_duration: Duration,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            double_click_delay: Duration::from_millis(500),
            long_hover_delay: Duration::from_millis(500),
            long_press_delay: Duration::from_millis(500),
            focus_name_timeout: Duration::from_millis(500),
            drag_start_distance: 4.0,
            slide_start_distance: 4.0,
            scroll_line_step: 16.0,
            scroll_page_lines: 10.0,
            slide_scroll_factor: 0.1,
            auto_scroll_margin: 0.1,
            auto_scroll_delay: Duration::from_millis(100),
            scrollbar_min_thumb: 24.0,
            scrollbar_width: 10.0,
            show_iters: 2,
            layout_max_iters: 3,
            snackbar_duration: Duration::from_secs(3),
        }
    }
}

/// Options for creating a [`Scene`](crate::app::Scene).
#[derive(Debug, Clone)]
pub struct SceneOptions {
    /// Initial scene size, in dots.
    pub size: Size,
    /// Dots per inch of the target surface.
    pub dpi: f64,
    pub settings: SceneSettings,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            size: Size::new(800.0, 600.0),
            dpi: 96.0,
            settings: SceneSettings::default(),
        }
    }
}
