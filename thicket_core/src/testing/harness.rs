// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! A headless environment to test widgets in.

use std::time::{Duration, Instant};

use kurbo::{Point, Size, Vec2};

use crate::app::{Scene, SceneOptions, try_init_test_tracing};
use crate::core::{Button, ErasedAction, Event, EventType, Widget, WidgetId};
use crate::layout::Geometry;
use crate::testing::{FixedShaper, RecordingSurface};

/// Simulates a scene driver for testing.
///
/// Workflow: create a harness with some widget, send events as if a user
/// were interacting, then assert on widget state, submitted actions, or the
/// recorded paint ops. Every simulated input runs a full frame (update +
/// render), so dirty flags are consumed the way the real loop consumes them.
///
/// Time is simulated: [`advance`](Self::advance) moves the clock, which is
/// how long-hover, long-press, and typeahead timeouts are tested.
pub struct TestHarness {
    scene: Scene,
    surface: RecordingSurface,
    now: Instant,
    mouse_pos: Point,
}

impl TestHarness {
    /// Creates a harness with a 400×400 scene.
    pub fn create(root: impl Widget) -> Self {
        Self::create_with_size(root, Size::new(400.0, 400.0))
    }

    pub fn create_with_size(root: impl Widget, size: Size) -> Self {
        Self::create_with_options(
            root,
            SceneOptions {
                size,
                ..SceneOptions::default()
            },
        )
    }

    pub fn create_with_options(root: impl Widget, options: SceneOptions) -> Self {
        try_init_test_tracing();
        let scene = Scene::new(root, Box::new(FixedShaper), options);
        let mut harness = Self {
            scene,
            surface: RecordingSurface::new(),
            now: Instant::now(),
            mouse_pos: Point::ZERO,
        };
        // Two frames settle the show iterations, like a real driver.
        harness.run_frame();
        harness.run_frame();
        harness
    }

    // --- MARK: ACCESS

    pub fn scene(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn scene_ref(&self) -> &Scene {
        &self.scene
    }

    /// The last rendered frame's paint ops.
    pub fn surface(&self) -> &RecordingSurface {
        &self.surface
    }

    pub fn geometry(&self, id: WidgetId) -> Geometry {
        self.scene
            .widget_state(id)
            .map(|s| s.geometry().clone())
            .unwrap_or_default()
    }

    pub fn pop_action(&mut self) -> Option<(WidgetId, ErasedAction)> {
        self.scene.pop_action()
    }

    /// Pops the oldest action, downcast to a concrete type.
    pub fn pop_action_as<A: 'static>(&mut self) -> Option<(WidgetId, A)> {
        let (id, action) = self.scene.pop_action()?;
        let action = action.downcast::<A>().ok()?;
        Some((id, *action))
    }

    // --- MARK: FRAMES

    /// Runs one update + render frame at the simulated time.
    pub fn run_frame(&mut self) {
        self.scene.update(self.now);
        self.surface.clear();
        self.scene.render(&mut self.surface);
    }

    /// Advances the simulated clock and runs a frame (fires due timers).
    pub fn advance(&mut self, duration: Duration) {
        self.now += duration;
        self.run_frame();
    }

    // --- MARK: INPUT

    fn send(&mut self, event: Event) {
        self.scene.handle_event(event);
        self.run_frame();
    }

    pub fn mouse_move(&mut self, pos: Point) {
        self.mouse_pos = pos;
        self.send(Event::new(EventType::MouseMove, self.now).with_pos(pos));
    }

    pub fn mouse_down(&mut self) {
        self.send(
            Event::new(EventType::MouseDown, self.now)
                .with_pos(self.mouse_pos)
                .with_button(Button::Primary),
        );
    }

    pub fn mouse_up(&mut self) {
        self.send(
            Event::new(EventType::MouseUp, self.now)
                .with_pos(self.mouse_pos)
                .with_button(Button::Primary),
        );
    }

    /// Move, press, release at a point.
    pub fn mouse_click(&mut self, pos: Point) {
        self.mouse_move(pos);
        self.mouse_down();
        self.mouse_up();
    }

    /// Clicks the center of a widget's outer bounding box.
    pub fn mouse_click_on(&mut self, id: WidgetId) {
        let center = self.geometry(id).total_bbox.center();
        self.mouse_click(center);
    }

    /// Drags from the current position by `delta`, in small steps.
    pub fn mouse_drag_by(&mut self, delta: Vec2) {
        self.mouse_down();
        let start = self.mouse_pos;
        for i in 1..=4 {
            let t = i as f64 / 4.0;
            self.mouse_move(start + delta * t);
        }
        self.mouse_up();
    }

    pub fn scroll_at(&mut self, pos: Point, delta: Vec2) {
        self.send(
            Event::new(EventType::Scroll, self.now)
                .with_pos(pos)
                .with_scroll_delta(delta),
        );
    }

    pub fn key_down(&mut self, key: keyboard_types::Key) {
        self.send(Event::new(EventType::KeyDown, self.now).with_key(key));
    }

    pub fn key_down_with(&mut self, key: keyboard_types::Key, modifiers: keyboard_types::Modifiers) {
        self.send(
            Event::new(EventType::KeyDown, self.now)
                .with_key(key)
                .with_modifiers(modifiers),
        );
    }

    /// Types one printable character.
    pub fn type_char(&mut self, c: &str) {
        self.key_down(keyboard_types::Key::Character(c.into()));
    }
}

impl std::fmt::Debug for TestHarness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestHarness")
            .field("scene", &self.scene)
            .finish_non_exhaustive()
    }
}
