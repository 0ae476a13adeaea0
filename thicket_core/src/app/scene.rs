// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! The scene: composition root and frame driver.
//!
//! A scene owns the widget tree, the event manager state, and the stage
//! stack. It is driven from the outside at display frequency: feed input with
//! [`Scene::handle_event`], advance with [`Scene::update`], paint with
//! [`Scene::render`]. Each update tick consumes the dirty flags in priority
//! order — rebuild, restyle, layout, render — and nothing else in the crate
//! runs a pass.

use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::atomic::Ordering;
use std::time::Instant;

use kurbo::{Point, Size};
use tracing::info_span;

use crate::app::proxy::{ProxyShared, SceneProxy};
use crate::app::stages::{SceneRoot, Stage, StageKind};
use crate::app::{SceneOptions, SceneSettings};
use crate::core::{ErasedAction, Event, EventType, Widget, WidgetId, WidgetState};
use crate::debug_panic;
use crate::event::{DragState, PressState, SlideState, TimerState, TypeAhead};
use crate::paint::{PaintSurface, TextShaper};
use crate::passes::layout::{LayoutDriver, run_scene_pos_pass};
use crate::passes::render::run_render_pass;
use crate::passes::update::{run_show_pass, run_style_pass};
use crate::passes::PassTracing;
use crate::tree::arena::{ArenaNode, WidgetArena};
use crate::tree::{TreeCtx, TreeError, WidgetRegistry};

/// State shared between passes and contexts.
///
/// Everything the event manager and the passes need that is not the tree
/// itself lives here, so a pass can borrow the tree and this state
/// independently.
pub struct SceneState {
    pub(crate) settings: SceneSettings,
    pub(crate) dpi: f64,
    pub(crate) trace: PassTracing,
    pub(crate) now: Instant,

    // Scheduling flags.
    pub(crate) scene_needs_render: bool,
    pub(crate) needs_layout: bool,
    pub(crate) scene_pos_dirty: bool,
    pub(crate) rebuild: bool,
    pub(crate) style_epoch: u64,
    pub(crate) styled_epoch: u64,

    // Event manager state.
    pub(crate) focus: Option<WidgetId>,
    pub(crate) focused_path: Vec<WidgetId>,
    pub(crate) pending_focus: Option<Option<WidgetId>>,
    pub(crate) hovered_path: Vec<WidgetId>,
    pub(crate) last_pos: Option<Point>,
    pub(crate) press: Option<PressState>,
    pub(crate) drag: Option<DragState>,
    pub(crate) slide: Option<SlideState>,
    pub(crate) last_click: Option<(WidgetId, Instant)>,
    pub(crate) long_hover: Option<TimerState>,
    pub(crate) long_press: Option<TimerState>,
    pub(crate) typeahead: TypeAhead,
    pub(crate) cursor: cursor_icon::CursorIcon,
    pub(crate) auto_scroll_last: Option<Instant>,

    // Cross-pass queues.
    pub(crate) actions: VecDeque<(WidgetId, ErasedAction)>,
    pub(crate) queued_events: VecDeque<(WidgetId, EventType)>,
    pub(crate) deferred: Vec<Box<dyn FnOnce(&mut Scene)>>,
    pub(crate) bound_widgets: Vec<WidgetId>,

    pub(crate) stages: Vec<Stage>,
    pub(crate) snackbar_deadline: Option<(WidgetId, Instant)>,
}

impl SceneState {
    fn new(settings: SceneSettings, dpi: f64) -> Self {
        Self {
            settings,
            dpi,
            trace: PassTracing::from_env(),
            now: Instant::now(),
            scene_needs_render: true,
            needs_layout: true,
            scene_pos_dirty: false,
            rebuild: false,
            style_epoch: 1,
            styled_epoch: 0,
            focus: None,
            focused_path: Vec::new(),
            pending_focus: None,
            hovered_path: Vec::new(),
            last_pos: None,
            press: None,
            drag: None,
            slide: None,
            last_click: None,
            long_hover: None,
            long_press: None,
            typeahead: TypeAhead::default(),
            cursor: cursor_icon::CursorIcon::Default,
            auto_scroll_last: None,
            actions: VecDeque::new(),
            queued_events: VecDeque::new(),
            deferred: Vec::new(),
            bound_widgets: Vec::new(),
            stages: Vec::new(),
            snackbar_deadline: None,
        }
    }

    /// Drops every reference to widgets that just left the tree. Pending
    /// timers aimed at a destroyed widget are cancelled here, so a timer can
    /// never fire at freed state.
    pub(crate) fn purge(&mut self, removed: &[WidgetId]) {
        let gone = |id: &WidgetId| removed.contains(id);
        if self.focus.as_ref().is_some_and(gone) {
            self.focus = None;
        }
        if let Some(Some(id)) = self.pending_focus
            && gone(&id)
        {
            self.pending_focus = Some(None);
        }
        self.focused_path.retain(|id| !gone(id));
        self.hovered_path.retain(|id| !gone(id));
        if self.press.as_ref().is_some_and(|p| gone(&p.target)) {
            self.press = None;
        }
        if self.drag.as_ref().is_some_and(|d| gone(&d.target)) {
            self.drag = None;
        }
        if self.slide.as_ref().is_some_and(|s| gone(&s.target)) {
            self.slide = None;
        }
        if self.last_click.as_ref().is_some_and(|(id, _)| gone(id)) {
            self.last_click = None;
        }
        if self.long_hover.as_ref().is_some_and(|t| gone(&t.target)) {
            self.long_hover = None;
        }
        if self.long_press.as_ref().is_some_and(|t| gone(&t.target)) {
            self.long_press = None;
        }
        self.queued_events.retain(|(id, _)| !gone(id));
        self.bound_widgets.retain(|id| !gone(id));
        self.stages.retain(|s| !gone(&s.root));
        if self.snackbar_deadline.is_some_and(|(id, _)| gone(&id)) {
            self.snackbar_deadline = None;
        }
    }
}

/// The rendering root: owns the widget tree and drives the frame.
pub struct Scene {
    pub(crate) arena: WidgetArena,
    pub(crate) state: SceneState,
    pub(crate) registry: Rc<WidgetRegistry>,
    pub(crate) shaper: Box<dyn TextShaper>,
    pub(crate) size: Size,
    pub(crate) updating: bool,
    pub(crate) show_iter: u32,
    pub(crate) render_force: bool,
    pub(crate) root_id: WidgetId,
    pub(crate) main_id: WidgetId,
    pub(crate) queue: std::sync::Arc<ProxyShared>,
}

impl Scene {
    /// Creates a scene with the built-in widget registry. `root` becomes the
    /// base layer, stretched to the scene size.
    pub fn new(root: impl Widget, shaper: Box<dyn TextShaper>, options: SceneOptions) -> Self {
        Self::with_registry(
            root,
            shaper,
            Rc::new(WidgetRegistry::with_builtins()),
            options,
        )
    }

    /// Creates a scene with a caller-built registry.
    pub fn with_registry(
        root: impl Widget,
        shaper: Box<dyn TextShaper>,
        registry: Rc<WidgetRegistry>,
        options: SceneOptions,
    ) -> Self {
        let SceneOptions {
            size,
            dpi,
            settings,
        } = options;
        let mut state = SceneState::new(settings, dpi);

        let mut arena = WidgetArena::new();
        let root_widget = SceneRoot;
        let root_id = WidgetId::next();
        let mut root_state = WidgetState::new(root_id, "scene".into(), root_widget.type_ident());
        root_state.trace_span = root_widget.make_trace_span(root_id);
        arena.set_root(ArenaNode::new(Box::new(root_widget), root_state));

        let main_id = {
            let mut ctx = TreeCtx {
                arena: &mut arena,
                scene: &mut state,
                registry: &registry,
            };
            let main_id = ctx
                .add_named_child(root_id, root, "main")
                .expect("fresh scene root cannot collide");
            let main_state = ctx.state_mut(main_id).expect("just inserted");
            main_state.styler(|s| {
                s.grow = crate::layout::XY::splat(1.0);
            });
            main_id
        };

        Self {
            arena,
            state,
            registry,
            shaper,
            size,
            updating: false,
            show_iter: 0,
            render_force: true,
            root_id,
            main_id,
            queue: ProxyShared::new(),
        }
    }

    // --- MARK: ACCESS

    /// The scene root (the stage stack container).
    pub fn root_id(&self) -> WidgetId {
        self.root_id
    }

    /// The base layer: the widget passed to [`Scene::new`].
    pub fn main_id(&self) -> WidgetId {
        self.main_id
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.state.settings
    }

    /// The structural mutation surface.
    pub fn tree(&mut self) -> TreeCtx<'_> {
        TreeCtx {
            arena: &mut self.arena,
            scene: &mut self.state,
            registry: &self.registry,
        }
    }

    /// Runs `f` against the tree and flushes any deferred work it queued.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut TreeCtx<'_>) -> R) -> R {
        let mut ctx = self.tree();
        let out = f(&mut ctx);
        self.run_deferred();
        out
    }

    /// Runs `f` with a typed borrow of a widget.
    pub fn with_widget<T: Widget, R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut T, &mut WidgetState) -> R,
    ) -> Option<R> {
        let node = self.arena.find_mut(id)?;
        let widget = node.item.widget.downcast_mut::<T>()?;
        Some(f(widget, &mut node.item.state))
    }

    /// A widget's base record.
    pub fn widget_state(&self, id: WidgetId) -> Option<&WidgetState> {
        self.arena.get_state(id)
    }

    /// Pops the oldest action a widget submitted.
    pub fn pop_action(&mut self) -> Option<(WidgetId, ErasedAction)> {
        self.state.actions.pop_front()
    }

    /// Invalidates a widget's layout (and therefore the next frame's render).
    pub fn mark_needs_layout(&mut self, id: WidgetId) {
        if let Some(state) = self.arena.get_state_mut(id) {
            state.needs_layout = true;
        }
        self.state.needs_layout = true;
    }

    /// Schedules a repaint of a widget's subtree.
    pub fn mark_needs_render(&mut self, id: WidgetId) {
        let path = self.arena.id_path(id);
        if let Some(state) = self.arena.get_state_mut(id) {
            state.request_render = true;
        }
        // Bubble so the render walk finds the flagged subtree.
        for step in path {
            if let Some(state) = self.arena.get_state_mut(step) {
                state.needs_render = true;
            }
        }
        self.state.scene_needs_render = true;
    }

    pub fn focused_widget(&self) -> Option<WidgetId> {
        self.state.focus
    }

    /// Moves key focus, observing focusability.
    pub fn focus_on(&mut self, id: Option<WidgetId>) {
        self.state.pending_focus = Some(id);
        crate::event::apply_pending_focus(self);
    }

    pub fn cursor(&self) -> cursor_icon::CursorIcon {
        self.state.cursor
    }

    /// A `Send` handle for mutations from other threads.
    pub fn proxy(&self) -> SceneProxy {
        SceneProxy {
            shared: self.queue.clone(),
        }
    }

    // --- MARK: INVALIDATION

    pub fn set_size(&mut self, size: Size) {
        if self.size != size {
            self.size = size;
            self.state.needs_layout = true;
        }
    }

    /// DPI or theme change: full rebuild (restyle, layout, render).
    pub fn set_dpi(&mut self, dpi: f64) {
        if self.state.dpi != dpi {
            self.state.dpi = dpi;
            self.request_rebuild();
        }
    }

    /// Requests the full rebuild path on the next tick.
    pub fn request_rebuild(&mut self) {
        self.state.rebuild = true;
    }

    /// Requests a restyle of every widget on the next tick.
    pub fn request_restyle_all(&mut self) {
        self.state.style_epoch += 1;
    }

    // --- MARK: FRAME

    /// Advances one frame tick: queued mutations, timers, then the flag
    /// ladder (rebuild → restyle → layout). Rejects reentrant calls.
    pub fn update(&mut self, now: Instant) {
        if self.updating {
            debug_panic!("reentrant scene update");
            return;
        }
        self.updating = true;
        let _span = info_span!("update").entered();
        self.state.now = now;

        self.run_queued();
        self.run_deferred();

        run_show_pass(&mut self.arena, &mut self.state);

        crate::event::tick_timers(self, now);
        self.run_deferred();
        self.drain_queued_events();

        if let Some((root, deadline)) = self.state.snackbar_deadline
            && now >= deadline
        {
            self.state.snackbar_deadline = None;
            self.close_stage(root);
        }

        crate::bind::run_sync_down(self);

        if self.state.rebuild {
            self.state.rebuild = false;
            self.state.style_epoch += 1;
        }
        let restyle_all = self.state.styled_epoch < self.state.style_epoch;
        run_style_pass(&mut self.arena, &mut self.state, restyle_all);
        if restyle_all {
            self.state.styled_epoch = self.state.style_epoch;
            self.state.needs_layout = true;
        }

        let force_layout = self.show_iter < self.state.settings.show_iters;
        let needs_layout = force_layout
            || self.state.needs_layout
            || self.arena.root().item.state.needs_layout;
        if needs_layout {
            let mut driver = LayoutDriver {
                scene: &mut self.state,
                shaper: &mut *self.shaper,
            };
            driver.run(&mut self.arena, self.size);
            self.state.needs_layout = false;
            self.state.scene_pos_dirty = false;
            crate::scroll::config_scrolls(self);
            crate::scroll::position_scrolls(self);
            // Layout strictly implies a subsequent full render.
            self.render_force = true;
            self.state.scene_needs_render = true;
        } else if self.state.scene_pos_dirty {
            run_scene_pos_pass(&mut self.arena, self.size);
            crate::scroll::position_scrolls(self);
            self.state.scene_pos_dirty = false;
        }

        self.show_iter = self.show_iter.saturating_add(1);
        self.updating = false;
    }

    /// Paints the tree. Only subtrees carrying render flags repaint, except
    /// after layout, which repaints everything.
    pub fn render(&mut self, surface: &mut dyn PaintSurface) {
        if !self.state.scene_needs_render && !self.render_force {
            return;
        }
        let force = self.render_force;
        run_render_pass(&mut self.arena, &mut self.state, surface, self.size, force);
        self.state.scene_needs_render = false;
        self.render_force = false;
    }

    /// Dispatches one input event synchronously, then any events and
    /// structural mutations it queued, in FIFO order.
    pub fn handle_event(&mut self, event: Event) {
        self.state.now = event.time;
        crate::event::handle_input(self, &event);
        self.run_deferred();
        self.drain_queued_events();
    }

    // --- MARK: STAGES

    /// Opens a stage above the base layer, positioned at `pos`.
    pub fn open_stage(
        &mut self,
        kind: StageKind,
        widget: impl Widget,
        pos: Point,
        owner: Option<WidgetId>,
    ) -> Result<WidgetId, TreeError> {
        let root_id = self.root_id;
        let id = {
            let mut ctx = self.tree();
            let id = ctx.add_child(root_id, widget)?;
            let state = ctx.state_mut(id).expect("just inserted");
            state.styler(move |s| {
                s.margin.left = crate::style::Length::Px(pos.x);
                s.margin.top = crate::style::Length::Px(pos.y);
            });
            id
        };
        self.state.stages.push(Stage {
            kind,
            root: id,
            owner,
        });
        crate::event::dispatch_to_widget(self, id, &Event::new(EventType::Show, self.state.now));
        // Stages nominate their first focusable descendant.
        if matches!(kind, StageKind::Popup | StageKind::Menu | StageKind::Dialog) {
            crate::event::focus_first_descendant(self, id);
        }
        self.state.needs_layout = true;
        Ok(id)
    }

    /// Closes the stage whose root is `root`, destroying its subtree.
    pub fn close_stage(&mut self, root: WidgetId) {
        let Some(index) = self.state.stages.iter().position(|s| s.root == root) else {
            return;
        };
        self.state.stages.remove(index);
        crate::event::dispatch_to_widget(self, root, &Event::new(EventType::Close, self.state.now));
        let _ = self.edit(|ctx| ctx.delete(root));
    }

    pub(crate) fn top_stage(&self) -> Option<&Stage> {
        self.state.stages.last()
    }

    /// The open stages, bottom to top.
    pub fn stages(&self) -> &[Stage] {
        &self.state.stages
    }

    /// Shows a transient snackbar below the scene root, for validation
    /// failures and similar user-visible errors.
    pub fn show_snackbar(&mut self, text: impl Into<String>) {
        if let Some((root, _)) = self.state.snackbar_deadline.take() {
            self.close_stage(root);
        }
        let height = 32.0;
        let pos = Point::new(16.0, self.size.height - height - 16.0);
        let label = crate::widgets::Label::new(text);
        if let Ok(root) = self.open_stage(StageKind::Snackbar, label, pos, None) {
            let deadline = self.state.now + self.state.settings.snackbar_duration;
            self.state.snackbar_deadline = Some((root, deadline));
        }
    }

    // --- MARK: QUEUES

    fn run_queued(&mut self) {
        loop {
            let queued: Vec<_> = {
                let mut queue = self.queue.queue.lock();
                std::mem::take(&mut *queue)
            };
            if queued.is_empty() {
                break;
            }
            for f in queued {
                f(self);
            }
        }
    }

    pub(crate) fn run_deferred(&mut self) {
        while !self.state.deferred.is_empty() {
            let deferred = std::mem::take(&mut self.state.deferred);
            for f in deferred {
                f(self);
            }
        }
    }

    pub(crate) fn drain_queued_events(&mut self) {
        while let Some((id, kind)) = self.state.queued_events.pop_front() {
            if !self.arena.has(id) {
                continue;
            }
            let event = Event::new(kind, self.state.now);
            crate::event::dispatch_to_widget(self, id, &event);
            self.run_deferred();
        }
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        // Pending proxy work is dropped; later proxy calls observe SceneGone.
        let mut queue = self.queue.queue.lock();
        self.queue.alive.store(false, Ordering::Release);
        queue.clear();
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("size", &self.size)
            .field("root", &self.root_id)
            .field("stages", &self.state.stages.len())
            .finish_non_exhaustive()
    }
}
