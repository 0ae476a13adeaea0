// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::num::NonZeroU64;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::Span;

use crate::bind::Binding;
use crate::core::{Event, EventCtx, EventType};
use crate::layout::{Geometry, XY};
use crate::style::{Style, StylerList};

/// A unique identifier for a single widget.
///
/// Ids are generated automatically when widgets are inserted into a tree and
/// are never reused within a process.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct WidgetId(NonZeroU64);

impl WidgetId {
    /// Allocates the next id.
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        let id = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(NonZeroU64::new(id).unwrap())
    }

    pub fn to_raw(self) -> u64 {
        self.0.get()
    }
}

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An event listener. Listeners fire in registration order; a listener may
/// mark the event handled to stop the ones after it.
pub type Listener = Rc<RefCell<dyn FnMut(&mut EventCtx<'_>, &Event)>>;

/// Generic state for all widgets in the hierarchy.
///
/// This is the single base record the design composes every widget with: the
/// passes read and write it, widgets reach it through their contexts.
///
/// Naming scheme for flags, kept from the dirty-flag pipeline:
/// - `request_xxx`: this specific widget asked for the xxx pass.
/// - `needs_xxx`: this widget or a descendant asked for it.
///
/// Passes clear the flags they consume; [`WidgetState::merge_up`] bubbles
/// them so an ancestor's `needs_xxx` is always the or of its subtree.
pub struct WidgetState {
    pub(crate) id: WidgetId,
    /// Sibling-unique name; auto-generated from the type identifier and the
    /// parent's lifetime counter unless set explicitly.
    pub(crate) name: String,
    pub(crate) type_ident: &'static str,
    /// Counts children ever added, for unique auto-names. Never decremented.
    pub(crate) child_counter: u64,
    /// Part of a composite widget's private sub-tree; skipped by
    /// reconciliation.
    pub(crate) is_part: bool,
    /// Excluded from generic child sizing and placement; its geometry is
    /// owned by other code (scrollbars, positioned by the scroll substrate).
    pub(crate) skip_layout: bool,

    pub(crate) style: Style,
    /// State bits set through the event manager or the app, as opposed to
    /// bits contributed by stylers. The restyle fold rebuilds `style.states`
    /// as the union of both, so neither source clobbers the other.
    pub(crate) forced_states: crate::style::StateFlags,
    pub(crate) stylers: StylerList,
    pub(crate) geom: Geometry,

    /// Loose, rarely-used per-node metadata. Read sites type-check.
    pub(crate) properties: HashMap<String, Box<dyn Any>>,

    pub(crate) listeners: HashMap<EventType, Vec<Listener>>,
    /// Late-phase listeners: fire on ancestors even for handled events.
    pub(crate) final_listeners: HashMap<EventType, Vec<Listener>>,
    pub(crate) context_menus: Vec<Rc<dyn Fn(&mut EventCtx<'_>)>>,

    pub(crate) binding: Option<Binding>,

    /// Index of the child a stacked layout shows on top.
    pub(crate) stack_top: usize,
    /// Whether scrolling is active per axis, set by the size-final pass.
    pub(crate) has_scroll: XY<bool>,

    /// `Added` has not been delivered yet.
    pub(crate) is_new: bool,
    /// `Shown` has been delivered (first frame visit).
    pub(crate) shown: bool,

    /// This widget must re-render.
    pub(crate) request_render: bool,
    /// This widget or a descendant must re-render.
    pub(crate) needs_render: bool,
    /// This widget must restyle.
    pub(crate) request_style: bool,
    /// This widget or a descendant must restyle.
    pub(crate) needs_style: bool,
    /// This widget or a descendant invalidated layout.
    pub(crate) needs_layout: bool,
    /// Set during size-down when the final size depends on the enclosing
    /// allocation; triggers another size-down iteration.
    pub(crate) size_redo: bool,

    pub(crate) trace_span: Span,
}

impl WidgetState {
    pub(crate) fn new(id: WidgetId, name: String, type_ident: &'static str) -> Self {
        Self {
            id,
            name,
            type_ident,
            child_counter: 0,
            is_part: false,
            skip_layout: false,
            style: Style::default(),
            forced_states: crate::style::StateFlags::empty(),
            stylers: StylerList::default(),
            geom: Geometry::default(),
            properties: HashMap::new(),
            listeners: HashMap::new(),
            final_listeners: HashMap::new(),
            context_menus: Vec::new(),
            binding: None,
            stack_top: 0,
            has_scroll: XY::default(),
            is_new: true,
            shown: false,
            request_render: true,
            needs_render: true,
            request_style: true,
            needs_style: true,
            needs_layout: true,
            size_redo: false,
            trace_span: Span::none(),
        }
    }

    /// Updates state to incorporate state changes from a child.
    ///
    /// Idempotent; called by every pass after recursing.
    pub(crate) fn merge_up(&mut self, child: &mut Self) {
        self.needs_render |= child.needs_render;
        self.needs_style |= child.needs_style;
        self.needs_layout |= child.needs_layout;
        self.size_redo |= child.size_redo;
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geom
    }

    /// Reads a loose property, type-checked at the call site.
    pub fn property<T: 'static>(&self, key: &str) -> Option<&T> {
        self.properties.get(key)?.downcast_ref()
    }

    /// Stores a loose property.
    pub fn set_property<T: 'static>(&mut self, key: impl Into<String>, value: T) {
        self.properties.insert(key.into(), Box::new(value));
    }

    /// Registers a normal-phase listener for one event type.
    pub fn on(
        &mut self,
        kind: EventType,
        listener: impl FnMut(&mut EventCtx<'_>, &Event) + 'static,
    ) {
        self.listeners
            .entry(kind)
            .or_default()
            .push(Rc::new(RefCell::new(listener)));
    }

    /// Registers a late-phase listener, delivered even for handled events.
    pub fn on_final(
        &mut self,
        kind: EventType,
        listener: impl FnMut(&mut EventCtx<'_>, &Event) + 'static,
    ) {
        self.final_listeners
            .entry(kind)
            .or_default()
            .push(Rc::new(RefCell::new(listener)));
    }

    /// Registers a context-menu contributor, run in registration order when
    /// a context-menu event reaches this widget.
    pub fn add_context_menu(&mut self, f: impl Fn(&mut EventCtx<'_>) + 'static) {
        self.context_menus.push(Rc::new(f));
    }

    /// Adds a style function; it runs after the ones registered before it.
    pub fn styler(&mut self, styler: impl Fn(&mut Style) + 'static) {
        self.stylers.push(styler);
        self.request_style = true;
        self.needs_style = true;
    }

    /// Adds a final-phase style function.
    pub fn final_styler(&mut self, styler: impl Fn(&mut Style) + 'static) {
        self.stylers.push_final(styler);
        self.request_style = true;
        self.needs_style = true;
    }
}

impl std::fmt::Debug for WidgetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetState")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("type_ident", &self.type_ident)
            .field("states", &self.style.states)
            .field("geom", &self.geom)
            .finish_non_exhaustive()
    }
}
