// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Value binding and the declarative form builder.
//!
//! A widget *bound* to an external value stays in sync in both directions:
//! the value is written into the widget's visible state every frame
//! (value → widget), and a `Change` event writes the visible state back
//! (widget → value). There is no reflection: the mapping from a value's type
//! to a widget goes through an explicit [`BindRegistry`] of constructor
//! closures, registered at startup; enumerations opt in through the
//! [`Choice`] trait.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

use crate::app::Scene;
use crate::core::{EventType, UpdateCtx, Widget, WidgetId};
use crate::style::StateFlags;
use crate::tree::{Plan, TreeError};
use crate::widgets::{Chooser, Frame, Label, Spinner, Switch, TextField};

/// Errors from binding values to widgets.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindingError {
    #[error("widget {0} is not in the tree")]
    NoSuchWidget(WidgetId),
    #[error("widget {id} is a {actual}, expected {expected}")]
    WidgetMismatch {
        id: WidgetId,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("no widget factory registered for value type `{0}`")]
    Unregistered(&'static str),
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// The value→widget half of a binding, run once per frame (and on explicit
/// sync). The widget→value half is an ordinary `Change` listener installed
/// at bind time.
pub struct Binding {
    pub(crate) sync_down: Rc<dyn Fn(&mut dyn Widget, &mut UpdateCtx<'_>)>,
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Binding")
    }
}

/// Runs the value→widget sync for every bound widget. Called by the scene at
/// the top of each update tick.
pub(crate) fn run_sync_down(scene: &mut Scene) {
    let ids = scene.state.bound_widgets.clone();
    for id in ids {
        let Scene { arena, state, .. } = scene;
        let Some(node) = arena.find_mut(id) else {
            continue;
        };
        let Some(binding) = node.item.state.binding.as_ref().map(|b| b.sync_down.clone()) else {
            continue;
        };
        let mut ctx = UpdateCtx {
            scene: state,
            widget_state: &mut node.item.state,
        };
        binding(&mut *node.item.widget, &mut ctx);
        crate::event::bubble_up(scene, id);
    }
}

fn install(scene: &mut Scene, id: WidgetId, binding: Binding) -> Result<(), BindingError> {
    let Some(state) = scene.arena.get_state_mut(id) else {
        return Err(BindingError::NoSuchWidget(id));
    };
    state.binding = Some(binding);
    scene.state.bound_widgets.push(id);
    Ok(())
}

fn expect_widget<W: Widget>(scene: &mut Scene, id: WidgetId) -> Result<(), BindingError> {
    let node = scene
        .arena
        .find(id)
        .ok_or(BindingError::NoSuchWidget(id))?;
    if node.item.widget.downcast_ref::<W>().is_none() {
        return Err(BindingError::WidgetMismatch {
            id,
            expected: std::any::type_name::<W>(),
            actual: node.item.state.type_ident,
        });
    }
    Ok(())
}

// --- MARK: SCALAR BINDINGS

/// Binds a boolean to a [`Switch`].
pub fn bind_bool(
    scene: &mut Scene,
    id: WidgetId,
    value: Rc<RefCell<bool>>,
) -> Result<(), BindingError> {
    expect_widget::<Switch>(scene, id)?;
    let down = value.clone();
    install(
        scene,
        id,
        Binding {
            sync_down: Rc::new(move |_, ctx| {
                ctx.set_state(StateFlags::CHECKED, *down.borrow());
            }),
        },
    )?;
    if let Some(state) = scene.tree().state_mut(id) {
        state.on(EventType::Change, move |ctx, _| {
            *value.borrow_mut() = ctx.has_state(StateFlags::CHECKED);
        });
    }
    Ok(())
}

/// Binds a float to a [`Spinner`].
pub fn bind_f64(
    scene: &mut Scene,
    id: WidgetId,
    value: Rc<RefCell<f64>>,
) -> Result<(), BindingError> {
    expect_widget::<Spinner>(scene, id)?;
    let down = value.clone();
    install(
        scene,
        id,
        Binding {
            sync_down: Rc::new(move |widget, ctx| {
                let spinner = widget.downcast_mut::<Spinner>().expect("checked at bind");
                let wanted = *down.borrow();
                if (spinner.value() - wanted).abs() > f64::EPSILON {
                    let id = ctx.widget_id();
                    ctx.defer(move |scene| Spinner::set_value(scene, id, wanted));
                }
            }),
        },
    )?;
    // The widget→value half needs the spinner's current value, which the
    // listener reads through a deferred tree access.
    if let Some(state) = scene.tree().state_mut(id) {
        state.on(EventType::Change, move |ctx, _| {
            let id = ctx.widget_id();
            let value = value.clone();
            ctx.defer(move |scene| {
                if let Some(v) = scene.with_widget::<Spinner, _>(id, |s, _| s.value()) {
                    *value.borrow_mut() = v;
                }
            });
        });
    }
    Ok(())
}

/// Binds a string to a [`TextField`].
pub fn bind_string(
    scene: &mut Scene,
    id: WidgetId,
    value: Rc<RefCell<String>>,
) -> Result<(), BindingError> {
    expect_widget::<TextField>(scene, id)?;
    let down = value.clone();
    install(
        scene,
        id,
        Binding {
            sync_down: Rc::new(move |widget, ctx| {
                let field = widget.downcast_mut::<TextField>().expect("checked at bind");
                let wanted = down.borrow().clone();
                // Only push while the user is not editing.
                if field.text() != wanted && !ctx.has_state(StateFlags::FOCUSED) {
                    let id = ctx.widget_id();
                    ctx.defer(move |scene| TextField::set_text(scene, id, wanted));
                }
            }),
        },
    )?;
    if let Some(state) = scene.tree().state_mut(id) {
        state.on(EventType::Change, move |ctx, _| {
            let id = ctx.widget_id();
            let value = value.clone();
            ctx.defer(move |scene| {
                if let Some(text) =
                    scene.with_widget::<TextField, _>(id, |f, _| f.text().to_string())
                {
                    *value.borrow_mut() = text;
                }
            });
        });
    }
    Ok(())
}

// --- MARK: ENUMERATIONS

/// An enumeration bindable to a switch set or a chooser.
pub trait Choice: Copy + PartialEq + 'static {
    fn variants() -> &'static [Self];
    fn label(&self) -> &'static str;

    fn index(&self) -> usize {
        Self::variants()
            .iter()
            .position(|v| v == self)
            .unwrap_or_default()
    }
}

/// Variant count at or below which an enumeration binds to a set of
/// mutually-exclusive switches instead of a chooser.
pub const CHOICE_SWITCH_CUTOFF: usize = 4;

/// Binds an enumeration to a [`Chooser`].
pub fn bind_choice<T: Choice>(
    scene: &mut Scene,
    id: WidgetId,
    value: Rc<RefCell<T>>,
) -> Result<(), BindingError> {
    expect_widget::<Chooser>(scene, id)?;
    let down = value.clone();
    install(
        scene,
        id,
        Binding {
            sync_down: Rc::new(move |widget, ctx| {
                let chooser = widget.downcast_mut::<Chooser>().expect("checked at bind");
                let wanted = down.borrow().index();
                if chooser.selected() != wanted {
                    let id = ctx.widget_id();
                    ctx.defer(move |scene| Chooser::select(scene, id, wanted));
                }
            }),
        },
    )?;
    if let Some(state) = scene.tree().state_mut(id) {
        state.on(EventType::Change, move |ctx, _| {
            let id = ctx.widget_id();
            let value = value.clone();
            ctx.defer(move |scene| {
                if let Some(index) = scene.with_widget::<Chooser, _>(id, |c, _| c.selected())
                    && let Some(variant) = T::variants().get(index)
                {
                    *value.borrow_mut() = *variant;
                }
            });
        });
    }
    Ok(())
}

// --- MARK: REGISTRY

type Factory =
    Rc<dyn Fn(&mut Scene, WidgetId, Rc<dyn Any>) -> Result<WidgetId, BindingError>>;

/// Maps a value's type to the widget constructed for it: the dynamic half of
/// the binding story, with closures where the source used reflection.
pub struct BindRegistry {
    factories: HashMap<TypeId, Factory>,
    type_names: HashMap<TypeId, &'static str>,
}

impl BindRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            type_names: HashMap::new(),
        }
    }

    /// A registry with the scalar factories installed: `bool` → switch,
    /// `f64` → spinner, `String` → text field.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register::<bool>(|scene, parent, value| {
            let id = scene.edit(|t| t.add_child(parent, Switch::new()))?;
            bind_bool(scene, id, value)?;
            Ok(id)
        });
        registry.register::<f64>(|scene, parent, value| {
            let initial = *value.borrow();
            let spinner = Spinner::new(initial, -1.0e9, 1.0e9, 1.0);
            let id = scene.edit(|t| t.add_child(parent, spinner))?;
            bind_f64(scene, id, value)?;
            Ok(id)
        });
        registry.register::<String>(|scene, parent, value| {
            let initial = value.borrow().clone();
            let id = scene.edit(|t| t.add_child(parent, TextField::new(initial)))?;
            bind_string(scene, id, value)?;
            Ok(id)
        });
        registry.register::<Vec<String>>(|scene, parent, value| {
            let id = scene.edit(|t| t.add_child(parent, Frame::new()))?;
            bind_string_list(scene, id, value)?;
            Ok(id)
        });
        registry
    }

    /// Registers a factory for values of type `T`.
    pub fn register<T: 'static>(
        &mut self,
        f: impl Fn(&mut Scene, WidgetId, Rc<RefCell<T>>) -> Result<WidgetId, BindingError> + 'static,
    ) {
        self.type_names
            .insert(TypeId::of::<T>(), std::any::type_name::<T>());
        self.factories.insert(
            TypeId::of::<T>(),
            Rc::new(move |scene, parent, erased| {
                let value = erased
                    .downcast::<RefCell<T>>()
                    .map_err(|_| BindingError::Unregistered(std::any::type_name::<T>()))?;
                f(scene, parent, value)
            }),
        );
    }

    /// Registers an enumeration: a switch set for small variant counts, a
    /// chooser otherwise.
    pub fn register_choice<T: Choice>(&mut self) {
        self.register::<T>(|scene, parent, value| {
            if T::variants().len() <= CHOICE_SWITCH_CUTOFF {
                build_choice_switches(scene, parent, value)
            } else {
                let labels: Vec<&str> = T::variants().iter().map(Choice::label).collect();
                let id = scene.edit(|t| t.add_child(parent, Chooser::new(labels)))?;
                bind_choice(scene, id, value)?;
                Ok(id)
            }
        });
    }

    /// Constructs and binds the widget for a value under `parent`.
    pub fn build<T: 'static>(
        &self,
        scene: &mut Scene,
        parent: WidgetId,
        value: Rc<RefCell<T>>,
    ) -> Result<WidgetId, BindingError> {
        let factory = self
            .factories
            .get(&TypeId::of::<T>())
            .ok_or(BindingError::Unregistered(std::any::type_name::<T>()))?;
        factory(scene, parent, value)
    }
}

impl Default for BindRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for BindRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.type_names.values().collect();
        names.sort();
        f.debug_struct("BindRegistry").field("types", &names).finish()
    }
}

/// A row of mutually-exclusive switches, one per variant.
fn build_choice_switches<T: Choice>(
    scene: &mut Scene,
    parent: WidgetId,
    value: Rc<RefCell<T>>,
) -> Result<WidgetId, BindingError> {
    let row = scene.edit(|t| t.add_child(parent, Frame::new()))?;
    for (index, variant) in T::variants().iter().enumerate() {
        let cell = scene.edit(|t| {
            let cell = t.add_child(row, Frame::new())?;
            t.add_child(cell, Switch::new())?;
            t.add_child(cell, Label::new(variant.label()))?;
            Ok::<_, TreeError>(cell)
        })?;
        let switch = scene
            .tree()
            .children(cell)
            .first()
            .copied()
            .ok_or(BindingError::NoSuchWidget(cell))?;

        let down = value.clone();
        install(
            scene,
            switch,
            Binding {
                sync_down: Rc::new(move |_, ctx| {
                    ctx.set_state(StateFlags::CHECKED, down.borrow().index() == index);
                }),
            },
        )?;
        let value = value.clone();
        if let Some(state) = scene.tree().state_mut(switch) {
            state.on(EventType::Change, move |ctx, _| {
                // Switch sets are radio-like: checking one selects its
                // variant, the frame sync unchecks the others.
                if ctx.has_state(StateFlags::CHECKED) {
                    *value.borrow_mut() = T::variants()[index];
                } else {
                    // Refuse unchecking the selected variant directly.
                    let selected = value.borrow().index() == index;
                    if selected {
                        ctx.set_state(StateFlags::CHECKED, true);
                    }
                }
            });
        }
    }
    Ok(row)
}

// --- MARK: LISTS

/// Binds a string sequence to an inline list editor: one text-field row per
/// element, rebuilt through plan reconciliation when the length changes.
pub fn bind_string_list(
    scene: &mut Scene,
    list: WidgetId,
    value: Rc<RefCell<Vec<String>>>,
) -> Result<(), BindingError> {
    expect_widget::<Frame>(scene, list)?;
    if let Some(state) = scene.tree().state_mut(list) {
        state.styler(|s| {
            s.direction = crate::style::Direction::Column;
            s.gap.y = crate::style::Length::Px(2.0);
        });
        state.set_property("list-rows", usize::MAX);
    }
    let down = value.clone();
    install(
        scene,
        list,
        Binding {
            sync_down: Rc::new(move |_, ctx| {
                let wanted = down.borrow().len();
                let rows = ctx
                    .state_mut()
                    .property::<usize>("list-rows")
                    .copied()
                    .unwrap_or(usize::MAX);
                if rows != wanted {
                    ctx.state_mut().set_property("list-rows", wanted);
                    let id = ctx.widget_id();
                    let value = down.clone();
                    ctx.defer(move |scene| rebuild_list_rows(scene, id, &value));
                }
            }),
        },
    )
}

fn rebuild_list_rows(scene: &mut Scene, list: WidgetId, value: &Rc<RefCell<Vec<String>>>) {
    let items = value.borrow().clone();
    let result = scene.edit(|tree| {
        let mut plan = Plan::new();
        for index in 0..items.len() {
            plan = plan.child("text-field", format!("item-{index}"));
        }
        tree.apply_plan(list, plan)
    });
    if result.is_err() {
        return;
    }
    let rows = scene.edit(|tree| tree.children(list));
    for (index, row) in rows.into_iter().enumerate() {
        let Some(text) = items.get(index) else {
            continue;
        };
        TextField::set_text(scene, row, text.clone());
        // Fresh rows get their write-back listener once.
        let bound = scene
            .widget_state(row)
            .is_some_and(|s| s.property::<bool>("list-bound").copied().unwrap_or(false));
        if !bound {
            let value = value.clone();
            if let Some(state) = scene.tree().state_mut(row) {
                state.set_property("list-bound", true);
                state.on(EventType::Change, move |ctx, _| {
                    let row = ctx.widget_id();
                    let value = value.clone();
                    ctx.defer(move |scene| {
                        let text =
                            scene.with_widget::<TextField, _>(row, |f, _| f.text().to_string());
                        let index = scene
                            .widget_state(row)
                            .and_then(|s| s.name().strip_prefix("item-")?.parse::<usize>().ok());
                        if let (Some(text), Some(index)) = (text, index)
                            && let Some(slot) = value.borrow_mut().get_mut(index)
                        {
                            *slot = text;
                        }
                    });
                });
            }
        }
    }
}

// --- MARK: FUNCTIONS AND FORMS

/// A named operation bound to a button: clicking opens a confirmation dialog
/// and invokes the function.
#[derive(Clone)]
pub struct BoundFn {
    pub name: String,
    pub invoke: Rc<dyn Fn(&mut Scene)>,
}

impl std::fmt::Debug for BoundFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundFn").field("name", &self.name).finish()
    }
}

/// Builds a button that opens a dialog prompting to run `func`.
pub fn bind_fn(scene: &mut Scene, parent: WidgetId, func: BoundFn) -> Result<WidgetId, TreeError> {
    let button = scene.edit(|t| t.add_child(parent, crate::widgets::Button::new(func.name.clone())))?;
    if let Some(state) = scene.tree().state_mut(button) {
        state.on(EventType::Click, move |ctx, _| {
            let func = func.clone();
            ctx.defer(move |scene| open_fn_dialog(scene, func));
        });
    }
    Ok(button)
}

fn open_fn_dialog(scene: &mut Scene, func: BoundFn) {
    let center = kurbo::Point::new(scene.size().width / 2.0 - 80.0, scene.size().height / 3.0);
    let Ok(dialog) = scene.open_stage(crate::app::StageKind::Dialog, Frame::new(), center, None)
    else {
        return;
    };
    let _ = scene.edit(|t| {
        if let Some(state) = t.state_mut(dialog) {
            state.styler(|s| {
                s.direction = crate::style::Direction::Column;
                s.background = Some(crate::style::Background::Color(peniko::Color::WHITE));
                s.padding = crate::style::Sides::all(crate::style::Length::Px(12.0));
                s.gap.y = crate::style::Length::Px(8.0);
            });
        }
        t.add_child(dialog, Label::new(format!("Run {}?", func.name)))?;
        let run = t.add_child(dialog, crate::widgets::Button::new("Run"))?;
        if let Some(state) = t.state_mut(run) {
            state.on(EventType::Click, move |ctx, _| {
                let func = func.clone();
                ctx.defer(move |scene| {
                    scene.close_stage(dialog);
                    (func.invoke)(scene);
                });
            });
        }
        Ok::<_, TreeError>(())
    });
}

/// A declarative form: rows of label + bound widget, laid out in a grid.
///
/// Structured records register a factory that describes their fields through
/// this builder; there is no field reflection.
pub struct Form {
    rows: Vec<(String, Box<dyn FnOnce(&mut Scene, WidgetId) -> Result<WidgetId, BindingError>>)>,
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form").field("rows", &self.rows.len()).finish()
    }
}

impl Form {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Adds a labeled field bound through the registry.
    pub fn field<T: 'static>(
        mut self,
        label: impl Into<String>,
        registry: Rc<BindRegistry>,
        value: Rc<RefCell<T>>,
    ) -> Self {
        self.rows.push((
            label.into(),
            Box::new(move |scene, parent| registry.build(scene, parent, value)),
        ));
        self
    }

    /// Builds the two-column grid under `parent`.
    pub fn build(self, scene: &mut Scene, parent: WidgetId) -> Result<WidgetId, BindingError> {
        let grid = scene.edit(|t| {
            let grid = t.add_child(parent, Frame::new())?;
            if let Some(state) = t.state_mut(grid) {
                state.styler(|s| {
                    s.display = crate::style::Display::Grid;
                    s.columns = 2;
                    s.gap = crate::layout::XY {
                        x: crate::style::Length::Px(8.0),
                        y: crate::style::Length::Px(4.0),
                    };
                });
            }
            Ok::<_, TreeError>(grid)
        })?;
        for (label, build) in self.rows {
            scene.edit(|t| t.add_child(grid, Label::new(label)))?;
            build(scene, grid)?;
        }
        Ok(grid)
    }
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}
