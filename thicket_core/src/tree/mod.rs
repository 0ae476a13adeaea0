// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Tree structure and mutation: identity, parenting, paths, traversal, and
//! plan reconciliation.
//!
//! All structural mutation goes through [`TreeCtx`], which keeps the parent
//! map, the scene dirty flags, and widget lifecycle notifications consistent.
//! Inside event handlers, obtain one lazily via
//! [`EventCtx::defer`](crate::core::EventCtx::defer).

pub(crate) mod arena;
mod path;
mod reconcile;
mod registry;
pub(crate) mod walk;

pub use path::escape_name;
pub use reconcile::{Plan, PlanEntry};
pub use registry::WidgetRegistry;
pub use walk::WalkControl;

use thiserror::Error;
use tracing::trace;

use crate::app::SceneState;
use crate::core::{Update, UpdateCtx, Widget, WidgetId, WidgetState};
use crate::tree::arena::{ArenaNode, WidgetArena, subtree_ids_post_order};

/// Errors from explicit tree operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    #[error("widget {0} is not in the tree")]
    NoSuchWidget(WidgetId),
    #[error("parent {0} is not in the tree")]
    NoSuchParent(WidgetId),
    #[error("a sibling is already named `{0}`")]
    DuplicateName(String),
    #[error("path `{0}` does not resolve")]
    PathNotFound(String),
    #[error("widget type `{0}` is not registered")]
    UnregisteredType(String),
    #[error("cannot move a widget into its own subtree")]
    CyclicMove,
    #[error("the scene root cannot be detached")]
    RootDetach,
}

/// The structural mutation surface of a scene's tree.
pub struct TreeCtx<'a> {
    pub(crate) arena: &'a mut WidgetArena,
    pub(crate) scene: &'a mut SceneState,
    pub(crate) registry: &'a WidgetRegistry,
}

impl TreeCtx<'_> {
    // --- MARK: ADD / REMOVE

    /// Constructs a widget of a registered type and attaches it as the last
    /// child of `parent`, with an auto-generated name.
    pub fn new_child(&mut self, parent: WidgetId, type_ident: &str) -> Result<WidgetId, TreeError> {
        let widget = self.registry.new_widget(type_ident)?;
        self.insert(parent, widget, None, false)
    }

    /// Attaches `widget` as the last child of `parent` with an auto-generated
    /// name (`<type-ident>-<counter>`; the counter never reuses values, even
    /// after deletions).
    pub fn add_child(
        &mut self,
        parent: WidgetId,
        widget: impl Widget,
    ) -> Result<WidgetId, TreeError> {
        self.insert(parent, Box::new(widget), None, false)
    }

    /// Attaches `widget` with an explicit name. Fails on sibling collision.
    pub fn add_named_child(
        &mut self,
        parent: WidgetId,
        widget: impl Widget,
        name: impl Into<String>,
    ) -> Result<WidgetId, TreeError> {
        self.insert(parent, Box::new(widget), Some(name.into()), false)
    }

    /// Attaches a part: an implementation-private child skipped by
    /// reconciliation and by generic child placement.
    pub fn add_part(
        &mut self,
        parent: WidgetId,
        widget: impl Widget,
        name: impl Into<String>,
    ) -> Result<WidgetId, TreeError> {
        self.insert(parent, Box::new(widget), Some(name.into()), true)
    }

    pub(crate) fn insert(
        &mut self,
        parent: WidgetId,
        widget: Box<dyn Widget>,
        name: Option<String>,
        is_part: bool,
    ) -> Result<WidgetId, TreeError> {
        let counter = self
            .arena
            .get_state(parent)
            .ok_or(TreeError::NoSuchParent(parent))?
            .child_counter;

        let ident = widget.type_ident();
        let name = match name {
            Some(name) => {
                if self.sibling_named(parent, &name).is_some() {
                    return Err(TreeError::DuplicateName(name));
                }
                name
            }
            None => format!("{ident}-{counter}"),
        };

        let parent_state = self
            .arena
            .get_state_mut(parent)
            .expect("existence checked above");
        parent_state.child_counter += 1;
        parent_state.needs_layout = true;

        let id = WidgetId::next();
        let mut state = WidgetState::new(id, name, ident);
        state.is_part = is_part;
        state.trace_span = widget.make_trace_span(id);
        self.arena.push_child(parent, ArenaNode::new(widget, state));
        self.scene.needs_layout = true;

        self.deliver(id, &Update::Added);
        trace!("added widget {id} under {parent}");
        Ok(id)
    }

    /// Detaches a widget and destroys its subtree, bottom-up.
    pub fn delete(&mut self, id: WidgetId) -> Result<(), TreeError> {
        if !self.arena.has(id) {
            return Err(TreeError::NoSuchWidget(id));
        }
        let mut node = self.arena.detach(id).ok_or(TreeError::RootDetach)?;
        let removed = subtree_ids_post_order(&node);
        destroy_subtree(self.scene, &mut node);
        self.scene.purge(&removed);
        self.scene.needs_layout = true;
        trace!("deleted widget {id} and {} descendants", removed.len() - 1);
        Ok(())
    }

    /// Deletes the child of `parent` with the given name.
    pub fn delete_child_by_name(
        &mut self,
        parent: WidgetId,
        name: &str,
    ) -> Result<(), TreeError> {
        let id = self
            .sibling_named(parent, name)
            .ok_or_else(|| TreeError::PathNotFound(name.to_string()))?;
        self.delete(id)
    }

    /// Detaches `child` from its current parent and appends it to
    /// `new_parent`. The child keeps its name.
    pub fn move_to_parent(
        &mut self,
        child: WidgetId,
        new_parent: WidgetId,
    ) -> Result<(), TreeError> {
        if !self.arena.has(new_parent) {
            return Err(TreeError::NoSuchParent(new_parent));
        }
        if self.arena.id_path(new_parent).contains(&child) {
            return Err(TreeError::CyclicMove);
        }
        let name = self
            .arena
            .get_state(child)
            .ok_or(TreeError::NoSuchWidget(child))?
            .name
            .clone();
        if self
            .sibling_named(new_parent, &name)
            .is_some_and(|existing| existing != child)
        {
            return Err(TreeError::DuplicateName(name));
        }

        let node = self.arena.detach(child).ok_or(TreeError::RootDetach)?;
        let parent_state = self
            .arena
            .get_state_mut(new_parent)
            .expect("checked above");
        parent_state.child_counter += 1;
        parent_state.needs_layout = true;
        self.arena.push_child(new_parent, node);
        self.scene.needs_layout = true;
        Ok(())
    }

    /// Renames a widget; fails on sibling collision.
    pub fn rename(&mut self, id: WidgetId, name: impl Into<String>) -> Result<(), TreeError> {
        let name = name.into();
        if let Some(parent) = self.arena.parent_of(id)
            && self
                .sibling_named(parent, &name)
                .is_some_and(|existing| existing != id)
        {
            return Err(TreeError::DuplicateName(name));
        }
        let state = self
            .arena
            .get_state_mut(id)
            .ok_or(TreeError::NoSuchWidget(id))?;
        state.name = name;
        Ok(())
    }

    // --- MARK: LOOKUP

    pub fn parent_of(&self, id: WidgetId) -> Option<WidgetId> {
        self.arena.parent_of(id)
    }

    pub fn children(&self, id: WidgetId) -> Vec<WidgetId> {
        self.arena.children_ids(id)
    }

    /// The absolute path of a widget.
    pub fn path(&self, id: WidgetId) -> String {
        path::path_of(self.arena, id)
    }

    /// Resolves an absolute or relative path against `from`.
    pub fn find_path(&self, from: WidgetId, p: &str) -> Result<WidgetId, TreeError> {
        path::find_path(self.arena, from, p)
    }

    /// First child of `parent` holding a widget of type `T`.
    pub fn child_by_type<T: Widget>(&self, parent: WidgetId) -> Option<WidgetId> {
        let node = self.arena.find(parent)?;
        node.children
            .iter()
            .find(|c| c.item.widget.downcast_ref::<T>().is_some())
            .map(|c| c.id())
    }

    /// Nearest ancestor of `id` holding a widget of type `T`.
    pub fn parent_by_type<T: Widget>(&self, id: WidgetId) -> Option<WidgetId> {
        let mut cur = self.arena.parent_of(id);
        while let Some(c) = cur {
            if self
                .arena
                .find(c)
                .is_some_and(|n| n.item.widget.downcast_ref::<T>().is_some())
            {
                return Some(c);
            }
            cur = self.arena.parent_of(c);
        }
        None
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

    /// Mutable access to a widget's base record.
    pub fn state_mut(&mut self, id: WidgetId) -> Option<&mut WidgetState> {
        self.arena.get_state_mut(id)
    }

    pub fn state(&self, id: WidgetId) -> Option<&WidgetState> {
        self.arena.get_state(id)
    }

    // --- MARK: WALKS

    /// Subtree ids, pre-order.
    pub fn descendants(&self, id: WidgetId) -> Vec<WidgetId> {
        self.arena
            .find(id)
            .map(|n| walk::pre_order_ids(n))
            .unwrap_or_default()
    }

    /// Subtree ids, post-order.
    pub fn descendants_post(&self, id: WidgetId) -> Vec<WidgetId> {
        self.arena
            .find(id)
            .map(|n| walk::post_order_ids(n))
            .unwrap_or_default()
    }

    /// Subtree ids, breadth-first.
    pub fn descendants_breadth(&self, id: WidgetId) -> Vec<WidgetId> {
        self.arena
            .find(id)
            .map(|n| walk::breadth_first_ids(n))
            .unwrap_or_default()
    }

    /// Ids from `id` (inclusive) up to the root.
    pub fn ancestors(&self, id: WidgetId) -> Vec<WidgetId> {
        self.arena.id_path(id)
    }

    // --- MARK: HELPERS

    pub(crate) fn sibling_named(&self, parent: WidgetId, name: &str) -> Option<WidgetId> {
        let node = self.arena.find(parent)?;
        node.child_by_name(name).map(|c| c.id())
    }

    pub(crate) fn deliver(&mut self, id: WidgetId, update: &Update) {
        if let Some(node) = self.arena.find_mut(id) {
            let mut ctx = UpdateCtx {
                scene: self.scene,
                widget_state: &mut node.item.state,
            };
            node.item.widget.update(&mut ctx, update);
            if matches!(update, Update::Added) {
                node.item.state.is_new = false;
            }
        }
    }
}

/// Delivers `Destroyed` to a detached subtree, children first.
pub(crate) fn destroy_subtree(scene: &mut SceneState, node: &mut ArenaNode) {
    for child in &mut node.children {
        destroy_subtree(scene, child);
    }
    let mut ctx = UpdateCtx {
        scene,
        widget_state: &mut node.item.state,
    };
    node.item.widget.update(&mut ctx, &Update::Destroyed);
}
