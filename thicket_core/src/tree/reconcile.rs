// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Plan reconciliation.
//!
//! A plan is an ordered list of `(type, name)` entries describing the child
//! set a parent should have. Applying a plan reuses existing children whose
//! `(type, name)` matches, constructs the missing ones, deletes the extras,
//! and reorders to plan order. This is the sole efficient update path for
//! declarative rebuilds; it is idempotent and does not allocate when the
//! children already match.

use std::collections::HashSet;

use crate::core::{Widget, WidgetId};
use crate::debug_panic;
use crate::tree::arena::subtree_ids_post_order;
use crate::tree::{TreeCtx, TreeError, destroy_subtree};

type InitFn = Box<dyn FnOnce(&mut TreeCtx<'_>, WidgetId)>;
type MakeFn = Box<dyn FnOnce() -> Box<dyn Widget>>;

/// One desired child.
pub struct PlanEntry {
    pub type_ident: &'static str,
    pub name: String,
    /// Constructor; falls back to the registry when absent.
    pub(crate) make: Option<MakeFn>,
    /// Runs once, right after the child is constructed. Not run on reuse.
    pub(crate) init: Option<InitFn>,
}

impl std::fmt::Debug for PlanEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanEntry")
            .field("type_ident", &self.type_ident)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// An ordered child-set description for reconciliation.
#[derive(Debug, Default)]
pub struct Plan {
    pub(crate) entries: Vec<PlanEntry>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry constructed through the widget registry.
    pub fn child(mut self, type_ident: &'static str, name: impl Into<String>) -> Self {
        self.entries.push(PlanEntry {
            type_ident,
            name: name.into(),
            make: None,
            init: None,
        });
        self
    }

    /// Adds an entry with an explicit constructor and init closure.
    pub fn child_with<W: Widget>(
        mut self,
        type_ident: &'static str,
        name: impl Into<String>,
        make: impl FnOnce() -> W + 'static,
        init: impl FnOnce(&mut TreeCtx<'_>, WidgetId) + 'static,
    ) -> Self {
        self.entries.push(PlanEntry {
            type_ident,
            name: name.into(),
            make: Some(Box::new(move || Box::new(make()))),
            init: Some(Box::new(init)),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TreeCtx<'_> {
    /// Makes the (non-part) children of `parent` match `plan`.
    ///
    /// Children are matched by name; a matching name with a matching type is
    /// reused with its identity (id, state, subtree) intact. Part children
    /// are untouched.
    pub fn apply_plan(&mut self, parent: WidgetId, plan: Plan) -> Result<(), TreeError> {
        if !self.arena.has(parent) {
            return Err(TreeError::NoSuchParent(parent));
        }

        // Duplicate names in one plan are a programmer error.
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(plan.entries.len());
        for entry in plan.entries {
            if !seen.insert(entry.name.clone()) {
                debug_panic!("plan contains duplicate child name `{}`", entry.name);
                continue;
            }
            entries.push(entry);
        }

        // Fast path: children already match, in order. No allocation, no
        // structural work.
        if self.plan_matches(parent, &entries) {
            return Ok(());
        }

        // Detach every non-part child, keyed for reuse.
        let existing_ids = self.arena.children_ids(parent);
        let mut detached = Vec::new();
        for id in existing_ids {
            let is_part = self
                .arena
                .get_state(id)
                .map(|s| s.is_part)
                .unwrap_or(false);
            if is_part {
                continue;
            }
            if let Some(node) = self.arena.detach(id) {
                detached.push(node);
            }
        }

        // Rebuild in plan order, reusing by (type, name).
        let mut created = Vec::new();
        for entry in entries {
            let reuse = detached.iter().position(|node| {
                node.item.state.name == entry.name
                    && node.item.state.type_ident == entry.type_ident
            });
            if let Some(index) = reuse {
                let node = detached.remove(index);
                self.arena.push_child(parent, node);
            } else {
                let widget = match entry.make {
                    Some(make) => make(),
                    None => self.registry.new_widget(entry.type_ident)?,
                };
                let id = self.insert(parent, widget, Some(entry.name), false)?;
                if let Some(init) = entry.init {
                    created.push((id, init));
                }
            }
        }

        // Anything left over was not named by the plan: destroy it.
        for mut node in detached {
            let removed = subtree_ids_post_order(&node);
            destroy_subtree(self.scene, &mut node);
            self.scene.purge(&removed);
        }

        for (id, init) in created {
            init(self, id);
        }

        self.scene.needs_layout = true;
        if let Some(state) = self.arena.get_state_mut(parent) {
            state.needs_layout = true;
        }
        Ok(())
    }

    fn plan_matches(&self, parent: WidgetId, entries: &[PlanEntry]) -> bool {
        let Some(node) = self.arena.find(parent) else {
            return false;
        };
        let mut live = node.children.iter().filter(|c| !c.item.state.is_part);
        for entry in entries {
            match live.next() {
                Some(child)
                    if child.item.state.name == entry.name
                        && child.item.state.type_ident == entry.type_ident => {}
                _ => return false,
            }
        }
        live.next().is_none()
    }
}
