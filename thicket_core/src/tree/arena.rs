// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! The widget tree store.
//!
//! Nodes own their children directly, so a pass can split-borrow one node's
//! item and its child list and recurse without bookkeeping; a parent map
//! provides upward navigation. Parent links therefore never own anything:
//! ownership flows parent → child only, and cycle freedom is structural.

use std::collections::HashMap;

use crate::core::{Widget, WidgetId, WidgetState};

/// A widget and its framework-owned base record.
pub(crate) struct WidgetNode {
    pub(crate) widget: Box<dyn Widget>,
    pub(crate) state: WidgetState,
}

/// One tree slot: the widget pair plus its ordered, owned children.
pub(crate) struct ArenaNode {
    pub(crate) item: WidgetNode,
    pub(crate) children: Vec<ArenaNode>,
}

impl ArenaNode {
    pub(crate) fn new(widget: Box<dyn Widget>, state: WidgetState) -> Self {
        Self {
            item: WidgetNode { widget, state },
            children: Vec::new(),
        }
    }

    pub(crate) fn id(&self) -> WidgetId {
        self.item.state.id
    }

    pub(crate) fn child(&self, id: WidgetId) -> Option<&ArenaNode> {
        self.children.iter().find(|c| c.id() == id)
    }

    pub(crate) fn child_mut(&mut self, id: WidgetId) -> Option<&mut ArenaNode> {
        self.children.iter_mut().find(|c| c.id() == id)
    }

    pub(crate) fn child_index(&self, id: WidgetId) -> Option<usize> {
        self.children.iter().position(|c| c.id() == id)
    }

    pub(crate) fn child_by_name(&self, name: &str) -> Option<&ArenaNode> {
        self.children.iter().find(|c| c.item.state.name == name)
    }
}

/// The tree of widgets, rooted at a single scene root.
pub(crate) struct WidgetArena {
    root: Option<ArenaNode>,
    /// Child id → parent id; the root maps to `None`.
    parents: HashMap<WidgetId, Option<WidgetId>>,
}

impl WidgetArena {
    pub(crate) fn new() -> Self {
        Self {
            root: None,
            parents: HashMap::new(),
        }
    }

    pub(crate) fn set_root(&mut self, node: ArenaNode) {
        assert!(self.root.is_none(), "arena already has a root");
        register_subtree(&mut self.parents, &node, None);
        self.root = Some(node);
    }

    pub(crate) fn root(&self) -> &ArenaNode {
        self.root.as_ref().expect("arena has no root")
    }

    pub(crate) fn root_mut(&mut self) -> &mut ArenaNode {
        self.root.as_mut().expect("arena has no root")
    }

    pub(crate) fn root_id(&self) -> WidgetId {
        self.root().id()
    }

    pub(crate) fn has(&self, id: WidgetId) -> bool {
        self.parents.contains_key(&id)
    }

    pub(crate) fn parent_of(&self, id: WidgetId) -> Option<WidgetId> {
        self.parents.get(&id).copied().flatten()
    }

    /// Ids from `id` (inclusive) up to the root. Empty if `id` is not in the
    /// tree.
    pub(crate) fn id_path(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut path = Vec::new();
        if !self.has(id) {
            return path;
        }
        let mut cur = Some(id);
        while let Some(c) = cur {
            path.push(c);
            cur = self.parent_of(c);
        }
        path
    }

    pub(crate) fn find(&self, id: WidgetId) -> Option<&ArenaNode> {
        let mut path = self.id_path(id);
        if path.is_empty() {
            return None;
        }
        path.reverse();
        let mut node = self.root.as_ref()?;
        debug_assert_eq!(node.id(), path[0]);
        for step in &path[1..] {
            node = node.child(*step)?;
        }
        Some(node)
    }

    pub(crate) fn find_mut(&mut self, id: WidgetId) -> Option<&mut ArenaNode> {
        let mut path = self.id_path(id);
        if path.is_empty() {
            return None;
        }
        path.reverse();
        let mut node = self.root.as_mut()?;
        debug_assert_eq!(node.id(), path[0]);
        for step in &path[1..] {
            node = node.child_mut(*step)?;
        }
        Some(node)
    }

    /// Appends a detached subtree as the last child of `parent`.
    pub(crate) fn push_child(&mut self, parent: WidgetId, node: ArenaNode) -> bool {
        self.insert_child(parent, usize::MAX, node)
    }

    /// Inserts a detached subtree at `index` (clamped) under `parent`.
    pub(crate) fn insert_child(&mut self, parent: WidgetId, index: usize, node: ArenaNode) -> bool {
        if !self.has(parent) {
            return false;
        }
        register_subtree(&mut self.parents, &node, Some(parent));
        let parent_node = self
            .find_mut(parent)
            .expect("parent map and tree out of sync");
        let index = index.min(parent_node.children.len());
        parent_node.children.insert(index, node);
        true
    }

    /// Detaches a subtree, unregistering all of its ids.
    pub(crate) fn detach(&mut self, id: WidgetId) -> Option<ArenaNode> {
        let parent = self.parents.get(&id).copied()?;
        let parent = parent?; // The root cannot be detached.
        let parent_node = self.find_mut(parent)?;
        let index = parent_node.child_index(id)?;
        let node = parent_node.children.remove(index);
        unregister_subtree(&mut self.parents, &node);
        Some(node)
    }

    pub(crate) fn children_ids(&self, id: WidgetId) -> Vec<WidgetId> {
        self.find(id)
            .map(|n| n.children.iter().map(ArenaNode::id).collect())
            .unwrap_or_default()
    }

    pub(crate) fn get_state(&self, id: WidgetId) -> Option<&WidgetState> {
        self.find(id).map(|n| &n.item.state)
    }

    pub(crate) fn get_state_mut(&mut self, id: WidgetId) -> Option<&mut WidgetState> {
        self.find_mut(id).map(|n| &mut n.item.state)
    }
}

fn register_subtree(
    parents: &mut HashMap<WidgetId, Option<WidgetId>>,
    node: &ArenaNode,
    parent: Option<WidgetId>,
) {
    parents.insert(node.id(), parent);
    for child in &node.children {
        register_subtree(parents, child, Some(node.id()));
    }
}

fn unregister_subtree(parents: &mut HashMap<WidgetId, Option<WidgetId>>, node: &ArenaNode) {
    parents.remove(&node.id());
    for child in &node.children {
        unregister_subtree(parents, child);
    }
}

/// Ids of every widget in a subtree, in post-order (children before parents).
pub(crate) fn subtree_ids_post_order(node: &ArenaNode) -> Vec<WidgetId> {
    fn walk(node: &ArenaNode, out: &mut Vec<WidgetId>) {
        for child in &node.children {
            walk(child, out);
        }
        out.push(node.id());
    }
    let mut out = Vec::new();
    walk(node, &mut out);
    out
}
