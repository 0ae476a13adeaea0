// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Tree traversals.
//!
//! Read-side traversals are exposed as restartable finite sequences of ids;
//! the visitor-based walk exists for the cases that need subtree pruning
//! (`WalkControl::Break` from the pre-visitor skips the subtree, including
//! its post visit).

use std::collections::VecDeque;

use crate::core::WidgetId;
use crate::tree::arena::ArenaNode;

/// Visitor verdict for [`walk_down`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkControl {
    Continue,
    /// Skip this subtree; the post-visitor is not called for it either.
    Break,
}

/// Pre+post order walk over one subtree.
pub(crate) fn walk_down(
    node: &ArenaNode,
    pre: &mut impl FnMut(&ArenaNode) -> WalkControl,
    post: &mut impl FnMut(&ArenaNode),
) {
    if pre(node) == WalkControl::Break {
        return;
    }
    for child in &node.children {
        walk_down(child, pre, post);
    }
    post(node);
}

/// Ids of a subtree in pre-order, root first.
pub(crate) fn pre_order_ids(node: &ArenaNode) -> Vec<WidgetId> {
    let mut out = Vec::new();
    walk_down(
        node,
        &mut |n| {
            out.push(n.id());
            WalkControl::Continue
        },
        &mut |_| {},
    );
    out
}

/// Ids of a subtree in post-order, root last.
pub(crate) fn post_order_ids(node: &ArenaNode) -> Vec<WidgetId> {
    let mut out = Vec::new();
    walk_down(node, &mut |_| WalkControl::Continue, &mut |n| {
        out.push(n.id());
    });
    out
}

/// Ids of a subtree in breadth-first order.
pub(crate) fn breadth_first_ids(node: &ArenaNode) -> Vec<WidgetId> {
    let mut out = Vec::new();
    let mut queue = VecDeque::from([node]);
    while let Some(n) = queue.pop_front() {
        out.push(n.id());
        queue.extend(n.children.iter());
    }
    out
}
