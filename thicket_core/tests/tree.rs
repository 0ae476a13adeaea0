// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Tree identity, paths, and reconciliation.

use assert_matches::assert_matches;
use thicket_core::testing::TestHarness;
use thicket_core::tree::{Plan, TreeError};
use thicket_core::widgets::{Frame, Label, NodeBase};

#[test]
fn auto_names_never_reuse_counters() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();

    let (a, b) = harness.scene().edit(|tree| {
        let a = tree.add_child(main, NodeBase).unwrap();
        let b = tree.add_child(main, NodeBase).unwrap();
        (a, b)
    });

    let names: Vec<String> = harness
        .scene()
        .edit(|tree| tree.children(main))
        .iter()
        .map(|id| harness.scene_ref().widget_state(*id).unwrap().name().to_string())
        .collect();
    assert_eq!(names, ["node-base-0", "node-base-1"]);

    harness.scene().edit(|tree| {
        tree.rename(a, "x").unwrap();
        tree.delete(b).unwrap();
        tree.add_child(main, NodeBase).unwrap();
    });

    let names: Vec<String> = harness
        .scene()
        .edit(|tree| tree.children(main))
        .iter()
        .map(|id| harness.scene_ref().widget_state(*id).unwrap().name().to_string())
        .collect();
    // The counter does not reuse freed values.
    assert_eq!(names, ["x", "node-base-2"]);
}

#[test]
fn path_escapes_separators() {
    let mut harness = TestHarness::create(Frame::new());
    let root = harness.scene_ref().root_id();

    let child = harness.scene().edit(|tree| {
        tree.rename(root, "n").unwrap();
        tree.add_named_child(root, NodeBase, "child/with-slash")
            .unwrap()
    });

    let path = harness.scene().edit(|tree| tree.path(child));
    assert_eq!(path, "/n/child\\with-slash");

    let found = harness
        .scene()
        .edit(|tree| tree.find_path(root, "child\\with-slash"))
        .unwrap();
    assert_eq!(found, child);

    // Absolute resolution from anywhere.
    let found = harness
        .scene()
        .edit(|tree| tree.find_path(child, "/n/child\\with-slash"))
        .unwrap();
    assert_eq!(found, child);
}

#[test]
fn duplicate_explicit_name_is_rejected() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();

    harness.scene().edit(|tree| {
        tree.add_named_child(main, NodeBase, "twin").unwrap();
        let err = tree.add_named_child(main, NodeBase, "twin").unwrap_err();
        assert_matches!(err, TreeError::DuplicateName(name) if name == "twin");
    });
}

#[test]
fn reconciliation_reuses_by_name_and_type() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();

    let (a, b, c) = harness.scene().edit(|tree| {
        let a = tree.add_named_child(main, NodeBase, "a").unwrap();
        let b = tree.add_named_child(main, NodeBase, "b").unwrap();
        let c = tree.add_named_child(main, NodeBase, "c").unwrap();
        (a, b, c)
    });

    harness.scene().edit(|tree| {
        let plan = Plan::new()
            .child("node-base", "c")
            .child("node-base", "d")
            .child("node-base", "b");
        tree.apply_plan(main, plan).unwrap();
    });

    let children = harness.scene().edit(|tree| tree.children(main));
    let names: Vec<String> = children
        .iter()
        .map(|id| harness.scene_ref().widget_state(*id).unwrap().name().to_string())
        .collect();
    assert_eq!(names, ["c", "d", "b"]);

    // Reused children keep their identities; the dropped one is gone.
    assert_eq!(children[0], c);
    assert_eq!(children[2], b);
    assert!(harness.scene_ref().widget_state(a).is_none());
}

#[test]
fn reconciliation_is_idempotent() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();

    let make_plan = || {
        Plan::new()
            .child("label", "first")
            .child("label", "second")
    };
    harness.scene().edit(|tree| tree.apply_plan(main, make_plan()).unwrap());
    let before = harness.scene().edit(|tree| tree.children(main));

    harness.scene().edit(|tree| tree.apply_plan(main, make_plan()).unwrap());
    let after = harness.scene().edit(|tree| tree.children(main));

    assert_eq!(before, after);
}

#[test]
fn reconciliation_replaces_on_type_mismatch() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();

    let old = harness
        .scene()
        .edit(|tree| tree.add_named_child(main, NodeBase, "slot").unwrap());
    harness.scene().edit(|tree| {
        tree.apply_plan(main, Plan::new().child("label", "slot")).unwrap();
    });

    let children = harness.scene().edit(|tree| tree.children(main));
    assert_eq!(children.len(), 1);
    assert_ne!(children[0], old);
    assert_eq!(
        harness.scene_ref().widget_state(children[0]).unwrap().name(),
        "slot"
    );
}

#[test]
fn move_to_parent_keeps_name_and_subtree() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();

    let (left, right, child, grandchild) = harness.scene().edit(|tree| {
        let left = tree.add_named_child(main, Frame::new(), "left").unwrap();
        let right = tree.add_named_child(main, Frame::new(), "right").unwrap();
        let child = tree.add_named_child(left, Frame::new(), "movable").unwrap();
        let grandchild = tree.add_child(child, Label::new("inner")).unwrap();
        (left, right, child, grandchild)
    });

    harness.scene().edit(|tree| {
        tree.move_to_parent(child, right).unwrap();
        assert_eq!(tree.children(left), vec![]);
        assert_eq!(tree.children(right), vec![child]);
        assert_eq!(tree.parent_of(child), Some(right));
        assert_eq!(tree.parent_of(grandchild), Some(child));
        assert_eq!(tree.path(child), "/scene/main/right/movable");

        // Moving an ancestor into its own subtree is refused.
        assert_matches!(
            tree.move_to_parent(right, grandchild),
            Err(TreeError::CyclicMove)
        );
    });
}

#[test]
fn typed_lookups() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();

    let (inner, label) = harness.scene().edit(|tree| {
        let inner = tree.add_child(main, Frame::new()).unwrap();
        let label = tree.add_child(inner, Label::new("x")).unwrap();
        (inner, label)
    });

    harness.scene().edit(|tree| {
        assert_eq!(tree.child_by_type::<Label>(inner), Some(label));
        assert_eq!(tree.child_by_type::<Label>(main), None);
        assert_eq!(tree.parent_by_type::<Frame>(label), Some(inner));
    });
}

#[test]
fn walks_cover_orders() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();

    let (a, b, c) = harness.scene().edit(|tree| {
        let a = tree.add_named_child(main, Frame::new(), "a").unwrap();
        let b = tree.add_named_child(a, NodeBase, "b").unwrap();
        let c = tree.add_named_child(main, NodeBase, "c").unwrap();
        (a, b, c)
    });

    let root = harness.scene_ref().root_id();
    harness.scene().edit(|tree| {
        assert_eq!(tree.descendants(main), vec![main, a, b, c]);
        assert_eq!(tree.descendants_post(main), vec![b, a, c, main]);
        assert_eq!(tree.descendants_breadth(main), vec![main, a, c, b]);
        assert_eq!(tree.ancestors(b), vec![b, a, main, root]);
    });
}

#[test]
fn delete_destroys_subtree_and_invalidates_paths() {
    let mut harness = TestHarness::create(Frame::new());
    let main = harness.scene_ref().main_id();

    let (parent, child) = harness.scene().edit(|tree| {
        let parent = tree.add_named_child(main, Frame::new(), "parent").unwrap();
        let child = tree.add_child(parent, Label::new("x")).unwrap();
        (parent, child)
    });

    harness.scene().edit(|tree| tree.delete(parent).unwrap());

    assert!(harness.scene_ref().widget_state(parent).is_none());
    assert!(harness.scene_ref().widget_state(child).is_none());
    harness.scene().edit(|tree| {
        assert_matches!(
            tree.find_path(main, "parent"),
            Err(TreeError::PathNotFound(_))
        );
    });
}
