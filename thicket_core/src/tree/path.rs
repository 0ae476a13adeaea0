// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Widget paths.
//!
//! A path is `/name0/name1/…` from the root. Since names may themselves
//! contain separators, `/` and `\` inside a component are both escaped to
//! `\`; resolution compares escaped names, so a path printed by [`path_of`]
//! always resolves back to the widget that produced it.

use crate::core::WidgetId;
use crate::tree::arena::{ArenaNode, WidgetArena};
use crate::tree::TreeError;

/// Escapes one path component.
pub fn escape_name(name: &str) -> String {
    name.replace(['/', '\\'], "\\")
}

/// The absolute path of a widget, `/root/…/name`.
pub(crate) fn path_of(arena: &WidgetArena, id: WidgetId) -> String {
    let mut ids = arena.id_path(id);
    ids.reverse();
    let mut out = String::new();
    for step in ids {
        out.push('/');
        if let Some(state) = arena.get_state(step) {
            out.push_str(&escape_name(&state.name));
        }
    }
    out
}

/// Resolves a path against `from`.
///
/// A leading `/` makes the path absolute: the first component must name the
/// root. Relative paths resolve against `from`'s children. Empty components
/// are ignored, so `a//b` equals `a/b`.
pub(crate) fn find_path(
    arena: &WidgetArena,
    from: WidgetId,
    path: &str,
) -> Result<WidgetId, TreeError> {
    let not_found = || TreeError::PathNotFound(path.to_string());

    let absolute = path.starts_with('/');
    let mut components = path.split('/').filter(|c| !c.is_empty());

    let mut node: &ArenaNode = if absolute {
        let root = arena.root();
        let first = components.next().ok_or_else(not_found)?;
        if escape_name(&root.item.state.name) != first {
            return Err(not_found());
        }
        root
    } else {
        arena.find(from).ok_or(TreeError::NoSuchWidget(from))?
    };

    for component in components {
        node = node
            .children
            .iter()
            .find(|c| escape_name(&c.item.state.name) == component)
            .ok_or_else(not_found)?;
    }
    Ok(node.id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaping() {
        assert_eq!(escape_name("plain"), "plain");
        assert_eq!(escape_name("child/with-slash"), "child\\with-slash");
        assert_eq!(escape_name("back\\slash"), "back\\slash");
    }
}
