// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

use crate::core::Widget;

/// The plainest tree element: no visuals, no abilities.
///
/// Useful as pure tree data (model nodes, grouping) and as the default type
/// for nodes created without a more specific one.
#[derive(Debug, Default)]
pub struct NodeBase;

impl Widget for NodeBase {
    fn type_ident(&self) -> &'static str {
        "node-base"
    }
}
