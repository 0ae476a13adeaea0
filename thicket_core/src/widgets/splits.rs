// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::{Widget, WidgetId};
use crate::style::{Abilities, StateFlags, Style};
use crate::tree::{TreeCtx, TreeError};

/// A container dividing its extent among its items by explicit proportions.
///
/// Proportions are first-class, not growth: they are normalized to sum 1,
/// each item's share of the container follows its proportion, and the last
/// item absorbs the cumulative pixel residual. An item whose normalized
/// proportion collapses below 0.01 is made invisible and takes no space.
///
/// Items must be added through [`Splits::add_item`], which attaches the
/// proportion styler to the child.
#[derive(Debug)]
pub struct Splits {
    props: Rc<RefCell<Vec<f64>>>,
}

impl Default for Splits {
    fn default() -> Self {
        Self {
            props: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl Splits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current proportions, normalized.
    pub fn proportions(&self) -> Vec<f64> {
        normalized(&self.props.borrow())
    }

    /// Adds an item; its share is the proportion at its index (1 appended if
    /// the proportion list is shorter than the item list).
    pub fn add_item(
        tree: &mut TreeCtx<'_>,
        splits: WidgetId,
        widget: impl Widget,
    ) -> Result<WidgetId, TreeError> {
        let props = tree
            .with_widget::<Self, _>(splits, |w, _| w.props.clone())
            .ok_or(TreeError::NoSuchWidget(splits))?;
        let index = tree
            .children(splits)
            .iter()
            .filter(|id| tree.state(**id).is_some_and(|s| !s.is_part))
            .count();
        if props.borrow().len() <= index {
            props.borrow_mut().push(1.0);
        }
        let id = tree.add_child(splits, widget)?;
        let state = tree.state_mut(id).expect("just inserted");
        state.styler(move |style| {
            let share = normalized(&props.borrow()).get(index).copied().unwrap_or(0.0);
            if share < 0.01 {
                style.states |= StateFlags::INVISIBLE;
            } else {
                // The generic flex distribution turns equal-desire growable
                // children into proportion-shaped cells, with the last cell
                // absorbing the rounding residual.
                style.grow.x = share;
                style.grow.y = share;
            }
        });
        Ok(id)
    }

    /// Replaces the proportions and restyles the items.
    pub fn set_splits(tree: &mut TreeCtx<'_>, splits: WidgetId, values: Vec<f64>) {
        let Some(props) =
            tree.with_widget::<Self, _>(splits, |w, _| w.props.clone())
        else {
            return;
        };
        *props.borrow_mut() = values;
        for child in tree.children(splits) {
            if let Some(state) = tree.state_mut(child) {
                state.request_style = true;
                state.needs_style = true;
                state.needs_layout = true;
            }
        }
        for ancestor in tree.ancestors(splits) {
            if let Some(state) = tree.state_mut(ancestor) {
                state.needs_style = true;
                state.needs_layout = true;
            }
        }
        tree.scene.needs_layout = true;
        tree.scene.scene_needs_render = true;
    }
}

fn normalized(props: &[f64]) -> Vec<f64> {
    let total: f64 = props.iter().map(|p| p.max(0.0)).sum();
    if total <= 0.0 {
        return vec![0.0; props.len()];
    }
    props.iter().map(|p| p.max(0.0) / total).collect()
}

impl Widget for Splits {
    fn type_ident(&self) -> &'static str {
        "splits"
    }

    fn base_style(&self, style: &mut Style) {
        style.abilities = Abilities::HOVERABLE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization() {
        assert_eq!(normalized(&[1.0, 1.0]), vec![0.5, 0.5]);
        assert_eq!(normalized(&[2.0, -1.0, 2.0]), vec![0.5, 0.0, 0.5]);
        assert_eq!(normalized(&[0.0]), vec![0.0]);
    }
}
