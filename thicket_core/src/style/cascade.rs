// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! The style fold: seeding from the parent, applying stylers in order.

use std::rc::Rc;

use crate::style::Style;
use crate::util::{composite_over, is_opaque};

/// A single style function. Stylers run in declaration order and see the
/// style produced by everything before them.
pub type Styler = Rc<dyn Fn(&mut Style)>;

/// The two-phase styler list of a widget: the normal phase, then the final
/// phase reserved for overrides that must see all other contributions.
#[derive(Clone, Default)]
pub struct StylerList {
    pub(crate) normal: Vec<Styler>,
    pub(crate) final_phase: Vec<Styler>,
}

impl std::fmt::Debug for StylerList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StylerList")
            .field("normal", &self.normal.len())
            .field("final_phase", &self.final_phase.len())
            .finish()
    }
}

impl StylerList {
    pub fn push(&mut self, styler: impl Fn(&mut Style) + 'static) {
        self.normal.push(Rc::new(styler));
    }

    pub fn push_final(&mut self, styler: impl Fn(&mut Style) + 'static) {
        self.final_phase.push(Rc::new(styler));
    }
}

impl Style {
    /// A fresh style seeded with the parent context: font metrics and text
    /// color inherit; box and layout properties reset to their defaults.
    ///
    /// States and abilities are sticky per widget and are carried by the
    /// caller, not by inheritance.
    pub fn inherit(parent: &Style) -> Self {
        Self {
            font: parent.font.clone(),
            color: parent.color,
            text_align: parent.text_align,
            // Seed with the parent's effective fill so translucent state
            // layers composite correctly before `resolve_actual_background`.
            actual_background: parent.actual_background,
            ..Self::default()
        }
    }

    /// Runs the full fold for one widget: seed (done by the caller via
    /// [`Style::inherit`]), base styler, normal stylers, final stylers.
    pub fn apply_stylers(&mut self, base: impl FnOnce(&mut Style), stylers: &StylerList) {
        base(self);
        for styler in &stylers.normal {
            styler(self);
        }
        for styler in &stylers.final_phase {
            styler(self);
        }
    }

    /// Computes the effective background from this widget's own fill and the
    /// nearest opaque ancestor fill (`ancestor_actual`).
    ///
    /// A translucent own fill composites over the ancestor's effective fill,
    /// not over the direct parent's possibly-translucent one.
    pub fn resolve_actual_background(&mut self, ancestor_actual: peniko::Color) {
        self.actual_background = match &self.background {
            None => ancestor_actual,
            Some(bg) => {
                let own = bg.representative_color();
                if is_opaque(own) {
                    own
                } else {
                    composite_over(own, ancestor_actual)
                }
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use peniko::Color;

    use super::*;
    use crate::style::Background;

    #[test]
    fn stylers_run_in_order() {
        let mut list = StylerList::default();
        list.push(|s| s.opacity = 0.25);
        list.push(|s| s.opacity = 0.5);
        list.push_final(|s| s.opacity *= 2.0);
        let mut style = Style::default();
        style.apply_stylers(|_| {}, &list);
        assert_eq!(style.opacity, 1.0);
    }

    #[test]
    fn translucent_background_composites_over_opaque_ancestor() {
        let mut style = Style::default();
        style.background = Some(Background::Color(Color::rgba8(0, 0, 0, 128)));
        style.resolve_actual_background(Color::rgb8(255, 255, 255));
        let actual = style.actual_background;
        assert_eq!(actual.a, 255);
        assert!(actual.r > 120 && actual.r < 136);
    }
}
