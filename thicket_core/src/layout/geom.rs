// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Computed layout results for a single widget.

use kurbo::{Point, Rect, Size, Vec2};

use crate::layout::Dim;

/// The geometry record filled in by the layout passes.
///
/// Sizes are content-box sizes unless noted otherwise. The pass that writes
/// each field is noted; everything is in device dots.
///
/// Invariants, holding after the scene-position pass:
/// `content_bbox ⊆ total_bbox ⊆ parent.content_bbox`; an empty `total_bbox`
/// suppresses rendering of the subtree.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    /// Desired content size, clamped to the style min/max. Written by the
    /// size-up pass.
    pub actual: Size,
    /// Size granted by the parent. Written by the size-down pass.
    pub alloc: Size,
    /// Intrinsic content size; may exceed `alloc` along overflow-auto axes,
    /// which is what triggers scrollbars. Written by the size-final pass.
    pub internal: Size,
    /// Outer size including margin. Written by the size-final pass.
    pub total: Size,

    /// Offset of the outer box from the parent's content origin.
    pub rel_pos: Point,
    /// Resolved scene coordinates of the outer box origin.
    pub scene_pos: Point,

    /// Drawable region inside padding and border, clipped against ancestors.
    pub content_bbox: Rect,
    /// Outer rectangle clipped against ancestors.
    pub total_bbox: Rect,

    /// Per-axis logical scroll offset applied to children (≤ 0 when scrolled
    /// toward the end).
    pub scroll: Vec2,

    /// Resolved padding plus border, per side, for content-box derivation.
    pub inset: crate::style::Sides<f64>,
    /// Resolved margin per side.
    pub margin: crate::style::Sides<f64>,
}

impl Geometry {
    /// The content origin in scene coordinates (before scroll translation).
    pub fn content_origin(&self) -> Point {
        Point::new(
            self.scene_pos.x + self.margin.left + self.inset.left,
            self.scene_pos.y + self.margin.top + self.inset.top,
        )
    }

    /// The border-box rectangle in scene coordinates.
    pub fn box_rect(&self) -> Rect {
        let origin = Point::new(
            self.scene_pos.x + self.margin.left,
            self.scene_pos.y + self.margin.top,
        );
        Rect::from_origin_size(origin, self.box_size())
    }

    /// Border-box size: content plus insets, without margin.
    pub fn box_size(&self) -> Size {
        Size::new(
            self.alloc.width + self.inset.left + self.inset.right,
            self.alloc.height + self.inset.top + self.inset.bottom,
        )
    }

    /// The unclipped outer rectangle in scene coordinates.
    pub fn outer_rect(&self) -> Rect {
        Rect::from_origin_size(self.scene_pos, self.total)
    }

    /// The unclipped content rectangle in scene coordinates.
    pub fn content_rect(&self) -> Rect {
        Rect::from_origin_size(self.content_origin(), self.alloc)
    }

    /// Whether the clipped outer box is empty (which suppresses rendering
    /// and hit testing of the subtree).
    pub fn is_clipped_out(&self) -> bool {
        self.total_bbox.width() <= 0.0 || self.total_bbox.height() <= 0.0
    }

    /// Whether a scene point is inside the clipped outer box.
    pub fn contains(&self, point: Point) -> bool {
        !self.is_clipped_out() && self.total_bbox.contains(point)
    }

    /// Scene point translated into content-local coordinates, including the
    /// scroll offset.
    pub fn to_local(&self, point: Point) -> Point {
        let origin = self.content_origin();
        Point::new(
            point.x - origin.x - self.scroll.x,
            point.y - origin.y - self.scroll.y,
        )
    }

    /// Clamps the scroll offset so content cannot scroll past its end.
    pub fn clamp_scroll(&mut self) {
        for dim in Dim::ALL {
            let overhang = (dim.of_size(self.internal) - dim.of_size(self.alloc)).max(0.0);
            let v = dim.of_vec2(self.scroll).clamp(-overhang, 0.0);
            dim.set_vec2(&mut self.scroll, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_clamped_to_overhang() {
        let mut geom = Geometry {
            alloc: Size::new(100.0, 200.0),
            internal: Size::new(100.0, 1000.0),
            ..Geometry::default()
        };
        geom.scroll = Vec2::new(-50.0, -2000.0);
        geom.clamp_scroll();
        assert_eq!(geom.scroll.x, 0.0);
        assert_eq!(geom.scroll.y, -800.0);
    }

    #[test]
    fn local_coordinates_include_scroll() {
        let mut geom = Geometry::default();
        geom.scene_pos = Point::new(10.0, 10.0);
        geom.inset = crate::style::Sides::all(2.0);
        geom.scroll = Vec2::new(0.0, -30.0);
        let local = geom.to_local(Point::new(12.0, 12.0));
        assert_eq!(local, Point::new(0.0, 30.0));
    }
}
