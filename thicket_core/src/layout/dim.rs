// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! The two layout dimensions and a small per-axis pair container.

use kurbo::{Point, Size, Vec2};

use crate::style::Direction;

/// One of the two layout dimensions.
///
/// The layout engine is written against an abstract primary dimension `d`
/// and its cross dimension `d.other()`; [`Direction`] picks which concrete
/// dimension is primary for a flex container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dim {
    X,
    Y,
}

impl Dim {
    pub const ALL: [Self; 2] = [Self::X, Self::Y];

    /// The cross dimension.
    pub fn other(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    /// Numeric index, `X == 0`.
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
        }
    }

    pub fn of_size(self, size: Size) -> f64 {
        match self {
            Self::X => size.width,
            Self::Y => size.height,
        }
    }

    pub fn of_point(self, point: Point) -> f64 {
        match self {
            Self::X => point.x,
            Self::Y => point.y,
        }
    }

    pub fn set_size(self, size: &mut Size, v: f64) {
        match self {
            Self::X => size.width = v,
            Self::Y => size.height = v,
        }
    }

    pub fn set_point(self, point: &mut Point, v: f64) {
        match self {
            Self::X => point.x = v,
            Self::Y => point.y = v,
        }
    }

    /// Packs primary/cross lengths into a size, with `self` as primary.
    pub fn pack_size(self, main: f64, cross: f64) -> Size {
        match self {
            Self::X => Size::new(main, cross),
            Self::Y => Size::new(cross, main),
        }
    }

    pub fn pack_point(self, main: f64, cross: f64) -> Point {
        match self {
            Self::X => Point::new(main, cross),
            Self::Y => Point::new(cross, main),
        }
    }

    pub fn of_vec2(self, v: Vec2) -> f64 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
        }
    }

    pub fn set_vec2(self, vec: &mut Vec2, v: f64) {
        match self {
            Self::X => vec.x = v,
            Self::Y => vec.y = v,
        }
    }
}

impl From<Direction> for Dim {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Row => Self::X,
            Direction::Column => Self::Y,
        }
    }
}

/// A pair of per-dimension values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct XY<T> {
    pub x: T,
    pub y: T,
}

impl<T: Copy> XY<T> {
    pub fn splat(v: T) -> Self {
        Self { x: v, y: v }
    }

    pub fn dim(&self, dim: Dim) -> T {
        match dim {
            Dim::X => self.x,
            Dim::Y => self.y,
        }
    }

    pub fn set_dim(&mut self, dim: Dim, v: T) {
        match dim {
            Dim::X => self.x = v,
            Dim::Y => self.y = v,
        }
    }
}
