// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Layout primitives: dimensions, per-axis pairs, and the per-widget
//! [`Geometry`] record.
//!
//! The layout passes that fill these records in are internal to the scene's
//! update tick; this module holds the data model they operate on.

mod dim;
mod geom;

pub use dim::{Dim, XY};
pub use geom::Geometry;
