// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Helper tools for writing unit tests.

mod harness;
mod helper_widgets;
mod recorder;
mod shaper;

pub use harness::TestHarness;
pub use helper_widgets::ModularWidget;
pub use recorder::{PaintOp, RecordingSurface};
pub use shaper::FixedShaper;
