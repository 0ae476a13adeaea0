// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! The scene, its frame loop, and its collaborator handles.

mod proxy;
mod scene;
mod settings;
mod stages;
mod tracing_backend;

pub use proxy::{SceneGone, SceneProxy};
pub use scene::{Scene, SceneState};
pub use settings::{SceneOptions, SceneSettings};
pub use stages::{SceneRoot, Stage, StageKind};
pub use tracing_backend::{try_init_test_tracing, try_init_tracing};
