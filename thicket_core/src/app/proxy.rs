// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Mutation from outside the frame loop.
//!
//! Background work that wants to touch the tree enqueues a closure through a
//! [`SceneProxy`]; the scene runs the queue at the top of its next update
//! tick, so mutations are always applied between frames, never during one.
//! After the scene is dropped the proxy reports [`SceneGone`] and callers
//! discard their pending work.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use thiserror::Error;

use crate::app::Scene;

/// The scene this proxy pointed at has been dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the scene has been dropped")]
pub struct SceneGone;

type QueuedFn = Box<dyn FnOnce(&mut Scene) + Send>;

pub(crate) struct ProxyShared {
    pub(crate) queue: Mutex<Vec<QueuedFn>>,
    pub(crate) alive: AtomicBool,
}

impl ProxyShared {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            queue: Mutex::new(Vec::new()),
            alive: AtomicBool::new(true),
        })
    }
}

/// A cloneable, `Send` handle for enqueueing scene mutations from other
/// threads.
#[derive(Clone)]
pub struct SceneProxy {
    pub(crate) shared: Arc<ProxyShared>,
}

impl SceneProxy {
    /// Enqueues `f` to run on the UI thread before the next frame.
    ///
    /// Returns [`SceneGone`] if the scene no longer exists; the closure is
    /// dropped without running.
    pub fn update(&self, f: impl FnOnce(&mut Scene) + Send + 'static) -> Result<(), SceneGone> {
        if !self.shared.alive.load(Ordering::Acquire) {
            return Err(SceneGone);
        }
        let mut queue = self.shared.queue.lock();
        // Re-check under the lock: the scene drops its queue with the lock
        // held, so an alive check here cannot race with the drain.
        if !self.shared.alive.load(Ordering::Acquire) {
            return Err(SceneGone);
        }
        queue.push(Box::new(f));
        Ok(())
    }

    /// Whether the scene still exists.
    pub fn is_alive(&self) -> bool {
        self.shared.alive.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for SceneProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneProxy")
            .field("alive", &self.is_alive())
            .finish()
    }
}
