//! Builder reuse pool.
//!
//! A [`BuilderPool`] is a free list of builder frames (a clause model plus the last
//! compiled statement). Frames are only ever handed back by a dropping
//! [`Builder`](crate::Builder), and are reset before they become visible to the next
//! borrower.

use crate::clause::ClauseModel;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Default number of idle frames a pool keeps around.
pub const DEFAULT_MAX_IDLE: usize = 64;

/// Mutable state of one builder, recycled through the pool.
#[derive(Debug, Default)]
pub(crate) struct Frame {
    pub(crate) model: ClauseModel,
    pub(crate) statement: String,
}

impl Frame {
    fn reset(&mut self) {
        self.model.reset();
        self.statement = String::new();
    }

    fn is_reset(&self) -> bool {
        self.model.is_empty() && self.statement.is_empty()
    }
}

#[derive(Debug)]
struct PoolInner {
    free: Mutex<Vec<Frame>>,
    max_idle: usize,
    created: AtomicUsize,
    reused: AtomicUsize,
}

/// A thread-safe, cloneable free list of builder frames.
///
/// Clones share the same free list. Construct independent pools for isolated tests.
#[derive(Debug, Clone)]
pub struct BuilderPool {
    inner: Arc<PoolInner>,
}

impl Default for BuilderPool {
    fn default() -> Self {
        Self::new()
    }
}

impl BuilderPool {
    /// Create a pool that retains up to [`DEFAULT_MAX_IDLE`] idle frames.
    pub fn new() -> Self {
        Self::with_max_idle(DEFAULT_MAX_IDLE)
    }

    /// Create a pool that retains up to `max_idle` idle frames; extra frames are dropped
    /// on release.
    pub fn with_max_idle(max_idle: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                free: Mutex::new(Vec::new()),
                max_idle,
                created: AtomicUsize::new(0),
                reused: AtomicUsize::new(0),
            }),
        }
    }

    /// Take a recycled frame, or build a new one when the free list is empty.
    pub(crate) fn acquire(&self) -> Frame {
        let recycled = self
            .inner
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();

        match recycled {
            Some(frame) => {
                self.inner.reused.fetch_add(1, Ordering::Relaxed);
                debug_assert!(frame.is_reset(), "pooled frame was not reset");
                frame
            }
            None => {
                let created = self.inner.created.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::trace!(target: "silk.pool", created, "allocated builder frame");
                Frame::default()
            }
        }
    }

    /// Reset `frame` and make it available again.
    pub(crate) fn release(&self, mut frame: Frame) {
        frame.reset();
        let mut free = self
            .inner
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if free.len() < self.inner.max_idle {
            free.push(frame);
        }
    }

    /// Number of frames currently waiting in the free list.
    pub fn idle(&self) -> usize {
        self.inner
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Total frames allocated by this pool.
    pub fn created(&self) -> usize {
        self.inner.created.load(Ordering::Relaxed)
    }

    /// Total acquisitions served from the free list.
    pub fn reused(&self) -> usize {
        self.inner.reused.load(Ordering::Relaxed)
    }

    /// Maximum number of idle frames retained.
    pub fn max_idle(&self) -> usize {
        self.inner.max_idle
    }
}
