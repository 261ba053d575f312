//! Observer callback routing.
//!
//! Timers and groups hand each batch of notifications to a [`Dispatcher`] as
//! one job. The default dispatcher runs jobs on the calling thread; an
//! embedder with a UI event loop can install its own and marshal jobs there.
//! Jobs for one entity are submitted in mutation order, so a FIFO dispatcher
//! preserves per-entity delivery ordering.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// A single batch of observer notifications.
pub type Job = Box<dyn FnOnce() + Send>;

pub trait Dispatcher: Send + Sync {
    /// Run or enqueue one notification job.
    ///
    /// With the inline dispatcher the job runs inside the publishing entity's
    /// delivery section, so a callback that wants to mutate that same entity
    /// must hand the work somewhere else first.
    fn dispatch(&self, job: Job);
}

/// Runs jobs immediately on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineDispatcher;

impl Dispatcher for InlineDispatcher {
    fn dispatch(&self, job: Job) {
        job();
    }
}

/// Lock a mutex, recovering the guard if a panicking observer poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
