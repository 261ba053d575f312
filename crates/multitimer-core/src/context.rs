//! Shared services handed to every timer and group.

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::dispatch::{Dispatcher, InlineDispatcher};
use crate::scheduler::Scheduler;

/// Bundle of scheduler, clock and dispatcher shared by all timers built from
/// it. Cloning is cheap; clones refer to the same services.
#[derive(Clone)]
pub struct Context {
    pub(crate) scheduler: Arc<Scheduler>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) dispatcher: Arc<dyn Dispatcher>,
}

impl Context {
    /// System clock and inline dispatch; the common production setup.
    pub fn new(scheduler: Arc<Scheduler>) -> Self {
        Self {
            scheduler,
            clock: Arc::new(SystemClock),
            dispatcher: Arc::new(InlineDispatcher),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn Dispatcher>) -> Self {
        self.dispatcher = dispatcher;
        self
    }
}
