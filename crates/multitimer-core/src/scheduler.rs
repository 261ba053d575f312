//! Shared timing facility.
//!
//! One [`Scheduler`] serves every timer in the process. It owns a small tokio
//! runtime; tasks are plain closures invoked on the runtime's worker threads.
//! A panic inside a task is caught and logged at this boundary so one broken
//! callback cannot take down the tick loop or any other task.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::error;

use crate::error::Result;

/// Fixed-rate and one-shot task scheduling on a dedicated runtime.
pub struct Scheduler {
    handle: Handle,
    // Kept solely so Drop can shut the runtime down without blocking.
    runtime: Option<Runtime>,
}

impl Scheduler {
    pub fn new() -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("multitimer-sched")
            .enable_time()
            .build()?;
        let handle = runtime.handle().clone();
        Ok(Self {
            handle,
            runtime: Some(runtime),
        })
    }

    /// Invoke `task` at a fixed rate, first invocation one period from now.
    /// Ticks that fall behind are skipped, not bunched.
    pub fn schedule_recurring(
        &self,
        period: Duration,
        task: impl Fn() + Send + 'static,
    ) -> TaskHandle {
        let join = self.handle.spawn(async move {
            let mut ticker = time::interval_at(time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                run_guarded(&task);
            }
        });
        TaskHandle { join }
    }

    /// Invoke `task` once after `delay`.
    pub fn schedule_once(
        &self,
        delay: Duration,
        task: impl FnOnce() + Send + 'static,
    ) -> TaskHandle {
        let join = self.handle.spawn(async move {
            time::sleep(delay).await;
            run_guarded(task);
        });
        TaskHandle { join }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            // Pending tasks are dropped; worker threads exit on their own
            // without keeping the process alive.
            runtime.shutdown_background();
        }
    }
}

/// Cancellation handle for a scheduled task.
///
/// `cancel` is idempotent and safe from any thread, including from inside a
/// running invocation of the same task: the current invocation finishes, no
/// further one starts.
pub struct TaskHandle {
    join: JoinHandle<()>,
}

impl TaskHandle {
    pub fn cancel(&self) {
        self.join.abort();
    }
}

fn run_guarded(task: impl FnOnce()) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
        error!("scheduled task panicked: {}", panic_message(payload.as_ref()));
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "opaque panic payload"
    }
}
