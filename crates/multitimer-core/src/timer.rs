//! Countdown timer state machine.
//!
//! A timer counts down from its configured interval against absolute
//! wall-clock deadlines. A shared scheduler drives it at a fixed 100 ms tick;
//! each tick refreshes remaining time, then progress, then state.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped -> Running -> (Warning) -> Complete
//!    ^                                  |
//!    +------------- stop() ------------+
//! ```
//!
//! `Waiting` sits outside this chain: a group puts stopped or completed
//! timers on standby before a delayed start, and the group's trigger
//! starts them.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::context::Context;
use crate::dispatch::lock;
use crate::error::{PreconditionError, Result};
use crate::events::{Observers, SubscriptionId, TimerEvent};
use crate::scheduler::TaskHandle;
use crate::state::TimerState;

/// Tick period for running timers.
pub const TICK_PERIOD: Duration = Duration::from_millis(100);

/// Name given to timers created without one.
pub const DEFAULT_NAME: &str = "(unnamed)";

/// Plain configuration record for one timer, as stored in documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TimerSettings {
    pub name: String,
    /// Run length in seconds; persisted as ISO-8601 period text.
    #[serde(with = "crate::duration::iso_seconds")]
    pub interval: u64,
    /// Warning threshold in seconds; 0 disables the warning phase.
    #[serde(with = "crate::duration::iso_seconds")]
    pub warn_after: u64,
    /// Restart automatically on completion.
    pub repeat: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            interval: 0,
            warn_after: 0,
            repeat: false,
        }
    }
}

/// Read-consistent copy of configuration plus live state.
#[derive(Debug, Clone, Serialize)]
pub struct TimerSnapshot {
    pub name: String,
    pub interval: u64,
    pub warn_after: u64,
    pub repeat: bool,
    pub state: TimerState,
    pub progress: f64,
    pub remaining_ms: u64,
}

/// A single countdown timer. Cloning yields another handle to the same
/// timer; equality is handle identity.
#[derive(Clone)]
pub struct Timer {
    inner: Arc<TimerInner>,
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Timer {}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = lock(&self.inner.core);
        f.debug_struct("Timer")
            .field("name", &core.name)
            .field("state", &core.state)
            .finish_non_exhaustive()
    }
}

struct TimerInner {
    ctx: Context,
    /// Serializes mutate-and-notify units; delivery for one mutation
    /// finishes before the next mutation publishes.
    publish: Mutex<()>,
    core: Mutex<TimerCore>,
    observers: Observers<TimerEvent>,
    ticker: Mutex<Option<TaskHandle>>,
}

struct TimerCore {
    name: String,
    interval_secs: u64,
    warn_after_secs: u64,
    repeat: bool,
    state: TimerState,
    progress: f64,
    remaining_ms: u64,
    /// Absolute deadline (epoch ms); valid while running.
    finish_at_ms: u64,
    /// Absolute warning threshold; `None` when no warning phase.
    warn_at_ms: Option<u64>,
}

impl Timer {
    pub fn new(ctx: &Context) -> Self {
        Self::from_settings(ctx, &TimerSettings::default())
    }

    pub fn from_settings(ctx: &Context, settings: &TimerSettings) -> Self {
        Self {
            inner: Arc::new(TimerInner {
                ctx: ctx.clone(),
                publish: Mutex::new(()),
                core: Mutex::new(TimerCore {
                    name: settings.name.clone(),
                    interval_secs: settings.interval,
                    warn_after_secs: settings.warn_after,
                    repeat: settings.repeat,
                    state: TimerState::Stopped,
                    progress: 0.0,
                    remaining_ms: settings.interval.saturating_mul(1_000),
                    finish_at_ms: 0,
                    warn_at_ms: None,
                }),
                observers: Observers::new(),
                ticker: Mutex::new(None),
            }),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn name(&self) -> String {
        lock(&self.inner.core).name.clone()
    }

    pub fn interval_secs(&self) -> u64 {
        lock(&self.inner.core).interval_secs
    }

    pub fn warn_after_secs(&self) -> u64 {
        lock(&self.inner.core).warn_after_secs
    }

    pub fn repeat(&self) -> bool {
        lock(&self.inner.core).repeat
    }

    pub fn state(&self) -> TimerState {
        lock(&self.inner.core).state
    }

    /// 0.0 .. 1.0 progress through the current run.
    pub fn progress(&self) -> f64 {
        lock(&self.inner.core).progress
    }

    pub fn remaining_ms(&self) -> u64 {
        lock(&self.inner.core).remaining_ms
    }

    pub fn settings(&self) -> TimerSettings {
        lock(&self.inner.core).settings()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let core = lock(&self.inner.core);
        TimerSnapshot {
            name: core.name.clone(),
            interval: core.interval_secs,
            warn_after: core.warn_after_secs,
            repeat: core.repeat,
            state: core.state,
            progress: core.progress,
            remaining_ms: core.remaining_ms,
        }
    }

    // ── Configuration ────────────────────────────────────────────────
    // All of these require a quiescent timer and leave it unchanged on
    // refusal.

    pub fn set_name(&self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        self.mutate_config(move |core, events| core.rename(name, events))
    }

    pub fn set_interval_secs(&self, secs: u64) -> Result<()> {
        self.mutate_config(move |core, events| core.set_interval(secs, events))
    }

    pub fn set_warn_after_secs(&self, secs: u64) -> Result<()> {
        self.mutate_config(move |core, events| core.set_warn_after(secs, events))
    }

    pub fn set_repeat(&self, repeat: bool) -> Result<()> {
        self.mutate_config(move |core, events| core.set_repeat(repeat, events))
    }

    /// Copy a whole settings record in one mutation.
    pub fn apply(&self, settings: &TimerSettings) -> Result<()> {
        let settings = settings.clone();
        self.mutate_config(move |core, events| {
            core.rename(settings.name, events);
            core.set_interval(settings.interval, events);
            core.set_warn_after(settings.warn_after, events);
            core.set_repeat(settings.repeat, events);
        })
    }

    fn mutate_config(
        &self,
        apply: impl FnOnce(&mut TimerCore, &mut Vec<TimerEvent>),
    ) -> Result<()> {
        let inner = &self.inner;
        let _publish = lock(&inner.publish);
        let mut events = Vec::new();
        {
            let mut core = lock(&inner.core);
            if !core.state.is_quiescent() {
                return Err(PreconditionError::TimerNotQuiescent {
                    name: core.name.clone(),
                    state: core.state,
                }
                .into());
            }
            apply(&mut core, &mut events);
        }
        inner.deliver(events);
        Ok(())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a run. No-op while already counting down; a zero interval is
    /// refused. Starting from `Waiting` or `Complete` re-arms deadlines
    /// from the current instant.
    pub fn start(&self) {
        let inner = &self.inner;
        let _publish = lock(&inner.publish);
        let mut events = Vec::new();
        {
            let mut core = lock(&inner.core);
            if core.state.is_running() {
                return;
            }
            if core.interval_secs == 0 {
                warn!(name = %core.name, "refusing to start timer with zero interval");
                return;
            }
            let now = inner.ctx.clock.now_millis();
            let interval_ms = core.interval_ms();
            core.finish_at_ms = now.saturating_add(interval_ms);
            core.warn_at_ms = if core.warn_after_secs == 0 {
                None
            } else {
                Some(now.saturating_add(core.warn_after_secs.saturating_mul(1_000)))
            };
            core.set_progress(0.0, &mut events);
            core.set_remaining(interval_ms, &mut events);
            core.transition(TimerState::Running, &mut events);
        }
        self.arm_ticker();
        inner.deliver(events);
    }

    /// Cancel the run and reset progress and remaining time. No-op while
    /// already stopped.
    pub fn stop(&self) {
        let inner = &self.inner;
        let _publish = lock(&inner.publish);
        let mut events = Vec::new();
        {
            let mut core = lock(&inner.core);
            if core.state == TimerState::Stopped {
                return;
            }
            let interval_ms = core.interval_ms();
            core.finish_at_ms = 0;
            core.warn_at_ms = None;
            core.set_progress(0.0, &mut events);
            core.set_remaining(interval_ms, &mut events);
            core.transition(TimerState::Stopped, &mut events);
        }
        inner.disarm_ticker();
        inner.deliver(events);
    }

    /// Enter `Waiting` without arming the tick. Only a stopped or completed
    /// timer can stand by; anything else is left alone. Groups use this
    /// ahead of a delayed start; a standalone timer has no reason to call it.
    pub fn standby(&self) {
        let inner = &self.inner;
        let _publish = lock(&inner.publish);
        let mut events = Vec::new();
        {
            let mut core = lock(&inner.core);
            if !matches!(core.state, TimerState::Stopped | TimerState::Complete) {
                debug!(name = %core.name, state = %core.state, "standby ignored");
                return;
            }
            core.transition(TimerState::Waiting, &mut events);
        }
        inner.deliver(events);
    }

    // ── Observers ────────────────────────────────────────────────────

    pub fn subscribe(
        &self,
        observer: impl Fn(&TimerEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.inner.observers.subscribe(Arc::new(observer))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.observers.unsubscribe(id)
    }

    fn arm_ticker(&self) {
        let weak = Arc::downgrade(&self.inner);
        let handle = self
            .inner
            .ctx
            .scheduler
            .schedule_recurring(TICK_PERIOD, move || {
                if let Some(inner) = weak.upgrade() {
                    inner.on_tick();
                }
            });
        if let Some(previous) = lock(&self.inner.ticker).replace(handle) {
            previous.cancel();
        }
    }
}

impl TimerInner {
    /// One tick: refresh remaining, then progress, then state. The finish
    /// check runs before the warning check, so a warning threshold at or
    /// past the interval is never observed.
    fn on_tick(&self) {
        let _publish = lock(&self.publish);
        let mut events = Vec::new();
        let mut finished = false;
        {
            let mut core = lock(&self.core);
            if !core.state.is_running() {
                return; // stale tick racing a stop
            }
            let now = self.ctx.clock.now_millis();
            let interval_ms = core.interval_ms();
            let remaining = core.finish_at_ms.saturating_sub(now);
            core.set_remaining(remaining, &mut events);
            let progress = if interval_ms == 0 {
                0.0
            } else {
                (1.0 - remaining as f64 / interval_ms as f64).clamp(0.0, 1.0)
            };
            core.set_progress(progress, &mut events);

            if now >= core.finish_at_ms {
                core.transition(TimerState::Complete, &mut events);
                if core.repeat {
                    // Both deadlines advance one whole interval; the cadence
                    // stays aligned to the original start. Observers still
                    // see the transient Complete above.
                    core.finish_at_ms = core.finish_at_ms.saturating_add(interval_ms);
                    if let Some(warn_at) = core.warn_at_ms {
                        core.warn_at_ms = Some(warn_at.saturating_add(interval_ms));
                    }
                    core.transition(TimerState::Running, &mut events);
                } else {
                    finished = true;
                }
            } else if core.warn_at_ms.is_some_and(|warn_at| now >= warn_at) {
                core.transition(TimerState::Warning, &mut events);
            }
        }
        if finished {
            self.disarm_ticker();
        }
        self.deliver(events);
    }

    fn disarm_ticker(&self) {
        if let Some(handle) = lock(&self.ticker).take() {
            handle.cancel();
        }
    }

    /// Publish one mutation's events as a single dispatcher job. Callers
    /// hold the publish lock, so jobs leave here in mutation order.
    fn deliver(&self, events: Vec<TimerEvent>) {
        if events.is_empty() {
            return;
        }
        let observers = self.observers.snapshot();
        if observers.is_empty() {
            return;
        }
        self.ctx.dispatcher.dispatch(Box::new(move || {
            for event in &events {
                for observer in &observers {
                    observer(event);
                }
            }
        }));
    }
}

impl Drop for TimerInner {
    fn drop(&mut self) {
        let handle = match self.ticker.get_mut() {
            Ok(slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            handle.cancel();
        }
    }
}

impl TimerCore {
    fn interval_ms(&self) -> u64 {
        self.interval_secs.saturating_mul(1_000)
    }

    fn settings(&self) -> TimerSettings {
        TimerSettings {
            name: self.name.clone(),
            interval: self.interval_secs,
            warn_after: self.warn_after_secs,
            repeat: self.repeat,
        }
    }

    fn transition(&mut self, to: TimerState, events: &mut Vec<TimerEvent>) {
        if self.state != to {
            events.push(TimerEvent::StateChanged {
                from: self.state,
                to,
                at: Utc::now(),
            });
            self.state = to;
        }
    }

    fn set_progress(&mut self, to: f64, events: &mut Vec<TimerEvent>) {
        if self.progress != to {
            events.push(TimerEvent::ProgressChanged {
                from: self.progress,
                to,
                at: Utc::now(),
            });
            self.progress = to;
        }
    }

    fn set_remaining(&mut self, to_ms: u64, events: &mut Vec<TimerEvent>) {
        if self.remaining_ms != to_ms {
            events.push(TimerEvent::RemainingChanged {
                from_ms: self.remaining_ms,
                to_ms,
                at: Utc::now(),
            });
            self.remaining_ms = to_ms;
        }
    }

    fn rename(&mut self, to: String, events: &mut Vec<TimerEvent>) {
        if self.name != to {
            let from = std::mem::replace(&mut self.name, to.clone());
            events.push(TimerEvent::NameChanged { from, to, at: Utc::now() });
        }
    }

    fn set_interval(&mut self, to_secs: u64, events: &mut Vec<TimerEvent>) {
        if self.interval_secs != to_secs {
            events.push(TimerEvent::IntervalChanged {
                from_secs: self.interval_secs,
                to_secs,
                at: Utc::now(),
            });
            self.interval_secs = to_secs;
        }
    }

    fn set_warn_after(&mut self, to_secs: u64, events: &mut Vec<TimerEvent>) {
        if self.warn_after_secs != to_secs {
            events.push(TimerEvent::WarnAfterChanged {
                from_secs: self.warn_after_secs,
                to_secs,
                at: Utc::now(),
            });
            self.warn_after_secs = to_secs;
        }
    }

    fn set_repeat(&mut self, to: bool, events: &mut Vec<TimerEvent>) {
        if self.repeat != to {
            events.push(TimerEvent::RepeatChanged {
                from: self.repeat,
                to,
                at: Utc::now(),
            });
            self.repeat = to;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::CoreError;
    use crate::scheduler::Scheduler;

    fn test_timer(interval: u64, warn_after: u64, repeat: bool) -> (Timer, Arc<ManualClock>) {
        let scheduler = Arc::new(Scheduler::new().unwrap());
        let clock = Arc::new(ManualClock::new(0));
        let ctx = Context::new(scheduler).with_clock(clock.clone() as Arc<dyn crate::clock::Clock>);
        let timer = Timer::from_settings(
            &ctx,
            &TimerSettings {
                name: "test".into(),
                interval,
                warn_after,
                repeat,
            },
        );
        (timer, clock)
    }

    fn record_transitions(timer: &Timer) -> Arc<Mutex<Vec<String>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        timer.subscribe(move |event| {
            if let TimerEvent::StateChanged { from, to, .. } = event {
                sink.lock().unwrap().push(format!("{from}->{to}"));
            }
        });
        log
    }

    #[test]
    fn fresh_timer_defaults() {
        let (timer, _clock) = test_timer(10, 8, false);
        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.progress(), 0.0);
        assert_eq!(timer.remaining_ms(), 10_000);
        assert_eq!(Timer::new(&timer.inner.ctx).name(), DEFAULT_NAME);
    }

    #[test]
    fn warning_then_complete_in_tick_order() {
        let (timer, clock) = test_timer(10, 8, false);
        let log = record_transitions(&timer);
        timer.start();
        assert_eq!(timer.state(), TimerState::Running);

        clock.set(8_100);
        timer.inner.on_tick();
        assert_eq!(timer.state(), TimerState::Warning);
        assert_eq!(timer.remaining_ms(), 1_900);
        assert!((timer.progress() - 0.81).abs() < 1e-9);

        clock.set(10_100);
        timer.inner.on_tick();
        assert_eq!(timer.state(), TimerState::Complete);
        assert_eq!(timer.remaining_ms(), 0);
        assert_eq!(timer.progress(), 1.0);

        assert_eq!(
            log.lock().unwrap().as_slice(),
            ["STOPPED->RUNNING", "RUNNING->WARNING", "WARNING->COMPLETE"]
        );
    }

    #[test]
    fn zero_warn_after_means_no_warning_phase() {
        let (timer, clock) = test_timer(10, 0, false);
        timer.start();
        clock.set(9_900);
        timer.inner.on_tick();
        assert_eq!(timer.state(), TimerState::Running);
        clock.set(10_000);
        timer.inner.on_tick();
        assert_eq!(timer.state(), TimerState::Complete);
    }

    #[test]
    fn warning_at_or_past_interval_is_never_observed() {
        for warn_after in [10, 12] {
            let (timer, clock) = test_timer(10, warn_after, false);
            let log = record_transitions(&timer);
            timer.start();
            clock.set(10_100);
            timer.inner.on_tick();
            assert_eq!(timer.state(), TimerState::Complete);
            assert!(!log.lock().unwrap().iter().any(|t| t.contains("WARNING")));
        }
    }

    #[test]
    fn repeat_advances_deadlines_by_one_interval() {
        let (timer, clock) = test_timer(10, 8, true);
        let log = record_transitions(&timer);
        timer.start();

        clock.set(10_100);
        timer.inner.on_tick();
        assert_eq!(timer.state(), TimerState::Running);

        // Second cycle: warning threshold moved to 18s, finish to 20s.
        clock.set(18_200);
        timer.inner.on_tick();
        assert_eq!(timer.state(), TimerState::Warning);
        clock.set(20_100);
        timer.inner.on_tick();
        assert_eq!(timer.state(), TimerState::Running);

        assert_eq!(
            log.lock().unwrap().as_slice(),
            [
                "STOPPED->RUNNING",
                "RUNNING->COMPLETE",
                "COMPLETE->RUNNING",
                "RUNNING->WARNING",
                "WARNING->COMPLETE",
                "COMPLETE->RUNNING",
            ]
        );
        timer.stop();
    }

    #[test]
    fn completion_disarms_the_ticker() {
        let (timer, clock) = test_timer(10, 0, false);
        timer.start();
        assert!(lock(&timer.inner.ticker).is_some());
        clock.set(10_100);
        timer.inner.on_tick();
        assert!(lock(&timer.inner.ticker).is_none());
    }

    #[test]
    fn stop_resets_and_is_idempotent() {
        let (timer, clock) = test_timer(10, 8, false);
        let log = record_transitions(&timer);
        timer.start();
        clock.set(3_000);
        timer.inner.on_tick();
        assert!((timer.progress() - 0.3).abs() < 1e-9);

        timer.stop();
        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.progress(), 0.0);
        assert_eq!(timer.remaining_ms(), 10_000);
        assert!(lock(&timer.inner.ticker).is_none());

        let events_after_stop = log.lock().unwrap().len();
        timer.stop();
        assert_eq!(log.lock().unwrap().len(), events_after_stop);
    }

    #[test]
    fn start_is_idempotent_while_counting_down() {
        let (timer, clock) = test_timer(10, 8, false);
        let log = record_transitions(&timer);
        timer.start();
        clock.set(5_000);
        timer.start(); // must not re-arm deadlines
        clock.set(10_100);
        timer.inner.on_tick();
        assert_eq!(timer.state(), TimerState::Complete);
        assert_eq!(
            log.lock().unwrap().as_slice(),
            ["STOPPED->RUNNING", "RUNNING->COMPLETE"]
        );
    }

    #[test]
    fn restart_after_completion_rearms_from_now() {
        let (timer, clock) = test_timer(10, 0, false);
        timer.start();
        clock.set(10_100);
        timer.inner.on_tick();
        assert_eq!(timer.state(), TimerState::Complete);

        clock.set(20_000);
        timer.start();
        assert_eq!(timer.state(), TimerState::Running);
        assert_eq!(timer.remaining_ms(), 10_000);
        clock.set(30_100);
        timer.inner.on_tick();
        assert_eq!(timer.state(), TimerState::Complete);
    }

    #[test]
    fn zero_interval_refuses_to_start() {
        let (timer, _clock) = test_timer(0, 0, false);
        let log = record_transitions(&timer);
        timer.start();
        assert_eq!(timer.state(), TimerState::Stopped);
        assert!(lock(&timer.inner.ticker).is_none());
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn configuration_requires_quiescence() {
        let (timer, _clock) = test_timer(10, 8, false);
        timer.start();
        let err = timer.set_interval_secs(5).unwrap_err();
        assert!(matches!(err, CoreError::Precondition(_)));
        assert_eq!(timer.interval_secs(), 10);

        timer.stop();
        timer.set_interval_secs(5).unwrap();
        assert_eq!(timer.interval_secs(), 5);

        // A parked timer may be retuned; the change waits for the next start.
        timer.standby();
        timer.set_name("later").unwrap();
        assert_eq!(timer.name(), "later");
        assert_eq!(timer.state(), TimerState::Waiting);
    }

    #[test]
    fn standby_only_from_stopped_or_complete() {
        let (timer, clock) = test_timer(10, 0, false);
        timer.standby();
        assert_eq!(timer.state(), TimerState::Waiting);

        // A waiting timer starts normally when the group triggers.
        timer.start();
        assert_eq!(timer.state(), TimerState::Running);
        timer.standby(); // ignored while running
        assert_eq!(timer.state(), TimerState::Running);

        clock.set(10_100);
        timer.inner.on_tick();
        assert_eq!(timer.state(), TimerState::Complete);
        timer.standby();
        assert_eq!(timer.state(), TimerState::Waiting);
    }

    #[test]
    fn apply_copies_the_whole_record() {
        let (timer, _clock) = test_timer(10, 8, false);
        let kinds = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&kinds);
        timer.subscribe(move |event| {
            let kind = match event {
                TimerEvent::NameChanged { .. } => "name",
                TimerEvent::IntervalChanged { from_secs, to_secs, .. } => {
                    assert_eq!((*from_secs, *to_secs), (10, 30));
                    "interval"
                }
                TimerEvent::WarnAfterChanged { .. } => "warn-after",
                TimerEvent::RepeatChanged { .. } => "repeat",
                _ => "other",
            };
            sink.lock().unwrap().push(kind);
        });

        let settings = TimerSettings {
            name: "kettle".into(),
            interval: 30,
            warn_after: 5,
            repeat: true,
        };
        timer.apply(&settings).unwrap();
        assert_eq!(timer.settings(), settings);
        assert_eq!(
            kinds.lock().unwrap().as_slice(),
            ["name", "interval", "warn-after", "repeat"]
        );

        // Re-applying identical settings is silent.
        kinds.lock().unwrap().clear();
        timer.apply(&settings).unwrap();
        assert!(kinds.lock().unwrap().is_empty());
    }

    #[test]
    fn snapshot_is_read_consistent() {
        let (timer, clock) = test_timer(10, 8, false);
        timer.start();
        clock.set(3_000);
        timer.inner.on_tick();
        let snap = timer.snapshot();
        assert_eq!(snap.state, TimerState::Running);
        assert_eq!(snap.remaining_ms, 7_000);
        assert!((snap.progress - 0.3).abs() < 1e-9);
        assert_eq!(snap.interval, 10);
    }

    #[test]
    fn clones_are_the_same_timer() {
        let (timer, _clock) = test_timer(10, 0, false);
        let other = timer.clone();
        assert_eq!(timer, other);
        let (unrelated, _c) = test_timer(10, 0, false);
        assert_ne!(timer, unrelated);
        let rendered = format!("{timer:?}");
        assert!(rendered.contains("\"test\""));
        assert!(rendered.contains("Stopped"));
    }
}
