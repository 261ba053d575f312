//! Ordered timer collections with an aggregate state and a delayed,
//! clock-aligned start.
//!
//! A group reports `Running` while any member counts down and `Waiting`
//! while a delayed start is armed. The delayed start fires at the next
//! wall-clock instant whose minute-of-hour matches the configured offset;
//! a start exactly on the offset fires immediately.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local, Timelike, Utc};
use tracing::{debug, info};

use crate::context::Context;
use crate::dispatch::lock;
use crate::error::{ConfigurationError, PreconditionError, Result};
use crate::events::{GroupEvent, Observers, SubscriptionId, TimerEvent};
use crate::scheduler::TaskHandle;
use crate::state::TimerState;
use crate::timer::Timer;

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// An ordered collection of timers started and stopped together.
#[derive(Clone)]
pub struct TimerGroup {
    inner: Arc<GroupInner>,
}

struct GroupInner {
    ctx: Context,
    /// Same role as the timer's publish lock: one mutation's notifications
    /// finish before the next mutation publishes. Never held while calling
    /// into a member.
    publish: Mutex<()>,
    core: Mutex<GroupCore>,
    observers: Observers<GroupEvent>,
}

struct GroupCore {
    delay_start: bool,
    minutes_offset: u8,
    state: TimerState,
    members: Vec<Member>,
    /// True from arming until the trigger fires or `stop` cancels it.
    armed: bool,
    arm: Option<TaskHandle>,
}

struct Member {
    timer: Timer,
    subscription: SubscriptionId,
}

impl TimerGroup {
    pub fn new(ctx: &Context) -> Self {
        Self {
            inner: Arc::new(GroupInner {
                ctx: ctx.clone(),
                publish: Mutex::new(()),
                core: Mutex::new(GroupCore {
                    delay_start: false,
                    minutes_offset: 0,
                    state: TimerState::Stopped,
                    members: Vec::new(),
                    armed: false,
                    arm: None,
                }),
                observers: Observers::new(),
            }),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        lock(&self.inner.core).state
    }

    pub fn delay_start(&self) -> bool {
        lock(&self.inner.core).delay_start
    }

    pub fn minutes_offset(&self) -> u8 {
        lock(&self.inner.core).minutes_offset
    }

    /// Members in insertion order.
    pub fn timers(&self) -> Vec<Timer> {
        lock(&self.inner.core)
            .members
            .iter()
            .map(|member| member.timer.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.inner.core).members.len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.inner.core).members.is_empty()
    }

    // ── Configuration ────────────────────────────────────────────────

    pub fn set_delay_start(&self, delay_start: bool) -> Result<()> {
        let _publish = lock(&self.inner.publish);
        let mut events = Vec::new();
        {
            let mut core = lock(&self.inner.core);
            core.check_quiescent()?;
            if core.delay_start != delay_start {
                events.push(GroupEvent::DelayStartChanged {
                    from: core.delay_start,
                    to: delay_start,
                    at: Utc::now(),
                });
                core.delay_start = delay_start;
            }
        }
        self.inner.deliver(events);
        Ok(())
    }

    pub fn set_minutes_offset(&self, minutes_offset: u8) -> Result<()> {
        if minutes_offset > 59 {
            return Err(ConfigurationError::MinutesOffsetOutOfRange {
                value: minutes_offset,
            }
            .into());
        }
        let _publish = lock(&self.inner.publish);
        let mut events = Vec::new();
        {
            let mut core = lock(&self.inner.core);
            core.check_quiescent()?;
            if core.minutes_offset != minutes_offset {
                events.push(GroupEvent::MinutesOffsetChanged {
                    from: core.minutes_offset,
                    to: minutes_offset,
                    at: Utc::now(),
                });
                core.minutes_offset = minutes_offset;
            }
        }
        self.inner.deliver(events);
        Ok(())
    }

    // ── Membership ───────────────────────────────────────────────────

    /// Append a timer. The group tracks its state changes from here on.
    pub fn add(&self, timer: &Timer) -> Result<()> {
        let _publish = lock(&self.inner.publish);
        let mut events = Vec::new();
        {
            let mut core = lock(&self.inner.core);
            if core.members.iter().any(|member| member.timer == *timer) {
                return Err(ConfigurationError::DuplicateMember { name: timer.name() }.into());
            }
            let weak = Arc::downgrade(&self.inner);
            let subscription = timer.subscribe(move |event| {
                if let TimerEvent::StateChanged { .. } = event {
                    if let Some(group) = weak.upgrade() {
                        group.recompute_aggregate();
                    }
                }
            });
            core.members.push(Member {
                timer: timer.clone(),
                subscription,
            });
            events.push(GroupEvent::TimerAdded {
                name: timer.name(),
                index: core.members.len() - 1,
                at: Utc::now(),
            });
        }
        self.inner.deliver(events);
        Ok(())
    }

    /// Remove a member: it is stopped and the group stops observing it.
    /// Removing a non-member is a no-op.
    pub fn remove(&self, timer: &Timer) {
        let removed = {
            let _publish = lock(&self.inner.publish);
            let mut events = Vec::new();
            let removed = {
                let mut core = lock(&self.inner.core);
                core.members
                    .iter()
                    .position(|member| member.timer == *timer)
                    .map(|index| {
                        let member = core.members.remove(index);
                        events.push(GroupEvent::TimerRemoved {
                            name: member.timer.name(),
                            at: Utc::now(),
                        });
                        member
                    })
            };
            self.inner.deliver(events);
            removed
        };
        if let Some(member) = removed {
            member.timer.stop();
            member.timer.unsubscribe(member.subscription);
            self.inner.recompute_aggregate();
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the group. With `delay_start` off every member starts now;
    /// with it on, members stand by and a one-shot trigger is armed for the
    /// next minute-of-hour match. No-op while a trigger is already armed.
    pub fn start(&self) {
        let (delayed, members) = {
            let _publish = lock(&self.inner.publish);
            let core = lock(&self.inner.core);
            if core.armed {
                debug!("group start ignored; delayed start already armed");
                return;
            }
            (core.delay_start, core.member_timers())
        };
        if delayed {
            self.arm_delayed_start(members);
        } else {
            for timer in &members {
                timer.start();
            }
        }
    }

    /// Cancel any armed trigger, then stop every member.
    pub fn stop(&self) {
        let members = {
            let _publish = lock(&self.inner.publish);
            let mut core = lock(&self.inner.core);
            core.armed = false;
            if let Some(handle) = core.arm.take() {
                handle.cancel();
            }
            core.member_timers()
        };
        for timer in &members {
            timer.stop();
        }
        self.inner.recompute_aggregate();
    }

    /// Single-flag control surface: `true` starts, `false` stops.
    pub fn run(&self, start: bool) {
        if start {
            self.start();
        } else {
            self.stop();
        }
    }

    // ── Observers ────────────────────────────────────────────────────

    pub fn subscribe(
        &self,
        observer: impl Fn(&GroupEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.inner.observers.subscribe(Arc::new(observer))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.observers.unsubscribe(id)
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Members first, group last: every member reports `Waiting` before the
    /// group does.
    fn arm_delayed_start(&self, members: Vec<Timer>) {
        let (offset, delay_ms) = {
            let core = lock(&self.inner.core);
            let offset = core.minutes_offset;
            (offset, delay_until_minute_offset(self.inner.ctx.clock.now_local(), offset))
        };
        debug!(delay_ms, offset, "arming delayed start");

        for timer in &members {
            timer.standby();
        }
        {
            let _publish = lock(&self.inner.publish);
            let mut events = Vec::new();
            {
                let mut core = lock(&self.inner.core);
                core.armed = true;
                core.transition(TimerState::Waiting, &mut events);
            }
            self.inner.deliver(events);
        }

        let weak = Arc::downgrade(&self.inner);
        let handle = self
            .inner
            .ctx
            .scheduler
            .schedule_once(Duration::from_millis(delay_ms), move || {
                if let Some(group) = weak.upgrade() {
                    group.fire_delayed_start();
                }
            });
        let mut core = lock(&self.inner.core);
        if core.armed {
            core.arm = Some(handle);
        } else {
            // stop() or the trigger itself won the race while we were
            // scheduling; the handle is already dead.
            handle.cancel();
        }
    }
}

impl GroupInner {
    /// Trigger body for the delayed start: start whoever is a member right
    /// now. A canceled arm makes this a no-op.
    fn fire_delayed_start(&self) {
        let members = {
            let _publish = lock(&self.publish);
            let mut core = lock(&self.core);
            if !core.armed {
                return;
            }
            core.armed = false;
            core.arm = None;
            core.member_timers()
        };
        info!(count = members.len(), "delayed start firing");
        for timer in &members {
            timer.start();
        }
        self.recompute_aggregate();
    }

    /// Aggregate state: `Running` if any member counts down, `Waiting`
    /// while armed, else `Stopped`. Runs on every member state change and
    /// explicitly after stop, trigger and removal.
    fn recompute_aggregate(&self) {
        let _publish = lock(&self.publish);
        let mut events = Vec::new();
        {
            let mut core = lock(&self.core);
            let any_running = core
                .members
                .iter()
                .any(|member| member.timer.state().is_running());
            let next = if any_running {
                TimerState::Running
            } else if core.armed {
                TimerState::Waiting
            } else {
                TimerState::Stopped
            };
            core.transition(next, &mut events);
        }
        self.deliver(events);
    }

    fn deliver(&self, events: Vec<GroupEvent>) {
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

impl Drop for GroupInner {
    fn drop(&mut self) {
        let handle = match self.core.get_mut() {
            Ok(core) => core.arm.take(),
            Err(poisoned) => poisoned.into_inner().arm.take(),
        };
        if let Some(handle) = handle {
            handle.cancel();
        }
    }
}

impl GroupCore {
    fn member_timers(&self) -> Vec<Timer> {
        self.members.iter().map(|member| member.timer.clone()).collect()
    }

    fn check_quiescent(&self) -> Result<()> {
        if self.state.is_quiescent() {
            Ok(())
        } else {
            Err(PreconditionError::GroupNotQuiescent { state: self.state }.into())
        }
    }

    fn transition(&mut self, to: TimerState, events: &mut Vec<GroupEvent>) {
        if self.state != to {
            events.push(GroupEvent::StateChanged {
                from: self.state,
                to,
                at: Utc::now(),
            });
            self.state = to;
        }
    }
}

/// Milliseconds until the next wall-clock instant whose minute-of-hour
/// equals `minutes_offset`. Zero when the offset is exactly now; only a
/// past offset rolls a full hour ahead.
pub fn delay_until_minute_offset(now: DateTime<Local>, minutes_offset: u8) -> u64 {
    let past_hour_ms = (i64::from(now.minute()) * 60 + i64::from(now.second())) * 1_000
        + i64::from(now.timestamp_subsec_millis());
    let mut delta = i64::from(minutes_offset) * 60_000 - past_hour_ms;
    if delta < 0 {
        delta += MILLIS_PER_HOUR;
    }
    delta as u64
}
