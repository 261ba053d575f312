//! # Multitimer Core Library
//!
//! Core business logic for Multitimer, a coordinator for multiple countdown
//! timers. Everything lives behind a plain library API so front-ends stay
//! thin: the bundled CLI and any GUI embedder drive the same types.
//!
//! ## Architecture
//!
//! - **Timers** are wall-clock state machines ticked every 100 ms by a
//!   shared scheduler; deadlines are absolute, so a late tick lands on the
//!   right state instead of drifting
//! - **Groups** start and stop their members together and can defer the
//!   start to the next minute-of-hour alignment
//! - **Observers** get old-and-new-value events; delivery is routed through
//!   a pluggable dispatcher so an embedder can marshal onto a UI thread
//! - **Storage** persists timer configuration as versioned JSON documents
//!
//! ## Key Components
//!
//! - [`Timer`]: single countdown with warning phase and optional repeat
//! - [`TimerGroup`]: ordered members, aggregate state, delayed start
//! - [`Scheduler`]: fixed-rate and one-shot tasks with panic isolation
//! - [`DurationValue`]: hours/minutes/seconds, total seconds and ISO-8601
//!   text kept mutually consistent
//! - [`TimerDocument`]: on-disk configuration with format versioning

pub mod clock;
pub mod context;
pub mod dispatch;
pub mod duration;
pub mod error;
pub mod events;
pub mod group;
pub mod scheduler;
pub mod state;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use context::Context;
pub use dispatch::{Dispatcher, InlineDispatcher, Job};
pub use duration::{DurationChange, DurationValue};
pub use error::{ConfigurationError, CoreError, PreconditionError, Result, StorageError};
pub use events::{GroupEvent, SubscriptionId, TimerEvent};
pub use group::{delay_until_minute_offset, TimerGroup};
pub use scheduler::{Scheduler, TaskHandle};
pub use state::TimerState;
pub use storage::{TimerDocument, FILE_EXTENSION, FORMAT_VERSION};
pub use timer::{Timer, TimerSettings, TimerSnapshot, DEFAULT_NAME, TICK_PERIOD};
