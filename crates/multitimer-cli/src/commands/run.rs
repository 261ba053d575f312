use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use clap::Args;
use tracing::warn;

use multitimer_core::{
    delay_until_minute_offset, Context, GroupEvent, Scheduler, TimerDocument, TimerEvent,
};

use crate::config::CliConfig;

#[derive(Args)]
pub struct RunArgs {
    /// Override the configured poll cadence, in milliseconds
    #[arg(long)]
    pub poll_ms: Option<u64>,
    /// Start immediately even if the document asks for a delayed start
    #[arg(long)]
    pub immediate: bool,
}

/// Run every timer in the document and block until all of them are done.
/// Repeating timers keep the run alive until it is interrupted.
pub fn run(args: RunArgs, file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::load()?;
    let path = config.document_path(file)?;
    let mut document = TimerDocument::load(&path)?;
    if document.is_outdated() {
        warn!(
            path = %path.display(),
            "document uses an old format; run `multitimer migrate` to upgrade the file"
        );
        document.migrate();
    }
    if args.immediate {
        document.delay_start = false;
    }
    if document.timers.is_empty() {
        println!("no timers in {}", path.display());
        return Ok(());
    }

    let ctx = Context::new(Arc::new(Scheduler::new()?));
    let group = document.build_group(&ctx)?;

    let timers = group.timers();
    let mut last_shown = Vec::with_capacity(timers.len());
    for timer in &timers {
        let name = timer.name();
        let remaining = super::format_hms(timer.remaining_ms());
        println!("{name}: {remaining}");
        last_shown.push(remaining);
        timer.subscribe(move |event| {
            if let TimerEvent::StateChanged { to, .. } = event {
                println!("[{name}] {to}");
            }
        });
    }
    group.subscribe(|event| {
        if let GroupEvent::StateChanged { to, .. } = event {
            println!("[group] {to}");
        }
    });

    if document.delay_start {
        let wait_ms = delay_until_minute_offset(Local::now(), document.minutes_offset);
        let fire_at = Local::now() + chrono::Duration::milliseconds(wait_ms as i64);
        println!(
            "waiting for minute :{:02} ({})",
            document.minutes_offset,
            fire_at.format("%H:%M:%S")
        );
    }

    group.start();

    let poll = Duration::from_millis(args.poll_ms.unwrap_or(config.poll_interval_ms).max(50));
    loop {
        std::thread::sleep(poll);
        for (timer, shown) in timers.iter().zip(last_shown.iter_mut()) {
            if timer.state().is_running() {
                let remaining = super::format_hms(timer.remaining_ms());
                if *shown != remaining {
                    println!("{}: {remaining}", timer.name());
                    *shown = remaining;
                }
            }
        }
        if !group.state().is_running_or_waiting()
            && timers.iter().all(|t| !t.state().is_running_or_waiting())
        {
            break;
        }
    }
    println!("all timers finished");

    Ok(())
}
