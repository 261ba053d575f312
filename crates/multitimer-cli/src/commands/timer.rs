use std::path::Path;

use clap::Subcommand;
use multitimer_core::TimerSettings;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Add a timer to the document
    Add {
        /// Display name (defaults to "Timer N")
        #[arg(long)]
        name: Option<String>,
        /// Countdown length, seconds or ISO-8601 (e.g. "600" or "PT10M")
        #[arg(long, default_value = "PT10S")]
        interval: String,
        /// Elapsed time at which the timer turns amber, same formats
        #[arg(long, default_value = "PT8S")]
        warn_after: String,
        /// Restart automatically on completion
        #[arg(long)]
        repeat: bool,
    },
    /// List timers with their positions
    List,
    /// Remove the timer at a position reported by `list`
    Remove {
        /// Zero-based timer position
        index: usize,
    },
}

pub fn run(action: TimerAction, file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let path = super::resolve_document(file)?;
    let mut document = super::load_or_default(&path)?;

    match action {
        TimerAction::Add {
            name,
            interval,
            warn_after,
            repeat,
        } => {
            let interval = super::parse_duration_arg(&interval)?;
            let warn_after = super::parse_duration_arg(&warn_after)?;
            let name = name.unwrap_or_else(|| format!("Timer {}", document.timers.len() + 1));
            document.timers.push(TimerSettings {
                name: name.clone(),
                interval,
                warn_after,
                repeat,
            });
            document.save(&path)?;
            println!("added {name} ({})", super::iso(interval));
        }
        TimerAction::List => {
            if document.timers.is_empty() {
                println!("no timers in {}", path.display());
                return Ok(());
            }
            for (index, timer) in document.timers.iter().enumerate() {
                println!(
                    "{index}: {} interval={} warn-after={} repeat={}",
                    timer.name,
                    super::iso(timer.interval),
                    super::iso(timer.warn_after),
                    if timer.repeat { "yes" } else { "no" },
                );
            }
        }
        TimerAction::Remove { index } => {
            if index >= document.timers.len() {
                return Err(format!(
                    "no timer at position {index} ({} in document)",
                    document.timers.len()
                )
                .into());
            }
            let removed = document.timers.remove(index);
            document.save(&path)?;
            println!("removed {}", removed.name);
        }
    }

    Ok(())
}
