use std::path::Path;

use clap::Subcommand;
use multitimer_core::{ConfigurationError, CoreError};

#[derive(Subcommand)]
pub enum GroupAction {
    /// Change how the whole document starts
    Set {
        /// Hold every timer until a clock-aligned trigger ("true"/"false")
        #[arg(long)]
        delay_start: Option<bool>,
        /// Minute of the hour the trigger fires at (0-59)
        #[arg(long)]
        minutes_offset: Option<u8>,
    },
}

pub fn run(action: GroupAction, file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let path = super::resolve_document(file)?;
    let mut document = super::load_or_default(&path)?;

    match action {
        GroupAction::Set {
            delay_start,
            minutes_offset,
        } => {
            if delay_start.is_none() && minutes_offset.is_none() {
                return Err("nothing to set; pass --delay-start or --minutes-offset".into());
            }
            if let Some(delay_start) = delay_start {
                document.delay_start = delay_start;
            }
            if let Some(offset) = minutes_offset {
                if offset > 59 {
                    return Err(CoreError::from(ConfigurationError::MinutesOffsetOutOfRange {
                        value: offset,
                    })
                    .into());
                }
                document.minutes_offset = offset;
            }
            document.save(&path)?;
            println!(
                "delay-start={} minutes-offset={}",
                document.delay_start, document.minutes_offset
            );
        }
    }

    Ok(())
}
