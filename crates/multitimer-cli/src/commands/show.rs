use std::path::Path;

use clap::Args;

#[derive(Args)]
pub struct ShowArgs {
    /// Emit the raw document as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ShowArgs, file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let path = super::resolve_document(file)?;
    let document = super::load_or_default(&path)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    println!(
        "document: {} (format {})",
        path.display(),
        document.format_version
    );
    println!("delay-start: {}", document.delay_start);
    println!("minutes-offset: {}", document.minutes_offset);
    if document.timers.is_empty() {
        println!("timers: none");
        return Ok(());
    }
    println!("timers:");
    for (index, timer) in document.timers.iter().enumerate() {
        let warn = if timer.warn_after > 0 {
            format!(" warn {}", super::format_hms(timer.warn_after.saturating_mul(1_000)))
        } else {
            String::new()
        };
        let repeat = if timer.repeat { " repeat" } else { "" };
        println!(
            "  {index}: {} {}{warn}{repeat}",
            timer.name,
            super::format_hms(timer.interval.saturating_mul(1_000)),
        );
    }

    Ok(())
}
