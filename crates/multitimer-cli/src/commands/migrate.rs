use std::path::Path;

use multitimer_core::{TimerDocument, FORMAT_VERSION};

pub fn run(file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let path = super::resolve_document(file)?;
    let mut document = TimerDocument::load(&path)?;
    if document.migrate() {
        document.save(&path)?;
        println!("migrated {} to format {FORMAT_VERSION}", path.display());
    } else {
        println!("{} already at format {FORMAT_VERSION}", path.display());
    }
    Ok(())
}
