use clap::Subcommand;

use crate::config::CliConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a preference value
    Get {
        /// Preference key ("default-file" or "poll-interval-ms")
        key: String,
    },
    /// Set a preference value
    Set {
        /// Preference key
        key: String,
        /// New value
        value: String,
    },
    /// List all preferences
    List,
    /// Reset preferences to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = CliConfig::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = CliConfig::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = CliConfig::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            let config = CliConfig::default();
            config.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
