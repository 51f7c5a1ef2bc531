//! Configuration view and validation commands — `pms config`.

use anyhow::Result;

use pms::config::{PmsConfig, PmsToml};

use super::load_config;
use crate::{Cli, ConfigCommands};

fn print_api_section(toml: &PmsToml) {
    println!("[api]");
    println!("  base_url = \"{}\"", toml.api.base_url);
    println!("  timeout_secs = {}", toml.api.timeout_secs);
    println!("  user_agent = \"{}\"", toml.api.user_agent);
    println!();
}

pub fn cmd_config(cli: &Cli, command: Option<ConfigCommands>) -> Result<()> {
    let config = load_config(cli)?;
    let config_path = config.config_file();

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("pms Configuration");
            println!("=================");
            println!();

            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No pms.toml found at {}", config_path.display());
                println!("Using default configuration:");
            }
            println!();
            print_api_section(&config.toml);

            println!("Effective values (with env/CLI overrides):");
            print_effective(&config);
            println!();
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !config_path.exists() && config.cli_api_url.is_none() {
                println!("No pms.toml found. Using defaults (valid).");
                return Ok(());
            }

            let warnings = config.validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("pms.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            config.ensure_state_dir()?;
            PmsToml::default().save(&config_path)?;

            println!("Created pms.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [api] base_url, timeout_secs, user_agent");
            println!();
        }
    }

    Ok(())
}

fn print_effective(config: &PmsConfig) {
    println!("  api_url = \"{}\"", config.api_url());
    println!("  timeout = {}s", config.timeout().as_secs());
    println!("  state_dir = \"{}\"", config.state_dir.display());
}
