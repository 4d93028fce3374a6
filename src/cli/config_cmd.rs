use anyhow::Result;

use crate::core::config::AppConfig;

pub fn init() -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() {
        eprintln!("Config file already exists at {}", path.display());
        eprintln!("Remove it first if you want to regenerate.");
        return Ok(());
    }

    match AppConfig::default().save() {
        Ok(path) => {
            println!("Generated config at {}", path.display());
            println!("  Set notify.webhook_url (or COSTWATCH_WEBHOOK_URL) to receive reports.");
        }
        Err(e) => {
            eprintln!("Failed to generate config: {:#}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

pub fn check() -> Result<()> {
    let path = AppConfig::config_path();
    if !path.exists() {
        println!("No config file at {} (defaults in use)", path.display());
        return Ok(());
    }

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let issues = config.validate();
    if issues.is_empty() {
        println!("Config OK: {}", path.display());
        return Ok(());
    }

    eprintln!("Config issues in {}:", path.display());
    for issue in &issues {
        eprintln!("  - {}", issue);
    }
    std::process::exit(1);
}

pub fn path() -> Result<()> {
    let config = AppConfig::load().unwrap_or_default();
    println!("config   {}", AppConfig::config_path().display());
    println!("history  {}", config.history_path().display());
    Ok(())
}
