use std::path::Path;

use anyhow::{bail, Result};

use sweeper_core::AppConfig;

/// Print the effective configuration
pub fn show(config: &AppConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Write the default configuration
pub fn init(path: Option<&Path>, force: bool) -> Result<()> {
    let target = AppConfig::resolve_path(path);
    if target.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            target.display()
        );
    }

    let written = AppConfig::default().save(Some(&target))?;
    println!("Wrote default configuration to {}", written.display());
    Ok(())
}
