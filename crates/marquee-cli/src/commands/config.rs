use anyhow::Result;

use marquee_core::AppConfig;

pub fn run(config: &AppConfig, init: bool) -> Result<()> {
    let path = AppConfig::config_path();

    if !init {
        println!("Config file: {}", path.display());
        if !path.exists() {
            println!("  (not created yet, defaults in use; run `marquee config --init`)");
        }
        println!("Log file: {}", config.log_file().display());
        return Ok(());
    }

    if path.exists() {
        println!("Config file already exists: {}", path.display());
        return Ok(());
    }

    AppConfig::default().save()?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
