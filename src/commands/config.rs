//! Config command handler.

use sitewatch::config::SitewatchConfig;

/// Config command.
pub fn cmd_config(config: &SitewatchConfig, show: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !show {
        println!("Use 'sitewatch config --show' to display the effective configuration.");
        return Ok(());
    }

    println!("# Config files loaded:");
    if config.config_sources.is_empty() {
        println!("#   (none - using defaults)");
    } else {
        for source in &config.config_sources {
            println!("#   {}", source.display());
        }
    }
    println!();
    print!("{}", config.to_toml()?);

    Ok(())
}
