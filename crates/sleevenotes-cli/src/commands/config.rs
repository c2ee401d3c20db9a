use anyhow::Result;

use sleevenotes_enrich::config::{config_file_path, ensure_config_file};

pub fn show_config() -> Result<()> {
    let created = ensure_config_file()?;
    let path = config_file_path();

    if created {
        println!("Created config template at {}", path.display());
        println!("Fill in your Spotify and Genius client credentials.");
    } else {
        println!("Config file: {}", path.display());
    }

    Ok(())
}
