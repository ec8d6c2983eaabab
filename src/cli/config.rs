use std::path::Path;

use anyhow::{bail, Result};
use tally::settings::{save_settings, settings_path};
use tally::Settings;

use super::resolve_settings;

pub fn run(config: Option<&Path>, init: bool) -> Result<()> {
    let path = config.map(Path::to_path_buf).unwrap_or_else(settings_path);

    if init {
        if path.exists() {
            bail!("{} already exists", path.display());
        }
        save_settings(&Settings::default(), &path)?;
        println!("Wrote default settings to {}", path.display());
        return Ok(());
    }

    let settings = resolve_settings(config)?;
    let source = if path.exists() {
        path.display().to_string()
    } else {
        "built-in defaults".to_string()
    };
    println!("# {source}");
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
