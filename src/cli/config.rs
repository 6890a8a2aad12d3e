use std::path::PathBuf;

use crate::error::{RedflagError, Result};
use crate::settings::{load_settings, save_settings, settings_path, Settings};

pub fn show(config: Option<String>) -> Result<()> {
    let settings = load_settings(config.as_deref().map(std::path::Path::new))?;
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

pub fn init(config: Option<String>, force: bool) -> Result<()> {
    let path = config.map(PathBuf::from).unwrap_or_else(settings_path);
    if path.exists() && !force {
        return Err(RedflagError::Settings(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    save_settings(&Settings::default(), &path)?;
    println!("Wrote default settings to {}", path.display());
    Ok(())
}
