use std::path::Path;

use anyhow::Result;

use glissade_core::AppConfig;

pub fn run(config: &AppConfig, path: Option<&Path>, save: bool) -> Result<()> {
    let shown = path.map(Path::to_path_buf).unwrap_or_else(AppConfig::config_path);

    if save {
        match path {
            Some(path) => config.save_to(path)?,
            None => config.save()?,
        }
        println!("Configuration written to {}", shown.display());
        return Ok(());
    }

    println!("# {}", shown.display());
    print!("{}", config.to_toml()?);
    Ok(())
}
