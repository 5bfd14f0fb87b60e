use anyhow::Result;

use scrollease_core::AppConfig;

pub fn run(config: &AppConfig) -> Result<()> {
    println!("# {}", AppConfig::config_path().display());
    println!("{}", config.to_toml()?);
    Ok(())
}
