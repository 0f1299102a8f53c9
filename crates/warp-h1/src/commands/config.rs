use anyhow::Result;

use super::load_config;

pub fn show(config: Option<&str>) -> Result<()> {
    let config = load_config(config)?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}
