use crate::conf::{ConfigError, parse_config};
use anyhow::{Context, Result, bail};
use rust_embed::RustEmbed;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(RustEmbed)]
#[folder = "config-templates/"]
pub struct ConfigTemplates;

const ENTRYPOINT_TEMPLATE: &str = "arcwatch.hcl";

pub fn init(path: PathBuf) -> Result<()> {
    // Refuse to overwrite anything
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    let contents = template(ENTRYPOINT_TEMPLATE)?;

    // The template must always be loadable as shipped.
    parse_config(&contents, Path::new(ENTRYPOINT_TEMPLATE))
        .context("embedded config template is invalid")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ConfigError::write_file(parent, e))?;
    }
    fs::write(&path, contents.trim_start()).map_err(|e| ConfigError::write_file(&path, e))?;

    // User feedback
    println!("✔ Initialized arcwatch config at {}", path.display());
    println!();
    println!("Next steps:");
    println!("  set geoip.city_db to a GeoLite2-City database");
    println!("  arcwatch config check {}", path.display());
    println!("  arcwatch run --config {}", path.display());

    Ok(())
}

/// Fetch an embedded config template as UTF-8 text
pub fn template(path: &str) -> Result<String> {
    let file = ConfigTemplates::get(path)
        .with_context(|| format!("missing embedded config template: {path}"))?;

    let s =
        std::str::from_utf8(file.data.as_ref()).context("config template is not valid UTF-8")?;

    Ok(s.to_owned())
}
