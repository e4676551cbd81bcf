use crate::conf::load_config;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn dump(path: PathBuf, json: bool) -> Result<()> {
    let cfg = load_config(&path)?;

    let rendered = if json {
        serde_json::to_string_pretty(&cfg).context("failed to render config as JSON")?
    } else {
        cfg.to_hcl().context("failed to render config as HCL")?
    };

    println!("{rendered}");
    Ok(())
}
