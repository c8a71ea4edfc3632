use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

pub const DATA_DIR: &str = ".teachstack";
pub const DATA_FILE: &str = "roster.json";

/// Resolve the roster file path.
///
/// Priority:
/// 1. `--data` flag / `TEACHSTACK_DATA` env var (passed in as `explicit`)
/// 2. `~/.teachstack/roster.json`
pub fn resolve_data_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    let Some(home) = home::home_dir() else {
        bail!("home directory not found: set HOME or pass --data");
    };
    Ok(home.join(DATA_DIR).join(DATA_FILE))
}
