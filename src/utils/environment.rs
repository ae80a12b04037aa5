use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Environment variable naming the repository to browse
pub const REPO_ENV_VAR: &str = "COMMIT_BROWSER_REPO";

/// Resolve the repository directory: explicit path, then `COMMIT_BROWSER_REPO`,
/// then the current directory
pub fn get_repo_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    match env::var_os(REPO_ENV_VAR) {
        Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
        _ => env::current_dir().context("Failed to determine current directory"),
    }
}
