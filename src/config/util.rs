//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/app/src/assets/  ← cwd
/// /home/user/app/ruta.toml    ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;

    // First check if config_name is an absolute path or exists in cwd
    if config_name.is_absolute() && config_name.exists() {
        return Some(config_name.to_path_buf());
    }

    // Walk up from cwd looking for config file
    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_existing_path_returned_as_is() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = dir.path().join("ruta.toml");
        std::fs::write(&config, "").unwrap();
        assert_eq!(find_config_file(&config), Some(config));
    }

    #[test]
    fn test_missing_config_returns_none() {
        assert_eq!(
            find_config_file(Path::new("/nonexistent/dir/ruta.toml")),
            None
        );
    }
}
