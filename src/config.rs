use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::prompt::DEFAULT_PAGE_SIZE;

/// Runtime settings, read from the environment (and `.env`, once loaded).
///
/// | Variable              | Default              |
/// |-----------------------|----------------------|
/// | `BIKESHARE_DATA_DIR`  | `data`               |
/// | `BIKESHARE_PAGE_SIZE` | `5`                  |
/// | `LOG_FILE_PATH`       | `logs/bikeshare.log` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub page_size: usize,
    pub log_file_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            page_size: DEFAULT_PAGE_SIZE,
            log_file_path: PathBuf::from("logs/bikeshare.log"),
        }
    }
}

impl Config {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `BIKESHARE_PAGE_SIZE` is not a positive integer.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(dir) = lookup("BIKESHARE_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(size) = lookup("BIKESHARE_PAGE_SIZE") {
            let size: usize = size
                .trim()
                .parse()
                .with_context(|| format!("BIKESHARE_PAGE_SIZE '{size}' is not a number"))?;
            anyhow::ensure!(size > 0, "BIKESHARE_PAGE_SIZE must be positive");
            config.page_size = size;
        }
        if let Some(path) = lookup("LOG_FILE_PATH") {
            config.log_file_path = PathBuf::from(path);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.page_size, 5);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("BIKESHARE_DATA_DIR", "/srv/bikeshare"),
            ("BIKESHARE_PAGE_SIZE", "10"),
            ("LOG_FILE_PATH", "/tmp/b.log"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/bikeshare"));
        assert_eq!(config.page_size, 10);
        assert_eq!(config.log_file_path, PathBuf::from("/tmp/b.log"));
    }

    #[test]
    fn test_bad_page_size() {
        assert!(Config::from_lookup(lookup(&[("BIKESHARE_PAGE_SIZE", "lots")])).is_err());
        assert!(Config::from_lookup(lookup(&[("BIKESHARE_PAGE_SIZE", "0")])).is_err());
    }
}
