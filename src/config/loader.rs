//! Configuration loading and discovery for `gridpaint.toml`

use super::schema::GridpaintConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file searched for
pub const CONFIG_FILE: &str = "gridpaint.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse gridpaint.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// A loaded configuration and the directory its relative paths resolve from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: GridpaintConfig,
    /// Directory of the config file, or the working directory when none was found
    pub root: PathBuf,
    /// The file that was read, if any
    pub source: Option<PathBuf>,
}

/// Find gridpaint.toml.
///
/// Search order:
/// 1. Walk up from the current directory
/// 2. `$XDG_CONFIG_HOME/gridpaint/gridpaint.toml` (or `~/.config/gridpaint/gridpaint.toml`)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find gridpaint.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("gridpaint").join(CONFIG_FILE);
    config_path.exists().then_some(config_path)
}

/// Find gridpaint.toml by walking up from `start`.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, the discovered file is used,
/// and defaults apply when nothing is found.
pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            let config = load_config_file(&p)?;
            tracing::debug!(path = %p.display(), "loaded config");
            let root = project_root(&p).map(Path::to_path_buf).unwrap_or_default();
            Ok(LoadedConfig { config, root, source: Some(p) })
        }
        None => {
            tracing::debug!("no gridpaint.toml found, using defaults");
            let root = env::current_dir().unwrap_or_default();
            Ok(LoadedConfig { config: GridpaintConfig::default(), root, source: None })
        }
    }
}

/// Load and validate a specific config file.
pub fn load_config_file(path: &Path) -> Result<GridpaintConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: GridpaintConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Directory containing a config file.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILE);
        fs::write(&path, contents).expect("should write config file");
        path
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[defaults]\nscale = 2\n");

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "");

        let subdir = temp.path().join("levels").join("act1");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        assert_eq!(find_config_from(subdir), Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let temp = TempDir::new().expect("should create temp dir");
        assert_eq!(find_config_from(temp.path().to_path_buf()), None);
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(
            temp.path(),
            r#"
[defaults]
scale = 3

[registry]
file = "registry.json"
"#,
        );

        let loaded = load_config(Some(&config_path)).expect("should load valid config");
        assert_eq!(loaded.config.defaults.scale, 3);
        assert_eq!(loaded.config.defaults.columns, 4);
        assert_eq!(loaded.root, temp.path());
        assert_eq!(loaded.source, Some(config_path));
    }

    #[test]
    fn test_load_config_missing_explicit_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let result = load_config(Some(&temp.path().join("nonexistent.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "this is not valid toml {{{");

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[defaults]\nscale = 0\ncolumns = 0\n");

        match load_config(Some(&config_path)) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_message_lists_fields() {
        let err = ConfigError::Validation(vec!["first".into(), "second".into()]);
        assert_eq!(err.to_string(), "Config validation failed:\n  - first\n  - second");
    }

    #[test]
    fn test_project_root() {
        let config_path = Path::new("/project/gridpaint.toml");
        assert_eq!(project_root(config_path), Some(Path::new("/project")));
    }
}
