//! Configuration loader
//!
//! Loads ArchivesSpace connection settings from environment variables or
//! files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables (`.env` honored)
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports TOML and JSON formats
//!
//! ## Environment Variables
//! - `ASPACE_BACKEND_URL`: Backend API base URL (required)
//! - `ASPACE_USERNAME`: Login username (required)
//! - `ASPACE_PASSWORD`: Login password
//! - `ASPACE_FRONTEND_URL`: Staff interface URL, for link building
//! - `ASPACE_REPOSITORY`: Repository id (default 2)
//! - `ASPACE_EXPIRING_SESSION`: Request an expiring session (default true)
//! - `ASPACE_CONFIG`: Explicit path to a config file
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `$ASPACE_CONFIG` (an error when set but pointing at a missing file)
//! 2. `./aspace.toml` or `./aspace.json`
//! 3. `../aspace.toml` or `../aspace.json`
//! 4. `$HOME/.aspaceapi.toml`
//!
//! A file may hold a single instance at the top level, or several named
//! instances:
//!
//! ```toml
//! default_instance = "production"
//!
//! [instances.production]
//! backend_url = "https://aspace.example.edu/api"
//! username = "admin"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use aspace_domain::{AspaceConfig, AspaceError, Result};
use serde::Deserialize;

/// Load configuration with automatic fallback strategy
///
/// Tries environment variables first; when the required ones are missing,
/// falls back to config files. `instance` selects a named instance from a
/// multi-instance file and is ignored for environment loading.
///
/// # Errors
/// Returns [`AspaceError::Config`] when neither source yields a complete
/// configuration. The error names what was missing so that construction
/// fails clearly instead of deferring to the first request.
pub fn load(instance: Option<&str>) -> Result<AspaceConfig> {
    dotenvy::dotenv().ok();

    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(env_err) => {
            tracing::debug!(error = ?env_err, "environment incomplete, trying config files");
            load_from_file(None, instance)
        }
    }
}

/// Load configuration from environment variables only
///
/// # Errors
/// Returns [`AspaceError::Config`] when `ASPACE_BACKEND_URL` or
/// `ASPACE_USERNAME` is missing, or a numeric variable does not parse.
pub fn load_from_env() -> Result<AspaceConfig> {
    let backend_url = env_var("ASPACE_BACKEND_URL")?;
    let username = env_var("ASPACE_USERNAME")?;
    let repository = match std::env::var("ASPACE_REPOSITORY") {
        Ok(raw) => raw
            .parse::<u32>()
            .map_err(|e| AspaceError::Config(format!("Invalid ASPACE_REPOSITORY: {e}")))?,
        Err(_) => aspace_domain::constants::DEFAULT_REPOSITORY,
    };

    let mut config = AspaceConfig::new(backend_url, username).with_repository(repository);
    config.password = std::env::var("ASPACE_PASSWORD").ok().filter(|p| !p.is_empty());
    config.frontend_url = std::env::var("ASPACE_FRONTEND_URL").ok().filter(|u| !u.is_empty());
    config.expiring_session = env_bool("ASPACE_EXPIRING_SESSION", true);
    Ok(config)
}

/// On-disk layout: either one instance at the top level, or a table of
/// named instances with an optional default.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConfigFile {
    Instances {
        #[serde(default)]
        default_instance: Option<String>,
        instances: BTreeMap<String, AspaceConfig>,
    },
    Single(AspaceConfig),
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is detected
/// by extension (`.toml` or `.json`). For multi-instance files, `instance`
/// selects a named instance; otherwise the file's `default_instance` is
/// used, or the only instance when exactly one is defined.
///
/// # Errors
/// Returns [`AspaceError::Config`] when no file is found, the format is
/// invalid, or the requested instance does not exist.
pub fn load_from_file(path: Option<PathBuf>, instance: Option<&str>) -> Result<AspaceConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AspaceError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => match explicit_config_path()? {
            Some(p) => p,
            None => probe_config_paths().ok_or_else(|| {
                AspaceError::Config(
                    "No ArchivesSpace configuration found: set ASPACE_BACKEND_URL/ASPACE_USERNAME \
                     or create an aspace.toml config file"
                        .to_string(),
                )
            })?,
        },
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| AspaceError::Config(format!("Failed to read config file: {e}")))?;

    let parsed = parse_config(&contents, &config_path)?;
    select_instance(parsed, instance)
}

/// A file named by `ASPACE_CONFIG` is an explicit choice: when it does not
/// exist that is an error, not a reason to probe the other locations.
fn explicit_config_path() -> Result<Option<PathBuf>> {
    let raw = match std::env::var("ASPACE_CONFIG") {
        Ok(value) if !value.is_empty() => value,
        _ => return Ok(None),
    };
    let path = PathBuf::from(raw);
    if path.exists() {
        Ok(Some(path))
    } else {
        Err(AspaceError::Config(format!(
            "Config file named by ASPACE_CONFIG not found: {}",
            path.display()
        )))
    }
}

fn parse_config(contents: &str, path: &Path) -> Result<ConfigFile> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AspaceError::Config(format!("Invalid TOML config: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AspaceError::Config(format!("Invalid JSON config: {e}"))),
        other => Err(AspaceError::Config(format!("Unsupported config format: {other}"))),
    }
}

fn select_instance(file: ConfigFile, requested: Option<&str>) -> Result<AspaceConfig> {
    match file {
        ConfigFile::Single(config) => Ok(config),
        ConfigFile::Instances { default_instance, mut instances } => {
            let name = match requested {
                Some(name) => name.to_string(),
                None => match default_instance {
                    Some(name) => name,
                    // A sole instance acts as the default.
                    None if instances.len() == 1 => instances
                        .keys()
                        .next()
                        .cloned()
                        .ok_or_else(|| AspaceError::Config("empty instances table".into()))?,
                    None => {
                        return Err(AspaceError::Config(format!(
                            "Multiple instances configured ({}) but no default_instance set",
                            instances.keys().cloned().collect::<Vec<_>>().join(", ")
                        )))
                    }
                },
            };
            instances.remove(&name).ok_or_else(|| {
                AspaceError::Config(format!("Instance '{name}' not found in config file"))
            })
        }
    }
}

/// Probe the standard config file locations
///
/// # Returns
/// The first existing candidate, or `None`.
#[must_use]
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(explicit) = std::env::var("ASPACE_CONFIG") {
        candidates.push(PathBuf::from(explicit));
    }

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend([
            cwd.join("aspace.toml"),
            cwd.join("aspace.json"),
            cwd.join("../aspace.toml"),
            cwd.join("../aspace.json"),
        ]);
    }

    if let Some(home) = std::env::var_os("HOME") {
        candidates.push(PathBuf::from(home).join(".aspaceapi.toml"));
    }

    candidates.into_iter().find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AspaceError::Config(format!("Missing required environment variable: {key}")))
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key).ok().map_or(default, |s| {
        matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn clear_aspace_env() {
        for key in [
            "ASPACE_BACKEND_URL",
            "ASPACE_USERNAME",
            "ASPACE_PASSWORD",
            "ASPACE_FRONTEND_URL",
            "ASPACE_REPOSITORY",
            "ASPACE_EXPIRING_SESSION",
            "ASPACE_CONFIG",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn loads_complete_config_from_env() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_aspace_env();

        std::env::set_var("ASPACE_BACKEND_URL", "https://aspace.example.edu/api");
        std::env::set_var("ASPACE_USERNAME", "admin");
        std::env::set_var("ASPACE_PASSWORD", "secret");
        std::env::set_var("ASPACE_REPOSITORY", "5");
        std::env::set_var("ASPACE_EXPIRING_SESSION", "false");

        let config = load_from_env().expect("env config loads");
        assert_eq!(config.backend_url, "https://aspace.example.edu/api");
        assert_eq!(config.username, "admin");
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.repository, 5);
        assert!(!config.expiring_session);

        clear_aspace_env();
    }

    #[test]
    fn missing_backend_url_is_a_config_error() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_aspace_env();

        std::env::set_var("ASPACE_USERNAME", "admin");
        let err = load_from_env().unwrap_err();
        assert!(matches!(err, AspaceError::Config(_)));
        assert!(err.to_string().contains("ASPACE_BACKEND_URL"));

        clear_aspace_env();
    }

    #[test]
    fn invalid_repository_is_a_config_error() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_aspace_env();

        std::env::set_var("ASPACE_BACKEND_URL", "https://aspace.example.edu/api");
        std::env::set_var("ASPACE_USERNAME", "admin");
        std::env::set_var("ASPACE_REPOSITORY", "second");
        let err = load_from_env().unwrap_err();
        assert!(err.to_string().contains("ASPACE_REPOSITORY"));

        clear_aspace_env();
    }

    fn write_config(contents: &str, extension: &str) -> PathBuf {
        let mut temp_file = NamedTempFile::new().expect("temp file");
        temp_file.write_all(contents.as_bytes()).expect("write config");
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).expect("copy config");
        path
    }

    #[test]
    fn loads_single_instance_toml() {
        let path = write_config(
            r#"
backend_url = "https://aspace.example.edu/api"
frontend_url = "https://aspace.example.edu"
username = "admin"
password = "secret"
repository = 3
"#,
            "toml",
        );

        let config = load_from_file(Some(path.clone()), None).expect("file config loads");
        assert_eq!(config.repository, 3);
        assert_eq!(config.frontend_url.as_deref(), Some("https://aspace.example.edu"));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn loads_named_instance_from_multi_instance_file() {
        let path = write_config(
            r#"
default_instance = "production"

[instances.production]
backend_url = "https://aspace.example.edu/api"
username = "admin"

[instances.staging]
backend_url = "https://aspace-staging.example.edu/api"
username = "tester"
"#,
            "toml",
        );

        let default = load_from_file(Some(path.clone()), None).expect("default instance");
        assert_eq!(default.username, "admin");

        let staging = load_from_file(Some(path.clone()), Some("staging")).expect("staging");
        assert_eq!(staging.backend_url, "https://aspace-staging.example.edu/api");

        let missing = load_from_file(Some(path.clone()), Some("dev")).unwrap_err();
        assert!(missing.to_string().contains("'dev'"));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn sole_instance_is_used_without_default() {
        let path = write_config(
            r#"
[instances.only]
backend_url = "https://aspace.example.edu/api"
username = "admin"
"#,
            "toml",
        );

        let config = load_from_file(Some(path.clone()), None).expect("sole instance");
        assert_eq!(config.username, "admin");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn loads_json_config() {
        let path = write_config(
            r#"{"backend_url": "https://aspace.example.edu/api", "username": "admin"}"#,
            "json",
        );

        let config = load_from_file(Some(path.clone()), None).expect("json config loads");
        assert_eq!(config.repository, 2);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_explicit_config_env_var_is_an_error_not_a_fallback() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_aspace_env();

        std::env::set_var("ASPACE_CONFIG", "/nonexistent/aspace.toml");
        let err = load_from_file(None, None).unwrap_err();
        assert!(matches!(err, AspaceError::Config(_)));
        assert!(err.to_string().contains("ASPACE_CONFIG"));

        clear_aspace_env();
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err =
            load_from_file(Some(PathBuf::from("/nonexistent/aspace.toml")), None).unwrap_err();
        assert!(matches!(err, AspaceError::Config(_)));
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let path = write_config("backend_url = [unclosed", "toml");
        let err = load_from_file(Some(path.clone()), None).unwrap_err();
        assert!(matches!(err, AspaceError::Config(_)));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let path = write_config("backend_url: something", "yaml");
        let err = load_from_file(Some(path.clone()), None).unwrap_err();
        assert!(err.to_string().contains("Unsupported"));
        std::fs::remove_file(path).ok();
    }
}
