//! Config file discovery, merging, and environment overrides.
//!
//! Precedence (low -> high): user config (`~/.jia/jia.json5`), working
//! directory config (`./jia.json5`), an explicit file named by `JIA_CONFIG`,
//! then individual environment variables.

use crate::error::ConfigError;
use crate::model::JiaConfig;
use directories::BaseDirs;
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config filename in local layers.
const DEFAULT_CONFIG_FILE: &str = "jia.json5";
/// Default config directory under the user home.
const DEFAULT_CONFIG_DIR: &str = ".jia";

/// Env var naming an explicit config file, applied after local layers.
pub const ENV_CONFIG_PATH: &str = "JIA_CONFIG";
/// Env override for `store.url`.
pub const ENV_STORE_URL: &str = "JIA_STORE_URL";
/// Env override for `store.api_key`.
pub const ENV_STORE_API_KEY: &str = "JIA_STORE_API_KEY";
/// Env override for `assistant.base_url`.
pub const ENV_ASSISTANT_URL: &str = "JIA_ASSISTANT_URL";
/// Env override for `assistant.timeout_secs`.
pub const ENV_ASSISTANT_TIMEOUT_SECS: &str = "JIA_ASSISTANT_TIMEOUT_SECS";

/// Lookup used to resolve environment overrides; injectable for tests.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Options controlling config discovery.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Working directory used to resolve the local config layer.
    pub cwd: PathBuf,
    /// Optional user config path (defaults to `~/.jia/jia.json5`).
    pub user_config_path: Option<PathBuf>,
}

impl LoadOptions {
    /// Create options with default layer locations for the provided cwd.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            user_config_path: default_user_config_path(),
        }
    }
}

/// Default user config path under the home directory.
fn default_user_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILE)
    })
}

impl JiaConfig {
    /// Load a single config from a path (no layering, no env overrides).
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading config from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    /// Load a single config from JSON5 contents (no layering).
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        let config: JiaConfig = serde_json::from_value(value)?;
        Ok(config)
    }

    /// Load the layered config stack and apply process environment overrides.
    pub fn load(cwd: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let lookup = |key: &str| std::env::var(key).ok();
        Self::load_with(LoadOptions::new(cwd), &lookup)
    }

    /// Load with explicit options and an injectable environment lookup.
    pub fn load_with(options: LoadOptions, env: EnvLookup<'_>) -> Result<Self, ConfigError> {
        let mut merged = Value::Object(serde_json::Map::new());
        let mut layers = 0usize;

        let mut candidates = Vec::new();
        if let Some(user_path) = options.user_config_path.clone() {
            candidates.push(user_path);
        }
        candidates.push(options.cwd.join(DEFAULT_CONFIG_FILE));
        if let Some(explicit) = env(ENV_CONFIG_PATH) {
            candidates.push(PathBuf::from(explicit));
        }

        for path in candidates {
            if !path.exists() {
                debug!("skipping missing config layer (path={})", path.display());
                continue;
            }
            let contents = fs::read_to_string(&path)?;
            let value: Value = json5::from_str(&contents)?;
            merge_json_values(&mut merged, &value);
            debug!("merged config layer (path={})", path.display());
            layers += 1;
        }

        let mut config: JiaConfig = serde_json::from_value(merged)?;
        apply_env_overrides(&mut config, env)?;
        info!("config loaded (layers={})", layers);
        Ok(config)
    }
}

/// Apply individual environment variable overrides, highest precedence.
fn apply_env_overrides(config: &mut JiaConfig, env: EnvLookup<'_>) -> Result<(), ConfigError> {
    if let Some(url) = env(ENV_STORE_URL) {
        config.store.url = url;
    }
    if let Some(api_key) = env(ENV_STORE_API_KEY) {
        config.store.api_key = api_key;
    }
    if let Some(base_url) = env(ENV_ASSISTANT_URL) {
        config.assistant.base_url = base_url;
    }
    if let Some(timeout) = env(ENV_ASSISTANT_TIMEOUT_SECS) {
        let secs: u64 = timeout.parse().map_err(|_| {
            ConfigError::Invalid(format!(
                "{ENV_ASSISTANT_TIMEOUT_SECS} must be an integer: {timeout}"
            ))
        })?;
        config.assistant.timeout_secs = secs;
    }
    Ok(())
}

/// Deep-merge `incoming` into `base`: objects merge key-wise, everything
/// else overwrites.
fn merge_json_values(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(incoming_map)) => {
            for (key, value) in incoming_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base_slot, incoming_value) => {
            *base_slot = incoming_value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LoadOptions, merge_json_values};
    use crate::model::JiaConfig;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn no_env(_key: &str) -> Option<String> {
        None
    }

    #[test]
    fn merge_overrides_scalars_and_merges_objects() {
        let mut base = json!({"store": {"url": "https://a", "api_key": "k"}});
        let incoming = json!({"store": {"url": "https://b"}});
        merge_json_values(&mut base, &incoming);
        assert_eq!(base, json!({"store": {"url": "https://b", "api_key": "k"}}));
    }

    #[test]
    fn loads_json5_with_comments() {
        let config = JiaConfig::load_from_str(
            r#"{
                // endpoints
                store: { url: "https://store.example", api_key: "key" },
                assistant: { base_url: "https://assistant.example" },
            }"#,
        )
        .expect("parse");
        assert_eq!(config.store.url, "https://store.example");
        assert_eq!(config.assistant.timeout_secs, 30);
    }

    #[test]
    fn cwd_layer_overrides_user_layer() {
        let root = tempdir().expect("tempdir");
        let user_path = root.path().join("user.json5");
        fs::write(
            &user_path,
            r#"{store: {url: "https://user.example", api_key: "user-key"}}"#,
        )
        .expect("write user");
        let cwd = root.path().join("project");
        fs::create_dir_all(&cwd).expect("mkdir");
        fs::write(
            cwd.join("jia.json5"),
            r#"{store: {url: "https://project.example"}}"#,
        )
        .expect("write project");

        let options = LoadOptions {
            cwd,
            user_config_path: Some(user_path),
        };
        let config = JiaConfig::load_with(options, &no_env).expect("load");
        assert_eq!(config.store.url, "https://project.example");
        assert_eq!(config.store.api_key, "user-key");
    }

    #[test]
    fn env_overrides_take_highest_precedence() {
        let root = tempdir().expect("tempdir");
        fs::write(
            root.path().join("jia.json5"),
            r#"{store: {url: "https://file.example", api_key: "file-key"}}"#,
        )
        .expect("write");

        let env = |key: &str| match key {
            super::ENV_STORE_URL => Some("https://env.example".to_string()),
            super::ENV_ASSISTANT_TIMEOUT_SECS => Some("5".to_string()),
            _ => None,
        };
        let options = LoadOptions {
            cwd: root.path().to_path_buf(),
            user_config_path: None,
        };
        let config = JiaConfig::load_with(options, &env).expect("load");
        assert_eq!(config.store.url, "https://env.example");
        assert_eq!(config.store.api_key, "file-key");
        assert_eq!(config.assistant.timeout_secs, 5);
    }

    #[test]
    fn bad_timeout_override_is_rejected() {
        let root = tempdir().expect("tempdir");
        let env = |key: &str| {
            (key == super::ENV_ASSISTANT_TIMEOUT_SECS).then(|| "soon".to_string())
        };
        let options = LoadOptions {
            cwd: root.path().to_path_buf(),
            user_config_path: None,
        };
        assert!(JiaConfig::load_with(options, &env).is_err());
    }
}
