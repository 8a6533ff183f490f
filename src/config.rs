//! Engine configuration
//!
//! Supports multiple profiles (debug, release) with different tuning and
//! binding tables.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::gesture::{
    ClickConfig, LongPressConfig, PanConfig, PinchConfig, RotateConfig, SwipeConfig,
};
use crate::shortcuts::ShortcutConfig;

/// Environment variable prefix, e.g. `INPUT_CLICK__TIMEOUT_MS=250`
pub const ENV_PREFIX: &str = "INPUT";

/// Tuning for every recognizer plus the shortcut table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// The active profile (debug, release, etc.)
    pub profile: String,
    pub click: ClickConfig,
    pub long_press: LongPressConfig,
    pub pan: PanConfig,
    pub pinch: PinchConfig,
    pub rotate: RotateConfig,
    pub swipe: SwipeConfig,
    pub shortcuts: ShortcutConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            profile: "release".to_string(),
            click: ClickConfig::default(),
            long_press: LongPressConfig::default(),
            pan: PanConfig::default(),
            pinch: PinchConfig::default(),
            rotate: RotateConfig::default(),
            swipe: SwipeConfig::default(),
            shortcuts: ShortcutConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration based on the specified profile
    ///
    /// Sources, later ones overriding earlier ones:
    /// 1. config/{profile}.toml
    /// 2. Environment variables with prefix INPUT_ (e.g. INPUT_SWIPE__MIN_VELOCITY=500)
    ///
    /// Config files are searched for in:
    /// 1. Next to the executable (target/debug/config or target/release/config)
    /// 2. In the current directory (./config)
    ///
    /// A missing profile file is not an error; every field has a default.
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        let dir = Self::find_config_dir().unwrap_or_else(|| PathBuf::from("config"));
        Self::load_from(&dir, profile)
    }

    /// Like [`EngineConfig::load`] with an explicit config directory
    pub fn load_from(dir: &Path, profile: &str) -> Result<Self, ConfigError> {
        let profile_path = dir.join(profile);
        Config::builder()
            .add_source(File::from(profile_path.as_path()).required(false))
            // Use __ as separator for nested fields (e.g., INPUT_CLICK__RADIUS)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override("profile", profile)?
            .build()?
            .try_deserialize()
    }

    /// Loads configuration using the INPUT_PROFILE environment variable,
    /// defaulting to "release"
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let profile = std::env::var("INPUT_PROFILE").unwrap_or_else(|_| "release".to_string());
        Self::load(&profile)
    }

    /// Finds the config directory by searching in multiple locations
    pub fn find_config_dir() -> Option<PathBuf> {
        if let Ok(exe_path) = std::env::current_exe()
            && let Some(exe_dir) = exe_path.parent()
        {
            let config_dir = exe_dir.join("config");
            if config_dir.exists() {
                return Some(config_dir);
            }
        }

        let cwd_config = PathBuf::from("config");
        if cwd_config.exists() {
            return Some(cwd_config);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::gesture::SwipeAxis;
    use crate::shortcuts::PatternConfig;

    #[test]
    fn test_missing_profile_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load_from(dir.path(), "nothing-here").unwrap();
        assert_eq!(config.profile, "nothing-here");
        assert_eq!(config.click, ClickConfig::default());
        assert_eq!(config.shortcuts.sequence_timeout_ms, 1000);
    }

    #[test]
    fn test_profile_file_overrides_fields() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("custom.toml"),
            r#"
[click]
timeout_ms = 250

[swipe]
direction = "horizontal"

[shortcuts]
sequence_timeout_ms = 800

[[shortcuts.bindings]]
action = "save"
pattern = "Ctrl+S"

[[shortcuts.bindings]]
action = "comment"
pattern = ["Ctrl+K", "Ctrl+C"]
context = "editor"
"#,
        )
        .unwrap();

        let config = EngineConfig::load_from(dir.path(), "custom").unwrap();
        assert_eq!(config.click.timeout_ms, 250);
        assert_eq!(config.click.radius, ClickConfig::default().radius);
        assert_eq!(config.swipe.direction, SwipeAxis::Horizontal);
        assert_eq!(config.shortcuts.sequence_timeout_ms, 800);

        let bindings = &config.shortcuts.bindings;
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].context, "global");
        assert_eq!(
            bindings[1].pattern,
            PatternConfig::Steps(vec!["Ctrl+K".into(), "Ctrl+C".into()])
        );
    }

    #[test]
    fn test_bundled_profiles_parse() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("config");
        for profile in ["debug", "release"] {
            let config = EngineConfig::load_from(&dir, profile).unwrap();
            assert_eq!(config.profile, profile);
            assert!(!config.shortcuts.bindings.is_empty());
        }
    }
}
