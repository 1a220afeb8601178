//! Configuration constants and utilities for wadline
//!
//! Settings are resolved with the precedence command line > environment >
//! profile file > built-in default.

use crate::cmd_args::CommandLineArgs;
use anyhow::{Context, Result};
use ini::Ini;
use std::path::{Path, PathBuf};

/// Default profile file path for wadline
pub const DEFAULT_PROFILE_PATH: &str = "~/.wadline/profile";

/// Environment variable name for overriding the profile path
pub const PROFILE_PATH_ENV_VAR: &str = "WADLINE_PROFILE_PATH";

pub const EDITOR_ENV_VAR: &str = "WADLINE_EDITOR";
pub const PAYLOAD_PATH_ENV_VAR: &str = "WADLINE_PAYLOAD_PATH";
pub const LOG_LEVEL_ENV_VAR: &str = "WADLINE_LOG_LEVEL";

/// Scratch payload file used when nothing else is configured
pub const DEFAULT_PAYLOAD_FILE: &str = "temp.xml";
pub const DEFAULT_LOG_LEVEL: &str = "error";
const VERBOSE_LOG_LEVEL: &str = "debug";

const KEY_EDITOR: &str = "editor";
const KEY_PAYLOAD_FILE: &str = "payload_file";
const KEY_WADL: &str = "wadl";

/// Get the profile file path, checking environment variable first, then falling back to default
pub fn get_profile_path() -> String {
    env_var(PROFILE_PATH_ENV_VAR).unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string())
}

fn env_var(name: &str) -> Option<String> {
    std::env::var_os(name)
        .and_then(|val| val.into_string().ok())
        .filter(|val| !val.trim().is_empty())
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Values read from one section of the profile file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileSettings {
    pub editor: Option<String>,
    pub payload_file: Option<PathBuf>,
    pub wadl: Vec<PathBuf>,
}

impl ProfileSettings {
    /// Read section `profile` of the INI file at `path`. A missing file or
    /// section yields empty settings.
    pub fn load(path: &Path, profile: &str) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No profile file at {}", path.display());
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path)
            .with_context(|| format!("cannot read profile {}", path.display()))?;
        let Some(section) = ini.section(Some(profile)) else {
            tracing::debug!("Profile '{}' not found in {}", profile, path.display());
            return Ok(Self::default());
        };

        Ok(Self {
            editor: section.get(KEY_EDITOR).map(str::to_string),
            payload_file: section.get(KEY_PAYLOAD_FILE).map(expand),
            wadl: section
                .get(KEY_WADL)
                .map(|files| files.split_whitespace().map(expand).collect())
                .unwrap_or_default(),
        })
    }
}

/// Effective settings for one session
#[derive(Debug, Clone, PartialEq)]
pub struct ReplConfig {
    pub wadl: Vec<PathBuf>,
    pub editor: Option<String>,
    pub payload_file: PathBuf,
    pub log_level: String,
}

impl ReplConfig {
    /// Resolve from the process environment and the profile file
    pub fn load(args: &CommandLineArgs) -> Result<Self> {
        let profile_path = expand(&get_profile_path());
        let profile = ProfileSettings::load(&profile_path, args.profile())?;
        Ok(Self::resolve(args, env_var, profile))
    }

    pub fn resolve<F>(args: &CommandLineArgs, env: F, profile: ProfileSettings) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let wadl = if args.wadl().is_empty() {
            profile.wadl
        } else {
            args.wadl().to_vec()
        };
        let editor = args
            .editor()
            .map(str::to_string)
            .or_else(|| env(EDITOR_ENV_VAR))
            .or(profile.editor);
        let payload_file = args
            .payload_file()
            .cloned()
            .or_else(|| env(PAYLOAD_PATH_ENV_VAR).map(|p| expand(&p)))
            .or(profile.payload_file)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PAYLOAD_FILE));
        let log_level = if args.verbose() {
            VERBOSE_LOG_LEVEL.to_string()
        } else {
            env(LOG_LEVEL_ENV_VAR).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
        };

        Self {
            wadl,
            editor,
            payload_file,
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_profile_path() {
        assert_eq!(DEFAULT_PROFILE_PATH, "~/.wadline/profile");
    }

    #[test]
    fn test_get_profile_path_env_override() {
        // Save current env var state
        let original = std::env::var_os(PROFILE_PATH_ENV_VAR);

        let test_path = "/custom/profile/path";
        std::env::set_var(PROFILE_PATH_ENV_VAR, test_path);
        assert_eq!(get_profile_path(), test_path);

        std::env::remove_var(PROFILE_PATH_ENV_VAR);
        assert_eq!(get_profile_path(), DEFAULT_PROFILE_PATH);

        // Restore original state
        if let Some(val) = original {
            std::env::set_var(PROFILE_PATH_ENV_VAR, val);
        }
    }

    #[test]
    fn test_profile_load_reads_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile");
        std::fs::write(
            &path,
            "[default]\neditor = vim\n\n[shop]\neditor = code --wait\npayload_file = /tmp/shop.xml\nwadl = /a/shop.wadl /a/billing.wadl\n",
        )
        .unwrap();

        let shop = ProfileSettings::load(&path, "shop").unwrap();
        assert_eq!(shop.editor.as_deref(), Some("code --wait"));
        assert_eq!(shop.payload_file, Some(PathBuf::from("/tmp/shop.xml")));
        assert_eq!(
            shop.wadl,
            vec![PathBuf::from("/a/shop.wadl"), PathBuf::from("/a/billing.wadl")]
        );

        let default = ProfileSettings::load(&path, "default").unwrap();
        assert_eq!(default.editor.as_deref(), Some("vim"));
        assert!(default.wadl.is_empty());

        assert_eq!(ProfileSettings::load(&path, "missing").unwrap(), ProfileSettings::default());
    }

    #[test]
    fn test_profile_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ProfileSettings::load(&dir.path().join("nope"), "default").unwrap();
        assert_eq!(settings, ProfileSettings::default());
    }

    #[test]
    fn test_resolve_defaults() {
        let args = CommandLineArgs::parse_from(["wadline"]);
        let config = ReplConfig::resolve(&args, env_of(&[]), ProfileSettings::default());
        assert!(config.wadl.is_empty());
        assert_eq!(config.editor, None);
        assert_eq!(config.payload_file, PathBuf::from(DEFAULT_PAYLOAD_FILE));
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_resolve_precedence() {
        let profile = ProfileSettings {
            editor: Some("nano".into()),
            payload_file: Some(PathBuf::from("/profile.xml")),
            wadl: vec![PathBuf::from("profile.wadl")],
        };
        let env = env_of(&[(EDITOR_ENV_VAR, "vim"), (LOG_LEVEL_ENV_VAR, "info")]);

        let args = CommandLineArgs::parse_from(["wadline"]);
        let config = ReplConfig::resolve(&args, &env, profile.clone());
        assert_eq!(config.editor.as_deref(), Some("vim"));
        assert_eq!(config.payload_file, PathBuf::from("/profile.xml"));
        assert_eq!(config.wadl, vec![PathBuf::from("profile.wadl")]);
        assert_eq!(config.log_level, "info");

        let args = CommandLineArgs::parse_from(["wadline", "cli.wadl", "-e", "emacs", "-v"]);
        let config = ReplConfig::resolve(&args, &env, profile);
        assert_eq!(config.editor.as_deref(), Some("emacs"));
        assert_eq!(config.wadl, vec![PathBuf::from("cli.wadl")]);
        assert_eq!(config.log_level, "debug");
    }
}
