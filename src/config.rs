use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::git::PathFilter;
use crate::theme::{apply_overrides, Theme, ThemeOverrides, THEME_NAMES};

const DEFAULT_REFRESH_SECS: u64 = 10;
const MIN_REFRESH_SECS: u64 = 1;

#[derive(Debug, Clone)]
pub struct HunkwatchConfig {
    pub refresh_interval: Duration,
    /// Extensions to list; empty lists every file.
    pub extensions: Vec<String>,
    /// Show untracked files in their own group.
    pub untracked: bool,
    pub theme: Theme,
}

impl Default for HunkwatchConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            extensions: Vec::new(),
            untracked: true,
            theme: Theme::from_name(THEME_NAMES[0]),
        }
    }
}

impl HunkwatchConfig {
    pub fn path_filter(&self) -> PathFilter {
        PathFilter::new(&self.extensions)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    refresh_interval_secs: Option<u64>,
    extensions: Vec<String>,
    untracked: Option<bool>,
    theme: Option<String>,
    colors: Option<ThemeOverrides>,
}

fn config_path() -> PathBuf {
    let mut path = dirs_home().unwrap_or_else(|| PathBuf::from("."));
    path.push(".config");
    path.push("hunkwatch");
    path.push("config.toml");
    path
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Load config from `~/.config/hunkwatch/config.toml`, falling back to
/// defaults when the file is missing or invalid.
pub fn load_config() -> HunkwatchConfig {
    load_from(&config_path())
}

pub fn load_from(path: &Path) -> HunkwatchConfig {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return HunkwatchConfig::default(),
    };

    match parse_config(&contents) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), "using default config: {e:#}");
            HunkwatchConfig::default()
        }
    }
}

pub fn parse_config(contents: &str) -> Result<HunkwatchConfig> {
    let file: ConfigFile = toml::from_str(contents).context("Invalid config file")?;

    let secs = file.refresh_interval_secs.unwrap_or(DEFAULT_REFRESH_SECS);
    if secs < MIN_REFRESH_SECS {
        tracing::warn!("refresh_interval_secs = {secs} raised to {MIN_REFRESH_SECS}");
    }

    let theme_name = file.theme.as_deref().unwrap_or(THEME_NAMES[0]);
    if !THEME_NAMES.contains(&theme_name) {
        tracing::warn!("unknown theme {theme_name:?}, using {}", THEME_NAMES[0]);
    }
    let mut theme = Theme::from_name(theme_name);
    if let Some(ref overrides) = file.colors {
        apply_overrides(&mut theme, overrides);
    }

    Ok(HunkwatchConfig {
        refresh_interval: Duration::from_secs(secs.max(MIN_REFRESH_SECS)),
        extensions: file.extensions,
        untracked: file.untracked.unwrap_or(true),
        theme,
    })
}
