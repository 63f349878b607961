use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::triggers::{ProximitySentinel, PullGesture, TouchSupport};

pub const DEFAULT_AD_TOPIC: &str = "furniture,interior,home";

/// Runtime settings. Layered as defaults, then the optional TOML file, then environment.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeedConfig {
    /// Unsplash access key; absent means fallback illustrations.
    pub unsplash_access_key: Option<String>,
    pub ad_topic_query: String,
    /// Base URL or directory holding the page documents.
    pub data_location: Option<String>,
    pub request_timeout_secs: u64,
    pub pull_threshold: f64,
    pub max_pull: f64,
    pub proximity_margin: f64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            unsplash_access_key: None,
            ad_topic_query: DEFAULT_AD_TOPIC.to_string(),
            data_location: None,
            request_timeout_secs: 15,
            pull_threshold: 80.0,
            max_pull: 120.0,
            proximity_margin: 200.0,
        }
    }
}

impl FeedConfig {
    /// Load from `path` (or the default config location when `None`) and apply env overrides.
    /// A missing default file is not an error; a missing explicit file is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_file(p)?,
            None => match default_config_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        cfg.apply_env(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid config: {}", path.display()))
    }

    /// Environment overrides; unparsable values are ignored.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(k) = var("UNSPLASH_ACCESS_KEY").filter(|k| !k.trim().is_empty()) {
            self.unsplash_access_key = Some(k);
        }
        if let Some(q) = var("MOSAIC_AD_TOPIC") { self.ad_topic_query = q; }
        if let Some(d) = var("MOSAIC_DATA_URL") { self.data_location = Some(d); }
        override_parsed(&var, "MOSAIC_REQUEST_TIMEOUT_SECS", &mut self.request_timeout_secs);
        override_parsed(&var, "MOSAIC_PULL_THRESHOLD", &mut self.pull_threshold);
        override_parsed(&var, "MOSAIC_MAX_PULL", &mut self.max_pull);
        override_parsed(&var, "MOSAIC_PROXIMITY_MARGIN", &mut self.proximity_margin);
    }

    pub fn request_timeout(&self) -> Duration { Duration::from_secs(self.request_timeout_secs) }

    pub fn pull_gesture(&self, touch: TouchSupport) -> PullGesture {
        PullGesture::new(touch, self.pull_threshold, self.max_pull)
    }

    pub fn proximity_sentinel(&self) -> ProximitySentinel { ProximitySentinel::new(self.proximity_margin) }
}

fn override_parsed<F, T>(var: &F, key: &str, slot: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(v) = var(key).and_then(|s| s.trim().parse().ok()) {
        *slot = v;
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "mosaic").map(|d| d.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn file_values_override_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "ad_topic_query = \"lamps\"\npull_threshold = 60.0\n").unwrap();
        let cfg = FeedConfig::from_file(&path).unwrap();
        assert_eq!(cfg.ad_topic_query, "lamps");
        assert_eq!(cfg.pull_threshold, 60.0);
        assert_eq!(cfg.max_pull, 120.0);
        assert!(cfg.unsplash_access_key.is_none());
    }

    #[test]
    fn env_overrides_file_and_ignores_garbage() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("UNSPLASH_ACCESS_KEY", "abc"),
            ("MOSAIC_REQUEST_TIMEOUT_SECS", "3"),
            ("MOSAIC_MAX_PULL", "lots"),
        ]);
        let mut cfg = FeedConfig::default();
        cfg.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.unsplash_access_key.as_deref(), Some("abc"));
        assert_eq!(cfg.request_timeout(), Duration::from_secs(3));
        assert_eq!(cfg.max_pull, 120.0);
    }

    #[test]
    fn empty_key_keeps_fallback_mode() {
        let mut cfg = FeedConfig::default();
        cfg.apply_env(|k| (k == "UNSPLASH_ACCESS_KEY").then(|| String::new()));
        assert!(cfg.unsplash_access_key.is_none());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(FeedConfig::load(Some(&tmp.path().join("nope.toml"))).is_err());
    }
}
