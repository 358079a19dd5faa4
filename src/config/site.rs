//! Site configuration (_config.yml)

use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub author: String,
    pub url: String,
    /// IANA timezone for dates written without an offset; empty means UTC
    pub timezone: String,

    // Directory
    pub source_dir: String,
    pub posts_dir: String,

    // Writing
    pub render_drafts: bool,
    /// Glob patterns, relative to the posts directory, of files to ignore
    pub exclude: Vec<String>,

    // Date format (Moment.js tokens)
    pub date_format: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            author: String::new(),
            url: "http://example.com".to_string(),
            timezone: String::new(),

            source_dir: "source".to_string(),
            posts_dir: "_posts".to_string(),

            render_drafts: false,
            exclude: Vec::new(),

            date_format: "YYYY-MM-DD".to_string(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        // Surface a bad timezone at load time rather than on the first post
        config.tz()?;
        Ok(config)
    }

    /// The configured timezone
    pub fn tz(&self) -> Result<Tz> {
        let name = self.timezone.trim();
        if name.is_empty() {
            return Ok(Tz::UTC);
        }
        name.parse::<Tz>()
            .map_err(|e| anyhow!("Invalid timezone {:?}: {}", name, e))
    }

    /// Compiled `exclude` patterns
    pub fn exclude_patterns(&self) -> Result<Vec<glob::Pattern>> {
        self.exclude
            .iter()
            .map(|p| {
                glob::Pattern::new(p).with_context(|| format!("Invalid exclude pattern {:?}", p))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.source_dir, "source");
        assert_eq!(config.posts_dir, "_posts");
        assert!(!config.render_drafts);
        assert_eq!(config.tz().unwrap(), Tz::UTC);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Swift Notes
author: Test User
timezone: Asia/Shanghai
exclude:
  - "drafts/**"
theme: landscape
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Swift Notes");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.tz().unwrap().name(), "Asia/Shanghai");
        assert_eq!(config.exclude_patterns().unwrap().len(), 1);
        assert!(config.extra.contains_key("theme"));
    }

    #[test]
    fn test_load_rejects_bad_timezone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "timezone: Mars/Olympus_Mons\n").unwrap();
        let err = SiteConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid timezone"));
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let config = SiteConfig {
            exclude: vec!["[".to_string()],
            ..Default::default()
        };
        assert!(config.exclude_patterns().is_err());
    }
}
