//! postshelf: a read-only store for Hexo-style blog posts
//!
//! Posts are markdown files with a front-matter block (title, date,
//! categories, tags). This crate loads them once into a [`PostStore`] that
//! lists them newest first and looks them up by a stable, filename-derived id.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub use content::{ContentError, ContentLoader, Post, PostId, PostStore};

/// A blog site on disk
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Source directory
    pub source_dir: PathBuf,
    /// Directory holding the post files
    pub posts_dir: PathBuf,
}

impl Site {
    /// Open a site directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Use an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let source_dir = base_dir.join(&config.source_dir);
        let posts_dir = source_dir.join(&config.posts_dir);

        Self {
            config,
            base_dir,
            source_dir,
            posts_dir,
        }
    }

    /// A loader configured for this site
    pub fn loader(&self) -> Result<ContentLoader> {
        let tz = self.config.tz()?;
        let exclude = self
            .config
            .exclude_patterns()
            .context("Invalid `exclude` setting")?;

        Ok(ContentLoader::new(&self.posts_dir, tz)
            .with_drafts(self.config.render_drafts)
            .with_exclude(exclude))
    }

    /// Load every post of the site
    pub fn load(&self) -> Result<PostStore> {
        Ok(self.loader()?.load())
    }
}
