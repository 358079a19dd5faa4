//! Content loader - loads posts from the posts directory

use chrono_tz::Tz;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::error::{ContentError, ContentResult};
use super::post::dedup_labels;
use super::{FrontMatter, Post, PostId, PostStore};

/// A post file that could not be loaded
#[derive(Debug)]
pub struct SkippedPost {
    pub path: PathBuf,
    pub error: ContentError,
}

/// Everything that went wrong while loading, for the author to fix
#[derive(Debug, Default)]
pub struct LoadReport {
    pub skipped: Vec<SkippedPost>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    pub(crate) fn skip(&mut self, path: PathBuf, error: ContentError) {
        tracing::warn!("Skipping post {:?}: {}", path, error);
        self.skipped.push(SkippedPost { path, error });
    }
}

/// Loads posts from a directory of markdown files
#[derive(Debug, Clone)]
pub struct ContentLoader {
    posts_dir: PathBuf,
    tz: Tz,
    render_drafts: bool,
    exclude: Vec<glob::Pattern>,
}

impl ContentLoader {
    /// Create a loader for `posts_dir`, reading offset-less dates in `tz`
    pub fn new<P: AsRef<Path>>(posts_dir: P, tz: Tz) -> Self {
        Self {
            posts_dir: posts_dir.as_ref().to_path_buf(),
            tz,
            render_drafts: false,
            exclude: Vec::new(),
        }
    }

    /// Keep posts marked `published: false`
    pub fn with_drafts(mut self, render_drafts: bool) -> Self {
        self.render_drafts = render_drafts;
        self
    }

    /// Ignore files whose path relative to the posts directory matches
    pub fn with_exclude(mut self, exclude: Vec<glob::Pattern>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Load every post into a store. Bad files end up in the store's report.
    pub fn load(&self) -> PostStore {
        let mut report = LoadReport::default();
        if !self.posts_dir.exists() {
            tracing::debug!("Posts directory {:?} does not exist", self.posts_dir);
            return PostStore::new(Vec::new(), report);
        }

        let mut posts = Vec::new();

        let walker = WalkDir::new(&self.posts_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Failed to read entry under {:?}: {}", self.posts_dir, e);
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown_file(path) {
                continue;
            }

            if self.is_excluded(path) {
                tracing::debug!("Excluded {:?}", path);
                continue;
            }

            match self.load_post(path) {
                Ok(post) if post.published || self.render_drafts => {
                    tracing::debug!("Loaded {} from {:?}", post.id, path);
                    posts.push(post);
                }
                Ok(post) => tracing::debug!("Skipping unpublished post {}", post.id),
                Err(e) => report.skip(path.to_path_buf(), e),
            }
        }

        let store = PostStore::new(posts, report);
        tracing::info!(
            "Loaded {} posts from {:?} ({} skipped)",
            store.len(),
            self.posts_dir,
            store.report().skipped.len()
        );
        store
    }

    /// Load a single post from a file
    pub fn load_post(&self, path: &Path) -> ContentResult<Post> {
        let content = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (fm, body) = FrontMatter::parse(path, &content)?;

        let title = fm
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ContentError::malformed(path, "missing required key `title`"))?
            .to_string();

        let raw_date = fm
            .date
            .as_deref()
            .ok_or_else(|| ContentError::malformed(path, "missing required key `date`"))?;
        let date = fm.parse_date(self.tz).ok_or_else(|| {
            ContentError::malformed(path, format!("invalid `date` value {:?}", raw_date))
        })?;

        let updated = fm.parse_updated(self.tz);
        if updated.is_none() {
            if let Some(raw) = &fm.updated {
                tracing::warn!("Ignoring invalid `updated` value {:?} in {:?}", raw, path);
            }
        }

        let categories = dedup_labels(fm.categories);
        if categories.is_empty() {
            return Err(ContentError::malformed(
                path,
                "`categories` must name at least one category",
            ));
        }

        let source = path
            .strip_prefix(&self.posts_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        Ok(Post {
            id: PostId::from_path(path, &date),
            title,
            date,
            updated,
            categories,
            tags: dedup_labels(fm.tags),
            body: body.to_string(),
            published: fm.published,
            source,
            full_source: path.to_path_buf(),
            extra: fm.extra,
        })
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.posts_dir).unwrap_or(path);
        self.exclude.iter().any(|p| p.matches_path(relative))
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}
