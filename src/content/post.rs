//! Post model and post identity

use chrono::{DateTime, FixedOffset, NaiveDate};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::path::{Path, PathBuf};

lazy_static! {
    /// `2024-01-15-some-title` style file stems
    static ref DATED_STEM: Regex = Regex::new(r"^([0-9]{4}-[0-9]{2}-[0-9]{2})-(.+)$").unwrap();
}

/// Excerpt marker, as used by Hexo themes
pub const MORE_MARKER: &str = "<!-- more -->";

/// Stable post identity: `YYYY-MM-DD-slug`, derived from the file name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    /// Derive the identity of a post file.
    ///
    /// A dated file name keeps its own date; otherwise the calendar date of
    /// `date` (in its own offset) is prefixed to the slug.
    pub fn from_path(path: &Path, date: &DateTime<FixedOffset>) -> Self {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled");

        let dated = DATED_STEM
            .captures(stem)
            .filter(|caps| NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").is_ok());

        let (day, name) = match dated {
            Some(caps) => (caps[1].to_string(), caps[2].to_string()),
            None => (date.format("%Y-%m-%d").to_string(), stem.to_string()),
        };

        let slug = slug::slugify(&name);
        let slug = if slug.is_empty() {
            "untitled".to_string()
        } else {
            slug
        };

        PostId(format!("{}-{}", day, slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for PostId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PostId {
    fn from(s: &str) -> Self {
        PostId(s.to_string())
    }
}

impl From<String> for PostId {
    fn from(s: String) -> Self {
        PostId(s)
    }
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Stable identity
    pub id: PostId,

    /// Post title
    pub title: String,

    /// Publication date
    pub date: DateTime<FixedOffset>,

    /// Last updated date
    pub updated: Option<DateTime<FixedOffset>>,

    /// Post categories, outermost first
    pub categories: Vec<String>,

    /// Post tags
    pub tags: Vec<String>,

    /// Raw markdown body
    pub body: String,

    /// Whether the post is published
    pub published: bool,

    /// Source file path, relative to the posts directory
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// Custom front-matter fields
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Post {
    /// Markdown before the `<!-- more -->` marker, if the post has one
    pub fn excerpt(&self) -> Option<&str> {
        self.body
            .split_once(MORE_MARKER)
            .map(|(before, _)| before.trim_end())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Tags that break the lowercase convention
    pub fn non_lowercase_tags(&self) -> impl Iterator<Item = &str> {
        self.tags
            .iter()
            .map(String::as_str)
            .filter(|t| t.chars().any(char::is_uppercase))
    }
}

/// Remove repeated labels, keeping the first occurrence
pub(crate) fn dedup_labels(labels: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    labels
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .filter(|l| seen.insert(l.clone()))
        .collect()
}
