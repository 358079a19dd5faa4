//! Front-matter parsing

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use super::error::{ContentError, ContentResult};

/// Custom deserializer for label lists: a single string, a list of strings,
/// or a list mixing strings and nested lists (Hexo's hierarchical categories)
fn labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
        Nested(Vec<Label>),
    }

    impl Label {
        fn flatten_into(self, out: &mut Vec<String>) {
            match self {
                Label::Text(s) => out.push(s),
                Label::Int(n) => out.push(n.to_string()),
                Label::Float(n) => out.push(n.to_string()),
                Label::Bool(b) => out.push(b.to_string()),
                Label::Nested(inner) => {
                    for label in inner {
                        label.flatten_into(out);
                    }
                }
            }
        }
    }

    struct Labels;

    impl<'de> Visitor<'de> for Labels {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<Label>()? {
                item.flatten_into(&mut vec);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(Labels)
}

/// Front-matter data as written by the author, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub updated: Option<String>,
    #[serde(deserialize_with = "labels", default)]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "labels", default)]
    pub categories: Vec<String>,
    /// Posts are published unless marked otherwise
    #[serde(default = "default_published")]
    pub published: bool,

    /// Any other keys, in the order they were written
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

fn default_published() -> bool {
    true
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            title: None,
            date: None,
            updated: None,
            tags: Vec::new(),
            categories: Vec::new(),
            published: true,
            extra: IndexMap::new(),
        }
    }
}

impl FrontMatter {
    /// Split a post file into its front-matter and markdown body.
    ///
    /// `path` is only used to label errors.
    pub fn parse<'a>(path: &Path, content: &'a str) -> ContentResult<(Self, &'a str)> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        if content.starts_with("---") {
            return Self::parse_yaml(path, content);
        }

        if content.starts_with(";;;") || content.starts_with('{') {
            return Self::parse_json(path, content);
        }

        Err(ContentError::malformed(path, "no front-matter block"))
    }

    fn parse_yaml<'a>(path: &Path, content: &'a str) -> ContentResult<(Self, &'a str)> {
        let rest = &content[3..];
        let rest = rest.trim_start_matches(['\n', '\r']);

        let Some(end_pos) = find_closing_fence(rest) else {
            return Err(ContentError::malformed(path, "unterminated front-matter block"));
        };

        let yaml_content = &rest[..end_pos];
        let remaining = &rest[end_pos..];
        let remaining = remaining.strip_prefix("---").unwrap_or(remaining);
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return Err(ContentError::malformed(path, "empty front-matter block"));
        }

        // A `---` fenced region of prose is a markdown separator, not metadata
        if !yaml_content.lines().any(looks_like_yaml_key) {
            return Err(ContentError::malformed(path, "no front-matter block"));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml_content)
            .map_err(|e| ContentError::malformed(path, format!("invalid YAML: {}", e)))?;

        Ok((fm, remaining))
    }

    fn parse_json<'a>(path: &Path, content: &'a str) -> ContentResult<(Self, &'a str)> {
        if let Some(rest) = content.strip_prefix(";;;") {
            let Some(end_pos) = rest.find(";;;") else {
                return Err(ContentError::malformed(path, "unterminated front-matter block"));
            };
            let json_content = &rest[..end_pos];
            let remaining = rest[end_pos + 3..].trim_start_matches(['\n', '\r']);

            let fm = serde_json::from_str::<FrontMatter>(json_content)
                .map_err(|e| ContentError::malformed(path, format!("invalid JSON: {}", e)))?;
            return Ok((fm, remaining));
        }

        // A bare JSON object at the start of the file
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        let mut end_pos = None;
        for (i, c) in content.char_indices() {
            if in_string {
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        end_pos = Some(i + 1);
                        break;
                    }
                }
                _ => {}
            }
        }

        let Some(end_pos) = end_pos else {
            return Err(ContentError::malformed(path, "unterminated JSON front-matter"));
        };

        let fm = serde_json::from_str::<FrontMatter>(&content[..end_pos])
            .map_err(|e| ContentError::malformed(path, format!("invalid JSON: {}", e)))?;
        let remaining = content[end_pos..].trim_start_matches(['\n', '\r']);

        Ok((fm, remaining))
    }

    /// Parse the `date` key, interpreting offset-less values in `tz`
    pub fn parse_date(&self, tz: Tz) -> Option<DateTime<FixedOffset>> {
        self.date.as_deref().and_then(|s| parse_date_string(s, tz))
    }

    /// Parse the `updated` key, interpreting offset-less values in `tz`
    pub fn parse_updated(&self, tz: Tz) -> Option<DateTime<FixedOffset>> {
        self.updated.as_deref().and_then(|s| parse_date_string(s, tz))
    }
}

/// Byte offset of the closing `---` line within the block body
fn find_closing_fence(rest: &str) -> Option<usize> {
    if rest.starts_with("---") {
        return Some(0);
    }
    rest.find("\n---").map(|pos| pos + 1)
}

/// Does this line look like a `key: value` YAML entry?
fn looks_like_yaml_key(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return false;
    }
    let Some(colon_pos) = trimmed.find(':') else {
        return false;
    };
    let key = &trimmed[..colon_pos];
    let is_valid_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !matches!(key, "http" | "https" | "ftp");
    let after_colon = &trimmed[colon_pos + 1..];
    is_valid_key && (after_colon.is_empty() || after_colon.starts_with(' '))
}

/// Formats that carry their own offset
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S %:z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y/%m/%d %H:%M:%S %:z",
    "%Y/%m/%d %H:%M:%S %z",
    "%Y-%m-%dT%H:%M:%S%z",
];

/// Formats interpreted in the site timezone
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a front-matter date in the formats Hexo accepts
pub fn parse_date_string(s: &str, tz: Tz) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return localize(dt, tz);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return localize(d.and_hms_opt(0, 0, 0)?, tz);
        }
    }

    None
}

/// Attach `tz` to a wall-clock time; the earlier instant wins in a DST fold
fn localize(dt: NaiveDateTime, tz: Tz) -> Option<DateTime<FixedOffset>> {
    tz.from_local_datetime(&dt)
        .earliest()
        .map(|dt| dt.fixed_offset())
}
