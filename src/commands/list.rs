//! List site content

use anyhow::Result;
use std::io::{self, Write};

use crate::content::{LabelCount, PostStore};
use crate::helpers::format_date;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let store = site.load()?;
    let stdout = io::stdout();
    write_listing(&store, content_type, &site.config.date_format, &mut stdout.lock())
}

/// Write the listing for `content_type` to `out`
pub fn write_listing<W: Write>(
    store: &PostStore,
    content_type: &str,
    date_format: &str,
    out: &mut W,
) -> Result<()> {
    match content_type {
        "post" | "posts" => {
            writeln!(out, "Posts ({}):", store.len())?;
            for post in store.list_posts() {
                writeln!(
                    out,
                    "  {}  {}  {}",
                    format_date(&post.date, date_format),
                    post.id,
                    post.title
                )?;
            }
        }
        "tag" | "tags" => write_counts(out, "Tags", &store.tags())?,
        "category" | "categories" => write_counts(out, "Categories", &store.categories())?,
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, category",
                content_type
            );
        }
    }

    Ok(())
}

fn write_counts<W: Write>(out: &mut W, heading: &str, counts: &[LabelCount]) -> Result<()> {
    writeln!(out, "{} ({}):", heading, counts.len())?;
    for label in counts {
        writeln!(out, "  {} ({})", label.name, label.count)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentLoader;
    use chrono_tz::Tz;
    use std::fs;
    use tempfile::TempDir;

    fn store() -> (TempDir, PostStore) {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("2021-02-03-swift-actors.md"),
            "---\ntitle: Swift actors\ndate: 2021-02-03\ncategories: [Swift]\ntags: [swift, concurrency]\n---\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("on-walking.md"),
            "---\ntitle: On walking\ndate: 2022-08-09\ncategories: [Life]\ntags: [essay, swift]\n---\n",
        )
        .unwrap();
        let store = ContentLoader::new(dir.path(), Tz::UTC).load();
        (dir, store)
    }

    fn listing(store: &PostStore, content_type: &str) -> String {
        let mut out = Vec::new();
        write_listing(store, content_type, "YYYY-MM-DD", &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_list_posts() {
        let (_dir, store) = store();
        assert_eq!(
            listing(&store, "post"),
            "Posts (2):\n  2022-08-09  2022-08-09-on-walking  On walking\n  2021-02-03  2021-02-03-swift-actors  Swift actors\n"
        );
    }

    #[test]
    fn test_list_tags() {
        let (_dir, store) = store();
        let out = listing(&store, "tags");
        assert!(out.starts_with("Tags (3):\n  swift (2)\n"));
    }

    #[test]
    fn test_unknown_type() {
        let (_dir, store) = store();
        let mut out = Vec::new();
        assert!(write_listing(&store, "route", "YYYY", &mut out).is_err());
    }
}
