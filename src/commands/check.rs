//! Check posts for problems the author should fix

use anyhow::Result;
use std::io::{self, Write};

use crate::content::PostStore;
use crate::Site;

/// Report skipped posts and convention warnings.
///
/// Returns the number of posts that failed to load.
pub fn run(site: &Site) -> Result<usize> {
    let store = site.load()?;
    let stdout = io::stdout();
    write_report(&store, &mut stdout.lock())
}

pub fn write_report<W: Write>(store: &PostStore, out: &mut W) -> Result<usize> {
    let skipped = &store.report().skipped;

    for entry in skipped {
        writeln!(out, "error: {}", entry.error)?;
    }

    for post in store.list_posts() {
        let tags: Vec<_> = post.non_lowercase_tags().collect();
        if !tags.is_empty() {
            writeln!(
                out,
                "warning: {} has non-lowercase tags: {}",
                post.id,
                tags.join(", ")
            )?;
        }
    }

    writeln!(
        out,
        "{} posts loaded, {} skipped",
        store.len(),
        skipped.len()
    )?;

    Ok(skipped.len())
}
