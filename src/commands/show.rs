//! Show a single post

use anyhow::Result;
use std::io::{self, Write};

use crate::content::Post;
use crate::helpers::date_xml;
use crate::Site;

/// Print the post with id `id`, as text or JSON
pub fn run(site: &Site, id: &str, json: bool) -> Result<()> {
    let store = site.load()?;
    let post = store.get_post(id)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(post)?)?;
    } else {
        write_post(post, &mut out)?;
    }
    Ok(())
}

/// Write a human-readable view of `post`
pub fn write_post<W: Write>(post: &Post, out: &mut W) -> Result<()> {
    writeln!(out, "id:         {}", post.id)?;
    writeln!(out, "title:      {}", post.title)?;
    writeln!(out, "date:       {}", date_xml(&post.date))?;
    if let Some(updated) = &post.updated {
        writeln!(out, "updated:    {}", date_xml(updated))?;
    }
    writeln!(out, "categories: {}", post.categories.join(" > "))?;
    writeln!(out, "tags:       {}", post.tags.join(", "))?;
    if !post.published {
        writeln!(out, "published:  false")?;
    }
    writeln!(out, "source:     {}", post.source)?;
    writeln!(out)?;
    write!(out, "{}", post.body)?;
    if !post.body.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}
