//! The post store: all loaded posts, newest first, addressable by id

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;

use super::error::{ContentError, ContentResult};
use super::loader::LoadReport;
use super::{Post, PostId};

/// A tag or category with the number of posts carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub name: String,
    pub count: usize,
}

/// Read-only registry of posts
#[derive(Debug, Default)]
pub struct PostStore {
    /// Sorted by date descending, then id ascending
    posts: Vec<Post>,
    index: HashMap<PostId, usize>,
    report: LoadReport,
}

impl PostStore {
    /// Build a store from posts in load order. A post whose id was already
    /// taken by an earlier one is dropped and recorded in the report.
    pub fn new(posts: Vec<Post>, mut report: LoadReport) -> Self {
        let mut unique: Vec<Post> = Vec::with_capacity(posts.len());
        let mut seen = std::collections::HashSet::new();

        for post in posts {
            if seen.insert(post.id.clone()) {
                unique.push(post);
            } else {
                let id = post.id.clone();
                let path = post.full_source.clone();
                report.skip(path.clone(), ContentError::DuplicateId { id, path });
            }
        }

        unique.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));

        let index = unique
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();

        Self {
            posts: unique,
            index,
            report,
        }
    }

    /// All posts, most recent first. Call again to start over.
    pub fn list_posts(&self) -> Posts<'_> {
        Posts {
            inner: self.posts.iter(),
        }
    }

    /// Look up a post by its id
    pub fn get_post(&self, id: &str) -> ContentResult<&Post> {
        self.index
            .get(id)
            .map(|&i| &self.posts[i])
            .ok_or_else(|| ContentError::NotFound(PostId::from(id)))
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Files that failed to load
    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Posts carrying `tag`, most recent first
    pub fn posts_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Post> + Clone + 'a {
        self.list_posts().filter(move |p| p.has_tag(tag))
    }

    /// Posts filed under `category` at any level, most recent first
    pub fn posts_in_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a Post> + Clone + 'a {
        self.list_posts().filter(move |p| p.in_category(category))
    }

    /// Tags with post counts, most used first
    pub fn tags(&self) -> Vec<LabelCount> {
        count_labels(self.posts.iter().flat_map(|p| p.tags.iter()))
    }

    /// Categories with post counts, most used first
    pub fn categories(&self) -> Vec<LabelCount> {
        count_labels(self.posts.iter().flat_map(|p| p.categories.iter()))
    }
}

fn count_labels<'a>(labels: impl Iterator<Item = &'a String>) -> Vec<LabelCount> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for label in labels {
        *counts.entry(label.as_str()).or_insert(0) += 1;
    }
    let mut counts: Vec<LabelCount> = counts
        .into_iter()
        .map(|(name, count)| LabelCount {
            name: name.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    counts
}

/// Lazy iterator over a store's posts
#[derive(Debug, Clone)]
pub struct Posts<'a> {
    inner: std::slice::Iter<'a, Post>,
}

impl<'a> Iterator for Posts<'a> {
    type Item = &'a Post;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Posts<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for Posts<'_> {}

impl<'a> IntoIterator for &'a PostStore {
    type Item = &'a Post;
    type IntoIter = Posts<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.list_posts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentLoader;
    use chrono::{DateTime, FixedOffset, TimeZone};
    use chrono_tz::Tz;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn post(id: &str, date: DateTime<FixedOffset>, tags: &[&str], categories: &[&str]) -> Post {
        Post {
            id: PostId::from(id),
            title: id.to_uppercase(),
            date,
            updated: None,
            categories: categories.iter().map(|s| s.to_string()).collect(),
            tags: tags.iter().map(|s| s.to_string()).collect(),
            body: format!("Body of {}", id),
            published: true,
            source: format!("{}.md", id),
            full_source: PathBuf::from(format!("/blog/source/_posts/{}.md", id)),
            extra: Default::default(),
        }
    }

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
    }

    fn sample() -> PostStore {
        let plus8 = FixedOffset::east_opt(8 * 3600).unwrap();
        PostStore::new(
            vec![
                post("2020-01-01-a", utc(2020, 1, 1, 0), &["git"], &["Dev"]),
                post("2021-06-01-b", utc(2021, 6, 1, 0), &["swift", "swiftui"], &["Dev", "iOS"]),
                // 08:00 at +08:00 is midnight UTC, the same instant as `b`
                post(
                    "2021-06-01-c",
                    plus8.with_ymd_and_hms(2021, 6, 1, 8, 0, 0).unwrap(),
                    &["swift"],
                    &["Dev", "iOS"],
                ),
                post("2019-03-03-d", utc(2019, 3, 3, 12), &[], &["Life"]),
            ],
            LoadReport::default(),
        )
    }

    #[test]
    fn test_list_posts_newest_first() {
        let store = sample();
        let posts: Vec<_> = store.list_posts().collect();
        assert_eq!(posts.len(), 4);
        for pair in posts.windows(2) {
            assert!(pair[0].date >= pair[1].date);
        }
        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["2021-06-01-b", "2021-06-01-c", "2020-01-01-a", "2019-03-03-d"]);
    }

    #[test]
    fn test_list_posts_is_restartable() {
        let store = sample();
        let mut iter = store.list_posts();
        iter.next();
        let rest = iter.clone().count();
        assert_eq!(rest, 3);
        assert_eq!(iter.len(), 3);
        assert_eq!(store.list_posts().count(), 4);
        assert_eq!((&store).into_iter().count(), 4);
    }

    #[test]
    fn test_get_post_round_trip() {
        let store = sample();
        for p in store.list_posts() {
            assert_eq!(store.get_post(p.id.as_str()).unwrap(), p);
        }
    }

    #[test]
    fn test_get_post_not_found() {
        let store = sample();
        let err = store.get_post("1999-12-31-nope").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Post not found: 1999-12-31-nope");
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let store = PostStore::new(
            vec![
                post("2020-01-01-a", utc(2020, 1, 1, 0), &[], &["X"]),
                post("2020-01-01-a", utc(2020, 1, 2, 0), &[], &["Y"]),
            ],
            LoadReport::default(),
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_post("2020-01-01-a").unwrap().categories, vec!["X"]);
        assert!(matches!(
            store.report().skipped[0].error,
            ContentError::DuplicateId { .. }
        ));
        assert_eq!(
            store.report().skipped[0].path,
            PathBuf::from("/blog/source/_posts/2020-01-01-a.md")
        );
    }

    #[test]
    fn test_duplicate_files_report_full_path() {
        let dir = TempDir::new().unwrap();
        let front = "---\ntitle: Same\ndate: 2021-01-01\ncategories: X\n---\n";
        fs::write(dir.path().join("2021-01-01-same.md"), front).unwrap();
        fs::create_dir_all(dir.path().join("z")).unwrap();
        fs::write(dir.path().join("z/same.md"), front).unwrap();

        let store = ContentLoader::new(dir.path(), Tz::UTC).load();
        assert_eq!(store.len(), 1);
        let skipped = &store.report().skipped[0];
        assert_eq!(skipped.path, dir.path().join("z/same.md"));
        assert!(matches!(skipped.error, ContentError::DuplicateId { ref path, .. } if path == &skipped.path));
    }

    #[test]
    fn test_label_counts() {
        let store = sample();
        let tags = store.tags();
        assert_eq!(
            tags[0],
            LabelCount {
                name: "swift".to_string(),
                count: 2
            }
        );
        assert_eq!(tags.len(), 3);
        let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["swift", "git", "swiftui"]);

        let categories = store.categories();
        assert_eq!(categories[0].name, "Dev");
        assert_eq!(categories[0].count, 3);
    }

    #[test]
    fn test_filtered_views() {
        let store = sample();
        let swift: Vec<_> = store.posts_tagged("swift").map(|p| p.id.as_str()).collect();
        assert_eq!(swift, vec!["2021-06-01-b", "2021-06-01-c"]);
        assert_eq!(store.posts_in_category("Life").count(), 1);
        assert_eq!(store.posts_in_category("Nope").count(), 0);
    }

    #[test]
    fn test_loading_twice_is_deterministic() {
        let dir = TempDir::new().unwrap();
        for (name, date) in [
            ("b.md", "2021-01-01"),
            ("a.md", "2021-01-01"),
            ("2020-05-05-c.md", "2020-05-05 10:00:00"),
            ("d.md", "2022-02-02T12:00:00+09:00"),
        ] {
            fs::write(
                dir.path().join(name),
                format!("---\ntitle: {}\ndate: {}\ncategories: Notes\n---\nBody\n", name, date),
            )
            .unwrap();
        }

        let load = || ContentLoader::new(dir.path(), Tz::UTC).load();
        let first: Vec<Post> = load().list_posts().cloned().collect();
        let second: Vec<Post> = load().list_posts().cloned().collect();
        assert_eq!(first, second);

        let ids: Vec<_> = first.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["2022-02-02-d", "2021-01-01-a", "2021-01-01-b", "2020-05-05-c"]);
    }
}
