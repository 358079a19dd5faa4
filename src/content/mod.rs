//! Content module - post model, front-matter parsing, loading and lookup

mod error;
mod frontmatter;
pub mod loader;
mod post;
mod store;

pub use error::{ContentError, ContentResult};
pub use frontmatter::{parse_date_string, FrontMatter};
pub use loader::{ContentLoader, LoadReport, SkippedPost};
pub use post::{Post, PostId, MORE_MARKER};
pub use store::{LabelCount, PostStore, Posts};
