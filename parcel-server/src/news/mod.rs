//! News post storage and helpers.

mod slug;
mod store;

pub use slug::slugify;
pub use store::{NewsDraft, NewsPage, NewsPost, NewsStore, NewsSummary};
