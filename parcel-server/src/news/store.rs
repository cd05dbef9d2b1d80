//! News post persistence.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use sqlx::sqlite::SqlitePool;

use super::slug::slugify;

/// Listing defaults: 5 posts per page, never more than 20.
const DEFAULT_PAGE_SIZE: i64 = 5;
const MAX_PAGE_SIZE: i64 = 20;

/// A full news post row.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NewsPost {
    pub id: i64,
    pub title: String,
    pub summary: Option<String>,
    pub cover_url: Option<String>,
    pub slug: Option<String>,
    pub content_html: String,
    /// Publication timestamp; `None` marks an unpublished draft.
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// The listing projection of a post (no body).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NewsSummary {
    pub id: i64,
    pub title: String,
    pub summary: Option<String>,
    pub cover_url: Option<String>,
    pub slug: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// One page of the news listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsPage {
    pub posts: Vec<NewsSummary>,
    /// Whether rows remain beyond this page.
    pub has_more: bool,
    /// Offset to request the next page with.
    pub next_offset: i64,
}

/// Editable fields of a post, as sent by the admin editor.
#[derive(Debug, Clone, Default)]
pub struct NewsDraft {
    pub title: String,
    pub summary: Option<String>,
    pub cover_url: Option<String>,
    pub slug: Option<String>,
    pub content_html: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// Data access for news posts.
#[derive(Clone)]
pub struct NewsStore {
    pool: SqlitePool,
}

impl NewsStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// One page of post summaries, newest first.
    ///
    /// Fetches one row beyond the page to learn whether more remain.
    /// Negative or missing parameters fall back to the defaults.
    pub async fn page(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<NewsPage, sqlx::Error> {
        let limit = limit
            .filter(|l| *l >= 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);
        let offset = offset.filter(|o| *o >= 0).unwrap_or(0);

        let mut posts: Vec<NewsSummary> = sqlx::query_as(
            "SELECT id, title, summary, cover_url, slug, published_at \
             FROM news ORDER BY published_at DESC, created_at DESC \
             LIMIT ? OFFSET ?",
        )
        .bind(limit + 1)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let has_more = posts.len() as i64 > limit;
        posts.truncate(limit as usize);
        let next_offset = offset + posts.len() as i64;

        Ok(NewsPage {
            posts,
            has_more,
            next_offset,
        })
    }

    /// Fetch a post by id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<NewsPost>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, title, summary, cover_url, slug, content_html, published_at, created_at \
             FROM news WHERE id = ? LIMIT 1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Fetch a post by slug.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<NewsPost>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, title, summary, cover_url, slug, content_html, published_at, created_at \
             FROM news WHERE slug = ? LIMIT 1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
    }

    /// Insert a new post. The slug falls back to one derived from the title.
    pub async fn create(&self, draft: &NewsDraft) -> Result<NewsPost, sqlx::Error> {
        sqlx::query_as(
            "INSERT INTO news \
                 (title, summary, cover_url, content_html, slug, published_at, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) \
             RETURNING id, title, summary, cover_url, slug, content_html, published_at, created_at",
        )
        .bind(&draft.title)
        .bind(&draft.summary)
        .bind(&draft.cover_url)
        .bind(&draft.content_html)
        .bind(normalized_slug(draft))
        .bind(draft.published_at)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    /// Replace the editable fields of a post.
    ///
    /// The admin editor always sends the complete payload, so this is a
    /// full replacement rather than a patch. Returns `None` for unknown ids.
    pub async fn update(
        &self,
        id: i64,
        draft: &NewsDraft,
    ) -> Result<Option<NewsPost>, sqlx::Error> {
        sqlx::query_as(
            "UPDATE news SET \
                 title = ?, summary = ?, cover_url = ?, content_html = ?, \
                 slug = ?, published_at = ? \
             WHERE id = ? \
             RETURNING id, title, summary, cover_url, slug, content_html, published_at, created_at",
        )
        .bind(&draft.title)
        .bind(&draft.summary)
        .bind(&draft.cover_url)
        .bind(&draft.content_html)
        .bind(normalized_slug(draft))
        .bind(draft.published_at)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a post. Returns the removed row, `None` for unknown ids.
    pub async fn delete(&self, id: i64) -> Result<Option<NewsPost>, sqlx::Error> {
        sqlx::query_as(
            "DELETE FROM news WHERE id = ? \
             RETURNING id, title, summary, cover_url, slug, content_html, published_at, created_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }
}

/// The draft's own slug when usable, else one derived from the title.
fn normalized_slug(draft: &NewsDraft) -> Option<String> {
    draft
        .slug
        .clone()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| slugify(&draft.title))
}
