//! News article storage trait.

use crate::StoreError;
use heritage_types::{NewNewsArticle, NewsArticle, NewsId, NewsSection, Timestamp};

pub trait NewsStore {
    fn put_news(
        &self,
        article: &NewNewsArticle,
        created_at: Timestamp,
    ) -> Result<NewsArticle, StoreError>;

    fn get_news(&self, id: NewsId) -> Result<NewsArticle, StoreError>;

    /// Articles newest first, optionally restricted to one section.
    /// Skips `offset` matching articles and returns at most `limit`.
    fn list_news(
        &self,
        section: Option<NewsSection>,
        offset: u64,
        limit: usize,
    ) -> Result<Vec<NewsArticle>, StoreError>;

    /// Returns `false` if the article did not exist.
    fn delete_news(&self, id: NewsId) -> Result<bool, StoreError>;
}
