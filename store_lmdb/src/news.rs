//! LMDB implementation of NewsStore.
//!
//! Ids are allocated in creation order, so a reverse key scan yields the
//! newest articles first.

use heritage_store::news::NewsStore;
use heritage_store::StoreError;
use heritage_types::{NewNewsArticle, NewsArticle, NewsId, NewsSection, Timestamp};

use crate::meta::NEWS_SEQ;
use crate::{LmdbEnvironment, LmdbError};

impl NewsStore for LmdbEnvironment {
    fn put_news(
        &self,
        article: &NewNewsArticle,
        created_at: Timestamp,
    ) -> Result<NewsArticle, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let id = NewsId::new(self.next_id(&mut wtxn, NEWS_SEQ)?);
        let stored = article.clone().into_article(id, created_at);
        let bytes = bincode::serialize(&stored).map_err(LmdbError::from)?;
        self.news_db
            .put(&mut wtxn, &id.to_key(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(stored)
    }

    fn get_news(&self, id: NewsId) -> Result<NewsArticle, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .news_db
            .get(&rtxn, &id.to_key())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("news {id}")))?;
        let article: NewsArticle = bincode::deserialize(val).map_err(LmdbError::from)?;
        Ok(article)
    }

    fn list_news(
        &self,
        section: Option<NewsSection>,
        offset: u64,
        limit: usize,
    ) -> Result<Vec<NewsArticle>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.news_db.rev_iter(&rtxn).map_err(LmdbError::from)?;
        let mut skipped = 0u64;
        let mut results = Vec::new();
        for entry in iter {
            if results.len() >= limit {
                break;
            }
            let (_key, val) = entry.map_err(LmdbError::from)?;
            let article: NewsArticle = bincode::deserialize(val).map_err(LmdbError::from)?;
            if section.is_some_and(|s| s != article.section) {
                continue;
            }
            if skipped < offset {
                skipped += 1;
                continue;
            }
            results.push(article);
        }
        Ok(results)
    }

    fn delete_news(&self, id: NewsId) -> Result<bool, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let existed = self
            .news_db
            .delete(&mut wtxn, &id.to_key())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(existed)
    }
}
