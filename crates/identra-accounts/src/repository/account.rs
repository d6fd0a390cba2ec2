//! Account Repository Contract
//!
//! Storage engines implement this trait and normalize their native errors
//! into `AccountsError` before returning, so engine-specific error shapes
//! never leak past this layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::Account;
use crate::error::Result;

/// Pagination parameters (1-based page).
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}
fn default_limit() -> u32 {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    pub fn offset(&self) -> u32 {
        (self.page.saturating_sub(1)) * self.limit
    }
}

/// One page of results plus cursor metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            ((total as f64) / (limit as f64)).ceil() as u32
        };
        Self {
            data,
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// Persistence contract for accounts.
///
/// The service never caches account state across calls; implementations are
/// the sole writers of durable state. The compound recovery lookup must be
/// evaluated against the record state at fetch time.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Persist a new account. Fails with `Duplicate` on email conflict.
    async fn insert(&self, account: &Account) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// Compound recovery lookup: matches on email AND the currently stored
    /// recovery token, in one shot.
    async fn find_by_email_and_recovery_token(
        &self,
        email: &str,
        token: &str,
    ) -> Result<Option<Account>>;

    /// Replace the stored record. Fails with `NotFound` for unknown ids.
    async fn update(&self, account: &Account) -> Result<()>;

    /// Delete by id, returning whether a record was removed.
    async fn delete(&self, id: &str) -> Result<bool>;

    async fn find_page(&self, request: PageRequest) -> Result<Page<Account>>;

    async fn count(&self) -> Result<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_offset() {
        assert_eq!(PageRequest::new(1, 20).offset(), 0);
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
        assert_eq!(PageRequest::new(0, 10).offset(), 0);
    }

    #[test]
    fn test_page_metadata() {
        let page: Page<u32> = Page::new(vec![1, 2, 3], 1, 3, 7);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total, 7);
    }
}
