//! In-Memory Account Repository
//!
//! Reference implementation backed by a single `RwLock`d map. Lookups and
//! updates each take the lock once, so a recovery-token consumption that
//! races another sees either the token present or already cleared.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::Account;
use crate::error::{AccountsError, Result};
use crate::repository::{AccountRepository, Page, PageRequest};

#[derive(Default)]
pub struct MemoryAccountRepository {
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn insert(&self, account: &Account) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.email == account.email) {
            return Err(AccountsError::duplicate("Account", "email", &account.email));
        }
        accounts.insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>> {
        Ok(self.accounts.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn find_by_email_and_recovery_token(
        &self,
        email: &str,
        token: &str,
    ) -> Result<Option<Account>> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.email == email && a.new_password_token.as_deref() == Some(token))
            .cloned())
    }

    async fn update(&self, account: &Account) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(&account.id) {
            Some(stored) => {
                *stored = account.clone();
                Ok(())
            }
            None => Err(AccountsError::not_found("Account", &account.id)),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.accounts.write().await.remove(id).is_some())
    }

    async fn find_page(&self, request: PageRequest) -> Result<Page<Account>> {
        let accounts = self.accounts.read().await;
        let total = accounts.len() as u64;

        let mut all: Vec<Account> = accounts.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let data = all
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.limit as usize)
            .collect();

        Ok(Page::new(data, request.page, request.limit, total))
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.accounts.read().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(email: &str) -> Account {
        Account::new(email, "hash", "tok")
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = MemoryAccountRepository::new();
        let a = account("a@example.com");
        repo.insert(&a).await.unwrap();

        let found = repo.find_by_id(&a.id).await.unwrap().unwrap();
        assert_eq!(found.email, "a@example.com");

        let by_email = repo.find_by_email("a@example.com").await.unwrap();
        assert!(by_email.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = MemoryAccountRepository::new();
        repo.insert(&account("a@example.com")).await.unwrap();

        let err = repo.insert(&account("a@example.com")).await.unwrap_err();
        assert!(matches!(err, AccountsError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_compound_recovery_lookup() {
        let repo = MemoryAccountRepository::new();
        let mut a = account("a@example.com");
        a.issue_recovery_token("recover-1");
        repo.insert(&a).await.unwrap();

        // Right email, wrong token
        let miss = repo
            .find_by_email_and_recovery_token("a@example.com", "wrong")
            .await
            .unwrap();
        assert!(miss.is_none());

        // Wrong email, right token
        let miss = repo
            .find_by_email_and_recovery_token("b@example.com", "recover-1")
            .await
            .unwrap();
        assert!(miss.is_none());

        let hit = repo
            .find_by_email_and_recovery_token("a@example.com", "recover-1")
            .await
            .unwrap();
        assert!(hit.is_some());
    }

    #[tokio::test]
    async fn test_update_unknown_id_fails() {
        let repo = MemoryAccountRepository::new();
        let err = repo.update(&account("a@example.com")).await.unwrap_err();
        assert!(matches!(err, AccountsError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = MemoryAccountRepository::new();
        let a = account("a@example.com");
        repo.insert(&a).await.unwrap();

        assert!(repo.delete(&a.id).await.unwrap());
        assert!(!repo.delete(&a.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_pagination() {
        let repo = MemoryAccountRepository::new();
        for i in 0..5 {
            repo.insert(&account(&format!("user{i}@example.com")))
                .await
                .unwrap();
        }

        let page = repo.find_page(PageRequest::new(1, 2)).await.unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);

        let last = repo.find_page(PageRequest::new(3, 2)).await.unwrap();
        assert_eq!(last.data.len(), 1);
    }
}
