//! In-memory storage implementation for testing and development

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::traits::JournalStorage;
use crate::types::*;

/// In-memory journal storage backed by shared maps. Clones share state, so a
/// ledger and a test can observe the same journal.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
    entries: Arc<RwLock<Vec<JournalEntry>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.accounts.write().unwrap().clear();
        self.entries.write().unwrap().clear();
    }
}

#[async_trait]
impl JournalStorage for MemoryStorage {
    async fn save_account(&mut self, account: &Account) -> LedgerResult<()> {
        self.accounts
            .write()
            .unwrap()
            .insert(account.code.clone(), account.clone());
        Ok(())
    }

    async fn get_account(&self, code: &str) -> LedgerResult<Option<Account>> {
        Ok(self.accounts.read().unwrap().get(code).cloned())
    }

    async fn list_accounts(&self, account_type: Option<AccountType>) -> LedgerResult<Vec<Account>> {
        let accounts = self.accounts.read().unwrap();
        let mut filtered: Vec<Account> = accounts
            .values()
            .filter(|account| account_type.is_none_or(|t| account.account_type == t))
            .cloned()
            .collect();
        filtered.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(filtered)
    }

    async fn append_entry(&mut self, entry: &JournalEntry) -> LedgerResult<()> {
        self.entries.write().unwrap().push(entry.clone());
        Ok(())
    }

    async fn list_entries(&self, filter: &JournalFilter) -> LedgerResult<Vec<JournalEntry>> {
        Ok(self
            .entries
            .read()
            .unwrap()
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect())
    }

    async fn count_entries(&self, filter: &JournalFilter) -> LedgerResult<usize> {
        Ok(self
            .entries
            .read()
            .unwrap()
            .iter()
            .filter(|entry| filter.matches(entry))
            .count())
    }

    async fn clear_entries(&mut self) -> LedgerResult<()> {
        self.entries.write().unwrap().clear();
        Ok(())
    }
}
