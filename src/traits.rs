//! Traits for storage abstraction and posting observability

use async_trait::async_trait;

use crate::types::*;

/// Storage abstraction for the journal and chart of accounts.
///
/// This trait allows the posting core to work with any storage backend
/// (PostgreSQL, MySQL, SQLite, in-memory, etc.) by implementing these methods.
/// Accounts are keyed by their stable `code`, not a database identifier.
#[async_trait]
pub trait JournalStorage: Send + Sync {
    /// Save an account. Used by the seed script and by user-defined accounts.
    async fn save_account(&mut self, account: &Account) -> LedgerResult<()>;

    /// Get an account by code
    async fn get_account(&self, code: &str) -> LedgerResult<Option<Account>>;

    /// List all accounts, optionally filtered by type
    async fn list_accounts(&self, account_type: Option<AccountType>) -> LedgerResult<Vec<Account>>;

    /// Append a journal entry. Entries are immutable once written.
    async fn append_entry(&mut self, entry: &JournalEntry) -> LedgerResult<()>;

    /// List journal entries matching the filter, oldest first
    async fn list_entries(&self, filter: &JournalFilter) -> LedgerResult<Vec<JournalEntry>>;

    /// Count journal entries matching the filter
    async fn count_entries(&self, filter: &JournalFilter) -> LedgerResult<usize>;

    /// Delete every journal entry. Only the rebuild utility calls this.
    async fn clear_entries(&mut self) -> LedgerResult<()>;
}

/// Observer for posting failures and skips.
///
/// Posting never blocks the business transaction that triggered it, so
/// failures surface here instead of propagating to the end user. Plug in a
/// metrics or alerting implementation to make silent ledger drift detectable.
pub trait PostingObserver: Send + Sync {
    /// A referenced account code could not be resolved; the event was not
    /// posted (or only partially posted).
    fn account_not_found(&self, source_type: SourceType, source_id: &str, code: &str);

    /// An event produced no entries because every candidate amount was zero
    /// or negative. Not an error.
    fn nothing_to_post(&self, source_type: SourceType, source_id: &str);

    /// A storage write failed mid-event; earlier entries for the event are
    /// not rolled back.
    fn storage_failure(&self, source_type: SourceType, source_id: &str, error: &LedgerError);
}

/// Default observer that reports through the `log` crate
pub struct LogObserver;

impl PostingObserver for LogObserver {
    fn account_not_found(&self, source_type: SourceType, source_id: &str, code: &str) {
        log::error!("posting {source_type} {source_id}: account '{code}' not found, entry skipped");
    }

    fn nothing_to_post(&self, source_type: SourceType, source_id: &str) {
        log::debug!("posting {source_type} {source_id}: no positive amounts, nothing posted");
    }

    fn storage_failure(&self, source_type: SourceType, source_id: &str, error: &LedgerError) {
        log::error!("posting {source_type} {source_id}: storage failure: {error}");
    }
}
