//! Main ledger orchestrator tying the chart, posting engine, and reports
//! together for the surrounding application

use serde::{Deserialize, Serialize};

use crate::ledger::chart;
use crate::ledger::posting::{
    BusinessEvent, ExpenseRecord, IncomeRecord, PostingEngine, PostingOutcome, ReceivableRecord,
    RefundRecord,
};
use crate::reports::trial_balance::{compute_trial_balance, TrialBalance};
use crate::traits::{JournalStorage, PostingObserver};
use crate::types::*;
use crate::utils::validation;

/// Summary of a journal rebuild run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebuildSummary {
    /// Events processed
    pub events: usize,
    /// Events that produced at least one entry
    pub posted: usize,
    /// Entries written in total
    pub entries: usize,
    /// Events with nothing to post (all amounts zero or negative)
    pub skipped: usize,
    /// Events that failed (unresolved account or storage error)
    pub failed: usize,
}

/// Ledger facade consumed by the surrounding CRUD application.
///
/// Handlers call the matching `post_*` operation right after persisting a
/// domain record; reporting endpoints call [`Ledger::trial_balance`] and
/// [`Ledger::journal`].
pub struct Ledger<S: JournalStorage> {
    engine: PostingEngine<S>,
}

impl<S: JournalStorage> Ledger<S> {
    /// Create a ledger over empty or already-seeded storage
    pub async fn open(storage: S) -> LedgerResult<Self> {
        Ok(Self {
            engine: PostingEngine::load(storage).await?,
        })
    }

    /// Replace the default log-based posting observer
    pub fn with_observer(mut self, observer: Box<dyn PostingObserver>) -> Self {
        self.engine = self.engine.with_observer(observer);
        self
    }

    /// Seed the fixed chart of accounts. Idempotent; returns the number of
    /// accounts inserted.
    pub async fn seed_chart(&mut self) -> LedgerResult<usize> {
        let inserted = chart::seed_chart(self.engine.storage_mut()).await?;
        if inserted > 0 {
            self.engine.reload_chart().await?;
        }
        Ok(inserted)
    }

    /// Create a user-defined (non-system) account
    pub async fn create_account(&mut self, account: Account) -> LedgerResult<Account> {
        validation::validate_account_code(&account.code)?;
        validation::validate_account_name(&account.name)?;

        let storage = self.engine.storage_mut();
        if storage.get_account(&account.code).await?.is_some() {
            return Err(LedgerError::Validation(format!(
                "Account with code '{}' already exists",
                account.code
            )));
        }
        if let Some(ref parent_code) = account.parent_code {
            if storage.get_account(parent_code).await?.is_none() {
                return Err(LedgerError::Validation(format!(
                    "Parent account '{parent_code}' does not exist"
                )));
            }
        }

        storage.save_account(&account).await?;
        self.engine.reload_chart().await?;
        Ok(account)
    }

    /// Get an account by code
    pub async fn account(&self, code: &str) -> LedgerResult<Option<Account>> {
        self.engine.storage().get_account(code).await
    }

    /// List the chart of accounts, optionally filtered by type
    pub async fn accounts(&self, account_type: Option<AccountType>) -> LedgerResult<Vec<Account>> {
        self.engine.storage().list_accounts(account_type).await
    }

    // Posting operations, one per source event type

    pub async fn post_income(&mut self, record: &IncomeRecord) -> LedgerResult<PostingOutcome> {
        self.engine.post_income(record).await
    }

    pub async fn post_receivable(
        &mut self,
        record: &ReceivableRecord,
    ) -> LedgerResult<PostingOutcome> {
        self.engine.post_receivable(record).await
    }

    pub async fn post_expense(&mut self, record: &ExpenseRecord) -> LedgerResult<PostingOutcome> {
        self.engine.post_expense(record).await
    }

    pub async fn post_refund(&mut self, record: &RefundRecord) -> LedgerResult<PostingOutcome> {
        self.engine.post_refund(record).await
    }

    /// Post any business event
    pub async fn post_event(&mut self, event: &BusinessEvent) -> LedgerResult<PostingOutcome> {
        self.engine.post_event(event).await
    }

    /// Post an event under the soft-failure policy: storage errors are logged
    /// and swallowed so the caller's business transaction proceeds regardless.
    /// Returns `None` when the posting could not be attempted to completion.
    pub async fn post_event_soft(&mut self, event: &BusinessEvent) -> Option<PostingOutcome> {
        match self.engine.post_event(event).await {
            Ok(outcome) => Some(outcome),
            Err(error) => {
                log::error!(
                    "posting {} {} failed: {error}",
                    event.source_type(),
                    event.source_id()
                );
                None
            }
        }
    }

    /// Compute the trial balance for one currency from the full journal
    pub async fn trial_balance(&self, currency: Currency) -> LedgerResult<TrialBalance> {
        let storage = self.engine.storage();
        let accounts = storage.list_accounts(None).await?;
        let entries = storage
            .list_entries(&JournalFilter {
                currency: Some(currency),
                ..Default::default()
            })
            .await?;
        Ok(compute_trial_balance(&accounts, &entries, currency))
    }

    /// Paginated journal listing for audit/drill-down display
    pub async fn journal(
        &self,
        filter: &JournalFilter,
        offset: usize,
        limit: usize,
    ) -> LedgerResult<JournalPage> {
        let storage = self.engine.storage();
        let total = storage.count_entries(filter).await?;
        let entries = storage
            .list_entries(filter)
            .await?
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect();
        Ok(JournalPage {
            entries,
            total,
            offset,
            limit,
        })
    }

    /// Clear the journal and re-derive every entry from the given business
    /// events. This is the recovery path for partial postings: individual
    /// event failures are counted, not propagated, so one bad record cannot
    /// abort the backfill.
    pub async fn rebuild_journal(
        &mut self,
        events: &[BusinessEvent],
    ) -> LedgerResult<RebuildSummary> {
        self.engine.storage_mut().clear_entries().await?;

        let mut summary = RebuildSummary {
            events: events.len(),
            posted: 0,
            entries: 0,
            skipped: 0,
            failed: 0,
        };

        for event in events {
            match self.engine.post_event(event).await {
                Ok(PostingOutcome::Posted(entries)) => {
                    summary.posted += 1;
                    summary.entries += entries.len();
                }
                Ok(PostingOutcome::NothingToPost) => summary.skipped += 1,
                Ok(PostingOutcome::AccountNotFound { .. }) => summary.failed += 1,
                Err(error) => {
                    log::error!(
                        "rebuild: posting {} {} failed: {error}",
                        event.source_type(),
                        event.source_id()
                    );
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}
