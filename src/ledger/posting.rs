//! Journal posting engine: translates completed business events into
//! balanced debit/credit journal entries

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ledger::chart::{codes, ChartIndex};
use crate::traits::{JournalStorage, LogObserver, PostingObserver};
use crate::types::*;

/// An income record as persisted by the surrounding application.
///
/// Fixed category amounts default to zero when a category was left blank;
/// `custom_items` holds ad-hoc labeled amounts outside the fixed categories.
/// `total` is the record's own total, used verbatim for project income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub id: String,
    pub date: NaiveDate,
    pub currency: Currency,
    pub assembly_id: String,
    pub project_id: Option<String>,
    pub offering: BigDecimal,
    pub tithe: BigDecimal,
    pub feast_badges: BigDecimal,
    pub firewood: BigDecimal,
    pub instruments: BigDecimal,
    pub pastors_welfare: BigDecimal,
    pub custom_items: HashMap<String, BigDecimal>,
    pub total: BigDecimal,
}

/// Cash physically received from an assembly against its receivable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivableRecord {
    pub id: String,
    pub date: NaiveDate,
    pub currency: Currency,
    pub assembly_id: String,
    pub amount: BigDecimal,
    pub payment_method: PaymentMethod,
    /// Cash was immediately forwarded to the pastor on receipt
    pub sent_to_pastor: bool,
}

/// An expense incurred by an assembly or project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: String,
    pub date: NaiveDate,
    pub currency: Currency,
    pub assembly_id: String,
    pub amount: BigDecimal,
    pub payment_source: PaymentSource,
    pub project_id: Option<String>,
    pub description: String,
}

/// Repayment to a person who fronted an expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundRecord {
    pub id: String,
    pub date: NaiveDate,
    pub currency: Currency,
    pub amount: BigDecimal,
    pub expense_id: String,
}

/// A business event the posting engine knows how to mirror into the journal.
/// Used by the rebuild utility to re-derive the journal from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BusinessEvent {
    Income(IncomeRecord),
    Receivable(ReceivableRecord),
    Expense(ExpenseRecord),
    Refund(RefundRecord),
}

impl BusinessEvent {
    pub fn source_type(&self) -> SourceType {
        match self {
            BusinessEvent::Income(_) => SourceType::Income,
            BusinessEvent::Receivable(_) => SourceType::Receivable,
            BusinessEvent::Expense(_) => SourceType::Expense,
            BusinessEvent::Refund(_) => SourceType::Refund,
        }
    }

    pub fn source_id(&self) -> &str {
        match self {
            BusinessEvent::Income(r) => &r.id,
            BusinessEvent::Receivable(r) => &r.id,
            BusinessEvent::Expense(r) => &r.id,
            BusinessEvent::Refund(r) => &r.id,
        }
    }
}

/// Result of posting one business event.
///
/// Account-resolution failure is an outcome, not an `Err`: the caller is
/// expected to log and continue so that ledger trouble never blocks the
/// business record that triggered the posting. Storage write errors still
/// propagate as `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum PostingOutcome {
    /// All derived entries were written
    Posted(Vec<JournalEntry>),
    /// Every candidate amount was zero or negative; nothing was written
    NothingToPost,
    /// A referenced account code is missing from the chart; nothing was
    /// written for this event
    AccountNotFound { code: String },
}

impl PostingOutcome {
    pub fn is_posted(&self) -> bool {
        matches!(self, PostingOutcome::Posted(_))
    }

    /// Entries written for this event, empty unless posted
    pub fn entries(&self) -> &[JournalEntry] {
        match self {
            PostingOutcome::Posted(entries) => entries,
            _ => &[],
        }
    }
}

/// Translates business events into balanced journal entries and persists them.
///
/// Every entry carries one debit leg and one credit leg of equal amount, so
/// each posting operation is balanced by construction. Multi-entry events are
/// not written atomically: a storage failure partway through leaves the
/// earlier entries in place, and the journal rebuild utility is the recovery
/// path.
pub struct PostingEngine<S: JournalStorage> {
    storage: S,
    chart: ChartIndex,
    observer: Box<dyn PostingObserver>,
}

impl<S: JournalStorage> PostingEngine<S> {
    /// Create an engine over an already-loaded chart index
    pub fn new(storage: S, chart: ChartIndex) -> Self {
        Self {
            storage,
            chart,
            observer: Box::new(LogObserver),
        }
    }

    /// Create an engine, loading the chart of accounts from storage
    pub async fn load(storage: S) -> LedgerResult<Self> {
        let chart = ChartIndex::load(&storage).await?;
        Ok(Self::new(storage, chart))
    }

    /// Replace the default log-based observer
    pub fn with_observer(mut self, observer: Box<dyn PostingObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Re-read the chart of accounts from storage, e.g. after seeding
    pub async fn reload_chart(&mut self) -> LedgerResult<()> {
        self.chart = ChartIndex::load(&self.storage).await?;
        Ok(())
    }

    pub fn chart(&self) -> &ChartIndex {
        &self.chart
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Post an income record.
    ///
    /// Income tagged with a project posts a single receivable-to-project
    /// entry for the full total. Untagged income posts one entry per nonzero
    /// fixed category plus one aggregated entry for custom items. Income owed
    /// by an assembly stays in Accounts Receivable until cash changes hands.
    pub async fn post_income(&mut self, record: &IncomeRecord) -> LedgerResult<PostingOutcome> {
        let reference = format!("INC-{}", record.id);
        let mut planned = Vec::new();

        let mut push = |credit_code: &str, amount: &BigDecimal, description: String| {
            if is_positive(amount) {
                planned.push(JournalEntry::new(
                    record.date,
                    codes::ACCOUNTS_RECEIVABLE,
                    credit_code,
                    amount.clone(),
                    record.currency,
                    description,
                    reference.clone(),
                    SourceType::Income,
                    record.id.clone(),
                    Some(record.assembly_id.clone()),
                ));
            }
        };

        if record.project_id.is_some() {
            push(
                codes::PROJECT_INCOME,
                &record.total,
                "Project income".to_string(),
            );
        } else {
            let categories: [(&BigDecimal, &str, &str); 6] = [
                (&record.offering, codes::OFFERINGS, "Offering income"),
                (&record.tithe, codes::TITHES, "Tithe income"),
                (&record.feast_badges, codes::FEAST_BADGES, "Feast badges income"),
                (&record.firewood, codes::FIREWOOD, "Firewood income"),
                (&record.instruments, codes::INSTRUMENTS, "Instruments income"),
                (
                    &record.pastors_welfare,
                    codes::PASTORS_WELFARE,
                    "Pastor's welfare income",
                ),
            ];
            for (amount, code, description) in categories {
                push(code, amount, description.to_string());
            }

            let custom_total: BigDecimal = record.custom_items.values().sum();
            push(codes::OTHER_INCOME, &custom_total, "Other income".to_string());
        }

        self.commit(SourceType::Income, &record.id, planned).await
    }

    /// Post a receivable settlement: cash received reduces the assembly's
    /// outstanding receivable and lands in the cash account selected by the
    /// payment method.
    ///
    /// When the cash was immediately sent on to the pastor, a second entry of
    /// the same amount records the remittance and removes the cash again. The
    /// remittance liability has no clearing entry anywhere in the system; the
    /// debit side of Pastor Remittance Payable only ever accumulates.
    pub async fn post_receivable(
        &mut self,
        record: &ReceivableRecord,
    ) -> LedgerResult<PostingOutcome> {
        let mut planned = Vec::new();

        if is_positive(&record.amount) {
            let cash_code = match record.payment_method {
                PaymentMethod::Cash => codes::CASH_AT_HAND,
                PaymentMethod::Ecocash => codes::BANK_ECOCASH,
            };
            let reference = format!("RCV-{}", record.id);

            planned.push(JournalEntry::new(
                record.date,
                cash_code,
                codes::ACCOUNTS_RECEIVABLE,
                record.amount.clone(),
                record.currency,
                "Cash received from assembly",
                reference.clone(),
                SourceType::Receivable,
                record.id.clone(),
                Some(record.assembly_id.clone()),
            ));

            if record.sent_to_pastor {
                planned.push(JournalEntry::new(
                    record.date,
                    codes::PASTOR_REMITTANCE_PAYABLE,
                    cash_code,
                    record.amount.clone(),
                    record.currency,
                    "Cash forwarded to pastor",
                    reference,
                    SourceType::Receivable,
                    record.id.clone(),
                    Some(record.assembly_id.clone()),
                ));
            }
        }

        self.commit(SourceType::Receivable, &record.id, planned)
            .await
    }

    /// Post an expense: debit Project or General Expenses depending on
    /// project attribution, credit the account the money came from.
    pub async fn post_expense(&mut self, record: &ExpenseRecord) -> LedgerResult<PostingOutcome> {
        let mut planned = Vec::new();

        if is_positive(&record.amount) {
            let debit_code = if record.project_id.is_some() {
                codes::PROJECT_EXPENSES
            } else {
                codes::GENERAL_EXPENSES
            };
            let credit_code = match record.payment_source {
                PaymentSource::OwedPerson => codes::ACCOUNTS_PAYABLE,
                PaymentSource::Ecocash => codes::BANK_ECOCASH,
                PaymentSource::CashAtHand => codes::CASH_AT_HAND,
            };

            planned.push(JournalEntry::new(
                record.date,
                debit_code,
                credit_code,
                record.amount.clone(),
                record.currency,
                record.description.clone(),
                format!("EXP-{}", record.id),
                SourceType::Expense,
                record.id.clone(),
                Some(record.assembly_id.clone()),
            ));
        }

        self.commit(SourceType::Expense, &record.id, planned).await
    }

    /// Post a refund: cash leaves to repay the person who fronted an
    /// expense, reducing the payable owed to them.
    pub async fn post_refund(&mut self, record: &RefundRecord) -> LedgerResult<PostingOutcome> {
        let mut planned = Vec::new();

        if is_positive(&record.amount) {
            planned.push(JournalEntry::new(
                record.date,
                codes::ACCOUNTS_PAYABLE,
                codes::CASH_AT_HAND,
                record.amount.clone(),
                record.currency,
                format!("Refund for expense {}", record.expense_id),
                format!("RFD-{}", record.id),
                SourceType::Refund,
                record.id.clone(),
                None,
            ));
        }

        self.commit(SourceType::Refund, &record.id, planned).await
    }

    /// Dispatch an event to the matching posting operation
    pub async fn post_event(&mut self, event: &BusinessEvent) -> LedgerResult<PostingOutcome> {
        match event {
            BusinessEvent::Income(r) => self.post_income(r).await,
            BusinessEvent::Receivable(r) => self.post_receivable(r).await,
            BusinessEvent::Expense(r) => self.post_expense(r).await,
            BusinessEvent::Refund(r) => self.post_refund(r).await,
        }
    }

    /// Resolve every leg against the chart before writing anything, then
    /// append the planned entries. Account lookup failures cannot leave a
    /// partial posting; storage failures can, and the observer is told.
    async fn commit(
        &mut self,
        source_type: SourceType,
        source_id: &str,
        planned: Vec<JournalEntry>,
    ) -> LedgerResult<PostingOutcome> {
        if planned.is_empty() {
            self.observer.nothing_to_post(source_type, source_id);
            return Ok(PostingOutcome::NothingToPost);
        }

        for entry in &planned {
            for code in [&entry.debit_code, &entry.credit_code] {
                if !self.chart.contains(code) {
                    self.observer.account_not_found(source_type, source_id, code);
                    return Ok(PostingOutcome::AccountNotFound { code: code.clone() });
                }
            }
        }

        for entry in &planned {
            if let Err(error) = self.storage.append_entry(entry).await {
                self.observer.storage_failure(source_type, source_id, &error);
                return Err(error);
            }
        }

        Ok(PostingOutcome::Posted(planned))
    }
}

fn is_positive(amount: &BigDecimal) -> bool {
    *amount > BigDecimal::from(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::chart::seed_chart;
    use crate::utils::memory_storage::MemoryStorage;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 12).unwrap()
    }

    async fn seeded_engine() -> PostingEngine<MemoryStorage> {
        let mut storage = MemoryStorage::new();
        seed_chart(&mut storage).await.unwrap();
        PostingEngine::load(storage).await.unwrap()
    }

    fn income(offering: i64, tithe: i64) -> IncomeRecord {
        IncomeRecord {
            id: "inc-1".to_string(),
            date: date(),
            currency: Currency::Usd,
            assembly_id: "asm-1".to_string(),
            project_id: None,
            offering: BigDecimal::from(offering),
            tithe: BigDecimal::from(tithe),
            feast_badges: BigDecimal::from(0),
            firewood: BigDecimal::from(0),
            instruments: BigDecimal::from(0),
            pastors_welfare: BigDecimal::from(0),
            custom_items: HashMap::new(),
            total: BigDecimal::from(offering + tithe),
        }
    }

    #[tokio::test]
    async fn income_splits_by_category_and_skips_zero() {
        let mut engine = seeded_engine().await;

        let outcome = engine.post_income(&income(100, 50)).await.unwrap();
        let entries = outcome.entries();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].debit_code, codes::ACCOUNTS_RECEIVABLE);
        assert_eq!(entries[0].credit_code, codes::OFFERINGS);
        assert_eq!(entries[0].amount, BigDecimal::from(100));

        assert_eq!(entries[1].debit_code, codes::ACCOUNTS_RECEIVABLE);
        assert_eq!(entries[1].credit_code, codes::TITHES);
        assert_eq!(entries[1].amount, BigDecimal::from(50));

        assert!(entries.iter().all(|e| e.reference == "INC-inc-1"));
        assert!(entries
            .iter()
            .all(|e| e.assembly_id.as_deref() == Some("asm-1")));
    }

    #[tokio::test]
    async fn income_entry_amounts_sum_to_total() {
        let mut engine = seeded_engine().await;

        let mut record = income(100, 50);
        record.feast_badges = BigDecimal::from(25);
        record.custom_items.insert("Thanksgiving".to_string(), BigDecimal::from(10));
        record.custom_items.insert("Building".to_string(), BigDecimal::from(5));
        record.total = BigDecimal::from(190);

        let outcome = engine.post_income(&record).await.unwrap();
        let posted: BigDecimal = outcome.entries().iter().map(|e| e.amount.clone()).sum();
        assert_eq!(posted, record.total);

        // Custom items are aggregated into a single Other Income entry
        let other: Vec<_> = outcome
            .entries()
            .iter()
            .filter(|e| e.credit_code == codes::OTHER_INCOME)
            .collect();
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].amount, BigDecimal::from(15));
    }

    #[tokio::test]
    async fn project_income_posts_single_entry_for_total() {
        let mut engine = seeded_engine().await;

        let mut record = income(100, 50);
        record.project_id = Some("proj-7".to_string());
        record.total = BigDecimal::from(150);

        let outcome = engine.post_income(&record).await.unwrap();
        let entries = outcome.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].credit_code, codes::PROJECT_INCOME);
        assert_eq!(entries[0].amount, BigDecimal::from(150));
    }

    #[tokio::test]
    async fn all_zero_income_posts_nothing() {
        let mut engine = seeded_engine().await;

        let outcome = engine.post_income(&income(0, 0)).await.unwrap();
        assert_eq!(outcome, PostingOutcome::NothingToPost);
    }

    #[tokio::test]
    async fn receivable_posts_one_entry_without_remittance() {
        let mut engine = seeded_engine().await;

        let record = ReceivableRecord {
            id: "rcv-1".to_string(),
            date: date(),
            currency: Currency::Usd,
            assembly_id: "asm-1".to_string(),
            amount: BigDecimal::from(150),
            payment_method: PaymentMethod::Cash,
            sent_to_pastor: false,
        };

        let outcome = engine.post_receivable(&record).await.unwrap();
        let entries = outcome.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].debit_code, codes::CASH_AT_HAND);
        assert_eq!(entries[0].credit_code, codes::ACCOUNTS_RECEIVABLE);
    }

    #[tokio::test]
    async fn receivable_sent_to_pastor_posts_two_equal_entries() {
        let mut engine = seeded_engine().await;

        let record = ReceivableRecord {
            id: "rcv-2".to_string(),
            date: date(),
            currency: Currency::Zwl,
            assembly_id: "asm-2".to_string(),
            amount: BigDecimal::from(80),
            payment_method: PaymentMethod::Ecocash,
            sent_to_pastor: true,
        };

        let outcome = engine.post_receivable(&record).await.unwrap();
        let entries = outcome.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].debit_code, codes::BANK_ECOCASH);
        assert_eq!(entries[0].credit_code, codes::ACCOUNTS_RECEIVABLE);
        assert_eq!(entries[1].debit_code, codes::PASTOR_REMITTANCE_PAYABLE);
        assert_eq!(entries[1].credit_code, codes::BANK_ECOCASH);
        assert_eq!(entries[0].amount, entries[1].amount);
    }

    #[tokio::test]
    async fn expense_legs_follow_project_and_payment_source() {
        let mut engine = seeded_engine().await;

        let mut record = ExpenseRecord {
            id: "exp-1".to_string(),
            date: date(),
            currency: Currency::Usd,
            assembly_id: "asm-1".to_string(),
            amount: BigDecimal::from(40),
            payment_source: PaymentSource::CashAtHand,
            project_id: None,
            description: "Fuel".to_string(),
        };

        let outcome = engine.post_expense(&record).await.unwrap();
        let entry = &outcome.entries()[0];
        assert_eq!(entry.debit_code, codes::GENERAL_EXPENSES);
        assert_eq!(entry.credit_code, codes::CASH_AT_HAND);

        record.id = "exp-2".to_string();
        record.project_id = Some("proj-1".to_string());
        record.payment_source = PaymentSource::OwedPerson;
        let outcome = engine.post_expense(&record).await.unwrap();
        let entry = &outcome.entries()[0];
        assert_eq!(entry.debit_code, codes::PROJECT_EXPENSES);
        assert_eq!(entry.credit_code, codes::ACCOUNTS_PAYABLE);

        record.id = "exp-3".to_string();
        record.project_id = None;
        record.payment_source = PaymentSource::Ecocash;
        let outcome = engine.post_expense(&record).await.unwrap();
        let entry = &outcome.entries()[0];
        assert_eq!(entry.debit_code, codes::GENERAL_EXPENSES);
        assert_eq!(entry.credit_code, codes::BANK_ECOCASH);
    }

    #[tokio::test]
    async fn refund_repays_owed_person_from_cash() {
        let mut engine = seeded_engine().await;

        let record = RefundRecord {
            id: "rfd-1".to_string(),
            date: date(),
            currency: Currency::Usd,
            amount: BigDecimal::from(25),
            expense_id: "exp-9".to_string(),
        };

        let outcome = engine.post_refund(&record).await.unwrap();
        let entries = outcome.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].debit_code, codes::ACCOUNTS_PAYABLE);
        assert_eq!(entries[0].credit_code, codes::CASH_AT_HAND);
        assert_eq!(entries[0].reference, "RFD-rfd-1");
    }

    #[tokio::test]
    async fn missing_account_is_an_outcome_not_an_error() {
        // Unseeded chart: every code resolution fails softly
        let storage = MemoryStorage::new();
        let mut engine = PostingEngine::load(storage).await.unwrap();

        let outcome = engine.post_income(&income(100, 0)).await.unwrap();
        assert!(matches!(outcome, PostingOutcome::AccountNotFound { .. }));

        // Nothing was written
        let entries = engine
            .storage()
            .list_entries(&JournalFilter::default())
            .await
            .unwrap();
        assert!(entries.is_empty());
    }
}
