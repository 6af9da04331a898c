//! Core types and data structures for the assembly ledger

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Account types following standard accounting principles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Assets - what the organization holds (Cash, Receivables, Inventory)
    Asset,
    /// Liabilities - what the organization owes (Payables, Remittances)
    Liability,
    /// Equity - the organization's own funds
    Equity,
    /// Revenue - money earned (Offerings, Tithes, Project Income, etc.)
    Revenue,
    /// Expenses - costs incurred
    Expense,
}

impl AccountType {
    /// Returns the normal balance side for this account type.
    /// Assets and Expenses normally carry debit balances;
    /// Liabilities, Equity, and Revenue normally carry credit balances.
    pub fn normal_side(&self) -> EntrySide {
        match self {
            AccountType::Asset | AccountType::Expense => EntrySide::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Revenue => {
                EntrySide::Credit
            }
        }
    }
}

/// The two sides of a double-entry posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySide {
    Debit,
    Credit,
}

/// Supported reporting currencies. Exactly two; entries in one currency are
/// never converted into the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "ZWL")]
    Zwl,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Zwl => "ZWL",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USD" | "usd" => Ok(Currency::Usd),
            "ZWL" | "zwl" => Ok(Currency::Zwl),
            other => Err(LedgerError::Validation(format!(
                "Unsupported currency '{other}'"
            ))),
        }
    }
}

/// An account in the fixed chart of accounts.
///
/// The `code` is the stable lookup key used by business logic; the chart is
/// seeded once before any transactions exist and system accounts are never
/// mutated or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique short code, e.g. "1100"
    pub code: String,
    /// Human-readable account name
    pub name: String,
    /// Type of account (Asset, Liability, etc.)
    pub account_type: AccountType,
    /// Optional parent account code, used for display grouping only
    pub parent_code: Option<String>,
    /// Free-form description
    pub description: String,
    /// Seeded accounts are system accounts and cannot be deleted by users
    pub is_system: bool,
    /// When the account was created
    pub created_at: NaiveDateTime,
}

impl Account {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
        parent_code: Option<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            account_type,
            parent_code,
            description: description.into(),
            is_system: false,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    pub fn system(mut self) -> Self {
        self.is_system = true;
        self
    }
}

/// The kind of domain record a journal entry was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceType {
    Income,
    Receivable,
    Expense,
    Refund,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceType::Income => "Income",
            SourceType::Receivable => "Receivable",
            SourceType::Expense => "Expense",
            SourceType::Refund => "Refund",
        };
        f.write_str(s)
    }
}

/// How cash physically arrived when a receivable is settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Ecocash,
}

/// Where the money for an expense came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentSource {
    /// An individual fronted the expense and is owed reimbursement
    OwedPerson,
    CashAtHand,
    Ecocash,
}

/// One balanced debit/credit posting, the atomic unit of the ledger.
///
/// Entries are created exclusively by the posting engine and never updated;
/// the only deletion path is the journal rebuild utility, which clears and
/// re-derives the whole journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    /// Date the underlying business event occurred
    pub date: NaiveDate,
    /// Code of the account debited
    pub debit_code: String,
    /// Code of the account credited
    pub credit_code: String,
    /// Posted amount; always strictly positive
    pub amount: BigDecimal,
    pub currency: Currency,
    pub description: String,
    /// Human-readable tag, e.g. "INC-abc123"
    pub reference: String,
    /// Kind of domain record this entry was derived from
    pub source_type: SourceType,
    /// Id of the originating domain record
    pub source_id: String,
    /// Assembly the event is attributed to, where applicable
    pub assembly_id: Option<String>,
    pub created_at: NaiveDateTime,
}

impl JournalEntry {
    /// Both legs reference existing accounts and the amount is positive;
    /// a single entry is balanced by construction (one debit, one credit,
    /// equal amount).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDate,
        debit_code: impl Into<String>,
        credit_code: impl Into<String>,
        amount: BigDecimal,
        currency: Currency,
        description: impl Into<String>,
        reference: impl Into<String>,
        source_type: SourceType,
        source_id: impl Into<String>,
        assembly_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            debit_code: debit_code.into(),
            credit_code: credit_code.into(),
            amount,
            currency,
            description: description.into(),
            reference: reference.into(),
            source_type,
            source_id: source_id.into(),
            assembly_id,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// Filter for the journal listing endpoint; all criteria are optional and
/// combine conjunctively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalFilter {
    /// Match entries where this account appears on either leg
    pub account_code: Option<String>,
    pub source_type: Option<SourceType>,
    pub currency: Option<Currency>,
}

impl JournalFilter {
    pub fn matches(&self, entry: &JournalEntry) -> bool {
        if let Some(ref code) = self.account_code {
            if entry.debit_code != *code && entry.credit_code != *code {
                return false;
            }
        }
        if let Some(source_type) = self.source_type {
            if entry.source_type != source_type {
                return false;
            }
        }
        if let Some(currency) = self.currency {
            if entry.currency != currency {
                return false;
            }
        }
        true
    }
}

/// One page of journal entries for audit/drill-down display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalPage {
    pub entries: Vec<JournalEntry>,
    /// Total number of entries matching the filter, across all pages
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

/// Errors that can occur in the ledger system
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_side_classification() {
        assert_eq!(AccountType::Asset.normal_side(), EntrySide::Debit);
        assert_eq!(AccountType::Expense.normal_side(), EntrySide::Debit);
        assert_eq!(AccountType::Liability.normal_side(), EntrySide::Credit);
        assert_eq!(AccountType::Equity.normal_side(), EntrySide::Credit);
        assert_eq!(AccountType::Revenue.normal_side(), EntrySide::Credit);
    }

    #[test]
    fn currency_round_trips_through_str() {
        assert_eq!("USD".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!("zwl".parse::<Currency>().unwrap(), Currency::Zwl);
        assert_eq!(Currency::Usd.to_string(), "USD");
        assert!("EUR".parse::<Currency>().is_err());
    }

    #[test]
    fn currency_serde_uses_uppercase_codes() {
        assert_eq!(serde_json::to_string(&Currency::Zwl).unwrap(), "\"ZWL\"");
        let parsed: Currency = serde_json::from_str("\"USD\"").unwrap();
        assert_eq!(parsed, Currency::Usd);
    }

    #[test]
    fn filter_matches_either_leg() {
        let entry = JournalEntry::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            "1300",
            "4100",
            BigDecimal::from(100),
            Currency::Usd,
            "Offering income",
            "INC-1",
            SourceType::Income,
            "1",
            Some("asm-1".to_string()),
        );

        let debit_side = JournalFilter {
            account_code: Some("1300".to_string()),
            ..Default::default()
        };
        let credit_side = JournalFilter {
            account_code: Some("4100".to_string()),
            ..Default::default()
        };
        let unrelated = JournalFilter {
            account_code: Some("5100".to_string()),
            ..Default::default()
        };

        assert!(debit_side.matches(&entry));
        assert!(credit_side.matches(&entry));
        assert!(!unrelated.matches(&entry));

        let wrong_currency = JournalFilter {
            currency: Some(Currency::Zwl),
            ..Default::default()
        };
        assert!(!wrong_currency.matches(&entry));
    }
}
