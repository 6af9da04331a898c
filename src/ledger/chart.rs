//! Chart of accounts: fixed account codes, idempotent seeding, and the
//! code lookup table used by the posting engine

use std::collections::HashMap;

use crate::traits::JournalStorage;
use crate::types::*;

/// Stable account codes referenced by the posting rules.
///
/// These are data, not configuration: business logic addresses accounts by
/// these codes and the seed script guarantees they exist before any posting
/// happens.
pub mod codes {
    // Group accounts, display only
    pub const ASSETS: &str = "1000";
    pub const LIABILITIES: &str = "2000";
    pub const EQUITY: &str = "3000";
    pub const REVENUE: &str = "4000";
    pub const EXPENSES: &str = "5000";

    // Assets
    pub const CASH_AT_HAND: &str = "1100";
    pub const BANK_ECOCASH: &str = "1200";
    pub const ACCOUNTS_RECEIVABLE: &str = "1300";
    pub const VENTURE_INVENTORY: &str = "1400";

    // Liabilities
    pub const ACCOUNTS_PAYABLE: &str = "2100";
    pub const PASTOR_REMITTANCE_PAYABLE: &str = "2200";

    // Equity
    pub const GENERAL_FUND: &str = "3100";

    // Revenue
    pub const OFFERINGS: &str = "4100";
    pub const TITHES: &str = "4200";
    pub const FEAST_BADGES: &str = "4300";
    pub const FIREWOOD: &str = "4400";
    pub const INSTRUMENTS: &str = "4500";
    pub const PASTORS_WELFARE: &str = "4600";
    pub const OTHER_INCOME: &str = "4700";
    pub const PROJECT_INCOME: &str = "4800";
    pub const VENTURE_REVENUE: &str = "4900";

    // Expenses
    pub const GENERAL_EXPENSES: &str = "5100";
    pub const PROJECT_EXPENSES: &str = "5200";
    pub const VENTURE_EXPENSES: &str = "5300";
}

/// The full seed set, group accounts first so parents exist before children.
///
/// Venture Inventory/Revenue/Expenses are part of the chart even though no
/// posting rule currently targets them; venture activity is tracked as plain
/// domain records outside the journal.
fn seed_accounts() -> Vec<Account> {
    use codes::*;

    let group = |code: &str, name: &str, t: AccountType| {
        Account::new(code, name, t, None, format!("{name} group")).system()
    };
    let child = |code: &str, name: &str, t: AccountType, parent: &str, desc: &str| {
        Account::new(code, name, t, Some(parent.to_string()), desc).system()
    };

    vec![
        group(ASSETS, "Assets", AccountType::Asset),
        group(LIABILITIES, "Liabilities", AccountType::Liability),
        group(EQUITY, "Equity", AccountType::Equity),
        group(REVENUE, "Revenue", AccountType::Revenue),
        group(EXPENSES, "Expenses", AccountType::Expense),
        child(
            CASH_AT_HAND,
            "Cash at Hand",
            AccountType::Asset,
            ASSETS,
            "Physical cash held by the organization",
        ),
        child(
            BANK_ECOCASH,
            "Bank / EcoCash",
            AccountType::Asset,
            ASSETS,
            "Funds held in bank or EcoCash mobile money",
        ),
        child(
            ACCOUNTS_RECEIVABLE,
            "Accounts Receivable",
            AccountType::Asset,
            ASSETS,
            "Income recorded by assemblies but not yet physically received",
        ),
        child(
            VENTURE_INVENTORY,
            "Venture Inventory",
            AccountType::Asset,
            ASSETS,
            "Stock held by income-generating ventures",
        ),
        child(
            ACCOUNTS_PAYABLE,
            "Accounts Payable",
            AccountType::Liability,
            LIABILITIES,
            "Amounts owed to persons who fronted expenses",
        ),
        child(
            PASTOR_REMITTANCE_PAYABLE,
            "Pastor Remittance Payable",
            AccountType::Liability,
            LIABILITIES,
            "Cash received and immediately forwarded to the pastor",
        ),
        child(
            GENERAL_FUND,
            "General Fund",
            AccountType::Equity,
            EQUITY,
            "The organization's general fund",
        ),
        child(
            OFFERINGS,
            "Offerings",
            AccountType::Revenue,
            REVENUE,
            "Offering income",
        ),
        child(
            TITHES,
            "Tithes",
            AccountType::Revenue,
            REVENUE,
            "Tithe income",
        ),
        child(
            FEAST_BADGES,
            "Feast Badges",
            AccountType::Revenue,
            REVENUE,
            "Feast badge sales",
        ),
        child(
            FIREWOOD,
            "Firewood",
            AccountType::Revenue,
            REVENUE,
            "Firewood contributions",
        ),
        child(
            INSTRUMENTS,
            "Instruments",
            AccountType::Revenue,
            REVENUE,
            "Instrument fund contributions",
        ),
        child(
            PASTORS_WELFARE,
            "Pastor's Welfare",
            AccountType::Revenue,
            REVENUE,
            "Pastor's welfare contributions",
        ),
        child(
            OTHER_INCOME,
            "Other Income",
            AccountType::Revenue,
            REVENUE,
            "Custom income items outside the fixed categories",
        ),
        child(
            PROJECT_INCOME,
            "Project Income",
            AccountType::Revenue,
            REVENUE,
            "Income earmarked for a specific project",
        ),
        child(
            VENTURE_REVENUE,
            "Venture Revenue",
            AccountType::Revenue,
            REVENUE,
            "Revenue from income-generating ventures",
        ),
        child(
            GENERAL_EXPENSES,
            "General Expenses",
            AccountType::Expense,
            EXPENSES,
            "Day-to-day operating expenses",
        ),
        child(
            PROJECT_EXPENSES,
            "Project Expenses",
            AccountType::Expense,
            EXPENSES,
            "Expenses attributed to a specific project",
        ),
        child(
            VENTURE_EXPENSES,
            "Venture Expenses",
            AccountType::Expense,
            EXPENSES,
            "Expenses of income-generating ventures",
        ),
    ]
}

/// Seed the chart of accounts. Idempotent: existing codes are left untouched,
/// so it is safe to re-run. Returns the number of accounts inserted.
pub async fn seed_chart<S: JournalStorage>(storage: &mut S) -> LedgerResult<usize> {
    let mut inserted = 0;
    for account in seed_accounts() {
        if storage.get_account(&account.code).await?.is_none() {
            storage.save_account(&account).await?;
            inserted += 1;
        }
    }
    Ok(inserted)
}

/// Explicit code-to-account lookup table, loaded once from storage and
/// injected into the posting engine.
///
/// Keeps the engine free of hidden global cache state: tests construct one
/// directly from a slice of accounts.
#[derive(Debug, Clone, Default)]
pub struct ChartIndex {
    accounts: HashMap<String, Account>,
}

impl ChartIndex {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            accounts: accounts
                .into_iter()
                .map(|a| (a.code.clone(), a))
                .collect(),
        }
    }

    /// Load the full chart from storage
    pub async fn load<S: JournalStorage>(storage: &S) -> LedgerResult<Self> {
        Ok(Self::new(storage.list_accounts(None).await?))
    }

    pub fn get(&self, code: &str) -> Option<&Account> {
        self.accounts.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.accounts.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_storage::MemoryStorage;

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let mut storage = MemoryStorage::new();

        let first = seed_chart(&mut storage).await.unwrap();
        assert!(first > 0);

        let second = seed_chart(&mut storage).await.unwrap();
        assert_eq!(second, 0);

        let accounts = storage.list_accounts(None).await.unwrap();
        assert_eq!(accounts.len(), first);
        assert!(accounts.iter().all(|a| a.is_system));
    }

    #[tokio::test]
    async fn seeded_codes_resolve_through_index() {
        let mut storage = MemoryStorage::new();
        seed_chart(&mut storage).await.unwrap();

        let chart = ChartIndex::load(&storage).await.unwrap();
        for code in [
            codes::CASH_AT_HAND,
            codes::BANK_ECOCASH,
            codes::ACCOUNTS_RECEIVABLE,
            codes::ACCOUNTS_PAYABLE,
            codes::PASTOR_REMITTANCE_PAYABLE,
            codes::OFFERINGS,
            codes::TITHES,
            codes::FEAST_BADGES,
            codes::FIREWOOD,
            codes::INSTRUMENTS,
            codes::PASTORS_WELFARE,
            codes::OTHER_INCOME,
            codes::PROJECT_INCOME,
            codes::GENERAL_EXPENSES,
            codes::PROJECT_EXPENSES,
        ] {
            assert!(chart.contains(code), "missing seeded account {code}");
        }
    }

    #[tokio::test]
    async fn group_parents_are_wired_for_display() {
        let mut storage = MemoryStorage::new();
        seed_chart(&mut storage).await.unwrap();

        let offerings = storage
            .get_account(codes::OFFERINGS)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(offerings.parent_code.as_deref(), Some(codes::REVENUE));
        assert_eq!(offerings.account_type, AccountType::Revenue);

        let revenue_group = storage.get_account(codes::REVENUE).await.unwrap().unwrap();
        assert_eq!(revenue_group.parent_code, None);
    }
}
