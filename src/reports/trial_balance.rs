//! Trial balance: per-account debit/credit totals for one currency

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::*;

/// One active account in the trial balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub normal_side: EntrySide,
    /// Sum of entry amounts where this account is the debit leg
    pub debit: BigDecimal,
    /// Sum of entry amounts where this account is the credit leg
    pub credit: BigDecimal,
    /// Signed balance relative to the account's normal side
    pub balance: BigDecimal,
}

/// Point-in-time snapshot of account activity for one currency.
///
/// This is the primary correctness check on the posting engine: every posting
/// operation emits balanced debit/credit pairs by construction, so an
/// unbalanced report means some posting path has a bug (or a multi-entry
/// posting was cut short by a storage failure).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalance {
    pub currency: Currency,
    /// Accounts with nonzero activity, ordered by code
    pub rows: Vec<TrialBalanceRow>,
    pub total_debits: BigDecimal,
    pub total_credits: BigDecimal,
    pub is_balanced: bool,
}

/// Tolerance on the debit/credit grand totals, matching the report the
/// surrounding application renders.
fn epsilon() -> BigDecimal {
    BigDecimal::from(1) / BigDecimal::from(100)
}

/// Compute the trial balance for one currency.
///
/// Pure function of the account list and entry set: entries in the other
/// currency are excluded (never converted), and only accounts with nonzero
/// activity appear in the output.
pub fn compute_trial_balance(
    accounts: &[Account],
    entries: &[JournalEntry],
    currency: Currency,
) -> TrialBalance {
    let zero = BigDecimal::from(0);
    let mut activity: HashMap<&str, (BigDecimal, BigDecimal)> = HashMap::new();

    for entry in entries.iter().filter(|e| e.currency == currency) {
        let debit = activity
            .entry(entry.debit_code.as_str())
            .or_insert_with(|| (zero.clone(), zero.clone()));
        debit.0 += &entry.amount;

        let credit = activity
            .entry(entry.credit_code.as_str())
            .or_insert_with(|| (zero.clone(), zero.clone()));
        credit.1 += &entry.amount;
    }

    let mut rows = Vec::new();
    let mut total_debits = zero.clone();
    let mut total_credits = zero.clone();

    let mut sorted: Vec<&Account> = accounts.iter().collect();
    sorted.sort_by(|a, b| a.code.cmp(&b.code));

    for account in sorted {
        let Some((debit, credit)) = activity.get(account.code.as_str()) else {
            continue;
        };
        if *debit == zero && *credit == zero {
            continue;
        }

        let normal_side = account.account_type.normal_side();
        let balance = match normal_side {
            EntrySide::Debit => debit - credit,
            EntrySide::Credit => credit - debit,
        };

        total_debits += debit;
        total_credits += credit;

        rows.push(TrialBalanceRow {
            code: account.code.clone(),
            name: account.name.clone(),
            account_type: account.account_type,
            normal_side,
            debit: debit.clone(),
            credit: credit.clone(),
            balance,
        });
    }

    let is_balanced = (&total_debits - &total_credits).abs() < epsilon();

    TrialBalance {
        currency,
        rows,
        total_debits,
        total_credits,
        is_balanced,
    }
}
