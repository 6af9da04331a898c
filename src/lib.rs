//! # Assembly Ledger
//!
//! Double-entry journal posting and trial balance reporting for a
//! multi-assembly church record-keeping system.
//!
//! ## Features
//!
//! - **Fixed chart of accounts**: a seeded hierarchy of coded accounts
//!   (Assets, Liabilities, Equity, Revenue, Expenses) addressed by stable
//!   codes
//! - **Journal posting engine**: translates income, receivable, expense, and
//!   refund records into balanced debit/credit journal entries
//! - **Trial balance**: per-account, per-currency debit/credit totals with a
//!   balanced/unbalanced verdict
//! - **Journal listing**: filtered, paginated entries for audit drill-down
//! - **Rebuild utility**: clears and re-derives the full journal from the
//!   business-event history
//! - **Storage abstraction**: database-agnostic design with a trait-based
//!   storage seam
//!
//! ## Quick Start
//!
//! ```rust
//! use assembly_ledger::{Currency, Ledger, MemoryStorage};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut ledger = Ledger::open(MemoryStorage::new()).await.unwrap();
//! ledger.seed_chart().await.unwrap();
//!
//! let trial_balance = ledger.trial_balance(Currency::Usd).await.unwrap();
//! assert!(trial_balance.is_balanced);
//! # }
//! ```

pub mod ledger;
pub mod reports;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use ledger::*;
pub use reports::*;
pub use traits::*;
pub use types::*;
pub use utils::MemoryStorage;
