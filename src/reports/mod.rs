//! Read-only reports derived from the journal

pub mod trial_balance;

pub use trial_balance::*;
