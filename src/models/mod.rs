pub mod ledger_entry;
pub mod stats;

pub use ledger_entry::{EntryStatus, EntryType, LedgerEntry};
pub use stats::{DailyCount, TransactionStats};
