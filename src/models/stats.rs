use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Aggregate counters over the full ledger, computed on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionStats {
    pub total: i64,
    pub pending: i64,
    pub completed: i64,
    pub failed: i64,
    /// Sum of COMPLETED entry amounts; zero when there are none.
    pub total_volume: Decimal,
    /// Entries dated today (UTC).
    pub today_count: i64,
}

/// Number of entries recorded on a single day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}
