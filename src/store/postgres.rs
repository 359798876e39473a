use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{DailyCount, EntryStatus, EntryType, LedgerEntry};
use crate::store::{LedgerStore, Page, SearchFilter};

/// PostgreSQL-backed ledger store.
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl LedgerStore for PgLedgerStore {
    /// Inserts a new entry. A unique violation on the reference column is
    /// reported as `DuplicateReference` so callers can retry with a new one.
    async fn save(&self, entry: &LedgerEntry) -> Result<LedgerEntry> {
        let row = sqlx::query_as::<_, LedgerEntry>(
            r#"
            INSERT INTO ledger_entries (id, user_id, bank_account_id, reference, entry_type, status, amount, receiver, recipient_id, recipient_name, recipient_iban, reason, entry_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, user_id, bank_account_id, reference, entry_type, status, amount, receiver, recipient_id, recipient_name, recipient_iban, reason, entry_date
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(&entry.bank_account_id)
        .bind(&entry.reference)
        .bind(entry.entry_type)
        .bind(entry.status)
        .bind(entry.amount)
        .bind(&entry.receiver)
        .bind(entry.recipient_id)
        .bind(&entry.recipient_name)
        .bind(&entry.recipient_iban)
        .bind(&entry.reason)
        .bind(entry.entry_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e.as_database_error().and_then(|db| db.code()) {
            Some(code) if code == "23505" => {
                AppError::DuplicateReference(entry.reference.clone())
            }
            _ => AppError::Database(e),
        })?;

        Ok(row)
    }

    /// Updates the status of an entry, returning the updated row.
    async fn update_status(&self, id: Uuid, status: EntryStatus) -> Result<Option<LedgerEntry>> {
        let row = sqlx::query_as::<_, LedgerEntry>(
            r#"
            UPDATE ledger_entries
            SET status = $2
            WHERE id = $1
            RETURNING id, user_id, bank_account_id, reference, entry_type, status, amount, receiver, recipient_id, recipient_name, recipient_iban, reason, entry_date
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Finds an entry by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<LedgerEntry>> {
        let row = sqlx::query_as::<_, LedgerEntry>(
            r#"
            SELECT id, user_id, bank_account_id, reference, entry_type, status, amount, receiver, recipient_id, recipient_name, recipient_iban, reason, entry_date
            FROM ledger_entries
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Finds an entry by its unique reference.
    async fn find_by_reference(&self, reference: &str) -> Result<Option<LedgerEntry>> {
        let row = sqlx::query_as::<_, LedgerEntry>(
            r#"
            SELECT id, user_id, bank_account_id, reference, entry_type, status, amount, receiver, recipient_id, recipient_name, recipient_iban, reason, entry_date
            FROM ledger_entries
            WHERE reference = $1
            "#,
        )
        .bind(reference)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    async fn exists_by_reference(&self, reference: &str) -> Result<bool> {
        let row: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(SELECT 1 FROM ledger_entries WHERE reference = $1)
            "#,
        )
        .bind(reference)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row.0)
    }

    /// Lists entries for an account, most recent first.
    async fn find_by_account(&self, bank_account_id: &str) -> Result<Vec<LedgerEntry>> {
        let rows = sqlx::query_as::<_, LedgerEntry>(
            r#"
            SELECT id, user_id, bank_account_id, reference, entry_type, status, amount, receiver, recipient_id, recipient_name, recipient_iban, reason, entry_date
            FROM ledger_entries
            WHERE bank_account_id = $1
            ORDER BY entry_date DESC
            "#,
        )
        .bind(bank_account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(rows)
    }

    /// Lists entries recorded for a user, most recent first.
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<LedgerEntry>> {
        let rows = sqlx::query_as::<_, LedgerEntry>(
            r#"
            SELECT id, user_id, bank_account_id, reference, entry_type, status, amount, receiver, recipient_id, recipient_name, recipient_iban, reason, entry_date
            FROM ledger_entries
            WHERE user_id = $1
            ORDER BY entry_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(rows)
    }

    /// Filtered, paginated search. Every filter value is bound; the ORDER BY
    /// column comes from the `SortField` whitelist, never from the caller.
    async fn search(&self, filter: &SearchFilter) -> Result<Page<LedgerEntry>> {
        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM ledger_entries
            WHERE ($1::bigint IS NULL OR user_id = $1)
              AND ($2::text IS NULL OR bank_account_id ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR reference ILIKE '%' || $3 || '%')
              AND ($4::entry_type IS NULL OR entry_type = $4)
              AND ($5::entry_status IS NULL OR status = $5)
              AND ($6::text IS NULL
                   OR reference ILIKE '%' || $6 || '%'
                   OR bank_account_id ILIKE '%' || $6 || '%'
                   OR receiver ILIKE '%' || $6 || '%'
                   OR reason ILIKE '%' || $6 || '%')
              AND ($7::timestamptz IS NULL OR entry_date >= $7)
              AND ($8::timestamptz IS NULL OR entry_date <= $8)
            "#,
        )
        .bind(filter.user_id)
        .bind(&filter.bank_account_id)
        .bind(&filter.reference)
        .bind(filter.entry_type)
        .bind(filter.status)
        .bind(&filter.search)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let query = format!(
            r#"
            SELECT id, user_id, bank_account_id, reference, entry_type, status, amount, receiver, recipient_id, recipient_name, recipient_iban, reason, entry_date
            FROM ledger_entries
            WHERE ($1::bigint IS NULL OR user_id = $1)
              AND ($2::text IS NULL OR bank_account_id ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR reference ILIKE '%' || $3 || '%')
              AND ($4::entry_type IS NULL OR entry_type = $4)
              AND ($5::entry_status IS NULL OR status = $5)
              AND ($6::text IS NULL
                   OR reference ILIKE '%' || $6 || '%'
                   OR bank_account_id ILIKE '%' || $6 || '%'
                   OR receiver ILIKE '%' || $6 || '%'
                   OR reason ILIKE '%' || $6 || '%')
              AND ($7::timestamptz IS NULL OR entry_date >= $7)
              AND ($8::timestamptz IS NULL OR entry_date <= $8)
            ORDER BY {} {}
            LIMIT $9 OFFSET $10
            "#,
            filter.sort_by.column(),
            filter.sort_direction.keyword(),
        );

        let rows = sqlx::query_as::<_, LedgerEntry>(&query)
            .bind(filter.user_id)
            .bind(&filter.bank_account_id)
            .bind(&filter.reference)
            .bind(filter.entry_type)
            .bind(filter.status)
            .bind(&filter.search)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(filter.limit())
            .bind(filter.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(Page::new(rows, filter.page.max(0), filter.limit(), total))
    }

    async fn count_all(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ledger_entries")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(row.0)
    }

    async fn count_by_status(&self, status: EntryStatus) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ledger_entries WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(row.0)
    }

    async fn count_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM ledger_entries WHERE entry_date >= $1 AND entry_date < $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row.0)
    }

    async fn sum_amount_by_status(&self, status: EntryStatus) -> Result<Decimal> {
        let row: (Decimal,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount), 0) FROM ledger_entries WHERE status = $1",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row.0)
    }

    /// Per-day entry counts since the given timestamp, oldest day first.
    async fn daily_counts(&self, since: DateTime<Utc>) -> Result<Vec<DailyCount>> {
        let rows = sqlx::query_as::<_, DailyCount>(
            r#"
            SELECT CAST(entry_date AS DATE) AS date, COUNT(*) AS count
            FROM ledger_entries
            WHERE entry_date >= $1
            GROUP BY CAST(entry_date AS DATE)
            ORDER BY date ASC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(rows)
    }
}
