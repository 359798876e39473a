pub mod memory;
pub mod postgres;

pub use memory::MemoryLedgerStore;
pub use postgres::PgLedgerStore;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{DailyCount, EntryStatus, EntryType, LedgerEntry};

/// Default number of entries per search page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Upper bound on the page size a caller may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Column the search results are ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Date,
    Amount,
    Status,
    Type,
    Reference,
}

impl SortField {
    /// Column name used in SQL ordering. Only values from this enum ever
    /// reach the query, which keeps the sort column whitelisted.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Date => "entry_date",
            SortField::Amount => "amount",
            SortField::Status => "status",
            SortField::Type => "entry_type",
            SortField::Reference => "reference",
        }
    }
}

impl From<&str> for SortField {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "amount" => SortField::Amount,
            "status" => SortField::Status,
            "type" => SortField::Type,
            "reference" => SortField::Reference,
            _ => SortField::Date,
        }
    }
}

/// Direction of the search ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl From<&str> for SortDirection {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "ASC" => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }
}

/// Filter for the paginated ledger search. Absent fields match everything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchFilter {
    pub user_id: Option<i64>,
    /// Case-insensitive substring match on the account identifier.
    pub bank_account_id: Option<String>,
    /// Case-insensitive substring match on the reference.
    pub reference: Option<String>,
    pub entry_type: Option<EntryType>,
    pub status: Option<EntryStatus>,
    /// Free-text search across reference, account, receiver and reason.
    pub search: Option<String>,
    /// Inclusive lower bound on `entry_date`.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `entry_date`.
    pub end_date: Option<DateTime<Utc>>,
    /// Zero-indexed page number.
    pub page: i64,
    pub size: i64,
    pub sort_by: SortField,
    pub sort_direction: SortDirection,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            user_id: None,
            bank_account_id: None,
            reference: None,
            entry_type: None,
            status: None,
            search: None,
            start_date: None,
            end_date: None,
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort_by: SortField::Date,
            sort_direction: SortDirection::Desc,
        }
    }
}

impl SearchFilter {
    /// Effective page size, clamped to `1..=MAX_PAGE_SIZE`.
    pub fn limit(&self) -> i64 {
        self.size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Row offset implied by the page number.
    pub fn offset(&self) -> i64 {
        self.page.max(0) * self.limit()
    }

    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_account(mut self, fragment: impl Into<String>) -> Self {
        self.bank_account_id = Some(fragment.into());
        self
    }

    pub fn with_reference(mut self, fragment: impl Into<String>) -> Self {
        self.reference = Some(fragment.into());
        self
    }

    pub fn with_entry_type(mut self, entry_type: EntryType) -> Self {
        self.entry_type = Some(entry_type);
        self
    }

    pub fn with_status(mut self, status: EntryStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn with_date_range(
        mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn with_page(mut self, page: i64, size: i64) -> Self {
        self.page = page;
        self.size = size;
        self
    }

    pub fn sorted_by(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort_by = field;
        self.sort_direction = direction;
        self
    }
}

/// One page of search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: i64, size: i64, total_elements: i64) -> Self {
        let total_pages = if size > 0 {
            (total_elements + size - 1) / size
        } else {
            0
        };
        Self {
            items,
            page,
            size,
            total_elements,
            total_pages,
        }
    }

    /// Maps the page's items, keeping the pagination metadata.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

/// Persistence abstraction for ledger entries.
#[async_trait::async_trait]
pub trait LedgerStore: Send + Sync {
    /// Persists a new entry. Fails with `DuplicateReference` when the
    /// reference already exists in the store.
    async fn save(&self, entry: &LedgerEntry) -> Result<LedgerEntry>;

    /// Updates the status of an entry, returning the updated row.
    async fn update_status(&self, id: Uuid, status: EntryStatus) -> Result<Option<LedgerEntry>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<LedgerEntry>>;

    async fn find_by_reference(&self, reference: &str) -> Result<Option<LedgerEntry>>;

    async fn exists_by_reference(&self, reference: &str) -> Result<bool>;

    /// All entries for an account, most recent first.
    async fn find_by_account(&self, bank_account_id: &str) -> Result<Vec<LedgerEntry>>;

    /// All entries recorded for a user, most recent first.
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<LedgerEntry>>;

    /// Filtered, paginated search.
    async fn search(&self, filter: &SearchFilter) -> Result<Page<LedgerEntry>>;

    async fn count_all(&self) -> Result<i64>;

    async fn count_by_status(&self, status: EntryStatus) -> Result<i64>;

    /// Number of entries with `entry_date` in `[start, end)`.
    async fn count_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64>;

    /// Sum of amounts for entries in the given status; zero when none.
    async fn sum_amount_by_status(&self, status: EntryStatus) -> Result<Decimal>;

    /// Per-day entry counts since the given timestamp, oldest day first.
    async fn daily_counts(&self, since: DateTime<Utc>) -> Result<Vec<DailyCount>>;
}
