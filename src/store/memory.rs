use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{DailyCount, EntryStatus, LedgerEntry};
use crate::store::{LedgerStore, Page, SearchFilter, SortDirection, SortField};

/// In-memory ledger store backing tests and local development. Mirrors the
/// PostgreSQL store's semantics, including reference uniqueness.
#[derive(Default)]
pub struct MemoryLedgerStore {
    entries: RwLock<Vec<LedgerEntry>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches(entry: &LedgerEntry, filter: &SearchFilter) -> bool {
    if let Some(user_id) = filter.user_id {
        if entry.user_id != Some(user_id) {
            return false;
        }
    }
    if let Some(fragment) = &filter.bank_account_id {
        if !contains_ci(&entry.bank_account_id, fragment) {
            return false;
        }
    }
    if let Some(fragment) = &filter.reference {
        if !contains_ci(&entry.reference, fragment) {
            return false;
        }
    }
    if let Some(entry_type) = filter.entry_type {
        if entry.entry_type != entry_type {
            return false;
        }
    }
    if let Some(status) = filter.status {
        if entry.status != status {
            return false;
        }
    }
    if let Some(text) = &filter.search {
        let hit = contains_ci(&entry.reference, text)
            || contains_ci(&entry.bank_account_id, text)
            || entry
                .receiver
                .as_deref()
                .map(|r| contains_ci(r, text))
                .unwrap_or(false)
            || entry
                .reason
                .as_deref()
                .map(|r| contains_ci(r, text))
                .unwrap_or(false);
        if !hit {
            return false;
        }
    }
    if let Some(start) = filter.start_date {
        if entry.entry_date < start {
            return false;
        }
    }
    if let Some(end) = filter.end_date {
        if entry.entry_date > end {
            return false;
        }
    }
    true
}

fn compare(a: &LedgerEntry, b: &LedgerEntry, field: SortField) -> Ordering {
    match field {
        SortField::Date => a.entry_date.cmp(&b.entry_date),
        SortField::Amount => a.amount.cmp(&b.amount),
        SortField::Status => a.status.as_str().cmp(b.status.as_str()),
        SortField::Type => a.entry_type.as_str().cmp(b.entry_type.as_str()),
        SortField::Reference => a.reference.cmp(&b.reference),
    }
}

#[async_trait::async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn save(&self, entry: &LedgerEntry) -> Result<LedgerEntry> {
        let mut entries = self.entries.write().await;
        if entries.iter().any(|e| e.reference == entry.reference) {
            return Err(AppError::DuplicateReference(entry.reference.clone()));
        }
        entries.push(entry.clone());
        Ok(entry.clone())
    }

    async fn update_status(&self, id: Uuid, status: EntryStatus) -> Result<Option<LedgerEntry>> {
        let mut entries = self.entries.write().await;
        match entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.status = status;
                Ok(Some(entry.clone()))
            }
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<LedgerEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<LedgerEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.iter().find(|e| e.reference == reference).cloned())
    }

    async fn exists_by_reference(&self, reference: &str) -> Result<bool> {
        let entries = self.entries.read().await;
        Ok(entries.iter().any(|e| e.reference == reference))
    }

    async fn find_by_account(&self, bank_account_id: &str) -> Result<Vec<LedgerEntry>> {
        let entries = self.entries.read().await;
        let mut rows: Vec<LedgerEntry> = entries
            .iter()
            .filter(|e| e.bank_account_id == bank_account_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));
        Ok(rows)
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<LedgerEntry>> {
        let entries = self.entries.read().await;
        let mut rows: Vec<LedgerEntry> = entries
            .iter()
            .filter(|e| e.user_id == Some(user_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));
        Ok(rows)
    }

    async fn search(&self, filter: &SearchFilter) -> Result<Page<LedgerEntry>> {
        let entries = self.entries.read().await;
        let mut rows: Vec<LedgerEntry> = entries
            .iter()
            .filter(|e| matches(e, filter))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            let ord = compare(a, b, filter.sort_by);
            match filter.sort_direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });

        let total = rows.len() as i64;
        let items: Vec<LedgerEntry> = rows
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.limit() as usize)
            .collect();

        Ok(Page::new(items, filter.page.max(0), filter.limit(), total))
    }

    async fn count_all(&self) -> Result<i64> {
        let entries = self.entries.read().await;
        Ok(entries.len() as i64)
    }

    async fn count_by_status(&self, status: EntryStatus) -> Result<i64> {
        let entries = self.entries.read().await;
        Ok(entries.iter().filter(|e| e.status == status).count() as i64)
    }

    async fn count_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|e| e.entry_date >= start && e.entry_date < end)
            .count() as i64)
    }

    async fn sum_amount_by_status(&self, status: EntryStatus) -> Result<Decimal> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|e| e.status == status)
            .map(|e| e.amount)
            .sum())
    }

    async fn daily_counts(&self, since: DateTime<Utc>) -> Result<Vec<DailyCount>> {
        let entries = self.entries.read().await;
        let mut buckets: BTreeMap<chrono::NaiveDate, i64> = BTreeMap::new();
        for entry in entries.iter().filter(|e| e.entry_date >= since) {
            *buckets.entry(entry.entry_date.date_naive()).or_insert(0) += 1;
        }
        Ok(buckets
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryType;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_save_and_find_by_reference() {
        let store = MemoryLedgerStore::new();
        let entry = LedgerEntry::deposit("ACC-1", dec!(100.0000), "TXN-AAAA1111");

        store.save(&entry).await.unwrap();

        let found = store.find_by_reference("TXN-AAAA1111").await.unwrap();
        assert_eq!(found.unwrap().id, entry.id);
        assert!(store.exists_by_reference("TXN-AAAA1111").await.unwrap());
        assert!(!store.exists_by_reference("TXN-MISSING1").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_reference_rejected() {
        let store = MemoryLedgerStore::new();
        store
            .save(&LedgerEntry::deposit("ACC-1", dec!(10), "TXN-DUP00001"))
            .await
            .unwrap();

        let err = store
            .save(&LedgerEntry::deposit("ACC-2", dec!(20), "TXN-DUP00001"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateReference(_)));
    }

    #[tokio::test]
    async fn test_update_status_unknown_id_returns_none() {
        let store = MemoryLedgerStore::new();
        let updated = store
            .update_status(Uuid::new_v4(), EntryStatus::Completed)
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_find_by_account_most_recent_first() {
        let store = MemoryLedgerStore::new();
        let mut old = LedgerEntry::deposit("ACC-1", dec!(10), "TXN-OLD00001");
        old.entry_date = Utc::now() - Duration::days(3);
        let recent = LedgerEntry::withdrawal("ACC-1", dec!(5), "TXN-NEW00001");
        let other = LedgerEntry::deposit("ACC-2", dec!(99), "TXN-OTHER001");

        store.save(&old).await.unwrap();
        store.save(&recent).await.unwrap();
        store.save(&other).await.unwrap();

        let rows = store.find_by_account("ACC-1").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].reference, "TXN-NEW00001");
        assert_eq!(rows[1].reference, "TXN-OLD00001");
    }

    #[tokio::test]
    async fn test_search_filters_and_paginates() {
        let store = MemoryLedgerStore::new();
        for i in 0..5 {
            let mut entry =
                LedgerEntry::deposit("ACC-1", dec!(100), format!("TXN-PAGE000{}", i)).with_user(7);
            if i % 2 == 0 {
                entry.complete();
            }
            store.save(&entry).await.unwrap();
        }

        let filter = SearchFilter::default()
            .with_user(7)
            .with_status(EntryStatus::Completed)
            .with_page(0, 2);
        let page = store.search(&filter).await.unwrap();
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 2);

        let second = store
            .search(&filter.clone().with_page(1, 2))
            .await
            .unwrap();
        assert_eq!(second.items.len(), 1);
    }

    #[tokio::test]
    async fn test_search_free_text_matches_reason_and_receiver() {
        let store = MemoryLedgerStore::new();
        let rent = LedgerEntry::transfer("ACC-1", "ACC-9", dec!(900), "TXN-RENT0001")
            .with_reason("Monthly rent");
        let salary =
            LedgerEntry::deposit("ACC-1", dec!(3000), "TXN-SAL00001").with_reason("Salary");
        store.save(&rent).await.unwrap();
        store.save(&salary).await.unwrap();

        let page = store
            .search(&SearchFilter::default().with_search("rent"))
            .await
            .unwrap();
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.items[0].reference, "TXN-RENT0001");

        let by_receiver = store
            .search(&SearchFilter::default().with_search("acc-9"))
            .await
            .unwrap();
        assert_eq!(by_receiver.total_elements, 1);
    }

    #[tokio::test]
    async fn test_search_sort_by_amount_ascending() {
        let store = MemoryLedgerStore::new();
        store
            .save(&LedgerEntry::deposit("ACC-1", dec!(300), "TXN-AMT00003"))
            .await
            .unwrap();
        store
            .save(&LedgerEntry::deposit("ACC-1", dec!(100), "TXN-AMT00001"))
            .await
            .unwrap();
        store
            .save(&LedgerEntry::deposit("ACC-1", dec!(200), "TXN-AMT00002"))
            .await
            .unwrap();

        let filter =
            SearchFilter::default().sorted_by(SortField::Amount, SortDirection::Asc);
        let page = store.search(&filter).await.unwrap();
        let amounts: Vec<Decimal> = page.items.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![dec!(100), dec!(200), dec!(300)]);
    }

    #[tokio::test]
    async fn test_counts_and_volume() {
        let store = MemoryLedgerStore::new();
        let mut completed = LedgerEntry::deposit("ACC-1", dec!(150.50), "TXN-CNT00001");
        completed.complete();
        let mut failed = LedgerEntry::withdrawal("ACC-1", dec!(40), "TXN-CNT00002");
        failed.fail();
        let pending = LedgerEntry::deposit("ACC-2", dec!(9.25), "TXN-CNT00003");

        store.save(&completed).await.unwrap();
        store.save(&failed).await.unwrap();
        store.save(&pending).await.unwrap();

        assert_eq!(store.count_all().await.unwrap(), 3);
        assert_eq!(
            store.count_by_status(EntryStatus::Completed).await.unwrap(),
            1
        );
        assert_eq!(
            store
                .sum_amount_by_status(EntryStatus::Completed)
                .await
                .unwrap(),
            dec!(150.50)
        );
        assert_eq!(
            store
                .sum_amount_by_status(EntryStatus::Cancelled)
                .await
                .unwrap(),
            Decimal::ZERO
        );

        let start = Utc::now() - Duration::minutes(1);
        let end = Utc::now() + Duration::minutes(1);
        assert_eq!(store.count_between(start, end).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_daily_counts_grouped_oldest_first() {
        let store = MemoryLedgerStore::new();
        let mut two_days_ago = LedgerEntry::deposit("ACC-1", dec!(10), "TXN-DAY00001");
        two_days_ago.entry_date = Utc::now() - Duration::days(2);
        let mut yesterday_a = LedgerEntry::deposit("ACC-1", dec!(20), "TXN-DAY00002");
        yesterday_a.entry_date = Utc::now() - Duration::days(1);
        let mut yesterday_b = LedgerEntry::deposit("ACC-1", dec!(30), "TXN-DAY00003");
        yesterday_b.entry_date = Utc::now() - Duration::days(1);
        let mut ancient = LedgerEntry::deposit("ACC-1", dec!(40), "TXN-DAY00004");
        ancient.entry_date = Utc::now() - Duration::days(30);

        store.save(&two_days_ago).await.unwrap();
        store.save(&yesterday_a).await.unwrap();
        store.save(&yesterday_b).await.unwrap();
        store.save(&ancient).await.unwrap();

        let counts = store
            .daily_counts(Utc::now() - Duration::days(7))
            .await
            .unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].count, 1);
        assert_eq!(counts[1].count, 2);
        assert!(counts[0].date < counts[1].date);
    }
}
