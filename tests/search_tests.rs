mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;

use ledger_core::models::{EntryStatus, EntryType, LedgerEntry};
use ledger_core::store::{
    LedgerStore, MemoryLedgerStore, SearchFilter, SortDirection, SortField,
};

use common::ledger_only_service;

/// Seeds a small, mixed ledger used by most of the search tests.
async fn seed_mixed_ledger(store: &MemoryLedgerStore) {
    let mut salary = LedgerEntry::deposit("acc-1", dec!(2500.00), "TXN-SEED0001")
        .with_user(7)
        .with_reason("Salary August");
    salary.complete();
    salary.entry_date = Utc::now() - Duration::days(5);

    let mut rent = LedgerEntry::transfer("acc-1", "acc-2", dec!(750.00), "TXN-SEED0002")
        .with_user(7)
        .with_reason("Rent");
    rent.complete();
    rent.entry_date = Utc::now() - Duration::days(3);

    let mut cash = LedgerEntry::withdrawal("acc-1", dec!(100.00), "TXN-SEED0003").with_user(7);
    cash.fail();
    cash.entry_date = Utc::now() - Duration::days(2);

    let mut groceries = LedgerEntry::withdrawal("acc-3", dec!(62.35), "TXN-SEED0004")
        .with_user(8)
        .with_reason("Groceries");
    groceries.complete();
    groceries.entry_date = Utc::now() - Duration::days(1);

    let pending = LedgerEntry::deposit("acc-3", dec!(10.00), "TXN-SEED0005").with_user(8);

    for entry in [&salary, &rent, &cash, &groceries, &pending] {
        store.save(entry).await.expect("Failed to seed entry");
    }
}

#[tokio::test]
async fn test_search_without_filter_returns_everything() {
    let store = Arc::new(MemoryLedgerStore::new());
    seed_mixed_ledger(&store).await;
    let service = ledger_only_service(store);

    let page = service
        .search(&SearchFilter::default())
        .await
        .expect("Failed to search");

    assert_eq!(page.total_elements, 5);
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.page, 0);
    assert_eq!(page.total_pages, 1);
    // Default ordering is newest first
    assert_eq!(page.items[0].reference, "TXN-SEED0005");
}

#[tokio::test]
async fn test_search_by_entry_type_and_status() {
    let store = Arc::new(MemoryLedgerStore::new());
    seed_mixed_ledger(&store).await;
    let service = ledger_only_service(store);

    let withdrawals = service
        .search(&SearchFilter::default().with_entry_type(EntryType::Withdrawal))
        .await
        .expect("Failed to search");
    assert_eq!(withdrawals.total_elements, 2);
    assert!(withdrawals
        .items
        .iter()
        .all(|e| e.entry_type == EntryType::Withdrawal));

    let failed = service
        .search(&SearchFilter::default().with_status(EntryStatus::Failed))
        .await
        .expect("Failed to search");
    assert_eq!(failed.total_elements, 1);
    assert_eq!(failed.items[0].reference, "TXN-SEED0003");

    // Combined filters narrow further
    let completed_withdrawals = service
        .search(
            &SearchFilter::default()
                .with_entry_type(EntryType::Withdrawal)
                .with_status(EntryStatus::Completed),
        )
        .await
        .expect("Failed to search");
    assert_eq!(completed_withdrawals.total_elements, 1);
    assert_eq!(completed_withdrawals.items[0].reference, "TXN-SEED0004");
}

#[tokio::test]
async fn test_search_by_user_and_account_fragment() {
    let store = Arc::new(MemoryLedgerStore::new());
    seed_mixed_ledger(&store).await;
    let service = ledger_only_service(store);

    let theirs = service
        .search(&SearchFilter::default().with_user(8))
        .await
        .expect("Failed to search");
    assert_eq!(theirs.total_elements, 2);
    assert!(theirs.items.iter().all(|e| e.user_id == Some(8)));

    // Account matching is a case-insensitive substring
    let acc3 = service
        .search(&SearchFilter::default().with_account("ACC-3"))
        .await
        .expect("Failed to search");
    assert_eq!(acc3.total_elements, 2);

    let all_accounts = service
        .search(&SearchFilter::default().with_account("acc-"))
        .await
        .expect("Failed to search");
    assert_eq!(all_accounts.total_elements, 5);
}

#[tokio::test]
async fn test_search_by_reference_fragment() {
    let store = Arc::new(MemoryLedgerStore::new());
    seed_mixed_ledger(&store).await;
    let service = ledger_only_service(store);

    let one = service
        .search(&SearchFilter::default().with_reference("seed0002"))
        .await
        .expect("Failed to search");
    assert_eq!(one.total_elements, 1);
    assert_eq!(one.items[0].reference, "TXN-SEED0002");
}

#[tokio::test]
async fn test_free_text_search_spans_fields() {
    let store = Arc::new(MemoryLedgerStore::new());
    seed_mixed_ledger(&store).await;
    let service = ledger_only_service(store);

    // Hits the reason field
    let by_reason = service
        .search(&SearchFilter::default().with_search("groceries"))
        .await
        .expect("Failed to search");
    assert_eq!(by_reason.total_elements, 1);
    assert_eq!(by_reason.items[0].reference, "TXN-SEED0004");

    // Hits the receiver field of the transfer
    let by_receiver = service
        .search(&SearchFilter::default().with_search("acc-2"))
        .await
        .expect("Failed to search");
    assert_eq!(by_receiver.total_elements, 1);
    assert_eq!(by_receiver.items[0].reference, "TXN-SEED0002");
}

#[tokio::test]
async fn test_search_by_date_range() {
    let store = Arc::new(MemoryLedgerStore::new());
    seed_mixed_ledger(&store).await;
    let service = ledger_only_service(store);

    // Window covering days -4 to -1, so rent, cash and groceries
    let start = Utc::now() - Duration::days(4);
    let end = Utc::now() - Duration::hours(12);
    let window = service
        .search(&SearchFilter::default().with_date_range(Some(start), Some(end)))
        .await
        .expect("Failed to search");
    assert_eq!(window.total_elements, 3);

    // Open-ended lower bound
    let recent = service
        .search(&SearchFilter::default().with_date_range(Some(end), None))
        .await
        .expect("Failed to search");
    assert_eq!(recent.total_elements, 1);
    assert_eq!(recent.items[0].reference, "TXN-SEED0005");
}

#[tokio::test]
async fn test_search_pagination() {
    let store = Arc::new(MemoryLedgerStore::new());
    for i in 0..25 {
        let mut entry =
            LedgerEntry::deposit("acc-1", dec!(10), format!("TXN-PAGE{:04}", i)).with_user(7);
        entry.entry_date = Utc::now() - Duration::minutes(i);
        store.save(&entry).await.expect("Failed to seed entry");
    }
    let service = ledger_only_service(store);

    let first = service
        .search(&SearchFilter::default().with_page(0, 10))
        .await
        .expect("Failed to search");
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total_elements, 25);
    assert_eq!(first.total_pages, 3);
    // Newest first, so the zero-minute entry leads
    assert_eq!(first.items[0].reference, "TXN-PAGE0000");

    let last = service
        .search(&SearchFilter::default().with_page(2, 10))
        .await
        .expect("Failed to search");
    assert_eq!(last.items.len(), 5);
    assert_eq!(last.page, 2);
    assert_eq!(last.items[4].reference, "TXN-PAGE0024");

    let beyond = service
        .search(&SearchFilter::default().with_page(5, 10))
        .await
        .expect("Failed to search");
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total_elements, 25);
}

#[tokio::test]
async fn test_search_page_size_is_clamped() {
    let store = Arc::new(MemoryLedgerStore::new());
    for i in 0..120 {
        let entry = LedgerEntry::deposit("acc-1", dec!(1), format!("TXN-BULK{:04}", i));
        store.save(&entry).await.expect("Failed to seed entry");
    }
    let service = ledger_only_service(store);

    // Requested size far above the cap comes back clamped to 100
    let oversized = service
        .search(&SearchFilter::default().with_page(0, 1000))
        .await
        .expect("Failed to search");
    assert_eq!(oversized.items.len(), 100);
    assert_eq!(oversized.size, 100);
    assert_eq!(oversized.total_pages, 2);

    // A non-positive size falls back to a single-row page
    let tiny = service
        .search(&SearchFilter::default().with_page(0, 0))
        .await
        .expect("Failed to search");
    assert_eq!(tiny.items.len(), 1);
    assert_eq!(tiny.size, 1);
}

#[tokio::test]
async fn test_search_sorting_by_amount() {
    let store = Arc::new(MemoryLedgerStore::new());
    seed_mixed_ledger(&store).await;
    let service = ledger_only_service(store);

    let ascending = service
        .search(
            &SearchFilter::default().sorted_by(SortField::Amount, SortDirection::Asc),
        )
        .await
        .expect("Failed to search");
    assert_eq!(ascending.items[0].amount, dec!(10.00));
    assert_eq!(ascending.items[4].amount, dec!(2500.00));

    let descending = service
        .search(
            &SearchFilter::default().sorted_by(SortField::Amount, SortDirection::Desc),
        )
        .await
        .expect("Failed to search");
    assert_eq!(descending.items[0].amount, dec!(2500.00));
}

#[tokio::test]
async fn test_sort_parameters_parse_leniently() {
    assert_eq!(SortField::from("amount"), SortField::Amount);
    assert_eq!(SortField::from("AMOUNT"), SortField::Amount);
    assert_eq!(SortField::from("reference"), SortField::Reference);
    // Unknown fields fall back to the date column
    assert_eq!(SortField::from("nonsense"), SortField::Date);

    assert_eq!(SortDirection::from("asc"), SortDirection::Asc);
    assert_eq!(SortDirection::from("ASC"), SortDirection::Asc);
    assert_eq!(SortDirection::from("anything"), SortDirection::Desc);
}
