use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Kind of monetary movement recorded in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "entry_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    /// Funds credited to an account.
    Deposit,
    /// Funds debited from an account.
    Withdrawal,
    /// Funds moved from a source account to a destination.
    Transfer,
}

impl EntryType {
    /// Stable label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Deposit => "DEPOSIT",
            EntryType::Withdrawal => "WITHDRAWAL",
            EntryType::Transfer => "TRANSFER",
        }
    }
}

/// Status of a ledger entry in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "entry_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    /// Entry is recorded but the downstream balance update has not completed.
    Pending,
    /// Entry is fully applied.
    Completed,
    /// The downstream balance update failed; the entry stands as history.
    Failed,
    /// Entry was cancelled before completion.
    Cancelled,
}

impl EntryStatus {
    /// Returns true if the entry is in a final state.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            EntryStatus::Completed | EntryStatus::Failed | EntryStatus::Cancelled
        )
    }

    /// Returns true if the entry can still be cancelled.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, EntryStatus::Pending)
    }

    /// Stable label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "PENDING",
            EntryStatus::Completed => "COMPLETED",
            EntryStatus::Failed => "FAILED",
            EntryStatus::Cancelled => "CANCELLED",
        }
    }
}

/// An immutable record of one monetary movement.
///
/// Once persisted, only `status` may change; every other field is fixed at
/// creation. Entries are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LedgerEntry {
    pub id: Uuid,
    /// Owner of the initiating account, when known.
    pub user_id: Option<i64>,
    /// Debited/credited account; the source account for transfers.
    pub bank_account_id: String,
    /// Globally unique external-facing identifier, assigned once at creation.
    pub reference: String,
    pub entry_type: EntryType,
    pub status: EntryStatus,
    /// Positive amount, fixed scale 4, currency-agnostic.
    pub amount: Decimal,
    /// Destination account identifier, transfers only.
    pub receiver: Option<String>,
    pub recipient_id: Option<i64>,
    pub recipient_name: Option<String>,
    pub recipient_iban: Option<String>,
    /// Free-text memo, bounded at 500 characters.
    pub reason: Option<String>,
    pub entry_date: DateTime<Utc>,
}

impl LedgerEntry {
    /// Creates a new entry in the `Pending` state.
    pub fn new(
        entry_type: EntryType,
        bank_account_id: impl Into<String>,
        amount: Decimal,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: None,
            bank_account_id: bank_account_id.into(),
            reference: reference.into(),
            entry_type,
            status: EntryStatus::Pending,
            amount,
            receiver: None,
            recipient_id: None,
            recipient_name: None,
            recipient_iban: None,
            reason: None,
            entry_date: Utc::now(),
        }
    }

    /// Creates a deposit entry.
    pub fn deposit(
        bank_account_id: impl Into<String>,
        amount: Decimal,
        reference: impl Into<String>,
    ) -> Self {
        Self::new(EntryType::Deposit, bank_account_id, amount, reference)
    }

    /// Creates a withdrawal entry.
    pub fn withdrawal(
        bank_account_id: impl Into<String>,
        amount: Decimal,
        reference: impl Into<String>,
    ) -> Self {
        Self::new(EntryType::Withdrawal, bank_account_id, amount, reference)
    }

    /// Creates a transfer entry from a source account to a destination.
    pub fn transfer(
        bank_account_id: impl Into<String>,
        receiver: impl Into<String>,
        amount: Decimal,
        reference: impl Into<String>,
    ) -> Self {
        let mut entry = Self::new(EntryType::Transfer, bank_account_id, amount, reference);
        entry.receiver = Some(receiver.into());
        entry
    }

    /// Attaches the owning user.
    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Attaches a memo.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches resolved recipient details (admin transfer flow).
    pub fn with_recipient(
        mut self,
        recipient_id: i64,
        recipient_name: impl Into<String>,
        recipient_iban: impl Into<String>,
    ) -> Self {
        self.recipient_id = Some(recipient_id);
        self.recipient_name = Some(recipient_name.into());
        self.recipient_iban = Some(recipient_iban.into());
        self
    }

    /// Marks the entry as completed.
    pub fn complete(&mut self) {
        self.status = EntryStatus::Completed;
    }

    /// Marks the entry as failed.
    pub fn fail(&mut self) {
        self.status = EntryStatus::Failed;
    }

    /// Marks the entry as cancelled.
    pub fn cancel(&mut self) {
        self.status = EntryStatus::Cancelled;
    }

    /// Returns true if this entry belongs to the given user.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == Some(user_id)
    }
}
