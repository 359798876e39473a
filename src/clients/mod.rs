pub mod http;

pub use http::{HttpAccountClient, HttpNotificationClient, HttpRecipientClient};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Account details returned by the account service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id: String,
    pub iban: String,
    pub balance: Decimal,
    pub owner_user_id: i64,
    pub active: bool,
}

/// Saved recipient details returned by the recipient service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipientInfo {
    pub id: i64,
    pub full_name: String,
    pub iban: String,
    pub bank: Option<String>,
}

/// Direction of a balance update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BalanceOperation {
    Add,
    Subtract,
}

/// Body sent to the account service when updating a balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceUpdate {
    pub operation: BalanceOperation,
    pub amount: Decimal,
}

/// Body sent to the notification service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub user_id: i64,
    pub title: String,
    pub message: String,
}

/// Client for the account service, which owns balances.
#[async_trait::async_trait]
pub trait AccountClient: Send + Sync {
    /// Fetches an account by its identifier. Missing accounts surface as
    /// `NotFound`, unreachable service as `ExternalService`.
    async fn get_account(&self, account_id: &str) -> Result<AccountInfo>;

    /// Fetches an account by IBAN.
    async fn get_account_by_iban(&self, iban: &str) -> Result<AccountInfo>;

    /// Applies a balance update to an account.
    async fn update_balance(
        &self,
        account_id: &str,
        amount: Decimal,
        operation: BalanceOperation,
    ) -> Result<()>;
}

/// Client for the recipient service, which stores saved transfer targets.
#[async_trait::async_trait]
pub trait RecipientClient: Send + Sync {
    async fn get_recipient(&self, recipient_id: i64) -> Result<RecipientInfo>;

    async fn get_recipient_by_iban(&self, iban: &str) -> Result<RecipientInfo>;
}

/// Client for the notification service. Deliveries are best effort.
#[async_trait::async_trait]
pub trait NotificationClient: Send + Sync {
    async fn send(&self, user_id: i64, title: &str, message: &str) -> Result<()>;
}
