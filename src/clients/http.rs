use std::time::Duration;

use reqwest::Client;
use rust_decimal::Decimal;

use crate::clients::{
    AccountClient, AccountInfo, BalanceOperation, BalanceUpdate, NotificationClient,
    NotificationRequest, RecipientClient, RecipientInfo,
};
use crate::error::{AppError, Result};
use crate::observability::mask_iban;

fn build_client(timeout_seconds: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .unwrap_or_default()
}

/// HTTP client for the account service.
#[derive(Clone)]
pub struct HttpAccountClient {
    client: Client,
    base_url: String,
}

impl HttpAccountClient {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Self {
        Self {
            client: build_client(timeout_seconds),
            base_url: base_url.into(),
        }
    }

    async fn fetch_account(&self, url: String, lookup: &str) -> Result<AccountInfo> {
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("account service unreachable: {}", e)))?;

        if response.status() == 404 {
            return Err(AppError::NotFound(format!("Account {} not found", lookup)));
        }
        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "account service returned status {}",
                response.status()
            )));
        }

        let account = response.json::<AccountInfo>().await.map_err(|e| {
            AppError::ExternalService(format!("invalid account service response: {}", e))
        })?;

        Ok(account)
    }
}

#[async_trait::async_trait]
impl AccountClient for HttpAccountClient {
    async fn get_account(&self, account_id: &str) -> Result<AccountInfo> {
        let url = format!(
            "{}/api/accounts/{}",
            self.base_url.trim_end_matches('/'),
            account_id
        );
        self.fetch_account(url, account_id).await
    }

    async fn get_account_by_iban(&self, iban: &str) -> Result<AccountInfo> {
        tracing::debug!("Resolving account by IBAN {}", mask_iban(iban));
        let url = format!(
            "{}/api/accounts/iban/{}",
            self.base_url.trim_end_matches('/'),
            iban
        );
        self.fetch_account(url, iban).await
    }

    async fn update_balance(
        &self,
        account_id: &str,
        amount: Decimal,
        operation: BalanceOperation,
    ) -> Result<()> {
        let url = format!(
            "{}/api/accounts/{}/balance",
            self.base_url.trim_end_matches('/'),
            account_id
        );
        let body = BalanceUpdate { operation, amount };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("account service unreachable: {}", e)))?;

        if response.status() == 404 {
            return Err(AppError::NotFound(format!("Account {} not found", account_id)));
        }
        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "balance update rejected with status {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// HTTP client for the recipient service.
#[derive(Clone)]
pub struct HttpRecipientClient {
    client: Client,
    base_url: String,
}

impl HttpRecipientClient {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Self {
        Self {
            client: build_client(timeout_seconds),
            base_url: base_url.into(),
        }
    }

    async fn fetch_recipient(&self, url: String, lookup: &str) -> Result<RecipientInfo> {
        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::ExternalService(format!("recipient service unreachable: {}", e))
        })?;

        if response.status() == 404 {
            return Err(AppError::NotFound(format!("Recipient {} not found", lookup)));
        }
        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "recipient service returned status {}",
                response.status()
            )));
        }

        let recipient = response.json::<RecipientInfo>().await.map_err(|e| {
            AppError::ExternalService(format!("invalid recipient service response: {}", e))
        })?;

        Ok(recipient)
    }
}

#[async_trait::async_trait]
impl RecipientClient for HttpRecipientClient {
    async fn get_recipient(&self, recipient_id: i64) -> Result<RecipientInfo> {
        let url = format!(
            "{}/api/recipients/{}",
            self.base_url.trim_end_matches('/'),
            recipient_id
        );
        self.fetch_recipient(url, &recipient_id.to_string()).await
    }

    async fn get_recipient_by_iban(&self, iban: &str) -> Result<RecipientInfo> {
        tracing::debug!("Resolving recipient by IBAN {}", mask_iban(iban));
        let url = format!(
            "{}/api/recipients/iban/{}",
            self.base_url.trim_end_matches('/'),
            iban
        );
        self.fetch_recipient(url, iban).await
    }
}

/// HTTP client for the notification service.
#[derive(Clone)]
pub struct HttpNotificationClient {
    client: Client,
    base_url: String,
}

impl HttpNotificationClient {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Self {
        Self {
            client: build_client(timeout_seconds),
            base_url: base_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl NotificationClient for HttpNotificationClient {
    async fn send(&self, user_id: i64, title: &str, message: &str) -> Result<()> {
        let url = format!(
            "{}/api/notifications",
            self.base_url.trim_end_matches('/')
        );
        let body = NotificationRequest {
            user_id,
            title: title.to_string(),
            message: message.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalService(format!("notification service unreachable: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "notification service returned status {}",
                response.status()
            )));
        }

        Ok(())
    }
}
