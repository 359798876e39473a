use crate::clients::{
    AccountClient, BalanceOperation, NotificationClient, RecipientClient, RecipientInfo,
};
use crate::error::{AppError, Result};
use crate::models::{DailyCount, EntryStatus, EntryType, LedgerEntry, TransactionStats};
use crate::observability::{get_metrics, LatencyTimer};
use crate::reference::ReferenceGenerator;
use crate::services::auth::AuthContext;
use crate::store::{LedgerStore, Page, SearchFilter};
use chrono::{Duration, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Validation error details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub code: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
        }
    }
}

/// Result of request validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn invalid(errors: Vec<ValidationError>) -> Self {
        Self {
            is_valid: false,
            errors,
        }
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
            self.errors.extend(other.errors);
        }
    }
}

/// Checks that an amount is strictly positive with at most four decimal
/// places of precision.
pub fn validate_amount(amount: Decimal) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if amount <= Decimal::ZERO {
        result.add_error(ValidationError::new(
            "amount",
            "Amount must be greater than zero",
            "INVALID_AMOUNT",
        ));
    } else if amount.scale() > 4 {
        result.add_error(ValidationError::new(
            "amount",
            "Amount cannot have more than 4 decimal places",
            "INVALID_AMOUNT",
        ));
    }

    result
}

/// Checks that a transfer does not point back at its own source.
pub fn validate_transfer_endpoints(source: &str, target: &str) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if source == target {
        result.add_error(ValidationError::new(
            "target_account_id",
            "Source and destination accounts must be different",
            "SAME_ACCOUNT",
        ));
    }

    result
}

/// Entry state machine for managing status transitions.
#[derive(Debug, Clone)]
pub struct EntryStateMachine;

impl EntryStateMachine {
    /// Returns valid next states from the current state.
    pub fn valid_transitions(current: EntryStatus) -> Vec<EntryStatus> {
        match current {
            EntryStatus::Pending => vec![
                EntryStatus::Completed,
                EntryStatus::Failed,
                EntryStatus::Cancelled,
            ],
            EntryStatus::Completed => vec![], // Terminal state
            EntryStatus::Failed => vec![],    // Terminal state
            EntryStatus::Cancelled => vec![], // Terminal state
        }
    }

    /// Checks if a transition is valid.
    pub fn can_transition(from: EntryStatus, to: EntryStatus) -> bool {
        Self::valid_transitions(from).contains(&to)
    }

    /// Attempts to transition to a new state.
    pub fn transition(from: EntryStatus, to: EntryStatus) -> Result<EntryStatus> {
        if Self::can_transition(from, to) {
            Ok(to)
        } else {
            Err(AppError::Validation(format!(
                "Invalid state transition from {:?} to {:?}",
                from, to
            )))
        }
    }
}

/// Request for recording or executing a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub entry_type: EntryType,
    pub bank_account_id: String,
    pub amount: Decimal,
    pub receiver: Option<String>,
    pub recipient_id: Option<i64>,
    pub recipient_iban: Option<String>,
    pub reason: Option<String>,
}

impl TransactionRequest {
    pub fn deposit(bank_account_id: impl Into<String>, amount: Decimal) -> Self {
        Self {
            entry_type: EntryType::Deposit,
            bank_account_id: bank_account_id.into(),
            amount,
            receiver: None,
            recipient_id: None,
            recipient_iban: None,
            reason: None,
        }
    }

    pub fn withdrawal(bank_account_id: impl Into<String>, amount: Decimal) -> Self {
        Self {
            entry_type: EntryType::Withdrawal,
            bank_account_id: bank_account_id.into(),
            amount,
            receiver: None,
            recipient_id: None,
            recipient_iban: None,
            reason: None,
        }
    }

    pub fn transfer(
        bank_account_id: impl Into<String>,
        receiver: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            entry_type: EntryType::Transfer,
            bank_account_id: bank_account_id.into(),
            amount,
            receiver: Some(receiver.into()),
            recipient_id: None,
            recipient_iban: None,
            reason: None,
        }
    }

    /// Transfer whose destination is resolved through the recipient service.
    pub fn transfer_to_recipient(bank_account_id: impl Into<String>, amount: Decimal) -> Self {
        Self {
            entry_type: EntryType::Transfer,
            bank_account_id: bank_account_id.into(),
            amount,
            receiver: None,
            recipient_id: None,
            recipient_iban: None,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_recipient_id(mut self, recipient_id: i64) -> Self {
        self.recipient_id = Some(recipient_id);
        self
    }

    pub fn with_recipient_iban(mut self, iban: impl Into<String>) -> Self {
        self.recipient_iban = Some(iban.into());
        self
    }
}

/// The transaction service orchestrates validation, reference generation,
/// persistence, balance updates through the account collaborator, and
/// notification dispatch.
pub struct TransactionService {
    store: Arc<dyn LedgerStore>,
    accounts: Arc<dyn AccountClient>,
    recipients: Arc<dyn RecipientClient>,
    notifications: Arc<dyn NotificationClient>,
    reference_generator: ReferenceGenerator,
}

impl TransactionService {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        accounts: Arc<dyn AccountClient>,
        recipients: Arc<dyn RecipientClient>,
        notifications: Arc<dyn NotificationClient>,
        reference_generator: ReferenceGenerator,
    ) -> Self {
        Self {
            store,
            accounts,
            recipients,
            notifications,
            reference_generator,
        }
    }

    /// Validates a transaction request through the validation pipeline.
    pub async fn validate_request(&self, request: &TransactionRequest) -> Result<ValidationResult> {
        let mut result = ValidationResult::valid();

        // Basic field validation
        if request.bank_account_id.is_empty() {
            result.add_error(ValidationError::new(
                "bank_account_id",
                "Bank account id is required",
                "REQUIRED_FIELD",
            ));
        }

        result.merge(validate_amount(request.amount));

        if let Some(reason) = &request.reason {
            if reason.chars().count() > 500 {
                result.add_error(ValidationError::new(
                    "reason",
                    "Reason cannot exceed 500 characters",
                    "FIELD_TOO_LONG",
                ));
            }
        }

        // Transfer specific validation
        if request.entry_type == EntryType::Transfer {
            match &request.receiver {
                Some(receiver) => {
                    result.merge(validate_transfer_endpoints(&request.bank_account_id, receiver));
                }
                None => {
                    if request.recipient_id.is_none() && request.recipient_iban.is_none() {
                        result.add_error(ValidationError::new(
                            "receiver",
                            "Transfer requires a destination account",
                            "REQUIRED_FIELD",
                        ));
                    }
                }
            }
        }

        Ok(result)
    }

    /// Records a deposit as a settled ledger entry.
    pub async fn deposit(
        &self,
        auth: &AuthContext,
        request: TransactionRequest,
    ) -> Result<LedgerEntry> {
        if request.entry_type != EntryType::Deposit {
            return Err(AppError::Validation("Invalid entry type for deposit".to_string()));
        }
        self.record_entry(auth, request).await
    }

    /// Records a withdrawal as a settled ledger entry.
    pub async fn withdraw(
        &self,
        auth: &AuthContext,
        request: TransactionRequest,
    ) -> Result<LedgerEntry> {
        if request.entry_type != EntryType::Withdrawal {
            return Err(AppError::Validation("Invalid entry type for withdrawal".to_string()));
        }
        self.record_entry(auth, request).await
    }

    /// Records a transfer as a settled ledger entry.
    pub async fn transfer(
        &self,
        auth: &AuthContext,
        request: TransactionRequest,
    ) -> Result<LedgerEntry> {
        if request.entry_type != EntryType::Transfer {
            return Err(AppError::Validation("Invalid entry type for transfer".to_string()));
        }
        self.record_entry(auth, request).await
    }

    /// Executes a deposit against the account service (admin flow).
    pub async fn create_deposit(
        &self,
        auth: &AuthContext,
        request: TransactionRequest,
    ) -> Result<LedgerEntry> {
        if request.entry_type != EntryType::Deposit {
            return Err(AppError::Validation("Invalid entry type for deposit".to_string()));
        }
        self.execute_managed(auth, request).await
    }

    /// Executes a withdrawal against the account service (admin flow).
    pub async fn create_withdrawal(
        &self,
        auth: &AuthContext,
        request: TransactionRequest,
    ) -> Result<LedgerEntry> {
        if request.entry_type != EntryType::Withdrawal {
            return Err(AppError::Validation("Invalid entry type for withdrawal".to_string()));
        }
        self.execute_managed(auth, request).await
    }

    /// Executes a transfer against the account service (admin flow).
    pub async fn create_transfer(
        &self,
        auth: &AuthContext,
        request: TransactionRequest,
    ) -> Result<LedgerEntry> {
        if request.entry_type != EntryType::Transfer {
            return Err(AppError::Validation("Invalid entry type for transfer".to_string()));
        }
        self.execute_managed(auth, request).await
    }

    /// Cancels a pending transaction. Admins may cancel any entry, other
    /// callers only their own.
    pub async fn cancel(&self, auth: &AuthContext, id: Uuid) -> Result<LedgerEntry> {
        let entry = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Transaction '{}' not found", id)))?;

        if !auth.is_admin() && !entry.is_owned_by(auth.user_id) {
            return Err(AppError::Forbidden(
                "You do not own this transaction".to_string(),
            ));
        }

        // Validate state transition
        EntryStateMachine::transition(entry.status, EntryStatus::Cancelled)?;

        let cancelled = self
            .store
            .update_status(id, EntryStatus::Cancelled)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Transaction '{}' not found after update", id))
            })?;

        get_metrics().record_entry_cancelled(cancelled.entry_type.as_str());
        Ok(cancelled)
    }

    /// Gets the transaction history for an account, most recent first.
    pub async fn account_history(&self, bank_account_id: &str) -> Result<Vec<LedgerEntry>> {
        self.store.find_by_account(bank_account_id).await
    }

    /// Gets the transaction history recorded for a user, most recent first.
    pub async fn user_history(&self, user_id: i64) -> Result<Vec<LedgerEntry>> {
        self.store.find_by_user(user_id).await
    }

    /// Looks up a transaction by its unique reference.
    pub async fn get_by_reference(&self, reference: &str) -> Result<LedgerEntry> {
        self.store
            .find_by_reference(reference)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Transaction with reference '{}' not found", reference))
            })
    }

    /// Looks up a transaction by id.
    pub async fn get_by_id(&self, id: Uuid) -> Result<LedgerEntry> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Transaction '{}' not found", id)))
    }

    /// Filtered, paginated search over all entries.
    pub async fn search(&self, filter: &SearchFilter) -> Result<Page<LedgerEntry>> {
        let timer = LatencyTimer::new();
        let page = self.store.search(filter).await?;
        get_metrics().record_search_latency(timer.elapsed_ms());
        Ok(page)
    }

    /// Computes aggregate statistics on demand.
    pub async fn stats(&self) -> Result<TransactionStats> {
        let total = self.store.count_all().await?;
        let pending = self.store.count_by_status(EntryStatus::Pending).await?;
        let completed = self.store.count_by_status(EntryStatus::Completed).await?;
        let failed = self.store.count_by_status(EntryStatus::Failed).await?;
        let total_volume = self
            .store
            .sum_amount_by_status(EntryStatus::Completed)
            .await?;

        let start_of_day = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
        let today_count = self
            .store
            .count_between(start_of_day, start_of_day + Duration::days(1))
            .await?;

        Ok(TransactionStats {
            total,
            pending,
            completed,
            failed,
            total_volume,
            today_count,
        })
    }

    /// Per-day entry counts over the last seven days, oldest day first.
    pub async fn daily_stats(&self) -> Result<Vec<DailyCount>> {
        let start_of_day = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
        self.store.daily_counts(start_of_day - Duration::days(6)).await
    }

    /// Validates, builds, and persists a settled entry for the simple flows.
    async fn record_entry(
        &self,
        auth: &AuthContext,
        request: TransactionRequest,
    ) -> Result<LedgerEntry> {
        // Run validation pipeline
        let validation = self.validate_request(&request).await?;
        if !validation.is_valid {
            let error_messages: Vec<String> = validation
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect();
            return Err(AppError::Validation(error_messages.join("; ")));
        }

        let reference = self.reference_generator.generate();
        let mut entry = match request.entry_type {
            EntryType::Deposit => {
                LedgerEntry::deposit(request.bank_account_id, request.amount, reference)
            }
            EntryType::Withdrawal => {
                LedgerEntry::withdrawal(request.bank_account_id, request.amount, reference)
            }
            EntryType::Transfer => {
                let receiver = request.receiver.ok_or_else(|| {
                    AppError::Validation("Transfer requires a destination account".to_string())
                })?;
                LedgerEntry::transfer(request.bank_account_id, receiver, request.amount, reference)
            }
        }
        .with_user(auth.user_id);

        if let Some(reason) = request.reason {
            entry = entry.with_reason(reason);
        }

        // Direct recordings settle at creation
        entry.complete();

        let saved = self.persist_with_unique_reference(entry).await?;
        get_metrics().record_entry_recorded(saved.entry_type.as_str(), saved.status.as_str());
        Ok(saved)
    }

    /// Full managed flow: resolve the account, authorize, persist PENDING,
    /// apply balance updates, then settle or fail the entry.
    async fn execute_managed(
        &self,
        auth: &AuthContext,
        request: TransactionRequest,
    ) -> Result<LedgerEntry> {
        // Run validation pipeline
        let validation = self.validate_request(&request).await?;
        if !validation.is_valid {
            let error_messages: Vec<String> = validation
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect();
            return Err(AppError::Validation(error_messages.join("; ")));
        }

        // Resolve the account and check it is usable
        let account = self.accounts.get_account(&request.bank_account_id).await?;
        if !account.active {
            return Err(AppError::Validation(format!(
                "Account '{}' is not active",
                account.id
            )));
        }

        // Non-admin callers may only move money on their own account
        if !auth.is_admin() && account.owner_user_id != auth.user_id {
            return Err(AppError::Forbidden(
                "You do not have access to this account".to_string(),
            ));
        }

        // Withdrawals and transfers must be covered
        if matches!(request.entry_type, EntryType::Withdrawal | EntryType::Transfer)
            && account.balance < request.amount
        {
            return Err(AppError::Validation(format!(
                "Insufficient balance: requested {}, available {}",
                request.amount, account.balance
            )));
        }

        // Resolve the saved recipient for transfers
        let recipient = match request.entry_type {
            EntryType::Transfer => self.resolve_recipient(&request).await?,
            _ => None,
        };

        if let Some(recipient) = &recipient {
            let endpoints = validate_transfer_endpoints(&account.iban, &recipient.iban);
            if !endpoints.is_valid {
                let error_messages: Vec<String> = endpoints
                    .errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                return Err(AppError::Validation(error_messages.join("; ")));
            }
        }

        let receiver = match (&recipient, &request.receiver) {
            (Some(recipient), _) => Some(recipient.iban.clone()),
            (None, Some(receiver)) => Some(receiver.clone()),
            (None, None) => None,
        };

        // Build and persist the entry as PENDING
        let reference = self.reference_generator.generate();
        let mut entry = match request.entry_type {
            EntryType::Deposit => {
                LedgerEntry::deposit(request.bank_account_id.clone(), request.amount, reference)
            }
            EntryType::Withdrawal => {
                LedgerEntry::withdrawal(request.bank_account_id.clone(), request.amount, reference)
            }
            EntryType::Transfer => {
                let receiver = receiver.clone().ok_or_else(|| {
                    AppError::Validation("Transfer requires a destination account".to_string())
                })?;
                LedgerEntry::transfer(
                    request.bank_account_id.clone(),
                    receiver,
                    request.amount,
                    reference,
                )
            }
        }
        .with_user(account.owner_user_id);

        if let Some(reason) = &request.reason {
            entry = entry.with_reason(reason.clone());
        }
        if let Some(recipient) = &recipient {
            entry = entry.with_recipient(
                recipient.id,
                recipient.full_name.clone(),
                recipient.iban.clone(),
            );
        }

        let entry = self.persist_with_unique_reference(entry).await?;

        // Apply balance updates; the entry stands even when they fail
        if let Err(e) = self.apply_balance_updates(&entry).await {
            tracing::error!("Balance update failed for {}: {}", entry.reference, e);
            get_metrics().record_collaborator_call("account", false);
            get_metrics().record_entry_failed(entry.entry_type.as_str(), "balance_update");

            let failed = self
                .store
                .update_status(entry.id, EntryStatus::Failed)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!(
                        "Transaction '{}' not found after update",
                        entry.id
                    ))
                })?;
            self.dispatch_notification(&failed);

            return Err(AppError::ExternalService(format!(
                "Balance update failed: {}",
                e
            )));
        }
        get_metrics().record_collaborator_call("account", true);

        let completed = self
            .store
            .update_status(entry.id, EntryStatus::Completed)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Transaction '{}' not found after update", entry.id))
            })?;

        get_metrics().record_entry_recorded(completed.entry_type.as_str(), completed.status.as_str());
        self.dispatch_notification(&completed);

        Ok(completed)
    }

    /// Persists the entry, regenerating the reference on collisions until the
    /// attempt budget is exhausted.
    async fn persist_with_unique_reference(&self, mut entry: LedgerEntry) -> Result<LedgerEntry> {
        let max_attempts = self.reference_generator.max_attempts();
        let timer = LatencyTimer::new();

        for attempt in 1..=max_attempts {
            if self.store.exists_by_reference(&entry.reference).await? {
                tracing::warn!(
                    "Reference {} is already taken, regenerating (attempt {}/{})",
                    entry.reference,
                    attempt,
                    max_attempts
                );
                get_metrics().record_reference_collision();
                entry.reference = self.reference_generator.generate();
                continue;
            }

            match self.store.save(&entry).await {
                Ok(saved) => {
                    get_metrics().record_ledger_write_latency(timer.elapsed_ms());
                    return Ok(saved);
                }
                // Lost the insert race against a concurrent writer.
                Err(AppError::DuplicateReference(reference)) => {
                    tracing::warn!(
                        "Reference {} collided on insert (attempt {}/{})",
                        reference,
                        attempt,
                        max_attempts
                    );
                    get_metrics().record_reference_collision();
                    entry.reference = self.reference_generator.generate();
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::DuplicateReference(entry.reference))
    }

    /// Resolves the saved recipient referenced by the request, if any.
    async fn resolve_recipient(
        &self,
        request: &TransactionRequest,
    ) -> Result<Option<RecipientInfo>> {
        if let Some(recipient_id) = request.recipient_id {
            let recipient = self.recipients.get_recipient(recipient_id).await?;
            return Ok(Some(recipient));
        }
        if let Some(iban) = &request.recipient_iban {
            let recipient = self.recipients.get_recipient_by_iban(iban).await?;
            return Ok(Some(recipient));
        }
        Ok(None)
    }

    /// Pushes the entry's monetary effect to the account service.
    async fn apply_balance_updates(&self, entry: &LedgerEntry) -> Result<()> {
        match entry.entry_type {
            EntryType::Deposit => {
                self.accounts
                    .update_balance(&entry.bank_account_id, entry.amount, BalanceOperation::Add)
                    .await
            }
            EntryType::Withdrawal => {
                self.accounts
                    .update_balance(
                        &entry.bank_account_id,
                        entry.amount,
                        BalanceOperation::Subtract,
                    )
                    .await
            }
            EntryType::Transfer => {
                self.accounts
                    .update_balance(
                        &entry.bank_account_id,
                        entry.amount,
                        BalanceOperation::Subtract,
                    )
                    .await?;

                let receiver = entry.receiver.as_deref().ok_or_else(|| {
                    AppError::Internal(anyhow::anyhow!("Transfer entry is missing its receiver"))
                })?;
                let target = self.accounts.get_account_by_iban(receiver).await?;
                self.accounts
                    .update_balance(&target.id, entry.amount, BalanceOperation::Add)
                    .await
            }
        }
    }

    /// Notifies the owning user about the entry's outcome. Best effort; the
    /// delivery runs detached and failures are only logged.
    fn dispatch_notification(&self, entry: &LedgerEntry) {
        let user_id = match entry.user_id {
            Some(user_id) => user_id,
            None => return,
        };

        let notifications = Arc::clone(&self.notifications);
        let title = "Transaction update".to_string();
        let message = format!(
            "Your {} of {} ({}) is {}",
            entry.entry_type.as_str(),
            entry.amount,
            entry.reference,
            entry.status.as_str()
        );

        tokio::spawn(async move {
            let result = notifications.send(user_id, &title, &message).await;
            get_metrics().record_collaborator_call("notification", result.is_ok());
            if let Err(e) = result {
                tracing::warn!("Failed to deliver transaction notification: {}", e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_state_machine_valid_transitions() {
        assert!(EntryStateMachine::can_transition(
            EntryStatus::Pending,
            EntryStatus::Completed
        ));
        assert!(EntryStateMachine::can_transition(
            EntryStatus::Pending,
            EntryStatus::Failed
        ));
        assert!(EntryStateMachine::can_transition(
            EntryStatus::Pending,
            EntryStatus::Cancelled
        ));
    }

    #[test]
    fn test_state_machine_invalid_transitions() {
        assert!(!EntryStateMachine::can_transition(
            EntryStatus::Completed,
            EntryStatus::Cancelled
        ));
        assert!(!EntryStateMachine::can_transition(
            EntryStatus::Failed,
            EntryStatus::Completed
        ));
        assert!(!EntryStateMachine::can_transition(
            EntryStatus::Cancelled,
            EntryStatus::Pending
        ));
    }

    #[test]
    fn test_state_machine_transition_error() {
        let err = EntryStateMachine::transition(EntryStatus::Completed, EntryStatus::Cancelled)
            .unwrap_err();
        assert!(err.to_string().contains("Invalid state transition"));
    }

    #[test]
    fn test_validation_result() {
        let mut result = ValidationResult::valid();
        assert!(result.is_valid);
        assert!(result.errors.is_empty());

        result.add_error(ValidationError::new("field", "message", "CODE"));
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);

        let mut base = ValidationResult::valid();
        base.merge(result);
        assert!(!base.is_valid);
        assert_eq!(base.errors.len(), 1);
    }

    #[test]
    fn test_validate_amount_rejects_zero_and_negative() {
        let zero = validate_amount(Decimal::ZERO);
        assert!(!zero.is_valid);
        assert!(zero.errors[0].message.contains("greater than zero"));

        let negative = validate_amount(dec!(-5));
        assert!(!negative.is_valid);
    }

    #[test]
    fn test_validate_amount_rejects_excess_scale() {
        let result = validate_amount(dec!(1.23456));
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].code, "INVALID_AMOUNT");

        assert!(validate_amount(dec!(1.2345)).is_valid);
        assert!(validate_amount(dec!(100.00)).is_valid);
    }

    #[test]
    fn test_validate_transfer_endpoints() {
        let same = validate_transfer_endpoints("ACC-1", "ACC-1");
        assert!(!same.is_valid);
        assert_eq!(same.errors[0].code, "SAME_ACCOUNT");

        assert!(validate_transfer_endpoints("ACC-1", "ACC-2").is_valid);
    }

    #[test]
    fn test_deposit_request_builder() {
        let request = TransactionRequest::deposit("ACC-1", dec!(100.00)).with_reason("Salary");

        assert_eq!(request.entry_type, EntryType::Deposit);
        assert_eq!(request.bank_account_id, "ACC-1");
        assert_eq!(request.amount, dec!(100.00));
        assert_eq!(request.reason.as_deref(), Some("Salary"));
        assert!(request.receiver.is_none());
    }

    #[test]
    fn test_transfer_request_builder() {
        let request = TransactionRequest::transfer("ACC-1", "ACC-2", dec!(75.00));

        assert_eq!(request.entry_type, EntryType::Transfer);
        assert_eq!(request.receiver.as_deref(), Some("ACC-2"));
    }

    #[test]
    fn test_recipient_transfer_request_builder() {
        let request = TransactionRequest::transfer_to_recipient("ACC-1", dec!(50))
            .with_recipient_id(42)
            .with_reason("Rent");

        assert_eq!(request.entry_type, EntryType::Transfer);
        assert!(request.receiver.is_none());
        assert_eq!(request.recipient_id, Some(42));
        assert_eq!(request.reason.as_deref(), Some("Rent"));
    }
}
