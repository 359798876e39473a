use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maximum number of characters allowed in a transaction reason.
const MAX_REASON_CHARS: usize = 500;

/// Validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

/// Request to record or execute a deposit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositRequest {
    pub bank_account_id: String,
    pub amount: Decimal,
    pub reason: Option<String>,
}

impl DepositRequest {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.bank_account_id.trim().is_empty() {
            errors.push(ValidationError { field: "bank_account_id".to_string(), message: "bank_account_id cannot be empty".to_string() });
        }
        if self.amount <= Decimal::ZERO {
            errors.push(ValidationError { field: "amount".to_string(), message: "amount must be greater than zero".to_string() });
        }
        if self.amount.scale() > 4 {
            errors.push(ValidationError { field: "amount".to_string(), message: "amount cannot have more than 4 decimal places".to_string() });
        }
        if let Some(reason) = &self.reason {
            if reason.chars().count() > MAX_REASON_CHARS {
                errors.push(ValidationError { field: "reason".to_string(), message: "reason cannot exceed 500 characters".to_string() });
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Request to record or execute a withdrawal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub bank_account_id: String,
    pub amount: Decimal,
    pub reason: Option<String>,
}

impl WithdrawalRequest {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.bank_account_id.trim().is_empty() {
            errors.push(ValidationError { field: "bank_account_id".to_string(), message: "bank_account_id cannot be empty".to_string() });
        }
        if self.amount <= Decimal::ZERO {
            errors.push(ValidationError { field: "amount".to_string(), message: "amount must be greater than zero".to_string() });
        }
        if self.amount.scale() > 4 {
            errors.push(ValidationError { field: "amount".to_string(), message: "amount cannot have more than 4 decimal places".to_string() });
        }
        if let Some(reason) = &self.reason {
            if reason.chars().count() > MAX_REASON_CHARS {
                errors.push(ValidationError { field: "reason".to_string(), message: "reason cannot exceed 500 characters".to_string() });
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Request to record a transfer between two accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub source_account_id: String,
    pub target_account_id: String,
    pub amount: Decimal,
    pub reason: Option<String>,
}

impl TransferRequest {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.source_account_id.trim().is_empty() {
            errors.push(ValidationError { field: "source_account_id".to_string(), message: "source_account_id cannot be empty".to_string() });
        }
        if self.target_account_id.trim().is_empty() {
            errors.push(ValidationError { field: "target_account_id".to_string(), message: "target_account_id cannot be empty".to_string() });
        }
        if !self.source_account_id.trim().is_empty()
            && self.source_account_id.trim() == self.target_account_id.trim()
        {
            errors.push(ValidationError { field: "target_account_id".to_string(), message: "source and target accounts must be different".to_string() });
        }
        if self.amount <= Decimal::ZERO {
            errors.push(ValidationError { field: "amount".to_string(), message: "amount must be greater than zero".to_string() });
        }
        if self.amount.scale() > 4 {
            errors.push(ValidationError { field: "amount".to_string(), message: "amount cannot have more than 4 decimal places".to_string() });
        }
        if let Some(reason) = &self.reason {
            if reason.chars().count() > MAX_REASON_CHARS {
                errors.push(ValidationError { field: "reason".to_string(), message: "reason cannot exceed 500 characters".to_string() });
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Request to execute a transfer whose destination is a saved recipient,
/// identified either by id or by IBAN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminTransferRequest {
    pub bank_account_id: String,
    pub recipient_id: Option<i64>,
    pub recipient_iban: Option<String>,
    pub amount: Decimal,
    pub reason: Option<String>,
}

impl AdminTransferRequest {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.bank_account_id.trim().is_empty() {
            errors.push(ValidationError { field: "bank_account_id".to_string(), message: "bank_account_id cannot be empty".to_string() });
        }
        if self.recipient_id.is_none() && self.recipient_iban.is_none() {
            errors.push(ValidationError { field: "recipient_id".to_string(), message: "either recipient_id or recipient_iban must be provided".to_string() });
        }
        if let Some(iban) = &self.recipient_iban {
            if iban.trim().is_empty() {
                errors.push(ValidationError { field: "recipient_iban".to_string(), message: "recipient_iban cannot be empty".to_string() });
            }
        }
        if self.amount <= Decimal::ZERO {
            errors.push(ValidationError { field: "amount".to_string(), message: "amount must be greater than zero".to_string() });
        }
        if self.amount.scale() > 4 {
            errors.push(ValidationError { field: "amount".to_string(), message: "amount cannot have more than 4 decimal places".to_string() });
        }
        if let Some(reason) = &self.reason {
            if reason.chars().count() > MAX_REASON_CHARS {
                errors.push(ValidationError { field: "reason".to_string(), message: "reason cannot exceed 500 characters".to_string() });
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Query parameters for the transaction search endpoint.
///
/// Dates accept an RFC 3339 timestamp or a bare `YYYY-MM-DD` date, which is
/// taken as midnight UTC.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchQuery {
    pub user_id: Option<i64>,
    pub bank_account_id: Option<String>,
    pub reference: Option<String>,
    pub entry_type: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
}
