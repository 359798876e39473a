pub mod auth;
pub mod transaction_service;

pub use auth::{AuthContext, Role};
pub use transaction_service::{
    validate_amount, validate_transfer_endpoints, EntryStateMachine, TransactionRequest,
    TransactionService, ValidationError, ValidationResult,
};
