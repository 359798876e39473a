use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::api::requests::{
    AdminTransferRequest, DepositRequest, SearchQuery, TransferRequest, WithdrawalRequest,
};
use crate::api::responses::{
    ApiResponse, ErrorResponse, HealthResponse, PaginatedResponse, ServiceHealth,
    TransactionResponse, ValidationErrorDetail,
};
use crate::error::AppError;
use crate::models::{DailyCount, EntryStatus, EntryType, TransactionStats};
use crate::observability::AggregatedHealth;
use crate::services::{AuthContext, Role, TransactionRequest};
use crate::store::{SearchFilter, SortDirection, SortField};

use super::routes::AppState;

type ErrorReply = (StatusCode, Json<ApiResponse<()>>);

/// Builds the caller identity from the gateway-stamped headers.
fn auth_from_headers(headers: &HeaderMap) -> Result<AuthContext, ErrorReply> {
    let user_id = headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i64>().ok());

    let user_id = match user_id {
        Some(id) => id,
        None => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<()>::error(ErrorResponse::new(
                    "UNAUTHORIZED",
                    "Missing or invalid X-User-Id header",
                ))),
            ))
        }
    };

    let mut roles: Vec<Role> = headers
        .get("x-user-roles")
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .split(',')
                .filter(|token| !token.trim().is_empty())
                .map(Role::from)
                .collect()
        })
        .unwrap_or_default();
    if roles.is_empty() {
        roles.push(Role::User);
    }

    Ok(AuthContext::new(user_id, roles))
}

fn require_admin(auth: &AuthContext) -> Result<(), ErrorReply> {
    if auth.is_admin() {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<()>::error(ErrorResponse::new(
                "FORBIDDEN",
                "Administrator role required",
            ))),
        ))
    }
}

/// Parses a date query parameter: RFC 3339, or a bare date taken as
/// midnight UTC.
fn parse_date_param(name: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>, ErrorReply> {
    let raw = match value {
        Some(v) => v,
        None => return Ok(None),
    };

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(timestamp.with_timezone(&Utc)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(date.and_time(NaiveTime::MIN).and_utc()));
    }

    Err((
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error(ErrorResponse::new(
            "VALIDATION_ERROR",
            format!(
                "Invalid {} '{}'. Expected an RFC 3339 timestamp or YYYY-MM-DD",
                name, raw
            ),
        ))),
    ))
}

/// Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let db_healthy = match &state.health_checker {
        Some(checker) => !checker.check_database().await.status.is_unhealthy(),
        // No database configured to probe (memory-backed deployment).
        None => true,
    };

    let response = HealthResponse {
        status: if db_healthy { "healthy".to_string() } else { "degraded".to_string() },
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        services: ServiceHealth { database: db_healthy },
    };

    Json(ApiResponse::success(response))
}

/// Detailed health report covering all dependencies.
pub async fn detailed_health_check(
    State(state): State<AppState>,
) -> Json<ApiResponse<AggregatedHealth>> {
    let report = match &state.health_checker {
        Some(checker) => checker.check_all().await,
        None => AggregatedHealth::new(env!("CARGO_PKG_VERSION").to_string(), 0, Vec::new()),
    };

    Json(ApiResponse::success(report))
}

/// Readiness check endpoint.
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    let ready = match &state.health_checker {
        Some(checker) => checker.is_ready().await,
        None => true,
    };

    if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Liveness check endpoint.
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

/// Prometheus metrics endpoint.
pub async fn metrics_endpoint(State(state): State<AppState>) -> Result<String, StatusCode> {
    match &state.metrics_handle {
        Some(handle) => Ok(handle.render()),
        None => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

// ============================================================================
// Transaction Handlers
// ============================================================================

/// Record a deposit. The entry settles immediately.
pub async fn deposit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<DepositRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), ErrorReply> {
    let auth = auth_from_headers(&headers)?;

    if let Err(errors) = request.validate() {
        let details: Vec<ValidationErrorDetail> = errors
            .iter()
            .map(|e| ValidationErrorDetail {
                field: e.field.clone(),
                message: e.message.clone(),
            })
            .collect();

        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(
                ErrorResponse::new("VALIDATION_ERROR", "Request validation failed")
                    .with_details(details),
            )),
        ));
    }

    let mut service_request = TransactionRequest::deposit(request.bank_account_id, request.amount);
    if let Some(reason) = request.reason {
        service_request = service_request.with_reason(reason);
    }

    match state.service.deposit(&auth, service_request).await {
        Ok(entry) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(TransactionResponse::from(entry))),
        )),
        Err(AppError::Validation(msg)) => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(ErrorResponse::new("VALIDATION_ERROR", msg))),
        )),
        Err(AppError::DuplicateReference(reference)) => Err((
            StatusCode::CONFLICT,
            Json(ApiResponse::<()>::error(ErrorResponse::new(
                "DUPLICATE_REFERENCE",
                format!("Reference '{}' already exists", reference),
            ))),
        )),
        Err(e) => {
            tracing::error!("Failed to record deposit: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "An internal error occurred",
                ))),
            ))
        }
    }
}

/// Record a withdrawal. The entry settles immediately.
pub async fn withdraw(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<WithdrawalRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), ErrorReply> {
    let auth = auth_from_headers(&headers)?;

    if let Err(errors) = request.validate() {
        let details: Vec<ValidationErrorDetail> = errors
            .iter()
            .map(|e| ValidationErrorDetail {
                field: e.field.clone(),
                message: e.message.clone(),
            })
            .collect();

        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(
                ErrorResponse::new("VALIDATION_ERROR", "Request validation failed")
                    .with_details(details),
            )),
        ));
    }

    let mut service_request =
        TransactionRequest::withdrawal(request.bank_account_id, request.amount);
    if let Some(reason) = request.reason {
        service_request = service_request.with_reason(reason);
    }

    match state.service.withdraw(&auth, service_request).await {
        Ok(entry) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(TransactionResponse::from(entry))),
        )),
        Err(AppError::Validation(msg)) => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(ErrorResponse::new("VALIDATION_ERROR", msg))),
        )),
        Err(AppError::DuplicateReference(reference)) => Err((
            StatusCode::CONFLICT,
            Json(ApiResponse::<()>::error(ErrorResponse::new(
                "DUPLICATE_REFERENCE",
                format!("Reference '{}' already exists", reference),
            ))),
        )),
        Err(e) => {
            tracing::error!("Failed to record withdrawal: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "An internal error occurred",
                ))),
            ))
        }
    }
}

/// Record a transfer between two accounts. The entry settles immediately.
pub async fn transfer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<TransferRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), ErrorReply> {
    let auth = auth_from_headers(&headers)?;

    if let Err(errors) = request.validate() {
        let details: Vec<ValidationErrorDetail> = errors
            .iter()
            .map(|e| ValidationErrorDetail {
                field: e.field.clone(),
                message: e.message.clone(),
            })
            .collect();

        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(
                ErrorResponse::new("VALIDATION_ERROR", "Request validation failed")
                    .with_details(details),
            )),
        ));
    }

    let mut service_request = TransactionRequest::transfer(
        request.source_account_id,
        request.target_account_id,
        request.amount,
    );
    if let Some(reason) = request.reason {
        service_request = service_request.with_reason(reason);
    }

    match state.service.transfer(&auth, service_request).await {
        Ok(entry) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(TransactionResponse::from(entry))),
        )),
        Err(AppError::Validation(msg)) => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(ErrorResponse::new("VALIDATION_ERROR", msg))),
        )),
        Err(AppError::DuplicateReference(reference)) => Err((
            StatusCode::CONFLICT,
            Json(ApiResponse::<()>::error(ErrorResponse::new(
                "DUPLICATE_REFERENCE",
                format!("Reference '{}' already exists", reference),
            ))),
        )),
        Err(e) => {
            tracing::error!("Failed to record transfer: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "An internal error occurred",
                ))),
            ))
        }
    }
}

/// Entry history for one account, most recent first.
pub async fn account_history(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<TransactionResponse>>>, ErrorReply> {
    match state.service.account_history(&account_id).await {
        Ok(entries) => {
            let items: Vec<TransactionResponse> =
                entries.into_iter().map(TransactionResponse::from).collect();
            Ok(Json(ApiResponse::success(items)))
        }
        Err(e) => {
            tracing::error!("Failed to load account history: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "An internal error occurred",
                ))),
            ))
        }
    }
}

/// Entry history for the calling user.
pub async fn my_history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<TransactionResponse>>>, ErrorReply> {
    let auth = auth_from_headers(&headers)?;

    match state.service.user_history(auth.user_id).await {
        Ok(entries) => {
            let items: Vec<TransactionResponse> =
                entries.into_iter().map(TransactionResponse::from).collect();
            Ok(Json(ApiResponse::success(items)))
        }
        Err(e) => {
            tracing::error!("Failed to load user history: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "An internal error occurred",
                ))),
            ))
        }
    }
}

/// Get a transaction by its reference.
pub async fn get_by_reference(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<ApiResponse<TransactionResponse>>, ErrorReply> {
    match state.service.get_by_reference(&reference).await {
        Ok(entry) => Ok(Json(ApiResponse::success(TransactionResponse::from(entry)))),
        Err(AppError::NotFound(msg)) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error(ErrorResponse::new("NOT_FOUND", msg))),
        )),
        Err(e) => {
            tracing::error!("Failed to get transaction by reference: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "An internal error occurred",
                ))),
            ))
        }
    }
}

/// Get a transaction by ID.
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TransactionResponse>>, ErrorReply> {
    match state.service.get_by_id(id).await {
        Ok(entry) => Ok(Json(ApiResponse::success(TransactionResponse::from(entry)))),
        Err(AppError::NotFound(msg)) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error(ErrorResponse::new("NOT_FOUND", msg))),
        )),
        Err(e) => {
            tracing::error!("Failed to get transaction: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "An internal error occurred",
                ))),
            ))
        }
    }
}

/// Filtered, paginated search over the whole ledger (admin).
pub async fn search_transactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<TransactionResponse>>>, ErrorReply> {
    let auth = auth_from_headers(&headers)?;
    require_admin(&auth)?;

    let entry_type = match query.entry_type.as_ref() {
        Some(s) => match s.to_uppercase().as_str() {
            "DEPOSIT" => Some(EntryType::Deposit),
            "WITHDRAWAL" => Some(EntryType::Withdrawal),
            "TRANSFER" => Some(EntryType::Transfer),
            _ => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::<()>::error(ErrorResponse::new(
                        "VALIDATION_ERROR",
                        format!(
                            "Invalid entry_type '{}'. Valid values: DEPOSIT, WITHDRAWAL, TRANSFER",
                            s
                        ),
                    ))),
                ))
            }
        },
        None => None,
    };

    let status = match query.status.as_ref() {
        Some(s) => match s.to_uppercase().as_str() {
            "PENDING" => Some(EntryStatus::Pending),
            "COMPLETED" => Some(EntryStatus::Completed),
            "FAILED" => Some(EntryStatus::Failed),
            "CANCELLED" => Some(EntryStatus::Cancelled),
            _ => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::<()>::error(ErrorResponse::new(
                        "VALIDATION_ERROR",
                        format!(
                            "Invalid status '{}'. Valid values: PENDING, COMPLETED, FAILED, CANCELLED",
                            s
                        ),
                    ))),
                ))
            }
        },
        None => None,
    };

    let start_date = parse_date_param("start_date", query.start_date.as_deref())?;
    let end_date = parse_date_param("end_date", query.end_date.as_deref())?;

    let mut filter = SearchFilter::default()
        .with_page(query.page.unwrap_or(0), query.size.unwrap_or(20))
        .with_date_range(start_date, end_date)
        .sorted_by(
            query.sort_by.as_deref().map(SortField::from).unwrap_or(SortField::Date),
            query
                .sort_direction
                .as_deref()
                .map(SortDirection::from)
                .unwrap_or(SortDirection::Desc),
        );
    filter.user_id = query.user_id;
    filter.bank_account_id = query.bank_account_id;
    filter.reference = query.reference;
    filter.entry_type = entry_type;
    filter.status = status;
    filter.search = query.search;

    match state.service.search(&filter).await {
        Ok(page) => Ok(Json(ApiResponse::success(PaginatedResponse::from_page(
            page.map(TransactionResponse::from),
        )))),
        Err(e) => {
            tracing::error!("Failed to search transactions: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "An internal error occurred",
                ))),
            ))
        }
    }
}

/// Aggregate transaction counters (admin).
pub async fn transaction_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<TransactionStats>>, ErrorReply> {
    let auth = auth_from_headers(&headers)?;
    require_admin(&auth)?;

    match state.service.stats().await {
        Ok(stats) => Ok(Json(ApiResponse::success(stats))),
        Err(e) => {
            tracing::error!("Failed to compute transaction stats: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "An internal error occurred",
                ))),
            ))
        }
    }
}

/// Per-day entry counts over the last seven days (admin).
pub async fn daily_transaction_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<DailyCount>>>, ErrorReply> {
    let auth = auth_from_headers(&headers)?;
    require_admin(&auth)?;

    match state.service.daily_stats().await {
        Ok(days) => Ok(Json(ApiResponse::success(days))),
        Err(e) => {
            tracing::error!("Failed to compute daily stats: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "An internal error occurred",
                ))),
            ))
        }
    }
}

/// Cancel a pending transaction.
pub async fn cancel_transaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TransactionResponse>>, ErrorReply> {
    let auth = auth_from_headers(&headers)?;

    match state.service.cancel(&auth, id).await {
        Ok(entry) => Ok(Json(ApiResponse::success(TransactionResponse::from(entry)))),
        Err(AppError::Validation(msg)) => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(ErrorResponse::new("VALIDATION_ERROR", msg))),
        )),
        Err(AppError::NotFound(msg)) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error(ErrorResponse::new("NOT_FOUND", msg))),
        )),
        Err(AppError::Forbidden(msg)) => Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<()>::error(ErrorResponse::new("FORBIDDEN", msg))),
        )),
        Err(e) => {
            tracing::error!("Failed to cancel transaction: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "An internal error occurred",
                ))),
            ))
        }
    }
}

// ============================================================================
// Admin Transaction Handlers
// ============================================================================

/// Execute a deposit against the managed account (admin).
pub async fn admin_deposit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<DepositRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), ErrorReply> {
    let auth = auth_from_headers(&headers)?;
    require_admin(&auth)?;

    if let Err(errors) = request.validate() {
        let details: Vec<ValidationErrorDetail> = errors
            .iter()
            .map(|e| ValidationErrorDetail {
                field: e.field.clone(),
                message: e.message.clone(),
            })
            .collect();

        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(
                ErrorResponse::new("VALIDATION_ERROR", "Request validation failed")
                    .with_details(details),
            )),
        ));
    }

    let mut service_request = TransactionRequest::deposit(request.bank_account_id, request.amount);
    if let Some(reason) = request.reason {
        service_request = service_request.with_reason(reason);
    }

    match state.service.create_deposit(&auth, service_request).await {
        Ok(entry) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(TransactionResponse::from(entry))),
        )),
        Err(e) => Err(managed_flow_error("deposit", e)),
    }
}

/// Execute a withdrawal against the managed account (admin).
pub async fn admin_withdrawal(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<WithdrawalRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), ErrorReply> {
    let auth = auth_from_headers(&headers)?;
    require_admin(&auth)?;

    if let Err(errors) = request.validate() {
        let details: Vec<ValidationErrorDetail> = errors
            .iter()
            .map(|e| ValidationErrorDetail {
                field: e.field.clone(),
                message: e.message.clone(),
            })
            .collect();

        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(
                ErrorResponse::new("VALIDATION_ERROR", "Request validation failed")
                    .with_details(details),
            )),
        ));
    }

    let mut service_request =
        TransactionRequest::withdrawal(request.bank_account_id, request.amount);
    if let Some(reason) = request.reason {
        service_request = service_request.with_reason(reason);
    }

    match state.service.create_withdrawal(&auth, service_request).await {
        Ok(entry) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(TransactionResponse::from(entry))),
        )),
        Err(e) => Err(managed_flow_error("withdrawal", e)),
    }
}

/// Execute a transfer to a saved recipient (admin).
pub async fn admin_transfer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AdminTransferRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), ErrorReply> {
    let auth = auth_from_headers(&headers)?;
    require_admin(&auth)?;

    if let Err(errors) = request.validate() {
        let details: Vec<ValidationErrorDetail> = errors
            .iter()
            .map(|e| ValidationErrorDetail {
                field: e.field.clone(),
                message: e.message.clone(),
            })
            .collect();

        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(
                ErrorResponse::new("VALIDATION_ERROR", "Request validation failed")
                    .with_details(details),
            )),
        ));
    }

    let mut service_request =
        TransactionRequest::transfer_to_recipient(request.bank_account_id, request.amount);
    if let Some(recipient_id) = request.recipient_id {
        service_request = service_request.with_recipient_id(recipient_id);
    }
    if let Some(recipient_iban) = request.recipient_iban {
        service_request = service_request.with_recipient_iban(recipient_iban);
    }
    if let Some(reason) = request.reason {
        service_request = service_request.with_reason(reason);
    }

    match state.service.create_transfer(&auth, service_request).await {
        Ok(entry) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(TransactionResponse::from(entry))),
        )),
        Err(e) => Err(managed_flow_error("transfer", e)),
    }
}

/// Error mapping shared by the managed (admin) flows, which can fail on any
/// collaborator.
fn managed_flow_error(operation: &str, error: AppError) -> ErrorReply {
    match error {
        AppError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(ErrorResponse::new("VALIDATION_ERROR", msg))),
        ),
        AppError::NotFound(msg) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error(ErrorResponse::new("NOT_FOUND", msg))),
        ),
        AppError::Forbidden(msg) => (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<()>::error(ErrorResponse::new("FORBIDDEN", msg))),
        ),
        AppError::DuplicateReference(reference) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::<()>::error(ErrorResponse::new(
                "DUPLICATE_REFERENCE",
                format!("Reference '{}' already exists", reference),
            ))),
        ),
        AppError::ExternalService(msg) => (
            StatusCode::BAD_GATEWAY,
            Json(ApiResponse::<()>::error(ErrorResponse::new("EXTERNAL_ERROR", msg))),
        ),
        e => {
            tracing::error!("Failed to execute {}: {}", operation, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "An internal error occurred",
                ))),
            )
        }
    }
}
