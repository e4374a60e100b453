use crate::application::borrowing::{
    ServiceDependencies, complete_return as execute_complete_return,
    compute_outstanding_fines as execute_compute_fines, create_borrow as execute_create_borrow,
};
use crate::domain::value_objects::{MemberId, TransactionId};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    types::{
        BorrowCreatedResponse, BorrowRecordResponse, BorrowReturnedResponse, CreateBorrowRequest,
        FinesQuery, OutstandingFinesResponse, ReturnBorrowRequest,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Command handlers (POST)
// ============================================================================

/// POST /borrows - 新しい貸出を作成
///
/// 強制されるビジネスルール:
/// - 返却期限が貸出日以降であること
/// - 蔵書と会員が存在すること
/// - 蔵書が貸出可能であること
///
/// レコード挿入とフラグ反転は1つの原子的単位として実行される。
pub async fn create_borrow(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBorrowRequest>,
) -> Result<(StatusCode, Json<BorrowCreatedResponse>), ApiError> {
    let cmd = req.to_command();

    let transaction_id = execute_create_borrow(&state.service_deps, cmd).await?;

    let response = BorrowCreatedResponse {
        transaction_id: transaction_id.value(),
        book_id: req.book_id,
        member_id: req.member_id,
        borrowed_on: req.borrowed_on,
        due_on: req.due_on,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /borrows/:id/return - 返却を完了
///
/// 強制されるビジネスルール:
/// - 取引が存在すること
/// - 既に返却済みでないこと
/// - 延滞していても返却は受け付ける
pub async fn return_borrow(
    State(state): State<Arc<AppState>>,
    Path(transaction_id): Path<Uuid>,
    Json(req): Json<ReturnBorrowRequest>,
) -> Result<(StatusCode, Json<BorrowReturnedResponse>), ApiError> {
    let transaction_id = TransactionId::from_uuid(transaction_id);

    let cmd = crate::domain::commands::CompleteReturn {
        transaction_id,
        returned_on: req.returned_on,
    };

    execute_complete_return(&state.service_deps, cmd).await?;

    let response = BorrowReturnedResponse {
        transaction_id: transaction_id.value(),
        returned_on: req.returned_on,
    };

    Ok((StatusCode::OK, Json(response)))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /borrows/:id - 貸出レコードをIDで取得
pub async fn get_borrow_record(
    State(state): State<Arc<AppState>>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<BorrowRecordResponse>, QueryError> {
    let transaction_id = TransactionId::from_uuid(transaction_id);

    match state
        .service_deps
        .store
        .get_borrow_record(transaction_id)
        .await
    {
        Ok(Some(record)) => Ok(Json(BorrowRecordResponse::from(record))),
        Ok(None) => Err(QueryError::NotFound(format!(
            "Borrow transaction {} not found",
            transaction_id.value()
        ))),
        Err(e) => Err(QueryError::InternalError(e.to_string())),
    }
}

/// GET /members/:id/borrows - 会員の貸出履歴を取得
///
/// 返却済みを含む全レコードを新しい順で返す。
pub async fn list_member_borrows(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<Vec<BorrowRecordResponse>>, QueryError> {
    let member_id = MemberId::from_uuid(member_id);

    let records = state
        .service_deps
        .store
        .records_for_member(member_id)
        .await
        .map_err(|e| QueryError::InternalError(e.to_string()))?;

    Ok(Json(
        records.into_iter().map(BorrowRecordResponse::from).collect(),
    ))
}

/// GET /members/:id/fines - 会員の未払い延滞料金を照会
///
/// クエリパラメータ:
/// - as_of: 基準日（省略時は当日）
pub async fn member_outstanding_fines(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
    Query(query): Query<FinesQuery>,
) -> Result<Json<OutstandingFinesResponse>, ApiError> {
    let member_id = MemberId::from_uuid(member_id);
    let as_of = query.as_of.unwrap_or_else(|| chrono::Utc::now().date_naive());

    let total = execute_compute_fines(&state.service_deps, member_id, as_of).await?;

    Ok(Json(OutstandingFinesResponse {
        member_id: member_id.value(),
        as_of,
        outstanding_fines: total,
    }))
}

// ============================================================================
// Error types
// ============================================================================

/// クエリハンドラー用のエラー型
#[derive(Debug)]
pub enum QueryError {
    NotFound(String),
    InternalError(String),
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            QueryError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            QueryError::InternalError(msg) => {
                // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
                tracing::error!("Internal error in query handler: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(super::types::ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
