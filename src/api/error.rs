use crate::application::borrowing::BorrowingError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラー分類をHTTPステータスへ写像する。
/// 分類ごとに安定したエラーカテゴリを返し、ストレージの生エラー文字列は
/// クライアントへ出さない。
#[derive(Debug)]
pub struct ApiError(BorrowingError);

impl From<BorrowingError> for ApiError {
    fn from(err: BorrowingError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self.0 {
            // 400 Bad Request - ストレージ到達前に検出されるバリデーションエラー
            BorrowingError::InvalidDateRange => (
                StatusCode::BAD_REQUEST,
                "INVALID_DATE_RANGE",
                "Due date cannot be earlier than borrow date",
            ),

            // 404 Not Found - 参照された識別子が存在しない
            BorrowingError::BookNotFound => {
                (StatusCode::NOT_FOUND, "BOOK_NOT_FOUND", "Book not found")
            }
            BorrowingError::MemberNotFound => (
                StatusCode::NOT_FOUND,
                "MEMBER_NOT_FOUND",
                "Member not found",
            ),
            BorrowingError::TransactionNotFound => (
                StatusCode::NOT_FOUND,
                "TRANSACTION_NOT_FOUND",
                "Borrow transaction not found",
            ),

            // 409 Conflict - 現在の状態と矛盾する操作
            BorrowingError::BookUnavailable => (
                StatusCode::CONFLICT,
                "BOOK_UNAVAILABLE",
                "Book is currently unavailable (already borrowed)",
            ),
            BorrowingError::AlreadyReturned => (
                StatusCode::CONFLICT,
                "ALREADY_RETURNED",
                "This book has already been returned",
            ),

            // 500 Internal Server Error - ストレージ障害
            // 詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            BorrowingError::Storage(ref e) => {
                tracing::error!("Storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Storage operation failed",
                )
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
