use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::borrow::BorrowRecord;
use crate::domain::commands::CreateBorrow;
use crate::domain::value_objects::{BookId, MemberId};

/// 貸出作成リクエスト（POST /borrows）
#[derive(Debug, Deserialize)]
pub struct CreateBorrowRequest {
    pub book_id: Uuid,
    pub member_id: Uuid,
    pub borrowed_on: NaiveDate,
    pub due_on: NaiveDate,
}

impl CreateBorrowRequest {
    pub fn to_command(&self) -> CreateBorrow {
        CreateBorrow {
            book_id: BookId::from_uuid(self.book_id),
            member_id: MemberId::from_uuid(self.member_id),
            borrowed_on: self.borrowed_on,
            due_on: self.due_on,
        }
    }
}

/// 貸出作成レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct BorrowCreatedResponse {
    pub transaction_id: Uuid,
    pub book_id: Uuid,
    pub member_id: Uuid,
    pub borrowed_on: NaiveDate,
    pub due_on: NaiveDate,
}

/// 返却リクエスト（POST /borrows/:id/return）
#[derive(Debug, Deserialize)]
pub struct ReturnBorrowRequest {
    pub returned_on: NaiveDate,
}

/// 返却完了レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct BorrowReturnedResponse {
    pub transaction_id: Uuid,
    pub returned_on: NaiveDate,
}

/// 貸出レコードレスポンス（GET /borrows/:id と GET /members/:id/borrows）
#[derive(Debug, Serialize, Deserialize)]
pub struct BorrowRecordResponse {
    pub transaction_id: Uuid,
    pub book_id: Uuid,
    pub member_id: Uuid,
    pub borrowed_on: NaiveDate,
    pub due_on: NaiveDate,
    pub returned_on: Option<NaiveDate>,
    pub status: String,
}

impl From<BorrowRecord> for BorrowRecordResponse {
    fn from(record: BorrowRecord) -> Self {
        let status = if record.is_open() { "open" } else { "closed" }.to_string();
        let returned_on = record.returned_on();
        let core = record.core();

        Self {
            transaction_id: core.transaction_id.value(),
            book_id: core.book_id.value(),
            member_id: core.member_id.value(),
            borrowed_on: core.borrowed_on,
            due_on: core.due_on,
            returned_on,
            status,
        }
    }
}

/// 延滞料金照会のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct FinesQuery {
    /// 基準日（省略時は当日）
    pub as_of: Option<NaiveDate>,
}

/// 延滞料金レスポンス（GET /members/:id/fines）
#[derive(Debug, Serialize, Deserialize)]
pub struct OutstandingFinesResponse {
    pub member_id: Uuid,
    pub as_of: NaiveDate,
    pub outstanding_fines: i64,
}

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
