use thiserror::Error;

use crate::ports::StoreError;

/// 貸出管理アプリケーション層のエラー
///
/// エラー分類：
/// - バリデーション（InvalidDateRange）：ストレージ到達前に検出
/// - 未検出（BookNotFound, MemberNotFound, TransactionNotFound）
/// - 競合（BookUnavailable, AlreadyReturned）：操作自体は整形だが現在の状態と矛盾
/// - ストレージ（Storage）：ポート障害。原子的単位全体がロールバック済み
#[derive(Debug, Error)]
pub enum BorrowingError {
    /// 返却期限が貸出日より前
    #[error("Due date cannot be earlier than borrow date")]
    InvalidDateRange,

    /// 蔵書が存在しない
    #[error("Book not found")]
    BookNotFound,

    /// 会員が存在しない
    #[error("Member not found")]
    MemberNotFound,

    /// 貸出レコードが存在しない
    #[error("Borrow transaction not found")]
    TransactionNotFound,

    /// 蔵書が貸出中
    #[error("Book is currently unavailable (already borrowed)")]
    BookUnavailable,

    /// 既に返却済み
    #[error("This book has already been returned")]
    AlreadyReturned,

    /// ストレージポートのエラー
    #[error("Storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<StoreError> for BorrowingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::BookNotFound => BorrowingError::BookNotFound,
            StoreError::RecordNotFound => BorrowingError::TransactionNotFound,
            StoreError::BookUnavailable => BorrowingError::BookUnavailable,
            StoreError::AlreadyReturned => BorrowingError::AlreadyReturned,
            StoreError::Backend(source) => BorrowingError::Storage(source),
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, BorrowingError>;
