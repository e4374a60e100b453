use crate::domain::value_objects::BookId;
use crate::ports::LibraryStore;
use std::sync::Arc;

use super::errors::{BorrowingError, Result};

/// 蔵書の貸出可能フラグを読む
///
/// 不変条件「貸出可能 ⟺ 未返却レコードが存在しない」のフラグ側を参照する。
/// フラグとレコードの整合はこの関数ではなく、貸出・返却の
/// 原子的単位（ストレージポート側）が保証する。
///
/// # エラー
/// 蔵書が存在しない場合は`BookNotFound`
pub async fn check_available(store: &Arc<dyn LibraryStore>, book_id: BookId) -> Result<bool> {
    let book = store
        .get_book(book_id)
        .await
        .map_err(BorrowingError::from)?;

    book.map(|b| b.available)
        .ok_or(BorrowingError::BookNotFound)
}

/// 蔵書の貸出可能フラグを書く（冪等）
///
/// 貸出・返却フローの内部では原子的単位がフラグを反転するため、
/// この操作は台帳の直接操作（在庫調整など）にのみ使う。
///
/// # エラー
/// 蔵書が存在しない場合は`BookNotFound`
pub async fn set_available(
    store: &Arc<dyn LibraryStore>,
    book_id: BookId,
    value: bool,
) -> Result<()> {
    store
        .set_book_availability(book_id, value)
        .await
        .map_err(BorrowingError::from)
}
