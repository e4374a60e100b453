use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BookId, CloseBorrowError, MemberId, OpenBorrowError, TransactionId};

/// 蔵書 - カタログに登録された1冊の本
///
/// 不変条件：`available == false` は、この蔵書を参照する未返却の
/// 貸出レコードがちょうど1件存在することと同値。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub available: bool,
}

/// 会員 - 貸出レコードから参照される借り手
///
/// 貸出コンテキストでは参照されるのみで、変更は行わない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: MemberId,
    pub name: String,
    pub email: String,
}

// ============================================================================
// 型安全な状態パターン
// ============================================================================

/// 貸出レコードの共通フィールド
///
/// すべての貸出状態（Open, Closed）で共有されるコアデータ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowCore {
    // 識別子
    pub transaction_id: TransactionId,

    // 他の集約への参照（IDのみ）
    pub book_id: BookId,
    pub member_id: MemberId,

    // 貸出管理の責務
    pub borrowed_on: NaiveDate,
    pub due_on: NaiveDate,
}

/// 貸出中状態
///
/// ビジネスルール：
/// - 返却日を持たない
/// - 蔵書の貸出可能フラグはfalseであること（台帳側の不変条件）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenBorrow {
    #[serde(flatten)]
    pub core: BorrowCore,
}

impl std::ops::Deref for OpenBorrow {
    type Target = BorrowCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

/// 返却済み状態
///
/// ビジネスルール：
/// - returned_onが必須（型で保証）
/// - 操作不可（読み取り専用）。再オープンは存在しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedBorrow {
    #[serde(flatten)]
    pub core: BorrowCore,
    pub returned_on: NaiveDate,
}

impl std::ops::Deref for ClosedBorrow {
    type Target = BorrowCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

/// 貸出レコードの統合型
///
/// 型安全な状態パターン：
/// - 不正な状態（返却日のない返却済みレコードなど）を型システムで排除
/// - 状態遷移はOpen → Closedの一方向のみ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum BorrowRecord {
    Open(OpenBorrow),
    Closed(ClosedBorrow),
}

impl BorrowRecord {
    pub fn core(&self) -> &BorrowCore {
        match self {
            BorrowRecord::Open(open) => &open.core,
            BorrowRecord::Closed(closed) => &closed.core,
        }
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.core().transaction_id
    }

    pub fn book_id(&self) -> BookId {
        self.core().book_id
    }

    pub fn member_id(&self) -> MemberId {
        self.core().member_id
    }

    pub fn due_on(&self) -> NaiveDate {
        self.core().due_on
    }

    /// 返却日（未返却ならNone）
    pub fn returned_on(&self) -> Option<NaiveDate> {
        match self {
            BorrowRecord::Open(_) => None,
            BorrowRecord::Closed(closed) => Some(closed.returned_on),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, BorrowRecord::Open(_))
    }
}

// ============================================================================
// 純粋関数による状態遷移
// ============================================================================

/// 純粋関数：貸出レコードを新規作成する
///
/// ビジネスルール：
/// - 返却期限は貸出日より前であってはならない（永続化前に検証）
/// - 新規レコードは必ずOpen状態で始まる
///
/// 副作用なし。新しいOpenBorrowを返す。
pub fn open_borrow(
    book_id: BookId,
    member_id: MemberId,
    borrowed_on: NaiveDate,
    due_on: NaiveDate,
) -> Result<OpenBorrow, OpenBorrowError> {
    if due_on < borrowed_on {
        return Err(OpenBorrowError::InvalidDateRange);
    }

    Ok(OpenBorrow {
        core: BorrowCore {
            transaction_id: TransactionId::new(),
            book_id,
            member_id,
            borrowed_on,
            due_on,
        },
    })
}

/// 純粋関数：貸出レコードを返却済みにする
///
/// ビジネスルール：
/// - 返却済みレコードは再度返却できない
/// - 延滞していても返却は受け付ける
///
/// 副作用なし。ClosedBorrowを返す。
pub fn close_borrow(
    record: BorrowRecord,
    returned_on: NaiveDate,
) -> Result<ClosedBorrow, CloseBorrowError> {
    match record {
        BorrowRecord::Open(open) => Ok(ClosedBorrow {
            core: open.core,
            returned_on,
        }),
        BorrowRecord::Closed(_) => Err(CloseBorrowError::AlreadyReturned),
    }
}

/// 純粋関数：延滞判定
///
/// 未返却かつ返却期限を過ぎているレコードのみ延滞とみなす。
pub fn is_overdue(record: &BorrowRecord, as_of: NaiveDate) -> bool {
    record.is_open() && record.due_on() < as_of
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_open_borrow_success() {
        let book_id = BookId::new();
        let member_id = MemberId::new();

        let result = open_borrow(book_id, member_id, date(2024, 3, 1), date(2024, 3, 10));

        assert!(result.is_ok());
        let open = result.unwrap();
        assert_eq!(open.book_id, book_id);
        assert_eq!(open.member_id, member_id);
        assert_eq!(open.borrowed_on, date(2024, 3, 1));
        assert_eq!(open.due_on, date(2024, 3, 10));
    }

    #[test]
    fn test_open_borrow_same_day_due_date_is_allowed() {
        let result = open_borrow(
            BookId::new(),
            MemberId::new(),
            date(2024, 3, 1),
            date(2024, 3, 1),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_open_borrow_rejects_due_date_before_borrow_date() {
        let result = open_borrow(
            BookId::new(),
            MemberId::new(),
            date(2024, 3, 10),
            date(2024, 3, 1),
        );
        assert_eq!(result.unwrap_err(), OpenBorrowError::InvalidDateRange);
    }

    #[test]
    fn test_close_borrow_success() {
        let open = open_borrow(
            BookId::new(),
            MemberId::new(),
            date(2024, 3, 1),
            date(2024, 3, 10),
        )
        .unwrap();

        let result = close_borrow(BorrowRecord::Open(open), date(2024, 3, 20));

        assert!(result.is_ok());
        let closed = result.unwrap();
        assert_eq!(closed.returned_on, date(2024, 3, 20));
    }

    #[test]
    fn test_close_borrow_rejects_already_returned() {
        let open = open_borrow(
            BookId::new(),
            MemberId::new(),
            date(2024, 3, 1),
            date(2024, 3, 10),
        )
        .unwrap();
        let closed = close_borrow(BorrowRecord::Open(open), date(2024, 3, 20)).unwrap();

        let result = close_borrow(BorrowRecord::Closed(closed), date(2024, 3, 21));

        assert_eq!(result.unwrap_err(), CloseBorrowError::AlreadyReturned);
    }

    #[test]
    fn test_is_overdue_open_past_due() {
        let open = open_borrow(
            BookId::new(),
            MemberId::new(),
            date(2024, 1, 1),
            date(2024, 1, 10),
        )
        .unwrap();
        let record = BorrowRecord::Open(open);

        assert!(is_overdue(&record, date(2024, 1, 15)));
        assert!(!is_overdue(&record, date(2024, 1, 10)));
        assert!(!is_overdue(&record, date(2024, 1, 5)));
    }

    #[test]
    fn test_is_overdue_closed_record_is_never_overdue() {
        let open = open_borrow(
            BookId::new(),
            MemberId::new(),
            date(2024, 1, 1),
            date(2024, 1, 10),
        )
        .unwrap();
        let closed = close_borrow(BorrowRecord::Open(open), date(2024, 1, 20)).unwrap();

        assert!(!is_overdue(&BorrowRecord::Closed(closed), date(2024, 1, 25)));
    }
}
