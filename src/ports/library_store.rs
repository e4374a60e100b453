use crate::domain::borrow::{Book, BorrowRecord, OpenBorrow};
use crate::domain::value_objects::{BookId, MemberId, TransactionId};
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

/// ストレージポートが返すエラー
///
/// ガード系のバリアント（`BookUnavailable`、`AlreadyReturned`）は、
/// 原子的単位の内側での再確認が失敗したとき（例: 同じ蔵書への
/// 並行呼び出しに先を越されたとき）にトランザクション操作から返される。
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("book not found")]
    BookNotFound,

    #[error("borrow record not found")]
    RecordNotFound,

    #[error("book is no longer available")]
    BookUnavailable,

    #[error("borrow record is already returned")]
    AlreadyReturned,

    /// 接続・タイムアウト・制約違反などバックエンド側の失敗
    #[error("storage backend error")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// 蔵書と貸出レコードのストレージポート
///
/// 両エンティティの永続的な所有者はストアのみであり、
/// アプリケーション層は呼び出しごとに現在の状態を読み直し、キャッシュを持たない。
/// 2つの変更操作はトランザクションラッパーであり、レコードの書き込みと
/// 貸出可否フラグの反転を1つの原子的単位にまとめ、全体がコミットされるか
/// 部分的な状態を一切残さないかのどちらかになる。
#[async_trait]
pub trait LibraryStore: Send + Sync {
    /// IDで蔵書を取得する。解決できない場合は`None`。
    async fn get_book(&self, book_id: BookId) -> Result<Option<Book>>;

    /// 貸出可否フラグの冪等な書き込み
    ///
    /// 蔵書が存在しない場合は`BookNotFound`で失敗する。
    async fn set_book_availability(&self, book_id: BookId, available: bool) -> Result<()>;

    /// トランザクションIDで貸出レコードを取得する
    async fn get_borrow_record(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<BorrowRecord>>;

    /// 会員の全貸出レコードを新しい順に取得する
    ///
    /// 延滞料金計算の入力になる。呼び出し側が履歴全体を参照できるよう、
    /// 返却済みレコードも含まれる。
    async fn records_for_member(&self, member_id: MemberId) -> Result<Vec<BorrowRecord>>;

    /// 原子的単位: 新しい未返却レコードを永続化し、蔵書の貸出可否フラグを
    /// falseに反転する
    ///
    /// フラグは単位の内側で再確認される。その間に別の呼び出しが同じ蔵書を
    /// 借りた場合、単位全体が`BookUnavailable`で失敗し、何も書き込まれない。
    /// ロックの範囲は蔵書ごとであり、異なる蔵書への貸出同士は直列化されない。
    async fn insert_borrow_record(&self, open: OpenBorrow) -> Result<()>;

    /// 原子的単位: レコードに返却日を設定し、蔵書の貸出可否フラグを復元する
    ///
    /// レコードが返却済みの場合は`AlreadyReturned`、トランザクションIDが
    /// 解決できない場合は`RecordNotFound`で失敗し、どちらの場合も何も
    /// 書き込まれない。再び貸出可能になった蔵書のIDを返す。
    async fn set_borrow_record_return_date(
        &self,
        transaction_id: TransactionId,
        returned_on: NaiveDate,
    ) -> Result<BookId>;
}
