use crate::domain::{self, commands::*, value_objects::*};
use crate::ports::{LibraryStore, MemberDirectory};
use chrono::NaiveDate;
use std::sync::Arc;

use super::errors::{BorrowingError, Result};

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
///
/// ストレージポートが蔵書・貸出レコードの唯一の永続的な所有者であり、
/// ここでは長命なキャッシュを一切持たない。各操作は必要な状態を
/// その都度読み直す。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub store: Arc<dyn LibraryStore>,
    pub member_directory: Arc<dyn MemberDirectory>,
}

/// 貸出を作成する（純粋な関数）
///
/// バリデーション順序（fail fast、失敗時は一切変更しない）：
/// 1. 返却期限 < 貸出日 → `InvalidDateRange`
/// 2. 蔵書・会員が解決できない → `BookNotFound` / `MemberNotFound`
/// 3. 蔵書が貸出不可 → `BookUnavailable`
///
/// 成功時の効果は1つの原子的単位として実行される：
/// レコードの永続化と貸出可能フラグの反転。単位の内部でフラグが
/// 再確認されるため、同じ蔵書への並行貸出はどちらか一方だけが成功する。
///
/// # 戻り値
/// 成功時は採番された取引ID
pub async fn create_borrow(deps: &ServiceDependencies, cmd: CreateBorrow) -> Result<TransactionId> {
    // 1. 日付レンジの検証（ストレージ到達前）
    let open_record =
        domain::borrow::open_borrow(cmd.book_id, cmd.member_id, cmd.borrowed_on, cmd.due_on)
            .map_err(|_: domain::OpenBorrowError| BorrowingError::InvalidDateRange)?;

    // 2. 蔵書・会員の存在確認
    let book = deps
        .store
        .get_book(cmd.book_id)
        .await
        .map_err(BorrowingError::from)?
        .ok_or(BorrowingError::BookNotFound)?;

    let member_exists = deps
        .member_directory
        .exists(cmd.member_id)
        .await
        .map_err(BorrowingError::Storage)?;

    if !member_exists {
        return Err(BorrowingError::MemberNotFound);
    }

    // 3. 貸出可能性の確認（事前チェック。最終判定は原子的単位の中で行われる）
    if !book.available {
        return Err(BorrowingError::BookUnavailable);
    }

    let transaction_id = open_record.transaction_id;

    // 4. 原子的単位：レコード挿入＋フラグ反転
    deps.store
        .insert_borrow_record(open_record)
        .await
        .map_err(BorrowingError::from)?;

    tracing::info!(
        transaction_id = %transaction_id.value(),
        book_id = %cmd.book_id.value(),
        member_id = %cmd.member_id.value(),
        "borrow created"
    );

    Ok(transaction_id)
}

/// 返却を完了する（純粋な関数）
///
/// バリデーション：
/// 1. 取引IDが解決できない → `TransactionNotFound`
/// 2. 既に返却済み → `AlreadyReturned`（変更なし）
///
/// 成功時の効果は1つの原子的単位として実行される：
/// 返却日の設定と貸出可能フラグの復元。返却は一方向で、
/// 再オープンは存在しない。
pub async fn complete_return(deps: &ServiceDependencies, cmd: CompleteReturn) -> Result<()> {
    // 1. レコードの解決
    let record = deps
        .store
        .get_borrow_record(cmd.transaction_id)
        .await
        .map_err(BorrowingError::from)?
        .ok_or(BorrowingError::TransactionNotFound)?;

    // 2. 返却済みチェック（事前チェック。最終判定は原子的単位の中で行われる）
    domain::borrow::close_borrow(record, cmd.returned_on)
        .map_err(|_: domain::CloseBorrowError| BorrowingError::AlreadyReturned)?;

    // 3. 原子的単位：返却日設定＋フラグ復元
    let book_id = deps
        .store
        .set_borrow_record_return_date(cmd.transaction_id, cmd.returned_on)
        .await
        .map_err(BorrowingError::from)?;

    tracing::info!(
        transaction_id = %cmd.transaction_id.value(),
        book_id = %book_id.value(),
        "borrow returned"
    );

    Ok(())
}

/// 会員の未払い延滞料金を計算する（読み取り専用）
///
/// 会員の貸出レコード群のスナップショットを取得し、
/// ドメイン層の純粋関数に渡すだけ。ロック不要。
pub async fn compute_outstanding_fines(
    deps: &ServiceDependencies,
    member_id: MemberId,
    as_of: NaiveDate,
) -> Result<i64> {
    let records = deps
        .store
        .records_for_member(member_id)
        .await
        .map_err(BorrowingError::from)?;

    Ok(domain::fines::outstanding_fines(&records, as_of))
}
