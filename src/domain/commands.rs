use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BookId, MemberId, TransactionId};

/// コマンド：貸出を作成する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBorrow {
    pub book_id: BookId,
    pub member_id: MemberId,
    pub borrowed_on: NaiveDate,
    pub due_on: NaiveDate,
}

/// コマンド：返却を完了する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteReturn {
    pub transaction_id: TransactionId,
    pub returned_on: NaiveDate,
}
