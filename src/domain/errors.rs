/// 貸出作成のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenBorrowError {
    /// 返却期限が貸出日より前
    InvalidDateRange,
}

/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseBorrowError {
    /// 既に返却済み
    AlreadyReturned,
}
