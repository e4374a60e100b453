use crate::domain::value_objects::MemberId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 会員台帳ポート
///
/// 貸出コンテキストと会員管理コンテキストの境界を維持する。
/// 貸出コンテキストは会員IDのみを知り、会員詳細は知らない。
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// 会員が存在するか確認する
    ///
    /// 貸出作成前のバリデーションに使用される。
    async fn exists(&self, member_id: MemberId) -> Result<bool>;
}
