use crate::domain::notification::EmailMessage;
use async_trait::async_trait;

use super::Result;

/// メール送信ポート
///
/// 送信の仕組み（SMTP など）を抽象化する。再送は行わない。
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &EmailMessage) -> Result<()>;
}
