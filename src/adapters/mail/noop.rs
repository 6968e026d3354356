use crate::domain::notification::EmailMessage;
use crate::ports::{MailTransport, Result};
use async_trait::async_trait;

/// メールを送信せず、ログ出力のみ行う
///
/// メール送信を無効化した環境で使用する。
#[derive(Debug, Clone, Default)]
pub struct NoopMailTransport;

#[async_trait]
impl MailTransport for NoopMailTransport {
    async fn send(&self, email: &EmailMessage) -> Result<()> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "email disabled, skipping delivery"
        );
        Ok(())
    }
}
