//! SMTP によるメール送信
//!
//! lettre の `AsyncSmtpTransport` を使用する。開発環境ではローカルの
//! SMTP サーバー（Mailpit など）に TLS なしで接続する。

use crate::domain::notification::EmailMessage;
use crate::ports::{MailTransport, Result};
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
};

/// SMTP メール送信
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailTransport {
    /// 新しい SMTP 送信インスタンスを作成
    ///
    /// 送信元アドレスが不正な場合はエラーを返す。
    pub fn new(host: &str, port: u16, from_address: &str) -> Result<Self> {
        let from: Mailbox = from_address.parse()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, email: &EmailMessage) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse::<Mailbox>()?)
            .subject(&email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())?;

        self.transport.send(message).await?;
        tracing::debug!(to = %email.to, subject = %email.subject, "email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_rejects_invalid_from_address() {
        assert!(SmtpMailTransport::new("localhost", 1025, "not an address").is_err());
    }

    #[tokio::test]
    async fn test_new_accepts_valid_from_address() {
        assert!(SmtpMailTransport::new("localhost", 1025, "library@example.com").is_ok());
    }
}
