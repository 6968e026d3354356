//! メール送信アダプタ

mod noop;
mod smtp;

pub use noop::NoopMailTransport;
pub use smtp::SmtpMailTransport;
