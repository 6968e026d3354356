//! 会員宛てメールの文面

use serde::{Deserialize, Serialize};

pub const LOAN_CONFIRMATION_SUBJECT: &str = "Book Loaned Successfully";
pub const OVERDUE_NOTICE_SUBJECT: &str = "Book Loan past due date";

/// 送信するメール1通
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// 貸出完了メール
pub fn loan_confirmation(username: &str, email: &str, book_title: &str) -> EmailMessage {
    EmailMessage {
        to: email.to_string(),
        subject: LOAN_CONFIRMATION_SUBJECT.to_string(),
        body: format!(
            "Hello {username},\n\nYou have successfully loaned \"{book_title}\".\nPlease return it by the due date."
        ),
    }
}

/// 延滞通知メール
pub fn overdue_notice(member_name: &str, email: &str, book_title: &str) -> EmailMessage {
    EmailMessage {
        to: email.to_string(),
        subject: OVERDUE_NOTICE_SUBJECT.to_string(),
        body: format!(
            "Hello {member_name}, \n\n The due date for the loaned book {book_title} is overdue!"
        ),
    }
}
