mod fanout;
mod sender;

pub use fanout::{BatchReport, NotificationBatch, dispatch_batch};
pub use sender::{
    NotificationDependencies, NotificationError, NotificationWorker, SendOutcome,
    send_loan_notification, send_overdue_notice,
};
