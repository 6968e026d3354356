pub mod job_queue;
pub mod mail_transport;

pub use job_queue::JobQueue;
pub use mail_transport::MailTransport;
