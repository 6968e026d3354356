#![allow(dead_code)]

use chrono::NaiveDate;
use rusty_library_lending::adapters::InMemoryStore;
use rusty_library_lending::adapters::mock::{JobQueue as MockJobQueue, MailTransport as MockMailTransport};
use rusty_library_lending::api::{AppState, create_router};
use rusty_library_lending::application::loan::ServiceDependencies;
use rusty_library_lending::application::notification::NotificationDependencies;
use rusty_library_lending::config::PaginationConfig;
use rusty_library_lending::domain::catalog::{Author, Book};
use rusty_library_lending::domain::loan::Loan;
use rusty_library_lending::domain::member::Member;
use rusty_library_lending::domain::value_objects::*;
use rusty_library_lending::ports::*;
use std::sync::Arc;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// インメモリストアとモックで組み立てたテスト環境
pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub queue: Arc<MockJobQueue>,
    pub mail: Arc<MockMailTransport>,
    pub deps: ServiceDependencies,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let queue = Arc::new(MockJobQueue::new());
        let mail = Arc::new(MockMailTransport::new());

        let deps = ServiceDependencies {
            authors: store.clone(),
            books: store.clone(),
            members: store.clone(),
            loans: store.clone(),
            job_queue: queue.clone(),
        };

        Self {
            store,
            queue,
            mail,
            deps,
        }
    }

    /// 同じストアを参照する通知ジョブの依存関係
    pub fn notification_deps(&self) -> NotificationDependencies {
        NotificationDependencies {
            loans: self.store.clone(),
            mail: self.mail.clone(),
        }
    }

    /// 実際のルーターを組み立てる
    pub fn router(&self) -> axum::Router {
        let state = AppState::new(self.deps.clone(), PaginationConfig::default());
        create_router(Arc::new(state))
    }

    pub async fn seed_author(&self, first_name: &str, last_name: &str) -> Author {
        let author = Author {
            author_id: AuthorId::new(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            biography: String::new(),
        };
        AuthorRepository::insert(self.store.as_ref(), &author)
            .await
            .unwrap();
        author
    }

    /// 著者付きで書籍を登録する
    pub async fn seed_book(&self, title: &str, isbn: &str, copies: i32) -> Book {
        let author = self.seed_author("Frank", "Herbert").await;
        let book = Book {
            book_id: BookId::new(),
            title: title.to_string(),
            author_id: author.author_id,
            isbn: isbn.to_string(),
            genre: Genre::SciFi,
            available_copies: copies,
        };
        BookRepository::insert(self.store.as_ref(), &book)
            .await
            .unwrap();
        book
    }

    pub async fn seed_member(&self, username: &str) -> Member {
        let member = Member {
            member_id: MemberId::new(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            membership_date: date(2024, 1, 1),
        };
        MemberRepository::insert(self.store.as_ref(), &member)
            .await
            .unwrap();
        member
    }

    /// 在庫を減らさずに貸出レコードを直接登録する
    pub async fn seed_loan(&self, book: &Book, member: &Member, loan: LoanDates) -> Loan {
        let record = Loan {
            loan_id: LoanId::new(),
            book_id: book.book_id,
            member_id: member.member_id,
            loan_date: loan.loan_date,
            due_date: loan.due_date,
            return_date: loan.return_date,
            is_returned: loan.return_date.is_some(),
        };
        LoanRepository::insert(self.store.as_ref(), &record)
            .await
            .unwrap();
        record
    }

    pub fn copies_of(&self, book: &Book) -> i32 {
        self.store.available_copies(book.book_id).unwrap()
    }
}

/// テスト用の貸出日付
pub struct LoanDates {
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl LoanDates {
    pub fn active(loan_date: NaiveDate, due_date: NaiveDate) -> Self {
        Self {
            loan_date,
            due_date,
            return_date: None,
        }
    }

    pub fn returned(loan_date: NaiveDate, due_date: NaiveDate, returned_on: NaiveDate) -> Self {
        Self {
            loan_date,
            due_date,
            return_date: Some(returned_on),
        }
    }
}
