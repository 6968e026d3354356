use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::catalog::{AuthorDraft, BookDraft, LoanDraft, MemberDraft};
use crate::domain::{
    catalog::{Author, DEFAULT_AVAILABLE_COPIES},
    loan::{Loan, LoanStatus},
    member::Member,
    value_objects::{AuthorId, BookId, Genre, MemberId},
};
use crate::ports::{ActiveMemberView, BookView};

// ============================================================================
// Lending
// ============================================================================

/// 貸出・返却リクエスト（POST /books/:id/loan, POST /books/:id/return_book）
#[derive(Debug, Default, Deserialize)]
pub struct LoanBookRequest {
    pub member_id: Option<Uuid>,
}

impl LoanBookRequest {
    pub fn member_id(&self) -> Option<MemberId> {
        self.member_id.map(MemberId::from_uuid)
    }
}

/// 延長リクエスト（POST /loans/:id/extend_due_date）
///
/// `additional_days` は整数または整数を表す文字列を受け付ける。
/// それ以外はすべて未指定として扱う。
#[derive(Debug, Default, Deserialize)]
pub struct ExtendDueDateRequest {
    pub additional_days: Option<serde_json::Value>,
}

impl ExtendDueDateRequest {
    pub fn additional_days(&self) -> Option<i64> {
        match self.additional_days.as_ref()? {
            serde_json::Value::Number(number) => number.as_i64(),
            serde_json::Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}

/// 処理結果メッセージ
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

// ============================================================================
// Authors
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct AuthorRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[serde(default)]
    pub biography: String,
}

impl From<AuthorRequest> for AuthorDraft {
    fn from(req: AuthorRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            biography: req.biography,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct AuthorPatch {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    pub biography: Option<String>,
}

impl AuthorPatch {
    pub fn apply(self, current: Author) -> AuthorDraft {
        let draft = AuthorDraft::from(current);
        AuthorDraft {
            first_name: self.first_name.unwrap_or(draft.first_name),
            last_name: self.last_name.unwrap_or(draft.last_name),
            biography: self.biography.unwrap_or(draft.biography),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub biography: String,
}

impl From<Author> for AuthorResponse {
    fn from(author: Author) -> Self {
        Self {
            id: author.author_id.value(),
            first_name: author.first_name,
            last_name: author.last_name,
            biography: author.biography,
        }
    }
}

// ============================================================================
// Books
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct BookRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub author_id: Uuid,
    #[validate(length(min = 1, max = 13))]
    pub isbn: String,
    pub genre: Genre,
    #[validate(range(min = 0))]
    pub available_copies: Option<i32>,
}

impl From<BookRequest> for BookDraft {
    fn from(req: BookRequest) -> Self {
        Self {
            title: req.title,
            author_id: AuthorId::from_uuid(req.author_id),
            isbn: req.isbn,
            genre: req.genre,
            available_copies: req.available_copies.unwrap_or(DEFAULT_AVAILABLE_COPIES),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct BookPatch {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub author_id: Option<Uuid>,
    #[validate(length(min = 1, max = 13))]
    pub isbn: Option<String>,
    pub genre: Option<Genre>,
    #[validate(range(min = 0))]
    pub available_copies: Option<i32>,
}

impl BookPatch {
    pub fn apply(self, current: BookView) -> BookDraft {
        let draft = BookDraft::from(current.book);
        BookDraft {
            title: self.title.unwrap_or(draft.title),
            author_id: self
                .author_id
                .map(AuthorId::from_uuid)
                .unwrap_or(draft.author_id),
            isbn: self.isbn.unwrap_or(draft.isbn),
            genre: self.genre.unwrap_or(draft.genre),
            available_copies: self.available_copies.unwrap_or(draft.available_copies),
        }
    }
}

/// 書籍に埋め込む著者情報
#[derive(Debug, Serialize, Deserialize)]
pub struct BookAuthor {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookResponse {
    pub id: Uuid,
    pub title: String,
    pub author: BookAuthor,
    pub isbn: String,
    pub genre: Genre,
    pub available_copies: i32,
}

impl From<BookView> for BookResponse {
    fn from(view: BookView) -> Self {
        Self {
            id: view.book.book_id.value(),
            title: view.book.title,
            author: BookAuthor {
                id: view.book.author_id.value(),
                name: view.author_name,
            },
            isbn: view.book.isbn,
            genre: view.book.genre,
            available_copies: view.book.available_copies,
        }
    }
}

// ============================================================================
// Members
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct MemberRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(email, length(max = 254))]
    pub email: String,
}

impl From<MemberRequest> for MemberDraft {
    fn from(req: MemberRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct MemberPatch {
    #[validate(length(min = 1, max = 150))]
    pub username: Option<String>,
    #[validate(email, length(max = 254))]
    pub email: Option<String>,
}

impl MemberPatch {
    pub fn apply(self, current: Member) -> MemberDraft {
        let draft = MemberDraft::from(current);
        MemberDraft {
            username: self.username.unwrap_or(draft.username),
            email: self.email.unwrap_or(draft.email),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MemberResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub membership_date: NaiveDate,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.member_id.value(),
            username: member.username,
            email: member.email,
            membership_date: member.membership_date,
        }
    }
}

/// 貸出中冊数ランキングの1件（GET /members/top-active）
#[derive(Debug, Serialize, Deserialize)]
pub struct TopActiveMemberResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub active_loans: u64,
}

impl From<ActiveMemberView> for TopActiveMemberResponse {
    fn from(view: ActiveMemberView) -> Self {
        Self {
            id: view.member_id.value(),
            username: view.username,
            email: view.email,
            active_loans: view.active_loans,
        }
    }
}

// ============================================================================
// Loans
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoanRequest {
    pub book_id: Uuid,
    pub member_id: Uuid,
    pub loan_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_returned: bool,
}

impl From<LoanRequest> for LoanDraft {
    fn from(req: LoanRequest) -> Self {
        Self {
            book_id: BookId::from_uuid(req.book_id),
            member_id: MemberId::from_uuid(req.member_id),
            loan_date: req.loan_date,
            due_date: req.due_date,
            return_date: req.return_date,
            is_returned: req.is_returned,
        }
    }
}

/// 未指定（`None`）と `null`（`Some(None)`）を区別する
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct LoanPatch {
    pub book_id: Option<Uuid>,
    pub member_id: Option<Uuid>,
    pub loan_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    /// `null` で返却日を消去する
    #[serde(default, deserialize_with = "nullable")]
    pub return_date: Option<Option<NaiveDate>>,
    pub is_returned: Option<bool>,
}

impl LoanPatch {
    pub fn apply(self, current: Loan) -> LoanDraft {
        let draft = LoanDraft::from(current);
        LoanDraft {
            book_id: self.book_id.map(BookId::from_uuid).unwrap_or(draft.book_id),
            member_id: self
                .member_id
                .map(MemberId::from_uuid)
                .unwrap_or(draft.member_id),
            loan_date: self.loan_date.or(draft.loan_date),
            due_date: self.due_date.or(draft.due_date),
            return_date: self.return_date.unwrap_or(draft.return_date),
            is_returned: self.is_returned.unwrap_or(draft.is_returned),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoanResponse {
    pub id: Uuid,
    pub book_id: Uuid,
    pub member_id: Uuid,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub is_returned: bool,
    pub status: LoanStatus,
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        let status = loan.status();
        Self {
            id: loan.loan_id.value(),
            book_id: loan.book_id.value(),
            member_id: loan.member_id.value(),
            loan_date: loan.loan_date,
            due_date: loan.due_date,
            return_date: loan.return_date,
            is_returned: loan.is_returned,
            status,
        }
    }
}
