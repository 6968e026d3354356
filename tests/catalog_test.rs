use async_trait::async_trait;
use common::{TestContext, date};
use rusty_library_lending::adapters::InMemoryStore;
use rusty_library_lending::application::catalog::{
    BookDraft, CatalogError, MemberDraft, create_book, create_member, update_member,
};
use rusty_library_lending::domain::catalog::Book;
use rusty_library_lending::domain::member::Member;
use rusty_library_lending::domain::value_objects::*;
use rusty_library_lending::ports::*;
use std::sync::Arc;

mod common;

// ============================================================================
// 一意性チェックをすり抜けた重複を再現するリポジトリ
// ============================================================================

/// 検索では常に見つからないが、保存は共有ストアに委ねる
///
/// 重複チェックの直後に別のリクエストが同じ値を登録した状況と同じになる。
struct StaleLookup {
    store: Arc<InMemoryStore>,
}

#[async_trait]
impl BookRepository for StaleLookup {
    async fn list(&self, page: PageRequest) -> Result<Paged<BookView>> {
        BookRepository::list(self.store.as_ref(), page).await
    }

    async fn get(&self, book_id: BookId) -> Result<Option<BookView>> {
        BookRepository::get(self.store.as_ref(), book_id).await
    }

    async fn find_by_isbn(&self, _isbn: &str) -> Result<Option<Book>> {
        Ok(None)
    }

    async fn insert(&self, book: &Book) -> Result<()> {
        BookRepository::insert(self.store.as_ref(), book).await
    }

    async fn update(&self, book: &Book) -> Result<bool> {
        BookRepository::update(self.store.as_ref(), book).await
    }

    async fn delete(&self, book_id: BookId) -> Result<bool> {
        BookRepository::delete(self.store.as_ref(), book_id).await
    }
}

#[async_trait]
impl MemberRepository for StaleLookup {
    async fn list(&self, page: PageRequest) -> Result<Paged<Member>> {
        MemberRepository::list(self.store.as_ref(), page).await
    }

    async fn get(&self, member_id: MemberId) -> Result<Option<Member>> {
        MemberRepository::get(self.store.as_ref(), member_id).await
    }

    async fn exists(&self, member_id: MemberId) -> Result<bool> {
        MemberRepository::exists(self.store.as_ref(), member_id).await
    }

    async fn find_by_username(&self, _username: &str) -> Result<Option<Member>> {
        Ok(None)
    }

    async fn insert(&self, member: &Member) -> Result<()> {
        MemberRepository::insert(self.store.as_ref(), member).await
    }

    async fn update(&self, member: &Member) -> Result<bool> {
        MemberRepository::update(self.store.as_ref(), member).await
    }

    async fn delete(&self, member_id: MemberId) -> Result<bool> {
        MemberRepository::delete(self.store.as_ref(), member_id).await
    }

    async fn top_active(&self, limit: u64) -> Result<Vec<ActiveMemberView>> {
        MemberRepository::top_active(self.store.as_ref(), limit).await
    }
}

fn with_stale_lookup(ctx: &TestContext) -> rusty_library_lending::application::loan::ServiceDependencies {
    let stale = Arc::new(StaleLookup {
        store: ctx.store.clone(),
    });
    let mut deps = ctx.deps.clone();
    deps.books = stale.clone();
    deps.members = stale;
    deps
}

fn invalid_message(err: CatalogError) -> String {
    match err {
        CatalogError::Invalid(message) => message,
        other => panic!("expected invalid input, got {other:?}"),
    }
}

// ============================================================================
// 一意制約違反
// ============================================================================

#[tokio::test]
async fn test_create_book_reports_duplicate_isbn_caught_by_store() {
    let ctx = TestContext::new();
    let existing = ctx.seed_book("Dune", "9780441172719", 1).await;
    let deps = with_stale_lookup(&ctx);

    let draft = BookDraft {
        title: "Dune (reissue)".to_string(),
        author_id: existing.author_id,
        isbn: existing.isbn.clone(),
        genre: Genre::SciFi,
        available_copies: 1,
    };

    let err = create_book(&deps, draft).await.unwrap_err();
    assert_eq!(invalid_message(err), "book with this isbn already exists.");
}

#[tokio::test]
async fn test_create_member_reports_duplicate_username_caught_by_store() {
    let ctx = TestContext::new();
    ctx.seed_member("alice").await;
    let deps = with_stale_lookup(&ctx);

    let draft = MemberDraft {
        username: "alice".to_string(),
        email: "alice@library.test".to_string(),
    };

    let err = create_member(&deps, draft, date(2024, 3, 1))
        .await
        .unwrap_err();
    assert_eq!(
        invalid_message(err),
        "A user with that username already exists."
    );
}

#[tokio::test]
async fn test_update_member_reports_duplicate_username_caught_by_store() {
    let ctx = TestContext::new();
    ctx.seed_member("alice").await;
    let bob = ctx.seed_member("bob").await;
    let deps = with_stale_lookup(&ctx);

    let draft = MemberDraft {
        username: "alice".to_string(),
        email: bob.email.clone(),
    };

    let err = update_member(&deps, bob.member_id, draft)
        .await
        .unwrap_err();
    assert_eq!(
        invalid_message(err),
        "A user with that username already exists."
    );

    // 既存の会員は変更されない
    let stored = MemberRepository::get(ctx.store.as_ref(), bob.member_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.username, "bob");
}
