use crate::application::loan::ServiceDependencies;
use crate::domain::{
    catalog::Book,
    value_objects::{AuthorId, BookId, Genre},
};
use crate::ports::{BookView, PageRequest, Paged};

use super::errors::{CatalogError, Result, storage_error};

const DUPLICATE_ISBN: &str = "book with this isbn already exists.";

/// 書籍の入力値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author_id: AuthorId,
    pub isbn: String,
    pub genre: Genre,
    pub available_copies: i32,
}

impl From<Book> for BookDraft {
    fn from(book: Book) -> Self {
        Self {
            title: book.title,
            author_id: book.author_id,
            isbn: book.isbn,
            genre: book.genre,
            available_copies: book.available_copies,
        }
    }
}

/// 参照先の著者・ISBNの一意性・在庫数を検証し、著者の表示名を返す
async fn validate_draft(
    deps: &ServiceDependencies,
    draft: &BookDraft,
    book_id: BookId,
) -> Result<String> {
    if draft.available_copies < 0 {
        return Err(CatalogError::Invalid(
            "available_copies must not be negative.".to_string(),
        ));
    }

    let author = deps
        .authors
        .get(draft.author_id)
        .await
        .map_err(CatalogError::Storage)?
        .ok_or_else(|| CatalogError::Invalid("Author does not exist.".to_string()))?;

    let duplicate = deps
        .books
        .find_by_isbn(&draft.isbn)
        .await
        .map_err(CatalogError::Storage)?
        .is_some_and(|existing| existing.book_id != book_id);

    if duplicate {
        return Err(CatalogError::Invalid(DUPLICATE_ISBN.to_string()));
    }

    Ok(author.display_name())
}

fn build_book(book_id: BookId, draft: BookDraft) -> Book {
    Book {
        book_id,
        title: draft.title,
        author_id: draft.author_id,
        isbn: draft.isbn,
        genre: draft.genre,
        available_copies: draft.available_copies,
    }
}

pub async fn list_books(deps: &ServiceDependencies, page: PageRequest) -> Result<Paged<BookView>> {
    deps.books.list(page).await.map_err(CatalogError::Storage)
}

pub async fn get_book(deps: &ServiceDependencies, book_id: BookId) -> Result<BookView> {
    deps.books
        .get(book_id)
        .await
        .map_err(CatalogError::Storage)?
        .ok_or(CatalogError::NotFound("Book"))
}

pub async fn create_book(deps: &ServiceDependencies, draft: BookDraft) -> Result<BookView> {
    let book_id = BookId::new();
    let author_name = validate_draft(deps, &draft, book_id).await?;
    let book = build_book(book_id, draft);

    deps.books
        .insert(&book)
        .await
        .map_err(|e| storage_error(e, DUPLICATE_ISBN))?;

    tracing::info!(book_id = %book.book_id, isbn = %book.isbn, "book created");
    Ok(BookView { book, author_name })
}

pub async fn update_book(
    deps: &ServiceDependencies,
    book_id: BookId,
    draft: BookDraft,
) -> Result<BookView> {
    // 存在しないIDに対しては入力エラーより先に404を返す
    get_book(deps, book_id).await?;

    let author_name = validate_draft(deps, &draft, book_id).await?;
    let book = build_book(book_id, draft);

    let updated = deps
        .books
        .update(&book)
        .await
        .map_err(|e| storage_error(e, DUPLICATE_ISBN))?;

    if !updated {
        return Err(CatalogError::NotFound("Book"));
    }
    Ok(BookView { book, author_name })
}

pub async fn delete_book(deps: &ServiceDependencies, book_id: BookId) -> Result<()> {
    let deleted = deps
        .books
        .delete(book_id)
        .await
        .map_err(CatalogError::Storage)?;

    if !deleted {
        return Err(CatalogError::NotFound("Book"));
    }

    tracing::info!(book_id = %book_id, "book deleted");
    Ok(())
}
