use crate::domain::{catalog::Book, value_objects::BookId};
use crate::ports::{BookRepository, BookView, DuplicateKey, PageRequest, Paged, Result};
use async_trait::async_trait;

use super::{InMemoryStore, State, paginate};

fn to_view(state: &State, book: &Book) -> BookView {
    let author_name = state
        .authors
        .get(&book.author_id)
        .map(|author| author.display_name())
        .unwrap_or_default();

    BookView {
        book: book.clone(),
        author_name,
    }
}

#[async_trait]
impl BookRepository for InMemoryStore {
    async fn list(&self, page: PageRequest) -> Result<Paged<BookView>> {
        let state = self.state()?;
        let books = state.books.values().cloned().collect();
        let paged = paginate(books, page, |b: &Book| (b.title.clone(), b.book_id));
        Ok(paged.map(|book| to_view(&state, &book)))
    }

    async fn get(&self, book_id: BookId) -> Result<Option<BookView>> {
        let state = self.state()?;
        Ok(state.books.get(&book_id).map(|book| to_view(&state, book)))
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        Ok(self
            .state()?
            .books
            .values()
            .find(|book| book.isbn == isbn)
            .cloned())
    }

    async fn insert(&self, book: &Book) -> Result<()> {
        let mut state = self.state()?;
        if state.books.values().any(|b| b.isbn == book.isbn) {
            return Err(Box::new(DuplicateKey { field: "isbn" }));
        }
        state.books.insert(book.book_id, book.clone());
        Ok(())
    }

    async fn update(&self, book: &Book) -> Result<bool> {
        let mut state = self.state()?;
        if state
            .books
            .values()
            .any(|b| b.isbn == book.isbn && b.book_id != book.book_id)
        {
            return Err(Box::new(DuplicateKey { field: "isbn" }));
        }
        match state.books.get_mut(&book.book_id) {
            Some(stored) => {
                *stored = book.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, book_id: BookId) -> Result<bool> {
        Ok(self.state()?.remove_book_cascade(book_id))
    }
}
