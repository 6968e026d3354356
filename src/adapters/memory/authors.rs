use crate::domain::{catalog::Author, value_objects::AuthorId};
use crate::ports::{AuthorRepository, PageRequest, Paged, Result};
use async_trait::async_trait;

use super::{InMemoryStore, paginate};

#[async_trait]
impl AuthorRepository for InMemoryStore {
    async fn list(&self, page: PageRequest) -> Result<Paged<Author>> {
        let authors = self.state()?.authors.values().cloned().collect();
        Ok(paginate(authors, page, |a: &Author| {
            (a.last_name.clone(), a.first_name.clone(), a.author_id)
        }))
    }

    async fn get(&self, author_id: AuthorId) -> Result<Option<Author>> {
        Ok(self.state()?.authors.get(&author_id).cloned())
    }

    async fn insert(&self, author: &Author) -> Result<()> {
        self.state()?
            .authors
            .insert(author.author_id, author.clone());
        Ok(())
    }

    async fn update(&self, author: &Author) -> Result<bool> {
        let mut state = self.state()?;
        match state.authors.get_mut(&author.author_id) {
            Some(stored) => {
                *stored = author.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, author_id: AuthorId) -> Result<bool> {
        let mut state = self.state()?;
        if state.authors.remove(&author_id).is_none() {
            return Ok(false);
        }

        let orphaned: Vec<_> = state
            .books
            .values()
            .filter(|book| book.author_id == author_id)
            .map(|book| book.book_id)
            .collect();
        for book_id in orphaned {
            state.remove_book_cascade(book_id);
        }
        Ok(true)
    }
}
