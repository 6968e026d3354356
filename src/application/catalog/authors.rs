use crate::application::loan::ServiceDependencies;
use crate::domain::{catalog::Author, value_objects::AuthorId};
use crate::ports::{PageRequest, Paged};

use super::errors::{CatalogError, Result};

/// 著者の入力値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorDraft {
    pub first_name: String,
    pub last_name: String,
    pub biography: String,
}

impl From<Author> for AuthorDraft {
    fn from(author: Author) -> Self {
        Self {
            first_name: author.first_name,
            last_name: author.last_name,
            biography: author.biography,
        }
    }
}

pub async fn list_authors(deps: &ServiceDependencies, page: PageRequest) -> Result<Paged<Author>> {
    deps.authors.list(page).await.map_err(CatalogError::Storage)
}

pub async fn get_author(deps: &ServiceDependencies, author_id: AuthorId) -> Result<Author> {
    deps.authors
        .get(author_id)
        .await
        .map_err(CatalogError::Storage)?
        .ok_or(CatalogError::NotFound("Author"))
}

pub async fn create_author(deps: &ServiceDependencies, draft: AuthorDraft) -> Result<Author> {
    let author = Author {
        author_id: AuthorId::new(),
        first_name: draft.first_name,
        last_name: draft.last_name,
        biography: draft.biography,
    };

    deps.authors
        .insert(&author)
        .await
        .map_err(CatalogError::Storage)?;

    tracing::info!(author_id = %author.author_id, "author created");
    Ok(author)
}

pub async fn update_author(
    deps: &ServiceDependencies,
    author_id: AuthorId,
    draft: AuthorDraft,
) -> Result<Author> {
    let author = Author {
        author_id,
        first_name: draft.first_name,
        last_name: draft.last_name,
        biography: draft.biography,
    };

    let updated = deps
        .authors
        .update(&author)
        .await
        .map_err(CatalogError::Storage)?;

    if !updated {
        return Err(CatalogError::NotFound("Author"));
    }
    Ok(author)
}

pub async fn delete_author(deps: &ServiceDependencies, author_id: AuthorId) -> Result<()> {
    let deleted = deps
        .authors
        .delete(author_id)
        .await
        .map_err(CatalogError::Storage)?;

    if !deleted {
        return Err(CatalogError::NotFound("Author"));
    }

    tracing::info!(author_id = %author_id, "author deleted");
    Ok(())
}
