//! Book service: child-resource CRUD and the update-or-create decision path.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::book::{Book, BookForCreation, BookForUpdate};
use crate::models::patch::{apply_patch, PatchOperation};
use crate::services::author;

/// How an update-by-id request was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The target did not exist; it was created with the caller-supplied id.
    Created(Book),
    /// The target existed and was modified in place.
    Updated(Book),
}

impl UpsertOutcome {
    pub fn book(&self) -> &Book {
        match self {
            Self::Created(book) | Self::Updated(book) => book,
        }
    }
}

/// List all books for an author.
pub async fn list_for_author(pool: &PgPool, author_id: Uuid) -> Result<Vec<Book>, AppError> {
    ensure_author(pool, author_id).await?;

    let books = sqlx::query_as::<_, Book>(
        "SELECT id, author_id, title, description FROM books \
         WHERE author_id = $1 ORDER BY title ASC",
    )
    .bind(author_id)
    .fetch_all(pool)
    .await?;

    Ok(books)
}

/// Find one book belonging to an author.
pub async fn find_for_author(
    pool: &PgPool,
    author_id: Uuid,
    book_id: Uuid,
) -> Result<Book, AppError> {
    ensure_author(pool, author_id).await?;

    find_optional(pool, author_id, book_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book '{book_id}' not found")))
}

/// Create a book with a server-generated id.
pub async fn create_for_author(
    pool: &PgPool,
    author_id: Uuid,
    input: &BookForCreation,
) -> Result<Book, AppError> {
    input.check()?;
    ensure_author(pool, author_id).await?;

    insert(pool, author_id, Uuid::new_v4(), &input.title, &input.description).await
}

/// Update-or-create a book addressed by an explicit id.
///
/// The decision procedure shared by full-document and patch-document
/// updates: check the parent, look the target up, materialize the mutable
/// update view from the payload (`materialize` receives the existing book,
/// if any), validate the view once, then either create the book with the
/// caller-supplied id or overwrite the existing one's mutable fields.
///
/// Repeating the same request is idempotent: the second run takes the
/// modify branch and leaves the same persisted state.
pub async fn upsert<F>(
    pool: &PgPool,
    author_id: Uuid,
    book_id: Uuid,
    materialize: F,
) -> Result<UpsertOutcome, AppError>
where
    F: FnOnce(Option<&Book>) -> Result<BookForUpdate, AppError>,
{
    ensure_author(pool, author_id).await?;

    let existing = find_optional(pool, author_id, book_id).await?;
    let view = materialize(existing.as_ref())?;
    view.check()?;

    match existing {
        None => {
            let book = insert(pool, author_id, book_id, &view.title, &view.description).await?;
            Ok(UpsertOutcome::Created(book))
        }
        Some(_) => {
            let book = sqlx::query_as::<_, Book>(
                "UPDATE books SET title = $1, description = $2 \
                 WHERE id = $3 AND author_id = $4 \
                 RETURNING id, author_id, title, description",
            )
            .bind(&view.title)
            .bind(&view.description)
            .bind(book_id)
            .bind(author_id)
            .fetch_one(pool)
            .await?;
            Ok(UpsertOutcome::Updated(book))
        }
    }
}

/// Materialize the update view for a patch request: project the existing
/// book (or start from an empty view when the target does not exist yet)
/// and apply the operation sequence in order.
pub fn patched_view(
    existing: Option<&Book>,
    ops: &[PatchOperation],
) -> Result<BookForUpdate, AppError> {
    let mut view = existing.map(BookForUpdate::from_entity).unwrap_or_default();
    apply_patch(&mut view, ops)?;
    Ok(view)
}

/// Delete a book belonging to an author.
pub async fn delete_for_author(
    pool: &PgPool,
    author_id: Uuid,
    book_id: Uuid,
) -> Result<(), AppError> {
    ensure_author(pool, author_id).await?;

    let result = sqlx::query("DELETE FROM books WHERE id = $1 AND author_id = $2")
        .bind(book_id)
        .bind(author_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Book '{book_id}' not found")));
    }
    Ok(())
}

async fn ensure_author(pool: &PgPool, author_id: Uuid) -> Result<(), AppError> {
    if author::exists(pool, author_id).await? {
        Ok(())
    } else {
        Err(AppError::ParentNotFound(format!(
            "Author '{author_id}' not found"
        )))
    }
}

async fn find_optional(
    pool: &PgPool,
    author_id: Uuid,
    book_id: Uuid,
) -> Result<Option<Book>, AppError> {
    let book = sqlx::query_as::<_, Book>(
        "SELECT id, author_id, title, description FROM books \
         WHERE id = $1 AND author_id = $2",
    )
    .bind(book_id)
    .bind(author_id)
    .fetch_optional(pool)
    .await?;
    Ok(book)
}

async fn insert(
    pool: &PgPool,
    author_id: Uuid,
    id: Uuid,
    title: &str,
    description: &str,
) -> Result<Book, AppError> {
    let book = sqlx::query_as::<_, Book>(
        "INSERT INTO books (id, author_id, title, description) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, author_id, title, description",
    )
    .bind(id)
    .bind(author_id)
    .bind(title)
    .bind(description)
    .fetch_one(pool)
    .await?;
    Ok(book)
}
