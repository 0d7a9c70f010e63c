//! Author catalog service: filtered, paged listing and CRUD.

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::author::{Author, CreateAuthor};
use crate::models::book::Book;
use crate::models::pagination::{LinkFilters, PageQuery, PagedResult};

/// Filter criteria for the author listing.
///
/// Absent and empty-string values both mean "no filter applied"; downstream
/// matching treats them identically.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorFilters {
    pub search_query: Option<String>,
    pub genre: Option<String>,
}

impl AuthorFilters {
    fn effective_genre(&self) -> Option<&str> {
        self.genre.as_deref().map(str::trim).filter(|g| !g.is_empty())
    }

    fn effective_search(&self) -> Option<&str> {
        self.search_query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

impl LinkFilters for AuthorFilters {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(ref q) = self.search_query {
            pairs.push(("searchQuery", q.clone()));
        }
        if let Some(ref g) = self.genre {
            pairs.push(("genre", g.clone()));
        }
        pairs
    }
}

/// List authors with filters and pagination.
///
/// The page slice is cut in SQL: a count of the filtered collection plus a
/// LIMIT/OFFSET query at offset `(page - 1) * page_size`, ordered by name.
pub async fn list(
    pool: &PgPool,
    filters: &AuthorFilters,
    page: &PageQuery,
) -> Result<PagedResult<Author>, AppError> {
    let mut conditions: Vec<String> = Vec::new();
    let mut param_index = 0u32;

    let genre = filters.effective_genre();
    let search = filters.effective_search();

    if genre.is_some() {
        param_index += 1;
        conditions.push(format!("LOWER(genre) = LOWER(${param_index})"));
    }
    if search.is_some() {
        param_index += 1;
        conditions.push(format!(
            "(genre ILIKE ${param_index} OR first_name ILIKE ${param_index} OR last_name ILIKE ${param_index})"
        ));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM authors {where_clause}");
    let data_sql = format!(
        "SELECT id, first_name, last_name, date_of_birth, genre \
         FROM authors {where_clause} \
         ORDER BY first_name ASC, last_name ASC LIMIT {} OFFSET {}",
        page.limit(),
        page.offset()
    );

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    let mut data_query = sqlx::query_as::<_, Author>(&data_sql);

    if let Some(genre) = genre {
        count_query = count_query.bind(genre.to_string());
        data_query = data_query.bind(genre.to_string());
    }
    if let Some(search) = search {
        let pattern = format!("%{search}%");
        count_query = count_query.bind(pattern.clone());
        data_query = data_query.bind(pattern);
    }

    let total = count_query.fetch_one(pool).await?;
    let items = data_query.fetch_all(pool).await?;

    Ok(PagedResult::new(items, total, page))
}

/// Find an author by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Author, AppError> {
    sqlx::query_as::<_, Author>(
        "SELECT id, first_name, last_name, date_of_birth, genre FROM authors WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Author '{id}' not found")))
}

/// Existence check used before operating on an author's child resources.
pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let found = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(found)
}

/// Create an author, together with any nested books, in one transaction.
pub async fn create(pool: &PgPool, input: &CreateAuthor) -> Result<Author, AppError> {
    input.validate()?;
    for book in &input.books {
        book.check()?;
    }

    let mut tx = pool.begin().await?;

    let author = sqlx::query_as::<_, Author>(
        "INSERT INTO authors (id, first_name, last_name, date_of_birth, genre) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, first_name, last_name, date_of_birth, genre",
    )
    .bind(Uuid::new_v4())
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(input.date_of_birth)
    .bind(&input.genre)
    .fetch_one(&mut *tx)
    .await?;

    for book in &input.books {
        sqlx::query_as::<_, Book>(
            "INSERT INTO books (id, author_id, title, description) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, author_id, title, description",
        )
        .bind(Uuid::new_v4())
        .bind(author.id)
        .bind(&book.title)
        .bind(&book.description)
        .fetch_one(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(author)
}

/// Delete an author; their books go with them (FK cascade).
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM authors WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Author '{id}' not found")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_absent_filters_are_equivalent() {
        let absent = AuthorFilters::default();
        let empty = AuthorFilters {
            search_query: Some("".into()),
            genre: Some("   ".into()),
        };
        assert!(absent.effective_genre().is_none());
        assert!(absent.effective_search().is_none());
        assert!(empty.effective_genre().is_none());
        assert!(empty.effective_search().is_none());
    }

    #[test]
    fn filters_are_trimmed() {
        let filters = AuthorFilters {
            search_query: Some("  king ".into()),
            genre: Some(" Horror ".into()),
        };
        assert_eq!(filters.effective_search(), Some("king"));
        assert_eq!(filters.effective_genre(), Some("Horror"));
    }

    #[test]
    fn link_pairs_are_stable_and_preserve_raw_values() {
        let filters = AuthorFilters {
            search_query: Some("king".into()),
            genre: Some("Horror".into()),
        };
        let pairs = filters.query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("searchQuery", "king".to_string()),
                ("genre", "Horror".to_string())
            ]
        );
    }
}
