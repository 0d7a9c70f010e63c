//! Author routes: paged listing with navigation links, fetch, create, delete.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::models::author::{AuthorDto, CreateAuthor};
use crate::models::pagination::{PageQuery, PagedResponse};
use crate::services::author::{self as author_service, AuthorFilters};
use crate::AppState;

/// Base path used when rendering previous/next page links.
pub const AUTHORS_PATH: &str = "/api/v1/authors";

/// GET /api/v1/authors — paged, filterable author listing.
///
/// Always 200: an empty page is a valid view of the collection, even when
/// the requested page number is past the end.
pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(filters): Query<AuthorFilters>,
) -> Result<Json<ApiResponse<PagedResponse<AuthorDto>>>, AppError> {
    let result = author_service::list(&state.db, &filters, &page)
        .await?
        .map(|author| AuthorDto::from_entity(&author));
    let body = PagedResponse::new(result, AUTHORS_PATH, &filters, &page);
    Ok(ApiResponse::success(body))
}

/// GET /api/v1/authors/{author_id} — fetch one author.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
) -> Result<Json<ApiResponse<AuthorDto>>, AppError> {
    let author = author_service::find_by_id(&state.db, author_id).await?;
    Ok(ApiResponse::success(AuthorDto::from_entity(&author)))
}

/// POST /api/v1/authors — create an author (server-generated id), with any
/// nested books persisted alongside.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateAuthor>,
) -> Result<Response, AppError> {
    let author = author_service::create(&state.db, &body).await?;
    let location = format!("{AUTHORS_PATH}/{}", author.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        ApiResponse::success(AuthorDto::from_entity(&author)),
    )
        .into_response())
}

/// POST /api/v1/authors/{author_id} — creation with a client-chosen author
/// id is not supported: 409 when the id exists, 404 otherwise.
pub async fn block_creation(
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
) -> Result<Response, AppError> {
    if author_service::exists(&state.db, author_id).await? {
        Err(AppError::Conflict(format!(
            "Author '{author_id}' already exists; authors cannot be created with a client-supplied id"
        )))
    } else {
        Err(AppError::NotFound(format!("Author '{author_id}' not found")))
    }
}

/// DELETE /api/v1/authors/{author_id} — delete an author and their books.
pub async fn remove(
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    author_service::delete(&state.db, author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
