//! Book routes: child-resource CRUD plus PUT/PATCH update-or-create.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::models::book::{Book, BookDto, BookForCreation, BookForUpdate};
use crate::models::patch::PatchOperation;
use crate::services::book::{self as book_service, UpsertOutcome};
use crate::AppState;

fn book_location(book: &Book) -> String {
    format!("/api/v1/authors/{}/books/{}", book.author_id, book.id)
}

fn created(book: &Book) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, book_location(book))],
        ApiResponse::success(BookDto::from_entity(book)),
    )
        .into_response()
}

/// Created resources get a 201 with a Location header and a body; in-place
/// modifications get a bare 204.
fn upsert_response(outcome: UpsertOutcome) -> Response {
    match outcome {
        UpsertOutcome::Created(book) => created(&book),
        UpsertOutcome::Updated(_) => StatusCode::NO_CONTENT.into_response(),
    }
}

/// GET /api/v1/authors/{author_id}/books — all books for an author.
pub async fn list(
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<BookDto>>>, AppError> {
    let books = book_service::list_for_author(&state.db, author_id).await?;
    let dtos = books.iter().map(BookDto::from_entity).collect();
    Ok(ApiResponse::success(dtos))
}

/// GET /api/v1/authors/{author_id}/books/{book_id} — fetch one book.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((author_id, book_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<BookDto>>, AppError> {
    let book = book_service::find_for_author(&state.db, author_id, book_id).await?;
    Ok(ApiResponse::success(BookDto::from_entity(&book)))
}

/// POST /api/v1/authors/{author_id}/books — create a book with a
/// server-generated id.
pub async fn create(
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
    Json(body): Json<BookForCreation>,
) -> Result<Response, AppError> {
    let book = book_service::create_for_author(&state.db, author_id, &body).await?;
    Ok(created(&book))
}

/// PUT /api/v1/authors/{author_id}/books/{book_id} — full-document
/// update-or-create: overwrites the mutable fields when the book exists,
/// creates it with the caller-supplied id when it does not.
pub async fn upsert_full(
    State(state): State<AppState>,
    Path((author_id, book_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<BookForUpdate>,
) -> Result<Response, AppError> {
    let outcome = book_service::upsert(&state.db, author_id, book_id, move |_| Ok(body)).await?;
    Ok(upsert_response(outcome))
}

/// PATCH /api/v1/authors/{author_id}/books/{book_id} — patch-document
/// update-or-create: the operation sequence is applied to the book's
/// mutable projection (or an empty one when creating) and the result is
/// validated before anything is persisted.
pub async fn upsert_patch(
    State(state): State<AppState>,
    Path((author_id, book_id)): Path<(Uuid, Uuid)>,
    Json(ops): Json<Vec<PatchOperation>>,
) -> Result<Response, AppError> {
    let outcome = book_service::upsert(&state.db, author_id, book_id, move |existing| {
        book_service::patched_view(existing, &ops)
    })
    .await?;
    Ok(upsert_response(outcome))
}

/// DELETE /api/v1/authors/{author_id}/books/{book_id} — delete one book.
pub async fn remove(
    State(state): State<AppState>,
    Path((author_id, book_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    book_service::delete_for_author(&state.db, author_id, book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
