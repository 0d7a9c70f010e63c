//! Route definitions for the Librarium API.

pub mod authors;
pub mod books;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::AppState;

/// Assemble the full application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/authors",
            get(authors::list).post(authors::create),
        )
        .route(
            "/authors/{author_id}",
            get(authors::get_by_id)
                .post(authors::block_creation)
                .delete(authors::remove),
        )
        .route(
            "/authors/{author_id}/books",
            get(books::list).post(books::create),
        )
        .route(
            "/authors/{author_id}/books/{book_id}",
            get(books::get_by_id)
                .put(books::upsert_full)
                .patch(books::upsert_patch)
                .delete(books::remove),
        );

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api/v1", api)
        .with_state(state)
}
