use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use tracing::info;

use crate::api::HealthResponse;
use crate::db::Database;
use crate::error::ApiError;
use crate::extract::{JsonBody, PageFilter, ResourceId};
use crate::model::{Book, BookInput, Page, PageInput};
use crate::store::Library;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

pub async fn healthcheck() -> Json<HealthResponse> {
    info!("got healthcheck request");
    Json(HealthResponse::ok())
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn missing_id() -> ApiError {
    ApiError::invalid_id()
}

// ============================================================================
// Book Handlers
// ============================================================================

pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<Book>>, ApiError> {
    let books = Library::new(&state.db).list_books().await?;
    info!("got {} books", books.len());
    Ok(Json(books))
}

pub async fn create_book(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<BookInput>,
) -> Result<Json<Book>, ApiError> {
    let book = Library::new(&state.db).create_book(payload).await?;
    info!(book_id = book.id, "created book");
    Ok(Json(book))
}

pub async fn update_book(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    JsonBody(payload): JsonBody<BookInput>,
) -> Result<Json<Book>, ApiError> {
    let book = Library::new(&state.db).update_book(id, payload).await?;
    info!(book_id = id, "updated book");
    Ok(Json(book))
}

pub async fn delete_book(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, ApiError> {
    Library::new(&state.db).delete_book(id).await?;
    info!(book_id = id, "deleted book and its pages");
    Ok(StatusCode::OK)
}

// ============================================================================
// Page Handlers
// ============================================================================

pub async fn list_pages(
    State(state): State<AppState>,
    PageFilter(book_id): PageFilter,
) -> Result<Json<Vec<Page>>, ApiError> {
    let pages = Library::new(&state.db).list_pages(book_id).await?;
    info!(book_id = ?book_id, "got {} pages", pages.len());
    Ok(Json(pages))
}

pub async fn create_page(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<PageInput>,
) -> Result<Json<Page>, ApiError> {
    let page = Library::new(&state.db).create_page(payload).await?;
    info!(page_id = page.id, book_id = page.book_id, "created page");
    Ok(Json(page))
}

pub async fn update_page(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    JsonBody(payload): JsonBody<PageInput>,
) -> Result<Json<Page>, ApiError> {
    let page = Library::new(&state.db).update_page(id, payload).await?;
    info!(page_id = id, "updated page");
    Ok(Json(page))
}

pub async fn delete_page(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, ApiError> {
    Library::new(&state.db).delete_page(id).await?;
    info!(page_id = id, "deleted page");
    Ok(StatusCode::OK)
}
