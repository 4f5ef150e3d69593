//! HTTP handlers for `/api/v1/books`.
//!
//! The id is resolved before the body is validated, so an unknown id answers
//! 404 whatever the payload looks like.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookshelf_http::error::AppError;
use serde_json::Value;

use super::models::BookId;
use super::resource::{Acknowledgement, BookCollection, BookResource};
use super::service::BookService;
use super::validation::{self, Mode};

pub fn router(service: BookService) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{id}",
            get(show_book)
                .put(replace_book)
                .patch(patch_book)
                .delete(delete_book),
        )
        .with_state(service)
}

async fn list_books(State(service): State<BookService>) -> Result<Json<BookCollection>, AppError> {
    let books = service.list().await?;
    Ok(Json(BookCollection::from(books)))
}

async fn create_book(
    State(service): State<BookService>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<BookResource>), AppError> {
    let Json(payload) = payload?;
    let book = validation::validate_new(&payload, Mode::Create).map_err(AppError::validation)?;
    let created = service.create(book).await?;
    Ok((StatusCode::CREATED, Json(BookResource::from(created))))
}

async fn show_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
) -> Result<Json<BookResource>, AppError> {
    let book = service.find(parse_id(&id)?).await?;
    Ok(Json(BookResource::from(book)))
}

async fn replace_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Acknowledgement>, AppError> {
    let id = parse_id(&id)?;
    service.find(id).await?;

    let Json(payload) = payload?;
    let book = validation::validate_new(&payload, Mode::Replace).map_err(AppError::validation)?;
    service.replace(id, book).await?;
    Ok(Json(updated()))
}

async fn patch_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Acknowledgement>, AppError> {
    let id = parse_id(&id)?;
    service.find(id).await?;

    let Json(payload) = payload?;
    let patch = validation::validate(&payload, Mode::Partial).map_err(AppError::validation)?;
    service.patch(id, patch).await?;
    Ok(Json(updated()))
}

async fn delete_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
) -> Result<Json<Acknowledgement>, AppError> {
    service.delete(parse_id(&id)?).await?;
    Ok(Json(Acknowledgement {
        message: "Book deleted successfully",
    }))
}

fn updated() -> Acknowledgement {
    Acknowledgement {
        message: "Book updated successfully",
    }
}

/// Ids that are not integers cannot name a row.
fn parse_id(raw: &str) -> Result<BookId, AppError> {
    raw.parse()
        .map_err(|_| AppError::not_found(format!("Book {raw} not found")))
}
