//! Book (catalog) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{Book, BookRequest},
};

use super::AppJson;

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books, in insertion order", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.view_book_list().await?;
    Ok(Json(books))
}

/// Get book details by ISBN
#[utoipa::path(
    get,
    path = "/books/{isbn}",
    tag = "books",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.view_book_details(&isbn).await?;
    Ok(Json(book))
}

/// Add a book to the catalog
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid book", body = crate::error::ErrorResponse),
        (status = 422, description = "A book with this ISBN already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AppJson(request): AppJson<BookRequest>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = Book::try_from(request)?;

    let created = state.services.catalog.add_book_to_catalog(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a book, adding it when the ISBN is unknown
#[utoipa::path(
    put,
    path = "/books/{isbn}",
    tag = "books",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book updated or created", body = Book),
        (status = 400, description = "Invalid book", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
    AppJson(request): AppJson<BookRequest>,
) -> AppResult<Json<Book>> {
    let book = Book::try_from(request)?;

    let updated = state.services.catalog.edit_book_details(&isbn, book).await?;
    Ok(Json(updated))
}

/// Remove a book from the catalog
#[utoipa::path(
    delete,
    path = "/books/{isbn}",
    tag = "books",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 204, description = "Book deleted, or was already absent")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<StatusCode> {
    state.services.catalog.remove_book_from_catalog(&isbn).await?;
    Ok(StatusCode::NO_CONTENT)
}
