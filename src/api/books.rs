//! Book catalog endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::book::{BookRecord, CreateBook},
    AppState,
};

/// Pagination query parameters.
///
/// Kept as raw strings so malformed values get a readable error body
/// instead of the extractor's plain-text rejection.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Maximum number of books to return (0 = no limit)
    #[param(value_type = Option<u64>)]
    pub limit: Option<String>,
    /// Number of books to skip
    #[param(value_type = Option<u64>)]
    pub skip: Option<String>,
}

impl PageQuery {
    /// Validated `(limit, skip)`, both defaulting to 0
    pub fn parse(&self) -> AppResult<(usize, usize)> {
        let limit = parse_count("limit", self.limit.as_deref())?;
        let skip = parse_count("skip", self.skip.as_deref())?;
        Ok((limit, skip))
    }
}

fn parse_count(name: &str, raw: Option<&str>) -> AppResult<usize> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(0),
        Some(raw) => raw,
    };

    let value: i64 = raw
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{} must be an integer", name)))?;
    usize::try_from(value).map_err(|_| AppError::BadRequest(format!("{} must be >= 0", name)))
}

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(PageQuery),
    responses(
        (status = 200, description = "Books in catalog order", body = Vec<BookRecord>),
        (status = 400, description = "Invalid limit or skip", body = ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Vec<BookRecord>>> {
    let (limit, skip) = page.parse()?;
    Ok(Json(state.services.catalog.list_books(limit, skip)))
}

/// Search books by author fragment
#[utoipa::path(
    get,
    path = "/books/authors/{author}",
    tag = "books",
    params(
        ("author" = String, Path, description = "Case-insensitive author fragment"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Matching books", body = Vec<BookRecord>),
        (status = 400, description = "Invalid limit or skip", body = ErrorResponse)
    )
)]
pub async fn search_by_author(
    State(state): State<AppState>,
    Path(author): Path<String>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Vec<BookRecord>>> {
    let (limit, skip) = page.parse()?;
    Ok(Json(
        state.services.catalog.search_by_author(&author, limit, skip),
    ))
}

/// Search books by title fragment
#[utoipa::path(
    get,
    path = "/books/title/{title}",
    tag = "books",
    params(
        ("title" = String, Path, description = "Case-insensitive title fragment"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Matching books", body = Vec<BookRecord>),
        (status = 400, description = "Invalid limit or skip", body = ErrorResponse)
    )
)]
pub async fn search_by_title(
    State(state): State<AppState>,
    Path(title): Path<String>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Vec<BookRecord>>> {
    let (limit, skip) = page.parse()?;
    Ok(Json(state.services.catalog.search_by_title(&title, limit, skip)))
}

/// Get a book by ISBN
#[utoipa::path(
    get,
    path = "/books/isbn/{isbn}",
    tag = "books",
    params(
        ("isbn" = String, Path, description = "Exact ISBN")
    ),
    responses(
        (status = 200, description = "Book details", body = BookRecord),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<BookRecord>> {
    let book = state.services.catalog.get_book(&isbn)?;
    Ok(Json(book))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/book",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = BookRecord),
        (status = 400, description = "Missing or malformed field", body = ErrorResponse),
        (status = 409, description = "ISBN or ISBN-13 already exists", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    body: Result<Json<CreateBook>, JsonRejection>,
) -> AppResult<(StatusCode, Json<BookRecord>)> {
    let Json(book) = body?;
    let created = state.services.catalog.create_book(book)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete a book by ISBN
#[utoipa::path(
    delete,
    path = "/book/isbn/{isbn}",
    tag = "books",
    params(
        ("isbn" = String, Path, description = "Exact ISBN")
    ),
    responses(
        (status = 200, description = "Deleted book", body = BookRecord),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<BookRecord>> {
    let removed = state.services.catalog.delete_book(&isbn)?;
    Ok(Json(removed))
}
