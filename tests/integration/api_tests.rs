//! API integration tests
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`, over
//! a catalog loaded from a small CSV fixture.

use std::io::Write;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookdata_server::{
    api::create_router,
    repository::{
        books::BooksRepository,
        source::{read_rows, CsvSource, RecordSource},
        Repository,
    },
    services::Services,
    AppConfig, AppState, StoreError,
};

const FIXTURE: &str = "\
bookID,title,authors,average_rating,isbn,isbn13,language_code,num_pages,ratings_count,text_reviews_count
1,The Hobbit,J.R.R. Tolkien,4.27,A,A13,eng,366,10,1
2,Dune,Frank Herbert,4.25,B,B13,eng,612,20,2
3,The Silmarillion,J.R.R. Tolkien/Christopher Tolkien,3.9,C,C13,eng,365,30,3
4,Emma,Jane Austen,4.0,D,D13,eng,474,40,4
5,Persuasion,Jane Austen,4.1,E,E13,eng,249,50,oops
";

struct FixtureSource;

impl RecordSource for FixtureSource {
    fn rows(&self) -> Result<Vec<Vec<String>>, StoreError> {
        read_rows(FIXTURE.as_bytes(), true)
    }
}

fn app() -> Router {
    let books = BooksRepository::new();
    books.initialize(&FixtureSource).expect("fixture loads");
    let services = Services::new(Repository::new(books));
    create_router(AppState::new(AppConfig::default(), services))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .expect("router is infallible");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn isbns(body: &Value) -> Vec<&str> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|b| b["isbn"].as_str().unwrap())
        .collect()
}

fn new_book(isbn: &str, isbn_13: &str) -> Value {
    json!({
        "book_id": "99",
        "title": "Ulysses",
        "authors": "James Joyce",
        "isbn": isbn,
        "isbn_13": isbn_13,
        "language_code": "eng",
        "num_pages": 730
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_reports_book_count() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/v1/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["books"], 5);
    assert_eq!(body["source"], "./assets/books.csv");
}

#[tokio::test]
async fn test_list_books() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(isbns(&body), vec!["A", "B", "C", "D", "E"]);
    assert_eq!(body[4]["reviews_count"], 0);

    let (_, body) = send(&app, Method::GET, "/api/v1/books?limit=2&skip=1", None).await;
    assert_eq!(isbns(&body), vec!["B", "C"]);

    let (_, body) = send(&app, Method::GET, "/api/v1/books?skip=50", None).await;
    assert!(isbns(&body).is_empty());
}

#[tokio::test]
async fn test_list_books_rejects_bad_pagination() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/books?limit=-1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "limit must be >= 0");

    let (status, body) = send(&app, Method::GET, "/api/v1/books?skip=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "skip must be an integer");
}

#[tokio::test]
async fn test_search_by_author() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/books/authors/TOLKIEN", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(isbns(&body), vec!["A", "C"]);

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/v1/books/authors/jane%20austen?limit=1&skip=1",
        None,
    )
    .await;
    assert_eq!(isbns(&body), vec!["E"]);
}

#[tokio::test]
async fn test_search_by_title() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/v1/books/title/the", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(isbns(&body), vec!["A", "C"]);
}

#[tokio::test]
async fn test_get_book_by_isbn() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/books/isbn/B", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Dune");
    assert_eq!(body["isbn_13"], "B13");

    let (status, body) = send(&app, Method::GET, "/api/v1/books/isbn/Z", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchBook");
}

#[tokio::test]
async fn test_create_book() {
    let app = app();

    let body = new_book("F", "F13");
    let (status, body) = send(&app, Method::POST, "/api/v1/book", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["isbn"], "F");
    assert_eq!(body["average_rating"], 0.0);

    let (_, body) = send(&app, Method::GET, "/api/v1/books?skip=5", None).await;
    assert_eq!(isbns(&body), vec!["F"]);
}

#[tokio::test]
async fn test_create_book_conflict() {
    let app = app();

    let body = new_book("A", "new13");
    let (status, body) = send(&app, Method::POST, "/api/v1/book", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "isbn conflict on A");

    let body = new_book("new", "C13");
    let (status, body) = send(&app, Method::POST, "/api/v1/book", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "isbn_13 conflict on C13");

    let (_, body) = send(&app, Method::GET, "/api/v1/books", None).await;
    assert_eq!(isbns(&body).len(), 5);
}

#[tokio::test]
async fn test_create_book_missing_field() {
    let app = app();
    let mut book = new_book("F", "F13");
    book["title"] = json!("");

    let (status, body) = send(&app, Method::POST, "/api/v1/book", Some(book)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_create_book_absent_field() {
    let app = app();
    let mut book = new_book("F", "F13");
    book.as_object_mut().unwrap().remove("title");

    let (status, body) = send(&app, Method::POST, "/api/v1/book", Some(book)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
    assert!(body["message"].as_str().unwrap().contains("title"));

    let (_, body) = send(&app, Method::GET, "/api/v1/books", None).await;
    assert_eq!(isbns(&body).len(), 5);
}

#[tokio::test]
async fn test_create_book_mistyped_number() {
    let app = app();
    let mut book = new_book("F", "F13");
    book["num_pages"] = json!("many");

    let (status, body) = send(&app, Method::POST, "/api/v1/book", Some(book)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_delete_book() {
    let app = app();

    let (status, body) = send(&app, Method::DELETE, "/api/v1/book/isbn/C", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "The Silmarillion");

    let (_, body) = send(&app, Method::GET, "/api/v1/books", None).await;
    assert_eq!(isbns(&body), vec!["A", "B", "D", "E"]);

    let (status, _) = send(&app, Method::DELETE, "/api/v1/book/isbn/C", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_concurrent_creates() {
    let app = app();

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let isbn = format!("N{}", i);
                let isbn_13 = format!("N{}-13", i);
                send(&app, Method::POST, "/api/v1/book", Some(new_book(&isbn, &isbn_13))).await.0
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::CREATED);
    }

    let (_, body) = send(&app, Method::GET, "/api/v1/books", None).await;
    assert_eq!(isbns(&body).len(), 25);
}

#[test]
fn test_csv_source_from_disk() {
    let path = std::env::temp_dir().join(format!("bookdata-{}.csv", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(FIXTURE.as_bytes()).unwrap();
    drop(file);

    let books = BooksRepository::new();
    let loaded = books.initialize(&CsvSource::new(&path, true)).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, 5);
    assert_eq!(books.get_by_isbn("D").unwrap().title, "Emma");
}
