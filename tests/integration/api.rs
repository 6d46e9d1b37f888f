//! Router-level tests: forms in, views and redirects out

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::common::test_app;

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone()
        .oneshot(request)
        .await
        .expect("Router is infallible")
}

async fn get(app: &Router, uri: &str) -> Response {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_form(app: &Router, uri: &str, form: &str) -> Response {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(app, request).await
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

fn assert_redirect(response: &Response, location: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], location);
}

#[tokio::test]
async fn test_create_and_list_books() {
    let app = test_app().await;

    let response = post_form(&app, "/books", "title=Dune&author=Frank+Herbert&genre=SF&year=1965").await;
    assert_redirect(&response, "/books");

    let response = post_form(&app, "/books", "title=Emma&author=Jane+Austen&genre=Novel&year=").await;
    assert_redirect(&response, "/books");

    let response = get(&app, "/books").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let books = body.as_array().expect("list of books");
    assert_eq!(books.len(), 2);
    assert_eq!(books[0]["id"], 1);
    assert_eq!(books[0]["year"], 1965);
    assert_eq!(books[0]["is_available"], true);
    assert!(books[1]["year"].is_null());
}

#[tokio::test]
async fn test_invalid_book_form() {
    let app = test_app().await;

    let response = post_form(&app, "/books", "title=Dune&author=Frank+Herbert&genre=SF&year=soon").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "BadValue");

    let response = post_form(&app, "/books", "title=&author=Frank+Herbert&genre=SF").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_edit_update_and_delete_book() {
    let app = test_app().await;
    post_form(&app, "/books", "title=Dune&author=Frank+Herbert&genre=SF&year=1965").await;
    post_form(&app, "/books", "title=Emma&author=Jane+Austen&genre=Novel").await;

    let response = get(&app, "/books/update/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["title"], "Dune");

    let response = post_form(&app, "/books/update/1", "title=Dune&author=F.+Herbert&genre=SF&year=1966").await;
    assert_redirect(&response, "/books");
    let body = json_body(get(&app, "/books/update/1").await).await;
    assert_eq!(body["author"], "F. Herbert");
    assert_eq!(body["year"], 1966);

    let response = get(&app, "/books/delete/1").await;
    assert_redirect(&response, "/books");

    let body = json_body(get(&app, "/books").await).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], 1);
    assert_eq!(body[0]["title"], "Emma");
}

#[tokio::test]
async fn test_missing_book_is_404() {
    let app = test_app().await;

    let response = get(&app, "/books/update/99").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"], "NoSuchData");

    assert_eq!(get(&app, "/books/delete/99").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/books/borrow/99").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/books/return/99").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_view() {
    let app = test_app().await;
    post_form(&app, "/books", "title=Dune&author=Frank+Herbert&genre=SF").await;
    post_form(&app, "/books", "title=Dune+Messiah&author=Frank+Herbert&genre=SF").await;
    post_form(&app, "/books", "title=Emma&author=Jane+Austen&genre=Novel").await;

    let body = json_body(get(&app, "/books/search?query=dune").await).await;
    assert_eq!(body["query"], "dune");
    assert_eq!(body["results"].as_array().unwrap().len(), 2);

    let body = json_body(get(&app, "/books/search?query=3").await).await;
    assert_eq!(body["results"][0]["title"], "Emma");
}

#[tokio::test]
async fn test_members_crud() {
    let app = test_app().await;

    let response = post_form(&app, "/members", "name=Ada&email=ada%40example.org").await;
    assert_redirect(&response, "/members");

    let response = post_form(&app, "/members", "name=Ada+Again&email=ada%40example.org").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_form(&app, "/members/update/1", "name=Ada+Lovelace&email=ada%40example.org").await;
    assert_redirect(&response, "/members");

    let body = json_body(get(&app, "/members/update/1").await).await;
    assert_eq!(body["name"], "Ada Lovelace");
    assert!(body["join_date"].is_string());

    let response = get(&app, "/members/delete/1").await;
    assert_redirect(&response, "/members");
    let body = json_body(get(&app, "/members").await).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_borrow_and_return_flow() {
    let app = test_app().await;
    post_form(&app, "/books", "title=Foo&author=Someone&genre=Misc").await;
    post_form(&app, "/members", "name=Bar&email=bar%40example.org").await;

    let body = json_body(get(&app, "/books/borrow/1").await).await;
    assert_eq!(body["book"]["title"], "Foo");
    assert_eq!(body["members"].as_array().unwrap().len(), 1);

    let response = post_form(&app, "/books/borrow/1", "member_id=1").await;
    assert_redirect(&response, "/books");

    let body = json_body(get(&app, "/books").await).await;
    assert_eq!(body[0]["is_available"], false);

    // already lent
    let response = post_form(&app, "/books/borrow/1", "member_id=1").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await["error"], "BookNotAvailable");

    let body = json_body(get(&app, "/members/1/borrowed_books").await).await;
    assert_eq!(body["member"]["name"], "Bar");
    assert_eq!(body["books"].as_array().unwrap().len(), 1);

    let body = json_body(get(&app, "/").await).await;
    assert_eq!(body["active_loans"], 1);

    let loans = json_body(get(&app, "/loans?active=true").await).await;
    assert_eq!(loans.as_array().unwrap().len(), 1);
    assert_eq!(loans[0]["days_borrowed"], 30);

    // GET triggers the return directly
    let response = get(&app, "/books/return/1").await;
    assert_redirect(&response, "/books");
    let body = json_body(get(&app, "/books").await).await;
    assert_eq!(body[0]["is_available"], true);

    // returning again is a silent no-op, by POST as well
    let response = post_form(&app, "/books/return/1", "").await;
    assert_redirect(&response, "/books");

    let loans = json_body(get(&app, "/loans?book_id=1").await).await;
    assert_eq!(loans.as_array().unwrap().len(), 1);
    assert_eq!(loans[0]["is_active"], false);

    let body = json_body(get(&app, "/members/1/borrowed_books").await).await;
    assert!(body["books"].as_array().unwrap().is_empty());

    let loan = json_body(get(&app, "/loans/1").await).await;
    assert_eq!(loan["returned_date"], loan["end_date"]);
    assert_eq!(get(&app, "/loans/2").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_borrow_with_bad_member() {
    let app = test_app().await;
    post_form(&app, "/books", "title=Foo&author=Someone&genre=Misc").await;

    let response = post_form(&app, "/books/borrow/1", "member_id=abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_form(&app, "/books/borrow/1", "member_id=5").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(get(&app, "/books").await).await;
    assert_eq!(body[0]["is_available"], true);
}

#[tokio::test]
async fn test_home_and_health() {
    let app = test_app().await;

    let body = json_body(get(&app, "/").await).await;
    assert_eq!(body["name"], "Libris");
    assert_eq!(body["active_loans"], 0);

    let body = json_body(get(&app, "/health").await).await;
    assert_eq!(body["status"], "healthy");

    let body = json_body(get(&app, "/ready").await).await;
    assert_eq!(body["status"], "ready");

    let response = get(&app, "/api-docs/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["paths"]["/books/borrow/{book_id}"].is_object());
}
