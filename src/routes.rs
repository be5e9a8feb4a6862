use axum::{
    Router,
    http::Method,
    routing::{MethodRouter, any, get, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::handler::{self, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/health",
            get(handler::healthcheck).fallback(handler::method_not_allowed),
        )
        .route(
            "/api/books",
            get(handler::list_books)
                .post(handler::create_book)
                .fallback(handler::method_not_allowed),
        )
        .route("/api/books/", any(handler::missing_id))
        .route("/api/books/:id", book_item())
        .route("/api/books/:id/", book_item())
        .route(
            "/api/pages",
            get(handler::list_pages)
                .post(handler::create_page)
                .fallback(handler::method_not_allowed),
        )
        .route("/api/pages/", any(handler::missing_id))
        .route("/api/pages/:id", page_item())
        .route("/api/pages/:id/", page_item())
}

fn book_item() -> MethodRouter<AppState> {
    put(handler::update_book)
        .delete(handler::delete_book)
        .fallback(handler::method_not_allowed)
}

fn page_item() -> MethodRouter<AppState> {
    put(handler::update_page)
        .delete(handler::delete_page)
        .fallback(handler::method_not_allowed)
}

/// The full application: API routes, static assets from `static_dir` for every
/// other path, and a permissive CORS layer.
pub fn app(state: AppState, static_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    routes()
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::db::Database;

    async fn test_app() -> Router {
        test_app_with_db().await.0
    }

    async fn test_app_with_db() -> (Router, Arc<Database>) {
        let db = Arc::new(Database::open(":memory:").await.unwrap());
        let app = app(AppState { db: db.clone() }, "static-does-not-exist");
        (app, db)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let req = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn parse(body: &str) -> Value {
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn test_book_and_page_lifecycle() {
        let app = test_app().await;

        let (status, body) = send(&app, "POST", "/api/books", Some(r#"{"name":"Atlas"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse(&body), json!({"id": 1, "name": "Atlas"}));

        let (status, body) = send(
            &app,
            "POST",
            "/api/pages",
            Some(r#"{"bookId":1,"name":"Intro","number":1,"content":"Hello"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            parse(&body),
            json!({"id": 1, "bookId": 1, "name": "Intro", "number": 1, "content": "Hello"})
        );

        let (status, body) = send(&app, "DELETE", "/api/books/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());

        let (status, body) = send(&app, "GET", "/api/pages?bookId=1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse(&body), json!([]));

        let (_, body) = send(&app, "GET", "/api/books", None).await;
        assert_eq!(parse(&body), json!([]));
    }

    #[tokio::test]
    async fn test_pages_ordered_by_number() {
        let app = test_app().await;
        send(&app, "POST", "/api/books", Some(r#"{"name":"Atlas"}"#)).await;
        send(&app, "POST", "/api/pages", Some(r#"{"bookId":1,"number":3,"content":"c"}"#)).await;
        send(&app, "POST", "/api/pages", Some(r#"{"bookId":1,"number":1,"content":"a"}"#)).await;

        let (status, body) = send(&app, "GET", "/api/pages?bookId=1", None).await;
        assert_eq!(status, StatusCode::OK);
        let pages = parse(&body);
        assert_eq!(pages[0]["number"], 1);
        assert_eq!(pages[1]["number"], 3);
        assert_eq!(pages[0]["name"], "");
    }

    #[tokio::test]
    async fn test_invalid_json_is_rejected_without_insert() {
        let app = test_app().await;

        let (status, _) = send(&app, "POST", "/api/books", Some("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "POST", "/api/pages", Some(r#"{"bookId":"one"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, "GET", "/api/books", None).await;
        assert_eq!(parse(&body), json!([]));
        let (_, body) = send(&app, "GET", "/api/pages", None).await;
        assert_eq!(parse(&body), json!([]));
    }

    #[tokio::test]
    async fn test_body_without_content_type_is_accepted() {
        let app = test_app().await;
        let req = Request::builder()
            .method("POST")
            .uri("/api/books")
            .body(Body::from(r#"{"name":"Plain"}"#))
            .unwrap();

        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_ids_are_no_op_successes() {
        let app = test_app().await;

        let (status, body) = send(&app, "PUT", "/api/books/99", Some(r#"{"name":"Ghost"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse(&body), json!({"id": 99, "name": "Ghost"}));

        let (status, body) = send(
            &app,
            "PUT",
            "/api/pages/99",
            Some(r#"{"bookId":1,"name":"n","number":2,"content":"x"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse(&body)["id"], 99);

        let (status, _) = send(&app, "DELETE", "/api/books/99", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "DELETE", "/api/pages/99", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_put_updates_existing_rows() {
        let app = test_app().await;
        send(&app, "POST", "/api/books", Some(r#"{"name":"Atlas"}"#)).await;
        send(&app, "POST", "/api/pages", Some(r#"{"bookId":1,"name":"Intro","number":1,"content":"Hello"}"#)).await;

        send(&app, "PUT", "/api/books/1", Some(r#"{"name":"Atlas II"}"#)).await;
        send(
            &app,
            "PUT",
            "/api/pages/1",
            Some(r#"{"bookId":1,"name":"Opening","number":4,"content":"Hi"}"#),
        )
        .await;

        let (_, body) = send(&app, "GET", "/api/books", None).await;
        assert_eq!(parse(&body), json!([{"id": 1, "name": "Atlas II"}]));
        let (_, body) = send(&app, "GET", "/api/pages?bookId=1", None).await;
        assert_eq!(
            parse(&body),
            json!([{"id": 1, "bookId": 1, "name": "Opening", "number": 4, "content": "Hi"}])
        );
    }

    #[tokio::test]
    async fn test_invalid_ids() {
        let app = test_app().await;

        for uri in ["/api/books/", "/api/pages/", "/api/books/abc", "/api/pages/books", "/api/books/1.5"] {
            let (status, body) = send(&app, "DELETE", uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body, "Invalid ID");
        }

        let (status, _) = send(&app, "GET", "/api/pages?bookId=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unsupported_methods() {
        let app = test_app().await;

        for (method, uri) in [
            ("PATCH", "/api/books"),
            ("DELETE", "/api/pages"),
            ("GET", "/api/books/1"),
            ("POST", "/api/pages/1"),
        ] {
            let (status, body) = send(&app, method, uri, None).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
            assert_eq!(body, "Method not allowed");
        }
    }

    #[tokio::test]
    async fn test_trailing_slash_on_item_paths() {
        let app = test_app().await;
        send(&app, "POST", "/api/books", Some(r#"{"name":"Atlas"}"#)).await;
        send(&app, "POST", "/api/pages", Some(r#"{"bookId":1,"number":1}"#)).await;

        let (status, body) = send(&app, "PUT", "/api/pages/1/", Some(r#"{"bookId":1,"number":2}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse(&body)["number"], 2);

        let (status, _) = send(&app, "DELETE", "/api/books/1/", None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, "GET", "/api/books", None).await;
        assert_eq!(parse(&body), json!([]));
        let (_, body) = send(&app, "GET", "/api/pages", None).await;
        assert_eq!(parse(&body), json!([]));
    }

    #[tokio::test]
    async fn test_store_failure_returns_raw_error() {
        let (app, db) = test_app_with_db().await;
        db.connection().execute("DROP TABLE pages", ()).await.unwrap();

        let (status, body) = send(&app, "GET", "/api/pages", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("no such table"), "{body}");
    }

    #[tokio::test]
    async fn test_oversized_body_keeps_limit_status() {
        let app = test_app().await;
        let name = "x".repeat(3 * 1024 * 1024);
        let payload = format!(r#"{{"name":"{name}"}}"#);

        let (status, _) = send(&app, "POST", "/api/books", Some(&payload)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

        let (_, body) = send(&app, "GET", "/api/books", None).await;
        assert_eq!(parse(&body), json!([]));
    }

    #[tokio::test]
    async fn test_healthcheck() {
        let app = test_app().await;
        let (status, body) = send(&app, "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse(&body), json!({"status": "ok"}));
    }
}
