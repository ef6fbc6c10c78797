use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use notes_api::{router, NoteStore};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    _dir: TempDir,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::new(dir.path().join("notes.sqlite3"));
        store.prepare().unwrap();
        Self {
            _dir: dir,
            router: router(store),
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.map_or_else(Body::empty, |text| Body::from(text.to_owned())))
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn send_json(&self, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        let (status, bytes) = self.send(method, uri, Some(&body.to_string())).await;
        (status, parse_json(&bytes))
    }

    async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, bytes) = self.send(Method::GET, uri, None).await;
        (status, parse_json(&bytes))
    }
}

fn parse_json(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(bytes).unwrap()
    }
}

#[tokio::test]
async fn list_on_empty_store_is_empty_array() {
    let app = TestApp::new();
    let (status, body) = app.get_json("/api/notes/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn create_get_delete_get_lifecycle() {
    let app = TestApp::new();

    let (status, created) = app
        .send_json(
            Method::POST,
            "/api/notes/",
            json!({"title": "A", "content": "B"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created, json!({"id": 1, "title": "A", "content": "B"}));

    let (status, fetched) = app.get_json("/api/notes/1/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, body) = app.send(Method::DELETE, "/api/notes/1/", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, body) = app.send(Method::GET, "/api/notes/1/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn create_with_missing_content_reports_field_errors() {
    let app = TestApp::new();
    let (status, errors) = app
        .send_json(Method::POST, "/api/notes/", json!({"title": ""}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(errors["content"], json!(["This field is required."]));
    assert_eq!(errors["title"], json!(["This field may not be blank."]));

    let (_, listed) = app.get_json("/api/notes/").await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn create_ignores_client_supplied_id() {
    let app = TestApp::new();
    let (status, created) = app
        .send_json(
            Method::POST,
            "/api/notes/",
            json!({"id": 500, "title": "A", "content": "B"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], json!(1));
}

#[tokio::test]
async fn list_returns_notes_in_id_order() {
    let app = TestApp::new();
    for title in ["first", "second", "third"] {
        app.send_json(
            Method::POST,
            "/api/notes/",
            json!({"title": title, "content": "x"}),
        )
        .await;
    }

    let (status, listed) = app.get_json("/api/notes/").await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|note| note["title"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(titles, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn put_replaces_note() {
    let app = TestApp::new();
    app.send_json(
        Method::POST,
        "/api/notes/",
        json!({"title": "A", "content": "B"}),
    )
    .await;

    let (status, updated) = app
        .send_json(
            Method::PUT,
            "/api/notes/1/",
            json!({"title": "A2", "content": "B2"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated, json!({"id": 1, "title": "A2", "content": "B2"}));

    let (_, fetched) = app.get_json("/api/notes/1/").await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn put_with_invalid_payload_leaves_note_unchanged() {
    let app = TestApp::new();
    app.send_json(
        Method::POST,
        "/api/notes/",
        json!({"title": "A", "content": "B"}),
    )
    .await;

    let (status, errors) = app
        .send_json(Method::PUT, "/api/notes/1/", json!({"title": 7, "content": null}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(errors, json!({"content": ["This field may not be null."]}));

    let (_, fetched) = app.get_json("/api/notes/1/").await;
    assert_eq!(fetched, json!({"id": 1, "title": "A", "content": "B"}));
}

#[tokio::test]
async fn never_issued_ids_are_not_found_for_every_item_method() {
    let app = TestApp::new();
    let valid = Some(r#"{"title":"A","content":"B"}"#);

    for (method, body) in [
        (Method::GET, None),
        (Method::PUT, valid),
        (Method::PUT, Some("{}")),
        (Method::PUT, Some("{not json")),
        (Method::DELETE, None),
    ] {
        let (status, bytes) = app.send(method.clone(), "/api/notes/41/", body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} with {body:?}");
        assert!(bytes.is_empty());
    }
}

#[tokio::test]
async fn non_integer_ids_do_not_match_the_item_route() {
    let app = TestApp::new();
    for uri in ["/api/notes/abc/", "/api/notes/-1/", "/api/notes/1.5/"] {
        let (status, _) = app.send(Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn malformed_json_is_bad_request_with_detail() {
    let app = TestApp::new();
    let (status, bytes) = app
        .send(Method::POST, "/api/notes/", Some("{\"title\": "))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = parse_json(&bytes);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("JSON parse error - "));
}

#[tokio::test]
async fn empty_body_yields_required_field_errors() {
    let app = TestApp::new();
    let (status, bytes) = app.send(Method::POST, "/api/notes/", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        parse_json(&bytes),
        json!({
            "content": ["This field is required."],
            "title": ["This field is required."]
        })
    );
}

#[tokio::test]
async fn non_object_payload_is_a_non_field_error() {
    let app = TestApp::new();
    let (status, errors) = app
        .send_json(Method::POST, "/api/notes/", json!(["A", "B"]))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        errors,
        json!({"non_field_errors": ["Invalid data. Expected a dictionary, but got array."]})
    );
}

#[tokio::test]
async fn unsupported_method_is_rejected_with_allow_header() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::PATCH)
        .uri("/api/notes/1/")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(response.headers().contains_key(header::ALLOW));
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let app = TestApp::new();
    let (status, _) = app.send(Method::GET, "/api/other/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn put_with_malformed_json_on_existing_note_is_bad_request() {
    let app = TestApp::new();
    app.send_json(
        Method::POST,
        "/api/notes/",
        json!({"title": "A", "content": "B"}),
    )
    .await;

    let (status, bytes) = app.send(Method::PUT, "/api/notes/1/", Some("{bad")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(parse_json(&bytes)["detail"]
        .as_str()
        .unwrap()
        .starts_with("JSON parse error - "));

    let (_, fetched) = app.get_json("/api/notes/1/").await;
    assert_eq!(fetched, json!({"id": 1, "title": "A", "content": "B"}));
}

#[tokio::test]
async fn unreachable_store_is_internal_error_with_generic_body() {
    let dir = tempfile::tempdir().unwrap();
    let store = NoteStore::new(dir.path().join("missing/dir/notes.sqlite3"));
    let app = router(store);

    for (method, uri) in [(Method::GET, "/api/notes/"), (Method::GET, "/api/notes/1/")] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            parse_json(&bytes),
            json!({"detail": "internal server error"})
        );
    }
}
