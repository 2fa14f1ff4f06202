use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use regex::Regex;
use serde_json::{json, Value};
use tower::ServiceExt;
use yara_backend::{app_router, seed_all, AppState, ServerConfig};

struct TestApp {
    _dir: tempfile::TempDir,
    router: Router,
    state: AppState,
}

async fn test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig::with_data_dir(dir.path().join("data"));
    let state = AppState::from_config(&config).await.unwrap();
    seed_all(&state.store, &state.model, &state.seeds).await.unwrap();
    let router = app_router(state.clone(), config.body_limit_bytes);
    TestApp {
        _dir: dir,
        router,
        state,
    }
}

impl TestApp {
    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send_with(method, uri, body, None).await
    }

    async fn send_with(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        bearer: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let req = match body {
            Some(b) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&b).unwrap()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}

#[tokio::test]
async fn health_reports_ok_with_timestamp() {
    let app = test_app().await;
    let (status, body) = app.send("GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["message"], "API is running");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn seeded_collections_are_listed() {
    let app = test_app().await;
    let (status, body) = app.send("GET", "/api/packages", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body.as_array().unwrap().iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["pkg1", "pkg2"]);

    let (status, body) = app.send("GET", "/api/bookings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn package_lifecycle() {
    let app = test_app().await;

    let (status, created) = app
        .send("POST", "/api/packages", Some(json!({"title": "Test Package", "price": 9999})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(Regex::new(r"^p_[0-9a-f]{8}$").unwrap().is_match(&id));
    assert!(created["createdAt"].is_string());
    assert_eq!(created["title"], "Test Package");
    assert_eq!(created["price"], 9999);

    let (status, fetched) = app.send("GET", &format!("/api/packages/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) = app
        .send("PUT", &format!("/api/packages/{}", id), Some(json!({"title": "Updated", "id": "other"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Updated");
    assert_eq!(updated["price"], 9999);
    assert_eq!(updated["id"], id.as_str());
    assert!(updated["updatedAt"].is_string());

    let (status, body) = app.send("DELETE", &format!("/api/packages/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (status, body) = app.send("GET", &format!("/api/packages/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn list_grows_with_creates_in_order() {
    let app = test_app().await;
    let mut created = Vec::new();
    for n in 0..3 {
        let (_, rec) = app.send("POST", "/api/cars", Some(json!({"model": format!("M{}", n)}))).await;
        created.push(rec["id"].clone());
    }
    let (_, body) = app.send("GET", "/api/cars", None).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2 + 3);
    let tail: Vec<Value> = list[2..].iter().map(|r| r["id"].clone()).collect();
    assert_eq!(tail, created);
}

#[tokio::test]
async fn missing_ids_are_not_found_and_leave_document_untouched() {
    let app = test_app().await;
    let bikes = app.state.model.resource_by_path("bikes").unwrap();
    let path = app.state.store.document_path(bikes);
    let before = tokio::fs::read(&path).await.unwrap();

    let (status, _) = app.send("DELETE", "/api/bikes/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.send("PUT", "/api/bikes/nope", Some(json!({"a": 1}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(tokio::fs::read(&path).await.unwrap(), before);
}

#[tokio::test]
async fn duplicate_id_is_a_conflict() {
    let app = test_app().await;
    let (status, body) = app.send("POST", "/api/cars", Some(json!({"id": "car1", "model": "Dup"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");
    let (_, list) = app.send("GET", "/api/cars", None).await;
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_resource_is_not_found() {
    let app = test_app().await;
    let (status, _) = app.send("GET", "/api/widgets", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.send("POST", "/api/widgets", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_object_body_is_bad_request() {
    let app = test_app().await;
    let (status, body) = app.send("POST", "/api/inquiries", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn login_returns_public_user_and_token() {
    let app = test_app().await;
    let (status, body) = app
        .send(
            "POST",
            "/api/auth/login",
            Some(json!({"email": "admin@yaraescapejourneys.com", "password": "admin123"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "admin");
    assert_eq!(body["user"]["id"], "admin");
    assert!(body["user"].get("password").is_none());
    let token = body["token"].as_str().unwrap();

    let (status, me) = app.send_with("GET", "/api/auth/me", None, Some(token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me, body["user"]);
}

#[tokio::test]
async fn login_failure_is_unauthorized() {
    let app = test_app().await;
    let (status, wrong) = app
        .send(
            "POST",
            "/api/auth/login",
            Some(json!({"email": "admin@yaraescapejourneys.com", "password": "wrong"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(wrong.get("token").is_none());

    let (status, unknown) = app
        .send("POST", "/api/auth/login", Some(json!({"email": "x@y.z", "password": "admin123"})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong, unknown);
}

#[tokio::test]
async fn me_requires_a_valid_token() {
    let app = test_app().await;
    let (status, _) = app.send("GET", "/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.send_with("GET", "/api/auth/me", None, Some("garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_passwords_never_leave_the_server() {
    let app = test_app().await;
    let (status, created) = app
        .send(
            "POST",
            "/api/users",
            Some(json!({"name": "Guide", "email": "guide@example.com", "password": "trek2024", "role": "staff"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created.get("password").is_none());
    assert!(created["id"].as_str().unwrap().starts_with("u_"));

    let (_, list) = app.send("GET", "/api/users", None).await;
    assert!(list.as_array().unwrap().iter().all(|u| u.get("password").is_none()));

    let (status, body) = app
        .send(
            "POST",
            "/api/auth/login",
            Some(json!({"email": "guide@example.com", "password": "trek2024"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "staff");
}

#[tokio::test]
async fn setup_db_does_not_overwrite() {
    let app = test_app().await;
    app.send("POST", "/api/packages", Some(json!({"title": "Keep me"}))).await;

    let (status, body) = app.send("GET", "/api/setup-db", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["initialized"], json!([]));

    let (_, list) = app.send("GET", "/api/packages", None).await;
    assert_eq!(list.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn corrupted_document_lists_as_empty() {
    let app = test_app().await;
    let cars = app.state.model.resource_by_path("cars").unwrap();
    tokio::fs::write(app.state.store.document_path(cars), b"[{broken").await.unwrap();
    let (status, body) = app.send("GET", "/api/cars", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    let (status, _) = app.send("GET", "/api/cars/car1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn plaintext_password_with_hash_prefix_can_log_in() {
    let app = test_app().await;
    let (status, _) = app
        .send(
            "POST",
            "/api/users",
            Some(json!({"name": "Odd", "email": "odd@example.com", "password": "$argon2rocks"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send(
            "POST",
            "/api/auth/login",
            Some(json!({"email": "odd@example.com", "password": "$argon2rocks"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn login_with_missing_fields_is_unauthorized() {
    let app = test_app().await;
    let (_, wrong) = app
        .send(
            "POST",
            "/api/auth/login",
            Some(json!({"email": "admin@yaraescapejourneys.com", "password": "wrong"})),
        )
        .await;
    for body in [
        json!({"email": "admin@yaraescapejourneys.com"}),
        json!({"password": "admin123"}),
        json!({}),
    ] {
        let (status, resp) = app.send("POST", "/api/auth/login", Some(body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(resp, wrong);
    }
}

#[tokio::test]
async fn unwritable_document_is_a_storage_error() {
    let app = test_app().await;
    let cars = app.state.model.resource_by_path("cars").unwrap();
    let path = app.state.store.document_path(cars);
    let before = tokio::fs::read(&path).await.unwrap();
    tokio::fs::create_dir(app.state.store.root().join(".cars.json.tmp")).await.unwrap();

    let (status, body) = app.send("POST", "/api/cars", Some(json!({"model": "Blocked"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "storage_error");
    assert_eq!(tokio::fs::read(&path).await.unwrap(), before);
}
