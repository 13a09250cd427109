use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use todo_backend::config::Config;
use todo_backend::store::TaskStore;
use todo_backend::web::create_router;
use tower::ServiceExt;

/// Test context for endpoint tests.
pub struct TestContext {
    pub store: TaskStore,
    pub app: Router,
}

/// Opens a fresh in-memory store and the full application router around it.
pub async fn setup() -> anyhow::Result<TestContext> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let config = Config::for_tests();
    let store = TaskStore::open(config.storage()).await?;
    let app = create_router(store.clone(), &config.static_dir);
    Ok(TestContext { store, app })
}

/// Sends one request through the router and returns the status and JSON body
/// (`Value::Null` when the body is empty).
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}
