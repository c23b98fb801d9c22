use std::sync::Arc;

use parking_lot::Mutex;
use portald::client::{Notifier, ToastQueue, ToastVariant};
use portald::devlog::DevLog;
use portald::webhook::UserRole;
use portald::{build_router, GatewayConfig, GatewayState, Session, WebhookClient, WebhookHook};
use serde::Deserialize;
use serde_json::{json, Value};

/// Mock-mode gateway plus a handle on its dev log for counting calls.
async fn start_gateway() -> (Arc<WebhookClient>, DevLog) {
    let config = GatewayConfig::new(None)
        .with_mock_api(true)
        .with_dev_log(true);
    let state = GatewayState::new(config).expect("gateway state");
    let log = state.dev_log().clone();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let app = build_router(state);
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    let client = WebhookClient::new(format!("http://{}/api/webhook", addr));
    (Arc::new(client), log)
}

/// Gateway in upstream mode in front of a backend that always answers
/// `200` with `body`.
async fn start_gateway_over(body: &'static str) -> Arc<WebhookClient> {
    let upstream = axum::Router::new().route(
        "/webhook",
        axum::routing::post(move || async move {
            ([(axum::http::header::CONTENT_TYPE, "application/json")], body)
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind upstream");
    let upstream_addr = listener.local_addr().expect("upstream addr");
    tokio::spawn(async move { axum::serve(listener, upstream).await.expect("serve upstream") });

    let config = GatewayConfig::new(Some(format!("http://{}/webhook", upstream_addr)));
    let state = GatewayState::new(config).expect("gateway state");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let app = build_router(state);
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    Arc::new(WebhookClient::new(format!("http://{}/api/webhook", addr)))
}

fn toasts() -> (ToastQueue, Arc<dyn Notifier>) {
    let q = ToastQueue::new();
    let n: Arc<dyn Notifier> = Arc::new(q.clone());
    (q, n)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Created {
    student_id: String,
}

#[tokio::test]
async fn automatic_hook_fires_once_per_dependency_change() {
    let (client, log) = start_gateway().await;
    let (queue, notifier) = toasts();
    let session = Session::mock(UserRole::Teacher);

    let mut hook: WebhookHook<Value, Value> =
        WebhookHook::new(client, notifier, "STUDENT_LIST", json!({}));
    assert!(hook.is_loading());

    assert!(hook.sync(Some(&session)).await);
    assert!(!hook.is_loading());
    assert_eq!(hook.data().expect("data")["total"], json!(7));
    assert!(!hook.sync(Some(&session)).await);
    assert_eq!(log.entries().len(), 1);

    // Same payload, rebuilt: still no refetch.
    hook.set_payload(json!({}));
    assert!(!hook.sync(Some(&session)).await);

    hook.set_payload(json!({ "page": 1, "limit": 3 }));
    assert!(hook.sync(Some(&session)).await);
    assert_eq!(
        hook.data().expect("data")["students"]
            .as_array()
            .expect("students")
            .len(),
        3
    );
    assert_eq!(log.entries().len(), 2);

    // A different caller is a dependency change too.
    let other = Session::mock(UserRole::Admin);
    assert!(hook.sync(Some(&other)).await);
    assert_eq!(log.entries().len(), 3);
    assert!(queue.is_empty());
}

#[tokio::test]
async fn manual_hook_waits_for_trigger_and_reports_the_payload_used() {
    let (client, log) = start_gateway().await;
    let (_queue, notifier) = toasts();
    let session = Session::mock(UserRole::Teacher);
    let seen: Arc<Mutex<Vec<(String, Value)>>> = Arc::default();
    let sink = seen.clone();

    let mut hook: WebhookHook<Value, Created> =
        WebhookHook::new(client, notifier, "STUDENT_CREATE", json!({}))
            .manual()
            .on_success(move |created: &Created, payload: &Value| {
                sink.lock()
                    .push((created.student_id.clone(), payload.clone()));
            });
    assert!(!hook.is_loading());
    assert!(!hook.sync(Some(&session)).await);
    assert!(log.entries().is_empty());

    let payload = json!({ "fullName": "Ada Lovelace", "className": "Grade 6" });
    hook.trigger(Some(&session), Some(payload.clone())).await;

    let created = hook.data().expect("created");
    assert!(created.student_id.starts_with("stu_"));
    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, created.student_id);
    assert_eq!(seen[0].1, payload);
    assert_eq!(log.entries()[0].event_name, "STUDENT_CREATE");
}

#[tokio::test]
async fn failure_toasts_server_message_and_records_error() {
    let (client, _log) = start_gateway().await;
    let (queue, notifier) = toasts();
    let session = Session::mock(UserRole::Teacher);
    let errors: Arc<Mutex<Vec<String>>> = Arc::default();
    let sink = errors.clone();

    let mut hook: WebhookHook<Value, Value> = WebhookHook::new(
        client,
        notifier,
        "STUDENT_GET",
        json!({ "studentId": "stu_404" }),
    )
    .on_error(move |e| sink.lock().push(e.to_string()));

    hook.sync(Some(&session)).await;
    assert!(hook.data().is_none());
    assert!(!hook.is_loading());
    let err = hook.error().expect("error");
    assert_eq!(err.code(), Some("NOT_FOUND"));
    assert_eq!(err.to_string(), "student not found");
    assert_eq!(errors.lock().as_slice(), ["student not found".to_string()]);

    let toasts = queue.drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].variant, ToastVariant::Destructive);
    assert_eq!(toasts[0].title, "Error");
    assert_eq!(toasts[0].description, "student not found");
}

#[tokio::test]
async fn caller_error_message_wins_over_server_message() {
    let (client, _log) = start_gateway().await;
    let (queue, notifier) = toasts();
    let session = Session::mock(UserRole::Teacher);

    let mut hook: WebhookHook<Value, Value> =
        WebhookHook::new(client, notifier, "NOT_A_REAL_EVENT", json!({}))
            .manual()
            .error_message("Could not load this page.");
    hook.trigger(Some(&session), None).await;

    let err = hook.error().expect("error");
    assert_eq!(err.code(), Some("NOT_FOUND"));
    assert_eq!(err.to_string(), "No mock handler for event: NOT_A_REAL_EVENT");
    assert_eq!(queue.drain()[0].description, "Could not load this page.");
}

#[tokio::test]
async fn trigger_without_session_does_nothing() {
    let (client, log) = start_gateway().await;
    let (queue, notifier) = toasts();

    let mut hook: WebhookHook<Value, Value> =
        WebhookHook::new(client, notifier, "HEALTH_CHECK", json!({})).manual();
    hook.trigger(None, None).await;

    assert!(hook.data().is_none());
    assert!(hook.error().is_none());
    assert!(!hook.is_loading());
    assert!(log.entries().is_empty());
    assert!(queue.is_empty());
}

#[tokio::test]
async fn new_trigger_clears_previous_outcome() {
    let (client, _log) = start_gateway().await;
    let (queue, notifier) = toasts();
    let session = Session::mock(UserRole::Teacher);

    let mut hook: WebhookHook<Value, Value> = WebhookHook::new(
        client,
        notifier,
        "STUDENT_GET",
        json!({ "studentId": "stu_404" }),
    )
    .manual();
    hook.trigger(Some(&session), None).await;
    assert!(hook.error().is_some());

    hook.trigger(Some(&session), Some(json!({ "studentId": "stu_01" })))
        .await;
    assert!(hook.error().is_none());
    assert_eq!(
        hook.data().expect("data")["student"]["name"],
        json!("Amelia Johnson")
    );
    assert_eq!(queue.len(), 1);
}

#[tokio::test]
async fn reply_without_envelope_shape_is_an_unknown_error() {
    let client = start_gateway_over(r#"{"ok":true}"#).await;
    let (queue, notifier) = toasts();
    let session = Session::mock(UserRole::Teacher);

    let mut hook: WebhookHook<Value, Value> =
        WebhookHook::new(client, notifier, "STUDENT_LIST", json!({})).manual();
    hook.trigger(Some(&session), None).await;

    assert!(hook.data().is_none());
    let err = hook.error().expect("error");
    assert_eq!(err.code(), None);
    assert_eq!(err.to_string(), "An unknown error occurred");
    assert_eq!(queue.drain()[0].description, "An unknown error occurred");
}

#[tokio::test]
async fn upstream_envelope_data_reaches_the_hook() {
    let client = start_gateway_over(
        r#"{"success":true,"data":{"rubrics":[]},"correlationId":"n8n-1"}"#,
    )
    .await;
    let (queue, notifier) = toasts();
    let session = Session::mock(UserRole::Teacher);

    let mut hook: WebhookHook<Value, Value> =
        WebhookHook::new(client, notifier, "RUBRIC_LIST", json!({}));
    hook.sync(Some(&session)).await;

    assert_eq!(hook.data(), Some(&json!({ "rubrics": [] })));
    assert!(queue.is_empty());
}
