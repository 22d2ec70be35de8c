use super::*;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Copy)]
enum Reply {
    Summary,
    ProcessFailed,
    EmptySummary,
    NumericSummary,
    NotJson,
}

#[derive(Clone)]
struct ServerState {
    reply: Reply,
    received: Arc<Mutex<Vec<SummarizeRequest>>>,
}

async fn handle_summarize(
    State(state): State<ServerState>,
    Json(payload): Json<SummarizeRequest>,
) -> axum::response::Response {
    state.received.lock().await.push(payload);
    match state.reply {
        Reply::Summary => {
            let body = serde_json::json!({ "summary": "a short summary" });
            Json(body).into_response()
        }
        Reply::ProcessFailed => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "Python process failed" })),
        )
            .into_response(),
        Reply::EmptySummary => Json(serde_json::json!({ "summary": "" })).into_response(),
        Reply::NumericSummary => Json(serde_json::json!({ "summary": 42 })).into_response(),
        Reply::NotJson => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "<pre>Error: Not allowed by CORS</pre>",
        )
            .into_response(),
    }
}

async fn spawn_relay(reply: Reply) -> anyhow::Result<(String, Arc<Mutex<Vec<SummarizeRequest>>>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/summarize", post(handle_summarize))
        .with_state(ServerState {
            reply,
            received: received.clone(),
        });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), received))
}

#[test]
fn endpoint_is_appended_to_server_url() {
    let backend = HttpSummaryBackend::new("http://localhost:5000").expect("backend");
    assert_eq!(backend.endpoint().as_str(), "http://localhost:5000/summarize");

    let nested = HttpSummaryBackend::new("https://example.com/api").expect("backend");
    assert_eq!(nested.endpoint().as_str(), "https://example.com/api/summarize");
}

#[test]
fn invalid_server_url_is_rejected() {
    assert!(HttpSummaryBackend::new("not a url").is_err());
}

#[tokio::test]
async fn posts_text_and_returns_summary() {
    let (url, received) = spawn_relay(Reply::Summary).await.expect("relay");
    let backend = HttpSummaryBackend::new(&url).expect("backend");

    let outcome = backend.summarize(" some text ").await;
    assert_eq!(outcome, SummarizeOutcome::Summary("a short summary".into()));
    assert_eq!(
        received.lock().await.as_slice(),
        [SummarizeRequest {
            text: " some text ".into()
        }]
    );
}

#[tokio::test]
async fn relay_error_body_is_missing_summary() {
    let (url, _) = spawn_relay(Reply::ProcessFailed).await.expect("relay");
    let backend = HttpSummaryBackend::new(&url).expect("backend");
    assert_eq!(backend.summarize("x").await, SummarizeOutcome::MissingSummary);
}

#[tokio::test]
async fn empty_summary_is_missing_summary() {
    let (url, _) = spawn_relay(Reply::EmptySummary).await.expect("relay");
    let backend = HttpSummaryBackend::new(&url).expect("backend");
    assert_eq!(backend.summarize("x").await, SummarizeOutcome::MissingSummary);
}

#[tokio::test]
async fn mistyped_summary_is_missing_summary() {
    let (url, _) = spawn_relay(Reply::NumericSummary).await.expect("relay");
    let backend = HttpSummaryBackend::new(&url).expect("backend");
    assert_eq!(backend.summarize("x").await, SummarizeOutcome::MissingSummary);
}

#[tokio::test]
async fn non_json_reply_is_transport_failure() {
    let (url, _) = spawn_relay(Reply::NotJson).await.expect("relay");
    let backend = HttpSummaryBackend::new(&url).expect("backend");
    assert!(matches!(
        backend.summarize("x").await,
        SummarizeOutcome::TransportFailure(_)
    ));
}

#[tokio::test]
async fn unreachable_relay_is_transport_failure() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let backend = HttpSummaryBackend::new(&format!("http://{addr}")).expect("backend");
    assert!(matches!(
        backend.summarize("x").await,
        SummarizeOutcome::TransportFailure(_)
    ));
}
