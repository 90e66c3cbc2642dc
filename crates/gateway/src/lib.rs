//! HTTP gateway for the Shastho FAQ chat service.
//!
//! Exposes the chat surface: the embedded web page, `POST /chat` for
//! question answering grounded in the FAQ document, `POST /reset` to
//! clear a conversation, and a health probe.
//!
//! Built on Axum for async HTTP.

pub mod frontend;
pub mod session;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use shastho_config::AppConfig;
use shastho_core::message::{History, Turn};
use shastho_core::provider::{CompletionProvider, CompletionRequest};
use shastho_providers::GroqProvider;
use shastho_retrieval::{KnowledgeIndex, build_system_prompt};

use session::SessionStore;

/// Shared application state for the gateway.
///
/// Immutable after startup except for the session store, which carries
/// its own interior lock.
pub struct GatewayState {
    pub config: AppConfig,
    pub provider: Arc<dyn CompletionProvider>,
    pub index: Arc<KnowledgeIndex>,
    pub sessions: SessionStore,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(index_handler))
        .route("/chat", post(chat_handler))
        .route("/reset", post(reset_handler))
        .route("/health", get(health_handler))
        .merge(frontend::static_router())
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB body limit
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Builds the provider and chunks the FAQ document once, then serves
/// until the process is stopped.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let host = config.gateway.host.clone();
    let port = config.gateway.port;
    let addr = format!("{host}:{port}");

    let api_key = config
        .groq_api_key
        .clone()
        .ok_or("GROQ_API_KEY is not configured")?;
    let provider: Arc<dyn CompletionProvider> = Arc::new(GroqProvider::groq(api_key)?);

    let index = Arc::new(KnowledgeIndex::load_or_empty(
        &config.document_path,
        config.max_chunk_size,
    ));

    let state = Arc::new(GatewayState {
        config,
        provider,
        index,
        sessions: SessionStore::new(),
    });

    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Wire types ---

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's question. Missing or null reads as empty.
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub conversation_history: History,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub message: &'static str,
}

// --- Handlers ---

/// Serve the chat page, resetting the visitor's conversation.
///
/// Loading the page starts a fresh conversation, matching what a user
/// expects when they open (or refresh) the app.
async fn index_handler(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (session_id, is_new) = resolve_session(&headers);
    state.sessions.reset(&session_id).await;

    let response = Html(frontend::INDEX_HTML).into_response();
    with_session_cookie(response, &session_id, is_new)
}

/// Answer a question grounded in the FAQ document.
///
/// The message list sent upstream is: system prompt with the most
/// relevant FAQ sections, the most recent turns of this session, then
/// the new user message. The exchange is recorded only when the
/// upstream call succeeds.
async fn chat_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<ChatRequest>,
) -> Response {
    let (session_id, is_new) = resolve_session(&headers);
    let history = state.sessions.history(&session_id).await;

    let system_prompt = build_system_prompt(&payload.query, &state.index, state.config.top_k);

    let mut messages = Vec::with_capacity(history.len().min(state.config.history_window) + 2);
    messages.push(Turn::system(system_prompt));
    messages.extend_from_slice(history.tail(state.config.history_window));
    messages.push(Turn::user(&payload.query));

    let request = CompletionRequest {
        model: state.config.model.clone(),
        messages,
        temperature: state.config.temperature,
        max_tokens: Some(state.config.max_completion_tokens),
    };

    let response = match state.provider.complete(request).await {
        Ok(completion) => {
            let answer = completion.message.content;
            let conversation_history = state
                .sessions
                .append_exchange(&session_id, &payload.query, &answer)
                .await;

            Json(ChatResponse {
                response: answer,
                conversation_history,
            })
            .into_response()
        }
        Err(e) => {
            error!(error = %e, "Completion request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    };
    with_session_cookie(response, &session_id, is_new)
}

/// Clear the conversation history for this session.
async fn reset_handler(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (session_id, is_new) = resolve_session(&headers);
    state.sessions.reset(&session_id).await;

    let response = Json(ResetResponse {
        message: "Conversation history reset successfully",
    })
    .into_response();
    with_session_cookie(response, &session_id, is_new)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    chunks: usize,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        chunks: state.index.len(),
    })
}

fn resolve_session(headers: &HeaderMap) -> (String, bool) {
    match session::session_id_from_headers(headers) {
        Some(id) => (id, false),
        None => (session::new_session_id(), true),
    }
}

/// Attach the session cookie when the request arrived without one, so a
/// first-time visitor keeps the same session id on every outcome,
/// including a failed completion.
fn with_session_cookie(mut response: Response, session_id: &str, is_new: bool) -> Response {
    if is_new {
        response
            .headers_mut()
            .insert(header::SET_COOKIE, session::session_cookie(session_id));
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use shastho_core::error::ProviderError;
    use shastho_core::provider::CompletionResponse;
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Provider that replays a fixed script of responses.
    struct ScriptedProvider {
        script: Mutex<Vec<Result<String, ProviderError>>>,
    }

    impl ScriptedProvider {
        fn answering(replies: &[&str]) -> Self {
            Self {
                script: Mutex::new(replies.iter().rev().map(|r| Ok(r.to_string())).collect()),
            }
        }

        fn failing(error: ProviderError) -> Self {
            Self {
                script: Mutex::new(vec![Err(error)]),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, ProviderError> {
            let next = self
                .script
                .lock()
                .unwrap()
                .pop()
                .expect("script exhausted")?;
            Ok(CompletionResponse {
                message: Turn::assistant(next),
                usage: None,
                model: "scripted".into(),
            })
        }
    }

    fn test_state(provider: ScriptedProvider) -> SharedState {
        let config = AppConfig {
            groq_api_key: Some("gsk_test".into()),
            ..AppConfig::default()
        };
        let index = KnowledgeIndex::from_chunks(vec![
            "জ্বর হলে বিশ্রাম নিন এবং প্রচুর পানি পান করুন।".to_string(),
            "শিশুর টিকা সময়মতো দিতে হবে।".to_string(),
        ]);
        Arc::new(GatewayState {
            config,
            provider: Arc::new(provider),
            index: Arc::new(index),
            sessions: SessionStore::new(),
        })
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn chat_request(query: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json");
        if let Some(c) = cookie {
            builder = builder.header("cookie", c);
        }
        builder
            .body(Body::from(
                serde_json::json!({"query": query}).to_string(),
            ))
            .unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_reports_chunk_count() {
        let app = build_router(test_state(ScriptedProvider::answering(&[])));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["chunks"], 2);
    }

    #[tokio::test]
    async fn chat_returns_response_and_history() {
        let app = build_router(test_state(ScriptedProvider::answering(&["বিশ্রাম নিন।"])));

        let response = app.oneshot(chat_request("জ্বর হলে কী করব?", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        // New visitor gets a session cookie
        assert!(response.headers().contains_key("set-cookie"));

        let body = json_body(response).await;
        assert_eq!(body["response"], "বিশ্রাম নিন।");
        let history = body["conversation_history"].as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["role"], "user");
        assert_eq!(history[0]["content"], "জ্বর হলে কী করব?");
        assert_eq!(history[1]["role"], "assistant");
    }

    #[tokio::test]
    async fn history_accumulates_across_requests() {
        let state = test_state(ScriptedProvider::answering(&["one", "two"]));

        let response = build_router(state.clone())
            .oneshot(chat_request("first", Some("sid=abc")))
            .await
            .unwrap();
        assert_eq!(json_body(response).await["conversation_history"]
            .as_array()
            .unwrap()
            .len(), 2);

        let response = build_router(state)
            .oneshot(chat_request("second", Some("sid=abc")))
            .await
            .unwrap();
        let body = json_body(response).await;
        let history = body["conversation_history"].as_array().unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(history[2]["content"], "second");
        assert_eq!(history[3]["content"], "two");
    }

    #[tokio::test]
    async fn provider_failure_yields_500_and_leaves_history_intact() {
        let state = test_state(ScriptedProvider::failing(ProviderError::ApiError {
            status_code: 500,
            message: "upstream exploded".into(),
        }));

        let response = build_router(state.clone())
            .oneshot(chat_request("জ্বর?", Some("sid=abc")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("upstream exploded"));

        // The failed exchange must not be recorded
        assert!(state.sessions.history("abc").await.is_empty());
    }

    #[tokio::test]
    async fn failed_first_request_still_issues_session_cookie() {
        let state = test_state(ScriptedProvider::failing(ProviderError::Network(
            "connection refused".into(),
        )));

        // No cookie: this visitor's very first request fails upstream.
        let response = build_router(state)
            .oneshot(chat_request("জ্বর?", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        // The session id must still be issued so the retry reuses it.
        let cookie = response
            .headers()
            .get("set-cookie")
            .expect("error response should carry the session cookie")
            .to_str()
            .unwrap();
        assert!(cookie.starts_with("sid="));
    }

    #[tokio::test]
    async fn reset_clears_conversation() {
        let state = test_state(ScriptedProvider::answering(&["ok"]));
        state.sessions.append_exchange("abc", "q", "a").await;

        let response = build_router(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/reset")
                    .header("cookie", "sid=abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["message"], "Conversation history reset successfully");
        assert!(state.sessions.history("abc").await.is_empty());
    }

    #[tokio::test]
    async fn index_resets_session_and_serves_page() {
        let state = test_state(ScriptedProvider::answering(&[]));
        state.sessions.append_exchange("abc", "q", "a").await;

        let response = build_router(state.clone())
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("cookie", "sid=abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.sessions.history("abc").await.is_empty());

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn missing_query_field_reads_as_empty() {
        let app = build_router(test_state(ScriptedProvider::answering(&["hmm"])));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["conversation_history"][0]["content"], "");
    }
}
