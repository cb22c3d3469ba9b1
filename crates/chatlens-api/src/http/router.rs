//! Axum router configuration with middleware.
//!
//! Middleware: CORS (any origin) and request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Session lifecycle
        .route("/qr", get(handlers::session::get_qr))
        .route("/status", get(handlers::session::get_status))
        .route("/logout", post(handlers::session::logout))
        // Conversations
        .route("/conversations", get(handlers::chat::list_conversations))
        .route("/messages/{chat_id}", get(handlers::chat::get_messages))
        // Analysis
        .route(
            "/generate-embedding/{chat_id}",
            post(handlers::analysis::generate_embedding),
        )
        .route("/chat-stats/{chat_id}", get(handlers::analysis::chat_stats))
        // Push channel
        .route("/ws", get(handlers::ws::ws_handler))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health
async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "subscribers": state.session.bus().subscriber_count(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use chatlens_types::config::ChatlensConfig;
    use chatlens_types::session::LifecycleEvent;

    use super::*;

    struct Harness {
        state: AppState,
        server: MockServer,
        _dir: tempfile::TempDir,
    }

    impl Harness {
        /// App wired against a mock bridge + OpenAI server and a temp database.
        async fn new() -> Self {
            let server = MockServer::start().await;
            let dir = tempfile::tempdir().unwrap();

            let mut config = ChatlensConfig::default();
            config.bridge.base_url = server.uri();
            config.embedding.base_url = format!("{}/v1", server.uri());
            config.completion.base_url = format!("{}/v1", server.uri());
            config.request_timeout_secs = 5;

            let state = AppState::build(
                config,
                dir.path().to_path_buf(),
                &SecretString::from("sk-test"),
                None,
            )
            .await
            .unwrap();

            Self {
                state,
                server,
                _dir: dir,
            }
        }

        fn authenticate(&self) {
            self.state
                .session
                .handle_event(LifecycleEvent::Authenticated)
                .unwrap();
        }

        async fn call(&self, method: &str, uri: &str) -> (StatusCode, Value) {
            let response = build_router(self.state.clone())
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(uri)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            (status, serde_json::from_slice(&bytes).unwrap())
        }
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let h = Harness::new().await;
        let (status, body) = h.call("GET", "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["subscribers"], 0);
    }

    #[tokio::test]
    async fn status_follows_lifecycle() {
        let h = Harness::new().await;
        assert_eq!(
            h.call("GET", "/status").await.1,
            json!({ "authenticated": false })
        );

        h.authenticate();
        assert_eq!(
            h.call("GET", "/status").await.1,
            json!({ "authenticated": true })
        );
    }

    #[tokio::test]
    async fn qr_is_404_then_artifact_then_authenticated() {
        let h = Harness::new().await;

        let (status, body) = h.call("GET", "/qr").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        h.state
            .session
            .handle_event(LifecycleEvent::PairingCodeProduced {
                raw: "2@pairing-code".to_string(),
            })
            .unwrap();
        let (status, body) = h.call("GET", "/qr").await;
        assert_eq!(status, StatusCode::OK);
        assert!(
            body["pairingArtifact"]
                .as_str()
                .unwrap()
                .starts_with("data:image/svg+xml;base64,")
        );

        h.authenticate();
        let (status, body) = h.call("GET", "/qr").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "authenticated": true }));
    }

    #[tokio::test]
    async fn logout_without_session_is_400_and_never_calls_bridge() {
        let h = Harness::new().await;
        Mock::given(method("POST"))
            .and(path("/session/logout"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&h.server)
            .await;

        let (status, body) = h.call("POST", "/logout").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_STATE");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn logout_tears_down_and_reinitializes() {
        let h = Harness::new().await;
        for p in ["/session/logout", "/session/initialize"] {
            Mock::given(method("POST"))
                .and(path(p))
                .respond_with(ResponseTemplate::new(204))
                .expect(1)
                .mount(&h.server)
                .await;
        }
        h.authenticate();

        let (status, body) = h.call("POST", "/logout").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].is_string());
        assert_eq!(
            h.call("GET", "/status").await.1,
            json!({ "authenticated": false })
        );
    }

    #[tokio::test]
    async fn logout_bridge_failure_is_500_and_keeps_session() {
        let h = Harness::new().await;
        Mock::given(method("POST"))
            .and(path("/session/logout"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&h.server)
            .await;
        h.authenticate();

        let (status, body) = h.call("POST", "/logout").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "UPSTREAM_FAILURE");
        assert!(h.state.session.is_authenticated());
    }

    #[tokio::test]
    async fn conversations_require_session() {
        let h = Harness::new().await;
        let (status, body) = h.call("GET", "/conversations").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn conversations_list_chats() {
        let h = Harness::new().await;
        Mock::given(method("GET"))
            .and(path("/chats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "1@c.us", "name": "Ana"},
                {"id": "2@g.us", "name": ""}
            ])))
            .mount(&h.server)
            .await;
        h.authenticate();

        let (status, body) = h.call("GET", "/conversations").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"id": "1@c.us", "name": "Ana"},
                {"id": "2@g.us", "name": "Unknown"}
            ])
        );
    }

    #[tokio::test]
    async fn empty_conversation_list_is_empty_array() {
        let h = Harness::new().await;
        Mock::given(method("GET"))
            .and(path("/chats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&h.server)
            .await;
        h.authenticate();

        let (status, body) = h.call("GET", "/conversations").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn conversation_failure_is_500_with_message() {
        let h = Harness::new().await;
        Mock::given(method("GET"))
            .and(path("/chats"))
            .respond_with(ResponseTemplate::new(500).set_body_string("bridge exploded"))
            .mount(&h.server)
            .await;
        h.authenticate();

        let (status, body) = h.call("GET", "/conversations").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["message"].as_str().unwrap().contains("bridge exploded"));
    }

    #[tokio::test]
    async fn messages_return_preview_window() {
        let h = Harness::new().await;
        Mock::given(method("GET"))
            .and(path("/chats/1@c.us/messages"))
            .and(wiremock::matchers::query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"from": "1@c.us", "body": "hola", "timestamp": 1}
            ])))
            .expect(1)
            .mount(&h.server)
            .await;
        h.authenticate();

        let (status, body) = h.call("GET", "/messages/1@c.us").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chatId"], "1@c.us");
        assert_eq!(body["messages"][0]["body"], "hola");
    }

    #[tokio::test]
    async fn embedding_requires_session() {
        let h = Harness::new().await;
        let (status, _) = h.call("POST", "/generate-embedding/1@c.us").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn embed_then_analyze() {
        let h = Harness::new().await;
        Mock::given(method("GET"))
            .and(path("/chats/1@c.us/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"from": "1@c.us", "body": "hola", "timestamp": 1},
                {"from": "me", "body": "que tal", "timestamp": 2}
            ])))
            .mount(&h.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(wiremock::matchers::body_partial_json(json!({ "input": "hola que tal" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"embedding": [0.1, 0.2]}],
                "model": "text-embedding-3-small",
                "usage": {"prompt_tokens": 3, "total_tokens": 3}
            })))
            .expect(1)
            .mount(&h.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "created": 1_700_000_000u32,
                "model": "gpt-4o-mini",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "not even json"},
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&h.server)
            .await;
        h.authenticate();

        let (status, body) = h.call("POST", "/generate-embedding/1@c.us").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "chatId": "1@c.us" }));

        let (status, body) = h.call("GET", "/chat-stats/1@c.us").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "chatId": "1@c.us", "analysis": "not even json" })
        );
    }

    #[tokio::test]
    async fn chat_stats_without_rows_is_404_even_after_logout() {
        let h = Harness::new().await;
        let (status, body) = h.call("GET", "/chat-stats/nobody@c.us").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn embedding_service_failure_is_500() {
        let h = Harness::new().await;
        Mock::given(method("GET"))
            .and(path("/chats/x/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&h.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&h.server)
            .await;
        h.authenticate();

        let (status, body) = h.call("POST", "/generate-embedding/x").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "UPSTREAM_FAILURE");

        let (status, _) = h.call("GET", "/chat-stats/x").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let h = Harness::new().await;
        let response = build_router(h.state.clone())
            .oneshot(
                Request::builder()
                    .uri("/status")
                    .header("origin", "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "*"
        );
    }
}
