pub mod messages;
pub mod safeguarding;

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::services::message_data::MessageData;
use crate::services::safeguarding::SafeguardingService;
use crate::utils::jwt::JwtService;

pub struct AppState {
    pub messages: MessageData,
    pub safeguarding: Arc<SafeguardingService>,
    pub jwt_service: Arc<JwtService>,
}

async fn health_check() -> &'static str {
    "OK"
}

pub fn routes(state: Arc<AppState>) -> Router {
    let protected_routes = Router::new()
        .nest("/messages", messages::routes(state.clone()))
        .nest("/conversations", messages::conversation_routes(state.clone()))
        .nest("/safeguarding", safeguarding::routes(state.clone()))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::create_memory_pool;
    use crate::models::message::ChatMessage;
    use crate::server::route_builder::build_router;
    use crate::services::language_detection::FixedLanguage;
    use crate::services::word_lists::{WordList, WhitelistTable};
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
        response::Response,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const SECRET: &str = "test-secret";

    async fn app() -> Router {
        let safeguarding = SafeguardingService::new(
            Arc::new(FixedLanguage::new("eng")),
            &WordList::embedded(),
            &WhitelistTable::embedded().unwrap(),
        )
        .unwrap();

        let state = Arc::new(AppState {
            messages: MessageData::new(create_memory_pool().await.unwrap()),
            safeguarding: Arc::new(safeguarding),
            jwt_service: Arc::new(JwtService::new(SECRET)),
        });

        build_router(state)
    }

    fn token(user_id: &str) -> String {
        JwtService::new(SECRET).generate_token(user_id).unwrap()
    }

    async fn call(app: &Router, method: Method, uri: &str, user: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token(user)));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn send(app: &Router, user: &str, text: &str) -> ChatMessage {
        let response = call(
            app,
            Method::POST,
            "/api/messages",
            Some(user),
            Some(json!({
                "conversation_id": "conversation-1",
                "text": text,
                "tags": [{"id": " Test Tag ", "type": "sub_topic"}]
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let app = app().await;
        let response = call(&app, Method::GET, "/api/health", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_messages_require_token() {
        let app = app().await;
        let response = call(&app, Method::GET, "/api/messages/anything", None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_send_and_get_message() {
        let app = app().await;
        let sent = send(&app, "alice", "cYberFuck hello test fuck").await;

        assert_eq!(sent.text, "🤬 hello test 🤬");
        assert_eq!(sent.sender_id, "alice");
        assert_eq!(sent.tags.len(), 1);
        assert_eq!(sent.tags[0].id, "testtag");

        let response = call(
            &app,
            Method::GET,
            &format!("/api/messages/{}", sent.id),
            Some("bob"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let got: ChatMessage = json_body(response).await;
        assert_eq!(got, sent);
    }

    #[tokio::test]
    async fn test_delete_message() {
        let app = app().await;
        let sent = send(&app, "alice", "hello").await;
        let uri = format!("/api/messages/{}", sent.id);

        let response = call(&app, Method::DELETE, &uri, Some("bob"), None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = call(&app, Method::DELETE, &uri, Some("alice"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let deleted: ChatMessage = json_body(response).await;
        assert!(deleted.deleted);

        let response = call(&app, Method::DELETE, "/api/messages/missing", Some("alice"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_tags() {
        let app = app().await;
        let sent = send(&app, "alice", "hello").await;

        let response = call(
            &app,
            Method::PUT,
            &format!("/api/messages/{}/tags", sent.id),
            Some("alice"),
            Some(json!({"tags": [{"id": "fucktesttag", "type": "topic"}, {"id": "___", "type": "topic"}]})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated: ChatMessage = json_body(response).await;
        assert_eq!(updated.tags.len(), 1);
        assert_eq!(updated.tags[0].id, "testtag");
    }

    #[tokio::test]
    async fn test_like_and_list_conversation() {
        let app = app().await;
        let sent = send(&app, "alice", "hello").await;
        send(&app, "bob", "hi there").await;

        let response = call(
            &app,
            Method::POST,
            &format!("/api/messages/{}/like", sent.id),
            Some("bob"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let liked: ChatMessage = json_body(response).await;
        assert_eq!(liked.likes_count, 1);

        let response = call(
            &app,
            Method::GET,
            "/api/conversations/conversation-1/messages?limit=10",
            Some("bob"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let messages: Vec<ChatMessage> = json_body(response).await;
        assert_eq!(messages.len(), 2);
    }

    #[tokio::test]
    async fn test_validation_error_body() {
        let app = app().await;
        let response = call(
            &app,
            Method::POST,
            "/api/messages",
            Some("alice"),
            Some(json!({"conversation_id": "conversation-1", "text": "   "})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = json_body(response).await;
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_clean_endpoints() {
        let app = app().await;

        let response = call(
            &app,
            Method::POST,
            "/api/safeguarding/clean",
            Some("alice"),
            Some(json!({"text": "hey how are you fuck!??"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = json_body(response).await;
        assert_eq!(body["text"], "hey how are you 🤬!??");

        let response = call(
            &app,
            Method::POST,
            "/api/safeguarding/clean-tag",
            Some("alice"),
            Some(json!({"tag_id": "--fuck--"})),
        )
        .await;
        let body: Value = json_body(response).await;
        assert!(body["tag_id"].is_null());
    }

    #[tokio::test]
    async fn test_clean_accepts_blank_text() {
        let app = app().await;

        for text in ["", "   "] {
            let response = call(
                &app,
                Method::POST,
                "/api/safeguarding/clean",
                Some("alice"),
                Some(json!({ "text": text })),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = json_body(response).await;
            assert_eq!(body["text"], text);
        }
    }

    #[tokio::test]
    async fn test_clean_rejects_oversized_text() {
        let app = app().await;
        let response = call(
            &app,
            Method::POST,
            "/api/safeguarding/clean",
            Some("alice"),
            Some(json!({ "text": "a".repeat(crate::utils::validation::MAX_MESSAGE_LENGTH + 1) })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
