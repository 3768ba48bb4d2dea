use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::logging_middleware;
use super::state::AppState;
use super::teams;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Team leadership
        .nest("/teams", teams::create_teams_router())
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::membership::Membership;
    use crate::domain::team::{Team, TeamId};
    use crate::domain::user::{User, UserId};
    use crate::infrastructure::storage::InMemoryLeadershipStore;

    async fn create_store() -> InMemoryLeadershipStore {
        let store = InMemoryLeadershipStore::new();
        store
            .insert_team(Team::new(TeamId::new(1).unwrap(), "Platform"))
            .await;
        store
            .insert_user(User::new(UserId::new(1).unwrap(), "Ada", "ada@example.com"))
            .await;
        store
            .insert_user(User::new(UserId::new(2).unwrap(), "Grace", "grace@example.com"))
            .await;
        store
    }

    fn create_app(store: &InMemoryLeadershipStore) -> Router {
        create_router(AppState::new(Arc::new(store.clone())))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = match body {
            Some(body) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let store = create_store().await;
        let app = create_app(&store);

        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, _) = send(&app, Method::GET, "/live", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::GET, "/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"][0]["name"], "memory_store");
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let store = create_store().await;
        let app = create_app(&store);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/live")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "req-42");
    }

    #[tokio::test]
    async fn test_leadership_lifecycle() {
        let store = create_store().await;
        let app = create_app(&store);

        let (status, body) = send(&app, Method::GET, "/teams/1/leader", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"team_id": 1, "leader": null}));

        let (status, body) =
            send(&app, Method::POST, "/teams/1/leader", Some(json!({"user_id": 1}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user_id"], 1);
        assert_eq!(body["name"], "Ada");
        assert_eq!(body["email"], "ada@example.com");

        store
            .insert_membership(Membership::new(UserId::new(2).unwrap(), TeamId::new(1).unwrap()))
            .await
            .unwrap();

        let (status, body) =
            send(&app, Method::PUT, "/teams/1/leader", Some(json!({"user_id": 2}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Grace");

        let (status, body) = send(&app, Method::GET, "/teams/1/leader", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["leader"]["user_id"], 2);

        let (status, body) = send(&app, Method::DELETE, "/teams/1/leader", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, body) = send(&app, Method::GET, "/teams/1/leadership-history", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["team_id"], 1);
        assert_eq!(body["total"], 2);
        assert_eq!(body["history"][0]["leader_name"], "Grace");
        assert_eq!(body["history"][0]["is_current"], false);
        assert_eq!(body["history"][1]["leader_name"], "Ada");
    }

    #[tokio::test]
    async fn test_assign_to_led_team_is_bad_request() {
        let store = create_store().await;
        let app = create_app(&store);

        send(&app, Method::POST, "/teams/1/leader", Some(json!({"user_id": 1}))).await;
        let (status, body) =
            send(&app, Method::POST, "/teams/1/leader", Some(json!({"user_id": 2}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "invalid_state_error");
        assert_eq!(body["error"]["message"], "Team 1 already has a leader");
    }

    #[tokio::test]
    async fn test_unknown_team_is_not_found() {
        let store = create_store().await;
        let app = create_app(&store);

        let (status, body) = send(&app, Method::GET, "/teams/99/leadership-history", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["type"], "not_found_error");
        assert_eq!(body["error"]["message"], "Team 99 not found");
    }

    #[tokio::test]
    async fn test_remove_without_leader_is_bad_request() {
        let store = create_store().await;
        let app = create_app(&store);

        let (status, body) = send(&app, Method::DELETE, "/teams/1/leader", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "invalid_state_error");
    }

    #[tokio::test]
    async fn test_invalid_ids_are_rejected() {
        let store = create_store().await;
        let app = create_app(&store);

        let (status, body) = send(&app, Method::GET, "/teams/abc/leader", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["param"], "team_id");

        let (status, body) =
            send(&app, Method::POST, "/teams/1/leader", Some(json!({"user_id": 0}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["param"], "user_id");
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected_as_json() {
        let store = create_store().await;
        let app = create_app(&store);

        let (status, body) =
            send(&app, Method::POST, "/teams/1/leader", Some(json!({"leader": 1}))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["type"], "invalid_request_error");
        assert_eq!(body["error"]["code"], "json_parse_error");
    }
}
