//! API route configuration.

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    handlers::mark_started();

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // Group directory
        .route("/w3c/group", get(handlers::list_groups))
        .route("/w3c/group/:name", get(handlers::get_group))

        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use groupdir_cache::TtlCache;
    use groupdir_fetch::{FetcherConfig, W3cClient};
    use groupdir_lookup::GroupLookup;
    use groupdir_registry::GroupRegistry;

    fn registry() -> Arc<GroupRegistry> {
        let wg: BTreeMap<String, u64> = [("webperf".to_string(), 109735)].into();
        let cg: BTreeMap<String, u64> =
            [("webperf".to_string(), 109735), ("wicg".to_string(), 80485)].into();
        Arc::new(GroupRegistry::new(wg, cg).unwrap())
    }

    fn test_app(server: &MockServer) -> Router {
        let fetcher = W3cClient::with_config(FetcherConfig::new("key").with_base_url(server.uri()))
            .unwrap();
        let lookup = GroupLookup::new(registry(), Arc::new(fetcher), TtlCache::new());
        create_router(Arc::new(AppState::with_lookup(lookup)))
    }

    async fn mount_webperf(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/groups/109735"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Web Performance Working Group",
                "_links": { "homepage": { "href": "https://www.w3.org/webperf/" } }
            })))
            .mount(server)
            .await;
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;
        let response = get(test_app(&server), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["registry_size"], 2);
        assert_eq!(body["cached"], 0);
    }

    #[tokio::test]
    async fn test_health_counts_cached_groups() {
        let server = MockServer::start().await;
        mount_webperf(&server).await;
        let app = test_app(&server);

        let response = get(app.clone(), "/w3c/group/webperf").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_str(&body_text(get(app, "/health").await).await).unwrap();
        assert_eq!(body["cached"], 1);
        assert!(body.get("cached_groups").is_none());
    }

    #[tokio::test]
    async fn test_get_group() {
        let server = MockServer::start().await;
        mount_webperf(&server).await;

        let response = get(test_app(&server), "/w3c/group/webperf").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "max-age=86400");

        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(
            body,
            json!({
                "shortname": "webperf",
                "type": "wg",
                "id": 109735,
                "name": "Web Performance Working Group",
                "URI": "https://www.w3.org/webperf/",
            })
        );
    }

    #[tokio::test]
    async fn test_unknown_group_is_plain_text_404() {
        let server = MockServer::start().await;
        let response = get(test_app(&server), "/w3c/group/nope").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        assert_eq!(body_text(response).await, "No group with groupName: nope");
    }

    #[tokio::test]
    async fn test_upstream_status_is_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/groups/109735"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let response = get(test_app(&server), "/w3c/group/webperf").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(response.headers().get(header::CACHE_CONTROL).is_none());
        assert_eq!(body_text(response).await, "Service Unavailable");
    }

    #[tokio::test]
    async fn test_unreachable_upstream_does_not_leak_api_key() {
        let fetcher = W3cClient::with_config(
            FetcherConfig::new("hunter2-key").with_base_url("http://127.0.0.1:1"),
        )
        .unwrap();
        let lookup = GroupLookup::new(registry(), Arc::new(fetcher), TtlCache::new());
        let app = create_router(Arc::new(AppState::with_lookup(lookup)));

        let response = get(app, "/w3c/group/webperf").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = body_text(response).await;
        assert!(body.starts_with("Upstream request failed"));
        assert!(!body.contains("hunter2-key"));
        assert!(!body.contains("apikey"));
    }

    #[tokio::test]
    async fn test_list_groups_degrades_failed_groups() {
        let server = MockServer::start().await;
        mount_webperf(&server).await;
        Mock::given(method("GET"))
            .and(path("/groups/80485"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let response = get(test_app(&server), "/w3c/group").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(
            body,
            json!([
                {
                    "shortname": "webperf",
                    "type": "wg",
                    "id": 109735,
                    "name": "Web Performance Working Group",
                    "URI": "https://www.w3.org/webperf/",
                },
                { "shortname": "wicg", "type": "cg", "id": 80485 },
            ])
        );
    }
}
