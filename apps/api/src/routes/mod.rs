pub mod health;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::profile::handlers as profile_handlers;
use crate::rate_limit::enforce_rate_limit;
use crate::recommendations::handlers as recommendation_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        .route(
            "/api/assistant/recommendations",
            post(recommendation_handlers::handle_recommendations),
        )
        .route(
            "/api/profile",
            get(profile_handlers::handle_get_profile).put(profile_handlers::handle_put_profile),
        )
        .layer(middleware::from_fn_with_state(state.clone(), enforce_rate_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::extract::ConnectInfo;
    use axum::http::{Method, Request, Response, StatusCode};
    use chrono::DateTime;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::assistant::{AssistantError, RecommendationGateway};
    use crate::rate_limit::RateLimiter;

    struct FixedGateway(&'static str);

    #[async_trait]
    impl RecommendationGateway for FixedGateway {
        async fn recommendations(&self, _prompt: &str) -> Result<String, AssistantError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingGateway(fn() -> AssistantError);

    #[async_trait]
    impl RecommendationGateway for FailingGateway {
        async fn recommendations(&self, _prompt: &str) -> Result<String, AssistantError> {
            Err((self.0)())
        }
    }

    fn test_router(gateway: Arc<dyn RecommendationGateway>) -> Router {
        build_router(AppState {
            gateway,
            rate_limiter: Arc::new(RateLimiter::new()),
        })
    }

    fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
        match body {
            Some(value) => builder
                .header("content-type", "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: Response<Body>) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn valid_payload() -> Value {
        json!({
            "userId": "user-123",
            "profile": {
                "age": 28,
                "sex": "female",
                "height_cm": 165,
                "weight_kg": 60,
                "blood_pressure": { "systolic": 118, "diastolic": 76 },
                "lifestyle": { "activity_level": "moderate", "steps_per_day": 9000 },
                "location": { "city": "Paris", "country": "France" }
            }
        })
    }

    #[tokio::test]
    async fn test_health_check_payload() {
        let router = test_router(Arc::new(FixedGateway("unused")));
        let response = router
            .oneshot(request(Method::GET, "/api/health", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "status": "ok", "message": "DailyLife Health Coach backend ready" })
        );
    }

    #[tokio::test]
    async fn test_rejects_invalid_recommendation_requests() {
        let router = test_router(Arc::new(FixedGateway("unused")));
        let response = router
            .oneshot(request(
                Method::POST,
                "/api/assistant/recommendations",
                Some(json!({ "profile": { "age": 200 } })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Invalid data");
        assert_eq!(body["issues"][0]["path"], "profile.age");
        assert_eq!(body["issues"][0]["constraint"], "max");
    }

    #[tokio::test]
    async fn test_returns_generated_recommendations_for_valid_payloads() {
        let router = test_router(Arc::new(FixedGateway("Test recommendations")));
        let response = router
            .oneshot(request(
                Method::POST,
                "/api/assistant/recommendations",
                Some(valid_payload()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["recommendations_text"], "Test recommendations");
        let created_at = body["created_at"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(created_at).is_ok());
    }

    #[tokio::test]
    async fn test_gateway_failures_map_to_500_with_detail() {
        let router = test_router(Arc::new(FailingGateway(|| AssistantError::Timeout)));
        let response = router
            .oneshot(request(
                Method::POST,
                "/api/assistant/recommendations",
                Some(valid_payload()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Failed to generate recommendations");
        assert_eq!(body["detail"], "Assistant response timed out");
    }

    #[tokio::test]
    async fn test_unconfigured_gateway_maps_to_500() {
        let router = test_router(Arc::new(FailingGateway(|| {
            AssistantError::NotConfigured("API_KEY")
        })));
        let response = router
            .oneshot(request(
                Method::POST,
                "/api/assistant/recommendations",
                Some(valid_payload()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["detail"], "API_KEY is not configured");
    }

    #[tokio::test]
    async fn test_profile_get_stub() {
        let router = test_router(Arc::new(FixedGateway("unused")));
        let response = router
            .oneshot(request(Method::GET, "/api/profile", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "profile": null,
                "message": "Profile storage not configured in demo mode."
            })
        );
    }

    #[tokio::test]
    async fn test_profile_put_echoes_without_persisting() {
        let router = test_router(Arc::new(FixedGateway("unused")));
        let submitted = json!({ "age": 28, "sex": "female" });
        let response = router
            .oneshot(request(Method::PUT, "/api/profile", Some(submitted.clone())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "saved": true, "profile": submitted })
        );
    }

    #[tokio::test]
    async fn test_rate_limit_rejects_the_21st_request_in_a_window() {
        let router = test_router(Arc::new(FixedGateway("unused")));
        for _ in 0..20 {
            let response = router
                .clone()
                .oneshot(request(Method::GET, "/api/health", None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        let response = router
            .oneshot(request(Method::GET, "/api/health", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key("Retry-After"));
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Too many requests, please try again shortly." })
        );
    }

    #[tokio::test]
    async fn test_requests_without_connect_info_share_a_bucket() {
        let router = test_router(Arc::new(FixedGateway("unused")));
        let bare = Request::builder()
            .method(Method::GET)
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(bare).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("X-RateLimit-Remaining"));
    }
}
