//! Recommendation pipeline — summarize → assemble prompt → assistant
//! gateway → package response.
//!
//! Single pass per request, no retries at this layer (the only bounded
//! wait lives inside the gateway's poll loop). Nothing is cached or
//! shared across requests.

use chrono::{SecondsFormat, Utc};

use crate::assistant::RecommendationGateway;
use crate::errors::AppError;
use crate::profile::models::{HealthProfile, RecommendationResponse};
use crate::recommendations::prompts::build_recommendations_prompt;

pub async fn generate_recommendations(
    gateway: &dyn RecommendationGateway,
    profile: &HealthProfile,
) -> Result<RecommendationResponse, AppError> {
    let prompt = build_recommendations_prompt(profile);
    let recommendations_text = gateway.recommendations(&prompt).await?;

    Ok(RecommendationResponse {
        recommendations_text,
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::DateTime;

    use crate::assistant::AssistantError;

    struct FixedGateway(&'static str);

    #[async_trait]
    impl RecommendationGateway for FixedGateway {
        async fn recommendations(&self, _prompt: &str) -> Result<String, AssistantError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingGateway;

    #[async_trait]
    impl RecommendationGateway for FailingGateway {
        async fn recommendations(&self, _prompt: &str) -> Result<String, AssistantError> {
            Err(AssistantError::Timeout)
        }
    }

    #[tokio::test]
    async fn test_returns_gateway_text_verbatim() {
        let gateway = FixedGateway("Test recommendations");
        let response = generate_recommendations(&gateway, &HealthProfile::default())
            .await
            .unwrap();
        assert_eq!(response.recommendations_text, "Test recommendations");
    }

    #[tokio::test]
    async fn test_created_at_is_a_timestamp_near_now() {
        let gateway = FixedGateway("ok");
        let before = Utc::now();
        let response = generate_recommendations(&gateway, &HealthProfile::default())
            .await
            .unwrap();
        let created_at = DateTime::parse_from_rfc3339(&response.created_at).unwrap();
        let delta = (created_at.with_timezone(&Utc) - before).num_seconds().abs();
        assert!(delta <= 5, "created_at drifted {delta}s from now");
    }

    #[tokio::test]
    async fn test_gateway_failure_propagates() {
        let result =
            generate_recommendations(&FailingGateway, &HealthProfile::default()).await;
        assert!(matches!(
            result,
            Err(AppError::Assistant(AssistantError::Timeout))
        ));
    }
}
