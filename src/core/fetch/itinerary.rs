//! Itinerary generation fetcher.

use crate::core::content::{normalize, schema, Itinerary, ItineraryRequest};
use crate::core::gemini::{
    extract_json, with_retry, GenerateRequest, GenerativeBackend, Result, RetryPolicy,
};

/// Generate a multi-day itinerary anchored at the identified landmark.
/// Replaces any previous itinerary wholesale; step deletion afterwards is a
/// client-local edit handled by the session.
pub async fn generate_itinerary(
    backend: &dyn GenerativeBackend,
    retry: RetryPolicy,
    landmark: &str,
    city: &str,
    request: &ItineraryRequest,
) -> Result<Itinerary> {
    let must_visit = if request.must_visit.trim().is_empty() {
        "none".to_string()
    } else {
        request.must_visit.clone()
    };

    let prompt = format!(
        "Plan {num_days} days in {city}. Start: {landmark}. Daily window: {start}-{end}; \
         every step must fit inside the window and steps within a day must be in \
         non-decreasing start-time order. Number the days 1 through {num_days}. \
         Interests: {interests}. Must visit: {must_visit}. \
         Include hidden gems: {hidden_gems}. Return JSON.",
        num_days = request.num_days,
        start = request.start_time,
        end = request.end_time,
        interests = request.interests.join(","),
        hidden_gems = request.hidden_gems,
    );

    let generate = GenerateRequest::text(prompt).with_schema(schema::itinerary());
    let reply = with_retry(|| backend.generate(generate.clone()), retry).await?;
    Ok(normalize::itinerary(&extract_json(&reply.text)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gemini::GenerateReply;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CapturingBackend {
        last_prompt: Mutex<String>,
    }

    #[async_trait]
    impl GenerativeBackend for CapturingBackend {
        async fn generate(&self, request: GenerateRequest) -> Result<GenerateReply> {
            *self.last_prompt.lock().unwrap() = request.prompt.clone();
            Ok(GenerateReply {
                text: r#"{"title": "Trip", "totalDays": 2, "days": []}"#.to_string(),
                citations: Vec::new(),
            })
        }
    }

    #[tokio::test]
    async fn prompt_embeds_all_parameters() {
        let backend = CapturingBackend {
            last_prompt: Mutex::new(String::new()),
        };
        let request = ItineraryRequest {
            num_days: 2,
            must_visit: "Sainte-Chapelle".to_string(),
            hidden_gems: true,
            ..ItineraryRequest::default()
        };

        let itinerary =
            generate_itinerary(&backend, RetryPolicy::none(), "Louvre", "Paris", &request)
                .await
                .unwrap();
        assert_eq!(itinerary.total_days, 2);

        let prompt = backend.last_prompt.lock().unwrap().clone();
        assert!(prompt.contains("Plan 2 days in Paris"));
        assert!(prompt.contains("Start: Louvre"));
        assert!(prompt.contains("09:00-18:00"));
        assert!(prompt.contains("History,Culture"));
        assert!(prompt.contains("Sainte-Chapelle"));
        assert!(prompt.contains("hidden gems: true"));
    }
}
