//! Identification fetchers and the confidence gate.
//!
//! Two entry points produce a [`Landmark`]: image-based (the uploaded photo
//! becomes the reference image) and name-based (a reference-image URL is
//! synthesized from the resolved name, since the identification call itself
//! returns no image on that path).

use crate::core::content::{normalize, schema, Landmark, UNKNOWN};
use crate::core::gemini::{
    extract_json, with_retry, GenerateRequest, GenerativeBackend, InlineImage, Result, RetryPolicy,
};

/// Identify the landmark depicted in a base64-encoded photo.
pub async fn analyze_landmark_image(
    backend: &dyn GenerativeBackend,
    retry: RetryPolicy,
    image_base64: &str,
) -> Result<Landmark> {
    let request = GenerateRequest::text(
        "Identify this landmark. Return JSON with name, alternative names, city, country, \
         confidence (0-100), description, and 5-6 descriptive bullet points. \
         Set confidence below 50 if you are uncertain.",
    )
    .with_schema(schema::landmark())
    .with_image(InlineImage::jpeg_base64(image_base64));

    let reply = with_retry(|| backend.generate(request.clone()), retry).await?;
    let value = extract_json(&reply.text)?;
    Ok(normalize::landmark(&value, UNKNOWN, image_base64.to_string()))
}

/// Resolve a free-text query to a specific landmark.
pub async fn search_landmark_by_name(
    backend: &dyn GenerativeBackend,
    retry: RetryPolicy,
    name: &str,
) -> Result<Landmark> {
    let request = GenerateRequest::text(format!(
        "Detail the landmark: \"{name}\". Identify the specific landmark, its city and \
         country. Return JSON with a confidence score (0-100), description, and 5-6 \
         descriptive points."
    ))
    .with_schema(schema::landmark());

    let reply = with_retry(|| backend.generate(request.clone()), retry).await?;
    let value = extract_json(&reply.text)?;

    let resolved_name = value["landmarkName"].as_str().unwrap_or(name);
    let city = value["city"].as_str().unwrap_or("");
    let image = reference_image_url(resolved_name, city);

    Ok(normalize::landmark(&value, name, image))
}

/// Embeddable reference-image URL from the image-generation collaborator.
/// Construction only; a broken image degrades silently in rendering.
pub fn reference_image_url(name: &str, city: &str) -> String {
    format!(
        "https://image.pollinations.ai/prompt/photorealistic landmark {} {}?width=1200&height=800&nologo=true",
        urlencoding::encode(name),
        urlencoding::encode(city),
    )
}

// ── Confidence gate ─────────────────────────────────────────────────────────

/// Two-threshold acceptance policy applied right after identification.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceGate {
    /// Below this, the result is a hard rejection.
    pub reject_below: f64,
    /// Below this (but accepted), the caller shows a non-blocking warning.
    pub warn_below: f64,
}

impl Default for ConfidenceGate {
    fn default() -> Self {
        Self {
            reject_below: 40.0,
            warn_below: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// Identification accepted; `warning` marks the low-confidence tier.
    Accepted { warning: bool },
    /// Could not confidently identify; treated as a session-level failure.
    Rejected,
}

impl ConfidenceGate {
    pub fn evaluate(&self, confidence_score: f64) -> Acceptance {
        if confidence_score < self.reject_below {
            Acceptance::Rejected
        } else {
            Acceptance::Accepted {
                warning: confidence_score < self.warn_below,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, Acceptance::Rejected)]
    #[case(35.0, Acceptance::Rejected)]
    #[case(39.9, Acceptance::Rejected)]
    #[case(40.0, Acceptance::Accepted { warning: true })]
    #[case(45.0, Acceptance::Accepted { warning: true })]
    #[case(49.9, Acceptance::Accepted { warning: true })]
    #[case(50.0, Acceptance::Accepted { warning: false })]
    #[case(100.0, Acceptance::Accepted { warning: false })]
    fn gate_applies_both_thresholds(#[case] score: f64, #[case] expected: Acceptance) {
        assert_eq!(ConfidenceGate::default().evaluate(score), expected);
    }

    #[test]
    fn reference_image_url_encodes_components() {
        let url = reference_image_url("Eiffel Tower", "Paris");
        assert!(url.contains("Eiffel%20Tower"));
        assert!(url.contains("Paris"));
        assert!(url.contains("width=1200&height=800"));
    }
}
