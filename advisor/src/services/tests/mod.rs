//! Tests for advisor services
//!
//! Provider clients are exercised against local wiremock servers so no real
//! API traffic is generated.


use crate::types::GenerationRequest;

/// Standard request used across provider tests
pub fn test_request(model: &str) -> GenerationRequest {
    GenerationRequest {
        model: model.to_string(),
        prompt: "Explain these cancellations".to_string(),
        max_tokens: 256,
        temperature: 0.3,
    }
}
