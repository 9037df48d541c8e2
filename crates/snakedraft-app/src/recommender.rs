// Seam for the recommendation service.
//
// `.who` / `.next` produce a RecommendationContext; a Recommender turns it into
// the text shown to the user. Only the offline implementation ships: it relays
// the pre-computed context as-is.

use async_trait::async_trait;
use thiserror::Error;

use snakedraft_core::recommend::RecommendationContext;

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("recommendation service unavailable: {0}")]
    Unavailable(String),
}

/// Turns recommendation context into advice text.
#[async_trait]
pub trait Recommender: Send + Sync {
    async fn recommend(&self, context: &RecommendationContext) -> Result<String, RecommendError>;
}

/// Relays the rendered context without calling any service.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineRecommender;

#[async_trait]
impl Recommender for OfflineRecommender {
    async fn recommend(&self, context: &RecommendationContext) -> Result<String, RecommendError> {
        Ok(context.render())
    }
}
