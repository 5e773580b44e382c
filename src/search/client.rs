use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::Result;

/// One creator suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub username: String,
}

/// Body of the creator search endpoint
/// A body without `creators` is malformed, not an empty result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorsResponse {
    pub creators: Vec<Creator>,
}

/// Backend for creator lookups.
pub trait CreatorSearch: Send + Sync + 'static {
    fn search_creators(&self, query: &str) -> impl Future<Output = Result<Vec<Creator>>> + Send;
}
