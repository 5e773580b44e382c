//! Creator search
//!
//! Debounced lookups against the creator search endpoint and the listing
//! navigation triggered by enter.

mod client;
mod controller;
mod debounce;

pub use client::{Creator, CreatorSearch, CreatorsResponse};
pub use controller::{ResultsPanel, SearchController, SearchEvent};
pub use debounce::Debouncer;

use reqwest::Url;

use crate::{QuizpilotError, Result};

/// Query parameter carrying the creator filter on listing pages
pub const CREATOR_PARAM: &str = "creator";

/// Target of an enter press in the search field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub path: String,
    pub creator: Option<String>,
}

impl Navigation {
    /// Listing at `path` filtered by `value`, or unfiltered when the trimmed
    /// value is empty.
    pub fn filtered(path: &str, value: &str) -> Self {
        let value = value.trim();
        Self {
            path: path.to_string(),
            creator: (!value.is_empty()).then(|| value.to_string()),
        }
    }

    /// Absolute URL against the server base.
    pub fn resolve(&self, base: &Url) -> Result<Url> {
        let mut url = base
            .join(&self.path)
            .map_err(|e| QuizpilotError::Config(format!("invalid path {:?}: {e}", self.path)))?;
        url.set_query(None);
        if let Some(creator) = &self.creator {
            url.query_pairs_mut().append_pair(CREATOR_PARAM, creator);
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://127.0.0.1:8000/").unwrap()
    }

    #[test]
    fn test_filtered_url_is_encoded() {
        let nav = Navigation::filtered("/quizzes/", " ana maria ");
        assert_eq!(
            nav.resolve(&base()).unwrap().as_str(),
            "http://127.0.0.1:8000/quizzes/?creator=ana+maria"
        );
    }

    #[test]
    fn test_empty_value_gives_bare_path() {
        let nav = Navigation::filtered("/quizzes/", "   ");
        assert_eq!(nav.creator, None);
        assert_eq!(
            nav.resolve(&base()).unwrap().as_str(),
            "http://127.0.0.1:8000/quizzes/"
        );
    }
}
