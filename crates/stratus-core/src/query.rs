//! Query strings of management requests.

use std::fmt::Display;

/// Ordered query pairs, starting with the `api-version` every management call needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Pairs holding only `api-version=version`.
    #[must_use]
    pub fn api_version(version: &str) -> Self {
        Self {
            pairs: vec![("api-version", version.to_string())],
        }
    }

    /// Add `key=value`.
    #[must_use]
    pub fn with(mut self, key: &'static str, value: impl Display) -> Self {
        self.pairs.push((key, value.to_string()));
        self
    }

    /// Pairs in insertion order, ready for [`reqwest::RequestBuilder::query`].
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::QueryParams;

    #[test]
    fn version_leads() {
        let pairs = QueryParams::api_version("2023-09-01")
            .with("$expand", "instanceView")
            .with("$top", 5)
            .into_pairs();
        assert_eq!(
            pairs,
            vec![
                ("api-version", "2023-09-01".to_string()),
                ("$expand", "instanceView".to_string()),
                ("$top", "5".to_string()),
            ]
        );
    }
}
