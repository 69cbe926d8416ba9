//! Short link entity representing a persisted code → URL mapping.

/// A persisted short link.
///
/// The `code` never changes once stored. `hits` only grows, by one per
/// successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub code: String,
    pub original_url: String,
    pub hits: u64,
}

impl ShortLink {
    /// Creates a freshly allocated link with a zero hit counter.
    pub fn new(code: impl Into<String>, original_url: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            original_url: original_url.into(),
            hits: 0,
        }
    }

    /// Returns a copy of the link with its hit counter set.
    pub fn with_hits(mut self, hits: u64) -> Self {
        self.hits = hits;
        self
    }
}
