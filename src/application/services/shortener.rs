//! Short code allocation and resolution.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{Instant, timeout_at};

use crate::domain::errors::StorageError;
use crate::domain::repositories::LinkRepository;
use crate::utils::code_generator::{
    AlphanumericGenerator, CodeGenerator, RandomnessError, is_reserved_code,
};
use crate::utils::url_validator::is_valid_url;

/// Default per-operation storage deadline.
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Failures returned by [`Shortener`].
///
/// Duplicate-key conflicts never appear here; they are absorbed by the
/// retry loop.
#[derive(Debug, Error)]
pub enum ShortenerError {
    /// Input is not an absolute http(s) URL with a host.
    #[error("invalid URL: {0:?}")]
    InvalidUrl(String),

    /// Every attempt collided with an existing code.
    #[error("could not generate a unique code after {attempts} attempts")]
    ExhaustedRetries { attempts: u32 },

    /// No link is stored under the code.
    #[error("short code not found: {0:?}")]
    NotFound(String),

    /// The operation deadline passed before storage answered.
    #[error("operation cancelled: storage deadline exceeded")]
    Cancelled,

    #[error(transparent)]
    Randomness(#[from] RandomnessError),

    #[error("storage error: {0}")]
    Storage(#[source] StorageError),
}

/// Result of a successful allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenedUrl {
    pub code: String,
    pub short_url: String,
}

/// Allocates random codes for URLs and resolves codes back.
///
/// Holds no link data of its own: every read and write goes through the
/// injected [`LinkRepository`], whose atomic create-if-absent is what keeps
/// concurrent allocations from overwriting each other.
pub struct Shortener {
    repository: Arc<dyn LinkRepository>,
    generator: Arc<dyn CodeGenerator>,
    base_url: String,
    code_length: usize,
    max_retries: u32,
    storage_timeout: Duration,
}

impl Shortener {
    /// Creates a shortener using the secure alphanumeric generator.
    ///
    /// A trailing `/` on `base_url` is dropped.
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        base_url: impl Into<String>,
        code_length: usize,
        max_retries: u32,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            repository,
            generator: Arc::new(AlphanumericGenerator),
            base_url,
            code_length,
            max_retries,
            storage_timeout: DEFAULT_STORAGE_TIMEOUT,
        }
    }

    /// Replaces the code generator.
    pub fn with_generator(mut self, generator: Arc<dyn CodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Sets the deadline applied to each shorten/resolve call.
    pub fn with_storage_timeout(mut self, timeout: Duration) -> Self {
        self.storage_timeout = timeout;
        self
    }

    /// The storage backend this shortener writes to.
    pub fn repository(&self) -> &Arc<dyn LinkRepository> {
        &self.repository
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn code_length(&self) -> usize {
        self.code_length
    }

    /// Builds the public short URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    /// Allocates a fresh code for `raw_url` and stores the mapping.
    ///
    /// Uses the configured storage timeout as the deadline.
    ///
    /// # Errors
    ///
    /// See [`Self::create_short_url_with_deadline`].
    pub async fn create_short_url(&self, raw_url: &str) -> Result<ShortenedUrl, ShortenerError> {
        let deadline = Instant::now() + self.storage_timeout;
        self.create_short_url_with_deadline(raw_url, deadline).await
    }

    /// Allocates a fresh code for `raw_url`, giving up at `deadline`.
    ///
    /// # Retry policy
    ///
    /// Up to `max_retries` attempts. Each attempt generates a new code and
    /// tries a create-if-absent write. A duplicate-key conflict, or a code
    /// that matches a fixed route, moves on to the next attempt; the first
    /// successful write returns immediately.
    ///
    /// # Errors
    ///
    /// - [`ShortenerError::InvalidUrl`] before any storage access
    /// - [`ShortenerError::ExhaustedRetries`] when every attempt collided
    /// - [`ShortenerError::Cancelled`] when the deadline passes; no further
    ///   attempt is started
    /// - [`ShortenerError::Randomness`] / [`ShortenerError::Storage`] on the
    ///   first such failure, without retrying
    pub async fn create_short_url_with_deadline(
        &self,
        raw_url: &str,
        deadline: Instant,
    ) -> Result<ShortenedUrl, ShortenerError> {
        if !is_valid_url(raw_url) {
            return Err(ShortenerError::InvalidUrl(raw_url.to_string()));
        }

        for _ in 0..self.max_retries {
            if Instant::now() >= deadline {
                return Err(ShortenerError::Cancelled);
            }

            let code = self.generator.generate(self.code_length)?;
            if is_reserved_code(&code) {
                continue;
            }

            match within(deadline, self.repository.create(&code, raw_url)).await? {
                Ok(()) => {
                    return Ok(ShortenedUrl {
                        short_url: self.short_url(&code),
                        code,
                    });
                }
                Err(StorageError::DuplicateKey(_)) => continue,
                Err(e) => return Err(ShortenerError::Storage(e)),
            }
        }

        Err(ShortenerError::ExhaustedRetries {
            attempts: self.max_retries,
        })
    }

    /// Resolves `code` to its original URL, counting one hit.
    ///
    /// Uses the configured storage timeout as the deadline.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve_code_with_deadline`].
    pub async fn resolve_code(&self, code: &str) -> Result<String, ShortenerError> {
        let deadline = Instant::now() + self.storage_timeout;
        self.resolve_code_with_deadline(code, deadline).await
    }

    /// Resolves `code` to its original URL, giving up at `deadline`.
    ///
    /// # Errors
    ///
    /// - [`ShortenerError::NotFound`] for an empty or unknown code (an empty
    ///   code never reaches storage)
    /// - [`ShortenerError::Cancelled`] when the deadline passes
    /// - [`ShortenerError::Storage`] on any other storage failure
    pub async fn resolve_code_with_deadline(
        &self,
        code: &str,
        deadline: Instant,
    ) -> Result<String, ShortenerError> {
        if code.is_empty() {
            return Err(ShortenerError::NotFound(String::new()));
        }

        match within(deadline, self.repository.get_and_touch(code)).await? {
            Ok(link) => Ok(link.original_url),
            Err(StorageError::NotFound(_)) => Err(ShortenerError::NotFound(code.to_string())),
            Err(e) => Err(ShortenerError::Storage(e)),
        }
    }
}

/// Runs a storage call against `deadline`.
async fn within<T>(
    deadline: Instant,
    call: impl Future<Output = Result<T, StorageError>>,
) -> Result<Result<T, StorageError>, ShortenerError> {
    timeout_at(deadline, call)
        .await
        .map_err(|_| ShortenerError::Cancelled)
}
