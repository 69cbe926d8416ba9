//! Random short code generation.
//!
//! Codes are drawn from the OS cryptographically secure random source so they
//! can't be guessed from previously issued ones.

use thiserror::Error;

/// The 62-symbol code alphabet: lowercase, uppercase, then digits.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Largest multiple of 62 that fits in a byte. Bytes at or above it are
/// discarded so every symbol keeps the same probability.
const REJECTION_THRESHOLD: u8 = 248;

/// Codes that would be shadowed by a fixed route and so can never resolve.
const RESERVED_CODES: &[&str] = &["healthz", "shorten"];

/// Returns true if `code` collides with a fixed route path.
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// The secure random source could not be read.
#[derive(Debug, Clone, Error)]
#[error("secure random source unavailable: {0}")]
pub struct RandomnessError(pub String);

/// Source of candidate short codes.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Produces a code of exactly `length` characters.
    ///
    /// # Errors
    ///
    /// Returns [`RandomnessError`] if no randomness is available.
    fn generate(&self, length: usize) -> Result<String, RandomnessError>;
}

/// Stateless generator backed by [`generate_code`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphanumericGenerator;

impl CodeGenerator for AlphanumericGenerator {
    fn generate(&self, length: usize) -> Result<String, RandomnessError> {
        generate_code(length)
    }
}

/// Generates a code of `length` characters, each picked independently and
/// uniformly from [`ALPHABET`].
///
/// # Errors
///
/// Returns [`RandomnessError`] if the OS random source fails.
pub fn generate_code(length: usize) -> Result<String, RandomnessError> {
    let mut code = String::with_capacity(length);
    let mut buf = [0u8; 64];

    while code.len() < length {
        getrandom::fill(&mut buf).map_err(|e| RandomnessError(e.to_string()))?;

        for byte in buf.iter().copied().filter(|b| *b < REJECTION_THRESHOLD) {
            code.push(ALPHABET[usize::from(byte % 62)] as char);
            if code.len() == length {
                break;
            }
        }
    }

    Ok(code)
}
