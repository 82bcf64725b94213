//! Constants for the ViaCEP client.
//!
//! Defaults here are used by the config types; callers override them through
//! `HttpConfig` and `ViaCepConfig` rather than by mutating globals.

// ═══════════════════════════════════════════════════════════════════════════════
// API
// ═══════════════════════════════════════════════════════════════════════════════

/// Base URL of the public ViaCEP service.
pub const DEFAULT_BASE_URL: &str = "https://viacep.com.br";

/// Number of digits in a normalized CEP.
pub const CEP_DIGITS: usize = 8;

/// Minimum length accepted by the API for city and street search terms.
pub const MIN_SEARCH_TERM_LEN: usize = 3;

/// Length of a UF (state) code.
pub const UF_LEN: usize = 2;

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE
// ═══════════════════════════════════════════════════════════════════════════════

/// Namespace prefix prepended to every derived cache key.
pub const CACHE_KEY_PREFIX: &str = "viacep:";

/// Separator used when joining key components before hashing.
pub const CACHE_KEY_SEPARATOR: &str = ",";

/// Default TTL for cached API results, in seconds (1 hour).
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 3600;

/// Default capacity of the in-memory cache.
pub const DEFAULT_MEMORY_CACHE_ENTRIES: usize = 10_000;

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP
// ═══════════════════════════════════════════════════════════════════════════════

/// Additional attempts after a failed transport-level request.
pub const DEFAULT_RETRY_COUNT: u32 = 3;

/// Fixed wait between attempts, in milliseconds.
pub const DEFAULT_RETRY_WAIT_MS: u64 = 500;

/// Per-attempt request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Media type sent in both `Content-Type` and `Accept`.
pub const JSON_MEDIA_TYPE: &str = "application/json";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_is_namespaced() {
        assert!(CACHE_KEY_PREFIX.ends_with(':'));
    }

    #[test]
    fn test_search_limits() {
        assert_eq!(UF_LEN, 2);
        assert!(MIN_SEARCH_TERM_LEN >= 3);
    }
}
