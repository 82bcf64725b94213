//! Cache key derivation.
//!
//! ```text
//! key = "viacep:" || hex(SHA3-256(components joined by ","))
//! ```

use sha3::{Digest, Sha3_256};

use viacep_core::constants::{CACHE_KEY_PREFIX, CACHE_KEY_SEPARATOR};

/// Derives the namespaced cache key for an ordered list of components.
///
/// Identical component lists always yield identical keys. Components are
/// joined before hashing, so `["a,b"]` and `["a", "b"]` share a key.
///
/// # Example
///
/// ```rust
/// use viacep_cache::cache_key;
///
/// let key = cache_key(&["RS", "Porto Alegre", "Domingos"]);
/// assert!(key.starts_with("viacep:"));
/// assert_eq!(key, cache_key(&["RS", "Porto Alegre", "Domingos"]));
/// ```
pub fn cache_key<S: AsRef<str>>(components: &[S]) -> String {
    let mut hasher = Sha3_256::new();

    for (i, component) in components.iter().enumerate() {
        if i > 0 {
            hasher.update(CACHE_KEY_SEPARATOR.as_bytes());
        }
        hasher.update(component.as_ref().as_bytes());
    }

    format!("{}{}", CACHE_KEY_PREFIX, hex::encode(hasher.finalize()))
}
