//! FNV-1a key hashing.
//!
//! Every key stored in a [`PersistentStringMap`](super::PersistentStringMap)
//! is addressed by the 64-bit FNV-1a digest of its UTF-8 bytes. The digest is
//! deterministic and unseeded: the same key hashes to the same value in every
//! process, which keeps the tree shape reproducible but offers no protection
//! against adversarially chosen key sets.
//!
//! # Examples
//!
//! ```rust
//! use persistent_string_map::persistent::hash::{fnv1a_64, hash_key};
//!
//! assert_eq!(hash_key(""), 0xcbf2_9ce4_8422_2325);
//! assert_eq!(hash_key("a"), fnv1a_64(b"a"));
//! ```

use std::hash::{BuildHasher, Hasher};

// =============================================================================
// Constants
// =============================================================================

/// FNV-1a 64-bit offset basis.
pub const OFFSET_BASIS: u64 = 14_695_981_039_346_656_037;

/// FNV-1a 64-bit prime.
pub const PRIME: u64 = 1_099_511_628_211;

// =============================================================================
// Digest functions
// =============================================================================

/// Computes the FNV-1a digest of `bytes`, continuing from `state`.
#[inline]
#[allow(clippy::cast_lossless)]
const fn fold_bytes(mut state: u64, bytes: &[u8]) -> u64 {
    let mut index = 0;
    while index < bytes.len() {
        state ^= bytes[index] as u64;
        state = state.wrapping_mul(PRIME);
        index += 1;
    }
    state
}

/// Computes the 64-bit FNV-1a digest of a byte slice.
///
/// Total over every input, including the empty slice (which yields
/// [`OFFSET_BASIS`]).
///
/// # Examples
///
/// ```rust
/// use persistent_string_map::persistent::hash::{fnv1a_64, OFFSET_BASIS};
///
/// assert_eq!(fnv1a_64(&[]), OFFSET_BASIS);
/// assert_eq!(fnv1a_64(b"a"), 0xaf63_dc4c_8601_ec8c);
/// ```
#[inline]
#[must_use]
pub const fn fnv1a_64(bytes: &[u8]) -> u64 {
    fold_bytes(OFFSET_BASIS, bytes)
}

/// Computes the hash used to place `key` in the tree.
#[inline]
#[must_use]
pub const fn hash_key(key: &str) -> u64 {
    fnv1a_64(key.as_bytes())
}

// =============================================================================
// Hasher adapters
// =============================================================================

/// A [`Hasher`] producing FNV-1a digests.
///
/// Writing the bytes of a key with [`Hasher::write`] and calling
/// [`Hasher::finish`] yields exactly [`fnv1a_64`] of those bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FnvHasher {
    state: u64,
}

impl FnvHasher {
    /// Creates a hasher positioned at the offset basis.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: OFFSET_BASIS,
        }
    }
}

impl Default for FnvHasher {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FnvHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.state = fold_bytes(self.state, bytes);
    }
}

/// [`BuildHasher`] for [`FnvHasher`], usable with `std::collections::HashMap`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FnvBuildHasher;

impl BuildHasher for FnvBuildHasher {
    type Hasher = FnvHasher;

    #[inline]
    fn build_hasher(&self) -> FnvHasher {
        FnvHasher::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", 0xcbf2_9ce4_8422_2325)]
    #[case("a", 0xaf63_dc4c_8601_ec8c)]
    #[case("foobar", 0x8594_4171_f739_67e8)]
    fn test_fnv1a_64_reference_vectors(#[case] input: &str, #[case] expected: u64) {
        assert_eq!(fnv1a_64(input.as_bytes()), expected);
    }

    #[rstest]
    fn test_hash_key_matches_bytes() {
        assert_eq!(hash_key("hello"), fnv1a_64(b"hello"));
        assert_eq!(hash_key("ключ"), fnv1a_64("ключ".as_bytes()));
    }

    #[rstest]
    fn test_hash_key_is_deterministic() {
        assert_eq!(hash_key("same"), hash_key("same"));
        assert_ne!(hash_key("a"), hash_key("b"));
    }

    #[rstest]
    fn test_hasher_streaming_matches_one_shot() {
        let mut hasher = FnvHasher::new();
        hasher.write(b"foo");
        hasher.write(b"bar");
        assert_eq!(hasher.finish(), fnv1a_64(b"foobar"));
    }

    #[rstest]
    fn test_build_hasher_with_std_hashmap() {
        let mut map = std::collections::HashMap::with_hasher(FnvBuildHasher);
        map.insert("key", 1);
        assert_eq!(map.get("key"), Some(&1));
    }
}
