//! Error types for persistent string maps.
//!
//! The only failure a map can report is a full 64-bit hash collision between
//! two distinct keys. The tree has no collision chaining, so the condition is
//! unrecoverable for the map that hit it: [`insert`] panics with the
//! [`Display`](std::fmt::Display) text of [`HashCollisionError`], while
//! [`try_insert`] hands the same value back to the caller.
//!
//! A missing key is never an error: lookups return `None` and removals return
//! an unchanged map.
//!
//! [`insert`]: super::PersistentStringMap::insert
//! [`try_insert`]: super::PersistentStringMap::try_insert

/// Two distinct keys produced the same 64-bit hash.
///
/// # Examples
///
/// ```rust
/// use persistent_string_map::persistent::HashCollisionError;
///
/// let error = HashCollisionError {
///     existing_key: "left".to_string(),
///     new_key: "right".to_string(),
///     hash: 0xdead_beef,
/// };
/// assert_eq!(
///     format!("{error}"),
///     "hash collision between 'left' and 'right' (hash 0x00000000deadbeef)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashCollisionError {
    /// The key already stored in the map.
    pub existing_key: String,
    /// The key whose insertion was rejected.
    pub new_key: String,
    /// The hash both keys share.
    pub hash: u64,
}

impl std::fmt::Display for HashCollisionError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "hash collision between '{}' and '{}' (hash {:#018x})",
            self.existing_key, self.new_key, self.hash
        )
    }
}

impl std::error::Error for HashCollisionError {}
