//! Persistent (immutable) string-keyed maps.
//!
//! This module provides a map from string keys to values that uses
//! structural sharing to minimize copying:
//!
//! - [`PersistentStringMap`]: Persistent map (8-way hash tree, FNV-1a keys)
//! - [`TransientStringMap`]: Mutable single-owner builder for batch updates
//! - [`hash`]: The FNV-1a digest that addresses keys in the tree
//!
//! # Structural Sharing
//!
//! Every update clones only the nodes between the root and the edited pair.
//! All other subtrees are shared with the previous version, which stays
//! valid and unchanged.
//!
//! # Examples
//!
//! ```rust
//! use persistent_string_map::persistent::PersistentStringMap;
//!
//! let map = PersistentStringMap::new()
//!     .insert("one", 1)
//!     .insert("two", 2);
//! assert_eq!(map.get("one"), Some(&1));
//!
//! // Structural sharing: the original map is preserved
//! let updated = map.remove("one");
//! assert_eq!(map.len(), 2);     // Original unchanged
//! assert_eq!(updated.len(), 1); // New version
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled (default), this is `std::sync::Arc`,
/// which lets map versions be shared across threads.
///
/// When the `arc` feature is disabled, this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod error;
pub mod hash;
mod string_map;

pub use error::HashCollisionError;
pub use string_map::PersistentStringMap;
pub use string_map::PersistentStringMapIntoIterator;
pub use string_map::PersistentStringMapIterator;
pub use string_map::TransientStringMap;

// =============================================================================
// Tests
// =============================================================================
