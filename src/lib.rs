//! # persistent-string-map
//!
//! A persistent (immutable, structurally shared) map from string keys to
//! values.
//!
//! ## Overview
//!
//! Every update returns a new version of the map and leaves all earlier
//! versions valid. Versions share every subtree that an update did not touch,
//! so keeping many versions alive costs little more than keeping one.
//!
//! - **Persistent operations**: `insert`, `remove`, `get`, `len`, `first`
//! - **In-place construction**: `insert_in_place` and [`TransientStringMap`]
//!   for callers holding the only reference
//! - **Traversal**: `iter`, `keys`, `values`, `for_each`, `Display`
//!
//! Keys are addressed by their 64-bit FNV-1a hash. Two distinct keys with the
//! same hash cannot coexist in one map; see [`HashCollisionError`].
//!
//! ## Feature Flags
//!
//! - `arc` (default): share nodes through `Arc`, making maps `Send + Sync`
//! - `serde`: `Serialize` / `Deserialize` as a map
//! - `tracing`: emit `tracing` events on hash collisions and transient freezes
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use persistent_string_map::prelude::*;
//!
//! let v1 = PersistentStringMap::new().insert("a", 1).insert("b", 2);
//! let v2 = v1.insert("a", 10).remove("b");
//!
//! assert_eq!(v1.get("a"), Some(&1));
//! assert_eq!(v1.get("b"), Some(&2));
//! assert_eq!(v2.get("a"), Some(&10));
//! assert_eq!(v2.get("b"), None);
//! ```
//!
//! [`TransientStringMap`]: persistent::TransientStringMap
//! [`HashCollisionError`]: persistent::HashCollisionError

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types.
///
/// # Usage
///
/// ```rust
/// use persistent_string_map::prelude::*;
/// ```
pub mod prelude {
    pub use crate::persistent::*;
}

pub mod persistent;
