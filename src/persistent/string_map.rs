//! Persistent (immutable) map from string keys to values.
//!
//! This module provides [`PersistentStringMap`], an immutable associative
//! container whose updates return new versions while every earlier version
//! stays valid, and [`TransientStringMap`], its single-owner mutable builder.
//!
//! # Overview
//!
//! The map is an 8-way tree addressed by the 64-bit FNV-1a hash of each key.
//! Every node stores exactly one key-value pair and eight subtrees. Each level
//! consumes the next 3 bits of the hash (lowest bits first) to pick a child,
//! and a walk stops at the node whose stored hash equals the key's hash, or at
//! an empty slot.
//!
//! - O(log8 N) get
//! - O(log8 N) insert
//! - O(log8 N) remove
//! - O(1) len and `is_empty`
//!
//! Updates clone only the nodes on the path from the root to the edited node;
//! every other subtree is shared between the old and the new version.
//!
//! # Examples
//!
//! ```rust
//! use persistent_string_map::persistent::PersistentStringMap;
//!
//! let map = PersistentStringMap::new()
//!     .insert("one", 1)
//!     .insert("two", 2)
//!     .insert("three", 3);
//!
//! assert_eq!(map.get("one"), Some(&1));
//! assert_eq!(map.len(), 3);
//!
//! // Structural sharing: the original map is preserved
//! let updated = map.insert("one", 100);
//! assert_eq!(map.get("one"), Some(&1));       // Original unchanged
//! assert_eq!(updated.get("one"), Some(&100)); // New version
//! ```
//!
//! # Iteration order
//!
//! Iteration is a pre-order walk: a node's own pair, then its children in
//! index order. The order is derived from key hashes and the history of
//! removals; it is neither insertion order nor sorted order.
//!
//! # Hash collisions
//!
//! Two distinct keys with the same 64-bit hash cannot be stored in the same
//! map. Inserting the second one panics (see [`HashCollisionError`]);
//! [`PersistentStringMap::try_insert`] reports it as an error instead.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Index;
use std::rc::Rc;

use super::ReferenceCounter;
use super::error::HashCollisionError;
use super::hash::hash_key;

// =============================================================================
// Constants
// =============================================================================

/// Children per node (2^3 = 8)
const CHILD_COUNT: usize = 8;

/// Hash bits consumed per level
const SHIFT_SIZE: u32 = 3;

/// Bit mask selecting a child index from the remaining hash bits
const CHILD_MASK: u64 = (CHILD_COUNT - 1) as u64;

/// Returns the child slot selected by the low bits of `partial_hash`.
#[inline]
#[allow(clippy::cast_possible_truncation)]
const fn child_index(partial_hash: u64) -> usize {
    (partial_hash & CHILD_MASK) as usize
}

// =============================================================================
// Node Definition
// =============================================================================

/// A child slot: the shared empty sentinel or a reference to a node.
///
/// `Empty` carries no data, so every empty slot in every version is the same
/// immutable value. No slot is ever absent.
enum Subtree<V> {
    /// The empty sentinel.
    Empty,
    /// A non-empty subtree, possibly shared with other versions.
    Node(ReferenceCounter<Node<V>>),
}

/// One key-value pair and its eight subtrees.
#[derive(Clone)]
struct Node<V> {
    /// Pairs stored in this subtree, including this node's own pair.
    size: usize,
    /// Full hash of `key`.
    hash: u64,
    key: ReferenceCounter<str>,
    value: V,
    children: [Subtree<V>; CHILD_COUNT],
}

/// A pair detached from the tree during removal.
struct Entry<V> {
    hash: u64,
    key: ReferenceCounter<str>,
    value: V,
}

impl<V> Clone for Subtree<V> {
    #[inline]
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Node(node) => Self::Node(ReferenceCounter::clone(node)),
        }
    }
}

impl<V> Default for Subtree<V> {
    #[inline]
    fn default() -> Self {
        Self::Empty
    }
}

impl<V> Subtree<V> {
    #[inline]
    const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[inline]
    fn size(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Node(node) => node.size,
        }
    }

    #[inline]
    fn node(&self) -> Option<&Node<V>> {
        match self {
            Self::Empty => None,
            Self::Node(node) => Some(node),
        }
    }

    /// Walks the hash path of `key` and returns the node storing it.
    fn lookup(&self, key: &str, hash: u64) -> Option<&Node<V>> {
        let mut current = self;
        let mut partial_hash = hash;
        loop {
            let node = current.node()?;
            if node.hash == hash {
                return (*node.key == *key).then_some(node);
            }
            current = &node.children[child_index(partial_hash)];
            partial_hash >>= SHIFT_SIZE;
        }
    }
}

impl<V> Node<V> {
    /// Creates a single-pair node whose children are all empty.
    fn leaf(hash: u64, key: &str, value: V) -> Self {
        Self {
            size: 1,
            hash,
            key: ReferenceCounter::from(key),
            value,
            children: std::array::from_fn(|_| Subtree::Empty),
        }
    }

    /// A node with no non-empty descendants.
    #[inline]
    const fn is_leaf(&self) -> bool {
        self.size == 1
    }

    /// Recomputes `size` from the children.
    fn recalculate_size(&mut self) {
        self.size = 1 + self.children.iter().map(Subtree::size).sum::<usize>();
    }

    /// The child with the largest subtree; ties go to the lowest index.
    fn donor_index(&self) -> usize {
        let mut donor = 0;
        let mut largest = 0;
        for (index, child) in self.children.iter().enumerate() {
            let size = child.size();
            if size > largest {
                donor = index;
                largest = size;
            }
        }
        donor
    }

    fn into_entry(self) -> Entry<V> {
        Entry {
            hash: self.hash,
            key: self.key,
            value: self.value,
        }
    }
}

// =============================================================================
// Tree Edits
// =============================================================================
//
// Both edits run on a slot the caller owns. `ReferenceCounter::make_mut`
// mutates a node in place when the slot holds the only reference to it and
// clones it first otherwise, so the same code performs path copying for a
// persistent update (the old version still references every node on the
// path) and in-place mutation for a sole owner.

/// Stores `value` under `key` in the subtree at `slot`.
///
/// Returns the replaced value, or `None` when a new pair was added.
fn place<V: Clone>(
    slot: &mut Subtree<V>,
    partial_hash: u64,
    hash: u64,
    key: &str,
    value: V,
) -> Result<Option<V>, HashCollisionError> {
    let Subtree::Node(reference) = &mut *slot else {
        *slot = Subtree::Node(ReferenceCounter::new(Node::leaf(hash, key, value)));
        return Ok(None);
    };

    if reference.hash != hash {
        let node = ReferenceCounter::make_mut(reference);
        let replaced = place(
            &mut node.children[child_index(partial_hash)],
            partial_hash >> SHIFT_SIZE,
            hash,
            key,
            value,
        )?;
        if replaced.is_none() {
            node.size += 1;
        }
        return Ok(replaced);
    }

    if *reference.key != *key {
        return Err(HashCollisionError {
            existing_key: reference.key.to_string(),
            new_key: key.to_string(),
            hash,
        });
    }

    let node = ReferenceCounter::make_mut(reference);
    Ok(Some(std::mem::replace(&mut node.value, value)))
}

/// Removes `key` from the subtree at `slot`, returning its value.
fn displace<V: Clone>(
    slot: &mut Subtree<V>,
    partial_hash: u64,
    hash: u64,
    key: &str,
) -> Option<V> {
    let Subtree::Node(reference) = &mut *slot else {
        return None;
    };

    if reference.hash != hash {
        let node = ReferenceCounter::make_mut(reference);
        let removed = displace(
            &mut node.children[child_index(partial_hash)],
            partial_hash >> SHIFT_SIZE,
            hash,
            key,
        )?;
        node.recalculate_size();
        return Some(removed);
    }

    if *reference.key != *key {
        return None;
    }

    if reference.is_leaf() {
        let Subtree::Node(reference) = std::mem::take(slot) else {
            return None;
        };
        return Some(ReferenceCounter::unwrap_or_clone(reference).value);
    }

    // The pair has descendants: pull the leftmost pair out of the largest
    // child and move it into this position.
    let donor = reference.donor_index();
    let node = ReferenceCounter::make_mut(reference);
    let replacement = take_leftmost(&mut node.children[donor])?;
    let removed = std::mem::replace(&mut node.value, replacement.value);
    node.key = replacement.key;
    node.hash = replacement.hash;
    node.recalculate_size();
    Some(removed)
}

/// Detaches the pair reached by always descending into the first non-empty
/// child, leaving the remainder of the subtree in `slot`.
fn take_leftmost<V: Clone>(slot: &mut Subtree<V>) -> Option<Entry<V>> {
    let Subtree::Node(reference) = &mut *slot else {
        return None;
    };

    if reference.is_leaf() {
        let Subtree::Node(reference) = std::mem::take(slot) else {
            return None;
        };
        return Some(ReferenceCounter::unwrap_or_clone(reference).into_entry());
    }

    let node = ReferenceCounter::make_mut(reference);
    let first = node.children.iter().position(|child| !child.is_empty())?;
    let entry = take_leftmost(&mut node.children[first])?;
    node.recalculate_size();
    Some(entry)
}

/// Aborts an insertion whose key collides with a stored key.
#[cold]
#[inline(never)]
#[allow(clippy::needless_pass_by_value)]
fn hash_collision(error: HashCollisionError) -> ! {
    #[cfg(feature = "tracing")]
    tracing::error!(
        existing_key = %error.existing_key,
        new_key = %error.new_key,
        hash = error.hash,
        "distinct keys share a 64-bit hash"
    );
    panic!("{error}");
}

/// Stores a pair through `place`, panicking on a hash collision.
///
/// Shared by every in-place entry point.
fn place_or_panic<V: Clone>(slot: &mut Subtree<V>, hash: u64, key: &str, value: V) -> Option<V> {
    place(slot, hash, hash, key, value).unwrap_or_else(|error| hash_collision(error))
}

// =============================================================================
// PersistentStringMap Definition
// =============================================================================

/// A persistent (immutable) map from string keys to values.
///
/// Cloning a map is O(1): the clone shares the whole tree. Every update
/// returns a new map and leaves `self` untouched.
///
/// # Time Complexity
///
/// | Operation         | Complexity |
/// |-------------------|------------|
/// | `new`             | O(1)       |
/// | `get`             | O(log8 N)  |
/// | `insert`          | O(log8 N)  |
/// | `insert_in_place` | O(log8 N)  |
/// | `remove`          | O(log8 N)  |
/// | `len`             | O(1)       |
/// | `is_empty`        | O(1)       |
/// | `first`           | O(1)       |
/// | `iter`            | O(N)       |
///
/// # Examples
///
/// ```rust
/// use persistent_string_map::persistent::PersistentStringMap;
///
/// let empty: PersistentStringMap<i32> = PersistentStringMap::new();
/// let one = empty.insert("x", 10);
/// let two = one.insert("y", 20);
///
/// assert_eq!(one.get("y"), None);
/// assert_eq!(two.get("y"), Some(&20));
/// assert!(empty.is_empty());
/// ```
pub struct PersistentStringMap<V> {
    root: Subtree<V>,
}

impl<V> Clone for PersistentStringMap<V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

impl<V> PersistentStringMap<V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_string_map::persistent::PersistentStringMap;
    ///
    /// let map: PersistentStringMap<i32> = PersistentStringMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: Subtree::Empty,
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// The count is stored in the root node.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.size()
    }

    /// Returns `true` if the map is the empty sentinel.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_string_map::persistent::PersistentStringMap;
    ///
    /// let map = PersistentStringMap::new().insert("key", 1);
    /// assert!(!map.is_empty());
    /// assert!(map.remove("key").is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Returns the value stored at the root of the tree, if any.
    ///
    /// Which pair sits at the root depends on the map's history; callers
    /// should treat the result as an arbitrary element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_string_map::persistent::PersistentStringMap;
    ///
    /// let map = PersistentStringMap::new().insert("only", 7);
    /// assert_eq!(map.first(), Some(&7));
    /// ```
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&V> {
        self.root.node().map(|node| &node.value)
    }

    /// Returns the value corresponding to the key.
    ///
    /// # Complexity
    ///
    /// O(log8 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_string_map::persistent::PersistentStringMap;
    ///
    /// let map = PersistentStringMap::new().insert("hello", 42);
    ///
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.root
            .lookup(key, hash_key(key))
            .map(|node| &node.value)
    }

    /// Returns `true` if the map contains a value for the key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.root.lookup(key, hash_key(key)).is_some()
    }

    /// Returns `true` if both maps share the same root.
    ///
    /// Sharing implies equal contents; equal contents do not imply sharing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_string_map::persistent::PersistentStringMap;
    ///
    /// let map = PersistentStringMap::new().insert("a", 1);
    /// assert!(map.ptr_eq(&map.clone()));
    /// assert!(!map.ptr_eq(&map.insert("b", 2)));
    /// ```
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (Subtree::Empty, Subtree::Empty) => true,
            (Subtree::Node(left), Subtree::Node(right)) => ReferenceCounter::ptr_eq(left, right),
            _ => false,
        }
    }

    /// Returns an iterator over key-value pairs.
    ///
    /// Pairs come in pre-order: each node's own pair, then its children in
    /// index order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_string_map::persistent::PersistentStringMap;
    ///
    /// let map = PersistentStringMap::new().insert("a", 1).insert("b", 2);
    ///
    /// let sum: i32 = map.iter().map(|(_, value)| value).sum();
    /// assert_eq!(sum, 3);
    /// ```
    #[must_use]
    pub fn iter(&self) -> PersistentStringMapIterator<'_, V> {
        PersistentStringMapIterator {
            stack: self.root.node().into_iter().collect(),
            remaining: self.len(),
        }
    }

    /// Returns an iterator over keys, in [`iter`](Self::iter) order.
    ///
    /// The iterator yields exactly [`len`](Self::len) keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_string_map::persistent::PersistentStringMap;
    ///
    /// let map = PersistentStringMap::new().insert("a", 1).insert("b", 2);
    ///
    /// let mut keys: Vec<&str> = map.keys().collect();
    /// keys.sort_unstable();
    /// assert_eq!(keys, vec!["a", "b"]);
    /// ```
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values, in [`iter`](Self::iter) order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Calls `function` on every key-value pair exactly once, in
    /// [`iter`](Self::iter) order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_string_map::persistent::PersistentStringMap;
    ///
    /// let map = PersistentStringMap::new().insert("a", 1).insert("b", 2);
    ///
    /// let mut visited = 0;
    /// map.for_each(|_key, value| visited += value);
    /// assert_eq!(visited, 3);
    /// ```
    pub fn for_each<F>(&self, mut function: F)
    where
        F: FnMut(&str, &V),
    {
        for (key, value) in self {
            function(key, value);
        }
    }
}

impl<V: Clone> PersistentStringMap<V> {
    /// Creates a map containing a single key-value pair.
    #[inline]
    #[must_use]
    pub fn singleton(key: &str, value: V) -> Self {
        Self::new().insert(key, value)
    }

    /// Inserts a key-value pair, returning the new version.
    ///
    /// If the map already contains the key, the value is replaced and the
    /// length is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if a different key with the same 64-bit hash is already stored
    /// (see [`HashCollisionError`]).
    ///
    /// # Complexity
    ///
    /// O(log8 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_string_map::persistent::PersistentStringMap;
    ///
    /// let map1 = PersistentStringMap::new().insert("key", 1);
    /// let map2 = map1.insert("key", 2);
    ///
    /// assert_eq!(map1.get("key"), Some(&1)); // Original unchanged
    /// assert_eq!(map2.get("key"), Some(&2)); // New version
    /// ```
    #[must_use]
    pub fn insert(&self, key: &str, value: V) -> Self {
        self.try_insert(key, value)
            .unwrap_or_else(|error| hash_collision(error))
    }

    /// Inserts a key-value pair, reporting a hash collision as an error.
    ///
    /// The collision is not resolved: the key simply cannot be stored in this
    /// map.
    ///
    /// # Errors
    ///
    /// Returns [`HashCollisionError`] if a different key with the same 64-bit
    /// hash is already stored.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_string_map::persistent::PersistentStringMap;
    ///
    /// let map = PersistentStringMap::new().try_insert("key", 1).unwrap();
    /// assert_eq!(map.get("key"), Some(&1));
    /// ```
    pub fn try_insert(&self, key: &str, value: V) -> Result<Self, HashCollisionError> {
        self.try_insert_hashed(key, hash_key(key), value)
    }

    fn try_insert_hashed(
        &self,
        key: &str,
        hash: u64,
        value: V,
    ) -> Result<Self, HashCollisionError> {
        let mut root = self.root.clone();
        place(&mut root, hash, hash, key, value)?;
        Ok(Self { root })
    }

    /// Inserts a key-value pair by mutating the nodes this map owns.
    ///
    /// The map is consumed, so no other handle can observe the old version
    /// through it. Nodes reachable only from this map are updated in place;
    /// a node still shared with another version is copied before the write,
    /// so other versions keep their contents.
    ///
    /// Intended for bulk construction, where most nodes have a single owner.
    ///
    /// # Panics
    ///
    /// Panics on a hash collision, like [`insert`](Self::insert).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_string_map::persistent::PersistentStringMap;
    ///
    /// let map = PersistentStringMap::new()
    ///     .insert_in_place("a", 1)
    ///     .insert_in_place("b", 2);
    /// assert_eq!(map.len(), 2);
    /// ```
    #[must_use]
    pub fn insert_in_place(mut self, key: &str, value: V) -> Self {
        let hash = hash_key(key);
        place_or_panic(&mut self.root, hash, key, value);
        self
    }

    /// Removes a key from the map, returning the new version.
    ///
    /// Removing an absent key returns a map sharing this map's root.
    ///
    /// # Complexity
    ///
    /// O(log8 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_string_map::persistent::PersistentStringMap;
    ///
    /// let map = PersistentStringMap::new().insert("a", 1).insert("b", 2);
    /// let removed = map.remove("a");
    ///
    /// assert_eq!(map.len(), 2);     // Original unchanged
    /// assert_eq!(removed.len(), 1); // New version
    /// assert_eq!(removed.get("a"), None);
    /// ```
    #[must_use]
    pub fn remove(&self, key: &str) -> Self {
        let hash = hash_key(key);
        if self.root.lookup(key, hash).is_none() {
            return self.clone();
        }
        let mut root = self.root.clone();
        displace(&mut root, hash, hash, key);
        Self { root }
    }

    /// Merges two maps; values from `other` win on conflicting keys.
    ///
    /// # Panics
    ///
    /// Panics on a hash collision between keys of the two maps.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_string_map::persistent::PersistentStringMap;
    ///
    /// let left = PersistentStringMap::new().insert("a", 1).insert("b", 2);
    /// let right = PersistentStringMap::new().insert("b", 20).insert("c", 3);
    ///
    /// let merged = left.merge(&right);
    /// assert_eq!(merged.get("a"), Some(&1));
    /// assert_eq!(merged.get("b"), Some(&20));
    /// assert_eq!(merged.get("c"), Some(&3));
    /// ```
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.extend(other.iter().map(|(key, value)| (key, value.clone())));
        result
    }

    /// Converts this map into a [`TransientStringMap`] for batch updates.
    #[must_use]
    pub fn transient(self) -> TransientStringMap<V> {
        TransientStringMap {
            root: self.root,
            _marker: PhantomData,
        }
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over key-value pairs of a [`PersistentStringMap`].
pub struct PersistentStringMapIterator<'a, V> {
    stack: Vec<&'a Node<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for PersistentStringMapIterator<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().filter_map(Subtree::node));
        self.remaining -= 1;
        Some((&*node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for PersistentStringMapIterator<'_, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<V> std::iter::FusedIterator for PersistentStringMapIterator<'_, V> {}

/// An owning iterator over key-value pairs of a [`PersistentStringMap`].
pub struct PersistentStringMapIntoIterator<V> {
    entries: std::vec::IntoIter<(String, V)>,
}

impl<V> Iterator for PersistentStringMapIntoIterator<V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<V> ExactSizeIterator for PersistentStringMapIntoIterator<V> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<V> Default for PersistentStringMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: AsRef<str>, V: Clone> Extend<(K, V)> for PersistentStringMap<V> {
    /// Inserts every pair, mutating nodes this map owns exclusively.
    ///
    /// # Panics
    ///
    /// Panics on a hash collision.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            let key = key.as_ref();
            let hash = hash_key(key);
            place_or_panic(&mut self.root, hash, key, value);
        }
    }
}

impl<K: AsRef<str>, V: Clone> FromIterator<(K, V)> for PersistentStringMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<V: Clone> IntoIterator for PersistentStringMap<V> {
    type Item = (String, V);
    type IntoIter = PersistentStringMapIntoIterator<V>;

    fn into_iter(self) -> Self::IntoIter {
        let entries: Vec<(String, V)> = self
            .iter()
            .map(|(key, value)| (key.to_owned(), value.clone()))
            .collect();
        PersistentStringMapIntoIterator {
            entries: entries.into_iter(),
        }
    }
}

impl<'a, V> IntoIterator for &'a PersistentStringMap<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = PersistentStringMapIterator<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: PartialEq> PartialEq for PersistentStringMap<V> {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.len() != other.len() {
            return false;
        }
        self.iter()
            .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<V: Eq> Eq for PersistentStringMap<V> {}

impl<V> Index<&str> for PersistentStringMap<V> {
    type Output = V;

    fn index(&self, key: &str) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<V: fmt::Debug> fmt::Debug for PersistentStringMap<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<V: fmt::Display> fmt::Display for PersistentStringMap<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// TransientStringMap Definition
// =============================================================================

/// A mutable, single-owner map for batch construction.
///
/// `TransientStringMap` edits its nodes in place instead of copying the path
/// on every update. It is neither `Send` nor `Sync`, and it must be converted
/// back with [`persistent`](Self::persistent) before the result can be shared.
///
/// # Examples
///
/// ```rust
/// use persistent_string_map::persistent::TransientStringMap;
///
/// let mut transient = TransientStringMap::new();
/// transient.insert("a", 1);
/// transient.insert("b", 2);
/// assert_eq!(transient.insert("a", 10), Some(1));
///
/// let persistent = transient.persistent();
/// assert_eq!(persistent.get("a"), Some(&10));
/// assert_eq!(persistent.len(), 2);
/// ```
///
/// # Transient-Persistent Pattern
///
/// ```rust
/// use persistent_string_map::persistent::PersistentStringMap;
///
/// let persistent: PersistentStringMap<i32> =
///     [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
///
/// let mut transient = persistent.clone().transient();
/// transient.insert("d", 4);
/// transient.remove("a");
/// let updated = transient.persistent();
///
/// assert_eq!(persistent.len(), 3); // Shared nodes were copied, not mutated
/// assert_eq!(updated.len(), 3);
/// assert!(!updated.contains_key("a"));
/// ```
pub struct TransientStringMap<V> {
    root: Subtree<V>,
    /// Marker to ensure `!Send` and `!Sync`.
    _marker: PhantomData<Rc<()>>,
}

static_assertions::assert_not_impl_any!(TransientStringMap<i32>: Send, Sync);
static_assertions::assert_not_impl_any!(TransientStringMap<String>: Send, Sync);

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentStringMap<i32>: Send, Sync);
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentStringMap<String>: Send, Sync);

impl<V> TransientStringMap<V> {
    /// Creates a new empty `TransientStringMap`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: Subtree::Empty,
            _marker: PhantomData,
        }
    }

    /// Returns the number of entries.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.size()
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Returns the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.root
            .lookup(key, hash_key(key))
            .map(|node| &node.value)
    }

    /// Returns `true` if the map contains a value for the key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.root.lookup(key, hash_key(key)).is_some()
    }

    /// Freezes this transient into a [`PersistentStringMap`].
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn persistent(self) -> PersistentStringMap<V> {
        #[cfg(feature = "tracing")]
        tracing::trace!(len = self.len(), "transient string map frozen");
        PersistentStringMap { root: self.root }
    }
}

impl<V: Clone> TransientStringMap<V> {
    /// Inserts a key-value pair in place.
    ///
    /// Returns the previous value if the key was present.
    ///
    /// # Panics
    ///
    /// Panics if a different key with the same 64-bit hash is already stored.
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        let hash = hash_key(key);
        place_or_panic(&mut self.root, hash, key, value)
    }

    /// Removes a key in place, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let hash = hash_key(key);
        self.root.lookup(key, hash)?;
        displace(&mut self.root, hash, hash, key)
    }
}

impl<V> Default for TransientStringMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for TransientStringMap<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("TransientStringMap")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl<K: AsRef<str>, V: Clone> Extend<(K, V)> for TransientStringMap<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key.as_ref(), value);
        }
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<V: serde::Serialize> serde::Serialize for PersistentStringMap<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentStringMapVisitor<V> {
    marker: PhantomData<V>,
}

#[cfg(feature = "serde")]
impl<'de, V> serde::de::Visitor<'de> for PersistentStringMapVisitor<V>
where
    V: serde::Deserialize<'de> + Clone,
{
    type Value = PersistentStringMap<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map with string keys")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut transient = TransientStringMap::new();
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            let hash = hash_key(&key);
            if let Err(error) = place(&mut transient.root, hash, hash, &key, value) {
                return Err(serde::de::Error::custom(error));
            }
        }
        Ok(transient.persistent())
    }
}

#[cfg(feature = "serde")]
impl<'de, V> serde::Deserialize<'de> for PersistentStringMap<V>
where
    V: serde::Deserialize<'de> + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(PersistentStringMapVisitor {
            marker: PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
