//! Home-slot hashing.
//!
//! A `SlotHasher` maps a key to the index where its probe walk starts. The
//! result depends only on the key and the capacity and is always in
//! `0..capacity`.

use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

pub trait SlotHasher<K: ?Sized> {
    /// Index in `0..capacity` where the probe walk for `key` begins.
    /// `capacity` is never zero.
    fn home_slot(&self, key: &K, capacity: usize) -> usize;
}

/// Hashes a key by its byte length.
///
/// Keys are opaque bytes, so the length is `as_ref().len()`, not a character
/// count: `"café"` is 5 bytes and lands on slot 5, not 4.
///
/// This is deliberately weak: every key of the same length lands on the same
/// home slot, which makes clustering and tombstone behavior easy to observe.
/// Use [`Hashed`] for real workloads.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyLength;

impl<K> SlotHasher<K> for KeyLength
where
    K: ?Sized + AsRef<[u8]>,
{
    #[inline]
    fn home_slot(&self, key: &K, capacity: usize) -> usize {
        key.as_ref().len() % capacity
    }
}

/// Hashes a key with a `BuildHasher`, reduced modulo the capacity.
#[derive(Clone, Debug, Default)]
pub struct Hashed<S = DefaultHashBuilder>(S);

impl<S> Hashed<S> {
    pub fn new(build: S) -> Self {
        Hashed(build)
    }
}

impl<K, S> SlotHasher<K> for Hashed<S>
where
    K: ?Sized + Hash,
    S: BuildHasher,
{
    #[inline]
    fn home_slot(&self, key: &K, capacity: usize) -> usize {
        (self.0.hash_one(key) % capacity as u64) as usize
    }
}
