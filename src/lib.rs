//! probe-table: an in-memory credential table built on open addressing.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small associative table whose probing, tombstone and resize
//!   behavior is explicit and observable, used to store opaque
//!   username/password pairs.
//! - Pieces:
//!   - Slot<K, V>: tagged slot state (`Empty`, `Tombstone`, `Occupied`).
//!     No sentinel values, so any key or value is legal data.
//!   - SlotHasher<K>: maps a key to its home slot for a given capacity.
//!     `KeyLength` hashes by byte length (weak on purpose, clusters are
//!     easy to reason about); `Hashed` uses a real `BuildHasher`.
//!   - ProbeTable<K, V, H>: owns the slot array and the live count; exposes
//!     insert, delete, login and merge.
//!
//! Probing
//! - Every walk starts at the home slot and advances by one, wrapping, for
//!   at most `capacity` steps.
//! - Lookups (delete, login, get) skip tombstones and stop at the first
//!   empty slot. A tombstone never ends a walk, so deleting a key does not
//!   cut off keys that were placed further along the same cluster.
//! - Inserts remember the first tombstone they pass but keep walking: the
//!   key may still be present further on, and duplicates are rejected. The
//!   entry lands in that first tombstone if there was one, otherwise in the
//!   empty slot that ended the walk.
//!
//! Invariants
//! - `len() <= capacity()`; at most one occupied slot per key.
//! - After every successful insert, `len() / capacity() <= max_load_factor`.
//!   Crossing the bound doubles the capacity (repeatedly if needed) and
//!   rehashes every live entry into a fresh array. Tombstones do not survive
//!   a resize. Capacity never shrinks.
//! - Resizing swaps in the new array in one assignment; no caller can
//!   observe a partially migrated table.
//!
//! Failure model
//! - Expected outcomes ("not found", "already registered", "table full")
//!   are `false` from the boolean surface, or a typed error from the
//!   `try_*` variants. Nothing panics on user input.
//! - A full walk that finds neither an empty slot nor a tombstone while
//!   `len() < capacity()` means the probe logic is broken. It is logged at
//!   error level, panics in debug builds and fails the insert in release.
//!
//! Notes and non-goals
//! - Single-threaded and unsynchronized. Share it across threads behind a
//!   single lock held for the whole operation; resize in particular must
//!   not interleave with anything.
//! - Values are compared verbatim. Hash passwords before they get here.
//! - No persistence, no shrinking.

pub mod config;
pub mod error;
pub mod hasher;
pub mod probe_table;
mod probe_table_proptest;
pub mod slot;

// Public surface
pub use config::TableConfig;
pub use error::{ConfigError, InsertError, MergeError};
pub use hasher::{Hashed, KeyLength, SlotHasher};
pub use probe_table::{CredentialTable, ProbeTable};
pub use slot::Slot;
