//! ProbeTable: open addressing over a flat slot array with linear probing,
//! tombstone deletion and load-factor driven doubling.

use crate::config::TableConfig;
use crate::error::{ConfigError, InsertError, MergeError};
use crate::hasher::{KeyLength, SlotHasher};
use crate::slot::Slot;
use core::borrow::Borrow;
use core::fmt;
use tracing::{debug, error, trace};

#[derive(Clone)]
pub struct ProbeTable<K, V, H = KeyLength> {
    slots: Vec<Slot<K, V>>, // capacity == slots.len(), never zero
    live: usize,
    max_load_factor: f64,
    hasher: H,
}

/// Table of username/password pairs hashed by key length.
pub type CredentialTable = ProbeTable<String, String>;

impl<K, V> ProbeTable<K, V> {
    /// Create a table with `initial_capacity` slots that doubles once the
    /// load factor would exceed `max_load_factor`.
    pub fn new(initial_capacity: usize, max_load_factor: f64) -> Result<Self, ConfigError> {
        Self::from_config(TableConfig::new(initial_capacity, max_load_factor))
    }

    pub fn from_config(config: TableConfig) -> Result<Self, ConfigError> {
        Self::with_hasher(config, KeyLength)
    }
}

impl<K, V> Default for ProbeTable<K, V> {
    fn default() -> Self {
        Self::build(TableConfig::default(), KeyLength)
    }
}

/// Iterator over live entries in slot order.
pub struct Iter<'a, K, V> {
    it: core::slice::Iter<'a, Slot<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.by_ref().find_map(|s| match s {
            Slot::Occupied { key, value } => Some((key, value)),
            _ => None,
        })
    }
}

impl<K, V, H> ProbeTable<K, V, H> {
    pub fn with_hasher(config: TableConfig, hasher: H) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, hasher))
    }

    fn build(config: TableConfig, hasher: H) -> Self {
        Self {
            slots: empty_slots(config.initial_capacity),
            live: 0,
            max_load_factor: config.max_load_factor,
            hasher,
        }
    }

    pub fn len(&self) -> usize {
        self.live
    }
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    pub fn load_factor(&self) -> f64 {
        self.live as f64 / self.capacity() as f64
    }

    /// Number of deleted slots still holding a probe chain together.
    pub fn tombstones(&self) -> usize {
        self.slots.iter().filter(|s| s.is_tombstone()).count()
    }

    /// The backing array, in index order.
    pub fn slots(&self) -> &[Slot<K, V>] {
        &self.slots
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.slots.iter(),
        }
    }
}

impl<K, V, H> ProbeTable<K, V, H>
where
    K: Eq,
    H: SlotHasher<K>,
{
    /// Index where the probe walk for `key` starts at the current capacity.
    pub fn home_slot<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized,
        H: SlotHasher<Q>,
    {
        self.hasher.home_slot(key, self.capacity())
    }

    /// Walk from the home slot of `key`, skipping tombstones, until the key,
    /// an empty slot, or `capacity` probes.
    fn find_index<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: SlotHasher<Q>,
    {
        let capacity = self.capacity();
        let mut i = self.hasher.home_slot(key, capacity);
        for _ in 0..capacity {
            match &self.slots[i] {
                Slot::Empty => return None,
                Slot::Occupied { key: k, .. } if k.borrow() == key => return Some(i),
                _ => {}
            }
            i = (i + 1) % capacity;
        }
        None
    }

    pub fn try_insert(&mut self, key: K, value: V) -> Result<(), InsertError> {
        let capacity = self.capacity();
        if self.live >= capacity {
            trace!(live = self.live, capacity, "insert rejected: table full");
            return Err(InsertError::TableFull);
        }

        let home = self.hasher.home_slot(&key, capacity);
        let at = match vacancy_for(&self.slots, home, &key) {
            Ok(at) => at,
            Err(InsertError::NoFreeSlot) => {
                error!(
                    live = self.live,
                    capacity,
                    home,
                    "probe walk found no empty slot or tombstone below capacity"
                );
                if cfg!(debug_assertions) {
                    panic!("probe table invariant broken: no free slot with live < capacity");
                }
                return Err(InsertError::NoFreeSlot);
            }
            Err(e) => {
                trace!(home, reason = %e, "insert rejected");
                return Err(e);
            }
        };

        self.slots[at] = Slot::Occupied { key, value };
        self.live += 1;
        trace!(home, slot = at, live = self.live, "inserted");

        if self.load_factor() > self.max_load_factor {
            self.grow();
        }
        Ok(())
    }

    /// Register `key` with `value`. Returns `false` if the key is already
    /// present or the table is full.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.try_insert(key, value).is_ok()
    }

    /// Remove `key`, leaving a tombstone in its slot, and return the entry.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: SlotHasher<Q>,
    {
        let at = self.find_index(key)?;
        let entry = self.slots[at].bury()?;
        self.live -= 1;
        trace!(slot = at, live = self.live, "deleted");
        Some(entry)
    }

    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: SlotHasher<Q>,
    {
        self.remove(key).is_some()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: SlotHasher<Q>,
    {
        self.find_index(key).and_then(|i| self.slots[i].value())
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: SlotHasher<Q>,
    {
        self.find_index(key).is_some()
    }

    /// True if `key` is present and its stored value equals `value`.
    pub fn login<Q, W>(&self, key: &Q, value: &W) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: SlotHasher<Q>,
        V: Borrow<W>,
        W: ?Sized + Eq,
    {
        self.get(key).is_some_and(|v| v.borrow() == value)
    }

    /// Replace accounts `key_a` and `key_b` with `new_key`.
    ///
    /// All checks run against the table as it is before any mutation: both
    /// accounts must exist, and `new_key` must not belong to a third
    /// account. `new_key` may equal `key_a` or `key_b`, and `key_a` may
    /// equal `key_b`. The old values are accepted but not compared; only
    /// existence is checked. On any failure the table is left untouched.
    pub fn try_merge_accounts<Q, W>(
        &mut self,
        key_a: &Q,
        _value_a: &W,
        key_b: &Q,
        _value_b: &W,
        new_key: K,
        new_value: V,
    ) -> Result<(), MergeError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: SlotHasher<Q>,
        W: ?Sized,
    {
        let a = self.find_index(key_a).ok_or(MergeError::MissingAccount)?;
        let b = self.find_index(key_b).ok_or(MergeError::MissingAccount)?;

        let new_q: &Q = new_key.borrow();
        if let Some(n) = self.find_index(new_q) {
            if n != a && n != b {
                return Err(MergeError::NewKeyExists);
            }
        }

        // a == b when both keys name the same account; it is deleted once.
        self.slots[a] = Slot::Tombstone;
        self.live -= 1;
        if b != a {
            self.slots[b] = Slot::Tombstone;
            self.live -= 1;
        }
        // A slot was just freed and new_key is absent, so this only fails
        // if the probe logic itself is broken.
        self.try_insert(new_key, new_value)?;
        trace!(live = self.live, "merged accounts");
        Ok(())
    }

    pub fn merge_accounts<Q, W>(
        &mut self,
        key_a: &Q,
        value_a: &W,
        key_b: &Q,
        value_b: &W,
        new_key: K,
        new_value: V,
    ) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: SlotHasher<Q>,
        W: ?Sized,
    {
        match self.try_merge_accounts(key_a, value_a, key_b, value_b, new_key, new_value) {
            Ok(()) => true,
            Err(e) => {
                trace!(reason = %e, "merge rejected");
                false
            }
        }
    }

    /// Double the capacity (repeatedly, for tiny load factors) until the
    /// load factor bound holds again, and rehash every live entry.
    fn grow(&mut self) {
        let old_capacity = self.capacity();
        let mut capacity = old_capacity * 2;
        while self.live as f64 / capacity as f64 > self.max_load_factor {
            capacity *= 2;
        }

        let dropped_tombstones = self.tombstones();
        let (slots, live) = rehash(&self.hasher, std::mem::take(&mut self.slots), capacity);
        debug_assert_eq!(live, self.live);
        self.slots = slots;
        self.live = live;
        debug!(
            old_capacity,
            new_capacity = capacity,
            live,
            dropped_tombstones,
            "resized probe table"
        );
    }
}

impl<K, V, H> fmt::Debug for ProbeTable<K, V, H> {
    // Contents are credentials; only report shape.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeTable")
            .field("len", &self.live)
            .field("capacity", &self.capacity())
            .field("tombstones", &self.tombstones())
            .field("max_load_factor", &self.max_load_factor)
            .finish()
    }
}

fn empty_slots<K, V>(capacity: usize) -> Vec<Slot<K, V>> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, Slot::default);
    slots
}

/// Choose the slot an insert of `key` would use, probing linearly from
/// `home` for at most `slots.len()` steps.
///
/// The first tombstone seen is remembered but the walk continues, since the
/// key may still live further along the chain. Reaching an empty slot ends
/// the walk; the remembered tombstone wins over that empty slot.
fn vacancy_for<K: Eq, V>(slots: &[Slot<K, V>], home: usize, key: &K) -> Result<usize, InsertError> {
    let capacity = slots.len();
    let mut first_tombstone = None;
    let mut i = home;
    for _ in 0..capacity {
        match &slots[i] {
            Slot::Empty => return Ok(first_tombstone.unwrap_or(i)),
            Slot::Tombstone => {
                first_tombstone.get_or_insert(i);
            }
            Slot::Occupied { key: k, .. } if k == key => return Err(InsertError::DuplicateKey),
            Slot::Occupied { .. } => {}
        }
        i = (i + 1) % capacity;
    }
    first_tombstone.ok_or(InsertError::NoFreeSlot)
}

/// Build a fresh backing array of `capacity` slots holding every live entry
/// of `old`. Tombstones are dropped. Returns the array and its live count.
fn rehash<K, V, H>(hasher: &H, old: Vec<Slot<K, V>>, capacity: usize) -> (Vec<Slot<K, V>>, usize)
where
    K: Eq,
    H: SlotHasher<K>,
{
    let mut slots = empty_slots(capacity);
    let mut live = 0;
    for slot in old {
        let Slot::Occupied { key, value } = slot else {
            continue;
        };
        let home = hasher.home_slot(&key, capacity);
        match vacancy_for(&slots, home, &key) {
            Ok(at) => {
                slots[at] = Slot::Occupied { key, value };
                live += 1;
            }
            // Keys are unique and the new array is larger than the live count.
            Err(e) => unreachable!("rehash into {capacity} slots failed: {e}"),
        }
    }
    (slots, live)
}
