//! Slot: the three states a position in the backing array can be in.

/// One position of a [`ProbeTable`](crate::ProbeTable)'s backing array.
///
/// A slot starts `Empty`, becomes `Occupied` on insert and turns into a
/// `Tombstone` on delete. It never goes back to `Empty` except through a
/// resize, which drops all tombstones.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Slot<K, V> {
    /// Never held an entry. Terminates every probe walk.
    #[default]
    Empty,
    /// Held an entry that was deleted. Probe walks skip over it.
    Tombstone,
    /// Holds a live entry.
    Occupied { key: K, value: V },
}

impl<K, V> Slot<K, V> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone)
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied { .. })
    }

    /// Key stored in this slot, if it is occupied.
    pub fn key(&self) -> Option<&K> {
        match self {
            Slot::Occupied { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Take the entry out, leaving a tombstone behind.
    pub(crate) fn bury(&mut self) -> Option<(K, V)> {
        match std::mem::replace(self, Slot::Tombstone) {
            Slot::Occupied { key, value } => Some((key, value)),
            other => {
                *self = other;
                None
            }
        }
    }
}
