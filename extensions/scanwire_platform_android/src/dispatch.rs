//! Receiver dispatch table
//!
//! The Java receiver shim carries a plain `long`; this table turns it back
//! into the Rust receiver on delivery. Handles are slotmap keys under the
//! hood, so a handle that outlives its registration resolves to nothing
//! instead of to a recycled receiver.

use std::sync::{Arc, Mutex, OnceLock};

use scanwire_core::ScanReceiver;
use slotmap::{new_key_type, Key, KeyData, SlotMap};

new_key_type! {
    /// Key of one live dispatch entry.
    pub struct DispatchKey;
}

/// Maps the handle handed to the Java shim back to its receiver.
pub struct DispatchTable {
    entries: Mutex<SlotMap<DispatchKey, Arc<ScanReceiver>>>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(SlotMap::with_key()),
        }
    }

    /// The process-wide table the native entry points resolve against.
    pub fn global() -> &'static DispatchTable {
        static TABLE: OnceLock<DispatchTable> = OnceLock::new();
        TABLE.get_or_init(DispatchTable::new)
    }

    /// Insert a receiver, returning the handle to bake into the shim.
    pub fn insert(&self, receiver: Arc<ScanReceiver>) -> i64 {
        let key = self.entries.lock().unwrap().insert(receiver);
        key.data().as_ffi() as i64
    }

    /// Resolve a handle. `None` for stale or foreign handles.
    pub fn get(&self, handle: i64) -> Option<Arc<ScanReceiver>> {
        let key = DispatchKey::from(KeyData::from_ffi(handle as u64));
        self.entries.lock().unwrap().get(key).map(Arc::clone)
    }

    /// Drop an entry, returning the receiver it held.
    pub fn remove(&self, handle: i64) -> Option<Arc<ScanReceiver>> {
        let key = DispatchKey::from(KeyData::from_ffi(handle as u64));
        self.entries.lock().unwrap().remove(key)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanwire_core::VendorProfile;

    fn noop_receiver() -> Arc<ScanReceiver> {
        Arc::new(ScanReceiver::new(
            vec![VendorProfile::datalogic()],
            Box::new(|_| {}),
        ))
    }

    #[test]
    fn test_handle_round_trip() {
        let table = DispatchTable::new();
        let receiver = noop_receiver();
        let handle = table.insert(Arc::clone(&receiver));

        let resolved = table.get(handle).unwrap();
        assert!(Arc::ptr_eq(&resolved, &receiver));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_removed_handle_resolves_to_nothing() {
        let table = DispatchTable::new();
        let handle = table.insert(noop_receiver());

        assert!(table.remove(handle).is_some());
        assert!(table.get(handle).is_none());
        assert!(table.remove(handle).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_unknown_handles_resolve_to_nothing() {
        let table = DispatchTable::new();
        assert!(table.get(0).is_none());
        assert!(table.get(-1).is_none());
        assert!(table.get(0x7fff_ffff_0042).is_none());
    }

    #[test]
    fn test_handles_are_distinct_per_entry() {
        let table = DispatchTable::new();
        let a = table.insert(noop_receiver());
        let b = table.insert(noop_receiver());
        assert_ne!(a, b);
        assert_eq!(table.len(), 2);
    }
}
