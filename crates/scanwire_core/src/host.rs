//! Broadcast host abstraction
//!
//! [`Broadcasts`] is the seam between the bridge and the operating system's
//! broadcast machinery. The real backend lives in
//! `scanwire_platform_android`; [`LocalBroadcasts`] is the in-process
//! implementation that makes the whole bridge runnable on a desktop host,
//! which is what the tests and the demo app's desktop path use.

use std::sync::{Arc, Mutex};

use slotmap::{new_key_type, SlotMap};
use tracing::trace;

use crate::error::HostError;
use crate::intent::{BroadcastIntent, IntentFilter};
use crate::receiver::ScanReceiver;

new_key_type! {
    /// Handle for one live receiver registration.
    pub struct RegistrationId;
}

/// Broadcast registration backend.
pub trait Broadcasts: Send + Sync {
    /// Register `receiver` for the actions in `filter`.
    ///
    /// `exported` asks the OS to accept broadcasts from other applications.
    /// The vendor scanning services always run out of process, so the bridge
    /// registers exported; hosts without a process boundary record the flag
    /// and nothing more.
    fn register(
        &self,
        receiver: Arc<ScanReceiver>,
        filter: IntentFilter,
        exported: bool,
    ) -> Result<RegistrationId, HostError>;

    /// Remove a registration.
    ///
    /// Returns [`HostError::NotRegistered`] when `id` is not live. Teardown
    /// order against the OS is not guaranteed, so callers decide whether
    /// that case matters to them.
    fn unregister(&self, id: RegistrationId) -> Result<(), HostError>;
}

struct LocalRegistration {
    filter: IntentFilter,
    receiver: Arc<ScanReceiver>,
    exported: bool,
}

/// In-process broadcast host.
///
/// Registrations live in a shared table; [`LocalBroadcasts::send_broadcast`]
/// plays the role of the OS and delivers synchronously on the calling
/// thread. Clones share the table.
#[derive(Clone, Default)]
pub struct LocalBroadcasts {
    registrations: Arc<Mutex<SlotMap<RegistrationId, LocalRegistration>>>,
}

impl LocalBroadcasts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `intent` to every registration whose filter matches.
    ///
    /// Returns the number of receivers that saw it.
    pub fn send_broadcast(&self, intent: &BroadcastIntent) -> usize {
        // Snapshot receivers before delivering so a handler can re-enter
        // the host (register, unregister) without deadlocking the table.
        let matching: Vec<Arc<ScanReceiver>> = {
            let registrations = self.registrations.lock().unwrap();
            registrations
                .values()
                .filter(|r| r.filter.matches(intent.action()))
                .map(|r| Arc::clone(&r.receiver))
                .collect()
        };
        trace!(
            action = intent.action(),
            receivers = matching.len(),
            "delivering local broadcast"
        );
        for receiver in &matching {
            receiver.deliver(intent);
        }
        matching.len()
    }

    /// Number of live registrations.
    pub fn registration_count(&self) -> usize {
        self.registrations.lock().unwrap().len()
    }

    /// Number of live registrations that asked for exported delivery.
    pub fn exported_count(&self) -> usize {
        self.registrations
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.exported)
            .count()
    }
}

impl Broadcasts for LocalBroadcasts {
    fn register(
        &self,
        receiver: Arc<ScanReceiver>,
        filter: IntentFilter,
        exported: bool,
    ) -> Result<RegistrationId, HostError> {
        let id = self.registrations.lock().unwrap().insert(LocalRegistration {
            filter,
            receiver,
            exported,
        });
        Ok(id)
    }

    fn unregister(&self, id: RegistrationId) -> Result<(), HostError> {
        self.registrations
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or(HostError::NotRegistered)
    }
}
