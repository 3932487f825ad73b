//! Integration tests for the bridge against a failing broadcast host
//!
//! These tests verify that:
//! - Unsubscribe tolerates the host having already forgotten the receiver
//! - Real host failures surface from unsubscribe as bridge errors
//! - Teardown during drop never panics, whatever the host reports
//! - A rejected registration rolls back so a later subscribe can succeed

use std::sync::{Arc, Mutex};

use scanwire_core::{
    BridgeConfig, BridgeError, Broadcasts, HostError, IntentFilter, RegistrationId, ScanBridge,
    ScanReceiver,
};
use slotmap::SlotMap;

/// Host whose next register/unregister call can be scripted to fail.
///
/// Clones share state, like `LocalBroadcasts`. Successful calls keep a real
/// registration table, so ids behave the way a live host's would.
#[derive(Clone, Default)]
struct ScriptedHost {
    live: Arc<Mutex<SlotMap<RegistrationId, ()>>>,
    next_register_error: Arc<Mutex<Option<HostError>>>,
    next_unregister_error: Arc<Mutex<Option<HostError>>>,
    unregister_calls: Arc<Mutex<usize>>,
}

impl ScriptedHost {
    fn new() -> Self {
        Self::default()
    }

    fn fail_next_register(&self, err: HostError) {
        *self.next_register_error.lock().unwrap() = Some(err);
    }

    fn fail_next_unregister(&self, err: HostError) {
        *self.next_unregister_error.lock().unwrap() = Some(err);
    }

    /// Drop every registration behind the bridge's back, the way the OS
    /// tears receivers down with their activity.
    fn forget_all(&self) {
        self.live.lock().unwrap().clear();
    }

    fn unregister_calls(&self) -> usize {
        *self.unregister_calls.lock().unwrap()
    }

    fn live_count(&self) -> usize {
        self.live.lock().unwrap().len()
    }
}

impl Broadcasts for ScriptedHost {
    fn register(
        &self,
        _receiver: Arc<ScanReceiver>,
        _filter: IntentFilter,
        _exported: bool,
    ) -> Result<RegistrationId, HostError> {
        if let Some(err) = self.next_register_error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(self.live.lock().unwrap().insert(()))
    }

    fn unregister(&self, id: RegistrationId) -> Result<(), HostError> {
        *self.unregister_calls.lock().unwrap() += 1;
        if let Some(err) = self.next_unregister_error.lock().unwrap().take() {
            return Err(err);
        }
        self.live
            .lock()
            .unwrap()
            .remove(id)
            .ok_or(HostError::NotRegistered)
    }
}

fn bridge_on(host: &ScriptedHost) -> ScanBridge<ScriptedHost> {
    ScanBridge::new(host.clone(), BridgeConfig::new("com.example.stocktake"))
}

/// Test that unsubscribe reports Ok when the host forgot the receiver first
#[test]
fn test_unsubscribe_tolerates_host_forgetting_first() {
    let host = ScriptedHost::new();
    let bridge = bridge_on(&host);
    let _scans = bridge.subscribe().unwrap();

    host.forget_all();

    bridge.unsubscribe().unwrap();
    assert!(!bridge.is_subscribed());
    assert_eq!(host.unregister_calls(), 1);

    // Recovery is complete: the next subscribe registers fresh.
    assert!(bridge.subscribe().is_ok());
    assert_eq!(host.live_count(), 1);
}

/// Test that a real host failure surfaces from unsubscribe
#[test]
fn test_unsubscribe_surfaces_host_failure() {
    let host = ScriptedHost::new();
    let bridge = bridge_on(&host);
    let _scans = bridge.subscribe().unwrap();

    host.fail_next_unregister(HostError::Platform("attach failed".into()));
    assert!(matches!(
        bridge.unsubscribe(),
        Err(BridgeError::Host(HostError::Platform(_)))
    ));
    // The sink is cleared before the host is asked; only the error remains.
    assert!(!bridge.is_subscribed());
}

#[test]
fn test_drop_stays_quiet_when_host_forgot_first() {
    let host = ScriptedHost::new();
    let bridge = bridge_on(&host);
    let _scans = bridge.subscribe().unwrap();

    host.forget_all();
    drop(bridge);
    assert_eq!(host.unregister_calls(), 1);
}

#[test]
fn test_drop_stays_quiet_on_host_failure() {
    let host = ScriptedHost::new();
    let bridge = bridge_on(&host);
    let _scans = bridge.subscribe().unwrap();

    host.fail_next_unregister(HostError::Platform("attach failed".into()));
    drop(bridge);
    assert_eq!(host.unregister_calls(), 1);
}

/// Test that a rejected registration rolls the subscriber slot back
#[test]
fn test_failed_registration_leaves_bridge_subscribable() {
    let host = ScriptedHost::new();
    let bridge = bridge_on(&host);

    host.fail_next_register(HostError::RegistrationFailed("no activity".into()));
    assert!(matches!(
        bridge.subscribe(),
        Err(BridgeError::Host(HostError::RegistrationFailed(_)))
    ));
    assert!(!bridge.is_subscribed());
    assert_eq!(host.live_count(), 0);

    // The failure is not sticky: the next attempt subscribes normally.
    let _scans = bridge.subscribe().unwrap();
    assert!(bridge.is_subscribed());
    assert_eq!(host.live_count(), 1);
}
