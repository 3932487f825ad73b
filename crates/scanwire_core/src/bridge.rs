//! Scan bridge
//!
//! [`ScanBridge`] owns the receiver lifecycle against a [`Broadcasts`] host
//! and hands accepted scans to exactly one subscriber over a [`ScanStream`].
//!
//! The lifecycle mirrors what a scanning screen does: subscribe when it
//! comes up, consume the stream while visible, unsubscribe when it goes
//! away. Registration happens on subscribe, never earlier, and the OS-side
//! receiver is removed again on unsubscribe or when the bridge is dropped.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::error::{BridgeError, HostError, Result};
use crate::host::{Broadcasts, RegistrationId};
use crate::profile::VendorProfile;
use crate::receiver::{ScanHandler, ScanReceiver};

/// Sender half the receiver callback pushes into.
type ScanSink = mpsc::UnboundedSender<String>;

/// The current-subscriber cell shared with the receiver callback.
///
/// The callback resolves this cell on every scan instead of capturing a
/// sender, so swapping subscribers takes effect without re-registering the
/// receiver with the OS.
type SharedScanSink = Arc<Mutex<Option<ScanSink>>>;

/// Bridge configuration.
///
/// [`BridgeConfig::new`] seeds the profile set with both built-in vendors;
/// the DataWedge action is derived from `package` at that point, so replace
/// the profiles rather than editing `package` afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Application package, e.g. `com.example.stocktake`.
    pub package: String,
    /// Vendor schemas to listen for.
    pub profiles: Vec<VendorProfile>,
    /// Register the receiver for broadcasts from other applications.
    /// Defaults to true; the scanning services run in their own processes.
    pub exported: bool,
}

impl BridgeConfig {
    /// Configuration for `package` with the built-in vendor profiles.
    pub fn new(package: impl Into<String>) -> Self {
        let package = package.into();
        let profiles = vec![
            VendorProfile::datalogic(),
            VendorProfile::datawedge(&package),
        ];
        Self {
            package,
            profiles,
            exported: true,
        }
    }

    /// Replace the profile set, builder style.
    pub fn profiles(mut self, profiles: Vec<VendorProfile>) -> Self {
        self.profiles = profiles;
        self
    }

    /// Add one profile, builder style.
    pub fn with_profile(mut self, profile: VendorProfile) -> Self {
        self.profiles.push(profile);
        self
    }

    /// Override the exported flag, builder style.
    pub fn exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }

    /// Diagnostic name of the outbound stream, `<package>/barcode`.
    pub fn channel_name(&self) -> String {
        format!("{}/barcode", self.package)
    }
}

struct BridgeState {
    /// Built on first subscribe, retained across unsubscribe so a later
    /// resubscribe reuses it.
    receiver: Option<Arc<ScanReceiver>>,
    registration: Option<RegistrationId>,
}

/// Relays vendor scan broadcasts into a single-subscriber stream.
///
/// `subscribe` registers the receiver with the host and returns the stream;
/// calling it again while a subscriber exists fails with
/// [`BridgeError::AlreadySubscribed`] until `unsubscribe` has run.
/// `unsubscribe` and `Drop` tolerate the registration already being gone on
/// the host side, since teardown order against the OS is not guaranteed.
pub struct ScanBridge<H: Broadcasts> {
    host: H,
    config: BridgeConfig,
    sink: SharedScanSink,
    state: Mutex<BridgeState>,
}

impl<H: Broadcasts> ScanBridge<H> {
    /// Create an idle bridge. Nothing is registered until `subscribe`.
    pub fn new(host: H, config: BridgeConfig) -> Self {
        Self {
            host,
            config,
            sink: Arc::new(Mutex::new(None)),
            state: Mutex::new(BridgeState {
                receiver: None,
                registration: None,
            }),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Whether a subscriber currently holds the stream.
    pub fn is_subscribed(&self) -> bool {
        self.sink.lock().unwrap().is_some()
    }

    /// Register the receiver and return the scan stream.
    ///
    /// The previous stream stays the subscriber of record until
    /// `unsubscribe`, even if it has been dropped; that keeps accidental
    /// double-listens loud instead of silently stealing scans.
    pub fn subscribe(&self) -> Result<ScanStream> {
        let mut state = self.state.lock().unwrap();
        let mut sink = self.sink.lock().unwrap();
        if sink.is_some() {
            return Err(BridgeError::AlreadySubscribed);
        }
        let (tx, rx) = mpsc::unbounded_channel();
        *sink = Some(tx);
        drop(sink);

        let receiver = Arc::clone(state.receiver.get_or_insert_with(|| {
            Arc::new(ScanReceiver::new(
                self.config.profiles.clone(),
                sink_handler(Arc::clone(&self.sink)),
            ))
        }));
        let filter = receiver.filter();
        match self.host.register(receiver, filter, self.config.exported) {
            Ok(id) => {
                state.registration = Some(id);
                info!(channel = %self.config.channel_name(), "scan stream subscribed");
                Ok(ScanStream { rx })
            }
            Err(err) => {
                // Roll back so a later subscribe can try again.
                self.sink.lock().unwrap().take();
                Err(err.into())
            }
        }
    }

    /// Close the stream and unregister the receiver.
    ///
    /// Idle bridges and registrations the host has already torn down are
    /// both fine; only real host failures surface as errors.
    pub fn unsubscribe(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        self.sink.lock().unwrap().take();
        let Some(id) = state.registration.take() else {
            return Ok(());
        };
        match self.host.unregister(id) {
            Ok(()) => {}
            Err(HostError::NotRegistered) => {
                debug!("registration was already gone");
            }
            Err(err) => return Err(err.into()),
        }
        info!(channel = %self.config.channel_name(), "scan stream unsubscribed");
        Ok(())
    }
}

impl<H: Broadcasts> Drop for ScanBridge<H> {
    fn drop(&mut self) {
        if let Ok(mut sink) = self.sink.lock() {
            sink.take();
        }
        if let Ok(state) = self.state.get_mut() {
            if let Some(id) = state.registration.take() {
                match self.host.unregister(id) {
                    Ok(()) | Err(HostError::NotRegistered) => {}
                    Err(err) => debug!("unregister during drop failed: {err}"),
                }
            }
            state.receiver = None;
        }
    }
}

/// Handler that resolves the sink cell at call time.
fn sink_handler(cell: SharedScanSink) -> ScanHandler {
    Box::new(move |data: &str| {
        let Ok(sink) = cell.lock() else { return };
        match sink.as_ref() {
            Some(tx) => {
                if tx.send(data.to_owned()).is_err() {
                    debug!("scan dropped, stream receiver is gone");
                }
            }
            None => debug!("scan dropped, no subscriber"),
        }
    })
}

/// Receiving half of the bridge's outbound channel.
///
/// Scans arrive in delivery order. Once the bridge unsubscribes (or is
/// dropped), already-queued scans still drain, then the stream reports
/// closed.
#[derive(Debug)]
pub struct ScanStream {
    rx: mpsc::UnboundedReceiver<String>,
}

impl ScanStream {
    /// Wait for the next scan. `None` once the bridge closed the channel
    /// and the queue is drained.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    /// Non-blocking receive for callers polling from their own loop.
    pub fn try_recv(&mut self) -> std::result::Result<String, mpsc::error::TryRecvError> {
        self.rx.try_recv()
    }

    /// Block the current thread until a scan arrives or the channel closes.
    ///
    /// For synchronous hosts; must not be called from async context.
    pub fn blocking_recv(&mut self) -> Option<String> {
        self.rx.blocking_recv()
    }
}
