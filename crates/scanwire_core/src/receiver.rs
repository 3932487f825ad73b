//! Scan receiver
//!
//! The passive half of the bridge: a [`ScanReceiver`] evaluates delivered
//! broadcasts against its vendor profiles and hands accepted scans to the
//! forwarding callback. It performs no registration itself; a
//! [`Broadcasts`](crate::host::Broadcasts) host owns delivery and the
//! [`ScanBridge`](crate::bridge::ScanBridge) owns the lifecycle.

use tracing::debug;

use crate::intent::{BroadcastIntent, IntentFilter};
use crate::profile::{IgnoreReason, ScanDecision, VendorProfile};

/// Callback invoked with each accepted scan.
pub type ScanHandler = Box<dyn Fn(&str) + Send + Sync + 'static>;

/// Evaluates delivered broadcasts and forwards accepted scans.
pub struct ScanReceiver {
    profiles: Vec<VendorProfile>,
    on_scan: ScanHandler,
}

impl ScanReceiver {
    /// Create a receiver forwarding into `on_scan`.
    pub fn new(profiles: Vec<VendorProfile>, on_scan: ScanHandler) -> Self {
        Self { profiles, on_scan }
    }

    /// The profiles this receiver evaluates against.
    pub fn profiles(&self) -> &[VendorProfile] {
        &self.profiles
    }

    /// The filter to register this receiver under: one action per profile.
    pub fn filter(&self) -> IntentFilter {
        let mut filter = IntentFilter::new();
        for profile in &self.profiles {
            filter.add_action(&profile.action);
        }
        filter
    }

    /// Evaluate one delivered broadcast, invoking the callback on a forward.
    ///
    /// The first profile whose action matches decides the outcome; delivery
    /// never panics or rejects, it only drops.
    pub fn deliver<'a>(&self, intent: &'a BroadcastIntent) -> ScanDecision<'a> {
        for profile in &self.profiles {
            let decision = profile.evaluate(intent);
            if decision == ScanDecision::Ignored(IgnoreReason::UnmatchedAction) {
                continue;
            }
            match decision {
                ScanDecision::Forwarded { data, symbology } => {
                    debug!(
                        vendor = %profile.label,
                        len = data.len(),
                        symbology = symbology.unwrap_or("-"),
                        "forwarding scan"
                    );
                    (self.on_scan)(data);
                }
                ScanDecision::Ignored(reason) => {
                    debug!(vendor = %profile.label, ?reason, "dropping broadcast");
                }
            }
            return decision;
        }
        debug!(action = intent.action(), "broadcast matches no profile");
        ScanDecision::Ignored(IgnoreReason::UnmatchedAction)
    }
}

impl std::fmt::Debug for ScanReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanReceiver")
            .field("profiles", &self.profiles)
            .finish_non_exhaustive()
    }
}
