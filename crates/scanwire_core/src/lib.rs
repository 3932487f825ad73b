//! Scanwire core
//!
//! Platform-agnostic heart of Scanwire: a bridge that turns the broadcasts
//! of handheld barcode scanners (Datalogic Aladdin, Zebra DataWedge) into a
//! single-subscriber stream of scanned strings for a Rust application.
//!
//! - [`intent`]: minimal model of a delivered broadcast.
//! - [`profile`]: the vendor schemas, wire constants included, and the
//!   accept/drop decision for one intent.
//! - [`receiver`]: evaluates broadcasts and forwards accepted scans into a
//!   callback.
//! - [`host`]: the [`Broadcasts`] seam to the OS, plus the in-process
//!   [`LocalBroadcasts`] host for desktop and tests.
//! - [`bridge`]: subscribe/unsubscribe lifecycle and the [`ScanStream`].
//!
//! The Android backend lives in the `scanwire_platform_android` extension;
//! everything in this crate runs on any host.
//!
//! # Example
//!
//! ```
//! use scanwire_core::intent::BroadcastIntent;
//! use scanwire_core::profile::{DATALOGIC_ACTION, DATALOGIC_DATA_EXTRA};
//! use scanwire_core::{BridgeConfig, LocalBroadcasts, ScanBridge};
//!
//! let host = LocalBroadcasts::new();
//! let bridge = ScanBridge::new(host.clone(), BridgeConfig::new("com.example.app"));
//! let mut scans = bridge.subscribe().unwrap();
//!
//! host.send_broadcast(
//!     &BroadcastIntent::new(DATALOGIC_ACTION).with_extra(DATALOGIC_DATA_EXTRA, "012345678905"),
//! );
//!
//! assert_eq!(scans.try_recv().ok(), Some("012345678905".to_string()));
//! ```

pub mod bridge;
pub mod error;
pub mod host;
pub mod intent;
pub mod profile;
pub mod receiver;

pub use bridge::{BridgeConfig, ScanBridge, ScanStream};
pub use error::{BridgeError, HostError, Result};
pub use host::{Broadcasts, LocalBroadcasts, RegistrationId};
pub use intent::{BroadcastIntent, IntentFilter};
pub use profile::{IgnoreReason, ScanDecision, VendorProfile};
pub use receiver::{ScanHandler, ScanReceiver};
