//! Scanwire Android Platform
//!
//! Registers the scan broadcast receiver over JNI and feeds delivered
//! intents back into [`scanwire_core`].
//!
//! # Architecture
//!
//! Android hands vendor scan broadcasts to a `BroadcastReceiver` registered
//! on the activity context. This crate provides:
//!
//! 1. [`AndroidBroadcasts`], the `Broadcasts` host backed by the activity
//! 2. The dispatch table that routes `onReceive` back to the Rust receiver
//! 3. Logcat wiring for the `log` and `tracing` ecosystems
//!
//! # Java shim
//!
//! The APK must ship the receiver class this crate instantiates. It only
//! forwards to native code:
//!
//! ```java
//! package dev.scanwire.android;
//!
//! import android.content.BroadcastReceiver;
//! import android.content.Context;
//! import android.content.Intent;
//!
//! public final class ScanBroadcastReceiver extends BroadcastReceiver {
//!     private final long handle;
//!
//!     public ScanBroadcastReceiver(long handle) {
//!         this.handle = handle;
//!     }
//!
//!     @Override
//!     public void onReceive(Context context, Intent intent) {
//!         nativeOnReceive(handle, intent);
//!     }
//!
//!     private static native void nativeOnReceive(long handle, Intent intent);
//! }
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use android_activity::AndroidApp;
//! use scanwire_core::{BridgeConfig, ScanBridge};
//! use scanwire_platform_android::{init_logging, AndroidBroadcasts};
//!
//! #[no_mangle]
//! fn android_main(app: AndroidApp) {
//!     init_logging("scanwire");
//!     let host = AndroidBroadcasts::new(&app).expect("activity JNI context");
//!     let bridge = ScanBridge::new(host, BridgeConfig::new("com.example.app"));
//!     let mut scans = bridge.subscribe().expect("first subscriber");
//!     // drain scans.try_recv() from the app's event loop
//! }
//! ```

pub mod dispatch;
pub mod intents;

#[cfg(target_os = "android")]
pub mod broadcasts;
#[cfg(target_os = "android")]
pub mod logging;

#[cfg(target_os = "android")]
pub use broadcasts::AndroidBroadcasts;
#[cfg(target_os = "android")]
pub use logging::init_logging;
