//! Scanwire example
//!
//! Streams barcodes from the vendor broadcast bridge. On Android the scans
//! come from the real scanning services; on desktop, lines typed on stdin
//! are replayed as DataWedge broadcasts through the in-process host.

const PACKAGE: &str = "com.scanwire.example";

// =============================================================================
// Desktop Entry Point
// =============================================================================

#[cfg(not(target_os = "android"))]
fn main() {
    use std::io::BufRead;

    use scanwire_core::intent::BroadcastIntent;
    use scanwire_core::profile::{DATAWEDGE_ACTION_SUFFIX, DATAWEDGE_DATA_EXTRA};
    use scanwire_core::{BridgeConfig, LocalBroadcasts, ScanBridge};

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let host = LocalBroadcasts::new();
    let bridge = ScanBridge::new(host.clone(), BridgeConfig::new(PACKAGE));
    let mut scans = bridge.subscribe().expect("first subscriber");
    tracing::info!(
        channel = %bridge.config().channel_name(),
        "type a barcode and press enter, ctrl-d to quit"
    );

    let printer = std::thread::spawn(move || {
        while let Some(scan) = scans.blocking_recv() {
            println!("scan: {scan}");
        }
    });

    // Every stdin line becomes a synthetic DataWedge broadcast. Blank lines
    // get dropped by the bridge, same as on a device.
    let stdin = std::io::stdin();
    for line in stdin.lock().lines().map_while(Result::ok) {
        let intent = BroadcastIntent::new(format!("{PACKAGE}{DATAWEDGE_ACTION_SUFFIX}"))
            .with_extra(DATAWEDGE_DATA_EXTRA, line);
        host.send_broadcast(&intent);
    }

    bridge.unsubscribe().expect("unsubscribe");
    printer.join().expect("printer thread");
}

// =============================================================================
// Android Entry Point
// =============================================================================

#[cfg(target_os = "android")]
use android_activity::AndroidApp;

#[cfg(target_os = "android")]
#[no_mangle]
fn android_main(app: AndroidApp) {
    use android_activity::{MainEvent, PollEvent};
    use scanwire_core::{BridgeConfig, ScanBridge};
    use scanwire_platform_android::{init_logging, AndroidBroadcasts};

    init_logging("scanwire");
    tracing::info!("scanwire example starting");

    let host = AndroidBroadcasts::new(&app).expect("activity JNI context");
    let bridge = ScanBridge::new(host, BridgeConfig::new(PACKAGE));
    let mut scans = bridge.subscribe().expect("first subscriber");

    let mut running = true;
    while running {
        app.poll_events(Some(std::time::Duration::from_millis(100)), |event| {
            if let PollEvent::Main(MainEvent::Destroy) = event {
                tracing::info!("activity destroyed");
                running = false;
            }
        });
        while let Ok(scan) = scans.try_recv() {
            tracing::info!(%scan, "scan received");
        }
    }

    // The OS may have torn the receiver down with the activity already;
    // unsubscribe tolerates that.
    let _ = bridge.unsubscribe();
}

// main is unused on Android; entry is android_main
#[cfg(target_os = "android")]
fn main() {}
