//! Android logging initialization
//!
//! Routes both the `log` and `tracing` ecosystems to logcat.

/// Initialize logcat output under `tag`.
///
/// Safe to call more than once; later calls keep the first configuration.
pub fn init_logging(tag: &str) {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag(tag),
    );

    use tracing_subscriber::layer::SubscriberExt;
    let subscriber = tracing_subscriber::registry().with(tracing_android::layer(tag).unwrap());
    let _ = tracing::subscriber::set_global_default(subscriber);
}
