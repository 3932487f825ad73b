//! Broadcast intent model
//!
//! A minimal, platform-agnostic mirror of the broadcasts the vendor scanning
//! services emit: an action string plus named string extras. The Android
//! backend builds these from real `Intent` objects; tests and the desktop
//! host build them directly.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One delivered broadcast.
///
/// Only string extras are modeled. Both supported vendor schemas carry the
/// scan payload as a string extra, and nothing else in the bridge looks at
/// an intent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastIntent {
    action: String,
    #[serde(default)]
    extras: FxHashMap<String, String>,
}

impl BroadcastIntent {
    /// Create an intent with the given action and no extras.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            extras: FxHashMap::default(),
        }
    }

    /// Attach a string extra.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    /// The action this broadcast was sent with.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Look up a string extra, `None` when the sender did not attach it.
    pub fn string_extra(&self, key: &str) -> Option<&str> {
        self.extras.get(key).map(String::as_str)
    }
}

/// Action set a receiver registers for, mirroring the OS-side intent filter.
///
/// Two actions is the common case (one per vendor profile), so the backing
/// storage stays inline at that size.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntentFilter {
    actions: SmallVec<[String; 2]>,
}

impl IntentFilter {
    /// Create an empty filter. An empty filter matches nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action, builder style.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.add_action(action);
        self
    }

    /// Add an action in place.
    pub fn add_action(&mut self, action: impl Into<String>) {
        self.actions.push(action.into());
    }

    /// The registered actions, in insertion order.
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    /// Whether a broadcast with `action` passes this filter.
    pub fn matches(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a == action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_intent_with_extras() {
        let intent = BroadcastIntent::new("com.example.ACTION")
            .with_extra("key_a", "one")
            .with_extra("key_b", "two");

        assert_eq!(intent.action(), "com.example.ACTION");
        assert_eq!(intent.string_extra("key_a"), Some("one"));
        assert_eq!(intent.string_extra("key_b"), Some("two"));
        assert_eq!(intent.string_extra("key_c"), None);
    }

    #[test]
    fn later_extra_wins_on_duplicate_key() {
        let intent = BroadcastIntent::new("a").with_extra("k", "old").with_extra("k", "new");
        assert_eq!(intent.string_extra("k"), Some("new"));
    }

    #[test]
    fn filter_matches_any_registered_action() {
        let filter = IntentFilter::new()
            .with_action("com.example.FIRST")
            .with_action("com.example.SECOND");

        assert!(filter.matches("com.example.FIRST"));
        assert!(filter.matches("com.example.SECOND"));
        assert!(!filter.matches("com.example.THIRD"));
    }

    #[test]
    fn empty_filter_matches_nothing() {
        assert!(!IntentFilter::new().matches("com.example.ANY"));
    }

    #[test]
    fn intent_round_trips_through_serde() {
        let intent = BroadcastIntent::new("com.example.SCAN").with_extra("data", "12345");
        let json = serde_json::to_string(&intent).unwrap();
        let back: BroadcastIntent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, intent);
    }

    #[test]
    fn intent_deserializes_without_extras_field() {
        let back: BroadcastIntent = serde_json::from_str(r#"{"action":"com.example.SCAN"}"#).unwrap();
        assert_eq!(back, BroadcastIntent::new("com.example.SCAN"));
    }
}
