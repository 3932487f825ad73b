//! Vendor scan profiles
//!
//! Each supported scanning service publishes scans as a broadcast with a
//! vendor-specific action and a vendor-specific payload extra. A
//! [`VendorProfile`] captures one such schema; [`VendorProfile::evaluate`]
//! decides what a delivered intent means under it.
//!
//! Two profiles ship built in:
//!
//! - [`VendorProfile::datalogic`]: Datalogic Aladdin, fixed action.
//! - [`VendorProfile::datawedge`]: Zebra DataWedge, whose intent output
//!   plugin is conventionally configured to broadcast
//!   `<application package>.BARCODE`.

use serde::{Deserialize, Serialize};

use crate::intent::BroadcastIntent;

/// Datalogic Aladdin broadcast action.
pub const DATALOGIC_ACTION: &str = "COM.DATALOGIC.ALADDINAPP.INTENT.ACTION_SEND_BAR_CODE_DATA";
/// Datalogic Aladdin extra carrying the scanned text.
pub const DATALOGIC_DATA_EXTRA: &str = "COM.DATALOGIC.ALADDINAPP.EXTRA.BARCODE_DATA";
/// Datalogic Aladdin extra carrying the symbology identifier.
pub const DATALOGIC_SYMBOLOGY_EXTRA: &str = "COM.DATALOGIC.ALADDINAPP.EXTRA.BARCODE_TYPE";

/// Suffix appended to the application package to form the DataWedge action.
pub const DATAWEDGE_ACTION_SUFFIX: &str = ".BARCODE";
/// DataWedge extra carrying the scanned text.
pub const DATAWEDGE_DATA_EXTRA: &str = "com.symbol.datawedge.data_string";
/// DataWedge extra carrying the label type (symbology).
pub const DATAWEDGE_SYMBOLOGY_EXTRA: &str = "com.symbol.datawedge.label_type";

/// One vendor broadcast schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorProfile {
    /// Short vendor tag used in logs.
    pub label: String,
    /// Broadcast action the scanning service sends.
    pub action: String,
    /// Extra that carries the scanned text.
    pub data_extra: String,
    /// Extra that carries the symbology, for vendors that report one.
    pub symbology_extra: Option<String>,
}

impl VendorProfile {
    /// Create a profile for a custom scanning service.
    pub fn new(
        label: impl Into<String>,
        action: impl Into<String>,
        data_extra: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            action: action.into(),
            data_extra: data_extra.into(),
            symbology_extra: None,
        }
    }

    /// Set the symbology extra, builder style.
    pub fn with_symbology_extra(mut self, extra: impl Into<String>) -> Self {
        self.symbology_extra = Some(extra.into());
        self
    }

    /// The built-in Datalogic Aladdin profile.
    pub fn datalogic() -> Self {
        Self::new("datalogic", DATALOGIC_ACTION, DATALOGIC_DATA_EXTRA)
            .with_symbology_extra(DATALOGIC_SYMBOLOGY_EXTRA)
    }

    /// The built-in DataWedge profile for the given application package.
    ///
    /// The action is `<package>.BARCODE`, matching the conventional intent
    /// output configuration of a DataWedge profile targeting the app.
    pub fn datawedge(package: &str) -> Self {
        Self::new(
            "datawedge",
            format!("{package}{DATAWEDGE_ACTION_SUFFIX}"),
            DATAWEDGE_DATA_EXTRA,
        )
        .with_symbology_extra(DATAWEDGE_SYMBOLOGY_EXTRA)
    }

    /// Decide what `intent` means under this profile.
    ///
    /// Forwarded data is the extra's value verbatim; the bridge never trims
    /// or rewrites scans. Trimming happens only to judge blankness.
    pub fn evaluate<'a>(&self, intent: &'a BroadcastIntent) -> ScanDecision<'a> {
        if intent.action() != self.action {
            return ScanDecision::Ignored(IgnoreReason::UnmatchedAction);
        }
        let Some(data) = intent.string_extra(&self.data_extra) else {
            return ScanDecision::Ignored(IgnoreReason::MissingData);
        };
        if data.trim().is_empty() {
            return ScanDecision::Ignored(IgnoreReason::BlankData);
        }
        let symbology = self
            .symbology_extra
            .as_deref()
            .and_then(|key| intent.string_extra(key));
        ScanDecision::Forwarded { data, symbology }
    }
}

/// Why a delivered intent was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// The action matches no profile. Under a correctly registered filter
    /// this should not happen, so receivers log it.
    UnmatchedAction,
    /// The matched profile's data extra is absent.
    MissingData,
    /// The data extra is empty or whitespace-only.
    BlankData,
}

/// Outcome of evaluating one delivered intent.
///
/// Borrows from the intent; callers copy the payload only once they commit
/// to forwarding it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanDecision<'a> {
    /// The intent carries a scan.
    Forwarded {
        /// The scanned text, unmodified.
        data: &'a str,
        /// Symbology reported by the vendor, when the profile maps one.
        symbology: Option<&'a str>,
    },
    /// The intent is dropped.
    Ignored(IgnoreReason),
}

impl ScanDecision<'_> {
    /// Whether this decision forwards the scan.
    pub fn is_forwarded(&self) -> bool {
        matches!(self, ScanDecision::Forwarded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datalogic_scan_is_forwarded_verbatim() {
        let profile = VendorProfile::datalogic();
        let intent = BroadcastIntent::new(DATALOGIC_ACTION)
            .with_extra(DATALOGIC_DATA_EXTRA, "  012345678905  ");

        let decision = profile.evaluate(&intent);
        assert_eq!(
            decision,
            ScanDecision::Forwarded {
                data: "  012345678905  ",
                symbology: None,
            }
        );
    }

    #[test]
    fn datawedge_action_derives_from_package() {
        let profile = VendorProfile::datawedge("com.example.stocktake");
        assert_eq!(profile.action, "com.example.stocktake.BARCODE");
        assert_eq!(profile.data_extra, DATAWEDGE_DATA_EXTRA);
    }

    #[test]
    fn symbology_rides_along_when_present() {
        let profile = VendorProfile::datawedge("com.example.stocktake");
        let intent = BroadcastIntent::new("com.example.stocktake.BARCODE")
            .with_extra(DATAWEDGE_DATA_EXTRA, "4006381333931")
            .with_extra(DATAWEDGE_SYMBOLOGY_EXTRA, "LABEL-TYPE-EAN13");

        let decision = profile.evaluate(&intent);
        assert_eq!(
            decision,
            ScanDecision::Forwarded {
                data: "4006381333931",
                symbology: Some("LABEL-TYPE-EAN13"),
            }
        );
    }

    #[test]
    fn foreign_action_is_unmatched() {
        let profile = VendorProfile::datalogic();
        let intent = BroadcastIntent::new("android.intent.action.BATTERY_LOW");
        assert_eq!(
            profile.evaluate(&intent),
            ScanDecision::Ignored(IgnoreReason::UnmatchedAction)
        );
    }

    #[test]
    fn missing_data_extra_is_ignored() {
        let profile = VendorProfile::datalogic();
        let intent = BroadcastIntent::new(DATALOGIC_ACTION);
        assert_eq!(
            profile.evaluate(&intent),
            ScanDecision::Ignored(IgnoreReason::MissingData)
        );
    }

    #[test]
    fn blank_data_is_ignored() {
        let profile = VendorProfile::datalogic();
        for blank in ["", " ", "\t", " \n "] {
            let intent =
                BroadcastIntent::new(DATALOGIC_ACTION).with_extra(DATALOGIC_DATA_EXTRA, blank);
            assert_eq!(
                profile.evaluate(&intent),
                ScanDecision::Ignored(IgnoreReason::BlankData),
                "{blank:?} should be blank",
            );
        }
    }

    #[test]
    fn interior_whitespace_is_not_blank() {
        let profile = VendorProfile::datalogic();
        let intent = BroadcastIntent::new(DATALOGIC_ACTION).with_extra(DATALOGIC_DATA_EXTRA, "a b");
        assert!(profile.evaluate(&intent).is_forwarded());
    }

    /// Custom profiles arrive from app configuration as JSON; the symbology
    /// extra is optional there.
    #[test]
    fn custom_profile_deserializes_from_config_json() {
        let profile: VendorProfile = serde_json::from_str(
            r#"{
                "label": "honeywell",
                "action": "com.honeywell.decode.RESULT",
                "data_extra": "data"
            }"#,
        )
        .unwrap();

        assert_eq!(profile.symbology_extra, None);
        let intent =
            BroadcastIntent::new("com.honeywell.decode.RESULT").with_extra("data", "9406783");
        assert_eq!(
            profile.evaluate(&intent),
            ScanDecision::Forwarded {
                data: "9406783",
                symbology: None,
            }
        );
    }
}
