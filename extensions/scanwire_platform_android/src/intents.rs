//! Intent decoding
//!
//! Converts a delivered Android `Intent` into the platform-agnostic
//! [`BroadcastIntent`] the core evaluates. Only the extras some profile can
//! act on are pulled across the JNI boundary.

use scanwire_core::intent::BroadcastIntent;
use scanwire_core::profile::VendorProfile;

/// The extra keys worth decoding for `profiles`: each profile's data extra
/// plus its symbology extra when mapped. Deduplicated, order stable.
pub fn extra_keys(profiles: &[VendorProfile]) -> Vec<&str> {
    let mut keys: Vec<&str> = Vec::new();
    for profile in profiles {
        keys.push(profile.data_extra.as_str());
        if let Some(symbology) = profile.symbology_extra.as_deref() {
            keys.push(symbology);
        }
    }
    keys.sort_unstable();
    keys.dedup();
    keys
}

/// Assemble a [`BroadcastIntent`] from decoded parts.
///
/// `Intent.getAction()` may legitimately be null, in which case there is
/// nothing to evaluate and the broadcast is dropped before it reaches the
/// core.
pub fn intent_from_parts(
    action: Option<String>,
    extras: impl IntoIterator<Item = (String, String)>,
) -> Option<BroadcastIntent> {
    let action = action?;
    let mut intent = BroadcastIntent::new(action);
    for (key, value) in extras {
        intent = intent.with_extra(key, value);
    }
    Some(intent)
}

/// Decode an `android.content.Intent` for the given profiles.
///
/// JNI failures collapse to `None` after a log line; the delivery path must
/// never panic or leave an exception pending across the FFI boundary.
#[cfg(target_os = "android")]
pub fn intent_from_java(
    env: &mut jni::JNIEnv,
    intent: &jni::objects::JObject,
    profiles: &[VendorProfile],
) -> Option<BroadcastIntent> {
    let action = match read_action(env, intent) {
        Ok(action) => action,
        Err(err) => {
            let _ = env.exception_clear();
            tracing::debug!("reading intent action failed: {err}");
            return None;
        }
    };
    let mut extras = Vec::new();
    for key in extra_keys(profiles) {
        match read_string_extra(env, intent, key) {
            Ok(Some(value)) => extras.push((key.to_owned(), value)),
            Ok(None) => {}
            Err(err) => {
                let _ = env.exception_clear();
                tracing::debug!(key, "reading intent extra failed: {err}");
            }
        }
    }
    intent_from_parts(action, extras)
}

#[cfg(target_os = "android")]
fn read_action(
    env: &mut jni::JNIEnv,
    intent: &jni::objects::JObject,
) -> jni::errors::Result<Option<String>> {
    let action = env
        .call_method(intent, "getAction", "()Ljava/lang/String;", &[])?
        .l()?;
    if action.is_null() {
        return Ok(None);
    }
    let action = jni::objects::JString::from(action);
    Ok(Some(env.get_string(&action)?.into()))
}

#[cfg(target_os = "android")]
fn read_string_extra(
    env: &mut jni::JNIEnv,
    intent: &jni::objects::JObject,
    key: &str,
) -> jni::errors::Result<Option<String>> {
    let jkey = env.new_string(key)?;
    let value = env
        .call_method(
            intent,
            "getStringExtra",
            "(Ljava/lang/String;)Ljava/lang/String;",
            &[jni::objects::JValue::Object(&jkey)],
        )?
        .l()?;
    if value.is_null() {
        return Ok(None);
    }
    let value = jni::objects::JString::from(value);
    Ok(Some(env.get_string(&value)?.into()))
}
