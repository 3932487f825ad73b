//! Broadcast registration over JNI
//!
//! [`AndroidBroadcasts`] implements the core's `Broadcasts` seam against a
//! live activity: `register` instantiates the Java receiver shim and hands
//! it to `Context.registerReceiver`, `unregister` tears it down again.
//! Delivered intents re-enter Rust through the shim's `nativeOnReceive`.

use std::sync::{Arc, Mutex};

use android_activity::AndroidApp;
use jni::objects::{GlobalRef, JClass, JObject, JValue};
use jni::sys::jlong;
use jni::{JNIEnv, JavaVM};
use slotmap::SlotMap;
use tracing::{debug, warn};

use scanwire_core::intent::IntentFilter;
use scanwire_core::receiver::ScanReceiver;
use scanwire_core::{Broadcasts, HostError, RegistrationId};

use crate::dispatch::DispatchTable;
use crate::intents;

/// JVM name of the receiver shim class shipped in the APK.
const RECEIVER_CLASS: &str = "dev/scanwire/android/ScanBroadcastReceiver";

// Context.RECEIVER_EXPORTED / RECEIVER_NOT_EXPORTED. The flag bits are read
// from API 33 on; earlier releases ignore them.
const RECEIVER_EXPORTED: i32 = 0x2;
const RECEIVER_NOT_EXPORTED: i32 = 0x4;

struct AndroidRegistration {
    /// The Java shim instance, kept alive for `unregisterReceiver`.
    receiver_obj: GlobalRef,
    /// Dispatch handle baked into that instance.
    handle: i64,
}

/// Broadcast host backed by the activity's JNI context.
pub struct AndroidBroadcasts {
    vm: JavaVM,
    activity: GlobalRef,
    registrations: Mutex<SlotMap<RegistrationId, AndroidRegistration>>,
}

impl AndroidBroadcasts {
    /// Build a host from the running activity.
    pub fn new(app: &AndroidApp) -> Result<Self, HostError> {
        // SAFETY: android-activity guarantees both pointers are valid JNI
        // handles for the lifetime of the activity.
        let vm = unsafe { JavaVM::from_raw(app.vm_as_ptr() as *mut jni::sys::JavaVM) }
            .map_err(jni_error)?;
        let activity = unsafe { JObject::from_raw(app.activity_as_ptr() as jni::sys::jobject) };
        let activity = {
            let mut env = vm.attach_current_thread().map_err(jni_error)?;
            env.new_global_ref(&activity).map_err(jni_error)?
        };
        Ok(Self {
            vm,
            activity,
            registrations: Mutex::new(SlotMap::with_key()),
        })
    }

    fn build_filter<'local>(
        env: &mut JNIEnv<'local>,
        filter: &IntentFilter,
    ) -> jni::errors::Result<JObject<'local>> {
        let obj = env.new_object("android/content/IntentFilter", "()V", &[])?;
        for action in filter.actions() {
            let jaction = env.new_string(action)?;
            env.call_method(
                &obj,
                "addAction",
                "(Ljava/lang/String;)V",
                &[JValue::Object(&jaction)],
            )?;
        }
        Ok(obj)
    }

    /// Instantiate the shim and register it, returning the shim object.
    ///
    /// NOTE(android): the three-argument `registerReceiver` overload exists
    /// since API 26, hence the min SDK.
    fn register_receiver<'local>(
        env: &mut JNIEnv<'local>,
        activity: &JObject,
        filter_obj: &JObject,
        handle: i64,
        flags: i32,
    ) -> jni::errors::Result<JObject<'local>> {
        let receiver_obj = env.new_object(RECEIVER_CLASS, "(J)V", &[JValue::Long(handle)])?;
        env.call_method(
            activity,
            "registerReceiver",
            "(Landroid/content/BroadcastReceiver;Landroid/content/IntentFilter;I)Landroid/content/Intent;",
            &[
                JValue::Object(&receiver_obj),
                JValue::Object(filter_obj),
                JValue::Int(flags),
            ],
        )?;
        Ok(receiver_obj)
    }
}

impl Broadcasts for AndroidBroadcasts {
    fn register(
        &self,
        receiver: Arc<ScanReceiver>,
        filter: IntentFilter,
        exported: bool,
    ) -> Result<RegistrationId, HostError> {
        let mut env = self.vm.attach_current_thread().map_err(jni_error)?;
        let filter_obj = Self::build_filter(&mut env, &filter).map_err(|err| {
            let _ = env.exception_clear();
            jni_error(err)
        })?;

        let handle = DispatchTable::global().insert(receiver);
        let flags = if exported {
            RECEIVER_EXPORTED
        } else {
            RECEIVER_NOT_EXPORTED
        };
        match Self::register_receiver(&mut env, self.activity.as_obj(), &filter_obj, handle, flags)
        {
            Ok(receiver_obj) => {
                let receiver_obj = env.new_global_ref(&receiver_obj).map_err(jni_error)?;
                let id = self
                    .registrations
                    .lock()
                    .unwrap()
                    .insert(AndroidRegistration {
                        receiver_obj,
                        handle,
                    });
                debug!(handle, actions = filter.actions().len(), "receiver registered");
                Ok(id)
            }
            Err(err) => {
                // Roll the dispatch entry back; nothing will ever call it.
                DispatchTable::global().remove(handle);
                let _ = env.exception_clear();
                warn!("registerReceiver failed: {err}");
                Err(HostError::RegistrationFailed(err.to_string()))
            }
        }
    }

    fn unregister(&self, id: RegistrationId) -> Result<(), HostError> {
        let registration = self
            .registrations
            .lock()
            .unwrap()
            .remove(id)
            .ok_or(HostError::NotRegistered)?;
        DispatchTable::global().remove(registration.handle);

        let mut env = self.vm.attach_current_thread().map_err(jni_error)?;
        let result = env.call_method(
            self.activity.as_obj(),
            "unregisterReceiver",
            "(Landroid/content/BroadcastReceiver;)V",
            &[JValue::Object(registration.receiver_obj.as_obj())],
        );
        match result {
            Ok(_) => {
                debug!(handle = registration.handle, "receiver unregistered");
                Ok(())
            }
            Err(jni::errors::Error::JavaException) => {
                // IllegalArgumentException means the OS forgot the receiver
                // first; teardown order is not guaranteed, so report it as
                // NotRegistered and let the caller decide.
                if pending_illegal_argument(&mut env) {
                    debug!(handle = registration.handle, "receiver was already unregistered");
                    Err(HostError::NotRegistered)
                } else {
                    Err(HostError::Platform("unregisterReceiver threw".into()))
                }
            }
            Err(err) => Err(jni_error(err)),
        }
    }
}

fn jni_error(err: jni::errors::Error) -> HostError {
    HostError::Platform(err.to_string())
}

/// True when the pending Java exception is an `IllegalArgumentException`.
/// Clears the exception either way.
fn pending_illegal_argument(env: &mut JNIEnv) -> bool {
    let Ok(throwable) = env.exception_occurred() else {
        return false;
    };
    let _ = env.exception_clear();
    if throwable.is_null() {
        return false;
    }
    env.is_instance_of(&throwable, "java/lang/IllegalArgumentException")
        .unwrap_or(false)
}

/// Native method of the Java receiver shim.
///
/// Runs on whatever thread the system delivers broadcasts on; everything
/// downstream of the dispatch table is `Send + Sync`.
#[no_mangle]
pub extern "system" fn Java_dev_scanwire_android_ScanBroadcastReceiver_nativeOnReceive<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    intent: JObject<'local>,
) {
    let Some(receiver) = DispatchTable::global().get(handle) else {
        debug!(handle, "broadcast for stale dispatch handle");
        return;
    };
    match intents::intent_from_java(&mut env, &intent, receiver.profiles()) {
        Some(decoded) => {
            receiver.deliver(&decoded);
        }
        None => debug!("broadcast without readable action"),
    }
}
