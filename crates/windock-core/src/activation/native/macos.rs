use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Duration;

use core_foundation::runloop::{CFRunLoop, kCFRunLoopDefaultMode};
use objc2::rc::Retained;
use objc2::runtime::AnyObject;
use objc2::{AnyThread, DefinedClass, define_class, msg_send, sel};
use objc2_app_kit::{NSApplicationActivationOptions, NSRunningApplication};
use objc2_foundation::{
    NSDistributedNotificationCenter, NSNotification, NSNumber, NSObject, NSString,
};
use tracing::{debug, warn};

use crate::activation::errors::ActivationError;
use crate::activation::router::AppActivator;
use crate::activation::types::{ACTIVATION_NOTIFICATION, ActivationRequest, keys};
use crate::windows::native::ax::AxApplication;

/// [`AppActivator`] backed by `NSRunningApplication` and the Accessibility
/// API.
#[derive(Debug, Default, Clone, Copy)]
pub struct MacAppActivator;

impl MacAppActivator {
    pub fn new() -> Self {
        Self
    }
}

impl AppActivator for MacAppActivator {
    fn activate_app(&self, bundle_id: &str) -> Result<Option<i32>, ActivationError> {
        let id = NSString::from_str(bundle_id);
        let apps = NSRunningApplication::runningApplicationsWithBundleIdentifier(&id);
        let Some(app) = apps.firstObject() else {
            return Ok(None);
        };

        #[allow(deprecated)]
        let activated =
            app.activateWithOptions(NSApplicationActivationOptions::ActivateIgnoringOtherApps);
        if !activated {
            debug!(
                event = "core.activation.native.activate_refused",
                bundle_id = bundle_id
            );
        }

        Ok(Some(app.processIdentifier()))
    }

    fn window_titles(&self, pid: i32) -> Result<Vec<String>, ActivationError> {
        AxApplication::new(pid)
            .and_then(|app| app.window_titles())
            .map_err(|message| ActivationError::AccessibilityFailed { pid, message })
    }

    fn raise_window(&self, pid: i32, index: usize) -> Result<(), ActivationError> {
        let app = AxApplication::new(pid)
            .map_err(|message| ActivationError::AccessibilityFailed { pid, message })?;
        app.raise_window(index)
            .map_err(|message| ActivationError::AccessibilityFailed { pid, message })?;
        if let Err(e) = app.set_frontmost() {
            debug!(
                event = "core.activation.native.set_frontmost_failed",
                pid = pid,
                error = %e
            );
        }
        Ok(())
    }
}

define_class! {
    // SAFETY:
    // - The superclass NSObject does not have any subclassing requirements.
    // - `ActivationObserver` does not implement `Drop`.
    #[unsafe(super(NSObject))]
    #[name = "WindockActivationObserver"]
    #[ivars = Sender<ActivationRequest>]
    struct ActivationObserver;

    // SAFETY: The method signature matches the selector registered below.
    impl ActivationObserver {
        #[unsafe(method(handleActivation:))]
        fn handle_activation(&self, notification: &NSNotification) {
            let Some(request) = request_from_notification(notification) else {
                warn!(
                    event = "core.activation.native.payload_invalid",
                    message = "Activation notification without title or bundle identifier"
                );
                return;
            };
            if self.ivars().send(request).is_err() {
                debug!(event = "core.activation.native.receiver_dropped");
            }
        }
    }
}

impl ActivationObserver {
    fn new(sender: Sender<ActivationRequest>) -> Retained<Self> {
        let this = Self::alloc().set_ivars(sender);
        unsafe { msg_send![super(this), init] }
    }
}

fn request_from_notification(notification: &NSNotification) -> Option<ActivationRequest> {
    let info = notification.userInfo()?;
    let value = |key: &str| -> Option<Retained<AnyObject>> {
        info.objectForKey(&NSString::from_str(key))
    };
    let string = |key: &str| {
        value(key)
            .and_then(|v| v.downcast::<NSString>().ok())
            .map(|s| s.to_string())
    };
    let number = value(keys::WINDOW_NUMBER)
        .and_then(|v| v.downcast::<NSNumber>().ok())
        .map(|n| n.as_i64());

    ActivationRequest::from_payload(
        string(keys::WINDOW_TITLE),
        string(keys::BUNDLE_IDENTIFIER),
        number,
    )
}

/// Subscription to helper activation notifications for the lifetime of the
/// value.
///
/// Notifications are delivered on the run loop of the thread that created
/// the listener; [`ActivationListener::pump`] runs that loop briefly and
/// returns what arrived.
pub struct ActivationListener {
    observer: Retained<ActivationObserver>,
    receiver: Receiver<ActivationRequest>,
}

impl ActivationListener {
    pub fn new() -> Result<Self, ActivationError> {
        let (sender, receiver) = channel();
        let observer = ActivationObserver::new(sender);
        let center = NSDistributedNotificationCenter::defaultCenter();
        let name = NSString::from_str(ACTIVATION_NOTIFICATION);

        // SAFETY: handleActivation: has signature fn(&self, &NSNotification).
        unsafe {
            center.addObserver_selector_name_object(
                &observer,
                sel!(handleActivation:),
                Some(&name),
                None,
            );
        }

        debug!(
            event = "core.activation.native.listener_registered",
            notification = ACTIVATION_NOTIFICATION
        );
        Ok(Self { observer, receiver })
    }

    /// Run the current run loop for up to `timeout` and drain received
    /// requests.
    pub fn pump(&self, timeout: Duration) -> Vec<ActivationRequest> {
        // SAFETY: kCFRunLoopDefaultMode is a static CFString.
        let mode = unsafe { kCFRunLoopDefaultMode };
        CFRunLoop::run_in_mode(mode, timeout, true);
        self.receiver.try_iter().collect()
    }
}

impl Drop for ActivationListener {
    fn drop(&mut self) {
        let center = NSDistributedNotificationCenter::defaultCenter();
        // SAFETY: the observer was registered with this center in `new`.
        unsafe {
            center.removeObserver(&self.observer);
        }
    }
}
