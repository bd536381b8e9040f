use std::ffi::c_void;
use std::ptr;

use accessibility_sys::{
    AXError, AXUIElementCopyAttributeValue, AXUIElementCreateApplication,
    AXUIElementPerformAction, AXUIElementRef, AXUIElementSetAttributeValue,
    AXUIElementSetMessagingTimeout, kAXErrorSuccess, kAXFrontmostAttribute, kAXMainAttribute,
    kAXRaiseAction, kAXTitleAttribute, kAXWindowsAttribute,
};
use core_foundation::array::{CFArray, CFArrayRef};
use core_foundation::base::{CFType, CFTypeRef, TCFType};
use core_foundation::boolean::CFBoolean;
use core_foundation::string::CFString;
use tracing::debug;

/// Timeout for AX messaging (seconds)
const AX_MESSAGING_TIMEOUT: f32 = 1.0;

/// Owned accessibility element for one running application.
pub(crate) struct AxApplication {
    pid: i32,
    element: AXUIElementRef,
}

impl AxApplication {
    pub(crate) fn new(pid: i32) -> Result<Self, String> {
        // SAFETY: AXUIElementCreateApplication creates a +1 retained AXUIElementRef.
        let element = unsafe { AXUIElementCreateApplication(pid) };
        if element.is_null() {
            return Err(format!("Failed to create AX element for PID {}", pid));
        }

        // SAFETY: element is a valid AXUIElementRef we just created.
        unsafe {
            AXUIElementSetMessagingTimeout(element, AX_MESSAGING_TIMEOUT);
        }

        Ok(Self { pid, element })
    }

    fn windows(&self) -> Result<CFArray<CFType>, String> {
        let cf_attr = CFString::new(kAXWindowsAttribute);
        let mut value: CFTypeRef = ptr::null();

        // SAFETY: Standard AXUIElementCopyAttributeValue call (Copy Rule: +1 retained ref).
        let result = unsafe {
            AXUIElementCopyAttributeValue(self.element, cf_attr.as_concrete_TypeRef(), &mut value)
        };

        if result != kAXErrorSuccess || value.is_null() {
            return Err(format!(
                "Failed to get windows of PID {} (AXError: {})",
                self.pid, result
            ));
        }

        // SAFETY: value is a +1 retained CFArrayRef; wrap_under_create_rule takes ownership.
        Ok(unsafe { CFArray::wrap_under_create_rule(value as CFArrayRef) })
    }

    /// Titles of the application's windows in accessibility order.
    /// Windows without a title yield an empty string.
    pub(crate) fn window_titles(&self) -> Result<Vec<String>, String> {
        let windows = self.windows()?;
        let titles = windows
            .iter()
            .map(|item| {
                let element = item.as_CFTypeRef() as AXUIElementRef;
                ax_get_string_attribute(element, kAXTitleAttribute).unwrap_or_default()
            })
            .collect();
        Ok(titles)
    }

    /// Raise the window at `index` in accessibility order and make it main.
    pub(crate) fn raise_window(&self, index: usize) -> Result<(), String> {
        let windows = self.windows()?;
        let item = windows
            .get(index as isize)
            .ok_or_else(|| format!("No AX window at index {} for PID {}", index, self.pid))?;
        let element = item.as_CFTypeRef() as AXUIElementRef;

        let action = CFString::new(kAXRaiseAction);
        // SAFETY: element is an unretained borrow kept alive by `windows`.
        let result = unsafe { AXUIElementPerformAction(element, action.as_concrete_TypeRef()) };
        if result != kAXErrorSuccess {
            return Err(format!("AXRaise failed (AXError: {})", result));
        }

        if let Err(e) = ax_set_true(element, kAXMainAttribute) {
            debug!(
                event = "core.ax.set_main_failed",
                pid = self.pid,
                error = %e
            );
        }
        Ok(())
    }

    /// Mark the application frontmost.
    pub(crate) fn set_frontmost(&self) -> Result<(), String> {
        ax_set_true(self.element, kAXFrontmostAttribute)
    }
}

impl Drop for AxApplication {
    fn drop(&mut self) {
        // SAFETY: Release the app element (Create Rule, we own it).
        unsafe {
            core_foundation::base::CFRelease(self.element as *mut c_void);
        }
    }
}

fn ax_set_true(element: AXUIElementRef, attribute: &str) -> Result<(), String> {
    let cf_attr = CFString::new(attribute);
    let cf_true = CFBoolean::true_value();

    // SAFETY: Setting attribute value on a valid element.
    let result = unsafe {
        AXUIElementSetAttributeValue(element, cf_attr.as_concrete_TypeRef(), cf_true.as_CFTypeRef())
    };

    if result != kAXErrorSuccess {
        return Err(format!("Failed to set {} (AXError: {})", attribute, result));
    }
    Ok(())
}

/// Get a string attribute from an AX element.
fn ax_get_string_attribute(element: AXUIElementRef, attribute: &str) -> Option<String> {
    let cf_attr = CFString::new(attribute);
    let mut value: CFTypeRef = ptr::null();

    // SAFETY: Standard AXUIElementCopyAttributeValue (Copy Rule: +1 retained on success).
    let result = unsafe {
        AXUIElementCopyAttributeValue(element, cf_attr.as_concrete_TypeRef(), &mut value)
    };

    if result != kAXErrorSuccess as AXError || value.is_null() {
        return None;
    }

    // SAFETY: value is a +1 retained CFTypeRef. wrap_under_create_rule takes ownership.
    let cf_type: CFType = unsafe { TCFType::wrap_under_create_rule(value) };
    cf_type.downcast::<CFString>().map(|s| s.to_string())
}
