//! # Native Receiver Engine
//!
//! Purpose: Drive the native receiver library through its C exports.
//!
//! ## Notes
//! - The library keeps one receiver and one channel in process-global state,
//!   so `NativeEngine::acquire` hands out at most one live handle at a time.
//! - `ReceiverDisconnect` dereferences the channel unconditionally; the
//!   engine only calls it while it owns a session.
//! - Labels are copied out only when the server's parameters use labels;
//!   otherwise the zeroed label buffer is left as is.

use std::ffi::CString;
use std::os::raw::c_int;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::warn;

use psi_common::{Item, MAX_BATCH_LEN};

use crate::engine::PsiEngine;

mod ffi {
    use std::os::raw::{c_char, c_int};

    #[link(name = "APSINative")]
    extern "C" {
        pub fn ReceiverConnect(address: *const c_char, port: c_int) -> bool;
        pub fn ReceiverDisconnect();
        pub fn ReceiverIsConnected() -> bool;
        pub fn ReceiverQuery(length: c_int, items: *mut u64, result: *mut c_int, labels: *mut u64)
            -> bool;
    }
}

static CLAIMED: AtomicBool = AtomicBool::new(false);

/// Handle to the process-wide native receiver.
pub struct NativeEngine {
    // True while the library holds a receiver created by our connect.
    session: bool,
}

impl NativeEngine {
    /// Claims the native receiver. Returns `None` while another handle lives.
    pub fn acquire() -> Option<Self> {
        CLAIMED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| NativeEngine { session: false })
    }
}

impl PsiEngine for NativeEngine {
    fn connect(&mut self, address: &str, port: u16) -> bool {
        let address = match CString::new(address) {
            Ok(address) => address,
            Err(_) => return false,
        };
        // SAFETY: `address` is a valid NUL-terminated string for the call.
        let ok = unsafe { ffi::ReceiverConnect(address.as_ptr(), c_int::from(port)) };
        if ok {
            self.session = true;
        }
        ok
    }

    fn disconnect(&mut self) {
        if self.session {
            // SAFETY: a session exists, so the library's channel is non-null.
            unsafe { ffi::ReceiverDisconnect() };
            self.session = false;
        }
    }

    fn is_connected(&self) -> bool {
        // SAFETY: takes no arguments and tolerates a missing channel.
        unsafe { ffi::ReceiverIsConnected() }
    }

    fn batch_query(&mut self, items: &[Item], presence: &mut [i32], labels: &mut [u64]) -> bool {
        if !self.session {
            return false;
        }
        if presence.len() != items.len() || labels.len() != items.len() {
            return false;
        }
        if items.len() > MAX_BATCH_LEN {
            return false;
        }

        // The export takes a mutable pointer but only reads the items.
        let mut items = items.to_vec();
        // SAFETY: all three buffers hold exactly `items.len()` elements and the
        // length fits in a C int.
        let ok = unsafe {
            ffi::ReceiverQuery(
                items.len() as c_int,
                items.as_mut_ptr(),
                presence.as_mut_ptr(),
                labels.as_mut_ptr(),
            )
        };
        if !ok {
            warn!(count = items.len(), "native receiver query failed");
        }
        ok
    }
}

impl Drop for NativeEngine {
    fn drop(&mut self) {
        self.disconnect();
        CLAIMED.store(false, Ordering::Release);
    }
}
