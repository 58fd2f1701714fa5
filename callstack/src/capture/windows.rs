//! OS fast-walk primitive (`RtlCaptureStackBackTrace`).
//!
//! The kernel walk also emits a cheap, collision-prone hash of the trace;
//! that hash is what backs the hashed comparison mode on this platform.

use super::Capture;
use std::ffi::c_void;
use windows_sys::Win32::System::Diagnostics::Debug::RtlCaptureStackBackTrace;

#[inline(always)]
pub(crate) fn capture_into(ignore: usize, out: &mut [usize]) -> Capture {
    let mut hash = 0u32;
    let skip = u32::try_from(ignore.saturating_add(1)).unwrap_or(u32::MAX);
    let len = unsafe {
        RtlCaptureStackBackTrace(
            skip,
            out.len() as u32,
            out.as_mut_ptr().cast::<*mut c_void>(),
            &mut hash,
        )
    };
    Capture {
        len: usize::from(len),
        #[cfg(feature = "hashed-compare")]
        hash: u64::from(hash),
    }
}
