//! Library-provided synchronous backtrace (`backtrace(3)`).
//!
//! The walk fills a fixed scratch buffer on the stack and the ignored
//! frames are dropped on the copy out. Skip depths beyond the scratch slack
//! shorten the capture instead of allocating.

use super::Capture;
use std::ffi::c_void;

// Room for the fence and a reasonable ignore depth on top of a full capture.
const SCRATCH: usize = crate::snapshot::MAX_FRAMES + 16;

#[inline(always)]
pub(crate) fn capture_into(ignore: usize, out: &mut [usize]) -> Capture {
    let mut scratch = [std::ptr::null_mut::<c_void>(); SCRATCH];
    let depth = unsafe { libc::backtrace(scratch.as_mut_ptr(), SCRATCH as libc::c_int) };
    let depth = usize::try_from(depth).unwrap_or(0);

    let skip = ignore.saturating_add(1).min(depth);
    let len = (depth - skip).min(out.len());
    for (slot, address) in out[..len].iter_mut().zip(&scratch[skip..skip + len]) {
        *slot = *address as usize;
    }
    Capture {
        len,
        #[cfg(feature = "hashed-compare")]
        hash: super::trace_hash(&out[..len]),
    }
}
