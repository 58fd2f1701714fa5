//! Unwind-metadata walk through the system unwinder.
//!
//! `_Unwind_Backtrace` drives a callback per frame. The callback counts the
//! skip fence down, then appends instruction pointers until the output
//! buffer is full; a zero IP means the unwinder ran out of real frames and
//! ends the walk. No symbols are involved here and nothing allocates.

use super::Capture;
use std::ffi::c_void;
use std::os::raw::c_int;

#[allow(non_camel_case_types)]
#[allow(dead_code)]
#[repr(C)]
enum _Unwind_Reason_Code {
    _URC_NO_REASON = 0,
    _URC_FOREIGN_EXCEPTION_CAUGHT = 1,
    _URC_FATAL_PHASE2_ERROR = 2,
    _URC_FATAL_PHASE1_ERROR = 3,
    _URC_NORMAL_STOP = 4,
    _URC_END_OF_STACK = 5,
    _URC_HANDLER_FOUND = 6,
    _URC_INSTALL_CONTEXT = 7,
    _URC_CONTINUE_UNWIND = 8,
}

#[allow(non_camel_case_types)]
#[repr(C)]
struct _Unwind_Context {
    _opaque: [u8; 0],
}

#[allow(non_camel_case_types)]
type _Unwind_Trace_Fn =
    extern "C" fn(*mut _Unwind_Context, *mut c_void) -> _Unwind_Reason_Code;

extern "C" {
    fn _Unwind_Backtrace(trace: _Unwind_Trace_Fn, arg: *mut c_void) -> c_int;
    fn _Unwind_GetIP(ctx: *mut _Unwind_Context) -> libc::uintptr_t;
}

struct Tracer<'a> {
    skip: usize,
    out: &'a mut [usize],
    len: usize,
}

extern "C" fn append_frame(ctx: *mut _Unwind_Context, arg: *mut c_void) -> _Unwind_Reason_Code {
    let tracer = unsafe { &mut *arg.cast::<Tracer<'_>>() };
    if tracer.skip > 0 {
        tracer.skip -= 1;
        return _Unwind_Reason_Code::_URC_NO_REASON;
    }
    let ip = unsafe { _Unwind_GetIP(ctx) } as usize;
    if ip == 0 {
        return _Unwind_Reason_Code::_URC_END_OF_STACK;
    }
    if tracer.len < tracer.out.len() {
        tracer.out[tracer.len] = ip;
        tracer.len += 1;
    }
    if tracer.len == tracer.out.len() {
        return _Unwind_Reason_Code::_URC_END_OF_STACK;
    }
    _Unwind_Reason_Code::_URC_NO_REASON
}

#[inline(always)]
pub(crate) fn capture_into(ignore: usize, out: &mut [usize]) -> Capture {
    let mut tracer = Tracer {
        skip: ignore.saturating_add(1),
        out,
        len: 0,
    };
    unsafe {
        _Unwind_Backtrace(append_frame, std::ptr::addr_of_mut!(tracer).cast::<c_void>());
    }
    Capture {
        len: tracer.len,
        #[cfg(feature = "hashed-compare")]
        hash: super::trace_hash(&tracer.out[..tracer.len]),
    }
}
