//! Unified debug-symbol service (DbgHelp).
//!
//! DbgHelp answers symbol, line, and module queries in one place, but it is
//! not safe for concurrent use: initialization, every individual query, and
//! teardown all execute under one process-wide lock. Initialization happens
//! lazily on the first query; [`shutdown`] is the host's exit-time hook,
//! after which queries degrade to empty results instead of touching the
//! torn-down service.

use super::SymbolInfo;
use log::warn;
use std::ffi::CStr;
use std::mem;
use std::sync::{Mutex, MutexGuard, PoisonError};
use windows_sys::Win32::System::Diagnostics::Debug::{
    SymCleanup, SymFromAddr, SymGetLineFromAddr64, SymGetModuleInfo64, SymInitialize,
    SymSetOptions, IMAGEHLP_LINE64, IMAGEHLP_MODULE64, SYMBOL_INFO, SYMOPT_LOAD_LINES,
    SYMOPT_UNDNAME,
};
use windows_sys::Win32::System::Threading::GetCurrentProcess;

const MAX_SYMBOL_NAME: usize = 255;

/// `SYMBOL_INFO` carries a one-byte flexible name array; the tail provides
/// the actual room.
#[repr(C)]
struct SymbolBuffer {
    info: SYMBOL_INFO,
    name_tail: [u8; MAX_SYMBOL_NAME],
}

enum State {
    Uninitialized,
    Ready,
    Failed,
    ShutDown,
}

static SERVICE: Mutex<State> = Mutex::new(State::Uninitialized);

fn lock() -> MutexGuard<'static, State> {
    SERVICE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Bring the service up under the caller's lock; `true` when usable.
fn ensure_ready(state: &mut State) -> bool {
    match state {
        State::Ready => true,
        State::Failed | State::ShutDown => false,
        State::Uninitialized => {
            let ok = unsafe {
                SymSetOptions(SYMOPT_LOAD_LINES | SYMOPT_UNDNAME);
                SymInitialize(GetCurrentProcess(), std::ptr::null(), 1) != 0
            };
            if !ok {
                warn!("debug-symbol service failed to initialize; symbols will render as unknown");
            }
            *state = if ok { State::Ready } else { State::Failed };
            ok
        }
    }
}

/// One locked query filling whatever fields the service knows.
pub(crate) fn resolve_into(address: usize, info: &mut SymbolInfo) {
    let mut state = lock();
    if !ensure_ready(&mut state) {
        return;
    }
    let process = unsafe { GetCurrentProcess() };
    let address = address as u64;

    let mut symbol: SymbolBuffer = unsafe { mem::zeroed() };
    symbol.info.SizeOfStruct = mem::size_of::<SYMBOL_INFO>() as u32;
    symbol.info.MaxNameLen = (MAX_SYMBOL_NAME + 1) as u32;
    let mut displacement = 0u64;
    if unsafe { SymFromAddr(process, address, &mut displacement, &mut symbol.info) } != 0 {
        let name = unsafe { CStr::from_ptr(symbol.info.Name.as_ptr().cast()) };
        let name = name.to_string_lossy();
        if !name.is_empty() {
            info.function = Some(name.into_owned());
        }
        info.offset = displacement as usize;
    }

    let mut line: IMAGEHLP_LINE64 = unsafe { mem::zeroed() };
    line.SizeOfStruct = mem::size_of::<IMAGEHLP_LINE64>() as u32;
    let mut line_displacement = 0u32;
    if unsafe { SymGetLineFromAddr64(process, address, &mut line_displacement, &mut line) } != 0
        && !line.FileName.is_null()
    {
        let file = unsafe { CStr::from_ptr(line.FileName.cast()) }.to_string_lossy();
        info.file = Some(super::basename(&file).to_owned());
        info.line = Some(line.LineNumber);
    }

    let mut module: IMAGEHLP_MODULE64 = unsafe { mem::zeroed() };
    module.SizeOfStruct = mem::size_of::<IMAGEHLP_MODULE64>() as u32;
    if unsafe { SymGetModuleInfo64(process, address, &mut module) } != 0 {
        let raw = &module.ModuleName;
        let len = raw.iter().position(|&c| c == 0).unwrap_or(raw.len());
        if len > 0 {
            let name: String = raw[..len].iter().map(|&c| c as u8 as char).collect();
            info.module = Some(name);
        }
    }
}

/// Exit-time teardown. Runs under the same lock as every query, so no
/// lookup can start while the service is being torn down; later queries
/// return empty results.
pub fn shutdown() {
    let mut state = lock();
    if matches!(*state, State::Ready) {
        unsafe {
            SymCleanup(GetCurrentProcess());
        }
    }
    *state = State::ShutDown;
}
