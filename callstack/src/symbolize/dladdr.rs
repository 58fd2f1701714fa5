//! Nearest-symbol lookup through the dynamic loader.
//!
//! `dladdr(3)` maps an address to the enclosing shared object and, when the
//! address falls inside an exported symbol, to that symbol's name and base
//! address. Statically linked or non-exported functions are invisible to
//! it; that is a normal miss, not an error.

use std::ffi::{c_void, CStr};

pub(crate) struct DlSym {
    /// Path of the owning shared object.
    pub module: Option<String>,
    /// Nearest enclosing exported symbol, mangled or plain.
    pub symbol: Option<String>,
    /// Base address of that symbol.
    pub symbol_base: Option<usize>,
}

pub(crate) fn lookup(address: usize) -> Option<DlSym> {
    let mut info: libc::Dl_info = unsafe { std::mem::zeroed() };
    if unsafe { libc::dladdr(address as *const c_void, &mut info) } == 0 {
        return None;
    }

    let module = (!info.dli_fname.is_null())
        .then(|| unsafe { CStr::from_ptr(info.dli_fname) }.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty());
    let symbol = (!info.dli_sname.is_null())
        .then(|| unsafe { CStr::from_ptr(info.dli_sname) }.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty());
    let symbol_base = (!info.dli_saddr.is_null()).then(|| info.dli_saddr as usize);

    Some(DlSym {
        module,
        symbol,
        symbol_base,
    })
}
