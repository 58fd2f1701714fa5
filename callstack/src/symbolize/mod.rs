//! Address-to-symbol resolution.
//!
//! [`resolve`] never fails. Each source in the platform chain fills
//! whatever fields it can, later higher-fidelity sources override earlier
//! guesses for the same field, and whatever stays unknown is left `None`
//! for the formatter to replace with its placeholders.
//!
//! The chains:
//!
//! - unix: one-line text symbolizer (where `backtrace_symbols` exists),
//!   then the dynamic loader, then the process memory map for the module
//!   path alone
//! - windows: the unified DbgHelp service, one locked query per address
//!
//! All of this is render-time work. None of it is signal-safe and none of
//! it may be called from the capture path.

#[cfg(windows)]
pub mod dbghelp;
#[cfg(unix)]
mod dladdr;
pub mod module_map;
pub mod symtext;

/// Best-effort location of one instruction address.
///
/// Every field is independently optional; an unresolved field is a normal
/// outcome, not an error. `offset` is the distance from the enclosing
/// symbol's base address when that base is known, and `0` otherwise.
#[derive(Debug, Clone, Default)]
pub struct SymbolInfo {
    /// Function name as the source reported it, mangled or plain.
    pub function: Option<String>,
    /// Owning binary or shared library.
    pub module: Option<String>,
    /// Byte offset from the enclosing symbol's base address.
    pub offset: usize,
    /// Source file, when the platform exposes line information.
    pub file: Option<String>,
    /// Source line, when the platform exposes line information.
    pub line: Option<u32>,
}

/// Resolve one address through the platform chain.
///
/// Returns partial data rather than failing: in the worst case every field
/// is `None` and the formatter falls back to the bare address.
#[must_use]
pub fn resolve(address: usize) -> SymbolInfo {
    let mut info = SymbolInfo::default();

    // Lowest-fidelity guess first: the one-line text symbolizer only knows
    // an approximate function name.
    #[cfg(any(target_os = "macos", all(target_os = "linux", target_env = "gnu")))]
    {
        info.function = symtext::function_at(address);
    }

    #[cfg(unix)]
    {
        if let Some(hit) = dladdr::lookup(address) {
            if hit.symbol.is_some() {
                info.function = hit.symbol;
            }
            if let Some(base) = hit.symbol_base {
                info.offset = address.wrapping_sub(base);
            }
            info.module = hit.module.map(|path| basename(&path).to_owned());
        }
    }

    #[cfg(target_os = "linux")]
    {
        if info.module.is_none() {
            info.module = module_map::ModuleMap::current()
                .module_for(address)
                .map(str::to_owned);
        }
    }

    #[cfg(windows)]
    {
        dbghelp::resolve_into(address, &mut info);
    }

    info
}

/// Final path component, for compact module names in rendered output.
#[cfg(any(unix, windows))]
pub(crate) fn basename(path: &str) -> &str {
    std::path::Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_address_resolves_to_nothing() {
        // Below any mapping the OS will hand out.
        let info = resolve(0x10);
        assert_eq!(info.function, None);
        assert_eq!(info.module, None);
        assert_eq!(info.file, None);
        assert_eq!(info.line, None);
        assert_eq!(info.offset, 0);
    }

    #[cfg(unix)]
    #[test]
    fn basename_strips_directories() {
        assert_eq!(basename("/usr/lib/libc.so.6"), "libc.so.6");
        assert_eq!(basename("libfoo.dylib"), "libfoo.dylib");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn own_text_segment_resolves_to_a_module() {
        let info = resolve(resolve as usize);
        assert!(info.module.is_some(), "no module for our own code: {info:?}");
    }
}
