//! One-line text symbolization (`backtrace_symbols(3)`).
//!
//! The facility returns a single descriptive line per address. Two line
//! shapes exist in the wild:
//!
//! ```text
//! ./module(function+0x15c) [0x8048a6d]                 parenthesis/plus
//! 3   module    0x00006989 function + 111              space-delimited
//! 3   module    0x00006989 -[Caller doIt:] + 37        compound ObjC name
//! ```
//!
//! Both parsers are plain string functions, compiled and tested everywhere;
//! only the FFI wrapper is platform-gated.

/// Function name out of a parenthesis/plus-delimited line:
/// `./module(function+0x15c) [0x8048a6d]`.
#[must_use]
pub fn parse_gnu_line(line: &str) -> Option<&str> {
    let open = line.find('(')?;
    let rest = &line[open + 1..];
    let end = rest.find('+')?;
    let name = &rest[..end];
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Function name out of a space-delimited line:
/// `3   module    0x00006989 function + 111`.
///
/// Bracketed compound names contain spaces, so the name is everything
/// between the address column and the trailing `+ offset`.
#[must_use]
pub fn parse_darwin_line(line: &str) -> Option<String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if !tokens.get(2)?.starts_with("0x") {
        return None;
    }
    let plus = tokens.iter().rposition(|token| *token == "+")?;
    if plus < 4 || plus + 1 >= tokens.len() {
        return None;
    }
    // An unresolved line repeats a raw address where the name would be.
    if tokens[3].starts_with("0x") {
        return None;
    }
    Some(tokens[3..plus].join(" "))
}

/// Approximate function name for `address`, through the one-line facility.
#[cfg(any(target_os = "macos", all(target_os = "linux", target_env = "gnu")))]
pub(crate) fn function_at(address: usize) -> Option<String> {
    use std::ffi::{c_void, CStr};

    // One malloc'd block owns the whole line array.
    struct Lines(*mut *mut libc::c_char);
    impl Drop for Lines {
        fn drop(&mut self) {
            unsafe { libc::free(self.0.cast::<c_void>()) };
        }
    }

    let addr = address as *mut c_void;
    let lines = Lines(unsafe { libc::backtrace_symbols(&addr, 1) });
    if lines.0.is_null() {
        return None;
    }
    let first = unsafe { *lines.0 };
    if first.is_null() {
        return None;
    }
    let line = unsafe { CStr::from_ptr(first) }.to_string_lossy();

    #[cfg(target_os = "macos")]
    {
        parse_darwin_line(&line)
    }
    #[cfg(not(target_os = "macos"))]
    {
        parse_gnu_line(&line).map(str::to_owned)
    }
}
