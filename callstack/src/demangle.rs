//! Best-effort symbol-name demangling.

use std::borrow::Cow;

/// Turn a compiler-encoded symbol name into its source-level form.
///
/// On success the demangled name comes back with the trailing
/// disambiguator hash stripped. A name the demangler does not recognize is
/// returned unchanged, never empty or mangled further; callers with
/// optional names map through `Option`, so a missing name stays missing.
#[must_use]
pub fn demangle(mangled: &str) -> Cow<'_, str> {
    match rustc_demangle::try_demangle(mangled) {
        Ok(name) => Cow::Owned(format!("{name:#}")),
        Err(_) => Cow::Borrowed(mangled),
    }
}
