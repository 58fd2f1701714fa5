//! Snapshot rendering.
//!
//! A [`TraceFormat`] renders a window of a snapshot's frames in one of two
//! verbosity levels, resolving and demangling at render time:
//!
//! ```text
//! tiny:  my_app::worker::run
//! tiny:  [00007f21c3a04b8d]                       (unresolved)
//! wide:  [00007f21c3a04b8d] libc.so.6        gsignal + 0x141
//! wide:  [00005610a1f0286e] <unknown>        ??? + 0x0 : worker.rs(42)
//! ```
//!
//! Every entry is preceded by one newline, so rendering N frames yields N
//! `\n`-led lines and concatenation stays line-per-frame. Rendering always
//! completes: an address nothing could resolve still prints in its
//! bracketed hex form.

use crate::demangle::demangle;
use crate::snapshot::Snapshot;
use crate::symbolize;
use std::fmt;

/// Hex digits of a pointer rendered at full width.
const ADDR_DIGITS: usize = 2 * std::mem::size_of::<usize>();

#[derive(Clone, Copy)]
pub(crate) enum Style {
    Tiny,
    Wide,
}

/// Lazy renderer over a clamped window of a snapshot's frames.
///
/// Obtained from [`Snapshot::tiny`] or [`Snapshot::wide`]; renders on
/// demand into any text sink, into a `String` via `Display`/`to_string`,
/// or into a leveled logging sink one record per frame.
#[derive(Clone, Copy)]
pub struct TraceFormat<'a> {
    snapshot: &'a Snapshot,
    style: Style,
    from: usize,
    end: usize,
}

impl<'a> TraceFormat<'a> {
    pub(crate) fn new(snapshot: &'a Snapshot, style: Style) -> Self {
        Self {
            snapshot,
            style,
            from: 0,
            end: snapshot.len(),
        }
    }

    /// Restrict rendering to `count` frames starting at `from`.
    ///
    /// The window clamps to the captured range: a `from` past the end
    /// renders nothing, a `count` past the end renders what is there.
    #[must_use]
    pub fn window(mut self, from: usize, count: usize) -> Self {
        self.from = from;
        self.end = self.snapshot.len().min(from.saturating_add(count));
        self
    }

    /// Render every entry in the window, each preceded by a newline.
    ///
    /// # Errors
    /// Propagates the sink's write errors; rendering itself cannot fail.
    pub fn write_to<W: fmt::Write>(&self, sink: &mut W) -> fmt::Result {
        for index in self.from..self.end {
            sink.write_char('\n')?;
            self.write_entry(sink, index)?;
        }
        Ok(())
    }

    /// Emit one log record per frame at `level`, rendering each entry to a
    /// private buffer first so records stay newline-free.
    pub fn emit(&self, level: log::Level) {
        for index in self.from..self.end {
            let mut entry = String::new();
            if self.write_entry(&mut entry, index).is_ok() {
                log::log!(level, "{entry}");
            }
        }
    }

    fn write_entry<W: fmt::Write>(&self, sink: &mut W, index: usize) -> fmt::Result {
        // The window is clamped, so the frame is always there.
        let Some(address) = self.snapshot.frame(index) else {
            return Ok(());
        };
        match self.style {
            Style::Tiny => write_tiny(sink, address),
            Style::Wide => write_wide(sink, address),
        }
    }
}

impl fmt::Display for TraceFormat<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

/// Function name when one resolves, bare address otherwise.
fn write_tiny<W: fmt::Write>(sink: &mut W, address: usize) -> fmt::Result {
    let info = symbolize::resolve(address);
    match info.function {
        Some(name) => sink.write_str(&demangle(&name)),
        None => write_address(sink, address),
    }
}

/// `[addr] module function + offset : file(line)`, with placeholders for
/// whatever stayed unresolved.
fn write_wide<W: fmt::Write>(sink: &mut W, address: usize) -> fmt::Result {
    let info = symbolize::resolve(address);

    write_address(sink, address)?;
    let module = info.module.as_deref().unwrap_or("<unknown>");
    write!(sink, " {module:<16} ")?;
    match info.function {
        Some(name) => sink.write_str(&demangle(&name))?,
        None => sink.write_str("???")?,
    }
    write!(sink, " + {:#x}", info.offset)?;
    if let (Some(file), Some(line)) = (info.file, info.line) {
        write!(sink, " : {file}({line})")?;
    }
    Ok(())
}

fn write_address<W: fmt::Write>(sink: &mut W, address: usize) -> fmt::Result {
    write!(sink, "[{address:0width$x}]", width = ADDR_DIGITS)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Addresses below the lowest mapping the OS will hand out, so nothing
    // resolves and the placeholder paths are deterministic.
    const UNMAPPED: [usize; 3] = [0x10, 0x20, 0x30];

    #[test]
    fn tiny_falls_back_to_padded_hex() {
        let snap = Snapshot::from_frames(&UNMAPPED[..1]);
        let text = snap.tiny().to_string();
        assert_eq!(text, format!("\n[{:0width$x}]", 0x10, width = ADDR_DIGITS));
    }

    #[test]
    fn wide_keeps_the_offset_marker_when_unresolved() {
        let snap = Snapshot::from_frames(&UNMAPPED[..1]);
        let text = snap.wide().to_string();
        assert!(text.starts_with("\n["), "got {text:?}");
        assert!(text.contains("<unknown>"), "got {text:?}");
        assert!(text.contains("??? + 0x0"), "got {text:?}");
    }

    #[test]
    fn wide_pads_the_module_column() {
        let snap = Snapshot::from_frames(&UNMAPPED[..1]);
        let text = snap.wide().to_string();
        // "<unknown>" left-justified to 16 columns between single spaces.
        assert!(text.contains("] <unknown>        ???"), "got {text:?}");
    }

    #[test]
    fn each_entry_is_preceded_by_a_newline() {
        let snap = Snapshot::from_frames(&UNMAPPED);
        let text = snap.tiny().to_string();
        assert_eq!(text.matches('\n').count(), snap.len());
        assert!(text.starts_with('\n'));
    }

    #[test]
    fn window_clamps_to_the_captured_range() {
        let snap = Snapshot::from_frames(&UNMAPPED);
        assert_eq!(snap.tiny().window(1, 1).to_string().matches('\n').count(), 1);
        assert_eq!(snap.tiny().window(0, 99).to_string().matches('\n').count(), 3);
        assert_eq!(snap.tiny().window(7, 2).to_string(), "");
        assert_eq!(snap.tiny().window(2, usize::MAX).to_string().matches('\n').count(), 1);
    }

    #[test]
    fn empty_snapshot_renders_nothing() {
        let snap = Snapshot::from_frames(&[]);
        assert_eq!(snap.wide().to_string(), "");
    }

    #[cfg(unix)]
    #[test]
    fn tiny_renders_the_resolved_name() {
        // dlsym hands back the canonical address of an exported symbol, the
        // one case where resolution is guaranteed to find a name.
        let address = unsafe { libc::dlsym(libc::RTLD_DEFAULT, b"getpid\0".as_ptr().cast()) };
        assert!(!address.is_null());

        let snap = Snapshot::from_frames(&[address as usize]);
        let text = snap.tiny().to_string();
        assert!(text.contains("getpid"), "got {text:?}");
        assert!(!text.contains('['), "expected a name, not an address: {text:?}");
    }

    #[test]
    fn emit_without_a_logger_is_a_no_op() {
        let snap = Snapshot::from_frames(&UNMAPPED);
        snap.tiny().emit(log::Level::Debug);
        snap.wide().window(0, 2).emit(log::Level::Trace);
    }
}
