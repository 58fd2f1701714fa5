//! # Callstack - capture, symbolize, and render call chains
//!
//! Callstack turns "the current thread's call chain" into a bounded,
//! immutable sequence of instruction addresses, and turns each raw address
//! into a best-effort human-readable location. It is built for crash
//! reporting: capture has to work while handling a fatal signal, and
//! snapshots have to compare fast enough to deduplicate crash signatures at
//! scale.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐  capture time (signal-safe, no alloc, no locks)
//! │ StackCapture │──────────────────────────────┐
//! │ (per-OS walk)│                              ▼
//! └──────────────┘                       ┌────────────┐
//!                                        │  Snapshot  │  Eq / Ord / Hash
//!                                        │ (≤32 addrs)│  for deduplication
//!                                        └─────┬──────┘
//!                render time (deferred)        │
//!                                              ▼
//! ┌──────────────┐   ┌──────────────┐   ┌────────────┐
//! │  Symbolizer  │◀──│  Formatter   │◀──│  Tiny/Wide │
//! │ text→dladdr→ │   │ (per frame)  │   │   window   │
//! │  module map  │   └──────┬───────┘   └────────────┘
//! └──────┬───────┘          │
//!        ▼                  ▼
//! ┌──────────────┐   text sink / String / one log record per frame
//! │  Demangler   │
//! └──────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`snapshot`]: the immutable capture record and its comparison modes
//! - `capture` (internal): the per-platform stack walks; the only code in
//!   the crate that is safe to run inside a fatal-signal handler
//! - [`symbolize`]: address resolution chained across the OS facilities
//!   (one-line text symbolizer, dynamic loader, process memory map, or the
//!   unified Windows debug-symbol service)
//! - [`demangle`]: best-effort symbol-name demangling
//! - [`format`]: Tiny/Wide rendering over a clamped frame window
//!
//! ## Two-Phase Design
//!
//! Capture and symbolization are deliberately split. Capture runs a single
//! bounded walk into a stack-allocated buffer - no heap, no locks - so it
//! can run on a thread that is handling SIGSEGV. Everything that allocates,
//! parses, or takes a lock happens later, at render time, and degrades
//! field by field instead of failing: worst case every rendered line is a
//! bracketed hex address.
//!
//! ## Typical Usage
//!
//! ```no_run
//! use callstack::Snapshot;
//!
//! let snap = Snapshot::capture();
//! eprintln!("call stack:{}", snap.wide());
//!
//! // Innermost three frames, one log record each.
//! snap.tiny().window(0, 3).emit(log::Level::Error);
//! ```
//!
//! ## Comparison Modes
//!
//! Snapshot equality and ordering are exact by default (same length, same
//! address sequence). The `hashed-compare` cargo feature switches both to a
//! 64-bit trace hash: O(1) comparisons with a bounded risk of two distinct
//! traces comparing equal. Pick it per build, not per call site.

mod capture;
pub mod demangle;
pub mod format;
pub mod snapshot;
pub mod symbolize;

pub use demangle::demangle;
pub use format::TraceFormat;
pub use snapshot::{Snapshot, MAX_FRAMES};
pub use symbolize::{resolve, SymbolInfo};
