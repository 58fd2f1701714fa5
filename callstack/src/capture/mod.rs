//! Per-platform stack walks.
//!
//! Everything under this module must stay safe to run on a thread that is
//! handling a fatal signal: fixed-size stack buffers only, no heap
//! allocation, no locks. Symbolization lives in `symbolize` and must never
//! be called from here.
//!
//! Exactly one strategy is compiled per platform; all of them expose
//! `capture_into(ignore, out) -> Capture` filling `out` innermost first.
//! Each strategy drops one internal fence frame (the `Snapshot::capture_with`
//! frame) on top of the caller's `ignore` count.

#[cfg(all(unix, not(target_os = "macos")))]
pub(crate) mod unwind;
#[cfg(all(unix, not(target_os = "macos")))]
pub(crate) use self::unwind as imp;

#[cfg(target_os = "macos")]
pub(crate) mod execinfo;
#[cfg(target_os = "macos")]
pub(crate) use self::execinfo as imp;

#[cfg(windows)]
pub(crate) mod windows;
#[cfg(windows)]
pub(crate) use self::windows as imp;

/// Result of one walk: the number of addresses written, plus the trace hash
/// backing the hashed comparison mode.
pub(crate) struct Capture {
    pub len: usize,
    #[cfg(feature = "hashed-compare")]
    pub hash: u64,
}

/// FNV-1a fold of the captured addresses. The Windows walk gets its hash
/// from the OS instead; everywhere else this runs once at capture time so
/// comparisons stay O(1).
#[cfg(feature = "hashed-compare")]
pub(crate) fn trace_hash(frames: &[usize]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = OFFSET_BASIS;
    for &address in frames {
        let mut word = address as u64;
        for _ in 0..std::mem::size_of::<usize>() {
            hash ^= word & 0xff;
            hash = hash.wrapping_mul(PRIME);
            word >>= 8;
        }
    }
    hash
}

#[cfg(all(test, feature = "hashed-compare"))]
mod tests {
    use super::trace_hash;

    #[test]
    fn hash_distinguishes_order_and_length() {
        assert_ne!(trace_hash(&[0x1, 0x2]), trace_hash(&[0x2, 0x1]));
        assert_ne!(trace_hash(&[0x1]), trace_hash(&[0x1, 0x0]));
        assert_eq!(trace_hash(&[0x1, 0x2]), trace_hash(&[0x1, 0x2]));
    }
}
