//! End-to-end capture properties against this test binary's real stack.

use callstack::{Snapshot, MAX_FRAMES};
use std::collections::BTreeMap;
use std::hint::black_box;

#[inline(never)]
fn inner(ignore: usize, limit: usize) -> Snapshot {
    black_box(Snapshot::capture_with(ignore, limit))
}

#[inline(never)]
fn middle(ignore: usize, limit: usize) -> Snapshot {
    black_box(inner(ignore, limit))
}

#[inline(never)]
fn caller(ignore: usize, limit: usize) -> Snapshot {
    black_box(middle(ignore, limit))
}

#[test]
fn capture_is_bounded() {
    let snap = caller(0, MAX_FRAMES);
    assert!(snap.len() <= MAX_FRAMES);
    assert!(
        snap.len() >= 3,
        "expected at least the probe chain, got {} frames",
        snap.len()
    );
}

#[test]
fn limit_is_honored_and_clamped() {
    assert!(caller(0, 4).len() <= 4);
    assert_eq!(caller(0, 0).len(), 0);
    assert!(caller(0, MAX_FRAMES * 4).len() <= MAX_FRAMES);
}

#[test]
fn ignore_drops_exactly_the_innermost_frames() {
    // Both captures go through one call site so the surrounding stack is
    // identical; only the ignore count differs.
    let mut shots = Vec::new();
    for ignore in 0..2 {
        shots.push(caller(ignore, MAX_FRAMES));
    }
    let (full, skipped) = (&shots[0], &shots[1]);

    assert!(!full.is_empty());
    if full.len() < MAX_FRAMES {
        assert_eq!(skipped.len(), full.len() - 1);
    }
    for index in 0..skipped.len().min(full.len() - 1) {
        assert_eq!(
            skipped.frame(index),
            full.frame(index + 1),
            "frame {index} should shift by the ignore count"
        );
    }
}

#[cfg(not(feature = "hashed-compare"))]
#[test]
fn same_call_site_captures_compare_equal() {
    let mut shots = Vec::new();
    for _ in 0..2 {
        shots.push(caller(0, MAX_FRAMES));
    }
    assert_eq!(shots[0], shots[1]);
}

#[test]
fn distinct_call_sites_compare_unequal() {
    let here = black_box(Snapshot::capture());
    let there = caller(0, MAX_FRAMES);
    assert_ne!(here, there);
}

#[test]
fn snapshots_deduplicate_as_map_keys() {
    let mut signatures: BTreeMap<Snapshot, u32> = BTreeMap::new();
    for _ in 0..3 {
        *signatures.entry(caller(0, MAX_FRAMES)).or_insert(0) += 1;
    }
    let lone = black_box(Snapshot::capture());
    *signatures.entry(lone).or_insert(0) += 1;

    assert_eq!(signatures.len(), 2);
    assert_eq!(signatures.values().sum::<u32>(), 4);
}

#[test]
fn out_of_range_frames_are_none() {
    let snap = caller(0, 4);
    assert_eq!(snap.frame(snap.len()), None);
    assert_eq!(snap.frame(MAX_FRAMES + 1), None);
    if !snap.is_empty() {
        assert!(snap.frame(0).is_some());
        assert_ne!(snap.frame(0), Some(0));
    }
}

#[test]
fn clones_are_independent_equals() {
    let snap = caller(0, MAX_FRAMES);
    let copy = snap.clone();
    assert_eq!(snap, copy);
    assert_eq!(snap.frames(), copy.frames());
}
