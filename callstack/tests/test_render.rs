//! End-to-end rendering and resolution properties.

use callstack::Snapshot;
use std::hint::black_box;

#[inline(never)]
fn inner() -> Snapshot {
    black_box(Snapshot::capture())
}

#[inline(never)]
fn middle() -> Snapshot {
    black_box(inner())
}

#[inline(never)]
fn outer() -> Snapshot {
    black_box(middle())
}

#[test]
fn wide_entries_have_uniform_shape() {
    let snap = outer();
    let text = snap.wide().to_string();
    let entries: Vec<&str> = text.split('\n').skip(1).collect();

    assert_eq!(entries.len(), snap.len());
    for entry in &entries {
        assert!(entry.starts_with('['), "entry {entry:?} lacks the address");
        assert!(entry.contains(" + 0x"), "entry {entry:?} lacks the offset");
    }
}

#[test]
fn every_entry_gets_its_leading_newline() {
    let snap = outer();
    for format in [snap.tiny(), snap.wide()] {
        let text = format.to_string();
        assert_eq!(text.matches('\n').count(), snap.len());
        assert!(text.starts_with('\n'));
    }
}

#[test]
fn windowed_rendering_counts_entries() {
    let snap = outer();
    assert!(snap.len() >= 3);

    let three = snap.wide().window(0, 3).to_string();
    assert_eq!(three.matches('\n').count(), 3);

    let beyond = snap.wide().window(snap.len(), 5).to_string();
    assert_eq!(beyond, "");
}

#[cfg(target_os = "linux")]
#[test]
fn own_frames_resolve_to_a_module() {
    // Our innermost frames live in this test binary; between the dynamic
    // loader and the process memory map, the module has to resolve.
    let snap = outer();
    let text = snap.wide().window(0, 1).to_string();
    assert!(
        !text.contains("<unknown>"),
        "frame 0 should name this binary: {text:?}"
    );
}

#[test]
fn emission_smoke() {
    let _ = env_logger::builder().is_test(true).try_init();
    let snap = outer();
    snap.wide().emit(log::Level::Debug);
    snap.tiny().window(0, 2).emit(log::Level::Info);
}

#[cfg(unix)]
#[test]
fn exported_symbols_resolve_by_name() {
    // dlsym gives the canonical libc address, which the dynamic loader can
    // attribute to an exported symbol by name.
    let address = unsafe { libc::dlsym(libc::RTLD_DEFAULT, b"getpid\0".as_ptr().cast()) };
    assert!(!address.is_null(), "dlsym(getpid) failed");

    let info = callstack::resolve(address as usize);
    // Aliases like __getpid are fair game; the name just has to be there.
    assert!(
        info.function.as_deref().is_some_and(|name| name.contains("getpid")),
        "unexpected resolution: {info:?}"
    );
    assert!(info.module.is_some());
}
