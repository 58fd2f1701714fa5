//! Non-fatal diagnostic path: capture the current call chain and surface it
//! every way the crate supports.
//!
//! ```bash
//! RUST_LOG=info cargo run --example self-trace
//! ```

use anyhow::Result;
use callstack::Snapshot;

#[inline(never)]
fn leaf() -> Snapshot {
    Snapshot::capture()
}

#[inline(never)]
fn branch() -> Snapshot {
    std::hint::black_box(leaf())
}

fn main() -> Result<()> {
    env_logger::init();

    let snap = branch();
    println!("captured {} frames", snap.len());
    println!("\n== tiny =={}", snap.tiny());
    println!("\n== wide =={}", snap.wide());
    println!("\n== innermost three =={}", snap.wide().window(0, 3));

    // One log record per frame, for hosts that report through a logging
    // sink rather than stdout.
    snap.tiny().emit(log::Level::Info);

    Ok(())
}
