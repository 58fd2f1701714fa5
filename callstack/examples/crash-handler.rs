//! Fatal-signal collaborator contract: install a handler that captures with
//! the signal-safe path, renders Wide over the whole trace, writes it to
//! stderr, then chains to whatever handler was installed before.
//!
//! Capture inside the handler is the crate's guaranteed-safe step. The
//! symbolization and formatting that follow allocate and may take locks;
//! during process teardown that is accepted as best-effort diagnostics.
//!
//! ```bash
//! cargo run --example crash-handler
//! ```

#[cfg(unix)]
mod handler {
    use callstack::Snapshot;
    use std::fmt::Write as _;
    use std::io::Write as _;
    use std::mem;
    use std::sync::OnceLock;

    static PREVIOUS: OnceLock<libc::sigaction> = OnceLock::new();

    extern "C" fn on_fatal_signal(signal: libc::c_int) {
        // The only step with a safety guarantee in this context.
        let snapshot = Snapshot::capture();

        // Best-effort teardown diagnostics from here on.
        let mut report = String::new();
        let _ = write!(report, "fatal signal {signal}, call stack:{}", snapshot.wide());
        report.push('\n');
        let _ = std::io::stderr().write_all(report.as_bytes());

        unsafe {
            match PREVIOUS.get().copied() {
                Some(prev)
                    if prev.sa_sigaction != libc::SIG_DFL
                        && prev.sa_sigaction != libc::SIG_IGN =>
                {
                    let chain: extern "C" fn(libc::c_int) = mem::transmute(prev.sa_sigaction);
                    chain(signal);
                }
                _ => {
                    libc::signal(signal, libc::SIG_DFL);
                    libc::raise(signal);
                }
            }
        }
    }

    pub fn install(signal: libc::c_int) {
        unsafe {
            let mut action: libc::sigaction = mem::zeroed();
            action.sa_sigaction = on_fatal_signal as usize;
            libc::sigemptyset(&mut action.sa_mask);
            action.sa_flags = 0;
            let mut previous: libc::sigaction = mem::zeroed();
            if libc::sigaction(signal, &action, &mut previous) == 0 {
                let _ = PREVIOUS.set(previous);
            }
        }
    }

    #[inline(never)]
    pub fn blow_up() {
        unsafe {
            libc::raise(libc::SIGSEGV);
        }
    }
}

#[cfg(unix)]
fn main() {
    env_logger::init();
    handler::install(libc::SIGSEGV);
    println!("raising SIGSEGV to exercise the handler");
    handler::blow_up();
}

#[cfg(not(unix))]
fn main() {
    eprintln!("this demo drives unix signal handling; nothing to do here");
}
