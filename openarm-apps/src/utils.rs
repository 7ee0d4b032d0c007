use std::sync::atomic::AtomicBool;

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Set by SIGINT/SIGTERM once [`install_signal_handlers`] ran.
pub static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Installs the `fmt` subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[cfg(unix)]
extern "C" fn on_signal(_: nix::libc::c_int) {
    INTERRUPTED.store(true, std::sync::atomic::Ordering::Relaxed);
}

/// Routes SIGINT and SIGTERM to [`INTERRUPTED`] so the control loop can stop
/// at the next tick.
#[cfg(unix)]
pub fn install_signal_handlers() -> anyhow::Result<()> {
    use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

    let action = SigAction::new(
        SigHandler::Handler(on_signal),
        SaFlags::empty(),
        SigSet::empty(),
    );
    for signal in [Signal::SIGINT, Signal::SIGTERM] {
        // SAFETY: the handler only stores to an atomic.
        unsafe { sigaction(signal, &action) }?;
    }
    debug!("installed SIGINT/SIGTERM handlers");
    Ok(())
}

#[cfg(not(unix))]
pub fn install_signal_handlers() -> anyhow::Result<()> {
    debug!("signal handlers are not supported on this platform");
    Ok(())
}
