//! Process signal handling.
//!
//! SIGINT and SIGTERM are blocked on the calling thread and consumed
//! synchronously by a dedicated watcher thread, so no work happens in an
//! async-signal context. Call [`install`] from `main` before spawning any
//! other thread; spawned threads inherit the mask.
//!
//! | Signal  | Action                                               |
//! |---------|------------------------------------------------------|
//! | SIGINT  | cancel the token; the loop cleans up and returns     |
//! | SIGTERM | `terminate()`: cancel, clean up once, exit status 0  |

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, error};
use nix::sys::signal::{SigSet, Signal};

use crate::termination::TerminationCoordinator;

fn watched() -> SigSet {
    let mut set = SigSet::empty();
    set.add(Signal::SIGINT);
    set.add(Signal::SIGTERM);
    set
}

/// Block the watched signals and start the watcher thread.
pub fn install(coordinator: Arc<TerminationCoordinator>) -> io::Result<JoinHandle<()>> {
    let set = watched();
    set.thread_block().map_err(io::Error::from)?;

    thread::Builder::new()
        .name("signal-watcher".into())
        .spawn(move || {
            loop {
                match set.wait() {
                    Ok(signal) => dispatch(signal, &coordinator),
                    Err(e) => {
                        error!("signal wait failed: {}", e);
                        return;
                    }
                }
            }
        })
}

/// Route one received signal to the coordinator.
pub fn dispatch(signal: Signal, coordinator: &TerminationCoordinator) {
    debug!("received {}", signal);
    match signal {
        Signal::SIGTERM => coordinator.terminate(),
        _ => coordinator.token().cancel(),
    }
}
