//! Timer and signal sources, delivered as client messages on the X event
//! queue so the main loop handles them in order with window events

use anyhow::{Context, Result};
use signal_hook::consts::TERM_SIGNALS;
use signal_hook::flag;
use signal_hook::iterator::{Handle, Signals};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread::{Scope, ScopedJoinHandle};
use std::time::Duration;
use tracing::{debug, error, info};
use x11rb::protocol::xproto::{Atom, Window};
use x11rb::rust_connection::RustConnection;

use crate::x11_utils::send_client_message;

/// Post a `tick` message to `window` every `interval` until `stop` fires
/// (a message arrives or every sender is dropped)
pub fn spawn_ticker<'scope, 'env>(
    scope: &'scope Scope<'scope, 'env>,
    conn: &'env RustConnection,
    window: Window,
    tick: Atom,
    interval: Duration,
    stop: Receiver<()>,
) -> ScopedJoinHandle<'scope, ()> {
    scope.spawn(move || {
        debug!(interval = ?interval, "Ticker started");
        loop {
            match stop.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if let Err(e) = send_client_message(conn, window, tick) {
                        error!(error = ?e, "Failed to post timer tick, stopping ticker");
                        break;
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!("Ticker stopped");
    })
}

/// Keeps the forwarding thread alive; [`SignalForwarder::close`] ends it
pub struct SignalForwarder {
    handle: Handle,
}

impl SignalForwarder {
    pub fn close(&self) {
        self.handle.close();
    }
}

/// Forward the first SIGINT/SIGTERM/SIGQUIT to `window` as a `shutdown`
/// message. A second signal terminates the process immediately.
pub fn spawn_signal_forwarder<'scope, 'env>(
    scope: &'scope Scope<'scope, 'env>,
    conn: &'env RustConnection,
    window: Window,
    shutdown: Atom,
) -> Result<SignalForwarder> {
    let term_requested = Arc::new(AtomicBool::new(false));
    for signal in TERM_SIGNALS {
        // Order matters: the conditional check must see the flag from a previous signal
        flag::register_conditional_shutdown(*signal, 1, Arc::clone(&term_requested))
            .context(format!("Failed to register shutdown hook for signal {}", signal))?;
        flag::register(*signal, Arc::clone(&term_requested))
            .context(format!("Failed to register flag for signal {}", signal))?;
    }

    let mut signals = Signals::new(TERM_SIGNALS)
        .context("Failed to register signal iterator")?;
    let handle = signals.handle();

    scope.spawn(move || {
        if let Some(signal) = signals.forever().next() {
            info!(signal = signal, "Received termination signal");
            if let Err(e) = send_client_message(conn, window, shutdown) {
                error!(error = ?e, "Failed to post shutdown request");
            }
        }
    });

    Ok(SignalForwarder { handle })
}
