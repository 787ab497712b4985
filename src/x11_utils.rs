use anyhow::{Context, Result};
use tracing::{debug, error};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as WrapperExt;

use crate::constants::{program, x11};

/// Application context holding immutable shared state
#[derive(Clone, Copy)]
pub struct AppContext<'a> {
    pub conn: &'a RustConnection,
    pub screen: &'a Screen,
    pub atoms: &'a CachedAtoms,
}

/// Pre-cached X11 atoms to avoid repeated roundtrips
#[derive(Debug, Clone, Copy)]
pub struct CachedAtoms {
    pub wm_class: Atom,
    pub tick: Atom,
    pub shutdown: Atom,
}

impl CachedAtoms {
    pub fn new(conn: &RustConnection) -> Result<Self> {
        Ok(Self {
            wm_class: intern(conn, b"WM_CLASS")?,
            tick: intern(conn, x11::TICK_ATOM)?,
            shutdown: intern(conn, x11::SHUTDOWN_ATOM)?,
        })
    }
}

fn intern(conn: &RustConnection, name: &[u8]) -> Result<Atom> {
    let printable = String::from_utf8_lossy(name);
    Ok(conn
        .intern_atom(false, name)
        .context(format!("Failed to intern {} atom", printable))?
        .reply()
        .context(format!("Failed to get reply for {} atom", printable))?
        .atom)
}

/// Releases a server resource when dropped unless [`Cleanup::disarm`] was
/// called. Covers the early `?` returns while a window is being assembled.
pub struct Cleanup<F: FnOnce()> {
    release: Option<F>,
}

impl<F: FnOnce()> Cleanup<F> {
    pub fn new(release: F) -> Self {
        Self { release: Some(release) }
    }

    /// Ownership moved elsewhere; do nothing on drop
    pub fn disarm(mut self) {
        self.release = None;
    }
}

impl<F: FnOnce()> Drop for Cleanup<F> {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// Guard that destroys `window` unless disarmed
pub fn window_cleanup(conn: &RustConnection, window: Window) -> Cleanup<impl FnOnce() + '_> {
    Cleanup::new(move || {
        if let Err(e) = conn.destroy_window(window) {
            error!("Failed to cleanup window {} after initialization failure: {}", window, e);
        }
        // Flush to ensure cleanup is sent to server
        let _ = conn.flush();
    })
}

/// Resolve a color name (`"green"`, `"#00ff00"`, ...) to a pixel value in
/// the screen's default colormap
pub fn alloc_named_color(conn: &RustConnection, screen: &Screen, name: &str) -> Result<u32> {
    let reply = conn
        .alloc_named_color(screen.default_colormap, name.as_bytes())
        .context(format!("Failed to send color allocation for '{}'", name))?
        .reply()
        .context(format!("couldn't allocate color '{}'", name))?;
    debug!(color = %name, pixel = reply.pixel, "Allocated named color");
    Ok(reply.pixel)
}

/// Create an unmanaged (override-redirect) top-level window
pub fn create_override_window(
    ctx: &AppContext,
    x: i16,
    y: i16,
    width: u16,
    height: u16,
    border_width: u16,
    aux: CreateWindowAux,
) -> Result<Window> {
    let window = ctx.conn.generate_id()
        .context("Failed to generate X11 window ID")?;
    ctx.conn.create_window(
        ctx.screen.root_depth,
        window,
        ctx.screen.root,
        x,
        y,
        width,
        height,
        border_width,
        WindowClass::INPUT_OUTPUT,
        ctx.screen.root_visual,
        &aux.override_redirect(x11::OVERRIDE_REDIRECT),
    )
    .context(format!("Failed to create {}x{} window at ({}, {})", width, height, x, y))?;

    Ok(window)
}

/// Tag `window` with our WM_CLASS so compositors can match it
pub fn set_wm_class(ctx: &AppContext, window: Window) -> Result<()> {
    ctx.conn.change_property8(
        PropMode::REPLACE,
        window,
        ctx.atoms.wm_class,
        AtomEnum::STRING,
        program::WM_CLASS,
    )
    .context(format!("Failed to set WM_CLASS for window {}", window))?;
    Ok(())
}

/// Deliver a client message of type `message` to the client owning `window`
pub fn send_client_message(conn: &RustConnection, window: Window, message: Atom) -> Result<()> {
    let event = ClientMessageEvent {
        response_type: CLIENT_MESSAGE_EVENT,
        format: 32,
        sequence: 0,
        window,
        type_: message,
        data: ClientMessageData::from([0u32; 5]),
    };

    // An empty event mask routes the event to the window's creator, i.e. us
    conn.send_event(false, window, EventMask::NO_EVENT, event)
        .context(format!("Failed to send client message to window {}", window))?;
    conn.flush()
        .context("Failed to flush X11 connection after client message")?;
    Ok(())
}
