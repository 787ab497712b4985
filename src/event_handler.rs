use anyhow::{Context, Result};
use tracing::{debug, error, warn};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::Window;
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;

use crate::app::{App, AppEvent, Flow};
use crate::surface::X11Surface;
use crate::x11_utils::CachedAtoms;

/// Map a raw X event onto the widget's vocabulary; `None` for anything the
/// widget does not care about
pub fn translate(
    event: &Event,
    bar: Window,
    tooltip: Option<Window>,
    atoms: &CachedAtoms,
) -> Option<AppEvent> {
    match event {
        // Only the last of a series, the whole bar is repainted anyway
        Event::Expose(event) if event.count == 0 => {
            if event.window == bar {
                Some(AppEvent::BarExposed)
            } else if Some(event.window) == tooltip {
                Some(AppEvent::TooltipExposed)
            } else {
                None
            }
        }
        Event::VisibilityNotify(event) if event.window == bar => Some(AppEvent::VisibilityChanged),
        Event::EnterNotify(event) if event.event == bar => Some(AppEvent::PointerEntered),
        Event::LeaveNotify(event) if event.event == bar => Some(AppEvent::PointerLeft),
        Event::ClientMessage(event) if event.window == bar => {
            if event.type_ == atoms.tick {
                Some(AppEvent::Tick)
            } else if event.type_ == atoms.shutdown {
                Some(AppEvent::Shutdown)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Block on the X connection and dispatch until a shutdown request arrives
pub fn run_event_loop(
    conn: &RustConnection,
    atoms: &CachedAtoms,
    app: &mut App<X11Surface<'_>>,
) -> Result<()> {
    loop {
        let event = conn.wait_for_event()
            .context("Failed to wait for X11 event")?;

        if let Event::Error(err) = &event {
            warn!(error = ?err, "X11 error");
            continue;
        }

        let surface = app.surface();
        let Some(app_event) = translate(&event, surface.bar_window(), surface.tooltip_window(), atoms)
        else {
            continue;
        };
        debug!(event = ?app_event, "Dispatching");

        match app.handle(app_event) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => return Ok(()),
            Err(err) => error!(error = ?err, event = ?app_event, "Event handling error"),
        }
    }
}
