use anyhow::{Context, Result};
use tracing::{error, info, trace};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

use crate::geometry::{BarGeometry, Rect};
use crate::quality::LinkQuality;
use crate::x11_utils::{alloc_named_color, create_override_window, set_wm_class, window_cleanup, AppContext};

/// Pixel values for the two bar segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub on: u32,
    pub off: u32,
}

impl Palette {
    /// Resolve both color names; either failing is fatal at startup
    pub fn alloc(ctx: &AppContext, on: &str, off: &str) -> Result<Self> {
        let on = alloc_named_color(ctx.conn, ctx.screen, on)
            .context("couldn't allocate color resources")?;
        let off = alloc_named_color(ctx.conn, ctx.screen, off)
            .context("couldn't allocate color resources")?;
        Ok(Self { on, off })
    }
}

/// The always-mapped strip along the screen edge
#[derive(Debug)]
pub struct BarWindow<'a> {
    pub window: Window,
    pub geometry: BarGeometry,
    gc: Gcontext,
    palette: Palette,
    conn: &'a RustConnection,
}

impl<'a> BarWindow<'a> {
    pub fn new(ctx: &AppContext<'a>, geometry: BarGeometry, palette: Palette) -> Result<Self> {
        let Rect { x, y, width, height } = geometry.rect;
        let window = create_override_window(
            ctx,
            x,
            y,
            width,
            height,
            0,
            CreateWindowAux::new()
                .background_pixel(ctx.screen.black_pixel)
                .event_mask(
                    EventMask::VISIBILITY_CHANGE
                        | EventMask::EXPOSURE
                        | EventMask::ENTER_WINDOW
                        | EventMask::LEAVE_WINDOW,
                ),
        )
        .context(format!("Failed to create bar window on {} edge", geometry.edge))?;
        let window_guard = window_cleanup(ctx.conn, window);

        let gc = ctx.conn.generate_id()
            .context("Failed to generate ID for bar graphics context")?;
        ctx.conn.create_gc(gc, window, &CreateGCAux::new().foreground(palette.on))
            .context("Failed to create bar graphics context")?;

        // From here on Drop releases the window and gc
        window_guard.disarm();
        let bar = Self {
            window,
            geometry,
            gc,
            palette,
            conn: ctx.conn,
        };

        set_wm_class(ctx, window)?;
        ctx.conn.map_window(window)
            .context("Failed to map bar window")?;
        ctx.conn.flush()
            .context("Failed to flush X11 connection after mapping bar")?;
        info!(
            window = window,
            edge = %geometry.edge,
            x = x,
            y = y,
            width = width,
            height = height,
            "Mapped bar window"
        );

        Ok(bar)
    }

    /// Paint both segments for `quality`. Safe to call at any time.
    pub fn redraw(&self, quality: LinkQuality) -> Result<()> {
        let segments = self.geometry.segments(quality);
        trace!(quality = %quality, segments = ?segments, "Repainting bar");

        self.fill(self.palette.on, segments.filled)?;
        self.fill(self.palette.off, segments.unfilled)?;
        self.conn.flush()
            .context("Failed to flush X11 connection after bar repaint")?;
        Ok(())
    }

    fn fill(&self, pixel: u32, rect: Rect) -> Result<()> {
        if rect.is_empty() {
            return Ok(());
        }
        self.conn.change_gc(self.gc, &ChangeGCAux::new().foreground(pixel))
            .context("Failed to set bar foreground")?;
        self.conn.poly_fill_rectangle(
            self.window,
            self.gc,
            &[Rectangle {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
            }],
        )
        .context("Failed to fill bar segment")?;
        Ok(())
    }

    /// Restack above all siblings
    pub fn raise(&self) -> Result<()> {
        self.conn.configure_window(
            self.window,
            &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE),
        )
        .context(format!("Failed to raise bar window {}", self.window))?;
        self.conn.flush()
            .context("Failed to flush X11 connection after raise")?;
        Ok(())
    }
}

impl Drop for BarWindow<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.conn.free_gc(self.gc) {
            error!("Failed to free GC {}: {}", self.gc, e);
        }

        if let Err(e) = self.conn.destroy_window(self.window) {
            error!("Failed to destroy bar window {}: {}", self.window, e);
        }

        if let Err(e) = self.conn.flush() {
            error!("Failed to flush X11 connection during cleanup: {}", e);
        }
    }
}
