//! Hover tooltip: a bordered box centered on the screen showing the reading
//!
//! Every show is a fresh window; text is never updated in place.

use anyhow::{Context, Result};
use tracing::{debug, error};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

use crate::constants::{tooltip, wireless, x11};
use crate::geometry::Rect;
use crate::quality::LinkQuality;
use crate::x11_utils::{create_override_window, set_wm_class, window_cleanup, AppContext, Cleanup};

pub fn tooltip_text(quality: LinkQuality) -> String {
    format!(
        "Link Quality: {:2}% ({:2}/{:2})",
        quality.percent(),
        quality.value(),
        wireless::LINK_QUALITY_MAX
    )
}

/// Window placement and text origin for a measured string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipLayout {
    pub rect: Rect,
    pub text_x: i16,
    pub text_y: i16,
}

impl TooltipLayout {
    pub fn new(
        text_width: i32,
        ascent: i16,
        descent: i16,
        screen_width: u16,
        screen_height: u16,
    ) -> Self {
        let text_height = i32::from(ascent) + i32::from(descent);
        let margin_x = i32::from(tooltip::MARGIN_X);
        let margin_y = i32::from(tooltip::MARGIN_Y);

        let x = i32::from(screen_width) / 2 - (text_width / 2 + margin_x);
        let y = i32::from(screen_height) / 2 - (text_height / 2 + margin_y);
        let width = text_width + 2 * margin_x;
        let height = text_height + 2 * margin_y;

        Self {
            rect: Rect::new(x as i16, y as i16, width.max(1) as u16, height.max(1) as u16),
            text_x: tooltip::MARGIN_X,
            text_y: tooltip::MARGIN_Y + ascent,
        }
    }
}

/// A mapped tooltip window; dropping it destroys the window
#[derive(Debug)]
pub struct Tooltip<'a> {
    pub window: Window,
    gc: Gcontext,
    layout: TooltipLayout,
    text: String,
    conn: &'a RustConnection,
}

impl<'a> Tooltip<'a> {
    pub fn show(ctx: &AppContext<'a>, quality: LinkQuality) -> Result<Self> {
        let text = tooltip_text(quality);

        let font = ctx.conn.generate_id()
            .context("Failed to generate ID for tooltip font")?;
        ctx.conn.open_font(font, x11::TOOLTIP_FONT)
            .context("Failed to open tooltip font")?;
        // The gc keeps its own reference, so the font id goes away on every path
        let conn = ctx.conn;
        let _font = Cleanup::new(move || {
            if let Err(e) = conn.close_font(font) {
                error!("Failed to close font {}: {}", font, e);
            }
        });

        let extents = ctx.conn
            .query_text_extents(
                font,
                text.bytes()
                    .map(|c| Char2b { byte1: 0, byte2: c })
                    .collect::<Vec<_>>()
                    .as_slice(),
            )
            .context("Failed to send text extents query for tooltip")?
            .reply()
            .context("Failed to get text extents for tooltip")?;

        let layout = TooltipLayout::new(
            extents.overall_width,
            extents.font_ascent,
            extents.font_descent,
            ctx.screen.width_in_pixels,
            ctx.screen.height_in_pixels,
        );
        let Rect { x, y, width, height } = layout.rect;

        let window = create_override_window(
            ctx,
            x,
            y,
            width,
            height,
            tooltip::BORDER_WIDTH,
            CreateWindowAux::new()
                .background_pixel(ctx.screen.white_pixel)
                .border_pixel(ctx.screen.black_pixel)
                .event_mask(EventMask::EXPOSURE),
        )
        .context("Failed to create tooltip window")?;
        let window_guard = window_cleanup(ctx.conn, window);

        let gc = ctx.conn.generate_id()
            .context("Failed to generate ID for tooltip graphics context")?;
        ctx.conn.create_gc(
            gc,
            window,
            &CreateGCAux::new()
                .foreground(ctx.screen.black_pixel)
                .background(ctx.screen.white_pixel)
                .font(font),
        )
        .context("Failed to create tooltip graphics context")?;

        // Tooltip's Drop owns the window and gc from here
        window_guard.disarm();
        let tooltip = Self {
            window,
            gc,
            layout,
            text,
            conn: ctx.conn,
        };

        set_wm_class(ctx, window)?;
        ctx.conn.map_window(window)
            .context("Failed to map tooltip window")?;
        tooltip.draw()?;
        debug!(window = window, text = %tooltip.text, "Showing tooltip");

        Ok(tooltip)
    }

    pub fn draw(&self) -> Result<()> {
        self.conn.image_text8(
            self.window,
            self.gc,
            self.layout.text_x,
            self.layout.text_y,
            self.text.as_bytes(),
        )
        .context("Failed to draw tooltip text")?;
        self.conn.flush()
            .context("Failed to flush X11 connection after tooltip draw")?;
        Ok(())
    }
}

impl Drop for Tooltip<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.conn.free_gc(self.gc) {
            error!("Failed to free GC {}: {}", self.gc, e);
        }

        if let Err(e) = self.conn.destroy_window(self.window) {
            error!("Failed to destroy tooltip window {}: {}", self.window, e);
        }

        if let Err(e) = self.conn.flush() {
            error!("Failed to flush X11 connection during cleanup: {}", e);
        }
        debug!(window = self.window, "Destroyed tooltip");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_half_quality() {
        assert_eq!(tooltip_text(LinkQuality::new(46)), "Link Quality: 50% (46/92)");
    }

    #[test]
    fn test_text_extremes() {
        assert_eq!(tooltip_text(LinkQuality::MAX), "Link Quality: 100% (92/92)");
        assert_eq!(tooltip_text(LinkQuality::new(5)), "Link Quality:  5% ( 5/92)");
        assert_eq!(tooltip_text(LinkQuality::new(0)), "Link Quality:  0% ( 0/92)");
    }

    #[test]
    fn test_layout_centered_with_margins() {
        // "fixed" is 6px wide, 13px tall (ascent 10, descent 3)
        let layout = TooltipLayout::new(150, 10, 3, 1920, 1080);
        assert_eq!(layout.rect, Rect::new(1920 / 2 - (75 + 10), 1080 / 2 - (6 + 5), 170, 23));
        assert_eq!(layout.text_x, 10);
        assert_eq!(layout.text_y, 15);
    }

    #[test]
    fn test_layout_never_zero_sized() {
        let layout = TooltipLayout::new(0, 0, 0, 800, 600);
        assert!(!layout.rect.is_empty());
    }
}
