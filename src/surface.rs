use anyhow::Result;
use x11rb::protocol::xproto::Window;

use crate::app::Surface;
use crate::bar::BarWindow;
use crate::quality::LinkQuality;
use crate::tooltip::Tooltip;
use crate::x11_utils::AppContext;

/// X11 backing for the widget: the bar plus at most one tooltip
pub struct X11Surface<'a> {
    ctx: AppContext<'a>,
    bar: BarWindow<'a>,
    tooltip: Option<Tooltip<'a>>,
}

impl<'a> X11Surface<'a> {
    pub fn new(ctx: AppContext<'a>, bar: BarWindow<'a>) -> Self {
        Self {
            ctx,
            bar,
            tooltip: None,
        }
    }

    pub fn bar_window(&self) -> Window {
        self.bar.window
    }

    pub fn tooltip_window(&self) -> Option<Window> {
        self.tooltip.as_ref().map(|tooltip| tooltip.window)
    }
}

impl Surface for X11Surface<'_> {
    fn redraw_bar(&mut self, quality: LinkQuality) -> Result<()> {
        self.bar.redraw(quality)
    }

    fn raise_bar(&mut self) -> Result<()> {
        self.bar.raise()
    }

    fn show_tooltip(&mut self, quality: LinkQuality) -> Result<()> {
        self.tooltip = Some(Tooltip::show(&self.ctx, quality)?);
        Ok(())
    }

    fn hide_tooltip(&mut self) {
        // Drop destroys the window
        self.tooltip = None;
    }

    fn redraw_tooltip(&mut self) -> Result<()> {
        match &self.tooltip {
            Some(tooltip) => tooltip.draw(),
            None => Ok(()),
        }
    }
}
