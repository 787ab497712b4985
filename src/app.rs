//! Widget state and the transitions driven by the event loop
//!
//! [`App`] owns everything that changes at runtime: the last link quality and
//! whether the tooltip is up. Drawing goes through [`Surface`], so the
//! transitions can be exercised without an X server.

use anyhow::Result;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::quality::{LinkQuality, QualityReader};

/// Drawing operations the widget needs from the windowing system
pub trait Surface {
    fn redraw_bar(&mut self, quality: LinkQuality) -> Result<()>;
    fn raise_bar(&mut self) -> Result<()>;
    fn show_tooltip(&mut self, quality: LinkQuality) -> Result<()>;
    /// No-op when nothing is shown
    fn hide_tooltip(&mut self);
    fn redraw_tooltip(&mut self) -> Result<()>;
}

/// Everything the event loop can feed into the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    BarExposed,
    TooltipExposed,
    VisibilityChanged,
    PointerEntered,
    PointerLeft,
    Tick,
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct App<S: Surface> {
    config: Config,
    reader: QualityReader,
    quality: LinkQuality,
    tooltip_visible: bool,
    surface: S,
}

impl<S: Surface> App<S> {
    pub fn new(config: Config, surface: S) -> Self {
        let reader = QualityReader::new(config.wireless_path.clone(), config.interface.clone());
        Self {
            config,
            reader,
            quality: LinkQuality::default(),
            tooltip_visible: false,
            surface,
        }
    }

    pub fn quality(&self) -> LinkQuality {
        self.quality
    }

    pub fn tooltip_visible(&self) -> bool {
        self.tooltip_visible
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Initial poll and paint before the first event arrives
    pub fn start(&mut self) -> Result<()> {
        self.poll();
        self.surface.redraw_bar(self.quality)?;
        info!(
            interface = %self.reader.interface(),
            quality = %self.quality,
            "Bar running"
        );
        Ok(())
    }

    pub fn handle(&mut self, event: AppEvent) -> Result<Flow> {
        match event {
            AppEvent::BarExposed => self.surface.redraw_bar(self.quality)?,
            AppEvent::TooltipExposed => {
                if self.tooltip_visible {
                    self.surface.redraw_tooltip()?;
                }
            }
            AppEvent::VisibilityChanged => {
                if self.config.always_on_top {
                    self.surface.raise_bar()?;
                }
            }
            AppEvent::PointerEntered => self.show_tooltip()?,
            AppEvent::PointerLeft => self.hide_tooltip(),
            AppEvent::Tick => {
                self.poll();
                self.surface.redraw_bar(self.quality)?;
                if self.tooltip_visible {
                    self.hide_tooltip();
                    self.show_tooltip()?;
                }
            }
            AppEvent::Shutdown => {
                info!("Shutting down");
                self.hide_tooltip();
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    /// Refresh the reading; on failure the last value stays
    fn poll(&mut self) {
        match self.reader.poll(self.quality) {
            Ok(quality) => {
                if quality != self.quality {
                    debug!(old = %self.quality, new = %quality, "Link quality changed");
                }
                self.quality = quality;
            }
            Err(e) => error!(error = ?e, "Failed to read link quality"),
        }
    }

    fn show_tooltip(&mut self) -> Result<()> {
        // Replace rather than stack if the server sends a second enter
        if self.tooltip_visible {
            self.hide_tooltip();
        }
        self.surface.show_tooltip(self.quality)?;
        self.tooltip_visible = true;
        Ok(())
    }

    fn hide_tooltip(&mut self) {
        self.surface.hide_tooltip();
        self.tooltip_visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Edge;
    use crate::geometry::BarGeometry;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        RedrawBar(LinkQuality),
        RaiseBar,
        ShowTooltip(LinkQuality),
        HideTooltip,
        RedrawTooltip,
    }

    #[derive(Default)]
    struct RecordingSurface {
        calls: Vec<Call>,
    }

    impl Surface for RecordingSurface {
        fn redraw_bar(&mut self, quality: LinkQuality) -> Result<()> {
            self.calls.push(Call::RedrawBar(quality));
            Ok(())
        }
        fn raise_bar(&mut self) -> Result<()> {
            self.calls.push(Call::RaiseBar);
            Ok(())
        }
        fn show_tooltip(&mut self, quality: LinkQuality) -> Result<()> {
            self.calls.push(Call::ShowTooltip(quality));
            Ok(())
        }
        fn hide_tooltip(&mut self) {
            self.calls.push(Call::HideTooltip);
        }
        fn redraw_tooltip(&mut self) -> Result<()> {
            self.calls.push(Call::RedrawTooltip);
            Ok(())
        }
    }

    fn stats_file(link: u8) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "Inter-| sta-|   Quality\n face | tus | link level noise\n wlan0: 0000   {link}.  -40.  -256\n"
        )
        .unwrap();
        file
    }

    fn rewrite(file: &NamedTempFile, link: u8) {
        std::fs::write(
            file.path(),
            format!("h1\nh2\n wlan0: 0000   {link}.  -40.  -256\n"),
        )
        .unwrap();
    }

    fn app_for(file: &NamedTempFile, always_on_top: bool) -> App<RecordingSurface> {
        let config = Config {
            interface: "wlan0".to_string(),
            wireless_path: file.path().to_path_buf(),
            always_on_top,
            ..Config::default()
        };
        App::new(config, RecordingSurface::default())
    }

    fn take_calls(app: &mut App<RecordingSurface>) -> Vec<Call> {
        std::mem::take(&mut app.surface.calls)
    }

    #[test]
    fn test_start_polls_then_paints() {
        let file = stats_file(46);
        let mut app = app_for(&file, false);
        app.start().unwrap();

        assert_eq!(app.quality(), LinkQuality::new(46));
        assert_eq!(take_calls(&mut app), vec![Call::RedrawBar(LinkQuality::new(46))]);
    }

    #[test]
    fn test_expose_repaints_current_value() {
        let file = stats_file(30);
        let mut app = app_for(&file, false);
        app.start().unwrap();
        take_calls(&mut app);

        assert_eq!(app.handle(AppEvent::BarExposed).unwrap(), Flow::Continue);
        assert_eq!(take_calls(&mut app), vec![Call::RedrawBar(LinkQuality::new(30))]);
    }

    #[test]
    fn test_visibility_raises_only_when_on_top() {
        let file = stats_file(30);

        let mut app = app_for(&file, false);
        app.handle(AppEvent::VisibilityChanged).unwrap();
        assert!(take_calls(&mut app).is_empty());

        let mut app = app_for(&file, true);
        app.handle(AppEvent::VisibilityChanged).unwrap();
        assert_eq!(take_calls(&mut app), vec![Call::RaiseBar]);
    }

    #[test]
    fn test_hover_shows_and_hides_tooltip() {
        let file = stats_file(46);
        let mut app = app_for(&file, false);
        app.start().unwrap();
        take_calls(&mut app);

        app.handle(AppEvent::PointerEntered).unwrap();
        assert!(app.tooltip_visible());
        assert_eq!(take_calls(&mut app), vec![Call::ShowTooltip(LinkQuality::new(46))]);

        app.handle(AppEvent::PointerLeft).unwrap();
        assert!(!app.tooltip_visible());
        assert_eq!(take_calls(&mut app), vec![Call::HideTooltip]);

        // Hiding again is harmless
        app.handle(AppEvent::PointerLeft).unwrap();
        assert!(!app.tooltip_visible());
    }

    #[test]
    fn test_tick_without_tooltip() {
        let file = stats_file(10);
        let mut app = app_for(&file, false);
        app.start().unwrap();
        take_calls(&mut app);

        rewrite(&file, 92);
        app.handle(AppEvent::Tick).unwrap();
        assert_eq!(take_calls(&mut app), vec![Call::RedrawBar(LinkQuality::MAX)]);
    }

    #[test]
    fn test_tick_recreates_visible_tooltip() {
        let file = stats_file(10);
        let mut app = app_for(&file, false);
        app.start().unwrap();
        app.handle(AppEvent::PointerEntered).unwrap();
        take_calls(&mut app);

        rewrite(&file, 46);
        app.handle(AppEvent::Tick).unwrap();
        assert_eq!(
            take_calls(&mut app),
            vec![
                Call::RedrawBar(LinkQuality::new(46)),
                Call::HideTooltip,
                Call::ShowTooltip(LinkQuality::new(46)),
            ]
        );
        assert!(app.tooltip_visible());
    }

    #[test]
    fn test_tick_with_unreadable_file_keeps_value() {
        let file = stats_file(50);
        let mut app = app_for(&file, false);
        app.start().unwrap();
        take_calls(&mut app);

        std::fs::remove_file(file.path()).unwrap();
        app.handle(AppEvent::Tick).unwrap();
        assert_eq!(app.quality(), LinkQuality::new(50));
        assert_eq!(take_calls(&mut app), vec![Call::RedrawBar(LinkQuality::new(50))]);
    }

    #[test]
    fn test_tooltip_expose_redraws_only_when_visible() {
        let file = stats_file(50);
        let mut app = app_for(&file, false);

        app.handle(AppEvent::TooltipExposed).unwrap();
        assert!(take_calls(&mut app).is_empty());

        app.handle(AppEvent::PointerEntered).unwrap();
        take_calls(&mut app);
        app.handle(AppEvent::TooltipExposed).unwrap();
        assert_eq!(take_calls(&mut app), vec![Call::RedrawTooltip]);
    }

    #[test]
    fn test_shutdown_exits_and_hides() {
        let file = stats_file(50);
        let mut app = app_for(&file, false);
        app.handle(AppEvent::PointerEntered).unwrap();
        take_calls(&mut app);

        assert_eq!(app.handle(AppEvent::Shutdown).unwrap(), Flow::Exit);
        assert!(!app.tooltip_visible());
        assert_eq!(take_calls(&mut app), vec![Call::HideTooltip]);
    }

    #[test]
    fn test_end_to_end_bar_split() {
        // Pixel-level expectations for the repaints the app requests
        let geometry = BarGeometry::new(Edge::Right, 2, 1920, 1080);
        let file = stats_file(0);
        let mut app = app_for(&file, false);

        app.start().unwrap();
        let segments = geometry.segments(app.quality());
        assert!(segments.filled.is_empty());
        assert_eq!(segments.unfilled.height, 1080);

        rewrite(&file, 92);
        app.handle(AppEvent::Tick).unwrap();
        let segments = geometry.segments(app.quality());
        assert_eq!(segments.filled.height, 1080);
        assert!(segments.unfilled.is_empty());

        rewrite(&file, 46);
        app.handle(AppEvent::Tick).unwrap();
        let segments = geometry.segments(app.quality());
        assert_eq!(segments.filled.height, 540);
        assert_eq!(segments.unfilled.height, 540);
    }
}
