//! Bar placement and the filled/unfilled split

use crate::config::Edge;
use crate::quality::LinkQuality;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(x: i16, y: i16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// The two rectangles painted on every repaint, in bar-window coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segments {
    pub filled: Rect,
    pub unfilled: Rect,
}

/// Position and size of the bar window, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarGeometry {
    pub edge: Edge,
    pub rect: Rect,
}

impl BarGeometry {
    /// Dock a `thickness` pixel bar along `edge` of a `screen_width` x
    /// `screen_height` root window
    pub fn new(edge: Edge, thickness: u16, screen_width: u16, screen_height: u16) -> Self {
        let thickness = thickness.max(1);
        let rect = match edge {
            Edge::Top => Rect::new(0, 0, screen_width, thickness),
            Edge::Bottom => Rect::new(
                0,
                screen_height.saturating_sub(thickness) as i16,
                screen_width,
                thickness,
            ),
            Edge::Left => Rect::new(0, 0, thickness, screen_height),
            Edge::Right => Rect::new(
                screen_width.saturating_sub(thickness) as i16,
                0,
                thickness,
                screen_height,
            ),
        };
        Self { edge, rect }
    }

    /// Length of the axis the reading is drawn along
    pub fn span(&self) -> u16 {
        if self.edge.is_horizontal() {
            self.rect.width
        } else {
            self.rect.height
        }
    }

    /// Pixels of span painted with the "on" color
    pub fn filled_len(&self, quality: LinkQuality) -> u16 {
        let span = self.span();
        let filled = (quality.ratio() * f64::from(span)).round() as u16;
        filled.min(span)
    }

    /// Split the bar for `quality`. Horizontal bars fill from the left,
    /// vertical bars fill upward from the bottom.
    pub fn segments(&self, quality: LinkQuality) -> Segments {
        let Rect { width, height, .. } = self.rect;
        let filled = self.filled_len(quality);
        let unfilled = self.span() - filled;

        if self.edge.is_horizontal() {
            Segments {
                filled: Rect::new(0, 0, filled, height),
                unfilled: Rect::new(filled as i16, 0, unfilled, height),
            }
        } else {
            Segments {
                filled: Rect::new(0, unfilled as i16, width, filled),
                unfilled: Rect::new(0, 0, width, unfilled),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN_W: u16 = 1920;
    const SCREEN_H: u16 = 1080;

    #[test]
    fn test_placement_per_edge() {
        assert_eq!(
            BarGeometry::new(Edge::Top, 2, SCREEN_W, SCREEN_H).rect,
            Rect::new(0, 0, 1920, 2)
        );
        assert_eq!(
            BarGeometry::new(Edge::Bottom, 2, SCREEN_W, SCREEN_H).rect,
            Rect::new(0, 1078, 1920, 2)
        );
        assert_eq!(
            BarGeometry::new(Edge::Left, 3, SCREEN_W, SCREEN_H).rect,
            Rect::new(0, 0, 3, 1080)
        );
        assert_eq!(
            BarGeometry::new(Edge::Right, 3, SCREEN_W, SCREEN_H).rect,
            Rect::new(1917, 0, 3, 1080)
        );
    }

    #[test]
    fn test_span_is_long_axis_for_every_edge() {
        assert_eq!(BarGeometry::new(Edge::Top, 2, SCREEN_W, SCREEN_H).span(), 1920);
        assert_eq!(BarGeometry::new(Edge::Bottom, 2, SCREEN_W, SCREEN_H).span(), 1920);
        assert_eq!(BarGeometry::new(Edge::Left, 2, SCREEN_W, SCREEN_H).span(), 1080);
        assert_eq!(BarGeometry::new(Edge::Right, 2, SCREEN_W, SCREEN_H).span(), 1080);
    }

    #[test]
    fn test_filled_plus_unfilled_is_span() {
        for edge in [Edge::Top, Edge::Left, Edge::Bottom, Edge::Right] {
            let geometry = BarGeometry::new(edge, 2, 1366, 768);
            let span = geometry.span();
            for q in 0..=92 {
                let quality = LinkQuality::new(q);
                let filled = geometry.filled_len(quality);
                let expected = (f64::from(q as u8) / 92.0 * f64::from(span)).round() as u16;
                assert_eq!(filled, expected, "edge={edge} q={q}");
                assert!(filled <= span);

                let segments = geometry.segments(quality);
                let along = |r: Rect| if edge.is_horizontal() { r.width } else { r.height };
                assert_eq!(along(segments.filled) + along(segments.unfilled), span);
            }
        }
    }

    #[test]
    fn test_empty_bar_is_all_off() {
        let geometry = BarGeometry::new(Edge::Right, 2, SCREEN_W, SCREEN_H);
        let segments = geometry.segments(LinkQuality::new(0));
        assert!(segments.filled.is_empty());
        assert_eq!(segments.unfilled, Rect::new(0, 0, 2, 1080));
    }

    #[test]
    fn test_full_bar_is_all_on() {
        let geometry = BarGeometry::new(Edge::Top, 2, SCREEN_W, SCREEN_H);
        let segments = geometry.segments(LinkQuality::MAX);
        assert_eq!(segments.filled, Rect::new(0, 0, 1920, 2));
        assert!(segments.unfilled.is_empty());
    }

    #[test]
    fn test_half_bar() {
        let geometry = BarGeometry::new(Edge::Bottom, 2, SCREEN_W, SCREEN_H);
        let segments = geometry.segments(LinkQuality::new(46));
        assert_eq!(segments.filled, Rect::new(0, 0, 960, 2));
        assert_eq!(segments.unfilled, Rect::new(960, 0, 960, 2));
    }

    #[test]
    fn test_vertical_fills_from_bottom() {
        let geometry = BarGeometry::new(Edge::Left, 2, SCREEN_W, SCREEN_H);
        let segments = geometry.segments(LinkQuality::new(46));
        assert_eq!(segments.filled, Rect::new(0, 540, 2, 540));
        assert_eq!(segments.unfilled, Rect::new(0, 0, 2, 540));
    }

    #[test]
    fn test_thickness_floor() {
        let geometry = BarGeometry::new(Edge::Top, 0, SCREEN_W, SCREEN_H);
        assert_eq!(geometry.rect.height, 1);
    }
}
