//! Scroll-to-caret math.
//!
//! The browser host measures the caret and its scroll container; this module
//! only decides where to scroll.

/// A client rect in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.y == 0.0 && self.height == 0.0
    }
}

/// The scroll container the caret sits in.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
    /// Client position of the container's inner (border-box minus border)
    /// top-left corner; zero for the window.
    pub origin_x: f64,
    pub origin_y: f64,
    pub padding_left: f64,
    pub padding_top: f64,
}

impl Viewport {
    pub fn window(scroll_x: f64, scroll_y: f64, width: f64, height: f64) -> Self {
        Self {
            scroll_x,
            scroll_y,
            width,
            height,
            ..Self::default()
        }
    }
}

/// Scroll position that brings `cursor` into view, or `None` if it is
/// already fully visible. Each axis is left alone when the caret fits;
/// otherwise it aligns the caret with the leading padding edge.
pub fn scroll_target(cursor: Rect, viewport: &Viewport) -> Option<(f64, f64)> {
    let cursor_left = cursor.x - viewport.origin_x + viewport.scroll_x;
    let cursor_top = cursor.y - viewport.origin_y + viewport.scroll_y;

    let x = if viewport.scroll_x < cursor_left
        && cursor_left + cursor.width + viewport.padding_left < viewport.scroll_x + viewport.width
    {
        viewport.scroll_x
    } else {
        cursor_left - viewport.padding_left
    };
    let y = if viewport.scroll_y < cursor_top
        && cursor_top + cursor.height + viewport.padding_top < viewport.scroll_y + viewport.height
    {
        viewport.scroll_y
    } else {
        cursor_top - viewport.padding_top
    };

    (x != viewport.scroll_x || y != viewport.scroll_y).then_some((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_caret_needs_no_scroll() {
        let viewport = Viewport::window(0.0, 100.0, 800.0, 600.0);
        assert_eq!(scroll_target(Rect::new(20.0, 50.0, 1.0, 18.0), &viewport), None);
    }

    #[test]
    fn test_caret_below_window_scrolls_down() {
        let viewport = Viewport::window(0.0, 100.0, 800.0, 600.0);
        let target = scroll_target(Rect::new(20.0, 700.0, 1.0, 18.0), &viewport);
        assert_eq!(target, Some((0.0, 800.0)));
    }

    #[test]
    fn test_container_offsets_and_padding() {
        let viewport = Viewport {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width: 300.0,
            height: 200.0,
            origin_x: 10.0,
            origin_y: 50.0,
            padding_left: 4.0,
            padding_top: 8.0,
        };
        // caret at container-local (40, 300): below the fold
        let target = scroll_target(Rect::new(50.0, 350.0, 1.0, 16.0), &viewport);
        assert_eq!(target, Some((0.0, 292.0)));
    }
}
