// Layout constants for the page chrome and the floating panel

use ratatui::layout::Rect;

/// Horizontal padding for page content
pub const CONTENT_PADDING_H: u16 = 2;

/// Nav bar height (top)
pub const NAV_HEIGHT: u16 = 1;

/// Footer height (hints + launcher)
pub const FOOTER_HEIGHT: u16 = 1;

/// Panel size; clamped to the terminal
pub const PANEL_WIDTH: u16 = 56;
pub const PANEL_HEIGHT_PERCENT: u16 = 80;

/// Composer height including borders
pub const COMPOSER_HEIGHT: u16 = 3;

/// Panel anchored bottom-right above the launcher, the way the site floats it.
pub fn panel_area(page: Rect) -> Rect {
    let width = PANEL_WIDTH.min(page.width);
    let scaled = (u32::from(page.height) * u32::from(PANEL_HEIGHT_PERCENT) / 100) as u16;
    let height = scaled.max(8).min(page.height);
    Rect {
        x: page.x + page.width - width,
        y: page.y + page.height - height,
        width,
        height,
    }
}
