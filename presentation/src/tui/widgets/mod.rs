//! TUI widgets and screen layout

pub mod conversation;
pub mod feedback;
pub mod header;
pub mod input;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Areas of the main screen, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainLayout {
    pub header: Rect,
    pub conversation: Rect,
    pub input: Rect,
    pub status_bar: Rect,
}

impl MainLayout {
    pub fn compute(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            header: chunks[0],
            conversation: chunks[1],
            input: chunks[2],
            status_bar: chunks[3],
        }
    }

    /// A rectangle `percent_x` by `percent_y` of `area`, centered in it.
    pub fn centered_overlay(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(area);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(vertical[1])[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_fills_area() {
        let layout = MainLayout::compute(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.input.height, 3);
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.conversation.height, 24 - 3 - 3 - 1);
        assert_eq!(layout.status_bar.y, 23);
    }

    #[test]
    fn test_centered_overlay_is_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let overlay = MainLayout::centered_overlay(50, 30, area);
        assert_eq!(overlay.width, 50);
        assert_eq!(overlay.height, 12);
        assert_eq!(overlay.x, 25);
        assert!(area.contains(overlay.as_position()));
    }
}
