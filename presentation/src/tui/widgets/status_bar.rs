//! Status bar widget: key hints

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

pub struct StatusBarWidget {
    pending: bool,
    feedback_open: bool,
}

impl StatusBarWidget {
    pub fn new(pending: bool, feedback_open: bool) -> Self {
        Self {
            pending,
            feedback_open,
        }
    }

    fn hints(&self) -> &'static str {
        if self.feedback_open {
            "g: good | b: bad | Esc: close"
        } else if self.pending {
            "Waiting for reply... | PgUp/PgDn: scroll | Ctrl+C: quit"
        } else {
            "Enter: send | Ctrl+F: feedback | PgUp/PgDn: scroll | Ctrl+C: quit"
        }
    }
}

impl Widget for StatusBarWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mode = if self.feedback_open { " FEEDBACK " } else { " CHAT " };
        let mode_color = if self.feedback_open {
            Color::Magenta
        } else {
            Color::Blue
        };

        let line = Line::from(vec![
            Span::styled(
                mode,
                Style::default()
                    .fg(Color::Black)
                    .bg(mode_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(self.hints(), Style::default().fg(Color::White)),
        ]);

        Paragraph::new(line)
            .style(Style::default().bg(Color::DarkGray))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_follow_mode() {
        assert!(StatusBarWidget::new(false, true).hints().contains("g: good"));
        assert!(StatusBarWidget::new(true, false).hints().starts_with("Waiting"));
        assert!(StatusBarWidget::new(false, false).hints().contains("Ctrl+F"));
    }
}
