//! Header widget: assistant name, endpoint and activity

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct HeaderWidget<'a> {
    base_url: &'a str,
    pending: bool,
}

impl<'a> HeaderWidget<'a> {
    pub fn new(base_url: &'a str, pending: bool) -> Self {
        Self { base_url, pending }
    }
}

impl Widget for HeaderWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (activity, activity_color) = if self.pending {
            ("Thinking", Color::Yellow)
        } else {
            ("Ready", Color::Green)
        };

        let line = Line::from(vec![
            Span::styled("◉ ", Style::default().fg(activity_color)),
            Span::styled(
                "Derek.",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            Span::styled(self.base_url, Style::default().fg(Color::White)),
            Span::raw(" | "),
            Span::styled(activity, Style::default().fg(activity_color)),
        ]);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Empower ")
            .style(Style::default().fg(Color::White));

        Paragraph::new(line).block(block).render(area, buf);
    }
}
