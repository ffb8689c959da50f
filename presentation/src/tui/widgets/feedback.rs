//! Feedback prompt overlay widget

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

pub struct FeedbackWidget;

impl Widget for FeedbackWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Feedback ")
            .border_style(Style::default().fg(Color::Magenta));

        let key = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let lines = vec![
            Line::from("How was this conversation?"),
            Line::from(""),
            Line::from(vec![
                Span::styled("g", key),
                Span::raw(": good  "),
                Span::styled("b", key),
                Span::raw(": bad  "),
                Span::styled("Esc", key),
                Span::raw(": close"),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Rating ends the session and starts a new one.",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
