//! Input widget: single-line prompt

use crate::tui::state::TuiState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub const PLACEHOLDER: &str = "Ask me anything...";

pub struct InputWidget<'a> {
    state: &'a TuiState,
    pending: bool,
}

impl<'a> InputWidget<'a> {
    pub fn new(state: &'a TuiState, pending: bool) -> Self {
        Self { state, pending }
    }

    /// Terminal position of the text cursor when drawn into `area`.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let typed = self.state.input[..self.state.cursor_pos].chars().count();
        let typed = u16::try_from(typed).unwrap_or(u16::MAX);
        let x = area
            .x
            .saturating_add(3)
            .saturating_add(typed)
            .min(area.right().saturating_sub(2));
        (x, area.y + 1)
    }
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = if self.pending {
            Color::DarkGray
        } else {
            Color::Cyan
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Message ")
            .border_style(Style::default().fg(border_color));

        let body = if self.state.input.is_empty() {
            Span::styled(
                PLACEHOLDER,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            let fg = if self.pending { Color::DarkGray } else { Color::White };
            Span::styled(self.state.input.as_str(), Style::default().fg(fg))
        };

        let line = Line::from(vec![
            Span::styled("> ", Style::default().fg(border_color)),
            body,
        ]);

        Paragraph::new(line).block(block).render(area, buf);
    }
}
