//! Conversation widget: transcript, typing indicator, welcome text

use crate::tui::scroll_sync::ScrollSync;
use empower_domain::{Message, Role};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

const WELCOME: [&str; 2] = [
    "Hello, I am DEREK. Your Dynamic, Empowering, Reliable & Efficient Knowledge-Base!",
    "How can I help you today?",
];

fn label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "EMPOWER",
    }
}

fn color(role: Role) -> Color {
    match role {
        Role::User => Color::Cyan,
        Role::Assistant => Color::Green,
    }
}

pub struct ConversationWidget<'a> {
    messages: &'a [Message],
    pending: bool,
    scroll: &'a ScrollSync,
}

impl<'a> ConversationWidget<'a> {
    pub fn new(messages: &'a [Message], pending: bool, scroll: &'a ScrollSync) -> Self {
        Self {
            messages,
            pending,
            scroll,
        }
    }

    fn format_messages(&self) -> Text<'a> {
        let mut lines: Vec<Line> = Vec::new();

        for msg in self.messages {
            let role_style = Style::default()
                .fg(color(msg.role()))
                .add_modifier(Modifier::BOLD);
            lines.push(Line::from(Span::styled(
                format!("{}: ", label(msg.role())),
                role_style,
            )));

            let body_style = if msg.is_failure_sentinel() {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            for content_line in msg.content().lines() {
                lines.push(Line::from(Span::styled(
                    format!("  {}", content_line),
                    body_style,
                )));
            }
            lines.push(Line::from(""));
        }

        if self.pending {
            lines.push(Line::from(Span::styled(
                "EMPOWER: ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                "  ● ● ●",
                Style::default().fg(Color::DarkGray),
            )));
        }

        Text::from(lines)
    }
}

impl Widget for ConversationWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Conversation ")
            .style(Style::default().fg(Color::White));

        if self.messages.is_empty() && !self.pending {
            let mut lines = vec![Line::from(""); (area.height.saturating_sub(4) / 2) as usize];
            lines.extend(WELCOME.iter().map(|l| {
                Line::from(Span::styled(*l, Style::default().fg(Color::Gray)))
            }));
            Paragraph::new(lines)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(area, buf);
            return;
        }

        let visible_height = area.height.saturating_sub(2);
        let content_width = area.width.saturating_sub(2);

        // Count wrapped lines without the block so the count is content only.
        let paragraph = Paragraph::new(self.format_messages()).wrap(Wrap { trim: false });
        let total_lines = paragraph.line_count(content_width).min(u16::MAX as usize) as u16;
        let scroll = self.scroll.resolve(total_lines, visible_height);

        paragraph.block(block).scroll((scroll, 0)).render(area, buf);
    }
}
