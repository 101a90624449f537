use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph, Wrap};
use unicode_width::UnicodeWidthChar;

use crate::core::state::MediaStatus;
use crate::core::story::{MediaType, StoryItem};
use crate::media::MediaSource;
use crate::tui::component::Component;

/// Transient component for the item on screen. Pixels are out of scope;
/// the card describes the media and its load state.
pub struct StoryCard<'a> {
    pub item: &'a StoryItem,
    pub media: &'a MediaStatus,
    pub elapsed: Duration,
    pub total: Duration,
    pub paused: bool,
}

impl<'a> StoryCard<'a> {
    pub fn new(
        item: &'a StoryItem,
        media: &'a MediaStatus,
        elapsed: Duration,
        total: Duration,
        paused: bool,
    ) -> Self {
        Self {
            item,
            media,
            elapsed,
            total,
            paused,
        }
    }

    fn icon(&self) -> &'static str {
        match self.item.media_type {
            MediaType::Image => "▣",
            MediaType::Video => "▶",
        }
    }

    fn status_line(&self) -> Line<'static> {
        match self.media {
            MediaStatus::Pending => Line::from(Span::styled(
                "Loading…",
                Style::default().fg(Color::DarkGray),
            )),
            MediaStatus::Ready(media) => {
                let mut parts = vec![match &media.source {
                    MediaSource::Local(_) => "local".to_string(),
                    MediaSource::Remote(_) => "remote".to_string(),
                }];
                if let Some(content_type) = &media.content_type {
                    parts.push(content_type.clone());
                }
                if let Some(size) = media.size_bytes {
                    parts.push(format_size(size));
                }
                Line::from(Span::styled(
                    format!("Ready · {}", parts.join(" · ")),
                    Style::default().fg(Color::Green),
                ))
            }
            MediaStatus::Failed(reason) => Line::from(Span::styled(
                format!("Failed: {reason}"),
                Style::default().fg(Color::Red),
            )),
        }
    }

    fn countdown_line(&self) -> Line<'static> {
        let text = format!(
            "{:.1}s / {:.1}s{}",
            self.elapsed.as_secs_f32(),
            self.total.as_secs_f32(),
            if self.paused { "  ⏸" } else { "" }
        );
        Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
    }
}

impl Component for StoryCard<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(4) as usize;
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{}  {}", self.icon(), self.item.media_type.label()),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(truncate_to_width(&self.item.source_ref, inner_width)),
            Line::from(""),
            self.status_line(),
            self.countdown_line(),
        ];

        let block = Block::bordered()
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", self.item.id))
            .padding(Padding::horizontal(1));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, area);
    }
}

/// Human-readable byte count.
fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

/// Cut `s` to at most `max_width` display columns, keeping the tail
/// (the file name is the interesting end of a path or URL).
fn truncate_to_width(s: &str, max_width: usize) -> String {
    let width: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if width <= max_width {
        return s.to_string();
    }
    if max_width <= 1 {
        return "…".repeat(max_width);
    }

    let mut kept = Vec::new();
    let mut used = 1; // room for the ellipsis
    for c in s.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width {
            break;
        }
        used += w;
        kept.push(c);
    }
    let tail: String = kept.into_iter().rev().collect();
    format!("…{tail}")
}
