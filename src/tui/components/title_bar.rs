//! # TitleBar Component
//!
//! Header line over the story: whose story it is, which item is showing,
//! and a status message.
//!
//! ## Responsibilities
//!
//! - Display the story subject ("Me", a contact's name)
//! - Display the position as `current/total` (1-based)
//! - Display status messages (e.g., "Paused", "End of story")
//!
//! ## Design Decisions
//!
//! ### Stateless Component
//!
//! TitleBar is purely presentational. It receives all data as props and has
//! no internal state:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new("Me".to_string(), 0, 3, "Paused".to_string());
//! title_bar.render(frame, area);
//! ```
//!
//! ## Conditional Formatting
//!
//! 1. **Status message**: `"Me  1/3 | Paused"`
//! 2. **Default**: `"Me  1/3"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Header line showing subject, position, and status.
pub struct TitleBar {
    /// Whose story this is
    pub subject: String,
    /// Zero-based index of the item on screen
    pub current: usize,
    /// Number of items in the story
    pub total: usize,
    /// Status message (e.g., "Paused")
    pub status_message: String,
}

impl TitleBar {
    pub fn new(subject: String, current: usize, total: usize, status_message: String) -> Self {
        Self {
            subject,
            current,
            total,
            status_message,
        }
    }

    fn position_text(&self) -> String {
        format!("{}/{}", self.current + 1, self.total)
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                self.subject.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(self.position_text(), Style::default().fg(Color::DarkGray)),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
            spans.push(Span::styled(
                self.status_message.clone(),
                Style::default().fg(Color::Yellow),
            ));
        }

        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_to_text(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(60, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_title_bar_with_status_message() {
        let mut title_bar = TitleBar::new("Me".to_string(), 1, 3, "Paused".to_string());
        let text = render_to_text(&mut title_bar);
        assert!(text.contains("Me"));
        assert!(text.contains("2/3"));
        assert!(text.contains("| Paused"));
    }

    #[test]
    fn test_title_bar_default_no_status() {
        let mut title_bar = TitleBar::new("Sarah Wilson".to_string(), 0, 2, String::new());
        let text = render_to_text(&mut title_bar);
        assert!(text.contains("Sarah Wilson"));
        assert!(text.contains("1/2"));
        assert!(!text.contains('|'));
    }
}
