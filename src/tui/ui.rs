use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;

use crate::core::state::Viewer;
use crate::tui::component::Component;
use crate::tui::components::{ProgressBar, StoryCard, TitleBar};

/// Share of the screen width (percent) taken by each side tap zone.
const TAP_ZONE_PERCENT: u16 = 40;

const HELP_TEXT: &str = " ← h back   → l next   space pause   q close ";

/// Which part of the screen a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapZone {
    /// Left 40%: previous item.
    Back,
    /// Right 40%: next item.
    Forward,
}

fn layout(area: Rect) -> [Rect; 4] {
    use Constraint::{Length, Min};
    Layout::vertical([Length(1), Length(1), Min(0), Length(1)]).areas(area)
}

pub fn draw_ui(frame: &mut Frame, viewer: &Viewer) {
    let [progress_area, title_area, card_area, help_area] = layout(frame.area());
    let queue = viewer.queue();
    let clock = viewer.clock();

    ProgressBar::new(queue.len(), queue.current(), viewer.progress()).render(frame, progress_area);

    TitleBar::new(
        queue.subject().to_string(),
        queue.current(),
        queue.len(),
        viewer.status_message.clone(),
    )
    .render(frame, title_area);

    StoryCard::new(
        viewer.current_item(),
        &viewer.media,
        clock.elapsed(),
        clock.total(),
        clock.is_paused(),
    )
    .render(frame, card_area);

    frame.render_widget(
        Line::from(HELP_TEXT)
            .style(Style::default().fg(Color::DarkGray))
            .centered(),
        help_area,
    );
}

/// Map a click column to a tap zone. The middle 20% is dead space.
pub fn tap_zone(column: u16, width: u16) -> Option<TapZone> {
    if width == 0 || column >= width {
        return None;
    }
    let zone = (width as u32 * TAP_ZONE_PERCENT as u32 / 100) as u16;
    if column < zone {
        Some(TapZone::Back)
    } else if column >= width - zone {
        Some(TapZone::Forward)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_viewer;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_tap_zones() {
        assert_eq!(tap_zone(0, 100), Some(TapZone::Back));
        assert_eq!(tap_zone(39, 100), Some(TapZone::Back));
        assert_eq!(tap_zone(40, 100), None);
        assert_eq!(tap_zone(59, 100), None);
        assert_eq!(tap_zone(60, 100), Some(TapZone::Forward));
        assert_eq!(tap_zone(99, 100), Some(TapZone::Forward));
    }

    #[test]
    fn test_tap_zone_out_of_bounds() {
        assert_eq!(tap_zone(100, 100), None);
        assert_eq!(tap_zone(0, 0), None);
    }

    #[test]
    fn test_draw_ui() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut viewer = test_viewer(3);
        viewer.on_advance_requested();

        terminal.draw(|f| draw_ui(f, &viewer)).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("2/3"));
        assert!(text.contains("story_1"));
        assert!(text.contains("stories/1.jpg"));
        assert!(text.contains("q close"));
    }
}
