//! # ProgressBar Component
//!
//! One segment per story item, side by side across the top line:
//!
//! ```text
//! ━━━━━━━━━ ━━━━━────── ──────────
//!   seen      current     pending
//! ```
//!
//! Seen segments are full, the current one fills with the clock's progress,
//! pending ones stay empty. When there are more items than the line can
//! hold at one cell each, a single bar shows progress through the story.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

const FILLED: &str = "━";
const EMPTY: &str = "─";
const ACCENT: Color = Color::Rgb(0xff, 0x45, 0x00);
const CURRENT_TRACK: Color = Color::Rgb(0xff, 0xb1, 0x99);

pub struct ProgressBar {
    pub total: usize,
    pub current: usize,
    /// Fill of the current segment, 0.0 to 1.0.
    pub progress: f32,
}

impl ProgressBar {
    pub fn new(total: usize, current: usize, progress: f32) -> Self {
        Self {
            total,
            current,
            progress: progress.clamp(0.0, 1.0),
        }
    }

    /// Fill fraction for each segment.
    pub fn segment_fills(&self) -> Vec<f32> {
        (0..self.total)
            .map(|idx| match idx.cmp(&self.current) {
                std::cmp::Ordering::Less => 1.0,
                std::cmp::Ordering::Equal => self.progress,
                std::cmp::Ordering::Greater => 0.0,
            })
            .collect()
    }

    /// Width of each segment given the available width and one-cell gaps.
    /// Leftover cells go to the leading segments.
    pub fn segment_widths(&self, width: u16) -> Vec<u16> {
        if self.total == 0 {
            return Vec::new();
        }
        let gaps = self.total - 1;
        let usable = usize::from(width).saturating_sub(gaps);
        let base = usable / self.total;
        let extra = usable % self.total;
        // Each width is at most `width`, so it fits back into u16.
        (0..self.total)
            .map(|i| (base + usize::from(i < extra)) as u16)
            .collect()
    }

    /// True when every segment gets at least one cell.
    pub fn segments_fit(&self, width: u16) -> bool {
        self.total > 0 && self.total <= (usize::from(width) + 1) / 2
    }

    /// Fraction of the whole story played, counting the current item's fill.
    pub fn overall_progress(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        ((self.current as f32 + self.progress) / self.total as f32).clamp(0.0, 1.0)
    }

    fn segment_spans(width: u16, fill: f32, is_current: bool) -> Vec<Span<'static>> {
        let filled = ((width as f32) * fill).round() as u16;
        let filled = filled.min(width);
        let track = if is_current { CURRENT_TRACK } else { Color::DarkGray };
        vec![
            Span::styled(FILLED.repeat(filled as usize), Style::default().fg(ACCENT)),
            Span::styled(
                EMPTY.repeat((width - filled) as usize),
                Style::default().fg(track),
            ),
        ]
    }
}

impl Component for ProgressBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if !self.segments_fit(area.width) {
            let spans = Self::segment_spans(area.width, self.overall_progress(), true);
            frame.render_widget(Line::from(spans), area);
            return;
        }

        let widths = self.segment_widths(area.width);
        let fills = self.segment_fills();

        let mut spans = Vec::with_capacity(self.total * 3);
        for (idx, (width, fill)) in widths.into_iter().zip(fills).enumerate() {
            if idx > 0 {
                spans.push(Span::raw(" "));
            }
            spans.extend(Self::segment_spans(width, fill, idx == self.current));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
