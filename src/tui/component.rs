use ratatui::Frame;
use ratatui::layout::Rect;

/// A piece of the viewer screen.
///
/// Each component is built per frame from `Viewer` data passed in through
/// its constructor, then drawn into the area the layout gives it. Nothing
/// is read from outside those fields.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}
