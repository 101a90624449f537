//! # TUI Components
//!
//! All UI components for the story viewer.
//!
//! ## Component Architecture
//!
//! Every component here is stateless (props-based rendering): it is built
//! fresh each frame from the `Viewer` and renders into the `Rect` it is
//! given.
//!
//! - `ProgressBar`: one segment per item, current one filling with the clock
//! - `TitleBar`: subject, position, status
//! - `StoryCard`: the item on screen and its media state
//!
//! Everything a component draws arrives through its constructor, so the
//! tests can render any state on a `TestBackend` without a live viewer:
//!
//! ```rust,ignore
//! ProgressBar::new(queue.len(), queue.current(), viewer.progress()).render(frame, area);
//! ```

pub mod progress_bar;
pub mod story_card;
pub mod title_bar;

pub use progress_bar::ProgressBar;
pub use story_card::StoryCard;
pub use title_bar::TitleBar;
