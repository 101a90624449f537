//! # Core Playback Engine
//!
//! This module contains Pixie's story playback logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • StoryQueue (items)   │
//!                    │  • PlaybackClock (ticks)│
//!                    │  • Viewer (navigation)  │
//!                    │  • Action / update()    │
//!                    │                         │
//!                    │  No UI. Pure state.     │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  Mobile    │      │  Headless  │
//!     │   Shell    │      │  Shell     │      │  (tests)   │
//!     │ (ratatui)  │      │  (future)  │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`story`]: `StoryItem` and the `StoryQueue` for one session
//! - [`clock`]: `PlaybackClock`, the single tick counter behind progress and auto-advance
//! - [`state`]: `Viewer`, the navigation controller that owns queue and clock
//! - [`action`]: the `Action` enum and `update()` reducer
//! - [`source`]: loading story files into a queue
//! - [`config`]: layered settings
//! - [`history`]: view history persistence

pub mod action;
pub mod clock;
pub mod config;
pub mod history;
pub mod source;
pub mod state;
pub mod story;
