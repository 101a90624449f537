//! # Viewer State
//!
//! One `Viewer` per viewing session. It owns the story queue and the
//! playback clock, and is the navigation controller: the only code that
//! moves `current`.
//!
//! ```text
//! Viewer
//! ├── queue: StoryQueue              // items + current index
//! ├── clock: PlaybackClock           // progress for the current item
//! ├── media: MediaStatus             // resolver result for the current item
//! ├── retreat_policy: RetreatPolicy  // what "back" does at the first item
//! ├── skip_failed_media: bool        // failed media counts as auto-advance
//! ├── furthest: usize                // highest index reached
//! ├── phase: Phase                   // Viewing / Completed / Exited
//! └── status_message: String         // status bar text
//! ```
//!
//! Every transition follows the same order: cancel the clock (which
//! invalidates outstanding tick tokens), move the index, then restart the
//! clock for the new item. A tick scheduled for item N can therefore never
//! land on item N+1.

use serde::{Deserialize, Serialize};

use crate::core::clock::{PlaybackClock, TickToken};
use crate::core::story::{StoryItem, StoryQueue};
use crate::media::ResolvedMedia;

/// What "retreat" does when the viewer is already on the first item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RetreatPolicy {
    /// Nothing happens.
    #[default]
    Stay,
    /// Leave the viewer.
    Exit,
}

impl RetreatPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stay" => Some(RetreatPolicy::Stay),
            "exit" => Some(RetreatPolicy::Exit),
            _ => None,
        }
    }
}

/// Observable state of the navigation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerStatus {
    Viewing(usize),
    Exited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Viewing,
    /// Advanced past the last item.
    Completed,
    /// Closed by the user.
    Exited,
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// `current` changed; ticks must now carry the new token.
    Moved(TickToken),
    /// Nothing changed.
    Stayed,
    /// Advance at the last item. `current` is left where it was.
    SessionComplete,
    Exited,
}

/// Resolution state of the item on screen.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaStatus {
    Pending,
    Ready(ResolvedMedia),
    Failed(String),
}

/// Knobs the viewer needs from the resolved config.
#[derive(Debug, Clone, Copy)]
pub struct ViewerSettings {
    pub tick_rate_hz: u32,
    pub retreat_policy: RetreatPolicy,
    pub skip_failed_media: bool,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            tick_rate_hz: crate::core::clock::DEFAULT_TICK_RATE_HZ,
            retreat_policy: RetreatPolicy::default(),
            skip_failed_media: true,
        }
    }
}

pub struct Viewer {
    queue: StoryQueue,
    clock: PlaybackClock,
    pub media: MediaStatus,
    pub retreat_policy: RetreatPolicy,
    pub skip_failed_media: bool,
    furthest: usize,
    phase: Phase,
    pub status_message: String,
}

impl Viewer {
    /// Opens a session on the first item with the clock already running.
    pub fn new(queue: StoryQueue, settings: ViewerSettings) -> Self {
        let mut clock = PlaybackClock::new(settings.tick_rate_hz);
        clock.restart(queue.current_item().duration);
        let status_message = format!("{}'s story", queue.subject());
        Self {
            queue,
            clock,
            media: MediaStatus::Pending,
            retreat_policy: settings.retreat_policy,
            skip_failed_media: settings.skip_failed_media,
            furthest: 0,
            phase: Phase::Viewing,
            status_message,
        }
    }

    pub fn queue(&self) -> &StoryQueue {
        &self.queue
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub(crate) fn clock_mut(&mut self) -> &mut PlaybackClock {
        &mut self.clock
    }

    pub fn current_item(&self) -> &StoryItem {
        self.queue.current_item()
    }

    pub fn current_token(&self) -> TickToken {
        self.clock.token()
    }

    pub fn progress(&self) -> f32 {
        self.clock.progress()
    }

    pub fn status(&self) -> ViewerStatus {
        match self.phase {
            Phase::Viewing => ViewerStatus::Viewing(self.queue.current()),
            Phase::Completed | Phase::Exited => ViewerStatus::Exited,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Viewing
    }

    /// True when the session ended by running out of items.
    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    /// Number of distinct items shown so far (the first counts on entry).
    pub fn items_seen(&self) -> usize {
        self.furthest + 1
    }

    /// Shared by manual taps and clock completion.
    pub fn on_advance_requested(&mut self) -> Transition {
        if !self.is_active() {
            return Transition::Stayed;
        }
        if !self.queue.has_next() {
            self.clock.cancel();
            self.phase = Phase::Completed;
            self.status_message = String::from("End of story");
            return Transition::SessionComplete;
        }

        self.clock.cancel();
        self.queue.step_forward();
        Transition::Moved(self.rebind_clock())
    }

    pub fn on_retreat_requested(&mut self) -> Transition {
        if !self.is_active() {
            return Transition::Stayed;
        }
        if !self.queue.has_previous() {
            return match self.retreat_policy {
                RetreatPolicy::Stay => Transition::Stayed,
                RetreatPolicy::Exit => self.exit(),
            };
        }

        self.clock.cancel();
        self.queue.step_back();
        Transition::Moved(self.rebind_clock())
    }

    pub fn exit(&mut self) -> Transition {
        self.clock.cancel();
        if self.phase == Phase::Viewing {
            self.phase = Phase::Exited;
        }
        Transition::Exited
    }

    /// Returns true if the clock is now paused.
    pub fn toggle_pause(&mut self) -> bool {
        if self.clock.is_paused() {
            self.clock.resume();
            self.status_message = format!("{}'s story", self.queue.subject());
            false
        } else {
            self.clock.pause();
            self.status_message = String::from("Paused");
            true
        }
    }

    fn rebind_clock(&mut self) -> TickToken {
        let current = self.queue.current();
        self.furthest = self.furthest.max(current);
        self.media = MediaStatus::Pending;
        self.status_message = format!("{}'s story", self.queue.subject());
        self.clock.restart(self.queue.current_item().duration)
    }
}
