//! # Playback Clock
//!
//! Drives the progress fill for the item on screen and decides when it is
//! done. One integer counter is the single source of truth: the progress
//! fraction and the completion decision are both derived from it.
//!
//! ```text
//! restart(5s) @ 10 Hz  →  total = 50
//! tick ×49             →  Progressed(0.02 .. 0.98)
//! tick #50             →  Completed   (exactly once)
//! tick #51+            →  Stale
//! ```
//!
//! Every restart or cancel bumps a generation number. Ticks carry the
//! [`TickToken`] of the generation they were scheduled for, so a tick aimed
//! at item N is rejected once the viewer has moved to N+1.

use std::time::Duration;

pub const DEFAULT_TICK_RATE_HZ: u32 = 10;

/// Identifies one clock generation. Handed to whatever schedules ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

impl TickToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Result of feeding one tick into the clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Token is from an old generation, or the clock is stopped. Nothing changed.
    Stale,
    /// Clock is paused. Nothing changed.
    Paused,
    /// Progress moved forward to the contained fraction.
    Progressed(f32),
    /// Progress reached 1. The clock stops until the next restart.
    Completed,
}

#[derive(Debug, Clone)]
pub struct PlaybackClock {
    tick_rate_hz: u32,
    generation: u64,
    elapsed_ticks: u32,
    total_ticks: u32,
    paused: bool,
    running: bool,
}

impl PlaybackClock {
    pub fn new(tick_rate_hz: u32) -> Self {
        Self {
            tick_rate_hz: tick_rate_hz.max(1),
            generation: 0,
            elapsed_ticks: 0,
            total_ticks: 1,
            paused: false,
            running: false,
        }
    }

    pub fn tick_rate_hz(&self) -> u32 {
        self.tick_rate_hz
    }

    /// Wall-clock spacing between ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate_hz
    }

    /// Number of ticks needed to play an item of the given duration. Never zero.
    pub fn ticks_for(&self, duration: Duration) -> u32 {
        let ticks = (duration.as_secs_f64() * self.tick_rate_hz as f64).round();
        (ticks as u32).max(1)
    }

    /// Rebinds the clock to a new item: progress back to 0, new generation.
    /// A manual restart also clears a pause.
    pub fn restart(&mut self, duration: Duration) -> TickToken {
        self.generation += 1;
        self.elapsed_ticks = 0;
        self.total_ticks = self.ticks_for(duration);
        self.paused = false;
        self.running = true;
        TickToken(self.generation)
    }

    /// Stops the clock and invalidates every outstanding token.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.running = false;
    }

    pub fn token(&self) -> TickToken {
        TickToken(self.generation)
    }

    pub fn is_current(&self, token: TickToken) -> bool {
        self.running && token.0 == self.generation
    }

    pub fn tick(&mut self, token: TickToken) -> TickOutcome {
        if !self.is_current(token) {
            return TickOutcome::Stale;
        }
        if self.paused {
            return TickOutcome::Paused;
        }

        self.elapsed_ticks += 1;
        if self.elapsed_ticks >= self.total_ticks {
            self.elapsed_ticks = self.total_ticks;
            self.running = false;
            TickOutcome::Completed
        } else {
            TickOutcome::Progressed(self.progress())
        }
    }

    pub fn progress(&self) -> f32 {
        (self.elapsed_ticks as f32 / self.total_ticks as f32).min(1.0)
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed(&self) -> Duration {
        self.tick_interval() * self.elapsed_ticks
    }

    pub fn total(&self) -> Duration {
        self.tick_interval() * self.total_ticks
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_RATE_HZ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_SECS: Duration = Duration::from_secs(5);

    #[test]
    fn test_ticks_for_five_seconds_at_ten_hz() {
        let clock = PlaybackClock::new(10);
        assert_eq!(clock.ticks_for(FIVE_SECS), 50);
        assert_eq!(clock.tick_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_ticks_for_never_zero() {
        let clock = PlaybackClock::new(10);
        assert_eq!(clock.ticks_for(Duration::ZERO), 1);
        assert_eq!(clock.ticks_for(Duration::from_millis(10)), 1);
    }

    #[test]
    fn test_zero_tick_rate_is_clamped() {
        let clock = PlaybackClock::new(0);
        assert_eq!(clock.tick_rate_hz(), 1);
    }

    #[test]
    fn test_completes_after_exact_tick_count() {
        let mut clock = PlaybackClock::new(10);
        let token = clock.restart(FIVE_SECS);

        for _ in 0..49 {
            assert!(matches!(clock.tick(token), TickOutcome::Progressed(_)));
        }
        assert_eq!(clock.tick(token), TickOutcome::Completed);
        assert_eq!(clock.progress(), 1.0);
        // Completion fires once; the generation is spent.
        assert_eq!(clock.tick(token), TickOutcome::Stale);
    }

    #[test]
    fn test_progress_is_strictly_increasing() {
        let mut clock = PlaybackClock::new(10);
        let token = clock.restart(Duration::from_secs(2));
        let mut last = clock.progress();
        assert_eq!(last, 0.0);

        while let TickOutcome::Progressed(p) = clock.tick(token) {
            assert!(p > last, "progress went from {last} to {p}");
            last = p;
        }
        assert_eq!(clock.progress(), 1.0);
    }

    #[test]
    fn test_restart_resets_progress_and_invalidates_old_token() {
        let mut clock = PlaybackClock::new(10);
        let old = clock.restart(FIVE_SECS);
        for _ in 0..10 {
            clock.tick(old);
        }
        assert!(clock.progress() > 0.0);

        let new = clock.restart(FIVE_SECS);
        assert_ne!(old, new);
        assert_eq!(clock.progress(), 0.0);

        assert_eq!(clock.tick(old), TickOutcome::Stale);
        assert_eq!(clock.progress(), 0.0);
        assert!(matches!(clock.tick(new), TickOutcome::Progressed(_)));
    }

    #[test]
    fn test_cancel_rejects_everything() {
        let mut clock = PlaybackClock::new(10);
        let token = clock.restart(FIVE_SECS);
        clock.cancel();
        assert!(!clock.is_running());
        assert_eq!(clock.tick(token), TickOutcome::Stale);
        assert_eq!(clock.tick(clock.token()), TickOutcome::Stale);
    }

    #[test]
    fn test_pause_holds_progress() {
        let mut clock = PlaybackClock::new(10);
        let token = clock.restart(FIVE_SECS);
        clock.tick(token);
        let before = clock.progress();

        clock.pause();
        assert_eq!(clock.tick(token), TickOutcome::Paused);
        assert_eq!(clock.progress(), before);

        clock.resume();
        assert!(matches!(clock.tick(token), TickOutcome::Progressed(p) if p > before));
    }

    #[test]
    fn test_restart_clears_pause() {
        let mut clock = PlaybackClock::new(10);
        clock.restart(FIVE_SECS);
        clock.pause();
        clock.restart(FIVE_SECS);
        assert!(!clock.is_paused());
    }

    #[test]
    fn test_elapsed_and_total() {
        let mut clock = PlaybackClock::new(10);
        let token = clock.restart(FIVE_SECS);
        for _ in 0..25 {
            clock.tick(token);
        }
        assert_eq!(clock.elapsed(), Duration::from_millis(2500));
        assert_eq!(clock.total(), FIVE_SECS);
    }
}
