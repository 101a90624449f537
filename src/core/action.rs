//! # Actions
//!
//! Everything that can happen in the viewer becomes an `Action`.
//! User taps the right side? That's `Action::Advance`.
//! The ticker fires? That's `Action::Tick(token)`.
//!
//! The `update()` function takes the viewer and an action, mutates the
//! viewer, then returns an `Effect` telling the shell what I/O to do next.
//! No side effects here.
//!
//! ```text
//! Viewer + Action  →  update()  →  Effect
//! ```
//!
//! Clock completion and a manual advance go through the same
//! `Viewer::on_advance_requested`, so both end in the same state.

use log::{debug, info, warn};

use crate::core::clock::{TickOutcome, TickToken};
use crate::core::state::{MediaStatus, Transition, Viewer};
use crate::media::ResolvedMedia;

#[derive(Debug, Clone)]
pub enum Action {
    Tick(TickToken),
    Advance,
    Retreat,
    TogglePause,
    Exit,
    MediaResolved { token: TickToken, media: ResolvedMedia },
    MediaFailed { token: TickToken, reason: String },
}

/// Side effect requested by `update()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The current item changed: drop the old ticker and resolver,
    /// start new ones bound to this token.
    Restart(TickToken),
    /// The session is over (exhausted or closed).
    Quit,
}

impl From<Transition> for Effect {
    fn from(transition: Transition) -> Self {
        match transition {
            Transition::Moved(token) => Effect::Restart(token),
            Transition::Stayed => Effect::None,
            Transition::SessionComplete | Transition::Exited => Effect::Quit,
        }
    }
}

pub fn update(viewer: &mut Viewer, action: Action) -> Effect {
    match action {
        Action::Tick(token) => match viewer.clock_mut().tick(token) {
            TickOutcome::Completed => {
                debug!("Clock completed for item {}", viewer.current_item().id);
                viewer.on_advance_requested().into()
            }
            TickOutcome::Stale => {
                debug!("Dropped stale tick (generation {})", token.generation());
                Effect::None
            }
            TickOutcome::Paused | TickOutcome::Progressed(_) => Effect::None,
        },
        Action::Advance => viewer.on_advance_requested().into(),
        Action::Retreat => viewer.on_retreat_requested().into(),
        Action::TogglePause => {
            if viewer.is_active() {
                let paused = viewer.toggle_pause();
                info!("Playback {}", if paused { "paused" } else { "resumed" });
            }
            Effect::None
        }
        Action::Exit => viewer.exit().into(),
        Action::MediaResolved { token, media } => {
            if token != viewer.current_token() {
                debug!("Ignoring media result for stale generation {}", token.generation());
                return Effect::None;
            }
            viewer.media = MediaStatus::Ready(media);
            Effect::None
        }
        Action::MediaFailed { token, reason } => {
            if token != viewer.current_token() {
                debug!("Ignoring media failure for stale generation {}", token.generation());
                return Effect::None;
            }
            warn!(
                "Media for item {} failed to load: {}",
                viewer.current_item().id,
                reason
            );
            viewer.media = MediaStatus::Failed(reason);
            if viewer.skip_failed_media {
                viewer.on_advance_requested().into()
            } else {
                Effect::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{RetreatPolicy, ViewerStatus};
    use crate::media::{MediaSource, ResolvedMedia};
    use crate::test_support::test_viewer;

    fn tick_n(viewer: &mut Viewer, n: usize) -> Vec<Effect> {
        let token = viewer.current_token();
        (0..n).map(|_| update(viewer, Action::Tick(token))).collect()
    }

    fn resolved() -> ResolvedMedia {
        ResolvedMedia {
            source: MediaSource::Local("story_0.jpg".into()),
            content_type: Some("image/jpeg".to_string()),
            size_bytes: Some(1024),
        }
    }

    #[test]
    fn test_fifty_ticks_auto_advance_once() {
        let mut viewer = test_viewer(3);
        let effects = tick_n(&mut viewer, 50);

        let restarts: Vec<_> = effects
            .iter()
            .filter(|e| matches!(e, Effect::Restart(_)))
            .collect();
        assert_eq!(restarts.len(), 1);
        assert_eq!(effects.last(), Some(&Effect::Restart(viewer.current_token())));
        assert_eq!(viewer.status(), ViewerStatus::Viewing(1));
        assert_eq!(viewer.progress(), 0.0);
    }

    #[test]
    fn test_story_walkthrough_scenario() {
        let mut viewer = test_viewer(3);
        tick_n(&mut viewer, 50);
        assert_eq!(viewer.status(), ViewerStatus::Viewing(1));

        assert!(matches!(update(&mut viewer, Action::Retreat), Effect::Restart(_)));
        assert_eq!(viewer.status(), ViewerStatus::Viewing(0));
        assert_eq!(viewer.progress(), 0.0);

        assert_eq!(update(&mut viewer, Action::Retreat), Effect::None);
        assert_eq!(viewer.status(), ViewerStatus::Viewing(0));
    }

    #[test]
    fn test_auto_advance_matches_manual_advance() {
        let mut auto = test_viewer(3);
        let mut manual = test_viewer(3);

        tick_n(&mut auto, 50);
        update(&mut manual, Action::Advance);

        assert_eq!(auto.status(), manual.status());
        assert_eq!(auto.progress(), manual.progress());
    }

    #[test]
    fn test_stale_tick_after_manual_advance_is_ignored() {
        let mut viewer = test_viewer(3);
        let old = viewer.current_token();
        update(&mut viewer, Action::Advance);

        for _ in 0..100 {
            assert_eq!(update(&mut viewer, Action::Tick(old)), Effect::None);
        }
        assert_eq!(viewer.status(), ViewerStatus::Viewing(1));
        assert_eq!(viewer.progress(), 0.0);
    }

    #[test]
    fn test_progress_monotonic_until_transition() {
        let mut viewer = test_viewer(2);
        let token = viewer.current_token();
        let mut last = viewer.progress();
        for _ in 0..49 {
            update(&mut viewer, Action::Tick(token));
            assert!(viewer.progress() > last);
            last = viewer.progress();
        }
        update(&mut viewer, Action::Tick(token));
        assert_eq!(viewer.progress(), 0.0);
        assert_eq!(viewer.status(), ViewerStatus::Viewing(1));
    }

    #[test]
    fn test_exhaustion_quits() {
        let mut viewer = test_viewer(2);
        update(&mut viewer, Action::Advance);
        assert_eq!(update(&mut viewer, Action::Advance), Effect::Quit);
        assert_eq!(viewer.queue().current(), 1);
        assert!(viewer.is_completed());
    }

    #[test]
    fn test_auto_advance_on_last_item_quits() {
        let mut viewer = test_viewer(1);
        let effects = tick_n(&mut viewer, 50);
        assert_eq!(effects.last(), Some(&Effect::Quit));
        assert!(viewer.is_completed());
    }

    #[test]
    fn test_exit_quits_and_cancels() {
        let mut viewer = test_viewer(3);
        let token = viewer.current_token();
        assert_eq!(update(&mut viewer, Action::Exit), Effect::Quit);
        assert_eq!(update(&mut viewer, Action::Tick(token)), Effect::None);
        assert_eq!(update(&mut viewer, Action::Advance), Effect::None);
        assert_eq!(viewer.status(), ViewerStatus::Exited);
    }

    #[test]
    fn test_retreat_exit_policy_quits() {
        let mut viewer = test_viewer(3);
        viewer.retreat_policy = RetreatPolicy::Exit;
        assert_eq!(update(&mut viewer, Action::Retreat), Effect::Quit);
    }

    #[test]
    fn test_pause_stops_auto_advance() {
        let mut viewer = test_viewer(2);
        update(&mut viewer, Action::TogglePause);
        tick_n(&mut viewer, 200);
        assert_eq!(viewer.status(), ViewerStatus::Viewing(0));
        assert_eq!(viewer.progress(), 0.0);

        update(&mut viewer, Action::TogglePause);
        tick_n(&mut viewer, 50);
        assert_eq!(viewer.status(), ViewerStatus::Viewing(1));
    }

    #[test]
    fn test_media_resolved_sets_ready() {
        let mut viewer = test_viewer(2);
        let token = viewer.current_token();
        update(&mut viewer, Action::MediaResolved { token, media: resolved() });
        assert_eq!(viewer.media, MediaStatus::Ready(resolved()));
    }

    #[test]
    fn test_stale_media_result_is_ignored() {
        let mut viewer = test_viewer(3);
        let old = viewer.current_token();
        update(&mut viewer, Action::Advance);

        update(&mut viewer, Action::MediaResolved { token: old, media: resolved() });
        assert_eq!(viewer.media, MediaStatus::Pending);

        let effect = update(
            &mut viewer,
            Action::MediaFailed { token: old, reason: "gone".to_string() },
        );
        assert_eq!(effect, Effect::None);
        assert_eq!(viewer.status(), ViewerStatus::Viewing(1));
    }

    #[test]
    fn test_media_failure_skips_like_auto_advance() {
        let mut viewer = test_viewer(3);
        let token = viewer.current_token();
        let effect = update(
            &mut viewer,
            Action::MediaFailed { token, reason: "not found".to_string() },
        );
        assert!(matches!(effect, Effect::Restart(_)));
        assert_eq!(viewer.status(), ViewerStatus::Viewing(1));
        assert_eq!(viewer.media, MediaStatus::Pending);
    }

    #[test]
    fn test_media_failure_keeps_item_when_skip_disabled() {
        let mut viewer = test_viewer(3);
        viewer.skip_failed_media = false;
        let token = viewer.current_token();
        let effect = update(
            &mut viewer,
            Action::MediaFailed { token, reason: "not found".to_string() },
        );
        assert_eq!(effect, Effect::None);
        assert_eq!(viewer.status(), ViewerStatus::Viewing(0));
        assert_eq!(viewer.media, MediaStatus::Failed("not found".to_string()));
    }
}
