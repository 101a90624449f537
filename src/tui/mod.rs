//! # TUI Shell
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the viewer,
//! runs the ticker and media resolution tasks, and translates input into
//! `core::action::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Tick Ownership
//!
//! Exactly one ticker task is alive at a time, bound to the clock generation
//! it was spawned for. When `update()` returns `Effect::Restart(token)` the
//! core has already invalidated the old generation; the shell then aborts
//! the old ticker and resolver and spawns new ones for `token`. Ticks that
//! were queued before the abort arrive with the old token and are dropped
//! by the clock.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::clock::TickToken;
use crate::core::config::ResolvedConfig;
use crate::core::history;
use crate::core::state::Viewer;
use crate::core::story::{StoryItem, StoryQueue};
use crate::media::MediaResolver;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::ui::TapZone;

/// Upper bound on how long the loop blocks waiting for input, so ticks
/// arriving on the channel are rendered promptly.
const MAX_POLL: Duration = Duration::from_millis(20);

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture)?;
        info!("Terminal modes enabled (mouse)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture);
    }
}

/// Background work bound to the current clock generation.
#[derive(Default)]
struct PlaybackTasks {
    ticker: Option<tokio::task::AbortHandle>,
    resolver: Option<tokio::task::AbortHandle>,
}

impl PlaybackTasks {
    fn abort_all(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
        if let Some(handle) = self.resolver.take() {
            handle.abort();
        }
    }

    fn restart(
        &mut self,
        viewer: &Viewer,
        token: TickToken,
        resolver: &Arc<dyn MediaResolver>,
        tx: &mpsc::Sender<Action>,
    ) {
        self.abort_all();
        self.ticker = Some(spawn_ticker(token, viewer.clock().tick_interval(), tx.clone()));
        self.resolver = Some(spawn_resolve(
            viewer.current_item().clone(),
            token,
            resolver.clone(),
            tx.clone(),
        ));
    }
}

fn tap_action(zone: TapZone) -> Action {
    match zone {
        TapZone::Back => Action::Retreat,
        TapZone::Forward => Action::Advance,
    }
}

pub fn run(
    queue: StoryQueue,
    config: &ResolvedConfig,
    resolver: Arc<dyn MediaResolver>,
) -> std::io::Result<()> {
    let mut viewer = Viewer::new(queue, config.viewer_settings());
    info!(
        "Opening story '{}' ({} items, {} Hz)",
        viewer.queue().subject(),
        viewer.queue().len(),
        config.tick_rate_hz
    );

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let mut tasks = PlaybackTasks::default();
    tasks.restart(&viewer, viewer.current_token(), &resolver, &tx);

    let mut needs_redraw = true;
    let mut should_quit = false;

    while !should_quit {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &viewer))?;
            needs_redraw = false;
        }

        let timeout = viewer.clock().tick_interval().min(MAX_POLL);
        let first_event = poll_event_timeout(timeout);

        // Input first, then background actions, all before the next draw
        let mut actions = Vec::new();
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            needs_redraw = true;
            let action = match event {
                TuiEvent::Advance => Action::Advance,
                TuiEvent::Retreat => Action::Retreat,
                TuiEvent::TogglePause => Action::TogglePause,
                TuiEvent::Quit => Action::Exit,
                TuiEvent::Click(column, _row) => {
                    let width = terminal.get_frame().area().width;
                    match ui::tap_zone(column, width) {
                        Some(zone) => tap_action(zone),
                        None => continue,
                    }
                }
                TuiEvent::Resize => continue,
            };
            actions.push(action);
        }
        actions.extend(rx.try_iter());

        for action in actions {
            needs_redraw = true;
            if !matches!(action, Action::Tick(_)) {
                debug!("Event loop received: {:?}", action);
            }
            match update(&mut viewer, action) {
                Effect::None => {}
                Effect::Restart(token) => {
                    debug!(
                        "Moved to item {} (generation {})",
                        viewer.current_item().id,
                        token.generation()
                    );
                    tasks.restart(&viewer, token, &resolver, &tx);
                }
                Effect::Quit => {
                    should_quit = true;
                    break;
                }
            }
        }
    }

    tasks.abort_all();
    info!(
        "Story '{}' closed ({} of {} items seen, completed: {})",
        viewer.queue().subject(),
        viewer.items_seen(),
        viewer.queue().len(),
        viewer.is_completed()
    );
    if config.history_enabled {
        history::record_session(&viewer, config.max_history_records);
    }

    ratatui::restore();
    Ok(())
}

/// Sends `Action::Tick(token)` every `interval` until aborted or the
/// receiver is gone.
fn spawn_ticker(
    token: TickToken,
    interval: Duration,
    tx: mpsc::Sender<Action>,
) -> tokio::task::AbortHandle {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately; progress starts at 0.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if tx.send(Action::Tick(token)).is_err() {
                debug!("Ticker for generation {} stopping: receiver dropped", token.generation());
                return;
            }
        }
    })
    .abort_handle()
}

fn spawn_resolve(
    item: StoryItem,
    token: TickToken,
    resolver: Arc<dyn MediaResolver>,
    tx: mpsc::Sender<Action>,
) -> tokio::task::AbortHandle {
    tokio::spawn(async move {
        debug!("Resolving media for {} via {}", item.id, resolver.name());
        let action = match resolver.resolve(&item).await {
            Ok(media) => Action::MediaResolved { token, media },
            Err(e) => Action::MediaFailed {
                token,
                reason: e.to_string(),
            },
        };
        if tx.send(action).is_err() {
            warn!("Failed to send media result for {}: receiver dropped", item.id);
        }
    })
    .abort_handle()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::ViewerStatus;
    use crate::media::{MediaError, MediaSource, ResolvedMedia};
    use crate::test_support::test_viewer;
    use async_trait::async_trait;

    struct FixedResolver {
        fail: bool,
    }

    #[async_trait]
    impl MediaResolver for FixedResolver {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn resolve(&self, item: &StoryItem) -> Result<ResolvedMedia, MediaError> {
            if self.fail {
                Err(MediaError::Status(404))
            } else {
                Ok(ResolvedMedia {
                    source: MediaSource::Local(item.source_ref.clone().into()),
                    content_type: None,
                    size_bytes: None,
                })
            }
        }
    }

    #[test]
    fn test_tap_action() {
        assert!(matches!(tap_action(TapZone::Back), Action::Retreat));
        assert!(matches!(tap_action(TapZone::Forward), Action::Advance));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_ticker_sends_ticks_with_its_token() {
        let viewer = test_viewer(2);
        let token = viewer.current_token();
        let (tx, rx) = mpsc::channel();

        let handle = spawn_ticker(token, Duration::from_millis(5), tx);
        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        let second = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        handle.abort();

        assert!(matches!(first, Action::Tick(t) if t == token));
        assert!(matches!(second, Action::Tick(t) if t == token));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_aborted_ticker_goes_quiet() {
        let (tx, rx) = mpsc::channel();
        let viewer = test_viewer(1);
        let handle = spawn_ticker(viewer.current_token(), Duration::from_millis(5), tx);
        rx.recv_timeout(Duration::from_secs(2)).unwrap();

        handle.abort();
        tokio::time::sleep(Duration::from_millis(20)).await;
        // Drain anything sent before the abort took effect.
        while rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_resolve_task_reports_success() {
        let viewer = test_viewer(2);
        let token = viewer.current_token();
        let (tx, rx) = mpsc::channel();
        let resolver: Arc<dyn MediaResolver> = Arc::new(FixedResolver { fail: false });

        spawn_resolve(viewer.current_item().clone(), token, resolver, tx);
        let action = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(action, Action::MediaResolved { token: t, .. } if t == token));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_failed_resolve_skips_item() {
        let mut viewer = test_viewer(3);
        let token = viewer.current_token();
        let (tx, rx) = mpsc::channel();
        let resolver: Arc<dyn MediaResolver> = Arc::new(FixedResolver { fail: true });

        spawn_resolve(viewer.current_item().clone(), token, resolver, tx);
        let action = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(update(&mut viewer, action), Effect::Restart(_)));
        assert_eq!(viewer.status(), ViewerStatus::Viewing(1));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_playback_tasks_restart_replaces_handles() {
        let mut viewer = test_viewer(3);
        let (tx, rx) = mpsc::channel();
        let resolver: Arc<dyn MediaResolver> = Arc::new(FixedResolver { fail: false });
        let mut tasks = PlaybackTasks::default();

        tasks.restart(&viewer, viewer.current_token(), &resolver, &tx);
        let Effect::Restart(token) = update(&mut viewer, Action::Advance) else {
            panic!("advance should restart");
        };
        tasks.restart(&viewer, token, &resolver, &tx);

        // Whatever arrives now must either be stale or carry the new token,
        // and stale ones must not move the viewer.
        for _ in 0..5 {
            let action = rx.recv_timeout(Duration::from_secs(2)).unwrap();
            update(&mut viewer, action);
        }
        assert_eq!(viewer.status(), ViewerStatus::Viewing(1));

        tasks.abort_all();
        assert!(tasks.ticker.is_none());
        assert!(tasks.resolver.is_none());
    }
}
