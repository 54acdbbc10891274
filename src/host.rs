//! Async host driver.
//!
//! Runs one [`Session`] on the current (single) tokio thread. Terminal events
//! arrive over an mpsc channel; between events the driver sleeps until the
//! earliest of the session's timers, the key tracker's synthesized releases
//! and the next frame.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::Event;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use crate::core::{FeedbackSink, Presentation, Session, SimulationEngine};
use crate::input::{translate, HostInput, KeyTracker};
use crate::types::SurfaceEvent;

/// Frame interval of the terminal host (~30 fps)
pub const FRAME_INTERVAL_MS: u64 = 33;

/// Events forwarded from the terminal thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Key(HostInput),
    Focus(bool),
    Resize { width: u16, height: u16 },
    Quit,
}

/// Map a raw crossterm event. Returns `None` for events the host ignores.
pub fn host_event(event: Event) -> Option<HostEvent> {
    match event {
        Event::Key(key) => match translate(key)? {
            HostInput::Quit => Some(HostEvent::Quit),
            input => Some(HostEvent::Key(input)),
        },
        Event::FocusGained => Some(HostEvent::Focus(true)),
        Event::FocusLost => Some(HostEvent::Focus(false)),
        Event::Resize(width, height) => Some(HostEvent::Resize { width, height }),
        _ => None,
    }
}

/// Host-level options read from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostOptions {
    /// Ring the terminal bell on loud cues
    pub bell: bool,
    pub frame_interval_ms: u64,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            bell: true,
            frame_interval_ms: FRAME_INTERVAL_MS,
        }
    }
}

impl HostOptions {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let bell = lookup("BLOCKFALL_BELL")
            .map(|s| s.trim().to_ascii_lowercase())
            .map(|s| !matches!(s.as_str(), "0" | "false" | "off" | "no"))
            .unwrap_or(defaults.bell);
        let frame_interval_ms = lookup("BLOCKFALL_FRAME_MS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(defaults.frame_interval_ms);
        Self {
            bell,
            frame_interval_ms,
        }
    }
}

/// Per-frame context handed to the draw callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub index: u64,
    pub now_ms: u64,
    /// The terminal was resized since the previous frame
    pub resized: bool,
}

enum Flow {
    Continue,
    Quit,
}

fn elapsed_ms(origin: Instant) -> u64 {
    u64::try_from(origin.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Drive `session` until a quit event arrives or the channel closes.
///
/// The session is started with `engine` on entry and torn down on exit, also
/// when `on_frame` fails.
pub async fn run<E, P, F, R>(
    session: &mut Session<E, P, F>,
    engine: E,
    mut events: mpsc::Receiver<HostEvent>,
    mut tracker: KeyTracker,
    options: HostOptions,
    mut on_frame: R,
) -> Result<()>
where
    E: SimulationEngine,
    P: Presentation,
    F: FeedbackSink,
    R: FnMut(&mut Session<E, P, F>, Frame) -> Result<()>,
{
    let origin = Instant::now();
    let frame_interval = options.frame_interval_ms.max(1);
    session.start(0, engine);

    let result = async {
        let mut next_frame = 0u64;
        let mut frame_index = 0u64;
        let mut resized = true;

        loop {
            let now = elapsed_ms(origin);
            catch_up(session, &mut tracker, now);

            if now >= next_frame {
                session.surface(SurfaceEvent::FrameRender);
                on_frame(
                    session,
                    Frame {
                        index: frame_index,
                        now_ms: now,
                        resized,
                    },
                )?;
                frame_index += 1;
                resized = false;
                next_frame = now + frame_interval;
            }

            let deadline = [session.next_deadline(), tracker.next_expiry()]
                .into_iter()
                .flatten()
                .fold(next_frame, u64::min);

            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else {
                        log::debug!("host event channel closed");
                        break;
                    };
                    let now = elapsed_ms(origin);
                    match event {
                        HostEvent::Key(input) => {
                            let Some(input) = tracker.on_input(input, now) else {
                                continue;
                            };
                            if let Flow::Quit = dispatch(session, input, now) {
                                break;
                            }
                        }
                        HostEvent::Focus(true) => {
                            session.activate(now);
                        }
                        HostEvent::Focus(false) => {
                            for input in tracker.release_all() {
                                dispatch(session, input, now);
                            }
                            session.deactivate(now);
                        }
                        HostEvent::Resize { width, height } => {
                            session.surface(SurfaceEvent::Resized { width, height });
                            resized = true;
                            next_frame = now;
                        }
                        HostEvent::Quit => break,
                    }
                }
                _ = sleep_until(origin + Duration::from_millis(deadline)) => {}
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    session.teardown();
    result
}

/// Fire timers and synthesized releases due by `now_ms` in time order.
///
/// Timers run up to each release deadline before that release lands, so a
/// late wake never repeats a key past its release.
fn catch_up<E, P, F>(session: &mut Session<E, P, F>, tracker: &mut KeyTracker, now_ms: u64)
where
    E: SimulationEngine,
    P: Presentation,
    F: FeedbackSink,
{
    while let Some(at) = tracker.next_expiry().filter(|at| *at <= now_ms) {
        session.pump(at);
        for input in tracker.expire(at) {
            dispatch(session, input, at);
        }
    }
    session.pump(now_ms);
}

fn dispatch<E, P, F>(session: &mut Session<E, P, F>, input: HostInput, now_ms: u64) -> Flow
where
    E: SimulationEngine,
    P: Presentation,
    F: FeedbackSink,
{
    match input {
        HostInput::PressStart(control) => {
            session.press_start(control, now_ms);
        }
        HostInput::PressEnd(control) => session.press_end(control),
        HostInput::TogglePause => {
            session.toggle_pause(now_ms);
        }
        HostInput::Restart => {
            session.restart(now_ms);
        }
        HostInput::Quit => return Flow::Quit,
    }
    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{NullFeedback, NullPresentation, SessionConfig};
    use crate::engine::RecordingEngine;
    use crate::types::{Control, Direction, EngineCommand};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::collections::HashMap;

    #[test]
    fn test_host_event_mapping() {
        assert_eq!(
            host_event(Event::Key(KeyEvent::from(KeyCode::Left))),
            Some(HostEvent::Key(HostInput::PressStart(Control::MoveLeft)))
        );
        assert_eq!(
            host_event(Event::Key(KeyEvent::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL
            ))),
            Some(HostEvent::Quit)
        );
        assert_eq!(host_event(Event::FocusLost), Some(HostEvent::Focus(false)));
        assert_eq!(
            host_event(Event::Resize(100, 40)),
            Some(HostEvent::Resize {
                width: 100,
                height: 40
            })
        );
        assert_eq!(host_event(Event::FocusGained), Some(HostEvent::Focus(true)));
    }

    #[test]
    fn test_host_options_from_lookup() {
        let env: HashMap<&str, &str> =
            HashMap::from([("BLOCKFALL_BELL", "off"), ("BLOCKFALL_FRAME_MS", "16")]);
        let options = HostOptions::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert!(!options.bell);
        assert_eq!(options.frame_interval_ms, 16);

        let options = HostOptions::from_lookup(|_| Some(String::from("junk")));
        assert!(options.bell);
        assert_eq!(options.frame_interval_ms, FRAME_INTERVAL_MS);
    }

    #[test]
    fn test_late_wake_releases_before_later_repeats() {
        let (engine, probe) = RecordingEngine::new();
        let mut session = Session::new(SessionConfig::default(), NullPresentation, NullFeedback);
        session.start(0, engine);
        let mut tracker = KeyTracker::synthesizing(150);

        let press = HostInput::PressStart(Control::MoveLeft);
        if let Some(input) = tracker.on_input(press, 0) {
            dispatch(&mut session, input, 0);
        }

        // Woken at 250: the repeat due at 100 fires, the release lands at
        // 150, and the repeat that would have been due at 200 never does.
        catch_up(&mut session, &mut tracker, 250);
        assert_eq!(probe.count(EngineCommand::Move(Direction::Left)), 2);
        assert!(!session.is_repeating(Control::MoveLeft));
        assert_eq!(tracker.next_expiry(), None);
    }
}
