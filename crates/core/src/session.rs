//! Lifecycle bridge - one game session on a single control thread.
//!
//! `Session` owns the engine handle, the input controller, both loops and the
//! feedback coordinator, and serializes everything through `&mut self`. The
//! host supplies time: it calls [`Session::pump`] at [`Session::next_deadline`]
//! and forwards input and lifecycle events as they arrive.
//!
//! Loops only run while the session is started, in the foreground and not
//! paused. Suspending disarms their timers; nothing keeps ticking in the
//! background.

use crate::cadence::Cadence;
use crate::config::SessionConfig;
use crate::drop_scheduler::{DropScheduler, LoopState};
use crate::engine::{EngineHandle, SimulationEngine};
use crate::feedback::{FeedbackCoordinator, MusicState};
use crate::host::{FeedbackSink, Presentation};
use crate::input::InputController;
use crate::poll::PollLoop;
use crate::types::{Control, Cue, EngineCommand, Overlay, Snapshot, SurfaceEvent};

/// Session-wide flags
///
/// Mutated only by the session and the feedback coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionFlags {
    pub is_paused: bool,
    pub is_game_over: bool,
    /// Set once the game-over side effects ran; cleared when game over ends
    pub game_over_announced: bool,
}

/// Timer sources in tie-break order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerSource {
    Input,
    Drop,
    Poll,
}

pub struct Session<E: SimulationEngine, P: Presentation, F: FeedbackSink> {
    config: SessionConfig,
    cadence: Cadence,
    engine: EngineHandle<E>,
    presentation: P,
    feedback: FeedbackCoordinator<F>,
    input: InputController,
    drop_loop: DropScheduler,
    poll: PollLoop,
    flags: SessionFlags,
    foreground: bool,
    started: bool,
    torn_down: bool,
}

impl<E: SimulationEngine, P: Presentation, F: FeedbackSink> Session<E, P, F> {
    pub fn new(config: SessionConfig, presentation: P, sink: F) -> Self {
        let cadence = config.cadence();
        Self {
            config,
            cadence,
            engine: EngineHandle::detached(),
            presentation,
            feedback: FeedbackCoordinator::with_pulses(
                sink,
                config.level_up_pulse_ms,
                config.hard_drop_pulse_ms,
            ),
            input: InputController::with_interval(config.repeat_interval_ms),
            drop_loop: DropScheduler::new(cadence),
            poll: PollLoop::new(config.poll_interval_ms),
            flags: SessionFlags::default(),
            foreground: true,
            started: false,
            torn_down: false,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Create the engine and start music and both loops.
    ///
    /// Returns false (and drops `engine` untouched) if the session was already
    /// started or torn down.
    pub fn start(&mut self, now_ms: u64, engine: E) -> bool {
        if self.started || self.torn_down {
            return false;
        }
        log::info!("session start at {now_ms}ms");
        self.engine = EngineHandle::create(engine);
        self.started = true;
        self.feedback.start_music();

        if self.foreground {
            self.start_drop(now_ms);
            self.poll.start(now_ms);
        } else {
            self.drop_loop.park();
            self.feedback.pause_music();
        }
        true
    }

    /// Host came to the foreground.
    pub fn activate(&mut self, now_ms: u64) -> bool {
        if self.foreground {
            return false;
        }
        log::debug!("activate at {now_ms}ms");
        self.foreground = true;
        if self.loops_allowed() {
            self.resume_loops(now_ms);
            self.feedback.resume_music();
        }
        true
    }

    /// Host went to the background.
    pub fn deactivate(&mut self, now_ms: u64) -> bool {
        if !self.foreground {
            return false;
        }
        log::debug!("deactivate at {now_ms}ms");
        self.foreground = false;
        self.suspend_loops();
        self.feedback.pause_music();
        true
    }

    pub fn toggle_pause(&mut self, now_ms: u64) -> bool {
        let paused = !self.flags.is_paused;
        self.set_paused(paused, now_ms)
    }

    /// Returns false when nothing changed (same state, not started, torn down).
    pub fn set_paused(&mut self, paused: bool, now_ms: u64) -> bool {
        if self.flags.is_paused == paused || !self.started || self.torn_down {
            return false;
        }
        log::debug!("paused={paused} at {now_ms}ms");
        self.flags.is_paused = paused;
        self.presentation.set_overlay(Overlay::Paused, paused);

        if paused {
            self.suspend_loops();
            self.feedback.pause_music();
        } else if self.loops_allowed() {
            self.resume_loops(now_ms);
            self.feedback.resume_music();
        }
        true
    }

    /// Reset the engine and start over at level 1.
    pub fn restart(&mut self, now_ms: u64) -> bool {
        if !self.started || self.torn_down {
            return false;
        }
        log::info!("session restart at {now_ms}ms");
        self.engine.command(EngineCommand::Reset);
        self.feedback.reset();
        self.flags = SessionFlags::default();
        self.presentation.set_overlay(Overlay::Paused, false);
        self.presentation.set_overlay(Overlay::GameOver, false);
        self.input.release_all();
        self.poll.clear();

        self.feedback.cue(Cue::Restart);
        self.feedback.start_music();

        self.drop_loop.stop();
        if self.foreground {
            self.start_drop(now_ms);
            self.poll.start(now_ms);
        } else {
            self.drop_loop.park();
            self.feedback.pause_music();
        }
        true
    }

    /// Stop everything and release the engine. Idempotent.
    pub fn teardown(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        log::info!("session teardown");
        self.torn_down = true;
        self.drop_loop.stop();
        self.poll.stop();
        self.input.release_all();
        self.feedback.stop_music();
        self.engine.release();
        true
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Start of a control press. Returns whether a command reached the engine.
    pub fn press_start(&mut self, control: Control, now_ms: u64) -> bool {
        if !self.accepts_input() {
            log::trace!("ignoring {} press", control.as_str());
            return false;
        }
        let command = self.input.on_press_start(control, now_ms);
        self.issue(command)
    }

    pub fn press_end(&mut self, control: Control) {
        self.input.on_press_end(control);
    }

    /// Forward a render-side surface event to a live engine.
    pub fn surface(&mut self, event: SurfaceEvent) {
        self.engine.surface(event);
    }

    // ========================================================================
    // Timers
    // ========================================================================

    /// Fire every timer due at `now_ms`, earliest first.
    ///
    /// Ties go input repeats, then drop, then poll.
    pub fn pump(&mut self, now_ms: u64) {
        while let Some(source) = self.next_due_source(now_ms) {
            match source {
                TimerSource::Input => {
                    for command in self.input.fire_due(now_ms) {
                        self.issue(command);
                    }
                }
                TimerSource::Drop => {
                    let level = self.level();
                    if let Some(command) = self.drop_loop.fire(now_ms, level) {
                        self.issue(command);
                    }
                }
                TimerSource::Poll => {
                    if self.poll.fire(now_ms) {
                        self.on_poll(now_ms);
                    }
                }
            }
        }
    }

    /// Earliest pending timer, if any loop or repeat is armed.
    pub fn next_deadline(&self) -> Option<u64> {
        [
            self.input.next_due(),
            self.drop_loop.next_due(),
            self.poll.next_due(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Pump at every deadline up to and including `target_ms`.
    pub fn run_until(&mut self, target_ms: u64) {
        while let Some(due) = self.next_deadline() {
            if due > target_ms {
                break;
            }
            self.pump(due);
        }
    }

    fn next_due_source(&self, now_ms: u64) -> Option<TimerSource> {
        [
            (TimerSource::Input, self.input.next_due()),
            (TimerSource::Drop, self.drop_loop.next_due()),
            (TimerSource::Poll, self.poll.next_due()),
        ]
        .into_iter()
        .filter_map(|(source, due)| due.filter(|d| *d <= now_ms).map(|d| (d, source)))
        .min_by_key(|(due, _)| *due)
        .map(|(_, source)| source)
    }

    fn on_poll(&mut self, now_ms: u64) {
        let Some(snapshot) = self.poll.sample(&self.engine, &self.cadence) else {
            return;
        };
        self.presentation.publish(&snapshot);

        let transitions = self.feedback.observe(&snapshot, &mut self.flags);
        if transitions.game_over_entered {
            log::info!("game over: score {} lines {}", snapshot.score, snapshot.lines);
            self.drop_loop.stop();
            self.input.release_all();
            self.presentation.set_overlay(Overlay::GameOver, true);
        }
        if transitions.game_over_cleared {
            self.presentation.set_overlay(Overlay::GameOver, false);
            if self.loops_allowed() {
                self.start_drop(now_ms);
            }
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn issue(&mut self, command: EngineCommand) -> bool {
        if !self.engine.command(command) {
            return false;
        }
        self.feedback.on_command(command);
        if command.may_lock() {
            if let Some(event) = self.engine.take_last_event() {
                self.feedback.on_lock_event(event);
            }
        }
        true
    }

    fn start_drop(&mut self, now_ms: u64) {
        let level = self.level();
        if let Some(command) = self.drop_loop.start(now_ms, level) {
            self.issue(command);
        }
    }

    fn accepts_input(&self) -> bool {
        self.engine.is_live() && self.foreground && !self.flags.is_paused
    }

    fn loops_allowed(&self) -> bool {
        self.started && !self.torn_down && self.foreground && !self.flags.is_paused
    }

    fn suspend_loops(&mut self) {
        self.drop_loop.suspend();
        self.poll.stop();
        self.input.release_all();
    }

    fn resume_loops(&mut self, now_ms: u64) {
        let level = self.level();
        self.drop_loop.resume(now_ms, level);
        self.poll.start(now_ms);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn flags(&self) -> SessionFlags {
        self.flags
    }

    /// Most recently observed level
    pub fn level(&self) -> u32 {
        self.feedback.level()
    }

    /// Last published snapshot
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.poll.latest()
    }

    pub fn drop_state(&self) -> LoopState {
        self.drop_loop.state()
    }

    pub fn drop_scheduler(&self) -> &DropScheduler {
        &self.drop_loop
    }

    pub fn poll_running(&self) -> bool {
        self.poll.is_running()
    }

    pub fn music_state(&self) -> MusicState {
        self.feedback.music_state()
    }

    pub fn is_repeating(&self, control: Control) -> bool {
        self.input.is_repeating(control)
    }

    pub fn is_foreground(&self) -> bool {
        self.foreground
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn engine(&self) -> &EngineHandle<E> {
        &self.engine
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn feedback_sink(&self) -> &F {
        self.feedback.sink()
    }
}
