//! Terminal blockfall runner (default binary).
//!
//! Drives a session around the demo engine: crossterm input on a reader
//! thread, the session on a current-thread tokio runtime, HUD frames through
//! the diffing terminal renderer.
//!
//! Logs go to stderr (`RUST_LOG`); redirect it while the HUD owns the screen.

use std::fs;

use anyhow::{Context, Result};
use crossterm::event;
use tokio::sync::mpsc;

use tui_blockfall::core::{Session, SessionConfig};
use tui_blockfall::engine::DemoEngine;
use tui_blockfall::host::{self, HostEvent, HostOptions};
use tui_blockfall::input::{KeyTracker, KEY_RELEASE_TIMEOUT_MS};
use tui_blockfall::term::{
    shared_hud, FrameBuffer, HudView, TermFeedback, TermPresentation, TerminalRenderer,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = load_config()?;
    let options = HostOptions::from_env();

    let mut term = TerminalRenderer::new();
    let release_events = term.enter()?;

    let result = run(&mut term, config, options, release_events);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn load_config() -> Result<SessionConfig> {
    let config = match std::env::var("BLOCKFALL_CONFIG") {
        Ok(path) => {
            let text =
                fs::read_to_string(&path).with_context(|| format!("read config file {path}"))?;
            SessionConfig::from_json(&text).with_context(|| format!("parse config file {path}"))?
        }
        Err(_) => SessionConfig::default(),
    };
    config
        .with_env_overrides()
        .validate()
        .context("invalid BLOCKFALL_* override")
}

fn spawn_input_thread(tx: mpsc::Sender<HostEvent>) -> Result<()> {
    std::thread::Builder::new()
        .name("blockfall-input".into())
        .spawn(move || loop {
            let raw = match event::read() {
                Ok(raw) => raw,
                Err(err) => {
                    log::warn!("terminal input failed: {err}");
                    let _ = tx.blocking_send(HostEvent::Quit);
                    return;
                }
            };
            let Some(event) = host::host_event(raw) else {
                continue;
            };
            if tx.blocking_send(event).is_err() || event == HostEvent::Quit {
                return;
            }
        })
        .context("spawn input thread")?;
    Ok(())
}

fn run(
    term: &mut TerminalRenderer,
    config: SessionConfig,
    options: HostOptions,
    release_events: bool,
) -> Result<()> {
    let hud = shared_hud();
    hud.borrow_mut().release_events = release_events;

    let mut session = Session::new(
        config,
        TermPresentation::new(hud.clone()),
        TermFeedback::new(hud.clone(), options.bell),
    );
    let tracker = if release_events {
        KeyTracker::with_release_events()
    } else {
        KeyTracker::synthesizing(KEY_RELEASE_TIMEOUT_MS)
    };

    let (tx, rx) = mpsc::channel::<HostEvent>(64);
    spawn_input_thread(tx)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("build tokio runtime")?;

    let view = HudView;
    let mut fb = FrameBuffer::new(0, 0);
    let on_frame = |_session: &mut Session<_, _, _>, frame: host::Frame| -> Result<()> {
        let mut hud = hud.borrow_mut();
        term.ring_bell(hud.take_bells())?;
        if !hud.dirty && !frame.resized {
            return Ok(());
        }
        if frame.resized {
            term.invalidate();
        }
        hud.dirty = false;

        let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&hud, width, height, &mut fb);
        term.draw_swap(&mut fb)
    };

    runtime.block_on(host::run(
        &mut session,
        DemoEngine::new(),
        rx,
        tracker,
        options,
        on_frame,
    ))
}
