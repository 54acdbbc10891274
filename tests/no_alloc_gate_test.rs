use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tui_blockfall::core::{NullFeedback, NullPresentation, Session, SessionConfig};
use tui_blockfall::engine::DemoEngine;
use tui_blockfall::input::{HostInput, KeyTracker};
use tui_blockfall::types::Control;

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

#[test]
fn session_hot_paths_do_not_allocate() {
    // Setup (outside counting) so one-time allocations don't trip the gate.
    let mut session = Session::new(SessionConfig::default(), NullPresentation, NullFeedback);
    session.start(0, DemoEngine::new());
    let mut tracker = KeyTracker::default();

    // Warm-up.
    session.run_until(1_000);

    let allocs = with_alloc_counting(|| {
        let mut now = 1_000;
        for round in 0..200u64 {
            let control = if round % 2 == 0 {
                Control::MoveLeft
            } else {
                Control::MoveRight
            };
            if tracker.on_input(HostInput::PressStart(control), now).is_some() {
                session.press_start(control, now);
            }
            session.press_start(Control::SoftDrop, now);
            session.press_start(Control::RotateCw, now);

            now += 37;
            session.pump(now);
            for input in tracker.expire(now) {
                if let HostInput::PressEnd(control) = input {
                    session.press_end(control);
                }
            }
            session.press_end(Control::SoftDrop);

            if round % 50 == 49 {
                session.press_start(Control::HardDrop, now);
                session.toggle_pause(now);
                session.toggle_pause(now);
                session.deactivate(now);
                session.activate(now);
            }
            if session.flags().is_game_over {
                session.restart(now);
            }
        }
        session.run_until(now + 10_000);
    });

    assert_eq!(allocs, 0);
}
