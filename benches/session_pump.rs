use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_blockfall::core::{NullFeedback, NullPresentation, Session, SessionConfig};
use tui_blockfall::engine::DemoEngine;
use tui_blockfall::types::Control;

type BenchSession = Session<DemoEngine, NullPresentation, NullFeedback>;

fn started_session() -> BenchSession {
    let mut session = Session::new(SessionConfig::default(), NullPresentation, NullFeedback);
    session.start(0, DemoEngine::new());
    session
}

fn bench_pump_idle(c: &mut Criterion) {
    let mut session = started_session();
    session.run_until(1_000);

    c.bench_function("pump_nothing_due", |b| {
        b.iter(|| {
            session.pump(black_box(1_000));
        })
    });
}

fn bench_run_one_second(c: &mut Criterion) {
    c.bench_function("run_until_1s_held_move", |b| {
        b.iter(|| {
            let mut session = started_session();
            session.press_start(Control::MoveLeft, 0);
            session.press_start(Control::SoftDrop, 0);
            session.run_until(black_box(1_000));
            session.teardown();
        })
    });
}

fn bench_to_game_over(c: &mut Criterion) {
    c.bench_function("hard_drop_to_game_over", |b| {
        b.iter(|| {
            let mut session = started_session();
            let mut now = 0;
            while !session.flags().is_game_over {
                session.press_start(Control::HardDrop, now);
                now += 100;
                session.run_until(now);
            }
            black_box(session.snapshot());
        })
    });
}

fn bench_next_deadline(c: &mut Criterion) {
    let mut session = started_session();
    session.press_start(Control::MoveRight, 0);

    c.bench_function("next_deadline", |b| {
        b.iter(|| black_box(session.next_deadline()))
    });
}

criterion_group!(
    benches,
    bench_pump_idle,
    bench_run_one_second,
    bench_to_game_over,
    bench_next_deadline
);
criterion_main!(benches);
