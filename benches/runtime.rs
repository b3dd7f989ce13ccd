use std::io;
use std::time::Duration;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fetuccine_hub::logging::NullSink;
use fetuccine_hub::{HubBuilder, HubConfig, HubRuntime, Logger, MemoryStore, RuntimeEvent, Size};

fn build_runtime() -> HubRuntime {
    let mut config = HubConfig::default();
    config.toasts.seed = Some(42);
    HubBuilder::new(config)
        .with_store(MemoryStore::new())
        .with_logger(Logger::new(NullSink))
        .with_size(Size::new(100, 40))
        .build()
        .expect("runtime")
}

/// Frame ticks through the whole tour with some link navigation mixed in.
fn scripted_events() -> Vec<RuntimeEvent> {
    let mut events = Vec::new();
    for frame in 0..250u32 {
        events.push(RuntimeEvent::Tick {
            elapsed: Duration::from_millis(100),
        });
        if frame % 25 == 0 {
            events.push(RuntimeEvent::Key(KeyEvent::new(
                KeyCode::Down,
                KeyModifiers::NONE,
            )));
        }
    }
    events
}

fn runtime_tour_script(c: &mut Criterion) {
    let script = scripted_events();
    c.bench_function("runtime_tour_script", |b| {
        b.iter(|| {
            let mut runtime = build_runtime();
            let mut sink = io::sink();
            runtime
                .run_scripted(&mut sink, black_box(script.clone()))
                .expect("scripted run");
        });
    });
}

fn tour_controller_timeline(c: &mut Criterion) {
    use fetuccine_hub::{TourController, TourTiming};

    c.bench_function("tour_controller_timeline", |b| {
        b.iter(|| {
            let mut tour = TourController::new(TourTiming::default(), Box::new(MemoryStore::new()));
            tour.initialize();
            let mut transitions = 0usize;
            for ms in (0..=22_000u64).step_by(100) {
                transitions += tour.advance_to(Duration::from_millis(ms)).len();
            }
            black_box(transitions)
        });
    });
}

criterion_group!(benches, runtime_tour_script, tour_controller_timeline);
criterion_main!(benches);
