//! Benchmark tests for showreel-core operations
//!
//! Run with: cargo bench -p showreel-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use showreel_core::sim::SimulatedMedia;
use showreel_core::surface::RecordingSurface;
use showreel_core::{
    format_time, parse_sources, render, translate, MediaEvent, MediaSource, PlayerConfig,
    PlayerController, PlayerState, PlayerStatus, SurfaceSink, SurfaceView,
};

// ============================================================================
// Helpers
// ============================================================================

/// Sink that drops every view
struct NullSurface;

impl SurfaceSink for NullSurface {
    fn apply(&mut self, view: &SurfaceView) {
        black_box(view);
    }
}

fn playing_player(duration: f64) -> PlayerController<SimulatedMedia> {
    let config = PlayerConfig::showcase(vec![MediaSource::new("reel.mp4", "video/mp4")]);
    let media = SimulatedMedia::new();
    let host = media.handle();
    let mut player = PlayerController::new(config, media, NullSurface);

    player.play().expect("play");
    player.handle_event(MediaEvent::LoadedMetadata { duration });
    for event in host.resolve_play() {
        player.handle_event(event);
    }
    player
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_format_time(c: &mut Criterion) {
    c.bench_function("format_time", |b| {
        b.iter(|| format_time(black_box(3599.7)))
    });
}

fn bench_translate(c: &mut Criterion) {
    let state = PlayerState {
        status: PlayerStatus::Playing,
        duration: 120.0,
        current_time: 30.0,
        ..PlayerState::default()
    };
    let event = MediaEvent::TimeUpdate { current_time: 31.0 };

    c.bench_function("translate_time_update", |b| {
        b.iter(|| translate(black_box(&event), black_box(&state), None))
    });
}

fn bench_render(c: &mut Criterion) {
    let config = PlayerConfig::default();
    let state = PlayerState {
        status: PlayerStatus::Playing,
        duration: 120.0,
        current_time: 30.0,
        ..PlayerState::default()
    };

    c.bench_function("render_surface", |b| {
        b.iter(|| render(black_box(&state), black_box(&config), true))
    });
}

fn bench_time_update_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("time_update_dispatch");

    for updates in [10u32, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(updates), &updates, |b, &n| {
            let mut player = playing_player(f64::from(n));
            b.iter(|| {
                for t in 0..n {
                    player.handle_event(MediaEvent::TimeUpdate {
                        current_time: f64::from(t),
                    });
                }
            })
        });
    }

    group.finish();
}

fn bench_parse_sources(c: &mut Criterion) {
    let encoded = concat!(
        r#"[{"src":"media/reel.webm","type":"video/webm"},"#,
        r#"{"src":"media/reel.mp4","type":"video/mp4"}]"#,
    );

    c.bench_function("parse_sources", |b| b.iter(|| parse_sources(black_box(encoded))));
}

fn bench_construction(c: &mut Criterion) {
    c.bench_function("player_construction", |b| {
        b.iter(|| {
            let config = PlayerConfig::showcase(vec![MediaSource::new("a.mp4", "video/mp4")]);
            PlayerController::new(config, SimulatedMedia::new(), RecordingSurface::new())
        })
    });
}

criterion_group!(
    benches,
    bench_format_time,
    bench_translate,
    bench_render,
    bench_time_update_dispatch,
    bench_parse_sources,
    bench_construction,
);
criterion_main!(benches);
