//! Integration tests for the playback driver

use ghostlap_core::model::{Track, Waypoint};
use ghostlap_core::Config;
use ghostlap_player::driver;
use ghostlap_player::state::PlayerState;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn square_track() -> Track {
    Track::new(
        "Square",
        vec![
            Waypoint::new(0.0, 0.0, 0.0),
            Waypoint::new(100.0, 0.0, 0.0),
            Waypoint::new(100.0, 0.0, 100.0),
            Waypoint::new(0.0, 0.0, 100.0),
        ],
    )
}

#[tokio::test(start_paused = true)]
async fn test_driver_broadcasts_frames_in_order() {
    let state = PlayerState::new(Config::default()).unwrap();
    state.load_track(Some(square_track())).await.unwrap();

    let mut frames = state.subscribe();
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(driver::run(state.clone(), cancel.clone()));

    let mut indices = Vec::new();
    for _ in 0..6 {
        indices.push(frames.recv().await.unwrap().index);
    }
    assert_eq!(indices, vec![1, 2, 3, 0, 1, 2]);

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_driver_honors_tick_interval() {
    let mut config = Config::default();
    config.playback.tick_interval_ms = 200;
    let state = PlayerState::new(config).unwrap();
    state.load_track(Some(square_track())).await.unwrap();

    let mut frames = state.subscribe();
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(driver::run(state.clone(), cancel.clone()));

    let started = tokio::time::Instant::now();
    frames.recv().await.unwrap();
    frames.recv().await.unwrap();
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(400), "{:?}", elapsed);
    assert!(elapsed < Duration::from_millis(600), "{:?}", elapsed);

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_paused_session_emits_nothing() {
    let state = PlayerState::default();
    state.load_track(Some(square_track())).await.unwrap();
    state.toggle().await;

    let mut frames = state.subscribe();
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(driver::run(state.clone(), cancel.clone()));

    let waited = tokio::time::timeout(Duration::from_secs(2), frames.recv()).await;
    assert!(waited.is_err());

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_driver_idles_without_track() {
    let state = PlayerState::default();
    let mut frames = state.subscribe();
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(driver::run(state.clone(), cancel.clone()));

    let waited = tokio::time::timeout(Duration::from_secs(1), frames.recv()).await;
    assert!(waited.is_err());

    // a track loaded mid-run starts playing on the next tick
    state.load_track(Some(square_track())).await.unwrap();
    assert_eq!(frames.recv().await.unwrap().index, 1);

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_zero_tick_interval_does_not_panic() {
    let mut state = PlayerState::default();
    let mut config = Config::default();
    config.playback.tick_interval_ms = 0;
    state.config = Arc::new(config);
    state.load_track(Some(square_track())).await.unwrap();

    let mut frames = state.subscribe();
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(driver::run(state.clone(), cancel.clone()));

    assert_eq!(frames.recv().await.unwrap().index, 1);

    cancel.cancel();
    handle.await.unwrap();
}
