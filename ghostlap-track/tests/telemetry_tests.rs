//! Integration tests for telemetry synthesis and source selection

use ghostlap_core::config::TelemetryConfig;
use ghostlap_core::model::{TelemetrySample, Track, Waypoint};
use ghostlap_core::source::{AuthoredTelemetry, TelemetrySource};
use ghostlap_core::units::*;
use ghostlap_core::TrackError;
use ghostlap_track::synth::gear_for_speed;
use ghostlap_track::{synthesize, Synthesizer};

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

fn authored_sample(speed: f32) -> TelemetrySample {
    TelemetrySample {
        position: Waypoint::new(1.0, 0.0, 1.0),
        speed: Kph(speed),
        rpm: Rpm(7000.0),
        gear: 4,
        steering_angle: 3.0,
        timestamp: Seconds(0.0),
        throttle: Some(Percentage::new(0.9)),
        brake: None,
    }
}

#[test]
fn test_square_loop_telemetry() {
    let samples = synthesize(&square_track(), &TelemetryConfig::default()).unwrap();
    assert_eq!(samples.len(), 4);

    for s in &samples {
        assert_eq!(s.speed, Kph(250.0), "step of 100 saturates the clamp");
        assert_eq!(s.gear, 6);
        assert_eq!(s.rpm, Rpm(8000.0));
        assert!(s.steering_angle.abs() > 1.0, "every corner is a turn");
    }

    let first = samples[0].steering_angle.abs();
    for s in &samples[1..] {
        assert!(
            (s.steering_angle.abs() - first).abs() < 1e-3,
            "corners should steer equally: {} vs {}",
            s.steering_angle,
            first
        );
    }
    // quarter turn scaled by the default gain
    assert!((first - std::f32::consts::FRAC_PI_2 * 100.0).abs() < 1e-2);
}

#[test]
fn test_speed_always_within_clamp() {
    let cfg = TelemetryConfig::default();
    let spacings = [0.0_f32, 0.01, 0.2, 0.5, 1.0, 3.0, 1000.0];
    for spacing in spacings {
        let points: Vec<Waypoint> = (0..6)
            .map(|i| Waypoint::new(i as f32 * spacing, 0.0, (i % 2) as f32 * spacing))
            .collect();
        let samples = Synthesizer::new(cfg.clone()).derive(&points).unwrap();
        for s in samples {
            assert!(
                (60.0..=250.0).contains(&s.speed.0),
                "spacing {} gave speed {}",
                spacing,
                s.speed.0
            );
        }
    }
}

#[test]
fn test_coincident_points_clamp_to_minimum() {
    let p = Waypoint::new(3.0, 0.0, 3.0);
    let samples = Synthesizer::default().derive(&[p, p, p]).unwrap();
    assert!(samples.iter().all(|s| s.speed == Kph(60.0)));
    assert!(samples.iter().all(|s| s.gear == 2));
    assert!(samples.iter().all(|s| s.steering_angle.is_finite()));
}

#[test]
fn test_gear_monotonic_across_samples() {
    let points: Vec<Waypoint> = (0..50)
        .map(|i| {
            let a = i as f32 / 50.0 * std::f32::consts::TAU;
            let r = 20.0 + 15.0 * (a * 2.0).sin();
            Waypoint::new(r * a.cos(), 0.0, r * a.sin())
        })
        .collect();
    let samples = Synthesizer::default().derive(&points).unwrap();
    for a in &samples {
        for b in &samples {
            if a.speed > b.speed {
                assert!(a.gear >= b.gear);
            }
        }
    }
}

#[test]
fn test_custom_config_is_honored() {
    let cfg = TelemetryConfig {
        speed_min_kph: 10.0,
        speed_max_kph: 20.0,
        gear_thresholds_kph: vec![15.0],
        steering_gain: 1.0,
        ..Default::default()
    };
    let samples = synthesize(&square_track(), &cfg).unwrap();
    assert!(samples.iter().all(|s| s.speed == Kph(20.0) && s.gear == 2));
    assert!(samples
        .iter()
        .all(|s| (s.steering_angle - std::f32::consts::FRAC_PI_2).abs() < 1e-4));
    assert_eq!(gear_for_speed(Kph(15.0), &cfg.gear_thresholds_kph), 1);
}

#[test]
fn test_authored_telemetry_takes_precedence() {
    let authored = vec![authored_sample(120.0), authored_sample(130.0)];
    let track = square_track().with_telemetry(authored.clone());

    let samples = synthesize(&track, &TelemetryConfig::default()).unwrap();
    assert_eq!(samples, authored, "authored samples are returned verbatim");
}

#[test]
fn test_authored_telemetry_skips_point_validation() {
    let track = Track::new("no points", Vec::new()).with_telemetry(vec![authored_sample(99.0)]);
    let samples = synthesize(&track, &TelemetryConfig::default()).unwrap();
    assert_eq!(samples.len(), 1);
}

#[test]
fn test_empty_authored_telemetry_falls_back_to_synthesis() {
    let track = square_track().with_telemetry(Vec::new());
    let samples = synthesize(&track, &TelemetryConfig::default()).unwrap();
    assert_eq!(samples.len(), 4);
    assert_eq!(samples[0].speed, Kph(250.0));
}

#[test]
fn test_sources_report_acceptance() {
    let plain = square_track();
    let authored = square_track().with_telemetry(vec![authored_sample(100.0)]);
    let synth = Synthesizer::default();

    assert!(!AuthoredTelemetry.accepts(&plain));
    assert!(AuthoredTelemetry.accepts(&authored));
    assert!(synth.accepts(&plain));
    assert_eq!(AuthoredTelemetry.name(), "authored");
    assert_eq!(synth.name(), "synthesized");
    assert_eq!(
        AuthoredTelemetry.produce(&plain).unwrap_err(),
        TrackError::MissingTrack
    );
}

#[test]
fn test_synthesis_is_deterministic() {
    let a = synthesize(&square_track(), &TelemetryConfig::default()).unwrap();
    let b = synthesize(&square_track(), &TelemetryConfig::default()).unwrap();
    assert_eq!(a, b);
}
