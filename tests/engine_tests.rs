use tapzone::clock::ManualClock;
use tapzone::config::Config;
use tapzone::geometry::{Point, Rect};
use tapzone::selection::SelectionPhase;
use tapzone::{AcquisitionEngine, EngineEvent, Protocol, TapZoneError};

mod common;
use common::{engine, seeded_config};

const FAR_AWAY: (f32, f32) = (-5000.0, -5000.0);

fn outcome_of(events: &[EngineEvent]) -> &tapzone::AttemptOutcome {
    events
        .iter()
        .find_map(EngineEvent::as_outcome)
        .expect("event batch carries an outcome")
}

#[test]
fn test_scatter_hit_completes_trial() {
    let clock = ManualClock::new();
    let mut e = engine(Protocol::Scatter, 7, clock.clone());
    let target = e.targets().get(3).unwrap().clone();

    let started = e.start_trial().unwrap();
    assert_eq!(
        started,
        vec![EngineEvent::TrialStarted {
            trial: 1,
            target: None
        }]
    );
    assert!(e.trial_in_progress());
    assert_eq!(e.phase(), SelectionPhase::CoarseStep);

    clock.advance(420);
    // 5 units off centre
    let events = e
        .pointer_down(target.position.x + 3.0, target.position.y + 4.0)
        .unwrap();
    let out = outcome_of(&events);
    assert!(out.success);
    assert!(out.completes_trial);
    assert_eq!(out.target, Some(3));
    assert_eq!(out.value, target.value);
    assert_eq!(out.elapsed_ms, 420);

    assert!(!e.trial_in_progress());
    assert_eq!(e.distance_history(3).len(), 1);
    assert!((out.distance - 5.0).abs() < 1e-3);
    assert!(e.targets().get(3).unwrap().hit_radius() < target.hit_radius());
}

#[test]
fn test_scatter_misses_escalate_to_magnifier() {
    let mut e = engine(Protocol::Scatter, 7, ManualClock::new());
    e.start_trial().unwrap();

    for n in 1..=2 {
        let events = e.pointer_down(FAR_AWAY.0, FAR_AWAY.1).unwrap();
        let out = outcome_of(&events);
        assert!(!out.success);
        assert!(!out.completes_trial);
        assert_eq!(out.target, None);
        assert_eq!(out.logged_index(), -1);
        assert_eq!(out.failed_attempts, n);
        assert!(e.magnifier().is_none());
    }

    let events = e.pointer_down(FAR_AWAY.0, FAR_AWAY.1).unwrap();
    let assist = events
        .iter()
        .find_map(|ev| match ev {
            EngineEvent::Assist(a) => Some(*a),
            _ => None,
        })
        .expect("third miss fires the assist");
    assert_eq!(assist.zoom_level, 1.5);
    assert_eq!(assist.center, Point::new(FAR_AWAY.0, FAR_AWAY.1));
    assert_eq!(e.zoom_level(), 1.5);
    assert_eq!(e.failed_attempts(), 3);

    let magnifier = e.magnifier().unwrap();
    assert_eq!(magnifier.scale, 1.5);
    assert_eq!(magnifier.radius, 100.0);
}

#[test]
fn test_scatter_magnifier_follows_pointer_and_closes_on_up() {
    let mut e = engine(Protocol::Scatter, 7, ManualClock::new());
    e.start_trial().unwrap();
    assert!(e.pointer_move(10.0, 10.0).is_empty());

    for _ in 0..3 {
        e.pointer_down(FAR_AWAY.0, FAR_AWAY.1).unwrap();
    }
    let moved = e.pointer_move(300.0, 400.0);
    assert_eq!(moved, vec![EngineEvent::MagnifierMoved(Point::new(300.0, 400.0))]);
    assert_eq!(e.magnifier().unwrap().center, Point::new(300.0, 400.0));

    assert_eq!(e.pointer_up(), vec![EngineEvent::MagnifierCleared]);
    assert!(e.magnifier().is_none());
    assert_eq!(e.zoom_level(), 1.0);
    // the trial itself is still running
    assert!(e.trial_in_progress());
    assert!(e.pointer_up().is_empty());
}

#[test]
fn test_two_step_end_to_end() {
    let clock = ManualClock::new();
    let mut e = engine(Protocol::TwoStep, 11, clock.clone());
    e.start_trial().unwrap();

    let idx = e.active_target().expect("two-step picks a target");
    let pos = e.targets().get(idx).unwrap().position;

    e.pointer_down(pos.x, pos.y).unwrap();
    assert_eq!(e.phase(), SelectionPhase::PreciseStep);
    assert_eq!(e.zoom_level(), 2.0);
    let zoom = e.magnifier().unwrap();
    assert_eq!(zoom.center, pos);

    clock.advance(900);
    let shown = zoom.forward(pos);
    let events = e.pointer_down(shown.x, shown.y).unwrap();
    let out = outcome_of(&events);
    assert!(out.success);
    assert_eq!(out.target, Some(idx));
    assert_eq!(out.elapsed_ms, 900);
    assert_eq!(e.phase(), SelectionPhase::Idle);
    assert!(e.magnifier().is_none());
    assert!(e.active_target().is_none());
}

#[test]
fn test_ad_regions_rotate_by_trial() {
    let mut e = engine(Protocol::Ad, 3, ManualClock::new());

    e.start_trial().unwrap();
    assert_eq!(e.fixed_region(), Some(Rect::new(970.0, 30.0, 1050.0, 110.0)));

    let events = e.pointer_down(500.0, 500.0).unwrap();
    let miss = outcome_of(&events);
    assert!(!miss.success);
    assert_eq!(miss.failed_attempts, 1);
    assert_eq!(e.failed_attempts(), 1);

    let events = e.pointer_down(1000.0, 60.0).unwrap();
    let hit = outcome_of(&events);
    assert!(hit.success);
    assert!(hit.completes_trial);
    assert_eq!(hit.target, None);
    assert_eq!(hit.failed_attempts, 1);

    e.start_trial().unwrap();
    assert_eq!(e.fixed_region(), Some(Rect::new(440.0, 710.0, 640.0, 910.0)));
    // edges are inclusive
    let events = e.pointer_down(440.0, 710.0).unwrap();
    assert!(outcome_of(&events).success);
    assert_eq!(e.trials_started(), 2);
}

#[test]
fn test_invalid_calls_leave_state_untouched() {
    let mut e = engine(Protocol::TwoStep, 5, ManualClock::new());

    let err = e.pointer_down(1.0, 1.0).unwrap_err();
    assert!(matches!(err, TapZoneError::NoActiveTrial));
    assert!(err.is_invalid_call());

    e.start_trial().unwrap();
    let target = e.active_target();
    let err = e.start_trial().unwrap_err();
    assert!(matches!(err, TapZoneError::TrialInProgress { trial: 1 }));
    assert_eq!(e.trials_started(), 1);
    assert_eq!(e.active_target(), target);
}

#[test]
fn test_zero_targets_rejects_trials() {
    for protocol in [Protocol::Scatter, Protocol::TwoStep] {
        let mut e = AcquisitionEngine::builder(protocol)
            .with_config(seeded_config(1))
            .with_targets(0)
            .build()
            .unwrap();
        assert!(e.targets().is_empty());
        assert!(matches!(e.start_trial(), Err(TapZoneError::NoTargets)));
        assert_eq!(e.trials_started(), 0);
    }
}

#[test]
fn test_regeneration_aborts_trial_and_resets_history() {
    let mut e = engine(Protocol::Scatter, 9, ManualClock::new());
    e.start_trial().unwrap();
    e.pointer_down(FAR_AWAY.0, FAR_AWAY.1).unwrap();
    e.start_trial().unwrap_err();

    let events = e.regenerate_targets(10, 800.0, 600.0);
    assert_eq!(events.last(), Some(&EngineEvent::TargetsRegenerated { count: 10 }));
    assert!(!e.trial_in_progress());
    assert_eq!(e.targets().len(), 10);
    assert_eq!(e.viewport().width, 800.0);
    assert!(e.targets().iter().all(|t| t.hit_radius() == 30.0));
    assert!((0..10).all(|i| e.distance_history(i).is_empty()));
    assert!(e.start_trial().is_ok());
}

#[test]
fn test_builder_rejects_invalid_config() {
    let mut config = Config::default();
    config.radius.min_radius = 200.0;
    let result = AcquisitionEngine::builder(Protocol::Scatter)
        .with_config(config)
        .build();
    assert!(matches!(result, Err(TapZoneError::Config(_))));
}

#[test]
fn test_region_rates_start_at_prior() {
    let e = engine(Protocol::Scatter, 1, ManualClock::new());
    assert_eq!(e.regions().region_count(), 5);
    for region in 0..5 {
        assert_eq!(e.region_success_rate(region), 0.5);
    }
}

#[test]
fn test_builder_rejects_nan_zoom_and_radius() {
    let mut nan_zoom = seeded_config(1);
    nan_zoom.escalation.max_zoom_level = f32::NAN;
    let mut nan_radius = seeded_config(1);
    nan_radius.radius.base_radius = f32::NAN;

    for config in [nan_zoom, nan_radius] {
        let result = AcquisitionEngine::builder(Protocol::Scatter)
            .with_config(config)
            .build();
        assert!(matches!(result, Err(TapZoneError::Config(_))));
    }
}

#[test]
fn test_every_target_starts_inside_radius_bounds() {
    for protocol in [Protocol::Scatter, Protocol::TwoStep, Protocol::Ad] {
        let mut e = engine(protocol, 4, ManualClock::new());
        let (min, max) = (e.config().radius.min_radius, e.config().radius.max_radius);
        assert!(e.targets().iter().all(|t| (min..=max).contains(&t.hit_radius())));
        e.start_trial().unwrap();
        // ten misses escalate repeatedly without leaving the bounds
        for _ in 0..10 {
            e.pointer_down(FAR_AWAY.0, FAR_AWAY.1).unwrap();
        }
        assert!(e.targets().iter().all(|t| (min..=max).contains(&t.hit_radius())));
    }
}
