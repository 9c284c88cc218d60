use tapzone::config::EscalationParams;
use tapzone::geometry::Point;
use tapzone::selection::EscalationPolicy;

const P: Point = Point::new(10.0, 20.0);

#[test]
fn test_fires_exactly_at_threshold_and_resets() {
    let mut policy = EscalationPolicy::new(&EscalationParams::default());
    assert!(policy.on_miss(P).is_none());
    assert!(policy.on_miss(P).is_none());
    assert_eq!(policy.consecutive_misses(), 2);

    let assist = policy.on_miss(P).expect("third miss escalates");
    assert_eq!(assist.zoom_level, 1.5);
    assert!(!assist.clamped_at_max_zoom);
    assert_eq!(assist.center, P);
    assert_eq!(policy.consecutive_misses(), 0);
}

#[test]
fn test_one_assist_per_threshold_run() {
    let mut policy = EscalationPolicy::new(&EscalationParams::default());
    let fired = (0..9).filter_map(|_| policy.on_miss(P)).count();
    assert_eq!(fired, 3);
    assert_eq!(policy.zoom_level(), 2.5);
}

#[test]
fn test_zoom_clamps_at_max() {
    let mut policy = EscalationPolicy::new(&EscalationParams::default());
    let mut last = None;
    for _ in 0..(3 * 20) {
        if let Some(a) = policy.on_miss(P) {
            last = Some(a);
        }
    }
    let last = last.unwrap();
    assert_eq!(last.zoom_level, 5.0);
    assert!(last.clamped_at_max_zoom);
}

#[test]
fn test_hit_clears_streak_but_keeps_zoom() {
    let mut policy = EscalationPolicy::new(&EscalationParams::default());
    for _ in 0..3 {
        policy.on_miss(P);
    }
    policy.on_miss(P);
    policy.on_miss(P);
    policy.on_hit();
    assert_eq!(policy.consecutive_misses(), 0);
    assert_eq!(policy.zoom_level(), 1.5);
    assert!(policy.on_miss(P).is_none());
}

#[test]
fn test_reset_zoom_and_reset() {
    let mut policy = EscalationPolicy::new(&EscalationParams::default());
    for _ in 0..4 {
        policy.on_miss(P);
    }
    policy.reset_zoom();
    assert_eq!(policy.zoom_level(), 1.0);
    assert_eq!(policy.consecutive_misses(), 1);

    policy.reset();
    assert_eq!(policy.consecutive_misses(), 0);
}

#[test]
fn test_custom_threshold() {
    let params = EscalationParams {
        max_failed_attempts: 1,
        zoom_step: 1.0,
        ..Default::default()
    };
    let mut policy = EscalationPolicy::new(&params);
    assert_eq!(policy.on_miss(P).unwrap().zoom_level, 2.0);
    assert_eq!(policy.on_miss(P).unwrap().zoom_level, 3.0);
}
